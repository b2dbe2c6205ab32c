//! PNG-backed host implementation for native runs.
//!
//! Wall clock via `chrono`, monotonic clock via `std::time::Instant`,
//! compositing and persistence via the `image` crate. There is no real
//! window loop here; the container size is whatever the embedding driver
//! says it is.

use std::path::Path;
use std::time::Instant;

use chrono::{Datelike, Timelike};
use image::imageops::FilterType;
use image::RgbaImage;

use easel_core::error::EaselError;
use easel_core::host::{Host, Placement, Surface, Timestamp};

/// Production [`Host`]: real clocks, PNG files, software compositing.
#[derive(Debug)]
pub struct SystemHost {
    started: Instant,
    window_width: f64,
    window_height: f64,
}

impl SystemHost {
    pub fn new(window_width: f64, window_height: f64) -> Self {
        Self {
            started: Instant::now(),
            window_width,
            window_height,
        }
    }

    /// Updates the container size reported to the composition layer.
    pub fn set_window_size(&mut self, width: f64, height: f64) {
        self.window_width = width;
        self.window_height = height;
    }
}

fn surface_image(surface: &Surface) -> Option<RgbaImage> {
    RgbaImage::from_raw(surface.width(), surface.height(), surface.pixels().to_vec())
}

impl Host for SystemHost {
    fn blit(&mut self, src: &Surface, dst: &mut Surface, placement: Placement) {
        if placement.width == 0 || placement.height == 0 {
            return;
        }
        let (Some(src_img), Some(mut dst_img)) = (surface_image(src), surface_image(dst)) else {
            log::error!("blit skipped: surface buffer size mismatch");
            return;
        };
        let scaled = image::imageops::resize(
            &src_img,
            placement.width,
            placement.height,
            FilterType::Triangle,
        );
        image::imageops::overlay(
            &mut dst_img,
            &scaled,
            i64::from(placement.x),
            i64::from(placement.y),
        );
        dst.pixels_mut().copy_from_slice(dst_img.as_raw());
    }

    fn window_width(&self) -> f64 {
        self.window_width
    }

    fn window_height(&self) -> f64 {
        self.window_height
    }

    fn now(&self) -> Timestamp {
        let now = chrono::Local::now();
        Timestamp {
            year: now.year(),
            month: now.month(),
            day: now.day(),
            hour: now.hour(),
            minute: now.minute(),
            second: now.second(),
        }
    }

    fn millis(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    fn save_surface(&mut self, surface: &Surface, path: &Path) -> Result<(), EaselError> {
        let img = surface_image(surface)
            .ok_or_else(|| EaselError::Io("RGBA buffer size mismatch".into()))?;
        img.save(path).map_err(|e| EaselError::Io(e.to_string()))
    }
}

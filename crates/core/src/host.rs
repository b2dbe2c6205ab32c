//! The host rendering engine capability consumed by easel.
//!
//! Easel never draws pixels itself; it computes where things go and asks a
//! [`Host`] to allocate surfaces, composite one surface onto another, and
//! persist them. The trait is object-safe so the whole composition layer can
//! run against `&mut dyn Host`. [`HeadlessHost`] is the deterministic
//! implementation used by tests and windowless runs; the PNG-backed system
//! host lives in the screens crate.

use std::fmt;
use std::path::{Path, PathBuf};

use glam::DVec2;

use crate::error::EaselError;

/// Wall-clock fields used to stamp export filenames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl fmt::Display for Timestamp {
    /// Formats as `YYYY-MM-DD_HH-MM-SS`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}_{:02}-{:02}-{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// A drawable RGBA8 buffer, visible or offscreen.
///
/// Easel only sizes, composites, and persists surfaces; what gets drawn into
/// the pixels is the sketch's business via the host engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    /// Allocates a zeroed surface.
    ///
    /// Returns `EaselError::InvalidDimensions` if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, EaselError> {
        if width == 0 || height == 0 {
            return Err(EaselError::InvalidDimensions);
        }
        Ok(Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA8 pixel data, row-major, `width * height * 4` bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Reallocates the buffer zeroed at the new size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), EaselError> {
        *self = Self::new(width, height)?;
        Ok(())
    }

    /// Fills every pixel with the given RGBA color.
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
    }
}

/// Destination box for compositing one surface onto another, in the
/// destination's device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// The host rendering engine: surface allocation, compositing, window
/// geometry, clocks, and the file-save primitive.
///
/// Object-safe. Everything above this trait is pure composition logic that
/// can run against any implementation.
pub trait Host {
    /// Allocates a fresh surface.
    fn create_surface(&mut self, width: u32, height: u32) -> Result<Surface, EaselError> {
        Surface::new(width, height)
    }

    /// Resizes an existing surface, discarding its contents.
    fn resize_surface(
        &mut self,
        surface: &mut Surface,
        width: u32,
        height: u32,
    ) -> Result<(), EaselError> {
        surface.resize(width, height)
    }

    /// Composites `src` into `dst` at the placement box, scaling as needed.
    fn blit(&mut self, src: &Surface, dst: &mut Surface, placement: Placement);

    /// Current container (window) width in device pixels.
    fn window_width(&self) -> f64;

    /// Current container (window) height in device pixels.
    fn window_height(&self) -> f64;

    fn window_center(&self) -> DVec2 {
        DVec2::new(self.window_width() / 2.0, self.window_height() / 2.0)
    }

    /// Wall-clock timestamp for export filenames.
    fn now(&self) -> Timestamp;

    /// Milliseconds on the host's monotonic clock; drives deferred
    /// scheduling of export stages.
    fn millis(&self) -> f64;

    /// Persists a surface to `path`. Format is host-defined.
    fn save_surface(&mut self, surface: &Surface, path: &Path) -> Result<(), EaselError>;
}

/// Deterministic host for tests and windowless runs.
///
/// The clock advances only when told to, the timestamp is fixed, and saves
/// and blits are recorded instead of touching the filesystem. A save can be
/// made to fail by path substring, for exercising the export error path.
#[derive(Debug)]
pub struct HeadlessHost {
    window_width: f64,
    window_height: f64,
    clock_ms: f64,
    timestamp: Timestamp,
    saves: Vec<(PathBuf, u32, u32)>,
    blits: Vec<Placement>,
    fail_saves_containing: Option<String>,
}

impl HeadlessHost {
    pub fn new(window_width: f64, window_height: f64) -> Self {
        Self {
            window_width,
            window_height,
            clock_ms: 0.0,
            timestamp: Timestamp {
                year: 2000,
                month: 1,
                day: 1,
                hour: 0,
                minute: 0,
                second: 0,
            },
            saves: Vec::new(),
            blits: Vec::new(),
            fail_saves_containing: None,
        }
    }

    pub fn set_window_size(&mut self, width: f64, height: f64) {
        self.window_width = width;
        self.window_height = height;
    }

    pub fn set_timestamp(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Advances the monotonic clock.
    pub fn advance(&mut self, ms: f64) {
        self.clock_ms += ms;
    }

    /// Every save performed: path plus the saved surface's dimensions.
    pub fn saves(&self) -> &[(PathBuf, u32, u32)] {
        &self.saves
    }

    /// Every placement blitted, in order.
    pub fn blits(&self) -> &[Placement] {
        &self.blits
    }

    /// Makes any save whose path contains `needle` fail with an io error.
    pub fn fail_saves_containing(&mut self, needle: &str) {
        self.fail_saves_containing = Some(needle.to_string());
    }
}

impl Host for HeadlessHost {
    fn blit(&mut self, _src: &Surface, _dst: &mut Surface, placement: Placement) {
        self.blits.push(placement);
    }

    fn window_width(&self) -> f64 {
        self.window_width
    }

    fn window_height(&self) -> f64 {
        self.window_height
    }

    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn millis(&self) -> f64 {
        self.clock_ms
    }

    fn save_surface(&mut self, surface: &Surface, path: &Path) -> Result<(), EaselError> {
        if let Some(needle) = &self.fail_saves_containing {
            if path.to_string_lossy().contains(needle.as_str()) {
                return Err(EaselError::Io(format!(
                    "simulated save failure for {}",
                    path.display()
                )));
            }
        }
        self.saves
            .push((path.to_path_buf(), surface.width(), surface.height()));
        Ok(())
    }
}

//! The single visible display surface.
//!
//! A [`CanvasContext`] owns the visible [`Surface`], the [`ScreenHandler`]
//! that draws onto it, and a presentation fit describing how the surface
//! sits inside the container window. Unlike the offscreen variant, its
//! backing surface really is reallocated on aspect-ratio and resolution
//! updates.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use easel_core::context::{ContextState, RenderMode, MIN_RESOLUTION};
use easel_core::error::EaselError;
use easel_core::host::{Host, Surface};
use easel_core::mapper::RatioMapper;
use easel_core::ratio::{AspectRatio, AspectRatioConfig};

use crate::export::ExportTicket;
use crate::handler::ScreenHandler;
use crate::screen::CanvasScreen;

/// Which container axis constrained the presentation fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitAxis {
    Width,
    Height,
}

/// How the visible surface is presented inside the container window:
/// the constraining axis, the display size, and the centered offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceFit {
    pub constrained: FitAxis,
    pub display_width: f64,
    pub display_height: f64,
    pub offset: DVec2,
}

impl SurfaceFit {
    /// Fits a surface of the given pixel size into a window, preserving the
    /// surface's aspect ratio.
    ///
    /// A surface narrower than the container (smaller width:height) is
    /// constrained by height; otherwise by width. The result is centered.
    pub fn compute(
        surface_width: f64,
        surface_height: f64,
        window_width: f64,
        window_height: f64,
    ) -> Self {
        let surface_ratio = surface_width / surface_height;
        let window_ratio = window_width / window_height;
        let (constrained, display_width, display_height) = if surface_ratio < window_ratio {
            (FitAxis::Height, window_height * surface_ratio, window_height)
        } else {
            (FitAxis::Width, window_width, window_width / surface_ratio)
        };
        Self {
            constrained,
            display_width,
            display_height,
            offset: DVec2::new(
                (window_width - display_width) / 2.0,
                (window_height - display_height) / 2.0,
            ),
        }
    }
}

/// Serde carrier for building a [`CanvasContext`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanvasConfig {
    #[serde(default = "default_canvas_name")]
    pub name: String,
    #[serde(default)]
    pub render_mode: RenderMode,
    #[serde(default)]
    pub aspect_ratio: Option<AspectRatioConfig>,
    #[serde(default = "default_canvas_resolution")]
    pub resolution: f64,
    /// Recompute the aspect ratio from the container window on every resize.
    #[serde(default)]
    pub track_window: bool,
}

fn default_canvas_name() -> String {
    "canvas".to_string()
}

fn default_canvas_resolution() -> f64 {
    MIN_RESOLUTION
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            name: default_canvas_name(),
            render_mode: RenderMode::default(),
            aspect_ratio: None,
            resolution: default_canvas_resolution(),
            track_window: false,
        }
    }
}

impl CanvasConfig {
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_aspect_ratio(mut self, config: AspectRatioConfig) -> Self {
        self.aspect_ratio = Some(config);
        self
    }

    pub fn with_render_mode(mut self, render_mode: RenderMode) -> Self {
        self.render_mode = render_mode;
        self
    }

    pub fn tracking_window(mut self) -> Self {
        self.track_window = true;
        self
    }
}

/// The single visible display surface, created once per program run (or per
/// explicit rebuild while the facade is unlocked).
#[derive(Debug)]
pub struct CanvasContext {
    state: ContextState,
    surface: Surface,
    screens: ScreenHandler,
    track_window: bool,
    fit: SurfaceFit,
}

impl CanvasContext {
    pub fn new(host: &mut dyn Host, config: CanvasConfig) -> Result<Self, EaselError> {
        let aspect_ratio = config
            .aspect_ratio
            .map(AspectRatio::from_config)
            .unwrap_or_default();
        let state = ContextState::new(
            config.name,
            config.render_mode,
            aspect_ratio,
            config.resolution,
        );
        let surface = host.create_surface(state.surface_width(), state.surface_height())?;
        let fit = SurfaceFit::compute(
            surface.width() as f64,
            surface.height() as f64,
            host.window_width(),
            host.window_height(),
        );
        Ok(Self {
            state,
            surface,
            screens: ScreenHandler::new(),
            track_window: config.track_window,
            fit,
        })
    }

    pub fn state(&self) -> &ContextState {
        &self.state
    }

    pub fn name(&self) -> &str {
        self.state.name()
    }

    pub fn render_mode(&self) -> RenderMode {
        self.state.render_mode()
    }

    pub fn aspect_ratio(&self) -> &AspectRatio {
        self.state.aspect_ratio()
    }

    pub fn resolution(&self) -> f64 {
        self.state.resolution()
    }

    pub fn default_stroke_width(&self) -> f64 {
        self.state.default_stroke_width()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn screens(&self) -> &ScreenHandler {
        &self.screens
    }

    pub fn screens_mut(&mut self) -> &mut ScreenHandler {
        &mut self.screens
    }

    /// The current presentation fit inside the container window.
    pub fn fit(&self) -> SurfaceFit {
        self.fit
    }

    pub fn tracks_window(&self) -> bool {
        self.track_window
    }

    /// Ratio mapper over the visible surface (centered-origin in 3d mode).
    pub fn ratio_mapper(&self) -> RatioMapper {
        RatioMapper::new(
            self.surface.width() as f64,
            self.surface.height() as f64,
            matches!(self.state.render_mode(), RenderMode::ThreeD),
        )
    }

    /// The surface center in its own device coordinates: `(w/2, h/2)` for
    /// standard mode, the origin for centered-origin mode.
    pub fn center(&self) -> DVec2 {
        self.ratio_mapper().point_for_ratio(DVec2::new(0.5, 0.5))
    }

    /// Reacts to a container resize.
    ///
    /// When tracking the window, the aspect ratio is recomputed from the
    /// container's current size (named `"window"`) and the backing surface
    /// reallocated; either way the presentation fit is refreshed and the
    /// active screen notified.
    pub fn resize(&mut self, host: &mut dyn Host) -> Result<(), EaselError> {
        if self.track_window {
            let ratio = AspectRatio::from_dimensions(
                host.window_width(),
                host.window_height(),
                Some("window"),
            );
            self.update_aspect_ratio(host, ratio)?;
        } else {
            self.refit(host);
        }
        self.screens
            .resize(host.window_width(), host.window_height());
        Ok(())
    }

    /// Replaces the aspect ratio, reallocates the backing surface to match,
    /// and refreshes the presentation fit.
    pub fn update_aspect_ratio(
        &mut self,
        host: &mut dyn Host,
        aspect_ratio: AspectRatio,
    ) -> Result<(), EaselError> {
        self.state.set_aspect_ratio(aspect_ratio);
        let (width, height) = (self.state.surface_width(), self.state.surface_height());
        host.resize_surface(&mut self.surface, width, height)?;
        self.refit(host);
        Ok(())
    }

    /// Replaces the resolution (clamped), reallocates the backing surface,
    /// and refreshes the presentation fit.
    pub fn update_resolution(
        &mut self,
        host: &mut dyn Host,
        resolution: f64,
    ) -> Result<(), EaselError> {
        self.state.set_resolution(resolution);
        let (width, height) = (self.state.surface_width(), self.state.surface_height());
        host.resize_surface(&mut self.surface, width, height)?;
        self.refit(host);
        Ok(())
    }

    fn refit(&mut self, host: &dyn Host) {
        self.fit = SurfaceFit::compute(
            self.surface.width() as f64,
            self.surface.height() as f64,
            host.window_width(),
            host.window_height(),
        );
    }

    /// One frame of the cooperative loop.
    pub fn draw(&mut self, host: &mut dyn Host) {
        self.screens.draw(&self.state, &mut self.surface, host);
    }

    pub fn add_screen(&mut self, screen: CanvasScreen) -> bool {
        self.screens.add_screen(screen)
    }

    pub fn set_active_screen(&mut self, name: &str) {
        self.screens.set_active_screen(name);
    }

    pub fn key_pressed(&mut self, key: char) {
        self.screens.key_pressed(key);
    }

    pub fn mouse_pressed(&mut self, position: DVec2) {
        self.screens.mouse_pressed(position);
    }

    pub fn mouse_dragged(&mut self, position: DVec2) {
        self.screens.mouse_dragged(position);
    }

    /// Queues an export of the active screen's active surface.
    pub fn save_active_graphics(&mut self, host: &mut dyn Host) -> Option<ExportTicket> {
        self.screens
            .active_screen_mut()
            .map(|screen| screen.save_active_graphics(host))
    }

    /// Queues an export of every surface of the active screen.
    pub fn save_all_graphics(&mut self, host: &mut dyn Host) -> Option<ExportTicket> {
        self.screens
            .active_screen_mut()
            .map(|screen| screen.save_all_graphics(host))
    }
}

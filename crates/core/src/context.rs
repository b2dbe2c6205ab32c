//! Render-context state and the offscreen graphics surface.
//!
//! Every rendering surface carries the same logical state (a name, a render
//! mode, an [`AspectRatio`], and a clamped resolution) composed into a
//! variant with its own backing-surface semantics. [`GraphicsContext`] is
//! the offscreen variant: it allocates its surface once at construction and
//! keeps it for the owning screen's lifetime. The visible variant lives in
//! the screens crate.

use serde::{Deserialize, Serialize};

use crate::error::EaselError;
use crate::host::{Host, Surface};
use crate::mapper::RatioMapper;
use crate::ratio::{AspectRatio, AspectRatioConfig};

/// Smallest allowed context resolution, in resolution units.
pub const MIN_RESOLUTION: f64 = 100.0;

/// Stroke width per resolution unit: a stroke of 1 at a 500-unit reference
/// resolution.
pub const STROKE_WIDTH_FACTOR: f64 = 0.002;

/// How a context renders.
///
/// `ThreeD` surfaces use a centered origin; `Standard` surfaces put the
/// origin in the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    #[default]
    Standard,
    #[serde(rename = "3d")]
    ThreeD,
}

/// Serde carrier for building a [`GraphicsContext`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphicsConfig {
    pub name: String,
    #[serde(default)]
    pub render_mode: RenderMode,
    #[serde(default)]
    pub aspect_ratio: Option<AspectRatioConfig>,
    #[serde(default = "default_resolution")]
    pub resolution: f64,
}

fn default_resolution() -> f64 {
    MIN_RESOLUTION
}

impl GraphicsConfig {
    /// A standard-mode config with a square ratio at the minimum resolution.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            render_mode: RenderMode::default(),
            aspect_ratio: None,
            resolution: MIN_RESOLUTION,
        }
    }

    pub fn with_render_mode(mut self, render_mode: RenderMode) -> Self {
        self.render_mode = render_mode;
        self
    }

    pub fn with_aspect_ratio(mut self, config: AspectRatioConfig) -> Self {
        self.aspect_ratio = Some(config);
        self
    }

    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }
}

/// The logical state shared by every rendering surface.
///
/// Resolution is clamped to [`MIN_RESOLUTION`] at construction and on every
/// update.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextState {
    name: String,
    render_mode: RenderMode,
    aspect_ratio: AspectRatio,
    resolution: f64,
}

impl ContextState {
    pub fn new(
        name: impl Into<String>,
        render_mode: RenderMode,
        aspect_ratio: AspectRatio,
        resolution: f64,
    ) -> Self {
        Self {
            name: name.into(),
            render_mode,
            aspect_ratio,
            resolution: resolution.max(MIN_RESOLUTION),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn aspect_ratio(&self) -> &AspectRatio {
        &self.aspect_ratio
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Stroke width scaled to this context's resolution.
    pub fn default_stroke_width(&self) -> f64 {
        self.resolution * STROKE_WIDTH_FACTOR
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: AspectRatio) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Replaces the resolution, clamping to [`MIN_RESOLUTION`].
    pub fn set_resolution(&mut self, resolution: f64) {
        self.resolution = resolution.max(MIN_RESOLUTION);
    }

    /// Backing-surface width implied by the aspect ratio and resolution.
    pub fn surface_width(&self) -> u32 {
        self.aspect_ratio.width(self.resolution)
    }

    /// Backing-surface height implied by the aspect ratio and resolution.
    pub fn surface_height(&self) -> u32 {
        self.aspect_ratio.height(self.resolution)
    }

    /// Ratio mapper over this context's surface, centered-origin in
    /// [`RenderMode::ThreeD`].
    pub fn ratio_mapper(&self) -> RatioMapper {
        RatioMapper::new(
            self.surface_width() as f64,
            self.surface_height() as f64,
            matches!(self.render_mode, RenderMode::ThreeD),
        )
    }
}

/// An offscreen render surface with its own aspect ratio and resolution,
/// composited onto the visible surface by the screen that owns it.
#[derive(Debug)]
pub struct GraphicsContext {
    state: ContextState,
    surface: Surface,
}

impl GraphicsContext {
    /// Builds the context and allocates its backing surface once.
    ///
    /// Fails with `EaselError::InvalidDimensions` when the ratio/resolution
    /// combination floors a dimension to zero.
    pub fn new(host: &mut dyn Host, config: GraphicsConfig) -> Result<Self, EaselError> {
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
        Ok(Self { state, surface })
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

    pub fn ratio_mapper(&self) -> RatioMapper {
        RatioMapper::new(
            self.surface.width() as f64,
            self.surface.height() as f64,
            matches!(self.state.render_mode(), RenderMode::ThreeD),
        )
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Replaces the logical aspect ratio.
    ///
    /// The backing surface keeps its construction-time size; only the
    /// logical state changes.
    // TODO: route a reallocation through Host::resize_surface once offscreen
    // surfaces are allowed to resize after creation.
    pub fn update_aspect_ratio(&mut self, aspect_ratio: AspectRatio) {
        log::warn!(
            "graphics context '{}': aspect ratio set to {} without reallocating the surface",
            self.state.name(),
            aspect_ratio.name()
        );
        self.state.set_aspect_ratio(aspect_ratio);
    }

    /// Replaces the logical resolution (clamped).
    ///
    /// The backing surface keeps its construction-time size; only the
    /// logical state changes.
    pub fn update_resolution(&mut self, resolution: f64) {
        log::warn!(
            "graphics context '{}': resolution set to {resolution} without reallocating the surface",
            self.state.name()
        );
        self.state.set_resolution(resolution);
    }
}

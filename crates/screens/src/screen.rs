//! Screens: activatable drawing units owning a registry of graphics
//! surfaces.
//!
//! A [`CanvasScreen`] pairs a [`GraphicsContextHandler`] with a [`Sketch`],
//! the per-screen drawing hook a sketch author implements. While active,
//! the screen draws its active surface and composites it centered onto the
//! visible surface, scaled by a two-pass clamp that keeps the box inside the
//! visible surface for any pair of aspect ratios.

use std::fmt;
use std::path::Path;

use glam::DVec2;

use easel_core::context::{ContextState, GraphicsContext};
use easel_core::handler::GraphicsContextHandler;
use easel_core::host::{Host, Placement, Surface};
use easel_core::mapper::ContainerMapper;
use easel_core::ratio::AspectRatio;

use crate::export::{export_filename, ticket_pair, ExportQueue, ExportTicket};

/// Per-screen drawing and input hooks, implemented by sketch authors.
///
/// Object-safe; input hooks default to no-ops. `draw` receives whichever
/// graphics context the frame or export pass targets.
pub trait Sketch: Send {
    /// Draws one frame onto the given graphics context.
    fn draw(&mut self, gfx: &mut GraphicsContext);

    /// Key input forwarded while this screen is active.
    fn key_pressed(&mut self, _key: char) {}

    /// Mouse press forwarded while this screen is active, in container
    /// device coordinates.
    fn mouse_pressed(&mut self, _position: DVec2) {}

    /// Mouse drag forwarded while this screen is active.
    fn mouse_dragged(&mut self, _position: DVec2) {}

    /// Container resize notification while this screen is active.
    fn resized(&mut self, _window_width: f64, _window_height: f64) {}
}

/// Fits an aspect ratio into a bounding box, starting from the given
/// resolution with fit-long-side semantics.
///
/// Two sequential clamp passes: first against `max_width` (recomputing the
/// height from the ratio if the width exceeds it), then against
/// `max_height` likewise. The sequential form is an approximation rather
/// than a joint-constraint solve, but the result never exceeds either bound.
pub fn fit_dimensions(
    ratio: &AspectRatio,
    resolution: f64,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    let mut width = ratio.width(resolution);
    let mut height = ratio.height(resolution);
    if width > max_width {
        width = max_width;
        height = (max_width as f64 * ratio.height_ratio() / ratio.width_ratio()).floor() as u32;
    }
    if height > max_height {
        height = max_height;
        width = (max_height as f64 * ratio.width_ratio() / ratio.height_ratio()).floor() as u32;
    }
    (width, height)
}

/// A named, activatable unit of drawing logic owning one or more graphics
/// surfaces.
///
/// Freshly constructed screens start inactive; `draw` is a no-op until
/// [`CanvasScreen::activate`] runs. Screens are created during program setup
/// and live for the program's duration.
pub struct CanvasScreen {
    name: String,
    graphics: GraphicsContextHandler,
    active: bool,
    exports: ExportQueue,
    sketch: Box<dyn Sketch>,
}

impl fmt::Debug for CanvasScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasScreen")
            .field("name", &self.name)
            .field("active", &self.active)
            .field("graphics", &self.graphics)
            .field("pending_exports", &self.exports.len())
            .finish_non_exhaustive()
    }
}

impl CanvasScreen {
    pub fn new(
        name: impl Into<String>,
        graphics: GraphicsContextHandler,
        sketch: Box<dyn Sketch>,
    ) -> Self {
        Self {
            name: name.into(),
            graphics,
            active: false,
            exports: ExportQueue::new(),
            sketch,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn graphics(&self) -> &GraphicsContextHandler {
        &self.graphics
    }

    pub fn graphics_mut(&mut self) -> &mut GraphicsContextHandler {
        &mut self.graphics
    }

    /// Draws one frame: runs the sketch hook against the active graphics
    /// context, then composites that surface centered onto the visible
    /// surface. No-op while inactive.
    pub fn draw(
        &mut self,
        canvas: &ContextState,
        canvas_surface: &mut Surface,
        host: &mut dyn Host,
    ) {
        if !self.active {
            return;
        }
        self.sketch.draw(self.graphics.active_mut());
        let placement = self.graphics_placement(canvas, canvas_surface);
        host.blit(self.graphics.active().surface(), canvas_surface, placement);
    }

    /// Where the active surface lands on the visible surface: the two-pass
    /// fit box, centered.
    pub fn graphics_placement(&self, canvas: &ContextState, canvas_surface: &Surface) -> Placement {
        let (width, height) = fit_dimensions(
            self.graphics.active().aspect_ratio(),
            canvas.resolution(),
            canvas_surface.width(),
            canvas_surface.height(),
        );
        Placement {
            x: ((canvas_surface.width() - width) / 2) as i32,
            y: ((canvas_surface.height() - height) / 2) as i32,
            width,
            height,
        }
    }

    /// Mapper translating active-surface coordinates into the visible
    /// surface's space, through the placement box the next draw will use.
    pub fn graphics_container_mapper(
        &self,
        canvas: &ContextState,
        canvas_surface: &Surface,
    ) -> ContainerMapper {
        let placement = self.graphics_placement(canvas, canvas_surface);
        let canvas_mapper = canvas.ratio_mapper();
        let min = DVec2::new(
            canvas_mapper.min_x() + placement.x as f64,
            canvas_mapper.min_y() + placement.y as f64,
        );
        let max = min + DVec2::new(placement.width as f64, placement.height as f64);
        ContainerMapper::new(self.graphics.active().ratio_mapper(), canvas_mapper, min, max)
    }

    /// Queues an export of the active surface to the working directory.
    ///
    /// Returns immediately; the export runs as the draw loop pumps it.
    pub fn save_active_graphics(&mut self, host: &mut dyn Host) -> ExportTicket {
        self.save_active_graphics_in(host, Path::new("."))
    }

    /// Queues an export of the active surface into `dir`.
    pub fn save_active_graphics_in(&mut self, host: &mut dyn Host, dir: &Path) -> ExportTicket {
        let timestamp = host.now();
        let surface = self.graphics.active().name().to_string();
        let path = dir.join(export_filename(&timestamp, &self.name, &surface));
        let (reports, ticket) = ticket_pair(1);
        self.exports.enqueue(surface, path, reports);
        ticket
    }

    /// Queues an export of every registered surface, in insertion order, to
    /// the working directory.
    pub fn save_all_graphics(&mut self, host: &mut dyn Host) -> ExportTicket {
        self.save_all_graphics_in(host, Path::new("."))
    }

    /// Queues an export of every registered surface into `dir`.
    ///
    /// One timestamp stamps the whole batch. A failing surface is reported
    /// and the remaining exports still run.
    pub fn save_all_graphics_in(&mut self, host: &mut dyn Host, dir: &Path) -> ExportTicket {
        let timestamp = host.now();
        // snapshot the names so the registry is never iterated mid-mutation
        let names = self.graphics.names();
        let (reports, ticket) = ticket_pair(names.len());
        for surface in names {
            let path = dir.join(export_filename(&timestamp, &self.name, &surface));
            self.exports.enqueue(surface, path, reports.clone());
        }
        ticket
    }

    /// Advances this screen's export queue by one stage. Runs every frame,
    /// active or not.
    pub fn pump_exports(&mut self, host: &mut dyn Host) {
        self.exports
            .pump(host, &mut self.graphics, self.sketch.as_mut());
    }

    pub fn pending_exports(&self) -> usize {
        self.exports.len()
    }

    pub fn key_pressed(&mut self, key: char) {
        if self.active {
            self.sketch.key_pressed(key);
        }
    }

    pub fn mouse_pressed(&mut self, position: DVec2) {
        if self.active {
            self.sketch.mouse_pressed(position);
        }
    }

    pub fn mouse_dragged(&mut self, position: DVec2) {
        if self.active {
            self.sketch.mouse_dragged(position);
        }
    }

    pub fn resized(&mut self, window_width: f64, window_height: f64) {
        if self.active {
            self.sketch.resized(window_width, window_height);
        }
    }
}

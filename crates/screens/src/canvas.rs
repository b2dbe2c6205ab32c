//! Process-wide canvas facade.
//!
//! Host-engine callback hooks (draw, input) are free functions with no
//! natural place to carry instance state, so exactly one facade holds the
//! optional [`CanvasContext`] plus an explicit lock flag. Everything else in
//! the crate is instance-based and testable without this module.
//!
//! Accessors degrade to zero-valued defaults while no canvas has been
//! built; [`build_canvas`] is a no-op while the facade is locked.
//!
//! The facade guards its state with a non-reentrant mutex, so these
//! functions must not be called back into from inside a [`Sketch`] hook;
//! the hook already receives the graphics context it needs.
//!
//! [`Sketch`]: crate::screen::Sketch

use std::sync::{Mutex, MutexGuard, PoisonError};

use glam::DVec2;

use easel_core::error::EaselError;
use easel_core::host::Host;
use easel_core::ratio::AspectRatio;

use crate::display::{CanvasConfig, CanvasContext};
use crate::export::ExportTicket;
use crate::screen::CanvasScreen;

#[derive(Debug)]
struct CanvasFacade {
    context: Option<CanvasContext>,
    locked: bool,
}

impl CanvasFacade {
    const fn new() -> Self {
        Self {
            context: None,
            locked: false,
        }
    }
}

static CANVAS: Mutex<CanvasFacade> = Mutex::new(CanvasFacade::new());

/// All state writes happen on the draw-loop thread; the mutex is for the
/// static's benefit, so a poisoned guard just recovers the inner value.
fn facade() -> MutexGuard<'static, CanvasFacade> {
    CANVAS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Builds (or rebuilds) the canvas context, optionally locking afterwards.
///
/// A locked facade ignores the request and returns `Ok(false)`. Otherwise
/// any previous context is replaced and `Ok(true)` returned.
pub fn build_canvas(
    host: &mut dyn Host,
    config: CanvasConfig,
    lock_after: bool,
) -> Result<bool, EaselError> {
    let mut facade = facade();
    if facade.locked {
        log::warn!("canvas is locked; build request ignored");
        return Ok(false);
    }
    facade.context = Some(CanvasContext::new(host, config)?);
    if lock_after {
        facade.locked = true;
    }
    Ok(true)
}

/// Prevents rebuilds until [`unlock`] runs.
pub fn lock() {
    facade().locked = true;
}

pub fn unlock() {
    facade().locked = false;
}

pub fn is_locked() -> bool {
    facade().locked
}

pub fn is_built() -> bool {
    facade().context.is_some()
}

/// Clears the context and lock flag. Intended for program teardown and for
/// isolating tests of the one global.
pub fn reset() {
    let mut facade = facade();
    facade.context = None;
    facade.locked = false;
}

/// Canvas name, or `""` while unbuilt.
pub fn name() -> String {
    facade()
        .context
        .as_ref()
        .map(|c| c.name().to_string())
        .unwrap_or_default()
}

/// Visible surface width in pixels, or 0 while unbuilt.
pub fn width() -> u32 {
    facade().context.as_ref().map_or(0, |c| c.surface().width())
}

/// Visible surface height in pixels, or 0 while unbuilt.
pub fn height() -> u32 {
    facade()
        .context
        .as_ref()
        .map_or(0, |c| c.surface().height())
}

/// Canvas resolution, or 0 while unbuilt.
pub fn resolution() -> f64 {
    facade().context.as_ref().map_or(0.0, |c| c.resolution())
}

/// Derived stroke width, or 0 while unbuilt.
pub fn default_stroke_width() -> f64 {
    facade()
        .context
        .as_ref()
        .map_or(0.0, |c| c.default_stroke_width())
}

/// Surface center in device coordinates, or the zero vector while unbuilt.
pub fn center() -> DVec2 {
    facade().context.as_ref().map_or(DVec2::ZERO, |c| c.center())
}

/// One frame of the cooperative loop; no-op while unbuilt.
pub fn draw(host: &mut dyn Host) {
    if let Some(context) = facade().context.as_mut() {
        context.draw(host);
    }
}

/// Container resize reaction; no-op while unbuilt.
pub fn resize(host: &mut dyn Host) -> Result<(), EaselError> {
    match facade().context.as_mut() {
        Some(context) => context.resize(host),
        None => Ok(()),
    }
}

/// Replaces the canvas aspect ratio; no-op while unbuilt.
pub fn update_aspect_ratio(host: &mut dyn Host, ratio: AspectRatio) -> Result<(), EaselError> {
    match facade().context.as_mut() {
        Some(context) => context.update_aspect_ratio(host, ratio),
        None => Ok(()),
    }
}

/// Replaces the canvas resolution; no-op while unbuilt.
pub fn update_resolution(host: &mut dyn Host, resolution: f64) -> Result<(), EaselError> {
    match facade().context.as_mut() {
        Some(context) => context.update_resolution(host, resolution),
        None => Ok(()),
    }
}

/// Registers a screen; returns false (logged) while unbuilt or on a
/// duplicate name.
pub fn add_screen(screen: CanvasScreen) -> bool {
    match facade().context.as_mut() {
        Some(context) => context.add_screen(screen),
        None => {
            log::warn!("no canvas built; screen '{}' dropped", screen.name());
            false
        }
    }
}

/// Switches the active screen; unknown names leave the active screen
/// unchanged.
pub fn set_active_screen(screen_name: &str) {
    if let Some(context) = facade().context.as_mut() {
        context.set_active_screen(screen_name);
    }
}

pub fn key_pressed(key: char) {
    if let Some(context) = facade().context.as_mut() {
        context.key_pressed(key);
    }
}

pub fn mouse_pressed(position: DVec2) {
    if let Some(context) = facade().context.as_mut() {
        context.mouse_pressed(position);
    }
}

pub fn mouse_dragged(position: DVec2) {
    if let Some(context) = facade().context.as_mut() {
        context.mouse_dragged(position);
    }
}

/// Queues an export of the active screen's active surface.
pub fn save_active_graphics(host: &mut dyn Host) -> Option<ExportTicket> {
    facade()
        .context
        .as_mut()
        .and_then(|c| c.save_active_graphics(host))
}

/// Queues an export of every surface of the active screen.
pub fn save_all_graphics(host: &mut dyn Host) -> Option<ExportTicket> {
    facade()
        .context
        .as_mut()
        .and_then(|c| c.save_all_graphics(host))
}

/// Runs a closure against the built context, if any.
///
/// Escape hatch for callers that need more than the forwarding functions,
/// without handing out the guard itself.
pub fn with_context<R>(f: impl FnOnce(&mut CanvasContext) -> R) -> Option<R> {
    facade().context.as_mut().map(f)
}

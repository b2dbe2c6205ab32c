#![deny(unsafe_code)]
//! Screen lifecycle, the visible display surface, and the export pipeline
//! for the easel surface-composition system.
//!
//! This crate sits between `easel-core` (value types, mappers, the `Host`
//! abstraction) and drivers: it owns the [`CanvasScreen`] lifecycle, the
//! [`ScreenHandler`] registry, the visible [`CanvasContext`], the serialized
//! deferred export pipeline, and the process-wide [`canvas`] facade.

pub mod canvas;
pub mod display;
pub mod export;
pub mod handler;
pub mod screen;

#[cfg(feature = "png")]
pub mod system;

pub use display::{CanvasConfig, CanvasContext, FitAxis, SurfaceFit};
pub use export::{export_filename, ExportReport, ExportTicket, EXPORT_DELAY_MS};
pub use handler::ScreenHandler;
pub use screen::{fit_dimensions, CanvasScreen, Sketch};

#[cfg(feature = "png")]
pub use system::SystemHost;

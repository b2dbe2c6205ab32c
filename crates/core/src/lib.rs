#![deny(unsafe_code)]
//! Core types for the easel surface-composition system.
//!
//! Provides the [`AspectRatio`] value type and its presets, the ratio/device
//! coordinate mappers, render-context state with the offscreen
//! [`GraphicsContext`], the named [`GraphicsContextHandler`] registry, and
//! the [`Host`] abstraction every surface operation goes through.

pub mod context;
pub mod error;
pub mod handler;
pub mod host;
pub mod mapper;
pub mod ratio;

pub use context::{
    ContextState, GraphicsConfig, GraphicsContext, RenderMode, MIN_RESOLUTION,
    STROKE_WIDTH_FACTOR,
};
pub use error::EaselError;
pub use handler::GraphicsContextHandler;
pub use host::{HeadlessHost, Host, Placement, Surface, Timestamp};
pub use mapper::{map_range, ContainerMapper, RatioMapper};
pub use ratio::{AspectRatio, AspectRatioConfig, Edge};

//! Core building blocks for the Lumen chart engine.
//!
//! - [`geometry`]: pixel-space [`Rect`] and [`Margin`]
//! - [`shape`]: drawable primitives
//! - [`surface`] and [`host`]: the boundary a host UI framework implements
//! - [`logging`] and [`profiling`]: diagnostics

pub mod geometry;
pub mod host;
pub mod logging;
pub mod profiling;
pub mod shape;
pub mod surface;

pub use geometry::{Margin, Rect};
pub use glam::Vec2;
pub use host::{FrameClock, RepaintHost};
pub use shape::Shape;
pub use surface::{DrawLayer, DrawingSurface, SurfaceError};

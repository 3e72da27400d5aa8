//! Abstract drawing surface consumed by the chart engine.
//!
//! Hosts implement [`DrawingSurface`] on top of whatever backend actually
//! paints pixels.

use std::fmt;

use crate::shape::Shape;
use glam::Vec2;

/// What a primitive belongs to, so backends can pick paints per layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawLayer {
    /// Geometry of the series at this index.
    Series(usize),
    /// Axis line. `vertical` is true for Y (or radius) axes.
    Axis { vertical: bool, index: usize },
    /// Free visual element at this index.
    VisualElement(usize),
}

/// Errors a surface may report while painting a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// The native surface went away (minimized window, lost context).
    Lost,
    /// The backend rejected a drawing command.
    Backend {
        /// Description of the failure.
        message: String,
    },
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::Lost => write!(f, "Drawing surface lost"),
            SurfaceError::Backend { message } => write!(f, "Drawing backend error: {}", message),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Target of one painted frame.
pub trait DrawingSurface {
    /// Start a frame covering a control of the given size.
    fn begin_frame(&mut self, size: Vec2) -> Result<(), SurfaceError>;

    /// Paint a filled primitive.
    fn draw_shape(&mut self, layer: DrawLayer, shape: &Shape) -> Result<(), SurfaceError>;

    /// Paint a polyline. Closed paths are filled.
    fn draw_path(
        &mut self,
        layer: DrawLayer,
        points: &[Vec2],
        closed: bool,
    ) -> Result<(), SurfaceError>;

    /// Present the frame.
    fn end_frame(&mut self) -> Result<(), SurfaceError>;
}

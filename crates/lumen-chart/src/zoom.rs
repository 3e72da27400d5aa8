//! Zoom and pan arithmetic on axis bounds.

use crate::axis::Bounds;

bitflags::bitflags! {
    /// Axes affected by zooming and panning. Empty disables both.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ZoomAndPanMode: u8 {
        const X = 0b01;
        const Y = 0b10;
        const BOTH = Self::X.bits() | Self::Y.bits();
    }
}

/// Requested zoom step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomDirection {
    ZoomIn,
    ZoomOut,
    /// Pinch gesture; values above one zoom in.
    ScaleFactor(f64),
}

impl ZoomDirection {
    /// Multiplier applied to the visible span, or `None` for an unusable
    /// scale factor.
    pub fn span_factor(&self, speed: f64) -> Option<f64> {
        match *self {
            ZoomDirection::ZoomIn => Some(1.0 - speed),
            ZoomDirection::ZoomOut => Some(1.0 / (1.0 - speed)),
            ZoomDirection::ScaleFactor(scale) if scale.is_finite() && scale > 0.0 => {
                Some(1.0 / scale)
            }
            ZoomDirection::ScaleFactor(_) => None,
        }
    }
}

/// Scale `bounds` by `factor` while keeping `pivot` fixed.
pub fn zoom_bounds(bounds: Bounds, pivot: f64, factor: f64) -> Bounds {
    Bounds::new(
        pivot - (pivot - bounds.min) * factor,
        pivot + (bounds.max - pivot) * factor,
    )
}

/// Shift `bounds` by `delta` data units.
pub fn pan_bounds(bounds: Bounds, delta: f64) -> Bounds {
    Bounds::new(bounds.min + delta, bounds.max + delta)
}

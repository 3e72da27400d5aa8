//! Cartesian data/pixel mapping.

use glam::Vec2;

use crate::axis::{AxisOrientation, Bounds};
use crate::value::Coordinate;

/// Two-way mapping between chart space and pixel space.
pub trait Scalable {
    fn to_pixels(&self, coordinate: Coordinate) -> Vec2;
    fn to_chart_values(&self, point: Vec2) -> Coordinate;
}

/// Affine mapping between one axis' values and one pixel range.
///
/// Built once per measure pass. Vertical axes put their minimum at the bottom
/// edge; an inverted axis flips that direction again.
///
/// A degenerate range (`min == max`, or non-finite bounds) is widened to
/// **one pixel per unit, centered on the value**: the single value lands in
/// the middle of the pixel range. A zero-length pixel range maps every value
/// onto its origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaler {
    orientation: AxisOrientation,
    bounds: Bounds,
    min_px: f64,
    m: f64,
    m_inv: f64,
}

impl Scaler {
    pub fn new(
        location: Vec2,
        size: Vec2,
        orientation: AxisOrientation,
        bounds: Bounds,
        inverted: bool,
    ) -> Self {
        let (start, length) = match orientation {
            AxisOrientation::X => (location.x as f64, size.x as f64),
            AxisOrientation::Y => (location.y as f64, size.y as f64),
        };
        let length = length.max(0.0);
        let bounds = bounds.or_centered(if length > 0.0 { length } else { 1.0 });

        // Screen Y grows downward, so vertical axes start at the bottom.
        let flipped = (orientation == AxisOrientation::Y) != inverted;
        let (min_px, max_px) = if flipped {
            (start + length, start)
        } else {
            (start, start + length)
        };

        let m = (max_px - min_px) / bounds.span();
        let m_inv = if m == 0.0 { 0.0 } else { 1.0 / m };

        Self {
            orientation,
            bounds,
            min_px,
            m,
            m_inv,
        }
    }

    /// Pixel position of a data value.
    #[inline]
    pub fn to_pixels(&self, value: f64) -> f32 {
        (self.min_px + (value - self.bounds.min) * self.m) as f32
    }

    /// Data value at a pixel position.
    #[inline]
    pub fn to_chart_values(&self, pixel: f32) -> f64 {
        self.bounds.min + (pixel as f64 - self.min_px) * self.m_inv
    }

    /// Pixel length of a data span, regardless of direction.
    pub fn measure_in_pixels(&self, units: f64) -> f32 {
        (units * self.m).abs() as f32
    }

    /// Bounds the mapping was built with, after the degenerate fallback.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn orientation(&self) -> AxisOrientation {
        self.orientation
    }
}

/// X/Y scaler pair of a cartesian chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartesianScalers {
    pub x: Scaler,
    pub y: Scaler,
}

impl Scalable for CartesianScalers {
    fn to_pixels(&self, coordinate: Coordinate) -> Vec2 {
        Vec2::new(
            self.x.to_pixels(coordinate.secondary),
            self.y.to_pixels(coordinate.primary),
        )
    }

    fn to_chart_values(&self, point: Vec2) -> Coordinate {
        Coordinate::new(self.x.to_chart_values(point.x), self.y.to_chart_values(point.y))
    }
}

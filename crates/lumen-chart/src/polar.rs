//! Polar data/pixel mapping.

use glam::{DVec2, Vec2};
use lumen_core::Rect;

use crate::axis::Bounds;
use crate::error::{ChartError, Result};
use crate::scaler::Scalable;
use crate::value::Coordinate;

/// Angles closer than this to the end of the sweep wrap to zero. Wider than
/// the angular error of an `f32` pixel at large radii.
const ANGLE_SNAP_DEG: f64 = 1e-3;

/// A point in polar chart space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarCoordinate {
    pub angle: f64,
    pub radius: f64,
}

impl PolarCoordinate {
    pub fn new(angle: f64, radius: f64) -> Self {
        Self { angle, radius }
    }
}

/// Mapping between (angle, radius) values and pixels.
///
/// The angle axis maps linearly onto `[0, total_angle]` degrees, offset by
/// `initial_rotation`; angles grow clockwise on screen. The radius axis maps
/// onto `[inner_radius, outer_radius]`, where the outer radius is half the
/// smaller side of the draw margin. Pixel radii outside that ring are clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarScaler {
    center: DVec2,
    inner_radius: f64,
    outer_radius: f64,
    initial_rotation: f64,
    total_angle: f64,
    angle: Bounds,
    radius: Bounds,
}

impl PolarScaler {
    /// Fails on a sweep outside `(0, 360]` or a negative inner radius.
    pub fn new(
        draw_margin: Rect,
        angle: Bounds,
        radius: Bounds,
        inner_radius: f64,
        initial_rotation: f64,
        total_angle: f64,
    ) -> Result<Self> {
        if !(total_angle > 0.0 && total_angle <= 360.0) {
            return Err(ChartError::InvalidConfig {
                field: "total_angle",
                reason: format!("{} is outside (0, 360]", total_angle),
            });
        }
        if !(inner_radius.is_finite() && inner_radius >= 0.0) {
            return Err(ChartError::InvalidConfig {
                field: "inner_radius",
                reason: format!("{} is not a non-negative radius", inner_radius),
            });
        }
        if !initial_rotation.is_finite() {
            return Err(ChartError::InvalidConfig {
                field: "initial_rotation",
                reason: "rotation must be finite".to_string(),
            });
        }

        let center = draw_margin.center().as_dvec2();
        let outer_radius = (draw_margin.width.min(draw_margin.height) as f64 * 0.5).max(0.0);
        let inner_radius = inner_radius.min(outer_radius);
        let scalable = outer_radius - inner_radius;

        Ok(Self {
            center,
            inner_radius,
            outer_radius,
            initial_rotation,
            total_angle,
            angle: angle.or_centered(total_angle),
            radius: radius.or_centered(if scalable > 0.0 { scalable } else { 1.0 }),
        })
    }

    pub fn center(&self) -> Vec2 {
        self.center.as_vec2()
    }

    pub fn inner_radius(&self) -> f32 {
        self.inner_radius as f32
    }

    pub fn outer_radius(&self) -> f32 {
        self.outer_radius as f32
    }

    pub fn total_angle(&self) -> f64 {
        self.total_angle
    }

    /// Screen angle in degrees (rotation included) of an angle value.
    pub fn angle_to_degrees(&self, angle: f64) -> f64 {
        self.total_angle * (angle - self.angle.min) / self.angle.span() + self.initial_rotation
    }

    /// Pixel distance from the center of a radius value.
    pub fn radius_to_pixels(&self, radius: f64) -> f64 {
        let scalable = self.outer_radius - self.inner_radius;
        let r = self.inner_radius + (radius - self.radius.min) / self.radius.span() * scalable;
        r.clamp(self.inner_radius, self.outer_radius)
    }

    pub fn to_pixels(&self, angle: f64, radius: f64) -> Vec2 {
        let r = self.radius_to_pixels(radius);
        let a = self.angle_to_degrees(angle).to_radians();
        (self.center + DVec2::new(a.cos(), a.sin()) * r).as_vec2()
    }

    pub fn to_chart_values(&self, point: Vec2) -> PolarCoordinate {
        let offset = point.as_dvec2() - self.center;

        let turn = snap_to_start(
            (offset.y.atan2(offset.x).to_degrees() - self.initial_rotation).rem_euclid(360.0),
            360.0,
        );
        let sweep = snap_to_start(turn.rem_euclid(self.total_angle), self.total_angle);
        let angle = self.angle.min + sweep / self.total_angle * self.angle.span();

        let scalable = self.outer_radius - self.inner_radius;
        let r = offset.length().clamp(self.inner_radius, self.outer_radius);
        let radius = if scalable > 0.0 {
            self.radius.min + (r - self.inner_radius) / scalable * self.radius.span()
        } else {
            self.radius.min
        };

        PolarCoordinate::new(angle, radius)
    }
}

// Rounding can leave an angle a hair below the end of its range.
fn snap_to_start(angle: f64, end: f64) -> f64 {
    if end - angle < ANGLE_SNAP_DEG {
        0.0
    } else {
        angle
    }
}

impl Scalable for PolarScaler {
    fn to_pixels(&self, coordinate: Coordinate) -> Vec2 {
        PolarScaler::to_pixels(self, coordinate.secondary, coordinate.primary)
    }

    fn to_chart_values(&self, point: Vec2) -> Coordinate {
        let polar = PolarScaler::to_chart_values(self, point);
        Coordinate::new(polar.angle, polar.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaler(total_angle: f64, rotation: f64) -> PolarScaler {
        PolarScaler::new(
            Rect::new(10.0, 10.0, 400.0, 300.0),
            Bounds::new(0.0, 100.0),
            Bounds::new(0.0, 50.0),
            20.0,
            rotation,
            total_angle,
        )
        .unwrap()
    }

    fn assert_close(actual: PolarCoordinate, angle: f64, radius: f64) {
        assert!(
            (actual.angle - angle).abs() < 1e-3 && (actual.radius - radius).abs() < 1e-3,
            "expected ({}, {}), got {:?}",
            angle,
            radius,
            actual
        );
    }

    #[test]
    fn test_round_trip_full_sweep() {
        for rotation in [0.0, -90.0, 45.0, 270.0] {
            let scaler = scaler(360.0, rotation);
            for angle in [0.0, 0.01, 12.5, 25.0, 50.0, 75.0, 99.99] {
                for radius in [0.0, 1.0, 25.0, 50.0] {
                    let back = scaler.to_chart_values(scaler.to_pixels(angle, radius));
                    assert_close(back, angle, radius);
                }
            }
        }
    }

    #[test]
    fn test_round_trip_partial_sweep() {
        let scaler = scaler(270.0, -135.0);
        for angle in [0.0, 33.3, 66.6, 99.0] {
            let back = scaler.to_chart_values(scaler.to_pixels(angle, 40.0));
            assert_close(back, angle, 40.0);
        }
    }

    #[test]
    fn test_sweep_end_wraps_to_start() {
        let scaler = scaler(360.0, 0.0);
        // 100 is a full turn, the same pixel as 0.
        let full_turn = scaler.to_chart_values(scaler.to_pixels(100.0, 10.0));
        assert_close(full_turn, 0.0, 10.0);
    }

    #[test]
    fn test_snap_window_below_sweep_end() {
        assert_eq!(snap_to_start(359.9995, 360.0), 0.0);
        assert_eq!(snap_to_start(359.99, 360.0), 359.99);
        assert_eq!(snap_to_start(179.9995, 180.0), 0.0);
        assert_eq!(snap_to_start(0.0, 360.0), 0.0);
    }

    #[test]
    fn test_radius_maps_onto_ring_and_clamps() {
        let scaler = scaler(360.0, 0.0);
        let center = scaler.center();
        // 300x300 is the smaller side, so the outer radius is 150.
        assert_eq!(scaler.outer_radius(), 150.0);
        assert!(((scaler.to_pixels(0.0, 0.0) - center).length() - 20.0).abs() < 1e-3);
        assert!(((scaler.to_pixels(0.0, 50.0) - center).length() - 150.0).abs() < 1e-3);
        assert_eq!(scaler.to_pixels(0.0, 80.0), scaler.to_pixels(0.0, 50.0));

        let inside_hole = scaler.to_chart_values(center + Vec2::new(1.0, 0.0));
        assert_eq!(inside_hole.radius, 0.0);
        let outside = scaler.to_chart_values(center + Vec2::new(500.0, 0.0));
        assert!((outside.radius - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_angles_grow_clockwise() {
        let scaler = scaler(360.0, 0.0);
        let center = scaler.center();
        // A quarter turn points straight down on screen.
        let quarter = scaler.to_pixels(25.0, 50.0) - center;
        assert!(quarter.x.abs() < 1e-3);
        assert!((quarter.y - 150.0).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_sweep_fails_fast() {
        let margin = Rect::new(0.0, 0.0, 100.0, 100.0);
        let bounds = Bounds::new(0.0, 1.0);
        for total in [0.0, -10.0, 361.0, f64::NAN] {
            assert!(matches!(
                PolarScaler::new(margin, bounds, bounds, 0.0, 0.0, total),
                Err(ChartError::InvalidConfig {
                    field: "total_angle",
                    ..
                })
            ));
        }
        assert!(PolarScaler::new(margin, bounds, bounds, -1.0, 0.0, 360.0).is_err());
    }

    #[test]
    fn test_degenerate_bounds_stay_finite() {
        let scaler = PolarScaler::new(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Bounds::point(3.0),
            Bounds::point(7.0),
            0.0,
            0.0,
            360.0,
        )
        .unwrap();
        let point = scaler.to_pixels(3.0, 7.0);
        assert!(point.x.is_finite() && point.y.is_finite());
    }
}

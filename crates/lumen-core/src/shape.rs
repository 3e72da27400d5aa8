//! Drawable primitives produced by the chart engine.
//!
//! Angles are in degrees, measured clockwise from the positive X axis because
//! screen Y grows downward.

use crate::geometry::Rect;
use glam::Vec2;

/// A single drawable primitive in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Point marker.
    Circle { center: Vec2, radius: f32 },
    /// Bar or free rectangle.
    Rect(Rect),
    /// Annular sector used by pie charts.
    Slice {
        center: Vec2,
        inner_radius: f32,
        outer_radius: f32,
        start_angle: f32,
        sweep_angle: f32,
    },
}

impl Shape {
    /// Interpolate towards `to`. Shapes of different kinds cannot blend, so
    /// the target is returned as is.
    pub fn lerp(&self, to: &Shape, t: f32) -> Shape {
        match (self, to) {
            (
                Shape::Circle { center, radius },
                Shape::Circle {
                    center: c2,
                    radius: r2,
                },
            ) => Shape::Circle {
                center: center.lerp(*c2, t),
                radius: radius + (r2 - radius) * t,
            },
            (Shape::Rect(a), Shape::Rect(b)) => Shape::Rect(a.lerp(b, t)),
            (
                Shape::Slice {
                    center,
                    inner_radius,
                    outer_radius,
                    start_angle,
                    sweep_angle,
                },
                Shape::Slice {
                    center: c2,
                    inner_radius: i2,
                    outer_radius: o2,
                    start_angle: s2,
                    sweep_angle: w2,
                },
            ) => Shape::Slice {
                center: center.lerp(*c2, t),
                inner_radius: lerp(*inner_radius, *i2, t),
                outer_radius: lerp(*outer_radius, *o2, t),
                start_angle: lerp(*start_angle, *s2, t),
                sweep_angle: lerp(*sweep_angle, *w2, t),
            },
            _ => *to,
        }
    }

    /// Zero-area version of this shape, used as the starting point of an
    /// enter animation.
    pub fn collapsed(&self) -> Shape {
        match *self {
            Shape::Circle { center, .. } => Shape::Circle {
                center,
                radius: 0.0,
            },
            Shape::Rect(rect) => Shape::Rect(Rect::from_pos_size(rect.center(), Vec2::ZERO)),
            Shape::Slice {
                center,
                inner_radius,
                outer_radius,
                start_angle,
                ..
            } => Shape::Slice {
                center,
                inner_radius,
                outer_radius,
                start_angle,
                sweep_angle: 0.0,
            },
        }
    }

    /// Representative point used for distance metrics.
    pub fn anchor(&self) -> Vec2 {
        match *self {
            Shape::Circle { center, .. } => center,
            Shape::Rect(rect) => rect.center(),
            Shape::Slice {
                center,
                inner_radius,
                outer_radius,
                start_angle,
                sweep_angle,
            } => {
                let angle = (start_angle + sweep_angle * 0.5).to_radians();
                let radius = (inner_radius + outer_radius) * 0.5;
                center + Vec2::new(angle.cos(), angle.sin()) * radius
            }
        }
    }

    /// Whether the point lies on or inside the shape.
    pub fn contains(&self, point: Vec2) -> bool {
        match *self {
            Shape::Circle { center, radius } => center.distance(point) <= radius,
            Shape::Rect(rect) => rect.contains(point),
            Shape::Slice {
                center,
                inner_radius,
                outer_radius,
                start_angle,
                sweep_angle,
            } => {
                let offset = point - center;
                let distance = offset.length();
                if distance < inner_radius || distance > outer_radius {
                    return false;
                }
                let angle = offset.y.atan2(offset.x).to_degrees();
                (angle - start_angle).rem_euclid(360.0) <= sweep_angle
            }
        }
    }

    /// Axis-aligned bounds of the shape.
    pub fn bounds(&self) -> Rect {
        match *self {
            Shape::Circle { center, radius } => {
                Rect::from_corners(center - Vec2::splat(radius), center + Vec2::splat(radius))
            }
            Shape::Rect(rect) => rect,
            Shape::Slice {
                center,
                outer_radius,
                ..
            } => Rect::from_corners(
                center - Vec2::splat(outer_radius),
                center + Vec2::splat(outer_radius),
            ),
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

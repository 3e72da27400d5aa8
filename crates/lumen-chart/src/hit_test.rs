//! Resolving a pixel position to chart points.
//!
//! Every series is scanned linearly and keeps its single best candidate;
//! candidates are then ordered by distance. Both steps prefer the earlier
//! entry on ties, so among equidistant points the one from the series
//! registered first wins.

use glam::Vec2;
use lumen_core::Shape;

use crate::series::SeriesKind;
use crate::value::{ChartPoint, Coordinate};

/// Metric used to find points near the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FindingStrategy {
    /// Pick per series from its geometry; see [`SeriesKind::finding_strategy`].
    #[default]
    Automatic,
    /// Distance along the series' category axis only.
    NearestPrimary,
    /// Euclidean distance to the point's anchor.
    NearestBoth,
    /// Only points whose geometry contains the pointer.
    ExactMatch,
}

/// Why the query is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindPointFor {
    /// Tooltip-style query: one result per series.
    HoverEvent,
    /// Click: only the closest result.
    PointerDownEvent,
}

/// Geometry that the pointer can hit.
pub trait HitTestable {
    /// Point distances are measured to.
    fn anchor(&self) -> Vec2;

    fn contains_point(&self, point: Vec2) -> bool;
}

impl HitTestable for Shape {
    fn anchor(&self) -> Vec2 {
        Shape::anchor(self)
    }

    fn contains_point(&self, point: Vec2) -> bool {
        self.contains(point)
    }
}

/// A chart point found near the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct HitResult {
    pub series_index: usize,
    pub point_index: usize,
    pub coordinate: Coordinate,
    /// Distance under the metric that selected the point.
    pub distance: f32,
    pub geometry: Shape,
}

impl HitResult {
    /// Identity of the point, stable across measure passes.
    pub fn key(&self) -> (usize, usize) {
        (self.series_index, self.point_index)
    }
}

/// Points of one series, as seen by the hit tester.
#[derive(Debug, Clone, Copy)]
pub struct SeriesHitSource<'a> {
    pub series_index: usize,
    pub kind: SeriesKind,
    pub points: &'a [ChartPoint],
}

/// Distance from `pointer` to `geometry`, or `None` when the strategy
/// excludes it.
pub fn distance(
    strategy: FindingStrategy,
    kind: SeriesKind,
    geometry: &impl HitTestable,
    pointer: Vec2,
) -> Option<f32> {
    let anchor = geometry.anchor();
    match strategy {
        FindingStrategy::Automatic => distance(kind.finding_strategy(), kind, geometry, pointer),
        FindingStrategy::NearestPrimary => {
            if kind.is_horizontal() {
                Some((pointer.y - anchor.y).abs())
            } else {
                Some((pointer.x - anchor.x).abs())
            }
        }
        FindingStrategy::NearestBoth => Some(pointer.distance(anchor)),
        FindingStrategy::ExactMatch => geometry
            .contains_point(pointer)
            .then(|| pointer.distance(anchor)),
    }
}

/// Find the points closest to `pointer`, at most one per series.
pub fn find_points<'a>(
    sources: impl IntoIterator<Item = SeriesHitSource<'a>>,
    pointer: Vec2,
    strategy: FindingStrategy,
    purpose: FindPointFor,
) -> Vec<HitResult> {
    let mut results: Vec<HitResult> = Vec::new();

    for source in sources {
        let mut best: Option<(f32, &ChartPoint)> = None;
        for point in source.points {
            let Some(d) = distance(strategy, source.kind, &point.geometry, pointer) else {
                continue;
            };
            if !d.is_finite() {
                continue;
            }
            if best.is_none_or(|(best_distance, _)| d < best_distance) {
                best = Some((d, point));
            }
        }

        if let Some((distance, point)) = best {
            results.push(HitResult {
                series_index: source.series_index,
                point_index: point.index,
                coordinate: point.coordinate,
                distance,
                geometry: point.geometry,
            });
        }
    }

    // Stable: equal distances keep series order.
    results.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    if purpose == FindPointFor::PointerDownEvent {
        results.truncate(1);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Transition;
    use lumen_core::Rect;

    fn point(series_index: usize, index: usize, geometry: Shape) -> ChartPoint {
        ChartPoint {
            series_index,
            index,
            coordinate: Coordinate::new(index as f64, 0.0),
            stacked: None,
            geometry,
            transition: Transition::settled(geometry),
        }
    }

    fn marker(x: f32, y: f32) -> Shape {
        Shape::Circle {
            center: Vec2::new(x, y),
            radius: 4.0,
        }
    }

    #[test]
    fn test_nearest_primary_ignores_other_axis() {
        let points = [point(0, 0, marker(10.0, 0.0)), point(0, 1, marker(30.0, 500.0))];
        let found = find_points(
            [SeriesHitSource {
                series_index: 0,
                kind: SeriesKind::Line,
                points: &points,
            }],
            Vec2::new(28.0, 0.0),
            FindingStrategy::NearestPrimary,
            FindPointFor::HoverEvent,
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].point_index, 1);
        assert_eq!(found[0].distance, 2.0);
    }

    #[test]
    fn test_rows_compare_along_y() {
        let points = [
            point(0, 0, Shape::Rect(Rect::new(0.0, 0.0, 80.0, 10.0))),
            point(0, 1, Shape::Rect(Rect::new(0.0, 40.0, 20.0, 10.0))),
        ];
        let found = find_points(
            [SeriesHitSource {
                series_index: 0,
                kind: SeriesKind::Row,
                points: &points,
            }],
            Vec2::new(70.0, 42.0),
            FindingStrategy::Automatic,
            FindPointFor::HoverEvent,
        );
        assert_eq!(found[0].point_index, 1);
    }

    #[test]
    fn test_exact_match_requires_containment() {
        let points = [point(0, 0, marker(10.0, 10.0))];
        let source = SeriesHitSource {
            series_index: 0,
            kind: SeriesKind::Scatter,
            points: &points,
        };
        let miss = find_points(
            [source],
            Vec2::new(20.0, 10.0),
            FindingStrategy::ExactMatch,
            FindPointFor::HoverEvent,
        );
        assert!(miss.is_empty());
        let hit = find_points(
            [source],
            Vec2::new(12.0, 10.0),
            FindingStrategy::ExactMatch,
            FindPointFor::HoverEvent,
        );
        assert_eq!(hit.len(), 1);
    }

    #[test]
    fn test_earlier_series_wins_ties() {
        let first = [point(0, 0, marker(50.0, 50.0))];
        let second = [point(1, 0, marker(50.0, 50.0))];
        let sources = [
            SeriesHitSource {
                series_index: 0,
                kind: SeriesKind::Scatter,
                points: &first,
            },
            SeriesHitSource {
                series_index: 1,
                kind: SeriesKind::Scatter,
                points: &second,
            },
        ];

        let hover = find_points(
            sources,
            Vec2::new(51.0, 50.0),
            FindingStrategy::NearestBoth,
            FindPointFor::HoverEvent,
        );
        assert_eq!(
            hover.iter().map(|r| r.series_index).collect::<Vec<_>>(),
            vec![0, 1]
        );

        let click = find_points(
            sources,
            Vec2::new(51.0, 50.0),
            FindingStrategy::NearestBoth,
            FindPointFor::PointerDownEvent,
        );
        assert_eq!(click.len(), 1);
        assert_eq!(click[0].series_index, 0);
    }

    #[test]
    fn test_earlier_point_wins_inside_series() {
        let points = [point(0, 0, marker(40.0, 0.0)), point(0, 1, marker(60.0, 0.0))];
        let found = find_points(
            [SeriesHitSource {
                series_index: 0,
                kind: SeriesKind::Line,
                points: &points,
            }],
            Vec2::new(50.0, 0.0),
            FindingStrategy::NearestPrimary,
            FindPointFor::HoverEvent,
        );
        assert_eq!(found[0].point_index, 0);
    }
}

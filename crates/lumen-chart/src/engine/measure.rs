//! Output of a measure pass, shared by the per-kind measurers.

use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;
use lumen_core::{Rect, Shape};

use crate::animation::Transition;
use crate::axis::Bounds;
use crate::cache::TransitionCache;
use crate::config::ChartConfig;
use crate::hit_test::SeriesHitSource;
use crate::scaler::Scaler;
use crate::series::{Series, SeriesKind};
use crate::value::{ChartPoint, Coordinate, StackedValue};

/// Scales resolved by the last measure.
#[derive(Debug, Clone)]
pub(crate) enum MeasuredSpace {
    Cartesian { x: Vec<Scaler>, y: Vec<Scaler> },
    Polar { angle: Vec<Bounds>, radius: Vec<Bounds> },
    Pie,
}

/// How the points of a series are joined when painted.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SeriesPath {
    None,
    Line { closed: bool },
    /// Open polyline that holds each value until the next anchor's X.
    Step,
    /// Filled band between the point anchors and these baseline pixels.
    Area { baseline: Vec<Vec2> },
    /// `Area` with both edges drawn as steps.
    StepArea { baseline: Vec<Vec2> },
}

impl SeriesPath {
    /// Outline to paint through `anchors` and whether it is closed, or
    /// `None` when there is nothing to join.
    pub fn outline(&self, anchors: &[Vec2]) -> Option<(Vec<Vec2>, bool)> {
        let (outline, closed) = match self {
            SeriesPath::None => return None,
            SeriesPath::Line { closed } => (anchors.to_vec(), *closed),
            SeriesPath::Step => (steps(anchors), false),
            SeriesPath::Area { baseline } => {
                let mut outline = anchors.to_vec();
                outline.extend(baseline.iter().rev());
                (outline, true)
            }
            SeriesPath::StepArea { baseline } => {
                let mut outline = steps(anchors);
                outline.extend(steps(baseline).into_iter().rev());
                (outline, true)
            }
        };
        let required = if closed { 3 } else { 2 };
        (outline.len() >= required).then_some((outline, closed))
    }
}

/// Insert a corner before every anchor after the first, at the anchor's X
/// and the previous anchor's Y.
fn steps(anchors: &[Vec2]) -> Vec<Vec2> {
    let mut points = Vec::with_capacity(anchors.len() * 2);
    for (i, &anchor) in anchors.iter().enumerate() {
        if i > 0 {
            points.push(Vec2::new(anchor.x, anchors[i - 1].y));
        }
        points.push(anchor);
    }
    points
}

#[derive(Debug, Clone)]
pub(crate) struct SeriesGeometry {
    /// Identity of the series object, stable across index shifts.
    pub series_key: usize,
    pub series_index: usize,
    pub kind: SeriesKind,
    pub points: Vec<ChartPoint>,
    pub path: SeriesPath,
}

impl SeriesGeometry {
    pub fn hit_source(&self) -> SeriesHitSource<'_> {
        SeriesHitSource {
            series_index: self.series_index,
            kind: self.kind,
            points: &self.points,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Measured {
    pub draw_margin: Rect,
    pub space: MeasuredSpace,
    pub series: Vec<SeriesGeometry>,
}

impl Measured {
    /// Carry the transitions of this pass into the next one.
    pub fn transition_cache(&self) -> TransitionCache {
        let mut cache = TransitionCache::new();
        for geometry in &self.series {
            for point in &geometry.points {
                cache.insert(geometry.series_key, point.index, point.transition.clone());
            }
        }
        cache
    }
}

pub(crate) struct MeasureContext<'a> {
    pub config: &'a ChartConfig,
    pub draw_margin: Rect,
    pub now: Duration,
    pub previous: &'a TransitionCache,
}

impl MeasureContext<'_> {
    /// Build a point whose geometry animates from what is on screen, or
    /// from `enter` when the point is new.
    #[allow(clippy::too_many_arguments)]
    pub fn point(
        &self,
        series_key: usize,
        series_index: usize,
        index: usize,
        coordinate: Coordinate,
        stacked: Option<StackedValue>,
        geometry: Shape,
        enter: Shape,
    ) -> ChartPoint {
        let transition = match self.previous.get(series_key, index) {
            Some(previous) => previous.retarget(
                geometry,
                self.now,
                self.config.animation_duration,
                self.config.easing,
            ),
            None => Transition::new(
                enter,
                geometry,
                self.now,
                self.config.animation_duration,
                self.config.easing,
            ),
        };
        ChartPoint {
            series_index,
            index,
            coordinate,
            stacked,
            geometry,
            transition,
        }
    }
}

pub(crate) fn series_key(series: &Rc<Series>) -> usize {
    Rc::as_ptr(series) as usize
}

/// Samples of a series that have a coordinate, with their value index.
pub(crate) fn coordinates(series: &Series) -> Vec<(usize, Coordinate)> {
    series
        .values()
        .snapshot()
        .iter()
        .enumerate()
        .filter_map(|(index, value)| value.coordinate(index).map(|c| (index, c)))
        .collect()
}

//! Measure pass of cartesian charts.

use std::rc::Rc;

use glam::Vec2;
use lumen_core::profiling::profile_function;
use lumen_core::{Rect, Shape};

use crate::axis::{Axis, AxisOrientation, Bounds};
use crate::scaler::Scaler;
use crate::series::{Series, SeriesKind};
use crate::stacker::Stacker;
use crate::value::{Coordinate, StackedValue};

use super::measure::{
    MeasureContext, Measured, MeasuredSpace, SeriesGeometry, SeriesPath, coordinates, series_key,
};

/// Share of a category band filled by bars.
const BAR_FILL: f32 = 0.8;
/// Padding added around the category range of bar series.
const BAR_CATEGORY_PADDING: f64 = 0.5;

struct Samples {
    series_index: usize,
    series: Rc<Series>,
    kind: SeriesKind,
    x_axis: usize,
    y_axis: usize,
    points: Vec<(usize, Coordinate, Option<StackedValue>)>,
}

impl Samples {
    /// Orientation and index of the category axis.
    fn category_axis(&self) -> (AxisOrientation, usize) {
        if self.kind.is_horizontal() {
            (AxisOrientation::Y, self.y_axis)
        } else {
            (AxisOrientation::X, self.x_axis)
        }
    }
}

/// Slot of a bar series among the bars sharing its category axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BarSlot {
    slot: usize,
    count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BarGroup {
    Stack(usize),
    Single(usize),
}

pub(crate) fn measure(
    ctx: &MeasureContext<'_>,
    series: &[Rc<Series>],
    x_axes: &[Rc<Axis>],
    y_axes: &[Rc<Axis>],
) -> Measured {
    profile_function!();

    let samples = collect_samples(series, x_axes.len(), y_axes.len());

    let mut x_data: Vec<Option<Bounds>> = vec![None; x_axes.len()];
    let mut y_data: Vec<Option<Bounds>> = vec![None; y_axes.len()];
    let mut x_padded = vec![false; x_axes.len()];
    let mut y_padded = vec![false; y_axes.len()];

    for sample in &samples {
        let (category, value, padded) = if sample.kind.is_horizontal() {
            (
                &mut y_data[sample.y_axis],
                &mut x_data[sample.x_axis],
                &mut y_padded[sample.y_axis],
            )
        } else {
            (
                &mut x_data[sample.x_axis],
                &mut y_data[sample.y_axis],
                &mut x_padded[sample.x_axis],
            )
        };
        for (_, coordinate, stacked) in &sample.points {
            *category = Bounds::extend(*category, coordinate.secondary);
            match stacked {
                Some(stacked) => {
                    *value = Bounds::extend(*value, stacked.start);
                    *value = Bounds::extend(*value, stacked.end);
                }
                None => *value = Bounds::extend(*value, coordinate.primary),
            }
        }
        if sample.kind.is_bar_like() && !sample.points.is_empty() {
            *value = Bounds::extend(*value, 0.0);
            *padded = true;
        }
    }

    let draw_margin = ctx.draw_margin;
    let x_scalers: Vec<Scaler> = scalers(
        x_axes,
        x_data,
        &x_padded,
        AxisOrientation::X,
        draw_margin,
    );
    let y_scalers: Vec<Scaler> = scalers(
        y_axes,
        y_data,
        &y_padded,
        AxisOrientation::Y,
        draw_margin,
    );

    let slots = bar_slots(&samples);
    let series_geometry = samples
        .iter()
        .zip(slots)
        .map(|(sample, slot)| {
            geometry(
                ctx,
                sample,
                slot,
                &x_scalers[sample.x_axis],
                &y_scalers[sample.y_axis],
            )
        })
        .collect();

    Measured {
        draw_margin,
        space: MeasuredSpace::Cartesian {
            x: x_scalers,
            y: y_scalers,
        },
        series: series_geometry,
    }
}

fn collect_samples(series: &[Rc<Series>], x_axes: usize, y_axes: usize) -> Vec<Samples> {
    let mut stacker = Stacker::new();
    let mut samples = Vec::new();

    for (series_index, s) in series.iter().enumerate() {
        if !s.is_visible() {
            continue;
        }
        let kind = s.kind();
        if !kind.is_cartesian() {
            tracing::warn!(
                "{:?} series '{}' cannot be drawn on a cartesian chart",
                kind,
                s.name()
            );
            continue;
        }
        let (x_axis, y_axis) = (s.x_axis_index(), s.y_axis_index());
        if x_axis >= x_axes || y_axis >= y_axes {
            tracing::error!(
                "Series '{}' uses axes ({}, {}) but the chart has {} X and {} Y axes",
                s.name(),
                x_axis,
                y_axis,
                x_axes,
                y_axes
            );
            continue;
        }

        let group = s.stack_group();
        let points = coordinates(s)
            .into_iter()
            .map(|(index, coordinate)| {
                let stacked = kind.is_stacked().then(|| {
                    stacker.push(kind, group, coordinate.secondary, coordinate.primary)
                });
                (index, coordinate, stacked)
            })
            .collect();

        samples.push(Samples {
            series_index,
            series: Rc::clone(s),
            kind,
            x_axis,
            y_axis,
            points,
        });
    }

    for sample in &mut samples {
        let group = sample.series.stack_group();
        for (_, coordinate, stacked) in &mut sample.points {
            if let Some(stacked) = stacked {
                stacker.finish(sample.kind, group, coordinate.secondary, stacked);
            }
        }
    }
    samples
}

fn scalers(
    axes: &[Rc<Axis>],
    data: Vec<Option<Bounds>>,
    padded: &[bool],
    orientation: AxisOrientation,
    draw_margin: Rect,
) -> Vec<Scaler> {
    axes.iter()
        .zip(data)
        .zip(padded)
        .map(|((axis, data), &padded)| {
            let data = data.map(|mut bounds| {
                if padded {
                    bounds.min -= BAR_CATEGORY_PADDING;
                    bounds.max += BAR_CATEGORY_PADDING;
                }
                bounds
            });
            Scaler::new(
                draw_margin.position(),
                draw_margin.size(),
                orientation,
                axis.resolve_bounds(data),
                axis.is_inverted(),
            )
        })
        .collect()
}

/// Bars sharing a category axis sit side by side. Stacked series of one
/// group share a single slot.
fn bar_slots(samples: &[Samples]) -> Vec<Option<BarSlot>> {
    let mut groups: Vec<((AxisOrientation, usize), Vec<BarGroup>)> = Vec::new();
    let mut assigned: Vec<Option<((AxisOrientation, usize), BarGroup)>> = Vec::new();

    for sample in samples {
        if !sample.kind.is_bar_like() {
            assigned.push(None);
            continue;
        }
        let axis_key = sample.category_axis();
        let group = if sample.kind.is_stacked() {
            BarGroup::Stack(sample.series.stack_group())
        } else {
            BarGroup::Single(sample.series_index)
        };
        let position = match groups.iter().position(|(key, _)| *key == axis_key) {
            Some(position) => position,
            None => {
                groups.push((axis_key, Vec::new()));
                groups.len() - 1
            }
        };
        let entry = &mut groups[position].1;
        if !entry.contains(&group) {
            entry.push(group);
        }
        assigned.push(Some((axis_key, group)));
    }

    assigned
        .into_iter()
        .map(|assignment| {
            let (axis_key, group) = assignment?;
            let (_, entry) = groups.iter().find(|(key, _)| *key == axis_key)?;
            let slot = entry.iter().position(|g| *g == group)?;
            Some(BarSlot {
                slot,
                count: entry.len(),
            })
        })
        .collect()
}

fn geometry(
    ctx: &MeasureContext<'_>,
    sample: &Samples,
    slot: Option<BarSlot>,
    x: &Scaler,
    y: &Scaler,
) -> SeriesGeometry {
    let key = series_key(&sample.series);
    let series_index = sample.series_index;
    let radius = sample.series.geometry_size() * 0.5;
    let mut points = Vec::with_capacity(sample.points.len());
    let mut baseline = Vec::new();

    for &(index, coordinate, stacked) in &sample.points {
        let (target, enter) = match sample.kind {
            SeriesKind::Column | SeriesKind::StackedColumn | SeriesKind::Row => {
                let slot = slot.unwrap_or(BarSlot { slot: 0, count: 1 });
                bar(sample, slot, coordinate, stacked, x, y)
            }
            _ => {
                let value = stacked.map_or(coordinate.primary, |s| s.end);
                let center = Vec2::new(x.to_pixels(coordinate.secondary), y.to_pixels(value));
                if let Some(stacked) = stacked {
                    baseline.push(Vec2::new(center.x, y.to_pixels(stacked.start)));
                }
                let circle = Shape::Circle { center, radius };
                (circle, circle.collapsed())
            }
        };
        points.push(ctx.point(key, series_index, index, coordinate, stacked, target, enter));
    }

    let path = match sample.kind {
        SeriesKind::Line => SeriesPath::Line { closed: false },
        SeriesKind::StepLine => SeriesPath::Step,
        SeriesKind::StackedArea => SeriesPath::Area { baseline },
        SeriesKind::StackedStepArea => SeriesPath::StepArea { baseline },
        _ => SeriesPath::None,
    };

    SeriesGeometry {
        series_key: key,
        series_index,
        kind: sample.kind,
        points,
        path,
    }
}

/// Target rect of a bar and the collapsed rect it grows from.
fn bar(
    sample: &Samples,
    slot: BarSlot,
    coordinate: Coordinate,
    stacked: Option<StackedValue>,
    x: &Scaler,
    y: &Scaler,
) -> (Shape, Shape) {
    let horizontal = sample.kind.is_horizontal();
    let (category, value) = if horizontal { (y, x) } else { (x, y) };

    let band = category.measure_in_pixels(1.0) * BAR_FILL / slot.count as f32;
    let thickness = band.min(sample.series.max_bar_width()).max(0.0);
    let offset = (slot.slot as f32 - (slot.count - 1) as f32 * 0.5) * thickness;
    let middle = category.to_pixels(coordinate.secondary) + offset;

    let (from, to) = match stacked {
        Some(stacked) => (stacked.start, stacked.end),
        None => (baseline_value(value.bounds()), coordinate.primary),
    };
    let (start, end) = (value.to_pixels(from), value.to_pixels(to));
    let half = thickness * 0.5;

    let (target, enter) = if horizontal {
        (
            Rect::from_corners(Vec2::new(start, middle - half), Vec2::new(end, middle + half)),
            Rect::from_corners(Vec2::new(start, middle - half), Vec2::new(start, middle + half)),
        )
    } else {
        (
            Rect::from_corners(Vec2::new(middle - half, end), Vec2::new(middle + half, start)),
            Rect::from_corners(Vec2::new(middle - half, start), Vec2::new(middle + half, start)),
        )
    };
    (Shape::Rect(target), Shape::Rect(enter))
}

/// Zero, or the closest visible value when zero is out of range.
fn baseline_value(bounds: Bounds) -> f64 {
    let (low, high) = if bounds.min <= bounds.max {
        (bounds.min, bounds.max)
    } else {
        (bounds.max, bounds.min)
    };
    0.0_f64.clamp(low, high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TransitionCache;
    use crate::config::ChartConfig;
    use std::time::Duration;

    fn context<'a>(config: &'a ChartConfig, previous: &'a TransitionCache) -> MeasureContext<'a> {
        MeasureContext {
            config,
            draw_margin: Rect::new(0.0, 0.0, 100.0, 100.0),
            now: Duration::ZERO,
            previous,
        }
    }

    #[test]
    fn test_bar_axes_include_zero_and_pad_categories() {
        let config = ChartConfig::default().without_animations();
        let previous = TransitionCache::new();
        let series = vec![Series::builder(SeriesKind::Column).values([5.0, 10.0]).build()];
        let measured = measure(
            &context(&config, &previous),
            &series,
            &[Rc::new(Axis::new())],
            &[Rc::new(Axis::new())],
        );
        let MeasuredSpace::Cartesian { x, y } = &measured.space else {
            panic!("expected cartesian space");
        };
        assert_eq!(x[0].bounds(), Bounds::new(-0.5, 1.5));
        assert_eq!(y[0].bounds(), Bounds::new(0.0, 10.0));
    }

    #[test]
    fn test_side_by_side_columns_do_not_overlap() {
        let config = ChartConfig::default().without_animations();
        let previous = TransitionCache::new();
        let series = vec![
            Series::builder(SeriesKind::Column).values([1.0]).build(),
            Series::builder(SeriesKind::Column).values([2.0]).build(),
        ];
        let measured = measure(
            &context(&config, &previous),
            &series,
            &[Rc::new(Axis::new())],
            &[Rc::new(Axis::new())],
        );
        let rect = |series: usize| match measured.series[series].points[0].geometry {
            Shape::Rect(rect) => rect,
            other => panic!("expected a rect, got {:?}", other),
        };
        assert!(rect(0).right() <= rect(1).x + 1e-3);
    }

    #[test]
    fn test_hidden_and_misplaced_series_are_skipped() {
        let config = ChartConfig::default();
        let previous = TransitionCache::new();
        let series = vec![
            Series::builder(SeriesKind::Line).values([1.0]).visible(false).build(),
            Series::builder(SeriesKind::Line).values([1.0]).axes(0, 4).build(),
            Series::builder(SeriesKind::Pie).values([1.0]).build(),
            Series::builder(SeriesKind::Line).values([1.0]).build(),
        ];
        let measured = measure(
            &context(&config, &previous),
            &series,
            &[Rc::new(Axis::new())],
            &[Rc::new(Axis::new())],
        );
        assert_eq!(measured.series.len(), 1);
        assert_eq!(measured.series[0].series_index, 3);
    }

    #[test]
    fn test_new_points_enter_from_collapsed_geometry() {
        let config = ChartConfig::default();
        let previous = TransitionCache::new();
        let series = vec![
            Series::builder(SeriesKind::Scatter)
                .points([(0.0, 0.0), (1.0, 1.0)])
                .build(),
        ];
        let measured = measure(
            &context(&config, &previous),
            &series,
            &[Rc::new(Axis::new())],
            &[Rc::new(Axis::new())],
        );
        let point = &measured.series[0].points[0];
        assert!(!point.is_settled(Duration::ZERO));
        match point.geometry_at(Duration::ZERO) {
            Shape::Circle { radius, .. } => assert_eq!(radius, 0.0),
            other => panic!("expected a circle, got {:?}", other),
        }
        assert!(point.is_settled(config.animation_duration));
    }

    #[test]
    fn test_baseline_clamps_into_range() {
        assert_eq!(baseline_value(Bounds::new(-5.0, 5.0)), 0.0);
        assert_eq!(baseline_value(Bounds::new(2.0, 5.0)), 2.0);
        assert_eq!(baseline_value(Bounds::new(5.0, -8.0)), 0.0);
        assert_eq!(baseline_value(Bounds::new(-9.0, -3.0)), -3.0);
    }
}

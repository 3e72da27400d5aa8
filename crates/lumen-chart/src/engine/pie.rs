//! Measure pass of pie charts.

use std::rc::Rc;

use lumen_core::profiling::profile_function;
use lumen_core::Shape;

use crate::series::{Series, SeriesKind};
use crate::value::{Coordinate, StackedValue};

use super::measure::{
    MeasureContext, Measured, MeasuredSpace, SeriesGeometry, SeriesPath, coordinates, series_key,
};

/// Lay slices out clockwise from the configured rotation, in series then
/// value order. Each slice sweeps its share of `max_angle`. Samples that are
/// not positive get no slice.
pub(crate) fn measure(ctx: &MeasureContext<'_>, series: &[Rc<Series>]) -> Measured {
    profile_function!();

    let pie = ctx.config.pie;
    let slices: Vec<(usize, &Rc<Series>, Vec<(usize, Coordinate)>)> = series
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_visible())
        .filter(|(_, s)| {
            let drawable = s.kind() == SeriesKind::Pie;
            if !drawable {
                tracing::warn!(
                    "{:?} series '{}' cannot be drawn on a pie chart",
                    s.kind(),
                    s.name()
                );
            }
            drawable
        })
        .map(|(index, s)| {
            let values = coordinates(s)
                .into_iter()
                .filter(|(_, c)| c.primary > 0.0)
                .collect();
            (index, s, values)
        })
        .collect();

    let total: f64 = slices
        .iter()
        .flat_map(|(_, _, values)| values.iter().map(|(_, c)| c.primary))
        .sum();

    let draw_margin = ctx.draw_margin;
    let center = draw_margin.center();
    let outer_radius = draw_margin.width.min(draw_margin.height) * 0.5;
    let inner_radius = (pie.inner_radius as f32).min(outer_radius);

    let mut accumulated = 0.0;
    let mut geometry = Vec::with_capacity(slices.len());
    for (series_index, s, values) in slices {
        let key = series_key(s);
        let points = values
            .into_iter()
            .map(|(index, coordinate)| {
                let start = accumulated;
                accumulated += coordinate.primary;
                let target = Shape::Slice {
                    center,
                    inner_radius,
                    outer_radius,
                    start_angle: (pie.initial_rotation + start / total * pie.max_angle) as f32,
                    sweep_angle: (coordinate.primary / total * pie.max_angle) as f32,
                };
                let stacked = StackedValue {
                    start,
                    end: accumulated,
                    total,
                };
                ctx.point(
                    key,
                    series_index,
                    index,
                    coordinate,
                    Some(stacked),
                    target,
                    target.collapsed(),
                )
            })
            .collect();
        geometry.push(SeriesGeometry {
            series_key: key,
            series_index,
            kind: SeriesKind::Pie,
            points,
            path: SeriesPath::None,
        });
    }

    Measured {
        draw_margin,
        space: MeasuredSpace::Pie,
        series: geometry,
    }
}

//! Measure pass of polar charts.

use std::rc::Rc;

use lumen_core::profiling::profile_function;
use lumen_core::Shape;

use crate::axis::{Axis, Bounds};
use crate::polar::PolarScaler;
use crate::series::{Series, SeriesKind};

use super::measure::{
    MeasureContext, Measured, MeasuredSpace, SeriesGeometry, SeriesPath, coordinates, series_key,
};

/// Resolved bounds of every angle and radius axis.
///
/// Angle axes without an explicit maximum get one extra unit so the last
/// sample does not land on top of the first one on a full turn. Radius axes
/// always start from zero unless limited.
pub(crate) fn axis_bounds(
    series: &[Rc<Series>],
    angle_axes: &[Rc<Axis>],
    radius_axes: &[Rc<Axis>],
) -> (Vec<Bounds>, Vec<Bounds>) {
    let mut angle_data: Vec<Option<Bounds>> = vec![None; angle_axes.len()];
    let mut radius_data: Vec<Option<Bounds>> = vec![None; radius_axes.len()];

    for s in drawable(series, angle_axes.len(), radius_axes.len(), false) {
        let (angle, radius) = (s.x_axis_index(), s.y_axis_index());
        for (_, coordinate) in coordinates(s) {
            angle_data[angle] = Bounds::extend(angle_data[angle], coordinate.secondary);
            radius_data[radius] = Bounds::extend(radius_data[radius], coordinate.primary);
        }
    }

    let angles = angle_axes
        .iter()
        .zip(angle_data)
        .map(|(axis, data)| {
            let mut bounds = axis.resolve_bounds(data);
            if data.is_some() && axis.max_limit().is_none() {
                bounds.max += 1.0;
            }
            bounds
        })
        .collect();
    let radii = radius_axes
        .iter()
        .zip(radius_data)
        .map(|(axis, data)| {
            axis.resolve_bounds(data.map(|mut bounds| {
                bounds.include(0.0);
                bounds
            }))
        })
        .collect();
    (angles, radii)
}

pub(crate) fn measure(
    ctx: &MeasureContext<'_>,
    series: &[Rc<Series>],
    angle_axes: &[Rc<Axis>],
    radius_axes: &[Rc<Axis>],
) -> Measured {
    profile_function!();

    let (angle_bounds, radius_bounds) = axis_bounds(series, angle_axes, radius_axes);
    let polar = ctx.config.polar;
    let mut geometry = Vec::new();

    for (series_index, s) in series.iter().enumerate() {
        if !is_drawable(s, angle_axes.len(), radius_axes.len(), true) {
            continue;
        }
        let scaler = match PolarScaler::new(
            ctx.draw_margin,
            angle_bounds[s.x_axis_index()],
            radius_bounds[s.y_axis_index()],
            polar.inner_radius,
            polar.initial_rotation,
            polar.total_angle,
        ) {
            Ok(scaler) => scaler,
            Err(err) => {
                tracing::error!("Cannot scale polar series '{}': {}", s.name(), err);
                continue;
            }
        };

        let key = series_key(s);
        let radius = s.geometry_size() * 0.5;
        let points = coordinates(s)
            .into_iter()
            .map(|(index, coordinate)| {
                let center = scaler.to_pixels(coordinate.secondary, coordinate.primary);
                let target = Shape::Circle { center, radius };
                ctx.point(key, series_index, index, coordinate, None, target, target.collapsed())
            })
            .collect();

        geometry.push(SeriesGeometry {
            series_key: key,
            series_index,
            kind: SeriesKind::PolarLine,
            points,
            path: SeriesPath::Line {
                closed: polar.total_angle >= 360.0,
            },
        });
    }

    Measured {
        draw_margin: ctx.draw_margin,
        space: MeasuredSpace::Polar {
            angle: angle_bounds,
            radius: radius_bounds,
        },
        series: geometry,
    }
}

fn drawable<'a>(
    series: &'a [Rc<Series>],
    angle_axes: usize,
    radius_axes: usize,
    report: bool,
) -> impl Iterator<Item = &'a Rc<Series>> {
    series
        .iter()
        .filter(move |s| is_drawable(s, angle_axes, radius_axes, report))
}

fn is_drawable(series: &Series, angle_axes: usize, radius_axes: usize, report: bool) -> bool {
    if !series.is_visible() {
        return false;
    }
    if series.kind() != SeriesKind::PolarLine {
        if report {
            tracing::warn!(
                "{:?} series '{}' cannot be drawn on a polar chart",
                series.kind(),
                series.name()
            );
        }
        return false;
    }
    if series.x_axis_index() >= angle_axes || series.y_axis_index() >= radius_axes {
        if report {
            tracing::error!(
                "Series '{}' uses axes ({}, {}) but the chart has {} angle and {} radius axes",
                series.name(),
                series.x_axis_index(),
                series.y_axis_index(),
                angle_axes,
                radius_axes
            );
        }
        return false;
    }
    true
}

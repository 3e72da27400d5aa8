//! Change observation and invalidation coalescing.

mod common;

use std::rc::Rc;

use common::{Harness, quiet_config};
use lumen_chart::prelude::*;
use lumen_chart::{CanvasState, Observable};

fn line(values: impl IntoIterator<Item = f64>) -> Rc<Series> {
    Series::builder(SeriesKind::Line).values(values).build()
}

#[test]
fn test_burst_of_mutations_starts_one_loop() {
    let series = line([1.0, 2.0]);
    let h = Harness::new(
        Chart::cartesian()
            .config(quiet_config())
            .series(series.clone())
            .size(100.0, 100.0),
    );
    h.settle();
    let starts = h.chart.canvas().loop_start_count();
    let measures = h.chart.measure_count();

    let values = series.values();
    for i in 0..5_000 {
        values.push(ObservableValue::new(i as f64));
    }

    assert_eq!(h.chart.canvas().loop_start_count(), starts + 1);
    assert_eq!(h.chart.canvas().state(), CanvasState::Looping);

    h.settle();
    assert_eq!(h.chart.canvas().state(), CanvasState::Idle);
    assert_eq!(h.chart.measure_count(), measures + 1);
    assert_eq!(h.chart.series_points(0).unwrap().len(), 5_002);
}

#[test]
fn test_value_edits_invalidate() {
    let series = line([1.0, 2.0]);
    let h = Harness::new(Chart::cartesian().config(quiet_config()).series(series.clone()));
    h.settle();
    let starts = h.chart.canvas().loop_start_count();

    let values = series.values();
    values.get(1).unwrap().set_value(7.0);
    assert_eq!(h.chart.canvas().loop_start_count(), starts + 1);

    h.settle();
    let points = h.chart.series_points(0).unwrap();
    assert_eq!(points[1].coordinate, Coordinate::new(1.0, 7.0));
}

#[test]
fn test_replacing_values_drops_old_subscriptions() {
    let series = line([1.0]);
    let h = Harness::new(Chart::cartesian().config(quiet_config()).series(series.clone()));
    h.settle();

    let mut retired = Vec::new();
    for i in 0..100 {
        retired.push(series.values());
        let next = Rc::new(ObservableCollection::from_items([ObservableValue::new(i as f64)]));
        series.set_values(next);
    }

    for collection in &retired {
        assert_eq!(collection.notifier().observer_count(), 0);
        for value in collection.snapshot() {
            assert_eq!(value.notifier().observer_count(), 0);
        }
    }

    h.settle();
    let starts = h.chart.canvas().loop_start_count();
    retired[0].push(ObservableValue::new(42.0));
    retired[50].get(0).unwrap().set_value(1.0);
    assert_eq!(h.chart.canvas().loop_start_count(), starts);
}

#[test]
fn test_removed_series_stop_invalidating() {
    let kept = line([1.0]);
    let removed = line([2.0]);
    let h = Harness::new(
        Chart::cartesian()
            .config(quiet_config())
            .series(kept.clone())
            .series(removed.clone()),
    );
    h.settle();

    h.chart.series().remove(1);
    h.settle();
    assert_eq!(removed.notifier().observer_count(), 0);

    let starts = h.chart.canvas().loop_start_count();
    removed.values().push(ObservableValue::new(3.0));
    removed.set_name("gone");
    assert_eq!(h.chart.canvas().loop_start_count(), starts);

    kept.set_name("still here");
    assert_eq!(h.chart.canvas().loop_start_count(), starts + 1);
}

#[test]
fn test_dispose_releases_every_subscription() {
    let series = line([1.0, 2.0]);
    let axis = Rc::new(Axis::new());
    let element = Rc::new(VisualElement::new("badge", Rect::new(0.0, 0.0, 10.0, 10.0)));
    let h = Harness::new(
        Chart::cartesian()
            .config(quiet_config())
            .series(series.clone())
            .x_axis(axis.clone())
            .visual_element(element.clone()),
    );
    h.settle();
    let collections = (h.chart.series(), h.chart.x_axes(), h.chart.visual_elements());

    h.chart.dispose();

    assert_eq!(series.notifier().observer_count(), 0);
    assert_eq!(axis.notifier().observer_count(), 0);
    assert_eq!(element.notifier().observer_count(), 0);
    assert_eq!(collections.0.notifier().observer_count(), 0);
    assert_eq!(collections.1.notifier().observer_count(), 0);
    assert_eq!(collections.2.notifier().observer_count(), 0);
    // The series still watches its own values.
    assert_eq!(series.values().get(0).unwrap().notifier().observer_count(), 1);

    let starts = h.chart.canvas().loop_start_count();
    series.values().push(ObservableValue::new(3.0));
    axis.set_max_limit(Some(5.0));
    h.chart.update();
    assert_eq!(h.chart.canvas().loop_start_count(), starts);
    assert!(h.chart.is_disposed());
}

#[test]
fn test_dropping_the_chart_unsubscribes() {
    let series = line([1.0]);
    {
        let h = Harness::new(Chart::cartesian().config(quiet_config()).series(series.clone()));
        h.settle();
        assert_eq!(series.notifier().observer_count(), 1);
    }
    assert_eq!(series.notifier().observer_count(), 0);
}

#[test]
fn test_shared_series_fans_out_to_every_chart() {
    let series = line([1.0, 2.0]);
    let runtime = UiRuntime::new();
    let first = Harness::with_runtime(
        Chart::cartesian().config(quiet_config()).series(series.clone()),
        runtime.clone(),
    );
    let second = Harness::with_runtime(
        Chart::cartesian().config(quiet_config()).series(series.clone()),
        runtime.clone(),
    );
    runtime.run_until_stalled();
    assert_eq!(series.notifier().observer_count(), 2);

    series.values().push(ObservableValue::new(3.0));
    runtime.run_until_stalled();

    for h in [&first, &second] {
        assert_eq!(h.chart.series_points(0).unwrap().len(), 3);
        assert_eq!(h.chart.canvas().state(), CanvasState::Idle);
    }
}

#[test]
fn test_auto_update_off_waits_for_update() {
    let series = line([1.0]);
    let h = Harness::new(
        Chart::cartesian()
            .config(quiet_config().with_auto_update(false))
            .series(series.clone()),
    );
    h.settle();
    let starts = h.chart.canvas().loop_start_count();

    series.values().push(ObservableValue::new(2.0));
    assert_eq!(h.chart.canvas().loop_start_count(), starts);
    assert_eq!(h.chart.series_points(0).unwrap().len(), 1);

    h.chart.update();
    h.settle();
    assert_eq!(h.chart.series_points(0).unwrap().len(), 2);
}

#[test]
fn test_axis_and_collection_swaps_invalidate() {
    let axis = Rc::new(Axis::new());
    let h = Harness::new(
        Chart::cartesian()
            .config(quiet_config())
            .series(line([1.0, 2.0]))
            .y_axis(axis.clone())
            .size(100.0, 100.0),
    );
    h.settle();
    let starts = h.chart.canvas().loop_start_count();

    axis.set_limits(Some(0.0), Some(10.0));
    h.settle();
    assert_eq!(h.chart.canvas().loop_start_count(), starts + 1);

    let old = h.chart.y_axes();
    let replacement = Rc::new(ObservableCollection::new());
    replacement.push(Axis::new().with_limits(0.0, 4.0));
    h.chart.set_y_axes(replacement);
    h.settle();
    assert_eq!(old.notifier().observer_count(), 0);
    assert_eq!(axis.notifier().observer_count(), 0);

    let top = h
        .chart
        .scale_data_to_pixels(Coordinate::new(0.0, 4.0), 0, 0)
        .unwrap();
    let bottom = h
        .chart
        .scale_data_to_pixels(Coordinate::new(0.0, 0.0), 0, 0)
        .unwrap();
    assert!(top.y.abs() < 1e-3);
    assert!((bottom.y - 100.0).abs() < 1e-3);
}

#[test]
fn test_replaced_series_and_visual_collections_are_rewired() {
    let first = line([1.0]);
    let h = Harness::new(
        Chart::cartesian()
            .config(quiet_config())
            .series(first.clone())
            .size(100.0, 100.0),
    );
    h.settle();
    let old_series = h.chart.series();

    let next = line([1.0, 2.0, 3.0]);
    let series = Rc::new(ObservableCollection::new());
    series.push(next.clone());
    h.chart.set_series(series);
    h.settle();
    assert_eq!(h.chart.series_points(0).unwrap().len(), 3);
    assert_eq!(old_series.notifier().observer_count(), 0);
    assert_eq!(first.notifier().observer_count(), 0);

    let measures = h.chart.measure_count();
    let elements = Rc::new(ObservableCollection::new());
    let badge = Rc::new(VisualElement::new("badge", Rect::new(0.0, 0.0, 10.0, 10.0)));
    elements.push(badge.clone());
    h.chart.set_visual_elements(elements);
    h.settle();

    // Visual elements repaint without a measure.
    assert_eq!(h.chart.measure_count(), measures);
    assert_eq!(h.chart.visuals_at(Vec2::new(5.0, 5.0)).len(), 1);
    assert_eq!(badge.notifier().observer_count(), 1);
}

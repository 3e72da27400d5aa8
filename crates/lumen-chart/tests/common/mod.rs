//! Shared harness: a chart wired to a recording host and surface, a manual
//! clock and its own runtime. Every repaint request paints a frame right
//! away, the way a UI framework answers on its next paint.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use lumen_chart::prelude::*;
use lumen_chart::{ChartBuilder, StackedValue};
use lumen_test_utils::{ManualClock, RecordingHost, RecordingSurface};

pub struct Harness {
    pub chart: Chart,
    pub host: Rc<RecordingHost>,
    pub surface: RecordingSurface,
    pub clock: ManualClock,
    pub runtime: UiRuntime,
}

impl Harness {
    pub fn new(builder: ChartBuilder) -> Self {
        Self::with_runtime(builder, UiRuntime::new())
    }

    pub fn with_runtime(builder: ChartBuilder, runtime: UiRuntime) -> Self {
        let host = Rc::new(RecordingHost::new());
        let surface = RecordingSurface::new();
        let clock = ManualClock::new();
        let chart = builder
            .host(host.clone())
            .clock(Rc::new(clock.clone()))
            .runtime(runtime.clone())
            .build()
            .expect("chart should build");

        let weak = chart.downgrade();
        let log = surface.clone();
        host.set_on_repaint(Rc::new(move || {
            if let Some(chart) = weak.upgrade() {
                let mut surface = log.clone();
                chart.draw_frame(&mut surface);
            }
        }));

        Self {
            chart,
            host,
            surface,
            clock,
            runtime,
        }
    }

    /// Run the redraw loop until it goes idle.
    pub fn settle(&self) -> usize {
        self.runtime.run_until_stalled()
    }
}

/// No animations, no throttling, the whole control as draw margin.
pub fn quiet_config() -> ChartConfig {
    ChartConfig::default()
        .without_animations()
        .with_update_throttle(Duration::ZERO)
        .with_draw_margin(Margin::zero())
}

/// Listener recording every event as text.
#[derive(Default)]
pub struct EventLog {
    pub events: RefCell<Vec<String>>,
    pub hovered: RefCell<Vec<(Vec<(usize, usize)>, Vec<(usize, usize)>)>>,
    pub pointer_down: RefCell<Vec<Vec<(usize, usize)>>>,
    pub elements: RefCell<Vec<Vec<String>>>,
}

impl EventLog {
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

fn keys(points: &[HitResult]) -> Vec<(usize, usize)> {
    points.iter().map(HitResult::key).collect()
}

impl ChartListener for EventLog {
    fn measuring(&self) {
        self.events.borrow_mut().push("measuring".into());
    }

    fn update_started(&self) {
        self.events.borrow_mut().push("update_started".into());
    }

    fn update_finished(&self) {
        self.events.borrow_mut().push("update_finished".into());
    }

    fn data_pointer_down(&self, points: &[HitResult]) {
        self.events.borrow_mut().push("data_pointer_down".into());
        self.pointer_down.borrow_mut().push(keys(points));
    }

    fn hovered_points_changed(&self, hovered: &[HitResult], left: &[HitResult]) {
        self.events.borrow_mut().push("hovered_points_changed".into());
        self.hovered.borrow_mut().push((keys(hovered), keys(left)));
    }

    fn visual_elements_pointer_down(&self, elements: &[Rc<VisualElement>]) {
        self.events
            .borrow_mut()
            .push("visual_elements_pointer_down".into());
        self.elements
            .borrow_mut()
            .push(elements.iter().map(|e| e.name()).collect());
    }
}

pub fn rect_of(shape: Shape) -> Rect {
    match shape {
        Shape::Rect(rect) => rect,
        other => panic!("expected a rect, got {:?}", other),
    }
}

pub fn stacked(start: f64, end: f64, total: f64) -> Option<StackedValue> {
    Some(StackedValue { start, end, total })
}

pub fn assert_close(actual: Vec2, expected: Vec2) {
    assert!(
        actual.distance(expected) < 1e-3,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

//! Construction of charts.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use glam::Vec2;
use lumen_core::{FrameClock, RepaintHost};

use crate::axis::Axis;
use crate::cache::ChartDirtyFlags;
use crate::canvas::MotionCanvas;
use crate::config::ChartConfig;
use crate::error::{ChartError, Result};
use crate::events::ChartListener;
use crate::observe::{CollectionDeepObserver, Observable, ObservableCollection};
use crate::runtime::{TimerClock, UiRuntime};
use crate::series::Series;
use crate::visual::VisualElement;

use super::{Chart, ChartInner, ChartKind, EngineState};

/// Builder for [`Chart`].
///
/// The repaint host is required. Without a runtime or clock the chart gets
/// its own [`UiRuntime`] and a wall-clock [`TimerClock`].
///
/// ```ignore
/// let chart = Chart::cartesian()
///     .host(host)
///     .series(Series::builder(SeriesKind::Line).values([1.0, 4.0, 2.0]).build())
///     .size(640.0, 480.0)
///     .build()?;
/// ```
pub struct ChartBuilder {
    kind: ChartKind,
    config: ChartConfig,
    runtime: Option<UiRuntime>,
    host: Option<Rc<dyn RepaintHost>>,
    clock: Option<Rc<dyn FrameClock>>,
    size: Vec2,
    series: Vec<Rc<Series>>,
    x_axes: Vec<Rc<Axis>>,
    y_axes: Vec<Rc<Axis>>,
    visual_elements: Vec<Rc<VisualElement>>,
    listeners: Vec<Rc<dyn ChartListener>>,
}

impl ChartBuilder {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            config: ChartConfig::default(),
            runtime: None,
            host: None,
            clock: None,
            size: Vec2::ZERO,
            series: Vec::new(),
            x_axes: Vec::new(),
            y_axes: Vec::new(),
            visual_elements: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn config(mut self, config: ChartConfig) -> Self {
        self.config = config;
        self
    }

    /// Share an executor with other charts of the same UI thread.
    pub fn runtime(mut self, runtime: UiRuntime) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn host(mut self, host: Rc<dyn RepaintHost>) -> Self {
        self.host = Some(host);
        self
    }

    pub fn clock(mut self, clock: Rc<dyn FrameClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Initial control size in pixels.
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.size = Vec2::new(width.max(0.0), height.max(0.0));
        self
    }

    pub fn series(mut self, series: Rc<Series>) -> Self {
        self.series.push(series);
        self
    }

    pub fn x_axis(mut self, axis: impl Into<Rc<Axis>>) -> Self {
        self.x_axes.push(axis.into());
        self
    }

    pub fn y_axis(mut self, axis: impl Into<Rc<Axis>>) -> Self {
        self.y_axes.push(axis.into());
        self
    }

    /// Angle axis of a polar chart.
    pub fn angle_axis(self, axis: impl Into<Rc<Axis>>) -> Self {
        self.x_axis(axis)
    }

    /// Radius axis of a polar chart.
    pub fn radius_axis(self, axis: impl Into<Rc<Axis>>) -> Self {
        self.y_axis(axis)
    }

    pub fn visual_element(mut self, element: impl Into<Rc<VisualElement>>) -> Self {
        self.visual_elements.push(element.into());
        self
    }

    pub fn listener(mut self, listener: Rc<dyn ChartListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Validate the configuration and start observing. The first frame is
    /// requested right away.
    pub fn build(mut self) -> Result<Chart> {
        self.config.validate()?;
        let host = self
            .host
            .take()
            .ok_or(ChartError::MissingCollaborator { name: "host" })?;
        let runtime = self.runtime.take().unwrap_or_default();
        let clock = self
            .clock
            .take()
            .unwrap_or_else(|| Rc::new(TimerClock::new()));

        if self.kind != ChartKind::Pie {
            if self.x_axes.is_empty() {
                self.x_axes.push(Rc::new(Axis::new()));
            }
            if self.y_axes.is_empty() {
                self.y_axes.push(Rc::new(Axis::new()));
            }
        }

        let canvas = MotionCanvas::new(
            runtime.clone(),
            host,
            clock,
            self.config.frame_interval(),
        );
        let series = collection(self.series);
        let x_axes = collection(self.x_axes);
        let y_axes = collection(self.y_axes);
        let visual_elements = collection(self.visual_elements);
        let kind = self.kind;
        let config = self.config;
        let listeners = self.listeners;
        let size = self.size;

        let inner = Rc::new_cyclic(|this: &Weak<ChartInner>| {
            let observer = |flags: ChartDirtyFlags| {
                let this = this.clone();
                CollectionDeepObserver::new(move || {
                    if let Some(inner) = this.upgrade() {
                        inner.on_observed_change(flags);
                    }
                })
            };
            let series_observer = observer(ChartDirtyFlags::DATA_CHANGED);
            let axes_observer = observer(ChartDirtyFlags::AXES_CHANGED);
            let visuals_observer = observer(ChartDirtyFlags::VISUALS_CHANGED);
            series_observer.observe(&series);
            axes_observer.observe(&x_axes);
            axes_observer.observe(&y_axes);
            visuals_observer.observe(&visual_elements);

            ChartInner {
                kind,
                config,
                runtime,
                canvas,
                series: RefCell::new(series),
                x_axes: RefCell::new(x_axes),
                y_axes: RefCell::new(y_axes),
                visual_elements: RefCell::new(visual_elements),
                series_observer,
                axes_observer,
                visuals_observer,
                listeners: RefCell::new(listeners),
                dirty: Cell::new(ChartDirtyFlags::empty()),
                state: RefCell::new(EngineState {
                    control_size: size,
                    ..EngineState::default()
                }),
                disposed: Cell::new(false),
                measure_count: Cell::new(0),
            }
        });

        tracing::debug!(
            "Built {:?} chart with {} series",
            kind,
            inner.series.borrow().len()
        );
        inner.invalidate(ChartDirtyFlags::all());
        Ok(Chart { inner })
    }
}

fn collection<T: Observable + 'static>(
    items: Vec<Rc<T>>,
) -> Rc<ObservableCollection<T>> {
    let collection = Rc::new(ObservableCollection::new());
    collection.extend(items);
    collection
}

//! Chart engine: owns the observed collections of a chart, measures them
//! into point geometry and paints frames on request of the motion canvas.
//!
//! # Lifecycle
//!
//! 1. A change anywhere in the observed graph (series, values, axes, visual
//!    elements) marks the chart dirty and invalidates the canvas.
//! 2. The canvas loop asks the host for a repaint; the host calls
//!    [`Chart::draw_frame`].
//! 3. `draw_frame` re-measures when needed (at most once per
//!    `update_throttle`), paints the interpolated geometry and reports
//!    whether the scene is visually stable, which ends the loop.
//!
//! Everything here runs on the UI thread.

mod builder;
mod cartesian;
mod input;
mod layout;
mod measure;
mod pie;
mod polar;

pub use builder::ChartBuilder;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use glam::Vec2;
use lumen_core::profiling::profile_function;
use lumen_core::{DrawLayer, DrawingSurface, Rect, Shape, SurfaceError};

use crate::axis::{Axis, AxisOrientation};
use crate::cache::ChartDirtyFlags;
use crate::canvas::MotionCanvas;
use crate::config::ChartConfig;
use crate::error::{ChartError, Result};
use crate::events::ChartListener;
use crate::hit_test::{FindPointFor, FindingStrategy, HitResult, find_points};
use crate::observe::{CollectionDeepObserver, ObservableCollection};
use crate::polar::{PolarCoordinate, PolarScaler};
use crate::runtime::UiRuntime;
use crate::scaler::{CartesianScalers, Scalable};
use crate::series::Series;
use crate::value::{ChartPoint, Coordinate};
use crate::visual::VisualElement;

use measure::{MeasureContext, Measured, MeasuredSpace};

/// Coordinate system of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Cartesian,
    Polar,
    Pie,
}

#[derive(Debug, Default)]
struct EngineState {
    control_size: Vec2,
    last_measure: Option<Duration>,
    measured: Option<Measured>,
    hovered: Vec<HitResult>,
    drag: Option<Vec2>,
}

struct ChartInner {
    kind: ChartKind,
    config: ChartConfig,
    runtime: UiRuntime,
    canvas: Rc<MotionCanvas>,
    series: RefCell<Rc<ObservableCollection<Series>>>,
    x_axes: RefCell<Rc<ObservableCollection<Axis>>>,
    y_axes: RefCell<Rc<ObservableCollection<Axis>>>,
    visual_elements: RefCell<Rc<ObservableCollection<VisualElement>>>,
    series_observer: Rc<CollectionDeepObserver>,
    axes_observer: Rc<CollectionDeepObserver>,
    visuals_observer: Rc<CollectionDeepObserver>,
    listeners: RefCell<Vec<Rc<dyn ChartListener>>>,
    dirty: Cell<ChartDirtyFlags>,
    state: RefCell<EngineState>,
    disposed: Cell<bool>,
    measure_count: Cell<u64>,
}

/// Handle to a chart. Clones share the same chart.
#[derive(Clone)]
pub struct Chart {
    inner: Rc<ChartInner>,
}

/// Non-owning handle to a chart.
#[derive(Clone)]
pub struct WeakChart {
    inner: Weak<ChartInner>,
}

impl WeakChart {
    pub fn upgrade(&self) -> Option<Chart> {
        self.inner.upgrade().map(|inner| Chart { inner })
    }
}

impl std::fmt::Debug for Chart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chart")
            .field("kind", &self.inner.kind)
            .field("series", &self.inner.series.borrow().len())
            .field("dirty", &self.inner.dirty.get())
            .field("disposed", &self.inner.disposed.get())
            .finish()
    }
}

impl Chart {
    pub fn cartesian() -> ChartBuilder {
        ChartBuilder::new(ChartKind::Cartesian)
    }

    pub fn polar() -> ChartBuilder {
        ChartBuilder::new(ChartKind::Polar)
    }

    pub fn pie() -> ChartBuilder {
        ChartBuilder::new(ChartKind::Pie)
    }

    pub fn kind(&self) -> ChartKind {
        self.inner.kind
    }

    pub fn config(&self) -> &ChartConfig {
        &self.inner.config
    }

    pub fn runtime(&self) -> &UiRuntime {
        &self.inner.runtime
    }

    pub fn canvas(&self) -> &MotionCanvas {
        &self.inner.canvas
    }

    pub fn downgrade(&self) -> WeakChart {
        WeakChart {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn series(&self) -> Rc<ObservableCollection<Series>> {
        Rc::clone(&self.inner.series.borrow())
    }

    /// Replace the series collection. The old collection is no longer
    /// observed.
    pub fn set_series(&self, series: Rc<ObservableCollection<Series>>) {
        let inner = &self.inner;
        if inner.disposed.get() {
            return;
        }
        let old = inner.series.replace(Rc::clone(&series));
        inner.series_observer.unobserve(&old);
        inner.series_observer.observe(&series);
        inner.on_observed_change(ChartDirtyFlags::DATA_CHANGED);
    }

    /// X axes, or angle axes on polar charts.
    pub fn x_axes(&self) -> Rc<ObservableCollection<Axis>> {
        Rc::clone(&self.inner.x_axes.borrow())
    }

    pub fn set_x_axes(&self, axes: Rc<ObservableCollection<Axis>>) {
        self.inner.replace_axes(&self.inner.x_axes, axes);
    }

    /// Y axes, or radius axes on polar charts.
    pub fn y_axes(&self) -> Rc<ObservableCollection<Axis>> {
        Rc::clone(&self.inner.y_axes.borrow())
    }

    pub fn set_y_axes(&self, axes: Rc<ObservableCollection<Axis>>) {
        self.inner.replace_axes(&self.inner.y_axes, axes);
    }

    pub fn visual_elements(&self) -> Rc<ObservableCollection<VisualElement>> {
        Rc::clone(&self.inner.visual_elements.borrow())
    }

    pub fn set_visual_elements(&self, elements: Rc<ObservableCollection<VisualElement>>) {
        let inner = &self.inner;
        if inner.disposed.get() {
            return;
        }
        let old = inner.visual_elements.replace(Rc::clone(&elements));
        inner.visuals_observer.unobserve(&old);
        inner.visuals_observer.observe(&elements);
        inner.on_observed_change(ChartDirtyFlags::VISUALS_CHANGED);
    }

    pub fn add_listener(&self, listener: Rc<dyn ChartListener>) {
        self.inner.listeners.borrow_mut().push(listener);
    }

    /// Schedule a full measure, even when `auto_update` is off.
    pub fn update(&self) {
        self.inner.invalidate(ChartDirtyFlags::all());
    }

    /// Repaint without re-measuring.
    pub fn redraw(&self) {
        if !self.inner.disposed.get() {
            self.inner.canvas.invalidate();
        }
    }

    pub fn control_size(&self) -> Vec2 {
        self.inner.state.borrow().control_size
    }

    /// Plot area of the last measure.
    pub fn draw_margin(&self) -> Result<Rect> {
        self.inner
            .state
            .borrow()
            .measured
            .as_ref()
            .map(|measured| measured.draw_margin)
            .ok_or(ChartError::NotMeasured)
    }

    /// Number of measure passes run so far.
    pub fn measure_count(&self) -> u64 {
        self.inner.measure_count.get()
    }

    /// Whether a measure is pending.
    pub fn is_dirty(&self) -> bool {
        self.inner.dirty.get().needs_measure()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// Points of the series at `series_index` as of the last measure. Hidden
    /// or undrawable series have none.
    pub fn series_points(&self, series_index: usize) -> Result<Vec<ChartPoint>> {
        let state = self.inner.state.borrow();
        let measured = state.measured.as_ref().ok_or(ChartError::NotMeasured)?;
        Ok(measured
            .series
            .iter()
            .find(|geometry| geometry.series_index == series_index)
            .map(|geometry| geometry.points.clone())
            .unwrap_or_default())
    }

    /// Points near `point`, ordered by distance.
    ///
    /// On cartesian charts a pointer outside the draw margin finds nothing.
    pub fn points_at(
        &self,
        point: Vec2,
        strategy: FindingStrategy,
        purpose: FindPointFor,
    ) -> Result<Vec<HitResult>> {
        profile_function!();
        let state = self.inner.state.borrow();
        let measured = state.measured.as_ref().ok_or(ChartError::NotMeasured)?;
        if self.inner.kind == ChartKind::Cartesian && !measured.draw_margin.contains(point) {
            return Ok(Vec::new());
        }
        Ok(find_points(
            measured.series.iter().map(|geometry| geometry.hit_source()),
            point,
            strategy,
            purpose,
        ))
    }

    /// Visible visual elements under `point`.
    pub fn visuals_at(&self, point: Vec2) -> Vec<Rc<VisualElement>> {
        self.inner
            .visual_elements
            .borrow()
            .snapshot()
            .into_iter()
            .filter(|element| element.is_visible() && element.bounds().contains(point))
            .collect()
    }

    /// Points currently under the pointer.
    pub fn hovered_points(&self) -> Vec<HitResult> {
        self.inner.state.borrow().hovered.clone()
    }

    /// Data coordinate of a pixel, using the given X and Y axes.
    pub fn scale_pixels_to_data(
        &self,
        point: Vec2,
        x_axis: usize,
        y_axis: usize,
    ) -> Result<Coordinate> {
        Ok(self.cartesian_scalers(x_axis, y_axis)?.to_chart_values(point))
    }

    /// Pixel position of a data coordinate, using the given X and Y axes.
    pub fn scale_data_to_pixels(
        &self,
        coordinate: Coordinate,
        x_axis: usize,
        y_axis: usize,
    ) -> Result<Vec2> {
        Ok(self.cartesian_scalers(x_axis, y_axis)?.to_pixels(coordinate))
    }

    /// Angle and radius values at a pixel, using the given polar axes.
    pub fn scale_polar_pixels_to_data(
        &self,
        point: Vec2,
        angle_axis: usize,
        radius_axis: usize,
    ) -> Result<PolarCoordinate> {
        Ok(self
            .polar_scaler(angle_axis, radius_axis)?
            .to_chart_values(point))
    }

    /// Pixel position of an angle and radius value.
    pub fn scale_polar_data_to_pixels(
        &self,
        coordinate: PolarCoordinate,
        angle_axis: usize,
        radius_axis: usize,
    ) -> Result<Vec2> {
        Ok(self
            .polar_scaler(angle_axis, radius_axis)?
            .to_pixels(coordinate.angle, coordinate.radius))
    }

    fn cartesian_scalers(&self, x_axis: usize, y_axis: usize) -> Result<CartesianScalers> {
        self.require_kind(ChartKind::Cartesian, "cartesian scaling")?;
        let state = self.inner.state.borrow();
        let measured = state.measured.as_ref().ok_or(ChartError::NotMeasured)?;
        let MeasuredSpace::Cartesian { x, y } = &measured.space else {
            return Err(ChartError::NotMeasured);
        };
        Ok(CartesianScalers {
            x: *axis_entry(x, AxisOrientation::X, x_axis)?,
            y: *axis_entry(y, AxisOrientation::Y, y_axis)?,
        })
    }

    fn polar_scaler(&self, angle_axis: usize, radius_axis: usize) -> Result<PolarScaler> {
        self.require_kind(ChartKind::Polar, "polar scaling")?;
        let state = self.inner.state.borrow();
        let measured = state.measured.as_ref().ok_or(ChartError::NotMeasured)?;
        let MeasuredSpace::Polar { angle, radius } = &measured.space else {
            return Err(ChartError::NotMeasured);
        };
        let polar = self.inner.config.polar;
        PolarScaler::new(
            measured.draw_margin,
            *axis_entry(angle, AxisOrientation::X, angle_axis)?,
            *axis_entry(radius, AxisOrientation::Y, radius_axis)?,
            polar.inner_radius,
            polar.initial_rotation,
            polar.total_angle,
        )
    }

    fn require_kind(&self, kind: ChartKind, operation: &'static str) -> Result<()> {
        if self.inner.kind == kind {
            Ok(())
        } else {
            Err(ChartError::UnsupportedOperation {
                operation,
                kind: self.inner.kind,
            })
        }
    }

    /// Measure if needed, then paint one frame on `surface`.
    ///
    /// Called by the host in answer to a repaint request. A failing surface
    /// is logged and the frame is retried on the next loop iteration.
    pub fn draw_frame(&self, surface: &mut dyn DrawingSurface) {
        let inner = &*self.inner;
        if inner.disposed.get() {
            return;
        }
        // Close the profiler frame of the previous draw before opening scopes.
        lumen_core::profiling::new_frame();
        profile_function!();

        let now = inner.canvas.clock().now();
        if inner.dirty.get().needs_measure() {
            if inner.throttle_elapsed(now) {
                inner.measure(now);
            } else {
                tracing::trace!("Measure throttled");
            }
        }

        let stable = match inner.paint(surface, now) {
            Ok(settled) => {
                inner
                    .dirty
                    .set(inner.dirty.get() - ChartDirtyFlags::VISUALS_CHANGED);
                settled && !inner.dirty.get().needs_measure()
            }
            Err(err) => {
                tracing::warn!("Failed to paint chart frame, retrying: {}", err);
                false
            }
        };

        if stable {
            inner.canvas.set_visually_stable(true);
        } else {
            // Also restarts the loop when the host painted on its own.
            inner.canvas.invalidate();
        }
    }

    /// Detach from every observed object and stop the redraw loop. Later
    /// calls are no-ops, and so is any late event.
    pub fn dispose(&self) {
        self.inner.dispose();
    }
}

fn axis_entry<T>(entries: &[T], orientation: AxisOrientation, index: usize) -> Result<&T> {
    entries.get(index).ok_or(ChartError::AxisIndexOutOfRange {
        orientation,
        index,
        len: entries.len(),
    })
}

fn visible_count(axes: &[Rc<Axis>]) -> usize {
    axes.iter().filter(|axis| axis.is_visible()).count()
}

impl ChartInner {
    fn on_observed_change(&self, flags: ChartDirtyFlags) {
        if self.disposed.get() || !self.config.auto_update {
            return;
        }
        self.invalidate(flags);
    }

    fn invalidate(&self, flags: ChartDirtyFlags) {
        if self.disposed.get() {
            return;
        }
        self.dirty.set(self.dirty.get() | flags);
        self.canvas.invalidate();
    }

    fn replace_axes(
        &self,
        slot: &RefCell<Rc<ObservableCollection<Axis>>>,
        axes: Rc<ObservableCollection<Axis>>,
    ) {
        if self.disposed.get() {
            return;
        }
        let old = slot.replace(Rc::clone(&axes));
        self.axes_observer.unobserve(&old);
        self.axes_observer.observe(&axes);
        self.on_observed_change(ChartDirtyFlags::AXES_CHANGED);
    }

    fn throttle_elapsed(&self, now: Duration) -> bool {
        match self.state.borrow().last_measure {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.config.update_throttle,
        }
    }

    fn emit(&self, event: impl Fn(&dyn ChartListener)) {
        // Listeners may register listeners or mutate the chart.
        let listeners = self.listeners.borrow().clone();
        for listener in &listeners {
            event(listener.as_ref());
        }
    }

    fn measure(&self, now: Duration) {
        profile_function!();

        let flags = self.dirty.replace(ChartDirtyFlags::empty());
        self.emit(|listener| listener.measuring());
        self.emit(|listener| listener.update_started());

        let series = self.series.borrow().snapshot();
        let x_axes = self.x_axes.borrow().snapshot();
        let y_axes = self.y_axes.borrow().snapshot();

        let (control_size, previous) = {
            let state = self.state.borrow();
            let previous = state
                .measured
                .as_ref()
                .map(Measured::transition_cache)
                .unwrap_or_default();
            (state.control_size, previous)
        };

        let draw_margin = layout::draw_margin(
            &self.config,
            self.kind,
            control_size,
            visible_count(&x_axes),
            visible_count(&y_axes),
        );
        let ctx = MeasureContext {
            config: &self.config,
            draw_margin,
            now,
            previous: &previous,
        };
        let measured = match self.kind {
            ChartKind::Cartesian => cartesian::measure(&ctx, &series, &x_axes, &y_axes),
            ChartKind::Polar => polar::measure(&ctx, &series, &x_axes, &y_axes),
            ChartKind::Pie => pie::measure(&ctx, &series),
        };

        tracing::debug!(
            "Measured {:?} chart ({:?}): {} of {} series drawn in {:?}",
            self.kind,
            flags,
            measured.series.len(),
            series.len(),
            draw_margin
        );

        {
            let mut state = self.state.borrow_mut();
            state.measured = Some(measured);
            state.last_measure = Some(now);
        }
        self.measure_count.set(self.measure_count.get() + 1);
        self.emit(|listener| listener.update_finished());
    }

    /// Paint the frame at `now`. Returns whether every transition settled.
    fn paint(
        &self,
        surface: &mut dyn DrawingSurface,
        now: Duration,
    ) -> std::result::Result<bool, SurfaceError> {
        profile_function!();

        let state = self.state.borrow();
        let Some(measured) = state.measured.as_ref() else {
            return Ok(false);
        };

        surface.begin_frame(state.control_size)?;

        if self.kind == ChartKind::Cartesian {
            self.paint_axes(surface, measured.draw_margin)?;
        }

        let mut settled = true;
        let mut shapes: Vec<Shape> = Vec::new();
        for geometry in &measured.series {
            let layer = DrawLayer::Series(geometry.series_index);
            shapes.clear();
            for point in &geometry.points {
                settled &= point.is_settled(now);
                shapes.push(point.geometry_at(now));
            }

            let anchors: Vec<Vec2> = shapes.iter().map(Shape::anchor).collect();
            if let Some((outline, closed)) = geometry.path.outline(&anchors) {
                surface.draw_path(layer, &outline, closed)?;
            }

            for shape in &shapes {
                surface.draw_shape(layer, shape)?;
            }
        }

        for (index, element) in self.visual_elements.borrow().snapshot().iter().enumerate() {
            if element.is_visible() {
                surface.draw_shape(DrawLayer::VisualElement(index), &element.shape())?;
            }
        }

        surface.end_frame()?;
        Ok(settled)
    }

    /// X axes stack downwards from the bottom of the plot area, Y axes
    /// leftwards from its left edge.
    fn paint_axes(
        &self,
        surface: &mut dyn DrawingSurface,
        area: Rect,
    ) -> std::result::Result<(), SurfaceError> {
        let step = self.config.axis_size;
        let x_axes = self.x_axes.borrow().snapshot();
        for (position, (index, _)) in x_axes
            .iter()
            .enumerate()
            .filter(|(_, axis)| axis.is_visible())
            .enumerate()
        {
            let y = area.bottom() + position as f32 * step;
            surface.draw_path(
                DrawLayer::Axis {
                    vertical: false,
                    index,
                },
                &[Vec2::new(area.x, y), Vec2::new(area.right(), y)],
                false,
            )?;
        }

        let y_axes = self.y_axes.borrow().snapshot();
        for (position, (index, _)) in y_axes
            .iter()
            .enumerate()
            .filter(|(_, axis)| axis.is_visible())
            .enumerate()
        {
            let x = area.x - position as f32 * step;
            surface.draw_path(
                DrawLayer::Axis {
                    vertical: true,
                    index,
                },
                &[Vec2::new(x, area.y), Vec2::new(x, area.bottom())],
                false,
            )?;
        }
        Ok(())
    }

    fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        self.series_observer.dispose();
        self.axes_observer.dispose();
        self.visuals_observer.dispose();
        self.canvas.dispose();
        self.listeners.borrow_mut().clear();
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.hovered.clear();
            state.drag = None;
        }
        tracing::debug!("{:?} chart disposed", self.kind);
    }
}

impl Drop for ChartInner {
    fn drop(&mut self) {
        self.dispose();
    }
}

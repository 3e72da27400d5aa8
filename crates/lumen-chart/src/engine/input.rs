//! Pointer, wheel and pinch input.
//!
//! Hosts forward raw input in control pixels. Everything is ignored once the
//! chart is disposed.

use std::rc::Rc;

use glam::Vec2;

use crate::axis::{Axis, AxisOrientation, Bounds};
use crate::cache::ChartDirtyFlags;
use crate::hit_test::{FindPointFor, HitResult};
use crate::scaler::Scaler;
use crate::zoom::{ZoomAndPanMode, ZoomDirection, pan_bounds, zoom_bounds};

use super::measure::MeasuredSpace;
use super::{Chart, ChartKind};

fn along(point: Vec2, orientation: AxisOrientation) -> f32 {
    match orientation {
        AxisOrientation::X => point.x,
        AxisOrientation::Y => point.y,
    }
}

impl Chart {
    /// New control size in pixels.
    pub fn resize(&self, width: f32, height: f32) {
        let inner = &self.inner;
        if inner.disposed.get() {
            return;
        }
        let size = Vec2::new(width.max(0.0), height.max(0.0));
        {
            let mut state = inner.state.borrow_mut();
            if state.control_size == size {
                return;
            }
            state.control_size = size;
        }
        inner.invalidate(ChartDirtyFlags::BOUNDS_CHANGED);
    }

    /// A button went down. The primary button also starts a pan when zooming
    /// is enabled.
    pub fn pointer_down(&self, point: Vec2, is_secondary: bool) {
        let inner = &self.inner;
        if inner.disposed.get() {
            return;
        }
        if !is_secondary && self.can_zoom() {
            inner.state.borrow_mut().drag = Some(point);
        }

        let strategy = inner.config.finding_strategy;
        let points = self
            .points_at(point, strategy, FindPointFor::PointerDownEvent)
            .unwrap_or_default();
        if !points.is_empty() {
            inner.emit(|listener| listener.data_pointer_down(&points));
        }

        let elements = self.visuals_at(point);
        if !elements.is_empty() {
            inner.emit(|listener| listener.visual_elements_pointer_down(&elements));
        }
    }

    /// Pointer moved: pans while dragging, updates hovered points otherwise.
    pub fn pointer_move(&self, point: Vec2) {
        let inner = &self.inner;
        if inner.disposed.get() {
            return;
        }
        let drag = inner.state.borrow().drag;
        if let Some(from) = drag {
            if from != point {
                self.pan(from, point);
                inner.state.borrow_mut().drag = Some(point);
            }
            return;
        }

        let strategy = inner.config.finding_strategy;
        let hovered = self
            .points_at(point, strategy, FindPointFor::HoverEvent)
            .unwrap_or_default();
        self.set_hovered(hovered);
    }

    pub fn pointer_up(&self, _point: Vec2, _is_secondary: bool) {
        if self.inner.disposed.get() {
            return;
        }
        self.inner.state.borrow_mut().drag = None;
    }

    /// Pointer left the control: ends drags and clears hovered points.
    pub fn pointer_leave(&self) {
        if self.inner.disposed.get() {
            return;
        }
        self.inner.state.borrow_mut().drag = None;
        self.set_hovered(Vec::new());
    }

    /// Mouse wheel over `pivot`. Positive deltas zoom in.
    pub fn wheel(&self, pivot: Vec2, delta: f32) {
        if delta > 0.0 {
            self.zoom(pivot, ZoomDirection::ZoomIn);
        } else if delta < 0.0 {
            self.zoom(pivot, ZoomDirection::ZoomOut);
        }
    }

    /// Pinch gesture around `pivot`; `scale` above one zooms in.
    pub fn pinch(&self, pivot: Vec2, scale: f64) {
        self.zoom(pivot, ZoomDirection::ScaleFactor(scale));
    }

    /// Zoom the axes selected by `zoom_mode` around `pivot`. The new ranges
    /// are written to the axes as explicit limits.
    pub fn zoom(&self, pivot: Vec2, direction: ZoomDirection) {
        if !self.can_zoom() {
            return;
        }
        let Some(factor) = direction.span_factor(self.inner.config.zoom_speed) else {
            return;
        };
        let limits = self.axis_limits(|scaler, orientation| {
            let value = scaler.to_chart_values(along(pivot, orientation));
            zoom_bounds(scaler.bounds(), value, factor)
        });
        self.apply_limits(limits);
    }

    fn pan(&self, from: Vec2, to: Vec2) {
        if !self.can_zoom() {
            return;
        }
        let limits = self.axis_limits(|scaler, orientation| {
            let delta = scaler.to_chart_values(along(from, orientation))
                - scaler.to_chart_values(along(to, orientation));
            pan_bounds(scaler.bounds(), delta)
        });
        self.apply_limits(limits);
    }

    fn can_zoom(&self) -> bool {
        let inner = &self.inner;
        !inner.disposed.get()
            && inner.kind == ChartKind::Cartesian
            && !inner.config.zoom_mode.is_empty()
    }

    /// New bounds for every axis enabled by `zoom_mode`, from the scalers of
    /// the last measure.
    fn axis_limits(
        &self,
        update: impl Fn(&Scaler, AxisOrientation) -> Bounds,
    ) -> Vec<(Rc<Axis>, Bounds)> {
        let inner = &self.inner;
        let state = inner.state.borrow();
        let Some(MeasuredSpace::Cartesian { x, y }) =
            state.measured.as_ref().map(|measured| &measured.space)
        else {
            return Vec::new();
        };

        let mode = inner.config.zoom_mode;
        let mut limits = Vec::new();
        if mode.contains(ZoomAndPanMode::X) {
            let axes = inner.x_axes.borrow().snapshot();
            for (axis, scaler) in axes.into_iter().zip(x) {
                limits.push((axis, update(scaler, AxisOrientation::X)));
            }
        }
        if mode.contains(ZoomAndPanMode::Y) {
            let axes = inner.y_axes.borrow().snapshot();
            for (axis, scaler) in axes.into_iter().zip(y) {
                limits.push((axis, update(scaler, AxisOrientation::Y)));
            }
        }
        limits
    }

    fn apply_limits(&self, limits: Vec<(Rc<Axis>, Bounds)>) {
        if limits.is_empty() {
            return;
        }
        for (axis, bounds) in &limits {
            axis.set_limits(Some(bounds.min), Some(bounds.max));
        }
        tracing::trace!("Applied view limits to {} axes", limits.len());
        self.inner.invalidate(ChartDirtyFlags::VIEW_CHANGED);
    }

    fn set_hovered(&self, hovered: Vec<HitResult>) {
        let inner = &self.inner;
        let previous = {
            let mut state = inner.state.borrow_mut();
            let unchanged = state.hovered.len() == hovered.len()
                && state
                    .hovered
                    .iter()
                    .zip(&hovered)
                    .all(|(a, b)| a.key() == b.key());
            if unchanged {
                state.hovered = hovered;
                return;
            }
            std::mem::replace(&mut state.hovered, hovered.clone())
        };

        let left: Vec<HitResult> = previous
            .into_iter()
            .filter(|old| !hovered.iter().any(|new| new.key() == old.key()))
            .collect();
        inner.emit(|listener| listener.hovered_points_changed(&hovered, &left));
    }
}

//! Axes and their resolved value bounds.

use std::cell::{Cell, RefCell};

use crate::observe::{Notifier, Observable};

/// Direction an axis maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisOrientation {
    /// Horizontal axis (the angle axis on polar charts).
    X,
    /// Vertical axis (the radius axis on polar charts).
    Y,
}

/// Closed range of data values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range containing a single value.
    pub fn point(value: f64) -> Self {
        Self::new(value, value)
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// True when the range cannot be divided by (zero width or non-finite).
    pub fn is_degenerate(&self) -> bool {
        !self.min.is_finite() || !self.max.is_finite() || self.max == self.min
    }

    /// Grow to include `value`. Non-finite values are ignored.
    pub fn include(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Extend an optional range by `value`.
    pub fn extend(bounds: Option<Bounds>, value: f64) -> Option<Bounds> {
        if !value.is_finite() {
            return bounds;
        }
        match bounds {
            Some(mut bounds) => {
                bounds.include(value);
                Some(bounds)
            }
            None => Some(Bounds::point(value)),
        }
    }

    /// Replace a degenerate range by one of width `span` centered on its
    /// value. Non-finite ranges are centered on zero.
    pub fn or_centered(self, span: f64) -> Bounds {
        if !self.is_degenerate() {
            return self;
        }
        let center = if self.min.is_finite() {
            self.min
        } else if self.max.is_finite() {
            self.max
        } else {
            0.0
        };
        Bounds::new(center - span * 0.5, center + span * 0.5)
    }
}

/// One dimension of the data domain.
///
/// Axes are shared as `Rc<Axis>`; every setter notifies observers, which
/// invalidates the charts drawing with this axis.
#[derive(Debug)]
pub struct Axis {
    name: RefCell<String>,
    min_limit: Cell<Option<f64>>,
    max_limit: Cell<Option<f64>>,
    inverted: Cell<bool>,
    visible: Cell<bool>,
    notifier: Notifier,
}

impl Default for Axis {
    fn default() -> Self {
        Self::new()
    }
}

impl Axis {
    /// Auto-ranged, visible, non-inverted axis.
    pub fn new() -> Self {
        Self {
            name: RefCell::new(String::new()),
            min_limit: Cell::new(None),
            max_limit: Cell::new(None),
            inverted: Cell::new(false),
            visible: Cell::new(true),
            notifier: Notifier::new(),
        }
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        *self.name.borrow_mut() = name.into();
        self
    }

    pub fn with_limits(self, min: f64, max: f64) -> Self {
        self.min_limit.set(Some(min));
        self.max_limit.set(Some(max));
        self
    }

    pub fn with_inverted(self, inverted: bool) -> Self {
        self.inverted.set(inverted);
        self
    }

    pub fn with_visible(self, visible: bool) -> Self {
        self.visible.set(visible);
        self
    }

    pub fn name(&self) -> String {
        self.name.borrow().clone()
    }

    pub fn min_limit(&self) -> Option<f64> {
        self.min_limit.get()
    }

    pub fn max_limit(&self) -> Option<f64> {
        self.max_limit.get()
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted.get()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        *self.name.borrow_mut() = name.into();
        self.notifier.notify_property_changed("name");
    }

    pub fn set_min_limit(&self, min: Option<f64>) {
        self.min_limit.set(min);
        self.notifier.notify_property_changed("min_limit");
    }

    pub fn set_max_limit(&self, max: Option<f64>) {
        self.max_limit.set(max);
        self.notifier.notify_property_changed("max_limit");
    }

    /// Set both limits with a single notification.
    pub fn set_limits(&self, min: Option<f64>, max: Option<f64>) {
        self.min_limit.set(min);
        self.max_limit.set(max);
        self.notifier.notify_property_changed("limits");
    }

    pub fn set_inverted(&self, inverted: bool) {
        if self.inverted.replace(inverted) != inverted {
            self.notifier.notify_property_changed("inverted");
        }
    }

    pub fn set_visible(&self, visible: bool) {
        if self.visible.replace(visible) != visible {
            self.notifier.notify_property_changed("visible");
        }
    }

    /// Effective bounds: explicit limits win side by side, the rest comes
    /// from the data extent. With neither, the range collapses on zero and is
    /// widened later by the scaler fallback.
    pub fn resolve_bounds(&self, data: Option<Bounds>) -> Bounds {
        let data = data.unwrap_or(Bounds::point(0.0));
        Bounds::new(
            self.min_limit.get().unwrap_or(data.min),
            self.max_limit.get().unwrap_or(data.max),
        )
    }
}

impl Observable for Axis {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

//! Data-side types: mutable samples, coordinates and measured chart points.

use std::cell::Cell;

use lumen_core::Shape;

use crate::animation::Transition;
use crate::observe::{Notifier, Observable};
use std::time::Duration;

/// Position of a sample along the series' two axes.
///
/// `secondary` is the category (X for columns, the angle for polar series);
/// `primary` is the value (Y for columns, X for rows, the radius for polar
/// series).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub secondary: f64,
    pub primary: f64,
}

impl Coordinate {
    pub fn new(secondary: f64, primary: f64) -> Self {
        Self { secondary, primary }
    }
}

/// Baseline offset of a stacked sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StackedValue {
    /// Accumulated value of the preceding series in the stack.
    pub start: f64,
    /// `start` plus this sample's value.
    pub end: f64,
    /// Total of the stack this sample belongs to (same sign only).
    pub total: f64,
}

impl StackedValue {
    /// Share of the stack total covered by this sample.
    pub fn share(&self) -> f64 {
        if self.total == 0.0 {
            0.0
        } else {
            (self.end - self.start) / self.total
        }
    }
}

/// Mutable sample stored in a series' values.
///
/// A missing `x` means the sample's index is used; a missing `y` is a gap and
/// is not drawn.
#[derive(Debug, Default)]
pub struct ObservableValue {
    x: Cell<Option<f64>>,
    y: Cell<Option<f64>>,
    notifier: Notifier,
}

impl ObservableValue {
    /// Value positioned by its index.
    pub fn new(y: f64) -> Self {
        Self {
            x: Cell::new(None),
            y: Cell::new(Some(y)),
            notifier: Notifier::new(),
        }
    }

    /// Value with an explicit secondary coordinate.
    pub fn point(x: f64, y: f64) -> Self {
        Self {
            x: Cell::new(Some(x)),
            y: Cell::new(Some(y)),
            notifier: Notifier::new(),
        }
    }

    /// A gap.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn x(&self) -> Option<f64> {
        self.x.get()
    }

    pub fn y(&self) -> Option<f64> {
        self.y.get()
    }

    pub fn set_x(&self, x: Option<f64>) {
        if self.x.replace(x) != x {
            self.notifier.notify_property_changed("x");
        }
    }

    pub fn set_y(&self, y: Option<f64>) {
        if self.y.replace(y) != y {
            self.notifier.notify_property_changed("y");
        }
    }

    /// Shorthand for `set_y(Some(value))`.
    pub fn set_value(&self, value: f64) {
        self.set_y(Some(value));
    }

    /// Coordinate of this sample at `index`, or `None` for gaps.
    pub fn coordinate(&self, index: usize) -> Option<Coordinate> {
        let primary = self.y.get().filter(|y| y.is_finite())?;
        let secondary = self.x.get().unwrap_or(index as f64);
        Some(Coordinate::new(secondary, primary))
    }
}

impl Observable for ObservableValue {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

/// A sample after measuring: bound to its series and carrying its geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// Index of the owning series in the chart's series collection.
    pub series_index: usize,
    /// Index of the sample in the series' values.
    pub index: usize,
    pub coordinate: Coordinate,
    /// Set for stacked series.
    pub stacked: Option<StackedValue>,
    /// Final geometry once animations settle. Hit-testing uses this.
    pub geometry: Shape,
    pub(crate) transition: Transition,
}

impl ChartPoint {
    /// Geometry as drawn at `now`.
    pub fn geometry_at(&self, now: Duration) -> Shape {
        self.transition.value_at(now)
    }

    pub fn is_settled(&self, now: Duration) -> bool {
        self.transition.is_complete(now)
    }
}

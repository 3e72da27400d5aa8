//! Series: a named, observable sequence of values drawn with one geometry.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::hit_test::FindingStrategy;
use crate::observe::{CollectionDeepObserver, Notifier, Observable, ObservableCollection};
use crate::value::ObservableValue;

/// Geometry family of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesKind {
    /// Markers joined by a polyline.
    Line,
    /// Markers joined by steps: each value holds until the next sample.
    StepLine,
    /// Free markers.
    Scatter,
    /// Vertical bars.
    Column,
    /// Horizontal bars; values run along X.
    Row,
    /// Vertical bars stacked on the preceding stacked series.
    StackedColumn,
    /// Filled band between the stack start and end.
    StackedArea,
    /// Stacked band drawn with steps instead of straight segments.
    StackedStepArea,
    /// Markers on a polar chart, joined by a polyline.
    PolarLine,
    /// Pie slices.
    Pie,
}

impl SeriesKind {
    pub fn is_bar_like(&self) -> bool {
        matches!(
            self,
            SeriesKind::Column | SeriesKind::Row | SeriesKind::StackedColumn
        )
    }

    pub fn is_stacked(&self) -> bool {
        matches!(
            self,
            SeriesKind::StackedColumn | SeriesKind::StackedArea | SeriesKind::StackedStepArea
        )
    }

    /// Values are plotted along X instead of Y.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, SeriesKind::Row)
    }

    pub fn is_cartesian(&self) -> bool {
        !matches!(self, SeriesKind::PolarLine | SeriesKind::Pie)
    }

    /// Strategy `Automatic` stands for with this geometry.
    pub fn finding_strategy(&self) -> FindingStrategy {
        match self {
            SeriesKind::Line
            | SeriesKind::StepLine
            | SeriesKind::Column
            | SeriesKind::Row
            | SeriesKind::StackedColumn
            | SeriesKind::StackedArea
            | SeriesKind::StackedStepArea => FindingStrategy::NearestPrimary,
            SeriesKind::Scatter | SeriesKind::PolarLine => FindingStrategy::NearestBoth,
            SeriesKind::Pie => FindingStrategy::ExactMatch,
        }
    }
}

/// A series of values.
///
/// Changes to the values collection, or to any value inside it, are
/// re-raised as a `"values"` property change of the series, so chart
/// observers only need to watch series.
#[derive(Debug)]
pub struct Series {
    kind: SeriesKind,
    name: RefCell<String>,
    visible: Cell<bool>,
    geometry_size: Cell<f32>,
    max_bar_width: Cell<f32>,
    stack_group: Cell<usize>,
    x_axis_index: Cell<usize>,
    y_axis_index: Cell<usize>,
    values: RefCell<Rc<ObservableCollection<ObservableValue>>>,
    values_observer: Rc<CollectionDeepObserver>,
    notifier: Notifier,
}

impl Series {
    /// Empty series of the given kind.
    pub fn new(kind: SeriesKind) -> Rc<Self> {
        SeriesBuilder::new(kind).build()
    }

    pub fn builder(kind: SeriesKind) -> SeriesBuilder {
        SeriesBuilder::new(kind)
    }

    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    pub fn name(&self) -> String {
        self.name.borrow().clone()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Marker diameter in pixels.
    pub fn geometry_size(&self) -> f32 {
        self.geometry_size.get()
    }

    pub fn max_bar_width(&self) -> f32 {
        self.max_bar_width.get()
    }

    pub fn stack_group(&self) -> usize {
        self.stack_group.get()
    }

    /// Index of the X (or angle) axis this series scales against.
    pub fn x_axis_index(&self) -> usize {
        self.x_axis_index.get()
    }

    /// Index of the Y (or radius) axis this series scales against.
    pub fn y_axis_index(&self) -> usize {
        self.y_axis_index.get()
    }

    pub fn values(&self) -> Rc<ObservableCollection<ObservableValue>> {
        self.values.borrow().clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        *self.name.borrow_mut() = name.into();
        self.notifier.notify_property_changed("name");
    }

    pub fn set_visible(&self, visible: bool) {
        if self.visible.replace(visible) != visible {
            self.notifier.notify_property_changed("visible");
        }
    }

    pub fn set_geometry_size(&self, size: f32) {
        self.geometry_size.set(size);
        self.notifier.notify_property_changed("geometry_size");
    }

    pub fn set_max_bar_width(&self, width: f32) {
        self.max_bar_width.set(width);
        self.notifier.notify_property_changed("max_bar_width");
    }

    pub fn set_stack_group(&self, group: usize) {
        self.stack_group.set(group);
        self.notifier.notify_property_changed("stack_group");
    }

    pub fn set_x_axis_index(&self, index: usize) {
        self.x_axis_index.set(index);
        self.notifier.notify_property_changed("x_axis_index");
    }

    pub fn set_y_axis_index(&self, index: usize) {
        self.y_axis_index.set(index);
        self.notifier.notify_property_changed("y_axis_index");
    }

    /// Swap the values collection. The previous one is fully released.
    pub fn set_values(&self, values: Rc<ObservableCollection<ObservableValue>>) {
        let previous = self.values.replace(values.clone());
        self.values_observer.unobserve(&previous);
        self.values_observer.observe(&values);
        self.notifier.notify_property_changed("values");
    }
}

impl Observable for Series {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

/// Builder for [`Series`].
#[derive(Debug)]
pub struct SeriesBuilder {
    kind: SeriesKind,
    name: String,
    visible: bool,
    geometry_size: f32,
    max_bar_width: f32,
    stack_group: usize,
    x_axis_index: usize,
    y_axis_index: usize,
    values: Option<Rc<ObservableCollection<ObservableValue>>>,
}

impl SeriesBuilder {
    pub fn new(kind: SeriesKind) -> Self {
        Self {
            kind,
            name: String::new(),
            visible: true,
            geometry_size: 8.0,
            max_bar_width: 50.0,
            stack_group: 0,
            x_axis_index: 0,
            y_axis_index: 0,
            values: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn geometry_size(mut self, size: f32) -> Self {
        self.geometry_size = size;
        self
    }

    pub fn max_bar_width(mut self, width: f32) -> Self {
        self.max_bar_width = width;
        self
    }

    pub fn stack_group(mut self, group: usize) -> Self {
        self.stack_group = group;
        self
    }

    pub fn axes(mut self, x_axis_index: usize, y_axis_index: usize) -> Self {
        self.x_axis_index = x_axis_index;
        self.y_axis_index = y_axis_index;
        self
    }

    /// Values positioned by index.
    pub fn values(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.values = Some(Rc::new(ObservableCollection::from_items(
            values.into_iter().map(ObservableValue::new),
        )));
        self
    }

    /// Values with explicit secondary coordinates.
    pub fn points(mut self, points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        self.values = Some(Rc::new(ObservableCollection::from_items(
            points.into_iter().map(|(x, y)| ObservableValue::point(x, y)),
        )));
        self
    }

    /// Use an existing, possibly shared, values collection.
    pub fn collection(mut self, values: Rc<ObservableCollection<ObservableValue>>) -> Self {
        self.values = Some(values);
        self
    }

    pub fn build(self) -> Rc<Series> {
        let values = self.values.unwrap_or_default();
        Rc::new_cyclic(|this: &std::rc::Weak<Series>| {
            let this = this.clone();
            let values_observer = CollectionDeepObserver::new(move || {
                if let Some(series) = this.upgrade() {
                    series.notifier.notify_property_changed("values");
                }
            });
            values_observer.observe(&values);

            Series {
                kind: self.kind,
                name: RefCell::new(self.name),
                visible: Cell::new(self.visible),
                geometry_size: Cell::new(self.geometry_size),
                max_bar_width: Cell::new(self.max_bar_width),
                stack_group: Cell::new(self.stack_group),
                x_axis_index: Cell::new(self.x_axis_index),
                y_axis_index: Cell::new(self.y_axis_index),
                values: RefCell::new(values),
                values_observer,
                notifier: Notifier::new(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::ChangeObserver;
    use crate::observe::{CollectionChange, PropertyChange};
    use std::rc::Weak;

    #[derive(Default)]
    struct Recorder {
        properties: RefCell<Vec<&'static str>>,
    }

    impl ChangeObserver for Recorder {
        fn on_items_changed(&self, _change: &CollectionChange) {}

        fn on_item_property_changed(&self, change: &PropertyChange) {
            self.properties.borrow_mut().push(change.property);
        }
    }

    fn attach(series: &Series) -> Rc<Recorder> {
        let recorder = Rc::new(Recorder::default());
        let weak = Rc::downgrade(&recorder) as Weak<dyn ChangeObserver>;
        series
            .notifier()
            .subscribe(crate::observe::ObserverId::next(), weak);
        recorder
    }

    #[test]
    fn test_value_changes_surface_as_series_property() {
        let series = Series::builder(SeriesKind::Line).values([1.0, 2.0]).build();
        let recorder = attach(&series);

        series.values().push(ObservableValue::new(3.0));
        let first = series.values().get(0).unwrap();
        first.set_value(10.0);

        assert_eq!(*recorder.properties.borrow(), vec!["values", "values"]);
    }

    #[test]
    fn test_set_values_releases_previous_collection() {
        let series = Series::builder(SeriesKind::Column).values([1.0]).build();
        let previous = series.values();
        let old_value = previous.get(0).unwrap();
        assert_eq!(previous.notifier().observer_count(), 1);

        series.set_values(Rc::new(ObservableCollection::from_items([
            ObservableValue::new(5.0),
        ])));

        assert_eq!(previous.notifier().observer_count(), 0);
        assert_eq!(old_value.notifier().observer_count(), 0);
        assert_eq!(series.values().notifier().observer_count(), 1);
    }

    #[test]
    fn test_automatic_strategy_per_kind() {
        assert_eq!(
            SeriesKind::Column.finding_strategy(),
            FindingStrategy::NearestPrimary
        );
        assert_eq!(
            SeriesKind::Scatter.finding_strategy(),
            FindingStrategy::NearestBoth
        );
        assert_eq!(SeriesKind::Pie.finding_strategy(), FindingStrategy::ExactMatch);
    }
}

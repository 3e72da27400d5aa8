//! Chart notifications for hosts.

use std::rc::Rc;

use crate::hit_test::HitResult;
use crate::visual::VisualElement;

/// Receives chart events. Every method has an empty default.
///
/// Listeners run on the UI thread, outside any internal borrow, so they may
/// freely mutate series or axes; such changes schedule another measure.
pub trait ChartListener {
    /// A measure pass is about to start.
    fn measuring(&self) {}

    /// Geometry is about to be recomputed.
    fn update_started(&self) {}

    /// Geometry for the new state is ready.
    fn update_finished(&self) {}

    /// The primary or secondary button went down over chart points.
    fn data_pointer_down(&self, _points: &[HitResult]) {}

    /// The set of hovered points changed. `left` holds the points that are
    /// no longer hovered.
    fn hovered_points_changed(&self, _hovered: &[HitResult], _left: &[HitResult]) {}

    /// The pointer went down over visual elements.
    fn visual_elements_pointer_down(&self, _elements: &[Rc<VisualElement>]) {}
}

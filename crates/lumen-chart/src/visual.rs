//! Free-standing visual elements placed in pixel space.

use std::cell::{Cell, RefCell};

use lumen_core::{Rect, Shape};

use crate::observe::{Notifier, Observable};

/// A named rectangle drawn on top of the series, such as a marker or a
/// highlighted region. Pointer-down events report the elements hit.
#[derive(Debug)]
pub struct VisualElement {
    name: RefCell<String>,
    bounds: Cell<Rect>,
    visible: Cell<bool>,
    notifier: Notifier,
}

impl VisualElement {
    pub fn new(name: impl Into<String>, bounds: Rect) -> Self {
        Self {
            name: RefCell::new(name.into()),
            bounds: Cell::new(bounds),
            visible: Cell::new(true),
            notifier: Notifier::new(),
        }
    }

    pub fn name(&self) -> String {
        self.name.borrow().clone()
    }

    pub fn bounds(&self) -> Rect {
        self.bounds.get()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn shape(&self) -> Shape {
        Shape::Rect(self.bounds.get())
    }

    pub fn set_bounds(&self, bounds: Rect) {
        if self.bounds.replace(bounds) != bounds {
            self.notifier.notify_property_changed("bounds");
        }
    }

    pub fn set_visible(&self, visible: bool) {
        if self.visible.replace(visible) != visible {
            self.notifier.notify_property_changed("visible");
        }
    }
}

impl Observable for VisualElement {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

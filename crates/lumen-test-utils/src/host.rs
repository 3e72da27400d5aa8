//! Repaint host that counts requests.

use std::rc::Rc;

use lumen_core::RepaintHost;
use parking_lot::Mutex;

type RepaintCallback = Rc<dyn Fn()>;

/// Host recording repaint requests.
///
/// An optional callback runs on every request, which is how tests paint
/// frames synchronously, the way a UI framework would on its next paint.
#[derive(Default)]
pub struct RecordingHost {
    repaints: Mutex<u64>,
    on_repaint: Mutex<Option<RepaintCallback>>,
}

impl std::fmt::Debug for RecordingHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingHost")
            .field("repaints", &*self.repaints.lock())
            .field("has_callback", &self.on_repaint.lock().is_some())
            .finish()
    }
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of repaints requested so far.
    pub fn repaint_count(&self) -> u64 {
        *self.repaints.lock()
    }

    pub fn set_on_repaint(&self, callback: Rc<dyn Fn()>) {
        *self.on_repaint.lock() = Some(callback);
    }

    pub fn clear_on_repaint(&self) {
        *self.on_repaint.lock() = None;
    }
}

impl RepaintHost for RecordingHost {
    fn request_repaint(&self) {
        *self.repaints.lock() += 1;
        // Released before calling: the callback may replace itself.
        let callback = self.on_repaint.lock().clone();
        if let Some(callback) = callback {
            callback();
        }
    }
}

//! Frame clock driven by the test.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use futures_lite::future::{self, BoxedLocal};
use lumen_core::FrameClock;

/// Clock whose time only moves on [`advance`](ManualClock::advance) or when
/// a frame delay is awaited.
///
/// Awaiting `delay(interval)` moves time forward by `interval` and yields
/// once, so a redraw loop makes progress one executor tick per frame without
/// any real waiting. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    elapsed: Rc<Cell<Duration>>,
    delays: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }

    /// Number of frame delays requested so far.
    pub fn delay_count(&self) -> u64 {
        self.delays.get()
    }
}

impl FrameClock for ManualClock {
    fn now(&self) -> Duration {
        self.elapsed.get()
    }

    fn delay(&self, interval: Duration) -> BoxedLocal<()> {
        self.delays.set(self.delays.get() + 1);
        let elapsed = Rc::clone(&self.elapsed);
        Box::pin(async move {
            future::yield_now().await;
            elapsed.set(elapsed.get() + interval);
        })
    }
}

//! UI-thread task execution and frame pacing.

use std::future::Future;
use std::rc::Rc;
use std::time::{Duration, Instant};

use async_executor::{LocalExecutor, Task};
use futures_lite::future::{self, BoxedLocal};
use lumen_core::FrameClock;

/// Single-threaded executor the redraw loops run on.
///
/// Cloning shares the executor. The host drives it from its UI thread, either
/// by ticking it from its event loop or with [`UiRuntime::block_on`].
///
/// # Example
///
/// ```ignore
/// let runtime = UiRuntime::new();
/// let task = runtime.spawn(async { 42 });
/// assert_eq!(runtime.block_on(task), 42);
/// ```
#[derive(Clone, Default)]
pub struct UiRuntime {
    executor: Rc<LocalExecutor<'static>>,
}

impl std::fmt::Debug for UiRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiRuntime").finish_non_exhaustive()
    }
}

impl UiRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a task on the UI thread.
    pub fn spawn<T: 'static>(&self, future: impl Future<Output = T> + 'static) -> Task<T> {
        self.executor.spawn(future)
    }

    /// Run one ready task. Returns false when nothing was ready.
    pub fn try_tick(&self) -> bool {
        self.executor.try_tick()
    }

    /// Run ready tasks until none is left, returning how many polls ran.
    pub fn run_until_stalled(&self) -> usize {
        let mut ticks = 0;
        while self.executor.try_tick() {
            ticks += 1;
        }
        ticks
    }

    /// Run at most `max` ready tasks.
    pub fn run_ticks(&self, max: usize) -> usize {
        let mut ticks = 0;
        while ticks < max && self.executor.try_tick() {
            ticks += 1;
        }
        ticks
    }

    /// Drive the executor until `future` completes.
    pub fn block_on<T>(&self, future: impl Future<Output = T>) -> T {
        future::block_on(self.executor.run(future))
    }
}

/// Wall-clock [`FrameClock`] backed by `async-io` timers.
#[derive(Debug, Clone, Copy)]
pub struct TimerClock {
    origin: Instant,
}

impl Default for TimerClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl FrameClock for TimerClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn delay(&self, interval: Duration) -> BoxedLocal<()> {
        Box::pin(async move {
            async_io::Timer::after(interval).await;
        })
    }
}

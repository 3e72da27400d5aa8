//! Motion canvas: the redraw loop of one chart.
//!
//! The canvas is `Idle` until something invalidates it. It then spawns a
//! single loop task that asks the host for a repaint, waits one frame
//! interval, and repeats until the scene reports visually stable or the canvas
//! is disposed. Invalidations while the loop runs only clear the stable flag;
//! they never start a second loop.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use lumen_core::{FrameClock, RepaintHost};

use crate::runtime::UiRuntime;

/// Redraw loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasState {
    /// No loop running.
    Idle,
    /// A loop is requesting frames.
    Looping,
}

pub struct MotionCanvas {
    this: Weak<MotionCanvas>,
    runtime: UiRuntime,
    host: Rc<dyn RepaintHost>,
    clock: Rc<dyn FrameClock>,
    frame_interval: Duration,
    state: Cell<CanvasState>,
    stable: Cell<bool>,
    disposed: Cell<bool>,
    loop_starts: Cell<u64>,
    repaint_requests: Cell<u64>,
}

impl fmt::Debug for MotionCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionCanvas")
            .field("state", &self.state.get())
            .field("stable", &self.stable.get())
            .field("disposed", &self.disposed.get())
            .field("frame_interval", &self.frame_interval)
            .field("loop_starts", &self.loop_starts.get())
            .finish()
    }
}

impl MotionCanvas {
    pub fn new(
        runtime: UiRuntime,
        host: Rc<dyn RepaintHost>,
        clock: Rc<dyn FrameClock>,
        frame_interval: Duration,
    ) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            runtime,
            host,
            clock,
            frame_interval,
            state: Cell::new(CanvasState::Idle),
            stable: Cell::new(true),
            disposed: Cell::new(false),
            loop_starts: Cell::new(0),
            repaint_requests: Cell::new(0),
        })
    }

    pub fn state(&self) -> CanvasState {
        self.state.get()
    }

    pub fn is_visually_stable(&self) -> bool {
        self.stable.get()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Number of loops started over the canvas' lifetime.
    pub fn loop_start_count(&self) -> u64 {
        self.loop_starts.get()
    }

    /// Number of repaints requested from the host.
    pub fn repaint_request_count(&self) -> u64 {
        self.repaint_requests.get()
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn clock(&self) -> &Rc<dyn FrameClock> {
        &self.clock
    }

    /// Mark the scene as changed and make sure a loop is running.
    pub fn invalidate(&self) {
        if self.disposed.get() {
            return;
        }
        self.stable.set(false);
        self.start_loop();
    }

    /// Reported by the chart after each painted frame.
    pub(crate) fn set_visually_stable(&self, stable: bool) {
        self.stable.set(stable);
    }

    /// Stop requesting frames. A running loop exits at its next checkpoint.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        tracing::debug!("Motion canvas disposed");
    }

    fn start_loop(&self) {
        if self.state.get() == CanvasState::Looping {
            return;
        }
        self.state.set(CanvasState::Looping);
        self.loop_starts.set(self.loop_starts.get() + 1);
        tracing::debug!(
            "Starting drawing loop #{} at {:?} per frame",
            self.loop_starts.get(),
            self.frame_interval
        );
        self.runtime
            .spawn(run_drawing_loop(self.this.clone()))
            .detach();
    }
}

async fn run_drawing_loop(canvas: Weak<MotionCanvas>) {
    loop {
        let Some(canvas) = canvas.upgrade() else {
            return;
        };
        if canvas.disposed.get() || canvas.stable.get() {
            canvas.state.set(CanvasState::Idle);
            tracing::debug!(
                "Drawing loop stopped after {} repaint requests",
                canvas.repaint_requests.get()
            );
            return;
        }

        canvas.repaint_requests.set(canvas.repaint_requests.get() + 1);
        tracing::trace!("Requesting repaint");
        canvas.host.request_repaint();

        let delay = canvas.clock.delay(canvas.frame_interval);
        // Only the weak handle lives across the suspension point.
        drop(canvas);
        delay.await;
    }
}

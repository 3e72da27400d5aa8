//! Collaborators supplied by the host UI framework.

use std::time::Duration;

use futures_lite::future::BoxedLocal;

/// Receives repaint requests from a chart's redraw loop.
///
/// Called on the UI thread. The host is expected to answer with a call to the
/// chart's `draw_frame` during its next paint.
pub trait RepaintHost {
    fn request_repaint(&self);
}

/// Time source and frame pacing for the redraw loop.
pub trait FrameClock {
    /// Time elapsed since the clock was created.
    fn now(&self) -> Duration;

    /// Future that completes after `interval`. This is the loop's only
    /// suspension point.
    fn delay(&self, interval: Duration) -> BoxedLocal<()>;
}

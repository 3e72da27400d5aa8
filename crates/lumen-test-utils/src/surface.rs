//! Drawing surface that records commands instead of painting.

use std::sync::Arc;

use lumen_core::{DrawLayer, DrawingSurface, Shape, SurfaceError, Vec2};
use parking_lot::Mutex;

/// One recorded drawing command.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    BeginFrame {
        size: Vec2,
    },
    Shape {
        layer: DrawLayer,
        shape: Shape,
    },
    Path {
        layer: DrawLayer,
        points: Vec<Vec2>,
        closed: bool,
    },
    EndFrame,
}

#[derive(Debug, Default)]
struct Log {
    calls: Vec<SurfaceCall>,
    pending_failures: usize,
    failed_frames: usize,
}

/// Surface recording every call.
///
/// Clones share the same log, so a test can keep one handle for assertions
/// and hand clones to the code under test.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    log: Arc<Mutex<Log>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `frames` calls to `begin_frame` fail with
    /// [`SurfaceError::Lost`].
    pub fn fail_next_frames(&self, frames: usize) {
        self.log.lock().pending_failures = frames;
    }

    /// Copy of every recorded call.
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.log.lock().calls.clone()
    }

    pub fn clear(&self) {
        self.log.lock().calls.clear();
    }

    /// Frames that completed with `end_frame`.
    pub fn frame_count(&self) -> usize {
        self.log
            .lock()
            .calls
            .iter()
            .filter(|call| matches!(call, SurfaceCall::EndFrame))
            .count()
    }

    /// Frames rejected by an injected failure.
    pub fn failed_frame_count(&self) -> usize {
        self.log.lock().failed_frames
    }

    /// Calls of the most recent frame, `BeginFrame` excluded.
    pub fn last_frame(&self) -> Vec<SurfaceCall> {
        let log = self.log.lock();
        let start = log
            .calls
            .iter()
            .rposition(|call| matches!(call, SurfaceCall::BeginFrame { .. }))
            .map_or(0, |index| index + 1);
        log.calls[start..].to_vec()
    }

    /// Shapes painted in the most recent frame.
    pub fn last_frame_shapes(&self) -> Vec<(DrawLayer, Shape)> {
        self.last_frame()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Shape { layer, shape } => Some((layer, shape)),
                _ => None,
            })
            .collect()
    }

    /// Paths painted in the most recent frame.
    pub fn last_frame_paths(&self) -> Vec<(DrawLayer, Vec<Vec2>, bool)> {
        self.last_frame()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Path {
                    layer,
                    points,
                    closed,
                } => Some((layer, points, closed)),
                _ => None,
            })
            .collect()
    }
}

impl DrawingSurface for RecordingSurface {
    fn begin_frame(&mut self, size: Vec2) -> Result<(), SurfaceError> {
        let mut log = self.log.lock();
        if log.pending_failures > 0 {
            log.pending_failures -= 1;
            log.failed_frames += 1;
            return Err(SurfaceError::Lost);
        }
        log.calls.push(SurfaceCall::BeginFrame { size });
        Ok(())
    }

    fn draw_shape(&mut self, layer: DrawLayer, shape: &Shape) -> Result<(), SurfaceError> {
        self.log.lock().calls.push(SurfaceCall::Shape {
            layer,
            shape: *shape,
        });
        Ok(())
    }

    fn draw_path(
        &mut self,
        layer: DrawLayer,
        points: &[Vec2],
        closed: bool,
    ) -> Result<(), SurfaceError> {
        self.log.lock().calls.push(SurfaceCall::Path {
            layer,
            points: points.to_vec(),
            closed,
        });
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), SurfaceError> {
        self.log.lock().calls.push(SurfaceCall::EndFrame);
        Ok(())
    }
}

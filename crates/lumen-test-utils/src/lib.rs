//! Test utilities for Lumen charts.
//!
//! Charts talk to their host through three seams: a
//! [`DrawingSurface`](lumen_core::DrawingSurface), a
//! [`RepaintHost`](lumen_core::RepaintHost) and a
//! [`FrameClock`](lumen_core::FrameClock). This crate provides recording or
//! manually driven versions of each so tests can run the whole redraw loop
//! deterministically.
//!
//! - [`RecordingSurface`] - records every drawing command; can fail frames on
//!   demand
//! - [`RecordingHost`] - counts repaint requests and optionally paints in
//!   response
//! - [`ManualClock`] - time only moves when the test or the redraw loop says
//!   so
//!
//! # Example
//!
//! ```rust
//! use lumen_core::{DrawLayer, DrawingSurface, Shape, Vec2};
//! use lumen_test_utils::RecordingSurface;
//!
//! let log = RecordingSurface::new();
//! let mut surface = log.clone();
//! surface.begin_frame(Vec2::new(10.0, 10.0)).unwrap();
//! surface
//!     .draw_shape(DrawLayer::Series(0), &Shape::Circle { center: Vec2::ZERO, radius: 1.0 })
//!     .unwrap();
//! surface.end_frame().unwrap();
//!
//! assert_eq!(log.frame_count(), 1);
//! assert_eq!(log.last_frame_shapes().len(), 1);
//! ```

pub mod clock;
pub mod host;
pub mod surface;

pub use clock::ManualClock;
pub use host::RecordingHost;
pub use surface::{RecordingSurface, SurfaceCall};

//! Lumen Chart
//!
//! Chart engine core: turns observed data into animated geometry and paints
//! it on a host-provided [`DrawingSurface`](lumen_core::DrawingSurface).
//!
//! # Overview
//!
//! - [`scaler`] and [`polar`]: data to pixel mappings
//! - [`observe`]: change notification for series, values, axes and visual
//!   elements
//! - [`canvas`]: the redraw loop that asks the host for frames while the
//!   scene is animating
//! - [`hit_test`]: finding points under the pointer
//! - [`engine`]: cartesian, polar and pie charts tying it all together
//!
//! # Example
//!
//! ```ignore
//! use lumen_chart::prelude::*;
//!
//! let values = Series::builder(SeriesKind::Line).values([3.0, 1.0, 4.0]).build();
//! let chart = Chart::cartesian()
//!     .host(host)
//!     .series(values.clone())
//!     .size(640.0, 480.0)
//!     .build()?;
//!
//! // Later, on the UI thread:
//! values.values().push(ObservableValue::new(1.5));
//! chart.runtime().run_until_stalled();
//! ```
//!
//! The engine is single-threaded: charts, series and axes are `!Send` and
//! live on the UI thread together with the [`UiRuntime`] driving them.

pub mod animation;
pub mod axis;
pub mod cache;
pub mod canvas;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod hit_test;
pub mod observe;
pub mod polar;
pub mod runtime;
pub mod scaler;
pub mod series;
pub mod stacker;
pub mod value;
pub mod visual;
pub mod zoom;

pub use animation::{EasingFunction, Transition};
pub use axis::{Axis, AxisOrientation, Bounds};
pub use canvas::{CanvasState, MotionCanvas};
pub use config::{ChartConfig, LegendPosition, PieConfig, PolarConfig, RenderBackend};
pub use engine::{Chart, ChartBuilder, ChartKind, WeakChart};
pub use error::{ChartError, Result};
pub use events::ChartListener;
pub use hit_test::{FindPointFor, FindingStrategy, HitResult};
pub use observe::{CollectionDeepObserver, Observable, ObservableCollection};
pub use polar::{PolarCoordinate, PolarScaler};
pub use runtime::{TimerClock, UiRuntime};
pub use scaler::{Scalable, Scaler};
pub use series::{Series, SeriesBuilder, SeriesKind};
pub use value::{ChartPoint, Coordinate, ObservableValue, StackedValue};
pub use visual::VisualElement;
pub use zoom::{ZoomAndPanMode, ZoomDirection};

/// Everything needed to build and drive a chart.
pub mod prelude {
    pub use crate::{
        Axis, Chart, ChartConfig, ChartKind, ChartListener, Coordinate, EasingFunction,
        FindPointFor, FindingStrategy, HitResult, ObservableCollection, ObservableValue, Series,
        SeriesKind, UiRuntime, VisualElement, ZoomAndPanMode, ZoomDirection,
    };
    pub use lumen_core::{DrawLayer, DrawingSurface, Margin, Rect, Shape, Vec2};
}

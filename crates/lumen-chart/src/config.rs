//! Chart configuration.
//!
//! Everything is passed explicitly at construction; there is no global
//! settings object.

use std::time::Duration;

use lumen_core::Margin;

use crate::animation::EasingFunction;
use crate::error::{ChartError, Result};
use crate::hit_test::FindingStrategy;
use crate::zoom::ZoomAndPanMode;

/// Kind of surface the host paints on; picks the default frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderBackend {
    #[default]
    Gpu,
    Software,
}

impl RenderBackend {
    pub fn default_fps(&self) -> f64 {
        match self {
            RenderBackend::Gpu => 90.0,
            RenderBackend::Software => 30.0,
        }
    }
}

/// Side of the control reserved for the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendPosition {
    #[default]
    Hidden,
    Left,
    Top,
    Right,
    Bottom,
}

/// Layout of polar charts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarConfig {
    /// Radius of the hole in the middle, in pixels.
    pub inner_radius: f64,
    /// Screen angle of the angle axis' minimum, in degrees.
    pub initial_rotation: f64,
    /// Sweep covered by the angle axis, in `(0, 360]` degrees.
    pub total_angle: f64,
}

impl Default for PolarConfig {
    fn default() -> Self {
        Self {
            inner_radius: 0.0,
            initial_rotation: -90.0,
            total_angle: 360.0,
        }
    }
}

/// Layout of pie charts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieConfig {
    /// Radius of the hole in the middle (doughnut charts), in pixels.
    pub inner_radius: f64,
    /// Screen angle of the first slice, in degrees.
    pub initial_rotation: f64,
    /// Sweep covered by all slices together, in `(0, 360]` degrees.
    pub max_angle: f64,
}

impl Default for PieConfig {
    fn default() -> Self {
        Self {
            inner_radius: 0.0,
            initial_rotation: -90.0,
            max_angle: 360.0,
        }
    }
}

/// Options recognized by the chart engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    /// Frames per second the redraw loop aims for while animating.
    pub target_fps: f64,
    /// Length of geometry transitions. Zero disables animations.
    pub animation_duration: Duration,
    pub easing: EasingFunction,
    /// Axes affected by wheel zoom and drag panning.
    pub zoom_mode: ZoomAndPanMode,
    /// Fraction of the visible range removed per zoom-in step, in `(0, 1)`.
    pub zoom_speed: f64,
    /// Strategy used by pointer events.
    pub finding_strategy: FindingStrategy,
    /// Minimum time between two measure passes.
    pub update_throttle: Duration,
    /// When false, only explicit `update()` calls schedule a measure.
    pub auto_update: bool,
    /// Fixed draw margin. `None` reserves space for axes and legend.
    pub draw_margin: Option<Margin>,
    /// Pixels reserved per visible axis.
    pub axis_size: f32,
    pub legend_position: LegendPosition,
    /// Pixels reserved for the legend when it is shown.
    pub legend_size: f32,
    pub polar: PolarConfig,
    pub pie: PieConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::for_backend(RenderBackend::Gpu)
    }
}

impl ChartConfig {
    /// Defaults tuned for a rendering backend.
    pub fn for_backend(backend: RenderBackend) -> Self {
        Self {
            target_fps: backend.default_fps(),
            animation_duration: Duration::from_millis(800),
            easing: EasingFunction::CubicOut,
            zoom_mode: ZoomAndPanMode::empty(),
            zoom_speed: 0.2,
            finding_strategy: FindingStrategy::Automatic,
            update_throttle: Duration::from_millis(50),
            auto_update: true,
            draw_margin: None,
            axis_size: 30.0,
            legend_position: LegendPosition::Hidden,
            legend_size: 120.0,
            polar: PolarConfig::default(),
            pie: PieConfig::default(),
        }
    }

    pub fn with_target_fps(mut self, fps: f64) -> Self {
        self.target_fps = fps;
        self
    }

    pub fn with_animation(mut self, duration: Duration, easing: EasingFunction) -> Self {
        self.animation_duration = duration;
        self.easing = easing;
        self
    }

    /// Disable transitions: geometry jumps to its target.
    pub fn without_animations(mut self) -> Self {
        self.animation_duration = Duration::ZERO;
        self
    }

    pub fn with_zoom(mut self, mode: ZoomAndPanMode, speed: f64) -> Self {
        self.zoom_mode = mode;
        self.zoom_speed = speed;
        self
    }

    pub fn with_finding_strategy(mut self, strategy: FindingStrategy) -> Self {
        self.finding_strategy = strategy;
        self
    }

    pub fn with_update_throttle(mut self, throttle: Duration) -> Self {
        self.update_throttle = throttle;
        self
    }

    pub fn with_auto_update(mut self, enabled: bool) -> Self {
        self.auto_update = enabled;
        self
    }

    pub fn with_draw_margin(mut self, margin: Margin) -> Self {
        self.draw_margin = Some(margin);
        self
    }

    pub fn with_axis_size(mut self, size: f32) -> Self {
        self.axis_size = size;
        self
    }

    pub fn with_legend(mut self, position: LegendPosition, size: f32) -> Self {
        self.legend_position = position;
        self.legend_size = size;
        self
    }

    pub fn with_polar(mut self, polar: PolarConfig) -> Self {
        self.polar = polar;
        self
    }

    pub fn with_pie(mut self, pie: PieConfig) -> Self {
        self.pie = pie;
        self
    }

    /// Delay between two frames of the redraw loop.
    ///
    /// A rate [`validate`](Self::validate) would reject yields [`Duration::MAX`].
    pub fn frame_interval(&self) -> Duration {
        interval_for(self.target_fps).unwrap_or(Duration::MAX)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.target_fps.is_finite() && self.target_fps > 0.0) {
            return Err(invalid(
                "target_fps",
                format!("{} is not a positive rate", self.target_fps),
            ));
        }
        if interval_for(self.target_fps).is_none() {
            return Err(invalid(
                "target_fps",
                format!("{} has no representable frame interval", self.target_fps),
            ));
        }
        if !(self.zoom_speed > 0.0 && self.zoom_speed < 1.0) {
            return Err(invalid("zoom_speed", format!("{} is outside (0, 1)", self.zoom_speed)));
        }
        if !(self.axis_size.is_finite() && self.axis_size >= 0.0) {
            return Err(invalid("axis_size", format!("{} is not a valid size", self.axis_size)));
        }
        if !(self.legend_size.is_finite() && self.legend_size >= 0.0) {
            return Err(invalid("legend_size", format!("{} is not a valid size", self.legend_size)));
        }
        check_sweep("polar.total_angle", self.polar.total_angle)?;
        check_radius("polar.inner_radius", self.polar.inner_radius)?;
        check_rotation("polar.initial_rotation", self.polar.initial_rotation)?;
        check_sweep("pie.max_angle", self.pie.max_angle)?;
        check_radius("pie.inner_radius", self.pie.inner_radius)?;
        check_rotation("pie.initial_rotation", self.pie.initial_rotation)?;
        Ok(())
    }
}

/// Frame interval for `fps`, `None` when it is zero or overflows a [`Duration`].
fn interval_for(fps: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(1.0 / fps)
        .ok()
        .filter(|interval| !interval.is_zero())
}

fn invalid(field: &'static str, reason: String) -> ChartError {
    ChartError::InvalidConfig { field, reason }
}

fn check_sweep(field: &'static str, angle: f64) -> Result<()> {
    if angle > 0.0 && angle <= 360.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{} is outside (0, 360]", angle)))
    }
}

fn check_radius(field: &'static str, radius: f64) -> Result<()> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{} is not a non-negative radius", radius)))
    }
}

fn check_rotation(field: &'static str, rotation: f64) -> Result<()> {
    if rotation.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "rotation must be finite".to_string()))
    }
}

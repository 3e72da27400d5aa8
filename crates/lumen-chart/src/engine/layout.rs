//! Draw margin: the part of the control where series are plotted.

use glam::Vec2;
use lumen_core::{Margin, Rect};

use crate::config::{ChartConfig, LegendPosition};

use super::ChartKind;

/// Plot area for a control of `size`.
///
/// A configured margin is used as is. Otherwise cartesian charts reserve
/// `axis_size` per visible axis (X axes at the bottom, Y axes on the left)
/// and every chart reserves the legend strip.
pub(crate) fn draw_margin(
    config: &ChartConfig,
    kind: ChartKind,
    size: Vec2,
    visible_x_axes: usize,
    visible_y_axes: usize,
) -> Rect {
    let control = Rect::from_pos_size(Vec2::ZERO, size.max(Vec2::ZERO));
    if let Some(margin) = config.draw_margin {
        return control.shrink(margin);
    }

    let mut margin = Margin::zero();
    if kind == ChartKind::Cartesian {
        margin.bottom += visible_x_axes as f32 * config.axis_size;
        margin.left += visible_y_axes as f32 * config.axis_size;
    }
    match config.legend_position {
        LegendPosition::Hidden => {}
        LegendPosition::Left => margin.left += config.legend_size,
        LegendPosition::Top => margin.top += config.legend_size,
        LegendPosition::Right => margin.right += config.legend_size,
        LegendPosition::Bottom => margin.bottom += config.legend_size,
    }
    control.shrink(margin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_margin_wins() {
        let config = ChartConfig::default().with_draw_margin(Margin::all(10.0));
        let rect = draw_margin(&config, ChartKind::Cartesian, Vec2::new(200.0, 100.0), 3, 3);
        assert_eq!(rect, Rect::new(10.0, 10.0, 180.0, 80.0));
    }

    #[test]
    fn test_axes_and_legend_reserve_space() {
        let config = ChartConfig::default()
            .with_axis_size(20.0)
            .with_legend(LegendPosition::Right, 50.0);
        let rect = draw_margin(&config, ChartKind::Cartesian, Vec2::new(200.0, 100.0), 1, 2);
        assert_eq!(rect, Rect::new(40.0, 0.0, 110.0, 80.0));

        let pie = draw_margin(&config, ChartKind::Pie, Vec2::new(200.0, 100.0), 1, 2);
        assert_eq!(pie, Rect::new(0.0, 0.0, 150.0, 100.0));
    }

    #[test]
    fn test_tiny_control_never_goes_negative() {
        let config = ChartConfig::default();
        let rect = draw_margin(&config, ChartKind::Cartesian, Vec2::new(10.0, 10.0), 2, 2);
        assert_eq!(rect.width, 0.0);
        assert_eq!(rect.height, 0.0);
    }
}

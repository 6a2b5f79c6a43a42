//! Plotters-powered lap-time chart widget for Ratatui.
//!
//! One line per stint, colored by compound, with a dot on every lap.
//! Output is rendered into the Ratatui buffer via `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::Compound;

/// Lap points of one stint.
#[derive(Debug, Clone, PartialEq)]
pub struct StintSeries {
    pub compound: Compound,
    /// `(lap, lap_time)` pairs in simulation order.
    pub points: Vec<(f64, f64)>,
}

/// A render-only chart description.
///
/// All series and bounds are computed outside the render call.
pub struct LapTimeChart<'a> {
    pub series: &'a [StintSeries],
    /// X bounds (lap number).
    pub x_bounds: [f64; 2],
    /// Y bounds (seconds).
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for LapTimeChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(6)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for s in self.series {
                let (r, g, b) = s.compound.rgb();
                let color = RGBColor(r, g, b);
                chart.draw_series(LineSeries::new(s.points.iter().copied(), &color))?;
                // `Circle` radii are mis-scaled by the ratatui backend; a pixel reads as a dot.
                chart.draw_series(s.points.iter().map(|&(x, y)| Pixel::new((x, y), WHITE)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

//! Terminal line chart of invested amount against portfolio value.

use super::ui;
use crate::core::simulation::{DatedAmount, SimulationResult};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Chart as ChartWidget, Dataset, GraphType, Widget},
};

const INVESTED_COLOR: Color = Color::Cyan;
const VALUE_COLOR: Color = Color::Green;

pub struct Chart {
    pub width: u16,
    pub height: u16,
    pub colored: bool,
}

impl Default for Chart {
    fn default() -> Self {
        Chart {
            width: 72,
            height: 15,
            colored: true,
        }
    }
}

impl Chart {
    /// Sizes the chart to the current terminal.
    pub fn for_terminal() -> Self {
        let width = ui::terminal_width().saturating_sub(4).clamp(40, 160);
        Chart {
            width: width as u16,
            ..Chart::default()
        }
    }

    /// Draws both curves into an off-screen buffer and returns its rows,
    /// followed by a legend line.
    pub fn render(&self, result: &SimulationResult, currency: &str) -> String {
        let invested = points(&result.invested_series);
        let value = points(&result.value_series);

        let x_max = invested.len().max(value.len()).saturating_sub(1).max(1) as f64;
        let y_max = invested
            .iter()
            .chain(&value)
            .map(|&(_, amount)| amount)
            .fold(0.0, f64::max);
        let y_upper = if y_max > 0.0 { y_max } else { 1.0 };

        let x_labels = match (result.value_series.first(), result.value_series.last()) {
            (Some(first), Some(last)) => vec![
                Span::raw(first.date.to_string()),
                Span::raw(last.date.to_string()),
            ],
            _ => Vec::new(),
        };
        let y_labels = vec![
            Span::raw(format!("{:.2}", 0.0)),
            Span::raw(format!("{y_max:.2}")),
        ];

        let datasets = vec![
            Dataset::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(INVESTED_COLOR))
                .data(&invested),
            Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(VALUE_COLOR))
                .data(&value),
        ];

        let chart = ChartWidget::new(datasets)
            .x_axis(Axis::default().bounds([0.0, x_max]).labels(x_labels))
            .y_axis(Axis::default().bounds([0.0, y_upper]).labels(y_labels));

        let area = Rect::new(0, 0, self.width, self.height);
        let mut buf = Buffer::empty(area);
        chart.render(area, &mut buf);

        let mut lines = self.buffer_lines(&buf);
        lines.push(format!(
            "{} Invested ({})   {} Portfolio value",
            self.paint(symbols::DOT, INVESTED_COLOR),
            ui::currency_symbol(currency),
            self.paint("⣿", VALUE_COLOR),
        ));
        lines.join("\n")
    }

    fn buffer_lines(&self, buf: &Buffer) -> Vec<String> {
        let width = usize::from(buf.area.width.max(1));
        buf.content()
            .chunks(width)
            .map(|row| {
                let line: String = row
                    .iter()
                    .map(|cell| self.paint(cell.symbol(), cell.fg))
                    .collect();
                line.trim_end().to_string()
            })
            .collect()
    }

    fn paint(&self, symbol: &str, color: Color) -> String {
        let color = match color {
            Color::Cyan => console::Color::Cyan,
            Color::Green => console::Color::Green,
            _ => return symbol.to_string(),
        };
        if self.colored {
            console::style(symbol).fg(color).to_string()
        } else {
            symbol.to_string()
        }
    }
}

fn points(series: &[DatedAmount]) -> Vec<(f64, f64)> {
    series
        .iter()
        .enumerate()
        .map(|(i, d)| (i as f64, d.amount))
        .collect()
}

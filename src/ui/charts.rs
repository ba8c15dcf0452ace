use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType};

use hostmon::scheduler::SeriesValues;

use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, series: &SeriesValues, theme: &Theme) {
    let [cpu_area, memory_area, disk_area] = Layout::vertical([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .areas(area);

    render_series(frame, cpu_area, "CPU Usage", &series.cpu, theme.cpu_color, theme);
    render_series(
        frame,
        memory_area,
        "Memory Usage",
        &series.memory,
        theme.memory_color,
        theme,
    );
    render_series(frame, disk_area, "Disk Usage", &series.disk, theme.disk_color, theme);
}

/// Index on the X axis, percentage on the Y axis, oldest sample leftmost.
pub fn series_points(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect()
}

fn render_series(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    values: &[f64],
    color: Color,
    theme: &Theme,
) {
    let points = series_points(values);
    let x_max = values.len().saturating_sub(1).max(1) as f64;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&points);

    let axis_style = Style::default().fg(theme.text_secondary);
    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(Axis::default().style(axis_style).bounds([0.0, x_max]))
        .y_axis(
            Axis::default()
                .style(axis_style)
                .bounds([0.0, 100.0])
                .labels(["0", "50", "100"]),
        );

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::series_points;

    #[test]
    fn points_are_indexed_oldest_first() {
        let points = series_points(&[1.0, 2.5, 4.0]);
        assert_eq!(points, vec![(0.0, 1.0), (1.0, 2.5), (2.0, 4.0)]);
    }
}

use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};

use crate::ui::theme::Theme;

const OVERLAY_WIDTH: u16 = 44;

/// Keybind table plus a footer describing the sampling cadence.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    entries: &[(String, &str)],
    period: Duration,
    capacity: usize,
    theme: &Theme,
) {
    // borders + blank spacer + footer
    let wanted = entries.len() as u16 + 4;
    let overlay = centered_rect(
        OVERLAY_WIDTH.min(area.width.saturating_sub(4)),
        wanted.min(area.height.saturating_sub(2)),
        area,
    );
    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.overlay_border))
        .style(Style::default().bg(theme.surface_bg))
        .title(Span::styled(
            " Help ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    let [keys_area, footer_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

    let key_style = Style::default()
        .fg(theme.pill_key_fg)
        .bg(theme.pill_key_bg)
        .add_modifier(Modifier::BOLD);
    let rows = entries.iter().map(|(key, desc)| {
        Row::new([
            Cell::from(Line::from(format!(" {key} ")).right_aligned()).style(key_style),
            Cell::from(*desc).style(Style::default().fg(theme.pill_desc_fg)),
        ])
    });
    let table = Table::new(rows, [Constraint::Length(10), Constraint::Fill(1)]).column_spacing(2);
    frame.render_widget(table, keys_area);

    frame.render_widget(
        Paragraph::new(sampling_summary(period, capacity))
            .style(Style::default().fg(theme.text_secondary))
            .centered(),
        footer_area,
    );
}

fn sampling_summary(period: Duration, capacity: usize) -> String {
    format!(
        "sampling every {:.1}s, {capacity} samples kept",
        period.as_secs_f64()
    )
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

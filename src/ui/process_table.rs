use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState};

use hostmon::format::truncate_unicode;
use hostmon::system::process::ProcessRecord;

use crate::ui::theme::Theme;

const NAME_WIDTH: usize = 32;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    processes: &[ProcessRecord],
    state: &mut TableState,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            format!(" Processes ({}) ", processes.len()),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let header = Row::new(["PID", "Name", "CPU %", "Memory %"]).style(
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    );

    let rows = processes.iter().map(|p| {
        Row::new([
            Cell::from(p.pid.to_string()),
            Cell::from(truncate_unicode(&p.name, NAME_WIDTH)),
            Cell::from(format!("{:.2}", p.cpu_percent)),
            Cell::from(format!("{:.2}", p.memory_percent)),
        ])
        .style(Style::default().fg(theme.text_primary))
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Min(12),
            Constraint::Length(8),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(
        Style::default()
            .bg(theme.selection_bg)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

    frame.render_stateful_widget(table, area, state);
}

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Gauge};

use hostmon::system::snapshot::SystemSnapshot;

use crate::ui::theme::Theme;

/// Three usage gauges: CPU, memory, disk. Before the first successful sample
/// the gauges read zero.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    snapshot: Option<&SystemSnapshot>,
    sampling_error: Option<&str>,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let (cpu, memory, disk) = snapshot
        .map(|s| (s.cpu_percent(), s.memory_percent(), s.disk_percent()))
        .unwrap_or_default();
    // A stale reading is flagged in the CPU gauge title.
    let stale = sampling_error.is_some();

    render_gauge(frame, chunks[0], "CPU", cpu, theme.cpu_color, stale, theme);
    render_gauge(frame, chunks[1], "Memory", memory, theme.memory_color, false, theme);
    render_gauge(frame, chunks[2], "Disk", disk, theme.disk_color, false, theme);
}

fn render_gauge(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    percent: f64,
    color: Color,
    stale: bool,
    theme: &Theme,
) {
    let title = if stale {
        format!(" {label} (stale) ")
    } else {
        format!(" {label} ")
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let gauge = Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(color).bg(theme.gauge_unfilled))
        .ratio((percent / 100.0).clamp(0.0, 1.0))
        .label(format!("{label}: {percent:.2}%"));

    frame.render_widget(gauge, area);
}

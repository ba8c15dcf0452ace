use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{InputMode, ResolvedKeybinds, StatusKind, StatusMessage};
use crate::ui::theme::Theme;

/// Bottom line. A pending status message wins over everything else;
/// otherwise it shows the search prompt, the active search, or key hints.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    input_mode: InputMode,
    filter_text: &str,
    status_message: Option<&StatusMessage>,
    keybinds: &ResolvedKeybinds,
    theme: &Theme,
) {
    let line = match (status_message, input_mode) {
        (Some(status), _) => status_line(status, theme),
        (None, InputMode::Filter) => {
            let mut spans = vec![
                Span::styled(" / ", key_style(theme)),
                Span::styled(format!(" {filter_text}"), Style::default().fg(theme.pill_desc_fg)),
                // cursor
                Span::styled("\u{2588}", Style::default().fg(theme.pill_key_bg)),
            ];
            push_hints(&mut spans, [("Esc", "Cancel"), ("Enter", "Apply")], theme);
            Line::from(spans)
        }
        (None, _) if !filter_text.is_empty() => {
            let mut spans = vec![
                Span::styled(
                    " Search: ",
                    Style::default().fg(theme.pill_key_bg).add_modifier(Modifier::BOLD),
                ),
                Span::styled(filter_text.to_string(), Style::default().fg(theme.pill_desc_fg)),
            ];
            push_hints(&mut spans, [("Esc", "Clear")], theme);
            push_hints(&mut spans, keybinds.status_hints(), theme);
            Line::from(spans)
        }
        (None, _) => {
            let mut spans = Vec::new();
            push_hints(&mut spans, keybinds.status_hints(), theme);
            Line::from(spans)
        }
    };

    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(theme.statusbar_bg)),
        area,
    );
}

fn status_line(status: &StatusMessage, theme: &Theme) -> Line<'static> {
    let color = match status.kind {
        StatusKind::Ok => theme.status_ok,
        StatusKind::Error => theme.status_err,
    };
    Line::from(Span::styled(
        format!(" {}", status.text),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

fn key_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.pill_key_fg)
        .bg(theme.pill_key_bg)
        .add_modifier(Modifier::BOLD)
}

fn push_hints<K, D>(spans: &mut Vec<Span<'_>>, hints: impl IntoIterator<Item = (K, D)>, theme: &Theme)
where
    K: AsRef<str>,
    D: AsRef<str>,
{
    for (key, desc) in hints {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {} ", key.as_ref()), key_style(theme)));
        spans.push(Span::styled(
            format!(" {}", desc.as_ref()),
            Style::default().fg(theme.pill_desc_fg).bg(theme.surface_bg),
        ));
    }
}

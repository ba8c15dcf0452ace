pub mod charts;
pub mod header;
pub mod help;
pub mod process_table;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(
        frame,
        chunks[0],
        app.snapshot.as_ref(),
        app.sampling_error.as_deref(),
        &app.theme,
    );

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    charts::render(frame, body[0], &app.series, &app.theme);
    process_table::render(
        frame,
        body[1],
        &app.processes,
        &mut app.table_state,
        &app.theme,
    );

    statusbar::render(
        frame,
        chunks[2],
        app.input_mode,
        &app.filter_text,
        app.status_message.as_ref(),
        &app.keybinds,
        &app.theme,
    );

    // drawn last so it sits on top
    if app.show_help() {
        help::render(
            frame,
            frame.area(),
            &app.help_entries(),
            app.period(),
            app.window_capacity(),
            &app.theme,
        );
    }
}

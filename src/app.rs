use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;

use hostmon::config::{Config, KeybindsConfig};
use hostmon::scheduler::{Scheduler, SeriesValues, TickUpdate};
use hostmon::system::kill::{ProcessController, TerminationOutcome};
use hostmon::system::process::ProcessRecord;
use hostmon::system::snapshot::SystemSnapshot;

use crate::action::{Action, Direction};
use crate::ui::theme::Theme;

const STATUS_TTL: Duration = Duration::from_secs(3);
const PAGE_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Ok,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub created: Instant,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub filter: KeyCode,
    pub kill: KeyCode,
    pub force_kill: KeyCode,
    pub help: KeyCode,
    pub refresh: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            filter: parse_key(&kb.filter).unwrap_or(KeyCode::Char('/')),
            kill: parse_key(&kb.kill).unwrap_or(KeyCode::Char('k')),
            force_kill: parse_key(&kb.force_kill).unwrap_or(KeyCode::Char('K')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
        }
    }

    /// Returns (key_label, description) pairs for all configurable keybinds.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        let mut entries = vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.filter), "Search processes"),
            (key_label(self.kill), "Kill process (SIGTERM)"),
            (key_label(self.force_kill), "Force kill (SIGKILL)"),
            (key_label(self.refresh), "Refresh process list"),
            (key_label(self.help), "Toggle help"),
        ];
        entries.push(("\u{2191}\u{2193}".to_string(), "Select process"));
        entries.push(("PgUp/PgDn".to_string(), "Scroll page"));
        entries.push(("Ctrl+C".to_string(), "Quit (always)"));
        entries
    }

    /// Short hints shown in the status bar while no prompt is open.
    pub fn status_hints(&self) -> Vec<(String, &'static str)> {
        vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.filter), "Search"),
            (key_label(self.kill), "Kill"),
            (key_label(self.refresh), "Refresh"),
            (key_label(self.help), "Help"),
            ("\u{2191}\u{2193}".to_string(), "Select"),
        ]
    }
}

pub fn parse_key(s: &str) -> Option<KeyCode> {
    match s {
        "Enter" => Some(KeyCode::Enter),
        "Esc" | "Escape" => Some(KeyCode::Esc),
        "Tab" => Some(KeyCode::Tab),
        "Backspace" => Some(KeyCode::Backspace),
        "Delete" | "Del" => Some(KeyCode::Delete),
        "Space" => Some(KeyCode::Char(' ')),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(KeyCode::Char(c)),
                _ => None,
            }
        }
    }
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Delete => "Del".to_string(),
        _ => "?".to_string(),
    }
}

/// Presentation state. Owns the single scheduler and controller built at
/// startup; every redraw reads from the latest tick.
pub struct App {
    pub running: bool,
    scheduler: Scheduler,
    controller: ProcessController,
    pub snapshot: Option<SystemSnapshot>,
    pub sampling_error: Option<String>,
    pub series: SeriesValues,
    pub processes: Vec<ProcessRecord>,
    pub table_state: TableState,
    pub input_mode: InputMode,
    pub filter_text: String,
    pub status_message: Option<StatusMessage>,
    pub theme: Theme,
    pub keybinds: ResolvedKeybinds,
}

impl App {
    pub fn new(
        config: &Config,
        scheduler: Scheduler,
        controller: ProcessController,
        filter_text: String,
    ) -> Self {
        let series = scheduler.series().values();
        let mut app = App {
            running: true,
            scheduler,
            controller,
            snapshot: None,
            sampling_error: None,
            series,
            processes: Vec::new(),
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
            filter_text,
            status_message: None,
            theme: Theme::from_config(&config.colors.theme),
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
        };
        app.on_tick();
        app
    }

    pub fn window_capacity(&self) -> usize {
        self.scheduler.series().capacity()
    }

    pub fn period(&self) -> Duration {
        self.scheduler.period()
    }

    pub fn on_tick(&mut self) {
        let update = self.scheduler.tick(&self.filter_text);
        self.apply_update(update);
        self.expire_status();
    }

    /// Drops the status message once it has been shown for `STATUS_TTL`.
    /// Called before every redraw, not only on ticks.
    pub fn expire_status(&mut self) {
        if let Some(status) = &self.status_message
            && status.created.elapsed() >= STATUS_TTL
        {
            self.status_message = None;
        }
    }

    fn apply_update(&mut self, update: TickUpdate) {
        // A failed sample leaves the previous readings on screen.
        if let Some(snapshot) = update.snapshot {
            self.snapshot = Some(snapshot);
        }
        self.sampling_error = update.sampling_error;
        self.series = update.series;
        self.replace_processes(update.processes);
    }

    /// Re-lists processes right away, outside the tick cadence.
    pub fn refresh_processes(&mut self) {
        let processes = self.scheduler.refresh_processes(&self.filter_text);
        self.replace_processes(processes);
    }

    fn replace_processes(&mut self, processes: Vec<ProcessRecord>) {
        let selected_pid = self.selected_pid();
        self.processes = processes;

        let index = selected_pid
            .and_then(|pid| self.processes.iter().position(|p| p.pid == pid))
            .or_else(|| {
                self.table_state
                    .selected()
                    .map(|i| i.min(self.processes.len().saturating_sub(1)))
            });
        self.table_state
            .select(if self.processes.is_empty() { None } else { index });
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Filter => self.map_key_filter(key),
            InputMode::Help => self.map_key_help(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        // Navigation keys are hardwired (not configurable)
        match code {
            KeyCode::Up => return Action::Navigate(Direction::Up),
            KeyCode::Down => return Action::Navigate(Direction::Down),
            KeyCode::PageUp => return Action::Navigate(Direction::PageUp),
            KeyCode::PageDown => return Action::Navigate(Direction::PageDown),
            KeyCode::Home => return Action::Navigate(Direction::Top),
            KeyCode::End => return Action::Navigate(Direction::Bottom),
            _ => {}
        }

        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.filter {
            return Action::EnterFilterMode;
        }
        if code == kb.kill {
            return self
                .selected_pid()
                .map_or(Action::KillWithoutSelection, Action::Kill);
        }
        if code == kb.force_kill {
            return self
                .selected_pid()
                .map_or(Action::KillWithoutSelection, Action::ForceKill);
        }
        if code == kb.help {
            return Action::ToggleHelp;
        }
        if code == kb.refresh {
            return Action::Refresh;
        }
        if code == KeyCode::Esc && !self.filter_text.is_empty() {
            return Action::ClearFilter;
        }

        Action::None
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        let code = key.code;
        // In help mode, only the help key and Esc dismiss, everything else is ignored
        if code == self.keybinds.help || code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    fn map_key_filter(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::ClearFilter,
            KeyCode::Enter => Action::ExitFilterMode,
            KeyCode::Backspace => {
                let mut text = self.filter_text.clone();
                text.pop();
                Action::UpdateFilter(text)
            }
            KeyCode::Char(c) => {
                let mut text = self.filter_text.clone();
                text.push(c);
                Action::UpdateFilter(text)
            }
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Navigate(dir) => self.navigate(dir),
            Action::EnterFilterMode => {
                self.input_mode = InputMode::Filter;
            }
            Action::ExitFilterMode => {
                self.input_mode = InputMode::Normal;
            }
            Action::ClearFilter => {
                self.filter_text.clear();
                self.input_mode = InputMode::Normal;
                self.refresh_processes();
            }
            Action::UpdateFilter(text) => {
                self.filter_text = text;
                self.refresh_processes();
            }
            Action::Kill(pid) => {
                let outcome = self.controller.terminate(pid);
                self.after_termination(outcome);
            }
            Action::ForceKill(pid) => {
                let outcome = self.controller.force_kill(pid);
                self.after_termination(outcome);
            }
            Action::KillWithoutSelection => {
                self.set_status("Please select a process to kill.", StatusKind::Error);
            }
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::Refresh => self.refresh_processes(),
            Action::None => {}
        }
    }

    fn after_termination(&mut self, outcome: TerminationOutcome) {
        let kind = if outcome.succeeded {
            StatusKind::Ok
        } else {
            StatusKind::Error
        };
        self.set_status(outcome.message(), kind);
        self.refresh_processes();
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            kind,
            created: Instant::now(),
        });
    }

    fn navigate(&mut self, direction: Direction) {
        if self.processes.is_empty() {
            return;
        }
        let last = self.processes.len() - 1;
        let current = self.table_state.selected();
        let next = match (direction, current) {
            (Direction::Top, _) | (Direction::Down, None) | (Direction::PageDown, None) => 0,
            (Direction::Bottom, _) | (Direction::Up, None) | (Direction::PageUp, None) => last,
            (Direction::Up, Some(i)) => i.saturating_sub(1),
            (Direction::Down, Some(i)) => (i + 1).min(last),
            (Direction::PageUp, Some(i)) => i.saturating_sub(PAGE_ROWS),
            (Direction::PageDown, Some(i)) => (i + PAGE_ROWS).min(last),
        };
        self.table_state.select(Some(next));
    }

    pub fn selected_pid(&self) -> Option<u32> {
        self.table_state
            .selected()
            .and_then(|i| self.processes.get(i))
            .map(|p| p.pid)
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.keybinds.help_entries()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn startup_applies_first_tick() {
        let app = sample_app();
        let pids: Vec<u32> = app.processes.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![3, 1, 2]);
        assert_eq!(app.series.cpu.last(), Some(&55.0));
        assert_eq!(app.series.cpu.len(), 30);
        assert_eq!(app.window_capacity(), 30);
    }

    #[test]
    fn failed_sample_keeps_previous_snapshot_slot_empty() {
        let app = app_with(None, vec![record(1, "alpha", 1.0, 1.0)]);
        assert!(app.snapshot.is_none());
        assert!(app.sampling_error.is_some());
        assert_eq!(app.processes.len(), 1);
        assert!(app.series.cpu.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn filter_edits_refresh_the_table_immediately() {
        let mut app = sample_app();
        app.dispatch(Action::EnterFilterMode);
        let action = app.map_key(press(KeyCode::Char('B')));
        assert_eq!(action, Action::UpdateFilter("B".to_string()));
        app.dispatch(action);
        let pids: Vec<u32> = app.processes.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![2]);

        app.dispatch(app.map_key(press(KeyCode::Esc)));
        assert!(app.filter_text.is_empty());
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.processes.len(), 3);
    }

    #[test]
    fn kill_without_selection_warns() {
        let mut app = sample_app();
        assert_eq!(app.selected_pid(), None);
        let action = app.map_key(press(KeyCode::Char('k')));
        assert_eq!(action, Action::KillWithoutSelection);
        app.dispatch(action);
        let status = app.status_message.as_ref().unwrap();
        assert_eq!(status.text, "Please select a process to kill.");
        assert_eq!(status.kind, StatusKind::Error);
    }

    #[test]
    fn kill_maps_to_selected_pid() {
        let mut app = sample_app();
        app.dispatch(Action::Navigate(Direction::Down));
        assert_eq!(app.selected_pid(), Some(3));
        app.dispatch(Action::Navigate(Direction::Down));
        assert_eq!(app.map_key(press(KeyCode::Char('k'))), Action::Kill(1));
        assert_eq!(app.map_key(press(KeyCode::Char('K'))), Action::ForceKill(1));
    }

    #[test]
    fn manual_refresh_relists_without_sampling() {
        let mut app = sample_app();
        let before = app.series.clone();
        app.dispatch(Action::Refresh);
        app.dispatch(Action::Refresh);
        assert_eq!(app.series, before);
        assert_eq!(app.series.cpu.iter().filter(|v| **v == 55.0).count(), 1);
        assert_eq!(app.processes.len(), 3);
    }

    #[test]
    fn status_message_expires_without_a_tick() {
        let mut app = sample_app();
        app.dispatch(Action::KillWithoutSelection);
        app.expire_status();
        assert!(app.status_message.is_some());

        if let Some(status) = app.status_message.as_mut() {
            status.created = Instant::now()
                .checked_sub(STATUS_TTL + Duration::from_millis(1))
                .unwrap();
        }
        app.expire_status();
        assert!(app.status_message.is_none());
    }

    #[test]
    fn failed_kill_surfaces_outcome_message() {
        let mut app = sample_app();
        app.dispatch(Action::Kill(0));
        let status = app.status_message.as_ref().unwrap();
        assert_eq!(status.text, "Process 0 does not exist.");
        assert_eq!(status.kind, StatusKind::Error);
    }

    #[test]
    fn selection_follows_pid_across_refreshes() {
        let mut app = sample_app();
        app.dispatch(Action::Navigate(Direction::Bottom));
        assert_eq!(app.selected_pid(), Some(2));
        app.dispatch(Action::UpdateFilter("beta".to_string()));
        assert_eq!(app.table_state.selected(), Some(0));
        assert_eq!(app.selected_pid(), Some(2));
        app.dispatch(Action::UpdateFilter("nothing".to_string()));
        assert_eq!(app.selected_pid(), None);
    }

    #[test]
    fn navigation_is_clamped() {
        let mut app = sample_app();
        app.dispatch(Action::Navigate(Direction::Up));
        assert_eq!(app.table_state.selected(), Some(2));
        app.dispatch(Action::Navigate(Direction::PageDown));
        assert_eq!(app.table_state.selected(), Some(2));
        app.dispatch(Action::Navigate(Direction::PageUp));
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn default_keybinds() {
        let app = sample_app();
        assert_eq!(app.map_key(press(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(app.map_key(press(KeyCode::Char('/'))), Action::EnterFilterMode);
        assert_eq!(app.map_key(press(KeyCode::Char('r'))), Action::Refresh);
        assert_eq!(app.map_key(press(KeyCode::Char('?'))), Action::ToggleHelp);
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.map_key(key), Action::Quit);
    }

    #[test]
    fn custom_keybind_remap_works() {
        let mut app = sample_app();
        app.keybinds.quit = KeyCode::Char('x');
        assert_eq!(app.map_key(press(KeyCode::Char('x'))), Action::Quit);
        assert_eq!(app.map_key(press(KeyCode::Char('q'))), Action::None);
    }

    #[test]
    fn help_mode_blocks_other_keys() {
        let mut app = sample_app();
        app.dispatch(Action::ToggleHelp);
        assert!(app.show_help());
        assert_eq!(app.map_key(press(KeyCode::Char('q'))), Action::None);
        assert_eq!(app.map_key(press(KeyCode::Esc)), Action::ToggleHelp);
        app.dispatch(Action::ToggleHelp);
        assert!(!app.show_help());
    }

    #[test]
    fn parse_key_names_and_chars() {
        assert_eq!(parse_key("Enter"), Some(KeyCode::Enter));
        assert_eq!(parse_key("Escape"), Some(KeyCode::Esc));
        assert_eq!(parse_key("Space"), Some(KeyCode::Char(' ')));
        assert_eq!(parse_key("K"), Some(KeyCode::Char('K')));
        assert_eq!(parse_key("ab"), None);
        assert_eq!(parse_key(""), None);
    }
}

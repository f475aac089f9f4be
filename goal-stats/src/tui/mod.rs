// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the most recent load result and the
// user's team selections. The app orchestrator pushes `UiUpdate` messages
// over an mpsc channel; the TUI applies them to `ViewState` and re-renders
// at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::debug;

use crate::protocol::{UiUpdate, UserCommand};
use crate::stats::{GoalStatsData, TeamStats};

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// LoadStatus
// ---------------------------------------------------------------------------

/// Where the most recent load stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Failed(String),
    Ready,
}

// ---------------------------------------------------------------------------
// TeamPicker
// ---------------------------------------------------------------------------

/// Which picker has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerSide {
    Home,
    Away,
}

impl PickerSide {
    pub fn toggle(self) -> Self {
        match self {
            PickerSide::Home => PickerSide::Away,
            PickerSide::Away => PickerSide::Home,
        }
    }
}

/// A filterable list of team names with at most one selection.
#[derive(Debug, Clone, Default)]
pub struct TeamPicker {
    /// Sorted, de-duplicated team names.
    pub options: Vec<String>,
    /// Case-insensitive substring filter typed by the user.
    pub filter: String,
    /// Cursor position within `visible()`.
    pub cursor: usize,
    pub selected: Option<String>,
}

impl TeamPicker {
    /// Replace the option list. A selection that no longer exists is dropped.
    pub fn set_options(&mut self, options: Vec<String>) {
        self.options = options;
        if let Some(ref name) = self.selected {
            if !self.options.contains(name) {
                self.selected = None;
            }
        }
        self.clamp_cursor();
    }

    /// Options matching the current filter, in list order.
    pub fn visible(&self) -> Vec<&str> {
        let needle = self.filter.to_lowercase();
        self.options
            .iter()
            .filter(|name| needle.is_empty() || name.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    pub fn move_up(&mut self, lines: usize) {
        self.cursor = self.cursor.saturating_sub(lines);
    }

    pub fn move_down(&mut self, lines: usize) {
        self.cursor = self.cursor.saturating_add(lines);
        self.clamp_cursor();
    }

    /// Select the option under the cursor. Choosing the current selection
    /// again clears it.
    pub fn toggle_at_cursor(&mut self) {
        let Some(name) = self.visible().get(self.cursor).map(|s| s.to_string()) else {
            return;
        };
        if self.selected.as_deref() == Some(name.as_str()) {
            self.selected = None;
        } else {
            self.selected = Some(name);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn push_filter(&mut self, c: char) {
        self.filter.push(c);
        self.cursor = 0;
    }

    pub fn pop_filter(&mut self) {
        self.filter.pop();
        self.clamp_cursor();
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state read by `render_frame`.
///
/// Updated via `UiUpdate` messages from the app orchestrator and by local
/// key handling in `input`.
pub struct ViewState {
    pub status: LoadStatus,
    /// Data from the last successful load. Empty before the first load and
    /// after a failed one.
    pub data: GoalStatsData,
    pub loaded_at: Option<DateTime<Local>>,
    pub home: TeamPicker,
    pub away: TeamPicker,
    pub focus: PickerSide,
    /// Whether typed characters go to the focused picker's filter.
    pub filter_mode: bool,
    /// Whether the quit confirmation dialog is showing.
    pub confirm_quit: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            status: LoadStatus::Loading,
            data: GoalStatsData::default(),
            loaded_at: None,
            home: TeamPicker::default(),
            away: TeamPicker::default(),
            focus: PickerSide::Home,
            filter_mode: false,
            confirm_quit: false,
        }
    }
}

impl ViewState {
    pub fn focused_picker_mut(&mut self) -> &mut TeamPicker {
        match self.focus {
            PickerSide::Home => &mut self.home,
            PickerSide::Away => &mut self.away,
        }
    }

    pub fn selected_home(&self) -> Option<&TeamStats> {
        self.home
            .selected
            .as_deref()
            .and_then(|name| self.data.home_team(name))
    }

    pub fn selected_away(&self) -> Option<&TeamStats> {
        self.away
            .selected
            .as_deref()
            .and_then(|name| self.data.away_team(name))
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Loading => {
            state.status = LoadStatus::Loading;
        }
        UiUpdate::Loaded(loaded) => {
            let loaded = *loaded;
            state.home.set_options(loaded.data.home_team_names());
            state.away.set_options(loaded.data.away_team_names());
            state.data = loaded.data;
            state.loaded_at = Some(loaded.loaded_at);
            state.status = LoadStatus::Ready;
        }
        UiUpdate::LoadFailed(message) => {
            state.data = GoalStatsData::default();
            state.home.set_options(Vec::new());
            state.away.set_options(Vec::new());
            state.status = LoadStatus::Failed(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let area = frame.area();
    let layout = build_layout(area);

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::team_picker::render(
        frame,
        layout.home_picker,
        "Home",
        &state.home,
        state.focus == PickerSide::Home,
        state.filter_mode,
    );
    widgets::team_picker::render(
        frame,
        layout.away_picker,
        "Away",
        &state.away,
        state.focus == PickerSide::Away,
        state.filter_mode,
    );
    widgets::team_stats::render(frame, layout.team_stats, state);
    widgets::league_average::render(frame, layout.league_average, state);
    widgets::match_projection::render(frame, layout.projection, state);
    render_help_bar(frame, &layout, state);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, area);
    }
}

/// Key hints for the current input mode.
pub fn help_text(state: &ViewState) -> &'static str {
    if state.filter_mode {
        " Type to filter | Enter:Keep | Esc:Clear | Backspace:Delete"
    } else {
        " q:Quit | Tab:Switch | j/k:Move | Enter:Select | x:Clear | /:Filter | r:Reload"
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Channel closed: app is shutting down
                    None => break,
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            debug!(?cmd, "user command");
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

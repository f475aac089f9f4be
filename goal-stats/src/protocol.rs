// Messages exchanged between the app orchestrator and the TUI.

use chrono::{DateTime, Local};

use crate::stats::GoalStatsData;

/// A completed load, stamped with the local time it finished.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub data: GoalStatsData,
    pub loaded_at: DateTime<Local>,
}

/// Updates pushed from the app orchestrator to the TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    /// A load has started.
    Loading,
    /// All four files were fetched and parsed.
    Loaded(Box<LoadedData>),
    /// At least one file failed; the message is shown as-is.
    LoadFailed(String),
}

/// Commands sent from the TUI to the app orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Reload,
    Quit,
}

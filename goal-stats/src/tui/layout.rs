// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +-----------------+--------------------------------+
// | Home Picker     | Selected Teams (6 rows)         |
// | (50%)           +--------------------------------+
// |                 | League Average (7 rows)         |
// +-----------------+--------------------------------+
// | Away Picker     | Match Projection (fill)         |
// | (50%)           |                                 |
// +-----------------+--------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: load status and dataset counts.
    pub status_bar: Rect,
    /// Left column top: home team list.
    pub home_picker: Rect,
    /// Left column bottom: away team list.
    pub away_picker: Rect,
    /// Right column top: stats table for the selected teams.
    pub team_stats: Rect,
    /// Right column middle: league average card.
    pub league_average: Rect,
    /// Right column bottom: combined home/away projection.
    pub projection: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(10),   // pickers + panels
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let status_bar = vertical[0];
    let middle = vertical[1];
    let help_bar = vertical[2];

    // Horizontal: pickers (30%) | panels (70%)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(middle);

    let pickers = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(horizontal[0]);

    let panels = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // header + home + away rows
            Constraint::Length(7),
            Constraint::Min(3),
        ])
        .split(horizontal[1]);

    AppLayout {
        status_bar,
        home_picker: pickers[0],
        away_picker: pickers[1],
        team_stats: panels[0],
        league_average: panels[1],
        projection: panels[2],
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// League average card.
//
// Resolution order for the current selection:
// 1. the league averages table, matched on the home team's league, then the
//    away team's;
// 2. a "League average" pseudo-row embedded in the home/away files;
// 3. the mean over every team in the overall file.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use super::format_pct;
use crate::stats::aggregate::average_goal_lines;
use crate::stats::matcher::{embedded_average_for, find_for_selection, league_name_of_average};
use crate::stats::{GoalLines, GoalStatsData, LeagueAverageData, TeamStats};
use crate::tui::ViewState;

/// What the card shows.
#[derive(Debug, Clone, PartialEq)]
pub enum LeagueCard<'a> {
    Matched(&'a LeagueAverageData),
    Embedded(&'a TeamStats),
    Overall { over: GoalLines, teams: usize },
}

impl LeagueCard<'_> {
    pub fn over(&self) -> GoalLines {
        match self {
            LeagueCard::Matched(league) => league.over,
            LeagueCard::Embedded(row) => row.over,
            LeagueCard::Overall { over, .. } => *over,
        }
    }
}

/// Pick the card for the given selection.
pub fn resolve_league_card<'a>(
    data: &'a GoalStatsData,
    home: Option<&TeamStats>,
    away: Option<&TeamStats>,
) -> LeagueCard<'a> {
    if let Some(league) = find_for_selection(home, away, &data.league_averages) {
        return LeagueCard::Matched(league);
    }
    let embedded = home
        .and_then(|t| embedded_average_for(t, &data.embedded_averages))
        .or_else(|| away.and_then(|t| embedded_average_for(t, &data.embedded_averages)));
    if let Some(row) = embedded {
        return LeagueCard::Embedded(row);
    }
    LeagueCard::Overall {
        over: average_goal_lines(&data.overall),
        teams: data.overall.len(),
    }
}

/// Card title. A matched league names the selected team when only one side
/// is chosen.
pub fn card_title(card: &LeagueCard, home: Option<&str>, away: Option<&str>) -> String {
    match card {
        LeagueCard::Matched(league) => match (home, away) {
            (Some(team), None) | (None, Some(team)) => {
                format!(" League average for {} ", team)
            }
            _ => format!(" League average: {} ", league.league),
        },
        LeagueCard::Embedded(row) => {
            format!(" League average: {} ", league_name_of_average(&row.team))
        }
        LeagueCard::Overall { teams, .. } => format!(" Overall average ({} teams) ", teams),
    }
}

/// Render the league average card.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let home = state.selected_home();
    let away = state.selected_away();
    let card = resolve_league_card(&state.data, home, away);
    let title = card_title(
        &card,
        home.map(|t| t.team.as_str()),
        away.map(|t| t.team.as_str()),
    );

    let mut labels: Vec<String> = card.over().iter().map(|(l, _)| l.to_string()).collect();
    let mut values: Vec<String> = card.over().iter().map(|(_, v)| format_pct(v)).collect();
    if let LeagueCard::Matched(league) = card {
        labels.push("BTTS".to_string());
        values.push(format_pct(league.btts));
        labels.push("CS".to_string());
        values.push(format_pct(league.clean_sheets));
    }

    let widths = vec![Constraint::Length(8); labels.len()];
    let header = Row::new(labels.into_iter().map(Cell::from))
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
    let row = Row::new(values.into_iter().map(Cell::from));

    let table = Table::new(vec![row], widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
            .title(Line::from(title)),
    );
    frame.render_widget(table, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// Selected teams widget: home and away rows with games played, average
// goals and every over-N.5 line.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use super::{format_pct, format_value};
use crate::stats::model::GOAL_LINE_LABELS;
use crate::stats::TeamStats;
use crate::tui::ViewState;

/// Render the stats table for the selected teams.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Selected Teams ");

    let rows: Vec<Row> = [("Home", state.selected_home()), ("Away", state.selected_away())]
        .into_iter()
        .filter_map(|(side, team)| team.map(|t| Row::new(row_cells(side, t))))
        .collect();

    if rows.is_empty() {
        let paragraph = Paragraph::new("Select a home or away team")
            .style(Style::default().fg(Color::Gray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let mut header = vec!["".to_string(), "Team".to_string(), "GP".to_string(), "Avg".to_string()];
    header.extend(GOAL_LINE_LABELS.iter().map(|l| l.to_string()));
    let header = Row::new(header.into_iter().map(Cell::from))
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let mut widths = vec![
        Constraint::Length(5),
        Constraint::Min(16),
        Constraint::Length(4),
        Constraint::Length(5),
    ];
    widths.extend(std::iter::repeat(Constraint::Length(7)).take(GOAL_LINE_LABELS.len()));

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

/// Cells for one table row: side, team, GP, Avg, then 0.5+ .. 5.5+.
pub fn row_cells(side: &str, team: &TeamStats) -> Vec<String> {
    let mut cells = vec![
        side.to_string(),
        team.team.clone(),
        team.gp.to_string(),
        format_value(team.avg),
    ];
    cells.extend(team.over.iter().map(|(_, v)| format_pct(v)));
    cells
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{GoalLines, GoalStatsData};

    fn arsenal() -> TeamStats {
        let mut t = TeamStats::new("Arsenal");
        t.gp = 10;
        t.avg = 2.5;
        t.over = GoalLines::new([95.0, 80.0, 60.0, 30.0, 12.5, 0.0]);
        t
    }

    #[test]
    fn row_cells_in_column_order() {
        assert_eq!(
            row_cells("Home", &arsenal()),
            vec!["Home", "Arsenal", "10", "2.50", "95%", "80%", "60%", "30%", "12.50%", "0%"]
        );
    }

    #[test]
    fn render_shows_selected_team() {
        let mut state = ViewState::default();
        state.data = GoalStatsData {
            home: vec![arsenal()],
            ..GoalStatsData::default()
        };
        state.home.set_options(state.data.home_team_names());
        state.home.toggle_at_cursor();

        let backend = ratatui::backend::TestBackend::new(100, 6);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Arsenal"));
        assert!(text.contains("1.5+"));
    }

    #[test]
    fn render_without_selection_shows_hint() {
        let backend = ratatui::backend::TestBackend::new(60, 6);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Select a home or away team"));
    }
}

// Match projection widget: means of average goals and each goal line over
// the selected home and away teams.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::{format_pct, format_value};
use crate::stats::aggregate::{match_projection, MatchProjection};
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let projection = match_projection(state.selected_home(), state.selected_away());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(projection_title(projection.as_ref()));

    let lines = match projection {
        Some(ref p) => projection_lines(p),
        None => vec![Line::styled(
            "Select both teams to project the match",
            Style::default().fg(Color::Gray),
        )],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn projection_title(projection: Option<&MatchProjection>) -> String {
    match projection {
        Some(p) if p.teams < 2 => " Projection (one team selected) ".to_string(),
        _ => " Match Projection ".to_string(),
    }
}

/// One line for the average goals, then one per goal line with a bar
/// scaled to the percentage.
pub fn projection_lines(projection: &MatchProjection) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled("Avg goals ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format_value(projection.avg)),
    ])];
    for (label, value) in projection.over.iter() {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<6}", label), Style::default().fg(Color::White)),
            Span::styled(bar(value), Style::default().fg(bar_color(value))),
            Span::raw(format!(" {}", format_pct(value))),
        ]));
    }
    lines
}

/// Twenty-cell bar; each cell is five percentage points.
fn bar(pct: f64) -> String {
    let filled = (pct.clamp(0.0, 100.0) / 5.0).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(20 - filled))
}

fn bar_color(pct: f64) -> Color {
    if pct >= 70.0 {
        Color::Green
    } else if pct >= 40.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

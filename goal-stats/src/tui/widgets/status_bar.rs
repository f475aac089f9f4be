// Status bar widget: load state, dataset sizes, last update time.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::{LoadStatus, ViewState};

/// Render the status bar into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let (dot, dot_color) = status_indicator(&state.status);
    let spans = vec![
        Span::styled(format!(" {} ", dot), Style::default().fg(dot_color)),
        Span::styled(status_text(state), Style::default().fg(Color::White)),
    ];

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Return the status dot character and its color.
pub fn status_indicator(status: &LoadStatus) -> (&'static str, Color) {
    match status {
        LoadStatus::Loading => ("●", Color::Yellow),
        LoadStatus::Failed(_) => ("●", Color::Red),
        LoadStatus::Ready => ("●", Color::Green),
    }
}

/// Text shown next to the status dot.
pub fn status_text(state: &ViewState) -> String {
    match &state.status {
        LoadStatus::Loading => "Loading goal statistics...".to_string(),
        LoadStatus::Failed(message) => format!("Error: {}", message),
        LoadStatus::Ready => {
            let data = &state.data;
            let mut text = format!(
                "Home {} | Away {} | Overall {} | Leagues {}",
                data.home.len(),
                data.away.len(),
                data.overall.len(),
                data.league_averages.len()
            );
            if let Some(at) = state.loaded_at {
                text.push_str(&format!(" | Updated {}", at.format("%H:%M:%S")));
            }
            text
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

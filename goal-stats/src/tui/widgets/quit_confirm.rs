// Quit confirmation overlay, drawn over the dashboard while
// `ViewState::confirm_quit` is set.

use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const DIALOG_SIZE: (u16, u16) = (34, 5);

pub fn render(frame: &mut Frame, area: Rect) {
    let dialog = dialog_area(area);
    frame.render_widget(Clear, dialog);

    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };
    let lines = vec![
        Line::from("Leave the dashboard?"),
        Line::from(vec![
            key("y", Color::Green),
            Span::raw(" quit   "),
            key("n", Color::Red),
            Span::raw(" stay"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Quit "),
        );
    frame.render_widget(paragraph, dialog);
}

/// Centre the dialog in `area`, shrinking it on small terminals.
pub fn dialog_area(area: Rect) -> Rect {
    let (width, height) = DIALOG_SIZE;
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [dialog] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    dialog
}

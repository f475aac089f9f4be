// Team picker widget: filterable list of team names for one side.
//
// The selected team is marked with a check; the cursor row is highlighted
// only while the picker has focus.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use crate::tui::TeamPicker;

/// Render one picker into the given area.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    side: &str,
    picker: &TeamPicker,
    focused: bool,
    filter_mode: bool,
) {
    let visible = picker.visible();
    let items: Vec<ListItem> = visible
        .iter()
        .map(|name| {
            let is_selected = picker.selected.as_deref() == Some(*name);
            let marker = if is_selected { "✓ " } else { "  " };
            let style = if is_selected {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(name.to_string(), style),
            ]))
        })
        .collect();

    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(build_title(side, picker, focused && filter_mode, visible.len())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if focused && !visible.is_empty() {
        list_state.select(Some(picker.cursor));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Title with the selection, active filter and visible count, e.g.
/// `Home: Arsenal "ars" (2)`.
pub fn build_title(
    side: &str,
    picker: &TeamPicker,
    editing: bool,
    visible_count: usize,
) -> Line<'static> {
    let mut title = format!(" {}", side);
    if let Some(ref name) = picker.selected {
        title.push_str(&format!(": {}", name));
    }
    if editing || !picker.filter.is_empty() {
        let cursor = if editing { "_" } else { "" };
        title.push_str(&format!(" \"{}{}\"", picker.filter, cursor));
    }
    title.push_str(&format!(" ({}) ", visible_count));
    Line::from(title)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

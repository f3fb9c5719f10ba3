//! The big button. Its area is remembered for mouse clicks.

use crate::app::state::AppState;
use crate::tui::theme::Theme;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const WIDTH: u16 = 28;
const HEIGHT: u16 = 5;

pub fn render(frame: &mut Frame, theme: &Theme, state: &mut AppState, area: Rect) {
    let [column] = Layout::horizontal([Constraint::Length(WIDTH)])
        .flex(Flex::Center)
        .areas(area);
    let [button_area, counter_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(HEIGHT), Constraint::Length(1)])
        .flex(Flex::Center)
        .areas(column);

    state.button_area = button_area;

    let (label, style) = if state.cooling_down {
        (
            "K-POP!",
            Style::default()
                .fg(theme.palette.button_fg)
                .bg(theme.palette.border),
        )
    } else if state.ready {
        (
            "K-POP!",
            Style::default()
                .fg(theme.palette.button_fg)
                .bg(theme.palette.button_bg)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            "loading...",
            Style::default()
                .fg(theme.palette.fg_secondary)
                .bg(theme.palette.bg),
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .style(style);
    let inner = block.inner(button_area);
    frame.render_widget(block, button_area);

    let [middle] = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .areas(inner);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(label, style))).alignment(Alignment::Center),
        middle,
    );

    let counter = match state.index_counter {
        Some(i) if state.playlist_len > 0 => format!("#{i} of {}", state.playlist_len),
        Some(i) => format!("#{i}"),
        None => String::new(),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            counter,
            Style::default().fg(theme.palette.fg_secondary),
        )))
        .alignment(Alignment::Center),
        counter_area,
    );
}

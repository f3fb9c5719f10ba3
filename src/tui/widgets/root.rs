//! Root layout widget
//!
//! ┌──────────────────────────────────────────────┐
//! │ background                                    │
//! ├──────────────────────────────────────────────┤
//! │                ╭──────────╮                   │
//! │                │  K-POP!  │                   │
//! │                ╰──────────╯                   │
//! │                  #3 of 40                     │
//! │ now playing                                   │
//! ├──────────────────────────────────────────────┤
//! │ status / toast                 key hints      │
//! └──────────────────────────────────────────────┘

use super::{button, truncate_str};
use crate::app::state::{AppState, ToastKind};
use crate::background::VisualMode;
use crate::tui::theme::Theme;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn render(frame: &mut Frame, state: &mut AppState) {
    let theme = Theme::for_mode(state.visual_mode);
    let root = frame.area();

    frame.render_widget(
        Block::default().style(Style::default().bg(theme.palette.bg)),
        root,
    );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Background banner
            Constraint::Min(8),    // Button
            Constraint::Length(1), // Now playing
            Constraint::Length(3), // Status bar
        ])
        .split(root);

    render_banner(frame, &theme, state, rows[0]);
    button::render(frame, &theme, state, rows[1]);
    render_now_playing(frame, &theme, state, rows[2]);
    render_status(frame, &theme, state, rows[3]);
}

fn render_banner(frame: &mut Frame, theme: &Theme, state: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .title(" kpop-button ")
        .title_style(Style::default().fg(theme.palette.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = match (state.visual_mode, state.background.as_deref()) {
        (VisualMode::Animated, Some(bg)) => Line::from(vec![
            Span::styled("♫ ", Style::default().fg(theme.palette.accent)),
            Span::styled(
                bg.to_string(),
                Style::default()
                    .fg(theme.palette.fg_primary)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]),
        _ => Line::from(Span::styled(
            "static background",
            Style::default().fg(theme.palette.fg_secondary),
        )),
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), inner);
}

fn render_now_playing(frame: &mut Frame, theme: &Theme, state: &AppState, area: Rect) {
    let Some(title) = state.now_playing.as_deref() else {
        return;
    };
    let player = state.player_state.map(|s| s.label()).unwrap_or("waiting");
    let text = format!("{title} ({player})");
    let line = Line::from(Span::styled(
        truncate_str(&text, area.width.saturating_sub(2) as usize),
        Style::default().fg(theme.palette.fg_primary),
    ));
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_status(frame: &mut Frame, theme: &Theme, state: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(44)])
        .split(inner);

    let left = match &state.toast {
        Some(t) => {
            let color = match t.kind {
                ToastKind::Success => theme.palette.accent,
                ToastKind::Error => theme.palette.error,
            };
            Span::styled(t.message.clone(), Style::default().fg(color))
        }
        None => Span::styled(
            state.status.clone(),
            Style::default().fg(theme.palette.fg_secondary),
        ),
    };
    frame.render_widget(Paragraph::new(Line::from(left)), cols[0]);

    let hints = Line::from(Span::styled(
        "enter next · a animation · r retry · q quit",
        Style::default().fg(theme.palette.fg_secondary),
    ));
    frame.render_widget(Paragraph::new(hints).alignment(Alignment::Right), cols[1]);
}

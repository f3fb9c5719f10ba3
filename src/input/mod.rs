use crate::app::actions::Action;
use crate::app::events::{Event, InputEvent};
use crate::app::state::AppState;
use crossterm::event::{
    self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEventKind,
};
use tokio::sync::mpsc;

pub fn spawn_input_task(tx: mpsc::Sender<Event>, mouse_enabled: bool) {
    tokio::task::spawn_blocking(move || {
        loop {
            if event::poll(std::time::Duration::from_millis(250)).unwrap_or(false) {
                let ev = match event::read() {
                    Ok(CtEvent::Key(k)) if k.kind == KeyEventKind::Press => InputEvent::Key(k),
                    Ok(CtEvent::Mouse(m)) if mouse_enabled => InputEvent::Mouse(m),
                    Ok(CtEvent::Resize(_, _)) => InputEvent::Resize,
                    Ok(_) | Err(_) => continue,
                };
                if tx.blocking_send(Event::Input(ev)).is_err() {
                    break;
                }
            } else if tx.is_closed() {
                break;
            }
        }
    });
}

pub fn map_input_to_action(state: &AppState, ev: InputEvent) -> Option<Action> {
    match ev {
        InputEvent::Resize => Some(Action::Resize),
        InputEvent::Mouse(m) => match m.kind {
            MouseEventKind::Down(MouseButton::Left) if state.button_hit(m.column, m.row) => {
                Some(Action::Click)
            }
            _ => None,
        },
        InputEvent::Key(k) => map_key(k),
    }
}

fn map_key(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('n') => Some(Action::Click),
        KeyCode::Char('a') => Some(Action::ToggleAnimation),
        KeyCode::Char('r') | KeyCode::F(5) => Some(Action::Retry),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent};
    use ratatui::layout::Rect;

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn click(column: u16, row: u16) -> InputEvent {
        InputEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_keys() {
        let s = AppState::new();
        assert_eq!(map_input_to_action(&s, key(KeyCode::Enter)), Some(Action::Click));
        assert_eq!(map_input_to_action(&s, key(KeyCode::Char(' '))), Some(Action::Click));
        assert_eq!(
            map_input_to_action(&s, key(KeyCode::Char('a'))),
            Some(Action::ToggleAnimation)
        );
        assert_eq!(map_input_to_action(&s, key(KeyCode::Char('r'))), Some(Action::Retry));
        assert_eq!(map_input_to_action(&s, key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(map_input_to_action(&s, key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_mouse_click_only_on_button() {
        let mut s = AppState::new();
        s.button_area = Rect::new(10, 10, 20, 5);
        assert_eq!(map_input_to_action(&s, click(15, 12)), Some(Action::Click));
        assert_eq!(map_input_to_action(&s, click(2, 2)), None);
    }
}

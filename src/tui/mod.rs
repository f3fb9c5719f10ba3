use crate::app::state::AppState;
use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};

pub mod theme;
pub mod widgets;

pub type TuiTerminal = Terminal<CrosstermBackend<Stdout>>;

pub struct TerminalGuard {
    terminal: TuiTerminal,
    mouse: bool,
}

impl TerminalGuard {
    pub fn enter(mouse: bool) -> anyhow::Result<Self> {
        enable_raw_mode().context("enable raw mode")?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("enter alt screen")?;
        if mouse {
            execute!(stdout, EnableMouseCapture).context("enable mouse capture")?;
        }

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("create terminal")?;

        Ok(Self { terminal, mouse })
    }

    pub fn terminal_mut(&mut self) -> &mut TuiTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Best-effort cleanup; don't panic in Drop.
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        if self.mouse {
            let _ = execute!(stdout, DisableMouseCapture);
        }
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

pub fn draw(terminal: &mut TuiTerminal, state: &mut AppState) -> anyhow::Result<()> {
    // Clear expired toasts
    if let Some(toast) = &state.toast
        && toast.is_expired()
    {
        state.toast = None;
    }

    terminal
        .draw(|f| {
            widgets::root::render(f, state);
        })
        .context("terminal draw")?;
    Ok(())
}

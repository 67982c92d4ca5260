//! Terminal management: raw mode RAII guard, ratatui setup, and panic hook.

use crossterm::{cursor, execute, terminal};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};

pub type Term = Terminal<CrosstermBackend<Stdout>>;

/// RAII guard that restores terminal state on drop (even on panic).
pub struct TerminalGuard {
    _private: (), // prevent construction outside this module
}

impl TerminalGuard {
    /// Enter alternate screen, raw mode, and hide the cursor. Returns the guard.
    fn new() -> io::Result<Self> {
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        terminal::enable_raw_mode()?;
        Ok(TerminalGuard { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore();
    }
}

/// Leave raw mode and the alternate screen. Safe to call more than once.
fn restore() {
    let _ = terminal::disable_raw_mode();
    let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
}

/// Install a custom panic hook that restores the terminal before printing
/// the panic message.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        default_hook(info);
    }));
}

/// Take over the terminal. Keep the guard alive for as long as the UI runs.
pub fn init() -> io::Result<(TerminalGuard, Term)> {
    install_panic_hook();
    let guard = TerminalGuard::new()?;
    let mut term = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    term.clear()?;
    Ok((guard, term))
}

/// Get the current terminal size, falling back to (80, 24) if unavailable.
pub fn terminal_size() -> (u16, u16) {
    terminal::size().unwrap_or((80, 24))
}

//! Raw-mode terminal session.

use std::io::{self, Stdout};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::warn;

use crate::dashboard::Dashboard;
use crate::error::{DashboardError, DashboardResult};

/// The terminal in raw mode on the alternate screen.
///
/// Dropping the session restores the terminal, also on error returns and
/// panics that unwind through the event loop.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    /// Enter raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::TerminalInitFailed`] if the terminal cannot
    /// be set up. Raw mode is undone before returning.
    pub fn enter() -> DashboardResult<Self> {
        enable_raw_mode().map_err(DashboardError::TerminalInitFailed)?;

        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(DashboardError::TerminalInitFailed(err));
        }

        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(mut terminal) => {
                let _ = terminal.hide_cursor();
                Ok(Self { terminal })
            }
            Err(err) => {
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                let _ = disable_raw_mode();
                Err(DashboardError::TerminalInitFailed(err))
            }
        }
    }

    /// Current terminal size as a rectangle at the origin.
    pub fn area(&self) -> DashboardResult<Rect> {
        let size = self.terminal.size()?;
        Ok(Rect::new(0, 0, size.width, size.height))
    }

    /// Paint the dashboard.
    pub fn draw(&mut self, dashboard: &Dashboard) -> DashboardResult<()> {
        self.terminal.draw(|frame| dashboard.draw(frame))?;
        Ok(())
    }

    /// Clear the screen, e.g. after a resize or a tab switch.
    pub fn clear(&mut self) -> DashboardResult<()> {
        self.terminal.clear()?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(err) = disable_raw_mode() {
            warn!(error = %err, "failed to disable raw mode");
        }
        if let Err(err) = execute!(self.terminal.backend_mut(), LeaveAlternateScreen) {
            warn!(error = %err, "failed to leave alternate screen");
        }
        let _ = self.terminal.show_cursor();
    }
}

impl std::fmt::Debug for TerminalSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalSession").finish_non_exhaustive()
    }
}

//! Terminal backend abstraction and crossterm implementation.
//!
//! Entering switches to the alternate screen in raw mode with the hardware
//! cursor hidden (the editor paints its own) and turns on focus-change and
//! mouse reporting so focus and wheel events reach the input task.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    style::ResetColor,
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode,
        enable_raw_mode,
    },
};
use std::io::stdout;
use tracing::debug;

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    /// Current size in cells (columns, rows).
    fn size(&self) -> Result<(u16, u16)>;
    fn clear(&mut self) -> Result<()>;
}

pub struct CrosstermBackend {
    entered: bool,
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a> {
    backend: &'a mut CrosstermBackend,
    active: bool,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self { entered: false }
    }

    pub fn is_entered(&self) -> bool {
        self.entered
    }

    /// Enter and return a guard that will leave on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        self.enter()?;
        Ok(TerminalGuard {
            backend: self,
            active: true,
        })
    }
}

impl TerminalGuard<'_> {
    pub fn backend(&mut self) -> &mut CrosstermBackend {
        self.backend
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(
                stdout(),
                EnterAlternateScreen,
                Hide,
                EnableFocusChange,
                EnableMouseCapture
            )?;
            self.entered = true;
            debug!(target: "terminal", "entered");
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            execute!(
                stdout(),
                DisableMouseCapture,
                DisableFocusChange,
                ResetColor,
                LeaveAlternateScreen,
                Show
            )?;
            disable_raw_mode()?;
            self.entered = false;
            debug!(target: "terminal", "left");
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        Ok(crossterm::terminal::size()?)
    }

    fn clear(&mut self) -> Result<()> {
        execute!(stdout(), Clear(ClearType::All))?;
        Ok(())
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl Drop for TerminalGuard<'_> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.backend.leave();
        }
    }
}

//! Interactive terminal task list
//!
//! The terminal counterpart of the task list page: an add form, the pending
//! and completed lists, a filter, a sort trigger and a progress bar, drawn
//! with ratatui. All state lives in the [`Controller`]; this module only
//! turns key presses into actions and draws the resulting view.

mod app;
mod event;
mod views;

use std::io::{self, stdout, Stdout};
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use anyhow::{anyhow, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use super::Output;
use crate::config::Config;
use crate::controller::Controller;
use crate::view::Filter;
use app::App;
use event::EventHandler;

/// Terminal type alias
pub type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Launch the TUI
pub fn run(output: &Output, config: &Config, controller: Controller, filter: Filter) -> Result<()> {
    output.verbose_ctx("tui", "Initializing TUI application");

    let mut app = App::new(controller, config.default_priority, filter);
    let mut terminal = init_terminal()?;
    let events = EventHandler::new(Duration::from_millis(config.tick_rate_ms));

    // Restore the terminal even if the app panics
    let result = panic::catch_unwind(AssertUnwindSafe(|| app.run(&mut terminal, &events)));
    let restore_result = restore_terminal();

    match result {
        Ok(inner_result) => {
            restore_result?;
            output.verbose_ctx(
                "tui",
                &format!("Session ended with {} tasks", app.task_count()),
            );
            inner_result
        }
        Err(panic_payload) => {
            let _ = restore_result;
            if let Some(s) = panic_payload.downcast_ref::<&str>() {
                Err(anyhow!("TUI panicked: {}", s))
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                Err(anyhow!("TUI panicked: {}", s))
            } else {
                Err(anyhow!("TUI panicked with unknown error"))
            }
        }
    }
}

fn init_terminal() -> Result<Terminal> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(ratatui::Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

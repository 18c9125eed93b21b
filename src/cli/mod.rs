//! # Command-Line Interface
//!
//! User-facing commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `tui` | Interactive task list |
//! | `run <script>` | Replay scripted actions, print the resulting list |
//! | `classify <date>` | Deadline urgency for a date |
//! | `progress <pending> <completed>` | Completion percentage |
//! | `config` | Effective configuration |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! tasklist --verbose run session.txt
//! ```

mod app;
mod output;
pub mod script;
mod tui;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};

//! Main CLI application structure

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{script, tui};
use crate::config::Config;
use crate::controller::Controller;
use crate::domain::{progress, Clock, DeadlineClassifier, FixedClock, SystemClock};
use crate::view::Filter;

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(author, version, about = "In-memory task list with priorities, deadlines and progress")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to a config file
    #[arg(long, global = true, env = "TASKLIST_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive task list
    Tui {
        /// Initial priority filter (all, low, medium, high)
        #[arg(long)]
        filter: Option<Filter>,
    },

    /// Replay a script of actions and print the resulting list
    Run {
        /// Script file, or `-` for stdin
        script: PathBuf,

        /// Pin the clock (RFC 3339 timestamp or YYYY-MM-DD)
        #[arg(long)]
        now: Option<String>,

        /// Print the list after every action
        #[arg(long)]
        trace: bool,
    },

    /// Classify a deadline as overdue, close or normal
    Classify {
        /// Deadline date (YYYY-MM-DD), or `-` for none
        deadline: String,

        /// Reference time (RFC 3339 timestamp or YYYY-MM-DD)
        #[arg(long)]
        now: Option<String>,

        /// Close window in days (defaults to the configured value)
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Compute completion percentage
    Progress {
        /// Number of pending tasks
        pending: usize,

        /// Number of completed tasks
        completed: usize,
    },

    /// Show the effective configuration
    Config,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let output = Output::new(cli.format.unwrap_or(config.default_format), cli.verbose);

    output.verbose("tasklist starting");
    output.verbose_ctx(
        "config",
        &format!(
            "close_threshold_days={}, default_priority={}",
            config.close_threshold_days, config.default_priority
        ),
    );

    match cli.command {
        Commands::Tui { filter } => {
            let controller = Controller::new(config.classifier(), Box::new(SystemClock));
            tui::run(&output, &config, controller, filter.unwrap_or_default())?
        }

        Commands::Run { script, now, trace } => {
            run_script(&output, &config, &script, now.as_deref(), trace)?
        }

        Commands::Classify {
            deadline,
            now,
            threshold,
        } => {
            let classifier = threshold
                .map(DeadlineClassifier::try_new)
                .transpose()
                .context("Invalid --threshold")?
                .unwrap_or_else(|| config.classifier());
            let now = clock_for(now.as_deref())?.now();
            let date = crate::domain::parse_deadline(&deadline)?;
            let urgency = classifier.classify(date, now);
            output.verbose_ctx(
                "classify",
                &format!(
                    "deadline={:?} now={} threshold={}",
                    date,
                    now,
                    classifier.threshold_days()
                ),
            );

            if output.is_json() {
                output.data(&serde_json::json!({
                    "deadline": date,
                    "now": now,
                    "urgency": urgency,
                    "decoration": urgency.decoration(),
                }));
            } else {
                println!("{}", urgency.as_str());
            }
        }

        Commands::Progress { pending, completed } => {
            let pct = progress(pending, completed);
            if output.is_json() {
                output.data(&serde_json::json!({
                    "pending": pending,
                    "completed": completed,
                    "progress": pct,
                }));
            } else {
                println!("{}%", pct);
            }
        }

        Commands::Config => {
            let path = cli.config.clone().or_else(Config::default_path);
            if output.is_json() {
                output.data(&serde_json::json!({
                    "path": path.map(|p| p.display().to_string()),
                    "config": config,
                }));
            } else {
                if let Some(path) = path {
                    println!("# {}", path.display());
                }
                print!("{}", config.to_toml()?);
            }
        }
    }

    output.verbose("Command completed successfully");
    Ok(())
}

/// Replays a script through a fresh controller
fn run_script(
    output: &Output,
    config: &Config,
    path: &std::path::Path,
    now: Option<&str>,
    trace: bool,
) -> Result<()> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read script from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script: {}", path.display()))?
    };

    let lines = script::parse(&content)?;
    output.verbose_ctx("run", &format!("Parsed {} actions", lines.len()));

    let mut controller = Controller::new(config.classifier(), clock_for(now)?);

    script::replay(
        &mut controller,
        &lines,
        config.default_priority,
        |line, action, outcome, controller| {
            output.verbose_ctx(
                "run",
                &format!("line {}: {} -> {}", line.line, action.name(), outcome),
            );
            if trace {
                if output.is_json() {
                    output.data(&serde_json::json!({
                        "line": line.line,
                        "action": action.name(),
                        "outcome": outcome.to_string(),
                        "view": controller.view(),
                    }));
                } else {
                    println!("> line {}: {}", line.line, outcome);
                    print!("{}", controller.view().to_text());
                    println!();
                }
            }
        },
    )?;

    if !trace {
        output.board(&controller.view());
    }

    Ok(())
}

/// System clock, or a fixed one when `--now` is given
fn clock_for(now: Option<&str>) -> Result<Box<dyn Clock>> {
    match now {
        Some(s) => Ok(Box::new(FixedClock(parse_now(s)?))),
        None => Ok(Box::new(SystemClock)),
    }
}

/// Parses an RFC 3339 timestamp or a bare date (midnight UTC)
fn parse_now(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, crate::domain::DEADLINE_FORMAT)
        .with_context(|| format!("Invalid time '{}': expected RFC 3339 or YYYY-MM-DD", s))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

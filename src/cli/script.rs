//! Scripted sessions
//!
//! A script is a list of user actions, one per line, replayed through the
//! [`Controller`] exactly as the interactive UI would dispatch them.
//!
//! ```text
//! # comment
//! add high 2024-01-31 Buy milk
//! add low - Water plants
//! complete Buy milk
//! filter high
//! sort
//! ```
//!
//! Lines starting with `{` are JSON actions:
//! `{"action":"add","text":"Buy milk","priority":"high","deadline":"2024-01-31"}`.
//! Tasks are referenced by ID or by exact label.

use serde::Deserialize;
use thiserror::Error;

use crate::controller::{Action, Controller, ControllerError, Dispatch};
use crate::domain::{parse_deadline, Priority, Section};
use crate::view::Filter;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: no task matches '{reference}'")]
    UnknownTask { line: usize, reference: String },

    #[error("line {line}: {source}")]
    Action {
        line: usize,
        #[source]
        source: ControllerError,
    },
}

/// One scripted step, before task references are resolved
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Add {
        text: String,
        #[serde(default)]
        priority: Option<Priority>,
        #[serde(default)]
        deadline: Option<String>,
    },
    Complete {
        task: String,
    },
    Reopen {
        task: String,
    },
    Toggle {
        task: String,
    },
    Delete {
        task: String,
    },
    Filter {
        filter: Filter,
    },
    Sort,
}

/// A step with the line it came from
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub line: usize,
    pub step: Step,
}

/// Parses a whole script, skipping blank lines and `#` comments
pub fn parse(content: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    content
        .lines()
        .enumerate()
        .map(|(i, raw)| (i + 1, raw.trim()))
        .filter(|(_, raw)| !raw.is_empty() && !raw.starts_with('#'))
        .map(|(line, raw)| {
            parse_line(raw)
                .map(|step| ScriptLine { line, step })
                .map_err(|message| ScriptError::Syntax { line, message })
        })
        .collect()
}

fn task_ref(command: &str, rest: &[&str]) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("'{}' needs a task ID or label", command))
    } else {
        Ok(rest.join(" "))
    }
}

fn parse_line(raw: &str) -> Result<Step, String> {
    if raw.starts_with('{') {
        return serde_json::from_str(raw).map_err(|e| format!("invalid JSON action: {}", e));
    }

    let mut words = raw.split_whitespace();
    let command = words.next().unwrap_or_default().to_lowercase();
    let rest: Vec<&str> = words.collect();

    match command.as_str() {
        "add" => {
            if rest.len() < 2 {
                return Err("usage: add <priority> <date|-> <label>".to_string());
            }
            let priority = rest[0].parse::<Priority>().map_err(|e| e.to_string())?;
            Ok(Step::Add {
                text: rest[2..].join(" "),
                priority: Some(priority),
                deadline: Some(rest[1].to_string()),
            })
        }
        "complete" | "done" => Ok(Step::Complete {
            task: task_ref(&command, &rest)?,
        }),
        "reopen" => Ok(Step::Reopen {
            task: task_ref(&command, &rest)?,
        }),
        "toggle" => Ok(Step::Toggle {
            task: task_ref(&command, &rest)?,
        }),
        "delete" | "rm" => Ok(Step::Delete {
            task: task_ref(&command, &rest)?,
        }),
        "filter" => {
            let value = rest.first().ok_or("usage: filter <all|low|medium|high>")?;
            let filter = value.parse::<Filter>().map_err(|e| e.to_string())?;
            Ok(Step::Filter { filter })
        }
        "sort" => Ok(Step::Sort),
        other => Err(format!("unknown action '{}'", other)),
    }
}

impl ScriptLine {
    /// Resolves task references against the controller's current state
    pub fn to_action(
        &self,
        controller: &Controller,
        default_priority: Priority,
    ) -> Result<Action, ScriptError> {
        let resolve = |reference: &str, prefer: Section| {
            controller
                .resolve(reference, prefer)
                .ok_or_else(|| ScriptError::UnknownTask {
                    line: self.line,
                    reference: reference.to_string(),
                })
        };

        let action = match &self.step {
            Step::Add {
                text,
                priority,
                deadline,
            } => Action::Add {
                text: text.clone(),
                priority: priority.unwrap_or(default_priority),
                deadline: parse_deadline(deadline.as_deref().unwrap_or_default()).map_err(
                    |e| ScriptError::Syntax {
                        line: self.line,
                        message: e.to_string(),
                    },
                )?,
            },
            Step::Complete { task } => Action::Complete(resolve(task.as_str(), Section::Pending)?),
            Step::Reopen { task } => Action::Reopen(resolve(task.as_str(), Section::Completed)?),
            Step::Toggle { task } => Action::Toggle(resolve(task.as_str(), Section::Pending)?),
            Step::Delete { task } => Action::Delete(resolve(task.as_str(), Section::Pending)?),
            Step::Filter { filter } => Action::SetFilter(*filter),
            Step::Sort => Action::Sort,
        };

        Ok(action)
    }
}

/// Replays steps in order, calling `observe` after each dispatch.
/// Stops at the first failing step.
pub fn replay<F>(
    controller: &mut Controller,
    lines: &[ScriptLine],
    default_priority: Priority,
    mut observe: F,
) -> Result<(), ScriptError>
where
    F: FnMut(&ScriptLine, &Action, &Dispatch, &Controller),
{
    for line in lines {
        let action = line.to_action(controller, default_priority)?;
        let outcome = controller
            .dispatch(action.clone())
            .map_err(|source| ScriptError::Action {
                line: line.line,
                source,
            })?;
        observe(line, &action, &outcome, &*controller);
    }
    Ok(())
}

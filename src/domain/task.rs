//! Task domain model
//!
//! A task is a short label with a priority, an optional calendar deadline and
//! a completion flag. Everything except the flag is fixed at creation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::id::TaskId;

/// Date format accepted for deadlines
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Invalid priority '{0}': expected low, medium or high")]
    Priority(String),

    #[error("Invalid deadline '{0}': expected a date like 2024-01-31")]
    Deadline(String),

    #[error("Invalid filter '{0}': expected all, low, medium or high")]
    Filter(String),
}

/// Rejected task input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Task text cannot be empty")]
    EmptyText,
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Lowercase identifier, as used on the command line and in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Capitalized badge text
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    /// Next priority in low -> medium -> high -> low order
    pub fn cycle(self) -> Self {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "l" => Ok(Priority::Low),
            "medium" | "med" | "m" => Ok(Priority::Medium),
            "high" | "h" => Ok(Priority::High),
            _ => Err(ParseError::Priority(s.to_string())),
        }
    }
}

/// Parses a deadline field. An empty field (or `-`) means no deadline.
pub fn parse_deadline(s: &str) -> Result<Option<NaiveDate>, ParseError> {
    let s = s.trim();
    if s.is_empty() || s == "-" {
        return Ok(None);
    }

    NaiveDate::parse_from_str(s, DEADLINE_FORMAT)
        .map(Some)
        .map_err(|_| ParseError::Deadline(s.to_string()))
}

/// A single task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,

    /// Trimmed, non-empty label
    pub text: String,

    pub priority: Priority,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,

    pub completed: bool,

    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a pending task, rejecting labels that trim to nothing
    pub fn new(
        id: TaskId,
        text: &str,
        priority: Priority,
        deadline: Option<NaiveDate>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }

        Ok(Self {
            id,
            text: text.to_string(),
            priority,
            deadline,
            completed: false,
            created_at,
        })
    }

    /// Deadline as an instant: midnight UTC at the start of the day
    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        self.deadline.map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
    }

    /// `Due: <date>` or `No Deadline`
    pub fn deadline_text(&self) -> String {
        match self.deadline {
            Some(date) => format!("Due: {}", date.format(DEADLINE_FORMAT)),
            None => "No Deadline".to_string(),
        }
    }
}

//! Task identifiers
//!
//! ID Format: `t-{7-char-hash}` (e.g., `t-9d3e5f2`)
//!
//! The hash is derived from the label, the creation timestamp and the
//! store's creation sequence number, so two tasks with the same label created
//! in the same instant still get different IDs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid task ID format: expected 't-{{7-char-hash}}', got '{0}'")]
    InvalidTaskId(String),
}

/// Generates a 7-character hash from label, timestamp and sequence
fn generate_hash(text: &str, timestamp: DateTime<Utc>, sequence: u64) -> String {
    let input = format!(
        "{}{}#{}",
        text,
        timestamp.timestamp_nanos_opt().unwrap_or(0),
        sequence
    );
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

/// Task ID in the format `t-{7-char-hash}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId {
    hash: String,
}

impl TaskId {
    /// Creates a new task ID from label, timestamp and creation sequence
    pub fn new(text: &str, timestamp: DateTime<Utc>, sequence: u64) -> Self {
        Self {
            hash: generate_hash(text, timestamp, sequence),
        }
    }

    /// Returns the hash portion of the ID
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t-{}", self.hash)
    }
}

impl FromStr for TaskId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hash = s
            .strip_prefix("t-")
            .ok_or_else(|| IdError::InvalidTaskId(s.to_string()))?;

        if hash.len() != 7 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(IdError::InvalidTaskId(s.to_string()));
        }

        Ok(Self {
            hash: hash.to_ascii_lowercase(),
        })
    }
}

impl TryFrom<String> for TaskId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.to_string()
    }
}

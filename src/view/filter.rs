//! Priority filter for the pending list

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::{ParseError, Priority};

/// View-only predicate over pending tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    All,
    Low,
    Medium,
    High,
}

impl Filter {
    pub const ALL: [Filter; 4] = [Filter::All, Filter::Low, Filter::Medium, Filter::High];

    pub fn matches(&self, priority: Priority) -> bool {
        match self {
            Filter::All => true,
            Filter::Low => priority == Priority::Low,
            Filter::Medium => priority == Priority::Medium,
            Filter::High => priority == Priority::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Low => "low",
            Filter::Medium => "medium",
            Filter::High => "high",
        }
    }

    /// Next filter in all -> low -> medium -> high -> all order
    pub fn cycle(self) -> Self {
        match self {
            Filter::All => Filter::Low,
            Filter::Low => Filter::Medium,
            Filter::Medium => Filter::High,
            Filter::High => Filter::All,
        }
    }
}

impl From<Priority> for Filter {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Low => Filter::Low,
            Priority::Medium => Filter::Medium,
            Priority::High => Filter::High,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Filter::All);
        }
        s.parse::<Priority>()
            .map(Filter::from)
            .map_err(|_| ParseError::Filter(s.to_string()))
    }
}

//! Notification priority levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Notification priority levels, totally ordered from low to critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Background information.
    Low,
    /// Standard alert.
    Medium,
    /// Important, action recommended soon.
    High,
    /// Compliance is already broken, immediate action required.
    Critical,
}

impl Priority {
    /// Return the priority as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Whether this priority meets or exceeds `threshold`.
    pub fn at_least(&self, threshold: Priority) -> bool {
        *self >= threshold
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

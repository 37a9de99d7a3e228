//! Compliance record kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of compliance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Equipment calibration certificate.
    Calibration,
    /// Periodic inspection report.
    Inspection,
    /// Scheduled maintenance entry.
    Maintenance,
    /// Compliance audit entry.
    Audit,
}

impl RecordKind {
    /// Whether records of this kind establish calibration validity.
    ///
    /// Calibration and inspection records carry a `valid_until` timestamp;
    /// maintenance and audit records carry a `scheduled_for` timestamp.
    pub fn establishes_validity(&self) -> bool {
        matches!(self, Self::Calibration | Self::Inspection)
    }

    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calibration => "calibration",
            Self::Inspection => "inspection",
            Self::Maintenance => "maintenance",
            Self::Audit => "audit",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = calwatch_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "calibration" => Ok(Self::Calibration),
            "inspection" => Ok(Self::Inspection),
            "maintenance" => Ok(Self::Maintenance),
            "audit" => Ok(Self::Audit),
            _ => Err(calwatch_core::AppError::validation(format!(
                "Invalid record kind: '{s}'. Expected one of: calibration, inspection, maintenance, audit"
            ))),
        }
    }
}

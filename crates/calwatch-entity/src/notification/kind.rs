//! Notification kind (rule category) enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The rule category a notification was produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    /// A calibration/inspection record's validity has lapsed.
    Expired,
    /// A record's validity ends within the configured lookahead window.
    ExpiringSoon,
    /// An active asset has no still-valid calibration record at all.
    AssetUncalibrated,
    /// A maintenance entry is due within the lookahead window.
    MaintenanceDue,
    /// An audit entry is due within the lookahead window.
    AuditUpcoming,
}

impl NotificationKind {
    /// Return the kind as a kebab-case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::ExpiringSoon => "expiring-soon",
            Self::AssetUncalibrated => "asset-uncalibrated",
            Self::MaintenanceDue => "maintenance-due",
            Self::AuditUpcoming => "audit-upcoming",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = calwatch_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expired" => Ok(Self::Expired),
            "expiring-soon" => Ok(Self::ExpiringSoon),
            "asset-uncalibrated" => Ok(Self::AssetUncalibrated),
            "maintenance-due" => Ok(Self::MaintenanceDue),
            "audit-upcoming" => Ok(Self::AuditUpcoming),
            _ => Err(calwatch_core::AppError::validation(format!(
                "Invalid notification kind: '{s}'"
            ))),
        }
    }
}

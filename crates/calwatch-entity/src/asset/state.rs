//! Asset lifecycle state enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a tracked asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetState {
    /// In service and subject to compliance rules.
    Active,
    /// Taken out of service by an operator.
    Inactive,
    /// Undergoing maintenance.
    Maintenance,
    /// Broken, awaiting repair or disposal decision.
    Broken,
    /// Permanently retired.
    Obsolete,
}

impl AssetState {
    /// Whether assets in this state are evaluated by the rule set.
    pub fn is_scannable(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Return the state as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Maintenance => "maintenance",
            Self::Broken => "broken",
            Self::Obsolete => "obsolete",
        }
    }
}

impl fmt::Display for AssetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssetState {
    type Err = calwatch_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "maintenance" => Ok(Self::Maintenance),
            "broken" => Ok(Self::Broken),
            "obsolete" => Ok(Self::Obsolete),
            _ => Err(calwatch_core::AppError::validation(format!(
                "Invalid asset state: '{s}'. Expected one of: active, inactive, maintenance, broken, obsolete"
            ))),
        }
    }
}

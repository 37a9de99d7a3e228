//! Compliance engine configuration.
//!
//! [`EngineConfig`] is the singleton, user-editable configuration record.
//! Updates arrive as an [`EngineConfigPatch`]: merge is shallow at the top
//! level and nested inside the `channels`/`lookahead_days` sub-objects, so
//! updating one lookahead value never erases the others.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Largest accepted lookahead window, in days.
pub const MAX_LOOKAHEAD_DAYS: i64 = 365;

/// User-editable compliance engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Whether automatic scanning is enabled. Manual scans are always
    /// permitted regardless of this flag.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Delivery channel toggles (consumed by the UI layer).
    #[serde(default)]
    pub channels: ChannelsConfig,
    /// Lookahead windows per rule family, in days.
    #[serde(default)]
    pub lookahead_days: LookaheadConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            channels: ChannelsConfig::default(),
            lookahead_days: LookaheadConfig::default(),
        }
    }
}

/// Delivery channel toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelsConfig {
    /// In-app notification bell.
    #[serde(default = "default_true")]
    pub in_app: bool,
    /// Email delivery.
    #[serde(default)]
    pub email: bool,
    /// Push delivery.
    #[serde(default)]
    pub push: bool,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            in_app: true,
            email: false,
            push: false,
        }
    }
}

/// Lookahead windows per rule family, in days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookaheadConfig {
    /// Window for the expiring-soon rule.
    #[serde(default = "default_expiring_soon")]
    pub expiring_soon: u32,
    /// Window for the maintenance-due rule.
    #[serde(default = "default_maintenance_pending")]
    pub maintenance_pending: u32,
    /// Window for the audit-upcoming rule.
    #[serde(default = "default_audit_upcoming")]
    pub audit_upcoming: u32,
}

impl Default for LookaheadConfig {
    fn default() -> Self {
        Self {
            expiring_soon: default_expiring_soon(),
            maintenance_pending: default_maintenance_pending(),
            audit_upcoming: default_audit_upcoming(),
        }
    }
}

/// Partial update for [`EngineConfig`].
///
/// Fields left as `None` keep their current value. Lookahead values are
/// widened to `i64` so that out-of-range input (including negatives coming
/// from loosely typed callers) is rejected by validation rather than by a
/// deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfigPatch {
    /// New value for the `enabled` flag.
    pub enabled: Option<bool>,
    /// Partial update for channel toggles.
    pub channels: Option<ChannelsPatch>,
    /// Partial update for lookahead windows.
    pub lookahead_days: Option<LookaheadPatch>,
}

/// Partial update for [`ChannelsConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelsPatch {
    /// New value for the in-app toggle.
    pub in_app: Option<bool>,
    /// New value for the email toggle.
    pub email: Option<bool>,
    /// New value for the push toggle.
    pub push: Option<bool>,
}

/// Partial update for [`LookaheadConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookaheadPatch {
    /// New window for the expiring-soon rule.
    pub expiring_soon: Option<i64>,
    /// New window for the maintenance-due rule.
    pub maintenance_pending: Option<i64>,
    /// New window for the audit-upcoming rule.
    pub audit_upcoming: Option<i64>,
}

impl EngineConfigPatch {
    /// Validate the patch without applying it.
    ///
    /// Lookahead windows must be within `1..=365` days. Rejection leaves the
    /// current configuration untouched; no partial merge is applied.
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(lookahead) = &self.lookahead_days {
            for (field, value) in [
                ("expiring_soon", lookahead.expiring_soon),
                ("maintenance_pending", lookahead.maintenance_pending),
                ("audit_upcoming", lookahead.audit_upcoming),
            ] {
                if let Some(days) = value {
                    if !(1..=MAX_LOOKAHEAD_DAYS).contains(&days) {
                        return Err(AppError::validation(format!(
                            "lookahead_days.{field} must be between 1 and {MAX_LOOKAHEAD_DAYS} days, got {days}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl EngineConfig {
    /// Apply a validated patch, returning the merged configuration.
    ///
    /// Call [`EngineConfigPatch::validate`] first; this method assumes the
    /// patch is in range.
    pub fn merged_with(&self, patch: &EngineConfigPatch) -> Self {
        let mut next = self.clone();

        if let Some(enabled) = patch.enabled {
            next.enabled = enabled;
        }
        if let Some(channels) = &patch.channels {
            if let Some(in_app) = channels.in_app {
                next.channels.in_app = in_app;
            }
            if let Some(email) = channels.email {
                next.channels.email = email;
            }
            if let Some(push) = channels.push {
                next.channels.push = push;
            }
        }
        if let Some(lookahead) = &patch.lookahead_days {
            if let Some(days) = lookahead.expiring_soon {
                next.lookahead_days.expiring_soon = days as u32;
            }
            if let Some(days) = lookahead.maintenance_pending {
                next.lookahead_days.maintenance_pending = days as u32;
            }
            if let Some(days) = lookahead.audit_upcoming {
                next.lookahead_days.audit_upcoming = days as u32;
            }
        }

        next
    }
}

fn default_true() -> bool {
    true
}

fn default_expiring_soon() -> u32 {
    30
}

fn default_maintenance_pending() -> u32 {
    7
}

fn default_audit_upcoming() -> u32 {
    14
}

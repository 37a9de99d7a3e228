//! Notification title/message rendering.

use calwatch_entity::notification::NotificationPayload;

/// Renders display strings for notification payloads.
pub struct NotificationFormatter;

impl NotificationFormatter {
    /// Render the headline for a payload.
    pub fn title(payload: &NotificationPayload) -> String {
        match payload {
            NotificationPayload::Expired { .. } => "Calibration expired".to_string(),
            NotificationPayload::ExpiringSoon { .. } => "Calibration expiring soon".to_string(),
            NotificationPayload::AssetUncalibrated { .. } => "Asset has no calibration".to_string(),
            NotificationPayload::MaintenanceDue { .. } => "Maintenance due".to_string(),
            NotificationPayload::AuditUpcoming { .. } => "Audit upcoming".to_string(),
        }
    }

    /// Render the body text for a payload.
    pub fn message(payload: &NotificationPayload) -> String {
        match payload {
            NotificationPayload::Expired { asset, record } => format!(
                "'{}' is out of compliance: its {} validity ended on {}",
                asset.name,
                record.kind,
                record.due.format("%Y-%m-%d")
            ),
            NotificationPayload::ExpiringSoon {
                asset,
                record,
                days_remaining,
            } => format!(
                "'{}': {} validity ends in {} day(s), on {}",
                asset.name,
                record.kind,
                days_remaining,
                record.due.format("%Y-%m-%d")
            ),
            NotificationPayload::AssetUncalibrated { asset } => format!(
                "'{}' is active but has no calibration record on file",
                asset.name
            ),
            NotificationPayload::MaintenanceDue {
                asset,
                record,
                days_remaining,
            } => format!(
                "'{}': maintenance scheduled in {} day(s), on {}",
                asset.name,
                days_remaining,
                record.due.format("%Y-%m-%d")
            ),
            NotificationPayload::AuditUpcoming {
                asset,
                record,
                days_remaining,
            } => format!(
                "'{}': audit scheduled in {} day(s), on {}",
                asset.name,
                days_remaining,
                record.due.format("%Y-%m-%d")
            ),
        }
    }
}

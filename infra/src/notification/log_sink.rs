//! Sink announcing new registrations to administrators through the log

use async_trait::async_trait;
use tracing::{debug, info};

use vc_core::services::notification::{IssuedCodeEvent, NotificationSink};
use vc_shared::config::AdminConfig;
use vc_shared::utils::phone::mask_phone_number;

/// Writes one "new registration" record per configured admin id
///
/// The code itself is never logged.
#[derive(Debug, Clone, Default)]
pub struct LogNotificationSink {
    admin_ids: Vec<String>,
}

impl LogNotificationSink {
    /// Create a sink addressing the given admin ids
    pub fn new(admin_ids: Vec<String>) -> Self {
        Self { admin_ids }
    }

    /// Admin ids this sink addresses
    pub fn admin_ids(&self) -> &[String] {
        &self.admin_ids
    }
}

impl From<&AdminConfig> for LogNotificationSink {
    fn from(config: &AdminConfig) -> Self {
        Self::new(config.admin_ids.clone())
    }
}

#[async_trait]
impl NotificationSink for LogNotificationSink {
    async fn deliver(&self, event: &IssuedCodeEvent) -> Result<(), String> {
        if self.admin_ids.is_empty() {
            debug!(code_id = %event.code_id, "No admin ids configured, skipping notification");
            return Ok(());
        }

        let phone = mask_phone_number(&event.phone);
        for admin_id in &self.admin_ids {
            info!(
                admin_id = %admin_id,
                phone = %phone,
                code_id = %event.code_id,
                issued_at = %event.issued_at,
                event = "registration_notified",
                "New registration request"
            );
        }
        Ok(())
    }
}

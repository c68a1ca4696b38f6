//! Notification sender that only writes to the log.
//!
//! Used when no email provider is configured.

use async_trait::async_trait;

use crate::domain::member::Member;
use crate::domain::planning::Slot;
use crate::ports::{NotificationContext, NotificationSender};

#[derive(Debug, Clone, Copy)]
pub struct LogNotificationSender {
    deliver: bool,
}

impl LogNotificationSender {
    /// Logs each notification and reports it delivered.
    pub fn new() -> Self {
        Self { deliver: true }
    }

    /// Logs each notification and reports it not delivered, for when
    /// notifications are switched off.
    pub fn disabled() -> Self {
        Self { deliver: false }
    }
}

impl Default for LogNotificationSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSender for LogNotificationSender {
    async fn notify(&self, member: &Member, slot: &Slot, context: &NotificationContext) -> bool {
        if self.deliver {
            tracing::info!(
                member_id = %member.id,
                slot_id = %slot.id(),
                planning = %context.planning_name,
                location = %slot.location(),
                "Assignment notification (log only)"
            );
        } else {
            tracing::debug!(
                member_id = %member.id,
                slot_id = %slot.id(),
                "Notifications disabled; not sent"
            );
        }
        self.deliver
    }
}

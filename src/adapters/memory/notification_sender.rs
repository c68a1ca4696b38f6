//! Notification sender that records calls instead of delivering them.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::foundation::{MemberId, SlotId};
use crate::domain::member::Member;
use crate::domain::planning::Slot;
use crate::ports::{NotificationContext, NotificationSender};

/// One captured `notify` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedNotification {
    pub member_id: MemberId,
    pub slot_id: SlotId,
    pub planning_name: String,
    pub delivered: bool,
}

/// Captures every call; reports failure when configured to.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotificationSender {
    calls: Arc<Mutex<Vec<RecordedNotification>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender whose every delivery fails.
    pub fn failing() -> Self {
        let sender = Self::default();
        sender.set_failing(true);
        sender
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn calls(&self) -> Vec<RecordedNotification> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl NotificationSender for RecordingNotificationSender {
    async fn notify(&self, member: &Member, slot: &Slot, context: &NotificationContext) -> bool {
        let delivered = !self.failing.load(Ordering::SeqCst);
        self.calls.lock().await.push(RecordedNotification {
            member_id: member.id.clone(),
            slot_id: *slot.id(),
            planning_name: context.planning_name.clone(),
            delivered,
        });
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{PlanningId, Timestamp};
    use crate::domain::planning::SlotDraft;
    use chrono::NaiveDate;

    fn fixtures() -> (Member, Slot, NotificationContext) {
        let member = Member::new(MemberId::new("m-1").unwrap(), "Alice").unwrap();
        let start = Timestamp::now();
        let slot = SlotDraft::new(PlanningId::new(), "Bar", start, start.plus_minutes(60), 1, None)
            .unwrap()
            .into_slot(0);
        let context = NotificationContext {
            planning_name: "Fair".to_string(),
            reference_date: NaiveDate::from_ymd_opt(2026, 6, 21).unwrap(),
            event: None,
        };
        (member, slot, context)
    }

    #[tokio::test]
    async fn records_successful_calls() {
        let sender = RecordingNotificationSender::new();
        let (member, slot, context) = fixtures();

        assert!(sender.notify(&member, &slot, &context).await);

        let calls = sender.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].planning_name, "Fair");
        assert!(calls[0].delivered);
    }

    #[tokio::test]
    async fn failing_sender_still_records() {
        let sender = RecordingNotificationSender::failing();
        let (member, slot, context) = fixtures();

        assert!(!sender.notify(&member, &slot, &context).await);
        assert_eq!(sender.call_count().await, 1);

        sender.set_failing(false);
        assert!(sender.notify(&member, &slot, &context).await);
    }
}

//! Notification sender port.
//!
//! Fire-and-record: senders report delivery as a flag and never fail the
//! caller. Transport errors are logged by the adapter.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::member::Member;
use crate::domain::planning::{EventContext, Planning, Slot};

/// Planning details included in an assignment notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContext {
    pub planning_name: String,
    pub reference_date: NaiveDate,
    pub event: Option<EventContext>,
}

impl NotificationContext {
    pub fn for_planning(planning: &Planning) -> Self {
        Self {
            planning_name: planning.name().to_string(),
            reference_date: planning.reference_date(),
            event: planning.event().cloned(),
        }
    }
}

/// Transport errors raised inside sender adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    #[error("Member {0} has no usable email address")]
    Unreachable(String),

    #[error("Provider rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Tells `member` about their assignment to `slot`.
    ///
    /// Returns true if the message was handed to the transport.
    async fn notify(&self, member: &Member, slot: &Slot, context: &NotificationContext) -> bool;
}

//! Assignment entity: one member on one slot.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AssignmentId, MemberId, SlotId, Timestamp};
use crate::domain::member::Member;

/// Outcome of the notification attached to an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NotificationStatus {
    /// The caller did not ask for a notification.
    NotRequested,
    /// Waiting for the deferred notifier.
    Pending,
    Sent { at: Timestamp },
    Failed { attempted_at: Timestamp },
}

impl NotificationStatus {
    /// Maps a sender result to a final status.
    pub fn from_outcome(delivered: bool, at: Timestamp) -> Self {
        if delivered {
            NotificationStatus::Sent { at }
        } else {
            NotificationStatus::Failed { attempted_at: at }
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, NotificationStatus::Sent { .. })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, NotificationStatus::Pending)
    }

    /// Stable lowercase name, used for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::NotRequested => "not_requested",
            NotificationStatus::Pending => "pending",
            NotificationStatus::Sent { .. } => "sent",
            NotificationStatus::Failed { .. } => "failed",
        }
    }

    /// Time of the send or of the failed attempt.
    pub fn attempted_at(&self) -> Option<Timestamp> {
        match self {
            NotificationStatus::Sent { at } => Some(*at),
            NotificationStatus::Failed { attempted_at } => Some(*attempted_at),
            NotificationStatus::NotRequested | NotificationStatus::Pending => None,
        }
    }
}

/// Member fields captured when the assignment was made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedMember {
    pub id: MemberId,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl From<&Member> for AssignedMember {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id.clone(),
            display_name: member.display_name.clone(),
            email: member.email.clone(),
            role: member.role.clone(),
        }
    }
}

impl From<AssignedMember> for Member {
    fn from(snapshot: AssignedMember) -> Self {
        Member {
            id: snapshot.id,
            display_name: snapshot.display_name,
            email: snapshot.email,
            role: snapshot.role,
        }
    }
}

/// A member placed on a slot.
///
/// # Invariants
///
/// - `(slot_id, member.id)` is unique across the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    id: AssignmentId,
    slot_id: SlotId,
    member: AssignedMember,
    created_at: Timestamp,
    notification: NotificationStatus,
}

impl Assignment {
    /// Creates an assignment with a snapshot of `member`.
    pub fn new(slot_id: SlotId, member: &Member, notification: NotificationStatus) -> Self {
        Self {
            id: AssignmentId::new(),
            slot_id,
            member: AssignedMember::from(member),
            created_at: Timestamp::now(),
            notification,
        }
    }

    /// Reconstitute an assignment from persistence.
    pub fn reconstitute(
        id: AssignmentId,
        slot_id: SlotId,
        member: AssignedMember,
        created_at: Timestamp,
        notification: NotificationStatus,
    ) -> Self {
        Self {
            id,
            slot_id,
            member,
            created_at,
            notification,
        }
    }

    pub fn id(&self) -> &AssignmentId {
        &self.id
    }

    pub fn slot_id(&self) -> &SlotId {
        &self.slot_id
    }

    pub fn member(&self) -> &AssignedMember {
        &self.member
    }

    pub fn member_id(&self) -> &MemberId {
        &self.member.id
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn notification(&self) -> NotificationStatus {
        self.notification
    }

    /// True only once a notification has been delivered.
    pub fn notification_sent(&self) -> bool {
        self.notification.is_sent()
    }

    /// Delivery time, if a notification was delivered.
    pub fn notified_at(&self) -> Option<Timestamp> {
        match self.notification {
            NotificationStatus::Sent { at } => Some(at),
            _ => None,
        }
    }

    pub fn record_notification(&mut self, status: NotificationStatus) {
        self.notification = status;
    }
}

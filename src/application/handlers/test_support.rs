//! Fixtures shared by handler tests.

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use std::sync::Arc;

use crate::adapters::events::InMemoryEventBus;
use crate::adapters::memory::{
    InMemoryMemberDirectory, InMemoryPlanningRepository, RecordingNotificationSender,
};
use crate::domain::foundation::{
    CommandMetadata, DomainError, ErrorCode, EventEnvelope, MemberId, PlanningId, PlanningStatus,
    Timestamp, UserId,
};
use crate::domain::member::Member;
use crate::domain::planning::{Planning, Slot, SlotDraft};
use crate::ports::{EventPublisher, PlanningRepository, SlotInsert};

pub struct Fixture {
    pub repo: Arc<InMemoryPlanningRepository>,
    pub directory: Arc<InMemoryMemberDirectory>,
    pub sender: Arc<RecordingNotificationSender>,
    pub bus: Arc<InMemoryEventBus>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            repo: Arc::new(InMemoryPlanningRepository::new()),
            directory: Arc::new(InMemoryMemberDirectory::with_members([
                member("alice", "Alice"),
                member("bob", "Bob"),
                member("carol", "Carol"),
            ])),
            sender: Arc::new(RecordingNotificationSender::new()),
            bus: Arc::new(InMemoryEventBus::new()),
        }
    }

    pub async fn planning(&self) -> Planning {
        let planning = Planning::new(
            PlanningId::new(),
            "Summer fair",
            None,
            NaiveDate::from_ymd_opt(2026, 6, 21).unwrap(),
            None,
        )
        .unwrap();
        self.repo.save_planning(&planning).await.unwrap();
        planning
    }

    pub async fn slot(&self, planning: &Planning, required: i64) -> Slot {
        let draft = SlotDraft::new(*planning.id(), "Bar", at(8), at(10), required, None).unwrap();
        match self.repo.insert_slot(draft).await.unwrap() {
            SlotInsert::Inserted(slot) => slot,
            other => panic!("Expected Inserted, got {:?}", other),
        }
    }

    pub async fn archive(&self, planning: &Planning) {
        self.repo
            .update_status(
                planning.id(),
                planning.status(),
                PlanningStatus::Archived,
                Timestamp::now(),
            )
            .await
            .unwrap();
    }
}

pub fn member(id: &str, name: &str) -> Member {
    Member::new(MemberId::new(id).unwrap(), name)
        .unwrap()
        .with_email(format!("{}@example.org", id))
}

pub fn member_id(id: &str) -> MemberId {
    MemberId::new(id).unwrap()
}

pub fn at(hour: u32) -> Timestamp {
    Timestamp::from_datetime(Utc.with_ymd_and_hms(2026, 6, 21, hour, 0, 0).unwrap())
}

pub fn metadata() -> CommandMetadata {
    CommandMetadata::new(UserId::new("operator-1").unwrap()).with_correlation_id("req-1")
}

/// Publisher whose every publish fails.
pub struct FailingPublisher;

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, _event: EventEnvelope) -> Result<(), DomainError> {
        Err(DomainError::new(ErrorCode::InternalError, "bus unavailable"))
    }

    async fn publish_all(&self, _events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        Err(DomainError::new(ErrorCode::InternalError, "bus unavailable"))
    }
}

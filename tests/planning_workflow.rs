//! End-to-end tests of the planning handlers over the in-memory adapters.
//!
//! These tests verify:
//! 1. A full plan-slot-assign flow and the derived statistics
//! 2. Capacity holds under concurrent assigns
//! 3. Lifecycle gating and cascading deletes
//! 4. Notification failures never undo an assignment

use chrono::{NaiveDate, TimeZone, Utc};
use std::sync::Arc;

use shift_planner::adapters::events::InMemoryEventBus;
use shift_planner::adapters::memory::{
    InMemoryMemberDirectory, InMemoryPlanningRepository, RecordingNotificationSender,
};
use shift_planner::application::handlers::{
    AddSlotCommand, AddSlotHandler, AssignMemberCommand, AssignMemberHandler,
    CreatePlanningCommand, CreatePlanningHandler, DeletePlanningCommand, DeletePlanningHandler,
    GetPlanningWithStatsHandler, GetPlanningWithStatsQuery, RemoveSlotCommand, RemoveSlotHandler,
    SetPlanningStatusCommand, SetPlanningStatusHandler, UnassignMemberCommand,
    UnassignMemberHandler,
};
use shift_planner::domain::foundation::{
    CommandMetadata, MemberId, PlanningId, PlanningStatus, SlotId, Timestamp, UserId,
};
use shift_planner::domain::member::Member;
use shift_planner::domain::planning::{NotificationStatus, PlanningError, Slot};
use shift_planner::ports::PlanningRepository;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct App {
    repo: Arc<InMemoryPlanningRepository>,
    directory: Arc<InMemoryMemberDirectory>,
    sender: Arc<RecordingNotificationSender>,
    bus: Arc<InMemoryEventBus>,
}

impl App {
    fn new() -> Self {
        Self::with_sender(RecordingNotificationSender::new())
    }

    fn with_sender(sender: RecordingNotificationSender) -> Self {
        Self {
            repo: Arc::new(InMemoryPlanningRepository::new()),
            directory: Arc::new(InMemoryMemberDirectory::new()),
            sender: Arc::new(sender),
            bus: Arc::new(InMemoryEventBus::new()),
        }
    }

    async fn add_members(&self, count: usize) -> Vec<MemberId> {
        let mut ids = Vec::with_capacity(count);
        for i in 0..count {
            let id = MemberId::new(format!("member-{}", i)).unwrap();
            let member = Member::new(id.clone(), format!("Member {}", i))
                .unwrap()
                .with_email(format!("member-{}@example.org", i));
            self.directory.upsert(member).await;
            ids.push(id);
        }
        ids
    }

    async fn create_planning(&self) -> PlanningId {
        let handler = CreatePlanningHandler::new(self.repo.clone(), self.bus.clone());
        let result = handler
            .handle(
                CreatePlanningCommand {
                    name: "Summer fair".to_string(),
                    description: None,
                    reference_date: NaiveDate::from_ymd_opt(2026, 6, 21).unwrap(),
                    event: None,
                },
                metadata(),
            )
            .await
            .unwrap();
        *result.planning.id()
    }

    async fn add_slot(&self, planning_id: PlanningId, location: &str, required: i64) -> Slot {
        AddSlotHandler::new(self.repo.clone(), self.bus.clone())
            .handle(
                AddSlotCommand {
                    planning_id,
                    location: location.to_string(),
                    start: at(8),
                    end: at(10),
                    required_people: required,
                    notes: None,
                },
                metadata(),
            )
            .await
            .unwrap()
    }

    fn assign_handler(&self) -> AssignMemberHandler {
        AssignMemberHandler::new(
            self.repo.clone(),
            self.directory.clone(),
            self.sender.clone(),
            self.bus.clone(),
        )
    }

    async fn assign(
        &self,
        slot_id: SlotId,
        member_id: &MemberId,
        send_notification: bool,
    ) -> Result<shift_planner::application::handlers::AssignMemberResult, PlanningError> {
        self.assign_handler()
            .handle(
                AssignMemberCommand {
                    slot_id,
                    member_id: member_id.clone(),
                    send_notification,
                },
                metadata(),
            )
            .await
    }

    async fn set_status(&self, planning_id: PlanningId, status: &str) -> Result<(), PlanningError> {
        SetPlanningStatusHandler::new(self.repo.clone(), self.bus.clone())
            .handle(
                SetPlanningStatusCommand {
                    planning_id,
                    status: status.to_string(),
                },
                metadata(),
            )
            .await
            .map(|_| ())
    }

    async fn view(&self, planning_id: PlanningId) -> shift_planner::domain::planning::PlanningView {
        GetPlanningWithStatsHandler::new(self.repo.clone())
            .handle(GetPlanningWithStatsQuery { planning_id })
            .await
            .unwrap()
    }
}

fn at(hour: u32) -> Timestamp {
    Timestamp::from_datetime(Utc.with_ymd_and_hms(2026, 6, 21, hour, 0, 0).unwrap())
}

fn metadata() -> CommandMetadata {
    CommandMetadata::new(UserId::new("operator-1").unwrap())
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn bar_shift_fills_up_and_rejects_the_third_member() {
    let app = App::new();
    let members = app.add_members(3).await;
    let planning_id = app.create_planning().await;
    let bar = app.add_slot(planning_id, "Bar", 2).await;

    let first = app.assign(*bar.id(), &members[0], true).await.unwrap();
    assert!(first.notification_sent);
    assert!(matches!(
        first.assignment.notification(),
        NotificationStatus::Sent { .. }
    ));

    let second = app.assign(*bar.id(), &members[1], false).await.unwrap();
    assert!(!second.notification_sent);

    let third = app.assign(*bar.id(), &members[2], true).await;
    assert!(matches!(third, Err(PlanningError::CapacityExceeded { .. })));

    let view = app.view(planning_id).await;
    let slot = &view.slots[0];
    assert_eq!(slot.stats.assigned_count, 2);
    assert!(slot.stats.is_full);
    assert_eq!(slot.stats.remaining, 0);
    assert_eq!(view.stats.fill_rate.value(), 100);

    // Only the first assign asked for a notification
    assert_eq!(app.sender.call_count().await, 1);
    assert!(app.bus.has_event("assignment.created.v1"));
}

#[tokio::test]
async fn fill_rate_is_computed_across_slots() {
    let app = App::new();
    let members = app.add_members(4).await;
    let planning_id = app.create_planning().await;
    let bar = app.add_slot(planning_id, "Bar", 2).await;
    let gate = app.add_slot(planning_id, "Gate", 3).await;

    app.assign(*bar.id(), &members[0], false).await.unwrap();
    app.assign(*bar.id(), &members[1], false).await.unwrap();
    app.assign(*gate.id(), &members[2], false).await.unwrap();
    app.assign(*gate.id(), &members[3], false).await.unwrap();

    let view = app.view(planning_id).await;
    assert_eq!(view.stats.total_slots, 2);
    assert_eq!(view.stats.total_required, 5);
    assert_eq!(view.stats.total_assigned, 4);
    assert_eq!(view.stats.fill_rate.value(), 80);
    assert_eq!(view.slots[1].stats.remaining, 1);
}

#[tokio::test]
async fn concurrent_assigns_never_overfill_a_slot() {
    let app = Arc::new(App::new());
    let members = app.add_members(20).await;
    let planning_id = app.create_planning().await;
    let slot = app.add_slot(planning_id, "Kitchen", 5).await;

    let tasks: Vec<_> = members
        .into_iter()
        .map(|member_id| {
            let app = app.clone();
            let slot_id = *slot.id();
            tokio::spawn(async move { app.assign(slot_id, &member_id, false).await })
        })
        .collect();

    let mut succeeded = 0;
    let mut rejected = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(PlanningError::CapacityExceeded { .. }) => rejected += 1,
            Err(other) => panic!("Unexpected error: {:?}", other),
        }
    }

    assert_eq!(succeeded, 5);
    assert_eq!(rejected, 15);
    assert_eq!(app.repo.assignment_count().await, 5);
}

#[tokio::test]
async fn archived_planning_is_read_only() {
    let app = App::new();
    let members = app.add_members(2).await;
    let planning_id = app.create_planning().await;
    let slot = app.add_slot(planning_id, "Bar", 2).await;
    let kept = app.assign(*slot.id(), &members[0], false).await.unwrap();

    app.set_status(planning_id, "published").await.unwrap();
    app.set_status(planning_id, "archived").await.unwrap();

    let assign = app.assign(*slot.id(), &members[1], false).await;
    assert!(matches!(assign, Err(PlanningError::Archived(_))));

    let unassign = UnassignMemberHandler::new(app.repo.clone(), app.bus.clone())
        .handle(
            UnassignMemberCommand {
                assignment_id: *kept.assignment.id(),
            },
            metadata(),
        )
        .await;
    assert!(matches!(unassign, Err(PlanningError::Archived(_))));

    let reopen = app.set_status(planning_id, "draft").await;
    assert!(matches!(
        reopen,
        Err(PlanningError::IllegalTransition {
            from: PlanningStatus::Archived,
            to: PlanningStatus::Draft,
        })
    ));

    // Reads still work
    let view = app.view(planning_id).await;
    assert_eq!(view.planning.status(), PlanningStatus::Archived);
    assert_eq!(view.stats.total_assigned, 1);
}

#[tokio::test]
async fn deleting_a_planning_cascades_to_slots_and_assignments() {
    let app = App::new();
    let members = app.add_members(3).await;
    let planning_id = app.create_planning().await;
    let bar = app.add_slot(planning_id, "Bar", 2).await;
    let gate = app.add_slot(planning_id, "Gate", 1).await;
    app.assign(*bar.id(), &members[0], false).await.unwrap();
    app.assign(*bar.id(), &members[1], false).await.unwrap();
    app.assign(*gate.id(), &members[2], false).await.unwrap();

    let summary = DeletePlanningHandler::new(app.repo.clone(), app.bus.clone())
        .handle(DeletePlanningCommand { planning_id }, metadata())
        .await
        .unwrap();

    assert_eq!(summary.slots_removed, 2);
    assert_eq!(summary.assignments_removed, 3);
    assert_eq!(app.repo.planning_count().await, 0);
    assert_eq!(app.repo.slot_count().await, 0);
    assert_eq!(app.repo.assignment_count().await, 0);

    let again = DeletePlanningHandler::new(app.repo.clone(), app.bus.clone())
        .handle(DeletePlanningCommand { planning_id }, metadata())
        .await;
    assert!(matches!(again, Err(PlanningError::PlanningNotFound(_))));
}

#[tokio::test]
async fn removing_a_slot_frees_its_members() {
    let app = App::new();
    let members = app.add_members(3).await;
    let planning_id = app.create_planning().await;
    let bar = app.add_slot(planning_id, "Bar", 2).await;
    let gate = app.add_slot(planning_id, "Gate", 1).await;
    app.assign(*bar.id(), &members[0], false).await.unwrap();
    app.assign(*bar.id(), &members[1], false).await.unwrap();
    let kept = app.assign(*gate.id(), &members[2], false).await.unwrap();

    let removed = RemoveSlotHandler::new(app.repo.clone(), app.bus.clone())
        .handle(RemoveSlotCommand { slot_id: *bar.id() }, metadata())
        .await
        .unwrap();

    assert_eq!(removed.assignments_removed, 2);
    let remaining = app.repo.list_assignments(&planning_id).await.unwrap();
    assert!(remaining.iter().all(|a| a.slot_id() != bar.id()));
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id(), kept.assignment.id());
    assert_eq!(app.repo.assignment_count().await, 1);

    let view = app.view(planning_id).await;
    assert_eq!(view.slots.len(), 1);
    assert_eq!(view.stats.total_assigned, 1);
    assert_eq!(view.stats.fill_rate.value(), 100);
}

#[tokio::test]
async fn failing_notifier_keeps_the_assignment() {
    let app = App::with_sender(RecordingNotificationSender::failing());
    let members = app.add_members(1).await;
    let planning_id = app.create_planning().await;
    let bar = app.add_slot(planning_id, "Bar", 2).await;

    let result = app.assign(*bar.id(), &members[0], true).await.unwrap();

    assert!(!result.notification_sent);
    assert!(matches!(
        result.assignment.notification(),
        NotificationStatus::Failed { .. }
    ));
    assert_eq!(app.sender.call_count().await, 1);

    let view = app.view(planning_id).await;
    assert_eq!(view.slots[0].assignments.len(), 1);
    assert!(!view.slots[0].assignments[0].notification_sent());
}

//! PostgreSQL implementation of PlanningRepository.
//!
//! # Locking
//!
//! Conditional writes run in a transaction. Slot rows are locked
//! `FOR UPDATE` before the owning planning row is locked `FOR SHARE`, so
//! assignment inserts on one slot serialize with each other and an
//! `archived` status change waits for in-flight mutations. Every path takes
//! slot locks before planning locks.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::foundation::{
    AssignmentId, DomainError, MemberId, PlanningId, PlanningStatus, SlotId, Timestamp,
};
use crate::domain::planning::{
    AssignedMember, Assignment, EventContext, NotificationStatus, Planning, Slot, SlotDraft,
    TimeRange,
};
use crate::ports::{
    AssignmentInsert, AssignmentRemoval, CascadeSummary, PlanningRepository, SlotInsert,
    SlotRemoval, SlotUpdate, StatusUpdate,
};

const PLANNING_COLUMNS: &str = "id, name, description, reference_date, status, event_id, \
     event_name, created_at, updated_at";

const SLOT_COLUMNS: &str = "id, planning_id, location, start_at, end_at, required_people, \
     notes, position, created_at";

const ASSIGNMENT_COLUMNS: &str = "a.id, a.slot_id, a.member_id, a.member_display_name, \
     a.member_email, a.member_role, a.created_at, a.notification_state, a.notification_at";

/// PostgreSQL implementation of PlanningRepository.
#[derive(Clone)]
pub struct PostgresPlanningRepository {
    pool: PgPool,
}

impl PostgresPlanningRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> Result<Transaction<'_, Postgres>, DomainError> {
        self.pool
            .begin()
            .await
            .map_err(db_error("begin transaction"))
    }
}

#[async_trait]
impl PlanningRepository for PostgresPlanningRepository {
    async fn save_planning(&self, planning: &Planning) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO plannings (
                id, name, description, reference_date, status,
                event_id, event_name, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(planning.id().as_uuid())
        .bind(planning.name())
        .bind(planning.description())
        .bind(planning.reference_date())
        .bind(planning.status().as_str())
        .bind(planning.event().map(|e| e.id.as_str()))
        .bind(planning.event().map(|e| e.name.as_str()))
        .bind(planning.created_at().as_datetime())
        .bind(planning.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("insert planning"))?;

        Ok(())
    }

    async fn find_planning(&self, id: &PlanningId) -> Result<Option<Planning>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM plannings WHERE id = $1",
            PLANNING_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch planning"))?;

        row.as_ref().map(row_to_planning).transpose()
    }

    async fn list_plannings(
        &self,
        status: Option<PlanningStatus>,
    ) -> Result<Vec<Planning>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM plannings \
             WHERE ($1::text IS NULL OR status = $1) \
             ORDER BY reference_date, name",
            PLANNING_COLUMNS
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list plannings"))?;

        rows.iter().map(row_to_planning).collect()
    }

    async fn update_status(
        &self,
        id: &PlanningId,
        expected: PlanningStatus,
        status: PlanningStatus,
        updated_at: Timestamp,
    ) -> Result<StatusUpdate, DomainError> {
        let row = sqlx::query(&format!(
            "UPDATE plannings SET status = $3, updated_at = $4 \
             WHERE id = $1 AND status = $2 \
             RETURNING {}",
            PLANNING_COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(expected.as_str())
        .bind(status.as_str())
        .bind(updated_at.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("update planning status"))?;

        if let Some(row) = row {
            return Ok(StatusUpdate::Updated(row_to_planning(&row)?));
        }

        match self.find_planning(id).await? {
            Some(current) => Ok(StatusUpdate::Conflict(current.status())),
            None => Ok(StatusUpdate::Missing),
        }
    }

    async fn delete_planning(
        &self,
        id: &PlanningId,
    ) -> Result<Option<CascadeSummary>, DomainError> {
        let mut tx = self.begin().await?;

        let slot_ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM slots WHERE planning_id = $1 FOR UPDATE")
                .bind(id.as_uuid())
                .fetch_all(&mut *tx)
                .await
                .map_err(db_error("lock slots"))?;

        let assignments: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM assignments WHERE slot_id = ANY($1)")
                .bind(&slot_ids)
                .fetch_one(&mut *tx)
                .await
                .map_err(db_error("count assignments"))?;

        let result = sqlx::query("DELETE FROM plannings WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(db_error("delete planning"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        tx.commit().await.map_err(db_error("commit transaction"))?;

        Ok(Some(CascadeSummary {
            slots_removed: to_u32(slot_ids.len() as i64),
            assignments_removed: to_u32(assignments),
        }))
    }

    async fn insert_slot(&self, draft: SlotDraft) -> Result<SlotInsert, DomainError> {
        let mut tx = self.begin().await?;

        let status = lock_planning(&mut tx, draft.planning_id(), "FOR UPDATE").await?;
        match status {
            None => return Ok(SlotInsert::PlanningMissing),
            Some(s) if !s.is_mutable() => return Ok(SlotInsert::PlanningArchived),
            Some(_) => {}
        }

        let position: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM slots WHERE planning_id = $1",
        )
        .bind(draft.planning_id().as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("compute slot position"))?;

        let slot = draft.into_slot(to_u32(i64::from(position)));

        sqlx::query(
            r#"
            INSERT INTO slots (
                id, planning_id, location, start_at, end_at,
                required_people, notes, position, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(slot.id().as_uuid())
        .bind(slot.planning_id().as_uuid())
        .bind(slot.location())
        .bind(slot.start().as_datetime())
        .bind(slot.end().as_datetime())
        .bind(to_i32(slot.required_people(), "required_people")?)
        .bind(slot.notes())
        .bind(to_i32(slot.position(), "position")?)
        .bind(slot.created_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error("insert slot"))?;

        tx.commit().await.map_err(db_error("commit transaction"))?;

        Ok(SlotInsert::Inserted(slot))
    }

    async fn update_slot(&self, slot: &Slot) -> Result<SlotUpdate, DomainError> {
        let mut tx = self.begin().await?;

        let Some(planning_id) = lock_slot(&mut tx, slot.id()).await? else {
            return Ok(SlotUpdate::Missing);
        };
        if !is_mutable(lock_planning(&mut tx, &planning_id, "FOR SHARE").await?) {
            return Ok(SlotUpdate::PlanningArchived);
        }

        let assigned = count_assignments(&mut tx, slot.id()).await?;
        if slot.required_people() < assigned {
            return Ok(SlotUpdate::BelowAssigned { assigned });
        }

        sqlx::query(
            r#"
            UPDATE slots SET
                location = $2,
                start_at = $3,
                end_at = $4,
                required_people = $5,
                notes = $6
            WHERE id = $1
            "#,
        )
        .bind(slot.id().as_uuid())
        .bind(slot.location())
        .bind(slot.start().as_datetime())
        .bind(slot.end().as_datetime())
        .bind(to_i32(slot.required_people(), "required_people")?)
        .bind(slot.notes())
        .execute(&mut *tx)
        .await
        .map_err(db_error("update slot"))?;

        tx.commit().await.map_err(db_error("commit transaction"))?;

        Ok(SlotUpdate::Updated(slot.clone()))
    }

    async fn find_slot(&self, id: &SlotId) -> Result<Option<Slot>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM slots WHERE id = $1", SLOT_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch slot"))?;

        row.as_ref().map(row_to_slot).transpose()
    }

    async fn list_slots(&self, planning_id: &PlanningId) -> Result<Vec<Slot>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM slots WHERE planning_id = $1 ORDER BY position",
            SLOT_COLUMNS
        ))
        .bind(planning_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list slots"))?;

        rows.iter().map(row_to_slot).collect()
    }

    async fn delete_slot(&self, id: &SlotId) -> Result<SlotRemoval, DomainError> {
        let mut tx = self.begin().await?;

        let Some(planning_id) = lock_slot(&mut tx, id).await? else {
            return Ok(SlotRemoval::Missing);
        };
        if !is_mutable(lock_planning(&mut tx, &planning_id, "FOR SHARE").await?) {
            return Ok(SlotRemoval::PlanningArchived);
        }

        let assignments_removed = count_assignments(&mut tx, id).await?;

        sqlx::query("DELETE FROM slots WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(db_error("delete slot"))?;

        tx.commit().await.map_err(db_error("commit transaction"))?;

        Ok(SlotRemoval::Removed {
            assignments_removed,
        })
    }

    async fn insert_assignment(
        &self,
        assignment: &Assignment,
    ) -> Result<AssignmentInsert, DomainError> {
        let mut tx = self.begin().await?;

        let slot_row = sqlx::query(
            "SELECT planning_id, required_people FROM slots WHERE id = $1 FOR UPDATE",
        )
        .bind(assignment.slot_id().as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("lock slot"))?;

        let Some(slot_row) = slot_row else {
            return Ok(AssignmentInsert::SlotMissing);
        };
        let planning_id = PlanningId::from_uuid(get(&slot_row, "planning_id")?);
        let required_people = to_u32(i64::from(get::<i32>(&slot_row, "required_people")?));

        if !is_mutable(lock_planning(&mut tx, &planning_id, "FOR SHARE").await?) {
            return Ok(AssignmentInsert::PlanningArchived);
        }

        if count_assignments(&mut tx, assignment.slot_id()).await? >= required_people {
            return Ok(AssignmentInsert::CapacityExceeded { required_people });
        }

        let (state, at) = notification_columns(&assignment.notification());
        let member = assignment.member();
        let result = sqlx::query(
            r#"
            INSERT INTO assignments (
                id, slot_id, member_id, member_display_name, member_email,
                member_role, created_at, notification_state, notification_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(assignment.id().as_uuid())
        .bind(assignment.slot_id().as_uuid())
        .bind(member.id.as_str())
        .bind(member.display_name.as_str())
        .bind(member.email.as_deref())
        .bind(member.role.as_deref())
        .bind(assignment.created_at().as_datetime())
        .bind(state)
        .bind(at)
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Ok(AssignmentInsert::Duplicate);
            }
            Err(e) => return Err(db_error("insert assignment")(e)),
        }

        tx.commit().await.map_err(db_error("commit transaction"))?;

        Ok(AssignmentInsert::Inserted)
    }

    async fn find_assignment(
        &self,
        id: &AssignmentId,
    ) -> Result<Option<Assignment>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM assignments a WHERE a.id = $1",
            ASSIGNMENT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch assignment"))?;

        row.as_ref().map(row_to_assignment).transpose()
    }

    async fn list_assignments(
        &self,
        planning_id: &PlanningId,
    ) -> Result<Vec<Assignment>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM assignments a \
             JOIN slots s ON s.id = a.slot_id \
             WHERE s.planning_id = $1 \
             ORDER BY a.created_at",
            ASSIGNMENT_COLUMNS
        ))
        .bind(planning_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list assignments"))?;

        rows.iter().map(row_to_assignment).collect()
    }

    async fn delete_assignment(
        &self,
        id: &AssignmentId,
    ) -> Result<AssignmentRemoval, DomainError> {
        let mut tx = self.begin().await?;

        let slot_id: Option<Uuid> =
            sqlx::query_scalar("SELECT slot_id FROM assignments WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("fetch assignment"))?;
        let Some(slot_id) = slot_id.map(SlotId::from_uuid) else {
            return Ok(AssignmentRemoval::Missing);
        };

        let Some(planning_id) = lock_slot(&mut tx, &slot_id).await? else {
            return Ok(AssignmentRemoval::Missing);
        };
        if !is_mutable(lock_planning(&mut tx, &planning_id, "FOR SHARE").await?) {
            return Ok(AssignmentRemoval::PlanningArchived);
        }

        let row = sqlx::query(&format!(
            "DELETE FROM assignments a WHERE a.id = $1 RETURNING {}",
            ASSIGNMENT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("delete assignment"))?;

        let Some(row) = row else {
            return Ok(AssignmentRemoval::Missing);
        };
        let removed = row_to_assignment(&row)?;

        tx.commit().await.map_err(db_error("commit transaction"))?;

        Ok(AssignmentRemoval::Removed(removed))
    }

    async fn record_notification(
        &self,
        id: &AssignmentId,
        status: &NotificationStatus,
    ) -> Result<bool, DomainError> {
        let (state, at) = notification_columns(status);
        let result = sqlx::query(
            "UPDATE assignments SET notification_state = $2, notification_at = $3 WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(state)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(db_error("record notification"))?;

        Ok(result.rows_affected() > 0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn db_error(action: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| DomainError::database(format!("Failed to {}: {}", action, e))
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(column)
        .map_err(|e| DomainError::database(format!("Failed to get {}: {}", column, e)))
}

fn to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Column value for an `INTEGER` column; out-of-range values are an error.
fn to_i32(value: u32, column: &str) -> Result<i32, DomainError> {
    i32::try_from(value)
        .map_err(|_| DomainError::database(format!("{} out of range: {}", column, value)))
}

fn is_mutable(status: Option<PlanningStatus>) -> bool {
    status.is_some_and(|s| s.is_mutable())
}

/// Locks the slot row; returns its planning, or `None` if the slot is gone.
async fn lock_slot(
    tx: &mut Transaction<'_, Postgres>,
    slot_id: &SlotId,
) -> Result<Option<PlanningId>, DomainError> {
    let planning_id: Option<Uuid> =
        sqlx::query_scalar("SELECT planning_id FROM slots WHERE id = $1 FOR UPDATE")
            .bind(slot_id.as_uuid())
            .fetch_optional(&mut **tx)
            .await
            .map_err(db_error("lock slot"))?;
    Ok(planning_id.map(PlanningId::from_uuid))
}

/// Locks the planning row in the given mode and returns its status.
async fn lock_planning(
    tx: &mut Transaction<'_, Postgres>,
    planning_id: &PlanningId,
    mode: &'static str,
) -> Result<Option<PlanningStatus>, DomainError> {
    let status: Option<String> = sqlx::query_scalar(&format!(
        "SELECT status FROM plannings WHERE id = $1 {}",
        mode
    ))
    .bind(planning_id.as_uuid())
    .fetch_optional(&mut **tx)
    .await
    .map_err(db_error("lock planning"))?;

    status.as_deref().map(parse_status).transpose()
}

async fn count_assignments(
    tx: &mut Transaction<'_, Postgres>,
    slot_id: &SlotId,
) -> Result<u32, DomainError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assignments WHERE slot_id = $1")
        .bind(slot_id.as_uuid())
        .fetch_one(&mut **tx)
        .await
        .map_err(db_error("count assignments"))?;
    Ok(to_u32(count))
}

fn parse_status(s: &str) -> Result<PlanningStatus, DomainError> {
    PlanningStatus::from_str(s)
        .map_err(|_| DomainError::database(format!("Invalid planning status: {}", s)))
}

fn notification_columns(status: &NotificationStatus) -> (&'static str, Option<DateTime<Utc>>) {
    (status.as_str(), status.attempted_at().map(|t| *t.as_datetime()))
}

fn notification_from_columns(
    state: &str,
    at: Option<DateTime<Utc>>,
) -> Result<NotificationStatus, DomainError> {
    let missing_time =
        || DomainError::database(format!("Notification state '{}' without timestamp", state));
    match state {
        "not_requested" => Ok(NotificationStatus::NotRequested),
        "pending" => Ok(NotificationStatus::Pending),
        "sent" => Ok(NotificationStatus::Sent {
            at: Timestamp::from_datetime(at.ok_or_else(missing_time)?),
        }),
        "failed" => Ok(NotificationStatus::Failed {
            attempted_at: Timestamp::from_datetime(at.ok_or_else(missing_time)?),
        }),
        other => Err(DomainError::database(format!(
            "Invalid notification state: {}",
            other
        ))),
    }
}

fn row_to_planning(row: &PgRow) -> Result<Planning, DomainError> {
    let status: String = get(row, "status")?;
    let event_id: Option<String> = get(row, "event_id")?;
    let event_name: Option<String> = get(row, "event_name")?;
    let event = match (event_id, event_name) {
        (Some(id), name) => Some(EventContext::new(id, name.unwrap_or_default())),
        (None, _) => None,
    };

    Ok(Planning::reconstitute(
        PlanningId::from_uuid(get(row, "id")?),
        get(row, "name")?,
        get(row, "description")?,
        get::<NaiveDate>(row, "reference_date")?,
        parse_status(&status)?,
        event,
        Timestamp::from_datetime(get(row, "created_at")?),
        Timestamp::from_datetime(get(row, "updated_at")?),
    ))
}

fn row_to_slot(row: &PgRow) -> Result<Slot, DomainError> {
    let time_range = TimeRange::new(
        Timestamp::from_datetime(get(row, "start_at")?),
        Timestamp::from_datetime(get(row, "end_at")?),
    )
    .map_err(|e| DomainError::database(format!("Invalid stored slot range: {}", e)))?;

    Ok(Slot::reconstitute(
        SlotId::from_uuid(get(row, "id")?),
        PlanningId::from_uuid(get(row, "planning_id")?),
        get(row, "location")?,
        time_range,
        to_u32(i64::from(get::<i32>(row, "required_people")?)),
        get(row, "notes")?,
        to_u32(i64::from(get::<i32>(row, "position")?)),
        Timestamp::from_datetime(get(row, "created_at")?),
    ))
}

fn row_to_assignment(row: &PgRow) -> Result<Assignment, DomainError> {
    let member_id: String = get(row, "member_id")?;
    let member = AssignedMember {
        id: MemberId::new(member_id)
            .map_err(|e| DomainError::database(format!("Invalid member_id: {}", e)))?,
        display_name: get(row, "member_display_name")?,
        email: get(row, "member_email")?,
        role: get(row, "member_role")?,
    };
    let state: String = get(row, "notification_state")?;

    Ok(Assignment::reconstitute(
        AssignmentId::from_uuid(get(row, "id")?),
        SlotId::from_uuid(get(row, "slot_id")?),
        member,
        Timestamp::from_datetime(get(row, "created_at")?),
        notification_from_columns(&state, get(row, "notification_at")?)?,
    ))
}

//! PostgreSQL implementation of MemberDirectory.
//!
//! Reads the `members` table kept in sync by the member management side.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, MemberId};
use crate::domain::member::Member;
use crate::ports::MemberDirectory;

#[derive(Clone)]
pub struct PostgresMemberDirectory {
    pool: PgPool,
}

impl PostgresMemberDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberDirectory for PostgresMemberDirectory {
    async fn find_member(&self, id: &MemberId) -> Result<Option<Member>, DomainError> {
        let row = sqlx::query("SELECT id, display_name, email, role FROM members WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to fetch member: {}", e),
                )
            })?;

        let Some(row) = row else {
            return Ok(None);
        };

        let read = |e: sqlx::Error| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to read member row: {}", e),
            )
        };
        let display_name: String = row.try_get("display_name").map_err(read)?;
        let email: Option<String> = row.try_get("email").map_err(read)?;
        let role: Option<String> = row.try_get("role").map_err(read)?;

        let mut member = Member::new(id.clone(), display_name).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid stored member {}: {}", id, e),
            )
        })?;
        member.email = email;
        member.role = role;

        Ok(Some(member))
    }
}

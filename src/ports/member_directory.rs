//! Member directory port.
//!
//! Members are managed outside this crate; the directory only answers
//! lookups by id.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MemberId};
use crate::domain::member::Member;

#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Returns `None` if no member has this id.
    async fn find_member(&self, id: &MemberId) -> Result<Option<Member>, DomainError>;
}

//! In-memory member directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, MemberId};
use crate::domain::member::Member;
use crate::ports::MemberDirectory;

#[derive(Debug, Clone, Default)]
pub struct InMemoryMemberDirectory {
    members: Arc<RwLock<HashMap<MemberId, Member>>>,
}

impl InMemoryMemberDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory pre-filled with `members`.
    pub fn with_members(members: impl IntoIterator<Item = Member>) -> Self {
        let map = members.into_iter().map(|m| (m.id.clone(), m)).collect();
        Self {
            members: Arc::new(RwLock::new(map)),
        }
    }

    /// Adds or replaces a member.
    pub async fn upsert(&self, member: Member) {
        self.members.write().await.insert(member.id.clone(), member);
    }

    pub async fn remove(&self, id: &MemberId) -> Option<Member> {
        self.members.write().await.remove(id)
    }
}

#[async_trait]
impl MemberDirectory for InMemoryMemberDirectory {
    async fn find_member(&self, id: &MemberId) -> Result<Option<Member>, DomainError> {
        Ok(self.members.read().await.get(id).cloned())
    }
}

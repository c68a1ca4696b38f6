//! Assignment command handlers and the deferred notification subscriber.

mod assign_member;
mod notify_assigned_member;
mod unassign_member;

pub use assign_member::{AssignMemberCommand, AssignMemberHandler, AssignMemberResult};
pub use notify_assigned_member::NotifyAssignedMemberHandler;
pub use unassign_member::{UnassignMemberCommand, UnassignMemberHandler};

//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `member` - Assignable people, as supplied by the member directory
//! - `planning` - Plannings, slots, assignments, statistics and events

pub mod foundation;
pub mod member;
pub mod planning;

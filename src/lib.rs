//! Shift Planner - volunteer shift planning service
//!
//! A planning groups time slots at named locations; members are assigned to
//! slots up to each slot's required headcount. Assignments can notify the
//! member, and a failed notification never undoes an assignment.
//!
//! Layout follows a hexagonal architecture:
//! - `domain` - Plannings, slots, assignments, statistics and events
//! - `ports` - Storage, member lookup, notification and export contracts
//! - `application` - Command and query handlers
//! - `adapters` - PostgreSQL, in-memory, email, export and HTTP implementations

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;

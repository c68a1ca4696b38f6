//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - In-process event bus
//! - `export` - CSV and Markdown rendering
//! - `http` - REST API
//! - `memory` - In-memory storage and test doubles
//! - `notification` - Email and log-only notification senders
//! - `postgres` - PostgreSQL storage

pub mod events;
pub mod export;
pub mod http;
pub mod memory;
pub mod notification;
pub mod postgres;

pub use events::InMemoryEventBus;
pub use export::TextPlanningExporter;
pub use notification::{EmailNotificationSender, LogNotificationSender};

//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage
//!
//! - `PlanningRepository` - Plannings, slots and assignments with atomic
//!   conditional writes
//! - `MemberDirectory` - Lookup of assignable members
//!
//! ## Outbound
//!
//! - `NotificationSender` - Tells a member about an assignment
//! - `PlanningExporter` - Renders a planning as CSV or Markdown
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events
//! - `EventSubscriber` - Port for subscribing to domain events
//! - `EventHandler` - Handler that processes incoming events

mod event_publisher;
mod event_subscriber;
mod member_directory;
mod notification_sender;
mod planning_exporter;
mod planning_repository;

pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use member_directory::MemberDirectory;
pub use notification_sender::{NotificationContext, NotificationError, NotificationSender};
pub use planning_exporter::{ExportError, ExportFormat, ExportedDocument, PlanningExporter};
pub use planning_repository::{
    AssignmentInsert, AssignmentRemoval, CascadeSummary, PlanningRepository, SlotInsert,
    SlotRemoval, SlotUpdate, StatusUpdate,
};

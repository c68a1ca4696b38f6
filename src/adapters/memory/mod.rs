//! In-memory adapters.
//!
//! Used by the test suites and for running the server without a database.

mod member_directory;
mod notification_sender;
mod planning_repository;

pub use member_directory::InMemoryMemberDirectory;
pub use notification_sender::{RecordedNotification, RecordingNotificationSender};
pub use planning_repository::InMemoryPlanningRepository;

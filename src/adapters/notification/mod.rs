//! Notification sender adapters.
//!
//! - `EmailNotificationSender` - Resend HTTP API
//! - `LogNotificationSender` - Log-only, for setups without an email provider

mod email;
mod log_only;

pub use email::{AssignmentMessage, EmailNotificationSender};
pub use log_only::LogNotificationSender;

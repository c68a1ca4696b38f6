//! Assignment notification configuration

use serde::Deserialize;

/// When assignment notifications are delivered.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationMode {
    /// Sent by the assign request after the assignment is stored.
    #[default]
    Inline,
    /// Recorded as pending and sent by an event subscriber.
    Deferred,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub mode: NotificationMode,

    /// When false, requested notifications are recorded as failed
    /// attempts without contacting any transport.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl NotificationConfig {
    pub fn is_deferred(&self) -> bool {
        self.mode == NotificationMode::Deferred
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            mode: NotificationMode::default(),
            enabled: default_enabled(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

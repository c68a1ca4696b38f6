//! Email notification sender using the Resend HTTP API.
//!
//! # Configuration
//!
//! ```ignore
//! let sender = EmailNotificationSender::new(&config.email.unwrap())?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::config::EmailConfig;
use crate::domain::member::Member;
use crate::domain::planning::Slot;
use crate::ports::{NotificationContext, NotificationError, NotificationSender};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Request body for `POST /emails`.
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: String,
    text: String,
}

/// Subject and plain-text body of an assignment email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentMessage {
    pub subject: String,
    pub body: String,
}

impl AssignmentMessage {
    pub fn render(member: &Member, slot: &Slot, context: &NotificationContext) -> Self {
        let start = slot.start();
        let end = slot.end();
        let date = start.as_datetime().format("%Y-%m-%d");
        let hours = format!(
            "{}-{}",
            start.as_datetime().format("%H:%M"),
            end.as_datetime().format("%H:%M")
        );

        let subject = format!("{}: {} {} {}", context.planning_name, slot.location(), date, hours);

        let mut body = format!(
            "Hello {},\n\nYou have been assigned to {} on {} from {} ({}).\n",
            member.display_name,
            slot.location(),
            date,
            hours,
            context.planning_name,
        );
        if let Some(event) = &context.event {
            body.push_str(&format!("Event: {}\n", event.name));
        }
        if let Some(notes) = slot.notes() {
            body.push_str(&format!("\nNotes: {}\n", notes));
        }
        body.push_str("\nThank you!\n");

        Self { subject, body }
    }
}

pub struct EmailNotificationSender {
    api_key: SecretString,
    from: String,
    api_base_url: String,
    http_client: reqwest::Client,
}

impl EmailNotificationSender {
    /// # Errors
    ///
    /// Returns the builder error if the HTTP client cannot be created.
    pub fn new(config: &EmailConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            api_key: config.resend_api_key.clone(),
            from: config.from_header(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    async fn send(
        &self,
        member: &Member,
        slot: &Slot,
        context: &NotificationContext,
    ) -> Result<(), NotificationError> {
        let to = member
            .email
            .as_deref()
            .filter(|_| member.is_reachable())
            .ok_or_else(|| NotificationError::Unreachable(member.id.to_string()))?;

        let message = AssignmentMessage::render(member, slot, context);
        let request = SendEmailRequest {
            from: &self.from,
            to: vec![to],
            subject: message.subject,
            text: message.body,
        };

        let response = self
            .http_client
            .post(format!("{}/emails", self.api_base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| NotificationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl NotificationSender for EmailNotificationSender {
    async fn notify(&self, member: &Member, slot: &Slot, context: &NotificationContext) -> bool {
        match self.send(member, slot, context).await {
            Ok(()) => {
                tracing::info!(member_id = %member.id, slot_id = %slot.id(), "Assignment email sent");
                true
            }
            Err(e) => {
                tracing::warn!(
                    member_id = %member.id,
                    slot_id = %slot.id(),
                    error = %e,
                    "Assignment email not sent"
                );
                false
            }
        }
    }
}

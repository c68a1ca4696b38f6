//! Member module.
//!
//! Members are owned by an external directory. The planning domain only
//! needs their identity and display fields.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MemberId, ValidationError};

/// A person who can be assigned to slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Member {
    /// Creates a member with the required display name.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the display name is blank
    pub fn new(id: MemberId, display_name: impl Into<String>) -> Result<Self, ValidationError> {
        let display_name = display_name.into();
        if display_name.trim().is_empty() {
            return Err(ValidationError::empty_field("display_name"));
        }
        Ok(Self {
            id,
            display_name,
            email: None,
            role: None,
        })
    }

    /// Builder: attach a contact email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Builder: attach a role label.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Returns true if the member can be reached by email.
    pub fn is_reachable(&self) -> bool {
        self.email.as_deref().is_some_and(|e| e.contains('@'))
    }
}

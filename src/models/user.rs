//! Signed-in user identity, supplied by the identity provider.

use serde::{Deserialize, Serialize};

/// An authenticated principal. Read-only input to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable unique identity (stamped into `created_by` and `participants`)
    pub id: String,
    /// Email address
    pub email: String,
    /// Display name, if the user set one
    pub display_name: Option<String>,
    /// Profile picture URL
    pub avatar: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            display_name: None,
            avatar: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Name shown as a ride's organizer: display name, else email.
    pub fn creator_label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

use serde::{Deserialize, Serialize};

use crate::UserId;

/// Authenticated caller resolved by the identity layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_id: UserId,
    username: String,
    display_name: String,
}

impl UserIdentity {
    /// Creates a user identity from directory data.
    #[must_use]
    pub fn new(
        user_id: UserId,
        username: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            username: username.into(),
            display_name: display_name.into(),
        }
    }

    /// Returns the stable account identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the login name.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }
}

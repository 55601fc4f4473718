use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An authenticated user context obtained from the auth service. Held in
/// memory for the lifetime of the process; the service owns expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl Session {
    /// Name shown to the user: the profile display name, falling back to
    /// the email address.
    pub fn display_label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("unknown user")
    }
}

/// Result of a sign-up call. The service returns a user object even when
/// the address is already registered; such users come back with an empty
/// identity list.
#[derive(Debug, Clone, Default)]
pub struct SignUpData {
    pub user: Option<SignUpUser>,
}

impl SignUpData {
    pub fn is_existing_user(&self) -> bool {
        self.user
            .as_ref()
            .map(|u| u.identities.is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
pub struct SignUpUser {
    pub id: String,
    pub identities: Vec<Value>,
}

/// Equality filter on a table column.
#[derive(Debug, Clone)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Sort order on a table column.
#[derive(Debug, Clone)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

impl Order {
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }
}

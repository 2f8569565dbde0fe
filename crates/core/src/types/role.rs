//! User roles.

use serde::{Deserialize, Serialize};

/// Role of a shop account.
///
/// Stored lowercase. Server payloads carry the role under `userRole` in
/// whatever case the backend chose; always go through
/// [`UserRole::from_server`] when building a user from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular shopper.
    #[default]
    User,
    /// Back-office administrator.
    Admin,
}

impl UserRole {
    /// Normalize a role string received from the remote API.
    ///
    /// The value is case-folded; a missing or unrecognised role is `User`.
    #[must_use]
    pub fn from_server(role: Option<&str>) -> Self {
        match role.map(|r| r.trim().to_lowercase()).as_deref() {
            Some("admin") => Self::Admin,
            Some("user") | None => Self::User,
            Some(other) => {
                tracing::warn!(role = %other, "unrecognised user role, defaulting to user");
                Self::User
            }
        }
    }

    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Whether this role grants back-office access.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s} (expected user or admin)")),
        }
    }
}

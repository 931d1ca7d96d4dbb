//! Account and authentication models.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Staff role attached to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Store owner.
    Owner,

    /// Till operator.
    Cashier,

    /// Other staff.
    Staff,
}

impl Role {
    /// Wire value, e.g. `"CASHIER"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Cashier => "CASHIER",
            Self::Staff => "STAFF",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated account as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-assigned identifier.
    pub id: String,

    /// Login email.
    pub email: String,

    /// Display name.
    pub full_name: String,

    /// Staff role.
    pub role: Role,

    /// Whether the account may log in.
    pub is_active: bool,
}

/// Bearer token issued at login.
///
/// The raw value never appears in `Debug` output and is zeroized on drop.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw token, for building the `Authorization` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(**redacted**)")?;
        Ok(())
    }
}

impl Drop for AuthToken {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Login request body.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Login email.
    pub email: String,

    /// Account password.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish()
    }
}

/// Registration request body.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Login email.
    pub email: String,

    /// Account password.
    pub password: String,

    /// Display name.
    pub full_name: String,

    /// Staff role to assign.
    pub role: Role,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .finish()
    }
}

/// Response to a successful login or registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Bearer token for subsequent requests.
    pub token: AuthToken,

    /// The authenticated account.
    pub user: User,
}

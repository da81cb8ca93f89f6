//! DTOs crossing the provider and backend boundaries.
//!
//! DESIGN
//! ======
//! Field names follow the backend's JSON (`idToken`, `isAdmin`) via serde
//! renames so the Rust side keeps snake_case.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Role reported when no profile has been fetched.
pub const DEFAULT_ROLE: &str = "user";

/// Signed-in identity as reported by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderUser {
    /// Provider-assigned user id.
    pub uid: String,
    /// Email address, when the account has one.
    pub email: Option<String>,
}

impl ProviderUser {
    /// Name shown in the welcome banner: the email, or the uid when there is none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.uid)
    }
}

/// Role attributes held by the backend, from `GET /api/auth/user-info`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
}

fn default_role() -> String {
    DEFAULT_ROLE.to_owned()
}

/// Body of `POST /api/auth/verify`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VerifyRequest<'a> {
    #[serde(rename = "idToken")]
    pub id_token: &'a str,
}

//! Runtime configuration for the session mirror.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages embed an optional JSON blob in
//! `<script type="application/json" id="session-mirror-config">`. Any field
//! left out keeps its default, so an empty page still gets the stock
//! endpoints, path lists, and element ids.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

/// Element id the config blob is read from.
pub const CONFIG_ELEMENT_ID: &str = "session-mirror-config";

/// Backend endpoints used by the session bridge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Endpoints {
    pub verify: String,
    pub logout: String,
    pub user_info: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            verify: "/api/auth/verify".to_owned(),
            logout: "/api/auth/logout".to_owned(),
            user_info: "/api/auth/user-info".to_owned(),
        }
    }
}

/// DOM ids and class names the UI reflector writes to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementIds {
    pub auth_container: String,
    pub user_info: String,
    pub login_button: String,
    pub logout_button: String,
    pub account_button: String,
    pub auth_modal: String,
    /// Container the login form component mounts into, if present on the page.
    pub login_form_root: String,
    pub admin_nav_class: String,
    pub admin_edit_class: String,
    /// Clicks on elements with this class open the login modal when signed out.
    pub requires_auth_class: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            auth_container: "auth-container".to_owned(),
            user_info: "user-info".to_owned(),
            login_button: "login-btn".to_owned(),
            logout_button: "logout-btn".to_owned(),
            account_button: "account-btn".to_owned(),
            auth_modal: "auth-modal".to_owned(),
            login_form_root: "auth-form-root".to_owned(),
            admin_nav_class: "admin-nav-link".to_owned(),
            admin_edit_class: "admin-edit-btn".to_owned(),
            requires_auth_class: "requires-auth".to_owned(),
        }
    }
}

/// Firebase web app configuration, passed as-is to `firebase.initializeApp`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_sender_id: Option<String>,
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthConfig {
    pub endpoints: Endpoints,
    pub login_path: String,
    pub home_path: String,
    /// Query parameter carrying the page to come back to after login.
    pub return_param: String,
    /// Paths that need a signed-in user (exact match or nested).
    pub protected_paths: Vec<String>,
    /// Paths that additionally need the admin role (exact match or nested).
    pub admin_paths: Vec<String>,
    /// Edit sub-routes are `<edit_prefix>...<edit_suffix>` and count as admin pages.
    pub edit_prefix: String,
    pub edit_suffix: String,
    pub forbidden_notice: String,
    pub elements: ElementIds,
    /// When absent the page is expected to have initialized Firebase itself.
    pub firebase: Option<FirebaseConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            login_path: "/login".to_owned(),
            home_path: "/".to_owned(),
            return_param: "return_url".to_owned(),
            protected_paths: ["/admin", "/admin/articles", "/admin/articles/new", "/profile"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            admin_paths: ["/admin", "/admin/articles", "/admin/articles/new"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            edit_prefix: "/admin/articles/".to_owned(),
            edit_suffix: "/edit".to_owned(),
            forbidden_notice: "Access denied: Admin privileges required for this page.".to_owned(),
            elements: ElementIds::default(),
            firebase: None,
        }
    }
}

impl AuthConfig {
    /// Parse a config blob. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns the serde error if `raw` is not a JSON object of the expected shape.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw)
    }

    /// Load the page's config blob, falling back to defaults.
    pub fn load() -> Self {
        #[cfg(feature = "csr")]
        {
            let raw = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|doc| doc.get_element_by_id(CONFIG_ELEMENT_ID))
                .and_then(|el| el.text_content());
            let Some(raw) = raw else {
                return Self::default();
            };
            match Self::from_json(&raw) {
                Ok(config) => config,
                Err(e) => {
                    leptos::logging::warn!("session-mirror: ignoring malformed config: {e}");
                    Self::default()
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            Self::default()
        }
    }
}

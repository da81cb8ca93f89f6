//! Page-level route guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs once per page load. Unprotected pages return immediately; protected
//! pages follow the session bridge's settled snapshots and redirect as soon
//! as one of them disallows the page. This is a client-side courtesy only;
//! the server still enforces access to the protected resources themselves.

#[cfg(test)]
#[path = "route_guard_test.rs"]
mod route_guard_test;

use futures::StreamExt;

use crate::config::AuthConfig;
use crate::net::api::SessionBackend;
use crate::provider::IdentityProvider;
use crate::state::session::{SessionBridge, SessionSnapshot};

/// Where the guard reads the current location and sends the visitor.
pub trait Navigator {
    /// Current path, e.g. `/admin/articles`.
    fn path(&self) -> String;
    /// Current query string including the leading `?`, or empty.
    fn search(&self) -> String;
    /// Blocking notice shown before a forbidden redirect.
    fn notify(&self, message: &str);
    fn redirect(&self, url: &str);
}

/// Classification of a page path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PathClass {
    pub protected: bool,
    pub admin: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Session not known yet.
    Pending,
    Login { redirect: String },
    Forbidden { notice: String, redirect: String },
}

fn matches_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn is_edit_route(config: &AuthConfig, path: &str) -> bool {
    path.starts_with(&config.edit_prefix) && path.ends_with(&config.edit_suffix)
}

/// Classify `path`. Admin pages are always protected pages as well.
#[must_use]
pub fn classify(config: &AuthConfig, path: &str) -> PathClass {
    let edit = is_edit_route(config, path);
    let admin = edit || config.admin_paths.iter().any(|p| matches_prefix(path, p));
    let protected = admin || config.protected_paths.iter().any(|p| matches_prefix(path, p));
    PathClass { protected, admin }
}

#[must_use]
pub fn is_protected(config: &AuthConfig, path: &str) -> bool {
    classify(config, path).protected
}

#[must_use]
pub fn is_admin_page(config: &AuthConfig, path: &str) -> bool {
    classify(config, path).admin
}

/// Login URL carrying `location` as the return parameter.
#[must_use]
pub fn login_redirect(config: &AuthConfig, location: &str) -> String {
    format!(
        "{}?{}={}",
        config.login_path,
        config.return_param,
        urlencoding::encode(location)
    )
}

/// Decide what to do with a visitor at `path` (`location` is path plus query).
#[must_use]
pub fn decide(config: &AuthConfig, path: &str, location: &str, snapshot: &SessionSnapshot) -> GuardDecision {
    let class = classify(config, path);
    if !class.protected {
        return GuardDecision::Allow;
    }
    if !snapshot.is_settled() {
        return GuardDecision::Pending;
    }
    if !snapshot.is_authenticated() {
        return GuardDecision::Login { redirect: login_redirect(config, location) };
    }
    if class.admin && !snapshot.is_admin() {
        return GuardDecision::Forbidden {
            notice: config.forbidden_notice.clone(),
            redirect: config.home_path.clone(),
        };
    }
    GuardDecision::Allow
}

/// Carry out `decision`. Returns `true` if the visitor was sent elsewhere.
pub fn enforce<N: Navigator>(decision: &GuardDecision, navigator: &N) -> bool {
    match decision {
        GuardDecision::Allow | GuardDecision::Pending => false,
        GuardDecision::Login { redirect } => {
            leptos::logging::log!("guard: not signed in, redirecting to {redirect}");
            navigator.redirect(redirect);
            true
        }
        GuardDecision::Forbidden { notice, redirect } => {
            leptos::logging::warn!("guard: admin role required, redirecting to {redirect}");
            navigator.notify(notice);
            navigator.redirect(redirect);
            true
        }
    }
}

/// Guard the current page until the visitor is redirected.
///
/// Returns the decision that caused the redirect, or `Allow` for pages that
/// need no guarding. On an allowed protected page it keeps watching, so a
/// later sign-out still leaves the page.
pub async fn guard_page<P, B, N>(bridge: &SessionBridge<P, B>, navigator: &N, config: &AuthConfig) -> GuardDecision
where
    P: IdentityProvider + 'static,
    B: SessionBackend + 'static,
    N: Navigator,
{
    let path = navigator.path();
    if !classify(config, &path).protected {
        return GuardDecision::Allow;
    }
    let location = format!("{path}{}", navigator.search());

    let mut updates = bridge.subscribe();
    while let Some(snapshot) = updates.next().await {
        let decision = decide(config, &path, &location, &snapshot);
        if enforce(&decision, navigator) {
            return decision;
        }
    }
    GuardDecision::Allow
}

//! # session-mirror
//!
//! Browser-side mirror of an identity-provider session. Loaded as a WASM
//! module on server-rendered pages, it follows the Firebase Auth SDK,
//! exchanges its ID token for a backend session, fetches the user's role,
//! shows or hides the page's auth and admin controls, and keeps visitors off
//! protected and admin-only pages.
//!
//! The decision logic (session bridge, route guard, visibility plan) is
//! plain Rust behind small traits and is tested natively. Browser bindings
//! are gated behind the `csr` feature.

#[cfg(feature = "csr")]
pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod net;
pub mod provider;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_support;

/// WASM entry point.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let config = config::AuthConfig::load();
    if let Err(e) = app::boot(config) {
        leptos::logging::error!("session-mirror: start-up failed ({}): {e}", e.error_code());
    }
}

//! REST client for the backend session endpoints.
//!
//! Client-side (csr): real HTTP calls via `gloo-net`.
//! Native builds: stubs returning `AuthError::Unavailable`, since these
//! endpoints are only meaningful from a page served by the backend.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `Result`; the session bridge decides how a failure
//! degrades (log and carry on for verify/logout, no profile for user-info).

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::types::UserProfile;
#[cfg(feature = "csr")]
use super::types::VerifyRequest;
use crate::config::Endpoints;
use crate::error::AuthError;

/// The backend half of the session exchange.
#[allow(async_fn_in_trait)]
pub trait SessionBackend {
    /// Establish a backend session from a provider ID token.
    async fn verify(&self, id_token: &str) -> Result<(), AuthError>;
    /// Tear down the backend session.
    async fn logout(&self) -> Result<(), AuthError>;
    /// Fetch role attributes for the current backend session.
    async fn user_info(&self) -> Result<UserProfile, AuthError>;
}

#[cfg(any(test, feature = "csr"))]
fn status_error(endpoint: &str, status: u16) -> AuthError {
    AuthError::Status { endpoint: endpoint.to_owned(), status }
}

#[cfg(any(test, feature = "csr"))]
fn transport_error(err: impl std::fmt::Display) -> AuthError {
    AuthError::Http(err.to_string())
}

/// [`SessionBackend`] over same-origin `fetch`.
#[derive(Clone, Debug, Default)]
pub struct HttpSessionBackend {
    endpoints: Endpoints,
}

impl HttpSessionBackend {
    #[must_use]
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

impl SessionBackend for HttpSessionBackend {
    async fn verify(&self, id_token: &str) -> Result<(), AuthError> {
        #[cfg(feature = "csr")]
        {
            let url = &self.endpoints.verify;
            let resp = gloo_net::http::Request::post(url)
                .json(&VerifyRequest { id_token })
                .map_err(transport_error)?
                .send()
                .await
                .map_err(transport_error)?;
            if !resp.ok() {
                return Err(status_error(url, resp.status()));
            }
            Ok(())
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = id_token;
            Err(AuthError::Unavailable)
        }
    }

    async fn logout(&self) -> Result<(), AuthError> {
        #[cfg(feature = "csr")]
        {
            let url = &self.endpoints.logout;
            let resp = gloo_net::http::Request::post(url)
                .header("Content-Type", "application/json")
                .send()
                .await
                .map_err(transport_error)?;
            if !resp.ok() {
                return Err(status_error(url, resp.status()));
            }
            Ok(())
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(AuthError::Unavailable)
        }
    }

    async fn user_info(&self) -> Result<UserProfile, AuthError> {
        #[cfg(feature = "csr")]
        {
            let url = &self.endpoints.user_info;
            let resp = gloo_net::http::Request::get(url)
                .header("Content-Type", "application/json")
                .send()
                .await
                .map_err(transport_error)?;
            if !resp.ok() {
                return Err(status_error(url, resp.status()));
            }
            resp.json::<UserProfile>()
                .await
                .map_err(|e| AuthError::Decode(e.to_string()))
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(AuthError::Unavailable)
        }
    }
}

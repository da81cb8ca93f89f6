//! Identity provider seam.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session bridge only talks to the provider through [`IdentityProvider`].
//! The browser build binds it to the Firebase compat SDK (`firebase`); tests
//! substitute an in-memory fake.

#[cfg(feature = "csr")]
pub mod firebase;

use crate::error::AuthError;
use crate::net::types::ProviderUser;

/// Callback invoked with the provider's user on every auth-state transition.
pub type AuthStateCallback = Box<dyn Fn(Option<ProviderUser>)>;

/// Operations the session bridge needs from an identity provider SDK.
#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    /// Register `callback` for auth-state transitions. The provider also fires
    /// it once with the initial state after registration.
    fn on_auth_state_changed(&self, callback: AuthStateCallback);

    /// Short-lived ID token for the currently signed-in user.
    async fn id_token(&self) -> Result<String, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderUser, AuthError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderUser, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

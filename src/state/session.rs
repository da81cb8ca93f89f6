//! Session bridge between the identity provider and the backend session.
//!
//! SYSTEM CONTEXT
//! ==============
//! The provider reports sign-in / sign-out transitions. For each transition
//! the bridge runs the backend exchange (verify + user-info, or logout) and
//! then publishes an immutable [`SessionSnapshot`] to its subscribers. The UI
//! reflector and the route guard are both subscribers; neither holds a
//! reference to mutable session state.
//!
//! CONCURRENCY
//! ===========
//! Single-threaded (`Rc` + `RefCell`, `spawn_local`). Every transition bumps
//! a generation counter, and results from an older generation are dropped
//! after each await, so a profile fetch that outlives its session never
//! repopulates state. Borrows are never held across an await.
//!
//! ERROR HANDLING
//! ==============
//! Provider and backend failures are logged and degrade the session:
//! no profile means non-admin with role `"user"`.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures::StreamExt;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::future::LocalBoxFuture;

use crate::error::AuthError;
use crate::net::api::SessionBackend;
use crate::net::types::{DEFAULT_ROLE, ProviderUser, UserProfile};
use crate::provider::IdentityProvider;

/// Runs a detached local task (`leptos::task::spawn_local` in the browser).
pub type Spawner = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;

/// Point-in-time view of the session.
///
/// A profile is only ever present alongside a user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    generation: u64,
    user: Option<ProviderUser>,
    profile: Option<UserProfile>,
    settled: bool,
}

impl SessionSnapshot {
    /// State before the provider has reported anything.
    #[must_use]
    pub fn unresolved() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn signed_out(generation: u64) -> Self {
        Self { generation, user: None, profile: None, settled: true }
    }

    #[must_use]
    pub fn signed_in(generation: u64, user: ProviderUser, profile: Option<UserProfile>) -> Self {
        Self { generation, user: Some(user), profile, settled: true }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn user(&self) -> Option<&ProviderUser> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// `true` once the backend exchange for this generation has finished.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.profile.as_ref().is_some_and(|p| p.is_admin)
    }

    #[must_use]
    pub fn role(&self) -> &str {
        self.profile.as_ref().map_or(DEFAULT_ROLE, |p| p.role.as_str())
    }
}

struct Inner<P, B> {
    provider: P,
    backend: B,
    state: RefCell<SessionSnapshot>,
    subscribers: RefCell<Vec<UnboundedSender<SessionSnapshot>>>,
}

/// Explicitly constructed session service; clones share one session.
pub struct SessionBridge<P, B> {
    inner: Rc<Inner<P, B>>,
}

impl<P, B> Clone for SessionBridge<P, B> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<P, B> SessionBridge<P, B>
where
    P: IdentityProvider + 'static,
    B: SessionBackend + 'static,
{
    pub fn new(provider: P, backend: B) -> Self {
        Self {
            inner: Rc::new(Inner {
                provider,
                backend,
                state: RefCell::new(SessionSnapshot::unresolved()),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Start following the provider. Each transition is handled on `spawn`.
    pub fn attach(&self, spawn: Spawner) {
        let weak: Weak<Inner<P, B>> = Rc::downgrade(&self.inner);
        self.inner.provider.on_auth_state_changed(Box::new(move |user| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let bridge = SessionBridge { inner };
            spawn(Box::pin(async move { bridge.handle_auth_change(user).await }));
        }));
    }

    /// Run the backend exchange for one provider transition.
    pub async fn handle_auth_change(&self, user: Option<ProviderUser>) {
        let signed_in = user.is_some();
        let generation = self.begin(user);

        if !signed_in {
            if let Err(e) = self.inner.backend.logout().await {
                leptos::logging::warn!("session: backend logout failed ({}): {e}", e.error_code());
            }
            self.settle(generation, None);
            return;
        }

        let token = match self.inner.provider.id_token().await {
            Ok(token) => token,
            Err(e) => {
                leptos::logging::error!("session: could not get ID token ({}): {e}", e.error_code());
                self.settle(generation, None);
                return;
            }
        };
        if !self.is_current(generation) {
            return;
        }

        if let Err(e) = self.inner.backend.verify(&token).await {
            leptos::logging::error!("session: token verification failed ({}): {e}", e.error_code());
        }
        if !self.is_current(generation) {
            return;
        }

        let profile = match self.inner.backend.user_info().await {
            Ok(profile) => Some(profile),
            Err(e) => {
                leptos::logging::warn!("session: user info unavailable ({}): {e}", e.error_code());
                None
            }
        };
        self.settle(generation, profile);
    }

    fn begin(&self, user: Option<ProviderUser>) -> u64 {
        let mut state = self.inner.state.borrow_mut();
        let generation = state.generation + 1;
        *state = SessionSnapshot { generation, user, profile: None, settled: false };
        generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.inner.state.borrow().generation == generation
    }

    fn settle(&self, generation: u64, profile: Option<UserProfile>) {
        let snapshot = {
            let mut state = self.inner.state.borrow_mut();
            if state.generation != generation {
                leptos::logging::log!(
                    "session: dropping result for generation {generation}, current is {}",
                    state.generation
                );
                return;
            }
            state.profile = if state.user.is_some() { profile } else { None };
            state.settled = true;
            state.clone()
        };
        self.publish(&snapshot);
    }

    fn publish(&self, snapshot: &SessionSnapshot) {
        self.inner
            .subscribers
            .borrow_mut()
            .retain(|tx| tx.unbounded_send(snapshot.clone()).is_ok());
    }

    /// Stream of settled snapshots. The current one is delivered first when it
    /// is already settled.
    pub fn subscribe(&self) -> UnboundedReceiver<SessionSnapshot> {
        let (tx, rx) = mpsc::unbounded();
        let current = self.snapshot();
        if current.settled {
            let _ = tx.unbounded_send(current);
        }
        self.inner.subscribers.borrow_mut().push(tx);
        rx
    }

    /// Invoke `on_change` with every settled snapshot, on a task run by `spawn`.
    pub fn observe<F>(&self, spawn: &Spawner, on_change: F)
    where
        F: Fn(&SessionSnapshot) + 'static,
    {
        let mut updates = self.subscribe();
        spawn(Box::pin(async move {
            while let Some(snapshot) = updates.next().await {
                on_change(&snapshot);
            }
        }));
    }

    /// Resolves with the first settled snapshot (immediately if already settled).
    pub async fn settled(&self) -> SessionSnapshot {
        let mut updates = self.subscribe();
        match updates.next().await {
            Some(snapshot) => snapshot,
            None => self.snapshot(),
        }
    }

    /// Sign in through the provider. Session state follows via the auth-state callback.
    ///
    /// # Errors
    ///
    /// Returns the provider's error; its message is meant for the login form.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderUser, AuthError> {
        let result = self.inner.provider.sign_in(email, password).await;
        match &result {
            Ok(user) => leptos::logging::log!("session: signed in as {}", user.display_name()),
            Err(e) => leptos::logging::error!("session: sign in failed ({}): {e}", e.error_code()),
        }
        result
    }

    /// Create an account through the provider.
    ///
    /// # Errors
    ///
    /// Returns the provider's error; its message is meant for the sign-up form.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderUser, AuthError> {
        let result = self.inner.provider.sign_up(email, password).await;
        match &result {
            Ok(user) => leptos::logging::log!("session: created user {}", user.display_name()),
            Err(e) => leptos::logging::error!("session: sign up failed ({}): {e}", e.error_code()),
        }
        result
    }

    /// Sign out through the provider. The backend logout runs from the auth-state callback.
    ///
    /// # Errors
    ///
    /// Returns the provider's error.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let result = self.inner.provider.sign_out().await;
        match &result {
            Ok(()) => leptos::logging::log!("session: signed out"),
            Err(e) => leptos::logging::error!("session: sign out failed ({}): {e}", e.error_code()),
        }
        result
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.inner.state.borrow().is_admin()
    }

    #[must_use]
    pub fn role(&self) -> String {
        self.inner.state.borrow().role().to_owned()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<ProviderUser> {
        self.inner.state.borrow().user.clone()
    }

    #[must_use]
    pub fn profile(&self) -> Option<UserProfile> {
        self.inner.state.borrow().profile.clone()
    }
}

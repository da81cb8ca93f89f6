//! In-memory fakes for the provider, backend, DOM surface, and navigator seams.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;

use crate::error::AuthError;
use crate::net::api::SessionBackend;
use crate::net::types::{ProviderUser, UserProfile};
use crate::provider::{AuthStateCallback, IdentityProvider};
use crate::state::session::{SessionBridge, Spawner};
use crate::util::route_guard::Navigator;
use crate::util::visibility::{Display, Surface};

pub fn alice() -> ProviderUser {
    ProviderUser { uid: "u-alice".to_owned(), email: Some("alice@example.com".to_owned()) }
}

pub fn bob() -> ProviderUser {
    ProviderUser { uid: "u-bob".to_owned(), email: Some("bob@example.com".to_owned()) }
}

pub fn admin_profile() -> UserProfile {
    UserProfile { role: "admin".to_owned(), is_admin: true }
}

pub fn user_profile() -> UserProfile {
    UserProfile { role: "user".to_owned(), is_admin: false }
}

pub fn spawner_for(pool: &LocalPool) -> Spawner {
    let spawner = pool.spawner();
    Rc::new(move |fut: LocalBoxFuture<'static, ()>| spawner.spawn_local(fut).unwrap())
}

// =============================================================
// Identity provider
// =============================================================

#[derive(Default)]
struct ProviderState {
    callback: Option<AuthStateCallback>,
    token: Option<Result<String, AuthError>>,
    sign_in: Option<Result<ProviderUser, AuthError>>,
    sign_out: Option<Result<(), AuthError>>,
    calls: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeProvider {
    state: Rc<RefCell<ProviderState>>,
}

impl FakeProvider {
    pub fn fail_token(&self, message: &str) {
        self.state.borrow_mut().token = Some(Err(AuthError::Provider(message.to_owned())));
    }

    pub fn reject_credentials(&self, message: &str) {
        self.state.borrow_mut().sign_in = Some(Err(AuthError::Provider(message.to_owned())));
    }

    pub fn fail_sign_out(&self, message: &str) {
        self.state.borrow_mut().sign_out = Some(Err(AuthError::Provider(message.to_owned())));
    }

    /// Fire the registered auth-state callback, as the SDK would.
    pub fn emit(&self, user: Option<ProviderUser>) {
        let callback = self.state.borrow_mut().callback.take();
        if let Some(callback) = callback {
            callback(user);
            self.state.borrow_mut().callback = Some(callback);
        }
    }

    pub fn has_listener(&self) -> bool {
        self.state.borrow().callback.is_some()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }
}

impl IdentityProvider for FakeProvider {
    fn on_auth_state_changed(&self, callback: AuthStateCallback) {
        self.state.borrow_mut().callback = Some(callback);
    }

    async fn id_token(&self) -> Result<String, AuthError> {
        let mut state = self.state.borrow_mut();
        state.calls.push("id_token".to_owned());
        state.token.clone().unwrap_or_else(|| Ok("token-1".to_owned()))
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<ProviderUser, AuthError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(format!("sign_in:{email}"));
        state.sign_in.clone().unwrap_or_else(|| Ok(ProviderUser { uid: "u-new".to_owned(), email: Some(email.to_owned()) }))
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<ProviderUser, AuthError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(format!("sign_up:{email}"));
        state.sign_in.clone().unwrap_or_else(|| Ok(ProviderUser { uid: "u-new".to_owned(), email: Some(email.to_owned()) }))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let mut state = self.state.borrow_mut();
        state.calls.push("sign_out".to_owned());
        state.sign_out.clone().unwrap_or(Ok(()))
    }
}

// =============================================================
// Backend
// =============================================================

pub enum ProfileReply {
    Ready(Result<UserProfile, AuthError>),
    Pending(oneshot::Receiver<Result<UserProfile, AuthError>>),
}

#[derive(Default)]
struct BackendState {
    profiles: VecDeque<ProfileReply>,
    verify_error: Option<AuthError>,
    logout_error: Option<AuthError>,
    verified_tokens: Vec<String>,
    logouts: usize,
    user_info_calls: usize,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Rc<RefCell<BackendState>>,
}

impl FakeBackend {
    pub fn reply_with(&self, profile: Result<UserProfile, AuthError>) {
        self.state.borrow_mut().profiles.push_back(ProfileReply::Ready(profile));
    }

    /// Queue a user-info reply that resolves only when the returned sender fires.
    pub fn reply_later(&self) -> oneshot::Sender<Result<UserProfile, AuthError>> {
        let (tx, rx) = oneshot::channel();
        self.state.borrow_mut().profiles.push_back(ProfileReply::Pending(rx));
        tx
    }

    pub fn fail_verify(&self, err: AuthError) {
        self.state.borrow_mut().verify_error = Some(err);
    }

    pub fn fail_logout(&self, err: AuthError) {
        self.state.borrow_mut().logout_error = Some(err);
    }

    pub fn verified_tokens(&self) -> Vec<String> {
        self.state.borrow().verified_tokens.clone()
    }

    pub fn logouts(&self) -> usize {
        self.state.borrow().logouts
    }

    pub fn user_info_calls(&self) -> usize {
        self.state.borrow().user_info_calls
    }
}

impl SessionBackend for FakeBackend {
    async fn verify(&self, id_token: &str) -> Result<(), AuthError> {
        let mut state = self.state.borrow_mut();
        state.verified_tokens.push(id_token.to_owned());
        match &state.verify_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn logout(&self) -> Result<(), AuthError> {
        let mut state = self.state.borrow_mut();
        state.logouts += 1;
        match &state.logout_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn user_info(&self) -> Result<UserProfile, AuthError> {
        let reply = {
            let mut state = self.state.borrow_mut();
            state.user_info_calls += 1;
            state.profiles.pop_front()
        };
        match reply {
            Some(ProfileReply::Ready(result)) => result,
            Some(ProfileReply::Pending(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(AuthError::Http("reply dropped".to_owned()))),
            None => Err(AuthError::Status { endpoint: "/api/auth/user-info".to_owned(), status: 401 }),
        }
    }
}

pub type FakeBridge = SessionBridge<FakeProvider, FakeBackend>;

pub fn fake_bridge() -> (FakeBridge, FakeProvider, FakeBackend) {
    let provider = FakeProvider::default();
    let backend = FakeBackend::default();
    let bridge = SessionBridge::new(provider.clone(), backend.clone());
    (bridge, provider, backend)
}

// =============================================================
// DOM surface
// =============================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceOp {
    Display(String, Display),
    Text(String, String),
    Class(String, Display),
}

#[derive(Clone, Default)]
pub struct RecordingSurface {
    ops: Rc<RefCell<Vec<SurfaceOp>>>,
    class_counts: Rc<RefCell<Vec<(String, usize)>>>,
}

impl RecordingSurface {
    pub fn with_class_count(self, class: &str, count: usize) -> Self {
        self.class_counts.borrow_mut().push((class.to_owned(), count));
        self
    }

    pub fn ops(&self) -> Vec<SurfaceOp> {
        self.ops.borrow().clone()
    }

    /// Last display written for `id`, if any.
    pub fn display_of(&self, id: &str) -> Option<Display> {
        self.ops.borrow().iter().rev().find_map(|op| match op {
            SurfaceOp::Display(target, display) if target == id => Some(*display),
            _ => None,
        })
    }

    pub fn class_display_of(&self, class: &str) -> Option<Display> {
        self.ops.borrow().iter().rev().find_map(|op| match op {
            SurfaceOp::Class(target, display) if target == class => Some(*display),
            _ => None,
        })
    }

    pub fn text_of(&self, id: &str) -> Option<String> {
        self.ops.borrow().iter().rev().find_map(|op| match op {
            SurfaceOp::Text(target, text) if target == id => Some(text.clone()),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn set_display(&self, id: &str, display: Display) {
        self.ops.borrow_mut().push(SurfaceOp::Display(id.to_owned(), display));
    }

    fn set_text(&self, id: &str, text: &str) {
        self.ops.borrow_mut().push(SurfaceOp::Text(id.to_owned(), text.to_owned()));
    }

    fn set_class_display(&self, class: &str, display: Display) -> usize {
        self.ops.borrow_mut().push(SurfaceOp::Class(class.to_owned(), display));
        self.class_counts
            .borrow()
            .iter()
            .find(|(name, _)| name == class)
            .map_or(0, |(_, count)| *count)
    }
}

// =============================================================
// Navigator
// =============================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavEvent {
    Notice(String),
    Redirect(String),
}

#[derive(Clone)]
pub struct RecordingNavigator {
    path: String,
    search: String,
    events: Rc<RefCell<Vec<NavEvent>>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Self {
        Self { path: path.to_owned(), search: String::new(), events: Rc::default() }
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = search.to_owned();
        self
    }

    pub fn events(&self) -> Vec<NavEvent> {
        self.events.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn path(&self) -> String {
        self.path.clone()
    }

    fn search(&self) -> String {
        self.search.clone()
    }

    fn notify(&self, message: &str) {
        self.events.borrow_mut().push(NavEvent::Notice(message.to_owned()));
    }

    fn redirect(&self, url: &str) {
        self.events.borrow_mut().push(NavEvent::Redirect(url.to_owned()));
    }
}

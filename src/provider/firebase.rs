//! `wasm-bindgen` bindings to the Firebase Auth compat SDK.
//!
//! The page must load `firebase-app-compat.js` and `firebase-auth-compat.js`
//! before the WASM module starts; everything here goes through the global
//! `firebase` namespace.

use js_sys::Promise;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::{AuthStateCallback, IdentityProvider};
use crate::config::FirebaseConfig;
use crate::error::AuthError;
use crate::net::types::ProviderUser;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = firebase, js_name = initializeApp)]
    fn initialize_app(config: &JsValue) -> Result<JsValue, JsValue>;

    type Auth;

    #[wasm_bindgen(catch, js_namespace = firebase, js_name = auth)]
    fn firebase_auth() -> Result<Auth, JsValue>;

    #[wasm_bindgen(method, js_name = onAuthStateChanged)]
    fn on_auth_state_changed(this: &Auth, next: &Closure<dyn FnMut(JsValue)>) -> js_sys::Function;

    #[wasm_bindgen(method, getter, js_name = currentUser)]
    fn current_user(this: &Auth) -> Option<FirebaseUser>;

    #[wasm_bindgen(method, js_name = signInWithEmailAndPassword)]
    fn sign_in_with_email_and_password(this: &Auth, email: &str, password: &str) -> Promise;

    #[wasm_bindgen(method, js_name = createUserWithEmailAndPassword)]
    fn create_user_with_email_and_password(this: &Auth, email: &str, password: &str) -> Promise;

    #[wasm_bindgen(method, js_name = signOut)]
    fn sign_out(this: &Auth) -> Promise;

    type FirebaseUser;

    #[wasm_bindgen(method, getter)]
    fn uid(this: &FirebaseUser) -> String;

    #[wasm_bindgen(method, getter)]
    fn email(this: &FirebaseUser) -> Option<String>;

    #[wasm_bindgen(method, js_name = getIdToken)]
    fn get_id_token(this: &FirebaseUser) -> Promise;

    type UserCredential;

    #[wasm_bindgen(method, getter)]
    fn user(this: &UserCredential) -> FirebaseUser;
}

fn js_error_message(err: &JsValue) -> String {
    if let Some(e) = err.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn provider_error(err: JsValue) -> AuthError {
    AuthError::Provider(js_error_message(&err))
}

fn to_provider_user(user: &FirebaseUser) -> ProviderUser {
    ProviderUser { uid: user.uid(), email: user.email() }
}

fn user_from_js(value: JsValue) -> Option<ProviderUser> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    Some(to_provider_user(value.unchecked_ref::<FirebaseUser>()))
}

async fn credential_user(promise: Promise) -> Result<ProviderUser, AuthError> {
    let credential = JsFuture::from(promise).await.map_err(provider_error)?;
    Ok(to_provider_user(&credential.unchecked_into::<UserCredential>().user()))
}

/// [`IdentityProvider`] backed by `firebase.auth()`.
pub struct FirebaseProvider {
    auth: Auth,
}

impl FirebaseProvider {
    /// Initialize the default Firebase app (when `config` is given) and bind to its auth instance.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Provider` if the Firebase SDK is not loaded on the page.
    pub fn new(config: Option<&FirebaseConfig>) -> Result<Self, AuthError> {
        if let Some(config) = config {
            let raw = serde_json::to_string(config).map_err(|e| AuthError::Provider(e.to_string()))?;
            let js_config = js_sys::JSON::parse(&raw).map_err(provider_error)?;
            // Re-initializing the default app throws; the existing app is reused.
            if let Err(e) = initialize_app(&js_config) {
                leptos::logging::warn!("firebase: initializeApp: {}", js_error_message(&e));
            }
        }
        let auth = firebase_auth().map_err(provider_error)?;
        Ok(Self { auth })
    }
}

impl IdentityProvider for FirebaseProvider {
    fn on_auth_state_changed(&self, callback: AuthStateCallback) {
        let next = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| callback(user_from_js(value)));
        let _unsubscribe = self.auth.on_auth_state_changed(&next);
        // Lives for the page.
        next.forget();
    }

    async fn id_token(&self) -> Result<String, AuthError> {
        let Some(user) = self.auth.current_user() else {
            return Err(AuthError::Provider("no signed-in user".to_owned()));
        };
        let token = JsFuture::from(user.get_id_token()).await.map_err(provider_error)?;
        token
            .as_string()
            .ok_or_else(|| AuthError::Provider("getIdToken returned a non-string".to_owned()))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderUser, AuthError> {
        credential_user(self.auth.sign_in_with_email_and_password(email, password)).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderUser, AuthError> {
        credential_user(self.auth.create_user_with_email_and_password(email, password)).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        JsFuture::from(self.auth.sign_out()).await.map_err(provider_error)?;
        Ok(())
    }
}

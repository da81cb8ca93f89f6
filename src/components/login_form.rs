//! Email + password form for the login modal, with sign-in and sign-up modes.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted into the page's `auth-form-root` element. Credentials go straight
//! to the identity provider through the session bridge; the session itself
//! is picked up from the provider's auth-state callback. On success the
//! visitor goes to the page named by the `return_url` query parameter; without
//! one they stay where they are and the modal closes (the standalone login
//! page sends them home instead).

#[cfg(test)]
#[path = "login_form_test.rs"]
mod login_form_test;

use std::rc::Rc;

use leptos::prelude::*;

use crate::error::AuthError;
use crate::net::api::SessionBackend;
use crate::provider::IdentityProvider;
use crate::state::session::SessionBridge;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    SignIn,
    SignUp,
}

impl FormMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::SignIn => Self::SignUp,
            Self::SignUp => Self::SignIn,
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::SignIn => "Sign In",
            Self::SignUp => "Create Account",
        }
    }

    #[must_use]
    pub fn progress_label(self) -> &'static str {
        match self {
            Self::SignIn => "Signing in...",
            Self::SignUp => "Creating account...",
        }
    }

    #[must_use]
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::SignIn => "Need an account? Sign up",
            Self::SignUp => "Already have an account? Sign in",
        }
    }
}

/// Message shown under the form when the provider rejects the request.
pub fn failure_message(mode: FormMode, err: &AuthError) -> String {
    match mode {
        FormMode::SignIn => format!("Sign in failed: {err}"),
        FormMode::SignUp => format!("Sign up failed: {err}"),
    }
}

/// Called after a login that does not navigate away.
pub type OnLoggedIn = Rc<dyn Fn()>;

/// Same-origin absolute paths only.
///
/// Browsers drop tab, CR and LF while parsing a URL, so `/\t/host` would turn
/// into `//host`. Control characters are rejected before the `//host` and
/// `/\host` checks.
pub fn is_safe_return_path(path: &str) -> bool {
    !path.chars().any(char::is_control)
        && path.starts_with('/')
        && !path.starts_with("//")
        && !path.starts_with("/\\")
}

/// The `param` query parameter, decoded, if present and a safe same-origin path.
pub fn return_target(search: &str, param: &str) -> Option<String> {
    let query = search.strip_prefix('?').unwrap_or(search);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == param)
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|value| value.into_owned())
        .filter(|value| is_safe_return_path(value))
}

/// Where to navigate after a successful login; `None` means stay on the page.
///
/// A safe `return_url` wins. Without one, the standalone login page sends the
/// visitor to `home_path` and any other page keeps them in place.
pub fn after_login(path: &str, search: &str, param: &str, login_path: &str, home_path: &str) -> Option<String> {
    return_target(search, param).or_else(|| (path == login_path).then(|| home_path.to_owned()))
}

#[component]
pub fn LoginForm<P, B>(
    bridge: SessionBridge<P, B>,
    #[prop(into)] return_param: String,
    #[prop(into)] login_path: String,
    #[prop(into)] home_path: String,
    on_logged_in: OnLoggedIn,
) -> impl IntoView
where
    P: IdentityProvider + 'static,
    B: SessionBackend + 'static,
{
    let bridge = StoredValue::new_local(bridge);
    let on_logged_in = StoredValue::new_local(on_logged_in);
    let mode = RwSignal::new(FormMode::default());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let current = mode.get();
        let email_value = email.get().trim().to_owned();
        let password_value = password.get();
        busy.set(true);
        info.set(current.progress_label().to_owned());

        #[cfg(feature = "csr")]
        {
            let bridge = bridge.get_value();
            let return_param = return_param.clone();
            let login_path = login_path.clone();
            let home_path = home_path.clone();
            leptos::task::spawn_local(async move {
                let result = match current {
                    FormMode::SignIn => bridge.sign_in(&email_value, &password_value).await,
                    FormMode::SignUp => bridge.sign_up(&email_value, &password_value).await,
                };
                match result {
                    Ok(_) => {
                        let Some(window) = web_sys::window() else {
                            return;
                        };
                        let location = window.location();
                        let path = location.pathname().unwrap_or_default();
                        let search = location.search().unwrap_or_default();
                        match after_login(&path, &search, &return_param, &login_path, &home_path) {
                            Some(target) => {
                                if let Err(e) = location.set_href(&target) {
                                    leptos::logging::warn!("login: redirect to {target} failed: {e:?}");
                                }
                            }
                            None => {
                                password.set(String::new());
                                info.set(String::new());
                                busy.set(false);
                                on_logged_in.with_value(|callback| callback());
                            }
                        }
                    }
                    Err(e) => {
                        info.set(failure_message(current, &e));
                        busy.set(false);
                    }
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (bridge, on_logged_in, &return_param, &login_path, &home_path, email_value, password_value);
        }
    };

    view! {
        <form class="auth-form" on:submit=on_submit>
            <h2 class="auth-form__title">{move || mode.get().title()}</h2>
            <input
                class="auth-input"
                type="email"
                placeholder="you@example.com"
                prop:value=move || email.get()
                on:input=move |ev| email.set(event_target_value(&ev))
            />
            <input
                class="auth-input"
                type="password"
                placeholder="Password"
                prop:value=move || password.get()
                on:input=move |ev| password.set(event_target_value(&ev))
            />
            <button class="auth-button" type="submit" disabled=move || busy.get()>
                {move || mode.get().title()}
            </button>
            <Show when=move || !info.get().is_empty()>
                <p class="auth-message">{move || info.get()}</p>
            </Show>
            <button
                class="auth-link"
                type="button"
                on:click=move |_| {
                    mode.update(|m| *m = m.toggled());
                    info.set(String::new());
                }
            >
                {move || mode.get().toggle_label()}
            </button>
        </form>
    }
}

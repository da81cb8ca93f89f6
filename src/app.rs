//! Page wiring: builds the session bridge and connects its consumers.

use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::components::login_form::{LoginForm, LoginFormProps, OnLoggedIn};
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::net::api::HttpSessionBackend;
use crate::provider::firebase::FirebaseProvider;
use crate::state::session::{SessionBridge, Spawner};
use crate::util::dom::{self, BrowserNavigator, DomSurface};
use crate::util::route_guard::{self, Navigator};
use crate::util::visibility::UiReflector;

pub type BrowserBridge = SessionBridge<FirebaseProvider, HttpSessionBackend>;

/// Wire the bridge, UI reflector, route guard, and login form for this page.
///
/// # Errors
///
/// Returns `AuthError::Provider` if the Firebase SDK is not available.
pub fn boot(config: AuthConfig) -> Result<BrowserBridge, AuthError> {
    let provider = FirebaseProvider::new(config.firebase.as_ref())?;
    let backend = HttpSessionBackend::new(config.endpoints.clone());
    let bridge = SessionBridge::new(provider, backend);
    let spawn: Spawner = Rc::new(|fut: LocalBoxFuture<'static, ()>| leptos::task::spawn_local(fut));

    let reflector = Rc::new(UiReflector::new(DomSurface, config.elements.clone()));
    {
        let reflector = Rc::clone(&reflector);
        bridge.observe(&spawn, move |snapshot| reflector.render(snapshot));
    }
    dom::watch_late_admin_controls(Rc::clone(&reflector), bridge.clone());
    dom::gate_auth_clicks(Rc::clone(&reflector), bridge.clone());

    {
        let reflector = Rc::clone(&reflector);
        dom::on_click(&config.elements.login_button, move || reflector.show_login_modal());
    }
    {
        let bridge = bridge.clone();
        dom::on_click(&config.elements.logout_button, move || {
            let bridge = bridge.clone();
            leptos::task::spawn_local(async move {
                // The cause is already logged by the bridge.
                if bridge.logout().await.is_err() {
                    BrowserNavigator.notify("Sign out failed. Please try again.");
                }
            });
        });
    }

    if let Some(root) = dom::mount_point(&config.elements.login_form_root) {
        let props = LoginFormProps::builder()
            .bridge(bridge.clone())
            .return_param(config.return_param.clone())
            .login_path(config.login_path.clone())
            .home_path(config.home_path.clone())
            .on_logged_in({
                let reflector = Rc::clone(&reflector);
                Rc::new(move || reflector.hide_login_modal()) as OnLoggedIn
            })
            .build();
        leptos::mount::mount_to(root, move || LoginForm(props)).forget();
    }

    {
        let bridge = bridge.clone();
        spawn(Box::pin(async move {
            route_guard::guard_page(&bridge, &BrowserNavigator, &config).await;
        }));
    }

    bridge.attach(spawn);
    Ok(bridge)
}

//! Browser implementations of the surface and navigator seams.
//!
//! Requires a browser environment; compiled only with the `csr` feature.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, HtmlElement, MutationObserver, MutationObserverInit};

use super::route_guard::Navigator;
use super::visibility::{Display, Surface, UiReflector};
use crate::net::api::SessionBackend;
use crate::provider::IdentityProvider;
use crate::state::session::SessionBridge;

fn document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

fn html_element_by_id(id: &str) -> Option<HtmlElement> {
    document()?.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()
}

fn set_style_display(el: &HtmlElement, display: Display) {
    let _ = el.style().set_property("display", display.as_css());
}

/// [`Surface`] over the live document.
#[derive(Clone, Copy, Debug, Default)]
pub struct DomSurface;

impl Surface for DomSurface {
    fn set_display(&self, id: &str, display: Display) {
        if let Some(el) = html_element_by_id(id) {
            set_style_display(&el, display);
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = html_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_class_display(&self, class: &str, display: Display) -> usize {
        let Some(doc) = document() else {
            return 0;
        };
        let Ok(nodes) = doc.query_selector_all(&format!(".{class}")) else {
            return 0;
        };
        let mut touched = 0;
        for i in 0..nodes.length() {
            if let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
                set_style_display(&el, display);
                touched += 1;
            }
        }
        touched
    }
}

/// [`Navigator`] over `window.location` and `window.alert`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn path(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_default()
    }

    fn search(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default()
    }

    fn notify(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    fn redirect(&self, url: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(url);
        }
    }
}

/// Re-apply the admin pass whenever nodes are added anywhere under `<body>`.
///
/// Only child-list changes are observed, so the style writes made by the
/// pass itself do not retrigger it.
pub fn watch_late_admin_controls<S, P, B>(reflector: Rc<UiReflector<S>>, bridge: SessionBridge<P, B>)
where
    S: Surface + 'static,
    P: IdentityProvider + 'static,
    B: SessionBackend + 'static,
{
    let Some(body) = document().and_then(|doc| doc.body()) else {
        return;
    };
    let on_mutation = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
        move |_records: js_sys::Array, _observer: MutationObserver| {
            let snapshot = bridge.snapshot();
            if snapshot.is_settled() {
                reflector.apply_admin(snapshot.is_admin());
            }
        },
    );
    let observer = match MutationObserver::new(on_mutation.as_ref().unchecked_ref()) {
        Ok(observer) => observer,
        Err(e) => {
            leptos::logging::warn!("ui: MutationObserver unavailable: {e:?}");
            return;
        }
    };
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    if let Err(e) = observer.observe_with_options(&body, &init) {
        leptos::logging::warn!("ui: could not observe document body: {e:?}");
        return;
    }
    // The observer stays registered with the document; the callback lives for the page.
    on_mutation.forget();
}

/// Attach a click handler to the element with `id`, if it exists.
pub fn on_click<F>(id: &str, handler: F)
where
    F: FnMut() + 'static,
{
    let Some(el) = html_element_by_id(id) else {
        return;
    };
    let mut handler = handler;
    let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |ev: web_sys::Event| {
        ev.prevent_default();
        handler();
    });
    if el
        .add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())
        .is_ok()
    {
        callback.forget();
    }
}

/// Gate clicks on `.requires-auth` elements, including ones rendered later.
///
/// A single delegated listener on the document checks the session at click
/// time; when signed out the click is cancelled and the login modal opens.
pub fn gate_auth_clicks<S, P, B>(reflector: Rc<UiReflector<S>>, bridge: SessionBridge<P, B>)
where
    S: Surface + 'static,
    P: IdentityProvider + 'static,
    B: SessionBackend + 'static,
{
    let Some(doc) = document() else {
        return;
    };
    let selector = format!(".{}", reflector.ids().requires_auth_class);
    let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |ev: web_sys::Event| {
        let gated = ev
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(&selector).ok().flatten())
            .is_some();
        if gated && !reflector.require_auth(&bridge.snapshot()) {
            ev.prevent_default();
            ev.stop_propagation();
        }
    });
    if doc
        .add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())
        .is_ok()
    {
        callback.forget();
    }
}

/// Element with `id`, for mounting components.
pub fn mount_point(id: &str) -> Option<HtmlElement> {
    html_element_by_id(id)
}

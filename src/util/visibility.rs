//! UI reflector: mirrors session state onto the page's auth affordances.
//!
//! DESIGN
//! ======
//! `plan` is a pure function from a snapshot to the display of every named
//! region; `UiReflector` writes that plan through a [`Surface`]. The browser
//! surface lives in `util::dom`, which also re-applies the admin pass when
//! new nodes are inserted so late-rendered admin controls are covered.

#[cfg(test)]
#[path = "visibility_test.rs"]
mod visibility_test;

use std::cell::Cell;

use crate::config::ElementIds;
use crate::net::types::ProviderUser;
use crate::state::session::SessionSnapshot;

/// CSS `display` values the reflector writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Display {
    None,
    Block,
    InlineBlock,
}

impl Display {
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Block => "block",
            Self::InlineBlock => "inline-block",
        }
    }

    fn shown_if(visible: bool, display: Display) -> Self {
        if visible { display } else { Self::None }
    }
}

/// Write access to the page's elements. Missing elements are skipped silently.
pub trait Surface {
    fn set_display(&self, id: &str, display: Display);
    fn set_text(&self, id: &str, text: &str);
    /// Apply `display` to every element carrying `class`; returns how many matched.
    fn set_class_display(&self, class: &str, display: Display) -> usize;
}

/// Display of the admin-only collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdminPlan {
    pub nav_links: Display,
    pub edit_buttons: Display,
}

/// Display of every region for one snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityPlan {
    pub auth_container: Display,
    pub user_info: Display,
    pub login_button: Display,
    pub logout_button: Display,
    pub account_button: Display,
    /// Banner text; `None` leaves the banner text untouched.
    pub welcome: Option<String>,
    pub admin: AdminPlan,
}

#[must_use]
pub fn admin_plan(is_admin: bool) -> AdminPlan {
    AdminPlan {
        nav_links: Display::shown_if(is_admin, Display::Block),
        edit_buttons: Display::shown_if(is_admin, Display::InlineBlock),
    }
}

#[must_use]
pub fn welcome_text(user: &ProviderUser, is_admin: bool) -> String {
    let marker = if is_admin { " (Admin)" } else { "" };
    format!("Welcome, {}{marker}", user.display_name())
}

#[must_use]
pub fn plan(snapshot: &SessionSnapshot) -> VisibilityPlan {
    let signed_in = snapshot.is_authenticated();
    VisibilityPlan {
        auth_container: Display::shown_if(!signed_in, Display::Block),
        user_info: Display::shown_if(signed_in, Display::Block),
        login_button: Display::shown_if(!signed_in, Display::Block),
        logout_button: Display::shown_if(signed_in, Display::Block),
        account_button: Display::shown_if(signed_in, Display::Block),
        welcome: snapshot.user().map(|user| welcome_text(user, snapshot.is_admin())),
        admin: admin_plan(snapshot.is_admin()),
    }
}

/// Outcome of one admin pass: the admin flag and how many links/buttons matched.
type AdminPass = (bool, usize, usize);

pub struct UiReflector<S> {
    surface: S,
    ids: ElementIds,
    last_admin_pass: Cell<Option<AdminPass>>,
}

impl<S: Surface> UiReflector<S> {
    pub fn new(surface: S, ids: ElementIds) -> Self {
        Self { surface, ids, last_admin_pass: Cell::new(None) }
    }

    #[cfg(test)]
    pub(crate) fn surface(&self) -> &S {
        &self.surface
    }

    pub fn ids(&self) -> &ElementIds {
        &self.ids
    }

    /// Apply the full plan for `snapshot`.
    pub fn render(&self, snapshot: &SessionSnapshot) {
        let plan = plan(snapshot);
        let ids = &self.ids;
        self.surface.set_display(&ids.auth_container, plan.auth_container);
        self.surface.set_display(&ids.user_info, plan.user_info);
        if let Some(text) = &plan.welcome {
            self.surface.set_text(&ids.user_info, text);
        }
        self.surface.set_display(&ids.login_button, plan.login_button);
        self.surface.set_display(&ids.logout_button, plan.logout_button);
        self.surface.set_display(&ids.account_button, plan.account_button);
        self.apply_admin(snapshot.is_admin());
    }

    /// Admin-only pass. Returns how many (links, buttons) were touched.
    pub fn apply_admin(&self, is_admin: bool) -> (usize, usize) {
        let plan = admin_plan(is_admin);
        let links = self.surface.set_class_display(&self.ids.admin_nav_class, plan.nav_links);
        let buttons = self.surface.set_class_display(&self.ids.admin_edit_class, plan.edit_buttons);
        if self.note_admin_pass((is_admin, links, buttons)) {
            leptos::logging::log!("ui: admin={is_admin}, toggled {links} admin links and {buttons} edit buttons");
        }
        (links, buttons)
    }

    /// Record `pass`; `true` when it differs from the previous one.
    fn note_admin_pass(&self, pass: AdminPass) -> bool {
        self.last_admin_pass.replace(Some(pass)) != Some(pass)
    }

    pub fn show_login_modal(&self) {
        self.surface.set_display(&self.ids.auth_modal, Display::Block);
    }

    pub fn hide_login_modal(&self) {
        self.surface.set_display(&self.ids.auth_modal, Display::None);
    }

    /// `true` when signed in; otherwise opens the login modal.
    pub fn require_auth(&self, snapshot: &SessionSnapshot) -> bool {
        if snapshot.is_authenticated() {
            return true;
        }
        self.show_login_modal();
        false
    }
}

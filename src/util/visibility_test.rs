use super::*;
use crate::test_support::*;

fn reflector() -> UiReflector<RecordingSurface> {
    let surface = RecordingSurface::default()
        .with_class_count("admin-nav-link", 2)
        .with_class_count("admin-edit-btn", 3);
    UiReflector::new(surface, ElementIds::default())
}

// =============================================================
// Plan
// =============================================================

#[test]
fn signed_out_plan_shows_login_affordances() {
    let plan = plan(&SessionSnapshot::signed_out(1));
    assert_eq!(plan.auth_container, Display::Block);
    assert_eq!(plan.login_button, Display::Block);
    assert_eq!(plan.user_info, Display::None);
    assert_eq!(plan.logout_button, Display::None);
    assert_eq!(plan.account_button, Display::None);
    assert_eq!(plan.welcome, None);
    assert_eq!(plan.admin, AdminPlan { nav_links: Display::None, edit_buttons: Display::None });
}

#[test]
fn signed_in_plan_shows_account_affordances() {
    let plan = plan(&SessionSnapshot::signed_in(1, alice(), Some(user_profile())));
    assert_eq!(plan.auth_container, Display::None);
    assert_eq!(plan.login_button, Display::None);
    assert_eq!(plan.user_info, Display::Block);
    assert_eq!(plan.logout_button, Display::Block);
    assert_eq!(plan.account_button, Display::Block);
    assert_eq!(plan.welcome.as_deref(), Some("Welcome, alice@example.com"));
    assert_eq!(plan.admin.nav_links, Display::None);
}

#[test]
fn admin_plan_marks_banner_and_shows_controls() {
    let plan = plan(&SessionSnapshot::signed_in(1, alice(), Some(admin_profile())));
    assert_eq!(plan.welcome.as_deref(), Some("Welcome, alice@example.com (Admin)"));
    assert_eq!(plan.admin, AdminPlan { nav_links: Display::Block, edit_buttons: Display::InlineBlock });
}

#[test]
fn display_css_values() {
    assert_eq!(Display::None.as_css(), "none");
    assert_eq!(Display::Block.as_css(), "block");
    assert_eq!(Display::InlineBlock.as_css(), "inline-block");
}

// =============================================================
// Reflector
// =============================================================

#[test]
fn render_writes_every_named_region() {
    let reflector = reflector();
    reflector.render(&SessionSnapshot::signed_in(1, alice(), Some(admin_profile())));
    let surface = reflector.surface();

    assert_eq!(surface.display_of("auth-container"), Some(Display::None));
    assert_eq!(surface.display_of("user-info"), Some(Display::Block));
    assert_eq!(surface.display_of("login-btn"), Some(Display::None));
    assert_eq!(surface.display_of("logout-btn"), Some(Display::Block));
    assert_eq!(surface.display_of("account-btn"), Some(Display::Block));
    assert_eq!(surface.text_of("user-info").as_deref(), Some("Welcome, alice@example.com (Admin)"));
    assert_eq!(surface.class_display_of("admin-nav-link"), Some(Display::Block));
    assert_eq!(surface.class_display_of("admin-edit-btn"), Some(Display::InlineBlock));
}

#[test]
fn render_after_sign_out_hides_admin_controls() {
    let reflector = reflector();
    reflector.render(&SessionSnapshot::signed_in(1, alice(), Some(admin_profile())));
    reflector.render(&SessionSnapshot::signed_out(2));
    let surface = reflector.surface();

    assert_eq!(surface.display_of("login-btn"), Some(Display::Block));
    assert_eq!(surface.display_of("user-info"), Some(Display::None));
    assert_eq!(surface.class_display_of("admin-nav-link"), Some(Display::None));
    assert_eq!(surface.class_display_of("admin-edit-btn"), Some(Display::None));
}

#[test]
fn signed_out_render_leaves_banner_text_alone() {
    let reflector = reflector();
    reflector.render(&SessionSnapshot::signed_out(1));
    assert_eq!(reflector.surface().text_of("user-info"), None);
}

#[test]
fn apply_admin_reports_counts() {
    let reflector = reflector();
    assert_eq!(reflector.apply_admin(true), (2, 3));
    assert_eq!(reflector.apply_admin(false), (2, 3));
}

#[test]
fn repeated_admin_pass_is_noted_once() {
    let reflector = reflector();
    assert!(reflector.note_admin_pass((true, 2, 3)));
    assert!(!reflector.note_admin_pass((true, 2, 3)));
    assert!(reflector.note_admin_pass((true, 4, 3)));
    assert!(reflector.note_admin_pass((false, 4, 3)));
}

#[test]
fn unchanged_late_pass_still_rewrites_controls() {
    let reflector = reflector();
    reflector.apply_admin(true);
    reflector.apply_admin(true);
    let class_writes = reflector.surface().ops().iter().filter(|op| matches!(op, SurfaceOp::Class(..))).count();
    assert_eq!(class_writes, 4);
}

#[test]
fn custom_ids_are_respected() {
    let ids = ElementIds { login_button: "signin".to_owned(), ..ElementIds::default() };
    let reflector = UiReflector::new(RecordingSurface::default(), ids);
    reflector.render(&SessionSnapshot::signed_out(1));
    assert_eq!(reflector.surface().display_of("signin"), Some(Display::Block));
    assert_eq!(reflector.surface().display_of("login-btn"), None);
}

#[test]
fn require_auth_opens_modal_when_signed_out() {
    let reflector = reflector();
    assert!(!reflector.require_auth(&SessionSnapshot::signed_out(1)));
    assert_eq!(reflector.surface().display_of("auth-modal"), Some(Display::Block));
}

#[test]
fn require_auth_passes_when_signed_in() {
    let reflector = reflector();
    assert!(reflector.require_auth(&SessionSnapshot::signed_in(1, alice(), None)));
    assert!(reflector.surface().ops().is_empty());
}

#[test]
fn login_modal_toggles() {
    let reflector = reflector();
    reflector.show_login_modal();
    reflector.hide_login_modal();
    assert_eq!(reflector.surface().display_of("auth-modal"), Some(Display::None));
}

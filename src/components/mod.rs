//! Reusable UI component modules.

pub mod login_form;

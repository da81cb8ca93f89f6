//! Session state shared by the reflector, the guard, and the login form.

pub mod session;

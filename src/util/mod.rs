//! Page-level helpers driven by session state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `route_guard` and `visibility` hold the decision logic behind small traits;
//! `dom` binds those traits to the live document and is browser-only.

#[cfg(feature = "csr")]
pub mod dom;
pub mod route_guard;
pub mod visibility;

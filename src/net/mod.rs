//! Networking modules for the backend session endpoints.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles the REST calls and `types` defines the shared wire schema.

pub mod api;
pub mod types;

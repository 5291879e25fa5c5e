//! Networking modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles the REST calls to the identity backend. Wire types are shared
//! with the native tooling through the `session` crate.

pub mod api;

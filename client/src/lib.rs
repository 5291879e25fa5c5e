//! # client
//!
//! Leptos + WASM front end for the healthcare portal.
//!
//! Hosts the login page and the role-based dashboard. All authentication
//! state flows through the `session` crate's state machine, exposed to the
//! component tree as a [`SessionContext`](state::session::SessionContext).
//! Browser-only code (HTTP, `localStorage`, mounting) sits behind the `csr`
//! feature so the crate builds and tests natively.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install logging and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}

//! # session
//!
//! Client-side authentication session for the healthcare portal.
//!
//! The pure pieces (token decoding, profile schema, the `Session` state
//! machine, token storage, configuration) build everywhere, including the
//! WASM front end. The `runtime` feature adds the tokio-driven
//! [`SessionManager`](manager::SessionManager), the `reqwest` identity client
//! and scoped handle lookup.

pub mod config;
pub mod error;
pub mod navigate;
pub mod profile;
pub mod state;
pub mod storage;
pub mod token;
pub mod wire;

#[cfg(feature = "runtime")]
pub mod api;
#[cfg(feature = "runtime")]
pub mod manager;
#[cfg(feature = "runtime")]
pub mod scope;

pub use profile::Profile;
pub use state::{GatePolicy, Session, Ticket};
pub use token::{Claims, Role};

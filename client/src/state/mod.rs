//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! Only the session lives here; page-local form state stays in signals owned
//! by the page that uses it.

pub mod session;

//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render portal chrome while reading the shared session from
//! Leptos context.

pub mod error_fallback;
pub mod profile_menu;
pub mod session_gate;

//! Session state machine.
//!
//! DESIGN
//! ======
//! `Session` is plain data plus the transitions that mutate it. Drivers (the
//! tokio `SessionManager`, the browser client) own the async work: they ask
//! for a `Ticket`, perform the profile fetch, then hand the outcome back to
//! `apply`. Every transition that changes which token is current bumps a
//! private generation counter, and `apply` refuses tickets from an older
//! generation, so a slow response for a superseded token is dropped no matter
//! when it arrives.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use serde::{Deserialize, Serialize};

use crate::profile::Profile;
use crate::token::{self, Role};

/// When children that depend on the session may render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatePolicy {
    /// Hide only until the first resolution after startup settles.
    #[default]
    Initial,
    /// Hide whenever a resolution is in flight, including refetches.
    EveryLoad,
}

/// Permission to apply one profile fetch result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    pub token: String,
    pub role: Role,
}

impl Ticket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// In-memory session for one application instance.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<Role>,
    pub user: Option<Profile>,
    pub loading: bool,
    /// Set once the startup resolution has settled; never cleared.
    pub ready: bool,
    #[serde(skip)]
    generation: u64,
}

impl Session {
    /// Seed a session from the persisted token.
    ///
    /// Returns the ticket for the profile fetch when one is needed.
    #[must_use]
    pub fn from_stored(token: Option<String>) -> (Self, Option<Ticket>) {
        let mut session = Self::default();
        let ticket = match token {
            Some(token) => session.login(token),
            None => {
                session.ready = true;
                None
            }
        };
        (session, ticket)
    }

    /// Switch to `token`, dropping any profile tied to the previous one.
    pub fn login(&mut self, token: String) -> Option<Ticket> {
        self.user = None;
        self.token = Some(token);
        self.resolve()
    }

    /// Re-run resolution for the current token. No-op without a token.
    pub fn refetch(&mut self) -> Option<Ticket> {
        if self.token.is_none() {
            return None;
        }
        self.resolve()
    }

    /// Reset to signed-out and invalidate any in-flight fetch. A signed-out
    /// session has nothing left to load, so the startup gate opens.
    pub fn logout(&mut self) {
        self.generation += 1;
        self.token = None;
        self.role = None;
        self.user = None;
        self.loading = false;
        self.ready = true;
    }

    /// Apply the outcome of the fetch authorized by `ticket`.
    ///
    /// Returns `false` without touching state when the ticket is stale.
    pub fn apply(&mut self, ticket: &Ticket, profile: Option<Profile>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.user = profile;
        self.loading = false;
        self.ready = true;
        true
    }

    /// Whether `ticket` still belongs to the current token.
    #[must_use]
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation && self.token.as_deref() == Some(ticket.token.as_str())
    }

    /// Whether session-dependent children may render under `policy`.
    #[must_use]
    pub fn should_render(&self, policy: GatePolicy) -> bool {
        match policy {
            GatePolicy::Initial => self.ready,
            GatePolicy::EveryLoad => self.ready && !self.loading,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Decode the current token and either hand out a ticket or settle
    /// immediately when there is nothing to fetch.
    fn resolve(&mut self) -> Option<Ticket> {
        self.generation += 1;
        self.role = self.token.as_deref().and_then(token::role_of);
        match (&self.token, &self.role) {
            (Some(token), Some(role)) => {
                self.loading = true;
                Some(Ticket { generation: self.generation, token: token.clone(), role: role.clone() })
            }
            _ => {
                self.user = None;
                self.loading = false;
                self.ready = true;
                None
            }
        }
    }
}

use super::*;
use std::sync::Arc;

use crate::api::{Credentials, IdentityApi, LoginResponse};
use crate::error::ApiError;
use crate::navigate::LogNavigator;
use crate::profile::Profile;
use crate::storage::MemoryStore;
use crate::token::Role;

struct OfflineApi;

#[async_trait::async_trait]
impl IdentityApi for OfflineApi {
    async fn login(&self, _credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        Err(ApiError::Request("offline".into()))
    }

    async fn fetch_profile(&self, _role: &Role, _token: &str) -> Result<Profile, ApiError> {
        Err(ApiError::Request("offline".into()))
    }
}

fn manager() -> SessionManager {
    SessionManager::new(Arc::new(OfflineApi), Arc::new(MemoryStore::default()), Arc::new(LogNavigator))
}

#[tokio::test]
async fn try_current_outside_scope_errors() {
    assert!(matches!(try_current(), Err(SessionError::OutsideScope)));
}

#[tokio::test]
#[should_panic(expected = "outside of an initialized session scope")]
async fn current_outside_scope_panics() {
    let _ = current();
}

#[tokio::test]
async fn current_inside_scope_returns_provided_handle() {
    let outer = manager();
    let outer_probe = outer.clone();
    provide(outer, async move {
        let found = current();
        found.logout();
        assert!(outer_probe.snapshot().token.is_none());
        assert!(try_current().is_ok());
    })
    .await;
    assert!(try_current().is_err());
}

#[tokio::test]
async fn nested_scope_shadows_outer() {
    let outer = manager();
    let inner = manager();
    let _ = inner.login("not-a-token");
    provide(outer, async move {
        provide(inner, async {
            assert_eq!(current().snapshot().token.as_deref(), Some("not-a-token"));
        })
        .await;
        assert!(current().snapshot().token.is_none());
    })
    .await;
}

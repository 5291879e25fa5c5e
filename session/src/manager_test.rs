use super::*;
use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::json;
use tokio::sync::oneshot;

use crate::api::Credentials;
use crate::profile::Profile;
use crate::storage::MemoryStore;
use crate::token::{self, Role};

// =========================================================================
// Test doubles
// =========================================================================

type Reply = Result<Profile, ApiError>;

/// Identity API whose profile replies are released by the test.
#[derive(Default)]
struct ScriptedApi {
    replies: Mutex<HashMap<String, oneshot::Receiver<Reply>>>,
    calls: Mutex<Vec<(Role, String)>>,
    login_token: Mutex<Option<String>>,
}

impl ScriptedApi {
    /// Queue a reply for `token` that is available immediately.
    fn respond(&self, token: &str, reply: Reply) {
        let tx = self.hold(token);
        let _ = tx.send(reply);
    }

    /// Queue a reply for `token` that is sent when the test decides.
    fn hold(&self, token: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().insert(token.to_owned(), rx);
        tx
    }

    fn calls(&self) -> Vec<(Role, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl IdentityApi for ScriptedApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        match self.login_token.lock().unwrap().clone() {
            Some(token) if credentials.password == "correct" => Ok(LoginResponse { token, user: None }),
            _ => Err(ApiError::Status { status: 401, body: "invalid credentials".into() }),
        }
    }

    async fn fetch_profile(&self, role: &Role, token: &str) -> Result<Profile, ApiError> {
        self.calls.lock().unwrap().push((role.clone(), token.to_owned()));
        let rx = self.replies.lock().unwrap().remove(token);
        match rx {
            Some(rx) => rx.await.unwrap_or_else(|_| Err(ApiError::Request("reply dropped".into()))),
            None => Err(ApiError::Status { status: 404, body: String::new() }),
        }
    }
}

#[derive(Default)]
struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_owned());
    }
}

struct Harness {
    api: Arc<ScriptedApi>,
    store: MemoryStore,
    navigator: Arc<RecordingNavigator>,
}

impl Harness {
    fn new() -> Self {
        Self { api: Arc::default(), store: MemoryStore::default(), navigator: Arc::default() }
    }

    fn manager(&self) -> SessionManager {
        SessionManager::new(self.api.clone(), Arc::new(self.store.clone()), self.navigator.clone())
    }
}

fn doctor_token(sub: &str) -> String {
    token::encode_unsigned(&json!({ "role": "doctor", "sub": sub }))
}

fn patient_token(sub: &str) -> String {
    token::encode_unsigned(&json!({ "role": "patient", "sub": sub }))
}

fn profile(name: &str) -> Profile {
    Profile { name: Some(name.to_owned()), ..Profile::default() }
}

// =========================================================================
// Startup
// =========================================================================

#[tokio::test]
async fn starts_signed_out_without_stored_token() {
    let h = Harness::new();
    let manager = h.manager();
    let session = manager.snapshot();
    assert!(!session.loading);
    assert!(session.ready);
    assert!(session.token.is_none());
    assert!(h.api.calls().is_empty());
}

#[tokio::test]
async fn resumes_stored_token_on_startup() {
    let h = Harness::new();
    let token = patient_token("p1");
    h.store.save(&token).unwrap();
    h.api.respond(&token, Ok(profile("Sam")));

    let manager = h.manager();
    assert!(manager.snapshot().loading);
    let session = manager.ready().await;
    assert_eq!(session.user, Some(profile("Sam")));
    assert_eq!(session.role, Some(Role::Patient));
    assert_eq!(h.api.calls(), vec![(Role::Patient, token)]);
}

#[tokio::test]
async fn logout_during_startup_load_still_becomes_ready() {
    let h = Harness::new();
    let token = doctor_token("d1");
    h.store.save(&token).unwrap();
    let tx = h.api.hold(&token);

    let manager = h.manager();
    assert!(!manager.snapshot().ready);
    manager.logout();

    let session = tokio::time::timeout(std::time::Duration::from_secs(1), manager.ready())
        .await
        .expect("ready after logout");
    assert!(session.token.is_none());
    assert!(session.should_render(crate::state::GatePolicy::Initial));

    let _ = tx.send(Ok(profile("Late")));
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    assert!(manager.snapshot().user.is_none());
    assert_eq!(*h.navigator.routes.lock().unwrap(), vec![LOGIN_ROUTE.to_owned()]);
}

// =========================================================================
// Login
// =========================================================================

#[tokio::test]
async fn login_doctor_fetches_doctor_profile() {
    let h = Harness::new();
    let manager = h.manager();
    let token = doctor_token("d1");
    h.api.respond(&token, Ok(profile("Dr. Ada")));

    let handle = manager.login(token.clone()).unwrap();
    assert!(manager.snapshot().loading);
    handle.await.unwrap();

    let session = manager.snapshot();
    assert_eq!(session.user, Some(profile("Dr. Ada")));
    assert_eq!(session.role, Some(Role::Doctor));
    assert!(!session.loading);
    assert_eq!(h.store.load().unwrap(), Some(token.clone()));
    assert_eq!(h.api.calls(), vec![(Role::Doctor, token)]);
}

#[tokio::test]
async fn login_failed_profile_keeps_token_and_role() {
    let h = Harness::new();
    let manager = h.manager();
    let token = doctor_token("d1");
    h.api.respond(&token, Err(ApiError::Status { status: 500, body: "boom".into() }));

    let _ = manager.login(token.clone());
    let session = manager.settled().await;
    assert!(session.user.is_none());
    assert!(!session.loading);
    assert_eq!(session.token, Some(token));
    assert_eq!(session.role, Some(Role::Doctor));
}

#[tokio::test]
async fn login_with_roleless_token_skips_network() {
    let h = Harness::new();
    let manager = h.manager();
    let token = token::encode_unsigned(&json!({ "sub": "nobody" }));

    assert!(manager.login(token.clone()).is_none());
    let session = manager.snapshot();
    assert!(!session.loading);
    assert!(session.role.is_none());
    assert_eq!(session.token, Some(token));
    assert!(h.api.calls().is_empty());
}

#[tokio::test]
async fn newer_login_wins_when_stale_reply_arrives_last() {
    let h = Harness::new();
    let manager = h.manager();
    let (t1, t2) = (doctor_token("d1"), patient_token("p2"));
    let tx1 = h.api.hold(&t1);
    let tx2 = h.api.hold(&t2);

    let first = manager.login(t1).unwrap();
    let second = manager.login(t2.clone()).unwrap();

    tx2.send(Ok(profile("Second"))).unwrap();
    second.await.unwrap();
    tx1.send(Ok(profile("First"))).unwrap();
    first.await.unwrap();

    let session = manager.snapshot();
    assert_eq!(session.user, Some(profile("Second")));
    assert_eq!(session.role, Some(Role::Patient));
    assert_eq!(session.token, Some(t2));
}

#[tokio::test]
async fn newer_login_wins_when_stale_reply_arrives_first() {
    let h = Harness::new();
    let manager = h.manager();
    let (t1, t2) = (doctor_token("d1"), doctor_token("d2"));
    let tx1 = h.api.hold(&t1);
    let tx2 = h.api.hold(&t2);

    let first = manager.login(t1).unwrap();
    let second = manager.login(t2.clone()).unwrap();

    tx1.send(Ok(profile("First"))).unwrap();
    first.await.unwrap();
    let session = manager.snapshot();
    assert!(session.loading);
    assert!(session.user.is_none());

    tx2.send(Err(ApiError::Request("timeout".into()))).unwrap();
    second.await.unwrap();
    let session = manager.snapshot();
    assert!(!session.loading);
    assert!(session.user.is_none());
    assert_eq!(session.token, Some(t2));
}

#[tokio::test]
async fn login_with_credentials_adopts_issued_token() {
    let h = Harness::new();
    let token = doctor_token("d1");
    *h.api.login_token.lock().unwrap() = Some(token.clone());
    h.api.respond(&token, Ok(profile("Dr. Ada")));
    let manager = h.manager();

    let creds = Credentials { identifier: "ada".into(), password: "correct".into() };
    let resp = manager.login_with(&creds).await.unwrap();
    assert_eq!(resp.token, token);
    assert_eq!(manager.settled().await.user, Some(profile("Dr. Ada")));
}

#[tokio::test]
async fn rejected_credentials_leave_state_untouched() {
    let h = Harness::new();
    let manager = h.manager();
    let before = manager.snapshot();

    let creds = Credentials { identifier: "ada".into(), password: "wrong".into() };
    let err = manager.login_with(&creds).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 401, .. }));
    assert_eq!(manager.snapshot(), before);
    assert_eq!(h.store.load().unwrap(), None);
}

// =========================================================================
// Logout
// =========================================================================

#[tokio::test]
async fn logout_clears_state_storage_and_navigates() {
    let h = Harness::new();
    let manager = h.manager();
    let token = doctor_token("d1");
    h.api.respond(&token, Ok(profile("Dr. Ada")));
    manager.login(token).unwrap().await.unwrap();

    manager.logout();
    let session = manager.snapshot();
    assert!(session.token.is_none());
    assert!(session.user.is_none());
    assert!(session.role.is_none());
    assert_eq!(h.store.load().unwrap(), None);
    assert_eq!(*h.navigator.routes.lock().unwrap(), vec![LOGIN_ROUTE.to_owned()]);
}

#[tokio::test]
async fn logout_when_signed_out_still_navigates() {
    let h = Harness::new();
    let manager = h.manager();
    manager.logout();
    assert!(manager.snapshot().token.is_none());
    assert_eq!(h.navigator.routes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn logout_discards_in_flight_profile() {
    let h = Harness::new();
    let manager = h.manager();
    let token = doctor_token("d1");
    let tx = h.api.hold(&token);
    let pending = manager.login(token).unwrap();

    manager.logout();
    tx.send(Ok(profile("Dr. Ada"))).unwrap();
    pending.await.unwrap();

    let session = manager.snapshot();
    assert!(session.user.is_none());
    assert!(session.token.is_none());
}

// =========================================================================
// Refetch
// =========================================================================

#[tokio::test]
async fn refetch_without_token_is_noop() {
    let h = Harness::new();
    let manager = h.manager();
    let mut rx = manager.subscribe();
    let before = manager.snapshot();

    assert!(manager.refetch_user().is_none());
    assert_eq!(manager.snapshot(), before);
    assert!(!rx.has_changed().unwrap());
    assert!(h.api.calls().is_empty());
}

#[tokio::test]
async fn refetch_replaces_user_with_fresh_profile() {
    let h = Harness::new();
    let manager = h.manager();
    let token = patient_token("p1");
    h.api.respond(&token, Ok(profile("Sam")));
    manager.login(token.clone()).unwrap().await.unwrap();

    let tx = h.api.hold(&token);
    let pending = manager.refetch_user().unwrap();
    let session = manager.snapshot();
    assert!(session.loading);
    assert_eq!(session.user, Some(profile("Sam")));

    tx.send(Ok(profile("Sam Updated"))).unwrap();
    pending.await.unwrap();
    assert_eq!(manager.snapshot().user, Some(profile("Sam Updated")));
    assert_eq!(h.api.calls().len(), 2);
}

// =========================================================================
// Restart
// =========================================================================

#[tokio::test]
async fn restart_reproduces_token_and_resolution() {
    let h = Harness::new();
    let token = doctor_token("d1");
    h.api.respond(&token, Ok(profile("Dr. Ada")));
    let first = h.manager();
    first.login(token.clone()).unwrap().await.unwrap();
    let before = first.snapshot();
    drop(first);

    h.api.respond(&token, Ok(profile("Dr. Ada")));
    let second = h.manager();
    assert_eq!(second.snapshot().token, Some(token.clone()));
    let after = second.ready().await;

    assert_eq!(after.token, before.token);
    assert_eq!(after.role, before.role);
    assert_eq!(after.user, before.user);
    let calls = h.api.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
}

#[tokio::test]
async fn separate_managers_are_isolated() {
    let a = Harness::new();
    let b = Harness::new();
    let token = doctor_token("d1");
    a.api.respond(&token, Ok(profile("Dr. Ada")));

    let ma = a.manager();
    let mb = b.manager();
    ma.login(token).unwrap().await.unwrap();
    assert!(ma.snapshot().is_authenticated());
    assert!(mb.snapshot().token.is_none());
}

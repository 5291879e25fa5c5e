use super::*;
use session::Profile;

#[test]
fn menu_label_prefers_profile_name() {
    let mut session = Session::default();
    session.user = Some(Profile { name: Some("Dr. Ada".into()), ..Profile::default() });
    assert_eq!(menu_label(&session), "Dr. Ada");
}

#[test]
fn menu_label_while_loading() {
    let mut session = Session::default();
    session.loading = true;
    assert_eq!(menu_label(&session), "Loading…");
}

#[test]
fn menu_label_after_failed_profile_fetch() {
    let mut session = Session::default();
    session.token = Some("a.b.c".into());
    assert_eq!(menu_label(&session), "Unknown user");
}

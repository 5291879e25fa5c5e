use super::*;
use serde_json::json;

#[test]
fn parses_doctor_profile_fields() {
    let profile: Profile = serde_json::from_value(json!({
        "_id": "665f1c",
        "name": "Dr. Ada Okafor",
        "email": "ada@stmarys.example",
        "specialization": "Cardiology",
        "hospital": "St. Mary's",
        "experience": 12
    }))
    .unwrap();
    assert_eq!(profile.id.as_deref(), Some("665f1c"));
    assert_eq!(profile.specialization.as_deref(), Some("Cardiology"));
    assert_eq!(profile.hospital.as_deref(), Some("St. Mary's"));
    assert_eq!(profile.extra.get("experience"), Some(&json!(12)));
}

#[test]
fn parses_patient_profile_with_numeric_id() {
    let profile: Profile = serde_json::from_value(json!({ "id": 7, "name": "Sam", "phone": "555-0100" })).unwrap();
    assert_eq!(profile.id.as_deref(), Some("7"));
    assert_eq!(profile.phone.as_deref(), Some("555-0100"));
    assert!(profile.specialization.is_none());
}

#[test]
fn empty_object_is_a_valid_profile() {
    let profile: Profile = serde_json::from_str("{}").unwrap();
    assert_eq!(profile, Profile::default());
}

#[test]
fn non_object_bodies_are_rejected() {
    assert!(serde_json::from_str::<Profile>("[]").is_err());
    assert!(serde_json::from_str::<Profile>("\"doctor\"").is_err());
    assert!(serde_json::from_str::<Profile>("null").is_err());
}

#[test]
fn object_id_is_kept_in_extra() {
    let profile: Profile = serde_json::from_value(json!({ "id": { "oid": "x" }, "_id": "abc" })).unwrap();
    assert_eq!(profile.id.as_deref(), Some("abc"));
    assert_eq!(profile.extra.get("id"), Some(&json!({ "oid": "x" })));
}

#[test]
fn numeric_phone_still_parses() {
    let profile: Profile = serde_json::from_str(r#"{"name":"Sam","phone":5550100}"#).unwrap();
    assert_eq!(profile.phone.as_deref(), Some("5550100"));
    assert_eq!(profile.name.as_deref(), Some("Sam"));
}

#[test]
fn mismatched_display_fields_move_to_extra() {
    let profile: Profile = serde_json::from_value(json!({
        "name": { "first": "Ada", "last": "Okafor" },
        "email": null,
        "hospital": ["St. Mary's"]
    }))
    .unwrap();
    assert!(profile.name.is_none());
    assert!(profile.email.is_none());
    assert!(profile.hospital.is_none());
    assert_eq!(profile.extra.get("name"), Some(&json!({ "first": "Ada", "last": "Okafor" })));
    assert_eq!(profile.extra.get("hospital"), Some(&json!(["St. Mary's"])));
}

#[test]
fn serializes_without_duplicate_keys() {
    let profile: Profile = serde_json::from_value(json!({ "name": 5, "phone": true })).unwrap();
    let value = serde_json::to_value(&profile).unwrap();
    assert_eq!(value, json!({ "name": "5", "phone": true }));
}

#[test]
fn display_name_falls_back_to_email_then_placeholder() {
    let named = Profile { name: Some("Sam".into()), ..Profile::default() };
    assert_eq!(named.display_name(), "Sam");

    let blank = Profile { name: Some("  ".into()), email: Some("sam@example.com".into()), ..Profile::default() };
    assert_eq!(blank.display_name(), "sam@example.com");

    assert_eq!(Profile::default().display_name(), "Unknown user");
}

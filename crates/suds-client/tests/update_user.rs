mod common;

use common::{SESSION, anonymous, logged_in};
use serde_json::json;
use suds_client::{SudsError, UserSettings};

const UPDATE_USER: &str = "/v1/user/updateuser";

#[tokio::test]
async fn ok_status_resolves() {
    let h = logged_in();
    h.transport.respond(UPDATE_USER, json!({ "status": "ok" }));

    let settings = UserSettings::new()
        .with_pseudonym("  reader  ")
        .with_preference("emailreplies", "immediately");
    let response = h.gateway.update_user(settings).await.unwrap();
    assert!(response.is_ok());

    let calls = h.transport.calls_to(UPDATE_USER);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0]["pseudonym"], json!("reader"));
    assert_eq!(calls[0]["emailreplies"], json!("immediately"));
    assert_eq!(calls[0]["sessionId"], json!(SESSION));
}

#[tokio::test]
async fn blank_pseudonym_is_refused_locally() {
    let h = logged_in();
    h.transport.respond(UPDATE_USER, json!({ "status": "ok" }));

    let err = h
        .gateway
        .update_user(UserSettings::new().with_pseudonym(" \t "))
        .await
        .unwrap_err();

    assert!(err.is_suds_error());
    assert_eq!(err.to_string(), "Pseudonym is blank.");
    assert_eq!(h.transport.call_count(), 0);
}

#[tokio::test]
async fn service_error_is_a_rejection() {
    let h = logged_in();
    h.transport.respond(
        UPDATE_USER,
        json!({ "status": "error", "error": "Pseudonym already in use." }),
    );

    let err = h
        .gateway
        .update_user(UserSettings::new().with_pseudonym("taken"))
        .await
        .unwrap_err();

    assert!(err.is_suds_error());
    assert_eq!(err.to_string(), "Pseudonym already in use.");
}

#[tokio::test]
async fn failure_without_details() {
    let h = logged_in();
    h.transport.respond(UPDATE_USER, json!({ "status": "error" }));

    let err = h
        .gateway
        .update_user(UserSettings::new().with_preference("emaillikes", "never"))
        .await
        .unwrap_err();

    assert!(matches!(err, SudsError::Failed));
    assert!(!err.is_suds_error());
    assert_eq!(err.to_string(), "An error occured.");
}

#[tokio::test]
async fn empty_response_is_no_data() {
    let h = logged_in();
    h.transport.respond(UPDATE_USER, json!(null));

    let err = h.gateway.update_user(UserSettings::new()).await.unwrap_err();
    assert!(matches!(err, SudsError::NoData));
}

#[tokio::test]
async fn anonymous_update_sends_no_session() {
    let h = anonymous();
    h.transport.respond(UPDATE_USER, json!({ "status": "ok" }));

    h.gateway
        .update_user(UserSettings::new().with_pseudonym("reader"))
        .await
        .unwrap();

    let calls = h.transport.calls_to(UPDATE_USER);
    assert!(!calls[0].contains_key("sessionId"));
}

#[tokio::test]
async fn null_pseudonym_is_refused_locally() {
    let h = logged_in();
    h.transport.respond(UPDATE_USER, json!({ "status": "ok" }));

    let settings =
        UserSettings::from_value(json!({ "pseudonym": null, "emaillikes": "never" })).unwrap();
    let err = h.gateway.update_user(settings).await.unwrap_err();

    assert!(err.is_suds_error());
    assert_eq!(err.to_string(), "Pseudonym is blank.");
    assert_eq!(h.transport.call_count(), 0);
}

#[tokio::test]
async fn settings_without_pseudonym_are_sent() {
    let h = logged_in();
    h.transport.respond(UPDATE_USER, json!({ "status": "ok" }));

    let settings = UserSettings::from_value(json!({ "emaillikes": "never" })).unwrap();
    h.gateway.update_user(settings).await.unwrap();

    let calls = h.transport.calls_to(UPDATE_USER);
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].contains_key("pseudonym"));
}

mod common;

use common::logged_in;
use serde_json::{Value, json};
use suds_client::suds_config::SudsConfig;
use suds_client::{Payload, SudsError, SudsGateway, TransportError};

const COUNT: &str = "/v1/livefyre/commentcount";
const COUNTS: &str = "/v1/livefyre/commentcounts";

fn ids_of(payload: &Payload) -> Vec<String> {
    payload["articleIds"]
        .as_array()
        .unwrap()
        .iter()
        .map(|id| id.as_str().unwrap().to_string())
        .collect()
}

/// Answers every id with its length as the count.
fn count_by_length(payload: &Payload) -> Result<Value, TransportError> {
    let counts: serde_json::Map<String, Value> = ids_of(payload)
        .into_iter()
        .map(|id| {
            let count = id.len();
            (id, json!(count))
        })
        .collect();
    Ok(Value::Object(counts))
}

#[tokio::test]
async fn single_count() {
    let h = logged_in();
    h.transport.respond(COUNT, json!({ "count": 17 }));

    assert_eq!(h.gateway.get_comment_count("a-1").await.unwrap(), 17);
    assert_eq!(h.transport.calls_to(COUNT)[0]["articleId"], json!("a-1"));
}

#[tokio::test]
async fn single_count_errors() {
    let h = logged_in();

    let err = h.gateway.get_comment_count("").await.unwrap_err();
    assert!(err.is_validation_error());
    assert_eq!(h.transport.call_count(), 0);

    h.transport.respond(COUNT, json!({}));
    let err = h.gateway.get_comment_count("a-1").await.unwrap_err();
    assert!(matches!(err, SudsError::NoData));

    h.transport.respond(COUNT, json!(null));
    let err = h.gateway.get_comment_count("a-1").await.unwrap_err();
    assert!(matches!(err, SudsError::NoData));

    h.transport.respond(COUNT, json!({ "count": "lots" }));
    let err = h.gateway.get_comment_count("a-1").await.unwrap_err();
    assert!(matches!(err, SudsError::InvalidResponse(_)));
}

#[tokio::test]
async fn small_list_is_one_request() {
    let h = logged_in();
    h.transport.on(COUNTS, count_by_length);

    let counts = h
        .gateway
        .get_comment_counts(&["a", "bb", "ccc"])
        .await
        .unwrap();

    assert_eq!(h.transport.call_count(), 1);
    assert_eq!(counts.len(), 3);
    assert_eq!(counts["bb"], 2);
    assert_eq!(
        ids_of(&h.transport.calls_to(COUNTS)[0]),
        vec!["a", "bb", "ccc"]
    );
}

#[tokio::test]
async fn large_list_is_split_and_merged() {
    let h = logged_in();
    h.transport.on(COUNTS, count_by_length);

    // default budget 1000, base URL of 70 chars, 10-char ids: 93 ids per batch
    let ids: Vec<String> = (0..200).map(|i| format!("article{i:03}")).collect();
    let counts = h.gateway.get_comment_counts(&ids).await.unwrap();

    let calls = h.transport.calls_to(COUNTS);
    assert_eq!(calls.len(), 3);
    assert_eq!(counts.len(), 200);
    assert!(counts.values().all(|count| *count == 10));

    let sent: Vec<String> = calls.iter().flat_map(ids_of).collect();
    assert_eq!(sent, ids);
}

#[tokio::test]
async fn batch_budget_follows_configuration() {
    let transport = common::RecordingTransport::new();
    transport.on(COUNTS, count_by_length);

    let mut config = SudsConfig::default();
    config.batching.max_url_size = 1;
    let gateway = SudsGateway::builder()
        .with_config(config)
        .with_transport(transport.clone())
        .build()
        .unwrap();

    let counts = gateway.get_comment_counts(&["a", "b", "c"]).await.unwrap();

    assert_eq!(transport.call_count(), 3);
    assert_eq!(counts.len(), 3);
}

#[tokio::test]
async fn one_failing_batch_fails_the_lookup() {
    let h = logged_in();
    h.transport.on(COUNTS, |payload| {
        if ids_of(payload).iter().any(|id| id == "article150") {
            Err(TransportError::status(500, "boom"))
        } else {
            count_by_length(payload)
        }
    });

    let ids: Vec<String> = (0..200).map(|i| format!("article{i:03}")).collect();
    let err = h.gateway.get_comment_counts(&ids).await.unwrap_err();

    assert!(err.is_transport_error());
    // every batch was still sent
    assert_eq!(h.transport.call_count(), 3);
}

#[tokio::test]
async fn empty_list_makes_no_request() {
    let h = logged_in();
    let ids: Vec<String> = Vec::new();

    let counts = h.gateway.get_comment_counts(&ids).await.unwrap();

    assert!(counts.is_empty());
    assert_eq!(h.transport.call_count(), 0);
}

#[tokio::test]
async fn empty_batch_response_contributes_nothing() {
    let h = logged_in();
    h.transport.respond(COUNTS, json!(null));

    let counts = h.gateway.get_comment_counts(&["a-1"]).await.unwrap();
    assert!(counts.is_empty());
}

//! Aircall client against a mock API.

mod common;

use aircall_mcp::client::{AircallClient, ClientConfig, ListCallsQuery, ParticipantType};
use aircall_mcp::AircallError;
use common::*;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_sends_basic_auth_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calls"))
        .and(header("authorization", AUTH_HEADER))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "10"))
        .and(query_param("order", "desc"))
        .and(query_param("to", "1700000500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(calls_page(
            vec![call_json(1, "inbound", 10, &[])],
            11,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client
        .list_calls(&ListCallsQuery {
            page: 2,
            per_page: 10,
            to: Some(1_700_000_500),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.calls.len(), 1);
    assert_eq!(page.meta.and_then(|m| m.total), Some(11));
}

#[tokio::test]
async fn test_absent_filters_are_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(calls_page(vec![], 0)))
        .mount(&server)
        .await;

    client_for(&server)
        .list_calls(&ListCallsQuery::default())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let keys: Vec<String> = requests[0]
        .url
        .query_pairs()
        .map(|(k, _)| k.into_owned())
        .collect();
    assert_eq!(keys, vec!["page", "per_page", "order"]);
}

#[tokio::test]
async fn test_get_call_with_and_without_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calls/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"call": call_json(1, "outbound", 5, &["a"])})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/calls/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(call_json(2, "inbound", 6, &[])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = client.get_call(1).await.unwrap();
    assert_eq!(first.id, 1);
    assert_eq!(first.tag_names(), vec!["a"]);

    let second = client.get_call(2).await.unwrap();
    assert_eq!(second.id, 2);
    assert_eq!(second.duration, 6);
}

#[tokio::test]
async fn test_transcript_sorted_and_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calls/3/transcription"))
        .respond_with(ResponseTemplate::new(200).set_body_json(transcript_json(
            3,
            &[("external", "second", 4.0), ("internal", "first", 1.0)],
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/calls/4/transcription"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let transcript = client.get_transcript(3).await.unwrap().unwrap();
    assert_eq!(transcript.call_id, 3);
    assert_eq!(transcript.language.as_deref(), Some("en"));
    assert_eq!(transcript.utterances[0].text, "first");
    assert_eq!(transcript.utterances[0].participant_type, ParticipantType::Internal);

    assert!(client.get_transcript(4).await.unwrap().is_none());
    assert!(matches!(client.get_call(4).await, Err(AircallError::NotFound)));
}

#[tokio::test]
async fn test_error_statuses() {
    let server = MockServer::start().await;
    for status in [401u16, 403, 429, 500, 418] {
        Mock::given(method("GET"))
            .and(path(format!("/calls/{}", status)))
            .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    assert!(matches!(client.get_call(401).await, Err(AircallError::InvalidCredentials)));
    assert!(matches!(client.get_call(403).await, Err(AircallError::PermissionDenied)));
    assert!(matches!(
        client.get_call(429).await,
        Err(AircallError::RateLimitExceeded { limit: 1000 })
    ));
    assert!(matches!(
        client.get_call(500).await,
        Err(AircallError::UpstreamUnavailable { status: 500 })
    ));

    let err = client.get_call(418).await.unwrap_err();
    assert_eq!(err.status_code(), Some(418));
    assert_eq!(err.to_string(), "API request failed: nope");
}

#[tokio::test]
async fn test_summary_absent_on_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calls/5/summary"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert!(client_for(&server).get_summary(5).await.unwrap().is_none());
}

#[tokio::test]
async fn test_close_is_idempotent_and_client_reopens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calls/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"call": call_json(1, "inbound", 1, &[])})))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.get_call(1).await.unwrap();
    client.close();
    client.close();
    client.get_call(1).await.unwrap();
}

#[tokio::test]
async fn test_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calls/1"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let client = AircallClient::new(ClientConfig {
        api_id: Some("test-id".to_string()),
        api_token: Some("test-token".to_string()),
        base_url: server.uri(),
        timeout: Duration::from_millis(200),
        requests_per_minute: 60,
    })
    .unwrap();

    assert!(matches!(client.get_call(1).await, Err(AircallError::Timeout)));
}

#[tokio::test]
async fn test_get_calls_skips_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calls/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"call": call_json(1, "inbound", 1, &[])})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/calls/2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let calls = client_for(&server).get_calls(&[2, 1]).await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].id, 1);
}

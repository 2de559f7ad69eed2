//! HTTP transport tests against a local stub server
//!
//! The stub speaks the same unary JSON protocol as the platform: one POST per
//! call at `/<service>/<method>`, error envelopes on failure.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use go2::{ClientOptions, Code, Go2Client, Go2Error, HttpTransport, LinkQuery, Transport};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Default)]
struct Recorded {
    requests: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn list_links(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let api_key = headers
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    recorded.requests.lock().unwrap().push((api_key, body));

    Json(json!({
        "links": [{"id": "lnk_1", "slug": "promo", "totalClicks": "12345", "createdAt": "2024-05-01T10:00:00Z"}],
        "total": "1"
    }))
}

async fn get_link_not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"code": "not_found", "message": "link lnk_404 does not exist"})),
    )
}

async fn delete_link_unauthorized() -> (StatusCode, &'static str) {
    (StatusCode::UNAUTHORIZED, "")
}

async fn check_slug_rate_limited() -> (StatusCode, Json<Value>) {
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({"code": "resource_exhausted", "message": "quota", "details": "too many requests"})),
    )
}

async fn list_domains_slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(30)).await;
    Json(json!({"domains": []}))
}

async fn delete_domain_empty_body() -> StatusCode {
    StatusCode::OK
}

/// Helper to start the stub server and return its base URL
async fn spawn_stub_server() -> (String, Recorded) {
    let recorded = Recorded::default();

    let app = Router::new()
        .route("/links.v1.LinkService/ListLinks", post(list_links))
        .route("/links.v1.LinkService/GetLink", post(get_link_not_found))
        .route("/links.v1.LinkService/DeleteLink", post(delete_link_unauthorized))
        .route("/links.v1.LinkService/CheckSlug", post(check_slug_rate_limited))
        .route("/domains.v1.DomainService/ListDomains", post(list_domains_slow))
        .route("/domains.v1.DomainService/DeleteDomain", post(delete_domain_empty_body))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("127.0.0.1:{}", addr.port()), recorded)
}

/// Helper to create a client talking plain HTTP to the stub
fn create_test_client(endpoint: &str) -> Go2Client {
    let options = ClientOptions::new("test-key")
        .with_endpoint(endpoint)
        .insecure(true);
    Go2Client::new(options).unwrap()
}

#[tokio::test]
async fn test_request_carries_api_key_and_message() {
    let (endpoint, recorded) = spawn_stub_server().await;
    let client = create_test_client(&endpoint);

    let page = client
        .links()
        .list(&LinkQuery {
            page: Some(2),
            per_page: None,
        })
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.links[0].slug, "promo");
    assert_eq!(page.links[0].total_clicks, 12345);
    assert!(page.links[0].created_at.is_some());

    let requests = recorded.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0.as_deref(), Some("test-key"));
    assert_eq!(requests[0].1, json!({"page": 2, "perPage": 20}));
}

#[tokio::test]
async fn test_error_envelope_is_normalized() {
    let (endpoint, _) = spawn_stub_server().await;
    let client = create_test_client(&endpoint);

    let err = client.links().get("lnk_404").await.unwrap_err();
    assert_eq!(err, Go2Error::NotFound("link lnk_404 does not exist".to_string()));

    let err = client.links().check_slug("promo").await.unwrap_err();
    assert_eq!(err, Go2Error::RateLimit("too many requests".to_string()));
    assert_eq!(err.code(), Code::RESOURCE_EXHAUSTED);
}

#[tokio::test]
async fn test_bare_http_status_falls_back_to_status_mapping() {
    let (endpoint, _) = spawn_stub_server().await;
    let client = create_test_client(&endpoint);

    let err = client.links().delete("lnk_1").await.unwrap_err();

    assert!(matches!(err, Go2Error::Authentication(_)));
    assert_eq!(err.code(), Code::UNAUTHENTICATED);
    assert_eq!(err.message(), "Unauthorized");
}

#[tokio::test]
async fn test_empty_success_body_is_an_empty_message() {
    let (endpoint, _) = spawn_stub_server().await;
    let client = create_test_client(&endpoint);

    assert!(!client.domains().delete("dom_1").await.unwrap());
}

#[tokio::test]
async fn test_unknown_route_maps_to_unimplemented() {
    let (endpoint, _) = spawn_stub_server().await;
    let client = create_test_client(&endpoint);

    let err = client.qr().generate(&go2::GenerateQrParams::new("lnk_1")).await.unwrap_err();

    assert_eq!(err.code(), Code::UNIMPLEMENTED);
    assert!(matches!(err, Go2Error::Api { .. }));
}

#[tokio::test]
async fn test_close_cancels_pending_and_later_calls() {
    let (endpoint, _) = spawn_stub_server().await;
    let client = create_test_client(&endpoint);

    let domains = client.domains().clone();
    let pending = tokio::spawn(async move { domains.list().await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    client.close();
    client.close();

    let err = pending.await.unwrap().unwrap_err();
    assert_eq!(err.code(), Code::CANCELLED);
    assert_eq!(err.message(), "channel closed");

    let err = client.links().list(&LinkQuery::default()).await.unwrap_err();
    assert_eq!(err.code(), Code::CANCELLED);
    assert!(client.is_closed());
}

#[tokio::test]
async fn test_sub_second_timeout_only_stops_slow_calls() {
    let (endpoint, _) = spawn_stub_server().await;
    let options = ClientOptions::new("test-key")
        .with_endpoint(endpoint)
        .insecure(true)
        .with_timeout(Duration::from_millis(500));
    let client = Go2Client::new(options).unwrap();

    let page = client.links().list(&LinkQuery::default()).await.unwrap();
    assert_eq!(page.total, 1);

    let err = client.domains().list().await.unwrap_err();
    assert_eq!(err.code(), Code::DEADLINE_EXCEEDED);
}

#[tokio::test]
async fn test_unreachable_server_is_unavailable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = create_test_client(&format!("127.0.0.1:{}", addr.port()));
    let err = client.domains().list().await.unwrap_err();

    assert_eq!(err.code(), Code::UNAVAILABLE);
}

#[test]
fn test_transport_rejects_missing_api_key() {
    let options = ClientOptions::new("");
    assert!(HttpTransport::new(&options).is_err());
}

#[test]
fn test_transport_rejects_zero_timeout() {
    let options = ClientOptions::new("k").with_timeout(Duration::ZERO);
    assert!(HttpTransport::new(&options).is_err());
}

#[test]
fn test_transport_starts_open() {
    let transport = HttpTransport::new(&ClientOptions::new("k")).unwrap();
    assert_eq!(transport.base_url(), "https://grpc.go2.ge:443");
    assert!(!transport.is_closed());
}

//! HTTP scheduler tests against a mock study API.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use word_drill_client::scheduler::{HttpScheduler, LimitKind};
use word_drill_client::{Scheduler, SchedulerError};

fn scheduler(server: &MockServer) -> HttpScheduler {
    HttpScheduler::new(format!("{}/api/v1/", server.uri()), Some("t0ken".to_string()))
}

#[tokio::test]
async fn test_fetch_next_card() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/study/next"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "5f0c",
            "word": "flower",
            "translation": "цветок",
            "definition": "the seed-bearing part of a plant",
            "meta": "noun",
            "pronunciation": null,
            "example": null,
            "example_translation": null,
            "created_at": "2024-03-01T10:15:30.123456"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let card = scheduler(&server)
        .fetch_next_card()
        .await
        .unwrap()
        .expect("a card");

    assert_eq!(card.id, "5f0c");
    assert_eq!(card.word, "flower");
    assert_eq!(card.meta.as_deref(), Some("noun"));
    assert_eq!(card.pronunciation, None);
    assert!(card.created_at.is_some());
}

#[tokio::test]
async fn test_fetch_next_card_empty_queue() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/study/next"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    assert_eq!(scheduler(&server).fetch_next_card().await.unwrap(), None);
}

#[tokio::test]
async fn test_submit_verdict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/study/answer"))
        .and(header("authorization", "Bearer t0ken"))
        .and(body_json(json!({ "card_id": "c1", "answer": false })))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .expect(1)
        .mount(&server)
        .await;

    scheduler(&server).submit_verdict("c1", false).await.unwrap();
}

#[tokio::test]
async fn test_delete_card() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/study/cards/c1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    scheduler(&server).delete_card("c1").await.unwrap();
}

#[tokio::test]
async fn test_unauthorized_maps_to_not_authenticated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = scheduler(&server).fetch_next_card().await.unwrap_err();
    assert!(matches!(err, SchedulerError::NotAuthenticated));
}

#[tokio::test]
async fn test_backend_error_keeps_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Schedule not found"))
        .mount(&server)
        .await;

    let err = scheduler(&server).submit_verdict("gone", true).await.unwrap_err();
    assert_eq!(err.to_string(), "Backend error: 404 - Schedule not found");
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let scheduler = HttpScheduler::new("http://127.0.0.1:9", Some("t0ken".to_string()));
    let err = scheduler.fetch_next_card().await.unwrap_err();
    assert!(matches!(err, SchedulerError::Network(_)));
}

#[tokio::test]
async fn test_missing_token_fails_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let scheduler = HttpScheduler::new(server.uri(), None);
    let err = scheduler.fetch_next_card().await.unwrap_err();
    assert!(matches!(err, SchedulerError::NotAuthenticated));
}

#[tokio::test]
async fn test_login_then_use_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_string_contains("username=ann"))
        .and(body_string_contains("password=s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "token_type": "bearer"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/study/next"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .expect(1)
        .mount(&server)
        .await;

    let scheduler = HttpScheduler::new(format!("{}/api/v1", server.uri()), None);
    scheduler.login("ann", "s3cret").await.unwrap();
    assert_eq!(scheduler.fetch_next_card().await.unwrap(), None);
}

#[tokio::test]
async fn test_increase_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/study/limits/increase"))
        .and(body_json(json!({ "limit_type": "NEW", "amount": 10 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    scheduler(&server).increase_limit(LimitKind::New, 10).await.unwrap();
}

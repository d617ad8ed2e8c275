use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use labdesk_extract::entities::{EntityExtractor, HttpEntityExtractor};
use serde_json::{json, Value};

/// Serve `router` on an ephemeral port and return its base URL.
async fn spawn_service(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn parses_service_categories() {
    let router = Router::new().route(
        "/extract",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["text"], "Type 2 diabetes, thirst");
            Json(json!({
                "diagnoses": ["diabetes"],
                "symptoms": ["thirst"],
                "medications": []
            }))
        }),
    );
    let base = spawn_service(router).await;

    let outcome = HttpEntityExtractor::new(Some(format!("{base}/")))
        .classify("Type 2 diabetes, thirst")
        .await;

    assert!(!outcome.is_degraded());
    let entities = outcome.into_value();
    assert_eq!(entities.diagnoses, vec!["diabetes"]);
    assert_eq!(entities.symptoms, vec!["thirst"]);
    assert!(entities.medications.is_empty());
}

#[tokio::test]
async fn server_error_degrades_to_empty() {
    let router = Router::new().route(
        "/extract",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = spawn_service(router).await;

    let outcome = HttpEntityExtractor::new(Some(base)).classify("fever").await;
    assert!(outcome.is_degraded());
    assert!(outcome.value().is_empty());
}

#[tokio::test]
async fn malformed_body_degrades_to_empty() {
    let router = Router::new().route("/extract", post(|| async { "not json" }));
    let base = spawn_service(router).await;

    let outcome = HttpEntityExtractor::new(Some(base)).classify("fever").await;
    assert!(outcome.is_degraded());
    assert!(outcome.value().is_empty());
}

#[tokio::test]
async fn unconfigured_endpoint_degrades() {
    let outcome = HttpEntityExtractor::new(None).classify("fever").await;
    assert!(outcome.is_degraded());
    assert_eq!(outcome.reason(), Some("entity service not configured"));
}

#[tokio::test]
async fn blank_text_is_not_sent() {
    let outcome = HttpEntityExtractor::new(Some("http://127.0.0.1:9".to_string()))
        .classify("   ")
        .await;
    assert_eq!(outcome.reason(), Some("no text to analyze"));
}

#[tokio::test]
async fn slow_service_times_out() {
    let router = Router::new().route(
        "/extract",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({}))
        }),
    );
    let base = spawn_service(router).await;

    let outcome = HttpEntityExtractor::new(Some(base))
        .with_timeout(Duration::from_millis(50))
        .classify("fever")
        .await;
    assert!(outcome.is_degraded());
    assert!(outcome.reason().unwrap().contains("timed out"));
}

use std::time::Duration;

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use raahi_api::{build_app, ApiConfig};
use raahi_core::APOLOGY_TEXT;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Serves `router` on an ephemeral port and returns its `/chat` URL.
async fn spawn_backend(router: Router) -> Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://{addr}/chat"))
}

/// A URL nothing listens on.
async fn refused_backend() -> Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}/chat"))
}

fn config(backend_url: String) -> ApiConfig {
    ApiConfig {
        chat_backend_url: backend_url,
        chat_timeout: Duration::from_millis(300),
        payment_delay: Duration::ZERO,
        ..ApiConfig::default()
    }
}

async fn app_with_refused_backend() -> Router {
    let url = refused_backend().await.unwrap();
    build_app(config(url)).await.expect("app should build")
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, parsed)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_languages() {
    let app = app_with_refused_backend().await;

    let (status, body) = send(app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["languages"], json!(["bn", "en", "hi"]));
}

#[tokio::test]
async fn chat_falls_back_when_backend_is_down() {
    let app = app_with_refused_backend().await;

    let (status, body) = send(
        app,
        post_json(
            "/api/chat",
            json!({ "message": "त्योहार के बारे में बताएं", "language": "hi" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["processing_mode"], "fallback");
    assert_eq!(body["intent"], "festival");
    assert_eq!(body["language"], "hi");
    assert_eq!(body["session_id"], "default");
    assert!(body["response"].as_str().unwrap().contains("सरहुल"));
}

#[tokio::test]
async fn chat_passes_remote_reply_through() {
    let backend = Router::new().route(
        "/chat",
        post(|Json(payload): Json<Value>| async move {
            Json(json!({
                "success": true,
                "response": format!("echo: {}", payload["message"].as_str().unwrap_or_default()),
                "language": payload["language"],
                "processing_mode": "flask",
            }))
        }),
    );
    let url = spawn_backend(backend).await.unwrap();
    let app = build_app(config(url)).await.unwrap();

    let (status, body) = send(
        app,
        post_json(
            "/api/chat",
            json!({ "message": "namaste", "language": "hi-IN", "session_id": "abc" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["processing_mode"], "remote");
    assert_eq!(body["response"], "echo: namaste");
    assert_eq!(body["language"], "hi");
    assert_eq!(body["session_id"], "abc");
    assert_eq!(body["backend_mode"], "flask");
    assert!(body.get("intent").is_none());
}

#[tokio::test]
async fn slow_backend_times_out_into_fallback() {
    let backend = Router::new().route(
        "/chat",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "success": true, "response": "too late" }))
        }),
    );
    let url = spawn_backend(backend).await.unwrap();
    let app = build_app(config(url)).await.unwrap();

    let (status, body) = send(
        app,
        post_json("/api/chat", json!({ "message": "Is there a bus to Dhanbad?" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["processing_mode"], "fallback");
    assert_eq!(body["intent"], "transport");
    assert_ne!(body["response"], "too late");
}

#[tokio::test]
async fn backend_error_status_falls_back() {
    let backend = Router::new().route(
        "/chat",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance") }),
    );
    let url = spawn_backend(backend).await.unwrap();
    let app = build_app(config(url)).await.unwrap();

    let (_, body) = send(app, post_json("/api/chat", json!({ "message": "hello" }))).await;

    assert_eq!(body["processing_mode"], "fallback");
    assert_eq!(body["intent"], "greeting");
}

#[tokio::test]
async fn declined_backend_reply_falls_back() {
    let backend = Router::new().route(
        "/chat",
        post(|| async { Json(json!({ "success": false, "response": "" })) }),
    );
    let url = spawn_backend(backend).await.unwrap();
    let app = build_app(config(url)).await.unwrap();

    let (_, body) = send(
        app,
        post_json("/api/chat", json!({ "message": "plan my itinerary", "language": "bn" })),
    )
    .await;

    // Bengali has no plan entry.
    assert_eq!(body["processing_mode"], "fallback");
    assert_eq!(body["intent"], "plan");
    assert_eq!(body["language"], "en");
}

#[tokio::test]
async fn unreadable_backend_payload_is_an_error_envelope() {
    let backend = Router::new().route("/chat", post(|| async { "<html>oops</html>" }));
    let url = spawn_backend(backend).await.unwrap();
    let app = build_app(config(url)).await.unwrap();

    let (status, body) = send(app, post_json("/api/chat", json!({ "message": "hello" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["processing_mode"], "error");
    assert_eq!(body["response"], APOLOGY_TEXT);
}

#[tokio::test]
async fn malformed_chat_body_returns_error_envelope() {
    let app = app_with_refused_backend().await;

    let (status, body) = send(
        app,
        post_json("/api/chat", json!({ "language": "hi", "message": 42 })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to process chat message");
    assert_eq!(body["processing_mode"], "error");
    assert_eq!(body["response"], APOLOGY_TEXT);
    assert_eq!(body["language"], "hi");
}

#[tokio::test]
async fn classify_endpoint_reports_intent() {
    let app = app_with_refused_backend().await;

    let (status, body) = send(app, get("/api/chat/classify?text=Hello%2C%20I%20need%20a%20guide")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["intent"], "greeting");
}

#[tokio::test]
async fn catalog_endpoints_apply_filters() {
    let app = app_with_refused_backend().await;

    let (_, guides) = send(app.clone(), get("/api/guides?location=all&specialty=trek")).await;
    assert_eq!(guides["total"], 1);
    assert_eq!(guides["data"][0]["name"], "Amit Singh");

    let (_, activities) = send(
        app.clone(),
        get("/api/activities?category=All%20categories&location=All%20locations"),
    )
    .await;
    assert!(activities["total"].as_u64().unwrap() > 0);

    let (_, transport) = send(
        app.clone(),
        post_json(
            "/api/transportation/search",
            json!({ "from": "delhi", "to": "RANCHI" }),
        ),
    )
    .await;
    assert_eq!(transport["total"], 3);

    let (_, bookings) = send(app, get("/api/bookings?status=pending")).await;
    assert_eq!(bookings["total"], 1);
    assert_eq!(bookings["data"][0]["reference"], "PRH-345678");
}

#[tokio::test]
async fn conditions_echo_requested_place() {
    let app = app_with_refused_backend().await;

    let (_, weather) = send(app.clone(), get("/api/weather?city=Gumla")).await;
    assert_eq!(weather["data"]["city"], "Gumla");
    assert_eq!(weather["data"]["current"]["windSpeed"], 12);

    let (_, live) = send(app.clone(), get("/api/transport/live?type=ferry")).await;
    assert_eq!(live["type"], "buses");

    let (_, route) = send(app, get("/api/maps?from=Ranchi&to=Hundru%20Falls")).await;
    assert_eq!(route["data"]["mode"], "driving");
}

#[tokio::test]
async fn payment_requires_positive_amount() {
    let app = app_with_refused_backend().await;

    let (status, receipt) = send(
        app.clone(),
        post_json(
            "/api/payment/process",
            json!({ "amount": 3500, "paymentMethod": "upi" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let data = &receipt["data"];
    assert!(data["transactionId"].as_str().unwrap().starts_with("TXN"));
    assert!(data["bookingReference"].as_str().unwrap().starts_with("PRH-"));
    assert_eq!(data["paymentMethod"], "upi");
    assert_eq!(data["status"], "completed");

    let (status, body) = send(app, post_json("/api/payment/process", json!({ "amount": 0 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn mistyped_payment_body_is_a_json_bad_request() {
    let app = app_with_refused_backend().await;

    let (status, body) = send(
        app.clone(),
        post_json("/api/payment/process", json!({ "amount": "3500" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "invalid_request");

    let untyped = Request::builder()
        .method("POST")
        .uri("/api/payment/process")
        .body(Body::from(r#"{"amount": 3500}"#))
        .unwrap();
    let (status, body) = send(app.clone(), untyped).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "completed");

    let garbage = Request::builder()
        .method("POST")
        .uri("/api/transportation/search")
        .body(Body::from("from=Delhi"))
        .unwrap();
    let (status, body) = send(app, garbage).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");
}

#[tokio::test]
async fn bookings_can_be_created() {
    let app = app_with_refused_backend().await;
    let draft = json!({
        "user": { "name": "Asha", "email": "asha@example.com", "phone": "9000000000" },
        "booking_type": "guide",
        "booking_data": { "guide_id": 1, "date": "2024-02-01" },
        "total_amount": 2500,
    });

    let (status, first) = send(app.clone(), post_json("/api/bookings", draft.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["data"]["status"], "pending");
    assert_eq!(first["data"]["message"], "Booking created successfully");
    assert!(first["data"]["reference"].as_str().unwrap().starts_with("PRH-"));

    let (_, second) = send(app.clone(), post_json("/api/bookings", draft)).await;
    assert_eq!(
        second["data"]["booking_id"].as_u64().unwrap(),
        first["data"]["booking_id"].as_u64().unwrap() + 1
    );

    let (status, body) = send(
        app,
        post_json("/api/bookings", json!({ "booking_type": "hotel", "total_amount": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_booking");
}

#[tokio::test]
async fn events_are_listed_per_location() {
    let app = app_with_refused_backend().await;

    let (status, ranchi) = send(app.clone(), get("/api/events/Ranchi")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ranchi["total"], 1);
    assert_eq!(ranchi["days"], 30);
    assert_eq!(ranchi["data"][0]["title"], "Sarhul Festival Celebration");

    let (_, hazaribagh) = send(app, get("/api/events/hazaribagh?days=7")).await;
    assert_eq!(hazaribagh["days"], 7);
    assert_eq!(hazaribagh["data"][0]["ticket_price"], 1500);
}

#[tokio::test]
async fn dashboard_summaries_are_computed() {
    let app = app_with_refused_backend().await;

    let (_, maintenance) = send(app.clone(), get("/api/dashboard/maintenance")).await;
    assert_eq!(maintenance["data"]["summary"]["high_priority"], 2);
    assert_eq!(
        maintenance["data"]["summary"]["total_estimated_cost_inr"],
        2_620_000.0
    );

    let (_, restoration) = send(app.clone(), get("/api/dashboard/restoration")).await;
    assert_eq!(restoration["data"]["summary"]["completed"], 1);
    assert_eq!(restoration["data"]["summary"]["in_progress"], 1);

    let (_, hotspots) = send(app, get("/api/dashboard/hotspots")).await;
    assert_eq!(hotspots["data"][0]["name"], "Ranchi Hill");
}

#[tokio::test]
async fn rate_limit_spares_health() {
    let url = refused_backend().await.unwrap();
    let app = build_app(ApiConfig {
        rate_limit_max: 2,
        ..config(url)
    })
    .await
    .unwrap();

    for _ in 0..2 {
        let (status, _) = send(app.clone(), get("/api/weather")).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(app.clone(), get("/api/weather")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "rate_limited");

    let (status, _) = send(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_security_headers_and_request_id() {
    let app = app_with_refused_backend().await;

    let response = app.oneshot(get("/api/dashboard/overview")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
    assert!(response.headers().contains_key("x-request-id"));

    let app = app_with_refused_backend().await;
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-42")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-42");
}

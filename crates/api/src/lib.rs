pub mod config;
mod handlers;
mod rate_limit;

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::{Body, Bytes};
use axum::extract::{Json, Query, State};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use raahi_agents::{ChatDispatcher, HttpConversationBackend};
use raahi_core::catalog;
use raahi_core::{
    normalize_language_code, session_or_default, ChatInput, IntentClassifier,
    LanguagePackRegistry, ResponseEnvelope,
};
use raahi_observability::{AppMetrics, MetricsSnapshot};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use crate::config::ApiConfig;
use crate::rate_limit::IpRateLimiter;

const MAX_BODY_BYTES: usize = 64 * 1024;
const CHAT_FAILURE: &str = "Failed to process chat message";

#[derive(Clone)]
pub struct ApiState {
    pub dispatcher: ChatDispatcher<HttpConversationBackend>,
    pub metrics: Arc<AppMetrics>,
    pub limiter: IpRateLimiter,
    pub allowed_origins: Arc<Vec<String>>,
    pub payment_delay: Duration,
    pub next_booking_id: Arc<AtomicU64>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: MetricsSnapshot,
    languages: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ClassifyQuery {
    #[serde(default)]
    text: String,
}

pub async fn build_app(config: ApiConfig) -> Result<Router> {
    let metrics = AppMetrics::shared();

    let registry = match &config.language_packs {
        Some(path) => LanguagePackRegistry::with_overrides(path)
            .with_context(|| format!("failed to load language packs from {}", path.display()))?,
        None => LanguagePackRegistry::builtin(),
    };
    info!(languages = ?registry.languages(), "language packs loaded");

    let backend = HttpConversationBackend::new(config.chat_backend_url.clone())?;
    let dispatcher = ChatDispatcher::new(
        Arc::new(backend),
        Arc::new(registry),
        Arc::new(IntentClassifier::default()),
        metrics.clone(),
    )
    .with_timeout(config.chat_timeout);

    let state = ApiState {
        dispatcher,
        metrics,
        limiter: IpRateLimiter::new(config.rate_limit_window, config.rate_limit_max),
        allowed_origins: Arc::new(config.allowed_origins),
        payment_delay: config.payment_delay,
        next_booking_id: Arc::new(AtomicU64::new(catalog::bookings().len() as u64 + 1)),
    };

    Ok(build_router(state))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .route("/api/chat/classify", get(classify))
        .route("/api/weather", get(handlers::weather))
        .route("/api/safety", get(handlers::safety))
        .route("/api/transport/live", get(handlers::transport_live))
        .route("/api/maps", get(handlers::maps))
        .route("/api/guides", get(handlers::guides))
        .route("/api/activities", get(handlers::activities))
        .route("/api/hotels", get(handlers::hotels))
        .route(
            "/api/transportation/search",
            post(handlers::transportation_search),
        )
        .route(
            "/api/bookings",
            get(handlers::bookings).post(handlers::create_booking),
        )
        .route("/api/events/:location", get(handlers::events))
        .route("/api/payment/process", post(handlers::payment_process))
        .route("/api/payment/status", get(handlers::payment_status))
        .route("/api/dashboard/overview", get(handlers::dashboard_overview))
        .route("/api/dashboard/hotspots", get(handlers::dashboard_hotspots))
        .route("/api/dashboard/feedback", get(handlers::dashboard_feedback))
        .route(
            "/api/dashboard/maintenance",
            get(handlers::dashboard_maintenance),
        )
        .route(
            "/api/dashboard/restoration",
            get(handlers::dashboard_restoration),
        )
        .layer(build_cors_layer(&state.allowed_origins))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
        languages: state.dispatcher.registry().languages(),
    })
}

/// Takes the raw body so a malformed request still gets an envelope back
/// instead of the extractor's plain-text rejection.
async fn chat(State(state): State<ApiState>, body: Bytes) -> Response {
    match serde_json::from_slice::<ChatInput>(&body) {
        Ok(input) => {
            let envelope = state
                .dispatcher
                .handle(
                    &input.message,
                    input.language.as_deref(),
                    input.session_id.as_deref(),
                )
                .await;
            (StatusCode::OK, Json(envelope)).into_response()
        }
        Err(err) => {
            warn!(error = %err, "rejected malformed chat request");
            state.metrics.inc_error();
            chat_failure_response(&body)
        }
    }
}

fn chat_failure_response(body: &[u8]) -> Response {
    let raw = serde_json::from_slice::<Value>(body).unwrap_or(Value::Null);
    let field = |name: &str| raw.get(name).and_then(Value::as_str);

    let envelope = ResponseEnvelope::error(
        normalize_language_code(field("language")),
        session_or_default(field("session_id")),
    );
    let mut payload = serde_json::to_value(&envelope).unwrap_or(Value::Null);
    match payload.as_object_mut() {
        Some(object) => {
            object.insert("error".to_string(), Value::from(CHAT_FAILURE));
        }
        None => payload = serde_json::json!({ "error": CHAT_FAILURE }),
    }

    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}

async fn classify(
    State(state): State<ApiState>,
    Query(query): Query<ClassifyQuery>,
) -> impl IntoResponse {
    let intent = state.dispatcher.classifier().classify(&query.text);
    Json(serde_json::json!({
        "text": query.text,
        "intent": intent,
    }))
}

fn build_cors_layer(allowed_origins: &Arc<Vec<String>>) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();
    let origins = if origins.is_empty() {
        vec![HeaderValue::from_static(config::DEFAULT_ALLOWED_ORIGIN)]
    } else {
        origins
    };

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

async fn rate_limit_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let ip = request_ip(&request);
    if !state.limiter.allow(&ip) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
                "error": "rate_limited",
                "message": "rate limit exceeded for this IP"
            })),
        )
            .into_response();
    }

    next.run(request).await
}

fn request_ip(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "local".to_string())
}

async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::HeaderName::from_static("x-frame-options"),
        HeaderValue::from_static("DENY"),
    );
    headers.insert(
        header::HeaderName::from_static("referrer-policy"),
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        header::HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static("camera=(), microphone=(), geolocation=(self)"),
    );

    response
}

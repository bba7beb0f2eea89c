//! Data endpoints for the booking site and the department dashboard. None of
//! them touch the chat path.

use std::sync::atomic::Ordering;

use axum::body::Bytes;
use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use raahi_core::catalog::{
    self, ActivityFilter, BookingDraft, BookingFilter, GuideFilter, HotelFilter, TransportSearch,
};
use raahi_core::conditions::{self, LiveTransportKind};
use raahi_core::{dashboard, payment, PaymentRequest};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::ApiState;

#[derive(Debug, Deserialize)]
pub(crate) struct CityQuery {
    city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocationQuery {
    location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LiveTransportQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RouteQuery {
    from: Option<String>,
    to: Option<String>,
    mode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EventsQuery {
    days: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentStatusQuery {
    transaction_id: Option<String>,
    booking_reference: Option<String>,
}

fn success<T: Serialize>(data: T) -> Json<serde_json::Value> {
    Json(json!({ "success": true, "data": data }))
}

fn listing<T: Serialize>(items: Vec<T>) -> Json<serde_json::Value> {
    let total = items.len();
    Json(json!({ "success": true, "data": items, "total": total }))
}

fn bad_request(error: &str, message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "success": false,
            "error": error,
            "message": message,
        })),
    )
        .into_response()
}

/// Bodies are read raw so a wrong content type or a mistyped field gets the
/// same JSON error shape as a validation failure.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, Response> {
    serde_json::from_slice(body).map_err(|err| {
        warn!(error = %err, "rejected malformed request body");
        bad_request("invalid_request", err.to_string())
    })
}

pub(crate) async fn weather(Query(query): Query<CityQuery>) -> impl IntoResponse {
    success(conditions::weather_for(query.city.as_deref()))
}

pub(crate) async fn safety(Query(query): Query<LocationQuery>) -> impl IntoResponse {
    success(conditions::safety_for(query.location.as_deref()))
}

pub(crate) async fn transport_live(Query(query): Query<LiveTransportQuery>) -> impl IntoResponse {
    let kind = LiveTransportKind::parse(query.kind.as_deref());
    Json(json!({
        "success": true,
        "type": kind,
        "data": conditions::live_transport(kind),
    }))
}

pub(crate) async fn maps(Query(query): Query<RouteQuery>) -> impl IntoResponse {
    success(conditions::route_between(
        query.from.as_deref(),
        query.to.as_deref(),
        query.mode.as_deref(),
    ))
}

pub(crate) async fn guides(Query(filter): Query<GuideFilter>) -> impl IntoResponse {
    listing(catalog::search_guides(&filter))
}

pub(crate) async fn activities(Query(filter): Query<ActivityFilter>) -> impl IntoResponse {
    listing(catalog::search_activities(&filter))
}

pub(crate) async fn hotels(Query(filter): Query<HotelFilter>) -> impl IntoResponse {
    listing(catalog::search_hotels(&filter))
}

pub(crate) async fn events(
    Path(location): Path<String>,
    Query(query): Query<EventsQuery>,
) -> impl IntoResponse {
    let listing = conditions::local_events(&location, query.days.as_deref());
    let total = listing.events.len();
    Json(json!({
        "success": true,
        "location": listing.location,
        "days": listing.days,
        "data": listing.events,
        "total": total,
    }))
}

pub(crate) async fn transportation_search(body: Bytes) -> Response {
    match parse_body::<TransportSearch>(&body) {
        Ok(search) => listing(catalog::search_transport(&search)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn bookings(Query(filter): Query<BookingFilter>) -> impl IntoResponse {
    listing(catalog::search_bookings(&filter))
}

pub(crate) async fn create_booking(State(state): State<ApiState>, body: Bytes) -> Response {
    let draft = match parse_body::<BookingDraft>(&body) {
        Ok(draft) => draft,
        Err(response) => return response,
    };

    let booking_id = state.next_booking_id.fetch_add(1, Ordering::Relaxed);
    match catalog::create_booking(&draft, booking_id, chrono::Utc::now()) {
        Ok(confirmation) => {
            info!(
                booking_id = confirmation.booking_id,
                reference = %confirmation.reference,
                booking_type = %confirmation.booking_type,
                "booking created"
            );
            success(confirmation).into_response()
        }
        Err(err) => {
            warn!(error = %err, "booking rejected");
            bad_request("invalid_booking", err.to_string())
        }
    }
}

pub(crate) async fn payment_process(State(state): State<ApiState>, body: Bytes) -> Response {
    let request = match parse_body::<PaymentRequest>(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let receipt = match payment::process_payment(&request, chrono::Utc::now()) {
        Ok(receipt) => receipt,
        Err(err) => {
            warn!(error = %err, "payment rejected");
            return bad_request("invalid_amount", err.to_string());
        }
    };

    // Gateway latency stand-in.
    if !state.payment_delay.is_zero() {
        tokio::time::sleep(state.payment_delay).await;
    }

    info!(
        transaction_id = %receipt.transaction_id,
        booking_reference = %receipt.booking_reference,
        amount = receipt.amount,
        "payment completed"
    );
    success(receipt).into_response()
}

pub(crate) async fn payment_status(Query(query): Query<PaymentStatusQuery>) -> impl IntoResponse {
    success(payment::payment_status(
        query.transaction_id.as_deref(),
        query.booking_reference.as_deref(),
        chrono::Utc::now(),
    ))
}

pub(crate) async fn dashboard_overview() -> impl IntoResponse {
    success(dashboard::overview())
}

pub(crate) async fn dashboard_hotspots() -> impl IntoResponse {
    success(dashboard::hot_spots())
}

pub(crate) async fn dashboard_feedback() -> impl IntoResponse {
    success(dashboard::feedback())
}

pub(crate) async fn dashboard_maintenance() -> impl IntoResponse {
    success(dashboard::maintenance_report())
}

pub(crate) async fn dashboard_restoration() -> impl IntoResponse {
    success(dashboard::restoration_report())
}

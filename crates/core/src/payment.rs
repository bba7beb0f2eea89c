use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq)]
pub enum PaymentError {
    #[error("amount is required")]
    MissingAmount,
    #[error("amount must be positive, got {0}")]
    InvalidAmount(f64),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub customer_details: Option<Value>,
    #[serde(default)]
    pub booking_details: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub success: bool,
    pub transaction_id: String,
    pub payment_id: String,
    pub amount: f64,
    pub payment_method: String,
    pub status: String,
    pub timestamp: String,
    pub booking_reference: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    pub transaction_id: Option<String>,
    pub booking_reference: Option<String>,
    pub status: String,
    pub amount: u32,
    pub payment_method: String,
    pub timestamp: String,
    pub customer_details: Value,
    pub booking_details: Value,
}

/// Simulated gateway: validates the amount and mints identifiers. Nothing is
/// charged or stored.
pub fn process_payment(
    request: &PaymentRequest,
    now: DateTime<Utc>,
) -> Result<PaymentReceipt, PaymentError> {
    let amount = request.amount.ok_or(PaymentError::MissingAmount)?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(PaymentError::InvalidAmount(amount));
    }

    let millis = now.timestamp_millis();
    Ok(PaymentReceipt {
        success: true,
        transaction_id: format!("TXN{millis}"),
        payment_id: payment_id(),
        amount,
        payment_method: request
            .payment_method
            .clone()
            .unwrap_or_else(|| "card".to_string()),
        status: "completed".to_string(),
        timestamp: now.to_rfc3339(),
        booking_reference: booking_reference(millis),
    })
}

pub fn payment_status(
    transaction_id: Option<&str>,
    booking_reference: Option<&str>,
    now: DateTime<Utc>,
) -> PaymentStatus {
    PaymentStatus {
        transaction_id: transaction_id.map(str::to_string),
        booking_reference: booking_reference.map(str::to_string),
        status: "completed".to_string(),
        amount: 3500,
        payment_method: "card".to_string(),
        timestamp: now.to_rfc3339(),
        customer_details: serde_json::json!({
            "name": "John Doe",
            "email": "john@example.com",
            "phone": "+91 9876543210"
        }),
        booking_details: serde_json::json!({
            "type": "activity",
            "title": "Hundru Falls Adventure Tour",
            "date": "2024-01-15",
            "location": "Hundru Falls, Ranchi",
            "guests": 2
        }),
    }
}

fn payment_id() -> String {
    let suffix = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(9)
        .collect::<String>()
        .to_uppercase();
    format!("PAY{suffix}")
}

pub(crate) fn booking_reference(millis: i64) -> String {
    let digits = millis.to_string();
    let start = digits.len().saturating_sub(6);
    format!("PRH-{}", &digits[start..])
}

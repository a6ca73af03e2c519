use botstore_common::helpers::parse_gateway_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::AtlanticApiError;

/// A QRIS deposit as opened by the gateway, normalised across the response shapes the gateway is known to use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositResponse {
    pub deposit_id: Option<String>,
    pub qr_url: Option<String>,
    pub qr_string: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl DepositResponse {
    /// Extracts the deposit from a `deposit/create` response body.
    ///
    /// The documented shape is `{"success": true, "data": {...}}`, but older deployments omit `success` and use
    /// different key names inside `data`. Anything without a `data` object is rejected.
    pub fn from_response_body(body: &Value) -> Result<Self, AtlanticApiError> {
        let data = match body.get("data") {
            Some(data) if data.is_object() => data,
            _ => {
                let message = body.get("message").and_then(Value::as_str).unwrap_or("no deposit data in response");
                return Err(AtlanticApiError::InvalidResponse(message.to_string()));
            },
        };
        if body.get("success").and_then(Value::as_bool) == Some(false) {
            let message = body.get("message").and_then(Value::as_str).unwrap_or("gateway reported failure");
            return Err(AtlanticApiError::InvalidResponse(message.to_string()));
        }
        let deposit = Self {
            deposit_id: first_string(data, &["id", "reference"]),
            qr_url: first_string(data, &["qr_url", "qr_image", "qr_code"]),
            qr_string: first_string(data, &["qr_string", "qr_content"]),
            expires_at: first_string(data, &["expired_at", "expiry_time"]).and_then(|s| parse_gateway_timestamp(&s)),
        };
        if deposit.qr_url.is_none() && deposit.qr_string.is_none() {
            return Err(AtlanticApiError::InvalidResponse("deposit data carries no QR code".to_string()));
        }
        Ok(deposit)
    }
}

/// Returns the first of `keys` that holds a non-empty string or a number.
fn first_string(data: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match data.get(*k) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

//! Folds every backend error shape into one [`NormalizedError`].
//!
//! The backend answers failures in three ways: a structured envelope nested
//! under `detail`, a framework-generated validation array under `detail`
//! (status 422), or a loose object with top-level fields. The shapes are tried
//! in that order and the first match wins; a body that is not JSON at all gets
//! a generic `REQUEST_FAILED` error.
//!
//! Field presence follows the backend client's truthiness rules: `null`,
//! `false`, `0` and `""` count as absent.

use serde_json::{Map, Value};

use crate::error::NormalizedError;
use crate::http::{HttpResponse, CORRELATION_ID_HEADER};

pub const DEFAULT_MESSAGE: &str = "An error occurred";
pub const DEFAULT_VALIDATION_MESSAGE: &str = "Validation error";
pub const UNKNOWN_CORRELATION_ID: &str = "unknown";

pub const REQUEST_FAILED: &str = "REQUEST_FAILED";
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";

const UNPROCESSABLE_ENTITY: u16 = 422;

/// Build the normalized error for a non-2xx response.
///
/// Pure function of the response: normalizing the same response twice yields
/// equal values.
pub fn normalize(response: &HttpResponse) -> NormalizedError {
    let status = response.status;
    let header_id = response
        .header(CORRELATION_ID_HEADER)
        .filter(|id| !id.is_empty())
        .unwrap_or(UNKNOWN_CORRELATION_ID);

    let request_failed = || NormalizedError {
        message: format!("Request failed with status {status}"),
        error_code: REQUEST_FAILED.to_string(),
        correlation_id: header_id.to_string(),
        status_code: status,
        details: None,
    };

    let body = match serde_json::from_str::<Value>(&response.body) {
        Ok(Value::Null) | Err(_) => return request_failed(),
        Ok(body) => body,
    };

    let detail = body.get("detail");

    if let Some(Value::Object(envelope)) = detail {
        return NormalizedError {
            message: text(envelope.get("message")).unwrap_or_else(|| DEFAULT_MESSAGE.to_string()),
            error_code: text(envelope.get("error_code")).unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            correlation_id: text(envelope.get("correlation_id"))
                .unwrap_or_else(|| header_id.to_string()),
            status_code: status,
            details: object(envelope.get("details")),
        };
    }

    if status == UNPROCESSABLE_ENTITY {
        if let Some(detail) = detail.filter(|d| truthy(d)) {
            let message = match detail {
                // A null entry has no `msg` to read; the body is unusable.
                Value::Array(items) if items.iter().any(Value::is_null) => return request_failed(),
                Value::Array(items) => items
                    .iter()
                    .map(|item| join_text(item.get("msg")))
                    .collect::<Vec<_>>()
                    .join(", "),
                _ => DEFAULT_VALIDATION_MESSAGE.to_string(),
            };
            return NormalizedError {
                message,
                error_code: VALIDATION_ERROR.to_string(),
                correlation_id: header_id.to_string(),
                status_code: status,
                details: None,
            };
        }
    }

    NormalizedError {
        message: text(body.get("message"))
            .or_else(|| text(detail))
            .unwrap_or_else(|| DEFAULT_MESSAGE.to_string()),
        error_code: text(body.get("error_code")).unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        correlation_id: header_id.to_string(),
        status_code: status,
        details: object(body.get("details")),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A present field as display text; strings are taken verbatim.
fn text(value: Option<&Value>) -> Option<String> {
    match value.filter(|v| truthy(v))? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Like `text`, but an absent value still occupies its slot in a join.
fn join_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn object(value: Option<&Value>) -> Option<Map<String, Value>> {
    match value {
        Some(Value::Object(map)) => Some(map.clone()),
        _ => None,
    }
}

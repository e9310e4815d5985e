//! In-process stand-in for the ChemVision backend.
//!
//! Speaks both route families and answers with the same error shapes as the
//! real service: structured envelopes under `detail`, validation arrays on
//! 422, and a bare `{"detail": "Not Found"}` for unknown routes. The only
//! conversion it can actually perform is the demo name `isopentane`.

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        DefaultBodyLimit, Multipart, Request,
    },
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::Instrument;
use uuid::Uuid;

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const NAME_MAX_CHARS: usize = 500;
pub const SMILES_MAX_CHARS: usize = 1000;

const ACCEPTED_IMAGE_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/jpg"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorrelationId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Demo,
    Ml,
    Tool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StructureResponse {
    pub smiles: String,
    pub source: Source,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NameResponse {
    pub name: String,
    pub source: Source,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
    pub details: Option<Value>,
    pub correlation_id: String,
}

/// One entry of a 422 `detail` array.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ValidationIssue {
    fn body(field: &str, msg: impl Into<String>, kind: &str) -> Self {
        Self {
            loc: vec!["body".to_string(), field.to_string()],
            msg: msg.into(),
            kind: kind.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ApiFailure {
    Envelope { status: StatusCode, error: ErrorResponse },
    Validation(Vec<ValidationIssue>),
}

impl ApiFailure {
    fn envelope(status: StatusCode, code: &str, message: impl Into<String>, cid: &CorrelationId) -> Self {
        ApiFailure::Envelope {
            status,
            error: ErrorResponse {
                error_code: code.to_string(),
                message: message.into(),
                details: None,
                correlation_id: cid.0.clone(),
            },
        }
    }

    fn not_implemented(operation: &str, cid: &CorrelationId) -> Self {
        tracing::warn!(operation, "not_implemented");
        Self::envelope(
            StatusCode::NOT_IMPLEMENTED,
            "NOT_IMPLEMENTED",
            format!("{operation} is not yet implemented. This will be available in Phase 2."),
            cid,
        )
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        match self {
            ApiFailure::Envelope { status, error } => (status, Json(json!({ "detail": error }))).into_response(),
            ApiFailure::Validation(issues) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": issues }))).into_response()
            }
        }
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/name-to-structure", post(name_to_structure))
        .route("/api/name2structure", post(name_to_structure))
        .route("/api/structure-to-name", post(structure_to_name))
        .route("/api/structure2name", post(structure_to_name))
        .route("/api/image-to-structure", post(image_to_structure))
        .route("/api/ocsr", post(image_to_structure))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024))
        .layer(middleware::from_fn(correlation_id))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Echo the caller's correlation id, or mint one, on every response.
async fn correlation_id(mut request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    request.extensions_mut().insert(CorrelationId(id.clone()));

    let span = tracing::info_span!(
        "request",
        correlation_id = %id,
        method = %request.method(),
        path = %request.uri().path(),
    );
    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" })))
}

/// The only conversion this backend knows.
pub fn demo_smiles(name: &str) -> Option<&'static str> {
    match name.trim().to_lowercase().as_str() {
        "isopentane" => Some("CC(C)CC"),
        _ => None,
    }
}

async fn name_to_structure(
    Extension(cid): Extension<CorrelationId>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<StructureResponse>, ApiFailure> {
    let name = required_string(payload, "name", NAME_MAX_CHARS)?;
    tracing::info!(name = %name, "name_to_structure_request");

    let Some(smiles) = demo_smiles(&name) else {
        return Err(ApiFailure::not_implemented("Name to structure conversion", &cid));
    };
    tracing::info!(name = %name, smiles, "name_to_structure_success");
    Ok(Json(StructureResponse {
        smiles: smiles.to_string(),
        source: Source::Demo,
    }))
}

async fn structure_to_name(
    Extension(cid): Extension<CorrelationId>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<NameResponse>, ApiFailure> {
    let smiles = required_string(payload, "smiles", SMILES_MAX_CHARS)?;
    tracing::info!(smiles = %smiles, "structure_to_name_request");
    Err(ApiFailure::not_implemented("Structure to name conversion", &cid))
}

async fn image_to_structure(
    Extension(cid): Extension<CorrelationId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<StructureResponse>, ApiFailure> {
    let missing = || ApiFailure::Validation(vec![ValidationIssue::body("image", "Field required", "missing")]);
    let mut multipart = multipart.map_err(|_| missing())?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| upload_failure(e, &cid))? {
        if field.name() != Some("image") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| upload_failure(e, &cid))?;
        upload = Some((file_name, content_type, bytes.len()));
    }
    let (file_name, content_type, size) = upload.ok_or_else(missing)?;
    tracing::info!(?file_name, ?content_type, size, "image_to_structure_request");

    if !content_type.as_deref().is_some_and(|ct| ACCEPTED_IMAGE_TYPES.contains(&ct)) {
        return Err(ApiFailure::envelope(
            StatusCode::BAD_REQUEST,
            "INVALID_IMAGE_TYPE",
            "Only PNG and JPEG images are supported",
            &cid,
        ));
    }
    Err(ApiFailure::not_implemented("Image to structure conversion (OCSR)", &cid))
}

fn upload_failure(err: axum::extract::multipart::MultipartError, cid: &CorrelationId) -> ApiFailure {
    tracing::warn!(error = %err, "upload_failed");
    ApiFailure::envelope(err.status(), "INVALID_UPLOAD", err.body_text(), cid)
}

/// Pull a bounded, non-empty string field out of a JSON body.
fn required_string(
    payload: Result<Json<Value>, JsonRejection>,
    field: &str,
    max_chars: usize,
) -> Result<String, ApiFailure> {
    let Json(body) = payload.map_err(|_| {
        ApiFailure::Validation(vec![ValidationIssue {
            loc: vec!["body".to_string()],
            msg: "JSON decode error".to_string(),
            kind: "json_invalid".to_string(),
        }])
    })?;

    let issue = match body.get(field) {
        None | Some(Value::Null) => ValidationIssue::body(field, "Field required", "missing"),
        Some(Value::String(value)) => {
            let len = value.chars().count();
            if len == 0 {
                ValidationIssue::body(field, "String should have at least 1 character", "string_too_short")
            } else if len > max_chars {
                ValidationIssue::body(
                    field,
                    format!("String should have at most {max_chars} characters"),
                    "string_too_long",
                )
            } else {
                return Ok(value.clone());
            }
        }
        Some(_) => ValidationIssue::body(field, "Input should be a valid string", "string_type"),
    };
    Err(ApiFailure::Validation(vec![issue]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_response_serializes_lowercase_source() {
        let response = StructureResponse {
            smiles: "CC(C)CC".to_string(),
            source: Source::Demo,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, json!({"smiles": "CC(C)CC", "source": "demo"}));
    }

    #[test]
    fn demo_mapping_is_trimmed_and_case_insensitive() {
        assert_eq!(demo_smiles("  IsoPentane "), Some("CC(C)CC"));
        assert_eq!(demo_smiles("hexane"), None);
    }

    #[test]
    fn validation_issue_uses_type_key() {
        let issue = ValidationIssue::body("name", "Field required", "missing");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["type"], "missing");
        assert_eq!(json["loc"], json!(["body", "name"]));
    }

    #[test]
    fn required_string_checks_bounds() {
        let ok = required_string(Ok(Json(json!({"name": "isopentane"}))), "name", 500);
        assert_eq!(ok.unwrap(), "isopentane");

        let too_long = required_string(Ok(Json(json!({"smiles": "C".repeat(1001)}))), "smiles", 1000);
        let Err(ApiFailure::Validation(issues)) = too_long else {
            panic!("expected validation failure");
        };
        assert_eq!(issues[0].msg, "String should have at most 1000 characters");

        let wrong_type = required_string(Ok(Json(json!({"name": 5}))), "name", 500);
        assert!(matches!(wrong_type, Err(ApiFailure::Validation(_))));
    }
}

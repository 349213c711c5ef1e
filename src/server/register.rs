use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use serde_json::{json, Value};
use tracing::info;

use crate::claims::validate_claims;
use crate::error::ValidationError;
use crate::observability::metrics::get_metrics;
use crate::server::server::AppState;
use crate::synth::identity_record;
use crate::utils::constants::REGISTER_TYPE_VERIFIED_IDENTITY;

static OK_MSG: &str = "ok";
static REJECTED_MSG: &str = "rejected";

/// Fields the `serviceAccessDataDetails` object must carry.
pub const REQUIRED_DETAIL_FIELDS: [&str; 9] = [
    "clientName",
    "globalTransactionId",
    "recordRestricted",
    "registerAccessed",
    "requestId",
    "requestReason",
    "requestTimestamp",
    "requesterType",
    "subjectRegisterId",
];

/// POST /register/{register_type}/{ars_id}
///
/// Validation is strictly staged (auth, headers, path, body); the first
/// failing stage determines the response and later stages never run. On
/// success the response is a synthetic identity record whose `registerKey`
/// echoes `ars_id`.
pub async fn handle(
    State(state): State<AppState>,
    Path((register_type, ars_id)): Path<(String, String)>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let metrics = get_metrics().await;

    match validate_request(&state, &headers, &register_type, &body) {
        Ok(()) => {
            metrics.verify_requests.with_label_values(&[OK_MSG]).inc();
            (StatusCode::OK, Json(identity_record(&ars_id))).into_response()
        }
        Err(rejection) => {
            metrics
                .verify_requests
                .with_label_values(&[REJECTED_MSG])
                .inc();
            metrics
                .verify_rejections
                .with_label_values(&[stage(&rejection)])
                .inc();
            info!("request rejected at {} stage: {}", stage(&rejection), rejection);
            reject(rejection)
        }
    }
}

fn validate_request(
    state: &AppState,
    headers: &HeaderMap,
    register_type: &str,
    body: &str,
) -> Result<(), ValidationError> {
    check_authorization(state, headers)?;
    check_required_headers(headers)?;
    check_register_type(register_type)?;
    check_body(body)?;
    Ok(())
}

/// Stage 1: bearer token present and accepted.
fn check_authorization(state: &AppState, headers: &HeaderMap) -> Result<(), ValidationError> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ValidationError::Unauthorized("missing bearer token".into()))?;

    if state.mock.claims {
        validate_claims(bearer, &state.mock.expected_audience)
            .map_err(|e| ValidationError::Unauthorized(e.to_string()))?;
    } else if bearer != state.mock.static_token {
        return Err(ValidationError::Unauthorized("unknown token".into()));
    }
    Ok(())
}

/// Stage 2: CorrelationId and ClientName headers present and non-empty.
fn check_required_headers(headers: &HeaderMap) -> Result<(), ValidationError> {
    for name in ["CorrelationId", "ClientName"] {
        let present = headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| !v.is_empty());
        if !present {
            return Err(ValidationError::MissingHeaders);
        }
    }
    Ok(())
}

/// Stage 3: only the verified-identity register exists.
fn check_register_type(register_type: &str) -> Result<(), ValidationError> {
    if register_type != REGISTER_TYPE_VERIFIED_IDENTITY {
        return Err(ValidationError::InvalidRegisterType(
            register_type.to_owned(),
        ));
    }
    Ok(())
}

/// Stage 4: serviceAccessDataDetails with all nine required fields.
fn check_body(body: &str) -> Result<(), ValidationError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| ValidationError::BadBody(format!("body is not valid JSON: {}", e)))?;

    let details = json
        .get("serviceAccessDataDetails")
        .and_then(Value::as_object)
        .ok_or_else(|| ValidationError::BadBody("missing serviceAccessDataDetails".into()))?;

    let missing: Vec<&str> = REQUIRED_DETAIL_FIELDS
        .iter()
        .copied()
        .filter(|field| !details.contains_key(*field))
        .collect();

    if !missing.is_empty() {
        return Err(ValidationError::BadBody(format!(
            "missing fields: [{}]",
            missing.join(", ")
        )));
    }
    Ok(())
}

fn stage(rejection: &ValidationError) -> &'static str {
    match rejection {
        ValidationError::Unauthorized(_) => "auth",
        ValidationError::MissingHeaders => "headers",
        ValidationError::InvalidRegisterType(_) => "path",
        ValidationError::BadBody(_) => "body",
    }
}

fn reject(rejection: ValidationError) -> Response {
    let status = match rejection {
        ValidationError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        _ => StatusCode::BAD_REQUEST,
    };
    (status, Json(json!({ "error": rejection.to_string() }))).into_response()
}

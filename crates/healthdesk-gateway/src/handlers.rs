//! Route handlers. Submission routes share one shape; the chatbot route always answers 200.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use healthdesk_core::{FormKind, RawFields};
use serde_json::{json, Value};

use crate::{ApiError, AppState};

/// Read a JSON-typed body. `Ok(None)` when the content type is not JSON or the body is blank.
fn read_json(headers: &HeaderMap, body: &Bytes) -> Result<Option<Value>, serde_json::Error> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("json"));
    if !is_json || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body).map(Some)
}

/// Decode a submission body into raw fields.
///
/// Non-JSON content types, empty bodies, and JSON arrays give an empty map (which fails
/// validation). A JSON-typed body that does not parse, or whose top level is a scalar, is an
/// unhandled error.
fn submission_fields(headers: &HeaderMap, body: &Bytes) -> Result<RawFields, ApiError> {
    match read_json(headers, body) {
        Ok(Some(Value::Object(fields))) => Ok(fields),
        Ok(Some(Value::Array(_))) | Ok(None) => Ok(RawFields::new()),
        Ok(Some(other)) => {
            tracing::error!(
                "[GATEWAY] Unhandled error: request body must be a JSON object or array, got {}",
                other
            );
            Err(ApiError::Internal)
        }
        Err(e) => {
            tracing::error!("[GATEWAY] Unhandled error: request body is not valid JSON: {}", e);
            Err(ApiError::Internal)
        }
    }
}

async fn submit(
    state: &AppState,
    kind: FormKind,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<Json<Value>, ApiError> {
    let fields = submission_fields(headers, body)?;
    let accepted = state
        .submissions
        .submit(kind, &fields)
        .await
        .map_err(|e| ApiError::from_submission(kind, e))?;
    Ok(Json(json!({ "message": accepted.message })))
}

pub async fn submit_patient_support(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    submit(&state, FormKind::PatientSupport, &headers, &body).await
}

pub async fn submit_volunteer(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    submit(&state, FormKind::Volunteer, &headers, &body).await
}

pub async fn submit_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    submit(&state, FormKind::Contact, &headers, &body).await
}

/// POST /api/chatbot `{message, sessionId}` -> `{response}`. Never fails.
pub async fn chatbot(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    let fields = match read_json(&headers, &body) {
        Ok(Some(Value::Object(fields))) => fields,
        Ok(_) => RawFields::new(),
        Err(e) => {
            tracing::debug!("[GATEWAY] Chatbot body is not valid JSON, treating as empty: {}", e);
            RawFields::new()
        }
    };
    let message = fields.get("message").and_then(Value::as_str).unwrap_or("");
    let session_id = fields.get("sessionId").and_then(Value::as_str).unwrap_or("");

    let reply = state.chatbot.respond(message, session_id).await;
    Json(json!({ "response": reply.text }))
}

/// GET /health: liveness, chatbot mode, and per-collection record counts.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let store = state.submissions.store();
    let mut records = serde_json::Map::new();
    for kind in FormKind::ALL {
        let count = match store.count(kind.collection()).await {
            Ok(n) => json!(n),
            Err(e) => {
                tracing::warn!("[GATEWAY] Count failed for {}: {}", kind.collection(), e);
                Value::Null
            }
        };
        records.insert(kind.collection().to_string(), count);
    }

    Json(json!({
        "status": "ok",
        "version": healthdesk_core::version(),
        "chatbot_mode": if state.chatbot.has_oracle() { "oracle" } else { "fallback" },
        "records": records,
    }))
}

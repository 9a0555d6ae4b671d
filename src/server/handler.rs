use crate::pipeline::{ChatOutcome, ChatService, ResponseEnvelope};
use crate::{Error, Result};
use axum::body::{Body, Bytes};
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tracing::{error, warn};

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

const ALLOWED_METHODS: &str = "POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";

/// Served when the envelope itself cannot be serialized
const FALLBACK_BODY: &str = r#"{"answer":"Algo deu errado ao processar sua pergunta. Tente novamente.","refs":[],"detail":"failed to serialize response"}"#;

/// CORS and content headers, built once from configuration and shared read-only
#[derive(Debug, Clone)]
pub struct ResponseHeaders {
    allow_origin: HeaderValue,
}

impl ResponseHeaders {
    pub fn new(allow_origin: &str) -> Result<Self> {
        let allow_origin = HeaderValue::from_str(allow_origin)
            .map_err(|e| Error::invalid_input("server.allow_origin", e.to_string()))?;
        Ok(Self { allow_origin })
    }

    fn cors(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        headers
    }

    /// Always `200 OK`; failures live in the body
    pub fn json(&self, envelope: &ResponseEnvelope) -> Response {
        let body = serde_json::to_vec(envelope).unwrap_or_else(|e| {
            error!("Failed to serialize response envelope: {}", e);
            FALLBACK_BODY.as_bytes().to_vec()
        });

        let mut headers = self.cors();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        (StatusCode::OK, headers, Body::from(body)).into_response()
    }

    pub fn preflight(&self) -> Response {
        (StatusCode::OK, self.cors()).into_response()
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub chat: ChatService,
    pub headers: ResponseHeaders,
}

/// Extract the question text the way browser clients send it.
/// Missing, `null`, `false`, `0` and `""` all mean "no question";
/// anything else is stringified like a browser would.
#[must_use]
pub fn question_text(body: &Value) -> String {
    match body.get("question") {
        None | Some(Value::Null | Value::Bool(false)) => String::new(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
        Some(other) => script_string(other),
    }
}

fn script_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => script_number(n),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => script_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn script_number(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

pub async fn chat_handler(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let outcome = match body {
        Ok(body) => match serde_json::from_slice::<Value>(&body) {
            Ok(value) => state.chat.answer(&question_text(&value)).await,
            Err(e) => {
                warn!("Rejected unparseable chat body: {}", e);
                ChatOutcome::failed(e.to_string())
            }
        },
        Err(rejection) => {
            warn!("Rejected chat body: {}", rejection.body_text());
            ChatOutcome::failed(rejection.body_text())
        }
    };

    state.headers.json(&outcome.into_envelope())
}

pub async fn preflight_handler(State(state): State<AppState>) -> Response {
    state.headers.preflight()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_question_text_coercion() {
        assert_eq!(question_text(&json!({"question": "  oi "})), "  oi ");
        assert_eq!(question_text(&json!({})), "");
        assert_eq!(question_text(&json!({"question": null})), "");
        assert_eq!(question_text(&json!({"question": false})), "");
        assert_eq!(question_text(&json!({"question": 0})), "");
        assert_eq!(question_text(&json!({"question": 42})), "42");
        assert_eq!(question_text(&json!({"question": true})), "true");
        assert_eq!(question_text(&json!({"question": 1.0})), "1");
        assert_eq!(question_text(&json!({"question": 2.5})), "2.5");
        assert_eq!(question_text(&json!({"question": []})), "");
        assert_eq!(question_text(&json!({"question": ["a"]})), "a");
        assert_eq!(question_text(&json!({"question": ["a", 1, null, [2, 3]]})), "a,1,,2,3");
        assert_eq!(question_text(&json!({"question": {"text": "oi"}})), "[object Object]");
        assert_eq!(question_text(&json!(null)), "");
        assert_eq!(question_text(&json!("question")), "");
    }

    #[test]
    fn test_rejects_invalid_origin_header() {
        assert!(ResponseHeaders::new("bad\norigin").is_err());
        assert!(ResponseHeaders::new("https://example.org").is_ok());
    }

    #[test]
    fn test_json_response_headers() {
        let headers = ResponseHeaders::new("*").unwrap();
        let response = headers.json(&ResponseEnvelope::without_refs("oi"));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], JSON_CONTENT_TYPE);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }

    #[test]
    fn test_preflight_has_no_content_type() {
        let response = ResponseHeaders::new("*").unwrap().preflight();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(CONTENT_TYPE).is_none());
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}

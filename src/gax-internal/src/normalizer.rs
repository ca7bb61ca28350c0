// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Converts HTTP responses into a [Response] or an [Error].
//!
//! The Watson services report errors in several ways: the HTTP status code,
//! an `error` or `error_code` field in the body (sometimes with a successful
//! status code), a reason phrase, or a `status` field in the body for the
//! older AlchemyAPI services. Each encoding is recognized by one classifier
//! function. The classifiers run in order, and the first one to produce an
//! error wins.

use crate::request::ErrorFormat;
use bytes::Bytes;
use gax::error::Error;
use gax::error::service_error::{ServiceError, TRANSACTION_ID_HEADER};
use gax::response::{Parts, Payload, Response};
use http::{HeaderMap, StatusCode};
use serde_json::{Map, Value};

/// The reason phrase used by some services to reject API keys.
pub const INVALID_API_KEY: &str = "invalid-api-key";

pub const ALCHEMY_ERROR_HEADER: &str = "x-alchemyapi-error-msg";

const UNAUTHORIZED_MESSAGE: &str = "Unauthorized: Access is denied due to invalid credentials.";

/// A complete HTTP response, as received from the transport.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawResponse {
    pub status: StatusCode,
    /// The HTTP/1.1 reason phrase, if it differs from the canonical reason
    /// for `status`.
    pub reason: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// The inputs available to each classifier.
struct Context<'a> {
    status: StatusCode,
    reason: Option<&'a str>,
    headers: &'a HeaderMap,
    payload: &'a Payload,
}

type Classifier = fn(&Context) -> Option<ServiceError>;

const DEFAULT_CHAIN: &[Classifier] = &[api_key_sentinel, vendor_envelope, status_fallback];
const STATUS_ENVELOPE_CHAIN: &[Classifier] = &[
    api_key_sentinel,
    vendor_envelope,
    status_fallback,
    status_envelope,
];

/// Classifies `response`, returning the parsed payload or the service error.
pub fn normalize(response: RawResponse, format: ErrorFormat) -> gax::Result<Response<Payload>> {
    let RawResponse {
        status,
        reason,
        headers,
        body,
    } = response;
    let payload = Payload::from_bytes(body);
    let chain = match format {
        ErrorFormat::Default => DEFAULT_CHAIN,
        ErrorFormat::StatusEnvelope => STATUS_ENVELOPE_CHAIN,
    };
    let context = Context {
        status,
        reason: reason.as_deref(),
        headers: &headers,
        payload: &payload,
    };
    let error = chain.iter().find_map(|classify| classify(&context));
    match error {
        None => Ok(Response::from_parts(
            Parts::new().set_status(status).set_headers(headers),
            payload,
        )),
        Some(e) => {
            let e = match transaction_id(&headers) {
                Some(id) => e.set_transaction_id(id),
                None => e,
            };
            Err(Error::service_with_http_metadata(
                e,
                Some(status.as_u16()),
                Some(headers),
            ))
        }
    }
}

/// Returns true if [normalize] may report an error given only the status
/// and reason phrase.
///
/// Successful responses may still carry an error envelope in the body, this
/// function is used to decide if a streamed body must be buffered.
pub fn is_error_status(status: StatusCode, reason: Option<&str>) -> bool {
    !status.is_success() || reason == Some(INVALID_API_KEY)
}

fn transaction_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(TRANSACTION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
}

fn api_key_sentinel(ctx: &Context) -> Option<ServiceError> {
    if ctx.reason != Some(INVALID_API_KEY) {
        return None;
    }
    Some(
        ServiceError::new(INVALID_API_KEY)
            .set_code(401)
            .set_field("error", INVALID_API_KEY),
    )
}

fn vendor_envelope(ctx: &Context) -> Option<ServiceError> {
    let Payload::Json(Value::Object(body)) = ctx.payload else {
        return None;
    };
    if !body.get("error").is_some_and(truthy) && !body.get("error_code").is_some_and(truthy) {
        return None;
    }
    let mut body = body.clone();
    match body.get("error").cloned() {
        // Some services return `{"error": {"code": .., "description": .., "error_id": ..}}`.
        Some(Value::Object(inner)) if inner.get("description").is_some_and(truthy) => {
            let description = inner.get("description").cloned().unwrap_or_default();
            body.extend(inner);
            body.insert("error".to_string(), description);
        }
        Some(Value::Object(inner)) if matches!(inner.get("error"), Some(Value::Object(_))) => {
            let nested = inner
                .get("error")
                .map(Value::to_string)
                .unwrap_or_default();
            body.insert("rawError".to_string(), Value::Object(inner));
            body.insert("error".to_string(), Value::String(nested));
        }
        _ => {}
    }

    let message = ["error", "error_message"]
        .iter()
        .find_map(|k| body.get(*k).filter(|v| truthy(v)))
        .map(text)
        .unwrap_or_else(|| {
            let code = body.get("error_code").map(text).unwrap_or_default();
            format!("Error Code: {code}")
        });
    let code = body
        .get("code")
        .and_then(as_code)
        .or_else(|| body.get("error_code").and_then(as_code))
        .or_else(|| (!ctx.status.is_success()).then(|| i64::from(ctx.status.as_u16())));
    Some(
        ServiceError::new(message)
            .set_or_clear_code(code)
            .set_fields(body),
    )
}

fn status_fallback(ctx: &Context) -> Option<ServiceError> {
    if ctx.status.is_success() {
        return None;
    }
    let message = match ctx.payload {
        Payload::Json(Value::String(s)) => s.clone(),
        Payload::Json(v) => v.to_string(),
        Payload::Raw(b) => String::from_utf8_lossy(b).into_owned(),
    };
    let code = ctx.status.as_u16();
    let error = ServiceError::new(message.clone()).set_code(code);
    if code == 401 || code == 403 {
        return Some(error.set_message(UNAUTHORIZED_MESSAGE).set_body(message));
    }
    Some(error)
}

fn status_envelope(ctx: &Context) -> Option<ServiceError> {
    let (result, fields) = match ctx.payload {
        Payload::Json(Value::Object(o)) => {
            if o.get("status").and_then(Value::as_str) == Some("OK") {
                return None;
            }
            (Value::Object(o.clone()), o.clone())
        }
        Payload::Json(v) => (v.clone(), Map::new()),
        Payload::Raw(b) => (
            Value::String(String::from_utf8_lossy(b).into_owned()),
            Map::new(),
        ),
    };
    let message = fields
        .get("statusInfo")
        .filter(|v| truthy(v))
        .map(text)
        .or_else(|| {
            ctx.headers
                .get(ALCHEMY_ERROR_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
        .unwrap_or_default();
    Some(
        ServiceError::new(message)
            .set_code(400)
            .set_fields(fields)
            .set_body(result),
    )
}

// Mirrors the truthiness rules the services assume for their envelopes.
fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        v => v.to_string(),
    }
}

fn as_code(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status: StatusCode::from_u16(status).unwrap(),
            reason: None,
            headers: HeaderMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    fn service_error(response: RawResponse, format: ErrorFormat) -> ServiceError {
        let err = normalize(response, format).unwrap_err();
        assert!(err.is_service(), "{err:?}");
        err.service_error().cloned().unwrap()
    }

    fn map(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test_case(200, r#"{"tone": 0.5}"#, Payload::Json(json!({"tone": 0.5})); "json")]
    #[test_case(200, "plain text", Payload::Raw(Bytes::from_static(b"plain text")); "raw")]
    #[test_case(204, "", Payload::Raw(Bytes::new()); "no content")]
    #[test_case(201, r#"{"error": ""}"#, Payload::Json(json!({"error": ""})); "falsy error")]
    #[test_case(200, r#"{"error_code": 0}"#, Payload::Json(json!({"error_code": 0})); "zero error code")]
    #[test_case(200, r#"["a"]"#, Payload::Json(json!(["a"])); "array")]
    fn success(status: u16, body: &str, want: Payload) -> anyhow::Result<()> {
        let mut input = raw(status, body);
        input
            .headers
            .insert("x-global-transaction-id", HeaderValue::from_static("txn"));
        let response = normalize(input, ErrorFormat::Default)?;
        assert_eq!(response.status().as_u16(), status);
        assert_eq!(
            response
                .headers()
                .get("x-global-transaction-id")
                .map(HeaderValue::as_bytes),
            Some("txn".as_bytes())
        );
        assert_eq!(response.into_body(), want);
        Ok(())
    }

    #[test]
    fn api_key_sentinel_wins() {
        let mut input = raw(200, r#"{"error": "ignored"}"#);
        input.reason = Some(INVALID_API_KEY.to_string());
        let got = service_error(input, ErrorFormat::Default);
        assert_eq!(
            got,
            ServiceError::new("invalid-api-key")
                .set_code(401)
                .set_field("error", "invalid-api-key")
        );
    }

    #[test]
    fn other_reason_ignored() -> anyhow::Result<()> {
        let mut input = raw(200, "{}");
        input.reason = Some("Okey Dokey".to_string());
        let response = normalize(input, ErrorFormat::Default)?;
        assert_eq!(response.into_body(), Payload::Json(json!({})));
        Ok(())
    }

    #[test]
    fn error_with_description() {
        let body = json!({"error": {"code": 400, "description": "bad image", "error_id": "input"}});
        let got = service_error(raw(400, &body.to_string()), ErrorFormat::Default);
        assert_eq!(got.message(), "bad image");
        assert_eq!(got.code(), Some(400));
        assert_eq!(
            got.fields(),
            &map(json!({
                "error": "bad image",
                "code": 400,
                "description": "bad image",
                "error_id": "input",
            }))
        );
    }

    #[test]
    fn nested_error() {
        let body = json!({"error": {"error": {"synonym": "already exists"}}, "code": 409});
        let got = service_error(raw(409, &body.to_string()), ErrorFormat::Default);
        assert_eq!(got.message(), r#"{"synonym":"already exists"}"#);
        assert_eq!(got.code(), Some(409));
        assert_eq!(
            got.field("rawError"),
            Some(&json!({"error": {"synonym": "already exists"}}))
        );
        assert_eq!(
            got.field("error"),
            Some(&json!(r#"{"synonym":"already exists"}"#))
        );
    }

    #[test]
    fn error_code_in_successful_response() {
        let body = json!({"error_code": 400, "error_message": "Unable to find model"});
        let got = service_error(raw(200, &body.to_string()), ErrorFormat::Default);
        assert_eq!(got.message(), "Unable to find model");
        assert_eq!(got.code(), Some(400));
        assert_eq!(got.field("error_message"), Some(&json!("Unable to find model")));
    }

    #[test_case(json!({"error_code": 404}), "Error Code: 404", Some(404); "numeric")]
    #[test_case(json!({"error_code": "503"}), "Error Code: 503", Some(503); "numeric string")]
    #[test_case(json!({"error_code": "ABC"}), "Error Code: ABC", None; "non numeric")]
    fn error_code_only(body: Value, message: &str, code: Option<i64>) {
        let got = service_error(raw(200, &body.to_string()), ErrorFormat::Default);
        assert_eq!(got.message(), message);
        assert_eq!(got.code(), code);
    }

    #[test]
    fn error_code_copies_body_keys() {
        let body = json!({"error_code": "555", "fake_key": "fake_value"});
        let got = service_error(raw(200, &body.to_string()), ErrorFormat::Default);
        assert_eq!(got.code(), Some(555));
        assert_eq!(got.message(), "Error Code: 555");
        assert_eq!(got.field("fake_key"), Some(&json!("fake_value")));
        assert_eq!(got.field("error_code"), Some(&json!("555")));
    }

    #[test]
    fn error_uses_status_code() {
        let body = json!({"error": "Not found"});
        let got = service_error(raw(404, &body.to_string()), ErrorFormat::Default);
        assert_eq!(got.message(), "Not found");
        assert_eq!(got.code(), Some(404));
        assert_eq!(got.fields(), &map(body));
    }

    #[test]
    fn error_without_code_in_successful_response() {
        let body = json!({"error": "something failed"});
        let got = service_error(raw(200, &body.to_string()), ErrorFormat::Default);
        assert_eq!(got.message(), "something failed");
        assert_eq!(got.code(), None);
    }

    #[test_case(500, "Internal Server Error", "Internal Server Error"; "text")]
    #[test_case(502, r#"{"msg": "bad gateway"}"#, r#"{"msg":"bad gateway"}"#; "json")]
    #[test_case(404, r#""not here""#, "not here"; "json string")]
    #[test_case(503, "", ""; "empty")]
    fn status_fallback_message(status: u16, body: &str, message: &str) {
        let got = service_error(raw(status, body), ErrorFormat::Default);
        assert_eq!(got.message(), message);
        assert_eq!(got.code(), Some(i64::from(status)));
        assert_eq!(got.body(), None);
    }

    #[test_case(401)]
    #[test_case(403)]
    fn unauthorized(status: u16) {
        let got = service_error(raw(status, "Not Authorized"), ErrorFormat::Default);
        assert_eq!(
            got.message(),
            "Unauthorized: Access is denied due to invalid credentials."
        );
        assert_eq!(got.code(), Some(i64::from(status)));
        assert_eq!(got.body(), Some(&json!("Not Authorized")));
    }

    #[test]
    fn transaction_id_header() {
        let mut input = raw(500, "oops");
        input
            .headers
            .insert("x-global-transaction-id", HeaderValue::from_static("abc-123"));
        let err = normalize(input, ErrorFormat::Default).unwrap_err();
        assert_eq!(err.transaction_id(), Some("abc-123"));
        assert_eq!(err.http_status_code(), Some(500));
        assert!(err.http_headers().is_some(), "{err:?}");
    }

    #[test]
    fn status_envelope_ok() -> anyhow::Result<()> {
        let body = json!({"status": "OK", "language": "english"});
        let response = normalize(raw(200, &body.to_string()), ErrorFormat::StatusEnvelope)?;
        assert_eq!(response.into_body(), Payload::Json(body));
        Ok(())
    }

    #[test]
    fn status_envelope_error() {
        let body = json!({"status": "ERROR", "statusInfo": "invalid-api-key-or-url"});
        let got = service_error(raw(200, &body.to_string()), ErrorFormat::StatusEnvelope);
        assert_eq!(got.message(), "invalid-api-key-or-url");
        assert_eq!(got.code(), Some(400));
        assert_eq!(got.body(), Some(&body));
        assert_eq!(got.fields(), &map(body));
    }

    #[test]
    fn status_envelope_header_message() {
        let mut input = raw(200, r#"{"status": "ERROR"}"#);
        input
            .headers
            .insert(ALCHEMY_ERROR_HEADER, HeaderValue::from_static("daily-transaction-limit-exceeded"));
        let got = service_error(input, ErrorFormat::StatusEnvelope);
        assert_eq!(got.message(), "daily-transaction-limit-exceeded");
        assert_eq!(got.code(), Some(400));
    }

    #[test]
    fn status_envelope_ignored_by_default() -> anyhow::Result<()> {
        let body = json!({"status": "ERROR", "statusInfo": "unused"});
        let response = normalize(raw(200, &body.to_string()), ErrorFormat::Default)?;
        assert_eq!(response.into_body(), Payload::Json(body));
        Ok(())
    }

    #[test]
    fn status_envelope_after_status_fallback() {
        let got = service_error(raw(500, "oops"), ErrorFormat::StatusEnvelope);
        assert_eq!(got.message(), "oops");
        assert_eq!(got.code(), Some(500));
    }

    #[test_case(101, None, "switching")]
    #[test_case(304, None, "")]
    #[test_case(200, Some("invalid-api-key"), "{}")]
    #[test_case(404, None, r#"{"tone": 0.5}"#)]
    #[test_case(500, Some("Internal Server Error"), "")]
    fn error_status_always_fails(status: u16, reason: Option<&str>, body: &str) {
        let status = StatusCode::from_u16(status).unwrap();
        assert!(is_error_status(status, reason));
        for format in [ErrorFormat::Default, ErrorFormat::StatusEnvelope] {
            let input = RawResponse {
                status,
                reason: reason.map(str::to_string),
                headers: HeaderMap::new(),
                body: Bytes::from(body.to_string()),
            };
            let err = normalize(input, format).unwrap_err();
            assert!(err.is_service(), "{err:?}");
        }
    }

    #[test_case(200, None, false)]
    #[test_case(299, None, false)]
    #[test_case(200, Some("invalid-api-key"), true)]
    #[test_case(302, None, true)]
    #[test_case(404, None, true)]
    fn error_status(status: u16, reason: Option<&str>, want: bool) {
        let status = StatusCode::from_u16(status).unwrap();
        assert_eq!(is_error_status(status, reason), want);
    }
}

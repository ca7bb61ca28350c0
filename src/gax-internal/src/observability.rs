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

//! Tracing spans for HTTP requests.

use crate::options::ServiceInfo;
use crate::request::RequestDescriptor;
use gax::error::Error;
use gax::response::Response;
use tracing::{Span, field};

pub mod keys {
    pub const HTTP_REQUEST_METHOD: &str = "http.request.method";
    pub const URL_TEMPLATE: &str = "url.template";
    pub const HTTP_RESPONSE_STATUS_CODE: &str = "http.response.status_code";
    pub const ERROR_TYPE: &str = "error.type";
    pub const WATSON_SERVICE: &str = "watson.service";
    pub const WATSON_OPERATION_ID: &str = "watson.operation_id";
    pub const WATSON_TRANSACTION_ID: &str = "watson.transaction_id";
}

use keys::*;

/// Creates the span for one request.
///
/// Returns a disabled span if tracing is not enabled for the client.
pub fn create_http_span(
    enabled: bool,
    service: &ServiceInfo,
    descriptor: &RequestDescriptor,
) -> Span {
    if !enabled {
        return Span::none();
    }
    tracing::info_span!(
        "http_request",
        { HTTP_REQUEST_METHOD } = descriptor.method.as_str(),
        { URL_TEMPLATE } = descriptor.url.as_str(),
        { WATSON_SERVICE } = service.service_name,
        { WATSON_OPERATION_ID } = descriptor.operation_id.as_deref(),
        // Fields to be recorded later
        { HTTP_RESPONSE_STATUS_CODE } = field::Empty,
        { ERROR_TYPE } = field::Empty,
        { WATSON_TRANSACTION_ID } = field::Empty,
    )
}

/// Records the outcome of the request on `span`.
pub fn record_http_response<T>(span: &Span, result: &gax::Result<Response<T>>) {
    if span.is_disabled() {
        return;
    }
    match result {
        Ok(response) => {
            span.record(
                HTTP_RESPONSE_STATUS_CODE,
                response.status().as_u16() as i64,
            );
        }
        Err(err) => {
            if let Some(status) = err.http_status_code() {
                span.record(HTTP_RESPONSE_STATUS_CODE, status as i64);
            }
            if let Some(id) = err.transaction_id() {
                span.record(WATSON_TRANSACTION_ID, id);
            }
            span.record(ERROR_TYPE, error_type(err));
            tracing::debug!("request failed: {err}");
        }
    }
}

/// A low-cardinality description of the error, for the `error.type` field.
pub fn error_type(err: &Error) -> String {
    match err {
        e if e.is_binding() => "BINDING".to_string(),
        e if e.is_timeout() => "CLIENT_TIMEOUT".to_string(),
        e if e.is_serialization() => "CLIENT_REQUEST_ERROR".to_string(),
        e if e.is_deserialization() => "CLIENT_RESPONSE_DECODE_ERROR".to_string(),
        e if e.is_transport() => "CLIENT_CONNECTION_ERROR".to_string(),
        e => match e.http_status_code() {
            Some(code) => code.to_string(),
            None => "SERVICE_ERROR".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gax::error::binding::MissingParametersError;
    use gax::error::service_error::ServiceError;
    use test_case::test_case;

    const SERVICE: ServiceInfo = ServiceInfo {
        service_name: "assistant",
        service_version: "v1",
        default_endpoint: "https://gateway.watsonplatform.net/assistant/api",
    };

    #[test]
    fn disabled() {
        let descriptor = RequestDescriptor::new(reqwest::Method::GET, "/v1/workspaces");
        let span = create_http_span(false, &SERVICE, &descriptor);
        assert!(span.is_none(), "{span:?}");
        // Recording on a disabled span is a no-op.
        record_http_response::<()>(&span, &Err(Error::timeout("test")));
    }

    #[test_case(Error::binding(MissingParametersError::new(["a"])), "BINDING")]
    #[test_case(Error::timeout("t"), "CLIENT_TIMEOUT")]
    #[test_case(Error::ser("s"), "CLIENT_REQUEST_ERROR")]
    #[test_case(Error::deser("d"), "CLIENT_RESPONSE_DECODE_ERROR")]
    #[test_case(Error::io("io"), "CLIENT_CONNECTION_ERROR")]
    #[test_case(Error::service_with_http_metadata(ServiceError::new("nf"), Some(404), None), "404")]
    #[test_case(Error::service(ServiceError::new("envelope")), "SERVICE_ERROR")]
    fn error_types(err: Error, want: &str) {
        assert_eq!(error_type(&err), want);
    }
}

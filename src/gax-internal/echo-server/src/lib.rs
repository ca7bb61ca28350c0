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

//! Defines helpers functions to run ReqwestClient integration tests.
//!
//! Setting up integration tests is a bit complicated. So we refactor that code
//! to some helper functions.

use axum::{
    extract::{FromRequest, Multipart, Query, Request},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use gax::credentials::Credentials;
use gaxi::options::ServiceInfo;
use serde_json::{Value, json};
use std::collections::HashMap;
use tokio::task::JoinHandle;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
// Handlers run on the server task, their errors must be `Send`.
type HandlerResult<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub const SERVICE: ServiceInfo = ServiceInfo {
    service_name: "echo-server",
    service_version: "v1",
    default_endpoint: "http://127.0.0.1:1",
};

pub const TRANSACTION_ID: &str = "echo-transaction-id";

pub async fn start() -> Result<(String, JoinHandle<()>)> {
    let app = axum::Router::new()
        .route("/echo", axum::routing::any(echo))
        .route("/echo/{*rest}", axum::routing::any(echo))
        .route("/error", axum::routing::any(error))
        .route("/unauthorized", axum::routing::any(unauthorized))
        .route("/invalid-api-key", axum::routing::any(invalid_api_key))
        .route("/status-envelope", axum::routing::any(status_envelope));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server = tokio::spawn(async {
        axum::serve(listener, app).await.unwrap();
    });

    Ok((format!("http://{}:{}", addr.ip(), addr.port()), server))
}

pub fn builder(
    endpoint: impl Into<String>,
) -> gax::client_builder::ClientBuilder<Factory, Credentials> {
    gax::client_builder::internal::new_builder(Factory(endpoint.into()))
}

pub struct Factory(String);
impl gax::client_builder::internal::ClientFactory for Factory {
    type Client = gaxi::http::ReqwestClient;
    type Credentials = Credentials;
    async fn build(
        self,
        mut config: gaxi::options::ClientConfig,
    ) -> gax::client_builder::Result<Self::Client> {
        config.endpoint.get_or_insert(self.0);
        config.cred.get_or_insert(Credentials::Unauthenticated);
        Self::Client::new(config, SERVICE)
    }
}

async fn echo(
    method: Method,
    uri: Uri,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    request: Request,
) -> (StatusCode, String) {
    let response = echo_impl(method, uri, query, headers, request).await;
    match response {
        Err(e) => internal_error(e),
        Ok(s) => (StatusCode::OK, s),
    }
}

async fn echo_impl(
    method: Method,
    uri: Uri,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    request: Request,
) -> HandlerResult<String> {
    let params: HashMap<&str, &str> = query
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    if let Some(delay) = params
        .get("delay_ms")
        .map(|s| s.parse::<u64>())
        .transpose()?
        .map(tokio::time::Duration::from_millis)
    {
        tokio::time::sleep(delay).await;
    }
    let is_multipart = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));
    let (body, parts) = if is_multipart {
        let multipart = Multipart::from_request(request, &()).await?;
        (Value::Null, multipart_to_json(multipart).await?)
    } else {
        let bytes = axum::body::to_bytes(request.into_body(), usize::MAX).await?;
        let body = match bytes.is_empty() {
            true => Value::Null,
            false => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
        };
        (body, Value::Null)
    };
    let query = Value::Array(query.into_iter().map(|(k, v)| json!([k, v])).collect());
    let headers = headers_to_json(headers)?;
    let object = json!({
        "method": method.as_str(),
        "path": uri.path(),
        "raw_query": uri.query(),
        "query": query,
        "headers": headers,
        "body": body,
        "parts": parts,
    });
    let body = serde_json::to_string(&object)?;
    Ok(body)
}

async fn multipart_to_json(mut multipart: Multipart) -> HandlerResult<Value> {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;
        parts.push(json!({
            "name": name,
            "filename": filename,
            "content_type": content_type,
            "data": String::from_utf8_lossy(&data),
        }));
    }
    Ok(Value::Array(parts))
}

async fn error() -> Response {
    let body = json!({
        "error": "this path always returns an error",
        "code": StatusCode::BAD_REQUEST.as_u16(),
    });
    (
        StatusCode::BAD_REQUEST,
        [("x-global-transaction-id", TRANSACTION_ID)],
        body.to_string(),
    )
        .into_response()
}

async fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "Not Authorized").into_response()
}

async fn invalid_api_key() -> Response {
    let mut response = (StatusCode::OK, "{}").into_response();
    response
        .extensions_mut()
        .insert(hyper::ext::ReasonPhrase::from_static(b"invalid-api-key"));
    response
}

async fn status_envelope(Query(query): Query<HashMap<String, String>>) -> Response {
    let status = query.get("status").map(String::as_str).unwrap_or("ERROR");
    let body = json!({
        "status": status,
        "statusInfo": "unsupported-text-language",
        "language": "klingon",
    });
    (StatusCode::OK, body.to_string()).into_response()
}

fn headers_to_json(headers: HeaderMap) -> HandlerResult<Value> {
    let mut object = serde_json::Map::new();
    for name in headers.keys() {
        let values = headers
            .get_all(name)
            .iter()
            .map(|v| v.to_str())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        object.insert(name.to_string(), Value::String(values.join(", ")));
    }
    Ok(Value::Object(object))
}

fn internal_error(e: Box<dyn std::error::Error + Send + Sync>) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, format!("{e}"))
}

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

//! Turns a [RequestDescriptor] into a [ResolvedRequest].
//!
//! Resolution is a pure function of the client defaults, the descriptor, and
//! the per-call options. It validates the required parameters, substitutes the
//! path parameters, encodes the query and form fields, and merges the
//! headers. The transport sends the result without further changes.

use crate::api_header;
use crate::form_data::{self, FormPart};
use crate::options::DefaultOptions;
use crate::path_parameter;
use crate::query_parameter;
use crate::request::{Body, RequestDescriptor};
use crate::required_parameter;
use bytes::Bytes;
use gax::error::Error;
use gax::options::RequestOptions;
use http::header::{CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

/// A request ready to send.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedRequest {
    pub method: reqwest::Method,
    /// The full URL, including the encoded query string.
    pub url: String,
    pub headers: HeaderMap,
    /// The query parameters included in `url`, before encoding.
    pub query: Vec<(String, String)>,
    pub body: Option<ResolvedBody>,
    /// Fields for an `application/x-www-form-urlencoded` body.
    pub form: Vec<(String, String)>,
    /// Parts for a `multipart/form-data` body.
    pub form_data: Vec<(String, FormPart)>,
    pub timeout: Option<Duration>,
}

/// A serialized request body.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedBody {
    Text(String),
    Binary(Bytes),
}

/// Validates and resolves `descriptor`.
///
/// Returns a [binding][Error::is_binding] error if any required parameter is
/// missing.
pub fn resolve(
    defaults: &DefaultOptions,
    descriptor: RequestDescriptor,
    options: &RequestOptions,
) -> gax::Result<ResolvedRequest> {
    required_parameter::check(&descriptor)?;

    let RequestDescriptor {
        method,
        url,
        path,
        query,
        body,
        form,
        form_data,
        headers,
        operation_id,
        ..
    } = descriptor;

    let form_data = form_data::resolve(form_data);
    let url = path_parameter::with_endpoint(
        &defaults.endpoint,
        path_parameter::resolve(&url, &path),
    );
    let is_json = matches!(body, Some(Body::Json(_)));
    let mut headers = assemble_headers(
        defaults,
        &headers,
        options,
        operation_id.as_deref(),
        is_json,
    )?;
    let form = form_data::to_pairs(form);
    if !form_data.is_empty() {
        // The transport sets the content type, including the boundary.
        headers.remove(CONTENT_TYPE);
    } else if !form.is_empty() {
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
    }
    let query = query_parameter::to_pairs(query_parameter::merge(&defaults.query, query));
    let url = query_parameter::append(url, &query);
    let body = match body {
        None => None,
        Some(Body::Json(v)) => Some(ResolvedBody::Text(
            serde_json::to_string(&v).map_err(Error::ser)?,
        )),
        Some(Body::Text(s)) => Some(ResolvedBody::Text(s)),
        Some(Body::Binary(b)) => Some(ResolvedBody::Binary(b)),
    };

    Ok(ResolvedRequest {
        method,
        url,
        headers,
        query,
        body,
        form,
        form_data,
        timeout: *options.attempt_timeout(),
    })
}

/// Merges the client, descriptor, and per-call headers.
///
/// Later layers replace earlier values for the same (case-insensitive) name.
/// Adds the telemetry headers, unless disabled, and the JSON content type
/// for JSON bodies.
pub fn assemble_headers(
    defaults: &DefaultOptions,
    descriptor: &[(String, String)],
    options: &RequestOptions,
    operation_id: Option<&str>,
    is_json: bool,
) -> gax::Result<HeaderMap> {
    let mut headers = defaults.headers.clone();
    for (name, value) in descriptor.iter().chain(options.headers()) {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(Error::ser)?;
        let value = HeaderValue::from_str(value).map_err(Error::ser)?;
        headers.insert(name, value);
    }

    if defaults.telemetry && api_header::telemetry_supported() {
        let caller = headers
            .get(USER_AGENT)
            .map(|v| v.to_str().map_err(Error::ser))
            .transpose()?;
        let user_agent = api_header::user_agent(caller);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&user_agent).map_err(Error::ser)?,
        );
        if let Some(id) = operation_id {
            let analytics = api_header::analytics(&defaults.service, id);
            headers.insert(
                api_header::ANALYTICS,
                HeaderValue::from_str(&analytics).map_err(Error::ser)?,
            );
        }
    }

    if is_json && !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    Ok(headers)
}

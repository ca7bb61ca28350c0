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

//! Response types.
//!
//! This module contains types related to Watson service responses. Notably
//! it contains the `Response` type itself, and the `Payload` type used to
//! represent response bodies that may, or may not, be JSON.
//!
//! # Examples
//!
//! Inspecting the result of a request
//!
//! ```no_run
//! # use watson_gax::Result;
//! # use watson_gax::response::{Payload, Response};
//! async fn make_watson_request(text: &str) -> Result<Response<Payload>> {
//!   // ...
//! # panic!()
//! }
//!
//! # tokio_test::block_on(async {
//! let response = make_watson_request("I am happy").await?;
//! if let Some(id) = response.headers().get("x-global-transaction-id") {
//!     // do something with the transaction id
//! }
//! let tone: serde_json::Value = response.into_body().deserialize()?;
//! # Result::<()>::Ok(()) });
//! ```
//!
//! Creating a response for mocks
//!
//! ```
//! # use watson_gax::Result;
//! # use watson_gax::response::{Payload, Response};
//! fn make_mock_response() -> Result<Response<Payload>> {
//!     Ok(Response::from(Payload::Json(serde_json::json!({"ok": true}))))
//! }
//! ```

use bytes::Bytes;
use serde_json::Value;

/// Represents a Watson service response.
///
/// A response from a Watson service consists of a body, and some metadata:
/// currently the HTTP status code and the response headers.
///
/// Typically you get a response as the result of making a request via some
/// client in the Watson Developer Cloud client libraries for Rust. You may
/// also create responses directly when mocking clients for your own tests.
#[derive(Clone, Debug)]
pub struct Response<T> {
    parts: Parts,
    body: T,
}

impl<T> Response<T> {
    /// Creates a response from the body.
    ///
    /// # Example
    /// ```
    /// # use watson_gax::response::Response;
    /// let response = Response::from("test".to_string());
    /// assert_eq!(response.status(), http::StatusCode::OK);
    /// ```
    pub fn from(body: T) -> Self {
        Self {
            body,
            parts: Parts::default(),
        }
    }

    /// Creates a response from the given parts.
    ///
    /// # Example
    /// ```
    /// # use watson_gax::response::Response;
    /// # use watson_gax::response::Parts;
    /// let mut headers = http::HeaderMap::new();
    /// headers.insert(http::header::CONTENT_TYPE, http::HeaderValue::from_static("application/json"));
    /// let response = Response::from_parts(
    ///     Parts::new().set_status(http::StatusCode::CREATED).set_headers(headers), ());
    /// assert!(response.headers().get(http::header::CONTENT_TYPE).is_some());
    /// assert_eq!(response.status(), http::StatusCode::CREATED);
    /// ```
    pub fn from_parts(parts: Parts, body: T) -> Self {
        Self { parts, body }
    }

    /// Returns the HTTP status code of this response.
    pub fn status(&self) -> http::StatusCode {
        self.parts.status
    }

    /// Returns the headers associated with this response.
    ///
    /// # Example
    /// ```
    /// # use watson_gax::response::Response;
    /// let response = Response::from(());
    /// assert!(response.headers().is_empty());
    /// ```
    pub fn headers(&self) -> &http::HeaderMap<http::HeaderValue> {
        &self.parts.headers
    }

    /// Returns the body associated with this response.
    pub fn body(&self) -> &T {
        &self.body
    }

    /// Consumes the response returning the metadata, and body.
    ///
    /// # Example
    /// ```
    /// # use watson_gax::response::Response;
    /// let response = Response::from("test".to_string());
    /// let (parts, body) = response.into_parts();
    /// assert_eq!(body.as_str(), "test");
    /// assert!(parts.headers.is_empty());
    /// ```
    pub fn into_parts(self) -> (Parts, T) {
        (self.parts, self.body)
    }

    /// Consumes the response returning only its body.
    pub fn into_body(self) -> T {
        self.body
    }
}

/// Component parts of a response.
///
/// The response parts, other than the body, consist of the HTTP status code
/// and the response headers.
///
/// # Example
/// ```
/// # use watson_gax::response::Parts;
/// let mut headers = http::HeaderMap::new();
/// headers.insert(http::header::CONTENT_TYPE, http::HeaderValue::from_static("application/json"));
/// let parts = Parts::new().set_headers(headers);
///
/// assert_eq!(
///     parts.headers.get(http::header::CONTENT_TYPE),
///     Some(&http::HeaderValue::from_static("application/json"))
/// );
/// ```
#[derive(Clone, Debug, Default)]
#[non_exhaustive]
pub struct Parts {
    /// The HTTP status code.
    pub status: http::StatusCode,
    /// The HTTP headers.
    pub headers: http::HeaderMap<http::HeaderValue>,
}

impl Parts {
    /// Create a new instance.
    pub fn new() -> Self {
        Parts::default()
    }

    /// Set the status code.
    pub fn set_status<V>(mut self, v: V) -> Self
    where
        V: Into<http::StatusCode>,
    {
        self.status = v.into();
        self
    }

    /// Set the headers.
    pub fn set_headers<V>(mut self, v: V) -> Self
    where
        V: Into<http::HeaderMap>,
    {
        self.headers = v.into();
        self
    }
}

/// The body of a successful response.
///
/// Most Watson operations return JSON. Some return binary content, such as
/// synthesized audio, or plain text. The client libraries try to parse every
/// response body as JSON, and keep the raw bytes when that fails.
///
/// # Example
/// ```
/// # use watson_gax::response::Payload;
/// let payload = Payload::from_bytes(bytes::Bytes::from_static(br#"{"a": 1}"#));
/// assert!(matches!(payload, Payload::Json(_)));
/// let payload = Payload::from_bytes(bytes::Bytes::from_static(b"RIFF...."));
/// assert!(matches!(payload, Payload::Raw(_)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// The body was valid JSON.
    Json(Value),
    /// The body could not be parsed as JSON, it is returned unchanged.
    Raw(Bytes),
}

impl Payload {
    /// Parses `bytes` as JSON, falling back to the raw bytes.
    ///
    /// An empty body is not valid JSON, it is returned as an empty
    /// [Payload::Raw].
    pub fn from_bytes(bytes: Bytes) -> Self {
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(v) => Self::Json(v),
            Err(_) => Self::Raw(bytes),
        }
    }

    /// Returns the JSON value, if the body was JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Raw(_) => None,
        }
    }

    /// Returns the raw bytes, if the body was not JSON.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Json(_) => None,
            Self::Raw(b) => Some(b),
        }
    }

    /// Converts the payload into an application type.
    ///
    /// # Example
    /// ```
    /// # use watson_gax::response::Payload;
    /// #[derive(serde::Deserialize)]
    /// struct Tone { score: f64 }
    /// let payload = Payload::Json(serde_json::json!({"score": 0.75}));
    /// let tone: Tone = payload.deserialize()?;
    /// assert_eq!(tone.score, 0.75);
    /// # Ok::<(), watson_gax::error::Error>(())
    /// ```
    pub fn deserialize<T>(self) -> crate::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        match self {
            Self::Json(v) => serde_json::from_value(v).map_err(crate::error::Error::deser),
            Self::Raw(b) => serde_json::from_slice(&b).map_err(crate::error::Error::deser),
        }
    }
}

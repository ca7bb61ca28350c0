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

//! The declarative description of a single request.
//!
//! Generated service clients map the parameters of each operation into a
//! [RequestDescriptor]. The descriptor is consumed exactly once, by
//! [resolve][crate::request_builder::resolve].

use bytes::Bytes;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Describes one request, before validation and resolution.
///
/// # Example
/// ```
/// # use watson_gax_internal::request::{Body, RequestDescriptor};
/// let descriptor = RequestDescriptor::new(reqwest::Method::POST, "/v3/tone")
///     .set_query("sentences", false)
///     .set_body(Body::Json(serde_json::json!({"text": "I am happy"})))
///     .set_required_params(["tone_input"])
///     .set_operation_id("tone");
/// assert_eq!(descriptor.url, "/v3/tone");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
    pub method: reqwest::Method,
    /// The URL template, may contain `{name}` placeholders.
    pub url: String,
    /// Values for the `{name}` placeholders in `url`.
    pub path: BTreeMap<String, String>,
    pub query: Map<String, Value>,
    pub body: Option<Body>,
    /// Fields for an `application/x-www-form-urlencoded` body.
    pub form: Map<String, Value>,
    /// Fields for a `multipart/form-data` body.
    pub form_data: BTreeMap<String, FormValue>,
    pub headers: Vec<(String, String)>,
    /// The required parameters, in the order reported when missing.
    pub required_params: Vec<String>,
    /// If set, validation uses these parameters instead of the union of
    /// `path`, `query`, `body`, `form`, and `form_data`.
    pub original_params: Option<Map<String, Value>>,
    pub operation_id: Option<String>,
    pub error_format: ErrorFormat,
}

impl RequestDescriptor {
    pub fn new<U: Into<String>>(method: reqwest::Method, url: U) -> Self {
        Self {
            method,
            url: url.into(),
            path: BTreeMap::new(),
            query: Map::new(),
            body: None,
            form: Map::new(),
            form_data: BTreeMap::new(),
            headers: Vec::new(),
            required_params: Vec::new(),
            original_params: None,
            operation_id: None,
            error_format: ErrorFormat::default(),
        }
    }

    pub fn set_path<K, V>(mut self, k: K, v: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.path.insert(k.into(), v.into());
        self
    }

    pub fn set_query<K, V>(mut self, k: K, v: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.query.insert(k.into(), v.into());
        self
    }

    pub fn set_body(mut self, v: Body) -> Self {
        self.body = Some(v);
        self
    }

    pub fn set_form<K, V>(mut self, k: K, v: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.form.insert(k.into(), v.into());
        self
    }

    pub fn set_form_data<K, V>(mut self, k: K, v: V) -> Self
    where
        K: Into<String>,
        V: Into<FormValue>,
    {
        self.form_data.insert(k.into(), v.into());
        self
    }

    pub fn set_header<K, V>(mut self, k: K, v: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers.push((k.into(), v.into()));
        self
    }

    pub fn set_required_params<I, V>(mut self, v: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.required_params = v.into_iter().map(Into::into).collect();
        self
    }

    pub fn set_original_params(mut self, v: Map<String, Value>) -> Self {
        self.original_params = Some(v);
        self
    }

    pub fn set_operation_id<V: Into<String>>(mut self, v: V) -> Self {
        self.operation_id = Some(v.into());
        self
    }

    pub fn set_error_format(mut self, v: ErrorFormat) -> Self {
        self.error_format = v;
        self
    }
}

/// The request body.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    /// Serialized as JSON, sent with `Content-Type: application/json` unless
    /// the request sets a different content type.
    Json(Value),
    /// Sent as-is, e.g. `text/plain` or `text/html` inputs.
    Text(String),
    /// Sent as-is, e.g. audio or image inputs.
    Binary(Bytes),
}

/// The value of a `multipart/form-data` field.
#[derive(Clone, Debug, PartialEq)]
pub enum FormValue {
    /// A plain field.
    ///
    /// Strings and other scalars are sent as text. Objects carrying a `data`
    /// key are sent as file parts, with the optional `filename` and
    /// `contentType` keys. Other objects and arrays are sent as JSON text.
    Json(Value),
    /// A file part.
    File(FilePart),
}

impl<T: Into<Value>> From<T> for FormValue {
    fn from(value: T) -> Self {
        Self::Json(value.into())
    }
}

impl From<FilePart> for FormValue {
    fn from(value: FilePart) -> Self {
        Self::File(value)
    }
}

/// A file uploaded as part of a `multipart/form-data` request.
///
/// Generated clients always include the content type hint declared by the
/// operation. A part without `data` is treated as missing, and omitted from
/// the request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilePart {
    pub data: Option<FileData>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

impl FilePart {
    pub fn new<T: Into<FileData>>(data: T) -> Self {
        Self {
            data: Some(data.into()),
            ..Default::default()
        }
    }

    pub fn set_filename<T: Into<String>>(mut self, v: T) -> Self {
        self.filename = Some(v.into());
        self
    }

    pub fn set_content_type<T: Into<String>>(mut self, v: T) -> Self {
        self.content_type = Some(v.into());
        self
    }
}

/// The contents of a [FilePart].
#[derive(Clone, Debug, PartialEq)]
pub enum FileData {
    Bytes(Bytes),
    /// Read when the request is sent.
    Path(PathBuf),
}

impl From<Bytes> for FileData {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl From<Vec<u8>> for FileData {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(value))
    }
}

impl From<&'static [u8]> for FileData {
    fn from(value: &'static [u8]) -> Self {
        Self::Bytes(Bytes::from_static(value))
    }
}

impl From<PathBuf> for FileData {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<&std::path::Path> for FileData {
    fn from(value: &std::path::Path) -> Self {
        Self::Path(value.to_path_buf())
    }
}

/// How the service reports errors in successful responses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorFormat {
    /// Errors use the HTTP status code, or an `error`/`error_code` envelope.
    #[default]
    Default,
    /// In addition, a response is an error unless its `status` field is
    /// `"OK"`. Used by the older AlchemyAPI-based services.
    StatusEnvelope,
}

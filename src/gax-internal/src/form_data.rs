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

//! Normalizes form fields before they are sent.
//!
//! Operations uploading files declare each file parameter with a content type
//! hint, whether or not the application provides the file. Parts without data
//! are dropped, so optional files are simply absent from the request.

use crate::query_parameter;
use crate::request::{FileData, FilePart, FormValue};
use bytes::Bytes;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A `multipart/form-data` part, ready to send.
#[derive(Clone, Debug, PartialEq)]
pub enum FormPart {
    Text(String),
    File {
        data: FileData,
        filename: Option<String>,
        content_type: String,
    },
}

/// Converts the `multipart/form-data` fields into parts.
///
/// Fields that are null, empty objects, or file parts without data are
/// omitted. The remaining fields keep their (sorted) order.
pub fn resolve(form_data: BTreeMap<String, FormValue>) -> Vec<(String, FormPart)> {
    form_data
        .into_iter()
        .filter_map(|(name, value)| {
            let part = match value {
                FormValue::File(file) => file_part(file),
                FormValue::Json(value) => json_part(value),
            };
            if part.is_none() {
                tracing::debug!("omitting empty multipart field {name}");
            }
            part.map(|p| (name, p))
        })
        .collect()
}

/// Converts the `application/x-www-form-urlencoded` fields into pairs.
///
/// Uses the same conventions as query parameters: lists become repeated
/// fields and nulls are omitted.
pub fn to_pairs(form: Map<String, Value>) -> Vec<(String, String)> {
    query_parameter::to_pairs(form)
}

/// Serializes urlencoded pairs.
///
/// # Example
/// ```
/// # use watson_gax_internal::form_data::encode;
/// let pairs = vec![("text".to_string(), "a b&c".to_string())];
/// assert_eq!(encode(&pairs), "text=a+b%26c");
/// ```
pub fn encode(pairs: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

fn file_part(file: FilePart) -> Option<FormPart> {
    let data = file.data?;
    let filename = file.filename.or_else(|| match &data {
        FileData::Path(p) => p.file_name().map(|n| n.to_string_lossy().into_owned()),
        FileData::Bytes(_) => None,
    });
    let content_type = file
        .content_type
        .or_else(|| detect(filename.as_deref()))
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
    Some(FormPart::File {
        data,
        filename,
        content_type,
    })
}

fn json_part(value: Value) -> Option<FormPart> {
    match value {
        Value::Null => None,
        Value::Object(o) if o.is_empty() => None,
        Value::Object(mut o) if o.contains_key("data") => {
            let data = match o.remove("data") {
                None | Some(Value::Null) => return None,
                Some(Value::String(s)) => Bytes::from(s),
                Some(v) => Bytes::from(v.to_string()),
            };
            let filename = string_field(&o, &["filename", "name"]);
            let content_type = string_field(&o, &["contentType", "content_type"]);
            file_part(FilePart {
                data: Some(FileData::Bytes(data)),
                filename,
                content_type,
            })
        }
        // A file descriptor with a content type hint but no data.
        Value::Object(o) if o.contains_key("contentType") || o.contains_key("content_type") => {
            None
        }
        Value::String(s) => Some(FormPart::Text(s)),
        v => Some(FormPart::Text(v.to_string())),
    }
}

fn string_field(o: &Map<String, Value>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|n| o.get(*n).and_then(Value::as_str))
        .map(str::to_string)
}

fn detect(filename: Option<&str>) -> Option<String> {
    mime_guess::from_path(filename?)
        .first_raw()
        .map(str::to_string)
}

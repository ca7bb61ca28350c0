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

use serde_json::{Map, Value};

/// The name of the header used by Watson services to correlate requests.
pub const TRANSACTION_ID_HEADER: &str = "x-global-transaction-id";

/// An error reported by a Watson service.
///
/// Watson services report errors in several ways. Some return a non-success
/// HTTP status code, some embed an error envelope (an `error` or `error_code`
/// field) in the response body, a few do both. The client libraries
/// normalize all of these into a `ServiceError`: a human-readable message, a
/// numeric code, and any extra fields included in the envelope.
///
/// The extra fields are preserved verbatim, applications that need
/// service-specific diagnostics can inspect them with
/// [field][ServiceError::field].
///
/// # Example
/// ```
/// # use watson_gax::error::service_error::ServiceError;
/// let e = ServiceError::new("Resource not found")
///     .set_code(404)
///     .set_field("fake_key", "fake_value");
/// assert_eq!(e.message(), "Resource not found");
/// assert_eq!(e.code(), Some(404));
/// assert_eq!(e.field("fake_key"), Some(&serde_json::json!("fake_value")));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct ServiceError {
    message: String,
    code: Option<i64>,
    fields: Map<String, Value>,
    body: Option<Value>,
    transaction_id: Option<String>,
}

impl ServiceError {
    /// Creates a new error with the given message.
    pub fn new<T: Into<String>>(message: T) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The numeric code.
    ///
    /// This is the vendor error code when the service includes one in the
    /// error envelope, and the HTTP status code otherwise.
    pub fn code(&self) -> Option<i64> {
        self.code
    }

    /// The extra fields copied from the error envelope.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns a single field copied from the error envelope.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Additional diagnostic detail.
    ///
    /// For unauthorized requests this holds the message produced by the
    /// service, which is replaced by a fixed message.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// The value of the `x-global-transaction-id` response header, if any.
    ///
    /// Include this value when contacting support, it identifies the request
    /// across all the Watson systems involved in handling it.
    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    /// Sets the message.
    pub fn set_message<T: Into<String>>(mut self, v: T) -> Self {
        self.message = v.into();
        self
    }

    /// Sets the numeric code.
    pub fn set_code<T: Into<i64>>(mut self, v: T) -> Self {
        self.code = Some(v.into());
        self
    }

    /// Sets the code, or clears it if `v` is `None`.
    pub fn set_or_clear_code<T: Into<i64>>(mut self, v: Option<T>) -> Self {
        self.code = v.map(Into::into);
        self
    }

    /// Replaces all the extra fields.
    pub fn set_fields(mut self, v: Map<String, Value>) -> Self {
        self.fields = v;
        self
    }

    /// Sets a single extra field.
    pub fn set_field<K, V>(mut self, k: K, v: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.fields.insert(k.into(), v.into());
        self
    }

    /// Sets the diagnostic body.
    pub fn set_body<T: Into<Value>>(mut self, v: T) -> Self {
        self.body = Some(v.into());
        self
    }

    /// Sets the transaction id.
    pub fn set_transaction_id<T: Into<String>>(mut self, v: T) -> Self {
        self.transaction_id = Some(v.into());
        self
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "[{code}] {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

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

use super::binding::MissingParametersError;
use super::service_error::{ServiceError, TRANSACTION_ID_HEADER};
use http::HeaderMap;
use std::borrow::Cow;
use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The core error returned by all client libraries.
///
/// The client libraries report errors from multiple sources. For example, the
/// service may return an error (using any of several encodings), the transport
/// may be unable to create the necessary connection to make a request, the
/// request may timeout before a response is received, or the library may
/// detect that required parameters are missing before sending the request.
///
/// Most applications will just return the error or log it, without any further
/// action. However, some applications may need to interrogate the error
/// details. This type offers a series of predicates to determine the error
/// kind. The type also offers accessors to query the most common error
/// details: every error has a [message][Error::message], and errors reported
/// by the service also have a numeric [code][Error::code].
///
/// # Example
/// ```
/// use watson_gax::error::Error;
/// match example_function() {
///     Err(e) if e.is_service() => {
///         println!("service error {e}, code={:?}", e.code());
///     },
///     Err(e) if e.is_timeout() => { println!("not enough time {e}"); },
///     Err(e) => { println!("some other error {e}"); },
///     Ok(_) => { println!("success, how boring"); },
/// }
///
/// fn example_function() -> Result<String, Error> {
///     // ... details omitted ...
///     # use watson_gax::error::service_error::ServiceError;
///     # Err(Error::service(ServiceError::new("NOT FOUND").set_code(404)))
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

impl Error {
    /// Creates an error with the information returned by a Watson service.
    ///
    /// # Example
    /// ```
    /// use watson_gax::error::Error;
    /// use watson_gax::error::service_error::ServiceError;
    /// let details = ServiceError::new("NOT FOUND").set_code(404);
    /// let error = Error::service(details.clone());
    /// assert_eq!(error.service_error(), Some(&details));
    /// ```
    pub fn service(error: ServiceError) -> Self {
        Self::service_with_http_metadata(error, None, None)
    }

    /// Not part of the public API, subject to change without notice.
    ///
    /// Create service errors including transport metadata.
    #[cfg_attr(not(feature = "_internal-semver"), doc(hidden))]
    pub fn service_with_http_metadata(
        error: ServiceError,
        status_code: Option<u16>,
        headers: Option<HeaderMap>,
    ) -> Self {
        let details = ServiceDetails {
            status_code,
            headers,
            error,
        };
        Self {
            kind: ErrorKind::Service(Box::new(details)),
            source: None,
        }
    }

    /// If true, the service reported an error.
    ///
    /// The service may report errors using HTTP status codes, or using an
    /// error envelope in the response body. Use
    /// [service_error][Error::service_error] to get the details.
    pub fn is_service(&self) -> bool {
        matches!(self.kind, ErrorKind::Service(_))
    }

    /// The [ServiceError] payload associated with this error.
    ///
    /// # Examples
    /// ```
    /// use watson_gax::error::Error;
    /// use watson_gax::error::service_error::ServiceError;
    /// let error = Error::service(ServiceError::new("bad").set_field("fake_key", "fake_value"));
    /// if let Some(details) = error.service_error() {
    ///     println!("more details in {:?}", details.field("fake_key"));
    /// }
    /// ```
    ///
    /// # Troubleshooting
    ///
    /// As this error type is typically created by the service, troubleshooting
    /// this problem typically involves reading the service documentation to
    /// root cause the problem. Many services include extra diagnostic fields
    /// in the error envelope, these are preserved in the
    /// [fields][ServiceError::fields].
    pub fn service_error(&self) -> Option<&ServiceError> {
        match &self.kind {
            ErrorKind::Service(d) => Some(&d.as_ref().error),
            _ => None,
        }
    }

    /// The human-readable message for this error.
    ///
    /// For errors reported by the service this is the normalized message.
    /// For other errors this is the formatted error, including its source.
    ///
    /// # Example
    /// ```
    /// use watson_gax::error::Error;
    /// use watson_gax::error::binding::MissingParametersError;
    /// let error = Error::binding(MissingParametersError::new(["a", "b"]));
    /// assert_eq!(error.message(), "Missing required parameters: a, b");
    /// ```
    pub fn message(&self) -> Cow<'_, str> {
        match (&self.kind, &self.source) {
            (ErrorKind::Service(d), _) => Cow::Borrowed(d.error.message()),
            (ErrorKind::Binding, Some(e)) => Cow::Owned(e.to_string()),
            _ => Cow::Owned(self.to_string()),
        }
    }

    /// The numeric code, if any, for this error.
    ///
    /// Errors reported by the service always have a code. It is either the
    /// vendor-specific error code in the error envelope, or the HTTP status
    /// code.
    pub fn code(&self) -> Option<i64> {
        self.service_error().and_then(ServiceError::code)
    }

    /// A single extra field from the service error envelope.
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.service_error().and_then(|e| e.field(name))
    }

    /// The transaction id associated with this error, if any.
    ///
    /// Watson services return a `x-global-transaction-id` header with each
    /// response. The client libraries copy this header into each error to
    /// simplify troubleshooting.
    pub fn transaction_id(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::Service(d) => d.error.transaction_id(),
            ErrorKind::Transport(d) => d
                .headers
                .as_ref()
                .and_then(|h| h.get(TRANSACTION_ID_HEADER))
                .and_then(|v| v.to_str().ok()),
            _ => None,
        }
    }

    /// If true, the service rejected the credentials used in the request.
    ///
    /// # Troubleshooting
    ///
    /// Verify the credentials (username and password, API key, or access
    /// token) configured in the client. Verify the credentials are valid for
    /// the service endpoint, credentials for one service instance are not
    /// valid for other instances.
    pub fn is_unauthorized(&self) -> bool {
        match &self.kind {
            ErrorKind::Service(d) => {
                matches!(d.status_code, Some(401) | Some(403))
                    || matches!(d.error.code(), Some(401) | Some(403))
            }
            _ => false,
        }
    }

    /// Creates an error representing a timeout.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use watson_gax::error::Error;
    /// let error = Error::timeout("simulated timeout");
    /// assert!(error.is_timeout());
    /// assert!(error.source().is_some());
    /// ```
    pub fn timeout<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Timeout,
            source: Some(source.into()),
        }
    }

    /// The request could not be completed before its deadline.
    ///
    /// This is always a client-side generated error. Note that the request may
    /// or may not have started, and it may or may not complete in the service.
    ///
    /// # Troubleshooting
    ///
    /// The most common cause of this problem is setting a timeout value that is
    /// based on the observed latency when the service is not under load.
    /// Consider increasing the timeout value to handle temporary latency
    /// increases too.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout)
    }

    /// Not part of the public API, subject to change without notice.
    ///
    /// Creates an error representing a deserialization problem.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use watson_gax::error::Error;
    /// let error = Error::deser("simulated problem");
    /// assert!(error.is_deserialization());
    /// assert!(error.source().is_some());
    /// ```
    #[cfg_attr(not(feature = "_internal-semver"), doc(hidden))]
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Deserialization,
            source: Some(source.into()),
        }
    }

    /// The response could not be deserialized.
    ///
    /// This is always a client-side generated error. The response was
    /// received, but its body does not match the type requested by the
    /// application.
    ///
    /// # Troubleshooting
    ///
    /// Verify the type used with
    /// [Payload::deserialize][crate::response::Payload::deserialize] matches
    /// the response documented by the service. Responses that are not JSON
    /// (audio, images) cannot be deserialized, use the raw bytes instead.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Deserialization)
    }

    /// Not part of the public API, subject to change without notice.
    ///
    /// Creates an error representing a serialization problem.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use watson_gax::error::Error;
    /// let error = Error::ser("simulated problem");
    /// assert!(error.is_serialization());
    /// assert!(error.source().is_some());
    /// ```
    #[cfg_attr(not(feature = "_internal-semver"), doc(hidden))]
    pub fn ser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Serialization,
            source: Some(source.into()),
        }
    }

    /// The request could not be serialized.
    ///
    /// This is always a client-side generated error, generated before the
    /// request is made. This error is never transient: the serialization is
    /// deterministic, and will fail on future attempts with the same input
    /// data.
    ///
    /// # Troubleshooting
    ///
    /// The most common cause is a file part that cannot be read, or a header
    /// value that contains characters not allowed in HTTP headers.
    pub fn is_serialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Serialization)
    }

    /// Not part of the public API, subject to change without notice.
    ///
    /// Required parameters are missing from the request.
    #[cfg_attr(not(feature = "_internal-semver"), doc(hidden))]
    pub fn binding<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Binding,
            source: Some(source.into()),
        }
    }

    /// If true, the request was missing required parameters.
    ///
    /// # Troubleshooting
    ///
    /// Typically this indicates a problem in the application. A required
    /// parameter was not initialized, or it was initialized to an empty value.
    /// Use [missing_parameters][Error::missing_parameters] to find out which
    /// parameters are missing.
    pub fn is_binding(&self) -> bool {
        matches!(&self.kind, ErrorKind::Binding)
    }

    /// The [MissingParametersError] associated with this error, if any.
    ///
    /// # Example
    /// ```
    /// use watson_gax::error::Error;
    /// use watson_gax::error::binding::MissingParametersError;
    /// let error = Error::binding(MissingParametersError::new(["a", "b"]));
    /// let missing = error.missing_parameters().unwrap();
    /// assert_eq!(missing.names(), &["a", "b"]);
    /// ```
    pub fn missing_parameters(&self) -> Option<&MissingParametersError> {
        match &self.kind {
            ErrorKind::Binding => self
                .source
                .as_ref()
                .and_then(|e| e.downcast_ref::<MissingParametersError>()),
            _ => None,
        }
    }

    /// Not part of the public API, subject to change without notice.
    ///
    /// A problem in the transport layer without a full HTTP response.
    ///
    /// Examples include: a broken connection after the request is sent, or a
    /// DNS failure.
    #[cfg_attr(not(feature = "_internal-semver"), doc(hidden))]
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Transport(Box::new(TransportDetails { headers: None })),
            source: Some(source.into()),
        }
    }

    /// Not part of the public API, subject to change without notice.
    ///
    /// A problem in the transport layer without a full HTTP response.
    ///
    /// Examples include read or write problems, and broken connections.
    ///
    /// # Troubleshooting
    ///
    /// This indicates a problem completing the request. This type of error is
    /// rare, but includes crashes and restarts on proxies and load balancers.
    #[cfg_attr(not(feature = "_internal-semver"), doc(hidden))]
    pub fn is_io(&self) -> bool {
        matches!(
            &self.kind,
            ErrorKind::Transport(d) if d.headers.is_none()
        )
    }

    /// Not part of the public API, subject to change without notice.
    ///
    /// A problem reported by the transport layer, after some headers were
    /// received.
    #[cfg_attr(not(feature = "_internal-semver"), doc(hidden))]
    pub fn transport<T: Into<BoxError>>(headers: HeaderMap, source: T) -> Self {
        Self {
            kind: ErrorKind::Transport(Box::new(TransportDetails {
                headers: Some(headers),
            })),
            source: Some(source.into()),
        }
    }

    /// If true, the transport could not complete the request.
    ///
    /// Examples include DNS failures, connection resets, TLS negotiation
    /// failures, and connections dropped while reading the response.
    ///
    /// # Troubleshooting
    ///
    /// Verify the endpoint configured in the client. Most often these
    /// problems are transient, the application may retry the request if it is
    /// safe to do so. The client libraries never retry requests
    /// automatically.
    pub fn is_transport(&self) -> bool {
        matches!(&self.kind, ErrorKind::Transport(_))
    }

    /// The HTTP status code, if any, associated with this error.
    ///
    /// # Example
    /// ```
    /// use watson_gax::error::Error;
    /// use watson_gax::error::service_error::ServiceError;
    /// let e = search_for_thing("the thing");
    /// if let Some(code) = e.http_status_code() {
    ///     if code == 404 {
    ///         println!("cannot find the thing, more details in {e}");
    ///     }
    /// }
    ///
    /// fn search_for_thing(name: &str) -> Error {
    ///     # Error::service_with_http_metadata(ServiceError::new("NOT FOUND"), Some(404), None)
    /// }
    /// ```
    ///
    /// Errors reported via an error envelope in a successful response have a
    /// 2xx status code. Note that `http_status_code()` and `code()` are
    /// different fields, the latter may be a vendor-specific code.
    pub fn http_status_code(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Service(d) => d.as_ref().status_code,
            _ => None,
        }
    }

    /// The headers, if any, associated with this error.
    ///
    /// # Example
    /// ```
    /// use watson_gax::error::Error;
    /// use watson_gax::error::service_error::ServiceError;
    /// let e = search_for_thing("the thing");
    /// if let Some(headers) = e.http_headers() {
    ///     if let Some(id) = headers.get("x-global-transaction-id") {
    ///         println!("include this in any support requests {id:?}");
    ///     }
    /// }
    ///
    /// fn search_for_thing(name: &str) -> Error {
    ///     # let mut map = http::HeaderMap::new();
    ///     # map.insert("x-global-transaction-id", http::HeaderValue::from_static("placeholder"));
    ///     # Error::service_with_http_metadata(ServiceError::new("NOT FOUND"), Some(404), Some(map))
    /// }
    /// ```
    ///
    /// Many errors do not have this information, e.g. errors detected before
    /// the request is sent, or timeouts.
    pub fn http_headers(&self) -> Option<&HeaderMap> {
        match &self.kind {
            ErrorKind::Transport(d) => d.as_ref().headers.as_ref(),
            ErrorKind::Service(d) => d.as_ref().headers.as_ref(),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.kind, &self.source) {
            (ErrorKind::Binding, Some(e)) => write!(f, "cannot send the request: {e}"),
            (ErrorKind::Serialization, Some(e)) => write!(f, "cannot serialize the request {e}"),
            (ErrorKind::Deserialization, Some(e)) => {
                write!(f, "cannot deserialize the response {e}")
            }
            (ErrorKind::Timeout, Some(e)) => {
                write!(f, "the request exceeded the request deadline {e}")
            }
            (ErrorKind::Transport(_), Some(e)) => {
                write!(f, "the transport reports an error: {e}")
            }
            (ErrorKind::Service(d), _) => match d.error.code() {
                Some(code) => write!(
                    f,
                    "the service reports an error with code {code} described as: {}",
                    d.error.message()
                ),
                None => write!(
                    f,
                    "the service reports an error described as: {}",
                    d.error.message()
                ),
            },
            (_, None) => unreachable!("no constructor allows this"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &dyn std::error::Error)
    }
}

/// The type of error held by an [Error] instance.
#[derive(Debug)]
enum ErrorKind {
    Binding,
    Serialization,
    Deserialization,
    Timeout,
    Transport(Box<TransportDetails>),
    Service(Box<ServiceDetails>),
}

#[derive(Debug)]
struct TransportDetails {
    headers: Option<HeaderMap>,
}

#[derive(Debug)]
struct ServiceDetails {
    status_code: Option<u16>,
    headers: Option<HeaderMap>,
    error: ServiceError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use serde_json::json;
    use std::error::Error as StdError;

    #[test]
    fn service() {
        let details = ServiceError::new("NOT FOUND")
            .set_code(404)
            .set_field("fake_key", "fake_value")
            .set_transaction_id("tx-1");
        let error = Error::service(details.clone());
        assert!(error.source().is_none(), "{error:?}");
        assert!(error.is_service(), "{error:?}");
        assert_eq!(error.service_error(), Some(&details));
        assert_eq!(error.message(), "NOT FOUND");
        assert_eq!(error.code(), Some(404));
        assert_eq!(error.field("fake_key"), Some(&json!("fake_value")));
        assert_eq!(error.transaction_id(), Some("tx-1"));
        assert!(error.to_string().contains("NOT FOUND"), "{error}");
        assert!(error.to_string().contains("404"), "{error}");
        assert!(error.http_status_code().is_none(), "{error:?}");
        assert!(error.http_headers().is_none(), "{error:?}");
        assert!(!error.is_unauthorized(), "{error:?}");
        assert!(!error.is_binding(), "{error:?}");
        assert!(!error.is_transport(), "{error:?}");
    }

    #[test]
    fn service_without_code() {
        let error = Error::service(ServiceError::new("uh-oh"));
        assert_eq!(error.code(), None);
        assert!(error.to_string().contains("uh-oh"), "{error}");
    }

    #[test]
    fn service_with_http_metadata() {
        let mut headers = HeaderMap::new();
        headers.insert(TRANSACTION_ID_HEADER, HeaderValue::from_static("tx-2"));
        let error = Error::service_with_http_metadata(
            ServiceError::new("Unauthorized").set_code(401),
            Some(401),
            Some(headers.clone()),
        );
        assert_eq!(error.http_status_code(), Some(401));
        assert_eq!(error.http_headers(), Some(&headers));
        assert!(error.is_unauthorized(), "{error:?}");
        // The service error does not carry its own transaction id here.
        assert_eq!(error.transaction_id(), None);
    }

    #[test]
    fn unauthorized_from_code() {
        let error = Error::service(ServiceError::new("invalid-api-key").set_code(401));
        assert!(error.is_unauthorized(), "{error:?}");
        let error = Error::service_with_http_metadata(ServiceError::new("x"), Some(403), None);
        assert!(error.is_unauthorized(), "{error:?}");
    }

    #[test]
    fn binding() {
        let error = Error::binding(MissingParametersError::new(["a", "b"]));
        assert!(error.is_binding(), "{error:?}");
        assert!(error.source().is_some(), "{error:?}");
        assert_eq!(error.message(), "Missing required parameters: a, b");
        assert!(
            error
                .to_string()
                .contains("Missing required parameters: a, b"),
            "{error}"
        );
        let missing = error.missing_parameters().unwrap();
        assert_eq!(missing.names(), &["a", "b"]);
        assert!(error.code().is_none(), "{error:?}");
        assert!(error.service_error().is_none(), "{error:?}");
    }

    #[test]
    fn binding_other_source() {
        let error = Error::binding("some other problem");
        assert!(error.is_binding(), "{error:?}");
        assert!(error.missing_parameters().is_none(), "{error:?}");
    }

    #[test]
    fn timeout() {
        let error = Error::timeout("simulated");
        assert!(error.is_timeout(), "{error:?}");
        assert!(error.source().is_some(), "{error:?}");
        assert!(error.to_string().contains("simulated"), "{error}");
        assert!(error.message().contains("simulated"), "{error}");
        assert!(error.http_headers().is_none(), "{error:?}");
        assert!(error.http_status_code().is_none(), "{error:?}");
        assert!(error.service_error().is_none(), "{error:?}");
    }

    #[test]
    fn ser() {
        let error = Error::ser("simulated");
        assert!(error.is_serialization(), "{error:?}");
        assert!(error.to_string().contains("simulated"), "{error}");
        assert!(!error.is_deserialization(), "{error:?}");
    }

    #[test]
    fn deser() {
        let error = Error::deser("simulated");
        assert!(error.is_deserialization(), "{error:?}");
        assert!(error.to_string().contains("simulated"), "{error}");
        assert!(!error.is_serialization(), "{error:?}");
    }

    #[test]
    fn io() {
        let source = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let error = Error::io(source);
        assert!(error.is_io(), "{error:?}");
        assert!(error.is_transport(), "{error:?}");
        assert!(error.to_string().contains("reset"), "{error}");
        let got = error
            .source()
            .and_then(|e| e.downcast_ref::<std::io::Error>())
            .map(|e| e.kind());
        assert_eq!(got, Some(std::io::ErrorKind::ConnectionReset));
        assert!(error.transaction_id().is_none(), "{error:?}");
    }

    #[test]
    fn transport() {
        let mut headers = HeaderMap::new();
        headers.insert(TRANSACTION_ID_HEADER, HeaderValue::from_static("tx-3"));
        let error = Error::transport(headers.clone(), "connection dropped");
        assert!(error.is_transport(), "{error:?}");
        assert!(!error.is_io(), "{error:?}");
        assert_eq!(error.http_headers(), Some(&headers));
        assert_eq!(error.transaction_id(), Some("tx-3"));
        assert!(error.http_status_code().is_none(), "{error:?}");
    }
}

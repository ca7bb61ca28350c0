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

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use gax::client_builder::Error as BuilderError;
use http::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};

pub use gax::credentials::Credentials;

// The client configuration for [crate::http::ReqwestClient].
pub type ClientConfig = gax::client_builder::internal::ClientConfig<Credentials>;

pub(crate) const LOGGING_VAR: &str = "WATSON_RUST_LOGGING";

pub const TOKEN_HEADER: &str = "x-watson-authorization-token";
pub const LEARNING_OPT_OUT_HEADER: &str = "x-watson-learning-opt-out";
pub const API_KEY_PARAMETER: &str = "apikey";

/// Information about the service, used to find the endpoint and credentials,
/// and for instrumentation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ServiceInfo {
    /// The short service name, e.g., "tone_analyzer", "speech_to_text".
    pub service_name: &'static str,
    /// The API version, e.g., "v1".
    pub service_version: &'static str,
    /// The endpoint used when the application does not configure one.
    pub default_endpoint: &'static str,
}

// Returns true if the environment or client configuration enables tracing.
pub fn tracing_enabled(config: &ClientConfig) -> bool {
    if config.tracing {
        return true;
    }
    std::env::var(LOGGING_VAR)
        .map(|v| v == "true")
        .unwrap_or(false)
}

/// The per-client defaults, merged into every request.
///
/// Created once when the client is built, then shared (and never modified)
/// by all the requests.
#[derive(Clone, Debug)]
pub struct DefaultOptions {
    pub service: ServiceInfo,
    pub endpoint: String,
    pub headers: HeaderMap,
    pub query: Map<String, Value>,
    pub telemetry: bool,
}

impl DefaultOptions {
    /// Creates the defaults, looking up missing configuration in the process
    /// environment.
    pub fn new(config: ClientConfig, service: ServiceInfo) -> gax::client_builder::Result<Self> {
        Self::with_env(config, service, |name| std::env::var(name).ok())
    }

    pub fn with_env<E>(
        config: ClientConfig,
        service: ServiceInfo,
        env: E,
    ) -> gax::client_builder::Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let cred = crate::credentials::resolve(config.cred, &service, &env)?;
        let endpoint = crate::credentials::endpoint(config.endpoint, &service, &env);

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(BuilderError::transport)?;
            let value = HeaderValue::from_str(value).map_err(BuilderError::transport)?;
            headers.insert(name, value);
        }
        if config.learning_opt_out {
            headers.insert(LEARNING_OPT_OUT_HEADER, HeaderValue::from_static("true"));
        }

        let mut query = config.query;
        match cred {
            Credentials::Basic { username, password } => {
                let encoded = BASE64_STANDARD.encode(format!("{username}:{password}"));
                let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
                    .map_err(BuilderError::cred)?;
                value.set_sensitive(true);
                headers.insert(http::header::AUTHORIZATION, value);
            }
            Credentials::Token(token) => {
                let mut value = HeaderValue::from_str(&token).map_err(BuilderError::cred)?;
                value.set_sensitive(true);
                headers.insert(TOKEN_HEADER, value);
            }
            Credentials::ApiKey(key) => {
                query
                    .entry(API_KEY_PARAMETER)
                    .or_insert_with(|| Value::String(key));
            }
            Credentials::Unauthenticated => {}
            _ => return Err(BuilderError::cred("unsupported credentials type")),
        }

        Ok(Self {
            service,
            endpoint,
            headers,
            query,
            telemetry: config.telemetry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoped_env::ScopedEnv;
    use serde_json::json;

    const SERVICE: ServiceInfo = ServiceInfo {
        service_name: "speech-to-text",
        service_version: "v1",
        default_endpoint: "https://stream.watsonplatform.net/speech-to-text/api",
    };

    fn no_env(_: &str) -> Option<String> {
        None
    }

    // This test must run serially because it manipulates the environment.
    #[test]
    #[serial_test::serial]
    fn config_tracing() {
        let _e = ScopedEnv::remove(LOGGING_VAR);
        let config = ClientConfig::default();
        assert!(!tracing_enabled(&config), "expected tracing to be disabled");
        let mut config = ClientConfig::default();
        config.tracing = true;
        let config = config;
        assert!(tracing_enabled(&config), "expected tracing to be enabled");

        let _e = ScopedEnv::set(LOGGING_VAR, "true");
        let config = ClientConfig::default();
        assert!(tracing_enabled(&config), "expected tracing to be enabled");

        let _e = ScopedEnv::set(LOGGING_VAR, "not-true");
        let config = ClientConfig::default();
        assert!(!tracing_enabled(&config), "expected tracing to be disabled");
    }

    #[test]
    fn basic() -> anyhow::Result<()> {
        let mut config = ClientConfig::default();
        config.cred = Some(Credentials::basic("user", "pass"));
        let got = DefaultOptions::with_env(config, SERVICE, no_env)?;
        let auth = got.headers.get(http::header::AUTHORIZATION);
        assert_eq!(
            auth.map(HeaderValue::as_bytes),
            Some("Basic dXNlcjpwYXNz".as_bytes())
        );
        assert!(auth.is_some_and(HeaderValue::is_sensitive), "{got:?}");
        assert!(got.query.is_empty(), "{got:?}");
        assert_eq!(got.endpoint, SERVICE.default_endpoint);
        assert_eq!(got.service, SERVICE);
        assert!(got.telemetry);
        Ok(())
    }

    #[test]
    fn token() -> anyhow::Result<()> {
        let mut config = ClientConfig::default();
        config.cred = Some(Credentials::token("abc"));
        let got = DefaultOptions::with_env(config, SERVICE, no_env)?;
        assert_eq!(
            got.headers.get(TOKEN_HEADER).map(HeaderValue::as_bytes),
            Some("abc".as_bytes())
        );
        assert!(got.headers.get(http::header::AUTHORIZATION).is_none());
        Ok(())
    }

    #[test]
    fn api_key() -> anyhow::Result<()> {
        let mut config = ClientConfig::default();
        config.cred = Some(Credentials::api_key("key"));
        config.query.insert("version".into(), json!("2018-03-19"));
        let got = DefaultOptions::with_env(config, SERVICE, no_env)?;
        assert_eq!(
            Value::Object(got.query),
            json!({"version": "2018-03-19", "apikey": "key"})
        );
        assert!(got.headers.is_empty(), "{:?}", got.headers);
        Ok(())
    }

    #[test]
    fn from_env() -> anyhow::Result<()> {
        let env = |name: &str| match name {
            "SPEECH_TO_TEXT_USERNAME" => Some("u".to_string()),
            "SPEECH_TO_TEXT_PASSWORD" => Some("p".to_string()),
            "SPEECH_TO_TEXT_URL" => Some("https://private.example.com/api/".to_string()),
            _ => None,
        };
        let got = DefaultOptions::with_env(ClientConfig::default(), SERVICE, env)?;
        assert!(got.headers.contains_key(http::header::AUTHORIZATION));
        assert_eq!(got.endpoint, "https://private.example.com/api");
        Ok(())
    }

    #[test]
    fn missing_credentials() {
        let err = DefaultOptions::with_env(ClientConfig::default(), SERVICE, no_env).unwrap_err();
        assert!(err.is_credentials(), "{err:?}");
    }

    #[test]
    fn headers() -> anyhow::Result<()> {
        let mut config = ClientConfig::default();
        config.cred = Some(Credentials::Unauthenticated);
        config.headers = vec![
            ("X-Custom".into(), "a".into()),
            ("x-custom".into(), "b".into()),
        ];
        config.learning_opt_out = true;
        config.telemetry = false;
        let got = DefaultOptions::with_env(config, SERVICE, no_env)?;
        assert_eq!(
            got.headers.get("x-custom").map(HeaderValue::as_bytes),
            Some("b".as_bytes())
        );
        assert_eq!(
            got.headers
                .get(LEARNING_OPT_OUT_HEADER)
                .map(HeaderValue::as_bytes),
            Some("true".as_bytes())
        );
        assert!(!got.telemetry);
        Ok(())
    }

    #[test]
    fn bad_header() {
        let mut config = ClientConfig::default();
        config.cred = Some(Credentials::Unauthenticated);
        config.headers = vec![("bad header".into(), "a".into())];
        let err = DefaultOptions::with_env(config, SERVICE, no_env).unwrap_err();
        assert!(err.is_transport(), "{err:?}");
    }
}

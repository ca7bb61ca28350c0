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

//! Resolves the credentials and endpoint of a client.
//!
//! Applications may configure the credentials and endpoint explicitly. If they
//! do not, the client looks up environment variables named after the service,
//! e.g. `TONE_ANALYZER_USERNAME`, `TONE_ANALYZER_PASSWORD`,
//! `TONE_ANALYZER_API_KEY`, and `TONE_ANALYZER_URL`.

use crate::options::ServiceInfo;
use gax::client_builder::Error as BuilderError;
use gax::credentials::Credentials;

/// The credentials could not be found in the environment.
#[derive(thiserror::Error, Debug)]
#[error(
    "username and password are required unless the client uses `Credentials::Unauthenticated`, \
    set {prefix}_USERNAME and {prefix}_PASSWORD, or {prefix}_API_KEY, or configure the credentials in the client builder"
)]
pub struct MissingCredentialsError {
    prefix: String,
}

/// The prefix for the environment variables of `service`.
///
/// # Example
/// ```
/// # use watson_gax_internal::credentials::env_prefix;
/// assert_eq!(env_prefix("speech-to-text"), "SPEECH_TO_TEXT");
/// ```
pub fn env_prefix(service_name: &str) -> String {
    service_name.to_uppercase().replace('-', "_")
}

/// Returns the configured credentials, or finds them in the environment.
pub fn resolve<E>(
    cred: Option<Credentials>,
    service: &ServiceInfo,
    env: E,
) -> gax::client_builder::Result<Credentials>
where
    E: Fn(&str) -> Option<String>,
{
    if let Some(c) = cred {
        return Ok(c);
    }
    let prefix = env_prefix(service.service_name);
    let username = env(&format!("{prefix}_USERNAME"));
    let password = env(&format!("{prefix}_PASSWORD"));
    if let (Some(username), Some(password)) = (username, password) {
        return Ok(Credentials::basic(username, password));
    }
    if let Some(key) = env(&format!("{prefix}_API_KEY")) {
        return Ok(Credentials::api_key(key));
    }
    Err(BuilderError::cred(MissingCredentialsError { prefix }))
}

/// Returns the configured endpoint, the endpoint in the environment, or the
/// service default, without any trailing `/`.
pub fn endpoint<E>(endpoint: Option<String>, service: &ServiceInfo, env: E) -> String
where
    E: Fn(&str) -> Option<String>,
{
    let endpoint = endpoint
        .or_else(|| env(&format!("{}_URL", env_prefix(service.service_name))))
        .unwrap_or_else(|| service.default_endpoint.to_string());
    match endpoint.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => endpoint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use test_case::test_case;

    const SERVICE: ServiceInfo = ServiceInfo {
        service_name: "tone-analyzer",
        service_version: "v3",
        default_endpoint: "https://gateway.watsonplatform.net/tone-analyzer/api",
    };

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn explicit() -> anyhow::Result<()> {
        let got = resolve(
            Some(Credentials::token("t")),
            &SERVICE,
            env(&[("TONE_ANALYZER_API_KEY", "k")]),
        )?;
        assert_eq!(got, Credentials::token("t"));
        Ok(())
    }

    #[test]
    fn basic_from_env() -> anyhow::Result<()> {
        let got = resolve(
            None,
            &SERVICE,
            env(&[
                ("TONE_ANALYZER_USERNAME", "user"),
                ("TONE_ANALYZER_PASSWORD", "pass"),
                ("TONE_ANALYZER_API_KEY", "k"),
            ]),
        )?;
        assert_eq!(got, Credentials::basic("user", "pass"));
        Ok(())
    }

    #[test]
    fn api_key_from_env() -> anyhow::Result<()> {
        let got = resolve(
            None,
            &SERVICE,
            env(&[
                ("TONE_ANALYZER_USERNAME", "user"),
                ("TONE_ANALYZER_API_KEY", "k"),
            ]),
        )?;
        assert_eq!(got, Credentials::api_key("k"));
        Ok(())
    }

    #[test]
    fn missing() {
        let err = resolve(None, &SERVICE, env(&[])).unwrap_err();
        assert!(err.is_credentials(), "{err:?}");
        let source = std::error::Error::source(&err)
            .map(ToString::to_string)
            .unwrap_or_default();
        assert!(source.contains("TONE_ANALYZER_USERNAME"), "{source}");
        assert!(source.contains("TONE_ANALYZER_API_KEY"), "{source}");
        assert!(source.contains("Credentials::Unauthenticated"), "{source}");
        assert!(!source.contains("use_unauthenticated"), "{source}");
    }

    #[test_case(Some("https://explicit/api/"), &[("TONE_ANALYZER_URL", "https://env")], "https://explicit/api"; "explicit")]
    #[test_case(None, &[("TONE_ANALYZER_URL", "https://env/api/")], "https://env/api"; "environment")]
    #[test_case(None, &[], "https://gateway.watsonplatform.net/tone-analyzer/api"; "default")]
    #[test_case(Some("https://explicit//"), &[], "https://explicit/"; "single slash stripped")]
    fn endpoints(explicit: Option<&str>, vars: &[(&str, &str)], want: &str) {
        let got = endpoint(explicit.map(str::to_string), &SERVICE, env(vars));
        assert_eq!(got, want);
    }
}

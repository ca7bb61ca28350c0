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

//! Types to configure the authentication credentials.
//!
//! Watson services accept several kinds of credentials. The client libraries
//! send the credentials with each request, they do not exchange them for
//! tokens. Applications that need tokens must obtain them separately, and
//! configure the client with [Credentials::Token].
//!
//! When a client is built without explicit credentials, the client libraries
//! look for them in the environment, using variables derived from the service
//! name. For example, for the `tone_analyzer` service:
//!
//! - `TONE_ANALYZER_USERNAME` and `TONE_ANALYZER_PASSWORD`, or
//! - `TONE_ANALYZER_API_KEY`.

/// The credentials used to authenticate with a Watson service.
///
/// # Example
/// ```
/// # use watson_gax::credentials::Credentials;
/// let creds = Credentials::basic("my-username", "my-password");
/// assert!(matches!(creds, Credentials::Basic { .. }));
/// // Secrets are never included in the debug output.
/// assert!(!format!("{creds:?}").contains("my-password"));
/// ```
#[derive(Clone, PartialEq)]
#[non_exhaustive]
pub enum Credentials {
    /// Send a HTTP basic `Authorization` header.
    Basic { username: String, password: String },
    /// Send the token in the `X-Watson-Authorization-Token` header.
    Token(String),
    /// Send the key in the `apikey` query parameter.
    ApiKey(String),
    /// Do not send any credentials.
    ///
    /// Some services, and most test environments, do not require
    /// authentication.
    Unauthenticated,
}

impl Credentials {
    /// Creates basic (username and password) credentials.
    pub fn basic<U, P>(username: U, password: P) -> Self
    where
        U: Into<String>,
        P: Into<String>,
    {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates credentials from an access token.
    pub fn token<T: Into<String>>(v: T) -> Self {
        Self::Token(v.into())
    }

    /// Creates credentials from an API key.
    pub fn api_key<T: Into<String>>(v: T) -> Self {
        Self::ApiKey(v.into())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const CENSORED: &str = "[censored]";
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &CENSORED)
                .finish(),
            Self::Token(_) => f.debug_tuple("Token").field(&CENSORED).finish(),
            Self::ApiKey(_) => f.debug_tuple("ApiKey").field(&CENSORED).finish(),
            Self::Unauthenticated => f.write_str("Unauthenticated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Credentials::basic("user", "secret"))]
    #[test_case(Credentials::token("secret"))]
    #[test_case(Credentials::api_key("secret"))]
    fn debug_is_censored(creds: Credentials) {
        let got = format!("{creds:?}");
        assert!(!got.contains("secret"), "{got}");
        assert!(got.contains("[censored]"), "{got}");
    }

    #[test]
    fn debug_basic_shows_username() {
        let got = format!("{:?}", Credentials::basic("user", "secret"));
        assert!(got.contains("user"), "{got}");
    }

    #[test]
    fn constructors() {
        assert_eq!(
            Credentials::basic("u", "p"),
            Credentials::Basic {
                username: "u".into(),
                password: "p".into()
            }
        );
        assert_eq!(Credentials::token("t"), Credentials::Token("t".into()));
        assert_eq!(Credentials::api_key("k"), Credentials::ApiKey("k".into()));
        assert_eq!(
            format!("{:?}", Credentials::Unauthenticated),
            "Unauthenticated"
        );
    }
}

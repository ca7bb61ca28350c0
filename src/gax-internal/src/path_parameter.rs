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

//! Substitution of path parameters into URL templates.
//!
//! URL templates contain `{name}` placeholders. Each placeholder is replaced
//! by the percent-encoded value of the corresponding path parameter.
//! Placeholders without a value are left unchanged: some operations use
//! partially specified templates.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::collections::BTreeMap;

/// The characters escaped in path and query values.
///
/// Matches the set used by ECMAScript's `encodeURIComponent()`, which the
/// Watson services expect.
pub(crate) const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Replaces each `{name}` placeholder in `template`.
///
/// # Example
/// ```
/// # use watson_gax_internal::path_parameter::resolve;
/// # use std::collections::BTreeMap;
/// let params = BTreeMap::from([("id".to_string(), "a b/c".to_string())]);
/// assert_eq!(resolve("/v1/models/{id}", &params), "/v1/models/a%20b%2Fc");
/// assert_eq!(resolve("/v1/models/{other}", &params), "/v1/models/{other}");
/// ```
pub fn resolve(template: &str, params: &BTreeMap<String, String>) -> String {
    let mut resolved = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        resolved.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            resolved.push_str(&rest[open..]);
            return resolved;
        };
        let name = &after[..close];
        match params.get(name) {
            Some(value) => resolved.extend(utf8_percent_encode(value, URI_COMPONENT)),
            None => {
                tracing::debug!("no value for path placeholder {{{name}}} in {template}");
                resolved.push_str(&rest[open..open + close + 2]);
            }
        }
        rest = &after[close + 1..];
    }
    resolved.push_str(rest);
    resolved
}

/// Prefixes relative paths (those starting with `/`) with `endpoint`.
///
/// # Example
/// ```
/// # use watson_gax_internal::path_parameter::with_endpoint;
/// let endpoint = "https://gateway.watsonplatform.net/tone-analyzer/api";
/// assert_eq!(
///     with_endpoint(endpoint, "/v3/tone".to_string()),
///     "https://gateway.watsonplatform.net/tone-analyzer/api/v3/tone");
/// assert_eq!(
///     with_endpoint(endpoint, "https://example.com/v1".to_string()),
///     "https://example.com/v1");
/// ```
pub fn with_endpoint(endpoint: &str, path: String) -> String {
    if path.starts_with('/') {
        return format!("{endpoint}{path}");
    }
    path
}

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

//! Defines traits and helpers to serialize query parameters.
//!
//! Query parameters in the Watson APIs can be strings, numbers, booleans, or
//! lists of these. Lists are sent as repeated keys (`a=1&a=2`), not as JSON.
//! Objects are rare, they are sent as JSON text.
//!
//! The types are not intended for application developers to use. They are
//! public because we will generate many crates (roughly one per service), and
//! most of these crates will use these helpers.

use crate::path_parameter::URI_COMPONENT;
use percent_encoding::utf8_percent_encode;
use serde_json::{Map, Value};

/// The Watson services reject the token if it is percent-encoded.
const VERBATIM_KEY: &str = "watson-token";

/// [QueryParameter] is a trait representing types that can be used as a query
/// parameter.
pub trait QueryParameter {
    fn add(self, pairs: &mut Vec<(String, String)>, name: &str);
}

impl QueryParameter for Value {
    fn add(self, pairs: &mut Vec<(String, String)>, name: &str) {
        match self {
            Self::Array(array) => array.into_iter().for_each(|v| match v {
                Self::Array(_) => pairs.push((name.to_string(), v.to_string())),
                v => v.add(pairs, name),
            }),
            Self::Null => {}
            Self::String(s) => pairs.push((name.to_string(), s)),
            Self::Number(n) => pairs.push((name.to_string(), n.to_string())),
            Self::Bool(b) => pairs.push((name.to_string(), b.to_string())),
            Self::Object(_) => pairs.push((name.to_string(), self.to_string())),
        }
    }
}

/// Merges the client default query parameters with the request parameters.
///
/// Request parameters override the defaults with the same name.
pub fn merge(defaults: &Map<String, Value>, query: Map<String, Value>) -> Map<String, Value> {
    let mut merged = defaults.clone();
    merged.extend(query);
    merged
}

/// Flattens the query parameters into (name, value) pairs.
///
/// # Example
/// ```
/// # use watson_gax_internal::query_parameter::to_pairs;
/// let query = serde_json::json!({"voice": "en-US_AllisonVoice", "ids": ["a", "b"], "skip": null});
/// let pairs = to_pairs(query.as_object().cloned().unwrap());
/// assert_eq!(pairs.len(), 3);
/// ```
pub fn to_pairs(query: Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (name, value) in query {
        value.add(&mut pairs, &name);
    }
    pairs
}

/// Encodes the pairs as a query string, without the leading `?`.
///
/// # Example
/// ```
/// # use watson_gax_internal::query_parameter::encode;
/// let pairs = vec![
///     ("text".to_string(), "a b&c".to_string()),
///     ("watson-token".to_string(), "x/y=".to_string()),
/// ];
/// assert_eq!(encode(&pairs), "text=a%20b%26c&watson-token=x/y=");
/// ```
pub fn encode(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| {
            let key = utf8_percent_encode(k, URI_COMPONENT);
            if k == VERBATIM_KEY {
                format!("{key}={v}")
            } else {
                format!("{key}={}", utf8_percent_encode(v, URI_COMPONENT))
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Appends the encoded query string to `url`.
pub fn append(url: String, pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return url;
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{}", encode(pairs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    fn pairs(p: &[(&str, &str)]) -> Vec<(String, String)> {
        p.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn scalars() {
        let got = to_pairs(map(json!({
            "a": 123,
            "b": "abc",
            "c": true,
            "d": 1.5,
            "e": null,
        })));
        assert_eq!(
            got,
            pairs(&[("a", "123"), ("b", "abc"), ("c", "true"), ("d", "1.5")])
        );
    }

    #[test]
    fn array() {
        let got = to_pairs(map(json!({"name": [1, "two", null, false]})));
        assert_eq!(
            got,
            pairs(&[("name", "1"), ("name", "two"), ("name", "false")])
        );
    }

    #[test]
    fn nested() {
        let got = to_pairs(map(json!({"o": {"k": [1, 2]}, "a": [[1, 2], {"x": 1}]})));
        assert_eq!(
            got,
            pairs(&[("a", "[1,2]"), ("a", r#"{"x":1}"#), ("o", r#"{"k":[1,2]}"#)])
        );
    }

    #[test]
    fn merge_defaults() {
        let defaults = map(json!({"version": "2017-09-21", "apikey": "k"}));
        let query = map(json!({"version": "2018-01-01", "text": "hi"}));
        let got = merge(&defaults, query);
        assert_eq!(
            got,
            map(json!({"version": "2018-01-01", "apikey": "k", "text": "hi"}))
        );
        assert_eq!(defaults.get("version"), Some(&json!("2017-09-21")));
    }

    #[test]
    fn encoding() {
        let got = encode(&pairs(&[
            ("q", "enriched_text.entities.text:\"IBM\""),
            ("filter", "a,b"),
            ("space key", "v"),
            ("unicode", "ñ"),
        ]));
        assert_eq!(
            got,
            "q=enriched_text.entities.text%3A%22IBM%22&filter=a%2Cb&space%20key=v&unicode=%C3%B1"
        );
    }

    #[test]
    fn watson_token_is_verbatim() {
        let got = encode(&pairs(&[("watson-token", "a+b/c=="), ("other", "a+b/c==")]));
        assert_eq!(got, "watson-token=a+b/c==&other=a%2Bb%2Fc%3D%3D");
    }

    #[test]
    fn append_to_url() {
        let p = pairs(&[("a", "1"), ("a", "2")]);
        assert_eq!(append("https://h/v1".to_string(), &p), "https://h/v1?a=1&a=2");
        assert_eq!(
            append("https://h/v1?x=y".to_string(), &p),
            "https://h/v1?x=y&a=1&a=2"
        );
        assert_eq!(append("https://h/v1".to_string(), &[]), "https://h/v1");
    }
}

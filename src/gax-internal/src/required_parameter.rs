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

//! Validation of required parameters.
//!
//! Each operation declares its required parameters. Requests missing any of
//! them fail before any network activity, with an error listing all the
//! missing names.

use crate::request::{Body, FormValue, RequestDescriptor};
use gax::error::binding::MissingParametersError;
use serde_json::{Map, Value};

/// A bag of parameters that can be checked for required names.
pub trait ParameterBag {
    /// Returns true if `name` is set to a non-empty value.
    fn is_present(&self, name: &str) -> bool;
}

/// Returns the missing parameters, in the order given by `required`.
///
/// # Example
/// ```
/// # use watson_gax_internal::required_parameter::validate;
/// let bag = serde_json::json!({"a": "set", "b": null, "c": ""});
/// let bag = bag.as_object().unwrap();
/// let missing = validate(bag, &["a", "b", "c", "d"]).unwrap();
/// assert_eq!(missing.names(), &["b", "c", "d"]);
/// ```
pub fn validate<B, S>(bag: &B, required: &[S]) -> Option<MissingParametersError>
where
    B: ParameterBag + ?Sized,
    S: AsRef<str>,
{
    let missing: Vec<&str> = required
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !bag.is_present(name))
        .collect();
    if missing.is_empty() {
        return None;
    }
    Some(MissingParametersError::new(missing))
}

/// Validates a descriptor, returning a binding error if any required
/// parameter is missing.
pub fn check(descriptor: &RequestDescriptor) -> gax::Result<()> {
    match validate(descriptor, &descriptor.required_params) {
        None => Ok(()),
        Some(e) => Err(gax::error::Error::binding(e)),
    }
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

impl ParameterBag for Map<String, Value> {
    fn is_present(&self, name: &str) -> bool {
        self.get(name).is_some_and(is_set)
    }
}

impl ParameterBag for RequestDescriptor {
    fn is_present(&self, name: &str) -> bool {
        if let Some(original) = &self.original_params {
            return original.is_present(name);
        }
        if self.path.get(name).is_some_and(|v| !v.is_empty()) {
            return true;
        }
        if self.query.is_present(name) || self.form.is_present(name) {
            return true;
        }
        if let Some(Body::Json(Value::Object(body))) = &self.body {
            if body.is_present(name) {
                return true;
            }
        }
        match self.form_data.get(name) {
            Some(FormValue::Json(v)) => is_set(v),
            Some(FormValue::File(f)) => f.data.is_some(),
            None => false,
        }
    }
}

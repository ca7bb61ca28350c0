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

/// One or more required parameters were not set.
///
/// Each Watson operation declares the parameters it requires. The client
/// library checks them before sending the request; when any of them is
/// missing (not set, `null`, or empty) the request fails locally and never
/// reaches the network.
///
/// The names are reported in the order the operation declares them.
///
/// # Example
/// ```
/// # use watson_gax::error::binding::MissingParametersError;
/// let e = MissingParametersError::new(["workspace_id", "text"]);
/// assert_eq!(e.to_string(), "Missing required parameters: workspace_id, text");
/// ```
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("Missing required parameters: {}", .names.join(", "))]
pub struct MissingParametersError {
    names: Vec<String>,
}

impl MissingParametersError {
    /// Creates a new error from the missing parameter names.
    pub fn new<I, V>(names: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// The names of the missing parameters, in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

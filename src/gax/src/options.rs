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

//! Per request options.
//!
//! While the client library defaults are intended to work for most
//! applications, it is sometimes necessary to change the behavior of a single
//! request. Applications sometimes add headers to a specific call, or change
//! its timeout.

use std::time::Duration;

/// A set of options configuring a single request.
///
/// # Example
/// ```
/// # use watson_gax::options::RequestOptions;
/// # use std::time::Duration;
/// let mut options = RequestOptions::default();
/// options.set_header("X-Watson-Metadata", "customer_id=abc");
/// options.set_attempt_timeout(Duration::from_secs(30));
/// assert_eq!(options.headers().len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestOptions {
    headers: Vec<(String, String)>,
    attempt_timeout: Option<Duration>,
}

impl RequestOptions {
    /// Adds a header to the request.
    ///
    /// Headers set here override any headers with the same name configured
    /// in the client or declared by the operation. Header names are case
    /// insensitive.
    pub fn set_header<K, V>(&mut self, name: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers.push((name.into(), value.into()));
    }

    /// Gets the headers added to this request.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Sets the timeout for the request.
    ///
    /// The client libraries never retry requests, this is the timeout for
    /// the single attempt made.
    pub fn set_attempt_timeout<T: Into<Duration>>(&mut self, v: T) {
        self.attempt_timeout = Some(v.into());
    }

    /// Gets the current timeout.
    pub fn attempt_timeout(&self) -> &Option<Duration> {
        &self.attempt_timeout
    }
}

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

mod core_error;
pub use core_error::*;

/// Errors detected while validating the request parameters.
///
/// These errors occur when required parameters are missing from a request.
/// The client fails these requests locally, they never reach the network.
pub mod binding;

/// Errors reported by the Watson services.
///
/// The services report errors using a number of different encodings: plain
/// HTTP status codes, error envelopes embedded in the response body, and
/// (for some older services) status fields in an otherwise successful
/// response. The client libraries normalize all of them into a
/// [ServiceError][service_error::ServiceError].
///
/// # Examples
///
/// ```
/// # use watson_gax::error;
/// use error::Error;
/// fn handle_error(e: Error) {
///     if let Some(service) = e.service_error() {
///         println!("the service reported {} with code {:?}", service.message(), service.code())
///     }
/// }
/// ```
pub mod service_error;

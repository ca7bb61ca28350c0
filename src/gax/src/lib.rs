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

//! Watson Developer Cloud helpers.
//!
//! This crate contains the types shared by every client in the Watson
//! Developer Cloud Client Libraries for Rust: the error type returned by all
//! requests, the response wrapper, per-request options, and the client
//! builder.
//!
//! <div class="warning">
//! All the types, traits, and functions gated by the <code>_internal-semver</code>
//! feature are <b>not</b> intended for general use. We (the Watson Developer
//! Cloud Client Libraries for Rust team) control both sides of these APIs and
//! will change them if needed.
//! </div>

/// An alias of [std::result::Result] where the error is always [crate::error::Error].
///
/// This is the result type used by all functions making requests.
pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// The core error types used by generated clients.
pub mod error;

pub mod client_builder;
pub mod credentials;
pub mod options;
pub mod response;

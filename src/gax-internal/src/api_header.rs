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

//! Telemetry header helpers.

use crate::options::ServiceInfo;

pub const ANALYTICS: &str = "x-ibmcloud-sdk-analytics";

mod build_info {
    // The file has been placed there by the build script.
    include!(concat!(env!("OUT_DIR"), "/build_env.rs"));

    pub(crate) const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Returns false when the telemetry headers cannot be set.
///
/// Browsers (`wasm32` targets) do not allow setting the `User-Agent` header.
pub fn telemetry_supported() -> bool {
    !cfg!(target_arch = "wasm32")
}

/// The SDK portion of the `User-Agent` header.
pub fn base_user_agent() -> String {
    // Strip out the initial "rustc " string from `RUSTC_VERSION`. If not
    // found, leave RUSTC_VERSION unchanged.
    let rustc_version = build_info::RUSTC_VERSION;
    let rustc_version = rustc_version
        .strip_prefix("rustc ")
        .unwrap_or(build_info::RUSTC_VERSION);
    format!(
        "watson-apis-rust-sdk-{} {} {} rustc/{rustc_version}",
        build_info::PKG_VERSION,
        std::env::consts::OS,
        std::env::consts::ARCH,
    )
}

/// Formats the `User-Agent` header, appending the agent supplied by the
/// caller, if any.
///
/// The separator is always present, the services parse the SDK portion by
/// splitting on `;`.
pub fn user_agent(caller: Option<&str>) -> String {
    format!("{};{}", base_user_agent(), caller.unwrap_or_default())
}

/// Formats the `X-IBMCloud-SDK-Analytics` header.
pub fn analytics(service: &ServiceInfo, operation_id: &str) -> String {
    format!(
        "service_name={};service_version={};operation_id={operation_id};async=true",
        service.service_name, service.service_version
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base() {
        let got = base_user_agent();
        let fields: Vec<&str> = got.split(' ').collect();
        assert_eq!(fields.len(), 4, "{got}");
        assert_eq!(
            fields[0],
            format!("watson-apis-rust-sdk-{}", build_info::PKG_VERSION)
        );
        assert_eq!(fields[1], std::env::consts::OS);
        assert_eq!(fields[2], std::env::consts::ARCH);

        let rustc = fields[3].strip_prefix("rustc/");
        let want = build_info::RUSTC_VERSION;
        assert!(
            rustc.map(|s| want.contains(s) && !s.is_empty()).unwrap_or(false),
            "mismatched rustc version {want} and {got}"
        );
    }

    #[test]
    fn with_caller() {
        let got = user_agent(Some("openwhisk"));
        assert_eq!(got, format!("{};openwhisk", base_user_agent()));
    }

    #[test]
    fn without_caller() {
        let got = user_agent(None);
        assert_eq!(got, format!("{};", base_user_agent()));
        let got = user_agent(Some(""));
        assert_eq!(got, format!("{};", base_user_agent()));
    }

    #[test]
    fn analytics_header() {
        let service = ServiceInfo {
            service_name: "tone_analyzer",
            service_version: "v3",
            default_endpoint: "https://gateway.watsonplatform.net/tone-analyzer/api",
        };
        assert_eq!(
            analytics(&service, "tone"),
            "service_name=tone_analyzer;service_version=v3;operation_id=tone;async=true"
        );
    }

    #[test]
    fn supported() {
        assert!(telemetry_supported());
    }
}

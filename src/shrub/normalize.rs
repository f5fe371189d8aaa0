// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Display forms of the paths of a shrub.
//!
//! Paths are keyed fully qualified. Only when rendered is the host and
//! namespace of the shrub's reference point elided.

use crate::cim::{to_wbem_uri_folded, FormatError, ObjectPath, UriFormat};

/// Copy of `path` without the host and namespace equal to the reference point.
pub fn normalize(path: &ObjectPath, reference_host: &str, reference_namespace: &str) -> ObjectPath {
    let mut normalized = path.clone();
    if normalized
        .host
        .as_deref()
        .is_some_and(|h| h.eq_ignore_ascii_case(reference_host))
    {
        normalized.host = None;
    }
    let reference_namespace = reference_namespace.trim_matches('/');
    if normalized
        .namespace
        .as_deref()
        .is_some_and(|ns| ns.trim_matches('/').eq_ignore_ascii_case(reference_namespace))
    {
        normalized.namespace = None;
    }
    normalized
}

/// Display text of a class path: the bare class name when host and namespace
/// were elided, the standard URI otherwise.
pub fn display_class(
    path: &ObjectPath,
    reference_host: &str,
    reference_namespace: &str,
) -> Result<String, FormatError> {
    let normalized = normalize(path, reference_host, reference_namespace);
    if normalized.host.is_none() && normalized.namespace.is_none() {
        return Ok(normalized.class_name);
    }
    normalized.to_wbem_uri(UriFormat::Standard)
}

/// Normalize `path`, then fold it when longer than `max_len`.
pub fn fold(
    path: &ObjectPath,
    format: UriFormat,
    max_len: usize,
    reference_host: &str,
    reference_namespace: &str,
) -> Result<String, FormatError> {
    let normalized = normalize(path, reference_host, reference_namespace);
    to_wbem_uri_folded(&normalized, format, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cim::DEFAULT_FOLD_WIDTH;

    fn path() -> ObjectPath {
        ObjectPath::instance("TST_Person")
            .with_key("name", "Mike")
            .with_namespace("root/cimv2")
            .with_host("mockhost")
    }

    #[test]
    fn test_normalize_elides_reference_point() {
        let normalized = normalize(&path(), "MOCKHOST", "root/CIMV2");
        assert_eq!(normalized.host, None);
        assert_eq!(normalized.namespace, None);
        assert_eq!(normalized.key_bindings().len(), 1);
    }

    #[test]
    fn test_normalize_ignores_namespace_slashes() {
        let mut slashed = path();
        slashed.namespace = Some("/root/cimv2".to_string());
        assert_eq!(normalize(&slashed, "mockhost", "root/cimv2").namespace, None);
        assert_eq!(normalize(&path(), "mockhost", "/root/cimv2/").namespace, None);
    }

    #[test]
    fn test_normalize_keeps_foreign_parts() {
        let normalized = normalize(&path(), "otherhost", "root/cimv2");
        assert_eq!(normalized.host.as_deref(), Some("mockhost"));
        assert_eq!(normalized.namespace, None);
    }

    #[test]
    fn test_normalize_is_idempotent_and_pure() {
        let original = path();
        let once = normalize(&original, "mockhost", "root/cimv2");
        let twice = normalize(&once, "mockhost", "root/cimv2");
        assert_eq!(once, twice);
        assert_eq!(original.host.as_deref(), Some("mockhost"));
    }

    #[test]
    fn test_display_class() {
        let class = path().class_path();
        assert_eq!(
            display_class(&class, "mockhost", "root/cimv2").unwrap(),
            "TST_Person"
        );
        assert_eq!(
            display_class(&class, "mockhost", "root/interop").unwrap(),
            "/root/cimv2:TST_Person"
        );
    }

    #[test]
    fn test_fold_normalizes_first() {
        let short = ObjectPath::instance("B")
            .with_key("key", 2i64)
            .with_namespace("root/cimv2");
        assert_eq!(
            fold(&short, UriFormat::Standard, DEFAULT_FOLD_WIDTH, "", "root/cimv2").unwrap(),
            "/:B.key=2"
        );

        let long = fold(&path(), UriFormat::Standard, DEFAULT_FOLD_WIDTH, "mockhost", "root/cimv2")
            .unwrap();
        assert_eq!(long, "/:TST_Person.\nname=\"Mike\"");
    }
}

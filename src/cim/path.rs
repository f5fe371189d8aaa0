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

//! Object paths for CIM classes and instances.

use std::fmt;
use std::str::FromStr;

use super::error::PathError;
use super::uri::{self, UriFormat};
use super::value::KeyBindingValue;

/// A single `name=value` key binding of an instance path.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub name: String,
    pub value: KeyBindingValue,
}

impl KeyBinding {
    pub fn new(name: impl Into<String>, value: impl Into<KeyBindingValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl PartialEq for KeyBinding {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name) && self.value == other.value
    }
}

/// Path of a CIM class or instance.
///
/// `key_bindings` is `None` for class paths. An absent `host` or `namespace`
/// means "same as the connection default"; use [`ObjectPath::qualify`] to
/// resolve them before comparing paths obtained from different sources.
///
/// Equality ignores ASCII case in host, namespace, class name and key
/// binding names. Key binding order is not significant.
#[derive(Debug, Clone)]
pub struct ObjectPath {
    pub host: Option<String>,
    pub namespace: Option<String>,
    pub class_name: String,
    pub key_bindings: Option<Vec<KeyBinding>>,
}

impl ObjectPath {
    /// Create a class path without host or namespace.
    pub fn class(class_name: impl Into<String>) -> Self {
        Self {
            host: None,
            namespace: None,
            class_name: class_name.into(),
            key_bindings: None,
        }
    }

    /// Create an instance path without host, namespace or key bindings.
    pub fn instance(class_name: impl Into<String>) -> Self {
        Self {
            host: None,
            namespace: None,
            class_name: class_name.into(),
            key_bindings: Some(Vec::new()),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = normalize_namespace(namespace.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        let host = host.into();
        self.host = (!host.is_empty()).then_some(host);
        self
    }

    /// Append a key binding, turning a class path into an instance path.
    pub fn with_key(mut self, name: impl Into<String>, value: impl Into<KeyBindingValue>) -> Self {
        self.key_bindings
            .get_or_insert_with(Vec::new)
            .push(KeyBinding::new(name, value));
        self
    }

    pub fn is_instance(&self) -> bool {
        self.key_bindings.is_some()
    }

    pub fn key_bindings(&self) -> &[KeyBinding] {
        self.key_bindings.as_deref().unwrap_or(&[])
    }

    /// Look up a key binding value by name, ignoring case.
    pub fn key(&self, name: &str) -> Option<&KeyBindingValue> {
        self.key_bindings()
            .iter()
            .find(|kb| kb.name.eq_ignore_ascii_case(name))
            .map(|kb| &kb.value)
    }

    /// Class path (host, namespace, class name) of this path.
    pub fn class_path(&self) -> ObjectPath {
        ObjectPath {
            host: self.host.clone(),
            namespace: self.namespace.clone(),
            class_name: self.class_name.clone(),
            key_bindings: None,
        }
    }

    /// Fill in an absent host or namespace from the given defaults.
    pub fn qualify(&self, default_host: &str, default_namespace: &str) -> ObjectPath {
        let mut path = self.clone();
        if path.host.is_none() && !default_host.is_empty() {
            path.host = Some(default_host.to_string());
        }
        if path.namespace.is_none() {
            path.namespace = normalize_namespace(default_namespace.to_string());
        }
        path
    }

    pub fn has_class_name(&self, class_name: &str) -> bool {
        self.class_name.eq_ignore_ascii_case(class_name)
    }

    /// Untyped WBEM URI of this path in the requested format.
    pub fn to_wbem_uri(&self, format: UriFormat) -> Result<String, super::FormatError> {
        uri::to_wbem_uri(self, format)
    }

    /// Parse an untyped WBEM URI such as `//host/root/cimv2:CIM_Foo.id="x"`.
    pub fn from_wbem_uri(uri: &str) -> Result<Self, PathError> {
        uri::parse_wbem_uri(uri)
    }
}

fn normalize_namespace(namespace: String) -> Option<String> {
    let trimmed = namespace.trim_matches('/');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn eq_opt_ignore_case(a: &Option<String>, b: &Option<String>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        (None, None) => true,
        _ => false,
    }
}

impl PartialEq for ObjectPath {
    fn eq(&self, other: &Self) -> bool {
        if !self.class_name.eq_ignore_ascii_case(&other.class_name)
            || !eq_opt_ignore_case(&self.host, &other.host)
            || !eq_opt_ignore_case(&self.namespace, &other.namespace)
        {
            return false;
        }

        match (&self.key_bindings, &other.key_bindings) {
            (None, None) => true,
            (Some(ours), Some(theirs)) => {
                ours.len() == theirs.len() && ours.iter().all(|kb| theirs.contains(kb))
            }
            _ => false,
        }
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&uri::to_wbem_uri_lossy(self))
    }
}

impl FromStr for ObjectPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wbem_uri(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_case() {
        let a = ObjectPath::instance("CIM_Foo")
            .with_namespace("root/cimv2")
            .with_host("Server")
            .with_key("InstanceID", "x");
        let b = ObjectPath::instance("cim_foo")
            .with_namespace("ROOT/CIMV2")
            .with_host("server")
            .with_key("instanceid", "x");
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_values_are_exact() {
        let a = ObjectPath::instance("CIM_Foo").with_key("id", "x");
        let b = ObjectPath::instance("CIM_Foo").with_key("id", "X");
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_order_is_not_significant() {
        let a = ObjectPath::instance("CIM_Foo")
            .with_key("a", 1i64)
            .with_key("b", 2i64);
        let b = ObjectPath::instance("CIM_Foo")
            .with_key("b", 2i64)
            .with_key("a", 1i64);
        assert_eq!(a, b);
    }

    #[test]
    fn test_class_and_instance_paths_differ() {
        let class = ObjectPath::class("CIM_Foo");
        let instance = ObjectPath::instance("CIM_Foo");
        assert_ne!(class, instance);
        assert_eq!(instance.class_path(), class);
    }

    #[test]
    fn test_qualify_fills_only_missing_parts() {
        let path = ObjectPath::class("CIM_Foo").with_namespace("interop");
        let qualified = path.qualify("localhost", "root/cimv2");
        assert_eq!(qualified.host.as_deref(), Some("localhost"));
        assert_eq!(qualified.namespace.as_deref(), Some("interop"));
        assert!(path.host.is_none());
    }

    #[test]
    fn test_namespace_slashes_are_trimmed() {
        let path = ObjectPath::class("CIM_Foo").with_namespace("/root/cimv2/");
        assert_eq!(path.namespace.as_deref(), Some("root/cimv2"));
    }

    #[test]
    fn test_key_lookup_ignores_case() {
        let path = ObjectPath::instance("CIM_Foo").with_key("Name", "x");
        assert_eq!(path.key("name"), Some(&KeyBindingValue::from("x")));
        assert_eq!(path.key("other"), None);
    }
}

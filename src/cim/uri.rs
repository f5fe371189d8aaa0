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

//! Untyped WBEM URI rendering, folding and parsing (DSP0207).
//!
//! Rendering supports the four formats known to WBEM clients:
//! - `standard`: `//host/namespace:Class.key="value"`
//! - `canonical`: like standard, lower-cased and with sorted key names
//! - `cimobject`: no host component and no leading slash without a host
//! - `historical`: leading slash only with a host, colon only with a namespace
//!
//! Folding breaks a long instance path after the class name and after each
//! key binding so it fits into a narrow table cell. Parsing accepts all four
//! forms and the folded form.

use std::fmt::Write as _;
use std::str::FromStr;

use super::error::{FormatError, PathError};
use super::path::{KeyBinding, ObjectPath};
use super::value::{CimDateTime, KeyBindingValue};

/// Width up to which [`to_wbem_uri_folded`] keeps a path on one line.
pub const DEFAULT_FOLD_WIDTH: usize = 15;

/// WBEM URI format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UriFormat {
    #[default]
    Standard,
    Canonical,
    CimObject,
    Historical,
}

impl FromStr for UriFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "canonical" => Ok(Self::Canonical),
            "cimobject" => Ok(Self::CimObject),
            "historical" => Ok(Self::Historical),
            other => Err(FormatError::InvalidFormatArgument(other.to_string())),
        }
    }
}

/// Render `path` as a single-line WBEM URI.
pub fn to_wbem_uri(path: &ObjectPath, format: UriFormat) -> Result<String, FormatError> {
    render(path, format, false, false)
}

/// Render `path` in standard format, printing unsupported key values verbatim.
pub fn to_wbem_uri_lossy(path: &ObjectPath) -> String {
    // Lossy rendering has no error path.
    render(path, UriFormat::Standard, false, true).unwrap_or_default()
}

/// Render `path` folded over several lines when its single-line form is longer
/// than `max_len` characters.
///
/// The folded form breaks after the class name and after every key binding.
/// Removing the inserted newlines yields the single-line URI in `format`.
pub fn to_wbem_uri_folded(
    path: &ObjectPath,
    format: UriFormat,
    max_len: usize,
) -> Result<String, FormatError> {
    let single_line = render(path, format, false, false)?;
    if single_line.chars().count() <= max_len {
        return Ok(single_line);
    }
    render(path, format, true, false)
}

fn render(
    path: &ObjectPath,
    format: UriFormat,
    fold: bool,
    lossy: bool,
) -> Result<String, FormatError> {
    let canonical = format == UriFormat::Canonical;
    let case = |s: &str| {
        if canonical {
            s.to_lowercase()
        } else {
            s.to_string()
        }
    };

    let mut out = String::new();

    if let Some(host) = &path.host
        && format != UriFormat::CimObject
    {
        out.push_str("//");
        out.push_str(&case(host));
    }

    if path.host.is_some() || !matches!(format, UriFormat::CimObject | UriFormat::Historical) {
        out.push('/');
    }

    if let Some(namespace) = &path.namespace {
        out.push_str(&case(namespace));
    }

    if path.namespace.is_some() || format != UriFormat::Historical {
        out.push(':');
    }

    out.push_str(&case(&path.class_name));

    let bindings = path.key_bindings();
    if bindings.is_empty() {
        return Ok(out);
    }

    out.push('.');
    if fold {
        out.push('\n');
    }

    let mut ordered: Vec<&KeyBinding> = bindings.iter().collect();
    if canonical {
        ordered.sort_by_key(|kb| kb.name.to_lowercase());
    }

    for (i, binding) in ordered.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
            if fold {
                out.push('\n');
            }
        }
        out.push_str(&case(&binding.name));
        out.push('=');
        write_value(&mut out, binding, format, lossy)?;
    }

    Ok(out)
}

fn write_value(
    out: &mut String,
    binding: &KeyBinding,
    format: UriFormat,
    lossy: bool,
) -> Result<(), FormatError> {
    match &binding.value {
        KeyBindingValue::String(s) => push_quoted(out, s),
        KeyBindingValue::Boolean(b) => out.push_str(if *b { "TRUE" } else { "FALSE" }),
        // Debug formatting is the shortest representation that round-trips.
        KeyBindingValue::Real(r) => {
            let _ = write!(out, "{r:?}");
        }
        KeyBindingValue::Integer(i) => {
            let _ = write!(out, "{i}");
        }
        KeyBindingValue::Reference(path) => {
            let nested = render(path, format, false, lossy)?;
            push_quoted(out, &nested);
        }
        KeyBindingValue::DateTime(dt) => {
            out.push('"');
            out.push_str(dt.as_str());
            out.push('"');
        }
        KeyBindingValue::Unsupported { type_name, value } => {
            if !lossy {
                return Err(FormatError::InvalidKeyBindingType {
                    key: binding.name.clone(),
                    type_name: type_name.clone(),
                    value: value.clone(),
                });
            }
            push_quoted(out, value);
        }
    }
    Ok(())
}

fn push_quoted(out: &mut String, value: &str) {
    out.push('"');
    out.push_str(&value.replace('\\', "\\\\").replace('"', "\\\""));
    out.push('"');
}

/// Parse an untyped WBEM URI.
///
/// Newlines between key bindings (as produced by folding) are ignored.
pub fn parse_wbem_uri(uri: &str) -> Result<ObjectPath, PathError> {
    let trimmed = uri.trim();
    if trimmed.is_empty() {
        return Err(PathError::Empty);
    }

    let (host, rest) = match trimmed.strip_prefix("//") {
        Some(after) => {
            let slash = after.find('/').ok_or_else(|| PathError::MissingClassName {
                uri: uri.to_string(),
            })?;
            (Some(after[..slash].to_string()), &after[slash..])
        }
        None => (None, trimmed),
    };

    let (head, keys) = match rest.find('.') {
        Some(dot) => (&rest[..dot], Some(&rest[dot + 1..])),
        None => (rest, None),
    };

    let (namespace, class_name) = match head.rfind(':') {
        Some(colon) => (Some(&head[..colon]), head[colon + 1..].trim()),
        None => (None, head.trim_start_matches('/').trim()),
    };

    if class_name.is_empty() {
        return Err(PathError::MissingClassName {
            uri: uri.to_string(),
        });
    }
    if !is_identifier(class_name) {
        return Err(PathError::InvalidClassName {
            uri: uri.to_string(),
            name: class_name.to_string(),
        });
    }

    let mut path = ObjectPath::class(class_name);
    if let Some(host) = host {
        path = path.with_host(host);
    }
    if let Some(namespace) = namespace {
        path = path.with_namespace(namespace);
    }
    if let Some(keys) = keys {
        path.key_bindings = Some(parse_key_bindings(uri, keys)?);
    }

    Ok(path)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn parse_key_bindings(uri: &str, input: &str) -> Result<Vec<KeyBinding>, PathError> {
    let invalid = |binding: &str| PathError::InvalidKeyBinding {
        uri: uri.to_string(),
        binding: binding.to_string(),
    };

    let mut bindings = Vec::new();
    let mut rest = input.trim_start();

    while !rest.is_empty() {
        let eq = rest.find('=').ok_or_else(|| invalid(rest))?;
        let name = rest[..eq].trim();
        if !is_identifier(name) {
            return Err(invalid(rest));
        }
        let after = &rest[eq + 1..];

        let (value, remaining) = if let Some(quoted) = after.strip_prefix('"') {
            let (raw, consumed) =
                read_quoted(quoted).ok_or_else(|| PathError::UnterminatedString {
                    uri: uri.to_string(),
                })?;
            (typed_quoted_value(raw), &quoted[consumed..])
        } else {
            let end = after.find(',').unwrap_or(after.len());
            let literal = after[..end].trim();
            let value = typed_literal(literal).ok_or_else(|| invalid(&rest[..eq + 1 + end]))?;
            (value, &after[end..])
        };

        bindings.push(KeyBinding {
            name: name.to_string(),
            value,
        });

        let remaining = remaining.trim_start();
        rest = match remaining.strip_prefix(',') {
            Some(next) => next.trim_start(),
            None if remaining.is_empty() => remaining,
            None => return Err(invalid(remaining)),
        };
    }

    Ok(bindings)
}

/// Read an escaped string up to its closing quote. Returns the unescaped
/// value and the number of bytes consumed including the closing quote.
fn read_quoted(input: &str) -> Option<(String, usize)> {
    let mut value = String::new();
    let mut escaped = false;
    for (idx, ch) in input.char_indices() {
        if escaped {
            value.push(ch);
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == '"' {
            return Some((value, idx + 1));
        } else {
            value.push(ch);
        }
    }
    None
}

fn typed_quoted_value(raw: String) -> KeyBindingValue {
    if let Ok(dt) = CimDateTime::parse(&raw) {
        return KeyBindingValue::DateTime(dt);
    }
    if raw.contains(':')
        && let Ok(path) = parse_wbem_uri(&raw)
        && path.is_instance()
    {
        return KeyBindingValue::reference(path);
    }
    KeyBindingValue::String(raw)
}

fn typed_literal(literal: &str) -> Option<KeyBindingValue> {
    if literal.eq_ignore_ascii_case("true") {
        return Some(KeyBindingValue::Boolean(true));
    }
    if literal.eq_ignore_ascii_case("false") {
        return Some(KeyBindingValue::Boolean(false));
    }
    if let Ok(int) = literal.parse::<i128>()
        && (i128::from(i64::MIN)..=i128::from(u64::MAX)).contains(&int)
    {
        return Some(KeyBindingValue::Integer(int));
    }
    let looks_numeric = literal
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.'));
    if looks_numeric && let Ok(real) = literal.parse::<f64>() {
        return Some(KeyBindingValue::Real(real));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(name: &str) -> ObjectPath {
        ObjectPath::instance("TST_Person")
            .with_namespace("root/cimv2")
            .with_key("name", name)
    }

    #[test]
    fn test_standard_format() {
        let path = person("Mike").with_host("srv");
        assert_eq!(
            to_wbem_uri(&path, UriFormat::Standard).unwrap(),
            r#"//srv/root/cimv2:TST_Person.name="Mike""#
        );
    }

    #[test]
    fn test_standard_format_without_host_and_namespace() {
        let path = ObjectPath::instance("TST_Person").with_key("name", "Mike");
        assert_eq!(path.to_string(), r#"/:TST_Person.name="Mike""#);
        assert_eq!(ObjectPath::class("TST_Person").to_string(), "/:TST_Person");
    }

    #[test]
    fn test_canonical_format_sorts_and_lowercases() {
        let path = ObjectPath::instance("TST_Foo")
            .with_namespace("Root/CIMV2")
            .with_key("Zeta", 1i64)
            .with_key("Alpha", "V");
        assert_eq!(
            to_wbem_uri(&path, UriFormat::Canonical).unwrap(),
            r#"/root/cimv2:tst_foo.alpha="V",zeta=1"#
        );
    }

    #[test]
    fn test_cimobject_and_historical_formats() {
        let path = ObjectPath::class("TST_Foo").with_namespace("root/cimv2");
        assert_eq!(
            to_wbem_uri(&path, UriFormat::CimObject).unwrap(),
            "root/cimv2:TST_Foo"
        );
        let bare = ObjectPath::class("TST_Foo");
        assert_eq!(to_wbem_uri(&bare, UriFormat::Historical).unwrap(), "TST_Foo");
        assert_eq!(to_wbem_uri(&bare, UriFormat::CimObject).unwrap(), ":TST_Foo");
    }

    #[test]
    fn test_value_formatting() {
        let path = ObjectPath::instance("TST_Foo")
            .with_key("s", r#"a"b\c"#)
            .with_key("b", false)
            .with_key("i", -42i64)
            .with_key("r", 0.1f64)
            .with_key("w", 1.0f64)
            .with_key("d", CimDateTime::parse("20140924193040.654437-060").unwrap());
        assert_eq!(
            path.to_string(),
            r#"/:TST_Foo.s="a\"b\\c",b=FALSE,i=-42,r=0.1,w=1.0,d="20140924193040.654437-060""#
        );
    }

    #[test]
    fn test_reference_value_is_escaped() {
        let path = ObjectPath::instance("TST_Lineage").with_key("parent", person("Mike"));
        assert_eq!(
            path.to_string(),
            r#"/:TST_Lineage.parent="/root/cimv2:TST_Person.name=\"Mike\"""#
        );
    }

    #[test]
    fn test_unsupported_value_is_rejected() {
        let path = ObjectPath::instance("TST_Foo").with_key(
            "k",
            KeyBindingValue::Unsupported {
                type_name: "uint8[]".to_string(),
                value: "{1}".to_string(),
            },
        );
        let err = to_wbem_uri(&path, UriFormat::Standard).unwrap_err();
        assert!(matches!(err, FormatError::InvalidKeyBindingType { .. }));
        assert_eq!(path.to_string(), r#"/:TST_Foo.k="{1}""#);
    }

    #[test]
    fn test_format_argument_parsing() {
        assert_eq!("canonical".parse::<UriFormat>().unwrap(), UriFormat::Canonical);
        assert_eq!(
            "fancy".parse::<UriFormat>().unwrap_err(),
            FormatError::InvalidFormatArgument("fancy".to_string())
        );
    }

    #[test]
    fn test_fold_short_path_stays_on_one_line() {
        let path = ObjectPath::instance("B").with_key("k", 2i64);
        let folded = to_wbem_uri_folded(&path, UriFormat::Standard, DEFAULT_FOLD_WIDTH).unwrap();
        assert_eq!(folded, "/:B.k=2");
    }

    #[test]
    fn test_fold_boundary() {
        let at_width = ObjectPath::instance("TST_Pe").with_key("key", 12i64);
        assert_eq!(at_width.to_string().chars().count(), DEFAULT_FOLD_WIDTH);
        assert_eq!(
            to_wbem_uri_folded(&at_width, UriFormat::Standard, DEFAULT_FOLD_WIDTH).unwrap(),
            "/:TST_Pe.key=12"
        );

        let over_width = ObjectPath::instance("TST_Pe").with_key("key", 123i64);
        assert_eq!(
            to_wbem_uri_folded(&over_width, UriFormat::Standard, DEFAULT_FOLD_WIDTH).unwrap(),
            "/:TST_Pe.\nkey=123"
        );
    }

    #[test]
    fn test_fold_long_path() {
        let path = ObjectPath::instance("TST_Person")
            .with_key("name", "Mike")
            .with_key("age", 42i64);
        let folded = to_wbem_uri_folded(&path, UriFormat::Standard, 15).unwrap();
        assert_eq!(folded, "/:TST_Person.\nname=\"Mike\",\nage=42");
        assert_eq!(folded.replace('\n', ""), path.to_string());
    }

    #[test]
    fn test_fold_reparses_to_same_bindings() {
        let path = ObjectPath::instance("TST_Lineage")
            .with_namespace("root/cimv2")
            .with_key("parent", person("Mike"))
            .with_key("child", person("Sofi"))
            .with_key("since", CimDateTime::parse("20140924193040.654437-060").unwrap())
            .with_key("weight", 2.5f64)
            .with_key("active", true);
        let folded = to_wbem_uri_folded(&path, UriFormat::Standard, 15).unwrap();
        assert!(folded.lines().count() > 1);
        assert_eq!(parse_wbem_uri(&folded).unwrap(), path);
    }

    #[test]
    fn test_parse_full_uri() {
        let path = parse_wbem_uri(r#"//srv:5989/root/cimv2:CIM_Foo.id="x",n=5"#).unwrap();
        assert_eq!(path.host.as_deref(), Some("srv:5989"));
        assert_eq!(path.namespace.as_deref(), Some("root/cimv2"));
        assert_eq!(path.class_name, "CIM_Foo");
        assert_eq!(path.key("id"), Some(&KeyBindingValue::from("x")));
        assert_eq!(path.key("n"), Some(&KeyBindingValue::Integer(5)));
    }

    #[test]
    fn test_uint64_key_round_trips() {
        let uri = "/root/cimv2:CIM_Foo.id=18446744073709551615";
        let path = parse_wbem_uri(uri).unwrap();
        assert_eq!(path.key("id"), Some(&KeyBindingValue::from(u64::MAX)));
        assert_eq!(to_wbem_uri(&path, UriFormat::Standard).unwrap(), uri);

        let path = parse_wbem_uri("/:CIM_Foo.id=-9223372036854775808").unwrap();
        assert_eq!(path.key("id"), Some(&KeyBindingValue::from(i64::MIN)));

        // Beyond the 64-bit key types
        let path = parse_wbem_uri("/:CIM_Foo.id=18446744073709551616").unwrap();
        assert!(matches!(path.key("id"), Some(KeyBindingValue::Real(_))));
    }

    #[test]
    fn test_parse_short_forms() {
        let path = parse_wbem_uri("CIM_Foo").unwrap();
        assert!(!path.is_instance());
        assert!(path.namespace.is_none());

        let path = parse_wbem_uri("root/cimv2:CIM_Foo.k=TRUE").unwrap();
        assert_eq!(path.namespace.as_deref(), Some("root/cimv2"));
        assert_eq!(path.key("k"), Some(&KeyBindingValue::Boolean(true)));

        let path = parse_wbem_uri("/:CIM_Foo.k=1.5").unwrap();
        assert!(path.namespace.is_none());
        assert_eq!(path.key("k"), Some(&KeyBindingValue::Real(1.5)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_wbem_uri("  "), Err(PathError::Empty));
        assert!(matches!(
            parse_wbem_uri("/root/cimv2:"),
            Err(PathError::MissingClassName { .. })
        ));
        assert!(matches!(
            parse_wbem_uri("/root:9Foo"),
            Err(PathError::InvalidClassName { .. })
        ));
        assert!(matches!(
            parse_wbem_uri(r#"CIM_Foo.k="open"#),
            Err(PathError::UnterminatedString { .. })
        ));
        assert!(matches!(
            parse_wbem_uri("CIM_Foo.k=bare"),
            Err(PathError::InvalidKeyBinding { .. })
        ));
    }
}

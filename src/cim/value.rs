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

//! Typed key binding values and CIM datetime strings.

use std::fmt;
use std::str::FromStr;

use super::error::PathError;
use super::path::ObjectPath;

/// A CIM datetime in its canonical 25 character string form.
///
/// Either a timestamp `yyyymmddhhmmss.mmmmmmsutc` where `s` is `+` or `-`,
/// or an interval `ddddddddhhmmss.mmmmmm:000`. Digit positions may hold `*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CimDateTime(String);

impl CimDateTime {
    pub fn parse(value: &str) -> Result<Self, PathError> {
        let bytes = value.as_bytes();
        if bytes.len() != 25 || bytes[14] != b'.' {
            return Err(PathError::InvalidDateTime(value.to_string()));
        }

        let digits_ok = bytes[..14]
            .iter()
            .chain(&bytes[15..21])
            .all(|b| b.is_ascii_digit() || *b == b'*');
        if !digits_ok {
            return Err(PathError::InvalidDateTime(value.to_string()));
        }

        let valid_tail = match bytes[21] {
            b'+' | b'-' => bytes[22..].iter().all(|b| b.is_ascii_digit() || *b == b'*'),
            b':' => &bytes[22..] == b"000",
            _ => false,
        };
        if !valid_tail {
            return Err(PathError::InvalidDateTime(value.to_string()));
        }

        Ok(Self(value.to_string()))
    }

    pub fn is_interval(&self) -> bool {
        self.0.as_bytes()[21] == b':'
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CimDateTime {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CimDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Value of a single key binding in an instance path.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyBindingValue {
    /// `string` and `char16` keys
    String(String),
    Boolean(bool),
    /// Any of the `uintNN`/`sintNN` types, `sint64` minimum to `uint64` maximum
    Integer(i128),
    /// `real32` and `real64`
    Real(f64),
    Reference(Box<ObjectPath>),
    DateTime(CimDateTime),
    /// A value whose CIM type is not a valid key type, as delivered by a transport.
    Unsupported { type_name: String, value: String },
}

impl KeyBindingValue {
    pub fn type_name(&self) -> &str {
        match self {
            Self::String(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real64",
            Self::Reference(_) => "reference",
            Self::DateTime(_) => "datetime",
            Self::Unsupported { type_name, .. } => type_name,
        }
    }

    pub fn reference(path: ObjectPath) -> Self {
        Self::Reference(Box::new(path))
    }
}

impl From<&str> for KeyBindingValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for KeyBindingValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for KeyBindingValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for KeyBindingValue {
    fn from(value: i64) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u64> for KeyBindingValue {
    fn from(value: u64) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for KeyBindingValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<ObjectPath> for KeyBindingValue {
    fn from(value: ObjectPath) -> Self {
        Self::reference(value)
    }
}

impl From<CimDateTime> for KeyBindingValue {
    fn from(value: CimDateTime) -> Self {
        Self::DateTime(value)
    }
}

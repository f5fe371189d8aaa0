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

//! Error types shared by the CIM object model, the transport and the formatters.

use std::fmt;
use thiserror::Error;

/// CIM status codes as defined by DSP0200.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CimStatus {
    Failed,
    AccessDenied,
    InvalidNamespace,
    InvalidParameter,
    InvalidClass,
    NotFound,
    NotSupported,
    ClassHasChildren,
    ClassHasInstances,
    InvalidSuperclass,
    AlreadyExists,
    NoSuchProperty,
    TypeMismatch,
    QueryLanguageNotSupported,
    InvalidQuery,
    MethodNotAvailable,
    MethodNotFound,
    NamespaceNotEmpty,
    InvalidEnumerationContext,
    InvalidOperationTimeout,
    PullHasBeenAbandoned,
    PullCannotBeAbandoned,
    FilteredEnumerationNotSupported,
    ContinuationOnErrorNotSupported,
    ServerLimitsExceeded,
    ServerIsShuttingDown,
    /// Any code outside the range defined by DSP0200.
    Other(u16),
}

impl CimStatus {
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::Failed,
            2 => Self::AccessDenied,
            3 => Self::InvalidNamespace,
            4 => Self::InvalidParameter,
            5 => Self::InvalidClass,
            6 => Self::NotFound,
            7 => Self::NotSupported,
            8 => Self::ClassHasChildren,
            9 => Self::ClassHasInstances,
            10 => Self::InvalidSuperclass,
            11 => Self::AlreadyExists,
            12 => Self::NoSuchProperty,
            13 => Self::TypeMismatch,
            14 => Self::QueryLanguageNotSupported,
            15 => Self::InvalidQuery,
            16 => Self::MethodNotAvailable,
            17 => Self::MethodNotFound,
            20 => Self::NamespaceNotEmpty,
            21 => Self::InvalidEnumerationContext,
            22 => Self::InvalidOperationTimeout,
            23 => Self::PullHasBeenAbandoned,
            24 => Self::PullCannotBeAbandoned,
            25 => Self::FilteredEnumerationNotSupported,
            26 => Self::ContinuationOnErrorNotSupported,
            27 => Self::ServerLimitsExceeded,
            28 => Self::ServerIsShuttingDown,
            other => Self::Other(other),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Self::Failed => 1,
            Self::AccessDenied => 2,
            Self::InvalidNamespace => 3,
            Self::InvalidParameter => 4,
            Self::InvalidClass => 5,
            Self::NotFound => 6,
            Self::NotSupported => 7,
            Self::ClassHasChildren => 8,
            Self::ClassHasInstances => 9,
            Self::InvalidSuperclass => 10,
            Self::AlreadyExists => 11,
            Self::NoSuchProperty => 12,
            Self::TypeMismatch => 13,
            Self::QueryLanguageNotSupported => 14,
            Self::InvalidQuery => 15,
            Self::MethodNotAvailable => 16,
            Self::MethodNotFound => 17,
            Self::NamespaceNotEmpty => 20,
            Self::InvalidEnumerationContext => 21,
            Self::InvalidOperationTimeout => 22,
            Self::PullHasBeenAbandoned => 23,
            Self::PullCannotBeAbandoned => 24,
            Self::FilteredEnumerationNotSupported => 25,
            Self::ContinuationOnErrorNotSupported => 26,
            Self::ServerLimitsExceeded => 27,
            Self::ServerIsShuttingDown => 28,
            Self::Other(code) => *code,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Failed => "CIM_ERR_FAILED",
            Self::AccessDenied => "CIM_ERR_ACCESS_DENIED",
            Self::InvalidNamespace => "CIM_ERR_INVALID_NAMESPACE",
            Self::InvalidParameter => "CIM_ERR_INVALID_PARAMETER",
            Self::InvalidClass => "CIM_ERR_INVALID_CLASS",
            Self::NotFound => "CIM_ERR_NOT_FOUND",
            Self::NotSupported => "CIM_ERR_NOT_SUPPORTED",
            Self::ClassHasChildren => "CIM_ERR_CLASS_HAS_CHILDREN",
            Self::ClassHasInstances => "CIM_ERR_CLASS_HAS_INSTANCES",
            Self::InvalidSuperclass => "CIM_ERR_INVALID_SUPERCLASS",
            Self::AlreadyExists => "CIM_ERR_ALREADY_EXISTS",
            Self::NoSuchProperty => "CIM_ERR_NO_SUCH_PROPERTY",
            Self::TypeMismatch => "CIM_ERR_TYPE_MISMATCH",
            Self::QueryLanguageNotSupported => "CIM_ERR_QUERY_LANGUAGE_NOT_SUPPORTED",
            Self::InvalidQuery => "CIM_ERR_INVALID_QUERY",
            Self::MethodNotAvailable => "CIM_ERR_METHOD_NOT_AVAILABLE",
            Self::MethodNotFound => "CIM_ERR_METHOD_NOT_FOUND",
            Self::NamespaceNotEmpty => "CIM_ERR_NAMESPACE_NOT_EMPTY",
            Self::InvalidEnumerationContext => "CIM_ERR_INVALID_ENUMERATION_CONTEXT",
            Self::InvalidOperationTimeout => "CIM_ERR_INVALID_OPERATION_TIMEOUT",
            Self::PullHasBeenAbandoned => "CIM_ERR_PULL_HAS_BEEN_ABANDONED",
            Self::PullCannotBeAbandoned => "CIM_ERR_PULL_CANNOT_BE_ABANDONED",
            Self::FilteredEnumerationNotSupported => "CIM_ERR_FILTERED_ENUMERATION_NOT_SUPPORTED",
            Self::ContinuationOnErrorNotSupported => "CIM_ERR_CONTINUATION_ON_ERROR_NOT_SUPPORTED",
            Self::ServerLimitsExceeded => "CIM_ERR_SERVER_LIMITS_EXCEEDED",
            Self::ServerIsShuttingDown => "CIM_ERR_SERVER_IS_SHUTTING_DOWN",
            Self::Other(_) => "CIM_ERR_UNKNOWN",
        }
    }
}

impl fmt::Display for CimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.name())
    }
}

/// Error returned by any WBEM operation.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{status}: {message}")]
pub struct TransportError {
    pub status: CimStatus,
    pub message: String,
}

impl TransportError {
    pub fn new(status: CimStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(CimStatus::NotFound, message)
    }
}

/// Errors raised while turning paths into display strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormatError {
    /// Key binding value of a CIM type the formatter cannot render
    #[error("invalid type {type_name} in keybinding value: {key}={value}")]
    InvalidKeyBindingType {
        key: String,
        type_name: String,
        value: String,
    },

    /// URI format identifier not in standard/canonical/cimobject/historical
    #[error("invalid format argument: {0}")]
    InvalidFormatArgument(String),
}

/// Errors raised while parsing a WBEM URI.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("empty WBEM URI")]
    Empty,

    #[error("missing class name in WBEM URI '{uri}'")]
    MissingClassName { uri: String },

    #[error("invalid class name '{name}' in WBEM URI '{uri}'")]
    InvalidClassName { uri: String, name: String },

    #[error("invalid key binding '{binding}' in WBEM URI '{uri}'")]
    InvalidKeyBinding { uri: String, binding: String },

    #[error("unterminated string value in WBEM URI '{uri}'")]
    UnterminatedString { uri: String },

    #[error("invalid CIM datetime value '{0}'")]
    InvalidDateTime(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_codes() {
        for code in 1..=28u16 {
            let status = CimStatus::from_code(code);
            assert_eq!(status.code(), code);
        }
        assert_eq!(CimStatus::from_code(18), CimStatus::Other(18));
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::new(CimStatus::AccessDenied, "no access to TST_Lineage");
        assert_eq!(
            err.to_string(),
            "2 (CIM_ERR_ACCESS_DENIED): no access to TST_Lineage"
        );
    }

    #[test]
    fn test_format_error_display() {
        let err = FormatError::InvalidFormatArgument("fancy".to_string());
        assert_eq!(err.to_string(), "invalid format argument: fancy");
    }
}

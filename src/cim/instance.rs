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

//! CIM instances and their properties.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::path::ObjectPath;

/// CIM data type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CimType {
    String,
    Char16,
    Boolean,
    Uint8,
    Sint8,
    Uint16,
    Sint16,
    Uint32,
    Sint32,
    Uint64,
    Sint64,
    Real32,
    Real64,
    Datetime,
    Reference,
}

impl CimType {
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference)
    }
}

impl fmt::Display for CimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Char16 => "char16",
            Self::Boolean => "boolean",
            Self::Uint8 => "uint8",
            Self::Sint8 => "sint8",
            Self::Uint16 => "uint16",
            Self::Sint16 => "sint16",
            Self::Uint32 => "uint32",
            Self::Sint32 => "sint32",
            Self::Uint64 => "uint64",
            Self::Sint64 => "sint64",
            Self::Real32 => "real32",
            Self::Real64 => "real64",
            Self::Datetime => "datetime",
            Self::Reference => "reference",
        };
        f.write_str(name)
    }
}

/// Value of a property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Scalar value in its MOF literal form
    Scalar(String),
    Reference(ObjectPath),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub cim_type: CimType,
    pub value: Option<PropertyValue>,
}

impl Property {
    pub fn scalar(name: impl Into<String>, cim_type: CimType, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cim_type,
            value: Some(PropertyValue::Scalar(value.into())),
        }
    }

    pub fn reference(name: impl Into<String>, target: ObjectPath) -> Self {
        Self {
            name: name.into(),
            cim_type: CimType::Reference,
            value: Some(PropertyValue::Reference(target)),
        }
    }

    pub fn reference_target(&self) -> Option<&ObjectPath> {
        match &self.value {
            Some(PropertyValue::Reference(path)) => Some(path),
            _ => None,
        }
    }
}

/// A CIM instance with its path and properties in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub path: ObjectPath,
    pub properties: Vec<Property>,
}

impl Instance {
    pub fn new(path: ObjectPath) -> Self {
        Self {
            path,
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Names of the reference-typed properties, in declaration order.
    pub fn reference_property_names(&self) -> Vec<String> {
        self.properties
            .iter()
            .filter(|p| p.cim_type.is_reference())
            .map(|p| p.name.clone())
            .collect()
    }

    /// An instance with at least one reference property is an association.
    pub fn is_association(&self) -> bool {
        self.properties.iter().any(|p| p.cim_type.is_reference())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_property_names() {
        let inst = Instance::new(ObjectPath::instance("TST_Lineage"))
            .with_property(Property::scalar("Comment", CimType::String, "x"))
            .with_property(Property::reference("parent", ObjectPath::instance("TST_Person")))
            .with_property(Property::reference("child", ObjectPath::instance("TST_Person")));
        assert_eq!(inst.reference_property_names(), vec!["parent", "child"]);
        assert!(inst.is_association());
        assert!(inst.property("PARENT").is_some());
    }

    #[test]
    fn test_plain_instance_is_not_association() {
        let inst = Instance::new(ObjectPath::instance("TST_Person"))
            .with_property(Property::scalar("name", CimType::String, "Mike"));
        assert!(!inst.is_association());
        assert!(inst.property("name").unwrap().reference_target().is_none());
    }
}

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

//! YAML layout of a mock repository file.

use serde::Deserialize;
use std::path::Path;
use tokio::fs;

use super::error::MockError;
use super::{MockOperation, MockRepository};
use crate::cim::{CimStatus, CimType, Instance, ObjectPath, Property, TransportError};

#[derive(Debug, Deserialize)]
struct RepositoryFile {
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    default_namespace: Option<String>,
    #[serde(default)]
    classes: Vec<ClassDecl>,
    #[serde(default)]
    instances: Vec<InstanceDecl>,
    #[serde(default)]
    faults: Vec<FaultDecl>,
}

#[derive(Debug, Deserialize)]
struct ClassDecl {
    name: String,
    #[serde(default)]
    superclass: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InstanceDecl {
    path: String,
    // Mapping keeps the declaration order of the properties
    #[serde(default)]
    properties: serde_yaml::Mapping,
}

#[derive(Debug, Deserialize)]
struct PropertyDecl {
    #[serde(rename = "type")]
    cim_type: CimType,
    #[serde(default)]
    value: Option<serde_yaml::Value>,
}

#[derive(Debug, Deserialize)]
struct FaultDecl {
    operation: String,
    #[serde(default)]
    path: Option<String>,
    status: u16,
    #[serde(default)]
    description: Option<String>,
}

pub(super) const DEFAULT_MOCK_HOST: &str = "localhost";

impl MockRepository {
    /// Load a repository from a YAML file.
    ///
    /// Paths in the file without a namespace are placed in the file's
    /// `default_namespace`, or in `default_namespace` when the file has none.
    pub async fn load(path: &Path, default_namespace: &str) -> Result<Self, MockError> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| MockError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let file: RepositoryFile =
            serde_yaml::from_str(&content).map_err(|source| MockError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let repository = Self::from_file(file, default_namespace)?;
        tracing::debug!(
            "Loaded mock repository {:?}: {} classes, {} instances",
            path,
            repository.class_count(),
            repository.instance_count()
        );
        Ok(repository)
    }

    /// Build a repository from YAML text, mainly for tests.
    pub fn from_yaml_str(content: &str, default_namespace: &str) -> Result<Self, MockError> {
        let file: RepositoryFile =
            serde_yaml::from_str(content).map_err(|source| MockError::Parse {
                path: "<inline>".into(),
                source,
            })?;
        Self::from_file(file, default_namespace)
    }

    fn from_file(file: RepositoryFile, default_namespace: &str) -> Result<Self, MockError> {
        let file_namespace = file
            .default_namespace
            .unwrap_or_else(|| default_namespace.to_string());
        let host = file.host.unwrap_or_else(|| DEFAULT_MOCK_HOST.to_string());

        let mut repository = MockRepository::new(host, default_namespace);

        for class in file.classes {
            repository.add_class(&class.name, class.superclass.as_deref());
        }

        for decl in file.instances {
            let path = parse_path(&decl.path, "instance path")?
                .qualify("", &file_namespace);
            let mut instance = Instance::new(path);

            for (name, value) in decl.properties {
                let name = match name {
                    serde_yaml::Value::String(name) => name,
                    other => scalar_text(&other),
                };
                let decl: PropertyDecl =
                    serde_yaml::from_value(value).map_err(|source| MockError::Parse {
                        path: format!("<property {name} of {}>", instance.path).into(),
                        source,
                    })?;
                instance
                    .properties
                    .push(property(&instance.path, name, decl, &file_namespace)?);
            }
            repository.add_instance(instance);
        }

        for fault in file.faults {
            let operation: MockOperation = fault.operation.parse()?;
            let path = fault
                .path
                .as_deref()
                .map(|p| parse_path(p, "fault path"))
                .transpose()?;
            let error = TransportError::new(
                CimStatus::from_code(fault.status),
                fault
                    .description
                    .unwrap_or_else(|| format!("injected {operation} fault")),
            );
            repository.add_fault(operation, path, error);
        }

        Ok(repository)
    }
}

fn parse_path(uri: &str, context: &str) -> Result<ObjectPath, MockError> {
    ObjectPath::from_wbem_uri(uri).map_err(|source| MockError::InvalidPath {
        context: format!("{context} '{uri}'"),
        source,
    })
}

fn property(
    owner: &ObjectPath,
    name: String,
    decl: PropertyDecl,
    namespace: &str,
) -> Result<Property, MockError> {
    if decl.cim_type.is_reference() {
        let target = match &decl.value {
            Some(serde_yaml::Value::String(uri)) => parse_path(uri, "reference value")?,
            _ => {
                return Err(MockError::MissingReference {
                    instance: owner.to_string(),
                    property: name,
                });
            }
        };
        return Ok(Property::reference(name, target.qualify("", namespace)));
    }

    Ok(match decl.value {
        Some(value) => Property::scalar(name, decl.cim_type, scalar_text(&value)),
        None => Property {
            name,
            cim_type: decl.cim_type,
            value: None,
        },
    })
}

fn scalar_text(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cim::PropertyValue;

    const REPO: &str = r#"
host: mockhost
classes:
  - { name: TST_Lineage, superclass: CIM_Dependency }
instances:
  - path: TST_Person.name="Mike"
    properties:
      name: { type: string, value: Mike }
      age: { type: uint8, value: 42 }
  - path: TST_Lineage.parent="/root/cimv2:TST_Person.name=\"Mike\"",child="/root/cimv2:TST_Person.name=\"Sofi\""
    properties:
      parent: { type: reference, value: 'TST_Person.name="Mike"' }
      child: { type: reference, value: '/root/cimv2:TST_Person.name="Sofi"' }
faults:
  - { operation: GetInstance, path: '/root/cimv2:TST_Broken.id=1', status: 2, description: denied }
"#;

    #[test]
    fn test_load_inline_repository() {
        let repo = MockRepository::from_yaml_str(REPO, "root/cimv2").unwrap();
        assert_eq!(repo.class_count(), 1);
        assert_eq!(repo.instance_count(), 2);

        let person = &repo.instances()[0];
        assert_eq!(person.path.namespace.as_deref(), Some("root/cimv2"));
        assert_eq!(
            person.property("age").unwrap().value,
            Some(PropertyValue::Scalar("42".to_string()))
        );

        let lineage = &repo.instances()[1];
        assert_eq!(lineage.reference_property_names(), vec!["parent", "child"]);
        let parent = lineage.property("parent").unwrap().reference_target().unwrap();
        assert_eq!(parent.namespace.as_deref(), Some("root/cimv2"));
    }

    #[test]
    fn test_reference_without_value_is_rejected() {
        let yaml = r#"
instances:
  - path: TST_Lineage.id=1
    properties:
      parent: { type: reference }
"#;
        let err = MockRepository::from_yaml_str(yaml, "root/cimv2").unwrap_err();
        assert!(matches!(err, MockError::MissingReference { .. }));
    }

    #[test]
    fn test_unknown_fault_operation_is_rejected() {
        let yaml = "faults:\n  - { operation: DeleteInstance, status: 1 }\n";
        let err = MockRepository::from_yaml_str(yaml, "root/cimv2").unwrap_err();
        assert!(matches!(err, MockError::UnknownOperation(op) if op == "DeleteInstance"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = MockRepository::load(Path::new("/nonexistent/repo.yaml"), "root/cimv2")
            .await
            .unwrap_err();
        assert!(matches!(err, MockError::Read { .. }));
    }
}

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

//! In-memory WBEM server.
//!
//! A [`MockRepository`] holds instances, a class hierarchy and injected
//! faults, and answers the association operations of [`WbemConnection`] the
//! way a CIM server does. It is loaded from YAML with `--mock-server` or
//! built programmatically in tests.

mod error;
mod loader;

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::cim::{CimStatus, Instance, ObjectPath, Property, PropertyValue, TransportError};
use crate::connection::{AssociatorFilter, TransportResult, WbemConnection};

pub use error::MockError;

/// Operations that can carry an injected fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOperation {
    ReferenceNames,
    References,
    GetInstance,
    AssociatorNames,
}

impl fmt::Display for MockOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ReferenceNames => "ReferenceNames",
            Self::References => "References",
            Self::GetInstance => "GetInstance",
            Self::AssociatorNames => "AssociatorNames",
        };
        f.write_str(name)
    }
}

impl FromStr for MockOperation {
    type Err = MockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "referencenames" => Ok(Self::ReferenceNames),
            "references" => Ok(Self::References),
            "getinstance" => Ok(Self::GetInstance),
            "associatornames" => Ok(Self::AssociatorNames),
            _ => Err(MockError::UnknownOperation(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
struct Fault {
    operation: MockOperation,
    /// `None` applies the fault to every call of the operation
    path: Option<ObjectPath>,
    error: TransportError,
}

/// Mock WBEM server backed by an in-memory repository.
#[derive(Debug, Clone)]
pub struct MockRepository {
    host: String,
    default_namespace: String,
    /// Lower-cased class name to its superclass name
    superclasses: HashMap<String, Option<String>>,
    instances: Vec<Instance>,
    faults: Vec<Fault>,
}

impl MockRepository {
    pub fn new(host: impl Into<String>, default_namespace: impl Into<String>) -> Self {
        let default_namespace: String = default_namespace.into();
        Self {
            host: host.into(),
            default_namespace: default_namespace.trim_matches('/').to_string(),
            superclasses: HashMap::new(),
            instances: Vec::new(),
            faults: Vec::new(),
        }
    }

    /// Declare a class, optionally as subclass of `superclass`.
    pub fn add_class(&mut self, name: &str, superclass: Option<&str>) {
        self.superclasses
            .insert(name.to_ascii_lowercase(), superclass.map(str::to_string));
    }

    pub fn with_class(mut self, name: &str, superclass: Option<&str>) -> Self {
        self.add_class(name, superclass);
        self
    }

    /// Add an instance. Its path and reference targets are placed in the
    /// default namespace when they have none.
    pub fn add_instance(&mut self, mut instance: Instance) {
        instance.path = self.local(&instance.path);
        for property in &mut instance.properties {
            if let Some(PropertyValue::Reference(target)) = &mut property.value {
                *target = self.local(target);
            }
        }
        self.instances.push(instance);
    }

    pub fn with_instance(mut self, instance: Instance) -> Self {
        self.add_instance(instance);
        self
    }

    /// Make `operation` fail with `error`, for `path` only when given.
    pub fn add_fault(
        &mut self,
        operation: MockOperation,
        path: Option<ObjectPath>,
        error: TransportError,
    ) {
        let path = path.map(|p| self.local(&p));
        self.faults.push(Fault {
            operation,
            path,
            error,
        });
    }

    pub fn with_fault(
        mut self,
        operation: MockOperation,
        path: Option<ObjectPath>,
        error: TransportError,
    ) -> Self {
        self.add_fault(operation, path, error);
        self
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn class_count(&self) -> usize {
        self.superclasses.len()
    }

    /// Path as stored in the repository: no host, namespace filled in.
    fn local(&self, path: &ObjectPath) -> ObjectPath {
        let mut local = path.qualify("", &self.default_namespace);
        local.host = None;
        local
    }

    /// True if `class_name` is `ancestor` or derives from it.
    fn is_subclass(&self, class_name: &str, ancestor: &str) -> bool {
        let mut current = class_name.to_string();
        // Bounded walk in case the declared hierarchy has a cycle
        for _ in 0..=self.superclasses.len() {
            if current.eq_ignore_ascii_case(ancestor) {
                return true;
            }
            match self.superclasses.get(&current.to_ascii_lowercase()) {
                Some(Some(superclass)) => current = superclass.clone(),
                _ => return false,
            }
        }
        false
    }

    fn class_matches(&self, class_name: &str, filter: Option<&str>) -> bool {
        filter.is_none_or(|ancestor| self.is_subclass(class_name, ancestor))
    }

    fn check_fault(&self, operation: MockOperation, path: &ObjectPath) -> TransportResult<()> {
        let fault = self.faults.iter().find(|fault| {
            fault.operation == operation && fault.path.as_ref().is_none_or(|p| p == path)
        });
        match fault {
            Some(fault) => {
                tracing::trace!("Injected fault on {} {}", operation, path);
                Err(fault.error.clone())
            }
            None => Ok(()),
        }
    }

    fn check_namespace(&self, path: &ObjectPath) -> TransportResult<()> {
        let namespace = path.namespace.as_deref().unwrap_or_default();
        let known = namespace.eq_ignore_ascii_case(&self.default_namespace)
            || self.instances.iter().any(|inst| {
                inst.path
                    .namespace
                    .as_deref()
                    .is_some_and(|ns| ns.eq_ignore_ascii_case(namespace))
            });
        if known {
            Ok(())
        } else {
            Err(TransportError::new(
                CimStatus::InvalidNamespace,
                format!("Namespace {namespace} not found"),
            ))
        }
    }

    /// Association instances whose reference property (named `role`, when
    /// given) points to `target`, with that property.
    fn referencing<'a>(
        &'a self,
        target: &'a ObjectPath,
        role: Option<&'a str>,
    ) -> impl Iterator<Item = (&'a Instance, &'a Property)> + 'a {
        self.instances.iter().flat_map(move |assoc| {
            assoc
                .properties
                .iter()
                .filter(move |prop| {
                    role.is_none_or(|r| prop.name.eq_ignore_ascii_case(r))
                        && prop.reference_target() == Some(target)
                })
                .map(move |prop| (assoc, prop))
        })
    }

    fn reference_paths<'a>(
        &'a self,
        source: &'a ObjectPath,
        role: Option<&'a str>,
        result_class: Option<&str>,
    ) -> Vec<&'a Instance> {
        let mut found: Vec<&'a Instance> = Vec::new();
        for (assoc, _) in self.referencing(source, role) {
            if self.class_matches(&assoc.path.class_name, result_class)
                && !found.iter().any(|f| f.path == assoc.path)
            {
                found.push(assoc);
            }
        }
        found
    }
}

#[async_trait]
impl WbemConnection for MockRepository {
    fn host(&self) -> &str {
        &self.host
    }

    fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    async fn reference_names(
        &self,
        path: &ObjectPath,
        role: Option<&str>,
        result_class: Option<&str>,
    ) -> TransportResult<Vec<ObjectPath>> {
        let source = self.local(path);
        self.check_namespace(&source)?;
        self.check_fault(MockOperation::ReferenceNames, &source)?;

        let names: Vec<ObjectPath> = self
            .reference_paths(&source, role, result_class)
            .into_iter()
            .map(|assoc| assoc.path.clone())
            .collect();
        tracing::trace!(
            "ReferenceNames({}, role={:?}, result_class={:?}) -> {}",
            source,
            role,
            result_class,
            names.len()
        );
        Ok(names)
    }

    async fn references(
        &self,
        path: &ObjectPath,
        role: Option<&str>,
        result_class: Option<&str>,
    ) -> TransportResult<Vec<Instance>> {
        let source = self.local(path);
        self.check_namespace(&source)?;
        self.check_fault(MockOperation::References, &source)?;

        Ok(self
            .reference_paths(&source, role, result_class)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn get_instance(&self, path: &ObjectPath) -> TransportResult<Instance> {
        let target = self.local(path);
        self.check_namespace(&target)?;
        self.check_fault(MockOperation::GetInstance, &target)?;

        self.instances
            .iter()
            .find(|inst| inst.path == target)
            .cloned()
            .ok_or_else(|| TransportError::not_found(format!("Instance {target} not found")))
    }

    async fn associator_names(
        &self,
        path: &ObjectPath,
        filter: &AssociatorFilter,
    ) -> TransportResult<Vec<ObjectPath>> {
        let source = self.local(path);
        self.check_namespace(&source)?;
        self.check_fault(MockOperation::AssociatorNames, &source)?;

        let mut names: Vec<ObjectPath> = Vec::new();
        for (assoc, source_prop) in self.referencing(&source, filter.role.as_deref()) {
            if !self.class_matches(&assoc.path.class_name, filter.assoc_class.as_deref()) {
                continue;
            }
            for prop in &assoc.properties {
                if std::ptr::eq(prop, source_prop) {
                    continue;
                }
                let Some(target) = prop.reference_target() else {
                    continue;
                };
                let role_ok = filter
                    .result_role
                    .as_deref()
                    .is_none_or(|r| prop.name.eq_ignore_ascii_case(r));
                if role_ok
                    && self.class_matches(&target.class_name, filter.result_class.as_deref())
                    && !names.contains(target)
                {
                    names.push(target.clone());
                }
            }
        }
        tracing::trace!(
            "AssociatorNames({}, {:?}) -> {}",
            source,
            filter,
            names.len()
        );
        Ok(names)
    }
}

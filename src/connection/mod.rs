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

//! WBEM connections.
//!
//! The [`WbemConnection`] trait is the operation set the association shrub
//! consumes. [`ServerDefinition`] describes how to reach a server and opens a
//! session for it.

mod error;
mod server;

use async_trait::async_trait;

use crate::cim::{Instance, ObjectPath, TransportError};

pub use error::ConnectionError;
pub use server::{ServerDefinition, DEFAULT_NAMESPACE, DEFAULT_TIMEOUT, MAX_TIMEOUT};

pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Filters of the AssociatorNames operation. `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociatorFilter {
    pub role: Option<String>,
    pub assoc_class: Option<String>,
    pub result_class: Option<String>,
    pub result_role: Option<String>,
}

impl AssociatorFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(mut self, role: Option<&str>) -> Self {
        self.role = role.map(str::to_string);
        self
    }

    pub fn assoc_class(mut self, assoc_class: Option<&str>) -> Self {
        self.assoc_class = assoc_class.map(str::to_string);
        self
    }

    pub fn result_class(mut self, result_class: Option<&str>) -> Self {
        self.result_class = result_class.map(str::to_string);
        self
    }

    pub fn result_role(mut self, result_role: Option<&str>) -> Self {
        self.result_role = result_role.map(str::to_string);
        self
    }
}

/// Association-related operations of a WBEM server.
///
/// Paths passed in without a namespace refer to [`default_namespace`]. Paths
/// returned may omit host and namespace when they are the ones of the request.
///
/// [`default_namespace`]: WbemConnection::default_namespace
#[async_trait]
pub trait WbemConnection: Send + Sync {
    /// Host name of the server, used to qualify paths returned without one.
    fn host(&self) -> &str;

    fn default_namespace(&self) -> &str;

    /// Paths of the association instances referencing `path`.
    async fn reference_names(
        &self,
        path: &ObjectPath,
        role: Option<&str>,
        result_class: Option<&str>,
    ) -> TransportResult<Vec<ObjectPath>>;

    /// Association instances referencing `path`.
    async fn references(
        &self,
        path: &ObjectPath,
        role: Option<&str>,
        result_class: Option<&str>,
    ) -> TransportResult<Vec<Instance>>;

    async fn get_instance(&self, path: &ObjectPath) -> TransportResult<Instance>;

    /// Paths of the objects associated with `path`.
    async fn associator_names(
        &self,
        path: &ObjectPath,
        filter: &AssociatorFilter,
    ) -> TransportResult<Vec<ObjectPath>>;
}

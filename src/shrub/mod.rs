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

//! Association shrub of a CIM instance.
//!
//! A shrub shows every association the source instance takes part in: the
//! role it plays, the association (reference) class, the role at the other
//! end and the instances found there, grouped by class.
//!
//! Building a shrub is a sequential pipeline over a [`WbemConnection`]:
//!
//! 1. [`discovery::discover_roles`] finds the reference classes and their
//!    candidate roles.
//! 2. [`discovery::resolve_roles`] confirms the roles of the source.
//! 3. [`collector::collect`] gathers the associated classes and instances.
//!
//! The resulting maps are immutable and rendered as a tree or a table.

mod collector;
mod discovery;
mod error;
mod map;
mod normalize;
mod ordered;
mod render;

use owo_colors::OwoColorize;

use crate::cim::{ObjectPath, TransportError};
use crate::connection::WbemConnection;

pub use error::ShrubError;
pub use map::{triples, ClassMap, InstanceMap, Role, RoleMap, RoleTable};
pub use normalize::{display_class, fold, normalize};
pub use ordered::OrderedMap;

/// Restrictions applied while building a shrub. `None` means unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShrubFilters {
    /// Only consider this role of the source
    pub role: Option<String>,
    /// Only consider this association class (exact class name)
    pub assoc_class: Option<String>,
    /// Only consider this role at the other end
    pub result_role: Option<String>,
    /// Only consider associated objects of this class or its subclasses
    pub result_class: Option<String>,
}

/// What to do about reference classes whose representative instance could
/// not be fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SkipPolicy {
    /// Log at debug level only
    #[default]
    Silent,
    /// Log a warning and list the skipped classes with the output
    Warn,
}

impl SkipPolicy {
    fn report(&self, skip: &SkippedReference) {
        match self {
            Self::Silent => tracing::debug!(
                "Skipping reference class {}: {}",
                skip.reference_class,
                skip.error
            ),
            Self::Warn => tracing::warn!(
                "Skipping reference class {}: {}",
                skip.reference_class,
                skip.error
            ),
        }
    }
}

/// How associated instances are grouped by associated class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum CollectionStrategy {
    /// One AssociatorNames request per associated class
    #[default]
    #[value(name = "per-class")]
    PerClassQuery,
    /// Group the first AssociatorNames response by class
    #[value(name = "grouped")]
    ClientGrouping,
}

#[derive(Debug, Clone, Default)]
pub struct ShrubOptions {
    pub filters: ShrubFilters,
    pub skip_policy: SkipPolicy,
    pub strategy: CollectionStrategy,
}

/// A reference class left out of the shrub because its representative
/// instance could not be fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedReference {
    pub reference_class: ObjectPath,
    pub error: TransportError,
}

/// Fill an absent host or namespace from those of `source`.
pub(crate) fn qualify_like(path: &ObjectPath, source: &ObjectPath) -> ObjectPath {
    path.qualify(
        source.host.as_deref().unwrap_or_default(),
        source.namespace.as_deref().unwrap_or_default(),
    )
}

/// Associations of one source instance.
#[derive(Debug, Clone)]
pub struct AssociationShrub {
    source: ObjectPath,
    reference_host: String,
    reference_namespace: String,
    classes: ClassMap,
    instances: InstanceMap,
    skipped: Vec<SkippedReference>,
    skip_policy: SkipPolicy,
}

impl AssociationShrub {
    /// Query `conn` and build the shrub of `source`.
    ///
    /// `source` without host or namespace refers to those of the connection.
    pub async fn build(
        conn: &dyn WbemConnection,
        source: &ObjectPath,
        options: &ShrubOptions,
    ) -> Result<Self, ShrubError> {
        let reference_host = source
            .host
            .clone()
            .unwrap_or_else(|| conn.host().to_string());
        let reference_namespace = source
            .namespace
            .clone()
            .unwrap_or_else(|| conn.default_namespace().to_string());
        let source = source.qualify(&reference_host, &reference_namespace);

        tracing::info!("Building association shrub of {}", source);

        let mut skipped = Vec::new();
        let discovered = discovery::discover_roles(
            conn,
            &source,
            &options.filters,
            options.skip_policy,
            &mut skipped,
        )
        .await?;

        let mut roles = RoleTable::new();
        for (reference_class, candidates) in &discovered {
            let resolved = discovery::resolve_roles(
                conn,
                candidates,
                reference_class,
                &source,
                &options.filters,
            )
            .await?;
            for (role, result_roles) in resolved {
                let result_roles: OrderedMap<Role, ()> =
                    result_roles.into_iter().map(|rr| (rr, ())).collect();
                roles
                    .get_or_insert_with(role, OrderedMap::new)
                    .insert_if_absent(reference_class.clone(), result_roles);
            }
        }

        let (classes, instances) = collector::collect(
            conn,
            &source,
            &roles,
            &options.filters,
            options.strategy,
        )
        .await?;

        Ok(Self {
            source,
            reference_host,
            reference_namespace,
            classes,
            instances,
            skipped,
            skip_policy: options.skip_policy,
        })
    }

    /// Source path, qualified with host and namespace.
    pub fn source(&self) -> &ObjectPath {
        &self.source
    }

    pub fn reference_host(&self) -> &str {
        &self.reference_host
    }

    pub fn reference_namespace(&self) -> &str {
        &self.reference_namespace
    }

    /// role -> reference class -> result role -> associated classes
    pub fn classes(&self) -> &ClassMap {
        &self.classes
    }

    /// role -> reference class -> result role -> associated class -> instances
    pub fn instances(&self) -> &InstanceMap {
        &self.instances
    }

    pub fn skipped(&self) -> &[SkippedReference] {
        &self.skipped
    }

    /// Instances of `associated_class` reached through the given triple.
    pub fn associated_instances(
        &self,
        role: &Role,
        reference_class: &ObjectPath,
        result_role: &Role,
        associated_class: &ObjectPath,
    ) -> &[ObjectPath] {
        self.instances
            .get(role)
            .and_then(|by_class| by_class.get(reference_class))
            .and_then(|by_result_role| by_result_role.get(result_role))
            .and_then(|by_assoc| by_assoc.get(associated_class))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn normalize(&self, path: &ObjectPath) -> ObjectPath {
        normalize(path, &self.reference_host, &self.reference_namespace)
    }

    /// Lines listing the skipped reference classes, empty unless the skip
    /// policy is [`SkipPolicy::Warn`].
    pub fn skipped_report(&self) -> Vec<String> {
        if self.skip_policy != SkipPolicy::Warn || self.skipped.is_empty() {
            return Vec::new();
        }
        let mut lines = vec![format!(
            "{} reference classes skipped:",
            self.skipped.len().to_string().yellow()
        )];
        for skip in &self.skipped {
            let class = display_class(
                &skip.reference_class,
                &self.reference_host,
                &self.reference_namespace,
            )
            .unwrap_or_else(|_| skip.reference_class.to_string());
            lines.push(format!("  {} {}: {}", "⚠".yellow(), class, skip.error));
        }
        lines
    }
}

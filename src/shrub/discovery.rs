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

//! Discovery of the roles the source instance plays in its associations.

use super::error::ShrubError;
use super::map::Role;
use super::{qualify_like, ShrubFilters, SkipPolicy, SkippedReference};
use crate::cim::ObjectPath;
use crate::connection::WbemConnection;

/// Reference classes of `source`, each with the reference property names of
/// one of its instances as candidate roles.
///
/// A reference class whose representative instance cannot be fetched is
/// skipped and recorded in `skipped`. Any other failure aborts.
pub async fn discover_roles(
    conn: &dyn WbemConnection,
    source: &ObjectPath,
    filters: &ShrubFilters,
    skip_policy: SkipPolicy,
    skipped: &mut Vec<SkippedReference>,
) -> Result<Vec<(ObjectPath, Vec<String>)>, ShrubError> {
    let reference_names = conn.reference_names(source, None, None).await?;
    tracing::debug!(
        "ReferenceNames({}) returned {} association instances",
        source,
        reference_names.len()
    );

    let mut seen: Vec<ObjectPath> = Vec::new();
    let mut discovered = Vec::new();

    for name in reference_names {
        let name = qualify_like(&name, source);
        let reference_class = name.class_path();
        if seen.contains(&reference_class) {
            continue;
        }
        seen.push(reference_class.clone());

        if let Some(assoc_class) = filters.assoc_class.as_deref()
            && !reference_class.has_class_name(assoc_class)
        {
            tracing::trace!("Reference class {} filtered out", reference_class);
            continue;
        }

        match conn.get_instance(&name).await {
            Ok(instance) => {
                let candidates = instance.reference_property_names();
                tracing::debug!(
                    "Reference class {} has reference properties {:?}",
                    reference_class,
                    candidates
                );
                discovered.push((reference_class, candidates));
            }
            Err(error) => {
                let skip = SkippedReference {
                    reference_class,
                    error,
                };
                skip_policy.report(&skip);
                skipped.push(skip);
            }
        }
    }

    Ok(discovered)
}

/// Confirm which candidate roles `source` plays in `reference_class`.
///
/// Each confirmed role comes with its result roles: the other candidates,
/// or [`Role::Unlabeled`] when there are none.
pub async fn resolve_roles(
    conn: &dyn WbemConnection,
    candidates: &[String],
    reference_class: &ObjectPath,
    source: &ObjectPath,
    filters: &ShrubFilters,
) -> Result<Vec<(Role, Vec<Role>)>, ShrubError> {
    let mut resolved = Vec::new();

    for candidate in candidates {
        if let Some(role) = filters.role.as_deref()
            && !candidate.eq_ignore_ascii_case(role)
        {
            continue;
        }

        let references = conn
            .reference_names(source, Some(candidate), Some(&reference_class.class_name))
            .await?;
        if references.is_empty() {
            tracing::trace!("{} is not a role of {} in {}", candidate, source, reference_class);
            continue;
        }

        let others: Vec<&String> = candidates
            .iter()
            .filter(|other| !other.eq_ignore_ascii_case(candidate))
            .collect();

        let result_roles: Vec<Role> = if others.is_empty() {
            match filters.result_role {
                Some(_) => Vec::new(),
                None => vec![Role::Unlabeled],
            }
        } else {
            others
                .into_iter()
                .filter(|other| {
                    filters
                        .result_role
                        .as_deref()
                        .is_none_or(|rr| other.eq_ignore_ascii_case(rr))
                })
                .map(|other| Role::named(other.as_str()))
                .collect()
        };

        if result_roles.is_empty() {
            tracing::debug!(
                "Role {} of {} dropped: no result role left after filtering",
                candidate,
                reference_class
            );
            continue;
        }

        tracing::debug!(
            "Role {} confirmed in {} with result roles {:?}",
            candidate,
            reference_class,
            result_roles
        );
        resolved.push((Role::named(candidate.as_str()), result_roles));
    }

    Ok(resolved)
}

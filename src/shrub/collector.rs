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

//! Collection of the objects associated through each confirmed role.

use super::error::ShrubError;
use super::map::{triples, ClassMap, InstanceMap, RoleTable};
use super::ordered::OrderedMap;
use super::{qualify_like, CollectionStrategy, ShrubFilters};
use crate::cim::ObjectPath;
use crate::connection::{AssociatorFilter, WbemConnection};

/// Fill the class and instance maps for every (role, reference class,
/// result role) of `roles`.
///
/// Both maps get an entry for every triple, and every associated class found
/// gets an instance list, even an empty one.
pub async fn collect(
    conn: &dyn WbemConnection,
    source: &ObjectPath,
    roles: &RoleTable,
    filters: &ShrubFilters,
    strategy: CollectionStrategy,
) -> Result<(ClassMap, InstanceMap), ShrubError> {
    let mut classes = ClassMap::new();
    let mut instances = InstanceMap::new();

    for (role, reference_class, result_role, _) in triples(roles) {
        let filter = AssociatorFilter::new()
            .role(role.as_filter())
            .assoc_class(Some(&reference_class.class_name))
            .result_class(filters.result_class.as_deref())
            .result_role(result_role.as_filter());

        let associated: Vec<ObjectPath> = conn
            .associator_names(source, &filter)
            .await?
            .iter()
            .map(|name| qualify_like(name, source))
            .collect();

        let mut associated_classes: Vec<ObjectPath> = Vec::new();
        for name in &associated {
            let class = name.class_path();
            if !associated_classes.contains(&class) {
                associated_classes.push(class);
            }
        }
        tracing::debug!(
            "{}/{}/{}: {} associated instances in {} classes",
            role,
            reference_class,
            result_role,
            associated.len(),
            associated_classes.len()
        );

        let mut by_class: OrderedMap<ObjectPath, Vec<ObjectPath>> = OrderedMap::new();
        for class in &associated_classes {
            let names: Vec<ObjectPath> = match strategy {
                CollectionStrategy::PerClassQuery => {
                    let per_class = filter.clone().result_class(Some(&class.class_name));
                    let names = conn.associator_names(source, &per_class).await?;
                    tracing::trace!("AssociatorNames for {} returned {}", class, names.len());
                    names.iter().map(|name| qualify_like(name, source)).collect()
                }
                CollectionStrategy::ClientGrouping => associated.clone(),
            };
            by_class.insert_if_absent(class.clone(), instances_of(class, names));
        }

        classes
            .get_or_insert_with(role.clone(), OrderedMap::new)
            .get_or_insert_with(reference_class.clone(), OrderedMap::new)
            .insert_if_absent(result_role.clone(), associated_classes);
        instances
            .get_or_insert_with(role.clone(), OrderedMap::new)
            .get_or_insert_with(reference_class.clone(), OrderedMap::new)
            .insert_if_absent(result_role.clone(), by_class);
    }

    Ok((classes, instances))
}

/// Distinct names whose class path is exactly `class`. A result class filter
/// also matches subclasses, whose instances belong under their own class.
fn instances_of(class: &ObjectPath, names: Vec<ObjectPath>) -> Vec<ObjectPath> {
    let mut kept: Vec<ObjectPath> = Vec::new();
    for name in names {
        if name.class_path() == *class && !kept.contains(&name) {
            kept.push(name);
        }
    }
    kept
}

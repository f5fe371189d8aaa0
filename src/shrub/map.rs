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

//! Key types and nested maps of an association shrub.

use std::fmt;

use super::ordered::OrderedMap;
use crate::cim::ObjectPath;

/// Name of a reference property of an association class.
///
/// `Unlabeled` is used as result role when an association has no reference
/// property besides the source role; it displays as `None`.
#[derive(Debug, Clone, Eq)]
pub enum Role {
    Named(String),
    Unlabeled,
}

impl Role {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Property name to pass as role filter, `None` when unlabeled.
    pub fn as_filter(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Unlabeled => None,
        }
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Named(a), Self::Named(b)) => a.eq_ignore_ascii_case(b),
            (Self::Unlabeled, Self::Unlabeled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Unlabeled => f.write_str("None"),
        }
    }
}

/// role -> reference class -> result role -> `T`
pub type RoleMap<T> = OrderedMap<Role, OrderedMap<ObjectPath, OrderedMap<Role, T>>>;

/// Result roles confirmed per role and reference class.
pub type RoleTable = RoleMap<()>;

/// Associated classes per (role, reference class, result role).
pub type ClassMap = RoleMap<Vec<ObjectPath>>;

/// Associated instance paths per (role, reference class, result role,
/// associated class).
pub type InstanceMap = RoleMap<OrderedMap<ObjectPath, Vec<ObjectPath>>>;

/// Flatten a [`RoleMap`] into `(role, reference class, result role, value)`
/// in insertion order.
pub fn triples<T>(map: &RoleMap<T>) -> impl Iterator<Item = (&Role, &ObjectPath, &Role, &T)> {
    map.iter().flat_map(|(role, by_class)| {
        by_class.iter().flat_map(move |(reference_class, by_result_role)| {
            by_result_role
                .iter()
                .map(move |(result_role, value)| (role, reference_class, result_role, value))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display_and_equality() {
        assert_eq!(Role::named("Antecedent").to_string(), "Antecedent");
        assert_eq!(Role::Unlabeled.to_string(), "None");
        assert_eq!(Role::named("antecedent"), Role::named("ANTECEDENT"));
        assert_ne!(Role::named("None"), Role::Unlabeled);
        assert_eq!(Role::Unlabeled.as_filter(), None);
    }

    #[test]
    fn test_triples_in_insertion_order() {
        let mut map: ClassMap = OrderedMap::new();
        let r = ObjectPath::class("R");
        map.get_or_insert_with(Role::named("a"), OrderedMap::new)
            .get_or_insert_with(r.clone(), OrderedMap::new)
            .insert_if_absent(Role::named("b"), vec![ObjectPath::class("B")]);
        map.get_or_insert_with(Role::named("a"), OrderedMap::new)
            .get_or_insert_with(r.clone(), OrderedMap::new)
            .insert_if_absent(Role::named("c"), Vec::new());

        let flat: Vec<String> = triples(&map)
            .map(|(role, rc, rr, classes)| format!("{role}/{}/{rr}/{}", rc.class_name, classes.len()))
            .collect();
        assert_eq!(flat, vec!["a/R/b/1", "a/R/c/0"]);
    }
}

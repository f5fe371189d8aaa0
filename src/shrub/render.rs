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

//! Tree and table views of a shrub.

use super::error::ShrubError;
use super::map::triples;
use super::normalize::{display_class, fold};
use super::AssociationShrub;
use crate::cim::{ObjectPath, UriFormat};
use crate::ui::{LabeledTree, ShrubTable};

impl AssociationShrub {
    fn display_path(&self, path: &ObjectPath) -> Result<String, ShrubError> {
        Ok(self.normalize(path).to_wbem_uri(UriFormat::Standard)?)
    }

    fn display_class(&self, path: &ObjectPath) -> Result<String, ShrubError> {
        Ok(display_class(
            path,
            self.reference_host(),
            self.reference_namespace(),
        )?)
    }

    /// Tree of roles, reference classes, result roles and associated classes.
    ///
    /// Associated classes without instances are left out. With `summary`
    /// the instance paths are left out and only their count is shown.
    pub fn to_tree(&self, summary: bool) -> Result<LabeledTree, ShrubError> {
        let mut root = LabeledTree::new(self.display_path(self.source())?);

        for (role, by_reference_class) in self.classes().iter() {
            let role_node = root.push(LabeledTree::new(format!("{role}(Role)")));

            for (reference_class, by_result_role) in by_reference_class.iter() {
                let class_node = role_node.push(LabeledTree::new(format!(
                    "{}(AssocClass)",
                    self.display_class(reference_class)?
                )));

                for (result_role, associated_classes) in by_result_role.iter() {
                    let result_role_node =
                        class_node.push(LabeledTree::new(format!("{result_role}(ResultRole)")));

                    for associated_class in associated_classes {
                        let instances = self.associated_instances(
                            role,
                            reference_class,
                            result_role,
                            associated_class,
                        );
                        if instances.is_empty() {
                            continue;
                        }

                        let result_class_node = result_role_node.push(LabeledTree::new(format!(
                            "{}(ResultClass)({} insts)",
                            self.display_class(associated_class)?,
                            instances.len()
                        )));
                        if !summary {
                            for instance in instances {
                                result_class_node
                                    .push(LabeledTree::new(self.display_path(instance)?));
                            }
                        }
                    }
                }
            }
        }

        Ok(root)
    }

    /// One row per associated class, including classes without instances.
    ///
    /// The last column holds the instance count with `summary`, otherwise the
    /// instance paths, one per line, folded when longer than `fold_width`.
    /// The title names the fully qualified source.
    pub fn to_table(&self, summary: bool, fold_width: usize) -> Result<ShrubTable, ShrubError> {
        let headers = [
            "Role",
            "Reference Class",
            "ResultRole",
            "Associated Class",
            if summary {
                "Assoc Inst Count"
            } else {
                "Assoc Inst paths"
            },
        ]
        .map(str::to_string)
        .to_vec();
        let mut table = ShrubTable::new(
            format!(
                "Shrub of {}",
                self.source().to_wbem_uri(UriFormat::Standard)?
            ),
            headers,
        );

        for (role, reference_class, result_role, associated_classes) in triples(self.classes()) {
            for associated_class in associated_classes {
                let instances =
                    self.associated_instances(role, reference_class, result_role, associated_class);
                let last_cell = if summary {
                    instances.len().to_string()
                } else {
                    instances
                        .iter()
                        .map(|path| {
                            fold(
                                path,
                                UriFormat::Standard,
                                fold_width,
                                self.reference_host(),
                                self.reference_namespace(),
                            )
                        })
                        .collect::<Result<Vec<_>, _>>()?
                        .join("\n")
                };

                table.push_row(vec![
                    role.to_string(),
                    self.display_class(reference_class)?,
                    result_role.to_string(),
                    self.display_class(associated_class)?,
                    last_cell,
                ]);
            }
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use crate::cim::{DEFAULT_FOLD_WIDTH, Instance, ObjectPath, Property};
    use crate::mock::MockRepository;
    use crate::shrub::{AssociationShrub, ShrubOptions};

    fn a(key: i64) -> ObjectPath {
        ObjectPath::instance("A").with_key("key", key)
    }

    fn b(key: i64) -> ObjectPath {
        ObjectPath::instance("B").with_key("key", key)
    }

    async fn shrub() -> AssociationShrub {
        let repo = MockRepository::new("mockhost", "root/cimv2")
            .with_instance(Instance::new(a(1)))
            .with_instance(
                Instance::new(ObjectPath::instance("R").with_key("id", 1i64))
                    .with_property(Property::reference("antecedent", a(1)))
                    .with_property(Property::reference("dependent", b(2))),
            )
            .with_instance(
                Instance::new(ObjectPath::instance("R").with_key("id", 2i64))
                    .with_property(Property::reference("antecedent", a(1)))
                    .with_property(Property::reference("dependent", b(3))),
            );
        AssociationShrub::build(&repo, &a(1), &ShrubOptions::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_tree() {
        let tree = shrub().await.to_tree(false).unwrap();
        let expected = "\
/:A.key=1
 +-- antecedent(Role)
     +-- R(AssocClass)
         +-- dependent(ResultRole)
             +-- B(ResultClass)(2 insts)
                 +-- /:B.key=2
                 +-- /:B.key=3
";
        assert_eq!(tree.render(), expected);
    }

    #[tokio::test]
    async fn test_summary_tree_omits_instances() {
        let tree = shrub().await.to_tree(true).unwrap();
        let rendered = tree.render();
        assert!(rendered.contains("B(ResultClass)(2 insts)"));
        assert!(!rendered.contains("/:B.key=2"));
    }

    #[tokio::test]
    async fn test_table() {
        let shrub = shrub().await;

        let table = shrub.to_table(false, DEFAULT_FOLD_WIDTH).unwrap();
        assert_eq!(table.title(), "Shrub of //mockhost/root/cimv2:A.key=1");
        assert_eq!(table.headers()[4], "Assoc Inst paths");
        assert_eq!(
            table.rows(),
            &[vec![
                "antecedent".to_string(),
                "R".to_string(),
                "dependent".to_string(),
                "B".to_string(),
                "/:B.key=2\n/:B.key=3".to_string(),
            ]]
        );

        let summary = shrub.to_table(true, DEFAULT_FOLD_WIDTH).unwrap();
        assert_eq!(summary.headers()[4], "Assoc Inst Count");
        assert_eq!(summary.rows()[0][4], "2");
    }
}

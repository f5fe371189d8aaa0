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

const BRANCH: &str = " +-- ";
/// Nesting prefixes. `BRANCH` supplies the leading column.
const CONTINUE: &str = " |  ";
const BLANK: &str = "    ";

/// Tree of text labels, drawn with ASCII branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledTree {
    label: String,
    children: Vec<LabeledTree>,
}

impl LabeledTree {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// Append a child and return it for further nesting.
    pub fn push(&mut self, child: LabeledTree) -> &mut LabeledTree {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Draw the tree, one label per line.
    ///
    /// ```text
    /// root
    ///  +-- child
    ///  |   +-- grandchild
    ///  +-- last child
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        push_label(&mut out, "", "", &self.label);
        self.render_children(&mut out, "");
        out
    }

    fn render_children(&self, out: &mut String, prefix: &str) {
        let count = self.children.len();
        for (i, child) in self.children.iter().enumerate() {
            let last = i + 1 == count;
            let continuation = format!("{prefix}{}", if last { BLANK } else { CONTINUE });
            push_label(
                out,
                &format!("{prefix}{BRANCH}"),
                &format!("{continuation} "),
                &child.label,
            );
            child.render_children(out, &continuation);
        }
    }
}

/// Multi-line labels continue under their first line.
fn push_label(out: &mut String, first: &str, rest: &str, label: &str) {
    let mut lines = label.lines();
    let head = lines.next().unwrap_or_default();
    out.push_str(first);
    out.push_str(head);
    out.push('\n');
    for line in lines {
        out.push_str(rest);
        out.push_str(line);
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_nested() {
        let mut root = LabeledTree::new("root");
        let a = root.push(LabeledTree::new("a"));
        a.push(LabeledTree::new("a1"));
        a.push(LabeledTree::new("a2"));
        root.push(LabeledTree::new("b"))
            .push(LabeledTree::new("b1"));

        let expected = "\
root
 +-- a
 |   +-- a1
 |   +-- a2
 +-- b
     +-- b1
";
        assert_eq!(root.render(), expected);
    }

    #[test]
    fn test_render_deep_nesting() {
        let mut root = LabeledTree::new("r");
        let a = root.push(LabeledTree::new("a"));
        let b = a.push(LabeledTree::new("b"));
        b.push(LabeledTree::new("c"));
        a.push(LabeledTree::new("d"));

        let expected = "\
r
 +-- a
     +-- b
     |   +-- c
     +-- d
";
        assert_eq!(root.render(), expected);
    }

    #[test]
    fn test_multiline_label_with_children() {
        let mut root = LabeledTree::new("root");
        root.push(LabeledTree::new("first\nsecond"))
            .push(LabeledTree::new("leaf"));

        assert_eq!(
            root.render(),
            "root\n +-- first\n     second\n     +-- leaf\n"
        );
    }

    #[test]
    fn test_render_single_node() {
        assert_eq!(LabeledTree::new("alone").render(), "alone\n");
    }

    #[test]
    fn test_multiline_label_is_indented() {
        let mut root = LabeledTree::new("root");
        root.push(LabeledTree::new("first\nsecond"));
        root.push(LabeledTree::new("next"));
        assert_eq!(
            root.render(),
            "root\n +-- first\n |   second\n +-- next\n"
        );
    }
}

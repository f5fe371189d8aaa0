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

use tabled::{builder::Builder, settings::Style};

/// Border style of a rendered table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableFormat {
    Plain,
    #[default]
    Simple,
    Grid,
    Psql,
    Rst,
    Markdown,
}

/// Titled table of text cells. Cells may span several lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShrubTable {
    title: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ShrubTable {
    pub fn new(title: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            title: title.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Lay out the rows under the headers, without the title.
    pub fn render(&self, format: TableFormat) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.headers.iter().cloned());
        for row in &self.rows {
            builder.push_record(row.iter().cloned());
        }

        let mut table = builder.build();
        match format {
            TableFormat::Plain => table.with(Style::blank()),
            TableFormat::Simple => table.with(Style::modern()),
            TableFormat::Grid => table.with(Style::ascii()),
            TableFormat::Psql => table.with(Style::psql()),
            TableFormat::Rst => table.with(Style::re_structured_text()),
            TableFormat::Markdown => table.with(Style::markdown()),
        };
        table.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ShrubTable {
        let mut table = ShrubTable::new(
            "Shrub of A.key=1",
            vec!["Role".to_string(), "Count".to_string()],
        );
        table.push_row(vec!["antecedent".to_string(), "2".to_string()]);
        table.push_row(vec!["dependent".to_string(), "0".to_string()]);
        table
    }

    #[test]
    fn test_render_contains_cells() {
        let rendered = table().render(TableFormat::Psql);
        assert!(rendered.contains("Role"));
        assert!(rendered.contains("antecedent"));
        assert!(rendered.contains("dependent"));
        assert!(!rendered.contains("Shrub of"));
    }

    #[test]
    fn test_markdown_layout() {
        let rendered = table().render(TableFormat::Markdown);
        let first = rendered.lines().next().unwrap();
        assert!(first.starts_with('|'));
        assert!(first.contains("Role"));
        assert_eq!(rendered.lines().count(), 4);
    }

    #[test]
    fn test_multiline_cell() {
        let mut table = ShrubTable::new("t", vec!["Paths".to_string()]);
        table.push_row(vec!["/:B.\nkey=2".to_string()]);
        let rendered = table.render(TableFormat::Grid);
        assert!(rendered.contains("/:B."));
        assert!(rendered.contains("key=2"));
    }
}

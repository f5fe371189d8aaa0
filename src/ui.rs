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

mod table;
mod tree;

use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

pub use table::{ShrubTable, TableFormat};
pub use tree::LabeledTree;

/// Output format selected with `--output-format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// ASCII tree
    #[default]
    Tree,
    /// Table in the default style
    Table,
    Plain,
    Simple,
    Grid,
    Psql,
    Rst,
    Markdown,
}

impl OutputFormat {
    /// Table style for table formats, `None` for the tree.
    pub fn table_format(&self) -> Option<TableFormat> {
        match self {
            Self::Tree => None,
            Self::Table => Some(TableFormat::default()),
            Self::Plain => Some(TableFormat::Plain),
            Self::Simple => Some(TableFormat::Simple),
            Self::Grid => Some(TableFormat::Grid),
            Self::Psql => Some(TableFormat::Psql),
            Self::Rst => Some(TableFormat::Rst),
            Self::Markdown => Some(TableFormat::Markdown),
        }
    }
}

fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

pub struct OutputFormatter;

impl OutputFormatter {
    /// Title centred between two rules spanning the terminal.
    pub fn format_header(title: &str) -> String {
        let width = terminal_width().max(title.width() + 2);
        let border = "─".repeat(width);
        let padding = (width - title.width() - 2) / 2;

        format!(
            "{}\n{}{}\n{}",
            border.dimmed(),
            " ".repeat(padding),
            format!(" {title} ").cyan().bold(),
            border.dimmed()
        )
    }

    /// `▶ label` section line, as printed before listings.
    pub fn format_section(label: &str) -> String {
        format!("{} {}", "▶".cyan(), label.bold())
    }

    pub fn format_warning(message: &str) -> String {
        format!("{} {}", "⚠".yellow(), message.yellow())
    }
}

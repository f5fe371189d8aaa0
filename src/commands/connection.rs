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

use owo_colors::OwoColorize;

use crate::config::Config;
use crate::connection::ServerDefinition;
use crate::ui::OutputFormatter;

/// Describe the current connection, password masked.
pub fn show_connection(def: &ServerDefinition) -> String {
    let rows = def.describe();
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    let mut output = format!("\n{}\n\n", OutputFormatter::format_section("Connection"));
    for (label, value) in rows {
        let value = if value.is_empty() {
            "-".dimmed().to_string()
        } else {
            value
        };
        output.push_str(&format!("  {:<width$}  {}\n", format!("{label}:"), value, width = width + 1));
    }
    output
}

/// List the connections of the configuration file. The default connection
/// is marked with `*`, the current one is bold.
pub fn list_connections(config: &Config, current: Option<&str>) -> String {
    if config.connections.is_empty() {
        return format!("{}\n", "No connections configured".dimmed());
    }

    let mut output = format!(
        "\n{} {}\n\n",
        "▶".cyan(),
        "Available connections".bold()
    );
    for (name, connection) in &config.connections {
        let marker = if config.default.as_deref() == Some(name.as_str()) {
            "*".green().to_string()
        } else {
            " ".to_string()
        };
        let target = connection
            .server
            .clone()
            .or_else(|| connection.mock_server.as_ref().map(|m| format!("mock: {m}")))
            .unwrap_or_default();
        let name = if current == Some(name.as_str()) {
            name.bold().to_string()
        } else {
            name.clone()
        };
        output.push_str(&format!(
            "  {} {} {} {}\n",
            marker,
            "●".blue(),
            name,
            target.dimmed()
        ));
    }
    output.push('\n');
    output
}

/// Shell statements recreating the current connection through environment
/// variables.
pub fn export_connection(def: &ServerDefinition) -> String {
    let mut output = def.export_statements().join("\n");
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionConfig;
    use zeroize::Zeroizing;

    #[test]
    fn test_show_masks_password() {
        let def = ServerDefinition {
            server: Some("https://srv".to_string()),
            user: Some("fred".to_string()),
            password: Some(Zeroizing::new("blah".to_string())),
            ..Default::default()
        };
        let shown = show_connection(&def);
        assert!(shown.contains("https://srv"));
        assert!(shown.contains("********"));
        assert!(!shown.contains("blah"));
    }

    #[test]
    fn test_list_connections() {
        let mut config = Config {
            default: Some("dev".to_string()),
            ..Default::default()
        };
        config.connections.insert(
            "dev".to_string(),
            ConnectionConfig {
                mock_server: Some("repo.yaml".to_string()),
                ..Default::default()
            },
        );
        config.connections.insert(
            "prod".to_string(),
            ConnectionConfig {
                server: Some("https://cimom".to_string()),
                ..Default::default()
            },
        );

        let listed = list_connections(&config, None);
        assert!(listed.contains("dev"));
        assert!(listed.contains("mock: repo.yaml"));
        assert!(listed.contains("https://cimom"));
        assert!(listed.find("dev").unwrap() < listed.find("prod").unwrap());

        assert!(list_connections(&Config::default(), None).contains("No connections configured"));
    }

    #[test]
    fn test_export_connection() {
        let def = ServerDefinition {
            mock_server: Some("repo.yaml".into()),
            ..Default::default()
        };
        let exported = export_connection(&def);
        assert!(exported.contains("export WBEMCLI_MOCK_SERVER=repo.yaml\n"));
        assert!(exported.ends_with('\n'));
    }
}

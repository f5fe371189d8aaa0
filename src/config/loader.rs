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

//! Configuration loading.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::types::Config;
use super::utils::expand_tilde;

const CONFIG_FILE_NAME: &str = "connections.yaml";

impl Config {
    /// Load configuration from a file. A missing file is an empty configuration.
    pub async fn load(path: &Path) -> Result<Self> {
        let expanded_path = expand_tilde(path);

        if !expanded_path.exists() {
            tracing::debug!(
                "Config file not found at {:?}, using defaults",
                expanded_path
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&expanded_path)
            .await
            .with_context(|| format!("Failed to read configuration file at {}. Please check file permissions and ensure the file is accessible.", expanded_path.display()))?;

        Self::parse(&content).with_context(|| {
            format!(
                "Failed to parse YAML configuration file at {}. Please check the YAML syntax is valid.",
                expanded_path.display()
            )
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        // An empty file is valid and means no connections.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load configuration with priority order:
    /// 1. Explicit `--config` path
    /// 2. `connections.yaml` in the current directory
    /// 3. `$XDG_CONFIG_HOME/wbemcli/connections.yaml` or the platform config
    ///    directory (`~/.config/wbemcli/connections.yaml` on Linux)
    pub async fn load_with_priority(cli_config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = cli_config_path {
            tracing::debug!("Using explicitly specified config file: {:?}", path);
            return Self::load(path).await;
        }

        let current_dir_config = PathBuf::from(CONFIG_FILE_NAME);
        if current_dir_config.exists() {
            tracing::debug!("Found {} in current directory", CONFIG_FILE_NAME);
            return Self::load(&current_dir_config).await;
        }

        match Self::default_path() {
            Some(path) => Self::load(&path).await,
            None => {
                tracing::debug!("No config directory found, using default empty configuration");
                Ok(Self::default())
            }
        }
    }

    /// Standard location of the configuration file.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME") {
            return Some(
                PathBuf::from(xdg_config_home)
                    .join("wbemcli")
                    .join(CONFIG_FILE_NAME),
            );
        }
        ProjectDirs::from("", "", "wbemcli").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

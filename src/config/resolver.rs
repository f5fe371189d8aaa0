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

//! Resolution of the server definition from options and configuration.

use std::path::PathBuf;
use zeroize::Zeroizing;

use super::types::{Config, ConnectionConfig};
use super::utils::{expand_env_vars, expand_path};
use crate::connection::{ConnectionError, ServerDefinition, DEFAULT_NAMESPACE, DEFAULT_TIMEOUT};

/// Name of a definition built from `--server` or `--mock-server`.
pub const UNSAVED_CONNECTION_NAME: &str = "not-saved";

/// Connection options given on the command line or in `WBEMCLI_*` variables.
#[derive(Debug, Default, Clone)]
pub struct ConnectionOverrides {
    pub server: Option<String>,
    pub mock_server: Option<PathBuf>,
    pub name: Option<String>,
    pub default_namespace: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub timeout: Option<u64>,
    pub noverify: bool,
    pub certfile: Option<PathBuf>,
    pub keyfile: Option<PathBuf>,
    pub ca_certs: Option<PathBuf>,
}

impl Config {
    pub fn connection(&self, name: &str) -> Option<&ConnectionConfig> {
        self.connections.get(name)
    }

    pub fn connection_names(&self) -> Vec<&str> {
        self.connections.keys().map(String::as_str).collect()
    }

    /// Build the server definition for this invocation.
    ///
    /// A server or mock server option defines an unnamed connection. Otherwise
    /// the connection named by `--name`, or the configured default, is used.
    /// Each setting comes from the options, then the named connection, then
    /// the file defaults.
    pub fn resolve_server(
        &self,
        overrides: &ConnectionOverrides,
    ) -> Result<ServerDefinition, ConnectionError> {
        let explicit_target = overrides.server.is_some() || overrides.mock_server.is_some();

        let (name, saved) = if explicit_target {
            (UNSAVED_CONNECTION_NAME.to_string(), None)
        } else if let Some(name) = overrides.name.as_ref().or(self.default.as_ref()) {
            let saved = self
                .connection(name)
                .ok_or_else(|| ConnectionError::UnknownConnection {
                    name: name.clone(),
                    available: self.connection_names().join(", "),
                })?;
            tracing::debug!("Using connection '{}' from configuration", name);
            (name.clone(), Some(saved))
        } else {
            (UNSAVED_CONNECTION_NAME.to_string(), None)
        };

        let empty = ConnectionConfig::default();
        let saved = saved.unwrap_or(&empty);
        let defaults = &self.defaults;

        let text = |value: &Option<String>| value.as_deref().map(expand_env_vars);
        let path = |value: &Option<String>| value.as_deref().map(expand_path);

        let server = overrides.server.clone().or_else(|| {
            if overrides.mock_server.is_some() {
                None
            } else {
                text(&saved.server)
            }
        });
        let mock_server = overrides.mock_server.clone().or_else(|| {
            if overrides.server.is_some() {
                None
            } else {
                path(&saved.mock_server)
            }
        });

        Ok(ServerDefinition {
            name,
            server,
            mock_server,
            default_namespace: overrides
                .default_namespace
                .clone()
                .or_else(|| text(&saved.default_namespace))
                .or_else(|| text(&defaults.default_namespace))
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            user: overrides
                .user
                .clone()
                .or_else(|| text(&saved.user))
                .or_else(|| text(&defaults.user)),
            password: overrides
                .password
                .clone()
                .or_else(|| saved.password.clone())
                .map(Zeroizing::new),
            timeout: overrides
                .timeout
                .or(saved.timeout)
                .or(defaults.timeout)
                .unwrap_or(DEFAULT_TIMEOUT),
            noverify: overrides.noverify
                || saved.noverify.or(defaults.noverify).unwrap_or(false),
            certfile: overrides
                .certfile
                .clone()
                .or_else(|| path(&saved.certfile))
                .or_else(|| path(&defaults.certfile)),
            keyfile: overrides
                .keyfile
                .clone()
                .or_else(|| path(&saved.keyfile))
                .or_else(|| path(&defaults.keyfile)),
            ca_certs: overrides
                .ca_certs
                .clone()
                .or_else(|| path(&saved.ca_certs))
                .or_else(|| path(&defaults.ca_certs)),
        })
    }
}

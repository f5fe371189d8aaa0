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

//! Server definition: where a WBEM server lives and how to log in to it.
//!
//! The definition is built early from CLI options and the configuration file,
//! but a session is only opened when a command needs the server. This allows
//! the password to be requested only when a connection is actually made.

use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;
use zeroize::Zeroizing;

use super::error::ConnectionError;
use super::WbemConnection;
use crate::mock::MockRepository;

pub const DEFAULT_NAMESPACE: &str = "root/cimv2";
pub const DEFAULT_TIMEOUT: u64 = 30;
pub const MAX_TIMEOUT: u64 = 300;
const DEFAULT_URI_SCHEME: &str = "https";

/// Connection parameters for one WBEM server.
#[derive(Clone)]
pub struct ServerDefinition {
    pub name: String,
    pub server: Option<String>,
    pub mock_server: Option<PathBuf>,
    pub default_namespace: String,
    pub user: Option<String>,
    pub password: Option<Zeroizing<String>>,
    pub timeout: u64,
    pub noverify: bool,
    pub certfile: Option<PathBuf>,
    pub keyfile: Option<PathBuf>,
    pub ca_certs: Option<PathBuf>,
}

impl Default for ServerDefinition {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            server: None,
            mock_server: None,
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            user: None,
            password: None,
            timeout: DEFAULT_TIMEOUT,
            noverify: false,
            certfile: None,
            keyfile: None,
            ca_certs: None,
        }
    }
}

impl fmt::Debug for ServerDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerDefinition")
            .field("name", &self.name)
            .field("server", &self.server)
            .field("mock_server", &self.mock_server)
            .field("default_namespace", &self.default_namespace)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("timeout", &self.timeout)
            .field("noverify", &self.noverify)
            .field("certfile", &self.certfile)
            .field("keyfile", &self.keyfile)
            .field("ca_certs", &self.ca_certs)
            .finish()
    }
}

impl ServerDefinition {
    /// Check option combinations that can be rejected before connecting.
    pub fn validate(&self) -> Result<(), ConnectionError> {
        if self.timeout > MAX_TIMEOUT {
            return Err(ConnectionError::TimeoutOutOfRange {
                timeout: self.timeout,
                min: 0,
                max: MAX_TIMEOUT,
            });
        }
        if self.keyfile.is_some() && self.certfile.is_none() {
            return Err(ConnectionError::KeyfileWithoutCertfile);
        }
        Ok(())
    }

    /// Server URI completed with the default scheme when none is given.
    pub fn server_uri(&self) -> Result<String, ConnectionError> {
        let server = self.server.as_deref().ok_or(ConnectionError::NoServer)?;
        validate_server_uri(server)
    }

    pub fn has_target(&self) -> bool {
        self.server.is_some() || self.mock_server.is_some()
    }

    /// Prompt for the password when a user is set without one.
    pub fn ensure_password(&mut self) -> Result<()> {
        if let Some(user) = &self.user
            && self.password.is_none()
        {
            tracing::debug!("Prompting for password of user {}", user);
            let password = Zeroizing::new(
                rpassword::prompt_password(format!("Enter password (user {user}): "))
                    .with_context(|| "Failed to read password")?,
            );
            self.password = Some(password);
        }
        Ok(())
    }

    /// Open a session for this definition.
    ///
    /// A mock server repository takes precedence over a server URI.
    pub async fn open(&mut self) -> Result<Box<dyn WbemConnection>> {
        self.validate()?;

        if let Some(mock_path) = &self.mock_server {
            tracing::debug!("Opening mock server from {:?}", mock_path);
            let repository = MockRepository::load(mock_path, &self.default_namespace)
                .await
                .with_context(|| format!("Failed to load mock server {}", mock_path.display()))?;
            return Ok(Box::new(repository));
        }

        let uri = self.server_uri()?;
        self.ensure_password()?;
        tracing::debug!("Connecting to {} as {:?}", uri, self.user);
        Err(ConnectionError::TransportUnavailable { server: uri }.into())
    }

    /// `(label, value)` pairs describing the definition, password masked.
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        let opt = |value: Option<String>| value.unwrap_or_default();
        let path = |value: &Option<PathBuf>| opt(value.as_ref().map(|p| p.display().to_string()));
        vec![
            ("Name", self.name.clone()),
            ("Server", opt(self.server.clone())),
            ("Mock-server", path(&self.mock_server)),
            ("Default-namespace", self.default_namespace.clone()),
            ("User", opt(self.user.clone())),
            (
                "Password",
                opt(self.password.as_ref().map(|_| "********".to_string())),
            ),
            ("Timeout", self.timeout.to_string()),
            ("Noverify", self.noverify.to_string()),
            ("Certfile", path(&self.certfile)),
            ("Keyfile", path(&self.keyfile)),
            ("Ca-certs", path(&self.ca_certs)),
        ]
    }

    /// Shell `export` statements that recreate this definition through the
    /// environment variables read by the CLI.
    pub fn export_statements(&self) -> Vec<String> {
        let mut vars: Vec<(&str, String)> = Vec::new();
        if let Some(server) = &self.server {
            vars.push(("WBEMCLI_SERVER", server.clone()));
        }
        if let Some(mock) = &self.mock_server {
            vars.push(("WBEMCLI_MOCK_SERVER", mock.display().to_string()));
        }
        vars.push(("WBEMCLI_DEFAULT_NAMESPACE", self.default_namespace.clone()));
        if let Some(user) = &self.user {
            vars.push(("WBEMCLI_USER", user.clone()));
        }
        if let Some(password) = &self.password {
            vars.push(("WBEMCLI_PASSWORD", password.as_str().to_string()));
        }
        vars.push(("WBEMCLI_TIMEOUT", self.timeout.to_string()));
        if self.noverify {
            vars.push(("WBEMCLI_NOVERIFY", "true".to_string()));
        }
        if let Some(certfile) = &self.certfile {
            vars.push(("WBEMCLI_CERTFILE", certfile.display().to_string()));
        }
        if let Some(keyfile) = &self.keyfile {
            vars.push(("WBEMCLI_KEYFILE", keyfile.display().to_string()));
        }
        if let Some(ca_certs) = &self.ca_certs {
            vars.push(("WBEMCLI_CA_CERTS", ca_certs.display().to_string()));
        }

        vars.into_iter()
            .map(|(name, value)| format!("export {name}={value}"))
            .collect()
    }
}

/// Validate a server URI and complete it with the default scheme.
///
/// Accepted forms: a local path starting with `/`, `http://...`,
/// `https://...`, or a bare `host[:port]`.
pub fn validate_server_uri(server: &str) -> Result<String, ConnectionError> {
    if server.is_empty() {
        return Err(ConnectionError::EmptyServer);
    }
    if server.starts_with('/') {
        return Ok(server.to_string());
    }

    let lower = server.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Ok(server.to_string());
    }

    if let Some(idx) = server.find("://")
        && idx > 0
        && server[..idx].chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(ConnectionError::InvalidScheme {
            server: server.to_string(),
        });
    }

    Ok(format!("{DEFAULT_URI_SCHEME}://{server}"))
}

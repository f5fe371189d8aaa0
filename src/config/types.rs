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

//! Configuration type definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Contents of `connections.yaml`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Connection used when neither a server nor a name is given
    #[serde(default)]
    pub default: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub connections: BTreeMap<String, ConnectionConfig>,
}

/// Settings applied to every connection unless overridden.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Defaults {
    pub default_namespace: Option<String>,
    pub user: Option<String>,
    pub timeout: Option<u64>,
    pub noverify: Option<bool>,
    pub certfile: Option<String>,
    pub keyfile: Option<String>,
    pub ca_certs: Option<String>,
}

/// A named WBEM server.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct ConnectionConfig {
    pub server: Option<String>,
    /// Mock repository file used instead of a server
    pub mock_server: Option<String>,
    pub default_namespace: Option<String>,
    pub user: Option<String>,
    /// Stored in clear text; leave unset to be prompted
    pub password: Option<String>,
    pub timeout: Option<u64>,
    pub noverify: Option<bool>,
    pub certfile: Option<String>,
    pub keyfile: Option<String>,
    pub ca_certs: Option<String>,
}

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

//! Errors raised while validating a server definition or opening a session.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectionError {
    /// No server, mock server or named connection was given
    #[error(
        "No server defined for a command that requires one. Define a server with \"--server\", \"--mock-server\" or \"--name\""
    )]
    NoServer,

    #[error("Server URI is empty. Cannot connect.")]
    EmptyServer,

    #[error("Invalid scheme on server argument '{server}'. Use \"http\" or \"https\"")]
    InvalidScheme { server: String },

    #[error("timeout option ({timeout}) out of range {min} to {max} sec")]
    TimeoutOutOfRange { timeout: u64, min: u64, max: u64 },

    #[error("keyfile option requires certfile option")]
    KeyfileWithoutCertfile,

    #[error("connection '{name}' not found in configuration. Available connections: {available}")]
    UnknownConnection { name: String, available: String },

    #[error(
        "no CIM-XML transport is available for '{server}'; run against a repository with \"--mock-server\""
    )]
    TransportUnavailable { server: String },
}

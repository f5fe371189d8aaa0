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

use std::path::PathBuf;
use thiserror::Error;

use crate::cim::PathError;

/// Errors raised while loading a mock repository file.
#[derive(Debug, Error)]
pub enum MockError {
    #[error("failed to read mock repository {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse mock repository {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid path in mock repository ({context})")]
    InvalidPath {
        context: String,
        #[source]
        source: PathError,
    },

    #[error("property '{property}' of {instance} is a reference without a reference value")]
    MissingReference { instance: String, property: String },

    #[error("unknown operation '{0}' in fault definition")]
    UnknownOperation(String),
}

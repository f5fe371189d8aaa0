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

//! CIM object model: paths, key binding values, instances and WBEM URIs.

mod error;
mod instance;
mod path;
pub mod uri;
mod value;

pub use error::{CimStatus, FormatError, PathError, TransportError};
pub use instance::{CimType, Instance, Property, PropertyValue};
pub use path::{KeyBinding, ObjectPath};
pub use uri::{to_wbem_uri_folded, UriFormat, DEFAULT_FOLD_WIDTH};
pub use value::{CimDateTime, KeyBindingValue};

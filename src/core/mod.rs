// Copyright 2026 Varsift Contributors
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

//! Core types for varsift
//!
//! - [`error`] - Error enum and `Result` alias
//! - [`types`] - Namespaces, value types, arity codes, sentinels, unpack mask
//! - [`value`] - Run-time value slots and the three-valued site verdict
//! - [`schema`] - Header contract and in-memory implementation
//! - [`record`] - Record contract and in-memory implementation

pub mod error;
pub mod record;
pub mod schema;
pub mod types;
pub mod value;

pub use error::{Error, Result};
pub use record::{FormatValue, InfoValue, MemoryRecord, Record, RecordBuilder};
pub use schema::{Header, HeaderBuilder, MemoryHeader};
pub use types::{Arity, Namespace, TagId, ValueType};
pub use value::{SitePass, ValueSlot};

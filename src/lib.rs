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

//! # Varsift - filter expressions for variant-call records
//!
//! Varsift compiles textual predicates like `INFO/DP>10 & %QUAL>20 &
//! %TYPE="snp"` into small postfix programs and evaluates them against
//! streams of variant-call records, deciding for every record whether the
//! site passes and which individual samples pass.
//!
//! The record format itself is out of scope: records and their headers are
//! abstracted behind the [`core::Header`] and [`core::Record`] traits, with
//! in-memory implementations for tests and synthetic data. Missing data is
//! never an error; it flows through a three-valued logic where empty values
//! make arithmetic empty and comparisons fail.
//!
//! ## Quick start
//!
//! ```
//! use varsift::core::{Arity, HeaderBuilder, RecordBuilder, ValueType};
//! use varsift::Filter;
//!
//! let header = HeaderBuilder::new()
//!     .info("DP", ValueType::Int, Arity::Count(1))
//!     .info("AN", ValueType::Int, Arity::Count(1))
//!     .build();
//!
//! let mut filter = Filter::new(&header, "DP>13 & AN=2").unwrap();
//!
//! let record = RecordBuilder::new(&header)
//!     .info_int("DP", vec![14])
//!     .info_int("AN", vec![2])
//!     .build()
//!     .unwrap();
//!
//! let (site_pass, sample_mask) = filter.test(&record).unwrap();
//! assert!(site_pass);
//! assert!(sample_mask.is_none()); // no FORMAT fields in the expression
//! ```
//!
//! ## Modules
//!
//! - [`core`] - Errors, value model, header and record contracts
//! - [`parser`] - Lexer, shunting-yard compiler, program nodes
//! - [`filter`] - The public [`Filter`] type and the grammar help text

pub mod core;
mod eval;
pub mod filter;
pub mod parser;

pub use crate::core::{Error, Header, Record, Result};
pub use crate::filter::{write_expression_help, Filter};

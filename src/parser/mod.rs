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

//! Filter expression parser
//!
//! This module turns expression text into a compiled postfix program:
//!
//! - [`lexer`] - Tokenizer for expression text
//! - [`token`] - Token kinds and operator precedence
//! - [`ast`] - Compiled program nodes
//! - [`parser`] - Shunting-yard compiler and symbolic post-pass

pub mod ast;
pub mod lexer;
#[allow(clippy::module_inception)]
pub mod parser;
pub mod token;

pub use ast::{Node, Reduction, Setter, TagRef};
pub use lexer::{Lexer, Token};
pub use parser::{compile, Program};
pub use token::TokenKind;

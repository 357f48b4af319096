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

//! Compiled program nodes
//!
//! A compiled filter is a flat postfix (RPN) array of [`Node`]s. Nodes are
//! immutable after compilation; all per-record scratch lives in the value
//! slots the evaluator keeps alongside the program.

use std::fmt;

use super::token::TokenKind;
use crate::core::types::TagId;

/// Which value a bound tag extracts from a record
///
/// The dispatcher is keyed by (namespace, declared type), selected once
/// during header binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setter {
    /// Site quality (`%QUAL`)
    Qual,
    /// Variant classification bits (`%TYPE`)
    VariantType,
    /// INFO flag presence as 0/1
    InfoFlag { id: TagId },
    /// Integer INFO element at `idx` (0 for scalars)
    InfoInt { id: TagId, idx: usize },
    /// Float INFO element at `idx` (0 for scalars)
    InfoFloat { id: TagId, idx: usize },
    /// String INFO value
    InfoStr { id: TagId },
    /// Per-sample integer FORMAT vector
    FormatInt { id: TagId },
    /// Per-sample float FORMAT vector
    FormatFloat { id: TagId },
    /// Per-sample string FORMAT vector
    FormatStr { id: TagId },
}

/// A tag reference bound against the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    /// Source spelling, kept for messages and program dumps
    pub name: String,
    /// The bound extractor
    pub setter: Setter,
    /// True when the extracted value is a string
    pub is_str: bool,
}

/// The three vector reductions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// Largest non-missing element
    Max,
    /// Smallest non-missing element
    Min,
    /// Mean of the non-missing elements
    Avg,
}

impl fmt::Display for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reduction::Max => write!(f, "%MAX"),
            Reduction::Min => write!(f, "%MIN"),
            Reduction::Avg => write!(f, "%AVG"),
        }
    }
}

/// One node of a compiled RPN program
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Numeric literal
    Number(f32),
    /// String literal (unquoted bytes)
    Str(Box<[u8]>),
    /// Bound tag reference
    Tag(TagRef),
    /// `%FILTER` under its dedicated comparator; `id` is the resolved
    /// filter, `None` for the `.` literal
    FilterSel { id: Option<TagId> },
    /// Binary operator
    Op(TokenKind),
    /// Unary reduction applied to the stack top
    Reduce(Reduction),
}

impl Node {
    /// True for operand nodes (everything an operator can pop)
    pub fn is_operand(&self) -> bool {
        !matches!(self, Node::Op(_) | Node::Reduce(_))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Number(v) => write!(f, "{:e}", v),
            Node::Str(bytes) => write!(f, "\"{}\"", String::from_utf8_lossy(bytes)),
            Node::Tag(tag) => write!(f, "{}", tag.name),
            Node::FilterSel { .. } => write!(f, "%FILTER"),
            Node::Op(kind) => write!(f, "{}", kind),
            Node::Reduce(r) => write!(f, "{}", r),
        }
    }
}

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

//! Token kinds for the filter expression lexer
//!
//! The lexer emits a flat token stream; everything that is not an operator
//! or a parenthesis is a [`TokenKind::Value`] whose text the parser resolves
//! against the header.

use std::fmt;

/// Kind of one lexical token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Literal, tag reference or special (`%QUAL`, `%TYPE`, `%FILTER`)
    Value,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `<=`
    Le,
    /// `<`
    Lt,
    /// `=` or `==`
    Eq,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `!=`
    Ne,
    /// `|` (site-level or)
    Or,
    /// `&` (site-level and)
    And,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%MAX(`
    Max,
    /// `%MIN(`
    Min,
    /// `%AVG(`
    Avg,
    /// `&&` (per-sample and)
    AndVec,
    /// `||` (per-sample or)
    OrVec,
    /// Reduction node in a compiled program
    Func,
}

impl TokenKind {
    /// Operator precedence; higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            TokenKind::Value | TokenKind::Func => 0,
            TokenKind::LeftParen | TokenKind::RightParen => 1,
            TokenKind::Or | TokenKind::OrVec => 2,
            TokenKind::And | TokenKind::AndVec => 3,
            TokenKind::Le
            | TokenKind::Lt
            | TokenKind::Eq
            | TokenKind::Gt
            | TokenKind::Ge
            | TokenKind::Ne => 5,
            TokenKind::Add | TokenKind::Sub => 6,
            TokenKind::Mul | TokenKind::Div => 7,
            TokenKind::Max | TokenKind::Min | TokenKind::Avg => 8,
        }
    }

    /// True for `%MAX`, `%MIN` and `%AVG`
    pub fn is_reduction(self) -> bool {
        matches!(self, TokenKind::Max | TokenKind::Min | TokenKind::Avg)
    }

    /// True for the six comparison operators
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            TokenKind::Le
                | TokenKind::Lt
                | TokenKind::Eq
                | TokenKind::Gt
                | TokenKind::Ge
                | TokenKind::Ne
        )
    }

    /// The source spelling of an operator token
    pub fn symbol(self) -> &'static str {
        match self {
            TokenKind::Value => "value",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::Le => "<=",
            TokenKind::Lt => "<",
            TokenKind::Eq => "==",
            TokenKind::Gt => ">",
            TokenKind::Ge => ">=",
            TokenKind::Ne => "!=",
            TokenKind::Or => "|",
            TokenKind::And => "&",
            TokenKind::Add => "+",
            TokenKind::Sub => "-",
            TokenKind::Mul => "*",
            TokenKind::Div => "/",
            TokenKind::Max => "%MAX",
            TokenKind::Min => "%MIN",
            TokenKind::Avg => "%AVG",
            TokenKind::AndVec => "&&",
            TokenKind::OrVec => "||",
            TokenKind::Func => "func",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

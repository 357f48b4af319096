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

//! Filter expression lexer
//!
//! The scanner walks the expression text once and emits a flat token
//! stream. Everything that is not an operator or a parenthesis comes out as
//! a [`TokenKind::Value`] token whose text spans the literal, quotes and
//! namespace prefixes included; the parser resolves that text against the
//! header.
//!
//! `%MAX(`, `%MIN(` and `%AVG(` are recognised as single units; the lexer
//! emits the reduction token followed by a synthetic `(`.

use super::token::TokenKind;
use crate::core::error::{Error, Result};

/// One scanned token; `text` spans the source for `Value` tokens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    /// The token kind
    pub kind: TokenKind,
    /// Source text of the token
    pub text: &'a str,
}

/// Streaming tokenizer over an expression string
pub struct Lexer<'a> {
    full: &'a str,
    rest: &'a str,
    pending_paren: bool,
}

/// Characters that end an identifier scan
fn is_ident_delim(b: u8) -> bool {
    matches!(
        b,
        b'"' | b'\''
            | b'<'
            | b'>'
            | b'='
            | b'!'
            | b'&'
            | b'|'
            | b'('
            | b')'
            | b'+'
            | b'-'
            | b'*'
            | b'/'
    ) || b.is_ascii_whitespace()
}

/// Characters that end the fallback scan; `!` and quotes stay in the token
fn is_fallback_delim(b: u8) -> bool {
    matches!(
        b,
        b'<' | b'>' | b'=' | b'&' | b'|' | b'(' | b')' | b'+' | b'-' | b'*' | b'/'
    ) || b.is_ascii_whitespace()
}

/// Length of a leading floating-point literal: `d.ddde[+-]dd`
///
/// Returns 0 when no digits are present. The exponent is only consumed if
/// at least one digit follows it.
fn scan_float(b: &[u8]) -> usize {
    let mut i = 0;
    let mut digits = false;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
        digits = true;
    }
    if i < b.len() && b[i] == b'.' {
        i += 1;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
            digits = true;
        }
    }
    if !digits {
        return 0;
    }
    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        let mut j = i + 1;
        if j < b.len() && (b[j] == b'+' || b[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    i
}

impl<'a> Lexer<'a> {
    /// Create a lexer over `expr`
    pub fn new(expr: &'a str) -> Self {
        Lexer {
            full: expr,
            rest: expr,
            pending_paren: false,
        }
    }

    fn emit(&mut self, kind: TokenKind, len: usize) -> Token<'a> {
        let text = &self.rest[..len];
        self.rest = &self.rest[len..];
        Token { kind, text }
    }

    /// Scan the next token; `Ok(None)` at end of input
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>> {
        if self.pending_paren {
            self.pending_paren = false;
            return Ok(Some(Token {
                kind: TokenKind::LeftParen,
                text: "(",
            }));
        }

        self.rest = self.rest.trim_start();
        if self.rest.is_empty() {
            return Ok(None);
        }
        let b = self.rest.as_bytes();

        // Floating-point literal, accepted only when a delimiter follows
        if b[0].is_ascii_digit() || b[0] == b'.' {
            let n = scan_float(b);
            if n > 0 && (n == b.len() || !b[n].is_ascii_alphanumeric()) {
                return Ok(Some(self.emit(TokenKind::Value, n)));
            }
        }

        // Reduction headers; the '(' is emitted on the next call
        for (prefix, kind) in [
            ("%MAX(", TokenKind::Max),
            ("%MIN(", TokenKind::Min),
            ("%AVG(", TokenKind::Avg),
        ] {
            if self.rest.starts_with(prefix) {
                self.pending_paren = true;
                return Ok(Some(self.emit(kind, prefix.len())));
            }
        }

        // Identifier, namespace prefix spanned into the token
        let mut i = 0;
        if self.rest.starts_with("INFO/") {
            i = 5;
        } else if self.rest.starts_with("FORMAT/") {
            i = 7;
        } else if self.rest.starts_with("FMT/") {
            i = 4;
        }
        while i < b.len() && !is_ident_delim(b[i]) {
            i += 1;
        }
        if i > 0 {
            return Ok(Some(self.emit(TokenKind::Value, i)));
        }

        // Quoted string, quotes included in the token text
        if b[0] == b'"' || b[0] == b'\'' {
            match memchr::memchr(b[0], &b[1..]) {
                Some(close) => return Ok(Some(self.emit(TokenKind::Value, close + 2))),
                None => return Err(Error::MissingQuotes(self.full.to_string())),
            }
        }

        // Operators, composite forms first
        let two = |c: u8| b.len() > 1 && b[1] == c;
        let (kind, len) = match b[0] {
            b'!' if two(b'=') => (TokenKind::Ne, 2),
            b'<' if two(b'=') => (TokenKind::Le, 2),
            b'<' => (TokenKind::Lt, 1),
            b'>' if two(b'=') => (TokenKind::Ge, 2),
            b'>' => (TokenKind::Gt, 1),
            b'=' if two(b'=') => (TokenKind::Eq, 2),
            b'=' => (TokenKind::Eq, 1),
            b'(' => (TokenKind::LeftParen, 1),
            b')' => (TokenKind::RightParen, 1),
            b'&' if two(b'&') => (TokenKind::AndVec, 2),
            b'|' if two(b'|') => (TokenKind::OrVec, 2),
            b'&' => (TokenKind::And, 1),
            b'|' => (TokenKind::Or, 1),
            b'+' => (TokenKind::Add, 1),
            b'-' => (TokenKind::Sub, 1),
            b'*' => (TokenKind::Mul, 1),
            b'/' => (TokenKind::Div, 1),
            _ => {
                // Bare '!' and anything else unrecognised is swept into a
                // value token and rejected during header binding
                let mut i = 0;
                while i < b.len() && !is_fallback_delim(b[i]) {
                    i += 1;
                }
                if i == 0 {
                    return Err(Error::BadExpression(self.full.to_string()));
                }
                return Ok(Some(self.emit(TokenKind::Value, i)));
            }
        };
        Ok(Some(self.emit(kind, len)))
    }
}

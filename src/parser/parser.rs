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

//! Expression compiler
//!
//! Translates infix expression text into a postfix (RPN) [`Program`] using
//! Dijkstra's shunting-yard algorithm. Tag references are bound against the
//! header as they are encountered; a post-pass rewires the string operands
//! of `%TYPE` and `%FILTER` into their symbolic codes.

use std::fmt;

use smallvec::SmallVec;

use super::ast::{Node, Reduction, Setter, TagRef};
use super::lexer::Lexer;
use super::token::TokenKind;
use crate::core::error::{Error, Result};
use crate::core::schema::Header;
use crate::core::types::{unpack, variant_type_code, Namespace, ValueType};

/// A compiled filter expression in postfix order
///
/// Immutable after compilation. `nsamples` is non-zero only when the
/// expression touches FORMAT fields; `max_unpack` ORs together the record
/// columns evaluation will read.
#[derive(Debug, Clone)]
pub struct Program {
    /// RPN node array
    pub nodes: Vec<Node>,
    /// Sample count the program was compiled for, 0 without FORMAT access
    pub nsamples: usize,
    /// Record columns the program reads (see [`crate::core::types::unpack`])
    pub max_unpack: u8,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            writeln!(f, "{}", node)?;
        }
        Ok(())
    }
}

/// Compile `expr` against `header`
pub fn compile(header: &dyn Header, expr: &str) -> Result<Program> {
    let mut compiler = Compiler {
        header,
        expr,
        max_unpack: unpack::STRINGS,
    };
    let mut nodes = compiler.shunting_yard()?;
    if nodes.is_empty() {
        return Err(Error::BadExpression(expr.to_string()));
    }
    compiler.rewrite_symbolic(&mut nodes)?;
    let nsamples = if compiler.max_unpack & unpack::FORMAT != 0 {
        header.nsamples()
    } else {
        0
    };
    Ok(Program {
        nodes,
        nsamples,
        max_unpack: compiler.max_unpack,
    })
}

struct Compiler<'h> {
    header: &'h dyn Header,
    expr: &'h str,
    max_unpack: u8,
}

/// Append an operator to the output, lowering reductions to their node form
fn push_op_node(out: &mut Vec<Node>, op: TokenKind) {
    let node = match op {
        TokenKind::Max => Node::Reduce(Reduction::Max),
        TokenKind::Min => Node::Reduce(Reduction::Min),
        TokenKind::Avg => Node::Reduce(Reduction::Avg),
        _ => Node::Op(op),
    };
    out.push(node);
}

impl<'h> Compiler<'h> {
    fn shunting_yard(&mut self) -> Result<Vec<Node>> {
        let mut lexer = Lexer::new(self.expr);
        let mut out: Vec<Node> = Vec::new();
        let mut ops: SmallVec<[TokenKind; 16]> = SmallVec::new();
        let mut last: Option<TokenKind> = None;
        // Inside a reduction the default namespace of a bare tag is FORMAT
        let mut nfunc = 0usize;

        while let Some(tok) = lexer.next_token()? {
            match tok.kind {
                TokenKind::LeftParen => ops.push(TokenKind::LeftParen),
                TokenKind::RightParen => loop {
                    match ops.pop() {
                        Some(TokenKind::LeftParen) => break,
                        Some(op) => {
                            if op.is_reduction() {
                                nfunc = nfunc.saturating_sub(1);
                            }
                            push_op_node(&mut out, op);
                        }
                        None => return Err(Error::UnbalancedParens(self.expr.to_string())),
                    }
                },
                TokenKind::Value => {
                    let node = self.bind_value(tok.text, nfunc > 0)?;
                    out.push(node);
                }
                _ => {
                    let mut kind = tok.kind;
                    if kind == TokenKind::Sub
                        && last != Some(TokenKind::Value)
                        && last != Some(TokenKind::RightParen)
                    {
                        // Unary minus: rewrite "-x" as "-1 * x"
                        out.push(Node::Number(-1.0));
                        kind = TokenKind::Mul;
                    } else {
                        while let Some(&top) = ops.last() {
                            if top.precedence() > kind.precedence() {
                                ops.pop();
                                if top.is_reduction() {
                                    nfunc = nfunc.saturating_sub(1);
                                }
                                push_op_node(&mut out, top);
                            } else {
                                break;
                            }
                        }
                    }
                    ops.push(kind);
                    if kind.is_reduction() {
                        nfunc += 1;
                    }
                }
            }
            last = Some(tok.kind);
        }

        while let Some(op) = ops.pop() {
            if op == TokenKind::LeftParen || op == TokenKind::RightParen {
                return Err(Error::UnbalancedParens(self.expr.to_string()));
            }
            push_op_node(&mut out, op);
        }
        Ok(out)
    }

    /// Resolve one value token: string literal, special, tag reference or
    /// numeric constant
    fn bind_value(&mut self, text: &str, inside_func: bool) -> Result<Node> {
        let bytes = text.as_bytes();
        if bytes[0] == b'"' || bytes[0] == b'\'' {
            // The lexer guarantees the closing quote
            return Ok(Node::Str(bytes[1..bytes.len() - 1].to_vec().into()));
        }

        let mut declared_ns: Option<bool> = None;
        let mut name = text;
        if let Some(rest) = text.strip_prefix("FMT/") {
            name = rest;
            declared_ns = Some(true);
        } else if let Some(rest) = text.strip_prefix("FORMAT/") {
            name = rest;
            declared_ns = Some(true);
        } else if let Some(rest) = text.strip_prefix("INFO/") {
            name = rest;
            declared_ns = Some(false);
        } else {
            match text {
                "%QUAL" => {
                    return Ok(Node::Tag(TagRef {
                        name: text.to_string(),
                        setter: Setter::Qual,
                        is_str: false,
                    }))
                }
                "%TYPE" => {
                    return Ok(Node::Tag(TagRef {
                        name: text.to_string(),
                        setter: Setter::VariantType,
                        is_str: false,
                    }))
                }
                "%FILTER" => {
                    self.max_unpack |= unpack::FILTERS;
                    return Ok(Node::FilterSel { id: None });
                }
                _ => {}
            }
        }

        let is_fmt = declared_ns.unwrap_or(inside_func);
        if is_fmt {
            self.max_unpack |= unpack::FORMAT;
        }

        if let Some(id) = self.header.id_of(name) {
            return self.bind_tag(name, id, is_fmt, 0);
        }

        // Subscripted vector tag, e.g. DP4[1]
        if let Some(inner) = name.strip_suffix(']') {
            if let Some(open) = inner.find('[') {
                let (base, idx_text) = inner.split_at(open);
                let idx = idx_text[1..]
                    .parse::<usize>()
                    .map_err(|_| Error::BadExpression(self.expr.to_string()))?;
                if let Some(id) = self.header.id_of(base) {
                    return self.bind_indexed_tag(base, id, is_fmt, idx);
                }
                return Err(Error::TagNotDefined(base.to_string()));
            }
        }

        // Plain number, or nothing we know
        match name.parse::<f32>() {
            Ok(v) => Ok(Node::Number(v)),
            Err(_) => Err(Error::TagNotDefined(name.to_string())),
        }
    }

    fn bind_tag(&mut self, name: &str, id: usize, is_fmt: bool, idx: usize) -> Result<Node> {
        if is_fmt {
            return self.bind_format(name, id);
        }
        if !self.header.is_defined(Namespace::Info, id) {
            return Err(Error::NoSuchInfoField(name.to_string()));
        }
        self.max_unpack |= unpack::INFO;
        let ty = self
            .header
            .declared_type(Namespace::Info, id)
            .ok_or_else(|| Error::UnsupportedFieldType(name.to_string()))?;
        if ty == ValueType::Flag {
            return Ok(Node::Tag(TagRef {
                name: name.to_string(),
                setter: Setter::InfoFlag { id },
                is_str: false,
            }));
        }
        let arity = self
            .header
            .declared_arity(Namespace::Info, id)
            .ok_or_else(|| Error::UnsupportedFieldType(name.to_string()))?;
        if !arity.is_scalar() {
            return Err(Error::NotSubscripted(name.to_string()));
        }
        let (setter, is_str) = match ty {
            ValueType::Int => (Setter::InfoInt { id, idx }, false),
            ValueType::Float => (Setter::InfoFloat { id, idx }, false),
            ValueType::Str => (Setter::InfoStr { id }, true),
            ValueType::Flag => unreachable!(),
        };
        Ok(Node::Tag(TagRef {
            name: name.to_string(),
            setter,
            is_str,
        }))
    }

    fn bind_indexed_tag(&mut self, name: &str, id: usize, is_fmt: bool, idx: usize) -> Result<Node> {
        if is_fmt {
            // FORMAT access always reads the whole per-sample vector
            return self.bind_format(name, id);
        }
        if !self.header.is_defined(Namespace::Info, id) {
            return Err(Error::NoSuchInfoField(name.to_string()));
        }
        self.max_unpack |= unpack::INFO;
        let setter = match self.header.declared_type(Namespace::Info, id) {
            Some(ValueType::Int) => Setter::InfoInt { id, idx },
            Some(ValueType::Float) => Setter::InfoFloat { id, idx },
            _ => return Err(Error::UnsupportedFieldType(name.to_string())),
        };
        Ok(Node::Tag(TagRef {
            name: name.to_string(),
            setter,
            is_str: false,
        }))
    }

    fn bind_format(&mut self, name: &str, id: usize) -> Result<Node> {
        if !self.header.is_defined(Namespace::Format, id) {
            return Err(Error::NoSuchFormatField(name.to_string()));
        }
        let arity = self
            .header
            .declared_arity(Namespace::Format, id)
            .ok_or_else(|| Error::UnsupportedFieldType(name.to_string()))?;
        if !arity.is_scalar() {
            return Err(Error::NotSubscripted(name.to_string()));
        }
        let (setter, is_str) = match self.header.declared_type(Namespace::Format, id) {
            Some(ValueType::Int) => (Setter::FormatInt { id }, false),
            Some(ValueType::Float) => (Setter::FormatFloat { id }, false),
            Some(ValueType::Str) => (Setter::FormatStr { id }, true),
            _ => return Err(Error::UnsupportedFieldType(name.to_string())),
        };
        Ok(Node::Tag(TagRef {
            name: name.to_string(),
            setter,
            is_str,
        }))
    }

    /// Rewire the string operands of `%TYPE` and `%FILTER` into symbolic
    /// codes
    ///
    /// The operand sits just before or just after the special token in RPN
    /// order: after, unless the next node is already the `==`/`!=` operator.
    fn rewrite_symbolic(&self, nodes: &mut [Node]) -> Result<()> {
        enum Special {
            Type,
            Filter,
        }

        let mut i = 0;
        while i < nodes.len() {
            let special = match &nodes[i] {
                Node::Tag(tag) if tag.setter == Setter::VariantType => Special::Type,
                Node::FilterSel { .. } => Special::Filter,
                _ => {
                    i += 1;
                    continue;
                }
            };

            if i + 1 == nodes.len() {
                return Err(Error::BadExpression(self.expr.to_string()));
            }
            let j = match nodes[i + 1] {
                Node::Op(TokenKind::Eq) | Node::Op(TokenKind::Ne) => {
                    if i == 0 {
                        return Err(Error::BadExpression(self.expr.to_string()));
                    }
                    i - 1
                }
                _ => i + 1,
            };

            let tag_name = match special {
                Special::Type => "%TYPE",
                Special::Filter => "%FILTER",
            };
            let word = match &nodes[j] {
                Node::Str(bytes) => String::from_utf8_lossy(bytes).into_owned(),
                _ => {
                    return Err(Error::ExpectedString {
                        tag: tag_name,
                        expr: self.expr.to_string(),
                    })
                }
            };

            match special {
                Special::Type => {
                    let code =
                        variant_type_code(&word).ok_or(Error::UnknownVariantType(word))?;
                    nodes[j] = Node::Number(code as f32);
                }
                Special::Filter => {
                    let id = if word == "." {
                        None
                    } else {
                        let id = self
                            .header
                            .id_of(&word)
                            .filter(|&id| self.header.is_defined(Namespace::Filter, id))
                            .ok_or(Error::FilterNotDefined(word))?;
                        Some(id)
                    };
                    nodes[i] = Node::FilterSel { id };
                    nodes[j] = Node::Number(0.0);
                }
            }
            i = i.max(j) + 1;
        }
        Ok(())
    }
}

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

//! RPN stack machine
//!
//! Walks a compiled program once per record. Operand nodes fill their value
//! slot and push their index; binary operators pop two indices, compute into
//! the left operand's slot and leave it on the stack. The final stack entry
//! carries the site verdict and the per-sample mask.
//!
//! Arithmetic and comparisons broadcast scalars against per-sample vectors;
//! per-element missing values propagate; fully missing operands make
//! arithmetic empty and comparisons fail.

use smallvec::SmallVec;

use crate::core::error::{Error, Result};
use crate::core::record::Record;
use crate::core::types::{float_is_missing, float_missing, TagId};
use crate::core::value::{SitePass, ValueSlot};
use crate::parser::ast::Node;
use crate::parser::token::TokenKind;

/// Two distinct mutable slots out of the arena
fn two_slots(slots: &mut [ValueSlot], a: usize, b: usize) -> (&mut ValueSlot, &mut ValueSlot) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = slots.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = slots.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

fn arith_op(kind: TokenKind) -> fn(f32, f32) -> f32 {
    match kind {
        TokenKind::Add => |a, b| a + b,
        TokenKind::Sub => |a, b| a - b,
        TokenKind::Mul => |a, b| a * b,
        TokenKind::Div => |a, b| a / b,
        _ => unreachable!("not an arithmetic operator"),
    }
}

fn cmp_op(kind: TokenKind) -> fn(f32, f32) -> bool {
    match kind {
        TokenKind::Le => |a, b| a <= b,
        TokenKind::Lt => |a, b| a < b,
        TokenKind::Eq => |a, b| a == b,
        TokenKind::Gt => |a, b| a > b,
        TokenKind::Ge => |a, b| a >= b,
        TokenKind::Ne => |a, b| a != b,
        _ => unreachable!("not a comparison operator"),
    }
}

/// `a = a op b` with scalar/vector broadcasting
fn arithmetic(a: &mut ValueSlot, b: &ValueSlot, kind: TokenKind) {
    let op = arith_op(kind);
    if a.is_missing() || b.is_missing() {
        a.set_missing();
        return;
    }
    let mut has_values = false;
    if (a.nsamples > 0) == (b.nsamples > 0) {
        // Same shape: elementwise
        let n = a.nvalues.min(b.nvalues);
        for i in 0..n {
            let av = a.values[i];
            if float_is_missing(av) {
                continue;
            }
            let bv = b.values[i];
            if float_is_missing(bv) {
                a.values[i] = float_missing();
                continue;
            }
            has_values = true;
            a.values[i] = op(av, bv);
        }
    } else if b.nsamples > 0 {
        // Broadcast scalar a against vector b
        let scalar = a.values[0];
        a.resize_values(b.nvalues);
        for i in 0..b.nvalues {
            let bv = b.values[i];
            if float_is_missing(scalar) || float_is_missing(bv) {
                a.values[i] = float_missing();
                continue;
            }
            has_values = true;
            a.values[i] = op(scalar, bv);
        }
        a.nvalues = b.nvalues;
        a.nsamples = b.nsamples;
    } else {
        // Broadcast scalar b against vector a
        let scalar = b.values[0];
        for i in 0..a.nvalues {
            let av = a.values[i];
            if float_is_missing(av) || float_is_missing(scalar) {
                a.values[i] = float_missing();
                continue;
            }
            has_values = true;
            a.values[i] = op(av, scalar);
        }
    }
    if !has_values {
        a.set_missing();
    }
}

/// Numeric comparison; fills `a`'s sample mask and site verdict
fn compare_numeric(a: &mut ValueSlot, b: &ValueSlot, kind: TokenKind) {
    let cmp = cmp_op(kind);
    if a.is_missing() || b.is_missing() {
        a.set_missing();
        a.pass_site = SitePass::Fail;
        return;
    }
    let mut has_values = false;
    let mut pass_site = false;
    if a.nsamples > 0 && b.nsamples > 0 {
        let n = a.nvalues.min(b.nvalues);
        a.resize_mask(n);
        for i in 0..n {
            let (av, bv) = (a.values[i], b.values[i]);
            if float_is_missing(av) || float_is_missing(bv) {
                a.pass_samples[i] = false;
                continue;
            }
            has_values = true;
            let hit = cmp(av, bv);
            a.pass_samples[i] = hit;
            if hit {
                pass_site = true;
            }
        }
        if !has_values {
            a.nvalues = 0;
        }
    } else if a.nsamples > 0 {
        let bv = b.values[0];
        if float_is_missing(bv) {
            a.set_missing();
        } else {
            a.resize_mask(a.nvalues);
            for i in 0..a.nvalues {
                let av = a.values[i];
                if float_is_missing(av) {
                    a.pass_samples[i] = false;
                    continue;
                }
                has_values = true;
                let hit = cmp(av, bv);
                a.pass_samples[i] = hit;
                if hit {
                    pass_site = true;
                }
            }
            if !has_values {
                a.nvalues = 0;
            }
        }
    } else if b.nsamples > 0 {
        let av = a.values[0];
        if float_is_missing(av) {
            a.set_missing();
        } else {
            a.resize_mask(b.nvalues);
            for i in 0..b.nvalues {
                let bv = b.values[i];
                if float_is_missing(bv) {
                    a.pass_samples[i] = false;
                    continue;
                }
                has_values = true;
                let hit = cmp(av, bv);
                a.pass_samples[i] = hit;
                if hit {
                    pass_site = true;
                }
            }
            a.resize_values(b.nvalues);
            a.nvalues = b.nvalues;
            a.nsamples = b.nsamples;
            if !has_values {
                a.nvalues = 0;
            }
        }
    } else {
        let (av, bv) = (a.values[0], b.values[0]);
        if float_is_missing(av) || float_is_missing(bv) {
            a.set_missing();
        } else if cmp(av, bv) {
            pass_site = true;
        }
    }
    a.pass_site = SitePass::from(pass_site);
}

/// String equality/inequality over fixed-stride elements
///
/// Length-mismatched vectors are only allowed when one side is scalar.
fn compare_strings(a: &mut ValueSlot, b: &ValueSlot, kind: TokenKind, expr: &str) -> Result<()> {
    let want_eq = kind == TokenKind::Eq;
    if a.is_missing() {
        a.nsamples = 0;
        a.pass_site = SitePass::Fail;
        return Ok(());
    }
    if b.is_missing() {
        a.set_missing();
        a.pass_site = SitePass::Fail;
        return Ok(());
    }
    let mut pass_site = false;
    if a.nvalues == b.nvalues {
        let n = a.nvalues;
        a.resize_mask(n);
        for i in 0..n {
            let hit = a.str_elem(i) == b.str_elem(i);
            let verdict = if want_eq { hit } else { !hit };
            a.pass_samples[i] = verdict;
            if verdict {
                pass_site = true;
            }
        }
        if a.nsamples == 0 {
            a.nsamples = b.nsamples;
        }
    } else if a.nsamples == 0 {
        // Scalar a against vector b
        let n = b.nvalues;
        a.resize_mask(n);
        for i in 0..n {
            let hit = a.str_elem(0) == b.str_elem(i);
            let verdict = if want_eq { hit } else { !hit };
            a.pass_samples[i] = verdict;
            if verdict {
                pass_site = true;
            }
        }
        a.nvalues = n;
        a.nsamples = b.nsamples;
    } else if b.nsamples == 0 {
        // Vector a against scalar b
        let n = a.nvalues;
        a.resize_mask(n);
        for i in 0..n {
            let hit = a.str_elem(i) == b.str_elem(0);
            let verdict = if want_eq { hit } else { !hit };
            a.pass_samples[i] = verdict;
            if verdict {
                pass_site = true;
            }
        }
    } else {
        return Err(Error::VectorLengthMismatch(expr.to_string()));
    }
    a.pass_site = SitePass::from(pass_site);
    Ok(())
}

/// `%FILTER` comparator over the record's applied-filter set
///
/// `==` is true when at least one applied filter matches; `!=` is true when
/// none does (AND-complementation). With no filters applied, only the `.`
/// literal (`id == None`) matches `==`.
fn compare_filter(record: &dyn Record, id: Option<TagId>, kind: TokenKind) -> bool {
    let applied = record.applied_filters();
    if kind == TokenKind::Ne {
        if applied.is_empty() {
            return id.is_some();
        }
        return !applied.iter().any(|&f| Some(f) == id);
    }
    if applied.is_empty() {
        return id.is_none();
    }
    applied.iter().any(|&f| Some(f) == id)
}

/// Site-level and per-sample `&`/`&&`
///
/// Both spellings combine identically: a scalar operand's site verdict is
/// fanned out across the other side's samples.
fn logic_and(a: &mut ValueSlot, b: &ValueSlot) {
    if a.is_missing() || b.is_missing() {
        a.set_missing();
        a.pass_site = SitePass::Fail;
        return;
    }
    if a.nsamples == 0 && b.nsamples == 0 {
        a.pass_site = SitePass::from(a.pass_site.as_bool() && b.pass_site.as_bool());
        return;
    }
    let mut pass_site = false;
    if a.nsamples > 0 && b.nsamples > 0 {
        let n = a.nsamples.min(b.nsamples);
        a.resize_mask(n);
        for i in 0..n {
            let v = a.pass_samples[i] && b.pass_samples[i];
            a.pass_samples[i] = v;
            if v {
                pass_site = true;
            }
        }
    } else if b.nsamples > 0 {
        let site = a.pass_site.as_bool();
        a.resize_mask(b.nsamples);
        for i in 0..b.nsamples {
            let v = site && b.pass_samples[i];
            a.pass_samples[i] = v;
            if v {
                pass_site = true;
            }
        }
        a.nsamples = b.nsamples;
    } else {
        let site = b.pass_site.as_bool();
        for i in 0..a.nsamples {
            let v = a.pass_samples[i] && site;
            a.pass_samples[i] = v;
            if v {
                pass_site = true;
            }
        }
    }
    a.pass_site = SitePass::from(pass_site);
}

/// Site-level `|` and per-sample `||`
///
/// The two spellings differ only when one operand is site-level: `||` fans
/// the site verdict into the sample mask, `|` keeps the mask and folds the
/// verdict into the site bit alone.
fn logic_or(a: &mut ValueSlot, b: &ValueSlot, kind: TokenKind) {
    if a.is_missing() && b.is_missing() {
        a.set_missing();
        a.pass_site = SitePass::Fail;
        return;
    }
    if a.is_missing() {
        // Adopt the other side's verdicts wholesale
        a.resize_mask(b.nsamples);
        for i in 0..b.nsamples {
            a.pass_samples[i] = b.pass_samples[i];
        }
        a.nsamples = b.nsamples;
        a.pass_site = b.pass_site;
        return;
    }
    if b.is_missing() {
        return;
    }
    if a.nsamples == 0 && b.nsamples == 0 {
        a.pass_site = SitePass::from(a.pass_site.as_bool() || b.pass_site.as_bool());
        return;
    }
    let mut pass_site = false;
    if a.nsamples == 0 {
        let site = a.pass_site.as_bool();
        a.resize_mask(b.nsamples);
        if kind == TokenKind::Or {
            for i in 0..b.nsamples {
                a.pass_samples[i] = b.pass_samples[i];
                if site || b.pass_samples[i] {
                    pass_site = true;
                }
            }
        } else {
            for i in 0..b.nsamples {
                let v = site || b.pass_samples[i];
                a.pass_samples[i] = v;
                if v {
                    pass_site = true;
                }
            }
        }
        a.nsamples = b.nsamples;
    } else if b.nsamples == 0 {
        let site = b.pass_site.as_bool();
        if kind == TokenKind::Or {
            for i in 0..a.nsamples {
                if site || a.pass_samples[i] {
                    pass_site = true;
                }
            }
        } else {
            for i in 0..a.nsamples {
                let v = a.pass_samples[i] || site;
                a.pass_samples[i] = v;
                if v {
                    pass_site = true;
                }
            }
        }
    } else {
        let n = a.nsamples.min(b.nsamples);
        for i in 0..n {
            let v = a.pass_samples[i] || b.pass_samples[i];
            a.pass_samples[i] = v;
            if v {
                pass_site = true;
            }
        }
    }
    a.pass_site = SitePass::from(pass_site);
}

/// Evaluate the program over one record; returns the index of the node
/// whose slot holds the final result
pub(crate) fn run(
    nodes: &[Node],
    slots: &mut [ValueSlot],
    expr: &str,
    record: &dyn Record,
) -> Result<usize> {
    let mut stack: SmallVec<[usize; 16]> = SmallVec::new();
    let underflow = || Error::StackUnderflow(expr.to_string());

    for (i, node) in nodes.iter().enumerate() {
        match node {
            Node::Number(v) => {
                let slot = &mut slots[i];
                slot.reset();
                slot.is_str = false;
                slot.set_scalar(*v);
                stack.push(i);
            }
            Node::Str(bytes) => {
                let slot = &mut slots[i];
                slot.reset();
                slot.is_str = true;
                slot.set_str_scalar(bytes);
                stack.push(i);
            }
            Node::Tag(tag) => {
                let slot = &mut slots[i];
                slot.reset();
                slot.is_str = tag.is_str;
                tag.setter.fetch(record, slot);
                stack.push(i);
            }
            Node::FilterSel { .. } => {
                // Placeholder operand; the verdict comes from the comparator
                let slot = &mut slots[i];
                slot.reset();
                slot.is_str = false;
                slot.set_scalar(0.0);
                stack.push(i);
            }
            Node::Reduce(reduction) => {
                let &top = stack.last().ok_or_else(underflow)?;
                reduction.apply(&mut slots[top]);
            }
            Node::Op(kind) => {
                let bi = stack.pop().ok_or_else(underflow)?;
                let &ai = stack.last().ok_or_else(underflow)?;
                let (a, b) = two_slots(slots, ai, bi);
                match kind {
                    TokenKind::And | TokenKind::AndVec => {
                        if !a.pass_site.is_known() || !b.pass_site.is_known() {
                            return Err(Error::LogicOperand(expr.to_string()));
                        }
                        logic_and(a, b);
                    }
                    TokenKind::Or | TokenKind::OrVec => {
                        if !a.pass_site.is_known() || !b.pass_site.is_known() {
                            return Err(Error::LogicOperand(expr.to_string()));
                        }
                        logic_or(a, b, *kind);
                    }
                    TokenKind::Add | TokenKind::Sub | TokenKind::Mul | TokenKind::Div => {
                        if a.is_str || b.is_str {
                            return Err(Error::StringOperator(expr.to_string()));
                        }
                        arithmetic(a, b, *kind);
                    }
                    kind if kind.is_comparison() => {
                        let filter_id = match (&nodes[bi], &nodes[ai]) {
                            (Node::FilterSel { id }, _) => Some(*id),
                            (_, Node::FilterSel { id }) => Some(*id),
                            _ => None,
                        };
                        if a.is_missing() || b.is_missing() {
                            a.set_missing();
                            a.pass_site = SitePass::Fail;
                        } else if let Some(id) = filter_id {
                            if !matches!(kind, TokenKind::Eq | TokenKind::Ne) {
                                return Err(Error::StringOperator(expr.to_string()));
                            }
                            a.pass_site = SitePass::from(compare_filter(record, id, *kind));
                        } else if a.is_str && b.is_str {
                            if !matches!(kind, TokenKind::Eq | TokenKind::Ne) {
                                return Err(Error::StringOperator(expr.to_string()));
                            }
                            compare_strings(a, b, *kind, expr)?;
                        } else if a.is_str || b.is_str {
                            if matches!(kind, TokenKind::Eq | TokenKind::Ne) {
                                return Err(Error::StringNumericCompare(expr.to_string()));
                            }
                            return Err(Error::StringOperator(expr.to_string()));
                        } else {
                            compare_numeric(a, b, *kind);
                        }
                    }
                    _ => return Err(Error::BadExpression(expr.to_string())),
                }
            }
        }
    }

    match stack.len() {
        1 => Ok(stack[0]),
        0 => Err(Error::StackUnderflow(expr.to_string())),
        _ => Err(Error::StackResidue(expr.to_string())),
    }
}

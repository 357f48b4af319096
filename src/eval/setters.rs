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

//! Value extractors
//!
//! Implementations of the bound setters: each one pulls a value out of the
//! current record into a token's value slot. Per-element sentinels are
//! normalised to the float missing sentinel; a value where every element is
//! missing collapses to an empty slot.

use crate::core::record::{FormatValue, InfoValue, Record};
use crate::core::types::{
    float_is_missing, float_is_vector_end, float_missing, TagId, INT_MISSING, INT_VECTOR_END,
};
use crate::core::value::ValueSlot;
use crate::parser::ast::{Reduction, Setter};

/// INFO element at `idx`, stepping over missing and vector-end sentinels
fn info_numeric_at(record: &dyn Record, id: TagId, idx: usize) -> Option<f32> {
    match record.info(id)? {
        InfoValue::Int(vals) => {
            for &v in vals.iter().take(idx) {
                if v == INT_VECTOR_END {
                    return None;
                }
            }
            let v = *vals.get(idx)?;
            if v == INT_MISSING || v == INT_VECTOR_END {
                return None;
            }
            Some(v as f32)
        }
        InfoValue::Float(vals) => {
            for &v in vals.iter().take(idx) {
                if float_is_vector_end(v) {
                    return None;
                }
            }
            let v = *vals.get(idx)?;
            if float_is_missing(v) || float_is_vector_end(v) {
                return None;
            }
            Some(v)
        }
        InfoValue::Flag | InfoValue::Str(_) => None,
    }
}

fn fill_format_ints(slot: &mut ValueSlot, vals: &[i32]) {
    slot.values.clear();
    let mut any = false;
    for &v in vals {
        if v == INT_MISSING || v == INT_VECTOR_END {
            slot.values.push(float_missing());
        } else {
            slot.values.push(v as f32);
            any = true;
        }
    }
    if !any {
        slot.set_missing();
        return;
    }
    slot.nvalues = vals.len();
    slot.nsamples = vals.len();
}

fn fill_format_floats(slot: &mut ValueSlot, vals: &[f32]) {
    slot.values.clear();
    let mut any = false;
    for &v in vals {
        if float_is_missing(v) || float_is_vector_end(v) {
            slot.values.push(float_missing());
        } else {
            slot.values.push(v);
            any = true;
        }
    }
    if !any {
        slot.set_missing();
        return;
    }
    slot.nvalues = vals.len();
    slot.nsamples = vals.len();
}

impl Setter {
    /// Populate `slot` from `record`
    pub(crate) fn fetch(&self, record: &dyn Record, slot: &mut ValueSlot) {
        match self {
            Setter::Qual => match record.qual() {
                Some(q) => slot.set_scalar(q),
                None => slot.set_missing(),
            },
            Setter::VariantType => slot.set_scalar(record.variant_type_bits() as f32),
            Setter::InfoFlag { id } => {
                let present = record.info(*id).is_some();
                slot.set_scalar(if present { 1.0 } else { 0.0 });
            }
            Setter::InfoInt { id, idx } | Setter::InfoFloat { id, idx } => {
                match info_numeric_at(record, *id, *idx) {
                    Some(v) => slot.set_scalar(v),
                    None => slot.set_missing(),
                }
            }
            Setter::InfoStr { id } => match record.info(*id) {
                Some(InfoValue::Str(bytes)) => slot.set_str_scalar(bytes),
                _ => slot.set_missing(),
            },
            Setter::FormatInt { id } => match record.format(*id) {
                Some(FormatValue::Int(vals)) => fill_format_ints(slot, vals),
                _ => slot.set_missing(),
            },
            Setter::FormatFloat { id } => match record.format(*id) {
                Some(FormatValue::Float(vals)) => fill_format_floats(slot, vals),
                _ => slot.set_missing(),
            },
            Setter::FormatStr { id } => match record.format(*id) {
                Some(FormatValue::Str { bytes, stride }) if stride > 0 && !bytes.is_empty() => {
                    let count = bytes.len() / stride;
                    slot.set_str_vector(bytes, stride, count);
                }
                _ => slot.set_missing(),
            },
        }
    }
}

impl Reduction {
    /// Reduce the slot's vector to a site-level scalar
    pub(crate) fn apply(&self, slot: &mut ValueSlot) {
        match self {
            Reduction::Max => {
                let mut best: Option<f32> = None;
                for &v in slot.values.iter().take(slot.nvalues) {
                    if float_is_missing(v) {
                        continue;
                    }
                    best = Some(match best {
                        Some(b) => b.max(v),
                        None => v,
                    });
                }
                match best {
                    Some(v) => slot.set_scalar(v),
                    None => slot.set_missing(),
                }
            }
            Reduction::Min => {
                let mut best: Option<f32> = None;
                for &v in slot.values.iter().take(slot.nvalues) {
                    if float_is_missing(v) {
                        continue;
                    }
                    best = Some(match best {
                        Some(b) => b.min(v),
                        None => v,
                    });
                }
                match best {
                    Some(v) => slot.set_scalar(v),
                    None => slot.set_missing(),
                }
            }
            Reduction::Avg => {
                let mut sum = 0.0f32;
                let mut n = 0usize;
                for &v in slot.values.iter().take(slot.nvalues) {
                    if float_is_missing(v) {
                        continue;
                    }
                    sum += v;
                    n += 1;
                }
                // An all-missing vector averages to 0, not to empty
                let avg = if n > 0 { sum / n as f32 } else { 0.0 };
                slot.set_scalar(avg);
            }
        }
    }
}

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

//! Record contract and in-memory implementation
//!
//! A record is one variant call site: site-level scalars (quality, variant
//! classification, applied filters), typed INFO values and per-sample
//! FORMAT vectors. File readers implement [`Record`] over their own line
//! structures; [`MemoryRecord`] is a standalone implementation for tests
//! and synthetic streams.
//!
//! Vector values use the reserved sentinels from [`crate::core::types`] for
//! per-element "unknown" and "vector ends here".

use rustc_hash::FxHashMap;

use super::error::{Error, Result};
use super::schema::Header;
use super::types::TagId;

/// Borrowed view of one INFO value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InfoValue<'a> {
    /// Flag presence; absence is modelled by `info()` returning `None`
    Flag,
    /// Integer scalar or vector
    Int(&'a [i32]),
    /// Float scalar or vector
    Float(&'a [f32]),
    /// Byte string, typically not NUL-terminated
    Str(&'a [u8]),
}

/// Borrowed view of one FORMAT value across all samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormatValue<'a> {
    /// One integer per sample
    Int(&'a [i32]),
    /// One float per sample
    Float(&'a [f32]),
    /// `stride` bytes per sample; shorter values are NUL-padded
    Str { bytes: &'a [u8], stride: usize },
}

/// Read-only view of one variant-call record
///
/// Records are only read while a filter evaluates them; `unpack` is the
/// hook through which a lazy reader decodes just the columns the compiled
/// expression declared it needs.
pub trait Record {
    /// Site quality, `None` when missing
    fn qual(&self) -> Option<f32>;

    /// Variant classification bits (see [`crate::core::types::variant_type`])
    fn variant_type_bits(&self) -> u32;

    /// Ids of the filters applied to this record; empty means none
    fn applied_filters(&self) -> &[TagId];

    /// The INFO value stored under `id`, if present
    fn info(&self, id: TagId) -> Option<InfoValue<'_>>;

    /// The FORMAT value stored under `id`, if present
    fn format(&self, id: TagId) -> Option<FormatValue<'_>>;

    /// Decode the columns selected by `mask` (see [`crate::core::types::unpack`])
    fn unpack(&self, _mask: u8) {}
}

#[derive(Debug, Clone)]
enum InfoData {
    Flag,
    Int(Vec<i32>),
    Float(Vec<f32>),
    Str(Vec<u8>),
}

#[derive(Debug, Clone)]
enum FormatData {
    Int(Vec<i32>),
    Float(Vec<f32>),
    Str { bytes: Vec<u8>, stride: usize },
}

/// In-memory [`Record`] built with [`RecordBuilder`]
#[derive(Debug, Clone, Default)]
pub struct MemoryRecord {
    qual: Option<f32>,
    variant_type: u32,
    filters: Vec<TagId>,
    info: FxHashMap<TagId, InfoData>,
    format: FxHashMap<TagId, FormatData>,
}

impl Record for MemoryRecord {
    fn qual(&self) -> Option<f32> {
        self.qual
    }

    fn variant_type_bits(&self) -> u32 {
        self.variant_type
    }

    fn applied_filters(&self) -> &[TagId] {
        &self.filters
    }

    fn info(&self, id: TagId) -> Option<InfoValue<'_>> {
        self.info.get(&id).map(|data| match data {
            InfoData::Flag => InfoValue::Flag,
            InfoData::Int(v) => InfoValue::Int(v),
            InfoData::Float(v) => InfoValue::Float(v),
            InfoData::Str(v) => InfoValue::Str(v),
        })
    }

    fn format(&self, id: TagId) -> Option<FormatValue<'_>> {
        self.format.get(&id).map(|data| match data {
            FormatData::Int(v) => FormatValue::Int(v),
            FormatData::Float(v) => FormatValue::Float(v),
            FormatData::Str { bytes, stride } => FormatValue::Str {
                bytes,
                stride: *stride,
            },
        })
    }
}

/// Builder for [`MemoryRecord`]
///
/// Tag names are resolved against the header as they are added; the first
/// unknown name surfaces from [`RecordBuilder::build`].
pub struct RecordBuilder<'h> {
    header: &'h dyn Header,
    record: MemoryRecord,
    err: Option<Error>,
}

impl<'h> RecordBuilder<'h> {
    /// Start a record for a stream described by `header`
    pub fn new(header: &'h dyn Header) -> Self {
        RecordBuilder {
            header,
            record: MemoryRecord::default(),
            err: None,
        }
    }

    fn resolve(&mut self, name: &str) -> Option<TagId> {
        match self.header.id_of(name) {
            Some(id) => Some(id),
            None => {
                if self.err.is_none() {
                    self.err = Some(Error::TagNotDefined(name.to_string()));
                }
                None
            }
        }
    }

    /// Set the site quality
    pub fn qual(mut self, qual: f32) -> Self {
        self.record.qual = Some(qual);
        self
    }

    /// Set the variant classification bits
    pub fn variant_type(mut self, bits: u32) -> Self {
        self.record.variant_type = bits;
        self
    }

    /// Apply a named filter to the record
    pub fn filter(mut self, name: &str) -> Self {
        if let Some(id) = self.resolve(name) {
            self.record.filters.push(id);
        }
        self
    }

    /// Mark an INFO flag as present
    pub fn info_flag(mut self, name: &str) -> Self {
        if let Some(id) = self.resolve(name) {
            self.record.info.insert(id, InfoData::Flag);
        }
        self
    }

    /// Store an integer INFO value
    pub fn info_int(mut self, name: &str, values: impl Into<Vec<i32>>) -> Self {
        if let Some(id) = self.resolve(name) {
            self.record.info.insert(id, InfoData::Int(values.into()));
        }
        self
    }

    /// Store a float INFO value
    pub fn info_float(mut self, name: &str, values: impl Into<Vec<f32>>) -> Self {
        if let Some(id) = self.resolve(name) {
            self.record.info.insert(id, InfoData::Float(values.into()));
        }
        self
    }

    /// Store a string INFO value
    pub fn info_str(mut self, name: &str, value: &str) -> Self {
        if let Some(id) = self.resolve(name) {
            self.record
                .info
                .insert(id, InfoData::Str(value.as_bytes().to_vec()));
        }
        self
    }

    /// Store a per-sample integer FORMAT vector
    pub fn format_int(mut self, name: &str, values: impl Into<Vec<i32>>) -> Self {
        if let Some(id) = self.resolve(name) {
            self.record.format.insert(id, FormatData::Int(values.into()));
        }
        self
    }

    /// Store a per-sample float FORMAT vector
    pub fn format_float(mut self, name: &str, values: impl Into<Vec<f32>>) -> Self {
        if let Some(id) = self.resolve(name) {
            self.record
                .format
                .insert(id, FormatData::Float(values.into()));
        }
        self
    }

    /// Store a per-sample string FORMAT vector
    ///
    /// The stride is the longest value; shorter values are NUL-padded.
    pub fn format_str(mut self, name: &str, values: &[&str]) -> Self {
        if let Some(id) = self.resolve(name) {
            let stride = values.iter().map(|s| s.len()).max().unwrap_or(0);
            let mut bytes = Vec::with_capacity(stride * values.len());
            for s in values {
                bytes.extend_from_slice(s.as_bytes());
                bytes.resize(bytes.len() + stride - s.len(), 0);
            }
            self.record
                .format
                .insert(id, FormatData::Str { bytes, stride });
        }
        self
    }

    /// Finish the record
    pub fn build(self) -> Result<MemoryRecord> {
        match self.err {
            Some(err) => Err(err),
            None => Ok(self.record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::HeaderBuilder;
    use crate::core::types::{variant_type, Arity, ValueType};

    fn test_header() -> crate::core::schema::MemoryHeader {
        HeaderBuilder::new()
            .info("DP", ValueType::Int, Arity::Count(1))
            .info("AF", ValueType::Float, Arity::AltAlleles)
            .info("DB", ValueType::Flag, Arity::Count(0))
            .info("GENE", ValueType::Str, Arity::Count(1))
            .format("GQ", ValueType::Int, Arity::Count(1))
            .format("FT", ValueType::Str, Arity::Count(1))
            .filter("q20")
            .sample("a")
            .sample("b")
            .build()
    }

    #[test]
    fn test_site_fields() {
        let hdr = test_header();
        let rec = RecordBuilder::new(&hdr)
            .qual(24.6)
            .variant_type(variant_type::SNP)
            .filter("q20")
            .build()
            .unwrap();

        assert_eq!(rec.qual(), Some(24.6));
        assert_eq!(rec.variant_type_bits(), variant_type::SNP);
        assert_eq!(rec.applied_filters(), &[hdr.id_of("q20").unwrap()]);
    }

    #[test]
    fn test_missing_qual() {
        let hdr = test_header();
        let rec = RecordBuilder::new(&hdr).build().unwrap();
        assert_eq!(rec.qual(), None);
    }

    #[test]
    fn test_info_values() {
        let hdr = test_header();
        let rec = RecordBuilder::new(&hdr)
            .info_int("DP", vec![14])
            .info_float("AF", vec![0.25, 0.5])
            .info_flag("DB")
            .info_str("GENE", "BRCA2")
            .build()
            .unwrap();

        let dp = hdr.id_of("DP").unwrap();
        assert_eq!(rec.info(dp), Some(InfoValue::Int(&[14])));
        let af = hdr.id_of("AF").unwrap();
        assert_eq!(rec.info(af), Some(InfoValue::Float(&[0.25, 0.5])));
        let db = hdr.id_of("DB").unwrap();
        assert_eq!(rec.info(db), Some(InfoValue::Flag));
        let gene = hdr.id_of("GENE").unwrap();
        assert_eq!(rec.info(gene), Some(InfoValue::Str(b"BRCA2")));
        assert_eq!(rec.info(hdr.id_of("GQ").unwrap()), None);
    }

    #[test]
    fn test_format_values() {
        let hdr = test_header();
        let rec = RecordBuilder::new(&hdr)
            .format_int("GQ", vec![30, 50])
            .format_str("FT", &["PASS", "q20"])
            .build()
            .unwrap();

        let gq = hdr.id_of("GQ").unwrap();
        assert_eq!(rec.format(gq), Some(FormatValue::Int(&[30, 50])));
        let ft = hdr.id_of("FT").unwrap();
        match rec.format(ft) {
            Some(FormatValue::Str { bytes, stride }) => {
                assert_eq!(stride, 4);
                assert_eq!(bytes, b"PASSq20\0");
            }
            other => panic!("unexpected FORMAT value: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_tag_fails_build() {
        let hdr = test_header();
        let err = RecordBuilder::new(&hdr)
            .info_int("NOPE", vec![1])
            .build()
            .unwrap_err();
        assert_eq!(err, Error::TagNotDefined("NOPE".to_string()));
    }
}

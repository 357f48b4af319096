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

//! Core type definitions for varsift
//!
//! This module defines the fundamental types shared by the header contract,
//! the record contract and the evaluator: field namespaces, value types,
//! arity codes, variant-type bits, missing/vector-end sentinels and the
//! unpack mask.

use std::fmt;
use std::str::FromStr;

use super::error::Error;

/// Opaque identifier assigned to a tag name by the header dictionary
pub type TagId = usize;

/// The three header namespaces a tag can be declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Site-level fields
    Info,
    /// Per-sample fields
    Format,
    /// Quality-control filter names
    Filter,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Info => write!(f, "INFO"),
            Namespace::Format => write!(f, "FORMAT"),
            Namespace::Filter => write!(f, "FILTER"),
        }
    }
}

/// Primitive value domains a declared field can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Signed integer
    Int,
    /// Floating point
    Float,
    /// Byte string
    Str,
    /// Presence/absence flag (INFO only)
    Flag,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Int => write!(f, "Integer"),
            ValueType::Float => write!(f, "Float"),
            ValueType::Str => write!(f, "String"),
            ValueType::Flag => write!(f, "Flag"),
        }
    }
}

/// Declared vector length of a field
///
/// The header declares how many values a field carries per record (INFO) or
/// per sample (FORMAT). Besides fixed counts there are three symbolic codes
/// tied to the record structure, and `.` for "unspecified".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Exactly `n` values
    Count(usize),
    /// One value per alternate allele (`A`)
    AltAlleles,
    /// One value per allele, reference included (`R`)
    Alleles,
    /// One value per possible genotype (`G`)
    Genotypes,
    /// Unspecified length (`.`)
    Unbounded,
}

impl Arity {
    /// True for fields that carry exactly one value
    pub fn is_scalar(&self) -> bool {
        matches!(self, Arity::Count(1))
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Count(n) => write!(f, "{}", n),
            Arity::AltAlleles => write!(f, "A"),
            Arity::Alleles => write!(f, "R"),
            Arity::Genotypes => write!(f, "G"),
            Arity::Unbounded => write!(f, "."),
        }
    }
}

impl FromStr for Arity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Arity::AltAlleles),
            "R" => Ok(Arity::Alleles),
            "G" => Ok(Arity::Genotypes),
            "." => Ok(Arity::Unbounded),
            n => n
                .parse::<usize>()
                .map(Arity::Count)
                .map_err(|_| Error::BadExpression(format!("invalid arity code: {}", s))),
        }
    }
}

/// Variant classification bits, as reported by `Record::variant_type_bits`
///
/// A record's classification is the bitwise OR over its alternate alleles.
/// `REF` is the all-clear value for records without an alternate.
pub mod variant_type {
    /// No alternate allele
    pub const REF: u32 = 0;
    /// Single-nucleotide polymorphism
    pub const SNP: u32 = 1;
    /// Multi-nucleotide polymorphism
    pub const MNP: u32 = 2;
    /// Insertion or deletion
    pub const INDEL: u32 = 4;
    /// Anything else
    pub const OTHER: u32 = 8;
}

/// Resolve a `%TYPE` vocabulary word to its numeric code
///
/// Accepts the singular and plural spellings, case-insensitively.
pub fn variant_type_code(word: &str) -> Option<u32> {
    if word.eq_ignore_ascii_case("snp") || word.eq_ignore_ascii_case("snps") {
        Some(variant_type::SNP)
    } else if word.eq_ignore_ascii_case("indel") || word.eq_ignore_ascii_case("indels") {
        Some(variant_type::INDEL)
    } else if word.eq_ignore_ascii_case("mnp") || word.eq_ignore_ascii_case("mnps") {
        Some(variant_type::MNP)
    } else if word.eq_ignore_ascii_case("other") {
        Some(variant_type::OTHER)
    } else if word.eq_ignore_ascii_case("ref") {
        Some(variant_type::REF)
    } else {
        None
    }
}

/// Reserved integer value meaning "this element is unknown"
pub const INT_MISSING: i32 = i32::MIN;

/// Reserved integer value meaning "the vector ends here"
pub const INT_VECTOR_END: i32 = i32::MIN + 1;

const FLOAT_MISSING_BITS: u32 = 0x7f80_0001;
const FLOAT_VECTOR_END_BITS: u32 = 0x7f80_0002;

/// The reserved NaN pattern meaning "this element is unknown"
#[inline]
pub fn float_missing() -> f32 {
    f32::from_bits(FLOAT_MISSING_BITS)
}

/// Check for the float missing sentinel
#[inline]
pub fn float_is_missing(v: f32) -> bool {
    v.to_bits() == FLOAT_MISSING_BITS
}

/// The reserved NaN pattern meaning "the vector ends here"
#[inline]
pub fn float_vector_end() -> f32 {
    f32::from_bits(FLOAT_VECTOR_END_BITS)
}

/// Check for the float vector-end sentinel
#[inline]
pub fn float_is_vector_end(v: f32) -> bool {
    v.to_bits() == FLOAT_VECTOR_END_BITS
}

/// Record-decoding hints declared by a compiled filter
///
/// A compiled filter ORs together the columns its expression touches so the
/// caller can skip decoding the rest of each record.
pub mod unpack {
    /// The shared string columns (always requested)
    pub const STRINGS: u8 = 1;
    /// The applied-filters column
    pub const FILTERS: u8 = 2;
    /// The INFO column
    pub const INFO: u8 = 4;
    /// The per-sample FORMAT columns
    pub const FORMAT: u8 = 8;
    /// Everything
    pub const ALL: u8 = STRINGS | FILTERS | INFO | FORMAT;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_display() {
        assert_eq!(Namespace::Info.to_string(), "INFO");
        assert_eq!(Namespace::Format.to_string(), "FORMAT");
        assert_eq!(Namespace::Filter.to_string(), "FILTER");
    }

    #[test]
    fn test_arity_display_and_parse() {
        assert_eq!(Arity::Count(1).to_string(), "1");
        assert_eq!(Arity::AltAlleles.to_string(), "A");
        assert_eq!(Arity::Alleles.to_string(), "R");
        assert_eq!(Arity::Genotypes.to_string(), "G");
        assert_eq!(Arity::Unbounded.to_string(), ".");

        assert_eq!("1".parse::<Arity>().unwrap(), Arity::Count(1));
        assert_eq!("4".parse::<Arity>().unwrap(), Arity::Count(4));
        assert_eq!("A".parse::<Arity>().unwrap(), Arity::AltAlleles);
        assert_eq!("R".parse::<Arity>().unwrap(), Arity::Alleles);
        assert_eq!("G".parse::<Arity>().unwrap(), Arity::Genotypes);
        assert_eq!(".".parse::<Arity>().unwrap(), Arity::Unbounded);
        assert!("x".parse::<Arity>().is_err());
    }

    #[test]
    fn test_arity_is_scalar() {
        assert!(Arity::Count(1).is_scalar());
        assert!(!Arity::Count(4).is_scalar());
        assert!(!Arity::Genotypes.is_scalar());
    }

    #[test]
    fn test_variant_type_code() {
        assert_eq!(variant_type_code("snp"), Some(variant_type::SNP));
        assert_eq!(variant_type_code("SNPs"), Some(variant_type::SNP));
        assert_eq!(variant_type_code("indel"), Some(variant_type::INDEL));
        assert_eq!(variant_type_code("Indels"), Some(variant_type::INDEL));
        assert_eq!(variant_type_code("mnp"), Some(variant_type::MNP));
        assert_eq!(variant_type_code("other"), Some(variant_type::OTHER));
        assert_eq!(variant_type_code("ref"), Some(variant_type::REF));
        assert_eq!(variant_type_code("sv"), None);
    }

    #[test]
    fn test_float_sentinels() {
        let m = float_missing();
        let e = float_vector_end();
        assert!(m.is_nan());
        assert!(e.is_nan());
        assert!(float_is_missing(m));
        assert!(!float_is_missing(e));
        assert!(float_is_vector_end(e));
        assert!(!float_is_vector_end(m));
        // An ordinary NaN is neither sentinel
        assert!(!float_is_missing(f32::NAN));
        assert!(!float_is_vector_end(f32::NAN));
    }

    #[test]
    fn test_unpack_mask() {
        assert_eq!(
            unpack::ALL,
            unpack::STRINGS | unpack::FILTERS | unpack::INFO | unpack::FORMAT
        );
        assert_eq!(unpack::STRINGS & unpack::FORMAT, 0);
    }
}

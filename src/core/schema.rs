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

//! Header contract and in-memory implementation
//!
//! A header is the schema a record stream was declared against: which tags
//! exist, in which namespace, with what value type and arity, plus the
//! sample roster. Filters compile against a [`Header`]; real file readers
//! implement the trait over their own header structures, and
//! [`MemoryHeader`] provides a standalone implementation for tests and
//! synthetic streams.

use rustc_hash::FxHashMap;

use super::types::{Arity, Namespace, TagId, ValueType};

/// Read-only view of a record-stream header
///
/// Shared freely: a header may back any number of compiled filters.
pub trait Header {
    /// Resolve a tag name to its dictionary id
    fn id_of(&self, name: &str) -> Option<TagId>;

    /// Check whether `id` is declared in `ns`
    fn is_defined(&self, ns: Namespace, id: TagId) -> bool;

    /// The declared value type of `id` in `ns`, if declared there
    fn declared_type(&self, ns: Namespace, id: TagId) -> Option<ValueType>;

    /// The declared arity of `id` in `ns`, if declared there
    fn declared_arity(&self, ns: Namespace, id: TagId) -> Option<Arity>;

    /// Number of samples in the stream
    fn nsamples(&self) -> usize;
}

#[derive(Debug, Clone, Copy)]
struct FieldDecl {
    value_type: ValueType,
    arity: Arity,
}

/// In-memory [`Header`] built with [`HeaderBuilder`]
///
/// One shared dictionary maps names to ids; a name may be declared in
/// several namespaces under the same id, mirroring the binary header
/// layout of the underlying format.
#[derive(Debug, Clone, Default)]
pub struct MemoryHeader {
    dict: FxHashMap<String, TagId>,
    names: Vec<String>,
    info: FxHashMap<TagId, FieldDecl>,
    format: FxHashMap<TagId, FieldDecl>,
    filters: FxHashMap<TagId, ()>,
    samples: Vec<String>,
}

impl MemoryHeader {
    /// The name behind a dictionary id
    pub fn name_of(&self, id: TagId) -> Option<&str> {
        self.names.get(id).map(|s| s.as_str())
    }

    /// The sample names, in column order
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    fn intern(&mut self, name: &str) -> TagId {
        if let Some(&id) = self.dict.get(name) {
            return id;
        }
        let id = self.names.len();
        self.names.push(name.to_string());
        self.dict.insert(name.to_string(), id);
        id
    }
}

impl Header for MemoryHeader {
    fn id_of(&self, name: &str) -> Option<TagId> {
        self.dict.get(name).copied()
    }

    fn is_defined(&self, ns: Namespace, id: TagId) -> bool {
        match ns {
            Namespace::Info => self.info.contains_key(&id),
            Namespace::Format => self.format.contains_key(&id),
            Namespace::Filter => self.filters.contains_key(&id),
        }
    }

    fn declared_type(&self, ns: Namespace, id: TagId) -> Option<ValueType> {
        match ns {
            Namespace::Info => self.info.get(&id).map(|d| d.value_type),
            Namespace::Format => self.format.get(&id).map(|d| d.value_type),
            Namespace::Filter => None,
        }
    }

    fn declared_arity(&self, ns: Namespace, id: TagId) -> Option<Arity> {
        match ns {
            Namespace::Info => self.info.get(&id).map(|d| d.arity),
            Namespace::Format => self.format.get(&id).map(|d| d.arity),
            Namespace::Filter => None,
        }
    }

    fn nsamples(&self) -> usize {
        self.samples.len()
    }
}

/// Builder for [`MemoryHeader`]
pub struct HeaderBuilder {
    header: MemoryHeader,
}

impl HeaderBuilder {
    /// Start an empty header
    pub fn new() -> Self {
        HeaderBuilder {
            header: MemoryHeader::default(),
        }
    }

    /// Declare an INFO field
    pub fn info(mut self, name: impl AsRef<str>, value_type: ValueType, arity: Arity) -> Self {
        let id = self.header.intern(name.as_ref());
        self.header.info.insert(id, FieldDecl { value_type, arity });
        self
    }

    /// Declare a FORMAT field
    pub fn format(mut self, name: impl AsRef<str>, value_type: ValueType, arity: Arity) -> Self {
        let id = self.header.intern(name.as_ref());
        self.header
            .format
            .insert(id, FieldDecl { value_type, arity });
        self
    }

    /// Declare a filter name
    pub fn filter(mut self, name: impl AsRef<str>) -> Self {
        let id = self.header.intern(name.as_ref());
        self.header.filters.insert(id, ());
        self
    }

    /// Add a sample column
    pub fn sample(mut self, name: impl Into<String>) -> Self {
        self.header.samples.push(name.into());
        self
    }

    /// Finish the header
    pub fn build(self) -> MemoryHeader {
        self.header
    }
}

impl Default for HeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_header() -> MemoryHeader {
        HeaderBuilder::new()
            .info("DP", ValueType::Int, Arity::Count(1))
            .info("DP4", ValueType::Int, Arity::Count(4))
            .format("GQ", ValueType::Int, Arity::Count(1))
            .filter("PASS")
            .filter("q20")
            .sample("NA0001")
            .sample("NA0002")
            .build()
    }

    #[test]
    fn test_id_lookup() {
        let hdr = test_header();
        let dp = hdr.id_of("DP").unwrap();
        assert_eq!(hdr.name_of(dp), Some("DP"));
        assert!(hdr.id_of("XY").is_none());
    }

    #[test]
    fn test_namespaces() {
        let hdr = test_header();
        let dp = hdr.id_of("DP").unwrap();
        let gq = hdr.id_of("GQ").unwrap();
        let pass = hdr.id_of("PASS").unwrap();

        assert!(hdr.is_defined(Namespace::Info, dp));
        assert!(!hdr.is_defined(Namespace::Format, dp));
        assert!(hdr.is_defined(Namespace::Format, gq));
        assert!(hdr.is_defined(Namespace::Filter, pass));
        assert!(!hdr.is_defined(Namespace::Filter, dp));
    }

    #[test]
    fn test_declared_type_and_arity() {
        let hdr = test_header();
        let dp4 = hdr.id_of("DP4").unwrap();
        assert_eq!(hdr.declared_type(Namespace::Info, dp4), Some(ValueType::Int));
        assert_eq!(
            hdr.declared_arity(Namespace::Info, dp4),
            Some(Arity::Count(4))
        );
        assert_eq!(hdr.declared_type(Namespace::Format, dp4), None);
    }

    #[test]
    fn test_shared_id_across_namespaces() {
        let hdr = HeaderBuilder::new()
            .info("DP", ValueType::Int, Arity::Count(1))
            .format("DP", ValueType::Int, Arity::Count(1))
            .build();
        let dp = hdr.id_of("DP").unwrap();
        assert!(hdr.is_defined(Namespace::Info, dp));
        assert!(hdr.is_defined(Namespace::Format, dp));
    }

    #[test]
    fn test_samples() {
        let hdr = test_header();
        assert_eq!(hdr.nsamples(), 2);
        assert_eq!(hdr.samples()[0], "NA0001");
    }
}

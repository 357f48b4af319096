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

//! Missing data flows through the value domain, never as an error

use varsift::core::types::{INT_MISSING, INT_VECTOR_END};
use varsift::core::{Arity, HeaderBuilder, MemoryHeader, RecordBuilder, ValueType};
use varsift::Filter;

fn header() -> MemoryHeader {
    HeaderBuilder::new()
        .info("DP", ValueType::Int, Arity::Count(1))
        .info("DP4", ValueType::Int, Arity::Count(4))
        .info("DB", ValueType::Flag, Arity::Count(0))
        .format("GQ", ValueType::Int, Arity::Count(1))
        .sample("s1")
        .sample("s2")
        .build()
}

#[test]
fn test_absent_tag_fails_comparison() {
    let hdr = header();
    let rec = RecordBuilder::new(&hdr).build().unwrap();
    for expr in ["DP>0", "DP<0", "DP=0", "DP!=0", "DP>=0", "DP<=0"] {
        let mut filter = Filter::new(&hdr, expr).unwrap();
        assert!(!filter.test(&rec).unwrap().0, "{} over a missing tag", expr);
    }
}

#[test]
fn test_missing_qual_fails() {
    let hdr = header();
    let mut filter = Filter::new(&hdr, "%QUAL>0").unwrap();
    let rec = RecordBuilder::new(&hdr).build().unwrap();
    assert!(!filter.test(&rec).unwrap().0);
}

#[test]
fn test_arithmetic_with_missing_operand_fails() {
    let hdr = header();
    // DP present, DP4 absent: the sum is empty, so the comparison fails
    let mut filter = Filter::new(&hdr, "DP+DP4[0]>0").unwrap();
    let rec = RecordBuilder::new(&hdr)
        .info_int("DP", vec![14])
        .build()
        .unwrap();
    assert!(!filter.test(&rec).unwrap().0);
}

#[test]
fn test_indexed_access_past_vector_end() {
    let hdr = header();
    let mut filter = Filter::new(&hdr, "DP4[2]>0").unwrap();
    let rec = RecordBuilder::new(&hdr)
        .info_int("DP4", vec![1, INT_VECTOR_END, INT_VECTOR_END, INT_VECTOR_END])
        .build()
        .unwrap();
    assert!(!filter.test(&rec).unwrap().0);
}

#[test]
fn test_indexed_access_missing_element() {
    let hdr = header();
    let mut filter = Filter::new(&hdr, "DP4[1]>=0").unwrap();
    let rec = RecordBuilder::new(&hdr)
        .info_int("DP4", vec![1, INT_MISSING, 3, 4])
        .build()
        .unwrap();
    assert!(!filter.test(&rec).unwrap().0);
}

#[test]
fn test_flag_presence_and_absence() {
    let hdr = header();
    let mut present = Filter::new(&hdr, "DB=1").unwrap();
    let mut absent = Filter::new(&hdr, "DB=0").unwrap();

    let with_flag = RecordBuilder::new(&hdr).info_flag("DB").build().unwrap();
    assert!(present.test(&with_flag).unwrap().0);
    assert!(!absent.test(&with_flag).unwrap().0);

    let without_flag = RecordBuilder::new(&hdr).build().unwrap();
    assert!(!present.test(&without_flag).unwrap().0);
    assert!(absent.test(&without_flag).unwrap().0);
}

#[test]
fn test_partially_missing_format_vector() {
    let hdr = header();
    let mut filter = Filter::new(&hdr, "GQ>10").unwrap();
    let rec = RecordBuilder::new(&hdr)
        .format_int("GQ", vec![30, INT_MISSING])
        .build()
        .unwrap();
    let (site, samples) = filter.test(&rec).unwrap();
    assert!(site);
    // The missing sample never passes
    assert_eq!(samples, Some(&[true, false][..]));
}

#[test]
fn test_fully_missing_format_vector() {
    let hdr = header();
    let mut filter = Filter::new(&hdr, "GQ>10").unwrap();
    let rec = RecordBuilder::new(&hdr)
        .format_int("GQ", vec![INT_MISSING, INT_MISSING])
        .build()
        .unwrap();
    let (site, samples) = filter.test(&rec).unwrap();
    assert!(!site);
    assert_eq!(samples, Some(&[false, false][..]));
}

#[test]
fn test_missing_disjunction_falls_back_to_present_side() {
    let hdr = header();
    let mut filter = Filter::new(&hdr, "DP>10 | GQ>10").unwrap();
    // GQ absent entirely: the verdict comes from DP alone
    let rec = RecordBuilder::new(&hdr)
        .info_int("DP", vec![14])
        .build()
        .unwrap();
    assert!(filter.test(&rec).unwrap().0);

    let rec = RecordBuilder::new(&hdr)
        .info_int("DP", vec![2])
        .build()
        .unwrap();
    assert!(!filter.test(&rec).unwrap().0);
}

#[test]
fn test_missing_conjunction_fails() {
    let hdr = header();
    let mut filter = Filter::new(&hdr, "DP>10 & GQ>10").unwrap();
    let rec = RecordBuilder::new(&hdr)
        .info_int("DP", vec![14])
        .build()
        .unwrap();
    assert!(!filter.test(&rec).unwrap().0);
}

#[test]
fn test_reduction_over_missing_vector() {
    let hdr = header();
    let mut min = Filter::new(&hdr, "%MIN(GQ)>0").unwrap();
    let rec = RecordBuilder::new(&hdr)
        .format_int("GQ", vec![INT_MISSING, INT_MISSING])
        .build()
        .unwrap();
    // All-missing input reduces to empty, and the comparison fails
    assert!(!min.test(&rec).unwrap().0);

    // %AVG of an all-missing vector is 0 by convention
    let mut avg_zero = Filter::new(&hdr, "%AVG(GQ)=0").unwrap();
    assert!(avg_zero.test(&rec).unwrap().0);
}

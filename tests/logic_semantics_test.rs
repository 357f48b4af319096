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

//! Site-level vs per-sample operator semantics and broadcast properties

use varsift::core::{Arity, HeaderBuilder, MemoryHeader, MemoryRecord, RecordBuilder, ValueType};
use varsift::Filter;

fn header() -> MemoryHeader {
    HeaderBuilder::new()
        .info("DP", ValueType::Int, Arity::Count(1))
        .format("GQ", ValueType::Int, Arity::Count(1))
        .sample("s1")
        .sample("s2")
        .build()
}

fn run(hdr: &MemoryHeader, expr: &str, rec: &MemoryRecord) -> (bool, Option<Vec<bool>>) {
    let mut filter = Filter::new(hdr, expr).unwrap();
    let (site, mask) = filter.test(rec).unwrap();
    (site, mask.map(|m| m.to_vec()))
}

#[test]
fn test_site_or_keeps_sample_mask() {
    let hdr = header();
    // Site side passes, no sample passes on its own
    let rec = RecordBuilder::new(&hdr)
        .info_int("DP", vec![14])
        .format_int("GQ", vec![5, 7])
        .build()
        .unwrap();

    // `|` lets the site bit pass but does not fan it into the samples
    let (site, mask) = run(&hdr, "DP>10 | GQ>100", &rec);
    assert!(site);
    assert_eq!(mask, Some(vec![false, false]));

    // `||` fans the passing site verdict across every sample
    let (site, mask) = run(&hdr, "DP>10 || GQ>100", &rec);
    assert!(site);
    assert_eq!(mask, Some(vec![true, true]));
}

#[test]
fn test_vector_left_site_right_or() {
    let hdr = header();
    let rec = RecordBuilder::new(&hdr)
        .info_int("DP", vec![2])
        .format_int("GQ", vec![150, 7])
        .build()
        .unwrap();

    // The sample verdicts survive; the failed site side adds nothing
    let (site, mask) = run(&hdr, "GQ>100 | DP>10", &rec);
    assert!(site);
    assert_eq!(mask, Some(vec![true, false]));

    let (site, mask) = run(&hdr, "GQ>100 || DP>10", &rec);
    assert!(site);
    assert_eq!(mask, Some(vec![true, false]));
}

#[test]
fn test_and_fans_site_verdict() {
    let hdr = header();
    let rec = RecordBuilder::new(&hdr)
        .info_int("DP", vec![14])
        .format_int("GQ", vec![150, 7])
        .build()
        .unwrap();

    for expr in ["GQ>100 & DP>10", "GQ>100 && DP>10", "DP>10 & GQ>100", "DP>10 && GQ>100"] {
        let (site, mask) = run(&hdr, expr, &rec);
        assert!(site, "{}", expr);
        assert_eq!(mask, Some(vec![true, false]), "{}", expr);
    }

    // A failing site side clears everything
    let rec = RecordBuilder::new(&hdr)
        .info_int("DP", vec![2])
        .format_int("GQ", vec![150, 7])
        .build()
        .unwrap();
    let (site, mask) = run(&hdr, "GQ>100 & DP>10", &rec);
    assert!(!site);
    assert_eq!(mask, Some(vec![false, false]));
}

#[test]
fn test_commutative_operators() {
    let hdr = header();
    let rec = RecordBuilder::new(&hdr)
        .info_int("DP", vec![14])
        .format_int("GQ", vec![150, 7])
        .build()
        .unwrap();

    let pairs = [
        ("DP*2>20", "2*DP>20"),
        ("DP+1>14", "1+DP>14"),
        ("GQ+5>100", "5+GQ>100"),
        ("GQ*2>100", "2*GQ>100"),
        ("GQ>100 && DP>10", "DP>10 && GQ>100"),
        ("GQ>100 || DP>10", "DP>10 || GQ>100"),
        ("GQ>100 & DP>10", "DP>10 & GQ>100"),
        ("GQ>100 | DP>10", "DP>10 | GQ>100"),
    ];
    for (left, right) in pairs {
        let a = run(&hdr, left, &rec);
        let b = run(&hdr, right, &rec);
        assert_eq!(a.0, b.0, "site: {} vs {}", left, right);
        // `|` keeps the vector operand's samples whichever side it is on
        assert_eq!(a.1, b.1, "mask: {} vs {}", left, right);
    }
}

#[test]
fn test_unary_minus_equivalence() {
    let hdr = header();
    let rec = RecordBuilder::new(&hdr)
        .info_int("DP", vec![14])
        .build()
        .unwrap();

    for expr in ["-DP<-10", "(0-DP)<-10", "(-1*DP)<-10"] {
        let (site, _) = run(&hdr, expr, &rec);
        assert!(site, "{}", expr);
    }
    for expr in ["-DP<-20", "(0-DP)<-20", "(-1*DP)<-20"] {
        let (site, _) = run(&hdr, expr, &rec);
        assert!(!site, "{}", expr);
    }
}

#[test]
fn test_scalar_broadcast_mask() {
    let hdr = header();
    let rec = RecordBuilder::new(&hdr)
        .format_int("GQ", vec![30, 80])
        .build()
        .unwrap();

    // Threshold on the right
    let (site, mask) = run(&hdr, "GQ>50", &rec);
    assert!(site);
    assert_eq!(mask, Some(vec![false, true]));

    // Threshold on the left
    let (site, mask) = run(&hdr, "50<GQ", &rec);
    assert!(site);
    assert_eq!(mask, Some(vec![false, true]));
}

#[test]
fn test_arithmetic_broadcast_over_samples() {
    let hdr = header();
    let rec = RecordBuilder::new(&hdr)
        .format_int("GQ", vec![30, 80])
        .build()
        .unwrap();

    // GQ/2 > 20 selects only the second sample
    let (site, mask) = run(&hdr, "GQ/2>20", &rec);
    assert!(site);
    assert_eq!(mask, Some(vec![false, true]));

    // 100-GQ < 50 likewise
    let (site, mask) = run(&hdr, "100-GQ<50", &rec);
    assert!(site);
    assert_eq!(mask, Some(vec![false, true]));
}

#[test]
fn test_reduction_inside_conjunction() {
    let hdr = header();
    let rec = RecordBuilder::new(&hdr)
        .info_int("DP", vec![14])
        .format_int("GQ", vec![30, 80])
        .build()
        .unwrap();

    let (site, _) = run(&hdr, "%MIN(GQ)>10 & DP>10", &rec);
    assert!(site);
    let (site, _) = run(&hdr, "%MIN(GQ)>50 & DP>10", &rec);
    assert!(!site);
    let (site, _) = run(&hdr, "%MAX(GQ)>50 & DP>10", &rec);
    assert!(site);
    let (site, _) = run(&hdr, "%AVG(GQ)=55 & DP>10", &rec);
    assert!(site);
}

#[test]
fn test_reduction_over_expression() {
    let hdr = header();
    let rec = RecordBuilder::new(&hdr)
        .format_int("GQ", vec![30, 80])
        .build()
        .unwrap();

    // The reduction applies to the computed per-sample vector
    let (site, _) = run(&hdr, "%MIN(GQ/2)>10", &rec);
    assert!(site);
    let (site, _) = run(&hdr, "%MIN(GQ/2)>20", &rec);
    assert!(!site);
}

#[test]
fn test_operator_precedence_and_over_or() {
    let hdr = header();
    let rec = RecordBuilder::new(&hdr)
        .info_int("DP", vec![14])
        .build()
        .unwrap();

    // Parsed as DP>100 | (DP>10 & DP<20), which passes
    let (site, _) = run(&hdr, "DP>100 | DP>10 & DP<20", &rec);
    assert!(site);

    // Forcing the grouping the other way fails
    let (site, _) = run(&hdr, "(DP>100 | DP>10) & DP>20", &rec);
    assert!(!site);
}

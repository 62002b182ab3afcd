// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::compare::CompareOp;
use crate::number::{format_double, GenericNumber};

use anyhow::Result;

#[test]
fn parse_prefers_integers() -> Result<()> {
    assert!(matches!(
        GenericNumber::parse("10"),
        Some(GenericNumber::Integer(10))
    ));
    assert!(matches!(
        GenericNumber::parse(" 2.5 "),
        Some(GenericNumber::Double(d)) if d == 2.5
    ));
    assert!(GenericNumber::parse("").is_none());
    assert!(GenericNumber::parse("ten").is_none());
    assert!("ten".parse::<GenericNumber>().is_err());
    Ok(())
}

#[test]
fn nan_is_normalized() {
    assert!(GenericNumber::from(f64::NAN).is_nan());
    assert!(!GenericNumber::from(1.0).is_nan());
}

#[test]
fn mixed_comparisons() {
    let one = GenericNumber::from(1i64);
    let one_double = GenericNumber::from(1.0);
    let two = GenericNumber::from(2.5);

    assert!(one.compare(&one_double, CompareOp::EQ));
    assert!(one.compare(&two, CompareOp::LT));
    assert!(two.compare(&one, CompareOp::GE));
    assert!(!two.compare(&one, CompareOp::LE));
    assert!(GenericNumber::from(true).compare(&one, CompareOp::EQ));
}

#[test]
fn nan_only_satisfies_ne() {
    let nan = GenericNumber::nan();
    let one = GenericNumber::from(1i64);
    for op in [
        CompareOp::EQ,
        CompareOp::LT,
        CompareOp::LE,
        CompareOp::GT,
        CompareOp::GE,
    ] {
        assert!(!nan.compare(&one, op), "nan {op} 1");
        assert!(!one.compare(&nan, op), "1 {op} nan");
        assert!(!nan.compare(&nan, op), "nan {op} nan");
    }
    assert!(nan.compare(&one, CompareOp::NE));
    assert!(nan.compare(&nan, CompareOp::NE));
}

#[test]
fn large_integers_stay_exact() {
    let a = GenericNumber::from(i64::MAX);
    let b = GenericNumber::from(i64::MAX - 1);
    assert!(a.compare(&b, CompareOp::GT));
    assert!(!a.compare(&b, CompareOp::EQ));
}

#[test]
fn doubles_render_distinctly() {
    assert_eq!(format_double(1.0), "1.0");
    assert_eq!(format_double(2.5), "2.5");
    assert_eq!(format_double(f64::NAN), "nan");
    assert_eq!(format_double(f64::NEG_INFINITY), "-inf");
    assert_eq!(GenericNumber::from(3i64).to_string(), "3");
    assert_eq!(GenericNumber::from(3.0).to_string(), "3.0");
}

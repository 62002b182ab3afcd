// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::compare::{compare_objects, to_generic_number, CompareMode, CompareOp};
use crate::object::{Object, UnixTime, WireType};

fn cmp(lhs: impl Into<Object>, rhs: impl Into<Object>, mode: CompareMode, op: CompareOp) -> bool {
    compare_objects(&lhs.into(), &rhs.into(), mode, op)
}

#[test]
fn string_tie_break() {
    use CompareMode::StringBased;
    assert!(cmp("ab", "abc", StringBased, CompareOp::LT));
    assert!(cmp("ab", "ab", StringBased, CompareOp::EQ));
    assert!(cmp("b", "ab", StringBased, CompareOp::GT));
    assert!(cmp("", "a", StringBased, CompareOp::LT));
    assert!(!cmp("abc", "ab", StringBased, CompareOp::LE));
}

#[test]
fn string_mode_compares_marshalled_forms() {
    use CompareMode::StringBased;
    assert!(cmp(10i64, "10", StringBased, CompareOp::EQ));
    // "10" < "9" byte-wise.
    assert!(cmp(10i64, 9i64, StringBased, CompareOp::LT));
    assert!(cmp(true, "true", StringBased, CompareOp::EQ));
}

#[test]
fn type_aware_mode() {
    use CompareMode::TypeAware;
    assert!(cmp("10", "9", TypeAware, CompareOp::LT));
    assert!(cmp(10i64, "9", TypeAware, CompareOp::GT));
    assert!(cmp(1i64, 1.0, TypeAware, CompareOp::EQ));
    assert!(cmp(true, 1i64, TypeAware, CompareOp::EQ));

    assert!(cmp(Object::null(), Object::null(), TypeAware, CompareOp::EQ));
    assert!(cmp(Object::null(), 0i64, TypeAware, CompareOp::NE));
    assert!(!cmp(Object::null(), 0i64, TypeAware, CompareOp::EQ));
    // Ordering operators fall through to numbers, null being zero.
    assert!(cmp(Object::null(), 5i64, TypeAware, CompareOp::LT));
}

#[test]
fn num_based_mode() {
    use CompareMode::NumBased;
    assert!(cmp("2", "10", NumBased, CompareOp::LT));
    assert!(cmp("1.5", 1.5, NumBased, CompareOp::EQ));
    // Unparsable strings are NaN: only NE holds.
    assert!(!cmp("abc", "abc", NumBased, CompareOp::EQ));
    assert!(cmp("abc", "abc", NumBased, CompareOp::NE));
    assert!(!cmp("abc", 1i64, NumBased, CompareOp::LT));
    assert!(!cmp("abc", 1i64, NumBased, CompareOp::GE));
}

#[test]
fn type_and_value_mode() {
    use CompareMode::TypeAndValueBased;
    assert!(!cmp(1i64, "1", TypeAndValueBased, CompareOp::EQ));
    assert!(cmp(1i64, "1", TypeAndValueBased, CompareOp::NE));
    assert!(cmp(1i64, 1i64, TypeAndValueBased, CompareOp::EQ));
    assert!(!cmp(1i64, 1.0, TypeAndValueBased, CompareOp::EQ));
    // Ordering operators are not defined for this mode.
    assert!(!cmp(1i64, 2i64, TypeAndValueBased, CompareOp::LT));
}

#[test]
fn message_values_are_decoded_for_typed_modes() {
    let five = Object::message_value(&b"5"[..], WireType::Integer);
    assert!(compare_objects(
        &five,
        &Object::from(5i64),
        CompareMode::TypeAndValueBased,
        CompareOp::EQ
    ));
    assert!(compare_objects(
        &five,
        &Object::from(10i64),
        CompareMode::TypeAware,
        CompareOp::LT
    ));

    let text = Object::message_value(&b"abc"[..], WireType::String);
    assert!(compare_objects(
        &text,
        &Object::from("abd"),
        CompareMode::StringBased,
        CompareOp::LT
    ));
}

#[test]
fn references_are_unwrapped() {
    let r = Object::new_ref(Object::from(3i64));
    assert!(compare_objects(
        &r,
        &Object::from(3i64),
        CompareMode::TypeAndValueBased,
        CompareOp::EQ
    ));
}

#[test]
fn datetimes_compare_as_microseconds() {
    let earlier = Object::datetime(UnixTime::from_usec(1_000));
    let later = Object::datetime(UnixTime::from_usec(2_000));
    assert!(compare_objects(&earlier, &later, CompareMode::TypeAware, CompareOp::LT));
    assert!(to_generic_number(&later) == crate::number::GenericNumber::from(2_000i64));
}

#[test]
fn operator_symbols() {
    for op in [
        CompareOp::EQ,
        CompareOp::NE,
        CompareOp::LT,
        CompareOp::LE,
        CompareOp::GT,
        CompareOp::GE,
    ] {
        assert_eq!(CompareOp::from_symbol(op.symbol()), Some(op));
        assert_eq!(CompareOp::from_bits(op.bits()), Some(op));
    }
    assert_eq!(CompareOp::from_symbol("ge"), Some(CompareOp::GE));
    assert_eq!(CompareOp::from_bits(0), None);
    assert_eq!(CompareOp::from_bits(7), None);
}

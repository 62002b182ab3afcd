// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::cmp::Ordering;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::number::GenericNumber;
use crate::object::{Object, ObjectType, Scalar};

/// Comparison operator as a set of accepted orderings.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompareOp(u8);

impl CompareOp {
    pub const EQ: CompareOp = CompareOp(0b001);
    pub const LT: CompareOp = CompareOp(0b010);
    pub const GT: CompareOp = CompareOp(0b100);
    pub const LE: CompareOp = CompareOp(0b011);
    pub const GE: CompareOp = CompareOp(0b101);
    pub const NE: CompareOp = CompareOp(0b110);

    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            1..=6 => Some(CompareOp(bits)),
            _ => None,
        }
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn matches(self, ordering: Ordering) -> bool {
        let bit = match ordering {
            Ordering::Equal => Self::EQ.0,
            Ordering::Less => Self::LT.0,
            Ordering::Greater => Self::GT.0,
        };
        self.0 & bit != 0
    }

    /// LT, LE, GT and GE.
    pub fn is_ordering(self) -> bool {
        self != Self::EQ && self != Self::NE
    }

    pub fn symbol(self) -> &'static str {
        match self.0 {
            0b001 => "==",
            0b010 => "<",
            0b100 => ">",
            0b011 => "<=",
            0b101 => ">=",
            0b110 => "!=",
            _ => "?",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "==" | "eq" => Self::EQ,
            "<" | "lt" => Self::LT,
            ">" | "gt" => Self::GT,
            "<=" | "le" => Self::LE,
            ">=" | "ge" => Self::GE,
            "!=" | "ne" => Self::NE,
            _ => return None,
        })
    }
}

impl fmt::Debug for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareMode {
    /// `==`, `<`, ...: strings compare as strings, the rest numerically.
    TypeAware,
    /// `eq`, `lt`, ...: everything compares as strings.
    StringBased,
    /// Everything compares as numbers.
    NumBased,
    /// `===` and `!==`: types must match before values are compared.
    TypeAndValueBased,
}

impl CompareMode {
    /// Modes that look at runtime types need message values decoded.
    pub fn needs_typed_operands(self) -> bool {
        matches!(self, CompareMode::TypeAware | CompareMode::TypeAndValueBased)
    }
}

/// Compare two objects. `Ref` operands are unwrapped, and for the typed
/// modes message values are decoded first.
///
/// `TypeAndValueBased` only defines `EQ` and `NE`; any other operator is
/// rejected when the comparison node is built and evaluates to false here.
pub fn compare_objects(lhs: &Object, rhs: &Object, mode: CompareMode, op: CompareOp) -> bool {
    let (lhs, rhs) = if mode.needs_typed_operands() {
        (lhs.typed(), rhs.typed())
    } else {
        (lhs.unwrap_ref(), rhs.unwrap_ref())
    };

    match mode {
        CompareMode::TypeAware => evaluate_type_aware(&lhs, &rhs, op),
        CompareMode::StringBased => evaluate_as_string(&lhs, &rhs, op),
        CompareMode::NumBased => evaluate_as_num(&lhs, &rhs, op),
        CompareMode::TypeAndValueBased => evaluate_type_and_value_based(&lhs, &rhs, op),
    }
}

fn evaluate_type_aware(lhs: &Object, rhs: &Object, op: CompareOp) -> bool {
    let (lt, rt) = (lhs.type_of(), rhs.type_of());
    if lt == rt && lt.is_string_like() {
        return evaluate_as_string(lhs, rhs, op);
    }

    if lt == ObjectType::Null || rt == ObjectType::Null {
        if op == CompareOp::NE {
            return lt != rt;
        }
        if op == CompareOp::EQ {
            return lt == rt;
        }
    }

    evaluate_as_num(lhs, rhs, op)
}

fn evaluate_type_and_value_based(lhs: &Object, rhs: &Object, op: CompareOp) -> bool {
    let same_type = lhs.type_of() == rhs.type_of();
    match op {
        CompareOp::EQ if !same_type => false,
        CompareOp::NE if !same_type => true,
        CompareOp::EQ | CompareOp::NE => evaluate_type_aware(lhs, rhs, op),
        _ => false,
    }
}

fn evaluate_as_string(lhs: &Object, rhs: &Object, op: CompareOp) -> bool {
    let (l, r) = (string_view(lhs), string_view(rhs));
    op.matches(compare_bytes(&l, &r))
}

/// Byte-wise over the common prefix, then shorter first.
fn compare_bytes(l: &[u8], r: &[u8]) -> Ordering {
    let common = l.len().min(r.len());
    match l[..common].cmp(&r[..common]) {
        Ordering::Equal => l.len().cmp(&r.len()),
        ordering => ordering,
    }
}

/// Native bytes of string-like objects, the marshalled form of the rest.
fn string_view(object: &Object) -> Vec<u8> {
    match object.scalar() {
        Some(Scalar::String(s)) => s.as_bytes().to_vec(),
        Some(Scalar::Bytes(b) | Scalar::Protobuf(b)) => b.to_vec(),
        Some(Scalar::MessageValue(mv))
            if matches!(
                mv.wire_type(),
                crate::object::WireType::String
                    | crate::object::WireType::Bytes
                    | crate::object::WireType::Protobuf
            ) =>
        {
            mv.repr_bytes().to_vec()
        }
        _ => object.marshal().0,
    }
}

fn evaluate_as_num(lhs: &Object, rhs: &Object, op: CompareOp) -> bool {
    to_generic_number(lhs).compare(&to_generic_number(rhs), op)
}

/// Numeric coercion used by numeric comparisons.
pub fn to_generic_number(object: &Object) -> GenericNumber {
    if let Some(number) = object.extract_generic_number() {
        return number;
    }
    if let Some(s) = object.extract_string() {
        return GenericNumber::parse(&s).unwrap_or(GenericNumber::NaN);
    }
    if object.extract_null() {
        return GenericNumber::Integer(0);
    }
    if let Some(ut) = object.extract_datetime() {
        return GenericNumber::Integer(ut.to_usec());
    }
    GenericNumber::NaN
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Typed views of objects.
//!
//! Every extractor accepts the native variant and a message value whose
//! declared wire type matches. Nothing else is coerced.

use std::sync::Arc;

use crate::number::GenericNumber;
use crate::object::{Object, Scalar, UnixTime};

impl Object {
    pub fn extract_string(&self) -> Option<Arc<str>> {
        match self.scalar()? {
            Scalar::String(s) => Some(s),
            Scalar::MessageValue(mv) => mv.get_string().map(Arc::from),
            _ => None,
        }
    }

    pub fn extract_bytes(&self) -> Option<Arc<[u8]>> {
        match self.scalar()? {
            Scalar::Bytes(b) => Some(b),
            Scalar::MessageValue(mv) => mv.get_bytes().map(Arc::from),
            _ => None,
        }
    }

    pub fn extract_protobuf(&self) -> Option<Arc<[u8]>> {
        match self.scalar()? {
            Scalar::Protobuf(b) => Some(b),
            Scalar::MessageValue(mv) => mv.get_protobuf().map(Arc::from),
            _ => None,
        }
    }

    pub fn extract_integer(&self) -> Option<i64> {
        match self.scalar()? {
            Scalar::Integer(i) => Some(i),
            Scalar::MessageValue(mv) => mv.get_integer(),
            _ => None,
        }
    }

    pub fn extract_double(&self) -> Option<f64> {
        match self.scalar()? {
            Scalar::Double(d) => Some(d),
            Scalar::MessageValue(mv) => mv.get_double(),
            _ => None,
        }
    }

    pub fn extract_boolean(&self) -> Option<bool> {
        match self.scalar()? {
            Scalar::Boolean(b) => Some(b),
            Scalar::MessageValue(mv) => mv.get_boolean(),
            _ => None,
        }
    }

    pub fn extract_datetime(&self) -> Option<UnixTime> {
        match self.scalar()? {
            Scalar::DateTime(ut) => Some(ut),
            Scalar::MessageValue(mv) => mv.get_datetime(),
            _ => None,
        }
    }

    pub fn extract_null(&self) -> bool {
        match self.scalar() {
            Some(Scalar::Null) => true,
            Some(Scalar::MessageValue(mv)) => mv.is_null(),
            _ => false,
        }
    }

    /// Integers, doubles and booleans, native or message-backed.
    pub fn extract_generic_number(&self) -> Option<GenericNumber> {
        match self.scalar()? {
            Scalar::Integer(i) => Some(GenericNumber::from(i)),
            Scalar::Double(d) => Some(GenericNumber::from(d)),
            Scalar::Boolean(b) => Some(GenericNumber::from(b)),
            Scalar::MessageValue(mv) => mv.generic_number(),
            _ => None,
        }
    }
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::number::GenericNumber;
use crate::object::datetime::UnixTime;
use crate::object::{Object, Scalar};

/// Declared type of a value stored in a log record field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireType {
    String,
    Bytes,
    Protobuf,
    Boolean,
    Integer,
    Double,
    DateTime,
    Null,
    Json,
    List,
}

impl WireType {
    pub fn name(&self) -> &'static str {
        match self {
            WireType::String => "string",
            WireType::Bytes => "bytes",
            WireType::Protobuf => "protobuf",
            WireType::Boolean => "boolean",
            WireType::Integer => "integer",
            WireType::Double => "double",
            WireType::DateTime => "datetime",
            WireType::Null => "null",
            WireType::Json => "json",
            WireType::List => "list",
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A raw field value whose interpretation is deferred until it is needed.
#[derive(Clone, PartialEq)]
pub struct MessageValue {
    repr: Arc<[u8]>,
    wire_type: WireType,
}

impl MessageValue {
    pub fn new(repr: impl Into<Arc<[u8]>>, wire_type: WireType) -> Self {
        MessageValue {
            repr: repr.into(),
            wire_type,
        }
    }

    pub fn repr_bytes(&self) -> &[u8] {
        &self.repr
    }

    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    fn text(&self) -> Option<&str> {
        core::str::from_utf8(&self.repr).ok()
    }

    pub fn get_string(&self) -> Option<&str> {
        match self.wire_type {
            WireType::String => self.text(),
            _ => None,
        }
    }

    pub fn get_bytes(&self) -> Option<&[u8]> {
        match self.wire_type {
            WireType::Bytes => Some(&self.repr),
            _ => None,
        }
    }

    pub fn get_protobuf(&self) -> Option<&[u8]> {
        match self.wire_type {
            WireType::Protobuf => Some(&self.repr),
            _ => None,
        }
    }

    pub fn get_boolean(&self) -> Option<bool> {
        match self.wire_type {
            WireType::Boolean => parse_boolean(self.text()?),
            _ => None,
        }
    }

    pub fn get_integer(&self) -> Option<i64> {
        match self.wire_type {
            WireType::Integer => self.text()?.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn get_double(&self) -> Option<f64> {
        match self.wire_type {
            WireType::Double => self.text()?.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn get_datetime(&self) -> Option<UnixTime> {
        match self.wire_type {
            WireType::DateTime => UnixTime::parse_marshalled(self.text()?),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        self.wire_type == WireType::Null
    }

    pub fn generic_number(&self) -> Option<GenericNumber> {
        match self.wire_type {
            WireType::Integer => self.get_integer().map(GenericNumber::from),
            WireType::Double => self.get_double().map(GenericNumber::from),
            WireType::Boolean => self.get_boolean().map(GenericNumber::from),
            _ => None,
        }
    }

    pub fn truthy(&self) -> bool {
        match self.wire_type {
            WireType::Boolean => self.get_boolean().unwrap_or(false),
            WireType::Integer => self.get_integer().is_some_and(|i| i != 0),
            WireType::Double => self.get_double().is_some_and(|d| d != 0.0),
            WireType::String | WireType::Bytes | WireType::Protobuf => !self.repr.is_empty(),
            WireType::Json | WireType::List | WireType::DateTime => true,
            WireType::Null => false,
        }
    }

    /// Decode into a typed object. `None` if the payload does not match its
    /// declared wire type.
    pub fn unmarshal(&self) -> Option<Object> {
        let scalar = match self.wire_type {
            WireType::String => Scalar::String(Arc::from(String::from_utf8_lossy(&self.repr))),
            WireType::Bytes => Scalar::Bytes(self.repr.clone()),
            WireType::Protobuf => Scalar::Protobuf(self.repr.clone()),
            WireType::Boolean => Scalar::Boolean(self.get_boolean()?),
            WireType::Integer => Scalar::Integer(self.get_integer()?),
            WireType::Double => Scalar::Double(self.get_double()?),
            WireType::DateTime => Scalar::DateTime(self.get_datetime()?),
            WireType::Null => Scalar::Null,
            WireType::Json => {
                let json: serde_json::Value = serde_json::from_slice(&self.repr).ok()?;
                return Some(Object::from_json(&json));
            }
            WireType::List => return Some(parse_list(self.text()?)),
        };
        Some(Object::Scalar(scalar))
    }

    /// Human readable form: the raw text, or the canonical rendering of the
    /// decoded value for typed payloads.
    pub fn repr(&self) -> String {
        match self.wire_type {
            WireType::Boolean | WireType::Integer | WireType::Double | WireType::DateTime => {
                match self.unmarshal() {
                    Some(object) => object.repr(),
                    None => String::from_utf8_lossy(&self.repr).into_owned(),
                }
            }
            WireType::List => match self.unmarshal() {
                Some(object) => object.to_json().to_string(),
                None => String::from_utf8_lossy(&self.repr).into_owned(),
            },
            WireType::Null => "null".to_string(),
            _ => String::from_utf8_lossy(&self.repr).into_owned(),
        }
    }

    pub fn str(&self) -> String {
        match self.get_datetime() {
            Some(ut) => ut.format_seconds(),
            None => self.repr(),
        }
    }
}

impl fmt::Debug for MessageValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MessageValue({:?}, {})",
            String::from_utf8_lossy(&self.repr),
            self.wire_type
        )
    }
}

pub(crate) fn parse_boolean(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Comma separated list with optional double quoting, as produced by
/// list-typed record fields: `a,"b,c",d`.
fn parse_list(s: &str) -> Object {
    let list = Object::new_list();
    if s.is_empty() {
        return list;
    }

    let mut item = String::new();
    let mut quoted = false;
    let mut escaped = false;
    for c in s.chars() {
        match c {
            _ if escaped => {
                item.push(c);
                escaped = false;
            }
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ',' if !quoted => {
                list.push(Object::from(core::mem::take(&mut item).as_str()));
            }
            _ => item.push(c),
        }
    }
    list.push(Object::from(item.as_str()));
    list
}

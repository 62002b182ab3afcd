// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use filterx::{Object, UnixTime, WireType};
use serde::{Deserialize, Serialize};

/// A value as written in a yaml test case.
///
/// Plain yaml values map to objects through json; message values and
/// datetimes need their own shapes.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum Operand {
    Message {
        message: String,
        wire_type: WireType,
    },
    DateTime {
        datetime_usec: i64,
    },
    Bytes {
        bytes: String,
    },
    Plain(serde_json::Value),
}

impl Operand {
    pub fn to_object(&self) -> Object {
        match self {
            Operand::Message { message, wire_type } => {
                Object::message_value(message.as_bytes(), *wire_type)
            }
            Operand::DateTime { datetime_usec } => {
                Object::datetime(UnixTime::from_usec(*datetime_usec))
            }
            Operand::Bytes { bytes } => Object::bytes(bytes.as_bytes()),
            Operand::Plain(json) => Object::from_json(json),
        }
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

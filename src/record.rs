// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::object::{UnixTime, WireType};

/// Named timestamp slots of a log record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampSlot {
    /// When the event happened, as claimed by the sender.
    Stamp,
    /// When the event was received.
    Recvd,
}

impl TimestampSlot {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "stamp" => Some(TimestampSlot::Stamp),
            "recvd" => Some(TimestampSlot::Recvd),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TimestampSlot::Stamp => "stamp",
            TimestampSlot::Recvd => "recvd",
        }
    }
}

/// The record an evaluation runs against.
pub trait LogRecord {
    fn timestamp(&self, slot: TimestampSlot) -> UnixTime;
    fn set_timestamp(&mut self, slot: TimestampSlot, ut: UnixTime);

    /// Raw payload and declared type of a field.
    fn field(&self, name: &str) -> Option<(&[u8], WireType)>;
    fn set_field(&mut self, name: &str, value: Vec<u8>, wire_type: WireType);
}

/// A self-contained record, used by embedders without their own record type
/// and by tests.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    stamp: Option<UnixTime>,
    recvd: Option<UnixTime>,
    #[serde(default)]
    fields: HashMap<String, (Vec<u8>, WireType)>,
}

impl MemoryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: &str, value: &str, wire_type: WireType) -> Self {
        self.set_field(name, value.as_bytes().to_vec(), wire_type);
        self
    }
}

impl LogRecord for MemoryRecord {
    fn timestamp(&self, slot: TimestampSlot) -> UnixTime {
        let stored = match slot {
            TimestampSlot::Stamp => self.stamp,
            TimestampSlot::Recvd => self.recvd,
        };
        stored.unwrap_or(UnixTime::EPOCH)
    }

    fn set_timestamp(&mut self, slot: TimestampSlot, ut: UnixTime) {
        let stored = Some(ut);
        match slot {
            TimestampSlot::Stamp => self.stamp = stored,
            TimestampSlot::Recvd => self.recvd = stored,
        }
    }

    fn field(&self, name: &str) -> Option<(&[u8], WireType)> {
        self.fields
            .get(name)
            .map(|(value, wire_type)| (value.as_slice(), *wire_type))
    }

    fn set_field(&mut self, name: &str, value: Vec<u8>, wire_type: WireType) {
        self.fields.insert(name.to_string(), (value, wire_type));
    }
}

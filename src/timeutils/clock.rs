// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/*
The current time feeds two heuristics: filling in the fields a parsed
timestamp lacks (most often the year of a BSD syslog header) and guessing
the timezone of a timestamp that was produced close to real time.

Both read the clock through now(). By default that is the system clock in
the local timezone. Embedders replaying old logs and tests install a
process-wide &'static dyn TimeSource with set_time_source(); the override
lives behind a parking_lot::Mutex so the critical section is a single
pointer read.
*/

use chrono::Local;
use parking_lot::{const_mutex, Mutex};

use crate::object::UnixTime;

/// Source of the current time.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> UnixTime;
}

#[derive(Debug)]
struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> UnixTime {
        UnixTime::from_chrono(&Local::now())
    }
}

/// A clock stopped at a given time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedTimeSource(pub UnixTime);

impl TimeSource for FixedTimeSource {
    fn now(&self) -> UnixTime {
        self.0
    }
}

static SYSTEM_TIME_SOURCE: SystemTimeSource = SystemTimeSource;

static TIME_SOURCE_OVERRIDE: Mutex<Option<&'static dyn TimeSource>> = const_mutex(None);

/// Install `source` as the process-wide clock, or restore the system clock
/// with `None`. Returns the previous override.
pub fn set_time_source(
    source: Option<&'static dyn TimeSource>,
) -> Option<&'static dyn TimeSource> {
    core::mem::replace(&mut *TIME_SOURCE_OVERRIDE.lock(), source)
}

/// The current time, with the UTC offset of the clock's timezone.
pub fn now() -> UnixTime {
    let source = {
        let guard = TIME_SOURCE_OVERRIDE.lock();
        *guard
    };
    match source {
        Some(source) => source.now(),
        None => SYSTEM_TIME_SOURCE.now(),
    }
}

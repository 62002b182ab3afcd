// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::HashMap;

use chrono::{
    Duration, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeZone, Utc,
};
use lazy_static::lazy_static;
use parking_lot::RwLock;

use crate::object::UnixTime;
use crate::timeutils::wallclock::parse_offset;

/// A resolved timezone: a fixed UTC offset or, with the `timezones`
/// feature, a zone of the tz database.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
    Fixed(FixedOffset),
    #[cfg(feature = "timezones")]
    Named(chrono_tz::Tz),
}

impl Zone {
    pub fn utc() -> Self {
        Zone::Fixed(Utc.fix())
    }

    /// The UTC offset in effect at `ut`.
    #[cfg_attr(not(feature = "timezones"), allow(unused_variables))]
    pub fn offset_at(&self, ut: &UnixTime) -> Option<i32> {
        match self {
            Zone::Fixed(offset) => Some(offset.local_minus_utc()),
            #[cfg(feature = "timezones")]
            Zone::Named(tz) => {
                let utc = chrono::DateTime::<Utc>::from_timestamp(ut.sec, 0)?;
                let offset = tz.offset_from_utc_datetime(&utc.naive_utc());
                Some(offset.fix().local_minus_utc())
            }
        }
    }

    /// Interpret a wall clock reading in this zone. Ambiguous readings take
    /// the earlier instant; readings in a gap are moved forward an hour.
    pub fn localize(&self, naive: &NaiveDateTime) -> Option<UnixTime> {
        match self {
            Zone::Fixed(offset) => resolve_local(offset, naive),
            #[cfg(feature = "timezones")]
            Zone::Named(tz) => resolve_local(tz, naive),
        }
    }

    /// Keep the instant of `ut`, express it in this zone.
    pub fn convert(&self, ut: &UnixTime) -> Option<UnixTime> {
        let gmtoff = self.offset_at(ut)?;
        Some(UnixTime::new(ut.sec, ut.usec, Some(gmtoff)))
    }
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> Option<UnixTime> {
    match tz.from_local_datetime(naive) {
        LocalResult::Single(dt) => Some(UnixTime::from_chrono(&dt)),
        LocalResult::Ambiguous(earliest, _) => Some(UnixTime::from_chrono(&earliest)),
        LocalResult::None => {
            let shifted = naive.checked_add_signed(Duration::hours(1))?;
            tz.from_local_datetime(&shifted)
                .earliest()
                .map(|dt| UnixTime::from_chrono(&dt))
        }
    }
}

lazy_static! {
    static ref ZONES: RwLock<HashMap<String, Zone>> = RwLock::new(HashMap::new());
}

/// Process-wide cache of timezones resolved by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimezoneCache;

impl TimezoneCache {
    /// Resolve `UTC`/`GMT`/`Z`, a numeric offset such as `+01:00`, or (with
    /// the `timezones` feature) a tz database name such as
    /// `Europe/Budapest`.
    pub fn resolve(name: &str) -> Option<Zone> {
        if let Some(zone) = ZONES.read().get(name) {
            return Some(*zone);
        }

        let zone = Self::lookup(name)?;
        ZONES.write().insert(name.to_string(), zone);
        log::debug!("resolved timezone {name}");
        Some(zone)
    }

    fn lookup(name: &str) -> Option<Zone> {
        match name {
            "UTC" | "GMT" | "Z" | "utc" | "gmt" | "z" => return Some(Zone::utc()),
            _ => {}
        }
        if let Some((gmtoff, "")) = parse_offset(name) {
            return FixedOffset::east_opt(gmtoff).map(Zone::Fixed);
        }

        #[cfg(feature = "timezones")]
        {
            name.parse::<chrono_tz::Tz>().ok().map(Zone::Named)
        }
        #[cfg(not(feature = "timezones"))]
        {
            None
        }
    }

    pub fn clear() {
        ZONES.write().clear();
    }
}

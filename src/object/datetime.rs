// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.
#![allow(clippy::as_conversions, clippy::arithmetic_side_effects)]

use core::fmt::Write;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::object::{Frozen, FrozenObject, Scalar};
use crate::timeutils::wallclock;

pub const USEC_PER_SEC: i64 = 1_000_000;

/// An absolute point in time with an optional UTC offset.
///
/// `gmtoff` is `None` when the offset is unknown, which renders as UTC but
/// is omitted from the marshalled form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnixTime {
    pub sec: i64,
    pub usec: u32,
    pub gmtoff: Option<i32>,
}

impl UnixTime {
    pub const EPOCH: UnixTime = UnixTime {
        sec: 0,
        usec: 0,
        gmtoff: Some(0),
    };

    pub fn new(sec: i64, usec: u32, gmtoff: Option<i32>) -> Self {
        let carry = i64::from(usec) / USEC_PER_SEC;
        UnixTime {
            sec: sec.saturating_add(carry),
            usec: (i64::from(usec) % USEC_PER_SEC) as u32,
            gmtoff,
        }
    }

    /// Epoch microseconds, with a UTC offset of zero.
    pub fn from_usec(usec: i64) -> Self {
        UnixTime {
            sec: usec.div_euclid(USEC_PER_SEC),
            usec: usec.rem_euclid(USEC_PER_SEC) as u32,
            gmtoff: Some(0),
        }
    }

    /// Epoch seconds given as a double.
    pub fn from_seconds(seconds: f64) -> Option<Self> {
        if !seconds.is_finite() {
            return None;
        }
        let usec = (seconds * USEC_PER_SEC as f64).round();
        if usec >= i64::MAX as f64 || usec <= i64::MIN as f64 {
            return None;
        }
        Some(UnixTime::from_usec(usec as i64))
    }

    /// Epoch microseconds, saturated to the i64 range.
    pub fn to_usec(&self) -> i64 {
        self.sec
            .saturating_mul(USEC_PER_SEC)
            .saturating_add(i64::from(self.usec))
    }

    pub fn implied_gmtoff(&self) -> i32 {
        self.gmtoff.unwrap_or(0)
    }

    /// Shift by a signed duration in microseconds, keeping the offset.
    pub fn add_duration(&self, usec: i64) -> Option<Self> {
        let total = i64::from(self.usec).checked_add(usec.rem_euclid(USEC_PER_SEC))?;
        let sec = self
            .sec
            .checked_add(usec.div_euclid(USEC_PER_SEC))?
            .checked_add(total / USEC_PER_SEC)?;
        Some(UnixTime {
            sec,
            usec: (total % USEC_PER_SEC) as u32,
            gmtoff: self.gmtoff,
        })
    }

    pub fn to_chrono(&self) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(self.implied_gmtoff())?;
        let utc = DateTime::<Utc>::from_timestamp(self.sec, self.usec.saturating_mul(1000))?;
        Some(utc.with_timezone(&offset))
    }

    pub fn from_chrono<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        use chrono::Offset;
        let gmtoff = dt.offset().fix().local_minus_utc();
        UnixTime {
            sec: dt.timestamp(),
            usec: dt.timestamp_subsec_micros(),
            gmtoff: Some(gmtoff),
        }
    }

    /// `<sec>.<usec>` without the offset; used by `str()` and JSON.
    pub fn format_seconds(&self) -> String {
        format!("{}.{:06}", self.sec, self.usec)
    }

    /// Wire form: `<sec>.<usec>[+hh:mm]`.
    pub fn marshal(&self) -> String {
        let mut s = self.format_seconds();
        if let Some(gmtoff) = self.gmtoff {
            s.push_str(&format_offset(gmtoff, true));
        }
        s
    }

    /// ISO-8601 with milliseconds: `2023-11-30T14:19:58.123+01:00`.
    pub fn repr(&self) -> String {
        match self.to_chrono() {
            Some(dt) => {
                let mut s = String::new();
                // Writing into a String cannot fail.
                let _ = write!(s, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3f"));
                s.push_str(&format_offset(self.implied_gmtoff(), true));
                s
            }
            None => self.marshal(),
        }
    }

    /// Parse the marshalled form produced by [`UnixTime::marshal`].
    pub fn parse_marshalled(s: &str) -> Option<Self> {
        let s = s.trim();
        let split = s
            .char_indices()
            .skip(1)
            .find(|(_, c)| matches!(c, '+' | '-' | 'Z'))
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        let (number, offset) = s.split_at(split);

        let (sec, frac) = match number.split_once('.') {
            Some((sec, frac)) => (sec, frac),
            None => (number, ""),
        };
        let sec: i64 = sec.parse().ok()?;
        let usec = parse_fraction(frac)?;

        let gmtoff = if offset.is_empty() {
            None
        } else {
            let (gmtoff, rest) = wallclock::parse_offset(offset)?;
            if !rest.is_empty() {
                return None;
            }
            Some(gmtoff)
        };

        // Components are kept as written: "-2.500000" is sec=-2, usec=500000.
        Some(UnixTime::new(sec, usec, gmtoff))
    }
}

/// Parse the ISO-8601 form accepted by the `datetime()` and `isodate()`
/// casts: `%Y-%m-%dT%H:%M:%S%z`, with an optional fraction of a second.
pub fn parse_isodate(s: &str) -> Option<UnixTime> {
    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S.%f%z"];
    FORMATS.iter().find_map(|format| {
        let (wct, rest) = wallclock::strptime(s, format)?;
        if !rest.is_empty() {
            return None;
        }
        wct.to_unix_time(None)
    })
}

fn parse_fraction(frac: &str) -> Option<u32> {
    if frac.is_empty() {
        return Some(0);
    }
    if !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits: String = frac.chars().chain("000000".chars()).take(6).collect();
    digits.parse().ok()
}

/// `+hh:mm` (or `+hhmm` without the colon).
pub fn format_offset(gmtoff: i32, colon: bool) -> String {
    let sign = if gmtoff < 0 { '-' } else { '+' };
    let abs = gmtoff.unsigned_abs();
    let (hours, minutes) = (abs / 3600, (abs % 3600) / 60);
    if colon {
        format!("{sign}{hours:02}:{minutes:02}")
    } else {
        format!("{sign}{hours:02}{minutes:02}")
    }
}

lazy_static! {
    static ref EPOCH_ZERO: RwLock<Option<FrozenObject>> = RwLock::new(None);
}

pub(crate) fn init_epoch_cache() {
    let mut cached = EPOCH_ZERO.write();
    if cached.is_none() {
        *cached = Some(FrozenObject::new(Frozen::Scalar(Scalar::DateTime(
            UnixTime::EPOCH,
        ))));
    }
}

pub(crate) fn deinit_epoch_cache() {
    EPOCH_ZERO.write().take();
}

/// The process-wide epoch-zero datetime, if the cache is initialized.
pub fn cached_epoch() -> Option<FrozenObject> {
    EPOCH_ZERO.read().clone()
}

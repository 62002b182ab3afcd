// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.
#![allow(clippy::as_conversions, clippy::arithmetic_side_effects)]

//! Broken-down time, as parsed from and formatted to text.
//!
//! Unlike a full calendar date, a [`WallClockTime`] may lack any of year,
//! month and day: log formats routinely omit the year (or the whole date)
//! and rely on the receiver to fill it in from the current time.

use core::fmt::Write;

use chrono::format::{self, Fixed, Item, Parsed, StrftimeItems};
use chrono::{Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::object::UnixTime;
use crate::timeutils::zone::{TimezoneCache, Zone};

/// Broken-down time. `month` and `day` are 1-based.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WallClockTime {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    /// Day of the year (1-based), used when month and day are absent.
    pub yday: Option<u32>,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub usec: u32,
    /// Seconds east of UTC, from `%z`.
    pub gmtoff: Option<i32>,
    /// Zone name, from `%Z`.
    pub zone: Option<String>,
    /// Epoch seconds, from `%s`. Overrides the calendar fields.
    pub epoch: Option<i64>,
}

impl WallClockTime {
    /// All fields of `ut` as read on a clock at its UTC offset.
    pub fn from_unix_time(ut: &UnixTime) -> Option<Self> {
        let dt = ut.to_chrono()?;
        Some(WallClockTime {
            year: Some(dt.year()),
            month: Some(dt.month()),
            day: Some(dt.day()),
            yday: Some(dt.ordinal()),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
            usec: ut.usec,
            gmtoff: Some(ut.implied_gmtoff()),
            zone: None,
            epoch: None,
        })
    }

    /// Fill in the date fields the parsed text did not carry, relative to
    /// the current date `now`.
    ///
    /// * no date at all: today,
    /// * a month and day without a year: the year that puts the date
    ///   closest to `now` (December read in January belongs to last year),
    /// * otherwise missing fields default to the current year, January and
    ///   the first of the month.
    pub fn guess_missing_fields(&mut self, now: &WallClockTime) {
        if self.epoch.is_some() {
            return;
        }
        let now_year = now.year.unwrap_or(1970);

        let dateless = self.year.is_none()
            && self.month.is_none()
            && self.day.is_none()
            && self.yday.is_none();
        if dateless {
            self.year = Some(now_year);
            self.month = now.month;
            self.day = now.day;
            return;
        }

        if self.year.is_none() {
            self.year = Some(match (self.month, now.month) {
                (Some(month), Some(now_month)) => {
                    determine_year_for_month(month, now_year, now_month)
                }
                _ => now_year,
            });
        }
        if self.yday.is_none() {
            self.month.get_or_insert(1);
            self.day.get_or_insert(1);
        }
    }

    /// The instant this reading denotes. The offset comes from `%s`/`%z`,
    /// then a `%Z` zone name, then `zone`, then UTC. Date fields must be
    /// present; see [`WallClockTime::guess_missing_fields`].
    pub fn to_unix_time(&self, zone: Option<&Zone>) -> Option<UnixTime> {
        let named = self.zone.as_deref().and_then(TimezoneCache::resolve);
        let zone = named.as_ref().or(zone);

        if let Some(epoch) = self.epoch {
            let ut = UnixTime::new(epoch, self.usec, Some(0));
            let gmtoff = match (self.gmtoff, zone) {
                (Some(gmtoff), _) => gmtoff,
                (None, Some(zone)) => zone.offset_at(&ut)?,
                (None, None) => 0,
            };
            return Some(UnixTime::new(epoch, self.usec, Some(gmtoff)));
        }

        let naive = self.naive()?;
        match (self.gmtoff, zone) {
            (Some(gmtoff), _) => {
                let offset = FixedOffset::east_opt(gmtoff)?;
                Zone::Fixed(offset).localize(&naive)
            }
            (None, Some(zone)) => zone.localize(&naive),
            (None, None) => Zone::utc().localize(&naive),
        }
    }

    fn naive(&self) -> Option<NaiveDateTime> {
        let year = self.year?;
        let date = match (self.month, self.day, self.yday) {
            (Some(month), day, _) => NaiveDate::from_ymd_opt(year, month, day.unwrap_or(1))?,
            (None, _, Some(yday)) => NaiveDate::from_yo_opt(year, yday)?,
            (None, _, None) => return None,
        };
        // Leap seconds are folded into the last second of the minute.
        let second = self.second.min(59);
        let time = NaiveTime::from_hms_micro_opt(self.hour, self.minute, second, self.usec)?;
        Some(NaiveDateTime::new(date, time))
    }
}

/// The year a `month` without a year most likely belongs to, given the
/// current year and month: readings from the turn of the year are assumed
/// to be at most a month in the past or the future.
pub fn determine_year_for_month(month: u32, now_year: i32, now_month: u32) -> i32 {
    match (month, now_month) {
        (12, 1) => now_year - 1,
        (1, 12) => now_year + 1,
        _ => now_year,
    }
}

/// Rewrite a strptime format into chrono's dialect: `%z` also accepts `Z`
/// and a missing minute part, and `.%f` reads a fraction of a second
/// rather than a count of nanoseconds.
fn chrono_format(format: &str) -> String {
    let mut out = String::with_capacity(format.len() + 4);
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('z') => out.push_str("%#z"),
            Some('f') if out.ends_with('.') => {
                out.pop();
                out.push_str("%.f");
            }
            Some(next) => {
                out.push('%');
                out.push(next);
            }
            None => out.push('%'),
        }
    }
    out
}

/// Split a zone name such as `CET` or `Europe/Budapest` off the start of
/// `s`. chrono skips `%Z` when parsing, so the name is read here.
fn split_zone_name(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    let len = s
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'/' | b'_' | b'+' | b'-'))
        .count();
    if len == 0 {
        return None;
    }
    Some(s.split_at(len))
}

impl WallClockTime {
    fn from_parsed(parsed: &Parsed, zone: Option<String>) -> Self {
        let year = match (parsed.year, parsed.year_div_100, parsed.year_mod_100) {
            (Some(year), _, _) => Some(year),
            (None, Some(century), yy) => Some(century * 100 + yy.unwrap_or(0)),
            (None, None, Some(yy)) if yy < 69 => Some(2000 + yy),
            (None, None, Some(yy)) => Some(1900 + yy),
            (None, None, None) => None,
        };
        let hour = parsed.hour_div_12.unwrap_or(0) * 12 + parsed.hour_mod_12.unwrap_or(0);
        WallClockTime {
            year,
            month: parsed.month,
            day: parsed.day,
            yday: parsed.ordinal,
            hour,
            minute: parsed.minute.unwrap_or(0),
            second: parsed.second.unwrap_or(0),
            usec: parsed.nanosecond.unwrap_or(0) / 1000,
            gmtoff: parsed.offset,
            zone,
            epoch: parsed.timestamp,
        }
    }
}

/// Parse `input` according to the strptime-style `format`.
///
/// Returns the parsed fields and the part of `input` the format did not
/// consume. Whitespace in the format matches any amount of whitespace,
/// including none. Fields absent from the format stay unset.
pub fn strptime<'a>(input: &'a str, format: &str) -> Option<(WallClockTime, &'a str)> {
    let format = chrono_format(format);
    let items: Vec<Item<'_>> = StrftimeItems::new(&format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return None;
    }

    let mut parsed = Parsed::new();
    let mut zone = None;
    let mut segments = items.split(|item| matches!(item, Item::Fixed(Fixed::TimezoneName)));
    let mut rest = match segments.next() {
        Some(segment) => format::parse_and_remainder(&mut parsed, input, segment.iter()).ok()?,
        None => input,
    };
    for segment in segments {
        let (name, after) = split_zone_name(rest)?;
        zone = Some(name.to_string());
        rest = format::parse_and_remainder(&mut parsed, after, segment.iter()).ok()?;
    }

    Some((WallClockTime::from_parsed(&parsed, zone), rest))
}

/// Format `ut` at its own UTC offset. `None` for a format chrono cannot
/// render.
pub fn strftime(format: &str, ut: &UnixTime) -> Option<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return None;
    }
    let dt = ut.to_chrono()?;
    let mut out = String::new();
    write!(out, "{}", dt.format_with_items(items.into_iter())).ok()?;
    Some(out)
}

/// Parse a UTC offset at the start of `s`: `Z`, `+hh:mm`, `+hhmm` or
/// `+hh`. Returns the offset in seconds and the rest of `s`.
pub fn parse_offset(s: &str) -> Option<(i32, &str)> {
    let mut parsed = Parsed::new();
    let rest = format::parse_and_remainder(&mut parsed, s, StrftimeItems::new("%#z")).ok()?;
    let gmtoff = parsed.offset?;
    if gmtoff.unsigned_abs() >= 24 * 3600 {
        return None;
    }
    Some((gmtoff, rest))
}

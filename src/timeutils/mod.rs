// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Calendar helpers shared by the datetime object and the time functions.

pub mod clock;
pub mod wallclock;
pub mod zone;

pub use clock::{now, set_time_source, FixedTimeSource, TimeSource};
pub use wallclock::{parse_offset, strftime, strptime, WallClockTime};
pub use zone::{TimezoneCache, Zone};

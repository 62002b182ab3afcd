// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::{bail, Result};

use crate::builtins::utils::{ensure_args_count, ensure_datetime, ensure_string};
use crate::builtins::{FunctionCtor, FunctionRegistry, SimpleFunction};
use crate::error::FunctionError;
use crate::eval::{EvalContext, EvalResult};
use crate::expr::{optimize_slot, Expr, FunctionArgs};
use crate::object::{Object, UnixTime};
use crate::timeutils::wallclock::{self, WallClockTime};
use crate::timeutils::{clock, TimezoneCache, Zone};

/// Longest `strftime()` result; anything longer yields null.
const STRFTIME_MAX: usize = 256;

const QUARTER_HOUR: i64 = 15 * 60;
const MIN_GMTOFF: i64 = -12 * 3600;
const MAX_GMTOFF: i64 = 14 * 3600;

pub fn register(m: &mut FunctionRegistry<SimpleFunction>) {
    m.register("fix_timezone", fix_timezone);
    m.register("set_timezone", set_timezone);
    m.register("guess_timezone", guess_timezone);
}

pub fn register_ctors(m: &mut FunctionRegistry<FunctionCtor>) {
    m.register("strptime", strptime);
    m.register("strftime", strftime);
}

fn resolve_zone(fcn: &str, v: &Object) -> Result<Zone> {
    let name = ensure_string(fcn, v)?;
    match TimezoneCache::resolve(&name) {
        Some(zone) => Ok(zone),
        None => bail!("`{fcn}`: unknown timezone `{name}`"),
    }
}

/// Keep the wall clock reading of `datetime`, reinterpret it in `tz`.
fn fix_timezone(args: &[Object]) -> Result<Object> {
    ensure_args_count("fix_timezone", args, 2)?;
    let ut = ensure_datetime("fix_timezone", &args[0])?;
    let zone = resolve_zone("fix_timezone", &args[1])?;

    let Some(mut wct) = WallClockTime::from_unix_time(&ut) else {
        bail!("`fix_timezone`: datetime out of range")
    };
    wct.gmtoff = None;
    match wct.to_unix_time(Some(&zone)) {
        Some(fixed) => Ok(Object::datetime(fixed)),
        None => bail!("`fix_timezone`: cannot represent the datetime in the timezone"),
    }
}

/// Keep the instant of `datetime`, express it in `tz`.
fn set_timezone(args: &[Object]) -> Result<Object> {
    ensure_args_count("set_timezone", args, 2)?;
    let ut = ensure_datetime("set_timezone", &args[0])?;
    let zone = resolve_zone("set_timezone", &args[1])?;
    match zone.convert(&ut) {
        Some(converted) => Ok(Object::datetime(converted)),
        None => bail!("`set_timezone`: datetime out of range"),
    }
}

fn guess_timezone(args: &[Object]) -> Result<Object> {
    ensure_args_count("guess_timezone", args, 1)?;
    let ut = ensure_datetime("guess_timezone", &args[0])?;
    Ok(Object::datetime(guess_timezone_at(&ut, &clock::now())))
}

/// Assume the wall clock reading of `ut` was taken at about `now` and
/// derive its UTC offset from the difference, rounded to a quarter hour.
/// Differences beyond any real timezone leave `ut` unchanged.
pub fn guess_timezone_at(ut: &UnixTime, now: &UnixTime) -> UnixTime {
    let wall = ut.sec.saturating_add(i64::from(ut.implied_gmtoff()));
    let diff = wall.saturating_sub(now.sec);
    let rounded =
        diff.saturating_add(diff.signum() * (QUARTER_HOUR / 2)) / QUARTER_HOUR * QUARTER_HOUR;
    if !(MIN_GMTOFF..=MAX_GMTOFF).contains(&rounded) {
        return *ut;
    }
    match i32::try_from(rounded) {
        Ok(gmtoff) => UnixTime::new(wall - rounded, ut.usec, Some(gmtoff)),
        Err(_) => *ut,
    }
}

/// `strptime(time_str, format, ...)`: the first format that consumes the
/// whole string wins; null if none does.
#[derive(Debug)]
struct Strptime {
    time_str: Box<dyn Expr>,
    formats: Vec<String>,
}

fn strptime(mut args: FunctionArgs) -> Result<Box<dyn Expr>, FunctionError> {
    if args.len() < 2 {
        return Err(args.ctor_fail("expects at least 2 arguments: time_str and a format"));
    }
    let mut formats = Vec::with_capacity(args.len() - 1);
    for i in 1..args.len() {
        match args.get_literal_string(i) {
            Some(format) => formats.push(format),
            None => {
                return Err(args.ctor_fail(format!("format argument {i} must be a string literal")))
            }
        }
    }
    let Some(time_str) = args.get_expr(0) else {
        return Err(args.ctor_fail("missing time_str argument"));
    };
    args.check()?;
    Ok(Box::new(Strptime { time_str, formats }))
}

impl Strptime {
    fn parse(&self, input: &str, zone: Option<&Zone>) -> Option<UnixTime> {
        let now = clock::now();
        let now = zone.and_then(|zone| zone.convert(&now)).unwrap_or(now);
        let now = WallClockTime::from_unix_time(&now)?;

        self.formats.iter().find_map(|format| {
            let (mut wct, rest) = wallclock::strptime(input, format)?;
            if !rest.is_empty() {
                return None;
            }
            wct.guess_missing_fields(&now);
            wct.to_unix_time(zone)
        })
    }
}

impl Expr for Strptime {
    fn name(&self) -> &str {
        "strptime"
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        let value = self
            .time_str
            .eval(ctx)
            .map_err(|_| ctx.push_error("Failed to evaluate time_str", self))?;
        let Some(input) = value.extract_string() else {
            return Err(ctx.push_error_object("time_str must be a string", self, &value));
        };

        let zone = match ctx.options().default_timezone.as_deref() {
            Some(name) => match TimezoneCache::resolve(name) {
                Some(zone) => Some(zone),
                None => {
                    let name = name.to_string();
                    return Err(ctx.push_error_info("unknown default timezone", self, name));
                }
            },
            None => None,
        };

        match self.parse(&input, zone.as_ref()) {
            Some(ut) => Ok(Object::datetime(ut)),
            None => Ok(Object::null()),
        }
    }

    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        optimize_slot(&mut self.time_str);
        None
    }

    fn init(&mut self) -> Result<(), FunctionError> {
        self.time_str.init()
    }

    fn deinit(&mut self) {
        self.time_str.deinit();
    }
}

/// `strftime(format, datetime)`.
#[derive(Debug)]
struct Strftime {
    format: String,
    datetime: Box<dyn Expr>,
}

fn strftime(mut args: FunctionArgs) -> Result<Box<dyn Expr>, FunctionError> {
    if args.len() != 2 {
        return Err(args.ctor_fail("expects 2 arguments: format and datetime"));
    }
    let Some(format) = args.get_literal_string(0) else {
        return Err(args.ctor_fail("format must be a string literal"));
    };
    if wallclock::strftime(&format, &UnixTime::EPOCH).is_none() {
        return Err(args.ctor_fail(format!("invalid format \"{format}\"")));
    }
    let Some(datetime) = args.get_expr(1) else {
        return Err(args.ctor_fail("missing datetime argument"));
    };
    args.check()?;
    Ok(Box::new(Strftime { format, datetime }))
}

impl Expr for Strftime {
    fn name(&self) -> &str {
        "strftime"
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        let value = self
            .datetime
            .eval(ctx)
            .map_err(|_| ctx.push_error("Failed to evaluate datetime", self))?;
        let Some(ut) = value.extract_datetime() else {
            return Err(ctx.push_error_object("argument must be a datetime", self, &value));
        };

        match wallclock::strftime(&self.format, &ut) {
            Some(s) if !s.is_empty() && s.len() < STRFTIME_MAX => Ok(Object::from(s)),
            _ => Ok(Object::null()),
        }
    }

    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        optimize_slot(&mut self.datetime);
        None
    }

    fn init(&mut self) -> Result<(), FunctionError> {
        self.datetime.init()
    }

    fn deinit(&mut self) {
        self.datetime.deinit();
    }
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.
#![allow(clippy::as_conversions)]

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::builtins::utils::{ensure_args_count, ensure_string};
use crate::builtins::{FunctionRegistry, SimpleFunction};
use crate::number::GenericNumber;
use crate::object::datetime::{parse_isodate, USEC_PER_SEC};
use crate::object::{Object, ObjectType, Scalar, UnixTime};

pub fn register(m: &mut FunctionRegistry<SimpleFunction>) {
    m.register("string", string);
    m.register("bytes", bytes);
    m.register("protobuf", protobuf);
    m.register("bool", boolean);
    m.register("int", integer);
    m.register("double", double);
    m.register("datetime", datetime);
    m.register("isodate", isodate);
    m.register("istype", istype);
}

fn unsupported(fcn: &str, v: &Object) -> anyhow::Error {
    anyhow::anyhow!("`{fcn}` cannot cast `{}` ({})", v.repr(), v.type_of())
}

fn string(args: &[Object]) -> Result<Object> {
    ensure_args_count("string", args, 1)?;
    let v = args[0].typed();
    if v.is_type(ObjectType::String) {
        return Ok(v);
    }
    Ok(Object::from(v.str()))
}

fn bytes(args: &[Object]) -> Result<Object> {
    ensure_args_count("bytes", args, 1)?;
    let v = args[0].typed();
    match v.scalar() {
        Some(Scalar::Bytes(_)) => Ok(v),
        Some(Scalar::Protobuf(b)) => Ok(Object::bytes(b)),
        Some(Scalar::String(s)) => Ok(Object::bytes(s.as_bytes())),
        _ => Err(unsupported("bytes", &v)),
    }
}

fn protobuf(args: &[Object]) -> Result<Object> {
    ensure_args_count("protobuf", args, 1)?;
    let v = args[0].typed();
    match v.scalar() {
        Some(Scalar::Protobuf(_)) => Ok(v),
        Some(Scalar::Bytes(b)) => Ok(Object::protobuf(b)),
        _ => Err(unsupported("protobuf", &v)),
    }
}

fn boolean(args: &[Object]) -> Result<Object> {
    ensure_args_count("bool", args, 1)?;
    Ok(Object::from(args[0].typed().truthy()))
}

fn integer(args: &[Object]) -> Result<Object> {
    ensure_args_count("int", args, 1)?;
    let v = args[0].typed();
    let result = match v.scalar() {
        Some(Scalar::Integer(_)) => return Ok(v),
        Some(Scalar::Boolean(b)) => Some(i64::from(b)),
        Some(Scalar::Double(d)) => truncate(d),
        Some(Scalar::String(s)) => match GenericNumber::parse(s.trim()) {
            Some(GenericNumber::Integer(i)) => Some(i),
            Some(GenericNumber::Double(d)) => truncate(d),
            _ => None,
        },
        Some(Scalar::DateTime(ut)) => Some(ut.to_usec()),
        _ => None,
    };
    match result {
        Some(i) => Ok(Object::from(i)),
        None => Err(unsupported("int", &v)),
    }
}

fn truncate(d: f64) -> Option<i64> {
    if d.is_finite() && d >= i64::MIN as f64 && d < i64::MAX as f64 {
        Some(d.trunc() as i64)
    } else {
        None
    }
}

fn double(args: &[Object]) -> Result<Object> {
    ensure_args_count("double", args, 1)?;
    let v = args[0].typed();
    let result = match v.scalar() {
        Some(Scalar::Double(_)) => return Ok(v),
        Some(Scalar::Integer(i)) => Some(i as f64),
        Some(Scalar::Boolean(b)) => Some(if b { 1.0 } else { 0.0 }),
        Some(Scalar::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Scalar::DateTime(ut)) => {
            Some(ut.sec as f64 + f64::from(ut.usec) / USEC_PER_SEC as f64)
        }
        _ => None,
    };
    match result {
        Some(d) => Ok(Object::from(d)),
        None => Err(unsupported("double", &v)),
    }
}

fn datetime(args: &[Object]) -> Result<Object> {
    ensure_args_count("datetime", args, 1)?;
    let v = args[0].typed();
    let result = match v.scalar() {
        Some(Scalar::DateTime(_)) => return Ok(v),
        Some(Scalar::Integer(usec)) => Some(UnixTime::from_usec(usec)),
        Some(Scalar::Double(seconds)) => UnixTime::from_seconds(seconds),
        // The ISO form `repr()` writes, or the `<sec>.<usec>[+hh:mm]` wire form.
        Some(Scalar::String(s)) => parse_isodate(&s).or_else(|| UnixTime::parse_marshalled(&s)),
        _ => None,
    };
    match result {
        Some(ut) => Ok(Object::datetime(ut)),
        None => Err(unsupported("datetime", &v)),
    }
}

fn isodate(args: &[Object]) -> Result<Object> {
    ensure_args_count("isodate", args, 1)?;
    let s = ensure_string("isodate", &args[0])?;
    match parse_isodate(&s) {
        Some(ut) => Ok(Object::datetime(ut)),
        None => bail!("`isodate` cannot parse `{s}` as an ISO-8601 timestamp"),
    }
}

fn istype(args: &[Object]) -> Result<Object> {
    ensure_args_count("istype", args, 2)?;
    let name: Arc<str> = ensure_string("istype", &args[1])?;
    let Some(t) = ObjectType::from_name(&name) else {
        bail!("`istype` got unknown type name `{name}`")
    };
    Ok(Object::from(args[0].typed().is_type(t)))
}

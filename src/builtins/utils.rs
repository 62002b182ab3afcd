// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::error::FunctionError;
use crate::expr::FunctionArgs;
use crate::object::{Object, UnixTime};

pub fn ensure_args_count(fcn: &str, args: &[Object], expected: usize) -> Result<()> {
    if args.len() != expected {
        if expected == 1 {
            bail!("`{fcn}` expects 1 argument")
        } else {
            bail!("`{fcn}` expects {expected} arguments")
        }
    }
    Ok(())
}

pub fn ensure_string(fcn: &str, v: &Object) -> Result<Arc<str>> {
    match v.extract_string() {
        Some(s) => Ok(s),
        None => bail!(
            "`{fcn}` expects string argument. Got `{}` instead",
            v.type_of()
        ),
    }
}

pub fn ensure_datetime(fcn: &str, v: &Object) -> Result<UnixTime> {
    match v.extract_datetime() {
        Some(ut) => Ok(ut),
        None => bail!(
            "`{fcn}` expects datetime argument. Got `{}` instead",
            v.type_of()
        ),
    }
}

/// Constructor-side counterpart of [`ensure_args_count`].
pub fn ensure_ctor_args_count(args: &FunctionArgs, expected: usize) -> Result<(), FunctionError> {
    if args.len() != expected {
        return Err(args.ctor_fail(format!(
            "expects {expected} positional argument{}",
            if expected == 1 { "" } else { "s" }
        )));
    }
    Ok(())
}

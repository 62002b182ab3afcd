// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::builtins::utils::ensure_ctor_args_count;
use crate::builtins::{FunctionCtor, FunctionRegistry};
use crate::error::FunctionError;
use crate::eval::{EvalContext, EvalResult};
use crate::expr::{optimize_slot, Expr, FunctionArgs};
use crate::object::Object;
use crate::record::TimestampSlot;

pub fn register(m: &mut FunctionRegistry<FunctionCtor>) {
    m.register("get_timestamp", get_timestamp);
    m.register("set_timestamp", set_timestamp);
}

/// The `stamp=` argument: `"stamp"` unless given.
fn timestamp_slot(args: &mut FunctionArgs) -> Result<TimestampSlot, FunctionError> {
    match args.get_named_literal_string("stamp")? {
        None => Ok(TimestampSlot::Stamp),
        Some(name) => TimestampSlot::from_name(&name).ok_or_else(|| {
            args.ctor_fail(format!(
                "stamp must be one of \"stamp\" or \"recvd\", got \"{name}\""
            ))
        }),
    }
}

#[derive(Debug)]
struct GetTimestamp {
    slot: TimestampSlot,
}

fn get_timestamp(mut args: FunctionArgs) -> Result<Box<dyn Expr>, FunctionError> {
    ensure_ctor_args_count(&args, 0)?;
    let slot = timestamp_slot(&mut args)?;
    args.check()?;
    Ok(Box::new(GetTimestamp { slot }))
}

impl Expr for GetTimestamp {
    fn name(&self) -> &str {
        "get_timestamp"
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        match ctx.record() {
            Some(record) => Ok(Object::datetime(record.timestamp(self.slot))),
            None => Err(ctx.push_error("no log record to read from", self)),
        }
    }
}

#[derive(Debug)]
struct SetTimestamp {
    datetime: Box<dyn Expr>,
    slot: TimestampSlot,
}

fn set_timestamp(mut args: FunctionArgs) -> Result<Box<dyn Expr>, FunctionError> {
    ensure_ctor_args_count(&args, 1)?;
    let slot = timestamp_slot(&mut args)?;
    let Some(datetime) = args.get_expr(0) else {
        return Err(args.ctor_fail("missing datetime argument"));
    };
    args.check()?;
    Ok(Box::new(SetTimestamp { datetime, slot }))
}

impl Expr for SetTimestamp {
    fn name(&self) -> &str {
        "set_timestamp"
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        let value = self
            .datetime
            .eval(ctx)
            .map_err(|_| ctx.push_error("Failed to evaluate datetime", self))?;
        let Some(ut) = value.extract_datetime() else {
            return Err(ctx.push_error_object("argument must be a datetime", self, &value));
        };

        match ctx.record_mut() {
            Some(record) => {
                record.set_timestamp(self.slot, ut);
                Ok(Object::from(true))
            }
            None => Err(ctx.push_error("no log record to write to", self)),
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

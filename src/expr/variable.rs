// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::FunctionError;
use crate::eval::{EvalContext, EvalFailure, EvalResult};
use crate::expr::{optimize_slot, Expr};
use crate::object::Object;

/// `$field`: a field of the record being processed, as a message value.
#[derive(Debug)]
pub struct MessageField {
    name: String,
}

impl MessageField {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Expr for MessageField {
    fn name(&self) -> &str {
        &self.name
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        let looked_up = ctx.record().map(|record| {
            record
                .field(&self.name)
                .map(|(value, wire_type)| Object::message_value(value, wire_type))
        });
        match looked_up {
            Some(Some(value)) => Ok(value),
            Some(None) => Err(ctx.push_error_info("no such field", self, self.name.clone())),
            None => Err(ctx.push_error("no log record to read from", self)),
        }
    }
}

/// A variable local to one evaluation.
#[derive(Debug)]
pub struct Variable {
    name: String,
}

impl Variable {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Expr for Variable {
    fn name(&self) -> &str {
        &self.name
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        match ctx.variable(&self.name).cloned() {
            Some(value) => Ok(value),
            None => Err(ctx.push_error_info("no such variable", self, self.name.clone())),
        }
    }

    fn is_set(&self, ctx: &mut EvalContext<'_>) -> bool {
        ctx.variable(&self.name).is_some()
    }

    fn unset(&self, ctx: &mut EvalContext<'_>) -> Option<Result<(), EvalFailure>> {
        ctx.unset_variable(&self.name);
        Some(Ok(()))
    }
}

/// `name = value`. Evaluates to `true`.
#[derive(Debug)]
pub struct Assign {
    name: String,
    value: Box<dyn Expr>,
}

impl Assign {
    pub fn new(name: &str, value: Box<dyn Expr>) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

impl Expr for Assign {
    fn name(&self) -> &str {
        "assign"
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        let value = self
            .value
            .eval(ctx)
            .map_err(|_| ctx.push_error_info("Failed to evaluate value", self, self.name.clone()))?;
        if value.container_ptr().is_some() {
            ctx.store_weak_ref(value.clone());
        }
        ctx.set_variable(&self.name, value);
        Ok(Object::from(true))
    }

    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        optimize_slot(&mut self.value);
        None
    }

    fn init(&mut self) -> Result<(), FunctionError> {
        self.value.init()
    }

    fn deinit(&mut self) {
        self.value.deinit();
    }
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::FunctionError;
use crate::eval::{EvalContext, EvalResult};
use crate::expr::literal::literal;
use crate::expr::{optimize_slot, Expr};
use crate::object::Object;

/// `lhs ?? rhs`: `rhs` when `lhs` fails or is null.
#[derive(Debug)]
pub struct NullCoalesce {
    lhs: Box<dyn Expr>,
    rhs: Box<dyn Expr>,
}

impl NullCoalesce {
    pub fn new(lhs: Box<dyn Expr>, rhs: Box<dyn Expr>) -> Self {
        Self { lhs, rhs }
    }
}

fn is_null(value: &Object) -> bool {
    value.extract_null()
}

impl Expr for NullCoalesce {
    fn name(&self) -> &str {
        "null_coalesce"
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        let errors_before = ctx.error_count();
        match self.lhs.eval(ctx) {
            Ok(value) if !is_null(&value) => return Ok(value),
            Ok(_) => {}
            // The failure of the left hand side is absorbed.
            Err(_) => ctx.truncate_errors(errors_before),
        }
        self.rhs
            .eval(ctx)
            .map_err(|_| ctx.push_error("Failed to evaluate right hand side", self))
    }

    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        optimize_slot(&mut self.lhs);
        optimize_slot(&mut self.rhs);

        let value = self.lhs.literal_value()?;
        let winner = if is_null(&Object::Frozen(value)) {
            &mut self.rhs
        } else {
            &mut self.lhs
        };
        Some(core::mem::replace(winner, literal(Object::null())))
    }

    fn init(&mut self) -> Result<(), FunctionError> {
        self.lhs.init()?;
        self.rhs.init()
    }

    fn deinit(&mut self) {
        self.lhs.deinit();
        self.rhs.deinit();
    }
}

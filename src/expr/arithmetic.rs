// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::FunctionError;
use crate::eval::{EvalContext, EvalResult};
use crate::expr::literal::Literal;
use crate::expr::{optimize_slot, Expr};
use crate::object::Object;

/// `lhs + rhs`, dispatched on the type of the left operand.
#[derive(Debug)]
pub struct Plus {
    lhs: Box<dyn Expr>,
    rhs: Box<dyn Expr>,
}

impl Plus {
    pub fn new(lhs: Box<dyn Expr>, rhs: Box<dyn Expr>) -> Self {
        Self { lhs, rhs }
    }
}

impl Expr for Plus {
    fn name(&self) -> &str {
        "plus"
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        let lhs = self
            .lhs
            .eval(ctx)
            .map_err(|_| ctx.push_error("Failed to evaluate left hand side", self))?;
        let rhs = self
            .rhs
            .eval(ctx)
            .map_err(|_| ctx.push_error("Failed to evaluate right hand side", self))?;

        match lhs.add(&rhs) {
            Some(result) => Ok(result),
            None => {
                let info = format!("{} + {}", lhs.typed().type_of(), rhs.typed().type_of());
                Err(ctx.push_error_info("operation not supported", self, info))
            }
        }
    }

    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        optimize_slot(&mut self.lhs);
        optimize_slot(&mut self.rhs);

        let lhs = self.lhs.literal_value()?;
        let rhs = self.rhs.literal_value()?;
        let sum = Object::Frozen(lhs).add(&Object::Frozen(rhs))?;
        Some(Box::new(Literal::new(sum)))
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

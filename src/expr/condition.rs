// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::FunctionError;
use crate::eval::{EvalContext, EvalResult};
use crate::expr::literal::Literal;
use crate::expr::{optimize_opt_slot, Expr};
use crate::object::Object;

/// `if (cond) { ... } elif (cond) { ... } else { ... }`.
///
/// An `elif` chain is a conditional in the false branch. A missing
/// condition (the trailing `else`) is always true. Without a true branch the
/// value of the condition is the result; without a false branch a falsy
/// condition yields `true`.
#[derive(Debug, Default)]
pub struct Conditional {
    condition: Option<Box<dyn Expr>>,
    true_expr: Option<Box<dyn Expr>>,
    false_expr: Option<Box<dyn Expr>>,
}

impl Conditional {
    pub fn new(condition: Box<dyn Expr>) -> Self {
        Self {
            condition: Some(condition),
            ..Self::default()
        }
    }

    /// The trailing `else` block.
    pub fn otherwise(block: Box<dyn Expr>) -> Self {
        Self {
            true_expr: Some(block),
            ..Self::default()
        }
    }

    pub fn with_true(mut self, expr: Box<dyn Expr>) -> Self {
        self.true_expr = Some(expr);
        self
    }

    pub fn with_false(mut self, expr: Box<dyn Expr>) -> Self {
        self.false_expr = Some(expr);
        self
    }

    fn branch(&self, truthy: bool, condition_value: Object, ctx: &mut EvalContext<'_>) -> EvalResult {
        let branch = if truthy {
            &self.true_expr
        } else {
            &self.false_expr
        };
        match branch {
            Some(expr) => expr.eval(ctx),
            None if truthy => Ok(condition_value),
            None => Ok(Object::from(true)),
        }
    }
}

impl Expr for Conditional {
    fn name(&self) -> &str {
        "conditional"
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        let condition_value = match &self.condition {
            Some(condition) => condition
                .eval(ctx)
                .map_err(|_| ctx.push_error("Failed to evaluate condition", self))?,
            None => Object::from(true),
        };
        let truthy = condition_value.truthy();
        self.branch(truthy, condition_value, ctx)
    }

    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        optimize_opt_slot(&mut self.condition);
        optimize_opt_slot(&mut self.true_expr);
        optimize_opt_slot(&mut self.false_expr);

        let value = match &self.condition {
            Some(condition) => condition.literal_value()?,
            None => return self.true_expr.take(),
        };
        if value.truthy() {
            match self.true_expr.take() {
                Some(expr) => Some(expr),
                None => Some(Box::new(Literal::from_frozen(value))),
            }
        } else {
            match self.false_expr.take() {
                Some(expr) => Some(expr),
                None => Some(Box::new(Literal::new(true))),
            }
        }
    }

    fn init(&mut self) -> Result<(), FunctionError> {
        for expr in [&mut self.condition, &mut self.true_expr, &mut self.false_expr]
            .into_iter()
            .flatten()
        {
            expr.init()?;
        }
        Ok(())
    }

    fn deinit(&mut self) {
        for expr in [&mut self.condition, &mut self.true_expr, &mut self.false_expr]
            .into_iter()
            .flatten()
        {
            expr.deinit();
        }
    }
}

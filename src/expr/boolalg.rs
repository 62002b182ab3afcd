// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::FunctionError;
use crate::eval::{EvalContext, EvalFailure, EvalResult};
use crate::expr::literal::Literal;
use crate::expr::{optimize_slot, Expr};
use crate::object::Object;

// A literal operand of `and`/`or` either decides the result on its own or
// can be dropped from the node.
enum Folded {
    Constant(bool),
    Passthrough,
}

fn fold_operand(expr: &dyn Expr, deciding: bool) -> Option<Folded> {
    let value = expr.literal_value()?;
    if value.truthy() == deciding {
        Some(Folded::Constant(deciding))
    } else {
        Some(Folded::Passthrough)
    }
}

/// Evaluate `expr` as a condition of `owner`.
fn eval_condition(
    owner: &dyn Expr,
    expr: &dyn Expr,
    ctx: &mut EvalContext<'_>,
) -> Result<bool, EvalFailure> {
    match expr.eval(ctx) {
        Ok(value) => Ok(value.truthy()),
        Err(_) => Err(ctx.push_error("Failed to evaluate operand", owner)),
    }
}

#[derive(Debug)]
pub struct Not {
    operand: Box<dyn Expr>,
}

impl Not {
    pub fn new(operand: Box<dyn Expr>) -> Self {
        Self { operand }
    }
}

impl Expr for Not {
    fn name(&self) -> &str {
        "not"
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        let truthy = eval_condition(self, self.operand.as_ref(), ctx)?;
        Ok(Object::from(!truthy))
    }

    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        optimize_slot(&mut self.operand);
        let value = self.operand.literal_value()?;
        Some(Box::new(Literal::new(!value.truthy())))
    }

    fn init(&mut self) -> Result<(), FunctionError> {
        self.operand.init()
    }

    fn deinit(&mut self) {
        self.operand.deinit();
    }
}

/// Shared body of `and` and `or`: `deciding` is the operand truthiness that
/// short-circuits the evaluation.
#[derive(Debug)]
struct ShortCircuit {
    lhs: Option<Box<dyn Expr>>,
    rhs: Box<dyn Expr>,
    deciding: bool,
}

impl ShortCircuit {
    fn eval(&self, owner: &dyn Expr, ctx: &mut EvalContext<'_>) -> EvalResult {
        if let Some(lhs) = &self.lhs {
            if eval_condition(owner, lhs.as_ref(), ctx)? == self.deciding {
                return Ok(Object::from(self.deciding));
            }
        }
        let rhs = eval_condition(owner, self.rhs.as_ref(), ctx)?;
        Ok(Object::from(rhs))
    }

    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        if let Some(lhs) = &mut self.lhs {
            optimize_slot(lhs);
        }
        optimize_slot(&mut self.rhs);

        if let Some(lhs) = &self.lhs {
            match fold_operand(lhs.as_ref(), self.deciding) {
                Some(Folded::Constant(value)) => return Some(Box::new(Literal::new(value))),
                Some(Folded::Passthrough) => self.lhs = None,
                None => {}
            }
        }
        match fold_operand(self.rhs.as_ref(), self.deciding) {
            // `rhs` alone decides only once `lhs` is gone; otherwise `lhs`
            // still has to be evaluated for its failure behaviour.
            Some(Folded::Constant(value)) if self.lhs.is_none() => {
                Some(Box::new(Literal::new(value)))
            }
            Some(Folded::Passthrough) if self.lhs.is_none() => {
                Some(Box::new(Literal::new(!self.deciding)))
            }
            _ => None,
        }
    }

    fn init(&mut self) -> Result<(), FunctionError> {
        if let Some(lhs) = &mut self.lhs {
            lhs.init()?;
        }
        self.rhs.init()
    }

    fn deinit(&mut self) {
        if let Some(lhs) = &mut self.lhs {
            lhs.deinit();
        }
        self.rhs.deinit();
    }
}

#[derive(Debug)]
pub struct And(ShortCircuit);

impl And {
    pub fn new(lhs: Box<dyn Expr>, rhs: Box<dyn Expr>) -> Self {
        And(ShortCircuit {
            lhs: Some(lhs),
            rhs,
            deciding: false,
        })
    }
}

impl Expr for And {
    fn name(&self) -> &str {
        "and"
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        self.0.eval(self, ctx)
    }

    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        self.0.optimize()
    }

    fn init(&mut self) -> Result<(), FunctionError> {
        self.0.init()
    }

    fn deinit(&mut self) {
        self.0.deinit();
    }
}

#[derive(Debug)]
pub struct Or(ShortCircuit);

impl Or {
    pub fn new(lhs: Box<dyn Expr>, rhs: Box<dyn Expr>) -> Self {
        Or(ShortCircuit {
            lhs: Some(lhs),
            rhs,
            deciding: true,
        })
    }
}

impl Expr for Or {
    fn name(&self) -> &str {
        "or"
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        self.0.eval(self, ctx)
    }

    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        self.0.optimize()
    }

    fn init(&mut self) -> Result<(), FunctionError> {
        self.0.init()
    }

    fn deinit(&mut self) {
        self.0.deinit();
    }
}

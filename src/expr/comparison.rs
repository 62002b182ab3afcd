// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::compare::{compare_objects, CompareMode, CompareOp};
use crate::error::FunctionError;
use crate::eval::{EvalContext, EvalResult};
use crate::expr::literal::Literal;
use crate::expr::{optimize_slot, Expr};
use crate::object::{FrozenObject, Object};

/// `lhs <op> rhs` under one of the comparison modes.
///
/// After optimization a literal operand is kept as a resolved value and not
/// re-evaluated; two literal operands fold the node into a boolean literal.
#[derive(Debug)]
pub struct Comparison {
    lhs: Box<dyn Expr>,
    rhs: Box<dyn Expr>,
    lhs_literal: Option<FrozenObject>,
    rhs_literal: Option<FrozenObject>,
    mode: CompareMode,
    op: CompareOp,
}

impl Comparison {
    pub fn new(
        lhs: Box<dyn Expr>,
        rhs: Box<dyn Expr>,
        mode: CompareMode,
        op: CompareOp,
    ) -> Result<Self, FunctionError> {
        if mode == CompareMode::TypeAndValueBased && op.is_ordering() {
            return Err(FunctionError::ctor_fail(
                "comparison",
                format!("operator {op} is not supported by strict comparison"),
            ));
        }
        Ok(Self {
            lhs,
            rhs,
            lhs_literal: None,
            rhs_literal: None,
            mode,
            op,
        })
    }

    pub fn mode(&self) -> CompareMode {
        self.mode
    }

    pub fn op(&self) -> CompareOp {
        self.op
    }

    fn eval_operand(
        &self,
        literal: &Option<FrozenObject>,
        expr: &dyn Expr,
        ctx: &mut EvalContext<'_>,
    ) -> EvalResult {
        if let Some(value) = literal {
            return Ok(Object::Frozen(value.clone()));
        }
        let result = if self.mode.needs_typed_operands() {
            expr.eval_typed(ctx)
        } else {
            expr.eval(ctx)
        };
        result.map_err(|_| ctx.push_error("Failed to evaluate operand", self))
    }
}

impl Expr for Comparison {
    fn name(&self) -> &str {
        "comparison"
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        let lhs = self.eval_operand(&self.lhs_literal, self.lhs.as_ref(), ctx)?;
        let rhs = self.eval_operand(&self.rhs_literal, self.rhs.as_ref(), ctx)?;
        Ok(Object::from(compare_objects(&lhs, &rhs, self.mode, self.op)))
    }

    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        optimize_slot(&mut self.lhs);
        optimize_slot(&mut self.rhs);

        if self.lhs.is_literal() {
            self.lhs_literal = self.lhs.literal_value();
        }
        if self.rhs.is_literal() {
            self.rhs_literal = self.rhs.literal_value();
        }

        match (&self.lhs_literal, &self.rhs_literal) {
            (Some(lhs), Some(rhs)) => {
                let result = compare_objects(
                    &Object::Frozen(lhs.clone()),
                    &Object::Frozen(rhs.clone()),
                    self.mode,
                    self.op,
                );
                Some(Box::new(Literal::new(result)))
            }
            _ => None,
        }
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

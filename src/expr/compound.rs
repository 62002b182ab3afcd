// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::FunctionError;
use crate::eval::{EvalContext, EvalResult};
use crate::expr::{optimize_slot, Expr};
use crate::object::Object;

/// A block of statements.
///
/// Statements run in order. A statement evaluating to a falsy value ends
/// the block with `false`; otherwise the block yields the value of its last
/// statement, or `true` when empty.
#[derive(Debug, Default)]
pub struct Compound {
    statements: Vec<Box<dyn Expr>>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_statements(statements: Vec<Box<dyn Expr>>) -> Self {
        Self { statements }
    }

    pub fn push(&mut self, statement: Box<dyn Expr>) {
        self.statements.push(statement);
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Run the statements starting at `start`.
    pub fn eval_from(&self, start: usize, ctx: &mut EvalContext<'_>) -> EvalResult {
        let mut last = Object::from(true);
        for statement in self.statements.iter().skip(start) {
            let value = statement.eval(ctx)?;
            if !value.truthy() {
                return Ok(Object::from(false));
            }
            last = value;
        }
        Ok(last)
    }
}

impl Expr for Compound {
    fn name(&self) -> &str {
        "compound"
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        self.eval_from(0, ctx)
    }

    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        for statement in &mut self.statements {
            optimize_slot(statement);
        }
        None
    }

    fn init(&mut self) -> Result<(), FunctionError> {
        for statement in &mut self.statements {
            statement.init()?;
        }
        Ok(())
    }

    fn deinit(&mut self) {
        for statement in &mut self.statements {
            statement.deinit();
        }
    }
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

pub mod access;
pub mod arithmetic;
pub mod boolalg;
pub mod comparison;
pub mod compound;
pub mod condition;
pub mod function;
pub mod literal;
pub mod null_coalesce;
pub mod switch;
pub mod variable;

use core::fmt::Debug;

use crate::error::FunctionError;
use crate::eval::{EvalContext, EvalFailure, EvalResult};
use crate::object::FrozenObject;

pub use access::{GetAttr, GetSubscript, IsSet, SetAttr, SetSubscript, Unset};
pub use arithmetic::Plus;
pub use boolalg::{And, Not, Or};
pub use comparison::Comparison;
pub use compound::Compound;
pub use condition::Conditional;
pub use function::{FunctionArg, FunctionArgs, FunctionCall};
pub use literal::Literal;
pub use null_coalesce::NullCoalesce;
pub use switch::{Switch, SwitchItem};
pub use variable::{Assign, MessageField, Variable};

/// A node of an expression tree.
///
/// Trees are built once, optimized and initialized while configuration is
/// loaded, and then evaluated concurrently by any number of threads. `eval`
/// therefore takes `&self`; all per-evaluation state lives in the
/// [`EvalContext`].
pub trait Expr: Send + Sync + Debug {
    /// Description used in error messages.
    fn name(&self) -> &str;

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult;

    /// Evaluate and decode message values into typed objects.
    fn eval_typed(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        let result = self.eval(ctx)?;
        Ok(result.typed())
    }

    /// Whether the value this node refers to exists. Nodes that do not
    /// refer to a stored value are set when they evaluate without error.
    fn is_set(&self, ctx: &mut EvalContext<'_>) -> bool {
        let errors_before = ctx.error_count();
        let set = self.eval(ctx).is_ok();
        ctx.truncate_errors(errors_before);
        set
    }

    /// Remove the value this node refers to. `None` if the node does not
    /// refer to a removable value.
    fn unset(&self, _ctx: &mut EvalContext<'_>) -> Option<Result<(), EvalFailure>> {
        None
    }

    fn is_literal(&self) -> bool {
        false
    }

    /// The value of a literal node.
    fn literal_value(&self) -> Option<FrozenObject> {
        None
    }

    /// Simplify the subtree. Returns the node that should replace `self`,
    /// if any. Children are optimized through [`optimize_slot`].
    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        None
    }

    fn init(&mut self) -> Result<(), FunctionError> {
        Ok(())
    }

    fn deinit(&mut self) {}
}

/// Optimize the node in `slot`, replacing it when the node asks for it.
pub fn optimize_slot(slot: &mut Box<dyn Expr>) {
    if let Some(replacement) = slot.optimize() {
        log::debug!("folded {} into {}", slot.name(), replacement.name());
        *slot = replacement;
    }
}

pub fn optimize_opt_slot(slot: &mut Option<Box<dyn Expr>>) {
    if let Some(expr) = slot {
        optimize_slot(expr);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExprState {
    Constructed,
    Initialized,
    Deinitialized,
}

/// Root of an expression tree, enforcing the
/// `optimize* -> init -> eval* -> deinit` lifecycle.
#[derive(Debug)]
pub struct CompiledExpr {
    root: Box<dyn Expr>,
    state: ExprState,
}

impl CompiledExpr {
    pub fn new(root: Box<dyn Expr>) -> Self {
        Self {
            root,
            state: ExprState::Constructed,
        }
    }

    pub fn state(&self) -> ExprState {
        self.state
    }

    pub fn root(&self) -> &dyn Expr {
        self.root.as_ref()
    }

    pub fn optimize(&mut self) -> Result<(), FunctionError> {
        if self.state != ExprState::Constructed {
            return Err(FunctionError::InvalidState(
                "optimize after init".to_string(),
            ));
        }
        optimize_slot(&mut self.root);
        Ok(())
    }

    pub fn init(&mut self) -> Result<(), FunctionError> {
        if self.state != ExprState::Constructed {
            return Err(FunctionError::InvalidState(format!(
                "init in state {:?}",
                self.state
            )));
        }
        self.root.init()?;
        self.state = ExprState::Initialized;
        Ok(())
    }

    pub fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        if self.state != ExprState::Initialized {
            return Err(ctx.push_error("expression is not initialized", self.root.as_ref()));
        }
        self.root.eval(ctx)
    }

    /// Evaluate as a filter.
    pub fn exec(&self, ctx: &mut EvalContext<'_>) -> Result<bool, EvalFailure> {
        let result = self.eval(ctx)?;
        Ok(result.truthy())
    }

    pub fn deinit(&mut self) {
        if self.state == ExprState::Initialized {
            self.root.deinit();
            self.state = ExprState::Deinitialized;
        }
    }
}

impl Drop for CompiledExpr {
    fn drop(&mut self) {
        self.deinit();
    }
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::compare::{compare_objects, CompareMode, CompareOp};
use crate::error::FunctionError;
use crate::eval::{EvalContext, EvalFailure, EvalResult};
use crate::expr::compound::Compound;
use crate::expr::{optimize_slot, Expr};
use crate::object::{FrozenObject, Object};

/// One element of a switch body, in source order.
#[derive(Debug)]
pub enum SwitchItem {
    Case(Box<dyn Expr>),
    Default,
    Statement(Box<dyn Expr>),
}

#[derive(Debug)]
struct Case {
    value: Box<dyn Expr>,
    literal: Option<FrozenObject>,
    target: usize,
}

/// `switch (selector) { case ...: ... default: ... }`.
///
/// Each case label marks a position in the statement list; evaluation
/// starts at the position of the selected label and falls through to the
/// end of the body.
#[derive(Debug)]
pub struct Switch {
    selector: Box<dyn Expr>,
    cases: Vec<Case>,
    default_target: Option<usize>,
    body: Compound,
}

impl Switch {
    pub fn new(selector: Box<dyn Expr>, items: Vec<SwitchItem>) -> Result<Self, FunctionError> {
        let mut cases = Vec::new();
        let mut default_target = None;
        let mut body = Compound::new();

        for item in items {
            match item {
                SwitchItem::Case(value) => cases.push(Case {
                    value,
                    literal: None,
                    target: body.len(),
                }),
                SwitchItem::Default => {
                    if default_target.is_some() {
                        return Err(FunctionError::ctor_fail("switch", "multiple default labels"));
                    }
                    default_target = Some(body.len());
                }
                SwitchItem::Statement(statement) => body.push(statement),
            }
        }

        Ok(Self {
            selector,
            cases,
            default_target,
            body,
        })
    }

    fn find_target(
        &self,
        selector: &Object,
        ctx: &mut EvalContext<'_>,
    ) -> Result<Option<usize>, EvalFailure> {
        let mut target = None;
        for case in &self.cases {
            let value = match &case.literal {
                Some(literal) => Object::Frozen(literal.clone()),
                None => case
                    .value
                    .eval_typed(ctx)
                    .map_err(|_| ctx.push_error("Failed to evaluate case", self))?,
            };
            if compare_objects(
                selector,
                &value,
                CompareMode::TypeAndValueBased,
                CompareOp::EQ,
            ) {
                target = Some(case.target);
            }
        }
        Ok(target.or(self.default_target))
    }
}

impl Expr for Switch {
    fn name(&self) -> &str {
        "switch"
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        let selector = self
            .selector
            .eval_typed(ctx)
            .map_err(|_| ctx.push_error("Failed to evaluate selector", self))?;

        match self.find_target(&selector, ctx)? {
            Some(target) => self.body.eval_from(target, ctx),
            None => Ok(Object::from(true)),
        }
    }

    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        optimize_slot(&mut self.selector);
        for case in &mut self.cases {
            optimize_slot(&mut case.value);
            case.literal = case.value.literal_value();
        }
        self.body.optimize();
        None
    }

    fn init(&mut self) -> Result<(), FunctionError> {
        self.selector.init()?;
        for case in &mut self.cases {
            case.value.init()?;
        }
        self.body.init()
    }

    fn deinit(&mut self) {
        self.selector.deinit();
        for case in &mut self.cases {
            case.value.deinit();
        }
        self.body.deinit();
    }
}

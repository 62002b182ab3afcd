// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::env::Environment;
use crate::eval::{EvalContext, EvalResult};
use crate::expr::Expr;
use crate::object::{FrozenObject, Object};

/// A constant. The value is frozen through the literal's own environment,
/// so a compiled tree can be shared between threads.
#[derive(Debug)]
pub struct Literal {
    value: FrozenObject,
    _env: Environment,
}

impl Literal {
    pub fn new(value: impl Into<Object>) -> Self {
        let mut env = Environment::new();
        let value = env.freeze(value.into(), None);
        Self { value, _env: env }
    }

    /// Wrap an already frozen value.
    pub fn from_frozen(value: FrozenObject) -> Self {
        Self {
            value,
            _env: Environment::new(),
        }
    }

    /// Freeze `value` through `env` under `key`, sharing identical literals.
    pub fn interned(env: &mut Environment, value: impl Into<Object>, key: &str) -> Self {
        Self::from_frozen(env.freeze(value.into(), Some(key)))
    }

    pub fn value(&self) -> &FrozenObject {
        &self.value
    }
}

impl Expr for Literal {
    fn name(&self) -> &str {
        "literal"
    }

    fn eval(&self, _ctx: &mut EvalContext<'_>) -> EvalResult {
        Ok(Object::Frozen(self.value.clone()))
    }

    fn is_literal(&self) -> bool {
        true
    }

    fn literal_value(&self) -> Option<FrozenObject> {
        Some(self.value.clone())
    }
}

/// Boxed literal, for building trees.
pub fn literal(value: impl Into<Object>) -> Box<dyn Expr> {
    Box::new(Literal::new(value))
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::builtins::SimpleFunction;
use crate::error::FunctionError;
use crate::eval::{EvalContext, EvalResult};
use crate::expr::{optimize_slot, Expr};
use crate::object::{FrozenObject, Object};

/// One argument of a call as written: `expr` or `name=expr`.
#[derive(Debug)]
pub struct FunctionArg {
    name: Option<String>,
    expr: Box<dyn Expr>,
}

impl FunctionArg {
    pub fn positional(expr: Box<dyn Expr>) -> Self {
        Self { name: None, expr }
    }

    pub fn named(name: &str, expr: Box<dyn Expr>) -> Self {
        Self {
            name: Some(name.to_string()),
            expr,
        }
    }
}

#[derive(Debug)]
struct ArgSlot {
    expr: Option<Box<dyn Expr>>,
    retrieved: bool,
}

impl ArgSlot {
    fn new(expr: Box<dyn Expr>) -> Self {
        Self {
            expr: Some(expr),
            retrieved: false,
        }
    }

    fn literal(&mut self) -> Option<FrozenObject> {
        self.retrieved = true;
        self.expr.as_ref()?.literal_value()
    }

    fn take(&mut self) -> Option<Box<dyn Expr>> {
        self.retrieved = true;
        self.expr.take()
    }
}

/// Arguments handed to a function constructor.
///
/// Constructors pick the arguments they understand; [`FunctionArgs::check`]
/// then rejects any named argument nobody asked for.
#[derive(Debug)]
pub struct FunctionArgs {
    function: String,
    positional: Vec<ArgSlot>,
    named: Vec<(String, ArgSlot)>,
}

impl FunctionArgs {
    pub fn new(function: &str, args: Vec<FunctionArg>) -> Result<Self, FunctionError> {
        let mut positional = Vec::new();
        let mut named: Vec<(String, ArgSlot)> = Vec::new();

        for arg in args {
            match arg.name {
                None if !named.is_empty() => {
                    return Err(FunctionError::ctor_fail(
                        function,
                        "positional argument after named argument",
                    ));
                }
                None => positional.push(ArgSlot::new(arg.expr)),
                Some(name) => {
                    if named.iter().any(|(n, _)| *n == name) {
                        return Err(FunctionError::ctor_fail(
                            function,
                            format!("duplicate argument \"{name}\""),
                        ));
                    }
                    named.push((name, ArgSlot::new(arg.expr)));
                }
            }
        }

        Ok(Self {
            function: function.to_string(),
            positional,
            named,
        })
    }

    /// Positional arguments only.
    pub fn from_exprs(function: &str, exprs: Vec<Box<dyn Expr>>) -> Self {
        Self {
            function: function.to_string(),
            positional: exprs.into_iter().map(ArgSlot::new).collect(),
            named: Vec::new(),
        }
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    /// Number of positional arguments.
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty()
    }

    pub fn ctor_fail(&self, message: impl Into<String>) -> FunctionError {
        FunctionError::ctor_fail(&self.function, message)
    }

    /// Take the expression of positional argument `index`.
    pub fn get_expr(&mut self, index: usize) -> Option<Box<dyn Expr>> {
        self.positional.get_mut(index)?.take()
    }

    /// The value of positional argument `index` if it is a string literal.
    pub fn get_literal_string(&mut self, index: usize) -> Option<String> {
        let value = self.positional.get_mut(index)?.literal()?;
        let string = Object::Frozen(value).extract_string()?;
        Some(string.to_string())
    }

    fn named_slot(&mut self, name: &str) -> Option<&mut ArgSlot> {
        self.named
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, slot)| slot)
    }

    fn get_named_literal<T>(
        &mut self,
        name: &str,
        kind: &str,
        extract: impl FnOnce(&Object) -> Option<T>,
    ) -> Result<Option<T>, FunctionError> {
        let function = self.function.clone();
        let Some(slot) = self.named_slot(name) else {
            return Ok(None);
        };
        let value = slot
            .literal()
            .and_then(|value| extract(&Object::Frozen(value)));
        match value {
            Some(value) => Ok(Some(value)),
            None => Err(FunctionError::ctor_fail(
                &function,
                format!("argument \"{name}\" must be a literal {kind}"),
            )),
        }
    }

    pub fn get_named_literal_string(
        &mut self,
        name: &str,
    ) -> Result<Option<String>, FunctionError> {
        self.get_named_literal(name, "string", |value| {
            value.extract_string().map(|s| s.to_string())
        })
    }

    pub fn get_named_literal_boolean(
        &mut self,
        name: &str,
    ) -> Result<Option<bool>, FunctionError> {
        self.get_named_literal(name, "boolean", Object::extract_boolean)
    }

    /// Fail on named arguments the constructor did not retrieve.
    pub fn check(&self) -> Result<(), FunctionError> {
        match self.named.iter().find(|(_, slot)| !slot.retrieved) {
            Some((name, _)) => Err(FunctionError::UnexpectedArgs {
                function: self.function.clone(),
                name: name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// The positional expressions not taken yet, after [`FunctionArgs::check`].
    pub fn into_positional(mut self) -> Result<Vec<Box<dyn Expr>>, FunctionError> {
        self.check()?;
        Ok(self
            .positional
            .iter_mut()
            .filter_map(ArgSlot::take)
            .collect())
    }
}

/// A call of a simple function with evaluated arguments.
#[derive(Debug)]
pub struct FunctionCall {
    name: String,
    function: SimpleFunction,
    args: Vec<Box<dyn Expr>>,
}

impl FunctionCall {
    pub fn new(args: FunctionArgs, function: SimpleFunction) -> Result<Self, FunctionError> {
        let name = args.function().to_string();
        let args = args.into_positional()?;
        Ok(Self {
            name,
            function,
            args,
        })
    }
}

impl Expr for FunctionCall {
    fn name(&self) -> &str {
        &self.name
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        let mut values = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            let value = arg
                .eval(ctx)
                .map_err(|_| ctx.push_error("Failed to evaluate argument", self))?;
            values.push(value);
        }
        (self.function)(&values).map_err(|e| ctx.push_error(e.to_string(), self))
    }

    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        for arg in &mut self.args {
            optimize_slot(arg);
        }
        None
    }

    fn init(&mut self) -> Result<(), FunctionError> {
        for arg in &mut self.args {
            arg.init()?;
        }
        Ok(())
    }

    fn deinit(&mut self) {
        for arg in &mut self.args {
            arg.deinit();
        }
    }
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::{bail, Result};

use crate::builtins::utils::{ensure_args_count, ensure_ctor_args_count, ensure_string};
use crate::builtins::{FunctionCtor, FunctionRegistry, SimpleFunction};
use crate::error::FunctionError;
use crate::eval::{EvalContext, EvalFailure, EvalResult};
use crate::expr::{optimize_slot, Expr, FunctionArgs};
use crate::object::Object;

pub fn register(m: &mut FunctionRegistry<SimpleFunction>) {
    m.register("repr", repr);
    m.register("len", len);
    m.register("lower", lower);
    m.register("upper", upper);
}

pub fn register_ctors(m: &mut FunctionRegistry<FunctionCtor>) {
    m.register("startswith", startswith);
    m.register("endswith", endswith);
    m.register("includes", includes);
}

fn repr(args: &[Object]) -> Result<Object> {
    ensure_args_count("repr", args, 1)?;
    Ok(Object::from(args[0].repr()))
}

fn len(args: &[Object]) -> Result<Object> {
    ensure_args_count("len", args, 1)?;
    match args[0].len() {
        Some(n) => Ok(Object::from(i64::try_from(n)?)),
        None => bail!(
            "`len` expects string, bytes, list or dict. Got `{}`",
            args[0].type_of()
        ),
    }
}

fn lower(args: &[Object]) -> Result<Object> {
    ensure_args_count("lower", args, 1)?;
    let s = ensure_string("lower", &args[0])?;
    Ok(Object::from(s.to_lowercase()))
}

fn upper(args: &[Object]) -> Result<Object> {
    ensure_args_count("upper", args, 1)?;
    let s = ensure_string("upper", &args[0])?;
    Ok(Object::from(s.to_uppercase()))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Affix {
    Prefix,
    Suffix,
    Substring,
}

impl Affix {
    fn name(self) -> &'static str {
        match self {
            Affix::Prefix => "startswith",
            Affix::Suffix => "endswith",
            Affix::Substring => "includes",
        }
    }

    fn matches(self, haystack: &str, needle: &str) -> bool {
        match self {
            Affix::Prefix => haystack.starts_with(needle),
            Affix::Suffix => haystack.ends_with(needle),
            Affix::Substring => haystack.contains(needle),
        }
    }
}

/// `startswith(haystack, needle, ignorecase=false)` and friends.
#[derive(Debug)]
struct AffixMatch {
    affix: Affix,
    haystack: Box<dyn Expr>,
    needle: Box<dyn Expr>,
    needle_literal: Option<String>,
    ignorecase: bool,
}

impl AffixMatch {
    fn build(affix: Affix, mut args: FunctionArgs) -> Result<Box<dyn Expr>, FunctionError> {
        ensure_ctor_args_count(&args, 2)?;
        let ignorecase = args
            .get_named_literal_boolean("ignorecase")?
            .unwrap_or(false);
        let (Some(haystack), Some(needle)) = (args.get_expr(0), args.get_expr(1)) else {
            return Err(args.ctor_fail("missing argument"));
        };
        args.check()?;
        Ok(Box::new(AffixMatch {
            affix,
            haystack,
            needle,
            needle_literal: None,
            ignorecase,
        }))
    }

    fn fold_case(&self, s: &str) -> String {
        if self.ignorecase {
            s.to_lowercase()
        } else {
            s.to_string()
        }
    }

    fn eval_string(
        &self,
        expr: &dyn Expr,
        ctx: &mut EvalContext<'_>,
    ) -> Result<String, EvalFailure> {
        let value = expr
            .eval(ctx)
            .map_err(|_| ctx.push_error("Failed to evaluate argument", self))?;
        match value.extract_string() {
            Some(s) => Ok(self.fold_case(&s)),
            None => Err(ctx.push_error_object("argument must be a string", self, &value)),
        }
    }
}

impl Expr for AffixMatch {
    fn name(&self) -> &str {
        self.affix.name()
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        let haystack = self.eval_string(self.haystack.as_ref(), ctx)?;
        let needle = match &self.needle_literal {
            Some(needle) => needle.clone(),
            None => self.eval_string(self.needle.as_ref(), ctx)?,
        };
        Ok(Object::from(self.affix.matches(&haystack, &needle)))
    }

    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        optimize_slot(&mut self.haystack);
        optimize_slot(&mut self.needle);
        self.needle_literal = self
            .needle
            .literal_value()
            .and_then(|value| Object::Frozen(value).extract_string())
            .map(|s| self.fold_case(&s));
        None
    }

    fn init(&mut self) -> Result<(), FunctionError> {
        self.haystack.init()?;
        self.needle.init()
    }

    fn deinit(&mut self) {
        self.haystack.deinit();
        self.needle.deinit();
    }
}

fn startswith(args: FunctionArgs) -> Result<Box<dyn Expr>, FunctionError> {
    AffixMatch::build(Affix::Prefix, args)
}

fn endswith(args: FunctionArgs) -> Result<Box<dyn Expr>, FunctionError> {
    AffixMatch::build(Affix::Suffix, args)
}

fn includes(args: FunctionArgs) -> Result<Box<dyn Expr>, FunctionError> {
    AffixMatch::build(Affix::Substring, args)
}

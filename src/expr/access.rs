// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Element and attribute access on lists and dicts: `x[key]`, `x.attr`,
//! the assignments to them, and `isset()` / `unset()`.

use crate::builtins::{FunctionCtor, FunctionRegistry};
use crate::error::FunctionError;
use crate::eval::{EvalContext, EvalFailure, EvalResult};
use crate::expr::{optimize_opt_slot, optimize_slot, Expr, FunctionArgs};
use crate::object::{DictKey, Object, ObjectType};

pub fn register(m: &mut FunctionRegistry<FunctionCtor>) {
    m.register("isset", isset);
    m.register("unset", unset);
}

/// Position inside a container.
enum Slot {
    Index(usize),
    Key(DictKey),
}

/// Where `key` points inside `target`. List indices must be integers;
/// negative ones count from the end.
fn resolve(target: &Object, key: &Object) -> Option<Slot> {
    match target.type_of() {
        ObjectType::List => {
            let index = key.extract_integer()?;
            let index = if index < 0 {
                index.checked_add(i64::try_from(target.len()?).ok()?)?
            } else {
                index
            };
            usize::try_from(index).ok().map(Slot::Index)
        }
        ObjectType::Dict => Some(Slot::Key(DictKey::new(key.typed().scalar()?))),
        _ => None,
    }
}

fn get(target: &Object, slot: &Slot) -> Option<Object> {
    match slot {
        Slot::Index(index) => target.get_index(*index),
        Slot::Key(key) => target.get_key(key),
    }
}

fn set(target: &Object, slot: Slot, value: Object) -> bool {
    match slot {
        Slot::Index(index) => target.set_index(index, value),
        Slot::Key(key) => target.set_key(key, value),
    }
}

fn remove(target: &Object, slot: &Slot) -> bool {
    match slot {
        Slot::Index(index) => target.unset_index(*index),
        // Removing a missing key is not an error.
        Slot::Key(key) => {
            target.unset_key(key);
            true
        }
    }
}

/// Evaluate the container an access node works on.
fn eval_target(
    ctx: &mut EvalContext<'_>,
    node: &dyn Expr,
    operand: &dyn Expr,
) -> EvalResult {
    operand
        .eval_typed(ctx)
        .map_err(|_| ctx.push_error("Failed to evaluate object", node))
}

/// `operand[key]`.
#[derive(Debug)]
pub struct GetSubscript {
    operand: Box<dyn Expr>,
    key: Box<dyn Expr>,
}

impl GetSubscript {
    pub fn new(operand: Box<dyn Expr>, key: Box<dyn Expr>) -> Self {
        Self { operand, key }
    }

    fn target_and_slot(
        &self,
        ctx: &mut EvalContext<'_>,
    ) -> Result<(Object, Object, Option<Slot>), EvalFailure> {
        let target = eval_target(ctx, self, self.operand.as_ref())?;
        let key = self
            .key
            .eval_typed(ctx)
            .map_err(|_| ctx.push_error("Failed to evaluate key", self))?;
        let slot = resolve(&target, &key);
        Ok((target, key, slot))
    }
}

impl Expr for GetSubscript {
    fn name(&self) -> &str {
        "get_subscript"
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        let (target, key, slot) = self.target_and_slot(ctx)?;
        match slot.and_then(|slot| get(&target, &slot)) {
            Some(value) => Ok(value),
            None => Err(ctx.push_error_object("Object get-subscript failed", self, &key)),
        }
    }

    fn is_set(&self, ctx: &mut EvalContext<'_>) -> bool {
        let errors_before = ctx.error_count();
        let set = match self.target_and_slot(ctx) {
            Ok((target, _, Some(slot))) => get(&target, &slot).is_some(),
            Ok((_, _, None)) | Err(_) => false,
        };
        ctx.truncate_errors(errors_before);
        set
    }

    fn unset(&self, ctx: &mut EvalContext<'_>) -> Option<Result<(), EvalFailure>> {
        let (target, key, slot) = match self.target_and_slot(ctx) {
            Ok(found) => found,
            Err(failure) => return Some(Err(failure)),
        };
        if target.is_frozen() {
            return Some(Err(ctx.push_error_object(
                "Object unset-subscript failed, object is readonly",
                self,
                &key,
            )));
        }
        Some(match slot {
            Some(slot) if remove(&target, &slot) => Ok(()),
            _ => Err(ctx.push_error_object("Object unset-subscript failed", self, &key)),
        })
    }

    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        optimize_slot(&mut self.operand);
        optimize_slot(&mut self.key);
        None
    }

    fn init(&mut self) -> Result<(), FunctionError> {
        self.operand.init()?;
        self.key.init()
    }

    fn deinit(&mut self) {
        self.operand.deinit();
        self.key.deinit();
    }
}

/// `object[key] = value`, or `object[] = value` to append to a list.
/// Evaluates to `true`, like [`Assign`](crate::expr::Assign).
#[derive(Debug)]
pub struct SetSubscript {
    object: Box<dyn Expr>,
    key: Option<Box<dyn Expr>>,
    value: Box<dyn Expr>,
}

impl SetSubscript {
    pub fn new(object: Box<dyn Expr>, key: Option<Box<dyn Expr>>, value: Box<dyn Expr>) -> Self {
        Self { object, key, value }
    }
}

impl Expr for SetSubscript {
    fn name(&self) -> &str {
        "set_subscript"
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        let value = self
            .value
            .eval(ctx)
            .map_err(|_| ctx.push_error("Failed to evaluate value", self))?;
        let target = eval_target(ctx, self, self.object.as_ref())?;
        let key = match &self.key {
            Some(key) => Some(
                key.eval_typed(ctx)
                    .map_err(|_| ctx.push_error("Failed to evaluate key", self))?,
            ),
            None => None,
        };
        let key_repr = || key.clone().unwrap_or_else(Object::null);

        if target.is_frozen() {
            return Err(ctx.push_error_object(
                "Object set-subscript failed, object is readonly",
                self,
                &key_repr(),
            ));
        }
        if value.container_ptr().is_some() {
            ctx.store_weak_ref(value.clone());
        }

        let stored = match &key {
            None => target.push(value),
            Some(key) => match resolve(&target, key) {
                Some(slot) => set(&target, slot, value),
                None => false,
            },
        };
        if stored {
            Ok(Object::from(true))
        } else {
            Err(ctx.push_error_object("Object set-subscript failed", self, &key_repr()))
        }
    }

    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        optimize_slot(&mut self.object);
        optimize_opt_slot(&mut self.key);
        optimize_slot(&mut self.value);
        None
    }

    fn init(&mut self) -> Result<(), FunctionError> {
        self.object.init()?;
        if let Some(key) = &mut self.key {
            key.init()?;
        }
        self.value.init()
    }

    fn deinit(&mut self) {
        self.object.deinit();
        if let Some(key) = &mut self.key {
            key.deinit();
        }
        self.value.deinit();
    }
}

/// `operand.attr`: a string key of a dict.
#[derive(Debug)]
pub struct GetAttr {
    operand: Box<dyn Expr>,
    attr: String,
}

impl GetAttr {
    pub fn new(operand: Box<dyn Expr>, attr: &str) -> Self {
        Self {
            operand,
            attr: attr.to_string(),
        }
    }

    fn key(&self) -> DictKey {
        DictKey::from(self.attr.as_str())
    }
}

impl Expr for GetAttr {
    fn name(&self) -> &str {
        "getattr"
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        let target = eval_target(ctx, self, self.operand.as_ref())?;
        match target.get_key(&self.key()) {
            Some(value) => Ok(value),
            None => Err(ctx.push_error_info("No such attribute", self, self.attr.clone())),
        }
    }

    fn is_set(&self, ctx: &mut EvalContext<'_>) -> bool {
        let errors_before = ctx.error_count();
        let set = eval_target(ctx, self, self.operand.as_ref())
            .map(|target| target.get_key(&self.key()).is_some())
            .unwrap_or(false);
        ctx.truncate_errors(errors_before);
        set
    }

    fn unset(&self, ctx: &mut EvalContext<'_>) -> Option<Result<(), EvalFailure>> {
        let target = match eval_target(ctx, self, self.operand.as_ref()) {
            Ok(target) => target,
            Err(failure) => return Some(Err(failure)),
        };
        if target.is_frozen() {
            return Some(Err(ctx.push_error_info(
                "Object unset-attr failed, object is readonly",
                self,
                self.attr.clone(),
            )));
        }
        if target.type_of() != ObjectType::Dict {
            return Some(Err(ctx.push_error_object("Object unset-attr failed", self, &target)));
        }
        target.unset_key(&self.key());
        Some(Ok(()))
    }

    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        optimize_slot(&mut self.operand);
        None
    }

    fn init(&mut self) -> Result<(), FunctionError> {
        self.operand.init()
    }

    fn deinit(&mut self) {
        self.operand.deinit();
    }
}

/// `object.attr = value`. Evaluates to `true`.
#[derive(Debug)]
pub struct SetAttr {
    object: Box<dyn Expr>,
    attr: String,
    value: Box<dyn Expr>,
}

impl SetAttr {
    pub fn new(object: Box<dyn Expr>, attr: &str, value: Box<dyn Expr>) -> Self {
        Self {
            object,
            attr: attr.to_string(),
            value,
        }
    }
}

impl Expr for SetAttr {
    fn name(&self) -> &str {
        "setattr"
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        let value = self
            .value
            .eval(ctx)
            .map_err(|_| ctx.push_error("Failed to evaluate value", self))?;
        let target = eval_target(ctx, self, self.object.as_ref())?;
        if target.is_frozen() {
            return Err(ctx.push_error_info(
                "Object setattr failed, object is readonly",
                self,
                self.attr.clone(),
            ));
        }
        if value.container_ptr().is_some() {
            ctx.store_weak_ref(value.clone());
        }
        if target.set_key(DictKey::from(self.attr.as_str()), value) {
            Ok(Object::from(true))
        } else {
            Err(ctx.push_error_object("Object setattr failed", self, &target))
        }
    }

    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        optimize_slot(&mut self.object);
        optimize_slot(&mut self.value);
        None
    }

    fn init(&mut self) -> Result<(), FunctionError> {
        self.object.init()?;
        self.value.init()
    }

    fn deinit(&mut self) {
        self.object.deinit();
        self.value.deinit();
    }
}

/// `isset(expr)`: whether `expr` refers to an existing value. Never fails.
#[derive(Debug)]
pub struct IsSet {
    target: Box<dyn Expr>,
}

impl IsSet {
    pub fn new(target: Box<dyn Expr>) -> Self {
        Self { target }
    }
}

fn isset(mut args: FunctionArgs) -> Result<Box<dyn Expr>, FunctionError> {
    if args.len() != 1 {
        return Err(args.ctor_fail("expects exactly 1 argument"));
    }
    let target = args
        .get_expr(0)
        .ok_or_else(|| args.ctor_fail("expects exactly 1 argument"))?;
    args.check()?;
    Ok(Box::new(IsSet::new(target)))
}

impl Expr for IsSet {
    fn name(&self) -> &str {
        "isset"
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        Ok(Object::from(self.target.is_set(ctx)))
    }

    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        optimize_slot(&mut self.target);
        None
    }

    fn init(&mut self) -> Result<(), FunctionError> {
        self.target.init()
    }

    fn deinit(&mut self) {
        self.target.deinit();
    }
}

/// `unset(expr, ...)`: remove every referred value. Evaluates to `true`.
#[derive(Debug)]
pub struct Unset {
    targets: Vec<Box<dyn Expr>>,
}

impl Unset {
    pub fn new(targets: Vec<Box<dyn Expr>>) -> Self {
        Self { targets }
    }
}

fn unset(args: FunctionArgs) -> Result<Box<dyn Expr>, FunctionError> {
    if args.is_empty() {
        return Err(args.ctor_fail("expects at least 1 argument"));
    }
    Ok(Box::new(Unset::new(args.into_positional()?)))
}

impl Expr for Unset {
    fn name(&self) -> &str {
        "unset"
    }

    fn eval(&self, ctx: &mut EvalContext<'_>) -> EvalResult {
        for target in &self.targets {
            match target.unset(ctx) {
                Some(Ok(())) => {}
                Some(Err(_)) => return Err(ctx.push_error("Failed to unset", self)),
                None => {
                    return Err(ctx.push_error_info(
                        "Object does not support unset",
                        self,
                        target.name().to_string(),
                    ));
                }
            }
        }
        Ok(Object::from(true))
    }

    fn optimize(&mut self) -> Option<Box<dyn Expr>> {
        for target in &mut self.targets {
            optimize_slot(target);
        }
        None
    }

    fn init(&mut self) -> Result<(), FunctionError> {
        for target in &mut self.targets {
            target.init()?;
        }
        Ok(())
    }

    fn deinit(&mut self) {
        for target in &mut self.targets {
            target.deinit();
        }
    }
}

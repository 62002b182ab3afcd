// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

pub mod datetime;
pub mod strings;
pub mod timestamp;
pub mod typecast;
pub mod utils;

use std::collections::HashMap;

use anyhow::Result;
use lazy_static::lazy_static;
use parking_lot::RwLock;

use crate::error::FunctionError;
use crate::expr::{access, Expr, FunctionArgs, FunctionCall};
use crate::object::Object;

/// A function evaluated on already evaluated arguments.
pub type SimpleFunction = fn(&[Object]) -> Result<Object>;

/// A function that builds its own expression node, validating its
/// arguments once at construction.
pub type FunctionCtor = fn(FunctionArgs) -> Result<Box<dyn Expr>, FunctionError>;

/// Name to implementation table. The first registration of a name wins.
#[derive(Clone, Debug)]
pub struct FunctionRegistry<T> {
    name: &'static str,
    inner: HashMap<String, T>,
}

impl<T: Copy> FunctionRegistry<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    /// Register `item` under `name`. Returns false, keeping the existing
    /// entry, if the name is taken.
    pub fn register(&mut self, name: &str, item: T) -> bool {
        use std::collections::hash_map::Entry;
        match self.inner.entry(name.to_string()) {
            Entry::Occupied(_) => {
                log::warn!("{} registration failed: {name} is already registered", self.name);
                false
            }
            Entry::Vacant(e) => {
                log::debug!("registered {} {name}", self.name);
                e.insert(item);
                true
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<T> {
        self.inner.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl FunctionRegistry<SimpleFunction> {
    pub fn with_builtins() -> Self {
        let mut m = Self::new("simple function");
        typecast::register(&mut m);
        strings::register(&mut m);
        datetime::register(&mut m);
        m
    }
}

impl FunctionRegistry<FunctionCtor> {
    pub fn with_builtins() -> Self {
        let mut m = Self::new("function constructor");
        strings::register_ctors(&mut m);
        datetime::register_ctors(&mut m);
        timestamp::register(&mut m);
        access::register(&mut m);
        m
    }
}

lazy_static! {
    pub static ref SIMPLE_FUNCTIONS: RwLock<FunctionRegistry<SimpleFunction>> =
        RwLock::new(FunctionRegistry::<SimpleFunction>::with_builtins());
    pub static ref FUNCTION_CTORS: RwLock<FunctionRegistry<FunctionCtor>> =
        RwLock::new(FunctionRegistry::<FunctionCtor>::with_builtins());
}

pub fn register_simple_function(name: &str, function: SimpleFunction) -> bool {
    SIMPLE_FUNCTIONS.write().register(name, function)
}

pub fn register_function_ctor(name: &str, ctor: FunctionCtor) -> bool {
    FUNCTION_CTORS.write().register(name, ctor)
}

pub fn lookup_simple_function(name: &str) -> Option<SimpleFunction> {
    SIMPLE_FUNCTIONS.read().lookup(name)
}

pub fn lookup_function_ctor(name: &str) -> Option<FunctionCtor> {
    FUNCTION_CTORS.read().lookup(name)
}

/// Build the node for a call of `name`: a registered constructor first,
/// then a simple function.
pub fn build_function(name: &str, args: FunctionArgs) -> Result<Box<dyn Expr>, FunctionError> {
    if let Some(ctor) = lookup_function_ctor(name) {
        return ctor(args);
    }
    match lookup_simple_function(name) {
        Some(function) => Ok(Box::new(FunctionCall::new(args, function)?)),
        None => Err(FunctionError::NotFound(name.to_string())),
    }
}

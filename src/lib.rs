// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Use README.md as crate documentation.
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

pub mod builtins;
pub mod compare;
pub mod env;
pub mod error;
pub mod eval;
pub mod expr;
pub mod number;
pub mod object;
pub mod options;
pub mod record;
pub mod stash;
pub mod timeutils;

pub use builtins::{build_function, FunctionRegistry};
pub use compare::{compare_objects, CompareMode, CompareOp};
pub use env::Environment;
pub use error::{EvalError, FunctionError};
pub use eval::{EvalContext, EvalFailure, EvalResult};
pub use expr::{CompiledExpr, Expr};
pub use number::GenericNumber;
pub use object::{DictKey, FrozenObject, Object, ObjectType, Scalar, UnixTime, WireType};
pub use options::EvalOptions;
pub use record::{LogRecord, MemoryRecord, TimestampSlot};
pub use stash::{StashSlot, StashedObject};

/// Set up process-wide caches: the epoch-zero datetime and the builtin
/// function tables. Idempotent.
pub fn global_init() {
    object::datetime::init_epoch_cache();
    lazy_static::initialize(&builtins::SIMPLE_FUNCTIONS);
    lazy_static::initialize(&builtins::FUNCTION_CTORS);
    log::debug!("filterx initialized");
}

/// Drop the process-wide caches set up by [`global_init`]. Objects created
/// afterwards are allocated individually.
pub fn global_deinit() {
    object::datetime::deinit_epoch_cache();
    timeutils::TimezoneCache::clear();
}

#[cfg(test)]
mod tests;

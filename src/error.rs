// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt;

use thiserror::Error;

/// Errors raised while building or initializing an expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionError {
    /// Wrong argument count, non-literal argument where a literal is
    /// required, invalid literal value, ...
    #[error("{function}: {message}")]
    CtorFail { function: String, message: String },

    /// A named argument the function never consumed.
    #[error("{function}: unexpected argument \"{name}\"")]
    UnexpectedArgs { function: String, name: String },

    /// No simple function or constructor is registered under the name.
    #[error("function not found: {0}")]
    NotFound(String),

    /// A lifecycle step was invoked out of order.
    #[error("invalid expression state: {0}")]
    InvalidState(String),
}

impl FunctionError {
    pub fn ctor_fail(function: &str, message: impl Into<String>) -> Self {
        FunctionError::CtorFail {
            function: function.to_string(),
            message: message.into(),
        }
    }
}

/// One entry of the per-evaluation error stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalError {
    /// What went wrong.
    pub message: String,
    /// Description of the expression that failed.
    pub expr: String,
    /// Optional extra context, e.g. the offending value.
    pub info: Option<String>,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.expr, self.message)?;
        if let Some(info) = &self.info {
            write!(f, " ({info})")?;
        }
        Ok(())
    }
}

impl core::error::Error for EvalError {}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::HashMap;

use crate::error::EvalError;
use crate::expr::Expr;
use crate::object::Object;
use crate::options::EvalOptions;
use crate::record::LogRecord;

/// Marker returned by a failed evaluation.
///
/// It can only be obtained by pushing an error onto an [`EvalContext`], so a
/// failed `eval` always leaves a diagnostic behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalFailure {
    _private: (),
}

pub type EvalResult = Result<Object, EvalFailure>;

/// Per-evaluation state: the record being processed, local variables, the
/// error stack and weakly referenced objects.
pub struct EvalContext<'r> {
    record: Option<&'r mut dyn LogRecord>,
    options: EvalOptions,
    variables: HashMap<String, Object>,
    errors: Vec<EvalError>,
    dropped_errors: usize,
    weak_refs: Vec<Object>,
}

impl<'r> EvalContext<'r> {
    pub fn new() -> Self {
        Self::with_options(EvalOptions::default())
    }

    pub fn with_options(options: EvalOptions) -> Self {
        Self {
            record: None,
            options,
            variables: HashMap::new(),
            errors: Vec::new(),
            dropped_errors: 0,
            weak_refs: Vec::new(),
        }
    }

    pub fn for_record(record: &'r mut dyn LogRecord) -> Self {
        let mut ctx = Self::new();
        ctx.record = Some(record);
        ctx
    }

    pub fn set_record(&mut self, record: &'r mut dyn LogRecord) {
        self.record = Some(record);
    }

    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    pub fn record(&self) -> Option<&(dyn LogRecord + 'r)> {
        match &self.record {
            Some(record) => Some(&**record),
            None => None,
        }
    }

    pub fn record_mut(&mut self) -> Option<&mut (dyn LogRecord + 'r)> {
        match &mut self.record {
            Some(record) => Some(&mut **record),
            None => None,
        }
    }

    pub fn variable(&self, name: &str) -> Option<&Object> {
        self.variables.get(name)
    }

    pub fn set_variable(&mut self, name: &str, value: Object) {
        self.variables.insert(name.to_string(), value);
    }

    pub fn unset_variable(&mut self, name: &str) -> bool {
        self.variables.remove(name).is_some()
    }

    /// Record an error raised by `expr` and return the failure marker.
    pub fn push_error(&mut self, message: impl Into<String>, expr: &dyn Expr) -> EvalFailure {
        self.push(EvalError {
            message: message.into(),
            expr: expr.name().to_string(),
            info: None,
        })
    }

    /// Like [`EvalContext::push_error`], with extra context.
    pub fn push_error_info(
        &mut self,
        message: impl Into<String>,
        expr: &dyn Expr,
        info: impl Into<String>,
    ) -> EvalFailure {
        self.push(EvalError {
            message: message.into(),
            expr: expr.name().to_string(),
            info: Some(info.into()),
        })
    }

    /// Record an error about `object`; its repr becomes the extra context.
    pub fn push_error_object(
        &mut self,
        message: impl Into<String>,
        expr: &dyn Expr,
        object: &Object,
    ) -> EvalFailure {
        let info = format!("{}: {}", object.type_of(), object.repr());
        self.push_error_info(message, expr, info)
    }

    fn push(&mut self, error: EvalError) -> EvalFailure {
        log::debug!("filterx error: {error}");
        if self.errors.len() < self.options.max_errors {
            self.errors.push(error);
        } else {
            self.dropped_errors += 1;
        }
        EvalFailure { _private: () }
    }

    pub fn errors(&self) -> &[EvalError] {
        &self.errors
    }

    pub fn last_error(&self) -> Option<&EvalError> {
        self.errors.last()
    }

    /// Errors that did not fit on the stack.
    pub fn dropped_errors(&self) -> usize {
        self.dropped_errors
    }

    /// Number of errors pushed so far, stored or not.
    pub fn error_count(&self) -> usize {
        self.errors.len() + self.dropped_errors
    }

    /// Forget the errors pushed after [`EvalContext::error_count`] returned
    /// `count`.
    pub fn truncate_errors(&mut self, count: usize) {
        if count <= self.errors.len() {
            self.errors.truncate(count);
            self.dropped_errors = 0;
        } else {
            self.dropped_errors = self.dropped_errors.min(count - self.errors.len());
        }
    }

    pub fn take_errors(&mut self) -> Vec<EvalError> {
        self.dropped_errors = 0;
        core::mem::take(&mut self.errors)
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
        self.dropped_errors = 0;
    }

    /// All errors, innermost first, one per line.
    pub fn format_errors(&self) -> String {
        let mut lines: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        if self.dropped_errors > 0 {
            lines.push(format!("... {} more", self.dropped_errors));
        }
        lines.join("\n")
    }

    /// Keep `object` alive until [`EvalContext::end`].
    pub fn store_weak_ref(&mut self, object: Object) {
        if self.options.weak_refs {
            self.weak_refs.push(object);
        }
    }

    pub fn weak_ref_count(&self) -> usize {
        self.weak_refs.len()
    }

    /// Evaluate `expr` as a filter: success iff it yields a truthy value.
    pub fn exec(&mut self, expr: &dyn Expr) -> Result<bool, EvalFailure> {
        let result = expr.eval(self)?;
        Ok(result.truthy())
    }

    /// Finish the evaluation: drop variables and weak references.
    pub fn end(&mut self) {
        self.variables.clear();
        self.weak_refs.clear();
    }
}

impl Default for EvalContext<'_> {
    fn default() -> Self {
        Self::new()
    }
}

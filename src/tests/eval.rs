// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::eval::{EvalContext, EvalResult};
use crate::expr::{Expr, MessageField};
use crate::object::{Object, WireType};
use crate::options::EvalOptions;
use crate::record::{LogRecord, MemoryRecord, TimestampSlot};

use anyhow::Result;

#[derive(Debug)]
struct Node;

impl Expr for Node {
    fn name(&self) -> &str {
        "node"
    }

    fn eval(&self, _ctx: &mut EvalContext<'_>) -> EvalResult {
        Ok(Object::null())
    }
}

fn with_max_errors(max_errors: usize) -> EvalContext<'static> {
    EvalContext::with_options(EvalOptions {
        max_errors,
        ..EvalOptions::default()
    })
}

#[test]
fn error_stack_is_capped() {
    let mut ctx = with_max_errors(2);
    for i in 0..5 {
        let _ = ctx.push_error(format!("error {i}"), &Node);
    }
    assert_eq!(ctx.errors().len(), 2);
    assert_eq!(ctx.dropped_errors(), 3);
    assert_eq!(ctx.error_count(), 5);
    assert_eq!(ctx.format_errors(), "node: error 0\nnode: error 1\n... 3 more");

    let taken = ctx.take_errors();
    assert_eq!(taken.len(), 2);
    assert_eq!(ctx.error_count(), 0);
}

#[test]
fn errors_carry_context() {
    let mut ctx = EvalContext::new();
    let _ = ctx.push_error_object("bad value", &Node, &Object::from(7i64));
    let error = ctx.last_error().expect("pushed");
    assert_eq!(error.expr, "node");
    assert_eq!(error.info.as_deref(), Some("integer: 7"));
    assert_eq!(error.to_string(), "node: bad value (integer: 7)");
}

#[test]
fn truncating_errors() {
    let mut ctx = with_max_errors(2);
    let _ = ctx.push_error("kept", &Node);
    let mark = ctx.error_count();
    for _ in 0..3 {
        let _ = ctx.push_error("transient", &Node);
    }
    assert_eq!(ctx.error_count(), 4);

    ctx.truncate_errors(mark);
    assert_eq!(ctx.error_count(), 1);
    assert_eq!(ctx.errors()[0].message, "kept");

    ctx.clear_errors();
    assert!(ctx.errors().is_empty());
}

#[test]
fn weak_refs_live_until_end() {
    let mut ctx = EvalContext::new();
    ctx.store_weak_ref(Object::new_list());
    ctx.set_variable("v", Object::from(1i64));
    assert_eq!(ctx.weak_ref_count(), 1);

    ctx.end();
    assert_eq!(ctx.weak_ref_count(), 0);
    assert!(ctx.variable("v").is_none());

    let mut ctx = EvalContext::with_options(EvalOptions {
        weak_refs: false,
        ..EvalOptions::default()
    });
    ctx.store_weak_ref(Object::new_list());
    assert_eq!(ctx.weak_ref_count(), 0);
}

#[test]
fn variables() {
    let mut ctx = EvalContext::new();
    assert!(ctx.variable("x").is_none());
    ctx.set_variable("x", Object::from("a"));
    ctx.set_variable("x", Object::from("b"));
    assert_eq!(ctx.variable("x").map(Object::str).as_deref(), Some("b"));
    assert!(ctx.unset_variable("x"));
    assert!(!ctx.unset_variable("x"));
}

#[test]
fn record_fields_are_message_values() {
    let mut record = MemoryRecord::new().with_field("PID", "42", WireType::Integer);
    let mut ctx = EvalContext::for_record(&mut record);

    let value = MessageField::new("PID").eval(&mut ctx);
    assert_eq!(value.ok().and_then(|v| v.extract_integer()), Some(42));

    assert!(MessageField::new("MISSING").eval(&mut ctx).is_err());
    assert_eq!(
        ctx.last_error().map(|e| e.message.as_str()),
        Some("no such field")
    );

    let mut detached = EvalContext::new();
    assert!(MessageField::new("PID").eval(&mut detached).is_err());
}

#[test]
fn memory_record_timestamps() {
    let mut record = MemoryRecord::new();
    assert_eq!(record.timestamp(TimestampSlot::Recvd), crate::UnixTime::EPOCH);

    let ut = crate::UnixTime::new(1710765240, 5, Some(3600));
    record.set_timestamp(TimestampSlot::Recvd, ut);
    assert_eq!(record.timestamp(TimestampSlot::Recvd), ut);
    assert_eq!(record.timestamp(TimestampSlot::Stamp), crate::UnixTime::EPOCH);
}

#[test]
fn options_from_json() -> Result<()> {
    let options = EvalOptions::from_json_str(r#"{ "default_timezone": "UTC", "max_errors": 3 }"#)?;
    assert_eq!(options.default_timezone.as_deref(), Some("UTC"));
    assert_eq!(options.max_errors, 3);
    assert!(options.weak_refs);

    assert!(EvalOptions::from_json_str(r#"{ "max_error": 3 }"#).is_err());
    Ok(())
}

#[cfg(feature = "yaml")]
#[test]
fn options_from_yaml() -> Result<()> {
    let options = EvalOptions::from_yaml_str("max_errors: 1\nweak_refs: false\n")?;
    assert_eq!(options.max_errors, 1);
    assert!(!options.weak_refs);
    assert_eq!(options.default_timezone, None);
    Ok(())
}

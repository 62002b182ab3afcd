// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::BTreeMap;

use crate::common::{init_logging, Operand};

use anyhow::{bail, Result};
use filterx::expr::{
    And, Comparison, FunctionArg, FunctionArgs, Literal, MessageField, Not,
};
use filterx::*;
use serde::{Deserialize, Serialize};
use test_generator::test_resources;

#[derive(Serialize, Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TestCase {
    note: String,
    function: String,
    #[serde(default)]
    args: Vec<Operand>,
    #[serde(default)]
    named: BTreeMap<String, Operand>,
    want: Option<serde_json::Value>,
    want_repr: Option<String>,
    want_type: Option<ObjectType>,
    want_ctor_error: Option<String>,
    want_eval_error: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
struct YamlTest {
    cases: Vec<TestCase>,
}

fn literal_arg(operand: &Operand) -> Box<dyn Expr> {
    Box::new(Literal::new(operand.to_object()))
}

fn build(case: &TestCase) -> Result<CompiledExpr, FunctionError> {
    let mut args: Vec<FunctionArg> = case
        .args
        .iter()
        .map(|a| FunctionArg::positional(literal_arg(a)))
        .collect();
    for (name, operand) in &case.named {
        args.push(FunctionArg::named(name, literal_arg(operand)));
    }
    let root = build_function(&case.function, FunctionArgs::new(&case.function, args)?)?;
    let mut compiled = CompiledExpr::new(root);
    compiled.optimize()?;
    compiled.init()?;
    Ok(compiled)
}

fn run_case(case: &TestCase) -> Result<()> {
    let compiled = match (build(case), &case.want_ctor_error) {
        (Ok(_), Some(want)) => bail!("expected construction to fail with `{want}`"),
        (Err(e), Some(want)) => {
            if !e.to_string().contains(want.as_str()) {
                bail!("construction failed with `{e}`, want `{want}`");
            }
            return Ok(());
        }
        (Err(e), None) => bail!("construction failed: {e}"),
        (Ok(compiled), None) => compiled,
    };

    let mut ctx = EvalContext::new();
    let result = compiled.eval(&mut ctx);
    match (result, &case.want_eval_error) {
        (Ok(value), Some(want)) => {
            bail!("expected `{want}`, got `{}`", value.repr())
        }
        (Err(_), Some(want)) => {
            let errors = ctx.format_errors();
            if !errors.contains(want.as_str()) {
                bail!("evaluation failed with `{errors}`, want `{want}`");
            }
        }
        (Err(_), None) => bail!("evaluation failed: {}", ctx.format_errors()),
        (Ok(value), None) => {
            if let Some(want) = &case.want {
                let got = value.to_json();
                if got != *want {
                    bail!("got {got}, want {want}");
                }
            }
            if let Some(want) = &case.want_repr {
                if value.repr() != *want {
                    bail!("got repr `{}`, want `{want}`", value.repr());
                }
            }
            if let Some(want) = case.want_type {
                if value.type_of() != want {
                    bail!("got type {}, want {want}", value.type_of());
                }
            }
        }
    }
    Ok(())
}

fn yaml_test_impl(file: &str) -> Result<()> {
    let yaml_str = std::fs::read_to_string(file)?;
    let test: YamlTest = serde_yaml::from_str(&yaml_str)?;

    println!("running {file}");
    init_logging();
    global_init();

    for case in &test.cases {
        print!("case {} ", case.note);
        if let Err(e) = run_case(case) {
            bail!("{}: {}(...): {e}", case.note, case.function);
        }
        println!("passed");
    }

    Ok(())
}

fn yaml_test(file: &str) -> Result<()> {
    match yaml_test_impl(file) {
        Ok(_) => Ok(()),
        Err(e) => {
            // If Err is returned, it doesn't always get printed by cargo test.
            // Therefore, panic with the error.
            panic!("{}", e);
        }
    }
}

#[test_resources("tests/functions/cases/*.yaml")]
fn run(path: &str) {
    yaml_test(path).unwrap()
}

fn call(name: &str, args: Vec<Box<dyn Expr>>) -> Result<Box<dyn Expr>> {
    Ok(build_function(name, FunctionArgs::from_exprs(name, args))?)
}

/// `startswith($PROGRAM, "ssh") and not int($PID) < 100`
fn sshd_filter() -> Result<CompiledExpr> {
    let prefix = call(
        "startswith",
        vec![
            Box::new(MessageField::new("PROGRAM")),
            Box::new(Literal::new("ssh")),
        ],
    )?;
    let pid = call("int", vec![Box::new(MessageField::new("PID"))])?;
    let low_pid = Comparison::new(
        pid,
        Box::new(Literal::new(100i64)),
        CompareMode::TypeAware,
        CompareOp::LT,
    )?;
    let root = And::new(prefix, Box::new(Not::new(Box::new(low_pid))));

    let mut compiled = CompiledExpr::new(Box::new(root));
    compiled.optimize()?;
    compiled.init()?;
    Ok(compiled)
}

#[test]
fn filter_over_records() -> Result<()> {
    global_init();
    let filter = sshd_filter()?;

    let mut matching = MemoryRecord::new()
        .with_field("PROGRAM", "sshd", WireType::String)
        .with_field("PID", "4242", WireType::Integer);
    let mut ctx = EvalContext::for_record(&mut matching);
    assert_eq!(filter.exec(&mut ctx), Ok(true));
    assert!(ctx.errors().is_empty());
    ctx.end();

    let mut low_pid = MemoryRecord::new()
        .with_field("PROGRAM", "sshd", WireType::String)
        .with_field("PID", "12", WireType::Integer);
    let mut ctx = EvalContext::for_record(&mut low_pid);
    assert_eq!(filter.exec(&mut ctx), Ok(false));

    let mut other = MemoryRecord::new()
        .with_field("PROGRAM", "cron", WireType::String)
        .with_field("PID", "4242", WireType::Integer);
    let mut ctx = EvalContext::for_record(&mut other);
    assert_eq!(filter.exec(&mut ctx), Ok(false));
    Ok(())
}

#[test]
fn failures_report_the_chain() -> Result<()> {
    global_init();
    let filter = sshd_filter()?;

    let mut missing_pid = MemoryRecord::new().with_field("PROGRAM", "sshd", WireType::String);
    let mut ctx = EvalContext::for_record(&mut missing_pid);
    assert!(filter.exec(&mut ctx).is_err());
    let errors = ctx.format_errors();
    assert!(errors.starts_with("PID: no such field"), "{errors}");
    assert!(errors.contains("int: Failed to evaluate argument"), "{errors}");
    Ok(())
}

#[test]
fn one_tree_many_threads() -> Result<()> {
    global_init();
    let filter = sshd_filter()?;

    std::thread::scope(|s| {
        for t in 0..4i64 {
            let filter = &filter;
            s.spawn(move || {
                for i in 0..200i64 {
                    let pid = (t * 200 + i).to_string();
                    let mut record = MemoryRecord::new()
                        .with_field("PROGRAM", "sshd", WireType::String)
                        .with_field("PID", &pid, WireType::Integer);
                    let mut ctx = EvalContext::for_record(&mut record);
                    let want = t * 200 + i >= 100;
                    assert_eq!(filter.exec(&mut ctx), Ok(want));
                }
            });
        }
    });
    Ok(())
}

#[test]
fn uninitialized_trees_refuse_to_run() -> Result<()> {
    let root = call("len", vec![Box::new(Literal::new("abc"))])?;
    let compiled = CompiledExpr::new(root);
    let mut ctx = EvalContext::new();
    assert!(compiled.eval(&mut ctx).is_err());
    assert_eq!(
        ctx.last_error().map(|e| e.message.as_str()),
        Some("expression is not initialized")
    );
    Ok(())
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::BTreeMap;

use crate::common::{init_logging, Operand};

use anyhow::{bail, Result};
use filterx::{compare_objects, CompareMode, CompareOp};
use serde::{Deserialize, Serialize};
use test_generator::test_resources;

#[derive(Serialize, Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TestCase {
    note: String,
    mode: CompareMode,
    lhs: Operand,
    rhs: Operand,
    // Operator symbol mapped to the expected result.
    want: BTreeMap<String, bool>,
}

#[derive(Serialize, Deserialize, Debug)]
struct YamlTest {
    cases: Vec<TestCase>,
}

fn yaml_test_impl(file: &str) -> Result<()> {
    let yaml_str = std::fs::read_to_string(file)?;
    let test: YamlTest = serde_yaml::from_str(&yaml_str)?;

    println!("running {file}");
    init_logging();

    for case in test.cases {
        print!("case {} ", case.note);
        let lhs = case.lhs.to_object();
        let rhs = case.rhs.to_object();
        for (symbol, want) in &case.want {
            let Some(op) = CompareOp::from_symbol(symbol) else {
                bail!("{}: unknown operator `{symbol}`", case.note);
            };
            let got = compare_objects(&lhs, &rhs, case.mode, op);
            if got != *want {
                bail!(
                    "{}: {} {symbol} {} in {:?} mode: got {got}, want {want}",
                    case.note,
                    lhs.repr(),
                    rhs.repr(),
                    case.mode
                );
            }
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

#[test_resources("tests/compare/cases/*.yaml")]
fn run(path: &str) {
    yaml_test(path).unwrap()
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)] // test harness asserts and unwraps to validate engine behavior

mod compare;
mod env;
mod eval;
mod number;
mod object;

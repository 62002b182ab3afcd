// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

mod common;
mod compare;
mod functions;
mod stash;

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Runtime options of an evaluation.
///
/// Options are plain data and can be loaded from JSON (or YAML with the
/// `yaml` feature):
///
/// ```json
/// { "default_timezone": "Europe/Budapest", "max_errors": 4 }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvalOptions {
    /// Timezone assumed for parsed timestamps that carry no UTC offset.
    /// UTC when unset.
    pub default_timezone: Option<String>,

    /// Depth of the error stack. Errors beyond it are counted but dropped.
    pub max_errors: usize,

    /// Keep weakly referenced objects alive until the evaluation ends.
    pub weak_refs: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            default_timezone: None,
            max_errors: 8,
            weak_refs: true,
        }
    }
}

impl EvalOptions {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for directable
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DirectableConfig {
    /// Classification settings
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Output configuration
    #[serde(default)]
    pub output: Option<OutputConfig>,
}

/// Settings that change classification outcomes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Path prefixes of system headers; declarations under them are never named
    #[serde(default = "default_system_prefixes")]
    pub system_prefixes: Vec<String>,

    /// Compiler-synthesized methods skipped in class implementations
    #[serde(default = "default_teardown_selectors")]
    pub teardown_selectors: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            system_prefixes: default_system_prefixes(),
            teardown_selectors: default_teardown_selectors(),
        }
    }
}

pub fn default_system_prefixes() -> Vec<String> {
    vec!["/Applications/Xcode".to_string()]
}

pub fn default_teardown_selectors() -> Vec<String> {
    vec![".cxx_destruct".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Format used when `--format` is not given
    #[serde(default)]
    pub default_format: Option<OutputFormat>,

    /// Directory per-unit reports are written to when `--output-dir` is not given
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl DirectableConfig {
    pub fn default_format(&self) -> Option<OutputFormat> {
        self.output.as_ref().and_then(|o| o.default_format)
    }

    pub fn output_directory(&self) -> Option<&PathBuf> {
        self.output.as_ref().and_then(|o| o.directory.as_ref())
    }
}

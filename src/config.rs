//! Generator configuration.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::available::AvailableJs;
use crate::error::{GenerateError, Result};

/// Input sources, the single destination and the function-availability globs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// JavaScript sources that use the generated helpers; copied ahead of the block.
    #[serde(default)]
    pub inputs: Vec<PathBuf>,
    /// File receiving the inputs and the generated helpers.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Globs like `goog.*` naming functions available where the output runs.
    #[serde(default)]
    pub js_defined: Vec<String>,
}

impl GeneratorConfig {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: Some(output.into()),
            ..Self::default()
        }
    }

    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.inputs.push(input.into());
        self
    }

    pub fn with_js_defined(mut self, glob: impl Into<String>) -> Self {
        self.js_defined.push(glob.into());
        self
    }

    /// Checks every path before any generation work and returns the destination.
    pub fn validate(&self) -> Result<&Path> {
        let output = self
            .output
            .as_deref()
            .ok_or_else(|| GenerateError::config("please specify an output file"))?;
        if output.is_dir() {
            return Err(GenerateError::config(format!(
                "cannot write output file {}: it is a directory",
                output.display()
            )));
        }
        let parent = match output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if !parent.is_dir() {
            return Err(GenerateError::config(format!(
                "cannot write output file {}: missing directory {}",
                output.display(),
                parent.display()
            )));
        }

        let existing = if output.exists() { output } else { parent };
        if fs::metadata(existing).is_ok_and(|m| m.permissions().readonly()) {
            return Err(GenerateError::config(format!(
                "cannot write output file {}: {} is read-only",
                output.display(),
                existing.display()
            )));
        }

        for input in &self.inputs {
            if !input.is_file() || File::open(input).is_err() {
                return Err(GenerateError::config(format!(
                    "missing input file {}",
                    input.display()
                )));
            }
        }
        Ok(output)
    }

    pub fn available_js(&self) -> Result<AvailableJs> {
        AvailableJs::new(&self.js_defined)
    }
}

//! Pipeline entry point.

use std::path::PathBuf;

use tracing::info;

use crate::codegen::generate_javascript;
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::escaper::EscaperDefinition;
use crate::merge::{assemble, write_output};

/// Regenerates the destination file from the configured inputs and `escapers`.
///
/// The output is buffered in full and written only once generation has succeeded.
/// Returns the destination path.
pub fn run(config: &GeneratorConfig, escapers: &[EscaperDefinition]) -> Result<PathBuf> {
    let output = config.validate()?;
    let available = config.available_js()?;

    info!(
        inputs = config.inputs.len(),
        escapers = escapers.len(),
        output = %output.display(),
        "generating escaper helpers"
    );

    let block = generate_javascript(escapers, &available)?;
    let contents = assemble(&config.inputs, &block)?;
    write_output(output, &contents)?;
    Ok(output.to_path_buf())
}

//! Idempotent merging of input sources with the generated block.
//!
//! Code between the generated-code markers is dropped from every input, so an old output
//! can be fed back in as an input and the latest block comes out.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::codegen::{GENERATED_CODE_END_MARKER, GENERATED_CODE_START_MARKER};
use crate::error::{GenerateError, Result};

/// Returns `source` without any generated block, each kept line newline-terminated.
///
/// Lines outside the markers are kept verbatim with one exception: a blank line directly
/// before a start marker is the separator written ahead of the block and goes with it.
/// Without that, every rerun on a previous output would add one more blank line.
pub fn strip_generated(source: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut in_generated_code = false;
    for line in source.lines() {
        let trimmed = line.trim();
        if in_generated_code {
            if trimmed == GENERATED_CODE_END_MARKER {
                in_generated_code = false;
            }
        } else if trimmed == GENERATED_CODE_START_MARKER {
            in_generated_code = true;
            if kept.last().is_some_and(|l| l.trim().is_empty()) {
                kept.pop();
            }
        } else {
            kept.push(line);
        }
    }

    let mut out = String::with_capacity(source.len());
    for line in kept {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Concatenates the non-generated content of every input, each followed by a blank line,
/// then appends `block`.
pub fn assemble(inputs: &[PathBuf], block: &str) -> Result<String> {
    let mut buf = String::new();
    for input in inputs {
        let source = fs::read_to_string(input).map_err(|source| GenerateError::Read {
            path: input.clone(),
            source,
        })?;
        debug!(path = %input.display(), bytes = source.len(), "read input");
        buf.push_str(&strip_generated(&source));
        buf.push('\n');
    }
    buf.push_str(block);
    Ok(buf)
}

/// Removes the destination on drop unless the write was committed.
pub(crate) struct PartialFile<'a> {
    pub(crate) path: &'a Path,
    pub(crate) committed: bool,
}

impl Drop for PartialFile<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        // Do not leave a truncated file with a fresh timestamp.
        match fs::remove_file(self.path) {
            Ok(()) => warn!(path = %self.path.display(), "removed partially written output"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove partial output"),
        }
    }
}

/// Writes the fully assembled buffer to `path`.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    let write_err = |source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).map_err(write_err)?;
    let mut guard = PartialFile {
        path,
        committed: false,
    };
    file.write_all(contents.as_bytes()).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    drop(file);
    guard.committed = true;

    info!(path = %path.display(), bytes = contents.len(), "wrote output");
    Ok(())
}

//! Availability of JavaScript functions in the environment the output runs in.

use regex::Regex;

use crate::error::{GenerateError, Result};

/// Decides whether a JavaScript function name can be called from generated code.
///
/// Unqualified names (builtins like `encodeURIComponent`) are always available. A
/// qualified name such as `goog.string.htmlEscape` is available only when it matches one
/// of the configured globs, where `*` stands for a run of identifier characters.
#[derive(Debug, Clone, Default)]
pub struct AvailableJs {
    patterns: Vec<Regex>,
}

impl AvailableJs {
    pub fn new<S: AsRef<str>>(globs: &[S]) -> Result<Self> {
        let patterns = globs
            .iter()
            .map(|g| glob_to_regex(g.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Only builtins.
    pub fn builtins_only() -> Self {
        Self::default()
    }

    pub fn is_available(&self, name: &str) -> bool {
        !name.contains('.') || self.patterns.iter().any(|p| p.is_match(name))
    }
}

/// `goog.*` -> `^goog\.[A-Za-z0-9_]+$`
fn glob_to_regex(glob: &str) -> Result<Regex> {
    if glob.is_empty() {
        return Err(GenerateError::config(
            "please specify a non-empty pattern for --js-defined",
        ));
    }
    let body = glob
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("[A-Za-z0-9_]+");
    Regex::new(&format!("^(?:{})$", body))
        .map_err(|e| GenerateError::config(format!("bad --js-defined pattern {}: {}", glob, e)))
}

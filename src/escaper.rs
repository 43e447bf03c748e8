//! Escaper data model.
//!
//! Escaping directives are plain records. The generator never dispatches on the kind of
//! escaper; everything it needs is in [`EscaperDefinition`].

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// DEFINITION TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// A single plain character and the text that replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Escape {
    pub plain: char,
    pub escaped: String,
}

/// Mode flags of a host pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternFlags {
    #[serde(default)]
    pub case_insensitive: bool,
    #[serde(default)]
    pub multiline: bool,
    #[serde(default)]
    pub dot_all: bool,
}

/// A value-validation pattern written in host regex syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueFilter {
    pub pattern: String,
    #[serde(default)]
    pub flags: PatternFlags,
}

impl ValueFilter {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            flags: PatternFlags::default(),
        }
    }

    pub fn case_insensitive(mut self) -> Self {
        self.flags.case_insensitive = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscaperDefinition {
    /// Directive name as written in templates, e.g. `|escapeHtml` or `escapeHtml`.
    pub directive_name: String,
    #[serde(default)]
    pub escapes: Vec<Escape>,
    #[serde(default)]
    pub value_filter: Option<ValueFilter>,
    /// Prefix for non-ASCII characters missing from the escape map.
    #[serde(default)]
    pub non_ascii_prefix: Option<String>,
    /// Safe output substituted when the value filter rejects a value.
    #[serde(default)]
    pub innocuous_output: String,
    /// Pre-existing JavaScript functions that implement this directive.
    #[serde(default)]
    pub js_function_names: Vec<String>,
}

impl EscaperDefinition {
    pub fn new(directive_name: impl Into<String>) -> Self {
        Self {
            directive_name: directive_name.into(),
            escapes: Vec::new(),
            value_filter: None,
            non_ascii_prefix: None,
            innocuous_output: String::new(),
            js_function_names: Vec::new(),
        }
    }

    pub fn escape(mut self, plain: char, escaped: impl Into<String>) -> Self {
        self.escapes.push(Escape {
            plain,
            escaped: escaped.into(),
        });
        self
    }

    pub fn escapes<'a>(mut self, pairs: impl IntoIterator<Item = (char, &'a str)>) -> Self {
        for (plain, escaped) in pairs {
            self = self.escape(plain, escaped);
        }
        self
    }

    pub fn filter(mut self, filter: ValueFilter) -> Self {
        self.value_filter = Some(filter);
        self
    }

    pub fn innocuous(mut self, output: impl Into<String>) -> Self {
        self.innocuous_output = output.into();
        self
    }

    pub fn non_ascii_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.non_ascii_prefix = Some(prefix.into());
        self
    }

    pub fn js_function(mut self, name: impl Into<String>) -> Self {
        self.js_function_names.push(name.into());
        self
    }

    /// `|escapeHtml` -> `escapeHtml`
    pub fn ident(&self) -> &str {
        self.directive_name.trim_start_matches('|')
    }

    /// `escapeHtml` -> `ESCAPE_HTML`
    pub fn upper_ident(&self) -> String {
        to_upper_underscore(self.ident())
    }
}

/// Converts a lowerCamel identifier into UPPER_UNDERSCORE form.
pub fn to_upper_underscore(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            result.push('_');
        }
        result.push(c.to_ascii_uppercase());
    }
    result
}

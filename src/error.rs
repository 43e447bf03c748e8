//! Error types for escaper code generation.
//!
//! Every failure aborts the whole run. Nothing is retried and no destination file is
//! left behind, so the variants below are purely diagnostic.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_CONFIGURATION: &str = "ESC-CONFIG";
pub const ERR_AMBIGUOUS_ESCAPE: &str = "ESC-AMBIGUOUS";
pub const ERR_ASTRAL_ESCAPE: &str = "ESC-ASTRAL";
pub const ERR_UNSUPPORTED_PATTERN: &str = "ESC-PATTERN";
pub const ERR_UNIMPLEMENTED: &str = "ESC-UNIMPLEMENTED";
pub const ERR_READ: &str = "ESC-READ";
pub const ERR_WRITE: &str = "ESC-WRITE";
pub const ERR_REGISTRY: &str = "ESC-REGISTRY";

/// A host regex feature with no safe mechanical JavaScript equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedFeature {
    /// `(?<=...)` and `(?<!...)`.
    Lookbehind,
    /// `(?<name>...)`.
    NamedGroup,
    /// The "dot matches newline" mode, as a compile flag or inline `(?s)`.
    DotAll,
    /// `\p{...}` / `\P{...}` classes.
    NamedClass,
    /// Inline mode groups such as `(?i)` or `(?m:...)`.
    InlineFlags,
    /// `\Z`, end of input before an optional final line terminator.
    LenientEndAnchor,
    /// `\G`.
    ContinuationAnchor,
    /// `(?>...)`.
    AtomicGroup,
    /// `*+`, `++`, `?+` and `{n,m}+`.
    PossessiveQuantifier,
    /// `[a-z&&[^aeiou]]` and other nested classes.
    ClassIntersection,
}

impl fmt::Display for UnsupportedFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnsupportedFeature::Lookbehind => "lookbehind",
            UnsupportedFeature::NamedGroup => "named groups",
            UnsupportedFeature::DotAll => "DOTALL",
            UnsupportedFeature::NamedClass => "named character classes",
            UnsupportedFeature::InlineFlags => "inline mode flags",
            UnsupportedFeature::LenientEndAnchor => "the \\Z anchor",
            UnsupportedFeature::ContinuationAnchor => "the \\G anchor",
            UnsupportedFeature::AtomicGroup => "atomic groups",
            UnsupportedFeature::PossessiveQuantifier => "possessive quantifiers",
            UnsupportedFeature::ClassIntersection => "nested character classes",
        })
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("ambiguous escape {escaped:?} for {plain:?} in {directive}")]
    AmbiguousEscape {
        directive: String,
        plain: char,
        escaped: String,
    },

    #[error("{directive} escapes {plain:?} which is outside the Basic Multilingual Plane")]
    AstralEscape { directive: String, plain: char },

    #[error("pattern /{pattern}/ for {directive} uses {feature}")]
    UnsupportedPattern {
        directive: String,
        pattern: String,
        feature: UnsupportedFeature,
    },

    #[error("{feature} not implemented yet ({directive})")]
    Unimplemented { directive: String, feature: String },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid escaper registry: {0}")]
    Registry(String),
}

impl GenerateError {
    /// Stable code printed alongside the message by drivers.
    pub fn code(&self) -> &'static str {
        match self {
            GenerateError::Configuration(_) => ERR_CONFIGURATION,
            GenerateError::AmbiguousEscape { .. } => ERR_AMBIGUOUS_ESCAPE,
            GenerateError::AstralEscape { .. } => ERR_ASTRAL_ESCAPE,
            GenerateError::UnsupportedPattern { .. } => ERR_UNSUPPORTED_PATTERN,
            GenerateError::Unimplemented { .. } => ERR_UNIMPLEMENTED,
            GenerateError::Read { .. } => ERR_READ,
            GenerateError::Write { .. } => ERR_WRITE,
            GenerateError::Registry(_) => ERR_REGISTRY,
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        GenerateError::Configuration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, GenerateError>;

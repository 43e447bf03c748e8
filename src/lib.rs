//! # Escaper Helper Generator
//!
//! Build-time generator for the JavaScript helpers behind the template system's
//! contextual auto-escaping. Given a registry of escaping directives (`|escapeHtml`,
//! `|escapeJsString`, `|filterNormalizeUri`, ...) it emits:
//!
//! 1. **Escape maps** from characters to replacement text, merged across directives whose
//!    maps agree on every shared character (`ESCAPE_HTML__AND__NORMALIZE_HTML`).
//! 2. **Matchers**, one global character class per distinct set of escaped characters,
//!    with consecutive code points collapsed into ranges.
//! 3. **Filters**, value-validation patterns translated from host regex syntax. Lookbehind,
//!    DOTALL and named character classes are rejected, never approximated.
//! 4. **Helpers**, one `soy.esc.$$<directive>Helper` per directive, either delegating to a
//!    function already available in the environment or built from the tables above.
//!
//! The helpers land between two marker lines in the destination file. Every run drops
//! any previous block from its inputs, so feeding an old output back in is safe.

#[cfg(feature = "napi")]
mod node;

pub mod available;
pub mod codegen;
pub mod config;
pub mod digest;
pub mod error;
pub mod escape_map;
pub mod escaper;
pub mod filter;
pub mod generate;
pub mod js;
pub mod merge;
pub mod registry;

#[cfg(test)]
mod codegen_tests;

pub use available::AvailableJs;
pub use codegen::{generate_javascript, GENERATED_CODE_END_MARKER, GENERATED_CODE_START_MARKER};
pub use config::GeneratorConfig;
pub use error::{GenerateError, Result, UnsupportedFeature};
pub use escaper::{Escape, EscaperDefinition, PatternFlags, ValueFilter};
pub use generate::run;
pub use registry::{builtin_escapers, load_escapers};

#[cfg(feature = "napi")]
pub use node::{generate_escaper_helpers_native, render_escaper_block_native};

//! Codegen module for escaper helpers
//!
//! Renders collected side tables and digests as JavaScript in the `soy.esc` namespace:
//!
//! ```text
//!   soy.esc.$$ESCAPE_MAP_FOR_ESCAPE_HTML_  = { ... };  // Maps of characters to escaped versions
//!   soy.esc.$$REPLACER_FOR_ESCAPE_HTML_ = function(ch) { ... };  // Usable with String.replace
//!   soy.esc.$$MATCHER_FOR_ESCAPE_HTML_  = /.../g;  // A single character matching RegExp
//!   soy.esc.$$FILTER_FOR_FILTER_CSS_VALUE_ = /.../i;  // Vets values.
//!   soy.esc.$$escapeHtmlHelper = function(value) { return ...; };
//! ```
//!
//! Only the `...Helper` functions correspond one-to-one with directives.

use crate::available::AvailableJs;
use crate::digest::{collect, Collected, Delegation, DirectiveDigest};
use crate::error::Result;
use crate::escaper::{EscaperDefinition, ValueFilter};
use crate::filter::java_regex_to_js;
use crate::js::{escape_js_string_onto, js_string_set, write_js_char, write_js_string};

// ═══════════════════════════════════════════════════════════════════════════════
// MARKERS AND CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// A line that precedes the rest of the generated code.
pub const GENERATED_CODE_START_MARKER: &str = "// START GENERATED CODE FOR ESCAPERS.";

/// A line that follows the rest of the generated code.
pub const GENERATED_CODE_END_MARKER: &str = "// END GENERATED CODE";

const NS: &str = "soy.esc.$$";

/// The function used to surface rejected values, when available.
const ASSERT_FAIL: &str = "goog.asserts.fail";

/// Matches all tags, HTML comments, and DOCTYPEs in tag soup HTML.
pub const HTML_TAG_CONTENT: &str = r#"<(?:!|/?[a-zA-Z])(?:[^>'"]|"[^"]*"|'[^']*')*>"#;

/// Lower-case names of tags that only affect formatting.
pub const FORMATTING_TAG_WHITELIST: &[&str] = &["b", "br", "em", "i", "s", "sub", "sup", "u"];

// ═══════════════════════════════════════════════════════════════════════════════
// ENTRY POINTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Collects and renders the generated block for `escapers`, markers included.
pub fn generate_javascript(escapers: &[EscaperDefinition], available: &AvailableJs) -> Result<String> {
    let collected = collect(escapers, available)?;
    render_block(&collected, available)
}

pub fn render_block(collected: &Collected, available: &AvailableJs) -> Result<String> {
    let mut out = String::from(GENERATED_CODE_START_MARKER);
    out.push('\n');

    for delegation in collected.delegations() {
        emit_delegation(delegation, &mut out);
    }
    for table in &collected.side_tables.tables {
        emit_escape_map(&table.name, &table.value, &mut out);
    }
    for matcher in &collected.side_tables.matchers {
        emit_regex_def(
            "Matches characters that need to be escaped for the named directives.",
            &format!("MATCHER_FOR_{}_", matcher.name),
            &matcher.value,
            &mut out,
        );
    }
    for filter in &collected.filters.filters {
        emit_regex_def(
            "A pattern that vets values produced by the named directives.",
            &format!("FILTER_FOR_{}_", filter.name),
            &filter.value,
            &mut out,
        );
    }
    let assert_fail = available.is_available(ASSERT_FAIL);
    for digest in collected.digests() {
        emit_helper(collected, digest, assert_fail, &mut out);
    }
    emit_constants(&mut out)?;

    out.push('\n');
    out.push_str(GENERATED_CODE_END_MARKER);
    out.push('\n');
    Ok(out)
}

// ═══════════════════════════════════════════════════════════════════════════════
// EMITTERS
// ═══════════════════════════════════════════════════════════════════════════════

fn emit_delegation(delegation: &Delegation, out: &mut String) {
    out.push_str("\n/**\n * @type {function (*) : string}\n */\n");
    out.push_str(&format!(
        "{NS}{}Helper = function(v) {{\n  return {}(String(v));\n}};\n",
        delegation.directive_name, delegation.function
    ));
}

fn emit_escape_map(name: &str, map: &crate::escape_map::EscapeMap, out: &mut String) {
    out.push_str("\n/**\n");
    out.push_str(" * Maps characters to the escaped versions for the named escape directives.\n");
    out.push_str(" * @type {Object.<string, string>}\n");
    out.push_str(" * @private\n");
    out.push_str(" */\n");
    out.push_str(&format!("{NS}ESCAPE_MAP_FOR_{name}_ = {{"));
    for (i, (ch, escaped)) in map.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str("\n  ");
        write_js_char(*ch, out);
        out.push_str(": ");
        write_js_string(escaped, out);
    }
    out.push_str("\n};\n");

    out.push_str("\n/**\n");
    out.push_str(" * A function that can be used with String.replace.\n");
    out.push_str(" * @param {string} ch A single character matched by a compatible matcher.\n");
    out.push_str(" * @return {string} A token in the output language.\n");
    out.push_str(" * @private\n");
    out.push_str(" */\n");
    out.push_str(&format!(
        "{NS}REPLACER_FOR_{name}_ = function(ch) {{\n  return {NS}ESCAPE_MAP_FOR_{name}_[ch];\n}};\n"
    ));
}

fn emit_regex_def(doc: &str, symbol: &str, regex: &str, out: &mut String) {
    out.push_str("\n/**\n");
    out.push_str(&format!(" * {doc}\n"));
    out.push_str(" * @type RegExp\n");
    out.push_str(" * @private\n");
    out.push_str(" */\n");
    out.push_str(&format!("{NS}{symbol} = {regex};\n"));
}

fn emit_helper(collected: &Collected, digest: &DirectiveDigest, assert_fail: bool, out: &mut String) {
    let name = &digest.directive_name;
    out.push_str("\n/**\n");
    out.push_str(&format!(" * A helper for the Soy directive |{name}\n"));
    out.push_str(" * @param {*} value Can be of any type but will be coerced to a string.\n");
    out.push_str(" * @return {string} The escaped text.\n");
    out.push_str(" */\n");
    out.push_str(&format!("{NS}{name}Helper = function(value) {{\n"));
    out.push_str("  var str = String(value);\n");

    if let Some(filter_var) = digest.filter_var {
        let filter_name = &collected.filters.filters[filter_var].name;
        out.push_str(&format!("  if (!{NS}FILTER_FOR_{filter_name}_.test(str)) {{\n"));
        if assert_fail {
            let mut message = String::new();
            escape_js_string_onto(&format!("Bad value `%s` for |{name}"), &mut message);
            out.push_str(&format!("    {ASSERT_FAIL}('{message}', [str]);\n"));
        }
        out.push_str("    return ");
        write_js_string(&digest.innocuous_output, out);
        out.push_str(";\n  }\n");
    }

    match (digest.escapes_var, digest.matcher_var) {
        (Some(escapes_var), Some(matcher_var)) => {
            let map_name = &collected.side_tables.tables[escapes_var].name;
            let matcher_name = &collected.side_tables.matchers[matcher_var].name;
            out.push_str("  return str.replace(\n");
            out.push_str(&format!("      {NS}MATCHER_FOR_{matcher_name}_,\n"));
            out.push_str(&format!("      {NS}REPLACER_FOR_{map_name}_);\n"));
        }
        _ => out.push_str("  return str;\n"),
    }
    out.push_str("};\n");
}

/// Patterns and constants used by escaping functions outside any one directive.
fn emit_constants(out: &mut String) -> Result<()> {
    let tag_regex = java_regex_to_js("HTML_TAG_REGEX", &ValueFilter::new(HTML_TAG_CONTENT))?;

    out.push_str("\n/**\n");
    out.push_str(" * Matches all tags, HTML comments, and DOCTYPEs in tag soup HTML.\n");
    out.push_str(" * By removing these, and replacing any '<' or '>' characters with\n");
    out.push_str(" * entities we guarantee that the result can be embedded into\n");
    out.push_str(" * an attribute without introducing a tag boundary.\n");
    out.push_str(" *\n");
    out.push_str(" * @type {RegExp}\n");
    out.push_str(" * @private\n");
    out.push_str(" */\n");
    out.push_str(&format!("{NS}HTML_TAG_REGEX_ = {tag_regex}g;\n"));

    out.push_str("\n/**\n");
    out.push_str(" * Matches all occurrences of '<'.\n");
    out.push_str(" *\n");
    out.push_str(" * @type {RegExp}\n");
    out.push_str(" * @private\n");
    out.push_str(" */\n");
    out.push_str(&format!("{NS}LT_REGEX_ = /</g;\n"));

    out.push_str("\n/**\n");
    out.push_str(" * Maps lower-case names of innocuous tags to 1.\n");
    out.push_str(" *\n");
    out.push_str(" * @type {Object.<string,number>}\n");
    out.push_str(" * @private\n");
    out.push_str(" */\n");
    out.push_str(&format!(
        "{NS}SAFE_TAG_WHITELIST_ = {};\n",
        js_string_set(FORMATTING_TAG_WHITELIST.iter().copied())
    ));
    Ok(())
}

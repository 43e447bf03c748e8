//! Escaper registry.
//!
//! The built-in registry holds the escaping directives used by the contextual
//! auto-escaper. Build setups with their own directives load a JSON array of
//! [`EscaperDefinition`]s instead.

use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{GenerateError, Result};
use crate::escaper::{Escape, EscaperDefinition, ValueFilter};

/// Output that is safe in every context and easy to spot.
const INNOCUOUS_OUTPUT: &str = "zSoyz";

/// Characters `encodeURIComponent` would escape, excluding non-ASCII.
fn uri_component_specials() -> impl Iterator<Item = char> {
    ('\u{0}'..='\u{20}')
        .chain(" \"#$%&+,/:;<=>?@[\\]^`{|}\u{7f}".chars())
}

/// Characters that cannot appear raw in a URI embedded in HTML, CSS or JS.
fn uri_normalize_specials() -> impl Iterator<Item = char> {
    ('\u{0}'..='\u{20}')
        .chain("\"'()<>\\{}\u{7f}\u{85}\u{a0}\u{2028}\u{2029}".chars())
}

/// `<` -> `%3C`, `\u{a0}` -> `%C2%A0`
fn percent_encode(ch: char) -> String {
    let mut buf = [0u8; 4];
    ch.encode_utf8(&mut buf)
        .bytes()
        .map(|b| format!("%{:02X}", b))
        .collect()
}

fn percent_escapes(chars: impl Iterator<Item = char>) -> Vec<Escape> {
    let mut escapes: Vec<Escape> = chars
        .map(|plain| Escape {
            plain,
            escaped: percent_encode(plain),
        })
        .collect();
    escapes.sort_by_key(|e| e.plain);
    escapes.dedup_by_key(|e| e.plain);
    escapes
}

const HTML_ESCAPES: &[(char, &str)] = &[
    ('\0', "&#0;"),
    ('"', "&quot;"),
    ('&', "&amp;"),
    ('\'', "&#39;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
];

const HTML_NOSPACE_ESCAPES: &[(char, &str)] = &[
    ('\0', "&#0;"),
    ('\t', "&#9;"),
    ('\n', "&#10;"),
    ('\u{b}', "&#11;"),
    ('\u{c}', "&#12;"),
    ('\r', "&#13;"),
    (' ', "&#32;"),
    ('"', "&quot;"),
    ('&', "&amp;"),
    ('\'', "&#39;"),
    ('-', "&#45;"),
    ('/', "&#47;"),
    ('<', "&lt;"),
    ('=', "&#61;"),
    ('>', "&gt;"),
    ('`', "&#96;"),
    ('\u{85}', "&#133;"),
    ('\u{a0}', "&#160;"),
    ('\u{2028}', "&#8232;"),
    ('\u{2029}', "&#8233;"),
];

const JS_STRING_ESCAPES: &[(char, &str)] = &[
    ('\0', "\\x00"),
    ('\u{8}', "\\x08"),
    ('\t', "\\t"),
    ('\n', "\\n"),
    ('\u{b}', "\\x0b"),
    ('\u{c}', "\\f"),
    ('\r', "\\r"),
    ('"', "\\x22"),
    ('&', "\\x26"),
    ('\'', "\\x27"),
    ('/', "\\/"),
    ('<', "\\x3c"),
    ('=', "\\x3d"),
    ('>', "\\x3e"),
    ('\\', "\\\\"),
    ('\u{85}', "\\x85"),
    ('\u{2028}', "\\u2028"),
    ('\u{2029}', "\\u2029"),
];

/// Regex metacharacters, escaped on top of [`JS_STRING_ESCAPES`].
const JS_REGEX_EXTRA_ESCAPES: &[(char, &str)] = &[
    ('$', "\\$"),
    ('(', "\\("),
    (')', "\\)"),
    ('*', "\\*"),
    ('+', "\\+"),
    (',', "\\,"),
    ('-', "\\-"),
    ('.', "\\."),
    (':', "\\:"),
    ('?', "\\?"),
    ('[', "\\["),
    (']', "\\]"),
    ('^', "\\^"),
    ('{', "\\{"),
    ('|', "\\|"),
    ('}', "\\}"),
];

const CSS_STRING_ESCAPES: &[(char, &str)] = &[
    ('\0', "\\0 "),
    ('\u{8}', "\\8 "),
    ('\t', "\\9 "),
    ('\n', "\\a "),
    ('\u{b}', "\\b "),
    ('\u{c}', "\\c "),
    ('\r', "\\d "),
    ('"', "\\22 "),
    ('&', "\\26 "),
    ('\'', "\\27 "),
    ('(', "\\28 "),
    (')', "\\29 "),
    ('*', "\\2a "),
    ('/', "\\2f "),
    (':', "\\3a "),
    (';', "\\3b "),
    ('<', "\\3c "),
    ('=', "\\3d "),
    ('>', "\\3e "),
    ('@', "\\40 "),
    ('\\', "\\5c "),
    ('{', "\\7b "),
    ('}', "\\7d "),
    ('\u{85}', "\\85 "),
    ('\u{a0}', "\\a0 "),
    ('\u{2028}', "\\2028 "),
    ('\u{2029}', "\\2029 "),
];

const CSS_VALUE_FILTER: &str = r"^(?!-*(?:expression|(?:moz-)?binding))(?:[.#]?-?(?:[_a-z0-9-]+)(?:-[_a-z0-9-]+)*-?|-?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[a-z]{1,2}|%)?|!important|)\z";

const NORMALIZE_URI_FILTER: &str = r"^(?:(?:https?|mailto):|[^&:/?#]*(?:[/?#]|\z))";

const HTML_ATTRIBUTES_FILTER: &str = r"^(?!on|src|(?:style|action|archive|background|cite|classid|codebase|data|dsync|href|longdesc|usemap)\s*$)(?:[a-z0-9_$:-]*)\z";

const HTML_ELEMENT_NAME_FILTER: &str = r"^(?!script|style|title|textarea|xmp|no)[a-z0-9_$:-]*\z";

fn html_escaper(name: &str, escapes: &[(char, &'static str)], normalize: bool) -> EscaperDefinition {
    // Normalizers leave existing entities alone.
    EscaperDefinition::new(name).escapes(
        escapes
            .iter()
            .filter(|(ch, _)| !normalize || *ch != '&')
            .map(|(ch, esc)| (*ch, *esc)),
    )
}

fn build_builtin_escapers() -> Vec<EscaperDefinition> {
    let mut js_regex: Vec<(char, &str)> = JS_STRING_ESCAPES
        .iter()
        .chain(JS_REGEX_EXTRA_ESCAPES)
        .copied()
        .collect();
    js_regex.sort_by_key(|(ch, _)| *ch);

    let mut normalize_uri = EscaperDefinition::new("|normalizeUri");
    normalize_uri.escapes = percent_escapes(uri_normalize_specials());
    let mut filter_normalize_uri = EscaperDefinition::new("|filterNormalizeUri")
        .filter(ValueFilter::new(NORMALIZE_URI_FILTER).case_insensitive())
        .innocuous(format!("#{}", INNOCUOUS_OUTPUT));
    filter_normalize_uri.escapes = percent_escapes(uri_normalize_specials());
    let mut escape_uri = EscaperDefinition::new("|escapeUri")
        .js_function("goog.string.urlEncode")
        .js_function("encodeURIComponent");
    escape_uri.escapes = percent_escapes(uri_component_specials());

    vec![
        html_escaper("|escapeHtml", HTML_ESCAPES, false).js_function("goog.string.htmlEscape"),
        html_escaper("|normalizeHtml", HTML_ESCAPES, true),
        html_escaper("|escapeHtmlNospace", HTML_NOSPACE_ESCAPES, false),
        html_escaper("|normalizeHtmlNospace", HTML_NOSPACE_ESCAPES, true),
        EscaperDefinition::new("|escapeJsString").escapes(JS_STRING_ESCAPES.iter().copied()),
        EscaperDefinition::new("|escapeJsRegex").escapes(js_regex),
        EscaperDefinition::new("|escapeCssString").escapes(CSS_STRING_ESCAPES.iter().copied()),
        EscaperDefinition::new("|filterCssValue")
            .filter(ValueFilter::new(CSS_VALUE_FILTER).case_insensitive())
            .innocuous(INNOCUOUS_OUTPUT),
        escape_uri,
        normalize_uri,
        filter_normalize_uri,
        EscaperDefinition::new("|filterHtmlAttributes")
            .filter(ValueFilter::new(HTML_ATTRIBUTES_FILTER).case_insensitive())
            .innocuous(INNOCUOUS_OUTPUT),
        EscaperDefinition::new("|filterHtmlElementName")
            .filter(ValueFilter::new(HTML_ELEMENT_NAME_FILTER).case_insensitive())
            .innocuous(INNOCUOUS_OUTPUT),
    ]
}

lazy_static! {
    static ref BUILTIN_ESCAPERS: Vec<EscaperDefinition> = build_builtin_escapers();
    static ref DIRECTIVE_IDENT: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap();
    static ref QUALIFIED_JS_NAME: Regex =
        Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(?:\.[A-Za-z_$][A-Za-z0-9_$]*)*$").unwrap();
}

/// The built-in escaping directives, in emission order.
pub fn builtin_escapers() -> &'static [EscaperDefinition] {
    &BUILTIN_ESCAPERS
}

/// Reads a JSON array of escaper definitions.
pub fn load_escapers(path: &Path) -> Result<Vec<EscaperDefinition>> {
    let data = fs::read_to_string(path).map_err(|source| GenerateError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let escapers: Vec<EscaperDefinition> = serde_json::from_str(&data)
        .map_err(|e| GenerateError::Registry(format!("{}: {}", path.display(), e)))?;
    for escaper in &escapers {
        check_names(escaper)
            .map_err(|msg| GenerateError::Registry(format!("{}: {}", path.display(), msg)))?;
    }
    Ok(escapers)
}

/// Names end up in generated identifiers and JSDoc, so they must be plain JS names.
fn check_names(escaper: &EscaperDefinition) -> std::result::Result<(), String> {
    if !DIRECTIVE_IDENT.is_match(escaper.ident()) {
        return Err(format!(
            "directive name {:?} is not a JavaScript identifier",
            escaper.directive_name
        ));
    }
    if let Some(name) = escaper
        .js_function_names
        .iter()
        .find(|name| !QUALIFIED_JS_NAME.is_match(name))
    {
        return Err(format!(
            "function name {:?} for {} is not a JavaScript name",
            name,
            escaper.ident()
        ));
    }
    Ok(())
}

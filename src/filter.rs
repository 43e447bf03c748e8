//! Translation of host value-filter patterns into JavaScript regex literals.
//!
//! The translation is approximate but conservative: constructs with a direct JavaScript
//! spelling are rewritten, and constructs JavaScript cannot express are rejected rather
//! than passed through with a different meaning.

use crate::error::{GenerateError, Result, UnsupportedFeature};
use crate::escape_map::{intern, Shared};
use crate::escaper::ValueFilter;

/// A translated filter regex literal such as `/^(?:...)$/i`.
pub type FilterPattern = Shared<String>;

/// Characters with special meaning inside a JavaScript regex literal.
const REGEX_SPECIALS: &str = "\\^$.|?*+()[]{}/-";

/// Inline mode-flag letters accepted by the host syntax.
const FLAG_CHARS: &str = "idmsuxU-";

fn push_line_terminator(ch: char, out: &mut String) -> bool {
    let esc = match ch {
        '\r' => "\\r",
        '\n' => "\\n",
        '\u{2028}' => "\\u2028",
        '\u{2029}' => "\\u2029",
        _ => return false,
    };
    out.push_str(esc);
    true
}

/// Returns a JavaScript regex literal equivalent to the given host pattern.
///
/// `directive` only labels errors.
pub fn java_regex_to_js(directive: &str, filter: &ValueFilter) -> Result<String> {
    let pattern = &filter.pattern;
    let unsupported = |feature| GenerateError::UnsupportedPattern {
        directive: directive.to_string(),
        pattern: pattern.clone(),
        feature,
    };

    if filter.flags.dot_all {
        return Err(unsupported(UnsupportedFeature::DotAll));
    }

    let chars: Vec<char> = pattern.chars().collect();
    let mut body = String::with_capacity(pattern.len() + 8);
    let mut in_class = false;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '\\' => match chars.get(i + 1).copied() {
                None => {
                    body.push('\\');
                    i += 1;
                }
                Some('p') | Some('P') => return Err(unsupported(UnsupportedFeature::NamedClass)),
                // JS has neither "end before final line terminator" nor "end of previous match".
                Some('Z') => return Err(unsupported(UnsupportedFeature::LenientEndAnchor)),
                Some('G') => return Err(unsupported(UnsupportedFeature::ContinuationAnchor)),
                Some('A') if !in_class => {
                    body.push('^');
                    i += 2;
                }
                Some('z') if !in_class => {
                    body.push('$');
                    i += 2;
                }
                Some('Q') => {
                    // \Q...\E quotes everything up to \E (or the end).
                    i += 2;
                    while i < chars.len() {
                        if chars[i] == '\\' && chars.get(i + 1) == Some(&'E') {
                            i += 2;
                            break;
                        }
                        let quoted = chars[i];
                        if !push_line_terminator(quoted, &mut body) {
                            if REGEX_SPECIALS.contains(quoted) {
                                body.push('\\');
                            }
                            body.push(quoted);
                        }
                        i += 1;
                    }
                }
                Some(next) => {
                    if !push_line_terminator(next, &mut body) {
                        body.push('\\');
                        body.push(next);
                    }
                    i += 2;
                }
            },
            '[' if !in_class => {
                in_class = true;
                body.push('[');
                i += 1;
                if chars.get(i) == Some(&'^') {
                    body.push('^');
                    i += 1;
                }
                // A leading ']' is a literal member.
                if chars.get(i) == Some(&']') {
                    body.push_str("\\]");
                    i += 1;
                }
            }
            ']' if in_class => {
                in_class = false;
                body.push(']');
                i += 1;
            }
            '[' => return Err(unsupported(UnsupportedFeature::ClassIntersection)),
            '&' if in_class && chars.get(i + 1) == Some(&'&') => {
                return Err(unsupported(UnsupportedFeature::ClassIntersection));
            }
            '(' if !in_class && chars.get(i + 1) == Some(&'?') => {
                match chars.get(i + 2).copied() {
                    Some('>') => return Err(unsupported(UnsupportedFeature::AtomicGroup)),
                    Some('<') => {
                        return Err(match chars.get(i + 3) {
                            Some('=') | Some('!') => unsupported(UnsupportedFeature::Lookbehind),
                            _ => unsupported(UnsupportedFeature::NamedGroup),
                        });
                    }
                    Some(c) if FLAG_CHARS.contains(c) => {
                        let enabled: String = chars[i + 2..]
                            .iter()
                            .take_while(|c| FLAG_CHARS.contains(**c))
                            .take_while(|c| **c != '-')
                            .collect();
                        return Err(if enabled.contains('s') {
                            unsupported(UnsupportedFeature::DotAll)
                        } else {
                            unsupported(UnsupportedFeature::InlineFlags)
                        });
                    }
                    _ => {
                        body.push_str("(?");
                        i += 2;
                    }
                }
            }
            '*' | '+' | '?' if !in_class => {
                if chars.get(i + 1) == Some(&'+') {
                    return Err(unsupported(UnsupportedFeature::PossessiveQuantifier));
                }
                body.push(ch);
                i += 1;
            }
            '{' if !in_class => {
                // {n}, {n,} and {n,m} are quantifiers; any other brace is literal.
                let len = chars[i + 1..]
                    .iter()
                    .take_while(|c| c.is_ascii_digit() || **c == ',')
                    .count();
                let close = i + 1 + len;
                if len > 0 && chars.get(close) == Some(&'}') {
                    if chars.get(close + 1) == Some(&'+') {
                        return Err(unsupported(UnsupportedFeature::PossessiveQuantifier));
                    }
                    body.extend(&chars[i..=close]);
                    i = close + 1;
                } else {
                    body.push('{');
                    i += 1;
                }
            }
            '/' => {
                body.push_str("\\/");
                i += 1;
            }
            _ => {
                if !push_line_terminator(ch, &mut body) {
                    body.push(ch);
                }
                i += 1;
            }
        }
    }

    let mut literal = String::with_capacity(body.len() + 4);
    literal.push('/');
    literal.push_str(&body);
    literal.push('/');
    if filter.flags.case_insensitive {
        literal.push('i');
    }
    if filter.flags.multiline {
        literal.push('m');
    }
    Ok(literal)
}

/// Translated filters, deduplicated by their JavaScript text.
#[derive(Debug, Default)]
pub struct FilterTable {
    pub filters: Vec<FilterPattern>,
}

impl FilterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates `filter` and returns its index, sharing an existing identical pattern.
    pub fn add(&mut self, directive: &str, upper_ident: &str, filter: &ValueFilter) -> Result<usize> {
        let translated = java_regex_to_js(directive, filter)?;
        Ok(intern(&mut self.filters, translated, upper_ident))
    }
}

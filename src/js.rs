//! JavaScript literal writers.
//!
//! Everything written here is pure ASCII: control characters and non-Latin characters
//! are emitted as `\xNN` / `\uNNNN` escapes so the generated file survives any editor or
//! text encoding.

use std::fmt::Write;

/// True iff `ch` is printable ASCII.
pub fn is_printable(ch: char) -> bool {
    ('\u{20}'..='\u{7e}').contains(&ch)
}

/// `\xNN` for Latin-1, `\uNNNN` above that.
fn push_hex_escape(ch: char, out: &mut String) {
    let code = ch as u32;
    if code >= 0x100 {
        let _ = write!(out, "\\u{:04x}", code);
    } else {
        let _ = write!(out, "\\x{:02x}", code);
    }
}

/// Escape for one character inside a JS string literal, or `None` when it can stay as is.
fn js_string_escape(ch: char) -> Option<&'static str> {
    Some(match ch {
        '\0' => "\\x00",
        '\u{8}' => "\\x08",
        '\t' => "\\t",
        '\n' => "\\n",
        '\u{b}' => "\\x0b",
        '\u{c}' => "\\f",
        '\r' => "\\r",
        '"' => "\\x22",
        '&' => "\\x26",
        '\'' => "\\x27",
        '/' => "\\/",
        '<' => "\\x3c",
        '=' => "\\x3d",
        '>' => "\\x3e",
        '\\' => "\\\\",
        '\u{85}' => "\\x85",
        '\u{2028}' => "\\u2028",
        '\u{2029}' => "\\u2029",
        _ => return None,
    })
}

/// Escape for one character inside a JS regex, or `None` when it can stay as is.
fn js_regex_escape(ch: char) -> Option<&'static str> {
    if let Some(esc) = js_string_escape(ch) {
        return Some(esc);
    }
    Some(match ch {
        '$' => "\\$",
        '(' => "\\(",
        ')' => "\\)",
        '*' => "\\*",
        '+' => "\\+",
        ',' => "\\,",
        '-' => "\\-",
        '.' => "\\.",
        ':' => "\\:",
        '?' => "\\?",
        '[' => "\\[",
        ']' => "\\]",
        '^' => "\\^",
        '{' => "\\{",
        '|' => "\\|",
        '}' => "\\}",
        _ => return None,
    })
}

/// Appends the body of a JS string literal (no quotes).
pub fn escape_js_string_onto(value: &str, out: &mut String) {
    for ch in value.chars() {
        match js_string_escape(ch) {
            Some(esc) => out.push_str(esc),
            None if is_printable(ch) => out.push(ch),
            None => push_hex_escape(ch, out),
        }
    }
}

/// Appends a single-quoted JS string literal.
pub fn write_js_string(value: &str, out: &mut String) {
    out.push('\'');
    escape_js_string_onto(value, out);
    out.push('\'');
}

/// Appends a single-quoted JS string literal holding one character.
pub fn write_js_char(value: char, out: &mut String) {
    out.push('\'');
    if is_printable(value) {
        match js_string_escape(value) {
            Some(esc) => out.push_str(esc),
            None => out.push(value),
        }
    } else {
        push_hex_escape(value, out);
    }
    out.push('\'');
}

/// Appends one member of a regex character class.
pub fn write_regex_class_char(value: char, out: &mut String) {
    if !is_printable(value) {
        push_hex_escape(value, out);
        return;
    }
    match js_regex_escape(value) {
        Some(esc) => out.push_str(esc),
        None => out.push(value),
    }
}

/// Appends a character range like `a-z`, or a lone character when `start == end`.
pub fn write_regex_range(start: char, end: char, out: &mut String) {
    write_regex_class_char(start, out);
    if start != end {
        out.push('-');
        write_regex_class_char(end, out);
    }
}

/// `["foo", "bar"]` -> `{'foo': 1, 'bar': 1}`
pub fn js_string_set<'a>(strings: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::from("{");
    for (i, s) in strings.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_js_string(s, &mut out);
        out.push_str(": 1");
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn js_string(s: &str) -> String {
        let mut out = String::new();
        write_js_string(s, &mut out);
        out
    }

    #[test]
    fn test_js_string_escapes_html_specials() {
        assert_eq!(js_string("</script>"), "'\\x3c\\/script\\x3e'");
        assert_eq!(js_string("it's \"x\""), "'it\\x27s \\x22x\\x22'");
        assert_eq!(js_string("a\\b"), "'a\\\\b'");
        assert_eq!(js_string("&lt;"), "'\\x26lt;'");
    }

    #[test]
    fn test_js_string_is_ascii_only() {
        assert_eq!(js_string("\u{a0}\u{2028}\u{e9}"), "'\\xa0\\u2028\\xe9'");
        assert_eq!(js_string("\u{1}"), "'\\x01'");
    }

    #[test]
    fn test_js_char() {
        let mut out = String::new();
        write_js_char('\n', &mut out);
        write_js_char('<', &mut out);
        write_js_char('a', &mut out);
        write_js_char('\u{2029}', &mut out);
        assert_eq!(out, "'\\x0a''\\x3c''a''\\u2029'");
    }

    #[test]
    fn test_regex_range() {
        let mut out = String::new();
        write_regex_range('a', 'c', &mut out);
        write_regex_range('x', 'x', &mut out);
        write_regex_range('-', '-', &mut out);
        write_regex_range('\u{0}', '\u{8}', &mut out);
        assert_eq!(out, "a-cx\\-\\x00-\\x08");
    }

    #[test]
    fn test_string_set() {
        assert_eq!(js_string_set(["b", "br"]), "{'b': 1, 'br': 1}");
        assert_eq!(js_string_set(Vec::<&str>::new()), "{}");
    }
}

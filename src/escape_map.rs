//! Escape-map building and deduplication.
//!
//! Each escaper's `(plain, escaped)` pairs become a candidate map. Candidates are folded
//! into previously accepted tables when the two agree on every shared character, and
//! matchers are shared whenever their pattern text is identical.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{GenerateError, Result};
use crate::escaper::EscaperDefinition;
use crate::js::write_regex_range;

/// Character to replacement text, ordered by code point.
pub type EscapeMap = BTreeMap<char, String>;

/// A value shared by one or more directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shared<T> {
    /// Contributing directive identifiers joined with `__AND__`.
    pub name: String,
    pub value: T,
}

impl<T> Shared<T> {
    fn new(ident: &str, value: T) -> Self {
        Self {
            name: ident.to_string(),
            value,
        }
    }

    // ESCAPE_JS_STRING -> ESCAPE_JS_STRING__AND__ESCAPE_JS_REGEX
    fn share_with(&mut self, ident: &str) {
        self.name.push_str("__AND__");
        self.name.push_str(ident);
    }
}

/// Returns the index of `value` in `list`, appending it when absent.
/// Either way `ident` becomes part of the entry's name.
pub(crate) fn intern<T: PartialEq>(list: &mut Vec<Shared<T>>, value: T, ident: &str) -> usize {
    match list.iter().position(|s| s.value == value) {
        Some(i) => {
            list[i].share_with(ident);
            i
        }
        None => {
            list.push(Shared::new(ident, value));
            list.len() - 1
        }
    }
}

/// A merged escape table.
pub type EscapeTable = Shared<EscapeMap>;

/// A global single-character matcher such as `/[\x00"&'<>]/g`.
pub type MatcherPattern = Shared<String>;

// ═══════════════════════════════════════════════════════════════════════════════
// MAP BUILDER
// ═══════════════════════════════════════════════════════════════════════════════

/// Builds the escape map of one escaper, or `None` when it escapes nothing.
pub fn build_escape_map(escaper: &EscaperDefinition) -> Result<Option<EscapeMap>> {
    if escaper.escapes.is_empty() {
        return Ok(None);
    }
    let mut map = EscapeMap::new();
    for esc in &escaper.escapes {
        if (esc.plain as u32) > 0xffff {
            return Err(GenerateError::AstralEscape {
                directive: escaper.ident().to_string(),
                plain: esc.plain,
            });
        }
        if map.insert(esc.plain, esc.escaped.clone()).is_some() {
            return Err(GenerateError::AmbiguousEscape {
                directive: escaper.ident().to_string(),
                plain: esc.plain,
                escaped: esc.escaped.clone(),
            });
        }
    }
    Ok(Some(map))
}

/// Builds a global character-class regex literal accepting exactly `chars`.
///
/// Consecutive code points collapse into `start-end` runs: `{a, b, c, x}` -> `/[a-cx]/g`.
pub fn matcher_regex(chars: impl IntoIterator<Item = char>) -> String {
    let mut sorted: Vec<char> = chars.into_iter().collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut out = String::from("/[");
    let mut run: Option<(char, char)> = None;
    for ch in sorted {
        run = match run {
            Some((start, end)) if end as u32 + 1 == ch as u32 => Some((start, ch)),
            Some((start, end)) => {
                write_regex_range(start, end, &mut out);
                Some((ch, ch))
            }
            None => Some((ch, ch)),
        };
    }
    if let Some((start, end)) = run {
        write_regex_range(start, end, &mut out);
    }
    out.push_str("]/g");
    out
}

/// True if the maps share at least one character and agree on all shared characters.
pub fn maps_have_compatible_overlap(a: &EscapeMap, b: &EscapeMap) -> bool {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let mut overlap = false;
    for (ch, escaped) in small {
        if let Some(other) = large.get(ch) {
            if other != escaped {
                return false;
            }
            overlap = true;
        }
    }
    overlap
}

// ═══════════════════════════════════════════════════════════════════════════════
// DEDUPLICATOR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct SideTables {
    pub tables: Vec<EscapeTable>,
    pub matchers: Vec<MatcherPattern>,
}

impl SideTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one escaper's map in, returning `(table index, matcher index)`.
    pub fn add(&mut self, upper_ident: &str, map: EscapeMap) -> (usize, usize) {
        let matcher = matcher_regex(map.keys().copied());

        let table_var = match self
            .tables
            .iter()
            .position(|t| maps_have_compatible_overlap(&t.value, &map))
        {
            Some(i) => {
                let table = &mut self.tables[i];
                table.value.extend(map);
                table.share_with(upper_ident);
                debug!(table = %table.name, "merged escape map");
                i
            }
            None => {
                self.tables.push(Shared::new(upper_ident, map));
                self.tables.len() - 1
            }
        };

        let matcher_var = intern(&mut self.matchers, matcher, upper_ident);
        (table_var, matcher_var)
    }
}

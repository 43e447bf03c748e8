//! Digest assembly: binds each directive to its shared side tables.

use tracing::{debug, info};

use crate::available::AvailableJs;
use crate::error::{GenerateError, Result};
use crate::escape_map::{build_escape_map, SideTables};
use crate::escaper::EscaperDefinition;
use crate::filter::FilterTable;

/// The side-table indices backing one generated helper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveDigest {
    /// `escapeHtml`, without the leading `|`.
    pub directive_name: String,
    /// Index into [`SideTables::tables`].
    pub escapes_var: Option<usize>,
    /// Index into [`SideTables::matchers`]. Present exactly when `escapes_var` is.
    pub matcher_var: Option<usize>,
    /// Index into [`FilterTable::filters`].
    pub filter_var: Option<usize>,
    pub innocuous_output: String,
}

/// A helper that forwards to a function already present in the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delegation {
    pub directive_name: String,
    pub function: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Helper {
    Delegate(Delegation),
    Digest(DirectiveDigest),
}

impl Helper {
    pub fn directive_name(&self) -> &str {
        match self {
            Helper::Delegate(d) => &d.directive_name,
            Helper::Digest(d) => &d.directive_name,
        }
    }
}

/// Everything the emitter needs, in registry order.
#[derive(Debug, Default)]
pub struct Collected {
    pub side_tables: SideTables,
    pub filters: FilterTable,
    pub helpers: Vec<Helper>,
}

impl Collected {
    pub fn digests(&self) -> impl Iterator<Item = &DirectiveDigest> {
        self.helpers.iter().filter_map(|h| match h {
            Helper::Digest(d) => Some(d),
            Helper::Delegate(_) => None,
        })
    }

    pub fn delegations(&self) -> impl Iterator<Item = &Delegation> {
        self.helpers.iter().filter_map(|h| match h {
            Helper::Delegate(d) => Some(d),
            Helper::Digest(_) => None,
        })
    }

    pub fn helper(&self, directive_name: &str) -> Option<&Helper> {
        self.helpers
            .iter()
            .find(|h| h.directive_name() == directive_name)
    }
}

/// Collects side tables and digests for every escaper.
pub fn collect(escapers: &[EscaperDefinition], available: &AvailableJs) -> Result<Collected> {
    let mut collected = Collected::default();

    for escaper in escapers {
        let ident = escaper.ident();
        let upper_ident = escaper.upper_ident();

        // If there is an existing function, use it.
        if let Some(function) = escaper
            .js_function_names
            .iter()
            .find(|f| available.is_available(f))
        {
            debug!(directive = ident, function = %function, "delegating to existing function");
            collected.helpers.push(Helper::Delegate(Delegation {
                directive_name: ident.to_string(),
                function: function.clone(),
            }));
            continue;
        }

        let (escapes_var, matcher_var) = match build_escape_map(escaper)? {
            Some(map) => {
                let (t, m) = collected.side_tables.add(&upper_ident, map);
                (Some(t), Some(m))
            }
            None => (None, None),
        };

        let filter_var = match &escaper.value_filter {
            Some(filter) => Some(collected.filters.add(ident, &upper_ident, filter)?),
            None => None,
        };

        if escaper.non_ascii_prefix.is_some() {
            return Err(GenerateError::Unimplemented {
                directive: ident.to_string(),
                feature: "non-ASCII prefix escapers".to_string(),
            });
        }

        collected.helpers.push(Helper::Digest(DirectiveDigest {
            directive_name: ident.to_string(),
            escapes_var,
            matcher_var,
            filter_var,
            innocuous_output: escaper.innocuous_output.clone(),
        }));
    }

    info!(
        tables = collected.side_tables.tables.len(),
        matchers = collected.side_tables.matchers.len(),
        filters = collected.filters.filters.len(),
        helpers = collected.helpers.len(),
        "collected escaper side tables"
    );
    Ok(collected)
}

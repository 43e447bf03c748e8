//! Emitted JavaScript: helper shapes, emission order, and syntax.

#[cfg(test)]
mod tests {
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;
    use regex::Regex;

    use crate::available::AvailableJs;
    use crate::codegen::{
        generate_javascript, render_block, GENERATED_CODE_END_MARKER,
        GENERATED_CODE_START_MARKER,
    };
    use crate::digest::{collect, Collected, Helper};
    use crate::error::GenerateError;
    use crate::escaper::{EscaperDefinition, ValueFilter};
    use crate::registry::builtin_escapers;

    fn escape_html() -> EscaperDefinition {
        EscaperDefinition::new("escapeHtml").escapes([('<', "&lt;"), ('>', "&gt;"), ('&', "&amp;")])
    }

    /// Mirrors `str.replace(MATCHER, REPLACER)` for a generated helper.
    fn apply_helper(collected: &Collected, directive: &str, input: &str) -> String {
        let digest = match collected.helper(directive) {
            Some(Helper::Digest(d)) => d,
            other => panic!("expected a generated helper for {}, got {:?}", directive, other),
        };
        let (Some(escapes_var), Some(matcher_var)) = (digest.escapes_var, digest.matcher_var) else {
            return input.to_string();
        };
        let table = &collected.side_tables.tables[escapes_var].value;
        let literal = &collected.side_tables.matchers[matcher_var].value;
        let body = literal
            .strip_prefix('/')
            .and_then(|s| s.strip_suffix("/g"))
            .unwrap();
        let re = Regex::new(body).unwrap();
        re.replace_all(input, |caps: &regex::Captures| {
            let ch = caps[0].chars().next().unwrap();
            table[&ch].clone()
        })
        .into_owned()
    }

    fn assert_parses(source: &str) {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::default()).parse();
        assert!(
            ret.errors.is_empty() && !ret.panicked,
            "generated code should parse: {:?}\n{}",
            ret.errors,
            source
        );
    }

    fn index_of(haystack: &str, needle: &str) -> usize {
        haystack
            .find(needle)
            .unwrap_or_else(|| panic!("missing {:?}", needle))
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // HELPERS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_escape_html_end_to_end() {
        let escapers = vec![escape_html()];
        let available = AvailableJs::builtins_only();
        let collected = collect(&escapers, &available).unwrap();

        assert_eq!(
            apply_helper(&collected, "escapeHtml", "<a>&b</a>"),
            "&lt;a&gt;&amp;b&lt;/a&gt;"
        );

        let js = render_block(&collected, &available).unwrap();
        assert!(js.contains(
            "soy.esc.$$ESCAPE_MAP_FOR_ESCAPE_HTML_ = {\n  '\\x26': '\\x26amp;',\n  '\\x3c': '\\x26lt;',\n  '\\x3e': '\\x26gt;'\n};\n"
        ));
        assert!(js.contains("soy.esc.$$MATCHER_FOR_ESCAPE_HTML_ = /[\\x26\\x3c\\x3e]/g;\n"));
        assert!(js.contains(
            "soy.esc.$$escapeHtmlHelper = function(value) {\n  var str = String(value);\n  return str.replace(\n      soy.esc.$$MATCHER_FOR_ESCAPE_HTML_,\n      soy.esc.$$REPLACER_FOR_ESCAPE_HTML_);\n};\n"
        ));
        assert_parses(&js);
    }

    #[test]
    fn test_identity_helper() {
        let escapers = vec![EscaperDefinition::new("|text")];
        let collected = collect(&escapers, &AvailableJs::builtins_only()).unwrap();
        assert_eq!(apply_helper(&collected, "text", "hello"), "hello");

        let js = render_block(&collected, &AvailableJs::builtins_only()).unwrap();
        assert!(js.contains(
            "soy.esc.$$textHelper = function(value) {\n  var str = String(value);\n  return str;\n};\n"
        ));
        assert!(!js.contains("ESCAPE_MAP_FOR_"));
        assert!(!js.contains("MATCHER_FOR_"));
    }

    #[test]
    fn test_filter_helper_returns_innocuous_output() {
        let escapers = vec![EscaperDefinition::new("|filterCssValue")
            .filter(ValueFilter::new(r"^[a-z]+\z").case_insensitive())
            .innocuous("zSoyz")];

        let js = generate_javascript(&escapers, &AvailableJs::builtins_only()).unwrap();
        assert!(js.contains("soy.esc.$$FILTER_FOR_FILTER_CSS_VALUE_ = /^[a-z]+$/i;\n"));
        assert!(js.contains(
            "  if (!soy.esc.$$FILTER_FOR_FILTER_CSS_VALUE_.test(str)) {\n    return 'zSoyz';\n  }\n  return str;\n"
        ));
        assert!(!js.contains("goog.asserts.fail"), "assertions are not available");
        assert_parses(&js);
    }

    #[test]
    fn test_filter_helper_asserts_when_available() {
        let escapers = vec![EscaperDefinition::new("|filterNormalizeUri")
            .filter(ValueFilter::new("^https?:"))
            .innocuous("#zSoyz")];
        let available = AvailableJs::new(&["goog.asserts.*"]).unwrap();

        let js = generate_javascript(&escapers, &available).unwrap();
        assert!(js.contains(
            "    goog.asserts.fail('Bad value `%s` for |filterNormalizeUri', [str]);\n    return '#zSoyz';\n"
        ));
        assert_parses(&js);
    }

    #[test]
    fn test_innocuous_output_is_escaped() {
        let escapers = vec![EscaperDefinition::new("|filterQuote")
            .filter(ValueFilter::new("^x$"))
            .innocuous("it's")];
        let js = generate_javascript(&escapers, &AvailableJs::builtins_only()).unwrap();
        assert!(js.contains("    return 'it\\x27s';\n"));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // DELEGATION
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_builtin_function_delegation() {
        let escapers = vec![EscaperDefinition::new("|escapeUri")
            .escape(' ', "%20")
            .js_function("goog.string.urlEncode")
            .js_function("encodeURIComponent")];
        let js = generate_javascript(&escapers, &AvailableJs::builtins_only()).unwrap();

        assert!(js.contains(
            "/**\n * @type {function (*) : string}\n */\nsoy.esc.$$escapeUriHelper = function(v) {\n  return encodeURIComponent(String(v));\n};\n"
        ));
        assert!(!js.contains("ESCAPE_URI"), "no side tables for delegated directives");
        assert_parses(&js);
    }

    #[test]
    fn test_qualified_delegation_needs_matching_glob() {
        let escapers = vec![escape_html().js_function("goog.string.htmlEscape")];

        let without = collect(&escapers, &AvailableJs::builtins_only()).unwrap();
        assert!(matches!(without.helper("escapeHtml"), Some(Helper::Digest(_))));

        let with = collect(&escapers, &AvailableJs::new(&["goog.string.*"]).unwrap()).unwrap();
        match with.helper("escapeHtml") {
            Some(Helper::Delegate(d)) => assert_eq!(d.function, "goog.string.htmlEscape"),
            other => panic!("expected delegation, got {:?}", other),
        }
        assert!(with.side_tables.tables.is_empty());
    }

    #[test]
    fn test_first_available_function_wins() {
        let escapers = vec![EscaperDefinition::new("|escapeUri")
            .js_function("goog.string.urlEncode")
            .js_function("encodeURIComponent")];
        let collected = collect(&escapers, &AvailableJs::new(&["goog.string.*"]).unwrap()).unwrap();
        match collected.helper("escapeUri") {
            Some(Helper::Delegate(d)) => assert_eq!(d.function, "goog.string.urlEncode"),
            other => panic!("expected delegation, got {:?}", other),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // NON-ASCII PREFIX
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_non_ascii_prefix_unimplemented() {
        let escapers = vec![escape_html(), EscaperDefinition::new("|escapeCssIdent")
            .escape('"', "\\22 ")
            .non_ascii_prefix("\\")];
        match generate_javascript(&escapers, &AvailableJs::builtins_only()) {
            Err(GenerateError::Unimplemented { directive, .. }) => {
                assert_eq!(directive, "escapeCssIdent")
            }
            other => panic!("expected Unimplemented, got {:?}", other),
        }
    }

    #[test]
    fn test_non_ascii_prefix_ignored_when_delegated() {
        let escapers = vec![EscaperDefinition::new("|escapeUri")
            .non_ascii_prefix("%")
            .js_function("encodeURIComponent")];
        assert!(generate_javascript(&escapers, &AvailableJs::builtins_only()).is_ok());
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // LAYOUT
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_emission_order() {
        let js = generate_javascript(builtin_escapers(), &AvailableJs::builtins_only()).unwrap();

        assert!(js.starts_with(GENERATED_CODE_START_MARKER));
        assert!(js.ends_with(&format!("\n{}\n", GENERATED_CODE_END_MARKER)));
        assert_eq!(js.matches(GENERATED_CODE_START_MARKER).count(), 1);

        let delegation = index_of(&js, "soy.esc.$$escapeUriHelper = function(v)");
        let table = index_of(&js, "soy.esc.$$ESCAPE_MAP_FOR_");
        let replacer = index_of(&js, "soy.esc.$$REPLACER_FOR_");
        let matcher = index_of(&js, "soy.esc.$$MATCHER_FOR_");
        let filter = index_of(&js, "soy.esc.$$FILTER_FOR_");
        let helper = index_of(&js, "soy.esc.$$escapeHtmlHelper = function(value)");
        let tag_regex = index_of(&js, "soy.esc.$$HTML_TAG_REGEX_ = ");
        let lt_regex = index_of(&js, "soy.esc.$$LT_REGEX_ = /</g;");
        let whitelist = index_of(&js, "soy.esc.$$SAFE_TAG_WHITELIST_ = ");

        assert!(delegation < table);
        assert!(table < replacer);
        assert!(replacer < matcher);
        assert!(matcher < filter);
        assert!(filter < helper);
        assert!(helper < tag_regex);
        assert!(tag_regex < lt_regex);
        assert!(lt_regex < whitelist);
    }

    #[test]
    fn test_builtin_registry_sharing() {
        let js = generate_javascript(builtin_escapers(), &AvailableJs::builtins_only()).unwrap();

        assert!(js.contains(
            "soy.esc.$$ESCAPE_MAP_FOR_ESCAPE_HTML__AND__NORMALIZE_HTML__AND__ESCAPE_HTML_NOSPACE__AND__NORMALIZE_HTML_NOSPACE_ = {"
        ));
        assert!(js.contains("soy.esc.$$ESCAPE_MAP_FOR_ESCAPE_JS_STRING__AND__ESCAPE_JS_REGEX_ = {"));
        assert!(js.contains("soy.esc.$$ESCAPE_MAP_FOR_ESCAPE_CSS_STRING_ = {"));
        assert!(js.contains("soy.esc.$$ESCAPE_MAP_FOR_NORMALIZE_URI__AND__FILTER_NORMALIZE_URI_ = {"));
        assert!(js.contains("soy.esc.$$MATCHER_FOR_NORMALIZE_URI__AND__FILTER_NORMALIZE_URI_ = /["));
        assert!(js.contains("soy.esc.$$MATCHER_FOR_ESCAPE_JS_REGEX_ = /["));
        assert!(js.contains("  return encodeURIComponent(String(v));\n"));
        assert!(js.contains(
            "soy.esc.$$SAFE_TAG_WHITELIST_ = {'b': 1, 'br': 1, 'em': 1, 'i': 1, 's': 1, 'sub': 1, 'sup': 1, 'u': 1};\n"
        ));
        assert!(js.contains(
            "soy.esc.$$HTML_TAG_REGEX_ = /<(?:!|\\/?[a-zA-Z])(?:[^>'\"]|\"[^\"]*\"|'[^']*')*>/g;\n"
        ));
    }

    #[test]
    fn test_builtin_helpers_escape() {
        let collected = collect(builtin_escapers(), &AvailableJs::builtins_only()).unwrap();
        assert_eq!(
            apply_helper(&collected, "normalizeHtml", "&amp; <b>"),
            "&amp; &lt;b&gt;",
            "normalizers keep entities even though the table is shared"
        );
        assert_eq!(
            apply_helper(&collected, "escapeJsString", "</script>'"),
            "\\x3c\\/script\\x3e\\x27"
        );
        assert_eq!(apply_helper(&collected, "escapeJsRegex", "a.b"), "a\\.b");
        assert_eq!(apply_helper(&collected, "normalizeUri", "a b\u{a0}"), "a%20b%C2%A0");
    }

    #[test]
    fn test_builtin_block_is_valid_javascript() {
        for globs in [vec![], vec!["goog.*.*".to_string()]] {
            let available = AvailableJs::new(&globs).unwrap();
            let js = generate_javascript(builtin_escapers(), &available).unwrap();
            assert!(js.is_ascii(), "generated code should be pure ASCII");
            assert_parses(&js);
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let available = AvailableJs::builtins_only();
        let first = generate_javascript(builtin_escapers(), &available).unwrap();
        let second = generate_javascript(builtin_escapers(), &available).unwrap();
        assert_eq!(first, second);
    }
}

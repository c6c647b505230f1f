//! Inline substitution engine.
//!
//! An ordered pipeline of regex rewrites applied to one plain-text span
//! (a paragraph or list item), producing an HTML-inline string. The rule
//! order is an invariant: every rule sees the output of all earlier
//! rules, so reordering changes the rendering.

use std::sync::OnceLock;

use regex::Regex;

/// A single pattern-replacement rule in the inline pipeline.
struct InlineRule {
    /// Rule name, used in trace logging only.
    name: &'static str,
    pattern: Regex,
    /// Replacement template with `$n` backreferences.
    replacement: &'static str,
    /// Emphasis rules must not re-match inside emitted `<code>` spans.
    skip_code_spans: bool,
}

/// Character class accepted between emphasis delimiters: letters, digits,
/// accented letters, space, and a fixed punctuation allowlist.
const EMPHASIS_CHARS: &str = r"a-zA-Z0-9Ü-ü ._\\/#:%+=$~€()<>\-";

/// The inline rules in application order: code span, external link, bare
/// link, email, number, bold (`**`, `__`), italic (`*`, `_`).
fn rules() -> &'static [InlineRule] {
    static RULES: OnceLock<Vec<InlineRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        let emphasis = |delim: &str| format!("{delim}([{EMPHASIS_CHARS}]+){delim}");
        vec![
            InlineRule {
                name: "code span",
                pattern: Regex::new(r"`([^`]+)`").expect("code span pattern"),
                replacement: "<code>$1</code>",
                skip_code_spans: false,
            },
            InlineRule {
                name: "external link",
                pattern: Regex::new(r"\[([a-zA-Z0-9 _:\-]+)\]\((https?://[a-zA-Z0-9./:]+)\)")
                    .expect("external link pattern"),
                replacement: r#"<a href="$2">$1</a>"#,
                skip_code_spans: false,
            },
            InlineRule {
                // The left guard keeps this from firing inside an href
                // attribute or anchor body emitted by the previous rule.
                name: "bare link",
                pattern: Regex::new(r#"([^">/])(https?://[a-zA-Z0-9./:]+)"#)
                    .expect("bare link pattern"),
                replacement: r#"$1<a href="$2">$2</a>"#,
                skip_code_spans: false,
            },
            InlineRule {
                name: "email address",
                pattern: Regex::new(
                    r"([a-z0-9]+(?:[._\-][a-z0-9]+)*@[a-z0-9]+(?:[._\-][a-z0-9]+)*\.[a-z]{2,6})",
                )
                .expect("email pattern"),
                replacement: r#"<a href="$1">$1</a>"#,
                skip_code_spans: false,
            },
            InlineRule {
                // The trailing delimiter is part of the capture, so a
                // number at end of input is deliberately left unstyled.
                name: "number",
                pattern: Regex::new(r#"([0-9]+(?:\.[0-9]+)?[^.0-9/:\])"<])"#)
                    .expect("number pattern"),
                replacement: r#"<span class="cyan-text">$1</span>"#,
                skip_code_spans: false,
            },
            InlineRule {
                name: "bold (asterisk)",
                pattern: Regex::new(&emphasis(r"\*\*")).expect("bold asterisk pattern"),
                replacement: "<strong>$1</strong>",
                skip_code_spans: true,
            },
            InlineRule {
                name: "bold (underscore)",
                pattern: Regex::new(&emphasis("__")).expect("bold underscore pattern"),
                replacement: "<strong>$1</strong>",
                skip_code_spans: true,
            },
            InlineRule {
                name: "italic (asterisk)",
                pattern: Regex::new(&emphasis(r"\*")).expect("italic asterisk pattern"),
                replacement: "<i>$1</i>",
                skip_code_spans: true,
            },
            InlineRule {
                name: "italic (underscore)",
                pattern: Regex::new(&emphasis("_")).expect("italic underscore pattern"),
                replacement: "<i>$1</i>",
                skip_code_spans: true,
            },
        ]
    })
}

fn code_span_regions() -> &'static Regex {
    static CODE_SPAN: OnceLock<Regex> = OnceLock::new();
    CODE_SPAN.get_or_init(|| Regex::new(r"(?s)<code>.*?</code>").expect("code region pattern"))
}

/// Apply every inline rule, in order, over the whole string.
///
/// Later rules see the HTML emitted by earlier ones; aside from the
/// emphasis/code-span masking this cross-visibility is intentional and
/// must not be "fixed".
pub fn apply(text: &str) -> String {
    let mut result = text.to_string();
    for rule in rules() {
        let next = if rule.skip_code_spans {
            replace_outside_code_spans(&result, &rule.pattern, rule.replacement)
        } else {
            rule.pattern.replace_all(&result, rule.replacement).into_owned()
        };
        if next != result {
            tracing::trace!(rule = rule.name, "inline rule applied");
        }
        result = next;
    }
    result
}

/// Apply `pattern` everywhere except inside `<code>...</code>` regions,
/// which are copied through verbatim.
fn replace_outside_code_spans(text: &str, pattern: &Regex, replacement: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for region in code_span_regions().find_iter(text) {
        result.push_str(&pattern.replace_all(&text[last..region.start()], replacement));
        result.push_str(region.as_str());
        last = region.end();
    }
    result.push_str(&pattern.replace_all(&text[last..], replacement));
    result
}

//! Syntax highlighting for fenced code blocks.
//!
//! Dispatches on the fence's language tag to one of four line-oriented
//! stylers. Every styler is fail-soft: malformed content degrades to a
//! plain line-wrapped rendering, never an error.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::Serialize;

/// The closed set of supported highlight styles.
///
/// Selected by the lower-cased language tag on the fence; anything else,
/// including an absent tag, maps to `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightStyle {
    Default,
    Bash,
    Json,
    Ini,
}

impl HighlightStyle {
    /// Resolve a fence's language tag to a style.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(str::to_ascii_lowercase).as_deref() {
            Some("json") => Self::Json,
            Some("bash") => Self::Bash,
            Some("ini") => Self::Ini,
            _ => Self::Default,
        }
    }
}

/// A highlighted code block, exposing the assembled HTML fragment.
#[derive(Debug, Clone)]
pub struct CodeBlock {
    pub html: String,
}

/// Highlight `content` according to its declared language tag.
///
/// The emitted fragment is bracketed by `<br>` markers on both sides.
pub fn highlight(content: &str, language: Option<&str>) -> CodeBlock {
    let body = match HighlightStyle::from_tag(language) {
        HighlightStyle::Default => default_block(content),
        HighlightStyle::Bash => bash_block(content),
        HighlightStyle::Json => json_block(content),
        HighlightStyle::Ini => ini_block(content),
    };
    CodeBlock {
        html: format!("<br>{body}<br>"),
    }
}

/// One `<p>` per line, content injected raw.
fn default_block(raw: &str) -> String {
    raw.lines().map(|line| format!("<p>{line}</p>")).collect()
}

/// One `<p>` per line; `#`-prefixed lines get the comment span.
fn bash_block(raw: &str) -> String {
    raw.lines()
        .map(|line| format!("<p>{}</p>", bash_comment(line)))
        .collect()
}

fn bash_comment(line: &str) -> String {
    if line.starts_with('#') {
        format!(r#"<span class="green-it">{line}</span>"#)
    } else {
        line.to_string()
    }
}

/// Parse, re-serialize with tab indentation, and colorize JSON tokens.
///
/// On parse failure the error is logged and the block degrades to one
/// escaped `<p>` per line.
fn json_block(raw: &str) -> String {
    match colorize_json(raw) {
        Ok(html) => format!("<pre>{html}</pre>"),
        Err(err) => {
            tracing::warn!(error = %err, "fenced JSON did not parse, rendering plain");
            raw.lines()
                .map(|line| format!("<p>{}</p>", html_escape::encode_text(line)))
                .collect()
        }
    }
}

fn colorize_json(raw: &str) -> serde_json::Result<String> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let pretty = to_tab_indented(&value)?;
    let escaped = html_escape::encode_text(&pretty);
    let colored = json_token_pattern().replace_all(&escaped, |caps: &Captures| {
        let token = &caps[0];
        format!(r#"<span class="{}">{token}</span>"#, json_token_class(token))
    });
    Ok(colored.into_owned())
}

fn to_tab_indented(value: &serde_json::Value) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf).expect("serde_json emits UTF-8"))
}

/// Matches one JSON token: a string (optionally followed by `:`), a bare
/// `true`/`false`/`null`, or a number.
fn json_token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#""(?:\\u[a-zA-Z0-9]{4}|\\[^u]|[^\\"])*"(?:\s*:)?|\b(?:true|false|null)\b|-?\d+(?:\.\d*)?(?:[eE][+\-]?\d+)?"#,
        )
        .expect("JSON token pattern")
    })
}

fn json_token_class(token: &str) -> &'static str {
    if token.starts_with('"') {
        if token.ends_with(':') {
            "json-key"
        } else {
            "json-string"
        }
    } else if token.contains("true") || token.contains("false") {
        "json-boolean"
    } else if token.contains("null") {
        "json-null"
    } else {
        "json-number"
    }
}

/// One `<p>` per line; first matching rule wins: comment, section header,
/// `key=value` item, else the line passes through unchanged.
fn ini_block(raw: &str) -> String {
    raw.lines()
        .map(|line| format!("<p>{}</p>", ini_line(line)))
        .collect()
}

fn ini_line(line: &str) -> String {
    if line.starts_with('#') {
        return format!(r#"<span class="ini-comment">{line}</span>"#);
    }
    if ini_section_pattern().is_match(line) {
        return format!(r#"<span class="ini-section">{line}</span>"#);
    }
    if ini_item_pattern().is_match(line) {
        if let Some((key, value)) = line.split_once('=') {
            let value = if value.starts_with('#') {
                format!(r#"<span class="ini-comment">{value}</span>"#)
            } else {
                value.to_string()
            };
            return format!(r#"<span class="ini-key">{key}</span>={value}"#);
        }
    }
    line.to_string()
}

fn ini_section_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[[a-z]+\]").expect("INI section pattern"))
}

fn ini_item_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[a-zA-Z_.]+=").expect("INI item pattern"))
}

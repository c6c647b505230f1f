//! Markdown block parsing and HTML assembly.
//!
//! Two-pass rendering: block segmentation first (code fences, headings,
//! images, list runs, substituted in that fixed order), then inline
//! substitution over the remaining paragraph text. Block substitutions
//! replace the first remaining textual occurrence of the matched raw
//! span, never an offset, so identical raw spans are disambiguated only
//! by processing order.

pub mod inline;

use std::sync::OnceLock;

use regex::Regex;

use crate::codeblock;

/// Render raw markdown to an HTML fragment.
///
/// `base_dir` is the directory of the source file (with trailing
/// separator), used to resolve relative image sources.
pub fn render(raw: &str, base_dir: &str) -> String {
    let eol = if raw.contains('\r') { "\r\n" } else { "\n" };

    let mut buffer = raw.to_string();
    buffer = replace_code_fences(&buffer);
    buffer = replace_headings(&buffer);
    buffer = replace_images(&buffer, base_dir);
    buffer = replace_list_runs(&buffer, eol);
    wrap_paragraphs(&buffer, eol)
}

/// Three backticks, optional language tag, one or more non-empty lines,
/// closing three-backtick line. A blank line inside the fence breaks the
/// match; the content then falls through to the paragraph pass.
fn fence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"```(?P<lang>[a-zA-Z0-9]+)?\r?\n(?P<body>(?:.+\r?\n)+)```")
            .expect("code fence pattern")
    })
}

/// 1-10 leading `#` characters followed by a space; level = `#` count.
fn heading_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // `[^\r\n]+` keeps a CRLF document's carriage return out of the
        // matched span, so substitution leaves the `\r\n` pair intact.
        Regex::new(r"(?m)^(?P<hashes>#{1,10}) (?P<text>[^\r\n]+)").expect("heading pattern")
    })
}

/// An inline-code-styled angle-bracket pattern inside a heading, e.g.
/// `` `<main>` ``, rewritten to its entity-escaped form (headings only).
fn heading_code_angle_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"`<(.+)>`").expect("heading code angle pattern"))
}

/// `![alt](src)` with restricted character sets; `alt` may be empty.
fn image_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"!\[(?P<alt>[a-zA-Z0-9Ü-ü ._\-]*)\]\((?P<src>[a-zA-Z0-9Ü-ü ._/\-]+)\)")
            .expect("image pattern")
    })
}

/// `-` or `*` + space + content.
fn unordered_item_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^(?:-|\*) (?P<item>.+)$").expect("unordered item pattern")
    })
}

/// Digits + `.` + space + content.
fn ordered_item_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^[0-9]+\. (?P<item>.+)$").expect("ordered item pattern")
    })
}

fn replace_code_fences(buffer: &str) -> String {
    let snapshot = buffer.to_string();
    let mut result = buffer.to_string();
    for caps in fence_pattern().captures_iter(&snapshot) {
        let raw_span = &caps[0];
        let language = caps.name("lang").map(|m| m.as_str());
        let block = codeblock::highlight(&caps["body"], language);
        let tag = format!(r#"<div class="code pretty">{}</div>"#, block.html);
        result = result.replacen(raw_span, &tag, 1);
    }
    result
}

fn replace_headings(buffer: &str) -> String {
    let snapshot = buffer.to_string();
    let mut result = buffer.to_string();
    for caps in heading_pattern().captures_iter(&snapshot) {
        let raw_span = &caps[0];
        let level = caps["hashes"].len();
        // Heading text is verbatim, except a code-quoted angle-bracket
        // pattern is rewritten to its escaped form (first occurrence).
        let text = heading_code_angle_pattern().replace(&caps["text"], "&lt;$1&gt;");
        let tag = format!("<h{level}>{text}</h{level}>");
        result = result.replacen(raw_span, &tag, 1);
    }
    result
}

fn replace_images(buffer: &str, base_dir: &str) -> String {
    let snapshot = buffer.to_string();
    let mut result = buffer.to_string();
    for caps in image_pattern().captures_iter(&snapshot) {
        let raw_span = &caps[0];
        let alt = caps.name("alt").map_or("", |m| m.as_str());
        let src = resolve_src(base_dir, &caps["src"]);
        let tag = format!(r#"<img alt="{alt}" class="center" src="{src}">"#);
        result = result.replacen(raw_span, &tag, 1);
    }
    result
}

/// A `src` starting with `/` is absolute; otherwise a leading `./` is
/// stripped and the remainder appended to `base_dir`.
fn resolve_src(base_dir: &str, src: &str) -> String {
    if src.starts_with('/') {
        src.to_string()
    } else {
        format!("{base_dir}{}", src.strip_prefix("./").unwrap_or(src))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    const fn tag(self) -> &'static str {
        match self {
            Self::Unordered => "ul",
            Self::Ordered => "ol",
        }
    }
}

fn list_item(line: &str) -> Option<(ListKind, &str)> {
    if let Some(caps) = unordered_item_pattern().captures(line) {
        return Some((ListKind::Unordered, caps.name("item").map_or("", |m| m.as_str())));
    }
    if let Some(caps) = ordered_item_pattern().captures(line) {
        return Some((ListKind::Ordered, caps.name("item").map_or("", |m| m.as_str())));
    }
    None
}

/// Group consecutive same-kind list-item lines into runs and substitute
/// each run with one `<ul>`/`<ol>`. A run never spans a blank line: any
/// non-item line (blank included) terminates it.
fn replace_list_runs(buffer: &str, eol: &str) -> String {
    struct Run {
        kind: ListKind,
        raw_lines: Vec<String>,
        items: Vec<String>,
    }

    let mut runs: Vec<Run> = Vec::new();
    let mut current: Option<Run> = None;
    for line in buffer.split(eol) {
        match list_item(line) {
            Some((kind, item)) => {
                match current.as_mut() {
                    Some(run) if run.kind == kind => {
                        run.raw_lines.push(line.to_string());
                        run.items.push(item.to_string());
                    }
                    _ => {
                        if let Some(run) = current.take() {
                            runs.push(run);
                        }
                        current = Some(Run {
                            kind,
                            raw_lines: vec![line.to_string()],
                            items: vec![item.to_string()],
                        });
                    }
                }
            }
            None => {
                if let Some(run) = current.take() {
                    runs.push(run);
                }
            }
        }
    }
    if let Some(run) = current.take() {
        runs.push(run);
    }

    let mut result = buffer.to_string();
    for run in runs {
        let raw_span = run.raw_lines.join(eol);
        let items: String = run
            .items
            .iter()
            .map(|item| format!("<li>{}</li>", inline::apply(item)))
            .collect();
        let tag = format!("<{0}>{items}</{0}>", run.kind.tag());
        result = result.replacen(&raw_span, &tag, 1);
    }
    result
}

/// Split on double line-breaks; segments already replaced by a block tag
/// (they start with `<`) are kept as-is, everything else is wrapped in a
/// `<p>` after inline substitution. Segments are rejoined with `"\n\n"`.
fn wrap_paragraphs(buffer: &str, eol: &str) -> String {
    let boundary = eol.repeat(2);
    buffer
        .split(boundary.as_str())
        .map(|segment| {
            if segment.starts_with('<') {
                segment.to_string()
            } else {
                format!("<p>{}</p>", inline::apply(segment))
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

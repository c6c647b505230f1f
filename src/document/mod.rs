//! The loaded markdown document.
//!
//! A `Document` is an immutable snapshot of one accepted file: raw text,
//! the base directory for resolving relative image links, and the
//! detected line-ending style. It is owned by the viewer and replaced
//! wholesale when a new file is loaded.

/// The literal extension a file must carry to be accepted.
pub const MARKDOWN_EXTENSION: &str = ".md";

/// Line-ending style of the source text.
///
/// Detected once at load; selects the split sequence used during block
/// parsing and is otherwise only tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    /// The line-break sequence for this style.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// One loaded markdown file.
#[derive(Debug, Clone)]
pub struct Document {
    raw: String,
    base_dir: String,
    line_ending: LineEnding,
}

impl Document {
    /// Create a document from raw text and the directory it came from.
    pub fn new(raw: String, base_dir: String) -> Self {
        let line_ending = if raw.contains('\r') {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        };
        Self {
            raw,
            base_dir,
            line_ending,
        }
    }

    /// The verbatim source text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The source directory, with trailing separator.
    pub fn base_dir(&self) -> &str {
        &self.base_dir
    }

    /// The detected line-ending style.
    pub const fn line_ending(&self) -> LineEnding {
        self.line_ending
    }
}

/// Returns true if the file name ends with the literal `.md`.
///
/// The check is case-sensitive: `.MD` is rejected.
pub fn is_markdown_file(path: &std::path::Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(MARKDOWN_EXTENSION))
}

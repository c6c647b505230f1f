#![allow(
    // Version mismatches between transitive dependencies are not ours to fix
    clippy::multiple_crate_versions,
    // Style preference (e.g. codeblock::CodeBlock reads fine)
    clippy::module_name_repetitions
)]

//! # Markview
//!
//! A markdown previewer core: renders markdown files to styled HTML
//! fragments with a regex-based two-pass parser.
//!
//! Markview recognizes:
//! - Headings, unordered/ordered lists, images, fenced code blocks
//! - Inline emphasis, links, inline code, numbers, email addresses
//! - Language-aware highlighting inside fences (JSON, bash, INI, plain)
//!
//! ## Architecture
//!
//! Rendering is a fixed pipeline of pure string transforms:
//! - **Block pass**: code fences, headings, images, then list runs are
//!   matched and substituted by exact raw-text match, in that order
//! - **Inline pass**: an ordered set of pattern rewrites over the
//!   remaining paragraph and list-item text
//!
//! ## Modules
//!
//! - [`render`]: Block parsing and HTML assembly
//! - [`render::inline`]: The inline substitution pipeline
//! - [`codeblock`]: Fenced code block highlighting
//! - [`document`]: The loaded document value
//! - [`viewer`]: The facade owning the document and the raw/pretty toggle

pub mod codeblock;
pub mod document;
pub mod render;
pub mod viewer;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::codeblock::{CodeBlock, HighlightStyle};
    pub use crate::document::Document;
    pub use crate::render::render;
    pub use crate::viewer::{ViewMode, Viewer};
}

//! The renderer facade.
//!
//! Owns the current [`Document`] and its rendered HTML, gates acceptance
//! on the `.md` extension, and exposes the raw/pretty toggle. Loads are
//! guarded by a monotonically increasing generation counter so a
//! superseded in-flight load can never overwrite newer state.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::document::{self, Document};
use crate::render;

/// Errors surfaced while loading a file into the viewer.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// The file name does not end in `.md`. The host shell treats this
    /// as a silent rejection, not a failure.
    #[error("not a markdown file: {0}")]
    UnsupportedExtension(String),
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Which of the two renderings the presentation sink should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    Raw,
    #[default]
    Pretty,
}

/// Proof that a load was started; carries the generation it belongs to.
///
/// Completing a load with a ticket issued before a newer `begin_load`
/// is a no-op.
#[derive(Debug)]
pub struct LoadTicket {
    generation: u64,
    base_dir: String,
}

struct Loaded {
    document: Document,
    pretty: String,
}

/// The renderer facade: current document, cached pretty HTML, view-mode
/// toggle, and the load-generation counter.
#[derive(Default)]
pub struct Viewer {
    current: Option<Loaded>,
    generation: u64,
    mode: ViewMode,
}

impl Viewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and read `path` synchronously, then install it.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedExtension` if the name does not end in `.md`
    /// (the previous document, if any, is left untouched) or `Io` if the
    /// file cannot be read as text.
    pub fn open(&mut self, path: &Path) -> Result<(), ViewerError> {
        let ticket = self.begin_load(path)?;
        let raw = fs::read_to_string(path).map_err(|source| ViewerError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.complete_load(ticket, raw);
        Ok(())
    }

    /// Start a load: validate the extension and claim the next
    /// generation. The returned ticket must be passed to
    /// [`Self::complete_load`] together with the file's text.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedExtension` if the name does not end in `.md`.
    pub fn begin_load(&mut self, path: &Path) -> Result<LoadTicket, ViewerError> {
        if !document::is_markdown_file(path) {
            return Err(ViewerError::UnsupportedExtension(
                path.display().to_string(),
            ));
        }
        self.generation += 1;
        Ok(LoadTicket {
            generation: self.generation,
            base_dir: base_dir_for(path),
        })
    }

    /// Install the text read for `ticket`, rendering the pretty HTML
    /// once. Returns false (and changes nothing) if a newer load was
    /// started since the ticket was issued.
    pub fn complete_load(&mut self, ticket: LoadTicket, raw: String) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding superseded load"
            );
            return false;
        }
        let document = Document::new(raw, ticket.base_dir);
        let pretty = render::render(document.raw(), document.base_dir());
        tracing::debug!(
            generation = ticket.generation,
            bytes = document.raw().len(),
            "document loaded"
        );
        self.current = Some(Loaded { document, pretty });
        true
    }

    /// Whether a load has completed.
    pub const fn is_ready(&self) -> bool {
        self.current.is_some()
    }

    /// The verbatim text of the current document.
    pub fn raw(&self) -> Option<&str> {
        self.current.as_ref().map(|loaded| loaded.document.raw())
    }

    /// The cached rendered HTML of the current document.
    pub fn pretty(&self) -> Option<&str> {
        self.current.as_ref().map(|loaded| loaded.pretty.as_str())
    }

    pub const fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    /// Flip between raw and pretty. Never re-parses.
    pub fn toggle(&mut self) -> ViewMode {
        self.mode = match self.mode {
            ViewMode::Raw => ViewMode::Pretty,
            ViewMode::Pretty => ViewMode::Raw,
        };
        self.mode
    }

    /// The rendering currently selected for display.
    pub fn visible(&self) -> Option<&str> {
        match self.mode {
            ViewMode::Raw => self.raw(),
            ViewMode::Pretty => self.pretty(),
        }
    }
}

/// The directory of `path`, with trailing separator, or empty for a bare
/// file name.
fn base_dir_for(path: &Path) -> String {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => format!("{}/", parent.display()),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_md(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).expect("write fixture");
        path
    }

    #[test]
    fn test_open_renders_pretty_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_md(&dir, "note.md", "# Title\n\nbody");
        let mut viewer = Viewer::new();
        viewer.open(&path).expect("open");

        assert!(viewer.is_ready());
        assert_eq!(viewer.raw(), Some("# Title\n\nbody"));
        assert_eq!(viewer.pretty(), Some("<h1>Title</h1>\n\n<p>body</p>"));
    }

    #[test]
    fn test_open_rejects_wrong_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_md(&dir, "note.txt", "# Title");
        let mut viewer = Viewer::new();

        let err = viewer.open(&path).expect_err("txt must be rejected");
        assert!(matches!(err, ViewerError::UnsupportedExtension(_)));
        assert!(!viewer.is_ready());
    }

    #[test]
    fn test_rejected_load_keeps_previous_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let good = write_md(&dir, "good.md", "kept");
        let bad = write_md(&dir, "bad.txt", "dropped");
        let mut viewer = Viewer::new();
        viewer.open(&good).expect("open");

        assert!(viewer.open(&bad).is_err());
        assert_eq!(viewer.raw(), Some("kept"));
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut viewer = Viewer::new();
        let stale = viewer.begin_load(Path::new("first.md")).expect("first");
        let fresh = viewer.begin_load(Path::new("second.md")).expect("second");

        assert!(viewer.complete_load(fresh, "second".to_string()));
        assert!(!viewer.complete_load(stale, "first".to_string()));
        assert_eq!(viewer.raw(), Some("second"));
    }

    #[test]
    fn test_toggle_flips_visible_without_reparsing() {
        let mut viewer = Viewer::new();
        let ticket = viewer.begin_load(Path::new("note.md")).expect("ticket");
        viewer.complete_load(ticket, "plain".to_string());
        let pretty_ptr = viewer.pretty().expect("pretty").as_ptr();

        assert_eq!(viewer.mode(), ViewMode::Pretty);
        assert_eq!(viewer.visible(), Some("<p>plain</p>"));
        assert_eq!(viewer.toggle(), ViewMode::Raw);
        assert_eq!(viewer.visible(), Some("plain"));
        assert_eq!(viewer.toggle(), ViewMode::Pretty);
        assert_eq!(
            viewer.pretty().expect("pretty").as_ptr(),
            pretty_ptr,
            "toggling must reuse the cached rendering"
        );
    }

    #[test]
    fn test_base_dir_has_trailing_separator() {
        assert_eq!(base_dir_for(Path::new("/docs/note.md")), "/docs/");
        assert_eq!(base_dir_for(Path::new("note.md")), "");
    }

    #[test]
    fn test_relative_image_resolves_against_file_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_md(&dir, "note.md", "![pic](./pic.png)");
        let mut viewer = Viewer::new();
        viewer.open(&path).expect("open");

        let expected = format!(
            r#"<img alt="pic" class="center" src="{}/pic.png">"#,
            dir.path().display()
        );
        assert_eq!(viewer.pretty(), Some(expected.as_str()));
    }
}

use std::path::PathBuf;

use markview::viewer::{ViewMode, Viewer, ViewerError};

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_full_document_renders_every_block_kind() {
    let dir = tempfile::tempdir().unwrap();
    let md = "\
# Readme

Intro with **bold**, *italic* and `code`.

- alpha
- beta

```bash
# install
make install
```

![logo](./logo.png)
";
    let path = write_file(&dir, "readme.md", md);

    let mut viewer = Viewer::new();
    viewer.open(&path).unwrap();
    let html = viewer.pretty().unwrap();

    assert!(html.contains("<h1>Readme</h1>"));
    assert!(html.contains("<strong>bold</strong>"));
    assert!(html.contains("<i>italic</i>"));
    assert!(html.contains("<code>code</code>"));
    assert!(html.contains("<ul><li>alpha</li><li>beta</li></ul>"));
    assert!(html.contains(r#"<div class="code pretty">"#));
    assert!(html.contains(r#"<span class="green-it"># install</span>"#));
    let logo = format!(
        r#"<img alt="logo" class="center" src="{}/logo.png">"#,
        dir.path().display()
    );
    assert!(html.contains(&logo), "expected {logo} in {html}");
}

#[test]
fn test_raw_view_is_verbatim_and_toggle_never_reparses() {
    let dir = tempfile::tempdir().unwrap();
    let md = "# Title\r\n\r\nbody\r\n";
    let path = write_file(&dir, "crlf.md", md);

    let mut viewer = Viewer::new();
    viewer.open(&path).unwrap();

    assert_eq!(viewer.raw(), Some(md), "raw view must keep CRLF verbatim");
    let rendered = viewer.pretty().unwrap().to_string();

    viewer.set_mode(ViewMode::Raw);
    assert_eq!(viewer.visible(), Some(md));
    viewer.toggle();
    assert_eq!(viewer.visible(), Some(rendered.as_str()));
}

#[test]
fn test_non_markdown_drop_is_silently_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "data.json", "{}");

    let mut viewer = Viewer::new();
    let err = viewer.open(&path).unwrap_err();
    assert!(matches!(err, ViewerError::UnsupportedExtension(_)));
    assert!(!viewer.is_ready());
    assert_eq!(viewer.visible(), None);
}

#[test]
fn test_second_load_replaces_document_wholesale() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_file(&dir, "first.md", "# First");
    let second = write_file(&dir, "second.md", "# Second");

    let mut viewer = Viewer::new();
    viewer.open(&first).unwrap();
    viewer.open(&second).unwrap();

    assert_eq!(viewer.raw(), Some("# Second"));
    assert_eq!(viewer.pretty(), Some("<h1>Second</h1>"));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let mut viewer = Viewer::new();
    let err = viewer.open(std::path::Path::new("/nonexistent/nope.md")).unwrap_err();
    assert!(matches!(err, ViewerError::Io { .. }));
}

use hashdoc::docs_config::DocsConfig;
use hashdoc::fetch::{DirectorySource, DocumentSource};
use hashdoc::pipeline::{build_site, check_site, discover_sections, load_project};
use hashdoc::render_model::PageStatus;
use hashdoc::viewer::{DocViewer, ViewState};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

fn site_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/docs-site")
}

fn output_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "hashdoc-site-{}-{}",
        name,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_fixture_config_loads() {
    let config = DocsConfig::load(site_fixture().join("hashdoc.toml")).unwrap();

    assert_eq!(config.site_title, "Hashub Docs");
    assert_eq!(config.toc_max_level, 3);
    assert_eq!(config.docs_dir, "docs");
    assert_eq!(config.sections.len(), 3);
}

#[test]
fn test_discover_fixture_documents() {
    let sections = discover_sections(&site_fixture().join("docs")).unwrap();

    let ids: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["getting-started", "guides/ocr"]);
}

#[test]
fn test_check_reports_configured_but_missing_section() {
    // Arrange
    let project = load_project(&site_fixture()).unwrap();
    let source = project.source();

    // Act
    let report = check_site(&project, source.as_ref());

    // Assert
    assert_eq!(report.rendered_count(), 2);
    let failed: Vec<(&str, PageStatus)> = report
        .failed_sections()
        .map(|s| (s.id.as_str(), s.status))
        .collect();
    assert_eq!(failed, vec![("guides/embeddings", PageStatus::NotFound)]);
    assert_eq!(report.warning_count(), 0);
}

#[test]
fn test_build_fixture_site() {
    // Arrange
    let project = load_project(&site_fixture()).unwrap();
    let source = project.source();
    let out = output_dir("build");

    // Act
    let report = build_site(&project, source.as_ref(), &out).unwrap();

    // Assert
    assert_eq!(report.written.len(), 4);

    let getting_started = fs::read_to_string(out.join("getting-started.html")).unwrap();
    assert!(getting_started.contains("<title>Getting Started - Hashub Docs</title>"));
    assert!(getting_started.contains("<nav class=\"toc\">"));
    assert!(getting_started.contains("href=\"#install-the-cli\""));
    assert!(getting_started.contains("callout-tip"));
    assert!(getting_started.contains("<script>"));

    let ocr = fs::read_to_string(out.join("guides/ocr.html")).unwrap();
    assert!(ocr.contains("<th style=\"text-align: right;\">Max size</th>"));
    assert!(ocr.contains("callout-warning"));
    assert!(ocr.contains("callout-danger"));
    assert!(ocr.contains("<strong>80+ others <em>including right-to-left</em> scripts</strong>"));
    // toc_max_level = 3 keeps level-3 headings in the sidebar
    assert!(ocr.contains("<li class=\"toc-level-3\"><a href=\"#languages\">Languages</a>"));

    let missing = fs::read_to_string(out.join("guides/embeddings.html")).unwrap();
    assert!(missing.contains("not found"));

    let index = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(index.contains("href=\"guides/ocr.html\""));
    assert!(index.contains("OCR Guide"));

    fs::remove_dir_all(&out).unwrap();
}

#[test]
fn test_viewer_over_directory_source() {
    // Arrange
    let source = Arc::new(DirectorySource::new(site_fixture().join("docs")));
    let mut viewer = DocViewer::new(
        DocsConfig::load(site_fixture().join("hashdoc.toml"))
            .unwrap()
            .render_options(),
    );

    // Act: navigate twice, the first response lands after the second navigation
    let first = viewer.spawn_fetch(Arc::clone(&source), "guides/ocr");
    let second = viewer.spawn_fetch(Arc::clone(&source), "getting-started");
    let applied_second = viewer.finish(second);
    let applied_first = viewer.finish(first);

    // Assert
    assert!(applied_second);
    assert!(!applied_first);
    match viewer.state() {
        ViewState::Ready { section_id, page } => {
            assert_eq!(section_id, "getting-started");
            assert_eq!(page.copy_text(0), Some("pip install hashub\nhashub login"));
        }
        other => panic!("unexpected state: {:?}", other),
    }
    assert!(source.location("guides/ocr").ends_with("ocr.md"));
}

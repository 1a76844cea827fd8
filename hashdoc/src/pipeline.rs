//! Site build pipeline
//!
//! Building a documentation site runs in three stages:
//! 1. **Planning**: load hashdoc.toml and decide which sections to build
//!    (the configured list, or every `*.md` under the docs directory)
//! 2. **Rendering**: fetch and render every section (optionally in parallel)
//! 3. **Writing**: write one standalone HTML page per section plus an index

use crate::docs_config::{
    DocsConfig, DocsConfigError, SectionEntry, CONFIG_FILE_NAME, SITE_INDEX_ID,
};
use crate::fetch::{validate_section_id, DirectorySource, DocumentSource, HttpSource};
use crate::html_renderer::{write_standalone_page, HtmlExportError};
use crate::render_model::{
    render_fetched, slugify, Inline, ListItem, PageStatus, RenderOptions, RenderWarning,
    RenderedBlock, RenderedPage,
};
use itertools::Itertools;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A loaded documentation project
#[derive(Debug, Clone)]
pub struct DocsProject {
    /// Directory containing hashdoc.toml
    pub root: PathBuf,
    /// Parsed configuration
    pub config: DocsConfig,
    /// Sections to build, in navigation order
    pub sections: Vec<SectionEntry>,
}

impl DocsProject {
    /// Directory holding the markdown documents
    pub fn docs_dir(&self) -> PathBuf {
        self.root.join(&self.config.docs_dir)
    }

    /// Document source described by the configuration
    ///
    /// A configured `base_url` wins over the local docs directory.
    pub fn source(&self) -> Box<dyn DocumentSource + Send + Sync> {
        match &self.config.base_url {
            Some(base_url) => {
                log::info!("Fetching documents from {}", base_url);
                Box::new(HttpSource::new(base_url))
            }
            None => {
                log::info!("Reading documents from {}", self.docs_dir().display());
                Box::new(DirectorySource::new(self.docs_dir()))
            }
        }
    }
}

/// Stage 1: Load a documentation project
///
/// # Parameters
/// * `root` - Directory containing hashdoc.toml
///
/// # Returns
/// * `Ok(DocsProject)` - Configuration plus the sections to build
/// * `Err(BuildError)` - Error loading configuration or discovering documents
pub fn load_project(root: &Path) -> Result<DocsProject, BuildError> {
    let config_path = root.join(CONFIG_FILE_NAME);
    let config = DocsConfig::load(&config_path).map_err(|source| BuildError::Config {
        path: config_path.clone(),
        source,
    })?;

    let sections = if !config.sections.is_empty() {
        config.sections.clone()
    } else if config.base_url.is_some() {
        return Err(BuildError::NoSections(config_path));
    } else {
        discover_sections(&root.join(&config.docs_dir))?
    };

    if sections.is_empty() {
        return Err(BuildError::NoSections(root.join(&config.docs_dir)));
    }

    log::info!("Planned {} sections", sections.len());

    Ok(DocsProject {
        root: root.to_path_buf(),
        config,
        sections,
    })
}

/// Discover documentation sections in a directory
///
/// Every `*.md` file becomes a section whose id is its path relative to
/// `dir` without the extension, using `/` separators. Files whose relative
/// path cannot form a section id are skipped with a warning. A top-level
/// `index.md` is rejected because `index.html` holds the site index.
///
/// # Returns
/// * `Ok(Vec<SectionEntry>)` - Sections sorted by id
/// * `Err(BuildError)` - The directory is missing, could not be walked or
///   uses the reserved index id
pub fn discover_sections(dir: &Path) -> Result<Vec<SectionEntry>, BuildError> {
    if !dir.is_dir() {
        return Err(BuildError::MissingDocsDir(dir.to_path_buf()));
    }

    let mut ids = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(|source| BuildError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|s| s.to_str()) != Some("md")
        {
            continue;
        }

        let Some(id) = section_id_for(path, dir) else {
            log::warn!("Skipping {}: not a valid section path", path.display());
            continue;
        };
        if id == SITE_INDEX_ID {
            return Err(BuildError::ReservedSectionId(id));
        }
        ids.push(id);
    }

    Ok(ids
        .into_iter()
        .sorted()
        .map(|id| SectionEntry {
            title: title_from_id(&id),
            id,
        })
        .collect())
}

/// Section id of a markdown file below `root`
fn section_id_for(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let id = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?
        .join("/");

    validate_section_id(&id).ok().map(|_| id)
}

/// Derive a navigation title from the last segment of a section id
///
/// `guides/getting-started` becomes "Getting Started".
fn title_from_id(id: &str) -> String {
    let slug = id.rsplit('/').next().unwrap_or(id);
    slug.replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Result of rendering one section
#[derive(Debug, Clone)]
pub struct SectionReport {
    /// Section id
    pub id: String,
    /// Navigation title
    pub title: String,
    /// Whether real content or a fallback was produced
    pub status: PageStatus,
    /// Warnings found while rendering
    pub warnings: Vec<RenderWarning>,
    /// Number of table of contents entries
    pub heading_count: usize,
    /// Number of code blocks with copy buttons
    pub code_block_count: usize,
}

/// Summary of a build or check run
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// One entry per section, in navigation order
    pub sections: Vec<SectionReport>,
    /// Files written, empty for a check run
    pub written: Vec<PathBuf>,
}

impl BuildReport {
    /// Number of sections rendered from real content
    pub fn rendered_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| s.status == PageStatus::Rendered)
            .count()
    }

    /// Sections that fell back to the "not found"/"not available" block
    pub fn failed_sections(&self) -> impl Iterator<Item = &SectionReport> {
        self.sections
            .iter()
            .filter(|s| s.status != PageStatus::Rendered)
    }

    /// Total number of render warnings
    pub fn warning_count(&self) -> usize {
        self.sections.iter().map(|s| s.warnings.len()).sum()
    }
}

/// Stage 2: Fetch and render every section
///
/// Fetch failures never abort the run; the affected section gets the
/// fallback page.
pub fn render_sections<S>(
    sections: &[SectionEntry],
    source: &S,
    options: &RenderOptions,
) -> Vec<(SectionEntry, RenderedPage)>
where
    S: DocumentSource + Sync + ?Sized,
{
    let render_one = |section: &SectionEntry| {
        log::info!("Rendering {} from {}", section.id, source.location(&section.id));
        let page = render_fetched(source.fetch(&section.id), options);
        for warning in &page.warnings {
            log::warn!("{}: {}", section.id, warning);
        }
        (section.clone(), page)
    };

    #[cfg(feature = "parallel")]
    let pages = sections.par_iter().map(render_one).collect();

    #[cfg(not(feature = "parallel"))]
    let pages = sections.iter().map(render_one).collect();

    pages
}

fn report_for(section: &SectionEntry, page: &RenderedPage) -> SectionReport {
    SectionReport {
        id: section.id.clone(),
        title: section.title.clone(),
        status: page.status,
        warnings: page.warnings.clone(),
        heading_count: page.headings.len(),
        code_block_count: page.code_blocks.len(),
    }
}

/// Render every section without writing anything
pub fn check_site<S>(project: &DocsProject, source: &S) -> BuildReport
where
    S: DocumentSource + Sync + ?Sized,
{
    let options = project.config.render_options();
    let sections = render_sections(&project.sections, source, &options)
        .iter()
        .map(|(section, page)| report_for(section, page))
        .collect();

    BuildReport {
        sections,
        written: Vec::new(),
    }
}

/// Stage 3: Render every section and write the site
///
/// # Parameters
/// * `project` - Loaded project
/// * `source` - Where documents come from
/// * `out_dir` - Output directory; `{section_id}.html` files and `index.html` are written here
///
/// # Returns
/// * `Ok(BuildReport)` - Per-section results and written files
/// * `Err(BuildError)` - A section uses the reserved index id, or an output
///   file could not be written
pub fn build_site<S>(
    project: &DocsProject,
    source: &S,
    out_dir: &Path,
) -> Result<BuildReport, BuildError>
where
    S: DocumentSource + Sync + ?Sized,
{
    // Nothing is written when a section would be overwritten by the index
    if let Some(section) = project.sections.iter().find(|s| s.id == SITE_INDEX_ID) {
        return Err(BuildError::ReservedSectionId(section.id.clone()));
    }

    let options = project.config.render_options();
    let pages = render_sections(&project.sections, source, &options);

    let mut report = BuildReport::default();
    for (section, page) in &pages {
        let path = out_dir.join(format!("{}.html", section.id));
        let title = format!("{} - {}", section.title, project.config.site_title);
        write_page(&path, &title, page, &options)?;

        report.sections.push(report_for(section, page));
        report.written.push(path);
    }

    let index_path = out_dir.join(format!("{}.html", SITE_INDEX_ID));
    let index = RenderedPage::from_blocks(index_blocks(project), Vec::new(), &options);
    write_page(&index_path, &project.config.site_title, &index, &options)?;
    report.written.push(index_path);

    log::info!(
        "Wrote {} pages to {}",
        report.written.len(),
        out_dir.display()
    );

    Ok(report)
}

fn write_page(
    path: &Path,
    title: &str,
    page: &RenderedPage,
    options: &RenderOptions,
) -> Result<(), BuildError> {
    write_standalone_page(path, title, page, options).map_err(|source| BuildError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Blocks of the site index page: the site title and one link per section
///
/// Titles are kept as plain text, so markdown punctuation in them is shown
/// as written.
fn index_blocks(project: &DocsProject) -> Vec<RenderedBlock> {
    let site_title = &project.config.site_title;
    let items = project
        .sections
        .iter()
        .map(|section| ListItem {
            task_list: None,
            content: vec![RenderedBlock::Paragraph(vec![Inline::Link {
                url: format!("{}.html", section.id),
                title: None,
                children: vec![Inline::Text(section.title.clone())],
            }])],
        })
        .collect();

    vec![
        RenderedBlock::Heading {
            level: 1,
            id: slugify(site_title),
            content: vec![Inline::Text(site_title.clone())],
        },
        RenderedBlock::List { start: None, items },
    ]
}

/// Site build errors
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Config error loading {path}: {source}", path = .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: DocsConfigError,
    },

    #[error("Docs directory not found: {path}", path = .0.display())]
    MissingDocsDir(PathBuf),

    #[error("Failed to scan {path}: {source}", path = .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("No documentation sections configured or found for {path}", path = .0.display())]
    NoSections(PathBuf),

    #[error("Section id '{0}' is reserved for the site index")]
    ReservedSectionId(String),

    #[error("Failed to write {path}: {source}", path = .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: HtmlExportError,
    },
}

//! Documentation site configuration from hashdoc.toml

use crate::fetch::validate_section_id;
use crate::render_model::{RenderOptions, MAX_TOC_LEVEL};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Name of the configuration file at the root of a docs project
pub const CONFIG_FILE_NAME: &str = "hashdoc.toml";

/// Section id taken by the generated site index (`index.html`)
pub const SITE_INDEX_ID: &str = "index";

/// Main site configuration from hashdoc.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Title shown in page titles
    pub site_title: String,

    /// Fetch documents from `{base_url}/{section_id}.md` instead of the docs directory
    pub base_url: Option<String>,

    /// Directory holding `{section_id}.md` files, relative to the config file
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,

    /// Open absolute links in a new tab
    #[serde(default = "default_true")]
    pub external_links_new_tab: bool,

    /// Deepest heading level listed in the table of contents
    #[serde(default = "default_toc_max_level")]
    pub toc_max_level: usize,

    /// Emit copy buttons on code blocks
    #[serde(default = "default_true")]
    pub copy_buttons: bool,

    /// Documentation sections in navigation order; empty means discover from `docs_dir`
    #[serde(default)]
    pub sections: Vec<SectionEntry>,
}

/// One documentation section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionEntry {
    /// Section id, also the document path without `.md`
    pub id: String,

    /// Navigation title
    pub title: String,
}

fn default_docs_dir() -> String {
    "docs".to_string()
}

fn default_true() -> bool {
    true
}

fn default_toc_max_level() -> usize {
    MAX_TOC_LEVEL
}

impl DocsConfig {
    /// Create a configuration with defaults and no sections
    pub fn new(site_title: &str) -> Self {
        Self {
            site_title: site_title.to_string(),
            base_url: None,
            docs_dir: default_docs_dir(),
            external_links_new_tab: true,
            toc_max_level: MAX_TOC_LEVEL,
            copy_buttons: true,
            sections: Vec::new(),
        }
    }

    /// Load configuration from a hashdoc.toml file
    ///
    /// # Parameters
    /// * `path` - Path to the hashdoc.toml configuration file
    ///
    /// # Returns
    /// * `Ok(DocsConfig)` - Successfully loaded and validated configuration
    /// * `Err(DocsConfigError)` - Error reading, parsing or validating the file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DocsConfigError> {
        let content = fs::read_to_string(&path).map_err(DocsConfigError::IoError)?;

        let config: DocsConfig = toml::from_str(&content).map_err(DocsConfigError::ParseError)?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a hashdoc.toml file
    ///
    /// # Parameters
    /// * `path` - Path where the hashdoc.toml file will be written
    ///
    /// # Returns
    /// * `Ok(())` - Successfully saved configuration
    /// * `Err(DocsConfigError)` - Error serializing or writing the configuration file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DocsConfigError> {
        let content = toml::to_string_pretty(self).map_err(DocsConfigError::SerializeError)?;

        fs::write(&path, content).map_err(DocsConfigError::IoError)?;

        Ok(())
    }

    /// Check section ids and option ranges
    pub fn validate(&self) -> Result<(), DocsConfigError> {
        if !(1..=MAX_TOC_LEVEL).contains(&self.toc_max_level) {
            return Err(DocsConfigError::InvalidValue(format!(
                "toc_max_level must be between 1 and {}, got {}",
                MAX_TOC_LEVEL, self.toc_max_level
            )));
        }

        let mut seen = HashSet::new();
        for section in &self.sections {
            if validate_section_id(&section.id).is_err() {
                return Err(DocsConfigError::InvalidValue(format!(
                    "invalid section id '{}'",
                    section.id
                )));
            }
            if section.id == SITE_INDEX_ID {
                return Err(DocsConfigError::InvalidValue(format!(
                    "section id '{}' is reserved for the site index",
                    SITE_INDEX_ID
                )));
            }
            if !seen.insert(section.id.as_str()) {
                return Err(DocsConfigError::InvalidValue(format!(
                    "section '{}' is listed more than once",
                    section.id
                )));
            }
        }

        Ok(())
    }

    /// Look up a configured section by id
    pub fn section(&self, id: &str) -> Option<&SectionEntry> {
        self.sections.iter().find(|section| section.id == id)
    }

    /// Rendering options described by this configuration
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            external_links_new_tab: self.external_links_new_tab,
            toc_max_level: self.toc_max_level.clamp(1, MAX_TOC_LEVEL),
            copy_buttons: self.copy_buttons,
        }
    }
}

/// Errors that can occur when loading or saving site configuration
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum DocsConfigError {
    /// IO error when reading or writing file
    IoError(std::io::Error),

    /// Error parsing TOML
    ParseError(toml::de::Error),

    /// Error serializing to TOML
    SerializeError(toml::ser::Error),

    /// A value is out of range or malformed
    InvalidValue(String),
}

impl std::fmt::Display for DocsConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocsConfigError::IoError(e) => write!(f, "IO error: {}", e),
            DocsConfigError::ParseError(e) => write!(f, "TOML parse error: {}", e),
            DocsConfigError::SerializeError(e) => write!(f, "TOML serialize error: {}", e),
            DocsConfigError::InvalidValue(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for DocsConfigError {}

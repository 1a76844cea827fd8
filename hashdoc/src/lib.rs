//! hashdoc - documentation page renderer
//!
//! Turns raw Markdown documentation pages into anchored HTML with a table
//! of contents, styled callouts and copyable code blocks. Pages can be
//! rendered one at a time, viewed through [`viewer::DocViewer`], or built
//! into a static site with [`pipeline`].

#![deny(unsafe_code)]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::enum_variant_names)]

pub mod docs_config;
pub mod fetch;
pub mod html_renderer;
pub mod pipeline;
pub mod render_model;
pub mod viewer;

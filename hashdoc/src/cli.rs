//! Command-line interface definitions for hashdoc

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI structure for the hashdoc application
#[derive(Parser)]
#[command(name = "hashdoc")]
#[command(version)]
#[command(about = "Markdown documentation renderer", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for hashdoc
#[derive(Subcommand)]
pub enum Commands {
    /// Render one markdown page to HTML
    Render {
        /// Markdown file, or an http(s) URL to fetch it from
        input: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a complete HTML page with styles, navigation and copy script
        #[arg(short, long)]
        standalone: bool,

        /// Keep absolute links in the current tab
        #[arg(long)]
        same_tab_links: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the table of contents of a markdown page
    Toc {
        /// Markdown file, or an http(s) URL to fetch it from
        input: String,

        /// Deepest heading level to list
        #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(1..=4))]
        max_level: u8,
    },

    /// Build a static documentation site
    Build {
        /// Project directory containing hashdoc.toml (defaults to current directory)
        #[arg(value_name = "PATH", default_value = ".")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "site")]
        output: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Render every section and report missing pages and warnings
    Check {
        /// Project directory containing hashdoc.toml (defaults to current directory)
        #[arg(value_name = "PATH", default_value = ".")]
        input: PathBuf,

        /// Treat render warnings as errors
        #[arg(long)]
        strict: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

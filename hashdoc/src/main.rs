//! hashdoc - Markdown documentation renderer
//!
//! A CLI tool for rendering documentation pages and building static
//! documentation sites from Markdown.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use hashdoc::fetch;
use hashdoc::html_renderer;
use hashdoc::pipeline::{self, BuildReport};
use hashdoc::render_model::{
    extract_headings, render_document, render_fetched, PageStatus, RenderOptions, RenderedPage,
};
use std::path::{Path, PathBuf};

/// Main entry point for the hashdoc CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            output,
            standalone,
            same_tab_links,
            verbose,
        } => {
            init_logging(verbose);
            handle_render_command(&input, output, standalone, same_tab_links)?;
        }

        Commands::Toc { input, max_level } => {
            init_logging(false);
            handle_toc_command(&input, usize::from(max_level))?;
        }

        Commands::Build {
            input,
            output,
            verbose,
        } => {
            init_logging(verbose);
            handle_build_command(&input, &output, verbose)?;
        }

        Commands::Check {
            input,
            strict,
            verbose,
        } => {
            init_logging(verbose);
            handle_check_command(&input, strict, verbose)?;
        }
    }

    Ok(())
}

/// Initialize logging; `--verbose` raises the level to Info
fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.init();
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Read a markdown document from a file or URL
fn load_markdown(input: &str) -> Result<String> {
    if is_url(input) {
        fetch::fetch_url(input).with_context(|| format!("Failed to fetch {}", input))
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))
    }
}

/// Title for a standalone page: the first level-1 heading, else the input name
fn page_title(page: &RenderedPage, input: &str) -> String {
    page.headings
        .iter()
        .find(|h| h.level == 1)
        .map(|h| h.text.clone())
        .unwrap_or_else(|| {
            Path::new(input)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(input)
                .to_string()
        })
}

fn status_label(status: PageStatus) -> &'static str {
    match status {
        PageStatus::Rendered => "rendered",
        PageStatus::NotFound => "not found",
        PageStatus::Unavailable => "not available",
    }
}

/// Handle the render command
fn handle_render_command(
    input: &str,
    output: Option<PathBuf>,
    standalone: bool,
    same_tab_links: bool,
) -> Result<()> {
    let options = RenderOptions {
        external_links_new_tab: !same_tab_links,
        ..RenderOptions::default()
    };

    // A failed URL fetch still produces the fallback page
    let page = if is_url(input) {
        render_fetched(fetch::fetch_url(input), &options)
    } else {
        let markdown = load_markdown(input)?;
        render_document(&markdown, &options)
    };

    if page.is_fallback() {
        eprintln!(
            "Warning: {} is {}; rendering fallback page",
            input,
            status_label(page.status)
        );
    }
    for warning in &page.warnings {
        eprintln!("Warning: {}", warning);
    }

    let html = if standalone {
        html_renderer::render_standalone_page(&page_title(&page, input), &page, &options)
    } else {
        page.html.clone()
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            }
            std::fs::write(&path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "✓ Wrote {} ({} headings, {} code blocks)",
                path.display(),
                page.headings.len(),
                page.code_blocks.len()
            );
        }
        None => print!("{}", html),
    }

    Ok(())
}

/// Handle the toc command
fn handle_toc_command(input: &str, max_level: usize) -> Result<()> {
    let markdown = load_markdown(input)?;

    for heading in extract_headings(&markdown)
        .iter()
        .filter(|h| h.level <= max_level)
    {
        println!(
            "{}- {} (#{})",
            "  ".repeat(heading.level - 1),
            heading.text,
            heading.id
        );
    }

    Ok(())
}

/// Handle the build command
fn handle_build_command(input: &Path, output: &Path, verbose: bool) -> Result<()> {
    println!("Building documentation site...");
    println!("Input: {}", input.display());
    println!("Output: {}", output.display());

    // Stage 1: Load configuration and plan sections
    println!("\n[Stage 1/2] Loading project...");
    let project = pipeline::load_project(input)
        .with_context(|| format!("Failed to load project from {}", input.display()))?;
    println!("✓ Planned {} sections", project.sections.len());

    // Stage 2: Render and write every page
    println!("\n[Stage 2/2] Rendering pages...");
    let source = project.source();
    let report = pipeline::build_site(&project, source.as_ref(), output)
        .with_context(|| format!("Failed to write site to {}", output.display()))?;

    print_report(&report, verbose);
    println!(
        "\n✓ Successfully wrote {} files to {}",
        report.written.len(),
        output.display()
    );

    Ok(())
}

/// Handle the check command
fn handle_check_command(input: &Path, strict: bool, verbose: bool) -> Result<()> {
    println!("Checking documentation in {}...", input.display());

    let project = pipeline::load_project(input)
        .with_context(|| format!("Failed to load project from {}", input.display()))?;
    let source = project.source();
    let report = pipeline::check_site(&project, source.as_ref());

    print_report(&report, verbose);

    let failed = report.failed_sections().count();
    if failed > 0 {
        anyhow::bail!("{} of {} sections could not be loaded", failed, report.sections.len());
    }
    if strict && report.warning_count() > 0 {
        anyhow::bail!("{} render warnings (strict mode)", report.warning_count());
    }

    println!("\n✓ All sections OK");
    Ok(())
}

fn print_report(report: &BuildReport, verbose: bool) {
    println!(
        "✓ Rendered {} of {} sections",
        report.rendered_count(),
        report.sections.len()
    );

    for section in &report.sections {
        if section.status != PageStatus::Rendered {
            println!("  ✗ {}: {}", section.id, status_label(section.status));
        } else if verbose {
            println!(
                "  - {} ({} headings, {} code blocks)",
                section.id, section.heading_count, section.code_block_count
            );
        }
        for warning in &section.warnings {
            println!("  ! {}: {}", section.id, warning);
        }
    }

    if report.warning_count() > 0 {
        println!("{} warnings", report.warning_count());
    }
}

//! Merge one PowerPoint deck into another deck's layout, or analyze a deck.
//!
//! # Usage
//!
//! Analyze a template deck, optionally with one layout and the theme:
//! ```sh
//! pptx-merge --analyze template.pptx --layout 6 --theme
//! ```
//!
//! Append every slide of `content.pptx` to `template.pptx` on layout 6,
//! converting sample text into `{{marker}}` form:
//! ```sh
//! pptx-merge --base template.pptx --source content.pptx --output merged.pptx
//! ```
//!
//! Keep the source text as is:
//! ```sh
//! pptx-merge --base template.pptx --source content.pptx --output merged.pptx --no-template
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use slidewright::ooxml::pptx::Package;
use slidewright::tools::{DeckSummary, LayoutDetail, MergeOptions, ThemeSummary, merge_decks};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Merge PowerPoint decks onto a template layout
#[derive(Parser, Debug)]
#[command(
    name = "pptx-merge",
    about = "Merge PowerPoint decks onto a template layout, or analyze a template",
    version
)]
struct Args {
    /// Deck to analyze
    #[arg(long, value_name = "FILE")]
    analyze: Option<PathBuf>,

    /// Layout index, negative counting from the end: shown in detail with
    /// --analyze, used for new slides when merging
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    layout: Option<isize>,

    /// Also analyze the theme (with --analyze)
    #[arg(long)]
    theme: bool,

    /// Deck whose masters and layouts the merged slides use
    #[arg(long, value_name = "FILE")]
    base: Option<PathBuf>,

    /// Deck whose slides are appended
    #[arg(long, value_name = "FILE")]
    source: Option<PathBuf>,

    /// Merged deck to write
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Keep the source text instead of converting it to markers
    #[arg(long)]
    no_template: bool,
}

fn open(path: &Path) -> Result<Package> {
    Package::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

fn analyze(path: &Path, layout: Option<isize>, theme: bool) -> Result<()> {
    let pkg = open(path)?;
    let mut out = io::stdout().lock();

    DeckSummary::from_package(path.display().to_string(), &pkg)?.write_to(&mut out)?;
    if let Some(index) = layout {
        writeln!(out)?;
        LayoutDetail::from_package(&pkg, index)?.write_to(&mut out)?;
    }
    if theme {
        writeln!(out)?;
        ThemeSummary::open(path)?.write_to(&mut out)?;
    }
    Ok(())
}

fn merge(base: &Path, source: &Path, output: &Path, options: &MergeOptions) -> Result<()> {
    let mut base_pkg = open(base)?;
    let source_pkg = open(source)?;

    let report = merge_decks(&mut base_pkg, &source_pkg, options)?;
    let mut out = io::stdout().lock();
    report.write_to(&mut out)?;

    base_pkg
        .save(output)
        .with_context(|| format!("Failed to save {}", output.display()))?;
    writeln!(
        out,
        "\n✓ 완료: {} (총 {}개 슬라이드)",
        output.display(),
        report.total_slide_count
    )?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if let Some(path) = &args.analyze {
        return analyze(path, args.layout, args.theme);
    }

    if let (Some(base), Some(source), Some(output)) = (&args.base, &args.source, &args.output) {
        let options = MergeOptions {
            layout_index: args.layout,
            apply_template: !args.no_template,
            ..MergeOptions::default()
        };
        return merge(base, source, output, &options);
    }

    Args::command().print_help()?;
    std::process::exit(1);
}

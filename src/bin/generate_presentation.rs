//! Build the twelve-slide jjiban deck from a template deck.
//!
//! Each section duplicates one template slide, rewrites its title and adds
//! its text boxes and shapes; the template slides are removed afterwards.
//!
//! # Usage
//!
//! ```sh
//! generate-presentation
//! generate-presentation --input template.pptx --output deck.pptx
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use slidewright::ooxml::pptx::Package;
use slidewright::tools::{DeckPlan, build_deck};
use std::path::PathBuf;

/// Generate the jjiban presentation from a template deck
#[derive(Parser, Debug)]
#[command(name = "generate-presentation", version, about, long_about = None)]
struct Args {
    /// Template deck the slides are duplicated from
    #[arg(short, long, default_value = "PPT기본양식_병합.pptx")]
    input: PathBuf,

    /// Deck to write
    #[arg(short, long, default_value = "jjiban_presentation.pptx")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut pkg = Package::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let report = build_deck(&mut pkg, &DeckPlan::jjiban())?;
    log::info!(
        "{} template slides replaced by {} generated slides",
        report.original_slide_count,
        report.final_slide_count
    );

    pkg.save(&args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;
    println!("Presentation saved to {}", args.output.display());
    Ok(())
}

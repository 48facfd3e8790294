//! Slidewright - editing PowerPoint (.pptx) decks built from templates
//!
//! This library reads and writes Office Open XML presentations and provides
//! the deck-level operations of the `generate-presentation` and
//! `pptx-merge` tools.
//!
//! # Features
//!
//! - **OPC layer**: ZIP container, content types and relationships
//! - **PresentationML**: slides, layouts, masters, shapes and text frames
//! - **Slide copy**: duplication within a deck and import across decks, with
//!   images and other related parts carried along
//! - **Template conversion**: sample text rewritten into `{{marker}}` form
//! - **Analysis**: slide size, layouts, placeholder geometry and theme
//!
//! # Example - Merging two decks
//!
//! ```no_run
//! use slidewright::ooxml::pptx::Package;
//! use slidewright::tools::{MergeOptions, merge_decks};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut base = Package::open("template.pptx")?;
//! let source = Package::open("content.pptx")?;
//!
//! let report = merge_decks(&mut base, &source, &MergeOptions::default())?;
//! report.write_to(&mut std::io::stdout())?;
//! base.save("merged.pptx")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Editing slide text
//!
//! ```no_run
//! use slidewright::ooxml::pptx::Package;
//! use slidewright::tools::{replace_text, set_text_by_index};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pkg = Package::open("deck.pptx")?;
//! let mut slide = pkg.duplicate_slide(0)?;
//! set_text_by_index(&mut slide, 0, "New title", Some(32.0), true);
//! replace_text(&mut slide, &[("2024", "2025")]);
//! pkg.store_slide(&slide)?;
//! pkg.save("deck-edited.pptx")?;
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod ooxml;
pub mod tools;

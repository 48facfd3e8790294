//! Office Open XML (OOXML) format implementation.
//!
//! The module is organized in two layers:
//!
//! 1. **OPC Layer** (`opc`): Low-level package handling (ZIP, parts, relationships)
//! 2. **PresentationML** (`pptx`): slides, layouts, masters and shapes
//!
//! Errors of the OPC layer convert into [`OoxmlError`], so both layers
//! propagate with `?`.
//!
//! # Example
//!
//! ```rust,no_run
//! use slidewright::ooxml::pptx::Package;
//!
//! let pkg = Package::open("presentation.pptx")?;
//! println!("{} slides", pkg.slide_count()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod error;
pub mod opc;
pub mod pptx;

// Re-export commonly used types from OPC layer
pub use opc::{OpcPackage, PackURI};

// Re-export error types
pub use error::{OoxmlError, Result};

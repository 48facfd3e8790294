//! PowerPoint (.pptx) presentation support.
//!
//! This module reads and edits Microsoft PowerPoint presentations in the
//! Office Open XML (OOXML) format (.pptx, .pptm and .potx files):
//!
//! - [`Package`]: the .pptx file, its slide list, masters and layouts
//! - [`Slide`]: one slide and its shapes, loaded as an owned value
//! - [`SlideMaster`] / [`SlideLayout`]: the layout system new slides are
//!   created from
//! - [`shapes`]: shapes, text frames, paragraphs and runs
//! - [`parts`]: the presentation and theme parts
//!
//! # Example
//!
//! ```rust,no_run
//! use slidewright::ooxml::pptx::Package;
//!
//! let mut pkg = Package::open("presentation.pptx")?;
//! for slide in pkg.slides()? {
//!     println!("{}: {:?}", slide.partname(), slide.texts());
//! }
//!
//! let layout = pkg.layout(6)?;
//! pkg.add_slide(&layout)?;
//! pkg.save("presentation-out.pptx")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod copy;
pub mod layout;
pub mod package;
pub mod parts;
pub mod shapes;
pub mod slide;

#[cfg(test)]
pub(crate) mod fixtures;

pub use copy::PartImporter;
pub use layout::{SlideLayout, SlideMaster};
pub use package::Package;
pub use slide::Slide;

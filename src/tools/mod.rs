//! Deck-level operations built on [`crate::ooxml::pptx`].
//!
//! - [`deck_plan`]: assembling a fixed sequence of slides from a template
//!   deck by duplication, text overwrite and overlays
//! - [`merge`]: appending one deck's slides onto another deck's layout
//! - [`template`]: rewriting sample text into `{{marker}}` form
//! - [`text`]: slide-wide text edits
//! - [`analyze`]: reports on a deck's layouts and theme
pub mod analyze;
pub mod deck_plan;
pub mod merge;
pub mod template;
pub mod text;

pub use analyze::{DeckSummary, LayoutDetail, ThemeSummary};
pub use deck_plan::{BuildReport, DeckPlan, Overlay, SectionPlan, TitleStrategy, build_deck};
pub use merge::{MergeOptions, MergeReport, merge_decks};
pub use template::{TemplateRules, find_markers, format_markers};
pub use text::{replace_text, set_text_by_index};

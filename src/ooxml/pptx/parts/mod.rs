/// Parts for PowerPoint presentation documents.
pub mod presentation;
pub mod theme;

pub use presentation::{PresentationPart, SlideId};
pub use theme::{ColorScheme, ColorValue, FontScheme, Theme, ThemeColor, ThemeFont, ThemePart};

/// Theme parts for PowerPoint presentations.
///
/// Reads the color scheme and font scheme of a theme (`/ppt/theme/themeN.xml`).
use crate::common::xml::{XmlDocument, XmlElement};
use crate::ooxml::error::Result;
use crate::ooxml::opc::part::Part;

/// Value of a color scheme slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorValue {
    /// `a:srgbClr/@val`, as `RRGGBB`
    Rgb(String),
    /// `a:sysClr`, with its `lastClr` when present
    System { last_color: Option<String> },
    /// Neither an sRGB nor a system color
    Other,
}

/// One slot of a color scheme (`dk1`, `lt1`, `accent1`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeColor {
    pub slot: String,
    pub value: ColorValue,
}

/// `a:clrScheme`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorScheme {
    pub name: Option<String>,
    /// Slots in document order
    pub colors: Vec<ThemeColor>,
}

/// Typefaces of `a:majorFont` or `a:minorFont`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeFont {
    /// `a:latin/@typeface`; `None` when the element is missing
    pub latin: Option<String>,
    /// `a:ea/@typeface`; `None` when the element is missing
    pub east_asian: Option<String>,
}

/// `a:fontScheme`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontScheme {
    pub name: Option<String>,
    /// Heading font
    pub major: Option<ThemeFont>,
    /// Body font
    pub minor: Option<ThemeFont>,
}

/// Theme information extracted from a theme part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: Option<String>,
    pub color_scheme: Option<ColorScheme>,
    pub font_scheme: Option<FontScheme>,
}

impl Theme {
    /// Parse theme XML.
    pub fn from_xml(xml: &[u8]) -> Result<Self> {
        let doc = XmlDocument::parse(xml)?;
        let root = doc.root();

        Ok(Self {
            name: root.attr("name"),
            color_scheme: root.find("clrScheme").map(parse_color_scheme),
            font_scheme: root.find("fontScheme").map(parse_font_scheme),
        })
    }
}

fn parse_color_scheme(scheme: &XmlElement) -> ColorScheme {
    let colors = scheme
        .elements()
        .map(|slot| {
            let value = if let Some(srgb) = slot.find("srgbClr") {
                ColorValue::Rgb(srgb.attr("val").unwrap_or_default())
            } else if let Some(sys) = slot.find("sysClr") {
                ColorValue::System {
                    last_color: sys.attr("lastClr"),
                }
            } else {
                ColorValue::Other
            };
            ThemeColor {
                slot: slot.local_name().to_string(),
                value,
            }
        })
        .collect();

    ColorScheme {
        name: scheme.attr("name"),
        colors,
    }
}

fn parse_font_scheme(scheme: &XmlElement) -> FontScheme {
    let font = |local: &str| {
        scheme.find(local).map(|font| ThemeFont {
            latin: font.child("latin").map(|el| el.attr("typeface").unwrap_or_default()),
            east_asian: font.child("ea").map(|el| el.attr("typeface").unwrap_or_default()),
        })
    };

    FontScheme {
        name: scheme.attr("name"),
        major: font("majorFont"),
        minor: font("minorFont"),
    }
}

/// Theme part - defines the visual styling of a presentation.
pub struct ThemePart<'a> {
    /// The underlying OPC part
    part: &'a dyn Part,
}

impl<'a> ThemePart<'a> {
    pub fn from_part(part: &'a dyn Part) -> Self {
        Self { part }
    }

    /// Parse the theme.
    pub fn theme(&self) -> Result<Theme> {
        Theme::from_xml(self.part.blob())
    }
}

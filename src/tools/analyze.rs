//! Read-only reports on a template deck: its slide size and layouts, the
//! placeholders of one layout, and its theme colors and fonts.

use crate::common::unit::{Rect, emu_to_inches};
use crate::ooxml::error::Result;
use crate::ooxml::opc::PhysPkgReader;
use crate::ooxml::pptx::Package;
use crate::ooxml::pptx::parts::{ColorValue, Theme, ThemeFont};
use std::io::{self, Write};
use std::path::Path;

const HEAVY_RULE: &str = "============================================================";
const LIGHT_RULE: &str = "--------------------------------------------------";

/// Longest default text shown per placeholder, in characters.
const TEXT_PREVIEW_CHARS: usize = 40;

fn write_header<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "{}", HEAVY_RULE)?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", HEAVY_RULE)
}

/// One layout line of a [`DeckSummary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSummary {
    pub index: usize,
    pub name: String,
    pub placeholder_count: usize,
}

/// Slide size, slide count and the layouts of every master.
#[derive(Debug, Clone)]
pub struct DeckSummary {
    pub path: String,
    /// Width and height in inches
    pub size: (f64, f64),
    pub slide_count: usize,
    /// Layouts per master, in master order
    pub masters: Vec<Vec<LayoutSummary>>,
}

impl DeckSummary {
    pub fn from_package(path: impl Into<String>, pkg: &Package) -> Result<Self> {
        let (cx, cy) = pkg.slide_size()?.unwrap_or_default();
        let mut masters = Vec::new();
        for master in pkg.masters()? {
            let mut layouts = Vec::with_capacity(master.layout_partnames().len());
            for (index, partname) in master.layout_partnames().iter().enumerate() {
                let layout = pkg.layout_at(partname)?;
                layouts.push(LayoutSummary {
                    index,
                    name: layout.name(),
                    placeholder_count: layout.placeholder_count(),
                });
            }
            masters.push(layouts);
        }

        Ok(Self {
            path: path.into(),
            size: (emu_to_inches(cx), emu_to_inches(cy)),
            slide_count: pkg.slide_count()?,
            masters,
        })
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write_header(out, &format!("파일: {}", self.path))?;
        writeln!(out)?;
        writeln!(out, "슬라이드 크기: {:.2}\" x {:.2}\"", self.size.0, self.size.1)?;
        writeln!(out, "슬라이드 수: {}", self.slide_count)?;
        writeln!(out, "슬라이드 마스터 수: {}", self.masters.len())?;

        for layouts in &self.masters {
            writeln!(out)?;
            writeln!(out, "슬라이드 레이아웃 ({}개):", layouts.len())?;
            writeln!(out, "{}", LIGHT_RULE)?;
            for layout in layouts {
                writeln!(
                    out,
                    "  [{:2}] '{}' (placeholder: {}개)",
                    layout.index, layout.name, layout.placeholder_count
                )?;
            }
        }
        Ok(())
    }
}

/// One placeholder of a [`LayoutDetail`]; geometry in inches.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderDetail {
    pub idx: u32,
    /// Type name and value, e.g. `BODY (2)`
    pub label: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
}

/// The placeholders of one layout, top to bottom.
#[derive(Debug, Clone)]
pub struct LayoutDetail {
    /// Position of the layout in the first master
    pub index: usize,
    pub name: String,
    pub placeholders: Vec<PlaceholderDetail>,
}

impl LayoutDetail {
    /// Describe the `index`-th layout of the first master; `-1` is the last
    /// layout.
    ///
    /// A placeholder without its own transform takes the geometry of the
    /// master placeholder it inherits from, or zero when there is none.
    pub fn from_package(pkg: &Package, index: isize) -> Result<Self> {
        let index = pkg.layout_position(index)?;
        let layout = pkg.layout(index)?;
        let master = pkg.layout_master(&layout)?;

        let mut placeholders: Vec<PlaceholderDetail> = layout
            .placeholders()
            .iter()
            .filter_map(|shape| {
                let format = shape.placeholder()?;
                let rect = shape
                    .rect()
                    .or_else(|| master.placeholder_rect(format.ph_type.master_type()))
                    .unwrap_or_default();
                Some(placeholder_detail(format.idx, format.ph_type.label(), rect, shape.text()))
            })
            .collect();
        placeholders.sort_by(|a, b| a.top.total_cmp(&b.top));

        Ok(Self {
            index,
            name: layout.name(),
            placeholders,
        })
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write_header(out, &format!("레이아웃 [{}]: '{}'", self.index, self.name))?;
        writeln!(out)?;
        writeln!(out, "Placeholder ({}개):", self.placeholders.len())?;
        writeln!(out, "{}", LIGHT_RULE)?;

        for ph in &self.placeholders {
            writeln!(out)?;
            writeln!(out, "[{:2}] {}", ph.idx, ph.label)?;
            writeln!(out, "    위치: Y={:.2}\", X={:.2}\"", ph.top, ph.left)?;
            writeln!(out, "    크기: {:.2}\" x {:.2}\"", ph.width, ph.height)?;
            if !ph.text.is_empty() {
                let preview: String = ph.text.chars().take(TEXT_PREVIEW_CHARS).collect();
                writeln!(out, "    기본텍스트: '{}'", preview)?;
            }
        }
        Ok(())
    }
}

fn placeholder_detail(idx: u32, label: String, rect: Rect, text: String) -> PlaceholderDetail {
    PlaceholderDetail {
        idx,
        label,
        left: emu_to_inches(rect.x),
        top: emu_to_inches(rect.y),
        width: emu_to_inches(rect.cx),
        height: emu_to_inches(rect.cy),
        text,
    }
}

/// Display label of a color scheme slot; `None` for slots not reported.
fn color_label(slot: &str) -> Option<&'static str> {
    Some(match slot {
        "dk1" => "어두운색1 (텍스트)",
        "lt1" => "밝은색1 (배경)",
        "dk2" => "어두운색2",
        "lt2" => "밝은색2",
        "accent1" => "강조색1",
        "accent2" => "강조색2",
        "accent3" => "강조색3",
        "accent4" => "강조색4",
        "accent5" => "강조색5",
        "accent6" => "강조색6",
        "hlink" => "하이퍼링크",
        "folHlink" => "방문한 링크",
        _ => return None,
    })
}

/// Color and font schemes of the archive members whose name contains
/// `theme1.xml`. Members without schemes, such as the theme's `.rels`,
/// contribute an empty entry and print nothing.
///
/// The archive is read directly, so a deck whose presentation part cannot
/// be loaded still gets its theme reported.
#[derive(Debug, Clone)]
pub struct ThemeSummary {
    pub themes: Vec<Theme>,
}

impl ThemeSummary {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(PhysPkgReader::open(path)?)
    }

    pub fn from_reader(mut reader: PhysPkgReader) -> Result<Self> {
        let names: Vec<String> = reader
            .member_names()
            .iter()
            .filter(|name| name.contains("theme1.xml"))
            .cloned()
            .collect();

        let mut themes = Vec::with_capacity(names.len());
        for name in names {
            if let Some(blob) = reader.take(&name) {
                themes.push(Theme::from_xml(&blob)?);
            }
        }
        Ok(Self { themes })
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write_header(out, "테마 분석")?;

        for theme in &self.themes {
            if let Some(scheme) = &theme.color_scheme {
                writeln!(out)?;
                writeln!(out, "[색상 스키마: {}]", scheme.name.as_deref().unwrap_or("Unknown"))?;
                for color in &scheme.colors {
                    let Some(label) = color_label(&color.slot) else {
                        continue;
                    };
                    match &color.value {
                        ColorValue::Rgb(val) => writeln!(out, "  {}: #{}", label, val)?,
                        ColorValue::System { last_color } => writeln!(
                            out,
                            "  {}: #{}",
                            label,
                            last_color.as_deref().unwrap_or("N/A")
                        )?,
                        ColorValue::Other => {},
                    }
                }
            }

            if let Some(fonts) = &theme.font_scheme {
                writeln!(out)?;
                writeln!(out, "[폰트 스키마: {}]", fonts.name.as_deref().unwrap_or("Unknown"))?;
                if let Some(major) = &fonts.major {
                    writeln!(out, "  제목:")?;
                    write_font(out, major)?;
                }
                if let Some(minor) = &fonts.minor {
                    writeln!(out, "  본문:")?;
                    write_font(out, minor)?;
                }
            }
        }
        Ok(())
    }
}

fn write_font<W: Write>(out: &mut W, font: &ThemeFont) -> io::Result<()> {
    if let Some(latin) = &font.latin {
        writeln!(out, "    - 라틴: {}", latin)?;
    }
    if let Some(ea) = font.east_asian.as_deref().filter(|ea| !ea.is_empty()) {
        writeln!(out, "    - 동아시아: {}", ea)?;
    }
    Ok(())
}

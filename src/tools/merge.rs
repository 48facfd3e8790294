//! Merging the slides of one deck into another deck's layout system.
//!
//! Each source slide becomes a new slide of the base deck built on one base
//! layout. The layout's placeholders are dropped and the source shapes are
//! copied in their place, so the merged slide looks like the source slide
//! on the base deck's master. Template conversion optionally rewrites the
//! copied text into `{{marker}}` form.

use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::package::resolve_layout_position;
use crate::ooxml::pptx::{Package, PartImporter, Slide};
use crate::tools::template::{TemplateRules, find_markers, format_markers};
use std::collections::BTreeSet;
use std::io::{self, Write};

/// Layout used when no index is given, if the base deck has that many.
pub const DEFAULT_LAYOUT_INDEX: usize = 6;

/// Options of [`merge_decks`].
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Base layout for the new slides, negative counting from the end;
    /// `None` picks [`DEFAULT_LAYOUT_INDEX`] or the last layout.
    pub layout_index: Option<isize>,
    /// Rewrite paragraph text with `rules`.
    pub apply_template: bool,
    pub rules: TemplateRules,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            layout_index: None,
            apply_template: true,
            rules: TemplateRules::default(),
        }
    }
}

/// Markers found on one merged slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedSlide {
    /// 1-based position in the source deck
    pub number: usize,
    pub markers: BTreeSet<String>,
}

/// Outcome of a merge.
#[derive(Debug, Clone)]
pub struct MergeReport {
    pub base_slide_count: usize,
    pub source_slide_count: usize,
    pub layout_index: usize,
    pub layout_name: String,
    pub apply_template: bool,
    pub slides: Vec<MergedSlide>,
    /// Slides in the base deck after the merge
    pub total_slide_count: usize,
}

impl MergeReport {
    /// Write the merge header and one marker line per merged slide.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "기본 양식: {}개 슬라이드", self.base_slide_count)?;
        writeln!(out, "추가 대상: {}개 슬라이드", self.source_slide_count)?;
        writeln!(out, "레이아웃: [{}] '{}'", self.layout_index, self.layout_name)?;
        writeln!(
            out,
            "템플릿 변환: {}",
            if self.apply_template { "활성화" } else { "비활성화" }
        )?;
        writeln!(out)?;
        for slide in &self.slides {
            writeln!(out, "슬라이드 {}: {}", slide.number, format_markers(&slide.markers))?;
        }
        Ok(())
    }
}

/// Index of the layout new slides are built on.
fn resolve_layout_index(requested: Option<isize>, count: usize) -> Result<usize> {
    match requested {
        Some(index) => resolve_layout_position(index, count),
        None if count > DEFAULT_LAYOUT_INDEX => Ok(DEFAULT_LAYOUT_INDEX),
        None if count > 0 => Ok(count - 1),
        None => Err(OoxmlError::LayoutIndexOutOfRange { index: 0, count }),
    }
}

/// Append every slide of `source` to `base`.
///
/// `base` is modified in memory only; the caller saves it.
pub fn merge_decks(base: &mut Package, source: &Package, options: &MergeOptions) -> Result<MergeReport> {
    let base_slide_count = base.slide_count()?;
    let source_slides = source.slides()?;

    let layout_index = resolve_layout_index(options.layout_index, base.layouts()?.len())?;
    let layout = base.layout(layout_index)?;
    log::info!(
        "merging {} slides onto layout [{}] '{}'",
        source_slides.len(),
        layout_index,
        layout.name()
    );

    let mut importer = PartImporter::new();
    let mut slides = Vec::with_capacity(source_slides.len());
    for (i, source_slide) in source_slides.iter().enumerate() {
        let mut slide = base.import_slide(&layout, source, source_slide, &mut importer)?;
        if options.apply_template {
            convert_slide_text(&mut slide, &options.rules);
            base.store_slide(&slide)?;
        }
        slides.push(MergedSlide {
            number: i + 1,
            markers: find_markers(&slide.texts().join(" ")),
        });
    }
    log::debug!("imported {} parts from the source deck", importer.len());

    Ok(MergeReport {
        base_slide_count,
        source_slide_count: source_slides.len(),
        layout_index,
        layout_name: layout.name(),
        apply_template: options.apply_template,
        slides,
        total_slide_count: base.slide_count()?,
    })
}

/// Convert the text of every paragraph of every text frame.
///
/// The run texts of a paragraph are joined and converted; when that changes
/// them, the converted text goes into the first run and the other runs are
/// emptied, so the first run's formatting carries the whole paragraph.
/// Returns the number of paragraphs changed.
pub fn convert_slide_text(slide: &mut Slide, rules: &TemplateRules) -> usize {
    let mut changed = 0;
    slide.for_each_shape_mut(|shape| {
        let Some(mut frame) = shape.text_frame_mut() else {
            return;
        };
        for mut paragraph in frame.paragraphs_mut() {
            if paragraph.run_count() == 0 {
                continue;
            }
            let full: String = paragraph.runs_mut().map(|run| run.text()).collect();
            let converted = rules.convert(&full);
            if converted == full {
                continue;
            }
            for (i, mut run) in paragraph.runs_mut().enumerate() {
                run.set_text(if i == 0 { converted.as_str() } else { "" });
            }
            changed += 1;
        }
    });
    changed
}

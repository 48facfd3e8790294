//! Text edits applied to whole slides.

use crate::ooxml::pptx::Slide;

/// Overwrite the text of the `shape_index`-th shape with a single run.
///
/// The text frame is cleared down to one empty paragraph first; `font_size`
/// (points) and `bold` are applied to the new run when given. Returns
/// `false` without touching the slide when the index is out of range
/// (logged as a warning) or the shape cannot hold text.
pub fn set_text_by_index(
    slide: &mut Slide,
    shape_index: usize,
    text: &str,
    font_size: Option<f64>,
    bold: bool,
) -> bool {
    let Some(mut shape) = slide.shape_mut(shape_index) else {
        log::warn!("Shape index {} not found on slide.", shape_index);
        return false;
    };
    let Some(mut frame) = shape.text_frame_mut() else {
        return false;
    };

    frame.clear();
    let Some(mut paragraph) = frame.paragraph_mut(0) else {
        return false;
    };
    let mut run = paragraph.add_run();
    run.set_text(text);
    if let Some(size) = font_size {
        run.set_size(size);
    }
    if bold {
        run.set_bold(true);
    }
    true
}

/// Replace substrings of run text across every text frame of the slide.
///
/// Each run is searched on its own, so a key split across two runs is not
/// found. Pairs are applied in order; a later pair sees the output of the
/// earlier ones. Returns the number of runs changed.
pub fn replace_text(slide: &mut Slide, replacements: &[(&str, &str)]) -> usize {
    let mut changed = 0;
    slide.for_each_shape_mut(|shape| {
        let Some(mut frame) = shape.text_frame_mut() else {
            return;
        };
        for mut paragraph in frame.paragraphs_mut() {
            for mut run in paragraph.runs_mut() {
                let original = run.text();
                let mut text = original.clone();
                for &(key, value) in replacements {
                    if !key.is_empty() && text.contains(key) {
                        text = text.replace(key, value);
                    }
                }
                if text != original {
                    run.set_text(&text);
                    changed += 1;
                }
            }
        }
    });
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::fixtures::{self, DeckBuilder};
    use crate::ooxml::pptx::shapes::ShapeType;

    fn slide(shapes: &[String]) -> Slide {
        DeckBuilder::new().slide(shapes).package().slide(0).unwrap()
    }

    #[test]
    fn test_set_text_by_index() {
        let mut slide = slide(&[fixtures::text_shape(2, "one\ntwo\nthree")]);
        assert!(set_text_by_index(&mut slide, 0, "새 제목", Some(24.0), true));

        let frame = slide.shape(0).unwrap().text_frame().unwrap();
        let paragraphs = frame.paragraphs();
        assert_eq!(paragraphs.len(), 1);
        let runs = paragraphs[0].runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text(), "새 제목");
        assert_eq!(runs[0].size(), Some(2400));
        assert_eq!(runs[0].bold(), Some(true));
    }

    #[test]
    fn test_set_text_without_formatting() {
        let mut slide = slide(&[fixtures::text_shape(2, "old")]);
        assert!(set_text_by_index(&mut slide, 0, "new", None, false));
        let frame = slide.shape(0).unwrap().text_frame().unwrap();
        let run = frame.paragraphs()[0].runs()[0];
        assert_eq!(run.text(), "new");
        assert_eq!(run.size(), None);
        assert_eq!(run.bold(), None);
    }

    #[test]
    fn test_set_text_out_of_range_leaves_slide_unchanged() {
        let mut slide = slide(&[fixtures::text_shape(2, "a"), fixtures::text_shape(3, "b")]);
        let before = slide.document().to_bytes();
        assert!(!set_text_by_index(&mut slide, 7, "x", None, false));
        assert_eq!(slide.document().to_bytes(), before);
    }

    #[test]
    fn test_set_text_skips_pictures() {
        let mut slide = slide(&[fixtures::picture_shape(2)]);
        assert_eq!(slide.shape(0).unwrap().shape_type(), ShapeType::Picture);
        assert!(!set_text_by_index(&mut slide, 0, "x", None, false));
        assert_eq!(slide.texts(), Vec::<String>::new());
    }

    #[test]
    fn test_replace_text_per_run() {
        let mut slide = slide(&[
            fixtures::runs_shape(2, &[&["Title here"], &["Sub", "title"]]),
            fixtures::text_shape(3, "제목 / 제목"),
        ]);
        let changed = replace_text(&mut slide, &[("Title", "제목"), ("제목", "Heading")]);

        assert_eq!(changed, 2);
        // "Subtitle" spans two runs and is left alone.
        assert_eq!(slide.texts(), ["Heading here\nSubtitle", "Heading / Heading"]);
    }
}

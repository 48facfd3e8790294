//! Assembling a deck from duplicated template slides.
//!
//! A [`DeckPlan`] lists the sections of the output deck. Each section names
//! the template slide it starts from, how its title is written and the text
//! boxes and shapes laid over the copy. [`build_deck`] appends one slide per
//! section and then removes every original slide.

use crate::common::unit::Rect;
use crate::ooxml::error::Result;
use crate::ooxml::pptx::shapes::AutoShapeType;
use crate::ooxml::pptx::{Package, Slide};

const TITLE_KEYS: &[&str] = &["Title", "제목"];
const SUBTITLE_KEYS: &[&str] = &["Subtitle", "부제"];

fn contains_any(text: &str, keys: &[&str]) -> bool {
    keys.iter().any(|key| text.contains(*key))
}

/// How a section's title gets onto its slide.
#[derive(Debug, Clone, PartialEq)]
pub enum TitleStrategy {
    /// Overwrite every text frame mentioning a title with `title`, then every
    /// text frame mentioning a subtitle with `subtitle`.
    ReplaceHeuristic { title: String, subtitle: String },
    /// Overwrite the first text frame mentioning a title.
    ReplaceFirst(String),
    /// Draw the title as a text box in the top-left corner.
    TextBox(String),
    /// Leave the template's title alone.
    None,
}

impl TitleStrategy {
    /// Position of [`TitleStrategy::TextBox`] titles.
    pub fn title_box() -> Rect {
        Rect::from_inches(0.5, 0.5, 5.0, 1.0)
    }
}

/// Content laid over a duplicated slide.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// A text box: `text` split into one paragraph per line, then each of
    /// `paragraphs` appended at its level.
    TextBox {
        rect: Rect,
        text: String,
        paragraphs: Vec<(String, u32)>,
    },
    /// A preset-geometry shape with optional text.
    AutoShape {
        kind: AutoShapeType,
        rect: Rect,
        text: Option<String>,
    },
}

impl Overlay {
    /// A text box at the given inch position.
    pub fn text_box(left: f64, top: f64, width: f64, height: f64, text: &str) -> Self {
        Self::TextBox {
            rect: Rect::from_inches(left, top, width, height),
            text: text.to_string(),
            paragraphs: Vec::new(),
        }
    }

    /// Append a paragraph to a text box overlay.
    pub fn paragraph(mut self, text: &str, level: u32) -> Self {
        if let Self::TextBox { paragraphs, .. } = &mut self {
            paragraphs.push((text.to_string(), level));
        }
        self
    }

    pub fn auto_shape(kind: AutoShapeType, left: f64, top: f64, width: f64, height: f64, text: Option<&str>) -> Self {
        Self::AutoShape {
            kind,
            rect: Rect::from_inches(left, top, width, height),
            text: text.map(str::to_string),
        }
    }

    fn apply(&self, slide: &mut Slide) -> Result<()> {
        let (index, text, paragraphs) = match self {
            Self::TextBox { rect, text, paragraphs } => {
                (slide.add_textbox(*rect)?, Some(text), paragraphs.as_slice())
            },
            Self::AutoShape { kind, rect, text } => {
                (slide.add_auto_shape(*kind, *rect)?, text.as_ref(), &[][..])
            },
        };
        let Some(text) = text else {
            return Ok(());
        };

        if let Some(mut shape) = slide.shape_mut(index)
            && let Some(mut frame) = shape.text_frame_mut()
        {
            frame.set_text(text);
            for (paragraph_text, level) in paragraphs {
                let mut paragraph = frame.add_paragraph();
                paragraph.set_text(paragraph_text);
                paragraph.set_level(*level);
            }
        }
        Ok(())
    }
}

/// One section of the output deck.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionPlan {
    pub name: String,
    /// 0-based index of the template slide to duplicate
    pub template_index: usize,
    pub title: TitleStrategy,
    pub overlays: Vec<Overlay>,
}

impl SectionPlan {
    pub fn new(name: &str, template_index: usize, title: TitleStrategy) -> Self {
        Self {
            name: name.to_string(),
            template_index,
            title,
            overlays: Vec::new(),
        }
    }

    pub fn overlay(mut self, overlay: Overlay) -> Self {
        self.overlays.push(overlay);
        self
    }

    /// Text that identifies the section on its slide: the title, or the
    /// first overlay's text for untitled sections.
    pub fn headline(&self) -> Option<&str> {
        match &self.title {
            TitleStrategy::ReplaceHeuristic { title, .. } => Some(title.as_str()),
            TitleStrategy::ReplaceFirst(title) | TitleStrategy::TextBox(title) => Some(title.as_str()),
            TitleStrategy::None => self.overlays.iter().find_map(|overlay| match overlay {
                Overlay::TextBox { text, .. } => Some(text.as_str()),
                Overlay::AutoShape { text, .. } => text.as_deref(),
            }),
        }
    }

    fn apply_title(&self, slide: &mut Slide) -> Result<()> {
        match &self.title {
            TitleStrategy::ReplaceHeuristic { title, subtitle } => {
                slide.for_each_shape_mut(|shape| {
                    let Some(mut frame) = shape.text_frame_mut() else {
                        return;
                    };
                    if contains_any(&frame.text(), TITLE_KEYS) {
                        frame.set_text(title);
                    }
                    if contains_any(&frame.text(), SUBTITLE_KEYS) {
                        frame.set_text(subtitle);
                    }
                });
            },
            TitleStrategy::ReplaceFirst(title) => {
                let mut done = false;
                slide.for_each_shape_mut(|shape| {
                    if done {
                        return;
                    }
                    if let Some(mut frame) = shape.text_frame_mut()
                        && contains_any(&frame.text(), TITLE_KEYS)
                    {
                        frame.set_text(title);
                        done = true;
                    }
                });
                if !done {
                    log::warn!("section '{}': no title shape found on the template", self.name);
                }
            },
            TitleStrategy::TextBox(title) => {
                Overlay::TextBox {
                    rect: TitleStrategy::title_box(),
                    text: title.clone(),
                    paragraphs: Vec::new(),
                }
                .apply(slide)?;
            },
            TitleStrategy::None => {},
        }
        Ok(())
    }
}

/// The sections of an output deck, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckPlan {
    pub sections: Vec<SectionPlan>,
}

impl DeckPlan {
    pub fn new(sections: Vec<SectionPlan>) -> Self {
        Self { sections }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// The twelve-section product presentation for jjiban.
    pub fn jjiban() -> Self {
        use AutoShapeType::{Cloud, RightArrow, RoundedRectangle};
        let text_box = |title: &str| TitleStrategy::TextBox(title.to_string());

        Self::new(vec![
            SectionPlan::new(
                "Title",
                0,
                TitleStrategy::ReplaceHeuristic {
                    title: "jjiban - AI와 함께하는\n차세대 프로젝트 관리 도구".to_string(),
                    subtitle: "개발자 친화적 로컬 기반 PM 도구\n발표자: [발표자 성명]".to_string(),
                },
            ),
            SectionPlan::new("Vision", 10, TitleStrategy::ReplaceFirst("제품 비전".to_string())).overlay(
                Overlay::text_box(1.0, 2.0, 8.0, 4.0, "비전: \"LLM과 함께 개발하는 차세대 프로젝트 관리 도구\"")
                    .paragraph("핵심 가치:", 0)
                    .paragraph("• Local First: 내 컴퓨터에서 npx jjiban으로 즉시 실행", 1)
                    .paragraph("• Git Friendly: 모든 데이터는 파일로 저장, Git으로 동기화", 1)
                    .paragraph("• AI Native: LLM이 직접 프로젝트 관리 데이터 수정 가능", 1),
            ),
            SectionPlan::new("Target/Problem/Solution", 13, text_box("타겟 사용자 및 해결 과제"))
                .overlay(Overlay::text_box(0.5, 2.5, 3.0, 3.0, "타겟 사용자\n\n1~10인 규모의\n소규모 개발팀"))
                .overlay(Overlay::text_box(
                    4.0,
                    2.5,
                    3.0,
                    3.0,
                    "현재의 문제점\n\n• 무거운 PM 도구\n• AI 도구와 단절\n• 데이터 주권 우려",
                ))
                .overlay(Overlay::text_box(
                    7.5,
                    2.5,
                    3.0,
                    3.0,
                    "jjiban의 해결책\n\n• 설치 없는 실행\n• IDE/Terminal 통합\n• 텍스트 기반 데이터",
                )),
            SectionPlan::new("Key Features", 18, text_box("핵심 특징"))
                .overlay(Overlay::text_box(1.0, 3.5, 2.0, 1.0, "No Database\n파일 기반 저장"))
                .overlay(Overlay::text_box(3.5, 3.5, 2.0, 1.0, "Git Sync\n팀 동기화"))
                .overlay(Overlay::text_box(6.0, 3.5, 2.0, 1.0, "Conflict Free\n분산 JSON"))
                .overlay(Overlay::text_box(8.5, 3.5, 2.0, 1.0, "Offline\n로컬 작업")),
            SectionPlan::new("LLM Integration", 15, text_box("LLM 협업 (AI Integration)"))
                .overlay(Overlay::text_box(1.0, 3.0, 3.0, 2.0, "CLI 통합\n& 직접 제어"))
                .overlay(Overlay::text_box(
                    4.5,
                    3.0,
                    5.0,
                    3.0,
                    "• Claude Code, Gemini CLI 연동\n• 파일 시스템을 통한 Task 상태 변경\n• \"이 버그 수정했어\" → JSON 자동 수정\n• 프로젝트 문맥(Context) 완벽 유지",
                )),
            SectionPlan::new("Summary", 37, text_box("주요 기능 요약"))
                .overlay(Overlay::text_box(0.5, 4.0, 2.0, 2.0, "WBS 트리 뷰\n계층형 작업 관리"))
                .overlay(Overlay::text_box(3.0, 4.0, 2.0, 2.0, "칸반 보드\n직관적 상태 관리"))
                .overlay(Overlay::text_box(5.5, 4.0, 2.0, 2.0, "워크플로우 엔진\n유연한 규칙 정의"))
                .overlay(Overlay::text_box(8.0, 4.0, 2.0, 2.0, "문서 관리\nMarkdown 통합")),
            SectionPlan::new("Tech Stack", 29, text_box("기술 스택 (Tech Stack)")).overlay(
                Overlay::text_box(2.0, 2.5, 6.0, 3.0, "Runtime: Node.js 20.x")
                    .paragraph("Framework: Nuxt 3 (Standalone)", 0)
                    .paragraph("Frontend: Vue 3 + PrimeVue + TailwindCSS", 0)
                    .paragraph("Data: File System (JSON + Markdown)", 0),
            ),
            SectionPlan::new("Architecture", 10, text_box("시스템 구조 (System Architecture)"))
                .overlay(Overlay::auto_shape(RoundedRectangle, 1.0, 3.0, 1.5, 1.0, Some("User\n(Browser)")))
                .overlay(Overlay::auto_shape(RoundedRectangle, 3.5, 3.0, 1.5, 1.0, Some("Nuxt Server\n(Localhost)")))
                .overlay(Overlay::auto_shape(RoundedRectangle, 6.0, 3.0, 1.5, 1.0, Some("File System\n(.jjiban/)")))
                .overlay(Overlay::auto_shape(Cloud, 8.5, 3.0, 1.5, 1.0, Some("Git\n(Remote)")))
                .overlay(Overlay::auto_shape(RightArrow, 2.5, 3.4, 1.0, 0.2, None))
                .overlay(Overlay::auto_shape(RightArrow, 5.0, 3.4, 1.0, 0.2, None))
                .overlay(Overlay::auto_shape(RightArrow, 7.5, 3.4, 1.0, 0.2, None)),
            SectionPlan::new("Data Structure", 49, text_box("데이터 구조 (Data Structure)")).overlay(
                Overlay::text_box(1.0, 2.0, 8.0, 4.0, ".jjiban/")
                    .paragraph("  ├── projects/ (프로젝트 데이터)", 0)
                    .paragraph("  ├── settings/ (전역 설정)", 0)
                    .paragraph("  └── templates/ (문서 템플릿)", 0)
                    .paragraph("\n핵심 파일:", 0)
                    .paragraph("  • wbs.md: 통합 구조 문서", 0)
                    .paragraph("  • JSON: 개별 Task 상세", 0),
            ),
            SectionPlan::new("Workflow", 36, text_box("워크플로우 엔진"))
                .overlay(Overlay::text_box(1.0, 4.0, 1.5, 1.0, "유연성\n(JSON 정의)"))
                .overlay(Overlay::text_box(3.5, 4.0, 1.5, 1.0, "자동화\n(템플릿 생성)"))
                .overlay(Overlay::text_box(6.0, 4.0, 1.5, 1.0, "확장성\n(카테고리별)"))
                .overlay(Overlay::text_box(8.5, 4.0, 1.5, 1.0, "통합\n(LLM 연동)")),
            SectionPlan::new("Roadmap", 45, text_box("향후 계획 (Roadmap)"))
                .overlay(Overlay::text_box(1.0, 3.0, 2.0, 2.0, "현재 (PoC)\n• 핵심 기능\n• LLM 검증"))
                .overlay(Overlay::text_box(4.0, 3.0, 2.0, 2.0, "Beta\n• Gantt 차트\n• 웹 터미널"))
                .overlay(Overlay::text_box(7.0, 3.0, 2.0, 2.0, "v1.0\n• 플러그인\n• LLM 공식 지원")),
            SectionPlan::new("Q&A", 4, TitleStrategy::None)
                .overlay(Overlay::text_box(3.0, 3.0, 4.0, 2.0, "Q & A\n질의응답")),
        ])
    }
}

/// Slide counts before and after [`build_deck`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    pub original_slide_count: usize,
    pub final_slide_count: usize,
}

/// Append one slide per section of `plan`, then remove all original slides.
///
/// A template index past the end of the deck is an error; the package is
/// left half-built in memory and must not be saved.
pub fn build_deck(pkg: &mut Package, plan: &DeckPlan) -> Result<BuildReport> {
    let original_slide_count = pkg.slide_count()?;

    for section in &plan.sections {
        let mut slide = pkg.duplicate_slide(section.template_index)?;
        section.apply_title(&mut slide)?;
        for overlay in &section.overlays {
            overlay.apply(&mut slide)?;
        }
        pkg.store_slide(&slide)?;
        log::info!(
            "section '{}' from template slide {} -> {}",
            section.name,
            section.template_index,
            slide.partname()
        );
    }

    // Originals are at the front; remove back to front so indices stay valid.
    let total = pkg.slide_count()?;
    for index in (0..total.saturating_sub(plan.len())).rev() {
        pkg.remove_slide(index)?;
    }

    Ok(BuildReport {
        original_slide_count,
        final_slide_count: pkg.slide_count()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::fixtures::{self, DeckBuilder};
    use crate::ooxml::error::OoxmlError;
    use crate::ooxml::pptx::shapes::ShapeType;

    fn template_deck(slide_count: usize) -> Package {
        DeckBuilder::new()
            .slide(&[
                fixtures::placeholder_shape(2, "ctrTitle", 0, "Click to add Title"),
                fixtures::placeholder_shape(3, "subTitle", 1, "부제를 입력하세요"),
            ])
            .slides(9)
            .slide(&[
                fixtures::placeholder_shape(2, "title", 0, "제목을 입력하세요"),
                fixtures::text_shape(3, "본문 제목"),
            ])
            .slides(slide_count - 11)
            .package()
    }

    #[test]
    fn test_jjiban_plan() {
        let plan = DeckPlan::jjiban();
        assert_eq!(plan.len(), 12);
        let indices: Vec<_> = plan.sections.iter().map(|s| s.template_index).collect();
        assert_eq!(indices, [0, 10, 13, 18, 15, 37, 29, 10, 49, 36, 45, 4]);
        assert_eq!(plan.sections[11].headline(), Some("Q & A\n질의응답"));
    }

    #[test]
    fn test_build_deck_keeps_only_new_slides() {
        let mut pkg = template_deck(108);
        let plan = DeckPlan::jjiban();
        let report = build_deck(&mut pkg, &plan).unwrap();

        assert_eq!(report, BuildReport { original_slide_count: 108, final_slide_count: 12 });
        let reopened = Package::from_bytes(pkg.to_bytes().unwrap()).unwrap();
        assert_eq!(reopened.slide_count().unwrap(), 12);

        for (i, section) in plan.sections.iter().enumerate() {
            let slide = reopened.slide(i).unwrap();
            let headline = section.headline().unwrap();
            assert!(
                slide.texts().iter().any(|text| text == headline),
                "slide {} lacks '{}': {:?}",
                i,
                headline,
                slide.texts()
            );
        }
    }

    #[test]
    fn test_title_heuristic() {
        let mut pkg = template_deck(50);
        build_deck(&mut pkg, &DeckPlan::jjiban()).unwrap();

        let title = pkg.slide(0).unwrap();
        assert_eq!(
            title.texts(),
            [
                "jjiban - AI와 함께하는\n차세대 프로젝트 관리 도구",
                "개발자 친화적 로컬 기반 PM 도구\n발표자: [발표자 성명]"
            ]
        );

        // Only the first title-like shape is replaced.
        let vision = pkg.slide(1).unwrap();
        assert_eq!(vision.texts()[..2], ["제품 비전", "본문 제목"]);
    }

    #[test]
    fn test_overlays() {
        let mut pkg = template_deck(60);
        build_deck(&mut pkg, &DeckPlan::jjiban()).unwrap();

        let vision = pkg.slide(1).unwrap();
        let body = vision.shape(2).unwrap().text_frame().unwrap();
        let levels: Vec<_> = body.paragraphs().iter().map(|p| p.level()).collect();
        assert_eq!(levels, [0, 0, 1, 1, 1]);

        let architecture = pkg.slide(7).unwrap();
        let auto_shapes: Vec<_> = architecture
            .shapes()
            .into_iter()
            .skip(3)
            .map(|shape| (shape.shape_type(), shape.name()))
            .collect();
        assert_eq!(auto_shapes.len(), 7);
        assert!(auto_shapes.iter().all(|(ty, _)| *ty == ShapeType::Shape));
        assert_eq!(auto_shapes[3].1, "Cloud 7");
        assert_eq!(auto_shapes[6].1, "Right Arrow 10");

        let data = pkg.slide(8).unwrap();
        let tree = data.shape(3).unwrap().text_frame().unwrap();
        assert_eq!(tree.paragraphs().len(), 7);
        assert_eq!(tree.paragraphs()[4].text(), "\u{b}핵심 파일:");
    }

    #[test]
    fn test_template_index_out_of_range() {
        let mut pkg = DeckBuilder::new().slides(5).package();
        assert!(matches!(
            build_deck(&mut pkg, &DeckPlan::jjiban()),
            Err(OoxmlError::SlideIndexOutOfRange { index: 10, count: 6 })
        ));
    }
}

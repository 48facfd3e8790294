//! Synthetic decks for tests.
//!
//! [`DeckBuilder`] writes a small but complete .pptx archive in memory: one
//! master with seven layouts (the seventh is `Blank`), a theme, one image
//! and any number of slides on the `Title and Content` layout.

use crate::ooxml::pptx::Package;
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const TREE_HEAD: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#;

/// Content of `/ppt/media/image1.png`.
pub(crate) const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfixture";

/// Names of the fixture layouts, in master order.
pub(crate) const LAYOUT_NAMES: [&str; 7] = [
    "Title Slide",
    "Title and Content",
    "Section Header",
    "Two Content",
    "Comparison",
    "Title Only",
    "Blank",
];

/// A `p:sp` text shape at a position derived from its id, one paragraph per
/// line of `text`.
pub(crate) fn text_shape(id: u32, text: &str) -> String {
    let paragraphs: Vec<Vec<&str>> = text.split('\n').map(|line| vec![line]).collect();
    let paragraphs: Vec<&[&str]> = paragraphs.iter().map(Vec::as_slice).collect();
    runs_shape(id, &paragraphs)
}

/// A `p:sp` text shape whose paragraphs hold the given runs.
pub(crate) fn runs_shape(id: u32, paragraphs: &[&[&str]]) -> String {
    let mut body = String::new();
    for runs in paragraphs {
        body.push_str("<a:p>");
        for run in runs.iter() {
            let _ = write!(body, r#"<a:r><a:rPr lang="ko-KR"/><a:t>{}</a:t></a:r>"#, escape(run));
        }
        body.push_str("</a:p>");
    }
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="TextBox {n}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="914400" y="{y}"/><a:ext cx="3657600" cy="457200"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr/><a:lstStyle/>{body}</p:txBody></p:sp>"#,
        n = id.saturating_sub(1),
        y = 457_200 * u64::from(id),
    )
}

/// A placeholder `p:sp` with one run of text.
pub(crate) fn placeholder_shape(id: u32, ph_type: &str, idx: u32, text: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Placeholder {n}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="{ph_type}" idx="{idx}"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US"/><a:t>{text}</a:t></a:r></a:p></p:txBody></p:sp>"#,
        n = id.saturating_sub(1),
        text = escape(text),
    )
}

/// A `p:pic` showing the fixture image through `rId2`.
pub(crate) fn picture_shape(id: u32) -> String {
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {n}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr><a:xfrm><a:off x="6096000" y="1828800"/><a:ext cx="2743200" cy="2743200"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
        n = id.saturating_sub(1),
    )
}

/// A text box whose single run links through `r_id`.
pub(crate) fn hyperlink_shape(id: u32, text: &str, r_id: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="TextBox {n}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US"><a:hlinkClick r:id="{r_id}"/></a:rPr><a:t>{text}</a:t></a:r></a:p></p:txBody></p:sp>"#,
        n = id.saturating_sub(1),
        text = escape(text),
    )
}

/// A `p:graphicFrame` showing the chart related through `r_id`.
pub(crate) fn chart_frame(id: u32, r_id: &str) -> String {
    format!(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="{id}" name="Chart {n}"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr><p:xfrm><a:off x="914400" y="914400"/><a:ext cx="5486400" cy="3200400"/></p:xfrm><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart"><c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" r:id="{r_id}"/></a:graphicData></a:graphic></p:graphicFrame>"#,
        n = id.saturating_sub(1),
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Builder for an in-memory deck.
#[derive(Debug, Clone)]
pub(crate) struct DeckBuilder {
    slides: Vec<String>,
    media: bool,
    /// Prefix slides bind to the relationships namespace
    relationships_prefix: String,
    /// Extra namespace declarations on every slide root
    slide_namespaces: String,
    /// (slide index, rId, relationship type, target, external)
    slide_rels: Vec<(usize, String, String, String, bool)>,
    /// (zip name, content type override, content)
    parts: Vec<(String, Option<String>, Vec<u8>)>,
}

impl DeckBuilder {
    pub(crate) fn new() -> Self {
        Self {
            slides: Vec::new(),
            media: true,
            relationships_prefix: "r".into(),
            slide_namespaces: String::new(),
            slide_rels: Vec::new(),
            parts: Vec::new(),
        }
    }

    /// Append `count` slides, each with a title placeholder `Slide N` and a
    /// text box `Body N`.
    pub(crate) fn slides(mut self, count: usize) -> Self {
        for _ in 0..count {
            let n = self.slides.len() + 1;
            let shapes = [
                placeholder_shape(2, "title", 0, &format!("Slide {n}")),
                text_shape(3, &format!("Body {n}")),
            ];
            self = self.slide(&shapes);
        }
        self
    }

    /// Append a slide with the given shape-tree children.
    pub(crate) fn slide(mut self, shapes: &[String]) -> Self {
        self.slides.push(shapes.concat());
        self
    }

    /// Leave out the image part and the slides' image relationships.
    pub(crate) fn without_media(mut self) -> Self {
        self.media = false;
        self
    }

    /// Bind the relationships namespace to `prefix` on slides. Shapes passed
    /// to [`slide`](Self::slide) must use the same prefix.
    pub(crate) fn relationships_prefix(mut self, prefix: &str) -> Self {
        self.relationships_prefix = prefix.into();
        self
    }

    /// Declare extra namespaces (`xmlns:x="..."` text) on every slide root.
    pub(crate) fn slide_namespaces(mut self, declarations: &str) -> Self {
        self.slide_namespaces = format!(" {}", declarations);
        self
    }

    /// Add a relationship to the `slide`-th slide. `reltype` is the last
    /// segment of an officeDocument relationship type.
    pub(crate) fn slide_rel(mut self, slide: usize, r_id: &str, reltype: &str, target: &str, external: bool) -> Self {
        self.slide_rels
            .push((slide, r_id.into(), reltype.into(), target.into(), external));
        self
    }

    /// Add an archive member, with a content-type override when
    /// `content_type` is given.
    pub(crate) fn part(mut self, name: &str, content_type: Option<&str>, content: &[u8]) -> Self {
        self.parts
            .push((name.into(), content_type.map(str::to_string), content.to_vec()));
        self
    }

    pub(crate) fn package(&self) -> Package {
        Package::from_bytes(self.bytes()).expect("fixture deck opens")
    }

    pub(crate) fn bytes(&self) -> Vec<u8> {
        let mut files: Vec<(String, String)> = Vec::new();
        files.push(("[Content_Types].xml".into(), self.content_types()));
        files.push((
            "_rels/.rels".into(),
            rels(&[("rId1", "officeDocument", "ppt/presentation.xml")]),
        ));
        files.push(("ppt/presentation.xml".into(), self.presentation()));

        let mut pres_rels = vec![
            ("rId1".to_string(), "slideMaster", "slideMasters/slideMaster1.xml".to_string()),
            ("rId2".to_string(), "theme", "theme/theme1.xml".to_string()),
        ];
        for i in 0..self.slides.len() {
            pres_rels.push((format!("rId{}", i + 3), "slide", format!("slides/slide{}.xml", i + 1)));
        }
        let pres_rels: Vec<(&str, &str, &str)> = pres_rels
            .iter()
            .map(|(id, ty, target)| (id.as_str(), *ty, target.as_str()))
            .collect();
        files.push(("ppt/_rels/presentation.xml.rels".into(), rels(&pres_rels)));

        files.push(("ppt/slideMasters/slideMaster1.xml".into(), master()));
        let mut master_rels: Vec<(String, &str, String)> = (1..=LAYOUT_NAMES.len())
            .map(|i| (format!("rId{i}"), "slideLayout", format!("../slideLayouts/slideLayout{i}.xml")))
            .collect();
        master_rels.push(("rId8".into(), "theme", "../theme/theme1.xml".into()));
        let master_rels: Vec<(&str, &str, &str)> = master_rels
            .iter()
            .map(|(id, ty, target)| (id.as_str(), *ty, target.as_str()))
            .collect();
        files.push(("ppt/slideMasters/_rels/slideMaster1.xml.rels".into(), rels(&master_rels)));

        for (i, name) in LAYOUT_NAMES.iter().enumerate() {
            files.push((format!("ppt/slideLayouts/slideLayout{}.xml", i + 1), layout(i, name)));
            files.push((
                format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", i + 1),
                rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
            ));
        }

        files.push(("ppt/theme/theme1.xml".into(), THEME.to_string()));

        let slide_ns = NS.replace("xmlns:r=", &format!("xmlns:{}=", self.relationships_prefix));
        for (i, shapes) in self.slides.iter().enumerate() {
            files.push((
                format!("ppt/slides/slide{}.xml", i + 1),
                format!(r#"<p:sld {slide_ns}{ns}><p:cSld><p:spTree>{TREE_HEAD}{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#, ns = self.slide_namespaces),
            ));
            let mut slide_rels = vec![("rId1", "slideLayout", "../slideLayouts/slideLayout2.xml", false)];
            if self.media {
                slide_rels.push(("rId2", "image", "../media/image1.png", false));
            }
            for (_, r_id, reltype, target, external) in self.slide_rels.iter().filter(|rel| rel.0 == i) {
                slide_rels.push((r_id.as_str(), reltype.as_str(), target.as_str(), *external));
            }
            files.push((format!("ppt/slides/_rels/slide{}.xml.rels", i + 1), rels_with_modes(&slide_rels)));
        }

        let mut data = Vec::new();
        let mut writer = ZipWriter::new(Cursor::new(&mut data));
        let options = SimpleFileOptions::default();
        for (name, content) in &files {
            writer.start_file(name.as_str(), options).expect("zip entry");
            writer.write_all(content.as_bytes()).expect("zip write");
        }
        if self.media {
            writer.start_file("ppt/media/image1.png", options).expect("zip entry");
            writer.write_all(PNG_BYTES).expect("zip write");
        }
        for (name, _, content) in &self.parts {
            writer.start_file(name.as_str(), options).expect("zip entry");
            writer.write_all(content).expect("zip write");
        }
        writer.finish().expect("zip finish");
        data
    }

    fn content_types(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#,
        );
        for i in 1..=LAYOUT_NAMES.len() {
            let _ = write!(
                xml,
                r#"<Override PartName="/ppt/slideLayouts/slideLayout{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#
            );
        }
        for i in 1..=self.slides.len() {
            let _ = write!(
                xml,
                r#"<Override PartName="/ppt/slides/slide{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
            );
        }
        for (name, content_type, _) in &self.parts {
            if let Some(content_type) = content_type {
                let _ = write!(xml, r#"<Override PartName="/{name}" ContentType="{content_type}"/>"#);
            }
        }
        xml.push_str("</Types>");
        xml
    }

    fn presentation(&self) -> String {
        let mut ids = String::new();
        for i in 0..self.slides.len() {
            let _ = write!(ids, r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 3);
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {NS}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{ids}</p:sldIdLst><p:sldSz cx="12192000" cy="6858000"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
        )
    }
}

/// A `.rels` part; `reltype` is the last segment of the relationship type.
pub(crate) fn rels(entries: &[(&str, &str, &str)]) -> String {
    let entries: Vec<_> = entries.iter().map(|&(id, ty, target)| (id, ty, target, false)).collect();
    rels_with_modes(&entries)
}

fn rels_with_modes(entries: &[(&str, &str, &str, bool)]) -> String {
    let mut xml = format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{RELS_NS}">"#);
    for (id, reltype, target, external) in entries {
        let mode = if *external { r#" TargetMode="External""# } else { "" };
        let _ = write!(
            xml,
            r#"<Relationship Id="{id}" Type="{REL}/{reltype}" Target="{}"{mode}/>"#,
            escape(target)
        );
    }
    xml.push_str("</Relationships>");
    xml
}

/// A placeholder with an optional transform and default text.
fn ph(id: u32, attrs: &str, xfrm: Option<(i64, i64, i64, i64)>, text: &str) -> String {
    let sp_pr = match xfrm {
        Some((x, y, cx, cy)) => format!(
            r#"<p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm></p:spPr>"#
        ),
        None => "<p:spPr/>".to_string(),
    };
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Placeholder {n}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph {attrs}/></p:nvPr></p:nvSpPr>{sp_pr}<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US"/><a:t>{text}</a:t></a:r></a:p></p:txBody></p:sp>"#,
        n = id.saturating_sub(1),
    )
}

fn master() -> String {
    let shapes = [
        ph(2, r#"type="title""#, Some((838_200, 365_125, 10_515_600, 1_325_563)), "Click to edit Master title style"),
        ph(3, r#"type="body" idx="1""#, Some((838_200, 1_825_625, 10_515_600, 4_351_338)), "Click to edit Master text styles"),
        ph(4, r#"type="dt" sz="quarter" idx="2""#, Some((838_200, 6_356_350, 2_743_200, 365_125)), ""),
        ph(5, r#"type="ftr" sz="quarter" idx="3""#, Some((4_038_600, 6_356_350, 4_114_800, 365_125)), ""),
        ph(6, r#"type="sldNum" sz="quarter" idx="4""#, Some((8_610_600, 6_356_350, 2_743_200, 365_125)), ""),
    ]
    .concat();
    let mut ids = String::new();
    for i in 1..=LAYOUT_NAMES.len() {
        let _ = write!(ids, r#"<p:sldLayoutId id="{}" r:id="rId{}"/>"#, 2_147_483_648u64 + i as u64, i);
    }
    format!(
        r#"<p:sldMaster {NS}><p:cSld><p:spTree>{TREE_HEAD}{shapes}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst>{ids}</p:sldLayoutIdLst></p:sldMaster>"#
    )
}

fn layout(index: usize, name: &str) -> String {
    let footers = [
        ph(10, r#"type="dt" sz="half" idx="10""#, None, ""),
        ph(11, r#"type="ftr" sz="quarter" idx="11""#, None, ""),
        ph(12, r#"type="sldNum" sz="quarter" idx="12""#, None, ""),
    ]
    .concat();
    let title = ph(2, r#"type="title""#, None, "Click to edit Master title style");
    let shapes = match index {
        0 => [
            ph(2, r#"type="ctrTitle""#, Some((1_524_000, 1_122_363, 9_144_000, 2_387_600)), "Click to edit Master title style"),
            ph(3, r#"type="subTitle" idx="1""#, Some((1_524_000, 3_602_038, 9_144_000, 1_655_762)), "Click to edit Master subtitle style"),
        ]
        .concat(),
        1 => [title, ph(3, r#"idx="1""#, None, "Click to edit Master text styles")].concat(),
        2 => [title, ph(3, r#"type="body" idx="1""#, Some((831_850, 4_589_463, 10_515_600, 1_500_187)), "Click to edit Master text styles")].concat(),
        3 => [
            title,
            ph(3, r#"sz="half" idx="1""#, Some((838_200, 1_825_625, 5_181_600, 4_351_338)), "Click to edit Master text styles"),
            ph(4, r#"sz="half" idx="2""#, Some((6_172_200, 1_825_625, 5_181_600, 4_351_338)), "Click to edit Master text styles"),
        ]
        .concat(),
        4 | 5 => title,
        _ => String::new(),
    };
    format!(
        r#"<p:sldLayout {NS} preserve="1"><p:cSld name="{name}"><p:spTree>{TREE_HEAD}{shapes}{footers}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

const THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office 테마"><a:themeElements><a:clrScheme name="Office"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="44546A"/></a:dk2><a:lt2><a:srgbClr val="E7E6E6"/></a:lt2><a:accent1><a:srgbClr val="4472C4"/></a:accent1><a:accent2><a:srgbClr val="ED7D31"/></a:accent2><a:accent3><a:srgbClr val="A5A5A5"/></a:accent3><a:accent4><a:srgbClr val="FFC000"/></a:accent4><a:accent5><a:srgbClr val="5B9BD5"/></a:accent5><a:accent6><a:srgbClr val="70AD47"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface="맑은 고딕"/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Office"/></a:themeElements></a:theme>"#;

/// A minimal word-processing package, for content-type checks.
pub(crate) fn word_document() -> Vec<u8> {
    let files = [
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#.to_string(),
        ),
        ("_rels/.rels", rels(&[("rId1", "officeDocument", "word/document.xml")])),
        (
            "word/document.xml",
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#.to_string(),
        ),
    ];
    let mut data = Vec::new();
    let mut writer = ZipWriter::new(Cursor::new(&mut data));
    for (name, content) in &files {
        writer.start_file(*name, SimpleFileOptions::default()).expect("zip entry");
        writer.write_all(content.as_bytes()).expect("zip write");
    }
    writer.finish().expect("zip finish");
    data
}

/// Text frame access for shapes.
///
/// A text frame (`p:txBody`) holds paragraphs (`a:p`), which hold runs
/// (`a:r`), line breaks (`a:br`) and fields (`a:fld`). The read-only views
/// borrow the parsed slide tree; the `*Mut` views edit it in place.
///
/// # Examples
///
/// ```rust,ignore
/// let mut tf = shape.text_frame_mut().unwrap();
/// tf.set_text("First line\nSecond line");
///
/// let mut p = tf.add_paragraph();
/// p.set_text("• indented");
/// p.set_level(1);
/// ```
use crate::common::unit::pt_to_centipoints;
use crate::common::xml::XmlElement;

/// Elements that follow runs inside `a:p`.
const P_RUN_SUCCESSORS: &[&str] = &["endParaRPr"];

/// Read-only view of a `p:txBody` element.
#[derive(Debug, Clone, Copy)]
pub struct TextFrame<'a> {
    tx_body: &'a XmlElement,
}

impl<'a> TextFrame<'a> {
    pub(crate) fn new(tx_body: &'a XmlElement) -> Self {
        Self { tx_body }
    }

    /// Paragraphs in document order.
    pub fn paragraphs(&self) -> Vec<Paragraph<'a>> {
        self.tx_body.children_named("p").map(Paragraph::new).collect()
    }

    /// Text of all paragraphs joined with `\n`; line breaks read as `\v`.
    pub fn text(&self) -> String {
        self.paragraphs()
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Read-only view of an `a:p` element.
#[derive(Debug, Clone, Copy)]
pub struct Paragraph<'a> {
    p: &'a XmlElement,
}

impl<'a> Paragraph<'a> {
    fn new(p: &'a XmlElement) -> Self {
        Self { p }
    }

    pub fn runs(&self) -> Vec<Run<'a>> {
        self.p.children_named("r").map(Run::new).collect()
    }

    /// Paragraph text, including field text; each `a:br` reads as `\v`.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for el in self.p.elements() {
            match el.local_name() {
                "r" | "fld" => {
                    if let Some(t) = el.child("t") {
                        text.push_str(&t.text());
                    }
                },
                "br" => text.push('\u{b}'),
                _ => {},
            }
        }
        text
    }

    /// Indentation level from `a:pPr/@lvl`, 0 when absent.
    pub fn level(&self) -> u32 {
        self.p
            .child("pPr")
            .and_then(|ppr| ppr.attr("lvl"))
            .and_then(|lvl| atoi_simd::parse::<u32>(lvl.as_bytes()).ok())
            .unwrap_or(0)
    }
}

/// Read-only view of an `a:r` element.
#[derive(Debug, Clone, Copy)]
pub struct Run<'a> {
    r: &'a XmlElement,
}

impl<'a> Run<'a> {
    fn new(r: &'a XmlElement) -> Self {
        Self { r }
    }

    pub fn text(&self) -> String {
        self.r.child("t").map(XmlElement::text).unwrap_or_default()
    }

    /// Font size in hundredths of a point.
    pub fn size(&self) -> Option<u32> {
        self.r
            .child("rPr")
            .and_then(|rpr| rpr.attr("sz"))
            .and_then(|sz| atoi_simd::parse::<u32>(sz.as_bytes()).ok())
    }

    pub fn bold(&self) -> Option<bool> {
        self.r
            .child("rPr")
            .and_then(|rpr| rpr.attr("b"))
            .map(|b| b == "1" || b == "true")
    }
}

/// Mutable view of a `p:txBody` element.
#[derive(Debug)]
pub struct TextFrameMut<'a> {
    tx_body: &'a mut XmlElement,
}

impl<'a> TextFrameMut<'a> {
    pub(crate) fn new(tx_body: &'a mut XmlElement) -> Self {
        Self { tx_body }
    }

    pub fn as_text_frame(&self) -> TextFrame<'_> {
        TextFrame::new(self.tx_body)
    }

    pub fn text(&self) -> String {
        self.as_text_frame().text()
    }

    pub fn paragraph_count(&self) -> usize {
        self.tx_body.children_named("p").count()
    }

    /// Remove all paragraphs except the first, and empty that one.
    ///
    /// The remaining paragraph keeps its `a:pPr` and `a:endParaRPr`.
    pub fn clear(&mut self) {
        let mut seen_first = false;
        self.tx_body.remove_elements(|el| {
            if !el.is("p") {
                return false;
            }
            let remove = seen_first;
            seen_first = true;
            remove
        });
        match self.tx_body.child_mut("p") {
            Some(p) => ParagraphMut::new(p).clear(),
            None => self.tx_body.push(XmlElement::new("a:p")),
        }
    }

    /// Replace all text: one paragraph per `\n`-separated line.
    pub fn set_text(&mut self, text: &str) {
        self.tx_body.remove_elements(|el| el.is("p"));
        for line in text.split('\n') {
            self.add_paragraph().append_text(line);
        }
    }

    /// Append an empty paragraph.
    pub fn add_paragraph(&mut self) -> ParagraphMut<'_> {
        ParagraphMut::new(
            self.tx_body
                .insert_before_mut(XmlElement::new("a:p"), &["extLst"]),
        )
    }

    pub fn paragraph_mut(&mut self, index: usize) -> Option<ParagraphMut<'_>> {
        self.tx_body
            .children_named_mut("p")
            .nth(index)
            .map(ParagraphMut::new)
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = ParagraphMut<'_>> {
        self.tx_body.children_named_mut("p").map(ParagraphMut::new)
    }
}

/// Mutable view of an `a:p` element.
#[derive(Debug)]
pub struct ParagraphMut<'a> {
    p: &'a mut XmlElement,
}

impl<'a> ParagraphMut<'a> {
    fn new(p: &'a mut XmlElement) -> Self {
        Self { p }
    }

    pub fn text(&self) -> String {
        Paragraph::new(self.p).text()
    }

    /// Remove runs, line breaks and fields.
    pub fn clear(&mut self) {
        self.p
            .remove_elements(|el| matches!(el.local_name(), "r" | "br" | "fld"));
    }

    /// Replace the paragraph's content with `text`.
    ///
    /// `\n` and `\v` become line breaks between runs.
    pub fn set_text(&mut self, text: &str) {
        self.clear();
        self.append_text(text);
    }

    fn append_text(&mut self, text: &str) {
        for (i, segment) in text.split(['\n', '\u{b}']).enumerate() {
            if i > 0 {
                self.p.insert_before(XmlElement::new("a:br"), P_RUN_SUCCESSORS);
            }
            if !segment.is_empty() {
                self.add_run().set_text(segment);
            }
        }
    }

    /// Set the indentation level; level 0 removes the attribute.
    pub fn set_level(&mut self, level: u32) {
        if level == 0 {
            if let Some(ppr) = self.p.child_mut("pPr") {
                ppr.remove_attr("lvl");
            }
            return;
        }
        self.p
            .get_or_insert("a:pPr", &["r", "br", "fld", "endParaRPr"])
            .set_attr("lvl", &level.to_string());
    }

    /// Append an empty run (`<a:r><a:t/></a:r>`) and return it.
    pub fn add_run(&mut self) -> RunMut<'_> {
        let run = XmlElement::new("a:r").with_child(XmlElement::new("a:t"));
        RunMut::new(self.p.insert_before_mut(run, P_RUN_SUCCESSORS))
    }

    pub fn run_count(&self) -> usize {
        self.p.children_named("r").count()
    }

    pub fn runs_mut(&mut self) -> impl Iterator<Item = RunMut<'_>> {
        self.p.children_named_mut("r").map(RunMut::new)
    }
}

/// Mutable view of an `a:r` element.
#[derive(Debug)]
pub struct RunMut<'a> {
    r: &'a mut XmlElement,
}

impl<'a> RunMut<'a> {
    fn new(r: &'a mut XmlElement) -> Self {
        Self { r }
    }

    pub fn text(&self) -> String {
        Run::new(self.r).text()
    }

    pub fn set_text(&mut self, text: &str) {
        self.r.get_or_insert("a:t", &[]).set_text(text);
    }

    /// Set the font size in points.
    pub fn set_size(&mut self, points: f64) {
        self.r_pr()
            .set_attr("sz", &pt_to_centipoints(points).to_string());
    }

    pub fn set_bold(&mut self, bold: bool) {
        self.r_pr().set_attr("b", if bold { "1" } else { "0" });
    }

    /// `a:rPr` is the first child of `a:r`.
    fn r_pr(&mut self) -> &mut XmlElement {
        self.r.get_or_insert("a:rPr", &["t"])
    }
}

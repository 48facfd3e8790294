/// Base shape types for PowerPoint slides.
///
/// A shape is one child element of a slide's shape tree (`p:spTree`). The
/// wrappers here borrow that element: [`Shape`] for reading and [`ShapeMut`]
/// for editing text in place.
use crate::common::unit::Rect;
use crate::common::xml::XmlElement;
use crate::ooxml::pptx::shapes::textframe::{TextFrame, TextFrameMut};

/// Shape type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    /// An auto shape or text box (p:sp)
    Shape,
    /// A picture shape (p:pic)
    Picture,
    /// A graphic frame containing a table, chart or diagram (p:graphicFrame)
    GraphicFrame,
    /// A group shape (p:grpSp)
    GroupShape,
    /// A connector shape (p:cxnSp)
    Connector,
    /// Ink and other content parts (p:contentPart)
    ContentPart,
}

impl ShapeType {
    /// Shape type of a shape-tree child, by local name.
    pub fn from_local_name(local: &str) -> Option<Self> {
        match local {
            "sp" => Some(Self::Shape),
            "pic" => Some(Self::Picture),
            "graphicFrame" => Some(Self::GraphicFrame),
            "grpSp" => Some(Self::GroupShape),
            "cxnSp" => Some(Self::Connector),
            "contentPart" => Some(Self::ContentPart),
            _ => None,
        }
    }
}

/// Placeholder type of a `p:ph` element.
///
/// Discriminants are the PowerPoint enumeration values, used in labels such
/// as `BODY (2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderType {
    Title = 1,
    Body = 2,
    CenterTitle = 3,
    Subtitle = 4,
    Object = 7,
    Chart = 8,
    Bitmap = 9,
    MediaClip = 10,
    OrgChart = 11,
    Table = 12,
    SlideNumber = 13,
    Header = 14,
    Footer = 15,
    Date = 16,
    Picture = 18,
    SlideImage = 101,
}

impl PlaceholderType {
    /// Parse the `type` attribute; an absent attribute means `obj`.
    pub fn from_xml(value: Option<&str>) -> Self {
        match value.unwrap_or("obj") {
            "title" => Self::Title,
            "body" => Self::Body,
            "ctrTitle" => Self::CenterTitle,
            "subTitle" => Self::Subtitle,
            "chart" => Self::Chart,
            "clipArt" => Self::Bitmap,
            "media" => Self::MediaClip,
            "dgm" => Self::OrgChart,
            "tbl" => Self::Table,
            "sldNum" => Self::SlideNumber,
            "hdr" => Self::Header,
            "ftr" => Self::Footer,
            "dt" => Self::Date,
            "pic" => Self::Picture,
            "sldImg" => Self::SlideImage,
            _ => Self::Object,
        }
    }

    /// Enumeration name, e.g. `CENTER_TITLE`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "TITLE",
            Self::Body => "BODY",
            Self::CenterTitle => "CENTER_TITLE",
            Self::Subtitle => "SUBTITLE",
            Self::Object => "OBJECT",
            Self::Chart => "CHART",
            Self::Bitmap => "BITMAP",
            Self::MediaClip => "MEDIA_CLIP",
            Self::OrgChart => "ORG_CHART",
            Self::Table => "TABLE",
            Self::SlideNumber => "SLIDE_NUMBER",
            Self::Header => "HEADER",
            Self::Footer => "FOOTER",
            Self::Date => "DATE",
            Self::Picture => "PICTURE",
            Self::SlideImage => "SLIDE_IMAGE",
        }
    }

    /// Display label, e.g. `BODY (2)`.
    pub fn label(self) -> String {
        format!("{} ({})", self.name(), self as u32)
    }

    /// Base of the name given to a new placeholder shape of this type.
    pub fn basename(self) -> &'static str {
        match self {
            Self::Title | Self::CenterTitle => "Title",
            Self::Body => "Text Placeholder",
            Self::Subtitle => "Subtitle",
            Self::Object => "Content Placeholder",
            Self::Chart => "Chart Placeholder",
            Self::Bitmap => "Picture",
            Self::MediaClip => "Media Placeholder",
            Self::OrgChart => "SmartArt Placeholder",
            Self::Table => "Table Placeholder",
            Self::SlideNumber => "Slide Number Placeholder",
            Self::Header => "Header Placeholder",
            Self::Footer => "Footer Placeholder",
            Self::Date => "Date Placeholder",
            Self::Picture => "Picture Placeholder",
            Self::SlideImage => "Slide Image Placeholder",
        }
    }

    /// Whether a new placeholder of this type starts with a text frame.
    pub fn has_text_frame(self) -> bool {
        matches!(
            self,
            Self::Title | Self::CenterTitle | Self::Subtitle | Self::Body | Self::Object
        )
    }

    /// Type of the master placeholder a layout placeholder inherits from.
    pub fn master_type(self) -> Self {
        match self {
            Self::Title | Self::CenterTitle => Self::Title,
            Self::Date => Self::Date,
            Self::Footer => Self::Footer,
            Self::SlideNumber => Self::SlideNumber,
            _ => Self::Body,
        }
    }
}

/// `p:ph` properties of a placeholder shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderFormat {
    pub ph_type: PlaceholderType,
    pub idx: u32,
}

/// Read-only view of a shape element.
#[derive(Debug, Clone, Copy)]
pub struct Shape<'a> {
    element: &'a XmlElement,
    shape_type: ShapeType,
}

impl<'a> Shape<'a> {
    /// Wrap a shape-tree child; `None` for non-shape elements such as
    /// `p:nvGrpSpPr` or `p:extLst`.
    pub fn from_element(element: &'a XmlElement) -> Option<Self> {
        ShapeType::from_local_name(element.local_name()).map(|shape_type| Self {
            element,
            shape_type,
        })
    }

    #[inline]
    pub fn element(&self) -> &'a XmlElement {
        self.element
    }

    #[inline]
    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    /// The `p:cNvPr` element.
    fn c_nv_pr(&self) -> Option<&'a XmlElement> {
        non_visual(self.element).and_then(|nv| nv.child("cNvPr"))
    }

    /// Shape name from `p:cNvPr/@name`.
    pub fn name(&self) -> String {
        self.c_nv_pr()
            .and_then(|c| c.attr("name"))
            .unwrap_or_default()
    }

    /// Shape id from `p:cNvPr/@id`.
    pub fn shape_id(&self) -> Option<u32> {
        self.c_nv_pr()
            .and_then(|c| c.attr("id"))
            .and_then(|id| atoi_simd::parse::<u32>(id.as_bytes()).ok())
    }

    /// Placeholder format, when the shape is a placeholder.
    pub fn placeholder(&self) -> Option<PlaceholderFormat> {
        placeholder_format(self.element)
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        self.placeholder().is_some()
    }

    /// Position and size from the shape's own transform, if it has one.
    pub fn rect(&self) -> Option<Rect> {
        let xfrm = match self.shape_type {
            ShapeType::GraphicFrame => self.element.child("xfrm"),
            ShapeType::GroupShape => self.element.descend(&["grpSpPr", "xfrm"]),
            _ => self.element.descend(&["spPr", "xfrm"]),
        }?;
        let off = xfrm.child("off")?;
        let ext = xfrm.child("ext")?;
        Some(Rect {
            x: emu_attr(off, "x"),
            y: emu_attr(off, "y"),
            cx: emu_attr(ext, "cx"),
            cy: emu_attr(ext, "cy"),
        })
    }

    /// Only auto shapes and text boxes carry a text frame.
    #[inline]
    pub fn has_text_frame(&self) -> bool {
        self.shape_type == ShapeType::Shape
    }

    /// The text frame, when present in the XML.
    pub fn text_frame(&self) -> Option<TextFrame<'a>> {
        if !self.has_text_frame() {
            return None;
        }
        self.element.child("txBody").map(TextFrame::new)
    }

    /// Text of the text frame; empty for shapes without one.
    pub fn text(&self) -> String {
        self.text_frame().map(|tf| tf.text()).unwrap_or_default()
    }
}

/// Mutable view of a shape element.
#[derive(Debug)]
pub struct ShapeMut<'a> {
    element: &'a mut XmlElement,
    shape_type: ShapeType,
}

impl<'a> ShapeMut<'a> {
    pub fn from_element(element: &'a mut XmlElement) -> Option<Self> {
        let shape_type = ShapeType::from_local_name(element.local_name())?;
        Some(Self {
            element,
            shape_type,
        })
    }

    #[inline]
    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    /// Read-only view of the same shape.
    pub fn as_shape(&self) -> Shape<'_> {
        Shape {
            element: &*self.element,
            shape_type: self.shape_type,
        }
    }

    #[inline]
    pub fn has_text_frame(&self) -> bool {
        self.shape_type == ShapeType::Shape
    }

    /// The text frame, created (`<p:txBody><a:bodyPr/><a:lstStyle/><a:p/></p:txBody>`)
    /// when a shape that can carry text has none yet.
    pub fn text_frame_mut(&mut self) -> Option<TextFrameMut<'_>> {
        if !self.has_text_frame() {
            return None;
        }
        if self.element.child("txBody").is_none() {
            let tx_body = XmlElement::new("p:txBody")
                .with_child(XmlElement::new("a:bodyPr"))
                .with_child(XmlElement::new("a:lstStyle"))
                .with_child(XmlElement::new("a:p"));
            self.element.insert_before(tx_body, &["extLst"]);
        }
        self.element.child_mut("txBody").map(TextFrameMut::new)
    }
}

/// The `p:nvXxPr` child of a shape element.
fn non_visual(element: &XmlElement) -> Option<&XmlElement> {
    element
        .elements()
        .find(|el| el.local_name().starts_with("nv"))
}

/// Placeholder format of any shape element, read from `p:nvXxPr/p:nvPr/p:ph`.
pub(crate) fn placeholder_format(element: &XmlElement) -> Option<PlaceholderFormat> {
    let ph = non_visual(element)?.child("nvPr")?.child("ph")?;
    let ph_type = PlaceholderType::from_xml(ph.attr("type").as_deref());
    let idx = ph
        .attr("idx")
        .and_then(|v| atoi_simd::parse::<u32>(v.as_bytes()).ok())
        .unwrap_or(0);
    Some(PlaceholderFormat { ph_type, idx })
}

fn emu_attr(element: &XmlElement, name: &str) -> i64 {
    element
        .attr(name)
        .and_then(|v| atoi_simd::parse::<i64>(v.as_bytes()).ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLE_SP: &str = r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="457200" y="274638"/><a:ext cx="8229600" cy="1143000"/></a:xfrm></p:spPr><p:txBody><a:bodyPr/><a:p><a:r><a:t>Title</a:t></a:r></a:p></p:txBody></p:sp>"#;

    #[test]
    fn test_shape_properties() {
        let el = XmlElement::parse_fragment(TITLE_SP).unwrap();
        let shape = Shape::from_element(&el).unwrap();

        assert_eq!(shape.shape_type(), ShapeType::Shape);
        assert_eq!(shape.name(), "Title 1");
        assert_eq!(shape.shape_id(), Some(2));
        assert_eq!(
            shape.placeholder(),
            Some(PlaceholderFormat { ph_type: PlaceholderType::Title, idx: 0 })
        );
        assert_eq!(
            shape.rect(),
            Some(Rect { x: 457_200, y: 274_638, cx: 8_229_600, cy: 1_143_000 })
        );
        assert_eq!(shape.text(), "Title");
    }

    #[test]
    fn test_picture_has_no_text_frame() {
        let el = XmlElement::parse_fragment(
            r#"<p:pic><p:nvPicPr><p:cNvPr id="4" name="Picture 3"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/></p:blipFill><p:spPr/></p:pic>"#,
        )
        .unwrap();
        let shape = Shape::from_element(&el).unwrap();
        assert!(!shape.has_text_frame());
        assert!(!shape.is_placeholder());
        assert_eq!(shape.text(), "");
        assert_eq!(shape.rect(), None);
    }

    #[test]
    fn test_non_shape_elements_are_skipped() {
        let el = XmlElement::parse_fragment("<p:extLst/>").unwrap();
        assert!(Shape::from_element(&el).is_none());
    }

    #[test]
    fn test_text_frame_created_on_demand() {
        let mut el = XmlElement::parse_fragment(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="5" name="Rectangle 4"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/></p:sp>"#,
        )
        .unwrap();
        let mut shape = ShapeMut::from_element(&mut el).unwrap();
        shape.text_frame_mut().unwrap().set_text("box");
        assert_eq!(shape.as_shape().text(), "box");
    }

    #[test]
    fn test_placeholder_labels() {
        assert_eq!(PlaceholderType::from_xml(Some("body")).label(), "BODY (2)");
        assert_eq!(PlaceholderType::from_xml(None).label(), "OBJECT (7)");
        assert_eq!(PlaceholderType::from_xml(Some("ctrTitle")).master_type(), PlaceholderType::Title);
        assert_eq!(PlaceholderType::from_xml(Some("subTitle")).master_type(), PlaceholderType::Body);
    }
}

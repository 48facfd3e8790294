/// New-shape templates: text boxes and preset-geometry auto shapes.
///
/// Shapes are written as XML in the form PowerPoint itself produces, then
/// parsed into an element ready to be inserted into a shape tree.
use crate::common::unit::Rect;
use crate::common::xml::{XmlElement, escape_xml};
use crate::ooxml::error::{OoxmlError, Result};
use std::fmt::Write as FmtWrite;

/// Preset geometries used by the slide authoring API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoShapeType {
    Rectangle,
    RoundedRectangle,
    Cloud,
    RightArrow,
}

impl AutoShapeType {
    /// `a:prstGeom/@prst` value.
    pub fn prst(self) -> &'static str {
        match self {
            Self::Rectangle => "rect",
            Self::RoundedRectangle => "roundRect",
            Self::Cloud => "cloud",
            Self::RightArrow => "rightArrow",
        }
    }

    /// Base of the generated shape name, e.g. `Rounded Rectangle 3`.
    pub fn basename(self) -> &'static str {
        match self {
            Self::Rectangle => "Rectangle",
            Self::RoundedRectangle => "Rounded Rectangle",
            Self::Cloud => "Cloud",
            Self::RightArrow => "Right Arrow",
        }
    }
}

fn write_nv_sp_pr(xml: &mut String, id: u32, name: &str, c_nv_sp_pr: &str) -> Result<()> {
    xml.push_str("<p:nvSpPr>");
    write!(xml, r#"<p:cNvPr id="{}" name="{}"/>"#, id, escape_xml(name))
        .map_err(|e| OoxmlError::Xml(e.to_string()))?;
    xml.push_str(c_nv_sp_pr);
    xml.push_str("<p:nvPr/>");
    xml.push_str("</p:nvSpPr>");
    Ok(())
}

fn write_xfrm(xml: &mut String, rect: Rect) -> Result<()> {
    xml.push_str("<a:xfrm>");
    write!(xml, r#"<a:off x="{}" y="{}"/>"#, rect.x, rect.y)
        .map_err(|e| OoxmlError::Xml(e.to_string()))?;
    write!(xml, r#"<a:ext cx="{}" cy="{}"/>"#, rect.cx, rect.cy)
        .map_err(|e| OoxmlError::Xml(e.to_string()))?;
    xml.push_str("</a:xfrm>");
    Ok(())
}

/// A text box (`p:sp` with `txBox="1"`) named `TextBox {id - 1}`.
///
/// The text frame has no fill, does not wrap and resizes to fit its text.
pub fn new_textbox(id: u32, rect: Rect) -> Result<XmlElement> {
    let mut xml = String::with_capacity(512);
    let name = format!("TextBox {}", id.saturating_sub(1));

    xml.push_str("<p:sp>");
    write_nv_sp_pr(&mut xml, id, &name, r#"<p:cNvSpPr txBox="1"/>"#)?;

    xml.push_str("<p:spPr>");
    write_xfrm(&mut xml, rect)?;
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    xml.push_str("<a:noFill/>");
    xml.push_str("</p:spPr>");

    xml.push_str("<p:txBody>");
    xml.push_str(r#"<a:bodyPr wrap="none"><a:spAutoFit/></a:bodyPr>"#);
    xml.push_str("<a:lstStyle/>");
    xml.push_str("<a:p/>");
    xml.push_str("</p:txBody>");
    xml.push_str("</p:sp>");

    Ok(XmlElement::parse_fragment(&xml)?)
}

/// An auto shape styled with the theme's `accent1` line, fill and effect,
/// with centred `lt1` text.
pub fn new_auto_shape(id: u32, shape_type: AutoShapeType, rect: Rect) -> Result<XmlElement> {
    let mut xml = String::with_capacity(1024);
    let name = format!("{} {}", shape_type.basename(), id.saturating_sub(1));

    xml.push_str("<p:sp>");
    write_nv_sp_pr(&mut xml, id, &name, "<p:cNvSpPr/>")?;

    xml.push_str("<p:spPr>");
    write_xfrm(&mut xml, rect)?;
    write!(
        xml,
        r#"<a:prstGeom prst="{}"><a:avLst/></a:prstGeom>"#,
        shape_type.prst()
    )
    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
    xml.push_str("</p:spPr>");

    xml.push_str("<p:style>");
    xml.push_str(r#"<a:lnRef idx="1"><a:schemeClr val="accent1"/></a:lnRef>"#);
    xml.push_str(r#"<a:fillRef idx="3"><a:schemeClr val="accent1"/></a:fillRef>"#);
    xml.push_str(r#"<a:effectRef idx="2"><a:schemeClr val="accent1"/></a:effectRef>"#);
    xml.push_str(r#"<a:fontRef idx="minor"><a:schemeClr val="lt1"/></a:fontRef>"#);
    xml.push_str("</p:style>");

    xml.push_str("<p:txBody>");
    xml.push_str(r#"<a:bodyPr rtlCol="0" anchor="ctr"/>"#);
    xml.push_str("<a:lstStyle/>");
    xml.push_str(r#"<a:p><a:pPr algn="ctr"/></a:p>"#);
    xml.push_str("</p:txBody>");
    xml.push_str("</p:sp>");

    Ok(XmlElement::parse_fragment(&xml)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::shapes::base::Shape;

    #[test]
    fn test_textbox_template() {
        let el = new_textbox(7, Rect::from_inches(1.0, 2.0, 8.0, 4.0)).unwrap();
        let shape = Shape::from_element(&el).unwrap();

        assert_eq!(shape.name(), "TextBox 6");
        assert_eq!(shape.shape_id(), Some(7));
        assert_eq!(shape.rect(), Some(Rect::from_inches(1.0, 2.0, 8.0, 4.0)));
        assert_eq!(shape.text(), "");
        assert!(el.find("spAutoFit").is_some());
    }

    #[test]
    fn test_auto_shape_template() {
        let el = new_auto_shape(12, AutoShapeType::Cloud, Rect::from_inches(8.5, 3.0, 1.5, 1.0)).unwrap();
        let shape = Shape::from_element(&el).unwrap();

        assert_eq!(shape.name(), "Cloud 11");
        assert_eq!(el.find("prstGeom").and_then(|g| g.attr("prst")).as_deref(), Some("cloud"));
        assert_eq!(el.find("pPr").and_then(|p| p.attr("algn")).as_deref(), Some("ctr"));
        assert!(!shape.is_placeholder());
    }
}

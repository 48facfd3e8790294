/// Slide masters and slide layouts.
///
/// A master owns an ordered list of layouts (`p:sldLayoutIdLst`); a layout
/// carries the placeholders that new slides are created from. Layout
/// placeholders without their own transform inherit position and size from
/// the master placeholder of the matching type.
use crate::common::unit::Rect;
use crate::common::xml::{XmlDocument, XmlElement};
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::Part;
use crate::ooxml::pptx::shapes::{PlaceholderFormat, PlaceholderType, Shape};

/// Name of a slide-like part, from `p:cSld/@name`.
fn c_sld_name(doc: &XmlDocument) -> String {
    doc.root()
        .child("cSld")
        .and_then(|c_sld| c_sld.attr("name"))
        .unwrap_or_default()
}

/// Shape-tree children of a slide-like part that are placeholders.
fn placeholder_shapes(doc: &XmlDocument) -> Vec<Shape<'_>> {
    doc.root()
        .descend(&["cSld", "spTree"])
        .map(|tree| {
            tree.elements()
                .filter_map(Shape::from_element)
                .filter(Shape::is_placeholder)
                .collect()
        })
        .unwrap_or_default()
}

/// A slide master.
///
/// # Examples
///
/// ```rust,ignore
/// for master in pkg.masters()? {
///     println!("{} has {} layouts", master.name(), master.layout_partnames().len());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SlideMaster {
    partname: PackURI,
    layout_partnames: Vec<PackURI>,
    doc: XmlDocument,
}

impl SlideMaster {
    /// Load a master from its part; layouts are resolved through the
    /// part's relationships in `p:sldLayoutIdLst` order.
    pub fn from_part(part: &dyn Part) -> Result<Self> {
        let doc = part.xml()?;
        let r_attr = format!(
            "{}:id",
            doc.prefix_for(namespace::OFC_RELATIONSHIPS)
                .unwrap_or_else(|| "r".to_string())
        );

        let mut layout_partnames = Vec::new();
        if let Some(list) = doc.root().child("sldLayoutIdLst") {
            for entry in list.children_named("sldLayoutId") {
                let Some(r_id) = entry.attr(&r_attr) else {
                    continue;
                };
                match part.target_partname(&r_id) {
                    Ok(partname) => layout_partnames.push(partname),
                    Err(e) => log::warn!("skipping layout {} of {}: {}", r_id, part.partname(), e),
                }
            }
        }

        Ok(Self {
            partname: part.partname().clone(),
            layout_partnames,
            doc,
        })
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    pub fn name(&self) -> String {
        c_sld_name(&self.doc)
    }

    /// Partnames of this master's layouts, in order.
    #[inline]
    pub fn layout_partnames(&self) -> &[PackURI] {
        &self.layout_partnames
    }

    pub fn placeholders(&self) -> Vec<Shape<'_>> {
        placeholder_shapes(&self.doc)
    }

    /// Geometry of the first placeholder of type `ph_type`.
    pub fn placeholder_rect(&self, ph_type: PlaceholderType) -> Option<Rect> {
        self.placeholders()
            .into_iter()
            .find(|shape| shape.placeholder().is_some_and(|ph| ph.ph_type == ph_type))
            .and_then(|shape| shape.rect())
    }
}

/// A slide layout.
#[derive(Debug, Clone)]
pub struct SlideLayout {
    partname: PackURI,
    doc: XmlDocument,
}

impl SlideLayout {
    pub fn from_part(part: &dyn Part) -> Result<Self> {
        Ok(Self {
            partname: part.partname().clone(),
            doc: part.xml()?,
        })
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// Layout name, e.g. `Title and Content`.
    pub fn name(&self) -> String {
        c_sld_name(&self.doc)
    }

    /// Placeholders directly in the layout's shape tree.
    pub fn placeholders(&self) -> Vec<Shape<'_>> {
        placeholder_shapes(&self.doc)
    }

    #[inline]
    pub fn placeholder_count(&self) -> usize {
        self.placeholders().len()
    }

    /// Placeholders a new slide based on this layout starts with: all but
    /// date, footer and slide number, as their `p:ph` elements.
    pub(crate) fn cloneable_placeholders(&self) -> Vec<(PlaceholderFormat, XmlElement)> {
        self.placeholders()
            .into_iter()
            .filter_map(|shape| {
                let format = shape.placeholder()?;
                let ph = shape.element().find("ph")?.clone();
                Some((format, ph))
            })
            .filter(|(format, _)| {
                !matches!(
                    format.ph_type,
                    PlaceholderType::Date | PlaceholderType::Footer | PlaceholderType::SlideNumber
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
    use crate::ooxml::opc::part::XmlPart;

    const MASTER: &str = r#"<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/><p:sp><p:nvSpPr><p:cNvPr id="2" name="Title Placeholder 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="838200" y="365125"/><a:ext cx="10515600" cy="1325563"/></a:xfrm></p:spPr></p:sp><p:sp><p:nvSpPr><p:cNvPr id="3" name="Text Placeholder 2"/><p:cNvSpPr/><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="838200" y="1825625"/><a:ext cx="10515600" cy="4351338"/></a:xfrm></p:spPr></p:sp></p:spTree></p:cSld><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId2"/><p:sldLayoutId id="2147483650" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#;

    const LAYOUT: &str = r#"<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld name="Title and Content"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/><p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp><p:sp><p:nvSpPr><p:cNvPr id="3" name="Content Placeholder 2"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp><p:sp><p:nvSpPr><p:cNvPr id="4" name="Date Placeholder 3"/><p:cNvSpPr/><p:nvPr><p:ph type="dt" sz="half" idx="10"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp><p:sp><p:nvSpPr><p:cNvPr id="5" name="Logo"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/></p:sp></p:spTree></p:cSld></p:sldLayout>"#;

    #[test]
    fn test_master_layout_order() {
        let mut part = XmlPart::new(
            PackURI::new("/ppt/slideMasters/slideMaster1.xml").unwrap(),
            ct::PML_SLIDE_MASTER.to_string(),
            MASTER.as_bytes().to_vec(),
        );
        part.relate_to(&PackURI::new("/ppt/slideLayouts/slideLayout2.xml").unwrap(), rt::SLIDE_LAYOUT);
        part.relate_to(&PackURI::new("/ppt/slideLayouts/slideLayout1.xml").unwrap(), rt::SLIDE_LAYOUT);

        let master = SlideMaster::from_part(&part).unwrap();
        let names: Vec<_> = master.layout_partnames().iter().map(PackURI::as_str).collect();
        assert_eq!(names, ["/ppt/slideLayouts/slideLayout1.xml", "/ppt/slideLayouts/slideLayout2.xml"]);
        assert_eq!(
            master.placeholder_rect(PlaceholderType::Body),
            Some(Rect { x: 838_200, y: 1_825_625, cx: 10_515_600, cy: 4_351_338 })
        );
        assert_eq!(master.placeholder_rect(PlaceholderType::Footer), None);
    }

    #[test]
    fn test_layout_placeholders() {
        let part = XmlPart::new(
            PackURI::new("/ppt/slideLayouts/slideLayout2.xml").unwrap(),
            ct::PML_SLIDE_LAYOUT.to_string(),
            LAYOUT.as_bytes().to_vec(),
        );
        let layout = SlideLayout::from_part(&part).unwrap();

        assert_eq!(layout.name(), "Title and Content");
        assert_eq!(layout.placeholder_count(), 3);
        assert_eq!(layout.placeholders()[1].placeholder().unwrap().ph_type, PlaceholderType::Object);

        let cloneable = layout.cloneable_placeholders();
        assert_eq!(cloneable.len(), 2);
        assert_eq!(cloneable[0].0.ph_type, PlaceholderType::Title);
        assert_eq!(cloneable[1].1.attr("idx").as_deref(), Some("1"));
    }
}

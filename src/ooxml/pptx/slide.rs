/// A slide: its parsed XML plus the partnames that place it in the package.
///
/// Slides are loaded from the package as owned values, edited through the
/// shape API and written back with [`Package::store_slide`].
///
/// # Examples
///
/// ```rust,no_run
/// use slidewright::common::Rect;
/// use slidewright::ooxml::pptx::Package;
///
/// let mut pkg = Package::open("deck.pptx")?;
/// let mut slide = pkg.slide(0)?;
/// let idx = slide.add_textbox(Rect::from_inches(1.0, 1.0, 4.0, 1.0))?;
/// if let Some(mut shape) = slide.shape_mut(idx) {
///     if let Some(mut tf) = shape.text_frame_mut() {
///         tf.set_text("Hello");
///     }
/// }
/// pkg.store_slide(&slide)?;
/// # Ok::<(), slidewright::ooxml::error::OoxmlError>(())
/// ```
///
/// [`Package::store_slide`]: crate::ooxml::pptx::Package::store_slide
use crate::common::unit::Rect;
use crate::common::xml::{XmlDocument, XmlElement};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{namespace, relationship_type as rt};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::Part;
use crate::ooxml::pptx::shapes::autoshape::{self, AutoShapeType};
use crate::ooxml::pptx::shapes::{PlaceholderFormat, Shape, ShapeMut, ShapeType};
use std::collections::BTreeMap;

/// Elements that follow the shapes in `p:spTree`.
const SP_TREE_SUCCESSORS: &[&str] = &["extLst"];

/// A slide in a presentation.
#[derive(Debug, Clone)]
pub struct Slide {
    partname: PackURI,
    layout_partname: Option<PackURI>,
    doc: XmlDocument,
}

impl Slide {
    /// Load a slide from its part.
    pub fn from_part(part: &dyn Part) -> Result<Self> {
        let layout_partname = part
            .rels()
            .iter()
            .find(|rel| rel.reltype() == rt::SLIDE_LAYOUT)
            .and_then(|rel| rel.target_partname().ok());

        Ok(Self {
            partname: part.partname().clone(),
            layout_partname,
            doc: part.xml()?,
        })
    }

    /// XML of a slide with an empty shape tree.
    pub(crate) fn new_document() -> XmlDocument {
        let sp_tree = XmlElement::new("p:spTree")
            .with_child(
                XmlElement::new("p:nvGrpSpPr")
                    .with_child(XmlElement::new("p:cNvPr").with_attr("id", "1").with_attr("name", ""))
                    .with_child(XmlElement::new("p:cNvGrpSpPr"))
                    .with_child(XmlElement::new("p:nvPr")),
            )
            .with_child(XmlElement::new("p:grpSpPr"));

        let root = XmlElement::new("p:sld")
            .with_attr("xmlns:a", namespace::DML_MAIN)
            .with_attr("xmlns:r", namespace::OFC_RELATIONSHIPS)
            .with_attr("xmlns:p", namespace::PML_MAIN)
            .with_child(XmlElement::new("p:cSld").with_child(sp_tree))
            .with_child(
                XmlElement::new("p:clrMapOvr").with_child(XmlElement::new("a:masterClrMapping")),
            );
        XmlDocument::new(root)
    }

    /// An empty slide based on the layout at `layout_partname`.
    pub(crate) fn new(partname: PackURI, layout_partname: PackURI) -> Self {
        Self {
            partname,
            layout_partname: Some(layout_partname),
            doc: Self::new_document(),
        }
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// Partname of the layout this slide is based on.
    #[inline]
    pub fn layout_partname(&self) -> Option<&PackURI> {
        self.layout_partname.as_ref()
    }

    #[inline]
    pub fn document(&self) -> &XmlDocument {
        &self.doc
    }

    fn sp_tree(&self) -> Option<&XmlElement> {
        self.doc.root().descend(&["cSld", "spTree"])
    }

    fn sp_tree_mut(&mut self) -> Result<&mut XmlElement> {
        let partname = self.partname.clone();
        self.doc
            .root_mut()
            .descend_mut(&["cSld", "spTree"])
            .ok_or_else(|| OoxmlError::InvalidFormat(format!("{} has no shape tree", partname)))
    }

    /// Shapes in z-order.
    pub fn shapes(&self) -> Vec<Shape<'_>> {
        self.sp_tree()
            .map(|tree| tree.elements().filter_map(Shape::from_element).collect())
            .unwrap_or_default()
    }

    pub fn shape_count(&self) -> usize {
        self.shapes().len()
    }

    pub fn shape(&self, index: usize) -> Option<Shape<'_>> {
        self.shapes().into_iter().nth(index)
    }

    pub fn shape_mut(&mut self, index: usize) -> Option<ShapeMut<'_>> {
        self.doc
            .root_mut()
            .descend_mut(&["cSld", "spTree"])?
            .elements_mut()
            .filter_map(ShapeMut::from_element)
            .nth(index)
    }

    /// Visit every shape mutably, in z-order.
    pub fn for_each_shape_mut(&mut self, mut visit: impl FnMut(&mut ShapeMut<'_>)) {
        if let Some(tree) = self.doc.root_mut().descend_mut(&["cSld", "spTree"]) {
            for el in tree.elements_mut() {
                if let Some(mut shape) = ShapeMut::from_element(el) {
                    visit(&mut shape);
                }
            }
        }
    }

    /// Text of all text frames, in z-order.
    pub fn texts(&self) -> Vec<String> {
        self.shapes()
            .iter()
            .filter(|shape| shape.has_text_frame())
            .map(Shape::text)
            .collect()
    }

    /// One more than the largest `id` attribute anywhere in the slide.
    pub fn next_shape_id(&self) -> u32 {
        let mut max_id = 0u32;
        self.doc.root().walk(&mut |el| {
            if let Some(id) = el.attr("id")
                && let Ok(id) = atoi_simd::parse::<u32>(id.as_bytes())
            {
                max_id = max_id.max(id);
            }
        });
        max_id + 1
    }

    /// Insert a shape element after the existing shapes, returning its
    /// shape index.
    pub fn insert_shape(&mut self, element: XmlElement) -> Result<usize> {
        let tree = self.sp_tree_mut()?;
        tree.insert_before(element, SP_TREE_SUCCESSORS);
        let count = tree
            .elements()
            .filter(|el| ShapeType::from_local_name(el.local_name()).is_some())
            .count();
        Ok(count - 1)
    }

    /// Add an empty text box.
    pub fn add_textbox(&mut self, rect: Rect) -> Result<usize> {
        let element = autoshape::new_textbox(self.next_shape_id(), rect)?;
        self.insert_shape(element)
    }

    /// Add a preset-geometry auto shape.
    pub fn add_auto_shape(&mut self, shape_type: AutoShapeType, rect: Rect) -> Result<usize> {
        let element = autoshape::new_auto_shape(self.next_shape_id(), shape_type, rect)?;
        self.insert_shape(element)
    }

    /// Add a placeholder shape inheriting everything from the layout
    /// placeholder whose `p:ph` element is `ph`.
    pub(crate) fn add_placeholder(&mut self, format: PlaceholderFormat, mut ph: XmlElement) -> Result<usize> {
        let id = self.next_shape_id();
        let name = format!("{} {}", format.ph_type.basename(), id.saturating_sub(1));
        ph.remove_attr("hasCustomPrompt");

        let mut sp = XmlElement::new("p:sp")
            .with_child(
                XmlElement::new("p:nvSpPr")
                    .with_child(
                        XmlElement::new("p:cNvPr")
                            .with_attr("id", &id.to_string())
                            .with_attr("name", &name),
                    )
                    .with_child(
                        XmlElement::new("p:cNvSpPr")
                            .with_child(XmlElement::new("a:spLocks").with_attr("noGrp", "1")),
                    )
                    .with_child(XmlElement::new("p:nvPr").with_child(ph)),
            )
            .with_child(XmlElement::new("p:spPr"));
        if format.ph_type.has_text_frame() {
            sp.push(
                XmlElement::new("p:txBody")
                    .with_child(XmlElement::new("a:bodyPr"))
                    .with_child(XmlElement::new("a:lstStyle"))
                    .with_child(XmlElement::new("a:p")),
            );
        }
        self.insert_shape(sp)
    }

    /// Remove every placeholder shape. Returns how many were removed.
    pub fn remove_placeholders(&mut self) -> Result<usize> {
        let tree = self.sp_tree_mut()?;
        Ok(tree.remove_elements(|el| Shape::from_element(el).is_some_and(|s| s.is_placeholder())))
    }

    /// Namespace bindings in scope for the shapes of the shape tree.
    pub(crate) fn shape_namespaces(&self) -> BTreeMap<String, String> {
        self.doc.namespace_scope(&["cSld", "spTree"])
    }

    /// Make every prefix `element` uses resolve on this slide as it does in
    /// `scope`, the bindings of the slide it was copied from.
    ///
    /// A prefix this slide does not know is declared on the root element; a
    /// prefix bound here to another URI is redeclared on `element` itself.
    pub(crate) fn bind_namespaces(&mut self, element: &mut XmlElement, scope: &BTreeMap<String, String>) {
        let own = self.shape_namespaces();
        for prefix in element.unbound_prefixes() {
            let Some(uri) = scope.get(&prefix) else {
                if !own.contains_key(&prefix) {
                    log::warn!("{}: prefix '{}' of a copied shape is not declared", self.partname, prefix);
                }
                continue;
            };
            let declaration = format!("xmlns:{}", prefix);
            match own.get(&prefix) {
                Some(bound) if bound == uri => {},
                Some(_) => element.set_attr(&declaration, uri),
                None => self.doc.root_mut().set_attr(&declaration, uri),
            }
        }
    }

    /// Prefix bound to the officeDocument relationships namespace.
    pub(crate) fn relationships_prefix(&self) -> String {
        self.doc
            .prefix_for(namespace::OFC_RELATIONSHIPS)
            .unwrap_or_else(|| "r".to_string())
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        self.doc.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::content_type as ct;
    use crate::ooxml::opc::part::XmlPart;

    fn slide_with(shapes: &str) -> Slide {
        let xml = format!(
            r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{}<p:extLst><p:ext uri="x"/></p:extLst></p:spTree></p:cSld></p:sld>"#,
            shapes
        );
        let mut part = XmlPart::new(
            PackURI::new("/ppt/slides/slide1.xml").unwrap(),
            ct::PML_SLIDE.to_string(),
            xml.into_bytes(),
        );
        part.relate_to(&PackURI::new("/ppt/slideLayouts/slideLayout7.xml").unwrap(), rt::SLIDE_LAYOUT);
        Slide::from_part(&part).unwrap()
    }

    const TITLE: &str = r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:t>제목</a:t></a:r></a:p></p:txBody></p:sp>"#;
    const PICTURE: &str = r#"<p:pic><p:nvPicPr><p:cNvPr id="9" name="Picture 8"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/></p:blipFill><p:spPr/></p:pic>"#;

    #[test]
    fn test_shapes_and_layout() {
        let slide = slide_with(&format!("{TITLE}{PICTURE}"));
        assert_eq!(slide.shape_count(), 2);
        assert_eq!(slide.layout_partname().unwrap().as_str(), "/ppt/slideLayouts/slideLayout7.xml");
        assert_eq!(slide.texts(), vec!["제목".to_string()]);
        assert_eq!(slide.next_shape_id(), 10);
    }

    #[test]
    fn test_add_textbox_before_ext_lst() {
        let mut slide = slide_with(PICTURE);
        let idx = slide.add_textbox(Rect::from_inches(3.0, 3.0, 4.0, 2.0)).unwrap();
        assert_eq!(idx, 1);

        slide
            .shape_mut(idx)
            .unwrap()
            .text_frame_mut()
            .unwrap()
            .set_text("Q & A\n질의응답");
        let shape = slide.shape(idx).unwrap();
        assert_eq!(shape.name(), "TextBox 9");
        assert_eq!(shape.text(), "Q & A\n질의응답");

        let tree = slide.sp_tree().unwrap();
        assert_eq!(tree.elements().last().map(|el| el.local_name()), Some("extLst"));
    }

    #[test]
    fn test_add_auto_shape_ids_increase() {
        let mut slide = slide_with("");
        slide.add_auto_shape(AutoShapeType::RoundedRectangle, Rect::from_inches(1.0, 3.0, 1.5, 1.0)).unwrap();
        slide.add_auto_shape(AutoShapeType::RightArrow, Rect::from_inches(2.5, 3.4, 1.0, 0.2)).unwrap();

        let names: Vec<_> = slide.shapes().iter().map(Shape::name).collect();
        assert_eq!(names, ["Rounded Rectangle 1", "Right Arrow 2"]);
    }

    #[test]
    fn test_remove_placeholders() {
        let mut slide = slide_with(&format!("{TITLE}{PICTURE}"));
        assert_eq!(slide.remove_placeholders().unwrap(), 1);
        assert_eq!(slide.shape_count(), 1);
        assert_eq!(slide.shape(0).unwrap().shape_type(), ShapeType::Picture);
    }

    #[test]
    fn test_bind_namespaces() {
        let mut slide = slide_with("");
        let mut el = XmlElement::parse_fragment(r#"<p:sp><a:ext><a14:hiddenFill/><x:y/></a:ext></p:sp>"#).unwrap();
        let mut scope = slide.shape_namespaces();
        scope.insert("a14".into(), "urn:a14".into());
        scope.insert("a".into(), "urn:other-drawing".into());

        slide.bind_namespaces(&mut el, &scope);
        assert_eq!(slide.document().prefix_for("urn:a14"), Some("a14".to_string()));
        assert_eq!(el.attr("xmlns:a").as_deref(), Some("urn:other-drawing"));
        assert_eq!(el.attr("xmlns:p"), None);
        // Unknown on both sides: left alone.
        assert_eq!(el.attr("xmlns:x"), None);
    }

    #[test]
    fn test_new_document_has_empty_tree() {
        let doc = Slide::new_document();
        let tree = doc.root().descend(&["cSld", "spTree"]).unwrap();
        assert_eq!(tree.elements().count(), 2);
        assert_eq!(doc.prefix_for(namespace::OFC_RELATIONSHIPS).as_deref(), Some("r"));
    }
}

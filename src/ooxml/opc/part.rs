use crate::common::xml::XmlDocument;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::rel::Relationships;
/// Open Packaging Convention (OPC) objects related to package parts.
///
/// Parts are the units of content in a package: each has a partname, a
/// content type, a blob and its own relationships. XML parts can be parsed
/// into an [`XmlDocument`], edited and stored back.
use std::fmt::Debug;

/// A part in an OPC package.
pub trait Part: Debug {
    /// Get the partname of this part.
    fn partname(&self) -> &PackURI;

    /// Get the content type of this part.
    fn content_type(&self) -> &str;

    /// Get the binary content of this part.
    fn blob(&self) -> &[u8];

    /// Replace the binary content of this part.
    fn set_blob(&mut self, blob: Vec<u8>);

    /// Get the relationships for this part.
    fn rels(&self) -> &Relationships;

    /// Get mutable access to the relationships for this part.
    fn rels_mut(&mut self) -> &mut Relationships;

    /// Whether the blob holds XML.
    fn is_xml(&self) -> bool {
        PartFactory::is_xml_content_type(self.content_type())
    }

    /// Add or get a relationship to another part, returning its rId.
    fn relate_to(&mut self, target: &PackURI, reltype: &str) -> String {
        let target_ref = target.relative_ref(self.partname().base_uri());
        self.rels_mut().get_or_add(reltype, &target_ref)
    }

    /// Add or get an external relationship, returning its rId.
    fn relate_to_ext(&mut self, target_url: &str, reltype: &str) -> String {
        self.rels_mut().get_or_add_ext_rel(reltype, target_url)
    }

    /// Absolute partname targeted by an internal relationship.
    fn target_partname(&self, r_id: &str) -> Result<PackURI> {
        self.rels()
            .get(r_id)
            .ok_or_else(|| {
                OpcError::RelationshipNotFound(format!("{} in {}", r_id, self.partname()))
            })?
            .target_partname()
    }

    /// Parse the blob as an XML document.
    fn xml(&self) -> Result<XmlDocument> {
        Ok(XmlDocument::parse(self.blob())?)
    }

    /// Serialize `doc` into the blob.
    fn set_xml(&mut self, doc: &XmlDocument) {
        self.set_blob(doc.to_bytes());
    }
}

/// A part with opaque binary content (images, media, embedded objects).
#[derive(Debug)]
pub struct BlobPart {
    partname: PackURI,
    content_type: String,
    blob: Vec<u8>,
    rels: Relationships,
}

impl BlobPart {
    pub fn new(partname: PackURI, content_type: String, blob: Vec<u8>) -> Self {
        let rels = Relationships::new(partname.base_uri().to_string());
        Self {
            partname,
            content_type,
            blob,
            rels,
        }
    }
}

impl Part for BlobPart {
    fn partname(&self) -> &PackURI {
        &self.partname
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn blob(&self) -> &[u8] {
        &self.blob
    }

    fn set_blob(&mut self, blob: Vec<u8>) {
        self.blob = blob;
    }

    fn rels(&self) -> &Relationships {
        &self.rels
    }

    fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }
}

/// A part holding UTF-8 XML.
#[derive(Debug)]
pub struct XmlPart {
    partname: PackURI,
    content_type: String,
    xml_bytes: Vec<u8>,
    rels: Relationships,
}

impl XmlPart {
    pub fn new(partname: PackURI, content_type: String, xml_bytes: Vec<u8>) -> Self {
        let rels = Relationships::new(partname.base_uri().to_string());
        Self {
            partname,
            content_type,
            xml_bytes,
            rels,
        }
    }

    /// Create an XML part, checking that the content is UTF-8.
    pub fn load(partname: PackURI, content_type: String, xml_bytes: Vec<u8>) -> Result<Self> {
        std::str::from_utf8(&xml_bytes).map_err(|e| {
            OpcError::XmlError(format!("Invalid UTF-8 in {}: {}", partname, e))
        })?;
        Ok(Self::new(partname, content_type, xml_bytes))
    }

    /// Create an XML part from a document.
    pub fn from_document(partname: PackURI, content_type: &str, doc: &XmlDocument) -> Self {
        Self::new(partname, content_type.to_string(), doc.to_bytes())
    }
}

impl Part for XmlPart {
    fn partname(&self) -> &PackURI {
        &self.partname
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn blob(&self) -> &[u8] {
        &self.xml_bytes
    }

    fn set_blob(&mut self, blob: Vec<u8>) {
        self.xml_bytes = blob;
    }

    fn rels(&self) -> &Relationships {
        &self.rels
    }

    fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }
}

/// Selects the Part implementation for a content type.
pub struct PartFactory;

impl PartFactory {
    /// Create a part from raw data: XML content types become [`XmlPart`]s,
    /// everything else a [`BlobPart`].
    pub fn load(partname: PackURI, content_type: String, blob: Vec<u8>) -> Result<Box<dyn Part>> {
        if Self::is_xml_content_type(&content_type) {
            Ok(Box::new(XmlPart::load(partname, content_type, blob)?))
        } else {
            Ok(Box::new(BlobPart::new(partname, content_type, blob)))
        }
    }

    #[inline]
    pub(crate) fn is_xml_content_type(content_type: &str) -> bool {
        content_type.ends_with("+xml") || content_type.ends_with("/xml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};

    #[test]
    fn test_factory_dispatch() {
        let png = PartFactory::load(
            PackURI::new("/ppt/media/image1.png").unwrap(),
            ct::PNG.to_string(),
            vec![0x89, 0x50, 0x4E, 0x47],
        )
        .unwrap();
        assert!(!png.is_xml());
        assert_eq!(png.blob(), &[0x89, 0x50, 0x4E, 0x47]);

        let slide = PartFactory::load(
            PackURI::new("/ppt/slides/slide1.xml").unwrap(),
            ct::PML_SLIDE.to_string(),
            b"<p:sld/>".to_vec(),
        )
        .unwrap();
        assert!(slide.is_xml());
        assert_eq!(slide.xml().unwrap().root().name(), "p:sld");
    }

    #[test]
    fn test_invalid_utf8_xml_rejected() {
        let result = PartFactory::load(
            PackURI::new("/ppt/slides/slide1.xml").unwrap(),
            ct::PML_SLIDE.to_string(),
            vec![0xFF, 0xFE],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_relate_to_uses_relative_ref() {
        let mut slide = XmlPart::new(
            PackURI::new("/ppt/slides/slide1.xml").unwrap(),
            ct::PML_SLIDE.to_string(),
            b"<p:sld/>".to_vec(),
        );
        let layout = PackURI::new("/ppt/slideLayouts/slideLayout7.xml").unwrap();
        let r_id = slide.relate_to(&layout, rt::SLIDE_LAYOUT);
        assert_eq!(slide.rels().get(&r_id).unwrap().target_ref(), "../slideLayouts/slideLayout7.xml");
        assert_eq!(slide.target_partname(&r_id).unwrap(), layout);
        assert!(slide.target_partname("rId99").is_err());
    }
}

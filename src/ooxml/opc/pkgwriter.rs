//! Serializes an OPC package to a ZIP archive.
//!
//! Only parts reachable from the package relationships are written, so parts
//! orphaned by editing (removed slides, their notes) drop out of the output.

use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::content_type as ct;
use crate::ooxml::opc::error::Result;
use crate::ooxml::opc::package::OpcPackage;
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PackURI};
use crate::ooxml::opc::part::Part;
use crate::ooxml::opc::phys_pkg::PhysPkgWriter;
use std::collections::BTreeMap;
use std::path::Path;

/// Package writer: `[Content_Types].xml`, `_rels/.rels`, then every
/// reachable part with its relationships.
pub struct PackageWriter;

impl PackageWriter {
    /// Write a package to a file.
    pub fn write<P: AsRef<Path>>(path: P, package: &OpcPackage) -> Result<()> {
        let bytes = Self::to_bytes(package)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Serialize a package to bytes.
    pub fn to_bytes(package: &OpcPackage) -> Result<Vec<u8>> {
        let parts = package.iter_reachable_parts();
        let mut phys_writer = PhysPkgWriter::new();

        let cti = ContentTypesItem::from_parts(&parts);
        phys_writer.write(&PackURI::new(CONTENT_TYPES_URI)?, cti.to_xml().as_bytes())?;

        phys_writer.write(&PackURI::package().rels_uri()?, package.rels().to_xml().as_bytes())?;

        for part in &parts {
            phys_writer.write(part.partname(), part.blob())?;
            if !part.rels().is_empty() {
                let rels_uri = part.partname().rels_uri()?;
                phys_writer.write(&rels_uri, part.rels().to_xml().as_bytes())?;
            }
        }

        log::debug!("wrote package with {} parts", parts.len());
        phys_writer.finish()
    }
}

/// Builder for `[Content_Types].xml`.
struct ContentTypesItem {
    /// Default content types by extension
    defaults: BTreeMap<String, String>,

    /// Override content types by partname
    overrides: BTreeMap<String, String>,
}

impl ContentTypesItem {
    fn new() -> Self {
        let mut defaults = BTreeMap::new();
        defaults.insert("rels".to_string(), ct::OPC_RELATIONSHIPS.to_string());
        defaults.insert("xml".to_string(), ct::XML.to_string());

        Self {
            defaults,
            overrides: BTreeMap::new(),
        }
    }

    fn from_parts(parts: &[&dyn Part]) -> Self {
        let mut cti = Self::new();
        for part in parts {
            cti.add_content_type(part.partname(), part.content_type());
        }
        cti
    }

    /// Media with a well-known extension gets a Default entry, everything
    /// else an Override for its partname.
    fn add_content_type(&mut self, partname: &PackURI, content_type: &str) {
        let ext = partname.ext().to_lowercase();
        if Self::is_default_content_type(&ext, content_type) {
            self.defaults.insert(ext, content_type.to_string());
        } else {
            self.overrides
                .insert(partname.to_string(), content_type.to_string());
        }
    }

    fn is_default_content_type(ext: &str, content_type: &str) -> bool {
        matches!(
            (ext, content_type),
            ("rels", ct::OPC_RELATIONSHIPS)
                | ("xml", ct::XML)
                | ("png", ct::PNG)
                | ("jpg", ct::JPEG)
                | ("jpeg", ct::JPEG)
                | ("gif", ct::GIF)
                | ("bmp", ct::BMP)
                | ("tif", ct::TIFF)
                | ("tiff", ct::TIFF)
                | ("svg", ct::SVG)
                | ("emf", ct::X_EMF)
                | ("wmf", ct::X_WMF)
        )
    }

    fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );

        for (ext, content_type) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape_xml(ext),
                escape_xml(content_type)
            ));
        }
        for (partname, content_type) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape_xml(partname),
                escape_xml(content_type)
            ));
        }

        xml.push_str("</Types>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_types_xml() {
        let mut cti = ContentTypesItem::new();
        cti.add_content_type(&PackURI::new("/ppt/media/image1.PNG").unwrap(), ct::PNG);
        cti.add_content_type(&PackURI::new("/ppt/slides/slide1.xml").unwrap(), ct::PML_SLIDE);
        cti.add_content_type(&PackURI::new("/ppt/media/media1.mp4").unwrap(), "video/mp4");

        let xml = cti.to_xml();

        assert!(xml.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
        assert!(xml.contains(r#"<Override PartName="/ppt/slides/slide1.xml""#));
        assert!(xml.contains(r#"<Override PartName="/ppt/media/media1.mp4" ContentType="video/mp4"/>"#));
        assert!(!xml.contains(r#"Extension="xml" ContentType="application/vnd"#));
    }
}

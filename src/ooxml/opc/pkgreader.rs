//! Read-side view of a serialized OPC package.
//!
//! Parses `[Content_Types].xml`, then walks the relationship graph from the
//! package relationships so that only reachable parts are loaded.

use crate::ooxml::opc::constants::target_mode;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PackURI};
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use quick_xml::Reader;
use quick_xml::events::Event;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// A part as loaded from the archive, before it becomes a Part object.
#[derive(Debug)]
pub struct SerializedPart {
    pub partname: PackURI,
    pub content_type: String,
    pub blob: Vec<u8>,
    /// Relationships from this part; most parts have only a handful
    pub srels: SmallVec<[SerializedRelationship; 8]>,
}

/// A relationship as read from a `.rels` part.
#[derive(Debug, Clone)]
pub struct SerializedRelationship {
    /// Base URI for resolving relative references
    pub base_uri: String,
    pub r_id: String,
    pub reltype: String,
    /// Target reference (relative URI or external URL)
    pub target_ref: String,
    /// Target mode (Internal or External)
    pub target_mode: String,
}

impl SerializedRelationship {
    #[inline]
    pub fn is_external(&self) -> bool {
        self.target_mode == target_mode::EXTERNAL
    }

    /// Absolute partname of an internal target.
    pub fn target_partname(&self) -> Result<PackURI> {
        if self.is_external() {
            return Err(OpcError::InvalidRelationship(format!(
                "{} is external and has no target partname",
                self.r_id
            )));
        }
        PackURI::from_rel_ref(&self.base_uri, &self.target_ref)
    }
}

/// Content types from `[Content_Types].xml`: overrides by partname, with
/// defaults by extension as the fallback.
struct ContentTypeMap {
    defaults: HashMap<String, String>,
    overrides: HashMap<String, String>,
}

impl ContentTypeMap {
    fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut map = Self {
            defaults: HashMap::new(),
            overrides: HashMap::new(),
        };
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => {
                    let is_default = match e.local_name().as_ref() {
                        b"Default" => true,
                        b"Override" => false,
                        _ => continue,
                    };

                    let mut key = None;
                    let mut content_type = None;
                    for attr in e.attributes() {
                        let attr = attr?;
                        match attr.key.as_ref() {
                            b"Extension" | b"PartName" => {
                                key = Some(attr.unescape_value()?.into_owned())
                            },
                            b"ContentType" => {
                                content_type = Some(attr.unescape_value()?.into_owned())
                            },
                            _ => {},
                        }
                    }

                    if let (Some(key), Some(ct)) = (key, content_type) {
                        if is_default {
                            map.defaults.insert(key.to_lowercase(), ct);
                        } else {
                            map.overrides.insert(key.to_lowercase(), ct);
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OpcError::XmlError(format!("Content types parse error: {}", e)));
                },
                _ => {},
            }
        }

        Ok(map)
    }

    /// Partnames compare case-insensitively, as OPC requires.
    fn get(&self, pack_uri: &PackURI) -> Result<String> {
        if let Some(ct) = self.overrides.get(&pack_uri.as_str().to_lowercase()) {
            return Ok(ct.clone());
        }
        if let Some(ct) = self.defaults.get(&pack_uri.ext().to_lowercase()) {
            return Ok(ct.clone());
        }
        Err(OpcError::ContentTypeNotFound(pack_uri.to_string()))
    }
}

/// Serialized package: package relationships plus every reachable part.
pub struct PackageReader {
    pkg_srels: SmallVec<[SerializedRelationship; 8]>,
    sparts: Vec<SerializedPart>,
}

impl PackageReader {
    pub fn from_phys_reader(mut phys_reader: PhysPkgReader) -> Result<Self> {
        let content_types_uri = PackURI::new(CONTENT_TYPES_URI)?;
        let content_types = ContentTypeMap::from_xml(phys_reader.blob_for(&content_types_uri)?)?;

        let pkg_srels = Self::load_rels(&phys_reader, &PackURI::package())?;
        let sparts = Self::load_parts(&mut phys_reader, &pkg_srels, &content_types)?;

        Ok(Self { pkg_srels, sparts })
    }

    fn load_rels(
        phys_reader: &PhysPkgReader,
        source_uri: &PackURI,
    ) -> Result<SmallVec<[SerializedRelationship; 8]>> {
        match phys_reader.rels_xml_for(source_uri)? {
            Some(xml) => Self::parse_rels_xml(xml, source_uri.base_uri()),
            None => Ok(SmallVec::new()),
        }
    }

    fn parse_rels_xml(
        rels_xml: &[u8],
        base_uri: &str,
    ) -> Result<SmallVec<[SerializedRelationship; 8]>> {
        let mut srels = SmallVec::new();
        let mut reader = Reader::from_reader(rels_xml);
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => {
                    if e.local_name().as_ref() != b"Relationship" {
                        continue;
                    }
                    let mut r_id = None;
                    let mut reltype = None;
                    let mut target_ref = None;
                    let mut mode = target_mode::INTERNAL.to_string();

                    for attr in e.attributes() {
                        let attr = attr?;
                        match attr.key.as_ref() {
                            b"Id" => r_id = Some(attr.unescape_value()?.into_owned()),
                            b"Type" => reltype = Some(attr.unescape_value()?.into_owned()),
                            b"Target" => target_ref = Some(attr.unescape_value()?.into_owned()),
                            b"TargetMode" => mode = attr.unescape_value()?.into_owned(),
                            _ => {},
                        }
                    }

                    if let (Some(r_id), Some(reltype), Some(target_ref)) = (r_id, reltype, target_ref)
                    {
                        srels.push(SerializedRelationship {
                            base_uri: base_uri.to_string(),
                            r_id,
                            reltype,
                            target_ref,
                            target_mode: mode,
                        });
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OpcError::XmlError(format!("Rels parse error: {}", e))),
                _ => {},
            }
        }

        Ok(srels)
    }

    /// Depth-first walk of the relationship graph.
    ///
    /// Targets missing from the archive are skipped with a warning; their
    /// relationships are kept so they survive a save unchanged.
    fn load_parts(
        phys_reader: &mut PhysPkgReader,
        pkg_srels: &[SerializedRelationship],
        content_types: &ContentTypeMap,
    ) -> Result<Vec<SerializedPart>> {
        let mut sparts = Vec::with_capacity(phys_reader.len());
        let mut visited: HashSet<PackURI> = HashSet::new();
        let mut work_queue: Vec<PackURI> = Vec::new();

        let mut enqueue = |srels: &[SerializedRelationship], queue: &mut Vec<PackURI>| {
            for srel in srels.iter().rev() {
                if srel.is_external() {
                    continue;
                }
                if let Ok(partname) = srel.target_partname() {
                    if visited.insert(partname.clone()) {
                        queue.push(partname);
                    }
                }
            }
        };
        enqueue(pkg_srels, &mut work_queue);

        while let Some(partname) = work_queue.pop() {
            let Some(blob) = phys_reader.take(partname.membername()) else {
                log::warn!("relationship target {} is missing from the archive", partname);
                continue;
            };
            let srels = Self::load_rels(phys_reader, &partname)?;
            enqueue(srels.as_slice(), &mut work_queue);

            let content_type = content_types.get(&partname)?;
            sparts.push(SerializedPart {
                partname,
                content_type,
                blob,
                srels,
            });
        }

        Ok(sparts)
    }

    #[inline]
    pub fn pkg_srels(&self) -> &[SerializedRelationship] {
        &self.pkg_srels
    }

    /// Take ownership of all serialized parts.
    pub fn take_sparts(&mut self) -> Vec<SerializedPart> {
        std::mem::take(&mut self.sparts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_map() {
        let xml = br#"<?xml version="1.0"?>
            <Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
                <Default Extension="xml" ContentType="application/xml"/>
                <Default Extension="PNG" ContentType="image/png"/>
                <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
            </Types>"#;

        let ct_map = ContentTypeMap::from_xml(xml).unwrap();

        let uri = PackURI::new("/docProps/app.xml").unwrap();
        assert_eq!(ct_map.get(&uri).unwrap(), "application/xml");

        let uri = PackURI::new("/ppt/media/image1.png").unwrap();
        assert_eq!(ct_map.get(&uri).unwrap(), "image/png");

        let uri = PackURI::new("/ppt/presentation.xml").unwrap();
        assert!(ct_map.get(&uri).unwrap().ends_with("presentation.main+xml"));

        let uri = PackURI::new("/ppt/media/video.mp4").unwrap();
        assert!(ct_map.get(&uri).is_err());
    }

    #[test]
    fn test_parse_rels_xml() {
        let xml = br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
            <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout2.xml"/>
            <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/>
        </Relationships>"#;

        let srels = PackageReader::parse_rels_xml(xml, "/ppt/slides").unwrap();
        assert_eq!(srels.len(), 2);
        assert_eq!(
            srels[0].target_partname().unwrap().as_str(),
            "/ppt/slideLayouts/slideLayout2.xml"
        );
        assert!(srels[1].is_external());
        assert!(srels[1].target_partname().is_err());
    }
}

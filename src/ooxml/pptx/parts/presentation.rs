/// Presentation part - the main part in a .pptx package.
///
/// Corresponds to `/ppt/presentation.xml` in the package. Reads stream over
/// the part's XML; edits of the slide list work on a parsed [`XmlDocument`].
use crate::common::xml::{XmlDocument, XmlElement};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::opc::part::Part;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Smallest id PowerPoint assigns to a slide in `p:sldIdLst`.
pub const MIN_SLIDE_ID: u32 = 256;
/// Largest valid `p:sldId/@id`.
pub const MAX_SLIDE_ID: u32 = 2_147_483_647;

/// Elements that follow `p:sldIdLst` in `p:presentation`.
const SLD_ID_LST_SUCCESSORS: &[&str] = &[
    "notesMasterIdLst",
    "handoutMasterIdLst",
    "sldSz",
    "notesSz",
    "smartTags",
    "embeddedFontLst",
    "custShowLst",
    "photoAlbum",
    "custDataLst",
    "kinsoku",
    "defaultTextStyle",
    "modifyVerifier",
    "extLst",
];

/// An entry of `p:sldIdLst`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideId {
    pub id: u32,
    pub r_id: String,
}

/// The main presentation part.
///
/// # Example
///
/// ```rust,ignore
/// let pres_part = PresentationPart::from_part(opc_part);
/// for slide_id in pres_part.slide_ids()? {
///     println!("{} -> {}", slide_id.id, slide_id.r_id);
/// }
/// ```
pub struct PresentationPart<'a> {
    /// The underlying OPC part
    part: &'a dyn Part,
}

impl<'a> PresentationPart<'a> {
    pub fn from_part(part: &'a dyn Part) -> Self {
        Self { part }
    }

    #[inline]
    fn xml_bytes(&self) -> &[u8] {
        self.part.blob()
    }

    /// Slide width and height in EMUs, from `p:sldSz`.
    pub fn slide_size(&self) -> Result<Option<(i64, i64)>> {
        let mut reader = Reader::from_reader(self.xml_bytes());
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    if e.local_name().as_ref() == b"sldSz" {
                        let cx = attr_i64(&e, b"cx")?;
                        let cy = attr_i64(&e, b"cy")?;
                        return Ok(cx.zip(cy));
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
        }

        Ok(None)
    }

    /// Slide list entries in presentation order.
    pub fn slide_ids(&self) -> Result<Vec<SlideId>> {
        self.id_list_entries(b"sldId")
            .map(|entries| {
                entries
                    .into_iter()
                    .map(|(id, r_id)| SlideId { id: id.unwrap_or(0), r_id })
                    .collect()
            })
    }

    /// Relationship ids of the slide masters, in `p:sldMasterIdLst` order.
    pub fn slide_master_rids(&self) -> Result<Vec<String>> {
        self.id_list_entries(b"sldMasterId")
            .map(|entries| entries.into_iter().map(|(_, r_id)| r_id).collect())
    }

    /// `(id, r:id)` of every element named `local`.
    fn id_list_entries(&self, local: &[u8]) -> Result<Vec<(Option<u32>, String)>> {
        let mut reader = Reader::from_reader(self.xml_bytes());
        reader.config_mut().trim_text(true);

        let mut entries = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    if e.local_name().as_ref() != local {
                        continue;
                    }
                    let mut id = None;
                    let mut r_id = None;
                    for attr in e.attributes() {
                        let attr = attr.map_err(|e| OoxmlError::Xml(e.to_string()))?;
                        if attr.key.local_name().as_ref() != b"id" {
                            continue;
                        }
                        let value = attr
                            .unescape_value()
                            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                        // The relationship id is the namespaced `r:id`.
                        if attr.key.prefix().is_some() {
                            r_id = Some(value.into_owned());
                        } else {
                            id = atoi_simd::parse::<u32>(value.as_bytes()).ok();
                        }
                    }
                    if let Some(r_id) = r_id {
                        entries.push((id, r_id));
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
        }

        Ok(entries)
    }
}

fn attr_i64(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<i64>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| OoxmlError::Xml(e.to_string()))?;
        if attr.key.as_ref() == key {
            let value = std::str::from_utf8(&attr.value).map_err(|e| OoxmlError::Xml(e.to_string()))?;
            return value
                .parse::<i64>()
                .map(Some)
                .map_err(|e| OoxmlError::Xml(format!("Invalid slide size: {}", e)));
        }
    }
    Ok(None)
}

/// Prefix bound to the officeDocument relationships namespace, declaring
/// `xmlns:r` on the root when the document does not bind it yet.
fn relationships_prefix(doc: &mut XmlDocument) -> String {
    match doc.prefix_for(namespace::OFC_RELATIONSHIPS) {
        Some(prefix) => prefix,
        None => {
            doc.root_mut()
                .set_attr("xmlns:r", namespace::OFC_RELATIONSHIPS);
            "r".to_string()
        },
    }
}

/// Append a `p:sldId` referencing `r_id` and return its new id.
///
/// The id is one more than the largest id in use, and at least 256. Once
/// that would pass [`MAX_SLIDE_ID`], the lowest unused id is taken instead.
pub fn append_slide_id(doc: &mut XmlDocument, r_id: &str) -> u32 {
    let prefix = relationships_prefix(doc);
    let list = doc
        .root_mut()
        .get_or_insert("p:sldIdLst", SLD_ID_LST_SUCCESSORS);

    let mut used: Vec<u32> = list
        .children_named("sldId")
        .filter_map(|el| el.attr("id"))
        .filter_map(|id| atoi_simd::parse::<u32>(id.as_bytes()).ok())
        .collect();
    used.sort_unstable();
    let next_id = match used.last() {
        None => MIN_SLIDE_ID,
        Some(&max) if max < MAX_SLIDE_ID => (max + 1).max(MIN_SLIDE_ID),
        Some(_) => lowest_free_slide_id(&used),
    };

    list.push(
        XmlElement::new("p:sldId")
            .with_attr("id", &next_id.to_string())
            .with_attr(&format!("{}:id", prefix), r_id),
    );
    next_id
}

/// Lowest id from [`MIN_SLIDE_ID`] up that is not in the sorted `used`.
fn lowest_free_slide_id(used: &[u32]) -> u32 {
    let mut candidate = MIN_SLIDE_ID;
    for &id in used.iter().filter(|&&id| id >= MIN_SLIDE_ID) {
        if id > candidate {
            break;
        }
        if id == candidate {
            candidate += 1;
        }
    }
    candidate
}

/// Remove the `index`-th `p:sldId`, returning its entry.
///
/// The slide id is also dropped from every section of the `p14:sectionLst`
/// extension, so no section keeps a dangling reference.
pub fn remove_slide_id(doc: &mut XmlDocument, index: usize) -> Result<SlideId> {
    let r_attr = format!("{}:id", relationships_prefix(doc));
    let list = doc
        .root_mut()
        .child_mut("sldIdLst")
        .ok_or_else(|| OoxmlError::InvalidFormat("presentation has no slide list".to_string()))?;

    let count = list.children_named("sldId").count();
    let entry = list
        .children_named("sldId")
        .nth(index)
        .map(|el| SlideId {
            id: el
                .attr("id")
                .and_then(|id| atoi_simd::parse::<u32>(id.as_bytes()).ok())
                .unwrap_or(0),
            r_id: el.attr(&r_attr).unwrap_or_default(),
        })
        .ok_or(OoxmlError::SlideIndexOutOfRange { index, count })?;

    let mut position = 0usize;
    list.remove_elements(|el| {
        if !el.is("sldId") {
            return false;
        }
        let remove = position == index;
        position += 1;
        remove
    });

    let id = entry.id.to_string();
    doc.root_mut().walk_mut(&mut |el| {
        if el.is("section") {
            if let Some(ids) = el.child_mut("sldIdLst") {
                ids.remove_elements(|sld| sld.is("sldId") && sld.attr("id").as_deref() == Some(id.as_str()));
            }
        }
    });

    Ok(entry)
}

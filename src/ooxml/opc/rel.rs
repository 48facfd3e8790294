use crate::common::xml::escape_xml;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
/// Relationship-related objects for OPC packages.
///
/// A part's relationships map rIds (`rId1`, `rId2`, ...) to targets: other
/// parts inside the package or external URLs. Slide XML refers to images,
/// charts, layouts and hyperlinks only through these rIds.
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// A single relationship from a source part to a target.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Target reference: a part URI relative to `base_uri`, or an external URL
    target_ref: String,

    /// Base URI for resolving relative references
    base_uri: String,

    /// Whether this is an external relationship
    is_external: bool,
}

impl Relationship {
    pub fn new(
        r_id: String,
        reltype: String,
        target_ref: String,
        base_uri: String,
        is_external: bool,
    ) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
            base_uri,
            is_external,
        }
    }

    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Target reference as stored in the `.rels` part.
    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }

    /// Absolute target partname of an internal relationship.
    pub fn target_partname(&self) -> Result<PackURI> {
        if self.is_external {
            return Err(OpcError::InvalidRelationship(format!(
                "{} is external and has no target partname",
                self.r_id
            )));
        }
        PackURI::from_rel_ref(&self.base_uri, &self.target_ref)
    }
}

/// Collection of relationships from a single source part (or the package).
#[derive(Debug, Clone)]
pub struct Relationships {
    /// Base URI for resolving relative references
    base_uri: String,

    /// Map of relationship ID to Relationship
    rels: HashMap<String, Relationship>,
}

impl Relationships {
    /// Create an empty collection whose relative targets resolve against `base_uri`.
    pub fn new(base_uri: String) -> Self {
        Self {
            base_uri,
            rels: HashMap::new(),
        }
    }

    /// Add a relationship with a known rId, replacing any existing one.
    pub fn add_relationship(
        &mut self,
        reltype: String,
        target_ref: String,
        r_id: String,
        is_external: bool,
    ) -> &Relationship {
        let rel = Relationship::new(
            r_id.clone(),
            reltype,
            target_ref,
            self.base_uri.clone(),
            is_external,
        );
        match self.rels.entry(r_id) {
            Entry::Occupied(mut entry) => {
                entry.insert(rel);
                entry.into_mut()
            },
            Entry::Vacant(entry) => entry.insert(rel),
        }
    }

    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.get(r_id)
    }

    /// Get the rId of an internal relationship of type `reltype` to
    /// `target_ref`, adding one with the next free rId when none exists.
    pub fn get_or_add(&mut self, reltype: &str, target_ref: &str) -> String {
        if let Some(rel) = self.rels.values().find(|rel| {
            !rel.is_external() && rel.reltype() == reltype && rel.target_ref() == target_ref
        }) {
            return rel.r_id().to_string();
        }

        let r_id = self.next_r_id();
        self.add_relationship(reltype.to_string(), target_ref.to_string(), r_id.clone(), false);
        r_id
    }

    /// External counterpart of [`get_or_add`](Self::get_or_add).
    pub fn get_or_add_ext_rel(&mut self, reltype: &str, target_ref: &str) -> String {
        if let Some(rel) = self.rels.values().find(|rel| {
            rel.is_external() && rel.reltype() == reltype && rel.target_ref() == target_ref
        }) {
            return rel.r_id().to_string();
        }

        let r_id = self.next_r_id();
        self.add_relationship(reltype.to_string(), target_ref.to_string(), r_id.clone(), true);
        r_id
    }

    /// Next available relationship ID, filling gaps in the `rIdN` sequence.
    fn next_r_id(&self) -> String {
        let mut used: Vec<u32> = self
            .rels
            .keys()
            .filter_map(|r_id| {
                r_id.strip_prefix("rId")
                    .and_then(|n| atoi_simd::parse::<u32>(n.as_bytes()).ok())
            })
            .collect();
        used.sort_unstable();

        let mut next = 1u32;
        for &num in &used {
            match num.cmp(&next) {
                std::cmp::Ordering::Equal => next += 1,
                std::cmp::Ordering::Greater => break,
                std::cmp::Ordering::Less => {},
            }
        }

        format!("rId{}", next)
    }

    /// The single relationship of a given type.
    ///
    /// Returns an error if there is none, or more than one.
    pub fn part_with_reltype(&self, reltype: &str) -> Result<&Relationship> {
        let mut matching = self.rels.values().filter(|rel| rel.reltype() == reltype);
        match (matching.next(), matching.next()) {
            (Some(rel), None) => Ok(rel),
            (None, _) => Err(OpcError::RelationshipNotFound(format!(
                "No relationship of type '{}'",
                reltype
            ))),
            (Some(_), Some(_)) => Err(OpcError::InvalidRelationship(format!(
                "Multiple relationships of type '{}'",
                reltype
            ))),
        }
    }

    /// Relationships sorted by rId number, for stable traversal and output.
    pub fn sorted(&self) -> Vec<&Relationship> {
        let mut rels: Vec<&Relationship> = self.rels.values().collect();
        rels.sort_by(|a, b| rid_key(a.r_id()).cmp(&rid_key(b.r_id())));
        rels
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    pub fn remove(&mut self, r_id: &str) -> Option<Relationship> {
        self.rels.remove(r_id)
    }

    /// Serialize to the XML of a `.rels` part.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.rels.len() * 160);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for rel in self.sorted() {
            let target_mode = if rel.is_external() {
                r#" TargetMode="External""#
            } else {
                ""
            };

            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"{}/>"#,
                escape_xml(rel.r_id()),
                escape_xml(rel.reltype()),
                escape_xml(rel.target_ref()),
                target_mode
            ));
        }

        xml.push_str("</Relationships>");
        xml
    }
}

/// Sort key ordering `rId2` before `rId10`; non-numeric ids sort last by name.
fn rid_key(r_id: &str) -> (u32, &str) {
    let num = r_id
        .strip_prefix("rId")
        .and_then(|n| atoi_simd::parse::<u32>(n.as_bytes()).ok())
        .unwrap_or(u32::MAX);
    (num, r_id)
}

impl Default for Relationships {
    fn default() -> Self {
        Self::new("/".to_string())
    }
}

//! Relationship-aware shape copying.
//!
//! Shape XML refers to images, charts, diagrams and hyperlinks through rIds
//! of the containing slide (`r:embed`, `r:link`, `r:id`, `r:pict`, `r:dm`,
//! `r:lo`, `r:qs`, `r:cs`, ...). Copying a shape to another slide rewrites
//! every such reference to an rId of the destination slide:
//!
//! - within one package the destination relates to the same target part;
//! - across packages the target part is imported under a fresh partname,
//!   together with its own non-structural relationships;
//! - external targets are re-added as external relationships;
//! - references to deck-structure parts (slides, layouts, masters, notes,
//!   themes) cannot be carried over and are blanked.

use crate::common::xml::XmlElement;
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::opc::constants::relationship_type::is_structural;
use crate::ooxml::opc::package::OpcPackage;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::PartFactory;
use crate::ooxml::opc::rel::Relationships;
use crate::ooxml::pptx::slide::Slide;
use std::collections::HashMap;

/// Parts already imported from a source package, by source partname.
///
/// Reusing one importer across all slides of a merge copies media shared
/// between slides only once.
#[derive(Debug, Default)]
pub struct PartImporter {
    imported: HashMap<PackURI, PackURI>,
}

impl PartImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of parts imported so far.
    pub fn len(&self) -> usize {
        self.imported.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imported.is_empty()
    }

    /// Import `partname` from `source` into `dest`, returning the new
    /// partname, or `None` when the source part does not exist.
    fn import(
        &mut self,
        dest: &mut OpcPackage,
        source: &OpcPackage,
        partname: &PackURI,
    ) -> Result<Option<PackURI>> {
        if let Some(done) = self.imported.get(partname) {
            return Ok(Some(done.clone()));
        }
        let Ok(src_part) = source.part(partname) else {
            log::warn!("relationship target {} is missing from the source deck", partname);
            return Ok(None);
        };

        let new_partname = dest.next_partname(&partname_template(partname))?;
        dest.add_part(PartFactory::load(
            new_partname.clone(),
            src_part.content_type().to_string(),
            src_part.blob().to_vec(),
        )?);
        self.imported.insert(partname.clone(), new_partname.clone());
        log::debug!("imported {} as {}", partname, new_partname);

        // rIds are kept so the part's own XML stays valid.
        let mut rels = Relationships::new(new_partname.base_uri().to_string());
        for rel in src_part.rels().sorted() {
            if rel.is_external() {
                rels.add_relationship(
                    rel.reltype().to_string(),
                    rel.target_ref().to_string(),
                    rel.r_id().to_string(),
                    true,
                );
                continue;
            }
            if is_structural(rel.reltype()) {
                log::warn!("not importing {} of {}: structural target", rel.r_id(), partname);
                continue;
            }
            let Ok(target) = rel.target_partname() else {
                continue;
            };
            if let Some(new_target) = self.import(dest, source, &target)? {
                rels.add_relationship(
                    rel.reltype().to_string(),
                    new_target.relative_ref(new_partname.base_uri()),
                    rel.r_id().to_string(),
                    false,
                );
            }
        }
        *dest.part_mut(&new_partname)?.rels_mut() = rels;

        Ok(Some(new_partname))
    }
}

/// Template for a fresh partname next to `partname`:
/// `/ppt/media/image3.png` becomes `/ppt/media/image%d.png`.
fn partname_template(partname: &PackURI) -> String {
    let ext = partname.ext();
    let filename = partname.filename();
    let stem = if ext.is_empty() {
        filename
    } else {
        &filename[..filename.len() - ext.len() - 1]
    };
    let stem = stem.trim_end_matches(|c: char| c.is_ascii_digit());
    let dir = match partname.base_uri() {
        "/" => "",
        base => base,
    };

    if ext.is_empty() {
        format!("{}/{}%d", dir, stem)
    } else {
        format!("{}/{}%d.{}", dir, stem, ext)
    }
}

/// Deep-copy every shape of `source` into `dest`, after its existing shapes.
///
/// `source_pkg` is the package `source` belongs to, or `None` when it is
/// `dest_pkg` itself. Returns the number of shapes copied.
pub(crate) fn copy_shapes(
    dest_pkg: &mut OpcPackage,
    dest: &mut Slide,
    source_pkg: Option<&OpcPackage>,
    source: &Slide,
    importer: &mut PartImporter,
) -> Result<usize> {
    let source_rels = source_pkg
        .unwrap_or(&*dest_pkg)
        .part(source.partname())?
        .rels()
        .clone();
    let src_prefix = format!("{}:", source.relationships_prefix());
    let dst_name = dest.relationships_prefix();
    let dst_prefix = format!("{}:", dst_name);

    // Rewritten references use the destination prefix for relationships.
    let mut scope = source.shape_namespaces();
    scope.insert(dst_name, namespace::OFC_RELATIONSHIPS.to_string());

    let mut elements: Vec<XmlElement> = source
        .shapes()
        .iter()
        .map(|shape| shape.element().clone())
        .collect();

    let mut r_ids: Vec<String> = Vec::new();
    for el in &elements {
        el.walk(&mut |e| {
            for (key, value) in e.attributes() {
                if key.starts_with(&src_prefix) && !r_ids.contains(&value) {
                    r_ids.push(value);
                }
            }
        });
    }

    let mut mapping: HashMap<String, String> = HashMap::with_capacity(r_ids.len());
    for r_id in r_ids {
        let new_r_id = map_relationship(dest_pkg, dest, source_pkg, &source_rels, &r_id, importer)?;
        mapping.insert(r_id, new_r_id);
    }

    for el in &mut elements {
        el.walk_mut(&mut |e| {
            let keys: Vec<String> = e
                .attributes()
                .filter(|(key, _)| key.starts_with(&src_prefix))
                .map(|(key, _)| key.to_string())
                .collect();
            for key in keys {
                let Some(old) = e.attr(&key) else {
                    continue;
                };
                let new = mapping.get(&old).map(String::as_str).unwrap_or("");
                e.remove_attr(&key);
                let new_key = format!("{}{}", dst_prefix, &key[src_prefix.len()..]);
                e.set_attr(&new_key, new);
            }
        });
    }

    let count = elements.len();
    for mut el in elements {
        dest.bind_namespaces(&mut el, &scope);
        dest.insert_shape(el)?;
    }
    Ok(count)
}

/// rId of the destination slide standing in for `r_id` of the source slide.
/// Empty when the reference cannot be carried over.
fn map_relationship(
    dest_pkg: &mut OpcPackage,
    dest: &Slide,
    source_pkg: Option<&OpcPackage>,
    source_rels: &Relationships,
    r_id: &str,
    importer: &mut PartImporter,
) -> Result<String> {
    let Some(rel) = source_rels.get(r_id) else {
        log::warn!("dropping reference to unknown relationship {}", r_id);
        return Ok(String::new());
    };

    if rel.is_external() {
        let dest_part = dest_pkg.part_mut(dest.partname())?;
        return Ok(dest_part.relate_to_ext(rel.target_ref(), rel.reltype()));
    }
    if is_structural(rel.reltype()) {
        log::warn!("dropping reference {} to a structural part ({})", r_id, rel.target_ref());
        return Ok(String::new());
    }

    let target = rel.target_partname()?;
    let dest_target = match source_pkg {
        None => {
            if !dest_pkg.contains_part(&target) {
                log::warn!("dropping reference {} to missing part {}", r_id, target);
                return Ok(String::new());
            }
            target
        },
        Some(source_pkg) => match importer.import(dest_pkg, source_pkg, &target)? {
            Some(imported) => imported,
            None => return Ok(String::new()),
        },
    };

    let dest_part = dest_pkg.part_mut(dest.partname())?;
    Ok(dest_part.relate_to(&dest_target, rel.reltype()))
}

/// The in-memory OPC package: parts indexed by partname plus the package
/// relationships.
///
/// Parts can be added, edited in place and replaced; the package is saved by
/// walking the relationship graph, so a part no longer related from anywhere
/// is simply not written.
use crate::ooxml::opc::constants::relationship_type;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{PACKAGE_URI, PackURI};
use crate::ooxml::opc::part::{Part, PartFactory};
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use crate::ooxml::opc::pkgreader::PackageReader;
use crate::ooxml::opc::pkgwriter::PackageWriter;
use crate::ooxml::opc::rel::Relationships;
use std::collections::{HashMap, HashSet};
use std::io::{Read, Seek};
use std::path::Path;

pub struct OpcPackage {
    /// Package-level relationships
    rels: Relationships,

    /// All parts in the package, indexed by partname
    parts: HashMap<PackURI, Box<dyn Part>>,
}

impl OpcPackage {
    /// Create a new empty OPC package.
    pub fn new() -> Self {
        Self {
            rels: Relationships::new(PACKAGE_URI.to_string()),
            parts: HashMap::new(),
        }
    }

    /// Open a package file (.pptx).
    ///
    /// # Example
    /// ```no_run
    /// use slidewright::ooxml::opc::OpcPackage;
    ///
    /// let pkg = OpcPackage::open("deck.pptx")?;
    /// println!("{} parts", pkg.part_count());
    /// # Ok::<(), slidewright::ooxml::opc::error::OpcError>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::unmarshal(PackageReader::from_phys_reader(PhysPkgReader::open(path)?)?)
    }

    /// Load a package from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::unmarshal(PackageReader::from_phys_reader(PhysPkgReader::from_reader(reader)?)?)
    }

    /// Load a package from in-memory bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::unmarshal(PackageReader::from_phys_reader(PhysPkgReader::from_bytes(data)?)?)
    }

    /// Convert serialized parts and relationships into the object graph.
    fn unmarshal(mut pkg_reader: PackageReader) -> Result<Self> {
        let mut package = Self::new();

        for srel in pkg_reader.pkg_srels() {
            package.rels.add_relationship(
                srel.reltype.clone(),
                srel.target_ref.clone(),
                srel.r_id.clone(),
                srel.is_external(),
            );
        }

        for spart in pkg_reader.take_sparts() {
            let mut part = PartFactory::load(spart.partname, spart.content_type, spart.blob)?;
            for srel in spart.srels {
                let is_external = srel.is_external();
                part.rels_mut().add_relationship(
                    srel.reltype,
                    srel.target_ref,
                    srel.r_id,
                    is_external,
                );
            }
            package.add_part(part);
        }

        log::debug!("loaded package with {} parts", package.part_count());
        Ok(package)
    }

    /// Partname of the main document part (`/ppt/presentation.xml`).
    pub fn main_document_partname(&self) -> Result<PackURI> {
        self.rels
            .part_with_reltype(relationship_type::OFFICE_DOCUMENT)?
            .target_partname()
    }

    /// Get a part by its partname.
    pub fn part(&self, partname: &PackURI) -> Result<&dyn Part> {
        self.parts
            .get(partname)
            .map(|b| &**b as &dyn Part)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    /// Get a mutable reference to a part by its partname.
    pub fn part_mut(&mut self, partname: &PackURI) -> Result<&mut dyn Part> {
        match self.parts.get_mut(partname) {
            Some(part) => Ok(part.as_mut()),
            None => Err(OpcError::PartNotFound(partname.to_string())),
        }
    }

    /// Add a part, replacing any part with the same partname.
    pub fn add_part(&mut self, part: Box<dyn Part>) {
        self.parts.insert(part.partname().clone(), part);
    }

    /// Check if a part exists in the package.
    pub fn contains_part(&self, partname: &PackURI) -> bool {
        self.parts.contains_key(partname)
    }

    #[inline]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Parts reachable from the package relationships, depth-first in rId
    /// order.
    pub fn iter_reachable_parts(&self) -> Vec<&dyn Part> {
        let mut visited: HashSet<PackURI> = HashSet::new();
        let mut out: Vec<&dyn Part> = Vec::with_capacity(self.parts.len());
        let mut stack: Vec<PackURI> = Self::internal_targets(&self.rels);
        stack.reverse();

        while let Some(partname) = stack.pop() {
            if !visited.insert(partname.clone()) {
                continue;
            }
            let Some(part) = self.parts.get(&partname) else {
                continue;
            };
            let mut children = Self::internal_targets(part.rels());
            children.reverse();
            stack.extend(children);
            out.push(part.as_ref());
        }

        out
    }

    fn internal_targets(rels: &Relationships) -> Vec<PackURI> {
        rels.sorted()
            .into_iter()
            .filter(|rel| !rel.is_external())
            .filter_map(|rel| rel.target_partname().ok())
            .collect()
    }

    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    #[inline]
    pub fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    /// First partname built from `template` (containing `%d`) that is not
    /// yet used, counting from 1.
    ///
    /// # Example
    /// ```no_run
    /// # use slidewright::ooxml::opc::OpcPackage;
    /// # let pkg = OpcPackage::new();
    /// let next_image = pkg.next_partname("/ppt/media/image%d.png")?;
    /// # Ok::<(), slidewright::ooxml::opc::error::OpcError>(())
    /// ```
    pub fn next_partname(&self, template: &str) -> Result<PackURI> {
        for n in 1..=u32::MAX {
            let candidate = PackURI::from_template(template, n)?;
            if !self.parts.contains_key(&candidate) {
                return Ok(candidate);
            }
        }
        Err(OpcError::InvalidPackUri(format!("no free partname for {}", template)))
    }

    /// Save the package to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        PackageWriter::write(path, self)
    }

    /// Serialize the package to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        PackageWriter::to_bytes(self)
    }
}

impl Default for OpcPackage {
    fn default() -> Self {
        Self::new()
    }
}

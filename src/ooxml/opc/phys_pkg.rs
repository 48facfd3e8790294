//! Physical access to the ZIP container of an OPC package.
//!
//! Packages are small enough to be read into memory in one pass: every
//! member is decompressed on open, and the package reader then takes the
//! blobs it needs without touching the archive again.

use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Decompressed members of a ZIP-based OPC package.
pub struct PhysPkgReader {
    /// Member names in archive order
    names: Vec<String>,

    /// Member name to decompressed content
    members: HashMap<String, Vec<u8>>,
}

impl PhysPkgReader {
    /// Open a package file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(OpcError::PackageNotFound(path.display().to_string()));
        }
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Read a package from in-memory bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(data))
    }

    /// Read every member of the archive.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut names = Vec::with_capacity(archive.len());
        let mut members = HashMap::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut blob = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut blob)?;
            names.push(name.clone());
            members.insert(name, blob);
        }

        Ok(Self { names, members })
    }

    /// Content of a member.
    pub fn blob_for(&self, pack_uri: &PackURI) -> Result<&[u8]> {
        self.members
            .get(pack_uri.membername())
            .map(Vec::as_slice)
            .ok_or_else(|| OpcError::PartNotFound(pack_uri.to_string()))
    }

    /// Take ownership of a member's content.
    pub fn take(&mut self, membername: &str) -> Option<Vec<u8>> {
        self.members.remove(membername)
    }

    /// Relationships XML of a source part, if it has any.
    pub fn rels_xml_for(&self, source_uri: &PackURI) -> Result<Option<&[u8]>> {
        let rels_uri = source_uri.rels_uri()?;
        Ok(self.members.get(rels_uri.membername()).map(Vec::as_slice))
    }

    /// Member names in archive order.
    #[inline]
    pub fn member_names(&self) -> &[String] {
        &self.names
    }

    #[inline]
    pub fn contains(&self, pack_uri: &PackURI) -> bool {
        self.members.contains_key(pack_uri.membername())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Writes parts into an in-memory ZIP archive with Deflate compression.
pub struct PhysPkgWriter {
    archive: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl PhysPkgWriter {
    pub fn new() -> Self {
        Self {
            archive: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    /// Write one member.
    pub fn write(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        self.archive.start_file(pack_uri.membername(), self.options)?;
        self.archive.write_all(blob)?;
        Ok(())
    }

    /// Finish the archive and return its bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        Ok(self.archive.finish()?.into_inner())
    }
}

impl Default for PhysPkgWriter {
    fn default() -> Self {
        Self::new()
    }
}

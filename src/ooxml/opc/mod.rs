/// Open Packaging Conventions (OPC) implementation.
///
/// The ZIP container, content types, part names and relationships that every
/// Office Open XML document is built from:
///
/// - Package structure (parts, relationships)
/// - Content type management
/// - ZIP-based physical packaging
/// - Reachability-based serialization
pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgreader;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::{BlobPart, Part, PartFactory, XmlPart};
pub use phys_pkg::PhysPkgReader;
pub use rel::{Relationship, Relationships};

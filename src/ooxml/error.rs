/// Error types for OOXML operations.
use thiserror::Error;

/// Result type for OOXML operations.
pub type Result<T> = std::result::Result<T, OoxmlError>;

/// Error types for OOXML operations.
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// OPC package error
    #[error("OPC error: {0}")]
    Opc(#[from] crate::ooxml::opc::error::OpcError),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Part not found
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// Invalid content type
    #[error("Invalid content type: expected {expected}, got {got}")]
    InvalidContentType { expected: String, got: String },

    /// Invalid format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Slide index past the end of the slide list
    #[error("Slide index {index} out of range (deck has {count} slides)")]
    SlideIndexOutOfRange { index: usize, count: usize },

    /// Layout index outside the layout list; negative indices count from
    /// the end
    #[error("Layout index {index} out of range (deck has {count} layouts)")]
    LayoutIndexOutOfRange { index: isize, count: usize },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for OoxmlError {
    fn from(err: quick_xml::Error) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}

impl From<crate::common::xml::XmlTreeError> for OoxmlError {
    fn from(err: crate::common::xml::XmlTreeError) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}

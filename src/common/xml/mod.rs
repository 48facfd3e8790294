//! XML helpers: entity escaping and the mutable element tree used for
//! slide editing.

pub mod escape;
pub mod tree;

pub use escape::{escape_xml, unescape_xml};
pub use tree::{XML_DECLARATION, XmlDocument, XmlElement, XmlNode, XmlTreeError, local_name};

/// The PackURI value type: the name of a part inside an OPC package.
///
/// Partnames always begin with a forward slash and use forward slashes as path
/// separators (`/ppt/slides/slide1.xml`). Relationship targets are stored
/// relative to the directory of their source part and are resolved through
/// [`PackURI::from_rel_ref`].
use crate::ooxml::opc::error::{OpcError, Result};

/// The package pseudo-partname, representing the package itself
pub const PACKAGE_URI: &str = "/";

/// The URI for the [Content_Types].xml part
pub const CONTENT_TYPES_URI: &str = "/[Content_Types].xml";

/// A partname within an OPC package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackURI {
    uri: String,
}

impl PackURI {
    /// Create a PackURI, which must begin with a forward slash.
    pub fn new<S: Into<String>>(uri: S) -> Result<Self> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(OpcError::InvalidPackUri(format!(
                "PackURI must begin with slash, got '{}'",
                uri
            )));
        }
        Ok(Self { uri })
    }

    /// The package pseudo-partname `/`.
    pub fn package() -> Self {
        Self {
            uri: PACKAGE_URI.to_string(),
        }
    }

    /// Resolve a relative reference (like `../slideLayouts/slideLayout1.xml`)
    /// against a base URI (like `/ppt/slides`).
    pub fn from_rel_ref(base_uri: &str, relative_ref: &str) -> Result<Self> {
        // Absolute targets are partnames already.
        let joined = if relative_ref.starts_with('/') {
            relative_ref.to_string()
        } else if base_uri.ends_with('/') {
            format!("{}{}", base_uri, relative_ref)
        } else {
            format!("{}/{}", base_uri, relative_ref)
        };
        Self::new(Self::normalize_path(&joined))
    }

    /// Build a partname from a template containing `%d`, e.g.
    /// `/ppt/slides/slide%d.xml`.
    pub fn from_template(template: &str, n: u32) -> Result<Self> {
        Self::new(template.replacen("%d", &n.to_string(), 1))
    }

    /// Directory portion, e.g. `/ppt/slides` for `/ppt/slides/slide1.xml`.
    pub fn base_uri(&self) -> &str {
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    /// Filename portion, e.g. `slide1.xml`. Empty for the package pseudo-partname.
    pub fn filename(&self) -> &str {
        self.uri.rfind('/').map_or("", |pos| &self.uri[pos + 1..])
    }

    /// Extension without the leading period.
    pub fn ext(&self) -> &str {
        let filename = self.filename();
        filename.rfind('.').map_or("", |pos| &filename[pos + 1..])
    }

    /// Numeric suffix of tuple partnames: 21 for `/ppt/slides/slide21.xml`,
    /// `None` for singleton partnames such as `/ppt/presentation.xml`.
    pub fn idx(&self) -> Option<u32> {
        let filename = self.filename();
        let stem = filename.rfind('.').map_or(filename, |pos| &filename[..pos]);
        let digits = stem.len() - stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 || digits == stem.len() {
            return None;
        }
        atoi_simd::parse::<u32>(stem[stem.len() - digits..].as_bytes()).ok()
    }

    /// Zip member name: the URI with its leading slash stripped.
    pub fn membername(&self) -> &str {
        &self.uri[1..]
    }

    /// Relative reference from `base_uri` to this partname, e.g.
    /// `../slideLayouts/slideLayout1.xml` from `/ppt/slides`.
    pub fn relative_ref(&self, base_uri: &str) -> String {
        if base_uri == PACKAGE_URI {
            return self.membername().to_string();
        }

        let from: Vec<&str> = base_uri.split('/').filter(|s| !s.is_empty()).collect();
        let to: Vec<&str> = self.uri.split('/').filter(|s| !s.is_empty()).collect();
        let common = from
            .iter()
            .zip(to.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts: Vec<&str> = vec![".."; from.len() - common];
        parts.extend_from_slice(&to[common..]);
        parts.join("/")
    }

    /// Partname of the `.rels` part holding this part's relationships.
    pub fn rels_uri(&self) -> Result<PackURI> {
        let base_uri = self.base_uri();
        let uri = if base_uri == PACKAGE_URI {
            format!("/_rels/{}.rels", self.filename())
        } else {
            format!("{}/_rels/{}.rels", base_uri, self.filename())
        };
        Self::new(uri)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// Resolve `.` and `..` segments.
    fn normalize_path(path: &str) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for part in path.split('/') {
            match part {
                "" | "." => {},
                ".." => {
                    parts.pop();
                },
                _ => parts.push(part),
            }
        }
        format!("/{}", parts.join("/"))
    }
}

impl std::fmt::Display for PackURI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

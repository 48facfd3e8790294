use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;

// Static initialization: automaton is built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

// Use LeftmostLongest to ensure longer entities are matched first (e.g., &amp; instead of &lt;)
static XML_UNESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
        .expect("Failed to build XML unescaper")
});

/// Escape XML special characters.
///
/// # Examples
///
/// ```
/// use slidewright::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<tag>\"hello\"</tag>"), "&lt;tag&gt;&quot;hello&quot;&lt;/tag&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Unescape XML special characters and numeric character references.
///
/// The five predefined entities are replaced with their characters, and
/// `&#NN;` / `&#xHH;` references are decoded. Unknown or malformed entities
/// are left unchanged.
///
/// # Examples
///
/// ```
/// use slidewright::common::xml::unescape_xml;
/// assert_eq!(unescape_xml("&lt;a &amp; b&gt;"), "<a & b>");
/// assert_eq!(unescape_xml("&quot;hello&apos;"), "\"hello'");
/// assert_eq!(unescape_xml("&amp;lt;"), "&lt;"); // &amp; is matched first
/// assert_eq!(unescape_xml("line&#10;break&#x41;"), "line\nbreakA");
/// assert_eq!(unescape_xml("&invalid;"), "&invalid;"); // unknown entity
/// ```
pub fn unescape_xml(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    if !s.contains("&#") {
        return XML_UNESCAPER.replace_all(s, &["&", "<", ">", "\"", "'"]);
    }

    // Character references are decoded segment by segment so that an
    // escaped "&amp;#10;" stays literal text.
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find("&#") {
        out.push_str(&XML_UNESCAPER.replace_all(&rest[..pos], &["&", "<", ">", "\"", "'"]));
        let candidate = &rest[pos..];
        match decode_char_ref(candidate) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &candidate[consumed..];
            },
            None => {
                out.push_str("&#");
                rest = &candidate[2..];
            },
        }
    }
    out.push_str(&XML_UNESCAPER.replace_all(rest, &["&", "<", ">", "\"", "'"]));
    out
}

/// Decode a `&#...;` reference at the start of `s`, returning the character
/// and the number of bytes consumed.
fn decode_char_ref(s: &str) -> Option<(char, usize)> {
    let end = s.find(';')?;
    let body = &s[2..end];
    let code = if let Some(hex) = body.strip_prefix('x').or_else(|| body.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        atoi_simd::parse::<u32>(body.as_bytes()).ok()?
    };
    char::from_u32(code).map(|ch| (ch, end + 1))
}

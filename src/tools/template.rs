//! Conversion of sample slide text into `{{marker}}` templates.
//!
//! A template deck carries boilerplate sentences and style-guide labels
//! such as `소제목/ Medium 14pt`. [`TemplateRules::convert`] removes the
//! boilerplate, turns the labels into markers a text generator can fill in
//! and tidies the whitespace left behind.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;

/// Marker produced from subtitle labels.
pub const SUBTITLE_MARKER: &str = "{{소제목}}";
/// Marker appended on the line after every subtitle marker.
pub const BODY_MARKER: &str = "{{본문_내용}}";

/// Boilerplate sentences removed from the start of a match to the end of
/// its line. Matched case-insensitively.
pub const DEFAULT_REMOVE_PATTERNS: &[&str] = &[
    r"우리는 인간생활의 향상과 개선에 필요한[^\n]*",
    r"우리는 제품과 서비스를 생산하기 이전에[^\n]*",
    r"이를 위하여 모든 사람은[^\n]*",
    r"이 목적을 달성하기 위하여[^\n]*",
    r"또한 인재를 양성하고[^\n]*",
    r"우리의 제품과 서비스는[^\n]*",
    r"나아가 문화의 발전에 기여한다[^\n]*",
    r"따라서 기업의 이익은[^\n]*",
];

/// Style-guide labels and the markers they become, applied in order.
pub const DEFAULT_MARKER_REPLACEMENTS: &[(&str, &str)] = &[
    (r"소제목/?[ ]*Medium[ ]*14pt", "{{소제목}}"),
    (r"중제목[/|]?[ ]*Medium[ ,]*16pt", "{{중제목}}"),
    (r"텍스트를 입력하세요\s*", "{{텍스트}}"),
    (r"텍스트를 입력하시오", "{{텍스트}}"),
];

static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{[^}]+\}\}").expect("Failed to build marker pattern"));
static TRAILING_JUNK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s|.]+$").expect("Failed to build trailing pattern"));
static LEADING_JUNK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\s|.]+").expect("Failed to build leading pattern"));
static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n+").expect("Failed to build blank-line pattern"));

static DEFAULT_RULES: Lazy<TemplateRules> = Lazy::new(|| {
    TemplateRules::new(DEFAULT_REMOVE_PATTERNS, DEFAULT_MARKER_REPLACEMENTS)
        .expect("Failed to build default template rules")
});

/// An ordered set of removal patterns and marker replacements.
///
/// # Examples
///
/// ```
/// use slidewright::tools::TemplateRules;
///
/// let rules = TemplateRules::default();
/// assert_eq!(rules.convert("소제목/ Medium 14pt"), "{{소제목}}\n{{본문_내용}}");
/// assert_eq!(rules.convert("텍스트를 입력하세요"), "{{텍스트}}");
/// ```
#[derive(Debug, Clone)]
pub struct TemplateRules {
    removals: Vec<Regex>,
    replacements: Vec<(Regex, String)>,
}

impl TemplateRules {
    /// Compile a rule set. Removal patterns match case-insensitively,
    /// replacement patterns as written.
    pub fn new(remove_patterns: &[&str], replacements: &[(&str, &str)]) -> Result<Self, regex::Error> {
        let removals = remove_patterns
            .iter()
            .map(|pattern| RegexBuilder::new(pattern).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;
        let replacements = replacements
            .iter()
            .map(|(pattern, marker)| Ok((Regex::new(pattern)?, (*marker).to_string())))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { removals, replacements })
    }

    /// Convert `text` into template form.
    ///
    /// Converting converted text again returns it unchanged.
    pub fn convert(&self, text: &str) -> String {
        let mut result = text.to_string();

        for pattern in &self.removals {
            result = pattern.replace_all(&result, "").into_owned();
        }
        for (pattern, marker) in &self.replacements {
            // Markers are literal: `$` in them is not a group reference.
            result = pattern
                .replace_all(&result, regex::NoExpand(marker))
                .into_owned();
        }

        if result.contains(SUBTITLE_MARKER) && !result.contains(BODY_MARKER) {
            result = result.replace(SUBTITLE_MARKER, &format!("{}\n{}", SUBTITLE_MARKER, BODY_MARKER));
        }

        let result = TRAILING_JUNK.replace(&result, "");
        let result = LEADING_JUNK.replace(&result, "");
        let result = BLANK_LINES.replace_all(&result, "\n");
        result.trim().to_string()
    }
}

impl Default for TemplateRules {
    fn default() -> Self {
        DEFAULT_RULES.clone()
    }
}

/// Distinct `{{...}}` markers in `text`, sorted.
pub fn find_markers(text: &str) -> BTreeSet<String> {
    MARKER
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Markers joined with `, `, or `-` when there are none.
pub fn format_markers(markers: &BTreeSet<String>) -> String {
    if markers.is_empty() {
        return "-".to_string();
    }
    markers.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

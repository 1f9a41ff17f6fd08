//! Heading-based section segmentation.
//!
//! A document is split into an ordered list of [`Section`]s, one per detected
//! heading. Two heading shapes are recognized on a trimmed line:
//!
//! - markdown headings: one to six `#` followed by whitespace and text;
//! - bold numbered headings: `**3. Data Model**`.
//!
//! Anything before the first heading is not part of any section. A document
//! with no headings at all yields zero sections; callers treat that as
//! "unsegmentable" and fall back to whole-document truncation.

use regex::Regex;
use std::sync::LazyLock;

use super::estimate::estimate_tokens;

static HEADING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:#{1,6}\s+\S.*|\*\*\d+\.\s+[^*]+\*\*)").expect("heading pattern is valid")
});

/// A heading plus the body text that follows it, up to the next heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// The heading line, trimmed. Not unique: duplicate headings are legal.
    pub heading: String,
    /// Body text. Only the truncator shortens it.
    pub body: String,
    /// Estimated token cost of the body as segmented.
    pub original_tokens: usize,
    /// Whether the heading names a topic from the change request.
    pub relevant: bool,
    /// Token allowance assigned by the allocator.
    pub allowance: usize,
    /// Set when the truncator cut the body.
    pub truncated: bool,
}

impl Section {
    /// Create a section with the given heading and body; cost is computed
    /// from the body.
    pub fn new(heading: impl Into<String>, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            heading: heading.into(),
            original_tokens: estimate_tokens(&body),
            body,
            relevant: false,
            allowance: 0,
            truncated: false,
        }
    }
}

/// Whether a single line is a section heading.
pub fn is_heading(line: &str) -> bool {
    HEADING_REGEX.is_match(line.trim())
}

/// Split `document` into sections in document order.
pub fn segment(document: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in document.split('\n') {
        if is_heading(line) {
            if let Some((heading, lines)) = current.take() {
                sections.push(Section::new(heading, lines.join("\n")));
            }
            current = Some((line.trim().to_string(), Vec::new()));
        } else if let Some((_, ref mut lines)) = current {
            lines.push(line);
        }
    }

    if let Some((heading, lines)) = current {
        sections.push(Section::new(heading, lines.join("\n")));
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_markdown_headings() {
        assert!(is_heading("# Title"));
        assert!(is_heading("###### Deep"));
        assert!(is_heading("   ## Indented"));
        assert!(!is_heading("####### Too deep"));
        assert!(!is_heading("#hashtag"));
        assert!(!is_heading("##"));
        assert!(!is_heading("plain text"));
    }

    #[test]
    fn detects_bold_numbered_headings() {
        assert!(is_heading("**1. Introduction**"));
        assert!(is_heading("**12. Risks and Mitigations**"));
        assert!(!is_heading("**Introduction**"));
        assert!(!is_heading("1. Introduction"));
    }

    #[test]
    fn splits_into_ordered_sections() {
        let doc = "# Overview\nIntro line.\nMore intro.\n## API\nEndpoints here.";
        let sections = segment(doc);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].heading, "# Overview");
        assert_eq!(sections[0].body, "Intro line.\nMore intro.");
        assert_eq!(sections[1].heading, "## API");
        assert_eq!(sections[1].body, "Endpoints here.");
        assert_eq!(sections[1].original_tokens, estimate_tokens("Endpoints here."));
    }

    #[test]
    fn discards_preamble_before_first_heading() {
        let doc = "Preamble text\n\n**1. Scope**\nIn scope.";
        let sections = segment(doc);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].heading, "**1. Scope**");
        assert_eq!(sections[0].body, "In scope.");
    }

    #[test]
    fn no_headings_means_no_sections() {
        assert!(segment("just a paragraph\nand another line").is_empty());
        assert!(segment("").is_empty());
    }

    #[test]
    fn consecutive_headings_yield_empty_body() {
        let sections = segment("## A\n## B\nbody of b");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].body, "");
        assert_eq!(sections[0].original_tokens, 0);
        assert_eq!(sections[1].body, "body of b");
    }

    #[test]
    fn duplicate_headings_are_kept_by_position() {
        let sections = segment("## Notes\none\n## Notes\ntwo");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].body, "one");
        assert_eq!(sections[1].body, "two");
    }
}

//! Keyword-taxonomy relevance scoring.
//!
//! The change request is matched against a fixed table of topic tags, each
//! with a list of keywords. A tag is *active* when any of its keywords occurs
//! in the lower-cased change request. A section is relevant when its
//! lower-cased heading contains the name of any active tag.
//!
//! Matching is plain substring search: no tokenization, no stemming, no
//! weighting between tags.

use serde::{Deserialize, Serialize};

use super::segment::Section;

/// Built-in topic table used when the caller supplies no taxonomy.
const DEFAULT_TOPICS: &[(&str, &[&str])] = &[
    ("architecture", &["architecture", "system design", "overview", "diagram"]),
    ("technology", &["technology", "stack", "framework", "library", "tool"]),
    ("module", &["module", "component", "service", "function"]),
    ("database", &["database", "schema", "table", "entity", "er diagram"]),
    ("api", &["api", "endpoint", "request", "response", "rest"]),
    ("security", &["security", "authentication", "authorization", "encryption"]),
    ("performance", &["performance", "scalability", "caching", "load"]),
    ("error", &["error", "exception", "handling", "logging"]),
    ("deployment", &["deployment", "ci/cd", "docker", "infrastructure"]),
    ("risk", &["risk", "mitigation", "constraint", "assumption"]),
];

/// One topic tag and the keywords that activate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Tag name, matched as a substring of section headings.
    pub tag: String,
    /// Keywords matched as substrings of the change request.
    pub keywords: Vec<String>,
}

impl Topic {
    pub fn new(tag: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            tag: tag.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Ordered topic table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Taxonomy {
    topics: Vec<Topic>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            topics: DEFAULT_TOPICS
                .iter()
                .map(|(tag, keywords)| Topic::new(*tag, keywords))
                .collect(),
        }
    }
}

impl Taxonomy {
    pub fn new(topics: Vec<Topic>) -> Self {
        Self { topics }
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Tags with at least one keyword present in `change_request`.
    pub fn active_topics(&self, change_request: &str) -> Vec<&str> {
        let request = change_request.to_lowercase();
        self.topics
            .iter()
            .filter(|t| {
                t.keywords
                    .iter()
                    .any(|k| request.contains(k.to_lowercase().as_str()))
            })
            .map(|t| t.tag.as_str())
            .collect()
    }

    /// Set `relevant` on every section from the change request.
    ///
    /// With no active tag every section ends up not relevant; allocation then
    /// falls back to smaller-sections-first.
    pub fn mark_relevant(&self, sections: &mut [Section], change_request: &str) {
        let active: Vec<String> = self
            .active_topics(change_request)
            .into_iter()
            .map(str::to_lowercase)
            .collect();

        for section in sections.iter_mut() {
            let heading = section.heading.to_lowercase();
            section.relevant = active.iter().any(|tag| heading.contains(tag.as_str()));
        }
    }
}

//! Budget-aware document compaction.
//!
//! A document that would overflow the consumer's input budget is reduced in
//! stages, each in its own module:
//!
//! 1. **[`segment`]**: split into `(heading, body)` sections.
//! 2. **[`relevance`]**: flag sections whose heading names a topic from the
//!    change request.
//! 3. **[`allocate`]**: plan a per-section token allowance under the budget.
//! 4. **[`truncate`]**: cut each body to its allowance at a sentence or line
//!    boundary.
//! 5. **[`assemble`]**: rejoin in original order and append the
//!    preservation directive.
//!
//! [`compact_document`] runs the whole pipeline. Documents that already fit
//! come back untouched. Documents without any heading, or whose overheads
//! leave no tokens for section bodies, are hard-cut as a whole. All of it is
//! pure and synchronous.

pub mod allocate;
pub mod assemble;
pub mod estimate;
pub mod relevance;
pub mod segment;
pub mod truncate;

pub use allocate::{AllocationPolicy, BudgetPlan, allocate};
pub use assemble::{assemble, preservation_directive};
pub use estimate::{CHARS_PER_TOKEN, estimate_tokens};
pub use relevance::{Taxonomy, Topic};
pub use segment::{Section, segment};
pub use truncate::{ELISION_MARKER, truncate_body, truncate_document};

use tracing::{debug, info, warn};

use crate::config::CompactionConfig;

/// Notice appended when a document is hard-cut as a whole.
pub const WHOLE_DOCUMENT_NOTICE: &str = "\n\n[Document truncated due to size limits. \
     The full document structure is preserved in the original.]";

/// Which path produced a [`CompactionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompactionOutcome {
    /// Everything fit; the document is returned as-is.
    Unchanged,
    /// Per-section allocation with the preservation directive.
    Sectioned,
    /// No heading was found, or nothing was left for section bodies; the
    /// document was hard-cut as a whole.
    WholeDocument,
}

/// Output of one compaction call.
#[derive(Debug, Clone)]
pub struct CompactionResult {
    /// The compacted document, directive included on the sectioned path.
    pub document: String,
    /// Original headings in order. Empty unless sectioned.
    pub headings: Vec<String>,
    pub outcome: CompactionOutcome,
    /// Estimated cost of the input document.
    pub original_tokens: usize,
    /// Estimated cost of `document`.
    pub compacted_tokens: usize,
    /// Sections whose body was cut.
    pub truncated_sections: usize,
}

impl CompactionResult {
    fn unchanged(document: &str, tokens: usize) -> Self {
        Self {
            document: document.to_string(),
            headings: Vec::new(),
            outcome: CompactionOutcome::Unchanged,
            original_tokens: tokens,
            compacted_tokens: tokens,
            truncated_sections: 0,
        }
    }

    /// Format as a short log-friendly string.
    pub fn to_log_string(&self) -> String {
        format!(
            "compaction: {:?}, ~{} -> ~{} tokens, {} section(s) truncated",
            self.outcome, self.original_tokens, self.compacted_tokens, self.truncated_sections,
        )
    }
}

/// Compact `document` so that, together with `change_request` and the fixed
/// instruction overhead, it fits `config.total_budget` tokens.
pub fn compact_document(
    document: &str,
    change_request: &str,
    config: &CompactionConfig,
) -> CompactionResult {
    let doc_tokens = estimate_tokens(document);
    let request_tokens = estimate_tokens(change_request);
    let total_estimated = doc_tokens
        .saturating_add(request_tokens)
        .saturating_add(config.fixed_overhead);

    if total_estimated <= config.total_budget {
        debug!(
            "Document fits ({total_estimated} <= {} tokens), no compaction",
            config.total_budget
        );
        return CompactionResult::unchanged(document, doc_tokens);
    }

    info!(
        "Document too large ({total_estimated} tokens), condensing to fit within {} tokens",
        config.total_budget
    );

    let mut sections = segment(document);

    if sections.is_empty() {
        warn!("No section headings found, truncating whole document");
        return whole_document(document, doc_tokens, request_tokens, config);
    }

    config.taxonomy.mark_relevant(&mut sections, change_request);
    let plan = allocate(
        &sections,
        config.total_budget,
        request_tokens,
        config.fixed_overhead,
        &config.policy,
    );
    if plan.available_for_bodies == 0 {
        warn!(
            "Overheads leave no room for section bodies (heading overhead {}), \
             truncating whole document",
            plan.heading_overhead
        );
        return whole_document(document, doc_tokens, request_tokens, config);
    }
    plan.apply(&mut sections);
    debug!(
        "Budget plan: {} sections, {} relevant, {} of {} body tokens allocated",
        sections.len(),
        sections.iter().filter(|s| s.relevant).count(),
        plan.total_allocated(),
        plan.available_for_bodies,
    );

    for section in &mut sections {
        let cut = truncate_body(&section.body, section.allowance);
        section.body = cut.body;
        section.truncated = cut.truncated;
    }

    let compacted = assemble(&sections);
    let result = CompactionResult {
        compacted_tokens: estimate_tokens(&compacted),
        headings: sections.iter().map(|s| s.heading.clone()).collect(),
        truncated_sections: sections.iter().filter(|s| s.truncated).count(),
        document: compacted,
        outcome: CompactionOutcome::Sectioned,
        original_tokens: doc_tokens,
    };
    info!(
        "Condensed document from {} to {} tokens",
        result.original_tokens, result.compacted_tokens
    );
    result
}

/// Hard-cut the whole document to the character budget left after the change
/// request and fixed overhead.
fn whole_document(
    document: &str,
    doc_tokens: usize,
    request_tokens: usize,
    config: &CompactionConfig,
) -> CompactionResult {
    let max_chars = estimate::chars_for_tokens(
        config
            .total_budget
            .saturating_sub(request_tokens)
            .saturating_sub(config.fixed_overhead),
    );
    debug!("Whole-document character budget: {max_chars}");
    let compacted = truncate_document(document, max_chars, WHOLE_DOCUMENT_NOTICE);
    let truncated = compacted.len() < document.len();
    CompactionResult {
        compacted_tokens: estimate_tokens(&compacted),
        document: compacted,
        headings: Vec::new(),
        outcome: CompactionOutcome::WholeDocument,
        original_tokens: doc_tokens,
        truncated_sections: usize::from(truncated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_FIXED_OVERHEAD;

    fn tight_config(total_budget: usize) -> CompactionConfig {
        CompactionConfig::default()
            .with_total_budget(total_budget)
            .with_fixed_overhead(0)
            .with_policy(AllocationPolicy {
                reserve_margin: 0,
                ..Default::default()
            })
    }

    fn technical_document() -> String {
        let mut doc = String::from("Technical Design Document\n\n");
        for (i, title) in ["Overview", "API Design", "Database Schema", "Deployment"]
            .iter()
            .enumerate()
        {
            doc.push_str(&format!("**{}. {}**\n", i + 1, title));
            for j in 0..30 {
                doc.push_str(&format!("Sentence {j} about {title}. "));
            }
            doc.push('\n');
        }
        doc
    }

    #[test]
    fn document_that_fits_is_returned_verbatim() {
        let doc = "## A\nalpha\n\n## B\nbeta\n";
        let result = compact_document(doc, "tweak the api", &CompactionConfig::default());
        assert_eq!(result.outcome, CompactionOutcome::Unchanged);
        assert_eq!(result.document, doc);
        assert!(!result.document.contains(ELISION_MARKER));
        assert!(!result.document.contains("IMPORTANT NOTE"));
    }

    #[test]
    fn sectioned_output_preserves_heading_order() {
        let doc = technical_document();
        let result = compact_document(&doc, "add a REST endpoint", &tight_config(400));
        assert_eq!(result.outcome, CompactionOutcome::Sectioned);
        assert_eq!(
            result.headings,
            vec![
                "**1. Overview**",
                "**2. API Design**",
                "**3. Database Schema**",
                "**4. Deployment**",
            ]
        );
        let positions: Vec<usize> = result
            .headings
            .iter()
            .map(|h| result.document.find(h.as_str()).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(result.truncated_sections > 0);
        assert!(result.compacted_tokens < result.original_tokens);
    }

    #[test]
    fn relevant_section_keeps_more_content() {
        let doc = technical_document();
        let result = compact_document(&doc, "add a REST endpoint", &tight_config(400));
        let api = result.document.matches("about API Design").count();
        let deploy = result.document.matches("about Deployment").count();
        assert!(api > deploy, "api={api} deploy={deploy}");
    }

    #[test]
    fn unsegmentable_document_is_hard_cut() {
        let doc = "no headings here. ".repeat(400);
        let config = tight_config(300);
        let result = compact_document(&doc, "shorten", &config);
        let max_chars = (300 - estimate_tokens("shorten")) * CHARS_PER_TOKEN;
        assert_eq!(result.outcome, CompactionOutcome::WholeDocument);
        assert!(segment(&doc).is_empty());
        assert!(result.document.len() <= max_chars);
        assert!(result.document.ends_with(WHOLE_DOCUMENT_NOTICE));
        assert_eq!(result.truncated_sections, 1);
    }

    #[test]
    fn body_costs_stay_within_available_budget() {
        let doc = technical_document();
        let config = tight_config(500);
        let request = "tighten security and encryption of the api";
        let result = compact_document(&doc, request, &config);

        let mut sections = segment(&doc);
        config.taxonomy.mark_relevant(&mut sections, request);
        let plan = allocate(&sections, 500, estimate_tokens(request), 0, &config.policy);
        let body_cost: usize = sections
            .iter()
            .enumerate()
            .map(|(i, s)| estimate_tokens(&truncate_body(&s.body, plan.allowance(i)).body))
            .sum();
        assert!(body_cost <= plan.available_for_bodies);
        assert_eq!(result.outcome, CompactionOutcome::Sectioned);
    }

    #[test]
    fn log_string_mentions_outcome() {
        let result = compact_document("## A\nx", "", &CompactionConfig::default());
        assert!(result.to_log_string().contains("Unchanged"));
    }

    #[test]
    fn overheads_exhausting_body_budget_fall_back_to_whole_document() {
        let mut doc = String::new();
        for i in 1..=4 {
            doc.push_str(&format!("## Section {i}\n"));
            doc.push_str(&format!("Body text of section {i}. ").repeat(40));
            doc.push('\n');
        }
        let config = CompactionConfig::default().with_total_budget(1400);
        let result = compact_document(&doc, "tweak", &config);

        let max_chars =
            (1400 - estimate_tokens("tweak") - DEFAULT_FIXED_OVERHEAD) * CHARS_PER_TOKEN;
        assert_eq!(result.outcome, CompactionOutcome::WholeDocument);
        assert!(result.headings.is_empty());
        assert!(result.document.len() <= max_chars);
        assert!(result.document.ends_with(WHOLE_DOCUMENT_NOTICE));
        assert!(result.document.contains("Body text of section 1."));
        assert!(!result.document.contains("IMPORTANT NOTE"));
    }

    #[test]
    fn oversized_fixed_overhead_saturates() {
        let config = CompactionConfig::default().with_fixed_overhead(usize::MAX);
        let result = compact_document("## A\nbody", "x", &config);
        assert_eq!(result.outcome, CompactionOutcome::WholeDocument);
        assert!(result.document.is_empty());
    }
}

//! Prompt text for revision requests.

/// System prompt sent with every revision call unless overridden in
/// [`ReviseConfig`](crate::config::ReviseConfig).
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a meticulous technical editor. \
You receive an existing document and a change request. Apply exactly the requested \
changes and nothing else. Return the complete revised document in the same format, \
with every section present in its original order and numbering.";

const EDIT_RULES: &str = "EDITING RULES:
- Keep every section, paragraph, diagram and table that the change request does not mention
- Keep the section order and numbering exactly as in the document above
- Change only the parts the change request asks for
- Put new content inside the relevant existing section; put a brand new section at the end
- Return the complete document, not a summary or a diff";

const CONDENSED_RULE: &str = "- Parts of the document above may be abbreviated. Still return the \
full structure with every section, applying only the requested changes";

/// Human query for the primary tier. `document` is the compacted document.
pub fn primary_query(document: &str, change_request: &str) -> String {
    format!(
        "EXISTING DOCUMENT (PRESERVE CONTENT, STRUCTURE AND ORDER):\n{document}\n\n\
         CHANGE REQUEST (APPLY ONLY THESE CHANGES):\n{change_request}\n\n\
         {EDIT_RULES}\n{CONDENSED_RULE}"
    )
}

/// Note appended to the aggressive-tier excerpt.
pub fn aggressive_note(original_chars: usize, change_request: &str) -> String {
    format!(
        "\n\n[NOTE: Document truncated due to size. The original document has \
         {original_chars} characters. Preserve all section structure and apply only \
         the requested changes: {change_request}]"
    )
}

/// Human query for the aggressive tier. `excerpt` already carries the
/// [`aggressive_note`].
pub fn aggressive_query(excerpt: &str, change_request: &str) -> String {
    format!(
        "EXISTING DOCUMENT (PRESERVE CONTENT, STRUCTURE AND ORDER):\n{excerpt}\n\n\
         CHANGE REQUEST (APPLY ONLY THESE CHANGES):\n{change_request}\n\n\
         {EDIT_RULES}"
    )
}

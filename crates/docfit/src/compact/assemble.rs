//! Reassembly of (possibly truncated) sections plus the preservation
//! directive.
//!
//! The directive is part of the output contract: without it a consumer could
//! mistake an abbreviated document for the full one and drop the content it
//! never saw.

use super::segment::Section;

/// Render sections in order, separated by a blank line, without the
/// directive.
pub fn render_sections(sections: &[Section]) -> String {
    sections
        .iter()
        .map(|s| {
            if s.body.is_empty() {
                s.heading.clone()
            } else {
                format!("{}\n{}", s.heading, s.body)
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the preservation directive listing every heading in order.
pub fn preservation_directive<'a>(headings: impl IntoIterator<Item = &'a str>) -> String {
    let headings: Vec<&str> = headings.into_iter().collect();
    let mut directive = format!(
        "[IMPORTANT NOTE: This document was condensed to fit the input size limit. \
         The original document has {} sections, in this order:\n",
        headings.len()
    );
    for heading in &headings {
        directive.push_str("- ");
        directive.push_str(heading);
        directive.push('\n');
    }
    directive.push_str(
        "\nYour response MUST contain ALL of these sections, in the same order and with the \
         same numbering, even though some sections above are abbreviated. Keep the original \
         structure of abbreviated sections and apply only the changes requested. Return the \
         COMPLETE document.]",
    );
    directive
}

/// Join sections and append the preservation directive.
pub fn assemble(sections: &[Section]) -> String {
    let body = render_sections(sections);
    let directive = preservation_directive(sections.iter().map(|s| s.heading.as_str()));
    format!("{body}\n\n{directive}")
}

//! Boundary-aware truncation of section bodies and whole documents.

use super::estimate::{chars_for_tokens, estimate_tokens};

/// Marker appended to every truncated section body.
pub const ELISION_MARKER: &str = "...";

/// A cut point past this share of the prefix (in tenths) is accepted.
const BOUNDARY_MIN_TENTHS: usize = 7;

/// Result of truncating one body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncation {
    pub body: String,
    pub truncated: bool,
}

/// Cut `body` so its estimated cost fits in `allowance` tokens.
///
/// Bodies already within the allowance come back unchanged. Otherwise the
/// prefix is cut at the last sentence terminator or line break when that
/// lies past 70% of the prefix, and [`ELISION_MARKER`] is appended. The
/// marker is paid for out of the allowance, so the result never costs more
/// than `allowance`. A zero allowance yields an empty body; the assembler
/// then renders the heading alone.
pub fn truncate_body(body: &str, allowance: usize) -> Truncation {
    if estimate_tokens(body) <= allowance {
        return Truncation {
            body: body.to_string(),
            truncated: false,
        };
    }

    let budget = chars_for_tokens(allowance).saturating_sub(ELISION_MARKER.len());
    let budget = body.floor_char_boundary(budget);
    if budget == 0 {
        return Truncation {
            body: String::new(),
            truncated: true,
        };
    }

    let (prefix, _) = body.split_at(budget);
    let cut = prefix
        .rfind(['.', '!', '?', '\n'])
        .filter(|&pos| pos * 10 > budget * BOUNDARY_MIN_TENTHS)
        .map_or(prefix.len(), |pos| pos + 1);
    let (kept, _) = prefix.split_at(cut);

    Truncation {
        body: format!("{kept}{ELISION_MARKER}"),
        truncated: true,
    }
}

/// Hard-cut a whole document to at most `max_chars` bytes, ending with
/// `notice` when anything was dropped.
///
/// If `max_chars` cannot even hold the notice, the plain prefix is returned.
pub fn truncate_document(document: &str, max_chars: usize, notice: &str) -> String {
    if document.len() <= max_chars {
        return document.to_string();
    }

    let room = max_chars.saturating_sub(notice.len());
    if room == 0 {
        let (prefix, _) = document.split_at(document.floor_char_boundary(max_chars));
        return prefix.to_string();
    }

    let (prefix, _) = document.split_at(document.floor_char_boundary(room));
    format!("{prefix}{notice}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_within_allowance_is_unchanged() {
        let t = truncate_body("Short body.", 10);
        assert_eq!(t.body, "Short body.");
        assert!(!t.truncated);
    }

    #[test]
    fn empty_body_with_zero_allowance_is_not_truncated() {
        let t = truncate_body("", 0);
        assert_eq!(t.body, "");
        assert!(!t.truncated);
    }

    #[test]
    fn zero_allowance_drops_body() {
        let t = truncate_body("Some content that will not fit.", 0);
        assert_eq!(t.body, "");
        assert!(t.truncated);
    }

    #[test]
    fn cuts_at_late_sentence_boundary() {
        // Budget is 10 * 4 - 3 = 37 chars; the period at index 34 is past 70%.
        let body = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa. bbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
        let t = truncate_body(body, 10);
        assert!(t.truncated);
        assert_eq!(t.body, format!("{}.{}", "a".repeat(34), ELISION_MARKER));
    }

    #[test]
    fn cuts_at_late_line_break() {
        let body = format!("{}\n{}", "a".repeat(30), "b".repeat(60));
        let t = truncate_body(&body, 10);
        assert_eq!(t.body, format!("{}\n{}", "a".repeat(30), ELISION_MARKER));
    }

    #[test]
    fn early_boundary_falls_back_to_hard_cut() {
        // The only period is at index 5, well before 70% of 37.
        let body = format!("short. {}", "c".repeat(100));
        let t = truncate_body(&body, 10);
        assert_eq!(t.body.len(), 37 + ELISION_MARKER.len());
        assert!(t.body.starts_with("short. ccc"));
        assert!(t.body.ends_with(ELISION_MARKER));
    }

    #[test]
    fn result_cost_never_exceeds_allowance() {
        let body = "word ".repeat(500);
        for allowance in [1, 2, 7, 50, 100, 400] {
            let t = truncate_body(&body, allowance);
            assert!(
                estimate_tokens(&t.body) <= allowance,
                "allowance {allowance} produced {} tokens",
                estimate_tokens(&t.body)
            );
        }
    }

    #[test]
    fn respects_utf8_boundaries() {
        let body = "é".repeat(200);
        let t = truncate_body(&body, 5);
        assert!(t.truncated);
        assert!(t.body.ends_with(ELISION_MARKER));
        assert!(estimate_tokens(&t.body) <= 5);
    }

    #[test]
    fn document_truncation_fits_character_budget() {
        let doc = "x".repeat(1000);
        let out = truncate_document(&doc, 200, "\n[cut]");
        assert_eq!(out.len(), 200);
        assert!(out.ends_with("\n[cut]"));
    }

    #[test]
    fn document_within_budget_is_unchanged() {
        assert_eq!(truncate_document("small", 200, "[cut]"), "small");
    }

    #[test]
    fn tiny_budget_drops_notice() {
        let out = truncate_document(&"x".repeat(100), 3, "[notice]");
        assert_eq!(out, "xxx");
    }
}

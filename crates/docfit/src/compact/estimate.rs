//! Character-based token estimation.
//!
//! Every budget decision in the compaction pipeline goes through
//! [`estimate_tokens`]. It is a heuristic (~4 bytes per sub-word token for
//! English-like text), not a tokenizer: downstream providers may still reject
//! a payload that was estimated to fit, which is what the escalation ladder in
//! [`revise`](crate::revise) exists for.

/// Approximate bytes per token for English-like text.
pub const CHARS_PER_TOKEN: usize = 4;

/// Estimate the token cost of `text` as `ceil(len / 4)`.
pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(CHARS_PER_TOKEN)
}

/// Convert a token allowance back into an approximate character budget.
pub fn chars_for_tokens(tokens: usize) -> usize {
    tokens.saturating_mul(CHARS_PER_TOKEN)
}

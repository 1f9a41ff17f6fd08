//! Recognition of "payload too large" failures in provider error text.
//!
//! Providers report oversized requests in several shapes: an HTTP 413, a
//! rate-limit code that some hosts reuse for per-request token caps, or a
//! message about context length. Only these are eligible for the aggressive
//! retry tier. Everything else (auth, bad request, 5xx, network) is surfaced
//! unchanged.

/// Lower-cased phrases that mark a size rejection.
const SIZE_PHRASES: &[&str] = &[
    "rate_limit_exceeded",
    "too large",
    "context_length_exceeded",
    "maximum context length",
    "request entity too large",
];

/// Whether an error string indicates the payload exceeded provider capacity.
pub fn is_size_rejection(error: &str) -> bool {
    if has_status_413(error) {
        return true;
    }
    let lower = error.to_lowercase();
    SIZE_PHRASES.iter().any(|p| lower.contains(p))
}

/// `413` as a standalone number, not part of a longer one like `4130`.
fn has_status_413(error: &str) -> bool {
    let bytes = error.as_bytes();
    error.match_indices("413").any(|(start, _)| {
        let before = start.checked_sub(1).map(|i| bytes[i]);
        let after = bytes.get(start + 3).copied();
        !before.is_some_and(|b| b.is_ascii_digit()) && !after.is_some_and(|b| b.is_ascii_digit())
    })
}

//! Convenience re-exports for common `docfit` types.
//!
//! ```ignore
//! use docfit::prelude::*;
//! ```
//!
//! Covers the client, the generator boundary, the reviser with its config,
//! and the compaction entry point. Pipeline stages (segmenting, allocation,
//! truncation) stay in [`compact`](crate::compact) for callers who need them.

// ── Core types ──────────────────────────────────────────────────────
pub use crate::{ChatRequest, DEFAULT_MODEL, Message, OpenRouterClient};

// ── Generation ──────────────────────────────────────────────────────
pub use crate::api::{FnGenerator, GenerationFuture, Generator, OpenRouterGenerator};
pub use crate::error::{ConfigError, GenerationError, ReviseError};

// ── Revision ────────────────────────────────────────────────────────
pub use crate::config::{CompactionConfig, ReviseConfig};
pub use crate::revise::{Reviser, Revision, RevisionTier, is_approval};

// ── Compaction ──────────────────────────────────────────────────────
pub use crate::compact::{CompactionOutcome, CompactionResult, compact_document};

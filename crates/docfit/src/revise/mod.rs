//! Revision of a document against a change request.
//!
//! [`Reviser`] drives a bounded escalation ladder around a
//! [`Generator`](crate::api::Generator): approvals short-circuit, the primary
//! tier sends the compacted document, and a single aggressive retry follows a
//! size rejection. [`prompt`] holds the text sent at each tier.

pub mod escalation;
pub mod prompt;

pub use escalation::{EscalationState, Reviser, Revision, RevisionTier, is_approval};

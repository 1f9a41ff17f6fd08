//! The bounded escalation ladder.
//!
//! A revision request moves through at most two generator calls:
//!
//! 1. **Primary.** The document is compacted with the configured budget and
//!    embedded in the revision prompt.
//! 2. **Aggressive.** Only after a size rejection. The *original* document is
//!    cut flat to `aggressive_char_cap` characters, annotated with its real
//!    length, and sent once more.
//! 3. **Failed.** A second size rejection is terminal and surfaces as
//!    [`ReviseError::TooLarge`].
//!
//! Any other generator failure propagates immediately from whichever tier
//! produced it. Approval requests never reach the generator.

use tracing::{error, info, warn};

use super::prompt::{aggressive_note, aggressive_query, primary_query};
use crate::api::Generator;
use crate::compact::{compact_document, truncate_document};
use crate::config::ReviseConfig;
use crate::error::{GenerationError, ReviseError};

/// Change requests that approve the document as-is.
const APPROVAL_TOKENS: &[&str] = &["approved", "approve"];

/// Whether `change_request` is an approval (case-insensitive, trimmed).
pub fn is_approval(change_request: &str) -> bool {
    let normalized = change_request.trim().to_lowercase();
    APPROVAL_TOKENS.contains(&normalized.as_str())
}

/// Position on the ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscalationState {
    Primary,
    /// Carries the primary-tier rejection detail.
    Aggressive { original: String },
    Failed { original: String, retry: String },
}

/// Which tier produced a [`Revision`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionTier {
    /// Approval short-circuit; no generator call was made.
    Approved,
    Primary,
    Aggressive,
}

/// Successful revision output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub content: String,
    pub tier: RevisionTier,
}

/// Revises documents through a [`Generator`].
///
/// ```ignore
/// let generator = OpenRouterGenerator::new(client, DEFAULT_MODEL);
/// let revision = Reviser::new(&generator, ReviseConfig::default())
///     .revise(&document, "add a caching section")
///     .await?;
/// println!("{}", revision.content);
/// ```
pub struct Reviser<'a> {
    generator: &'a dyn Generator,
    config: ReviseConfig,
}

impl<'a> Reviser<'a> {
    pub fn new(generator: &'a dyn Generator, config: ReviseConfig) -> Self {
        Self { generator, config }
    }

    /// Revise `document` according to `change_request`.
    pub async fn revise(
        &self,
        document: &str,
        change_request: &str,
    ) -> Result<Revision, ReviseError> {
        if is_approval(change_request) {
            info!("Change request is an approval, returning document unchanged");
            return Ok(Revision {
                content: document.to_string(),
                tier: RevisionTier::Approved,
            });
        }

        let mut state = EscalationState::Primary;
        loop {
            state = match state {
                EscalationState::Primary => {
                    let compaction =
                        compact_document(document, change_request, &self.config.compaction);
                    info!("{}", compaction.to_log_string());
                    let query = primary_query(&compaction.document, change_request);
                    match self.call(&query).await {
                        Ok(content) => {
                            info!("Document revised on primary tier");
                            return Ok(Revision {
                                content,
                                tier: RevisionTier::Primary,
                            });
                        }
                        Err(GenerationError::SizeRejected(detail)) => {
                            warn!("Payload rejected as too large: {detail}");
                            info!("Retrying with aggressive document truncation");
                            EscalationState::Aggressive { original: detail }
                        }
                        Err(e) => {
                            error!("Revision failed: {e}");
                            return Err(e.into());
                        }
                    }
                }
                EscalationState::Aggressive { original } => {
                    let excerpt = self.aggressive_excerpt(document, change_request);
                    let query = aggressive_query(&excerpt, change_request);
                    match self.call(&query).await {
                        Ok(content) => {
                            info!("Document revised on aggressive tier");
                            return Ok(Revision {
                                content,
                                tier: RevisionTier::Aggressive,
                            });
                        }
                        Err(GenerationError::SizeRejected(retry)) => {
                            EscalationState::Failed { original, retry }
                        }
                        Err(e) => {
                            error!("Aggressive retry failed: {e}");
                            return Err(e.into());
                        }
                    }
                }
                EscalationState::Failed { original, retry } => {
                    error!("Aggressive retry also rejected as too large: {retry}");
                    return Err(ReviseError::TooLarge { original, retry });
                }
            };
        }
    }

    /// Flat cut of the original document plus the size note.
    pub fn aggressive_excerpt(&self, document: &str, change_request: &str) -> String {
        let mut excerpt = truncate_document(document, self.config.aggressive_char_cap, "");
        excerpt.push_str(&aggressive_note(document.chars().count(), change_request));
        excerpt
    }

    async fn call(&self, human_query: &str) -> Result<String, GenerationError> {
        self.generator
            .generate(&self.config.system_prompt, human_query)
            .await
    }
}

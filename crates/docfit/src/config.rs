//! Caller-supplied configuration with documented defaults.
//!
//! Nothing in the library reads process state. [`CompactionConfig`] and
//! [`ReviseConfig`] are built by the caller (directly, through the `with_*`
//! builders, or from a JSON file) and passed in. Every field has a default, so
//! a partial JSON file overrides only what it names:
//!
//! ```json
//! {
//!   "aggressive_char_cap": 6000,
//!   "compaction": { "total_budget": 3000, "policy": { "reserve_margin": 300 } }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::compact::{AllocationPolicy, Taxonomy};
use crate::error::ConfigError;
use crate::revise::prompt::DEFAULT_SYSTEM_PROMPT;

/// Default total token budget: a safe margin below a 6000-token provider
/// ceiling once the response and system prompt are accounted for.
pub const DEFAULT_TOTAL_BUDGET: usize = 3500;

/// Default token estimate for the instruction text around the document.
pub const DEFAULT_FIXED_OVERHEAD: usize = 1000;

/// Default character cap for the aggressive retry tier (~2000 tokens).
pub const DEFAULT_AGGRESSIVE_CHAR_CAP: usize = 8000;

/// Settings for one compaction pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompactionConfig {
    /// Token budget for document + change request + instructions.
    pub total_budget: usize,
    /// Estimated tokens of fixed instruction text.
    pub fixed_overhead: usize,
    /// Allocation policy constants.
    pub policy: AllocationPolicy,
    /// Topic table used for relevance scoring.
    pub taxonomy: Taxonomy,
}

impl Default for CompactionConfig {
    fn default() -> Self {
        Self {
            total_budget: DEFAULT_TOTAL_BUDGET,
            fixed_overhead: DEFAULT_FIXED_OVERHEAD,
            policy: AllocationPolicy::default(),
            taxonomy: Taxonomy::default(),
        }
    }
}

impl CompactionConfig {
    pub fn with_total_budget(mut self, tokens: usize) -> Self {
        self.total_budget = tokens;
        self
    }

    pub fn with_fixed_overhead(mut self, tokens: usize) -> Self {
        self.fixed_overhead = tokens;
        self
    }

    pub fn with_policy(mut self, policy: AllocationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_taxonomy(mut self, taxonomy: Taxonomy) -> Self {
        self.taxonomy = taxonomy;
        self
    }
}

/// Settings for the revision ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviseConfig {
    /// Primary-tier compaction settings.
    pub compaction: CompactionConfig,
    /// Character cap applied to the original document in the aggressive tier.
    pub aggressive_char_cap: usize,
    /// System prompt sent with every revision request.
    pub system_prompt: String,
}

impl Default for ReviseConfig {
    fn default() -> Self {
        Self {
            compaction: CompactionConfig::default(),
            aggressive_char_cap: DEFAULT_AGGRESSIVE_CHAR_CAP,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl ReviseConfig {
    pub fn with_compaction(mut self, compaction: CompactionConfig) -> Self {
        self.compaction = compaction;
        self
    }

    pub fn with_aggressive_char_cap(mut self, chars: usize) -> Self {
        self.aggressive_char_cap = chars;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

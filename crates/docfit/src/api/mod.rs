//! Provider interaction layer.
//!
//! - [`generator`] defines the [`Generator`] boundary the revision ladder
//!   calls, with an OpenRouter-backed implementation and a closure adapter.
//! - [`classify`] recognises size rejections in provider error text. Other
//!   failures (401, 5xx, network) are never treated as size problems.

pub mod classify;
pub mod generator;

pub use classify::is_size_rejection;
pub use generator::{FnGenerator, GenerationFuture, Generator, OpenRouterGenerator};

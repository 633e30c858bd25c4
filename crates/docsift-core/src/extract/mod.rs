//! Field extraction.
//!
//! [`PatternExtractor`] finds the critical fields deterministically;
//! [`ExtractionOrchestrator`] decides whether a [`FallbackExtractor`] is
//! consulted for whatever the patterns missed.

mod orchestrator;
mod pattern;
pub mod fallback;
pub mod rules;

pub use fallback::{FallbackExtractor, OpenAiExtractor};
pub use orchestrator::ExtractionOrchestrator;
pub use pattern::PatternExtractor;

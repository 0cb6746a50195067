//! Error types for quiz generation.
//!
//! Only `QuizError::MissingContent` ever reaches callers of the engine.
//! Capability failures are defined here so the resolver and providers can
//! classify them for disable-vs-skip decisions without string matching.

use thiserror::Error;

/// Errors surfaced by the quiz generation engine.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The lesson text normalized to zero usable sentences.
    #[error("lesson text contains no usable sentences")]
    MissingContent,
}

/// Errors raised by optional capability providers.
///
/// These never escalate to the engine's caller: `ModelUnavailable` disables
/// the capability for the process lifetime, `RewriteFailed` skips a single
/// question's rewrite step.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The backing model artifact is missing or could not be loaded.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// The model file exists but its contents are not usable.
    #[error("malformed model file {path}: {message}")]
    MalformedModel { path: String, message: String },

    /// A stem rewrite produced unusable output.
    #[error("rewrite failed: {0}")]
    RewriteFailed(String),
}

impl CapabilityError {
    /// Returns `true` if this error should disable the capability for the
    /// rest of the process, as opposed to skipping one operation.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            CapabilityError::ModelUnavailable(_) | CapabilityError::MalformedModel { .. }
        )
    }
}

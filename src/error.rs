//! Error types for the edgequake-deck library.
//!
//! Three error types reflect three distinct failure modes:
//!
//! * [`DeckError`]: **fatal**. The deck cannot be built (provider not
//!   configured, title or content generation failed, output not writable).
//!   Returned as `Err(DeckError)` from every public entry point.
//!
//! * [`ProviderError`]: the reason a single completion request failed.
//!   Always wrapped in a [`DeckError`] naming the stage that failed, so the
//!   user sees *what* was being generated and *why* it failed.
//!
//! * [`ImageError`]: **non-fatal**. A stock photo could not be found or
//!   fetched. Logged and dropped; the slide is written without imagery.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-deck library.
#[derive(Debug, Error)]
pub enum DeckError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The topic was empty or whitespace only.
    #[error("Topic is empty.\nProvide the subject of the presentation, e.g. \"Renewable Energy\".")]
    EmptyTopic,

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The provider failed while proposing slide titles.
    #[error("Slide title generation failed ({provider}): {source}\n{}", .source.hint())]
    TitleGenerationFailed {
        provider: String,
        #[source]
        source: ProviderError,
    },

    /// The provider failed while writing the body of one slide.
    ///
    /// One failed slide aborts the whole deck: a presentation silently
    /// missing slides is worse than a clear failure.
    #[error("Content generation failed for slide '{title}' ({provider}): {source}\n{}", .source.hint())]
    ContentGenerationFailed {
        title: String,
        provider: String,
        #[source]
        source: ProviderError,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The document writer could not serialise the deck.
    #[error("Failed to render presentation: {detail}")]
    RenderFailed { detail: String },

    /// Could not create or write the output presentation file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeckError {
    /// `true` when the failure came from the third-party completion API
    /// rather than from this crate or the local file system.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            DeckError::ProviderNotConfigured { .. }
                | DeckError::TitleGenerationFailed { .. }
                | DeckError::ContentGenerationFailed { .. }
        )
    }
}

/// Why a single completion request failed.
///
/// Never retried by this crate.
#[derive(Debug, Clone, Error, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ProviderError {
    /// HTTP 429 or quota exhaustion.
    #[error("rate limit or quota exceeded")]
    RateLimited { retry_after_secs: Option<u64> },

    /// HTTP 401/403; retrying will not help.
    #[error("authentication rejected: {detail}")]
    Auth { detail: String },

    /// No response within the configured timeout.
    #[error("no response after {secs}s")]
    Timeout { secs: u64 },

    /// Any other API or transport failure.
    #[error("{detail}")]
    Api { detail: String },
}

impl ProviderError {
    /// Classify a provider error message.
    ///
    /// `edgequake-llm` surfaces HTTP failures as formatted strings, so the
    /// status is recovered from the text.
    pub fn classify(message: impl Into<String>) -> Self {
        let detail = message.into();
        let lower = detail.to_lowercase();
        if lower.contains("429")
            || lower.contains("rate limit")
            || lower.contains("rate_limit")
            || lower.contains("quota")
        {
            ProviderError::RateLimited {
                retry_after_secs: None,
            }
        } else if lower.contains("401")
            || lower.contains("403")
            || lower.contains("unauthorized")
            || lower.contains("invalid api key")
            || lower.contains("authentication")
        {
            ProviderError::Auth { detail }
        } else {
            ProviderError::Api { detail }
        }
    }

    /// One-line instruction telling the user what to do next.
    pub fn hint(&self) -> &'static str {
        match self {
            ProviderError::RateLimited { .. } => {
                "The LLM API is throttling requests. Check your plan quota or retry later; lowering --concurrency also helps."
            }
            ProviderError::Auth { .. } => {
                "Check that the API key for the selected provider is set and valid."
            }
            ProviderError::Timeout { .. } => {
                "The LLM API did not answer in time. Increase --api-timeout or try again."
            }
            ProviderError::Api { .. } => {
                "The LLM API is unavailable or rejected the request. Try again or select another provider/model."
            }
        }
    }
}

/// A non-fatal error while fetching a slide picture.
#[derive(Debug, Clone, Error, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ImageError {
    /// The search returned no result for the query.
    #[error("no image found for '{query}'")]
    NotFound { query: String },

    /// The search or download request failed.
    #[error("image request for '{query}' failed: {detail}")]
    RequestFailed { query: String, detail: String },

    /// The downloaded bytes are not a PNG or JPEG image.
    #[error("image for '{query}' is not a usable PNG/JPEG: {detail}")]
    InvalidImage { query: String, detail: String },

    /// The image request did not finish within the configured timeout.
    #[error("image request for '{query}' timed out after {secs}s")]
    Timeout { query: String, secs: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_rate_limit() {
        let e = ProviderError::classify("HTTP 429 Too Many Requests");
        assert!(matches!(e, ProviderError::RateLimited { .. }));
        let e = ProviderError::classify("You exceeded your current quota");
        assert!(matches!(e, ProviderError::RateLimited { .. }));
    }

    #[test]
    fn classify_auth() {
        let e = ProviderError::classify("401 Unauthorized: invalid api key");
        assert!(matches!(e, ProviderError::Auth { .. }));
    }

    #[test]
    fn classify_other() {
        let e = ProviderError::classify("connection reset by peer");
        assert_eq!(
            e,
            ProviderError::Api {
                detail: "connection reset by peer".into()
            }
        );
    }

    #[test]
    fn title_failure_display_is_actionable() {
        let e = DeckError::TitleGenerationFailed {
            provider: "openai".into(),
            source: ProviderError::RateLimited {
                retry_after_secs: None,
            },
        };
        let msg = e.to_string();
        assert!(msg.contains("openai"), "got: {msg}");
        assert!(msg.contains("quota"), "got: {msg}");
        assert!(e.is_provider_failure());
    }

    #[test]
    fn content_failure_names_the_slide() {
        let e = DeckError::ContentGenerationFailed {
            title: "Wind Energy".into(),
            provider: "mock".into(),
            source: ProviderError::Timeout { secs: 30 },
        };
        let msg = e.to_string();
        assert!(msg.contains("Wind Energy"), "got: {msg}");
        assert!(msg.contains("30s"), "got: {msg}");
        assert!(msg.contains("--api-timeout"), "got: {msg}");
    }

    #[test]
    fn write_failure_is_not_a_provider_failure() {
        let e = DeckError::OutputWriteFailed {
            path: PathBuf::from("/nope/deck.pptx"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(!e.is_provider_failure());
        assert!(e.to_string().contains("/nope/deck.pptx"));
    }
}

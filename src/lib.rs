//! # edgequake-deck
//!
//! Generate PowerPoint presentations from a single topic using LLMs.
//!
//! The model proposes slide titles, then writes each slide body in an
//! independent request. Model output is untrusted: every response is
//! sanitised (markup, entities, code fences, special tokens and filler
//! lines removed) before it reaches a slide.
//!
//! ## Pipeline Overview
//!
//! ```text
//! topic
//!  │
//!  ├─ 1. Titles     one completion → sanitize → up to N titles
//!  ├─ 2. Content    one completion per title, concurrent → sanitize → structure
//!  ├─ 3. Pictures   optional stock photo per slide (best-effort)
//!  ├─ 4. Render     Office Open XML package (spawn_blocking)
//!  └─ 5. Output     atomic write to generated_ppt/<topic>_presentation.pptx
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_deck::{build_deck, DeckConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / GEMINI_API_KEY
//!     let config = DeckConfig::builder().slide_count(6).build()?;
//!     let output = build_deck("Renewable Energy", &config).await?;
//!     println!("{}", output.path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `topic2pptx` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod writer;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ContentStyle, DeckConfig, DeckConfigBuilder, FormattingConfig};
pub use error::{DeckError, ImageError, ProviderError};
pub use generate::{
    assemble, build_deck, build_deck_sync, generate_content, generate_titles, resolve_provider,
};
pub use output::{
    pptx_data_uri, Deck, DeckOutput, DeckStats, ImageKind, Slide, SlideContent, SlideImage,
    SlideTitle,
};
pub use pipeline::images::{ImageProvider, PexelsImageProvider};
pub use pipeline::llm::{Completion, CompletionProvider, CompletionRequest, LlmCompletionProvider};
pub use pipeline::sanitize::{sanitize, SanitizedText};
pub use progress::{DeckProgressCallback, NoopProgressCallback, ProgressCallback};
pub use writer::{DocumentWriter, PptxWriter};

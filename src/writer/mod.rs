//! Presentation writers.
//!
//! A [`DocumentWriter`] serialises a finished [`Deck`] into file bytes.
//! Rendering is CPU-bound; the pipeline calls it inside `spawn_blocking`.

pub mod pptx;
mod templates;

pub use pptx::PptxWriter;

use crate::config::FormattingConfig;
use crate::error::DeckError;
use crate::output::Deck;

/// Serialises a deck into a presentation file.
pub trait DocumentWriter: Send + Sync {
    fn render(&self, deck: &Deck, formatting: &FormattingConfig) -> Result<Vec<u8>, DeckError>;

    /// File extension of the produced document, without the dot.
    fn extension(&self) -> &'static str;
}

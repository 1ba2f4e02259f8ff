//! Deck data model and run results.

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// MIME type of a `.pptx` package.
pub const PPTX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// A slide title: trimmed, non-empty, no enumeration prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideTitle(String);

impl SlideTitle {
    /// Returns `None` when `text` is blank.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == text.len() {
            Some(Self(text))
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlideTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of a content slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", content = "body", rename_all = "lowercase")]
pub enum SlideContent {
    /// Points in order, glyphs stripped. May be empty.
    Bullets(Vec<String>),
    /// One block of prose; embedded `\n` are line breaks.
    Paragraph(String),
}

impl SlideContent {
    pub fn is_empty(&self) -> bool {
        match self {
            SlideContent::Bullets(points) => points.is_empty(),
            SlideContent::Paragraph(text) => text.is_empty(),
        }
    }

    /// Character count of the visible text.
    pub fn text_len(&self) -> usize {
        match self {
            SlideContent::Bullets(points) => points.iter().map(|p| p.chars().count()).sum(),
            SlideContent::Paragraph(text) => text.chars().count(),
        }
    }
}

/// Raster format of a slide picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// File extension used inside the package.
    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpeg",
        }
    }
}

/// A validated picture ready for placement.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideImage {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub kind: ImageKind,
    pub width: u32,
    pub height: u32,
    /// Where the picture came from, for attribution.
    pub source_url: Option<String>,
}

impl fmt::Debug for SlideImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlideImage")
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("kind", &self.kind)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("source_url", &self.source_url)
            .finish()
    }
}

/// One content slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub title: SlideTitle,
    pub content: SlideContent,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image: Option<SlideImage>,
}

/// The full slide model: the topic (rendered as the title slide) followed by
/// content slides in title order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub topic: String,
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Pair titles and contents by position, truncating to the shorter list.
    pub fn from_parts(
        topic: impl Into<String>,
        titles: Vec<SlideTitle>,
        contents: Vec<SlideContent>,
    ) -> Self {
        let slides = titles
            .into_iter()
            .zip(contents)
            .map(|(title, content)| Slide {
                title,
                content,
                image: None,
            })
            .collect();
        Self {
            topic: topic.into(),
            slides,
        }
    }

    /// Title slide plus content slides.
    pub fn total_slides(&self) -> usize {
        self.slides.len() + 1
    }
}

/// Counters collected during [`crate::build_deck`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckStats {
    /// Content slides requested in the configuration.
    pub requested_slides: usize,
    /// Content slides actually produced.
    pub generated_slides: usize,
    /// Slides that received a picture.
    pub images_attached: usize,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub llm_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Result of a successful [`crate::build_deck`] run.
#[derive(Debug, Clone, Serialize)]
pub struct DeckOutput {
    /// Where the presentation was written.
    pub path: PathBuf,
    pub deck: Deck,
    pub stats: DeckStats,
    /// Size of the written file in bytes.
    pub file_size: u64,
}

impl DeckOutput {
    /// Read the written file back and encode it as a `data:` URI.
    pub fn data_uri(&self) -> std::io::Result<String> {
        let bytes = std::fs::read(&self.path)?;
        Ok(pptx_data_uri(&bytes))
    }
}

/// Encode presentation bytes as a base64 `data:` URI suitable for a
/// download link.
pub fn pptx_data_uri(bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        PPTX_MIME,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

//! Configuration types for deck generation.
//!
//! Two layers:
//!
//! * [`FormattingConfig`]: what the deck looks like (slide count, fonts,
//!   bullets vs. paragraphs, pictures). Plain data, serialisable, immutable
//!   once the run starts.
//! * [`DeckConfig`]: everything else the pipeline needs: the provider,
//!   sampling parameters, timeouts, concurrency and the output location.
//!   Built once via [`DeckConfigBuilder`] and passed by reference through
//!   the whole pipeline; there is no process-wide client or font constant.

use crate::error::DeckError;
use crate::pipeline::images::ImageProvider;
use crate::pipeline::llm::CompletionProvider;
use crate::progress::ProgressCallback;
use crate::writer::DocumentWriter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// Default font family for titles and bodies.
pub const DEFAULT_FONT_FAMILY: &str = "Calibri";

/// Font families offered as a fixed choice. Anything else is accepted as
/// free text.
pub const KNOWN_FONT_FAMILIES: &[&str] = &[
    "Calibri",
    "Arial",
    "Helvetica",
    "Times New Roman",
    "Georgia",
    "Verdana",
    "Segoe UI",
];

/// Placeholder values a form shows instead of a real family name.
const RESERVED_FONT_PLACEHOLDERS: &[&str] = &["", "custom", "custom...", "other", "select a font"];

/// Inclusive bounds for the number of content slides.
pub const MIN_SLIDE_COUNT: usize = 2;
pub const MAX_SLIDE_COUNT: usize = 10;

/// Inclusive bounds for any font size, in points.
pub const MIN_FONT_SIZE_PT: u32 = 8;
pub const MAX_FONT_SIZE_PT: u32 = 96;

/// How slide bodies are laid out. Chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStyle {
    /// One point per line, rendered with bullet glyphs. (default)
    #[default]
    Bullets,
    /// A single block of prose.
    Paragraph,
}

/// Visual settings for the generated deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingConfig {
    /// Font size of the topic on the title slide, in points. Default: 40.
    pub title_slide_font_size: u32,
    /// Font size of each content slide's title, in points. Default: 30.
    pub slide_title_font_size: u32,
    /// Font size of body text, in points. Default: 16.
    pub body_font_size: u32,
    /// Font family for titles. Default: Calibri.
    pub title_font: String,
    /// Font family for body text. Default: Calibri.
    pub body_font: String,
    /// Bullets or paragraph. Default: Bullets.
    pub style: ContentStyle,
    /// Number of content slides requested (2–10). Default: 5.
    ///
    /// The provider may deliver fewer usable titles; the deck then has
    /// fewer slides.
    pub slide_count: usize,
    /// Attach a stock photo to each content slide. Default: false.
    pub include_images: bool,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            title_slide_font_size: 40,
            slide_title_font_size: 30,
            body_font_size: 16,
            title_font: DEFAULT_FONT_FAMILY.to_string(),
            body_font: DEFAULT_FONT_FAMILY.to_string(),
            style: ContentStyle::default(),
            slide_count: 5,
            include_images: false,
        }
    }
}

/// Normalise a user-supplied font family.
///
/// Known families are matched case-insensitively and returned with their
/// canonical spelling. A value equal to a form placeholder ("Custom",
/// "Other", empty, ...) falls back to [`DEFAULT_FONT_FAMILY`]. Any other
/// text is kept as a custom family.
pub fn resolve_font_family(input: &str) -> String {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if RESERVED_FONT_PLACEHOLDERS.contains(&lower.as_str()) {
        warn!(
            "Font '{}' is a placeholder, using {}",
            trimmed, DEFAULT_FONT_FAMILY
        );
        return DEFAULT_FONT_FAMILY.to_string();
    }

    KNOWN_FONT_FAMILIES
        .iter()
        .find(|f| f.eq_ignore_ascii_case(trimmed))
        .map(|f| f.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Configuration for a deck-generation run.
///
/// Built via [`DeckConfig::builder()`] or using [`DeckConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_deck::{ContentStyle, DeckConfig};
///
/// let config = DeckConfig::builder()
///     .slide_count(4)
///     .style(ContentStyle::Paragraph)
///     .body_font("Georgia")
///     .build()
///     .unwrap();
/// assert_eq!(config.formatting.slide_count, 4);
/// ```
#[derive(Clone)]
pub struct DeckConfig {
    /// Deck appearance and slide count.
    pub formatting: FormattingConfig,

    /// LLM model identifier, e.g. "gpt-4.1-nano", "mistralai/mistral-7b-instruct".
    /// If None, uses provider default.
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "openrouter", "ollama").
    /// If None along with `provider`, the provider is auto-detected.
    pub provider_name: Option<String>,

    /// Pre-constructed completion provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn CompletionProvider>>,

    /// Pre-constructed image provider. If None and images are enabled,
    /// `PEXELS_API_KEY` is used to build the Pexels provider.
    pub image_provider: Option<Arc<dyn ImageProvider>>,

    /// Document writer. If None, the built-in PPTX writer is used.
    pub writer: Option<Arc<dyn DocumentWriter>>,

    /// Sampling temperature. Default: 0.7.
    ///
    /// Slide writing benefits from some variety; titles stay on topic at
    /// this setting with every mainstream model.
    pub temperature: f32,

    /// Maximum tokens for the titles request. Default: 200.
    pub title_max_tokens: Option<usize>,

    /// Maximum tokens for each slide body request. Default: 512.
    pub content_max_tokens: Option<usize>,

    /// Custom system prompt. If None, uses built-in default.
    pub system_prompt: Option<String>,

    /// Number of concurrent content / image requests. Default: 4.
    pub concurrency: usize,

    /// Per-completion timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Per-image (search + download) timeout in seconds. Default: 20.
    pub image_timeout_secs: u64,

    /// Directory for generated decks when `output_path` is None.
    /// Default: `generated_ppt`.
    pub output_dir: PathBuf,

    /// Exact output file. Overrides `output_dir`.
    pub output_path: Option<PathBuf>,

    /// Optional progress hook.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            formatting: FormattingConfig::default(),
            model: None,
            provider_name: None,
            provider: None,
            image_provider: None,
            writer: None,
            temperature: 0.7,
            title_max_tokens: Some(200),
            content_max_tokens: Some(512),
            system_prompt: None,
            concurrency: 4,
            api_timeout_secs: 60,
            image_timeout_secs: 20,
            output_dir: PathBuf::from("generated_ppt"),
            output_path: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for DeckConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeckConfig")
            .field("formatting", &self.formatting)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field(
                "provider",
                &self.provider.as_ref().map(|_| "<dyn CompletionProvider>"),
            )
            .field(
                "image_provider",
                &self.image_provider.as_ref().map(|_| "<dyn ImageProvider>"),
            )
            .field("writer", &self.writer.as_ref().map(|_| "<dyn DocumentWriter>"))
            .field("temperature", &self.temperature)
            .field("title_max_tokens", &self.title_max_tokens)
            .field("content_max_tokens", &self.content_max_tokens)
            .field("concurrency", &self.concurrency)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("image_timeout_secs", &self.image_timeout_secs)
            .field("output_dir", &self.output_dir)
            .field("output_path", &self.output_path)
            .finish()
    }
}

impl DeckConfig {
    /// Create a new builder for `DeckConfig`.
    pub fn builder() -> DeckConfigBuilder {
        DeckConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`DeckConfig`].
pub struct DeckConfigBuilder {
    config: DeckConfig,
}

impl fmt::Debug for DeckConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeckConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl DeckConfigBuilder {
    pub fn formatting(mut self, formatting: FormattingConfig) -> Self {
        self.config.formatting = formatting;
        self
    }

    pub fn slide_count(mut self, n: usize) -> Self {
        self.config.formatting.slide_count = n.clamp(MIN_SLIDE_COUNT, MAX_SLIDE_COUNT);
        self
    }

    pub fn style(mut self, style: ContentStyle) -> Self {
        self.config.formatting.style = style;
        self
    }

    pub fn title_slide_font_size(mut self, pt: u32) -> Self {
        self.config.formatting.title_slide_font_size = pt.clamp(MIN_FONT_SIZE_PT, MAX_FONT_SIZE_PT);
        self
    }

    pub fn slide_title_font_size(mut self, pt: u32) -> Self {
        self.config.formatting.slide_title_font_size = pt.clamp(MIN_FONT_SIZE_PT, MAX_FONT_SIZE_PT);
        self
    }

    pub fn body_font_size(mut self, pt: u32) -> Self {
        self.config.formatting.body_font_size = pt.clamp(MIN_FONT_SIZE_PT, MAX_FONT_SIZE_PT);
        self
    }

    pub fn title_font(mut self, family: impl AsRef<str>) -> Self {
        self.config.formatting.title_font = resolve_font_family(family.as_ref());
        self
    }

    pub fn body_font(mut self, family: impl AsRef<str>) -> Self {
        self.config.formatting.body_font = resolve_font_family(family.as_ref());
        self
    }

    pub fn include_images(mut self, v: bool) -> Self {
        self.config.formatting.include_images = v;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn image_provider(mut self, provider: Arc<dyn ImageProvider>) -> Self {
        self.config.image_provider = Some(provider);
        self
    }

    pub fn writer(mut self, writer: Arc<dyn DocumentWriter>) -> Self {
        self.config.writer = Some(writer);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn title_max_tokens(mut self, n: usize) -> Self {
        self.config.title_max_tokens = Some(n);
        self
    }

    pub fn content_max_tokens(mut self, n: usize) -> Self {
        self.config.content_max_tokens = Some(n);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn image_timeout_secs(mut self, secs: u64) -> Self {
        self.config.image_timeout_secs = secs;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_path = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// Setters clamp their inputs; this catches values assigned directly
    /// through [`Self::formatting`]. Font families are resolved here as
    /// well, so a placeholder never reaches the writer.
    pub fn build(mut self) -> Result<DeckConfig, DeckError> {
        let f = &mut self.config.formatting;
        f.title_font = resolve_font_family(&f.title_font);
        f.body_font = resolve_font_family(&f.body_font);
        let f = &self.config.formatting;
        if !(MIN_SLIDE_COUNT..=MAX_SLIDE_COUNT).contains(&f.slide_count) {
            return Err(DeckError::InvalidConfig(format!(
                "Slide count must be {MIN_SLIDE_COUNT}–{MAX_SLIDE_COUNT}, got {}",
                f.slide_count
            )));
        }
        for (name, size) in [
            ("title slide font size", f.title_slide_font_size),
            ("slide title font size", f.slide_title_font_size),
            ("body font size", f.body_font_size),
        ] {
            if !(MIN_FONT_SIZE_PT..=MAX_FONT_SIZE_PT).contains(&size) {
                return Err(DeckError::InvalidConfig(format!(
                    "{name} must be {MIN_FONT_SIZE_PT}–{MAX_FONT_SIZE_PT} pt, got {size}"
                )));
            }
        }
        if self.config.concurrency == 0 {
            return Err(DeckError::InvalidConfig("Concurrency must be ≥ 1".into()));
        }
        if self.config.api_timeout_secs == 0 {
            return Err(DeckError::InvalidConfig(
                "API timeout must be at least 1 second".into(),
            ));
        }
        if self.config.image_timeout_secs == 0 {
            return Err(DeckError::InvalidConfig(
                "Image timeout must be at least 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = DeckConfig::default();
        assert_eq!(c.formatting.slide_count, 5);
        assert_eq!(c.formatting.style, ContentStyle::Bullets);
        assert_eq!(c.formatting.title_font, "Calibri");
        assert!(!c.formatting.include_images);
        assert_eq!(c.output_dir, PathBuf::from("generated_ppt"));
    }

    #[test]
    fn slide_count_is_clamped() {
        let c = DeckConfig::builder().slide_count(50).build().unwrap();
        assert_eq!(c.formatting.slide_count, MAX_SLIDE_COUNT);
        let c = DeckConfig::builder().slide_count(0).build().unwrap();
        assert_eq!(c.formatting.slide_count, MIN_SLIDE_COUNT);
    }

    #[test]
    fn invalid_formatting_is_rejected() {
        let formatting = FormattingConfig {
            slide_count: 11,
            ..FormattingConfig::default()
        };
        let err = DeckConfig::builder().formatting(formatting).build().unwrap_err();
        assert!(err.to_string().contains("Slide count"));

        let formatting = FormattingConfig {
            body_font_size: 2,
            ..FormattingConfig::default()
        };
        let err = DeckConfig::builder().formatting(formatting).build().unwrap_err();
        assert!(err.to_string().contains("body font size"));
    }

    #[test]
    fn font_placeholder_falls_back_to_default() {
        assert_eq!(resolve_font_family("Custom"), DEFAULT_FONT_FAMILY);
        assert_eq!(resolve_font_family("  "), DEFAULT_FONT_FAMILY);
        assert_eq!(resolve_font_family("custom..."), DEFAULT_FONT_FAMILY);
    }

    #[test]
    fn placeholder_fonts_in_formatting_are_resolved() {
        let formatting = FormattingConfig {
            title_font: "Custom".into(),
            body_font: String::new(),
            ..FormattingConfig::default()
        };
        let c = DeckConfig::builder().formatting(formatting).build().unwrap();
        assert_eq!(c.formatting.title_font, DEFAULT_FONT_FAMILY);
        assert_eq!(c.formatting.body_font, DEFAULT_FONT_FAMILY);

        let formatting: FormattingConfig = serde_json::from_value(serde_json::json!({
            "title_font": "select a font",
            "body_font": "georgia",
        }))
        .unwrap();
        let c = DeckConfig::builder().formatting(formatting).build().unwrap();
        assert_eq!(c.formatting.title_font, DEFAULT_FONT_FAMILY);
        assert_eq!(c.formatting.body_font, "Georgia");
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        let err = DeckConfig::builder().api_timeout_secs(0).build().unwrap_err();
        assert!(err.to_string().contains("API timeout"));
        let err = DeckConfig::builder().image_timeout_secs(0).build().unwrap_err();
        assert!(err.to_string().contains("Image timeout"));
    }

    #[test]
    fn known_font_is_canonicalised() {
        assert_eq!(resolve_font_family("times new roman"), "Times New Roman");
        assert_eq!(resolve_font_family("ARIAL"), "Arial");
    }

    #[test]
    fn custom_font_is_kept() {
        assert_eq!(resolve_font_family(" Fira Sans "), "Fira Sans");
        let c = DeckConfig::builder().title_font("Fira Sans").build().unwrap();
        assert_eq!(c.formatting.title_font, "Fira Sans");
    }

    #[test]
    fn style_serialises_lowercase() {
        let json = serde_json::to_string(&ContentStyle::Paragraph).unwrap();
        assert_eq!(json, "\"paragraph\"");
    }
}

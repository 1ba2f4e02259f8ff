//! Deck generation entry points.
//!
//! [`build_deck`] runs the whole pipeline: titles, slide bodies, optional
//! pictures, rendering and the atomic file write. The smaller entry points
//! ([`generate_titles`], [`generate_content`], [`assemble`]) expose the
//! individual stages for callers that render or persist decks themselves.

use crate::config::{ContentStyle, DeckConfig};
use crate::error::{DeckError, ImageError};
use crate::output::{Deck, DeckOutput, DeckStats, SlideContent, SlideImage, SlideTitle};
use crate::pipeline::images::{ImageProvider, PexelsImageProvider};
use crate::pipeline::llm::{
    complete_with_timeout, CompletionProvider, CompletionRequest, LlmCompletionProvider,
};
use crate::pipeline::{sanitize, structure, titles};
use crate::prompts;
use crate::writer::{DocumentWriter, PptxWriter};
use edgequake_llm::ProviderFactory;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Model used when a provider is named without one.
pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// Longest topic-derived file stem.
const MAX_STEM_CHARS: usize = 80;

#[derive(Debug, Clone, Copy, Default)]
struct TokenUsage {
    input: u64,
    output: u64,
}

impl TokenUsage {
    fn add(&mut self, other: TokenUsage) {
        self.input += other.input;
        self.output += other.output;
    }
}

/// Ask the model for up to `count` slide titles on `topic`.
///
/// Returns fewer titles (possibly none) when the response holds fewer usable
/// lines; that is not an error.
pub async fn generate_titles(
    topic: &str,
    count: usize,
    config: &DeckConfig,
) -> Result<Vec<SlideTitle>, DeckError> {
    let topic = validate_topic(topic)?;
    let provider = resolve_provider(config)?;
    let (titles, _) = request_titles(provider.as_ref(), topic, count, config).await?;
    Ok(titles)
}

/// Ask the model for the body of one slide.
///
/// The request depends only on the title and the style; no earlier slide
/// is part of the prompt.
pub async fn generate_content(
    title: &SlideTitle,
    style: ContentStyle,
    config: &DeckConfig,
) -> Result<SlideContent, DeckError> {
    let provider = resolve_provider(config)?;
    let (content, _) = request_content(provider.as_ref(), title, style, config).await?;
    Ok(content)
}

/// Build the slide model for `topic` without pictures or a file.
pub async fn assemble(topic: &str, config: &DeckConfig) -> Result<Deck, DeckError> {
    let topic = validate_topic(topic)?;
    let provider = resolve_provider(config)?;
    let (deck, _) = assemble_with(&provider, topic, config).await?;
    Ok(deck)
}

/// Generate a deck for `topic` and write it to disk.
///
/// The file lands at `config.output_path` when set, otherwise at
/// `<output_dir>/<topic stem>_presentation.<ext>`. Any failed completion
/// aborts the run; picture lookups never do.
///
/// # Errors
/// - [`DeckError::EmptyTopic`] for a blank topic
/// - [`DeckError::ProviderNotConfigured`] when no provider can be resolved
/// - [`DeckError::TitleGenerationFailed`] / [`DeckError::ContentGenerationFailed`]
/// - [`DeckError::RenderFailed`] / [`DeckError::OutputWriteFailed`]
pub async fn build_deck(topic: &str, config: &DeckConfig) -> Result<DeckOutput, DeckError> {
    let total_start = Instant::now();
    let topic = validate_topic(topic)?;
    info!("Generating deck: {}", topic);

    // ── Step 1: Resolve provider ─────────────────────────────────────────
    let provider = resolve_provider(config)?;

    // ── Step 2: Titles and slide bodies ──────────────────────────────────
    let llm_start = Instant::now();
    let (mut deck, usage) = assemble_with(&provider, topic, config).await?;
    let llm_duration_ms = llm_start.elapsed().as_millis() as u64;

    // ── Step 3: Pictures (best-effort) ───────────────────────────────────
    let images_attached = if config.formatting.include_images {
        attach_images(&mut deck, config).await
    } else {
        0
    };

    // ── Step 4: Render ───────────────────────────────────────────────────
    let writer: Arc<dyn DocumentWriter> = config
        .writer
        .clone()
        .unwrap_or_else(|| Arc::new(PptxWriter));
    let path = output_path(topic, config, writer.extension());
    let formatting = config.formatting.clone();
    let (deck, rendered) = tokio::task::spawn_blocking(move || {
        let rendered = writer.render(&deck, &formatting);
        (deck, rendered)
    })
    .await
    .map_err(|e| DeckError::Internal(format!("render task failed: {e}")))?;
    let bytes = rendered?;

    // ── Step 5: Persist ──────────────────────────────────────────────────
    let file_size = write_atomic(&path, bytes).await?;

    let stats = DeckStats {
        requested_slides: config.formatting.slide_count,
        generated_slides: deck.slides.len(),
        images_attached,
        total_input_tokens: usage.input,
        total_output_tokens: usage.output,
        llm_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Deck complete: {} slides, {} bytes, {}ms total → {}",
        deck.total_slides(),
        file_size,
        stats.total_duration_ms,
        path.display()
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_deck_complete(deck.total_slides(), file_size);
    }

    Ok(DeckOutput {
        path,
        deck,
        stats,
        file_size,
    })
}

/// Synchronous wrapper around [`build_deck`].
///
/// Creates a temporary tokio runtime internally.
pub fn build_deck_sync(topic: &str, config: &DeckConfig) -> Result<DeckOutput, DeckError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DeckError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(build_deck(topic, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn validate_topic(topic: &str) -> Result<&str, DeckError> {
    let topic = topic.trim();
    if topic.is_empty() {
        Err(DeckError::EmptyTopic)
    } else {
        Ok(topic)
    }
}

fn request(config: &DeckConfig, user_prompt: String, max_tokens: Option<usize>) -> CompletionRequest {
    CompletionRequest {
        system_prompt: config
            .system_prompt
            .clone()
            .unwrap_or_else(|| prompts::DEFAULT_SYSTEM_PROMPT.to_string()),
        user_prompt,
        max_tokens,
        temperature: config.temperature,
    }
}

async fn request_titles(
    provider: &dyn CompletionProvider,
    topic: &str,
    count: usize,
    config: &DeckConfig,
) -> Result<(Vec<SlideTitle>, TokenUsage), DeckError> {
    let count = count.max(1);
    let req = request(
        config,
        prompts::titles_prompt(topic, count),
        config.title_max_tokens,
    );
    let completion = complete_with_timeout(provider, &req, config.api_timeout_secs)
        .await
        .map_err(|source| DeckError::TitleGenerationFailed {
            provider: provider.name().to_string(),
            source,
        })?;

    let cleaned = sanitize::sanitize(&completion.text);
    let extracted = titles::extract_titles(&cleaned, count);
    if extracted.is_empty() {
        warn!("No usable slide titles in the response for '{}'", topic);
    } else {
        debug!("Extracted {}/{} titles", extracted.len(), count);
    }

    let usage = TokenUsage {
        input: completion.input_tokens as u64,
        output: completion.output_tokens as u64,
    };
    Ok((extracted, usage))
}

async fn request_content(
    provider: &dyn CompletionProvider,
    title: &SlideTitle,
    style: ContentStyle,
    config: &DeckConfig,
) -> Result<(SlideContent, TokenUsage), DeckError> {
    let req = request(
        config,
        prompts::content_prompt(title.as_str(), style),
        config.content_max_tokens,
    );
    let completion = complete_with_timeout(provider, &req, config.api_timeout_secs)
        .await
        .map_err(|source| DeckError::ContentGenerationFailed {
            title: title.to_string(),
            provider: provider.name().to_string(),
            source,
        })?;

    let content = structure::structure(&sanitize::sanitize(&completion.text), style);
    if content.is_empty() {
        debug!("Slide '{}' has an empty body", title);
    }

    let usage = TokenUsage {
        input: completion.input_tokens as u64,
        output: completion.output_tokens as u64,
    };
    Ok((content, usage))
}

/// Titles, then one concurrent content request per title, re-paired by the
/// title's index.
async fn assemble_with(
    provider: &Arc<dyn CompletionProvider>,
    topic: &str,
    config: &DeckConfig,
) -> Result<(Deck, TokenUsage), DeckError> {
    let slide_count = config.formatting.slide_count;
    let style = config.formatting.style;

    let (slide_titles, mut usage) =
        request_titles(provider.as_ref(), topic, slide_count, config).await?;
    if let Some(ref cb) = config.progress_callback {
        let names: Vec<String> = slide_titles.iter().map(|t| t.to_string()).collect();
        cb.on_titles_ready(&names);
    }

    let total = slide_titles.len();
    // try_collect stops at the first error and drops the stream, which
    // cancels the requests still in flight.
    let mut contents: Vec<(usize, SlideContent, TokenUsage)> =
        stream::iter(slide_titles.iter().enumerate().map(|(idx, title)| {
            let provider = Arc::clone(provider);
            async move {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_slide_start(idx, total);
                }
                let (content, usage) =
                    request_content(provider.as_ref(), title, style, config).await?;
                if let Some(ref cb) = config.progress_callback {
                    cb.on_slide_complete(idx, total, content.text_len());
                }
                Ok::<_, DeckError>((idx, content, usage))
            }
        }))
        .buffer_unordered(config.concurrency)
        .try_collect()
        .await?;

    contents.sort_by_key(|(idx, _, _)| *idx);
    let mut bodies = Vec::with_capacity(contents.len());
    for (_, content, slide_usage) in contents {
        usage.add(slide_usage);
        bodies.push(content);
    }

    Ok((Deck::from_parts(topic, slide_titles, bodies), usage))
}

/// Look up one picture per slide; returns how many were attached.
async fn attach_images(deck: &mut Deck, config: &DeckConfig) -> usize {
    let Some(provider) = resolve_image_provider(config) else {
        warn!(
            "Images requested but no image provider is configured (set {}); continuing without",
            crate::pipeline::images::PEXELS_API_KEY_ENV
        );
        return 0;
    };
    let timeout_secs = config.image_timeout_secs;

    let found: Vec<(usize, Option<SlideImage>)> =
        stream::iter(deck.slides.iter().enumerate().map(|(idx, slide)| {
            let provider = Arc::clone(&provider);
            let query = slide.title.to_string();
            async move {
                let result = match tokio::time::timeout(
                    Duration::from_secs(timeout_secs),
                    provider.search_image(&query),
                )
                .await
                {
                    Ok(r) => r,
                    Err(_) => Err(ImageError::Timeout {
                        query: query.clone(),
                        secs: timeout_secs,
                    }),
                };
                match result {
                    Ok(img) => (idx, Some(img)),
                    Err(ImageError::NotFound { .. }) => {
                        debug!("No picture for '{}'", query);
                        (idx, None)
                    }
                    Err(e) => {
                        warn!("Skipping picture: {}", e);
                        (idx, None)
                    }
                }
            }
        }))
        .buffer_unordered(config.concurrency)
        .collect()
        .await;

    let mut attached = 0;
    for (idx, image) in found {
        let has_image = image.is_some();
        if let Some(ref cb) = config.progress_callback {
            cb.on_image(idx, has_image);
        }
        if let (Some(img), Some(slide)) = (image, deck.slides.get_mut(idx)) {
            slide.image = Some(img);
            attached += 1;
        }
    }
    info!("Attached {}/{} pictures", attached, deck.slides.len());
    attached
}

fn resolve_image_provider(config: &DeckConfig) -> Option<Arc<dyn ImageProvider>> {
    if let Some(ref provider) = config.image_provider {
        return Some(Arc::clone(provider));
    }
    PexelsImageProvider::from_env(config.image_timeout_secs)
        .map(|p| Arc::new(p) as Arc<dyn ImageProvider>)
}

fn create_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn CompletionProvider>, DeckError> {
    let llm = ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        DeckError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })?;
    Ok(Arc::new(LlmCompletionProvider::new(
        llm,
        format!("{provider_name}/{model}"),
    )))
}

/// Resolve the completion provider, from most-specific to least-specific:
///
/// 1. **Pre-built provider** (`config.provider`), used as-is.
/// 2. **Named provider + model** (`config.provider_name`), created through
///    [`ProviderFactory::create_llm_provider`], which reads the matching
///    API key from the environment.
/// 3. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`).
/// 4. **`OPENAI_API_KEY`** present: OpenAI with the configured model.
/// 5. **Full auto-detection** (`ProviderFactory::from_env`).
pub fn resolve_provider(config: &DeckConfig) -> Result<Arc<dyn CompletionProvider>, DeckError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
        return create_provider(name, model);
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
            return create_provider("openai", model);
        }
    }

    let (llm, _embedding) =
        ProviderFactory::from_env().map_err(|e| DeckError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;
    Ok(Arc::new(LlmCompletionProvider::new(llm, "auto")))
}

/// Where the deck for `topic` is written.
pub fn output_path(topic: &str, config: &DeckConfig, extension: &str) -> PathBuf {
    config.output_path.clone().unwrap_or_else(|| {
        config
            .output_dir
            .join(format!("{}_presentation.{}", safe_stem(topic), extension))
    })
}

/// Reduce a topic to something every file system accepts.
fn safe_stem(topic: &str) -> String {
    let mut stem = String::new();
    for c in topic.trim().chars() {
        if c.is_alphanumeric() || c == '-' {
            stem.push(c);
        } else if (c.is_whitespace() || c == '_') && !stem.ends_with('_') && !stem.is_empty() {
            stem.push('_');
        }
    }
    let stem: String = stem.trim_end_matches('_').chars().take(MAX_STEM_CHARS).collect();
    if stem.is_empty() {
        "deck".to_string()
    } else {
        stem
    }
}

/// Write via a temp file in the target directory, then rename into place.
async fn write_atomic(path: &Path, bytes: Vec<u8>) -> Result<u64, DeckError> {
    let write_err = |source: std::io::Error| DeckError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tokio::fs::create_dir_all(&parent).await.map_err(write_err)?;

    let target = path.to_path_buf();
    let size = bytes.len() as u64;
    tokio::task::spawn_blocking(move || -> std::io::Result<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .map_err(|e| DeckError::Internal(format!("write task failed: {e}")))?
    .map_err(write_err)?;

    debug!("Wrote {} bytes to {}", size, path.display());
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_stem_replaces_spaces() {
        assert_eq!(safe_stem("Renewable Energy"), "Renewable_Energy");
    }

    #[test]
    fn safe_stem_drops_path_characters() {
        assert_eq!(safe_stem("../etc/passwd"), "etcpasswd");
        assert_eq!(safe_stem("AI: past, present & future"), "AI_past_present_future");
    }

    #[test]
    fn safe_stem_never_empty() {
        assert_eq!(safe_stem("???"), "deck");
    }

    #[test]
    fn safe_stem_caps_length() {
        assert_eq!(safe_stem(&"a".repeat(500)).chars().count(), MAX_STEM_CHARS);
    }

    #[test]
    fn default_output_path() {
        let config = DeckConfig::default();
        assert_eq!(
            output_path("Renewable Energy", &config, "pptx"),
            PathBuf::from("generated_ppt/Renewable_Energy_presentation.pptx")
        );
    }

    #[test]
    fn explicit_output_path_wins() {
        let config = DeckConfig::builder()
            .output_path("/tmp/out.pptx")
            .build()
            .unwrap();
        assert_eq!(
            output_path("Anything", &config, "pptx"),
            PathBuf::from("/tmp/out.pptx")
        );
    }

    #[test]
    fn blank_topic_rejected() {
        assert!(matches!(validate_topic("   "), Err(DeckError::EmptyTopic)));
        assert_eq!(validate_topic("  Mars ").unwrap(), "Mars");
    }

    #[tokio::test]
    async fn atomic_write_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/deck.pptx");
        let size = write_atomic(&path, b"PK\x03\x04".to_vec()).await.unwrap();
        assert_eq!(size, 4);
        assert_eq!(std::fs::read(&path).unwrap(), b"PK\x03\x04");
    }
}

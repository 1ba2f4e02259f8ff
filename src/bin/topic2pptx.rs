//! CLI binary for edgequake-deck.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `DeckConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_deck::{
    build_deck, generate_titles, ContentStyle, DeckConfig, DeckProgressCallback, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: a spinner while titles are generated, then a bar with
/// one log line per finished slide. Slides may finish out of order.
struct CliProgressCallback {
    bar: ProgressBar,
    titles: Mutex<Vec<String>>,
    start_times: Mutex<HashMap<usize, Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Outlining");
        bar.set_message("Asking for slide titles…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            titles: Mutex::new(Vec::new()),
            start_times: Mutex::new(HashMap::new()),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>2}/{len} slides  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Writing");
    }

    fn title(&self, index: usize) -> String {
        lock(&self.titles)
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("slide {}", index + 1))
    }
}

impl DeckProgressCallback for CliProgressCallback {
    fn on_titles_ready(&self, titles: &[String]) {
        *lock(&self.titles) = titles.to_vec();
        self.activate_bar(titles.len());
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("{} slide titles", titles.len()))
        ));
        for (i, t) in titles.iter().enumerate() {
            self.bar.println(format!("  {} {}", dim(&format!("{:>2}.", i + 1)), t));
        }
    }

    fn on_slide_start(&self, index: usize, _total: usize) {
        lock(&self.start_times).insert(index, Instant::now());
        self.bar.set_message(self.title(index));
    }

    fn on_slide_complete(&self, index: usize, total: usize, text_len: usize) {
        let elapsed_ms = lock(&self.start_times)
            .remove(&index)
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.bar.println(format!(
            "  {} Slide {:>2}/{:<2}  {:<40}  {}  {}",
            green("✓"),
            index + 1,
            total,
            self.title(index),
            dim(&format!("{text_len:>4} chars")),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        self.bar.inc(1);
    }

    fn on_image(&self, index: usize, attached: bool) {
        if attached {
            self.bar
                .set_message(format!("picture for {}", self.title(index)));
        }
    }

    fn on_deck_complete(&self, _total_slides: usize, _file_size: u64) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Five bulleted slides, written to generated_ppt/
  topic2pptx "Renewable Energy"

  # Eight paragraph slides with pictures, to a chosen file
  topic2pptx --slides 8 --style paragraph --images "History of Jazz" -o jazz.pptx

  # Fonts and sizes
  topic2pptx --title-font Georgia --body-font Verdana --body-font-size 18 "Sleep Science"

  # Only the outline
  topic2pptx --titles-only "Quantum Computing"

  # Use a specific provider and model
  topic2pptx --provider anthropic --model claude-sonnet-4-20250514 "Volcanoes"

  # Download link for embedding in a web page
  topic2pptx --data-uri --quiet "Coral Reefs" > link.txt

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  OPENROUTER_API_KEY      OpenRouter API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama, openrouter)
  EDGEQUAKE_MODEL         Override model ID
  PEXELS_API_KEY          Enables slide pictures (--images)
"#;

/// Generate PowerPoint decks from a topic using LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "topic2pptx",
    version,
    about = "Generate a PowerPoint presentation from a topic using LLMs",
    long_about = "Generate a complete .pptx presentation from a single topic. The model \
proposes slide titles and writes each slide; output is cleaned of markup and filler \
before it reaches a slide. Supports OpenAI, Anthropic, Google Gemini, OpenRouter, and \
any OpenAI-compatible endpoint (Ollama, vLLM, LiteLLM, etc.).",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Subject of the presentation.
    topic: String,

    /// Write the presentation to this file instead of the output directory.
    #[arg(short, long, env = "TOPIC2PPTX_OUTPUT")]
    output: Option<PathBuf>,

    /// Directory for generated decks.
    #[arg(long, env = "TOPIC2PPTX_OUTPUT_DIR", default_value = "generated_ppt")]
    output_dir: PathBuf,

    /// Number of content slides (2–10).
    #[arg(short = 'n', long, env = "TOPIC2PPTX_SLIDES", default_value_t = 5,
          value_parser = clap::value_parser!(u32).range(2..=10))]
    slides: u32,

    /// Slide body layout.
    #[arg(long, env = "TOPIC2PPTX_STYLE", value_enum, default_value = "bullets")]
    style: StyleArg,

    /// Title slide font size in points.
    #[arg(long, env = "TOPIC2PPTX_TITLE_SLIDE_FONT_SIZE", default_value_t = 40,
          value_parser = clap::value_parser!(u32).range(8..=96))]
    title_slide_font_size: u32,

    /// Slide title font size in points.
    #[arg(long, env = "TOPIC2PPTX_SLIDE_TITLE_FONT_SIZE", default_value_t = 30,
          value_parser = clap::value_parser!(u32).range(8..=96))]
    slide_title_font_size: u32,

    /// Body font size in points.
    #[arg(long, env = "TOPIC2PPTX_BODY_FONT_SIZE", default_value_t = 16,
          value_parser = clap::value_parser!(u32).range(8..=96))]
    body_font_size: u32,

    /// Title font family (Calibri, Arial, Helvetica, Times New Roman, Georgia, Verdana, Segoe UI, or any installed font).
    #[arg(long, env = "TOPIC2PPTX_TITLE_FONT", default_value = "Calibri")]
    title_font: String,

    /// Body font family.
    #[arg(long, env = "TOPIC2PPTX_BODY_FONT", default_value = "Calibri")]
    body_font: String,

    /// Add a stock picture to each slide (needs PEXELS_API_KEY).
    #[arg(long, env = "TOPIC2PPTX_IMAGES")]
    images: bool,

    /// LLM model ID (e.g. gpt-4.1-nano, gpt-4.1, claude-sonnet-4-20250514).
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, openrouter, azure.
    #[arg(
        long,
        env = "EDGEQUAKE_LLM_PROVIDER",
        long_help = "LLM provider. Auto-detected from API key env vars if not set.\n\
          Supported: openai, anthropic, gemini, azure, ollama, openrouter, or any OpenAI-compatible URL."
    )]
    provider: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "TOPIC2PPTX_TEMPERATURE", default_value_t = 0.7)]
    temperature: f32,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "TOPIC2PPTX_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Number of concurrent slide requests.
    #[arg(short, long, env = "TOPIC2PPTX_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Per-request LLM timeout in seconds.
    #[arg(long, env = "TOPIC2PPTX_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Per-picture download timeout in seconds.
    #[arg(long, env = "TOPIC2PPTX_IMAGE_TIMEOUT", default_value_t = 20)]
    image_timeout: u64,

    /// Print the slide titles only; no file is written.
    #[arg(long)]
    titles_only: bool,

    /// Print the deck model and stats as JSON.
    #[arg(long, env = "TOPIC2PPTX_JSON")]
    json: bool,

    /// Print a base64 data: URI of the presentation to stdout.
    #[arg(long)]
    data_uri: bool,

    /// Disable progress bar.
    #[arg(long, env = "TOPIC2PPTX_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "TOPIC2PPTX_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "TOPIC2PPTX_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum StyleArg {
    Bullets,
    Paragraph,
}

impl From<StyleArg> for ContentStyle {
    fn from(v: StyleArg) -> Self {
        match v {
            StyleArg::Bullets => ContentStyle::Bullets,
            StyleArg::Paragraph => ContentStyle::Paragraph,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Library INFO logs are suppressed while the progress bar is active.
    let show_progress =
        !cli.quiet && !cli.no_progress && !cli.json && !cli.titles_only && !cli.data_uri;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn DeckProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb).await?;

    // ── Titles-only mode ─────────────────────────────────────────────────
    if cli.titles_only {
        let titles = generate_titles(&cli.topic, config.formatting.slide_count, &config)
            .await
            .context("Title generation failed")?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&titles).context("Failed to serialise titles")?
            );
        } else {
            for t in &titles {
                println!("{t}");
            }
        }
        return Ok(());
    }

    // ── Run generation ───────────────────────────────────────────────────
    let output = build_deck(&cli.topic, &config)
        .await
        .context("Deck generation failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if cli.data_uri {
        let uri = output
            .data_uri()
            .with_context(|| format!("Failed to read back {}", output.path.display()))?;
        println!("{uri}");
    } else {
        println!("{}", output.path.display());
    }

    if !cli.quiet && !cli.json {
        let stats = &output.stats;
        eprintln!(
            "{}  {}/{} slides  {}ms  →  {}",
            if stats.generated_slides == stats.requested_slides {
                green("✔")
            } else {
                cyan("⚠")
            },
            stats.generated_slides,
            stats.requested_slides,
            stats.total_duration_ms,
            bold(&output.path.display().to_string()),
        );
        eprintln!(
            "   {} tokens in  /  {} tokens out",
            dim(&stats.total_input_tokens.to_string()),
            dim(&stats.total_output_tokens.to_string()),
        );
        if cli.images {
            eprintln!(
                "   {} pictures attached",
                dim(&stats.images_attached.to_string())
            );
        }
    }

    Ok(())
}

/// Map CLI args to `DeckConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<DeckConfig> {
    let system_prompt = if let Some(ref path) = cli.system_prompt {
        Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read system prompt from {:?}", path))?,
        )
    } else {
        None
    };

    let mut builder = DeckConfig::builder()
        .slide_count(cli.slides as usize)
        .style(cli.style.into())
        .title_slide_font_size(cli.title_slide_font_size)
        .slide_title_font_size(cli.slide_title_font_size)
        .body_font_size(cli.body_font_size)
        .title_font(&cli.title_font)
        .body_font(&cli.body_font)
        .include_images(cli.images)
        .temperature(cli.temperature)
        .concurrency(cli.concurrency)
        .api_timeout_secs(cli.api_timeout)
        .image_timeout_secs(cli.image_timeout)
        .output_dir(&cli.output_dir);

    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(prompt) = system_prompt {
        builder = builder.system_prompt(prompt);
    }
    if let Some(ref path) = cli.output {
        builder = builder.output_path(path);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn env_of(id: &str) -> Option<String> {
        Cli::command()
            .get_arguments()
            .find(|a| a.get_id() == id)
            .and_then(|a| a.get_env())
            .map(|e| e.to_string_lossy().into_owned())
    }

    #[test]
    fn provider_env_matches_library() {
        assert_eq!(env_of("provider").as_deref(), Some("EDGEQUAKE_LLM_PROVIDER"));
        assert_eq!(env_of("model").as_deref(), Some("EDGEQUAKE_MODEL"));
        assert!(AFTER_HELP.contains("EDGEQUAKE_LLM_PROVIDER"));
    }

    #[tokio::test]
    async fn zero_image_timeout_is_rejected() {
        let cli = Cli::parse_from(["topic2pptx", "Mars", "--image-timeout", "0"]);
        assert!(build_config(&cli, None).await.is_err());
    }
}

//! Prompts for slide title and slide body generation.
//!
//! Every prompt lives here so wording changes touch exactly one file and
//! unit tests can inspect prompts without calling an LLM.
//!
//! Callers can override the system prompt via
//! [`crate::config::DeckConfig::system_prompt`]; the user prompts are
//! always built from the templates below so the same inputs produce the
//! same request.

use crate::config::ContentStyle;

/// Default system prompt shared by title and content requests.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a helpful assistant that writes presentation slides.

Follow these rules precisely:
- Write plain text only: no Markdown, no HTML, no emphasis markers
- Do NOT introduce your answer ("Here is...", "Sure...") or add closing remarks
- Keep every line short enough to fit on a slide"#;

/// Prompt asking for `count` slide titles about `topic`.
pub fn titles_prompt(topic: &str, count: usize) -> String {
    format!(
        "Generate {count} slide titles for a presentation on the topic: {topic}.\n\
         Return exactly one title per line and nothing else."
    )
}

/// Prompt asking for the body of one slide.
///
/// Depends only on the slide title and the style so each slide can be
/// generated independently of the others.
pub fn content_prompt(title: &str, style: ContentStyle) -> String {
    match style {
        ContentStyle::Bullets => format!(
            "Generate content for a slide titled: '{title}'.\n\
             Write 3 to 5 concise bullet points, one per line."
        ),
        ContentStyle::Paragraph => format!(
            "Generate content for a slide titled: '{title}'.\n\
             Write a single concise paragraph of 3 to 4 sentences."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_prompt_is_deterministic() {
        let a = titles_prompt("Renewable Energy", 3);
        assert_eq!(a, titles_prompt("Renewable Energy", 3));
        assert!(a.contains("Generate 3 slide titles"));
        assert!(a.contains("Renewable Energy"));
    }

    #[test]
    fn content_prompt_follows_style() {
        assert!(content_prompt("Solar Power", ContentStyle::Bullets).contains("bullet points"));
        assert!(content_prompt("Solar Power", ContentStyle::Paragraph).contains("paragraph"));
        assert!(content_prompt("Solar Power", ContentStyle::Bullets).contains("'Solar Power'"));
    }
}

//! Content structuring: sanitised slide body → [`SlideContent`].

use crate::config::ContentStyle;
use crate::output::SlideContent;
use crate::pipeline::sanitize::SanitizedText;

/// Characters stripped from the left edge of every bullet line.
const BULLET_GLYPHS: &[char] = &['-', '•', '*', '–', '·', '▪', '\t', ' '];

/// Shape sanitised text into bullets or a paragraph.
///
/// `Bullets` keeps one entry per non-empty line with leading bullet glyphs
/// removed; the list may be empty. `Paragraph` keeps the whole text as a
/// single block, line breaks included.
pub fn structure(sanitized: &SanitizedText, style: ContentStyle) -> SlideContent {
    match style {
        ContentStyle::Bullets => SlideContent::Bullets(
            sanitized
                .lines()
                .map(|line| line.trim_start_matches(BULLET_GLYPHS).trim_end())
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        ContentStyle::Paragraph => SlideContent::Paragraph(sanitized.as_str().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::sanitize::sanitize;

    #[test]
    fn bullets_strip_glyphs() {
        assert_eq!(
            structure(&sanitize("- Point A\n• Point B"), ContentStyle::Bullets),
            SlideContent::Bullets(vec!["Point A".into(), "Point B".into()])
        );
    }

    #[test]
    fn bullets_strip_mixed_runs() {
        assert_eq!(
            structure(&sanitize("\t- * Nested\n  – Dash\n· Dot"), ContentStyle::Bullets),
            SlideContent::Bullets(vec!["Nested".into(), "Dash".into(), "Dot".into()])
        );
    }

    #[test]
    fn bullets_from_html_list() {
        assert_eq!(
            structure(&sanitize("<li>Fast</li><li>Cheap</li>"), ContentStyle::Bullets),
            SlideContent::Bullets(vec!["Fast".into(), "Cheap".into()])
        );
    }

    #[test]
    fn bullets_drop_glyph_only_lines() {
        assert_eq!(
            structure(&sanitize("-\n•\nReal"), ContentStyle::Bullets),
            SlideContent::Bullets(vec!["Real".into()])
        );
    }

    #[test]
    fn empty_bullets() {
        assert_eq!(
            structure(&sanitize(""), ContentStyle::Bullets),
            SlideContent::Bullets(vec![])
        );
    }

    #[test]
    fn paragraph_preserves_lines() {
        assert_eq!(
            structure(&sanitize("Line one\nLine two"), ContentStyle::Paragraph),
            SlideContent::Paragraph("Line one\nLine two".into())
        );
    }

    #[test]
    fn empty_paragraph() {
        assert_eq!(
            structure(&sanitize(""), ContentStyle::Paragraph),
            SlideContent::Paragraph(String::new())
        );
    }
}

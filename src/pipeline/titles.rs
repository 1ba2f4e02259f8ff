//! Title extraction: sanitised title output → ordered slide titles.
//!
//! Models number their lists in every conceivable way ("1.", "2)", "3 -",
//! "Slide 4:", "- ", "## ") and sometimes quote each title. The extractor
//! strips those prefixes, rejects fragments of two characters or fewer,
//! drops repeated titles and caps the result at the requested count.

use crate::output::SlideTitle;
use crate::pipeline::sanitize::SanitizedText;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Titles of this many characters or fewer are artefacts, not titles.
const MIN_TITLE_CHARS: usize = 2;

// Leading markdown/bullet glyphs and an optional "Slide N" label, then one
// of: dotted numbering ("1.1 ", "2.3.1. "), a number with a separator
// ("1. ", "2) ", "3 - "), or a bare one- or two-digit number. Every form
// needs trailing whitespace, so "3D Printing" and "2024 Election" survive.
static RE_ENUMERATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:[#>*•·\-–—]+\s*)*(?:(?i:slide)\s*\d+\s*[:.)\-–—]?\s*)?(?:\d+(?:\.\d+)+[.):\-–—]?\s+|\d+\s*[.):\-–—]\s+|\d{1,2}\s+)?[\s\-–—]*",
    )
    .unwrap()
});

/// Extract at most `want` slide titles from sanitised model output.
///
/// Returns fewer titles when the model delivered fewer usable lines, and
/// an empty vector for empty input. `want` of 0 is treated as 1.
pub fn extract_titles(sanitized: &SanitizedText, want: usize) -> Vec<SlideTitle> {
    let want = want.max(1);
    let mut seen = HashSet::new();

    sanitized
        .lines()
        .map(clean_title_line)
        .filter(|line| line.chars().count() > MIN_TITLE_CHARS)
        .filter(|line| seen.insert(line.to_lowercase()))
        .filter_map(SlideTitle::new)
        .take(want)
        .collect()
}

/// Strip enumeration and wrapping quotes from a single line.
fn clean_title_line(line: &str) -> String {
    let stripped = RE_ENUMERATION.replace(line, "");
    unquote(stripped.trim()).trim().to_string()
}

/// Remove one pair of wrapping quotes, if present.
fn unquote(s: &str) -> &str {
    const PAIRS: &[(char, char)] = &[('"', '"'), ('“', '”'), ('\'', '\''), ('‘', '’')];
    for &(open, close) in PAIRS {
        if s.chars().count() >= 2 && s.starts_with(open) && s.ends_with(close) {
            return &s[open.len_utf8()..s.len() - close.len_utf8()];
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::sanitize::sanitize;

    fn titles(raw: &str, want: usize) -> Vec<String> {
        extract_titles(&sanitize(raw), want)
            .into_iter()
            .map(|t| t.as_str().to_string())
            .collect()
    }

    #[test]
    fn strips_leading_enumeration() {
        assert_eq!(titles("1. Intro\n2. Summary", 2), vec!["Intro", "Summary"]);
    }

    #[test]
    fn strips_varied_prefixes() {
        let raw = "1) Overview\n2 - Costs\n- Benefits\n• Risks\nSlide 5: Outlook\n## 6. Next Steps";
        assert_eq!(
            titles(raw, 10),
            vec!["Overview", "Costs", "Benefits", "Risks", "Outlook", "Next Steps"]
        );
    }

    #[test]
    fn keeps_leading_digits_that_are_part_of_the_title() {
        assert_eq!(titles("3D Printing Basics", 1), vec!["3D Printing Basics"]);
        assert_eq!(
            titles("2024 Election Trends\n1. 1999 Retrospective", 2),
            vec!["2024 Election Trends", "1999 Retrospective"]
        );
        assert_eq!(titles("2024-2025 Outlook", 1), vec!["2024-2025 Outlook"]);
    }

    #[test]
    fn strips_dotted_numbering() {
        assert_eq!(
            titles("1.1 Overview\n1.2. Scope\n2.3.1) Details", 3),
            vec!["Overview", "Scope", "Details"]
        );
    }

    #[test]
    fn strips_wrapping_quotes() {
        assert_eq!(titles("1. \"The Big Picture\"", 1), vec!["The Big Picture"]);
        assert_eq!(titles("“Why It Matters”", 1), vec!["Why It Matters"]);
    }

    #[test]
    fn rejects_short_fragments() {
        assert_eq!(titles("1.\n-\nab\nReal Title", 5), vec!["Real Title"]);
    }

    #[test]
    fn never_exceeds_requested_count() {
        let raw = "A one\nB two\nC three\nD four\nE five";
        for want in 1..=7 {
            assert!(titles(raw, want).len() <= want);
        }
        assert_eq!(titles(raw, 3).len(), 3);
    }

    #[test]
    fn fewer_lines_than_requested() {
        assert_eq!(titles("Only One", 5), vec!["Only One"]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(titles("", 3).is_empty());
        assert!(titles("Here are your titles:", 3).is_empty());
    }

    #[test]
    fn duplicates_are_dropped() {
        assert_eq!(
            titles("1. Solar Power\n2. solar power\n3. Wind", 3),
            vec!["Solar Power", "Wind"]
        );
    }

    #[test]
    fn renewable_energy_scenario() {
        let raw = "1. Solar Power\n2. Wind Energy\n3. Hydro Power\nHere is extra text";
        assert_eq!(
            titles(raw, 3),
            vec!["Solar Power", "Wind Energy", "Hydro Power"]
        );
    }

    #[test]
    fn zero_want_is_treated_as_one() {
        assert_eq!(titles("First\nSecond", 0), vec!["First"]);
    }
}

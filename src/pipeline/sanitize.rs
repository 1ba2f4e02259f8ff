//! Sanitisation: deterministic removal of generation artefacts.
//!
//! Chat models rarely return exactly what the prompt asks for. Typical
//! artefacts in slide-writing output:
//!
//! - HTML remnants (`<li>Fast</li>`, `<br/>`, `<p>…</p>`)
//! - Markdown emphasis (`**Solar Power**`, `_key point_`)
//! - Template tokens leaking from instruct models (`<s>`, `[INST]`, `<|im_end|>`)
//! - Conversational preambles ("Here are 5 slide titles:", "Sure!")
//! - Blank lines and fence lines around the actual answer
//!
//! [`sanitize`] strips all of these and returns a [`SanitizedText`]: no
//! markup tags, no emphasis delimiters, no filler lines, no blank lines.
//!
//! ## Rule Order
//!
//! Structural tags are turned into newlines *before* generic tag stripping
//! so list and paragraph boundaries survive. Emphasis is removed after tags,
//! filler lines are dropped before blank lines are collapsed, and the final
//! trim runs last.
//!
//! The whole chain is repeated until the text stops changing. Every rule
//! only ever shortens its input (or swaps `\r` for `\n`), so the loop
//! terminates, and the result is a fixed point: sanitising twice is the
//! same as sanitising once.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::ops::Deref;

/// Model output with every generation artefact removed.
///
/// Only [`sanitize`] constructs this type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SanitizedText(String);

impl SanitizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for SanitizedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip generation artefacts from raw model output.
///
/// Rules (applied in order, repeated until nothing changes):
/// 1. Normalise line endings (CRLF/CR → LF)
/// 2. Remove invisible Unicode (zero-width spaces, BOM, soft hyphens)
/// 3. Drop code-fence lines (```` ``` ````, ```` ```text ````)
/// 4. Decode common HTML entities
/// 5. Turn structural closing/break tags into newlines
/// 6. Remove all remaining angle-bracket tags
/// 7. Remove markdown bold/italic delimiters, keeping the text
/// 8. Remove model-special tokens (`[INST]`, `[/INST]`, `<<SYS>>` remnants)
/// 9. Drop conversational filler lines ("Here is…", "Sure…", "Certainly…")
/// 10. Trim trailing whitespace per line
/// 11. Collapse blank lines
/// 12. Trim the whole text
///
/// Empty input yields empty output.
pub fn sanitize(raw: &str) -> SanitizedText {
    let mut current = sanitize_pass(raw);
    loop {
        let next = sanitize_pass(&current);
        if next == current {
            return SanitizedText(current);
        }
        current = next;
    }
}

fn sanitize_pass(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    let s = drop_fence_lines(&s);
    let s = decode_entities(&s);
    let s = break_structural_tags(&s);
    let s = strip_tags(&s);
    let s = strip_emphasis(&s);
    let s = strip_special_tokens(&s);
    let s = drop_filler_lines(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    s.trim().to_string()
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Remove invisible Unicode characters ─────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input
        .replace(
            ['\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}'],
            "",
        )
        .replace('\u{00A0}', " ")
}

// ── Rule 3: Drop code-fence lines ────────────────────────────────────────────

static RE_FENCE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*```[\w-]*\s*$").unwrap());

fn drop_fence_lines(input: &str) -> String {
    input
        .split('\n')
        .filter(|line| !RE_FENCE_LINE.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 4: Decode HTML entities ─────────────────────────────────────────────

fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    input
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

// ── Rule 5: Structural tags → newline ────────────────────────────────────────

static RE_STRUCTURAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</\s*(?:li|p|div|h[1-6]|tr)\s*>|<\s*br\s*/?\s*>").unwrap()
});

fn break_structural_tags(input: &str) -> String {
    RE_STRUCTURAL.replace_all(input, "\n").into_owned()
}

// ── Rule 6: Remove remaining tags ────────────────────────────────────────────
//
// A tag opens with `<`, an optional `/`, `!` or `?`, then a letter or `|`
// (`<|im_end|>`). Requiring that second character keeps comparisons such as
// "x < 5 and y > 3" intact.

static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[/!?]?[A-Za-z|][^<>]*>").unwrap());

fn strip_tags(input: &str) -> String {
    let mut s = input.to_string();
    // Nested input such as `<<b>i>` exposes a new tag once the inner one goes.
    while RE_TAG.is_match(&s) {
        s = RE_TAG.replace_all(&s, "").into_owned();
    }
    s
}

// ── Rule 7: Remove markdown emphasis ─────────────────────────────────────────

static RE_STAR3: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*\*([^*\n]+?)\*\*\*").unwrap());
static RE_STAR2: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*\n]+?)\*\*").unwrap());
// A single-star pair must hug its text; "* item" at line start is a bullet.
static RE_STAR1: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*\s][^*\n]*?)\*").unwrap());
static RE_UNDER2: Lazy<Regex> = Lazy::new(|| Regex::new(r"__([^_\n]+?)__").unwrap());
// Word boundaries keep snake_case identifiers intact.
static RE_UNDER1: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b_([^_\n]+?)_\b").unwrap());

fn strip_emphasis(input: &str) -> String {
    let s = RE_STAR3.replace_all(input, "${1}");
    let s = RE_STAR2.replace_all(&s, "${1}");
    let s = RE_STAR1.replace_all(&s, "${1}");
    let s = RE_UNDER2.replace_all(&s, "${1}");
    RE_UNDER1.replace_all(&s, "${1}").into_owned()
}

// ── Rule 8: Remove model-special tokens ──────────────────────────────────────
//
// Angle-bracket tokens (`<s>`, `</s>`, `<|eot_id|>`) are already gone after
// rule 6; `<<SYS>>` leaves an empty `<>` behind.

static RE_SPECIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[\s*/?\s*(?:INST|SYS|BOS|EOS)\s*\]|<>").unwrap());

fn strip_special_tokens(input: &str) -> String {
    RE_SPECIAL.replace_all(input, "").into_owned()
}

// ── Rule 9: Drop conversational filler ───────────────────────────────────────

static RE_FILLER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:here\s+is|here\s+are|here's|here’s|sure|certainly|below\s+are|below\s+is|i\s+have\s+generated|i've\s+generated|i’ve\s+generated|of\s+course)(?:[\s,!.:]|$)",
    )
    .unwrap()
});

fn drop_filler_lines(input: &str) -> String {
    input
        .split('\n')
        .filter(|line| !RE_FILLER.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 10: Trim trailing whitespace per line ───────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 11: Collapse blank lines ────────────────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n").into_owned()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Generic tag pattern used to check that no markup survives.
    static RE_ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[A-Za-z][^<>]*>").unwrap());

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize("").as_str(), "");
        assert_eq!(sanitize("   \n\n  ").as_str(), "");
    }

    #[test]
    fn test_structural_tags_become_lines() {
        assert_eq!(sanitize("<li>Fast</li><li>Cheap</li>").as_str(), "Fast\nCheap");
        assert_eq!(sanitize("one<br>two<br/>three<BR />four").as_str(), "one\ntwo\nthree\nfour");
        assert_eq!(sanitize("<p>Intro</p><p>Body</p>").as_str(), "Intro\nBody");
        assert_eq!(sanitize("<div>a</div><div>b</div>").as_str(), "a\nb");
    }

    #[test]
    fn test_remaining_tags_removed() {
        assert_eq!(sanitize("<ul><b>Bold</b> text</ul>").as_str(), "Bold text");
        assert_eq!(sanitize("<span class=\"x\">hi</span>").as_str(), "hi");
    }

    #[test]
    fn test_nested_tags_removed() {
        let out = sanitize("<<b>i>nested");
        assert!(!RE_ANY_TAG.is_match(&out), "got: {out:?}");
        assert_eq!(out.as_str(), "nested");
    }

    #[test]
    fn test_comparisons_survive() {
        assert_eq!(sanitize("x < 5 and y > 3").as_str(), "x < 5 and y > 3");
    }

    #[test]
    fn test_emphasis_removed() {
        assert_eq!(sanitize("**Solar Power**").as_str(), "Solar Power");
        assert_eq!(sanitize("***Wind***").as_str(), "Wind");
        assert_eq!(sanitize("an *important* point").as_str(), "an important point");
        assert_eq!(sanitize("__Hydro__ and _tidal_").as_str(), "Hydro and tidal");
    }

    #[test]
    fn test_single_star_bullet_kept() {
        assert_eq!(sanitize("* first\n* second").as_str(), "* first\n* second");
    }

    #[test]
    fn test_snake_case_kept() {
        assert_eq!(sanitize("use file_name_here").as_str(), "use file_name_here");
    }

    #[test]
    fn test_entity_tag_removed() {
        assert_eq!(sanitize("&lt;b&gt;bold&lt;/b&gt; &amp; co").as_str(), "bold & co");
    }

    #[test]
    fn test_emphasis_cannot_expose_a_tag() {
        let out = sanitize("<**b**>text");
        assert!(!RE_ANY_TAG.is_match(&out), "got: {out:?}");
    }

    #[test]
    fn test_special_tokens_removed() {
        assert_eq!(sanitize("<s>[INST] ignore [/INST]Answer</s>").as_str(), "ignore Answer");
        assert_eq!(sanitize("<<SYS>>sys<</SYS>>text<|im_end|>").as_str(), "systext");
    }

    #[test]
    fn test_filler_lines_dropped() {
        let out = sanitize("Here is the list:\nItem A");
        assert!(out.contains("Item A"));
        assert!(!out.contains("Here is"));

        let out = sanitize("Sure! Here are five titles:\nOne\nCertainly, more below\nTwo");
        assert_eq!(out.as_str(), "One\nTwo");
    }

    #[test]
    fn test_filler_needs_word_boundary() {
        assert_eq!(sanitize("Surety bonds").as_str(), "Surety bonds");
        assert_eq!(sanitize("Hereford cattle").as_str(), "Hereford cattle");
        assert_eq!(sanitize("Sure-fire Growth Tactics").as_str(), "Sure-fire Growth Tactics");
        assert_eq!(sanitize("Absolutely Essential Tools").as_str(), "Absolutely Essential Tools");
        assert_eq!(sanitize("Sure\nKept").as_str(), "Kept");
    }

    #[test]
    fn test_blank_lines_collapsed() {
        assert_eq!(sanitize("a\n\n\nb\n \t \nc").as_str(), "a\nb\nc");
    }

    #[test]
    fn test_crlf_and_invisible() {
        assert_eq!(sanitize("a\r\nb\rc").as_str(), "a\nb\nc");
        assert_eq!(sanitize("he\u{200B}llo\u{FEFF}").as_str(), "hello");
    }

    #[test]
    fn test_fence_lines_dropped() {
        assert_eq!(sanitize("```text\nOne\nTwo\n```").as_str(), "One\nTwo");
    }

    #[test]
    fn test_idempotent_on_samples() {
        let samples = [
            "",
            "Here is the list:\nItem A",
            "<li>Fast</li><li>Cheap</li>",
            "<<b>i>**x**",
            "**<b>**",
            "&lt;&lt;b&gt;i&gt;",
            "Sure\n\n\n1. **Intro**\r\n2. _Summary_\n\n",
            "* a *b* c\n\t- d",
            "<**b**>text",
            "[INST] [/INST] <> <<SYS>>",
            "  leading\n  spaces  \n",
        ];
        for s in samples {
            let once = sanitize(s);
            let twice = sanitize(&once);
            assert_eq!(once, twice, "not idempotent for {s:?}");
            assert!(!RE_ANY_TAG.is_match(&once), "tag survived in {once:?}");
        }
    }

    #[test]
    fn test_end_to_end_titles_sample() {
        let raw = "1. Solar Power\n2. Wind Energy\n3. Hydro Power\nHere is extra text";
        assert_eq!(
            sanitize(raw).as_str(),
            "1. Solar Power\n2. Wind Energy\n3. Hydro Power"
        );
    }
}

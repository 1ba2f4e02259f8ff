//! Pipeline stages for topic-to-deck generation.
//!
//! ```text
//! llm ──▶ sanitize ──▶ titles     (one call)
//! llm ──▶ sanitize ──▶ structure  (one call per title, concurrent)
//! images                          (optional, best-effort)
//! ```
//!
//! 1. [`llm`]:       the completion seam; the only stage that repeats per slide
//! 2. [`sanitize`]:  strip markup, entities, fences and filler from model text
//! 3. [`titles`]:    turn the title listing into at most N clean titles
//! 4. [`structure`]: shape a slide body into bullets or a paragraph
//! 5. [`images`]:    look up and validate one picture per slide

pub mod images;
pub mod llm;
pub mod sanitize;
pub mod structure;
pub mod titles;

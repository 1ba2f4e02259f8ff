//! Progress-callback trait for deck generation events.
//!
//! Inject an [`Arc<dyn DeckProgressCallback>`] via
//! [`crate::config::DeckConfigBuilder::progress_callback`] to follow a run
//! as titles arrive and each slide body is generated.
//!
//! ```rust
//! use edgequake_deck::{DeckConfig, DeckProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct Counter(AtomicUsize);
//!
//! impl DeckProgressCallback for Counter {
//!     fn on_slide_complete(&self, index: usize, total: usize, _text_len: usize) {
//!         let done = self.0.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("slide {} of {} ready ({done} done)", index + 1, total);
//!     }
//! }
//!
//! let config = DeckConfig::builder()
//!     .progress_callback(Arc::new(Counter(AtomicUsize::new(0))))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the generation pipeline as the deck takes shape.
///
/// Slide indices are 0-based positions in the title list. Content requests
/// run concurrently, so `on_slide_start` and `on_slide_complete` may be
/// called from several tasks at once and in any order.
pub trait DeckProgressCallback: Send + Sync {
    /// Titles have been extracted; `titles` content slides will follow.
    fn on_titles_ready(&self, titles: &[String]) {
        let _ = titles;
    }

    /// The content request for slide `index` is about to be sent.
    fn on_slide_start(&self, index: usize, total: usize) {
        let _ = (index, total);
    }

    /// Slide `index` has its body; `text_len` is its visible character count.
    fn on_slide_complete(&self, index: usize, total: usize, text_len: usize) {
        let _ = (index, total, text_len);
    }

    /// Picture lookup for slide `index` finished; `attached` is false when
    /// the slide renders without one.
    fn on_image(&self, index: usize, attached: bool) {
        let _ = (index, attached);
    }

    /// The file has been written.
    fn on_deck_complete(&self, total_slides: usize, file_size: u64) {
        let _ = (total_slides, file_size);
    }
}

/// Default when no callback is configured.
pub struct NoopProgressCallback;

impl DeckProgressCallback for NoopProgressCallback {}

/// The type stored in [`crate::config::DeckConfig`].
pub type ProgressCallback = Arc<dyn DeckProgressCallback>;

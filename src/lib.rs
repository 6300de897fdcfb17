//! Block-level noise removal for e-book chapter HTML, ahead of text-to-speech.
//!
//! `chapter_clean` walks chapter markup into blocks, scores each block by
//! length, link density, punctuation density and stopword density, rescues
//! short blocks from their neighbors, and keeps only narrative prose. Tables of
//! contents, page numbers, decorative banners and link-heavy navigation are
//! dropped. The cleaned text is then split into bounded segments, one per
//! speech-synthesis call.
//!
//! # Quick start
//!
//! ```rust
//! use chapter_clean::{clean_chapter, Segmenter, Strictness};
//!
//! let html = "<h1>目录</h1><p>第一章 童年 ........ 12</p><p>这里是正文。</p>";
//! let chapter = clean_chapter(html, Strictness::Balanced);
//! assert_eq!(chapter.text, "这里是正文。");
//!
//! let segments = Segmenter::default().split(&chapter.text);
//! assert_eq!(segments, vec!["这里是正文。"]);
//! ```
//!
//! Every call also produces a [`CleaningReport`] describing what was removed
//! and why, serializable to JSON for offline review.

mod block;
mod block_maker;
mod classify;
mod error;
mod fallback;
pub mod patterns;
mod report;
mod revise;
mod segment;
pub mod speech;
pub mod stoplists;
mod strictness;

pub use block::{Block, BlockTag, ClassType, Reason};
pub use block_maker::make_blocks;
pub use error::CleanError;
pub use report::{BlockSample, CleaningReport};
pub use segment::{SegmentStats, Segmenter, DEFAULT_MAX_SEGMENT_LENGTH};
pub use speech::{synthesize_segments, SegmentAudio, SpeechBackend};
pub use strictness::{Strictness, StrictnessProfile};

/// Result of cleaning one chapter.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct CleanedChapter {
    /// Kept blocks, one per line. Empty when nothing speakable remains.
    pub text: String,
    pub report: CleaningReport,
    /// Every block in document order with its final classification.
    pub blocks: Vec<Block>,
}

/// Classify the blocks of a chapter without joining them.
///
/// Each returned block carries its classification, reason, score, densities
/// and final `keep` decision.
pub fn classify_chapter(html: &str, strictness: Strictness) -> Vec<Block> {
    let mut blocks = block_maker::make_blocks(html);
    classify::classify_blocks(&mut blocks, &strictness.profile());
    revise::revise_block_classification(&mut blocks, strictness);
    report::apply_keep_decisions(&mut blocks, strictness);
    blocks
}

/// Clean a chapter and build its report.
pub fn clean_chapter(html: &str, strictness: Strictness) -> CleanedChapter {
    let blocks = classify_chapter(html, strictness);
    let text = report::join_kept_text(&blocks);
    let report = CleaningReport::from_blocks(&blocks, strictness);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        %strictness,
        total = report.total_blocks,
        kept = report.kept_blocks,
        retention = report.retention_ratio,
        "cleaned chapter"
    );

    CleanedChapter {
        text,
        report,
        blocks,
    }
}

/// Convenience: only the cleaned text.
pub fn clean_text(html: &str, strictness: Strictness) -> String {
    clean_chapter(html, strictness).text
}

/// Clean a chapter with the strictness given by name.
///
/// Names are matched case-insensitively; anything other than `conservative`,
/// `balanced` or `aggressive` is rejected.
///
/// # Example
///
/// ```rust
/// let chapter = chapter_clean::clean_chapter_named("<p>Hello world.</p>", "Aggressive").unwrap();
/// assert!(chapter_clean::clean_chapter_named("<p>Hello world.</p>", "strict").is_err());
/// ```
pub fn clean_chapter_named(html: &str, strictness: &str) -> Result<CleanedChapter, CleanError> {
    let strictness: Strictness = strictness.parse()?;
    Ok(clean_chapter(html, strictness))
}

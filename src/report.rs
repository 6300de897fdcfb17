use std::collections::BTreeMap;

use serde::Serialize;

use crate::block::{Block, BlockTag, ClassType, Reason};
use crate::block_maker::normalize_whitespace;
use crate::strictness::Strictness;

/// Upper bound on kept and removed samples in a report.
pub const MAX_SAMPLES: usize = 20;
/// Characters of block text copied into a sample.
pub const SAMPLE_TEXT_CHARS: usize = 200;

/// Separator between kept blocks in the cleaned text.
const BLOCK_DELIMITER: &str = "\n";

/// Final keep/drop rule for one classified block.
pub fn should_keep(block: &Block, strictness: Strictness) -> bool {
    match block.classification {
        ClassType::Good => true,
        ClassType::NearGood => {
            !(strictness == Strictness::Aggressive
                && matches!(
                    block.reason,
                    Reason::HighLinkDensity | Reason::LowPunctuationDensity
                ))
        }
        ClassType::Short | ClassType::Bad => false,
    }
}

/// Set `keep` on every block.
pub fn apply_keep_decisions(blocks: &mut [Block], strictness: Strictness) {
    for block in blocks.iter_mut() {
        block.keep = should_keep(block, strictness);
    }
}

/// Kept blocks' text in document order, one block per line.
pub fn join_kept_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter(|b| b.keep)
        .map(|b| normalize_whitespace(&b.text).trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(BLOCK_DELIMITER)
}

/// Diagnostic snapshot of one block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockSample {
    pub index: u32,
    pub tag: BlockTag,
    /// At most [`SAMPLE_TEXT_CHARS`] characters.
    pub text: String,
    pub classification: ClassType,
    pub reason: Reason,
    pub score: f64,
    pub link_density: f64,
    pub punct_density: f64,
    pub stopword_density: f64,
}

impl BlockSample {
    fn from_block(block: &Block) -> Self {
        Self {
            index: block.index,
            tag: block.tag,
            text: block.text.chars().take(SAMPLE_TEXT_CHARS).collect(),
            classification: block.classification,
            reason: block.reason,
            score: block.score,
            link_density: block.link_density,
            punct_density: block.punct_density,
            stopword_density: block.stopword_density,
        }
    }
}

/// Per-chapter cleaning summary for offline QA.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub struct CleaningReport {
    pub strictness: Strictness,
    pub total_blocks: usize,
    pub kept_blocks: usize,
    pub removed_blocks: usize,
    pub raw_chars: usize,
    pub kept_chars: usize,
    pub removed_chars: usize,
    /// `kept_chars / raw_chars`, 0 when there is no raw text.
    pub retention_ratio: f64,
    pub kept_samples: Vec<BlockSample>,
    pub removed_samples: Vec<BlockSample>,
    pub reason_counts: BTreeMap<Reason, usize>,
    pub removed_reason_counts: BTreeMap<Reason, usize>,
}

impl CleaningReport {
    /// Build the report from blocks whose `keep` flag is already set.
    pub fn from_blocks(blocks: &[Block], strictness: Strictness) -> Self {
        let mut kept_blocks = 0;
        let mut raw_chars = 0;
        let mut kept_chars = 0;
        let mut kept_samples = Vec::new();
        let mut removed_samples = Vec::new();
        let mut reason_counts = BTreeMap::new();
        let mut removed_reason_counts = BTreeMap::new();

        for block in blocks {
            raw_chars += block.total_chars as usize;
            *reason_counts.entry(block.reason).or_insert(0) += 1;

            if block.keep {
                kept_blocks += 1;
                kept_chars += block.len();
                if kept_samples.len() < MAX_SAMPLES {
                    kept_samples.push(BlockSample::from_block(block));
                }
            } else {
                *removed_reason_counts.entry(block.reason).or_insert(0) += 1;
                if removed_samples.len() < MAX_SAMPLES {
                    removed_samples.push(BlockSample::from_block(block));
                }
            }
        }

        let retention_ratio = if raw_chars == 0 {
            0.0
        } else {
            (kept_chars as f64 / raw_chars as f64).clamp(0.0, 1.0)
        };

        Self {
            strictness,
            total_blocks: blocks.len(),
            kept_blocks,
            removed_blocks: blocks.len() - kept_blocks,
            raw_chars,
            kept_chars,
            removed_chars: raw_chars.saturating_sub(kept_chars),
            retention_ratio,
            kept_samples,
            removed_samples,
            reason_counts,
            removed_reason_counts,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn block(index: u32, text: &str, class: ClassType, reason: Reason) -> Block {
        let mut b = Block::new(index, BlockTag::Paragraph, text.to_string(), 0);
        b.classification = class;
        b.reason = reason;
        b
    }

    #[test]
    fn test_keep_rule_by_class() {
        let good = block(0, "a", ClassType::Good, Reason::ContentLike);
        let short = block(0, "a", ClassType::Short, Reason::ContentLike);
        let bad = block(0, "a", ClassType::Bad, Reason::NoisePattern);
        for strictness in Strictness::ALL {
            assert!(should_keep(&good, strictness));
            assert!(!should_keep(&short, strictness));
            assert!(!should_keep(&bad, strictness));
        }
    }

    #[test]
    fn test_aggressive_drops_penalized_near_good() {
        let low_punct = block(0, "a", ClassType::NearGood, Reason::LowPunctuationDensity);
        let links = block(0, "a", ClassType::NearGood, Reason::HighLinkDensity);
        let plain = block(0, "a", ClassType::NearGood, Reason::ContentLike);
        assert!(!should_keep(&low_punct, Strictness::Aggressive));
        assert!(!should_keep(&links, Strictness::Aggressive));
        assert!(should_keep(&plain, Strictness::Aggressive));
        assert!(should_keep(&low_punct, Strictness::Balanced));
        assert!(should_keep(&links, Strictness::Conservative));
    }

    #[test]
    fn test_join_kept_text() {
        let mut bs = vec![
            block(0, "第一章 童年", ClassType::NearGood, Reason::ContentLike),
            block(1, "目录", ClassType::Bad, Reason::NoisePattern),
            block(2, "我们从一份档案开始。", ClassType::Good, Reason::ContentLike),
        ];
        apply_keep_decisions(&mut bs, Strictness::Balanced);
        assert_eq!(join_kept_text(&bs), "第一章 童年\n我们从一份档案开始。");
    }

    #[test]
    fn test_join_nothing_kept_is_empty() {
        let mut bs = vec![block(0, "42", ClassType::Bad, Reason::NoisePattern)];
        apply_keep_decisions(&mut bs, Strictness::Balanced);
        assert_eq!(join_kept_text(&bs), "");
    }

    #[test]
    fn test_report_counts_consistent() {
        let mut bs = vec![
            block(0, "目录", ClassType::Bad, Reason::NoisePattern),
            block(1, "这里是正文。", ClassType::Good, Reason::ContentLike),
            block(2, "xyz", ClassType::Short, Reason::ContentLike),
        ];
        apply_keep_decisions(&mut bs, Strictness::Balanced);
        let report = CleaningReport::from_blocks(&bs, Strictness::Balanced);

        assert_eq!(report.total_blocks, 3);
        assert_eq!(report.kept_blocks, 1);
        assert_eq!(report.removed_blocks, 2);
        assert_eq!(report.raw_chars, 2 + 6 + 3);
        assert_eq!(report.kept_chars, 6);
        assert_eq!(report.removed_chars, 5);
        assert!((report.retention_ratio - 6.0 / 11.0).abs() < 1e-12);
        assert_eq!(report.removed_reason_counts.get(&Reason::NoisePattern), Some(&1));
        assert_eq!(report.reason_counts.get(&Reason::ContentLike), Some(&2));
        assert_eq!(report.removed_samples.len(), 2);
        assert_eq!(report.kept_samples.len(), 1);
        assert_eq!(report.removed_samples[0].reason, Reason::NoisePattern);
    }

    #[test]
    fn test_report_empty_chapter() {
        let report = CleaningReport::from_blocks(&[], Strictness::Aggressive);
        assert_eq!(report.total_blocks, 0);
        assert_eq!(report.retention_ratio, 0.0);
        assert!(report.removed_samples.is_empty());
    }

    #[test]
    fn test_samples_bounded_and_truncated() {
        let long = "字".repeat(500);
        let mut bs: Vec<Block> = (0..30)
            .map(|i| block(i, &long, ClassType::Bad, Reason::NoisePattern))
            .collect();
        apply_keep_decisions(&mut bs, Strictness::Balanced);
        let report = CleaningReport::from_blocks(&bs, Strictness::Balanced);
        assert_eq!(report.removed_blocks, 30);
        assert_eq!(report.removed_samples.len(), MAX_SAMPLES);
        assert_eq!(report.removed_samples[0].text.chars().count(), SAMPLE_TEXT_CHARS);
        assert_eq!(report.removed_reason_counts.get(&Reason::NoisePattern), Some(&30));
    }

    #[test]
    fn test_report_json_field_names() {
        let mut bs = vec![block(0, "目录", ClassType::Bad, Reason::NoisePattern)];
        apply_keep_decisions(&mut bs, Strictness::Balanced);
        let json = CleaningReport::from_blocks(&bs, Strictness::Balanced)
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["strictness"], "balanced");
        assert_eq!(value["removed_samples"][0]["reason"], "noise_pattern");
        assert_eq!(value["removed_reason_counts"]["noise_pattern"], 1);
        assert_eq!(value["removed_samples"][0]["tag"], "paragraph");
    }
}

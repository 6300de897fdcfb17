use crate::block::{Block, ClassType, Reason};
use crate::patterns;
use crate::stoplists;
use crate::strictness::StrictnessProfile;

/// Score assigned to decoration and noise blocks.
const NOISE_SCORE: f64 = -10.0;

/// Context-free classification of a single block.
///
/// Rewrites `block.text` with its decoration-stripped form and sets
/// `classification`, `reason`, `score` and the three densities.
pub fn classify_block(block: &mut Block, profile: &StrictnessProfile) {
    let stripped = patterns::strip_decoration(&block.text);
    if stripped.is_empty() {
        mark_noise(block, Reason::DecorativeWrapper);
        return;
    }
    block.text = patterns::unwrap_parenthesized_titles(&stripped);

    let length = block.len();
    block.link_density = block.link_chars as f64 / block.total_chars.max(1) as f64;
    block.punct_density = patterns::punctuation_count(&block.text) as f64 / length.max(1) as f64;
    block.stopword_density = stoplists::stopword_density(&block.text);

    if patterns::is_noise(&block.text) {
        mark_noise(block, Reason::NoisePattern);
        return;
    }

    let mut score = 0.0;
    let mut reason = Reason::ContentLike;

    if length >= profile.high_length {
        score += 2.0;
    } else if length >= profile.low_length {
        score += 1.0;
    }
    if block.link_density > profile.max_link_density {
        score -= 2.0;
        reason = Reason::HighLinkDensity;
    }
    if block.punct_density < profile.min_punct_density && length >= profile.low_length {
        score -= 1.0;
        reason = Reason::LowPunctuationDensity;
    }
    if block.stopword_density >= profile.min_stopword_density {
        score += 0.5;
    }
    if patterns::has_sentence_final(&block.text) {
        score += 0.5;
    }
    if block.is_heading {
        score += 0.3;
    }

    block.score = score;
    block.reason = reason;
    block.classification = if length < profile.short_length {
        ClassType::Short
    } else if score >= profile.good_score {
        ClassType::Good
    } else if score <= profile.bad_score {
        ClassType::Bad
    } else {
        ClassType::NearGood
    };
}

fn mark_noise(block: &mut Block, reason: Reason) {
    block.classification = ClassType::Bad;
    block.reason = reason;
    block.score = NOISE_SCORE;
}

/// Classify every block independently.
pub fn classify_blocks(blocks: &mut [Block], profile: &StrictnessProfile) {
    for block in blocks.iter_mut() {
        classify_block(block, profile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockTag;
    use crate::strictness::Strictness;

    fn classified(text: &str, tag: BlockTag, link_chars: usize, strictness: Strictness) -> Block {
        let mut b = Block::new(0, tag, text.to_string(), link_chars);
        classify_block(&mut b, &strictness.profile());
        b
    }

    fn para(text: &str) -> Block {
        classified(text, BlockTag::Paragraph, 0, Strictness::Balanced)
    }

    #[test]
    fn test_decorative_marker_is_bad_and_stops() {
        let b = para("====正文====");
        assert_eq!(b.classification, ClassType::Bad);
        assert_eq!(b.reason, Reason::DecorativeWrapper);
        assert_eq!(b.score, -10.0);
        assert_eq!(b.stopword_density, 0.0);
    }

    #[test]
    fn test_wrapped_heading_unwrapped() {
        let b = para("====第一章 童年====");
        assert_eq!(b.text, "第一章 童年");
        assert_ne!(b.reason, Reason::DecorativeWrapper);
    }

    #[test]
    fn test_title_parentheses_normalized() {
        let b = para("这是引文（《明实录》）。");
        assert_eq!(b.text, "这是引文《明实录》。");
    }

    #[test]
    fn test_noise_patterns() {
        for text in ["目录", "第一章 童年 ........ 12", "Chapter II ____ 21", "___________", "42"] {
            let b = para(text);
            assert_eq!(b.classification, ClassType::Bad, "{text}");
            assert_eq!(b.reason, Reason::NoisePattern, "{text}");
            assert_eq!(b.score, -10.0, "{text}");
        }
    }

    #[test]
    fn test_long_english_prose_is_good() {
        let b = para("This is the real content of the chapter.");
        // +1 length, +0.5 stopwords, +0.5 final punctuation
        assert_eq!(b.score, 2.0);
        assert_eq!(b.classification, ClassType::Good);
        assert_eq!(b.reason, Reason::ContentLike);
    }

    #[test]
    fn test_short_length_is_short() {
        let b = para("Quick recap");
        assert_eq!(b.classification, ClassType::Short);
    }

    #[test]
    fn test_low_punctuation_penalty() {
        let b = para("To Leon Werth when he was a little boy");
        // +1 length, -1 no punctuation, +0.5 stopwords
        assert_eq!(b.score, 0.5);
        assert_eq!(b.reason, Reason::LowPunctuationDensity);
        assert_eq!(b.classification, ClassType::NearGood);
    }

    #[test]
    fn test_high_link_density_penalty() {
        let text = "Home About Contact Privacy Terms Sitemap";
        let b = classified(text, BlockTag::Paragraph, text.chars().count(), Strictness::Balanced);
        assert_eq!(b.link_density, 1.0);
        // +1 length, -2 links, -1 punctuation, +0.5 stopwords ("about")
        assert_eq!(b.score, -1.5);
        assert_eq!(b.classification, ClassType::Bad);
        // the later penalty wins the reason
        assert_eq!(b.reason, Reason::LowPunctuationDensity);
    }

    #[test]
    fn test_high_link_reason_when_punctuated() {
        let text = "Read more about this, and that, and the other thing.";
        let b = classified(text, BlockTag::Paragraph, text.chars().count(), Strictness::Balanced);
        assert_eq!(b.reason, Reason::HighLinkDensity);
    }

    #[test]
    fn test_heading_bonus() {
        let plain = para("第一章 童年的回忆");
        let heading = classified("第一章 童年的回忆", BlockTag::Heading(1), 0, Strictness::Balanced);
        assert!((heading.score - plain.score - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_densities_populated() {
        let b = para("这里是正文，还有更多的内容。");
        assert!(b.punct_density > 0.0);
        assert!(b.stopword_density > 0.0);
        assert_eq!(b.link_density, 0.0);
    }

    #[test]
    fn test_classify_is_pure_per_block() {
        let mut blocks = vec![
            Block::new(0, BlockTag::Paragraph, "目录".into(), 0),
            Block::new(1, BlockTag::Paragraph, "This is the real content of the chapter.".into(), 0),
        ];
        classify_blocks(&mut blocks, &Strictness::Balanced.profile());
        let alone = para("This is the real content of the chapter.");
        assert_eq!(blocks[1].classification, alone.classification);
        assert_eq!(blocks[1].score, alone.score);
    }
}

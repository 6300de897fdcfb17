use serde::Serialize;

/// Element a block originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockTag {
    Paragraph,
    Heading(u8),
    ListItem,
    LineBreak,
    Text,
    Fallback,
}

impl BlockTag {
    pub fn is_heading(self) -> bool {
        matches!(self, BlockTag::Heading(_))
    }
}

/// Classification label for a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassType {
    Good,
    NearGood,
    Short,
    Bad,
}

impl ClassType {
    /// Good or NearGood.
    pub fn is_content(self) -> bool {
        matches!(self, ClassType::Good | ClassType::NearGood)
    }
}

/// Why a block ended up with its classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    ContentLike,
    DecorativeWrapper,
    NoisePattern,
    HighLinkDensity,
    LowPunctuationDensity,
    ContextPromoted,
    HeadingBeforeContent,
    BetweenGoodBlocks,
    ShortSentence,
    ShortCjk,
    ShortEnglishContent,
    ShortPrefixForContent,
    ShortSuffixForContent,
    ConservativeShortKeep,
}

impl Reason {
    pub fn as_str(self) -> &'static str {
        match self {
            Reason::ContentLike => "content_like",
            Reason::DecorativeWrapper => "decorative_wrapper",
            Reason::NoisePattern => "noise_pattern",
            Reason::HighLinkDensity => "high_link_density",
            Reason::LowPunctuationDensity => "low_punctuation_density",
            Reason::ContextPromoted => "context_promoted",
            Reason::HeadingBeforeContent => "heading_before_content",
            Reason::BetweenGoodBlocks => "between_good_blocks",
            Reason::ShortSentence => "short_sentence",
            Reason::ShortCjk => "short_cjk",
            Reason::ShortEnglishContent => "short_english_content",
            Reason::ShortPrefixForContent => "short_prefix_for_content",
            Reason::ShortSuffixForContent => "short_suffix_for_content",
            Reason::ConservativeShortKeep => "conservative_short_keep",
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structural unit of chapter HTML.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Block {
    /// Position in document order.
    pub index: u32,
    pub tag: BlockTag,
    /// Whitespace-normalized text. The classifier replaces it with the
    /// decoration-stripped form that ends up in the cleaned chapter.
    pub text: String,
    /// Character count of the extracted text, before classifier normalization.
    pub total_chars: u32,
    /// Character count inside `<a>` elements.
    pub link_chars: u32,
    pub is_heading: bool,

    pub classification: ClassType,
    pub reason: Reason,
    pub score: f64,
    pub link_density: f64,
    pub punct_density: f64,
    pub stopword_density: f64,
    /// Final keep/drop decision (set by the report builder).
    pub keep: bool,
}

impl Block {
    pub(crate) fn new(index: u32, tag: BlockTag, text: String, link_chars: usize) -> Self {
        let total_chars = text.chars().count() as u32;
        Self {
            index,
            tag,
            text,
            total_chars,
            link_chars: (link_chars as u32).min(total_chars),
            is_heading: tag.is_heading(),
            classification: ClassType::Short,
            reason: Reason::ContentLike,
            score: 0.0,
            link_density: 0.0,
            punct_density: 0.0,
            stopword_density: 0.0,
            keep: false,
        }
    }

    /// Character length of the current text.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns `true` if the final decision drops this block.
    pub fn is_boilerplate(&self) -> bool {
        !self.keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_chars_clamped_to_total() {
        let b = Block::new(0, BlockTag::Paragraph, "abc".to_string(), 10);
        assert_eq!(b.total_chars, 3);
        assert_eq!(b.link_chars, 3);
    }

    #[test]
    fn test_total_chars_counts_codepoints() {
        let b = Block::new(0, BlockTag::Paragraph, "这里是正文。".to_string(), 0);
        assert_eq!(b.total_chars, 6);
        assert_eq!(b.len(), 6);
    }

    #[test]
    fn test_heading_flag_follows_tag() {
        assert!(Block::new(0, BlockTag::Heading(2), "x".into(), 0).is_heading);
        assert!(!Block::new(0, BlockTag::ListItem, "x".into(), 0).is_heading);
    }

    #[test]
    fn test_reason_serializes_snake_case() {
        let json = serde_json::to_string(&Reason::NoisePattern).unwrap();
        assert_eq!(json, "\"noise_pattern\"");
        assert_eq!(Reason::ShortPrefixForContent.to_string(), "short_prefix_for_content");
    }
}

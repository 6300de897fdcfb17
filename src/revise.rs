use crate::block::{Block, ClassType, Reason};
use crate::patterns;
use crate::stoplists;
use crate::strictness::Strictness;

/// Minimum character length for the punctuation and CJK short-block rescues.
const MIN_RESCUE_LENGTH: usize = 4;
/// Minimum Latin words (and stopword density) for a lone short English sentence.
const MIN_ENGLISH_WORDS: usize = 4;
const MIN_ENGLISH_STOPWORD_DENSITY: f64 = 0.12;
/// Combined and own word counts for a short fragment glued to neighboring content.
const MIN_JOINED_WORDS: usize = 6;
const MIN_FRAGMENT_WORDS: usize = 2;

/// Context-sensitive revision of block classifications.
///
/// Assumes `classify_blocks` has already run. Pass 1 rescues `Short` blocks and
/// then promotes `NearGood` blocks sitting inside content; pass 2 (skipped
/// under `Aggressive`) re-checks the prefix/suffix rules against pass-1
/// promotions. Each step reads neighbor classes from a snapshot taken when
/// that step starts.
pub fn revise_block_classification(blocks: &mut [Block], strictness: Strictness) {
    promote_short_blocks(blocks, strictness);
    promote_near_good_runs(blocks);
    if strictness != Strictness::Aggressive {
        rescan_short_fragments(blocks);
    }
}

fn snapshot(blocks: &[Block]) -> Vec<ClassType> {
    blocks.iter().map(|b| b.classification).collect()
}

fn neighbours(classes: &[ClassType], i: usize) -> (Option<ClassType>, Option<ClassType>) {
    let prev = i.checked_sub(1).map(|j| classes[j]);
    let next = classes.get(i + 1).copied();
    (prev, next)
}

fn is_content(class: Option<ClassType>) -> bool {
    class.is_some_and(ClassType::is_content)
}

fn word_count(text: &str) -> usize {
    stoplists::latin_words(text).count()
}

/// Rules f/g: a short fragment that reads as the lead-in or tail of adjacent content.
fn fragment_reason(blocks: &[Block], classes: &[ClassType], i: usize) -> Option<Reason> {
    let text = &blocks[i].text;
    let words = word_count(text);
    if words < MIN_FRAGMENT_WORDS || patterns::is_short_toc_prefix(text) {
        return None;
    }
    let (prev, next) = neighbours(classes, i);
    if is_content(next) && words + word_count(&blocks[i + 1].text) >= MIN_JOINED_WORDS {
        return Some(Reason::ShortPrefixForContent);
    }
    if is_content(prev) && words + word_count(&blocks[i - 1].text) >= MIN_JOINED_WORDS {
        return Some(Reason::ShortSuffixForContent);
    }
    None
}

/// Rules a–h, first match wins.
fn short_block_reason(
    blocks: &[Block],
    classes: &[ClassType],
    i: usize,
    strictness: Strictness,
) -> Option<Reason> {
    let block = &blocks[i];
    let (prev, next) = neighbours(classes, i);
    let length = block.len();
    let lenient = strictness != Strictness::Aggressive;

    if block.is_heading && is_content(next) {
        return Some(Reason::HeadingBeforeContent);
    }
    if prev == Some(ClassType::Good) && next == Some(ClassType::Good) {
        return Some(Reason::BetweenGoodBlocks);
    }
    if patterns::has_sentence_final(&block.text) && length >= MIN_RESCUE_LENGTH {
        return Some(Reason::ShortSentence);
    }
    if patterns::contains_cjk(&block.text)
        && length >= MIN_RESCUE_LENGTH
        && !patterns::is_noise(&block.text)
    {
        return Some(Reason::ShortCjk);
    }
    if lenient {
        if word_count(&block.text) >= MIN_ENGLISH_WORDS
            && block.stopword_density >= MIN_ENGLISH_STOPWORD_DENSITY
            && !patterns::is_short_toc_prefix(&block.text)
        {
            return Some(Reason::ShortEnglishContent);
        }
        if let Some(reason) = fragment_reason(blocks, classes, i) {
            return Some(reason);
        }
    }
    if strictness == Strictness::Conservative {
        return Some(Reason::ConservativeShortKeep);
    }
    None
}

/// Pass 1, first half: rescue `Short` blocks to `NearGood`.
fn promote_short_blocks(blocks: &mut [Block], strictness: Strictness) {
    let classes = snapshot(blocks);
    for i in 0..blocks.len() {
        if classes[i] != ClassType::Short {
            continue;
        }
        if let Some(reason) = short_block_reason(blocks, &classes, i, strictness) {
            blocks[i].classification = ClassType::NearGood;
            blocks[i].reason = reason;
        }
    }
}

/// Pass 1, second half: `NearGood` inside a run of content becomes `Good`.
fn promote_near_good_runs(blocks: &mut [Block]) {
    let classes = snapshot(blocks);
    for i in 0..blocks.len() {
        if classes[i] != ClassType::NearGood {
            continue;
        }
        let (prev, next) = neighbours(&classes, i);
        if is_content(prev) && is_content(next) {
            blocks[i].classification = ClassType::Good;
            blocks[i].reason = Reason::ContextPromoted;
        }
    }
}

/// Pass 2: prefix/suffix rules again, now seeing pass-1 promotions.
fn rescan_short_fragments(blocks: &mut [Block]) {
    let classes = snapshot(blocks);
    for i in 0..blocks.len() {
        if classes[i] != ClassType::Short {
            continue;
        }
        if let Some(reason) = fragment_reason(blocks, &classes, i) {
            blocks[i].classification = ClassType::NearGood;
            blocks[i].reason = reason;
        }
    }
}

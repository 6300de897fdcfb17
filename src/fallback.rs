//! Regex scrape for markup the DOM walk could not turn into text.
//!
//! Never fails: worst case the whole tag-stripped residue becomes one block.

use std::sync::LazyLock;

use regex::Regex;

use crate::block::{Block, BlockTag};
use crate::block_maker::normalize_whitespace;

/// Elements whose content is never speakable. Void denylisted elements
/// (`embed`, `param`, `source`, `track`) carry no text and fall to `TAG_RE`.
const REMOVED_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "iframe", "object", "canvas", "svg", "math", "template",
    "slot",
];

/// Denylisted elements with their content; an unterminated opener runs to end of input.
static REMOVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = REMOVED_ELEMENTS
        .iter()
        .map(|tag| format!(r"<{tag}\b[^>]*>.*?(?:</{tag}\s*>|\z)"))
        .collect();
    Regex::new(&format!("(?is){}", alternatives.join("|"))).unwrap()
});

/// Inner text of the allowlisted elements, in document order.
static ALLOWED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:title|p|h[1-6]|li|div)\b[^>]*>(.*?)</(?:title|p|h[1-6]|li|div)\s*>")
        .unwrap()
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Decode the handful of entities that survive a regex scrape.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn clean_fragment(fragment: &str, tag_replacement: &str) -> String {
    let stripped = TAG_RE.replace_all(fragment, tag_replacement);
    normalize_whitespace(&decode_entities(&stripped)).trim().to_string()
}

/// Scrape blocks from raw markup without a DOM.
pub fn scrape_blocks(html: &str) -> Vec<Block> {
    let content = REMOVE_RE.replace_all(html, "");

    let mut texts: Vec<String> = ALLOWED_RE
        .captures_iter(&content)
        .map(|caps| clean_fragment(&caps[1], ""))
        .filter(|text| !text.is_empty())
        .collect();

    if texts.is_empty() {
        let residue = clean_fragment(&content, " ");
        if !residue.is_empty() {
            texts.push(residue);
        }
    }

    texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| Block::new(i as u32, BlockTag::Fallback, text, 0))
        .collect()
}

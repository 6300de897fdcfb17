use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::Html;

use crate::block::{Block, BlockTag};
use crate::fallback;

/// Elements whose text and nested markup never reach a block.
const SKIP_TAGS: &[&str] = &[
    "head", "script", "style", "noscript", "iframe", "object", "embed", "param", "source",
    "track", "canvas", "svg", "math", "template", "slot",
];

/// Paragraph-like elements that open a new block.
const PARAGRAPH_TAGS: &[&str] = &[
    "p", "div", "blockquote", "pre", "center", "section", "article", "aside", "header",
    "footer", "nav", "main", "figure", "figcaption", "table", "caption", "tr", "td", "th",
    "ul", "ol", "dl",
];

const LIST_ITEM_TAGS: &[&str] = &["li", "dt", "dd"];

/// Classify an element name as a block boundary.
fn block_tag_for(tag: &str) -> Option<BlockTag> {
    match tag {
        "h1" => Some(BlockTag::Heading(1)),
        "h2" => Some(BlockTag::Heading(2)),
        "h3" => Some(BlockTag::Heading(3)),
        "h4" => Some(BlockTag::Heading(4)),
        "h5" => Some(BlockTag::Heading(5)),
        "h6" => Some(BlockTag::Heading(6)),
        t if LIST_ITEM_TAGS.contains(&t) => Some(BlockTag::ListItem),
        t if PARAGRAPH_TAGS.contains(&t) => Some(BlockTag::Paragraph),
        _ => None,
    }
}

/// Collapse every whitespace run (including no-break spaces) to one space.
///
/// Leading and trailing runs collapse too but are not removed.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_ws = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_ws {
                out.push(' ');
                in_ws = true;
            }
        } else {
            out.push(ch);
            in_ws = false;
        }
    }
    out
}

/// Returns true if the string is empty or all whitespace.
fn is_blank(s: &str) -> bool {
    s.chars().all(|c| c.is_whitespace())
}

/// Accumulates text nodes into one block during the DOM walk.
struct BlockAccumulator {
    tag: BlockTag,
    text_nodes: Vec<String>,
    link_chars: usize,
}

impl BlockAccumulator {
    fn new(tag: BlockTag) -> Self {
        Self {
            tag,
            text_nodes: Vec::new(),
            link_chars: 0,
        }
    }

    fn append_text(&mut self, text: &str) -> usize {
        let normalized = normalize_whitespace(text);
        let chars = normalized.chars().count();
        self.text_nodes.push(normalized);
        chars
    }

    /// Join, trim and collapse. `None` when nothing speakable was collected.
    fn build(self, index: u32) -> Option<Block> {
        let raw = self.text_nodes.concat();
        let text = normalize_whitespace(raw.trim());
        if text.is_empty() {
            return None;
        }
        Some(Block::new(index, self.tag, text, self.link_chars))
    }
}

/// Walk state threaded through the recursive DOM walk.
struct Walker {
    blocks: Vec<Block>,
    current: BlockAccumulator,
    /// Enclosing block elements; text after a closed child block resumes the parent's tag.
    open_blocks: Vec<BlockTag>,
    link_depth: usize,
    skip_depth: usize,
}

impl Walker {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            current: BlockAccumulator::new(BlockTag::Text),
            open_blocks: Vec::new(),
            link_depth: 0,
            skip_depth: 0,
        }
    }

    /// Finalize the current block and start a new one with `tag`.
    fn start_new_block(&mut self, tag: BlockTag) {
        let finished = std::mem::replace(&mut self.current, BlockAccumulator::new(tag));
        if let Some(block) = finished.build(self.blocks.len() as u32) {
            self.blocks.push(block);
        }
    }

    fn enclosing_tag(&self) -> BlockTag {
        self.open_blocks.last().copied().unwrap_or(BlockTag::Text)
    }

    fn visit_children(&mut self, node: NodeRef<Node>) {
        for child in node.children() {
            self.visit_node(child);
        }
    }

    fn visit_node(&mut self, node: NodeRef<Node>) {
        match node.value() {
            Node::Element(el) => {
                let tag = el.name();

                if SKIP_TAGS.contains(&tag) {
                    self.skip_depth += 1;
                    self.visit_children(node);
                    self.skip_depth = self.skip_depth.saturating_sub(1);
                } else if tag == "br" || tag == "hr" {
                    self.start_new_block(BlockTag::LineBreak);
                } else if let Some(block_tag) = block_tag_for(tag) {
                    self.start_new_block(block_tag);
                    self.open_blocks.push(block_tag);
                    self.visit_children(node);
                    self.open_blocks.pop();
                    let resumed = self.enclosing_tag();
                    self.start_new_block(resumed);
                } else {
                    // Inline element
                    let is_link = tag == "a";
                    if is_link {
                        self.link_depth += 1;
                    }
                    self.visit_children(node);
                    if is_link {
                        self.link_depth = self.link_depth.saturating_sub(1);
                    }
                }
            }
            Node::Text(text) => {
                let content = text.text.as_ref();
                if self.skip_depth > 0 || is_blank(content) {
                    return;
                }
                let chars = self.current.append_text(content);
                if self.link_depth > 0 {
                    self.current.link_chars += chars;
                }
            }
            Node::Document | Node::Fragment => self.visit_children(node),
            // Comments, doctypes, processing instructions
            _ => {}
        }
    }
}

/// Convert chapter HTML into ordered, non-empty blocks.
///
/// Falls back to a regex scrape when the DOM walk yields nothing, e.g. a
/// chapter whose only text is its `<title>`. Denylisted elements stay silent
/// on both paths.
pub fn make_blocks(html: &str) -> Vec<Block> {
    let doc = Html::parse_document(html);
    let mut walker = Walker::new();
    walker.visit_node(doc.tree.root());
    walker.start_new_block(BlockTag::Text);

    if walker.blocks.is_empty() {
        let scraped = fallback::scrape_blocks(html);
        #[cfg(feature = "tracing")]
        {
            if !scraped.is_empty() {
                tracing::debug!(blocks = scraped.len(), "DOM walk found no text, used fallback scrape");
            }
        }
        return scraped;
    }
    walker.blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(blocks: &[Block]) -> Vec<&str> {
        blocks.iter().map(|b| b.text.as_str()).collect()
    }

    #[test]
    fn test_no_blocks() {
        assert!(make_blocks("<html><body></body></html>").is_empty());
        assert!(make_blocks("<p>   </p><div>\n</div>").is_empty());
    }

    #[test]
    fn test_basic() {
        let html = concat!(
            "<html><body>",
            "<h1>Header</h1>",
            "<p>text and some <em>other</em> words <span>that I</span> have in my head now</p>",
            "<li>item</li>",
            "</body></html>"
        );
        let bs = make_blocks(html);
        assert_eq!(
            texts(&bs),
            vec!["Header", "text and some other words that I have in my head now", "item"]
        );
        assert_eq!(bs[0].tag, BlockTag::Heading(1));
        assert!(bs[0].is_heading);
        assert_eq!(bs[1].tag, BlockTag::Paragraph);
        assert_eq!(bs[2].tag, BlockTag::ListItem);
    }

    #[test]
    fn test_indices_gapless() {
        let bs = make_blocks("<p>a</p><p> </p><p>b</p><div>c</div>");
        let idx: Vec<u32> = bs.iter().map(|b| b.index).collect();
        assert_eq!(idx, vec![0, 1, 2]);
    }

    #[test]
    fn test_whitespace_collapsed() {
        let bs = make_blocks("<p>pre<em>in</em>post \t pre  <span> in </span>\n\n post</p>");
        assert_eq!(texts(&bs), vec!["preinpost pre in post"]);
    }

    #[test]
    fn test_line_breaks_split_blocks() {
        let bs = make_blocks("<p>line one<br/>line two<hr/>line three</p>");
        assert_eq!(texts(&bs), vec!["line one", "line two", "line three"]);
        assert_eq!(bs[0].tag, BlockTag::Paragraph);
        assert_eq!(bs[1].tag, BlockTag::LineBreak);
    }

    #[test]
    fn test_bare_text_block() {
        let bs = make_blocks("<body>loose text<p>para</p>tail text</body>");
        assert_eq!(texts(&bs), vec!["loose text", "para", "tail text"]);
        assert_eq!(bs[0].tag, BlockTag::Text);
        assert_eq!(bs[2].tag, BlockTag::Text);
    }

    #[test]
    fn test_text_after_child_resumes_parent_tag() {
        let bs = make_blocks("<div>before<p>inner</p>after</div>");
        assert_eq!(texts(&bs), vec!["before", "inner", "after"]);
        assert_eq!(bs[2].tag, BlockTag::Paragraph);
    }

    #[test]
    fn test_denylisted_elements_skipped() {
        let html = concat!(
            "<html><head><title>Book Title</title><style>p{color:red}</style></head><body>",
            "<script>var x = 1;</script>",
            "<p>visible<svg><text>hidden</text><g><text>deeper</text></g></svg> text</p>",
            "<noscript>no script</noscript>",
            "</body></html>"
        );
        let bs = make_blocks(html);
        assert_eq!(texts(&bs), vec!["visible text"]);
    }

    #[test]
    fn test_link_chars_counted() {
        let bs = make_blocks("<p>after <a href=\"#\">text</a> with <a><b>more</b></a></p>");
        assert_eq!(bs[0].text, "after text with more");
        assert_eq!(bs[0].link_chars, 8);
        assert_eq!(bs[0].total_chars, 20);
    }

    #[test]
    fn test_link_chars_never_exceed_total() {
        let bs = make_blocks("<p><a>  spaced   link  </a></p>");
        assert!(bs[0].link_chars <= bs[0].total_chars);
    }

    #[test]
    fn test_title_only_chapter_uses_fallback() {
        let bs = make_blocks("<html><head><title>第一章 童年</title></head><body></body></html>");
        assert_eq!(texts(&bs), vec!["第一章 童年"]);
        assert_eq!(bs[0].tag, BlockTag::Fallback);
    }

    #[test]
    fn test_denylisted_only_chapter_has_no_blocks() {
        let html = concat!(
            "<html><body>",
            "<svg><text>Cover illustration drawn by the author, with thanks.</text></svg>",
            "<noscript>Please enable scripts.</noscript>",
            "</body></html>"
        );
        assert!(make_blocks(html).is_empty());
        assert!(make_blocks("<script>var chapter = loadChapter(1); render(chapter, 'main');").is_empty());
    }

    #[test]
    fn test_comments_dropped() {
        let bs = make_blocks("<p>kept<!-- hidden --> text</p>");
        assert_eq!(texts(&bs), vec!["kept text"]);
    }

    #[test]
    fn test_entities_decoded() {
        let bs = make_blocks("<p>Use &lt;year&gt; &amp; more</p>");
        assert_eq!(bs[0].text, "Use <year> & more");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n\t b  "), " a b ");
        assert_eq!(normalize_whitespace("\u{00A0}€\u{202F} \t"), " € ");
        assert_eq!(normalize_whitespace("abc"), "abc");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("\u{00A0}\t "));
        assert!(!is_blank("  #  "));
    }
}

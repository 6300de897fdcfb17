//! Noise, decoration and TOC patterns shared by the classifier and the
//! context reclassifier.

use std::sync::LazyLock;

use regex::Regex;

use crate::block_maker::normalize_whitespace;

/// Generic labels that carry nothing speakable when wrapped in decoration.
static WRAPPED_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[=\-_~*#—–＝－～]{3,}\s*(?:正文开始|正文|内容简介|作品简介|简介|目录|全文完|本章完|分割线|完|contents?|start|begin|end|text)\s*[=\-_~*#—–＝－～]{3,}",
    )
    .unwrap()
});

/// Decoration around arbitrary inner text; the inner text survives.
static WRAPPED_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[=\-_~*#—–＝－～]{3,}\s*([^=\-_~*#—–＝－～]+?)\s*[=\-_~*#—–＝－～]{3,}").unwrap()
});

/// A quoted work title wrapped in parentheses: `（《明实录》）`.
static TITLE_IN_PARENS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[（(]\s*(《[^《》]+》|〈[^〈〉]+〉)\s*[）)]").unwrap()
});

static TOC_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:目\s*录|目\s*次|contents|table\s+of\s+contents|toc)$").unwrap()
});

/// Three or more symbol/bullet characters and nothing else.
static DECORATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[\-_=*~#·•●○◆◇■□★☆※+.。…—–＝－～]\s*){3,}$").unwrap()
});

static PAGE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[\-—–]\s*)?(?:第\s*)?(?:page\s+|p\.\s*)?\d{1,4}(?:\s*页)?(?:\s*[\-—–])?$")
        .unwrap()
});

/// Numbered chapter/section prefix or generic heading word, leader characters,
/// terminal page number: `第一章 童年 ........ 12`, `Chapter II ____ 21`.
static TOC_ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^(?:
            第\s*[0-9零〇一二三四五六七八九十百千两]+\s*[章节卷部篇回集]
          | (?i:chapter|part|section|book|volume|appendix|preface|prologue|epilogue|introduction|foreword|afterword|contents)\b
          | 序言 | 前言 | 后记 | 尾声 | 附录 | 引子 | 楔子
          | \d+(?:\.\d+)*
        )
        .{0,80}?
        (?:[.．·・…_\-—–]\s*){3,}
        \d{1,4}$",
    )
    .unwrap()
});

/// Short English heading fragments such as "Chapter IV" or "Part II".
static SHORT_TOC_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:chapter|part|section|book|volume|act|scene|appendix|prologue|epilogue)\s+(?:\d+|[ivxlcdm]+|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|[a-z])\b",
    )
    .unwrap()
});

static CJK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{Han}\p{Hiragana}\p{Katakana}\p{Hangul}]").unwrap());

/// Sentence-final punctuation across CJK and Latin scripts.
pub(crate) const SENTENCE_FINAL: &[char] = &['。', '！', '？', '!', '?', '.', '…'];

/// Sentence and clause punctuation counted for punctuation density.
pub(crate) const PUNCTUATION: &[char] = &[
    '。', '！', '？', '!', '?', '.', '…', '，', ',', '、', '；', ';', '：', ':',
];

/// Remove decorated generic markers and unwrap decoration around other text.
///
/// Returns the whitespace-collapsed, trimmed result (possibly empty).
pub fn strip_decoration(text: &str) -> String {
    let without_markers = WRAPPED_MARKER_RE.replace_all(text, " ");
    let unwrapped = WRAPPED_TEXT_RE.replace_all(&without_markers, " ${1} ");
    normalize_whitespace(&unwrapped).trim().to_string()
}

/// `（《书名》）` → `《书名》`.
pub fn unwrap_parenthesized_titles(text: &str) -> String {
    TITLE_IN_PARENS_RE.replace_all(text, "${1}").into_owned()
}

pub fn is_toc_header(text: &str) -> bool {
    TOC_HEADER_RE.is_match(text.trim())
}

pub fn is_decoration_line(text: &str) -> bool {
    DECORATION_RE.is_match(text.trim())
}

pub fn is_page_number(text: &str) -> bool {
    PAGE_NUMBER_RE.is_match(text.trim())
}

pub fn is_toc_entry(text: &str) -> bool {
    TOC_ENTRY_RE.is_match(text.trim())
}

/// Any of the full-match noise shapes.
pub fn is_noise(text: &str) -> bool {
    is_toc_header(text) || is_decoration_line(text) || is_page_number(text) || is_toc_entry(text)
}

pub fn is_short_toc_prefix(text: &str) -> bool {
    SHORT_TOC_PREFIX_RE.is_match(text.trim())
}

pub fn contains_cjk(text: &str) -> bool {
    CJK_RE.is_match(text)
}

pub fn has_sentence_final(text: &str) -> bool {
    text.contains(SENTENCE_FINAL)
}

pub fn punctuation_count(text: &str) -> usize {
    text.chars().filter(|c| PUNCTUATION.contains(c)).count()
}

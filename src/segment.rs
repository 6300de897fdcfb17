use serde::Serialize;

use crate::error::CleanError;

/// Default upper bound on segment length, in characters.
pub const DEFAULT_MAX_SEGMENT_LENGTH: usize = 500;

/// Sentence-final marks (CJK and Latin). The mark stays with the preceding segment.
const SENTENCE_ENDINGS: &[char] = &['。', '！', '？', '!', '?', '；', ';', '.'];

/// Clause separators applied to sentences longer than half the maximum.
const CLAUSE_SEPARATORS: &[char] = &['；', '：', '，', ':', ';', ','];

/// Marks tried in order on segments that still exceed the maximum.
const SPLIT_MARKS: &[&str] = &[
    ",", ";", ":", "—", "–", "-", "，", "；", "：", "、", "——", "。", "（", "）", "【", "】",
    "《", "》", "〈", "〉",
];

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split after every char in `marks`, trimming pieces and dropping empty ones.
fn split_after_chars(text: &str, marks: &[char]) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for (i, ch) in text.char_indices() {
        if marks.contains(&ch) {
            let end = i + ch.len_utf8();
            push_trimmed(&mut pieces, &text[start..end]);
            start = end;
        }
    }
    push_trimmed(&mut pieces, &text[start..]);
    pieces
}

fn push_trimmed(pieces: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        pieces.push(piece.to_string());
    }
}

/// Split on every occurrence of `mark`, reattaching it to all but the last piece.
fn split_on_mark(segment: &str, mark: &str) -> Vec<String> {
    let parts: Vec<&str> = segment.split(mark).collect();
    let last = parts.len() - 1;
    parts
        .iter()
        .enumerate()
        .filter_map(|(i, part)| {
            let part = part.trim();
            if part.is_empty() {
                None
            } else if i < last {
                Some(format!("{part}{mark}"))
            } else {
                Some(part.to_string())
            }
        })
        .collect()
}

/// Divides cleaned chapter text into units sized for one speech call each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segmenter {
    max_segment_length: usize,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self {
            max_segment_length: DEFAULT_MAX_SEGMENT_LENGTH,
        }
    }
}

impl Segmenter {
    /// Returns [`CleanError::InvalidSegmentLength`] for a zero length.
    pub fn new(max_segment_length: usize) -> Result<Self, CleanError> {
        if max_segment_length == 0 {
            return Err(CleanError::InvalidSegmentLength(max_segment_length));
        }
        Ok(Self { max_segment_length })
    }

    pub fn max_segment_length(&self) -> usize {
        self.max_segment_length
    }

    /// Split `text` into ordered, non-empty segments.
    ///
    /// Every segment is at most `max_segment_length` characters unless it is a
    /// single whitespace-free run with no split mark, which is emitted whole.
    /// Whitespace at split points is trimmed; no other text is lost.
    pub fn split(&self, text: &str) -> Vec<String> {
        let clause_threshold = self.max_segment_length / 2;
        let mut segments = Vec::new();

        for sentence in split_after_chars(text, SENTENCE_ENDINGS) {
            if char_len(&sentence) > clause_threshold {
                for clause in split_after_chars(&sentence, CLAUSE_SEPARATORS) {
                    self.split_long(clause, &mut segments);
                }
            } else {
                self.split_long(sentence, &mut segments);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            segments = segments.len(),
            max = self.max_segment_length,
            "split chapter text"
        );
        segments
    }

    fn split_long(&self, segment: String, out: &mut Vec<String>) {
        if char_len(&segment) <= self.max_segment_length {
            out.push(segment);
            return;
        }

        // A mark counts only if it actually divides the segment.
        for mark in SPLIT_MARKS {
            if !segment.contains(mark) {
                continue;
            }
            let pieces = split_on_mark(&segment, mark);
            if pieces.len() > 1 {
                for piece in pieces {
                    self.split_long(piece, out);
                }
                return;
            }
        }

        let words: Vec<&str> = segment.split_whitespace().collect();
        if words.len() < 2 {
            out.push(segment);
            return;
        }
        let mid = words.len() / 2;
        self.split_long(words[..mid].join(" "), out);
        self.split_long(words[mid..].join(" "), out);
    }

    /// Segment `text` and summarize the result.
    pub fn stats(&self, text: &str) -> SegmentStats {
        SegmentStats::from_segments(text, &self.split(text))
    }
}

/// Size summary of a text and the segments it was split into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentStats {
    /// Characters in the input text, including whitespace trimmed at split points.
    pub total_chars: usize,
    pub segment_count: usize,
    /// Mean segment length in characters.
    pub average_length: f64,
    pub longest: String,
    /// First three segments.
    pub samples: Vec<String>,
}

impl SegmentStats {
    /// `segments` is the split of `text`.
    pub fn from_segments(text: &str, segments: &[String]) -> Self {
        let segment_chars: usize = segments.iter().map(|s| char_len(s)).sum();
        let average_length = if segments.is_empty() {
            0.0
        } else {
            segment_chars as f64 / segments.len() as f64
        };
        // First of equal-length maxima wins.
        let longest = segments
            .iter()
            .fold(None::<&String>, |best, s| match best {
                Some(b) if char_len(b) >= char_len(s) => Some(b),
                _ => Some(s),
            })
            .cloned()
            .unwrap_or_default();

        Self {
            total_chars: char_len(text),
            segment_count: segments.len(),
            average_length,
            longest,
            samples: segments.iter().take(3).cloned().collect(),
        }
    }
}

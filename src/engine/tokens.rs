//! Characters-to-tokens estimate shared by every strategy.

use crate::transcript::ContentBlock;

/// Rough token estimate: ~4 characters per token
pub const CHARS_PER_TOKEN: usize = 4;

pub fn estimate_text_tokens(text: &str) -> usize {
    text.chars().count() / CHARS_PER_TOKEN
}

/// Tokens held by the text blocks of a content list. Images count as zero.
pub fn estimate_block_tokens(blocks: &[ContentBlock]) -> usize {
    text_chars(blocks) / CHARS_PER_TOKEN
}

pub fn text_chars(blocks: &[ContentBlock]) -> usize {
    blocks
        .iter()
        .filter_map(ContentBlock::as_text)
        .map(|t| t.chars().count())
        .sum()
}

/// First `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

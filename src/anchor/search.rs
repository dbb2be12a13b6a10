//! Case- and accent-insensitive range search
//!
//! Both the buffer and the locator are decoded, decomposed (NFKD), stripped
//! of combining marks and lowercased before matching. Every folded character
//! remembers which decoded character produced it, so the first match maps
//! back to a decoded range of the buffer.

use std::ops::Range;

use unicode_normalization::char::{decompose_compatible, is_combining_mark};

use super::locator::Locator;
use crate::html::DecodedView;

/// A matched locator, as a range of decoded characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub start: usize,
    pub end: usize,
}

/// Result of locating a highlight in a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Where the whole locator matched
    pub anchor: Anchor,
    /// Decoded range of the highlighted content inside the anchor
    ///
    /// `None` when the content cannot be placed, e.g. it folds to nothing.
    pub content: Option<Range<usize>>,
}

/// Folded text with the decoded index behind each folded character
struct FoldedText {
    text: String,
    /// (byte offset in `text`, decoded character index)
    origins: Vec<(usize, usize)>,
}

impl FoldedText {
    fn new(chars: &[char]) -> Self {
        let mut text = String::with_capacity(chars.len());
        let mut origins = Vec::with_capacity(chars.len());

        for (index, &c) in chars.iter().enumerate() {
            decompose_compatible(c, |d| {
                if is_combining_mark(d) {
                    return;
                }
                for lower in d.to_lowercase() {
                    origins.push((text.len(), index));
                    text.push(lower);
                }
            });
        }

        Self { text, origins }
    }

    /// Decoded index of the folded character starting at `byte`
    fn origin_at(&self, byte: usize) -> Option<usize> {
        self.origins
            .binary_search_by_key(&byte, |&(offset, _)| offset)
            .ok()
            .map(|i| self.origins[i].1)
    }

    /// Decoded index of the last folded character before `byte`
    fn origin_before(&self, byte: usize) -> Option<usize> {
        let i = self.origins.partition_point(|&(offset, _)| offset < byte);
        i.checked_sub(1).map(|i| self.origins[i].1)
    }

    /// Decoded range covering the folded bytes `start..end`
    ///
    /// Combining marks that follow the last character stay with it.
    fn decoded_range(&self, chars: &[char], start: usize, end: usize) -> Option<Range<usize>> {
        let first = self.origin_at(start)?;
        let last = self.origin_before(end)?;

        let mut end = last + 1;
        while end < chars.len() && is_combining_mark(chars[end]) {
            end += 1;
        }

        Some(first..end)
    }
}

/// Fold text the way the range locator compares it
pub fn fold_for_search(text: &str) -> String {
    FoldedText::new(DecodedView::new(text).chars()).text
}

/// Find the first occurrence of `locator` in `view`
///
/// The locator text is given in the buffer's escaped form and decoded with
/// the same rules as the buffer. Only the first match in document order is
/// returned. The content boundaries are measured in folded characters and
/// mapped back through the buffer, so they stay correct when the buffer and
/// the stored context differ in composition or ligatures.
pub fn locate(view: &DecodedView, locator: &Locator) -> Option<Match> {
    let needle = fold_for_search(&locator.text);
    if needle.is_empty() {
        return None;
    }

    let haystack = FoldedText::new(view.chars());
    let pos = haystack.text.find(&needle)?;
    let chars = view.chars();

    let whole = haystack.decoded_range(chars, pos, pos + needle.len())?;
    let anchor = Anchor {
        start: whole.start,
        end: whole.end,
    };

    let content_start = locator.folded_pre.len();
    let content_end = content_start + locator.folded_content.len();
    let placed = !locator.folded_content.is_empty()
        && needle.starts_with(&locator.folded_pre)
        && needle
            .get(content_start..content_end)
            .is_some_and(|folded| folded == locator.folded_content);

    let content = if placed {
        haystack.decoded_range(chars, pos + content_start, pos + content_end)
    } else {
        None
    };

    Some(Match { anchor, content })
}

//! Locator construction
//!
//! A locator is `contentPre + content + contentPost`, written the way the
//! chapter buffer stores it, so it is expected to occur once in the chapter.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::search::fold_for_search;
use crate::highlights::AnchorRequest;
use crate::html::escape_curly_quotes;

/// Repair applied to locators built from malformed stored context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RepairConfig {
    /// Shortest trailing run considered an accidental duplicate (0 disables)
    pub min_duplicate_run: usize,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            min_duplicate_run: 8,
        }
    }
}

impl RepairConfig {
    pub fn disabled() -> Self {
        Self {
            min_duplicate_run: 0,
        }
    }

    /// Collapse a literally duplicated trailing run once
    ///
    /// `"... to perform to perform"` becomes `"... to perform"` when the run
    /// is at least `min_duplicate_run` characters and not only whitespace.
    /// The longest duplicated run wins. The first `keep` bytes are never
    /// removed: a run whose second copy starts inside them is left alone.
    pub fn collapse_duplicate_suffix<'a>(&self, text: &'a str, keep: usize) -> Cow<'a, str> {
        if self.min_duplicate_run == 0 {
            return Cow::Borrowed(text);
        }

        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let total = chars.len();

        for run in (self.min_duplicate_run..=total / 2).rev() {
            let first = &chars[total - 2 * run..total - run];
            let second = &chars[total - run..];

            let cut = second[0].0;
            if cut < keep {
                continue;
            }

            let duplicated = first.iter().map(|(_, c)| c).eq(second.iter().map(|(_, c)| c));
            if duplicated && second.iter().any(|(_, c)| !c.is_whitespace()) {
                tracing::debug!(run, "Collapsed duplicated locator suffix");
                return Cow::Owned(text[..cut].to_string());
            }
        }

        Cow::Borrowed(text)
    }
}

/// Search string for one highlight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    /// Locator text in the buffer's escaped form
    pub text: String,
    /// Folded form of the leading context
    pub folded_pre: String,
    /// Folded form of the highlighted content
    pub folded_content: String,
    /// Whether duplicate repair changed the text
    pub repaired: bool,
}

impl Locator {
    /// Build the locator for a validated highlight
    ///
    /// Repair only ever trims the trailing context, so the locator always
    /// starts with the escaped `contentPre + content`.
    pub fn build(request: &AnchorRequest<'_>, repair: &RepairConfig) -> Self {
        let pre = escape_curly_quotes(request.content_pre);
        let content = escape_curly_quotes(request.content);
        let post = escape_curly_quotes(request.content_post);

        let composed = [pre.as_ref(), content.as_ref(), post.as_ref()].concat();
        let text = repair.collapse_duplicate_suffix(&composed, pre.len() + content.len());

        Self {
            repaired: matches!(text, Cow::Owned(_)),
            text: text.into_owned(),
            folded_pre: fold_for_search(&pre),
            folded_content: fold_for_search(&content),
        }
    }
}

//! Highlight record types
//!
//! `Highlight` mirrors the record persisted by the annotation store. It is
//! read-only input to an injection pass; `validate` turns it into an
//! `AnchorRequest` once the required fields have been checked.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::html::InjectError;

/// A stored highlight annotation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    /// The book this highlight belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_id: Option<String>,
    /// Unique identifier, embedded into the generated markup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_id: Option<String>,
    /// The exact highlighted text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Text immediately before `content` when the highlight was made
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_pre: Option<String>,
    /// Text immediately after `content` when the highlight was made
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_post: Option<String>,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Page index
    #[serde(default)]
    pub page: i32,
    /// Style code, see [`HighlightStyle`]
    #[serde(default, rename = "type")]
    pub style_code: i32,
    /// Legacy offset hint (never used for positioning)
    #[serde(default = "legacy_offset")]
    pub start_offset: i32,
    /// Legacy offset hint (never used for positioning)
    #[serde(default = "legacy_offset")]
    pub end_offset: i32,
    /// Attached note, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_for_highlight: Option<String>,
}

fn legacy_offset() -> i32 {
    -1
}

/// Built-in highlight styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightStyle {
    Yellow,
    Green,
    Blue,
    Pink,
    Underline,
}

impl HighlightStyle {
    pub const ALL: [HighlightStyle; 5] = [
        HighlightStyle::Yellow,
        HighlightStyle::Green,
        HighlightStyle::Blue,
        HighlightStyle::Pink,
        HighlightStyle::Underline,
    ];

    pub fn code(self) -> i32 {
        match self {
            HighlightStyle::Yellow => 0,
            HighlightStyle::Green => 1,
            HighlightStyle::Blue => 2,
            HighlightStyle::Pink => 3,
            HighlightStyle::Underline => 4,
        }
    }

    /// CSS class consumed by the reader stylesheet
    pub fn class_name(self) -> &'static str {
        match self {
            HighlightStyle::Yellow => "highlight-yellow",
            HighlightStyle::Green => "highlight-green",
            HighlightStyle::Blue => "highlight-blue",
            HighlightStyle::Pink => "highlight-pink",
            HighlightStyle::Underline => "highlight-underline",
        }
    }
}

/// Mapping from style codes to CSS class names
///
/// The table is shared with the stylesheet, so lookups never fall back to a
/// default: an unmapped code is reported as an invalid highlight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleClassMap {
    classes: BTreeMap<i32, String>,
}

impl Default for StyleClassMap {
    fn default() -> Self {
        HighlightStyle::ALL
            .iter()
            .map(|style| (style.code(), style.class_name().to_string()))
            .collect()
    }
}

impl FromIterator<(i32, String)> for StyleClassMap {
    fn from_iter<T: IntoIterator<Item = (i32, String)>>(iter: T) -> Self {
        Self {
            classes: iter.into_iter().collect(),
        }
    }
}

impl StyleClassMap {
    /// Class name for a style code
    pub fn class_for(&self, code: i32) -> Option<&str> {
        self.classes.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Parse `code=class` pairs separated by commas
    pub fn parse(pairs: &str) -> Result<Self, String> {
        pairs.split(',')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (code, class) = pair
                    .split_once('=')
                    .ok_or_else(|| format!("expected code=class, got '{}'", pair))?;
                let code = code
                    .trim()
                    .parse::<i32>()
                    .map_err(|e| format!("invalid style code '{}': {}", code.trim(), e))?;
                let class = class.trim();
                if class.is_empty() {
                    return Err(format!("empty class name for style code {}", code));
                }
                Ok((code, class.to_string()))
            })
            .collect()
    }
}

/// A highlight that passed validation, ready for anchoring
#[derive(Debug, Clone, Copy)]
pub struct AnchorRequest<'a> {
    pub highlight_id: &'a str,
    pub content: &'a str,
    pub content_pre: &'a str,
    pub content_post: &'a str,
    pub style_class: &'a str,
    pub has_note: bool,
}

impl Highlight {
    /// Create a highlight with a fresh id and the default style
    pub fn new(content: &str) -> Self {
        Self {
            highlight_id: Some(Uuid::new_v4().to_string().to_uppercase()),
            content: Some(content.to_string()),
            date: Some(Utc::now()),
            start_offset: legacy_offset(),
            end_offset: legacy_offset(),
            ..Self::default()
        }
    }

    /// Set the surrounding context
    pub fn with_context(mut self, pre: &str, post: &str) -> Self {
        self.content_pre = Some(pre.to_string());
        self.content_post = Some(post.to_string());
        self
    }

    /// Attach a note
    pub fn with_note(mut self, note: &str) -> Self {
        self.note_for_highlight = Some(note.to_string());
        self
    }

    /// Set the style
    pub fn with_style(mut self, style: HighlightStyle) -> Self {
        self.style_code = style.code();
        self
    }

    /// Set the owning book
    pub fn with_book(mut self, book_id: &str) -> Self {
        self.book_id = Some(book_id.to_string());
        self
    }

    /// Check required fields and resolve the style class
    ///
    /// `index` is the position of the record in the caller's list and is only
    /// used for error reporting.
    pub fn validate<'a>(
        &'a self,
        index: usize,
        styles: &'a StyleClassMap,
    ) -> Result<AnchorRequest<'a>, InjectError> {
        let invalid = |reason: String| InjectError::InvalidHighlight { index, reason };

        let highlight_id = self
            .highlight_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| invalid("missing highlightId".to_string()))?;
        let content = self
            .content
            .as_deref()
            .filter(|content| !content.is_empty())
            .ok_or_else(|| invalid(format!("highlight {} has no content", highlight_id)))?;
        let style_class = styles.class_for(self.style_code).ok_or_else(|| {
            invalid(format!(
                "highlight {} has unknown style code {}",
                highlight_id, self.style_code
            ))
        })?;

        Ok(AnchorRequest {
            highlight_id,
            content,
            content_pre: self.content_pre.as_deref().unwrap_or(""),
            content_post: self.content_post.as_deref().unwrap_or(""),
            style_class,
            has_note: self.note_for_highlight.is_some(),
        })
    }
}

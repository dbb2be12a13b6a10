//! Highlight injection into chapter HTML
//!
//! Each stored highlight is re-anchored by searching for its context
//! (`contentPre + content + contentPost`) in the chapter, then the `content`
//! part of the match is replaced by a `<highlight>` element.
//!
//! Highlights are applied one after another, each search running against the
//! buffer as modified by the previous ones. The caller's list order is
//! therefore significant: a tag inserted for one highlight can break or move
//! the match of a later one. Running a pass twice over its own output is not
//! guaranteed to be a no-op.

use serde::{Deserialize, Serialize};

use super::entities::DecodedView;
use crate::anchor::{locate, Locator, RepairConfig};
use crate::highlights::{AnchorRequest, Highlight, StyleClassMap};

/// Element name of injected highlights
pub const HIGHLIGHT_ELEMENT: &str = "highlight";
/// Click handler for highlights without a note
pub const HIGHLIGHT_HANDLER: &str = "callHighlightURL";
/// Click handler for highlights with a note
pub const HIGHLIGHT_WITH_NOTE_HANDLER: &str = "callHighlightWithNoteURL";

/// Configuration for highlight injection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InjectorConfig {
    /// Style code to CSS class table
    pub style_classes: StyleClassMap,
    /// Locator repair settings
    pub repair: RepairConfig,
}

/// Per-highlight failure. None of these abort a pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InjectError {
    #[error("Highlight range not found: {highlight_id}")]
    AnchorNotFound { highlight_id: String },

    #[error("Invalid highlight at index {index}: {reason}")]
    InvalidHighlight { index: usize, reason: String },

    #[error("Malformed locator for highlight {highlight_id}: {reason}")]
    MalformedLocator { highlight_id: String, reason: String },
}

/// A highlight that was not injected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedHighlight {
    /// Position in the input list
    pub index: usize,
    pub highlight_id: Option<String>,
    pub reason: InjectError,
}

/// Result of highlight injection
#[derive(Debug, Clone)]
pub struct InjectionResult {
    /// The processed HTML with highlight elements
    pub html: String,
    /// Ids of injected highlights, in processing order
    pub injected: Vec<String>,
    /// Highlights that couldn't be anchored or were invalid
    pub skipped: Vec<SkippedHighlight>,
}

impl InjectionResult {
    fn unchanged(html: &str) -> Self {
        Self {
            html: html.to_string(),
            injected: vec![],
            skipped: vec![],
        }
    }

    pub fn injected_count(&self) -> usize {
        self.injected.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// True when nothing was injected
    pub fn is_unchanged(&self) -> bool {
        self.injected.is_empty()
    }
}

/// Injects stored highlights into chapter HTML
#[derive(Debug, Clone, Default)]
pub struct HighlightInjector {
    config: InjectorConfig,
}

impl HighlightInjector {
    pub fn new(config: InjectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InjectorConfig {
        &self.config
    }

    /// Inject `highlights` into `html`, in list order
    pub fn inject(&self, html: &str, highlights: &[Highlight]) -> InjectionResult {
        let result = inject_highlights(html, highlights, &self.config);

        tracing::info!(
            injected = result.injected_count(),
            skipped = result.skipped_count(),
            "Highlight injection pass complete"
        );

        result
    }
}

/// Inject highlights with the given configuration
pub fn inject_highlights(
    html: &str,
    highlights: &[Highlight],
    config: &InjectorConfig,
) -> InjectionResult {
    if highlights.is_empty() {
        return InjectionResult::unchanged(html);
    }
    highlights
        .iter()
        .enumerate()
        .fold(InjectionPass::new(html), |pass, (index, highlight)| {
            pass.apply(config, index, highlight)
        })
        .finish()
}

/// Buffer and bookkeeping carried from one highlight to the next
struct InjectionPass {
    buffer: String,
    injected: Vec<String>,
    skipped: Vec<SkippedHighlight>,
}

impl InjectionPass {
    fn new(html: &str) -> Self {
        Self {
            buffer: html.to_string(),
            injected: Vec::new(),
            skipped: Vec::new(),
        }
    }

    fn apply(mut self, config: &InjectorConfig, index: usize, highlight: &Highlight) -> Self {
        let outcome = highlight
            .validate(index, &config.style_classes)
            .and_then(|request| {
                splice_highlight(&mut self.buffer, &request, &config.repair)
                    .map(|()| request.highlight_id.to_string())
            });

        match outcome {
            Ok(highlight_id) => {
                tracing::debug!("Injected highlight {}", highlight_id);
                self.injected.push(highlight_id);
            }
            Err(reason) => {
                tracing::warn!("Skipping highlight: {}", reason);
                self.skipped.push(SkippedHighlight {
                    index,
                    highlight_id: highlight.highlight_id.clone(),
                    reason,
                });
            }
        }

        self
    }

    fn finish(self) -> InjectionResult {
        InjectionResult {
            html: self.buffer,
            injected: self.injected,
            skipped: self.skipped,
        }
    }
}

/// Anchor one highlight in `buffer` and replace its content with a tag
fn splice_highlight(
    buffer: &mut String,
    request: &AnchorRequest<'_>,
    repair: &RepairConfig,
) -> Result<(), InjectError> {
    let locator = Locator::build(request, repair);
    let view = DecodedView::new(buffer);

    let found = locate(&view, &locator).ok_or_else(|| InjectError::AnchorNotFound {
        highlight_id: request.highlight_id.to_string(),
    })?;

    let malformed = |reason: &str| InjectError::MalformedLocator {
        highlight_id: request.highlight_id.to_string(),
        reason: reason.to_string(),
    };
    let content = found
        .content
        .ok_or_else(|| malformed("content cannot be placed inside the match"))?;
    let raw = view
        .raw_range(content)
        .ok_or_else(|| malformed("content range outside the chapter"))?;

    let tag = make_tag(request, request.style_class);
    buffer.replace_range(raw, &tag);
    Ok(())
}

/// Markup for one highlight
///
/// `content` is inserted as stored, without escaping.
pub fn make_tag(request: &AnchorRequest<'_>, style_class: &str) -> String {
    let handler = if request.has_note {
        HIGHLIGHT_WITH_NOTE_HANDLER
    } else {
        HIGHLIGHT_HANDLER
    };

    format!(
        "<{element} id=\"{}\" onclick=\"{}(this);\" class=\"{}\">{}</{element}>",
        request.highlight_id,
        handler,
        style_class,
        request.content,
        element = HIGHLIGHT_ELEMENT,
    )
}

/// Number of highlight elements in `html`
pub fn count_highlight_tags(html: &str) -> usize {
    html.matches("</highlight>").count()
}

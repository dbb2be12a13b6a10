//! HTML processing module
//!
//! Provides HTML manipulation for EPUB chapter content including:
//! - Character reference decoding with raw offset tracking
//! - Highlight element injection

mod entities;
mod highlight_injector;

pub use entities::{decode_entities, escape_curly_quotes, DecodedView};
pub use highlight_injector::{
    count_highlight_tags, inject_highlights, make_tag, HighlightInjector, InjectError,
    InjectionResult, InjectorConfig, SkippedHighlight, HIGHLIGHT_ELEMENT, HIGHLIGHT_HANDLER,
    HIGHLIGHT_WITH_NOTE_HANDLER,
};

//! Highlight module
//!
//! Highlight records as stored by the annotation store, the built-in style
//! table, and validation into anchoring requests.

mod types;

pub use types::{AnchorRequest, Highlight, HighlightStyle, StyleClassMap};

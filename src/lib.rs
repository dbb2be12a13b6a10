//! Los Libros Highlights
//!
//! Re-anchors stored highlights inside EPUB chapter HTML and injects
//! `<highlight>` elements for the reading view.
//!
//! # Modules
//!
//! - `highlights`: Stored highlight records and the style table
//! - `anchor`: Locator construction and case/accent-insensitive search
//! - `html`: Character reference handling and the injector itself
//! - `routes`: HTTP surface used by the server binary

pub mod anchor;
pub mod config;
pub mod error;
pub mod highlights;
pub mod html;
pub mod routes;
pub mod state;

pub use highlights::{Highlight, HighlightStyle, StyleClassMap};
pub use html::{inject_highlights, HighlightInjector, InjectError, InjectionResult, InjectorConfig};

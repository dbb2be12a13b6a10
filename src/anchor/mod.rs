//! Anchoring module
//!
//! Re-finds stored highlights inside chapter HTML:
//! - `locator`: builds the context search string for a highlight
//! - `search`: case- and accent-insensitive first-match search

mod locator;
mod search;

pub use locator::{Locator, RepairConfig};
pub use search::{fold_for_search, locate, Anchor, Match};

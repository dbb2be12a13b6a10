//! HTML character reference handling
//!
//! Searching happens on decoded text while splicing happens on the raw
//! buffer. `DecodedView` keeps, for every decoded character, the raw byte
//! span it was read from so that a range in one maps onto the other.

use std::borrow::Cow;
use std::ops::Range;

/// Longest character reference we try to decode (`&CounterClockwiseContourIntegral;`)
const MAX_REFERENCE_LEN: usize = 40;

/// Decode named and numeric character references
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(text)
}

/// Rewrite curly double quotes to their numeric references
pub fn escape_curly_quotes(text: &str) -> Cow<'_, str> {
    if !text.contains(['\u{201C}', '\u{201D}']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace('\u{201C}', "&#x201C;")
            .replace('\u{201D}', "&#x201D;"),
    )
}

/// Decoded characters of a raw buffer, each tied to its raw byte span
#[derive(Debug, Clone)]
pub struct DecodedView {
    chars: Vec<char>,
    spans: Vec<Range<usize>>,
}

impl DecodedView {
    pub fn new(raw: &str) -> Self {
        let mut chars = Vec::with_capacity(raw.len());
        let mut spans = Vec::with_capacity(raw.len());
        let bytes = raw.as_bytes();
        let mut pos = 0;

        while pos < raw.len() {
            if bytes[pos] == b'&' {
                if let Some(end) = reference_end(bytes, pos) {
                    let reference = &raw[pos..end];
                    let decoded = decode_entities(reference);
                    if decoded != reference {
                        for c in decoded.chars() {
                            chars.push(c);
                            spans.push(pos..end);
                        }
                        pos = end;
                        continue;
                    }
                }
            }

            let Some(c) = raw[pos..].chars().next() else {
                break;
            };
            let next = pos + c.len_utf8();
            chars.push(c);
            spans.push(pos..next);
            pos = next;
        }

        Self { chars, spans }
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Raw byte range covering a non-empty range of decoded characters
    pub fn raw_range(&self, decoded: Range<usize>) -> Option<Range<usize>> {
        if decoded.start >= decoded.end || decoded.end > self.chars.len() {
            return None;
        }
        Some(self.spans[decoded.start].start..self.spans[decoded.end - 1].end)
    }
}

/// End (exclusive) of a `&...;` reference starting at `start`
fn reference_end(bytes: &[u8], start: usize) -> Option<usize> {
    let limit = (start + MAX_REFERENCE_LEN).min(bytes.len());
    for (offset, &b) in bytes[start + 1..limit].iter().enumerate() {
        match b {
            b';' if offset > 0 => return Some(start + offset + 2),
            b'#' | b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' => {}
            _ => return None,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(view: &DecodedView) -> String {
        view.chars().iter().collect()
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&#x201C;hi&#x201D;"), "\u{201C}hi\u{201D}");
        assert_eq!(decode_entities("caf&eacute;"), "café");
        assert_eq!(decode_entities("plain"), "plain");
    }

    #[test]
    fn test_escape_curly_quotes() {
        assert_eq!(
            escape_curly_quotes("who \u{201C}had everything\u{201D}"),
            "who &#x201C;had everything&#x201D;"
        );
        assert!(matches!(escape_curly_quotes("no quotes"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_view_maps_references_to_raw_spans() {
        let raw = "a &amp; b";
        let view = DecodedView::new(raw);

        assert_eq!(text(&view), "a & b");
        assert_eq!(view.chars().len(), 5);
        // "&" is decoded index 2 and covers the whole reference
        assert_eq!(view.raw_range(2..3), Some(2..7));
        assert_eq!(&raw[view.raw_range(2..5).unwrap()], "&amp; b");
    }

    #[test]
    fn test_view_keeps_unknown_references_literal() {
        let raw = "fish &chips; & &notareference";
        let view = DecodedView::new(raw);

        assert_eq!(text(&view), raw);
        assert_eq!(view.chars().len(), raw.chars().count());
    }

    #[test]
    fn test_view_multibyte_characters() {
        let raw = "naïve &#233;t&eacute;";
        let view = DecodedView::new(raw);

        assert_eq!(text(&view), "naïve été");
        let range = view.raw_range(6..9).unwrap();
        assert_eq!(&raw[range], "&#233;t&eacute;");
    }

    #[test]
    fn test_raw_range_rejects_empty_and_out_of_bounds() {
        let view = DecodedView::new("abc");

        assert_eq!(view.raw_range(1..1), None);
        assert_eq!(view.raw_range(2..4), None);
        assert_eq!(view.raw_range(0..3), Some(0..3));
    }

    #[test]
    fn test_view_of_quote_references() {
        let view = DecodedView::new("&#x201C;x&#x201D;");

        assert_eq!(text(&view), "\u{201C}x\u{201D}");
        assert_eq!(view.raw_range(1..2), Some(8..9));
        assert!(DecodedView::new("").chars().is_empty());
    }
}

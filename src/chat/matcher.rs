//! AnnotationCortex - chat reference detection
//!
//! Walks a message left to right trying an ordered list of anchored
//! patterns at each candidate position. The first pattern that matches
//! wins and scanning resumes past the consumed span, so matches never
//! overlap. Compound forms are tried ahead of their prefixes: a
//! `@GGG#D$plot` reference must not decay into `@GGG#D` plus a stray
//! plot.
//!
//! Recognized forms:
//! - `@GGG#D$plot` - glider + dive + plot
//! - `@GGG#D`      - glider + dive
//! - `@GGG`        - glider (exactly three digits)
//! - `#D$plot`     - dive + plot on the current glider
//! - `#D`          - dive
//! - `$plot`       - plot (lowercase alphanumeric name)
//! - `[text](url)` - external http/https link

use regex::Regex;
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

use super::token::{RefKind, RefMatch, Segment};

// =============================================================================
// Candidate patterns
// =============================================================================

/// One candidate: kind, position-anchored pattern, capture field names
struct Candidate {
    kind: RefKind,
    pattern: Regex,
    fields: &'static [&'static str],
}

impl Candidate {
    fn new(kind: RefKind, pattern: &str, fields: &'static [&'static str]) -> Self {
        Self {
            kind,
            pattern: Regex::new(pattern).expect("candidate pattern should compile"),
            fields,
        }
    }
}

// =============================================================================
// AnnotationCortex
// =============================================================================

/// Ordered-pattern reference matcher
///
/// Stateless across calls; one instance serves any number of messages.
#[wasm_bindgen]
pub struct AnnotationCortex {
    candidates: Vec<Candidate>,
}

impl Default for AnnotationCortex {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl AnnotationCortex {
    /// Create a new AnnotationCortex with all patterns compiled
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        // Digit classes are ASCII [0-9]; plot names are case-sensitive
        // lowercase alphanumerics. Order is the precedence.
        let candidates = vec![
            Candidate::new(
                RefKind::GliderDivePlot,
                r"^@([0-9]{3})#([0-9]+)\$([a-z0-9]+)",
                &["glider", "dive", "plot"],
            ),
            Candidate::new(
                RefKind::GliderDive,
                r"^@([0-9]{3})#([0-9]+)",
                &["glider", "dive"],
            ),
            Candidate::new(RefKind::Glider, r"^@([0-9]{3})", &["glider"]),
            Candidate::new(
                RefKind::DivePlot,
                r"^#([0-9]+)\$([a-z0-9]+)",
                &["dive", "plot"],
            ),
            Candidate::new(RefKind::Dive, r"^#([0-9]+)", &["dive"]),
            Candidate::new(RefKind::Plot, r"^\$([a-z0-9]+)", &["plot"]),
            Candidate::new(
                RefKind::Link,
                r"^\[([\w\s]+)\]\((https?://[a-z0-9@#/.\-]+)\)",
                &["text", "url"],
            ),
        ];

        Self { candidates }
    }

    /// Scan and return matches as a JS array
    #[wasm_bindgen(js_name = scan)]
    pub fn js_scan(&self, text: &str) -> JsValue {
        serde_wasm_bindgen::to_value(&self.scan(text)).unwrap_or(JsValue::NULL)
    }
}

impl AnnotationCortex {
    /// All references in `text`, leftmost first, non-overlapping
    pub fn scan(&self, text: &str) -> Vec<RefMatch> {
        let bytes = text.as_bytes();
        let mut found = Vec::new();
        let mut pos = 0;

        while pos < bytes.len() {
            // References only ever open on these ASCII bytes, so the
            // byte-wise walk never slices inside a multi-byte character.
            let attempted = match bytes[pos] {
                b'@' | b'#' | b'$' | b'[' => self.match_at(text, pos),
                _ => None,
            };
            match attempted {
                Some(m) => {
                    pos = m.end;
                    found.push(m);
                }
                None => pos += 1,
            }
        }

        found
    }

    /// Lossless decomposition: literal runs interleaved with references
    pub fn segments(&self, text: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut cursor = 0;

        for m in self.scan(text) {
            if cursor < m.start {
                segments.push(Segment::Literal {
                    start: cursor,
                    end: m.start,
                    text: text[cursor..m.start].to_string(),
                });
            }
            cursor = m.end;
            segments.push(Segment::Reference(m));
        }
        if cursor < text.len() {
            segments.push(Segment::Literal {
                start: cursor,
                end: text.len(),
                text: text[cursor..].to_string(),
            });
        }

        segments
    }

    /// Try every candidate at one position; first success wins
    fn match_at(&self, text: &str, pos: usize) -> Option<RefMatch> {
        let rest = &text[pos..];

        for candidate in &self.candidates {
            let cap = match candidate.pattern.captures(rest) {
                Some(cap) => cap,
                None => continue,
            };
            let full = cap.get(0).unwrap();

            // A bare glider reference is exactly three digits; a fourth
            // digit makes the whole run literal text.
            if candidate.kind == RefKind::Glider
                && rest.as_bytes().get(full.end()).is_some_and(|b| b.is_ascii_digit())
            {
                return None;
            }

            let mut captures = HashMap::new();
            for (i, field) in candidate.fields.iter().enumerate() {
                if let Some(group) = cap.get(i + 1) {
                    captures.insert((*field).to_string(), group.as_str().to_string());
                }
            }

            return Some(RefMatch {
                kind: candidate.kind,
                start: pos,
                end: pos + full.end(),
                text: full.as_str().to_string(),
                captures,
            });
        }

        None
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Vec<RefMatch> {
        AnnotationCortex::new().scan(text)
    }

    fn segments(text: &str) -> Vec<Segment> {
        AnnotationCortex::new().segments(text)
    }

    // -------------------------------------------------------------------------
    // Precedence
    // -------------------------------------------------------------------------

    #[test]
    fn test_full_reference_beats_prefix_forms() {
        let found = scan("@123#45$voltage");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, RefKind::GliderDivePlot);
        assert_eq!(found[0].text, "@123#45$voltage");
        assert_eq!(found[0].capture("glider"), Some("123"));
        assert_eq!(found[0].capture("dive"), Some("45"));
        assert_eq!(found[0].capture("plot"), Some("voltage"));
    }

    #[test]
    fn test_dive_plot_beats_bare_dive() {
        let found = scan("#7$volt");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, RefKind::DivePlot);
        assert_eq!(found[0].capture("dive"), Some("7"));
        assert_eq!(found[0].capture("plot"), Some("volt"));
    }

    #[test]
    fn test_glider_dive() {
        let found = scan("@565#102");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, RefKind::GliderDive);
        assert_eq!(found[0].capture("glider"), Some("565"));
        assert_eq!(found[0].capture("dive"), Some("102"));
    }

    #[test]
    fn test_bare_forms() {
        assert_eq!(scan("@123")[0].kind, RefKind::Glider);
        assert_eq!(scan("#7")[0].kind, RefKind::Dive);
        assert_eq!(scan("$battery")[0].kind, RefKind::Plot);
    }

    // -------------------------------------------------------------------------
    // Glider digit rule
    // -------------------------------------------------------------------------

    #[test]
    fn test_glider_needs_exactly_three_digits() {
        assert!(scan("@12").is_empty());
        assert!(scan("@1234").is_empty());
        assert!(scan("@").is_empty());
    }

    #[test]
    fn test_four_digit_run_after_at_is_all_literal() {
        let segs = segments("@1234");

        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].text(), "@1234");
    }

    #[test]
    fn test_glider_followed_by_non_digit_matches() {
        let found = scan("@123!");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, RefKind::Glider);
        assert_eq!(found[0].text, "@123");
    }

    // -------------------------------------------------------------------------
    // Plot name termination
    // -------------------------------------------------------------------------

    #[test]
    fn test_uppercase_plot_is_literal() {
        assert!(scan("$VOLT").is_empty());
    }

    #[test]
    fn test_uppercase_plot_downgrades_compound_form() {
        let found = scan("@123#45$VOLT");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, RefKind::GliderDive);
        assert_eq!(found[0].text, "@123#45");
    }

    #[test]
    fn test_plot_name_stops_at_first_invalid_char() {
        let found = scan("$volt7X");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, RefKind::Plot);
        assert_eq!(found[0].text, "$volt7");
        assert_eq!(found[0].capture("plot"), Some("volt7"));
    }

    // -------------------------------------------------------------------------
    // Links
    // -------------------------------------------------------------------------

    #[test]
    fn test_link() {
        let found = scan("[Report](https://example.com/a/b)");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, RefKind::Link);
        assert_eq!(found[0].capture("text"), Some("Report"));
        assert_eq!(found[0].capture("url"), Some("https://example.com/a/b"));
    }

    #[test]
    fn test_link_plain_http() {
        let found = scan("[status page](http://192.168.0.1/status)");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].capture("url"), Some("http://192.168.0.1/status"));
    }

    #[test]
    fn test_link_rejects_other_schemes() {
        assert!(scan("[x](ftp://example.com)").is_empty());
        assert!(scan("[x](javascript:alert(1))").is_empty());
    }

    #[test]
    fn test_link_rejects_uppercase_url() {
        assert!(scan("[x](https://EXAMPLE.COM)").is_empty());
    }

    // -------------------------------------------------------------------------
    // Ordering and position tracking
    // -------------------------------------------------------------------------

    #[test]
    fn test_positions_match_source_text() {
        let text = "hello @123 and #7";
        let found = scan(text);

        assert_eq!(found.len(), 2);
        for m in &found {
            assert_eq!(&text[m.start..m.end], m.text);
        }
        assert!(found[0].start < found[1].start);
    }

    #[test]
    fn test_adjacent_references() {
        let found = scan("#1#2");

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].text, "#1");
        assert_eq!(found[1].text, "#2");
    }

    #[test]
    fn test_trailing_plot_after_full_reference() {
        // The plot name ends at the second '$'; the rest re-scans on its own.
        let found = scan("@123#45$volt$age");

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].kind, RefKind::GliderDivePlot);
        assert_eq!(found[0].text, "@123#45$volt");
        assert_eq!(found[1].kind, RefKind::Plot);
        assert_eq!(found[1].text, "$age");
    }

    #[test]
    fn test_empty_input() {
        assert!(scan("").is_empty());
        assert!(segments("").is_empty());
    }

    // -------------------------------------------------------------------------
    // UTF-8 passthrough
    // -------------------------------------------------------------------------

    #[test]
    fn test_multibyte_literals_survive() {
        let text = "héllo @123#4$a wörld";
        let segs = segments(text);

        let rebuilt: String = segs.iter().map(Segment::text).collect();
        assert_eq!(rebuilt, text);

        let found = scan(text);
        assert_eq!(found.len(), 1);
        assert_eq!(&text[found[0].start..found[0].end], "@123#4$a");
    }

    // -------------------------------------------------------------------------
    // Segment decomposition
    // -------------------------------------------------------------------------

    #[test]
    fn test_segments_interleave_literals_and_references() {
        let segs = segments("hello @123#45$v world");

        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].text(), "hello ");
        assert!(matches!(segs[1], Segment::Reference(_)));
        assert_eq!(segs[2].text(), " world");
    }

    #[test]
    fn test_segments_reconstruct_input() {
        let inputs = [
            "no references at all",
            "@123#45$voltage",
            "a @123 b #7 c $p d [t](https://x.y) e",
            "@12 half-formed $BAD #",
            "#1#2#3",
        ];
        for input in inputs {
            let rebuilt: String = segments(input).iter().map(Segment::text).collect();
            assert_eq!(rebuilt, input);
        }
    }
}

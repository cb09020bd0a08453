//! Markup rendering for recognized chat references.
//!
//! Local references (same glider as the page being viewed) become
//! `span.spanClick` elements wired to the page's `setDive` /
//! `jumpScrollByName` handlers; remote references become hyperlinks
//! whose navigation target is keyed by glider id, so repeated
//! references to one glider reuse a single tab. External links open in
//! a fresh top-level context.

use serde::{Deserialize, Serialize};

use super::token::{RefKind, RefMatch};

// =============================================================================
// Configuration
// =============================================================================

/// Rendering options
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MarkupConfig {
    /// HTML-escape literal text, labels, and attribute values.
    /// Off by default: chat input is only accepted from logged-in
    /// pilots and the panel historically rendered it raw.
    #[serde(default)]
    pub escape_output: bool,

    /// Identifier used for the glider-only self check. `None` means the
    /// per-call context decides, which also governs every dive/plot
    /// locality decision.
    #[serde(default)]
    pub elision_context: Option<u32>,
}

// =============================================================================
// Rendering
// =============================================================================

/// Render one reference for the given page context.
///
/// Returns `None` only when a glider-only reference points at the
/// context it is rendered in; such self references contribute nothing
/// to the output.
pub fn render_reference(m: &RefMatch, context: u32, config: &MarkupConfig) -> Option<String> {
    let label = cook(&m.text, config);

    Some(match m.kind {
        RefKind::GliderDivePlot => {
            let glider = num(m, "glider");
            let dive = num(m, "dive");
            let plot = text(m, "plot");
            if glider == u64::from(context) {
                span_click(
                    &format!("setDive({}); jumpScrollByName('{}');", dive, plot),
                    &label,
                )
            } else {
                anchor(
                    &format!("/{}?dive={}&plot={}", glider, dive, plot),
                    &glider.to_string(),
                    &label,
                )
            }
        }
        RefKind::GliderDive => {
            let glider = num(m, "glider");
            let dive = num(m, "dive");
            if glider == u64::from(context) {
                span_click(&format!("setDive({});", dive), &label)
            } else {
                anchor(
                    &format!("/{}?dive={}", glider, dive),
                    &glider.to_string(),
                    &label,
                )
            }
        }
        RefKind::DivePlot => span_click(
            &format!(
                "setDive({}); jumpScrollByName('{}');",
                num(m, "dive"),
                text(m, "plot")
            ),
            &label,
        ),
        RefKind::Dive => span_click(&format!("setDive({});", num(m, "dive")), &label),
        RefKind::Plot => span_click(
            &format!("jumpScrollByName('{}');", text(m, "plot")),
            &label,
        ),
        RefKind::Glider => {
            let glider = num(m, "glider");
            let own = config.elision_context.unwrap_or(context);
            if glider == u64::from(own) {
                return None;
            }
            anchor(&format!("/{}", glider), &glider.to_string(), &label)
        }
        RefKind::Link => anchor(
            &cook(text(m, "url"), config),
            "_blank",
            &cook(text(m, "text"), config),
        ),
    })
}

/// Pass a literal span through, honoring the escape option
pub fn render_literal(text: &str, config: &MarkupConfig) -> String {
    cook(text, config)
}

// =============================================================================
// Helpers
// =============================================================================

fn span_click(action: &str, label: &str) -> String {
    format!(
        "<span class=\"spanClick\" onclick=\"{}\">{}</span>",
        action, label
    )
}

fn anchor(href: &str, target: &str, label: &str) -> String {
    format!("<a href=\"{}\" target=\"{}\">{}</a>", href, target, label)
}

fn cook(text: &str, config: &MarkupConfig) -> String {
    if config.escape_output {
        escape(text)
    } else {
        text.to_string()
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Numeric field, saturating on digit runs that exceed u64.
/// The matcher only ever captures ASCII digit sequences.
fn num(m: &RefMatch, field: &str) -> u64 {
    m.capture(field).map_or(0, |digits| {
        digits
            .bytes()
            .fold(0u64, |n, b| n.saturating_mul(10).saturating_add(u64::from(b - b'0')))
    })
}

fn text<'a>(m: &'a RefMatch, field: &str) -> &'a str {
    m.capture(field).unwrap_or("")
}

// =============================================================================
// Tests
// =============================================================================

//! ChatCortex - chat annotation facade
//!
//! Owns the compiled patterns and the markup configuration; one
//! instance serves any number of messages. Designed for WASM with a
//! single boundary call per message: the client hands over the raw
//! message and the glider id of the page, and gets back the markup
//! fragment to insert into the chat panel.

use wasm_bindgen::prelude::*;

use super::markup::{render_literal, render_reference, MarkupConfig};
use super::matcher::AnnotationCortex;
use super::token::{AnnotateStats, RefKind, RefMatch, Segment};

// =============================================================================
// ChatCortex
// =============================================================================

/// Chat annotation scanner/renderer
#[wasm_bindgen]
pub struct ChatCortex {
    matcher: AnnotationCortex,
    config: MarkupConfig,
}

impl Default for ChatCortex {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl ChatCortex {
    /// Create a ChatCortex with default rendering options
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_config(MarkupConfig::default())
    }

    /// Create a ChatCortex from a JS config object
    /// (`{ escape_output, elision_context }`)
    #[wasm_bindgen(js_name = withConfig)]
    pub fn js_with_config(config: JsValue) -> Result<ChatCortex, JsValue> {
        let config: MarkupConfig = serde_wasm_bindgen::from_value(config).map_err(|e| {
            web_sys::console::error_1(&format!("[ChatCortex] Bad config: {:?}", e).into());
            JsValue::from_str(&format!("config error: {}", e))
        })?;
        Ok(Self::with_config(config))
    }

    /// Replace reference tokens in one message with markup; all other
    /// text passes through in order
    #[wasm_bindgen(js_name = annotate)]
    pub fn js_annotate(&self, message: &str, glider: u32) -> String {
        self.annotate(message, glider)
    }

    /// References in one message as a JS array
    #[wasm_bindgen(js_name = scan)]
    pub fn js_scan(&self, message: &str) -> JsValue {
        serde_wasm_bindgen::to_value(&self.scan(message)).unwrap_or(JsValue::NULL)
    }

    /// Per-kind reference counts as a JS object
    #[wasm_bindgen(js_name = stats)]
    pub fn js_stats(&self, message: &str) -> JsValue {
        serde_wasm_bindgen::to_value(&self.stats(message)).unwrap_or(JsValue::NULL)
    }
}

impl ChatCortex {
    pub fn with_config(config: MarkupConfig) -> Self {
        Self {
            matcher: AnnotationCortex::new(),
            config,
        }
    }

    /// Parse a JSON config string (native embedders; the WASM path
    /// takes a JS object)
    pub fn from_config_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::with_config(serde_json::from_str(json)?))
    }

    /// Annotate one message for the given glider context
    pub fn annotate(&self, message: &str, glider: u32) -> String {
        let mut out = String::with_capacity(message.len());

        for segment in self.matcher.segments(message) {
            match segment {
                Segment::Literal { text, .. } => {
                    out.push_str(&render_literal(&text, &self.config));
                }
                Segment::Reference(m) => {
                    if let Some(markup) = render_reference(&m, glider, &self.config) {
                        out.push_str(&markup);
                    }
                }
            }
        }

        out
    }

    /// References in one message, leftmost first
    pub fn scan(&self, message: &str) -> Vec<RefMatch> {
        self.matcher.scan(message)
    }

    /// Lossless literal/reference decomposition of one message
    pub fn segments(&self, message: &str) -> Vec<Segment> {
        self.matcher.segments(message)
    }

    /// Count references per kind
    pub fn stats(&self, message: &str) -> AnnotateStats {
        let mut stats = AnnotateStats::default();

        for segment in self.matcher.segments(message) {
            match segment {
                Segment::Literal { text, .. } => stats.literal_bytes += text.len(),
                Segment::Reference(m) => match m.kind {
                    RefKind::GliderDivePlot => stats.glider_dive_plots += 1,
                    RefKind::GliderDive => stats.glider_dives += 1,
                    RefKind::Glider => stats.gliders += 1,
                    RefKind::DivePlot => stats.dive_plots += 1,
                    RefKind::Dive => stats.dives += 1,
                    RefKind::Plot => stats.plots += 1,
                    RefKind::Link => stats.links += 1,
                },
            }
        }

        stats
    }
}

// =============================================================================
// Tests
// =============================================================================

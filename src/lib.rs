//! VisCore: Chat Annotation Scanner
//!
//! A Rust/WASM implementation of the pilot chat reference markup.
//! Messages may embed structured references to a glider (`@GGG`), a
//! dive (`#D`), a named plot (`$plot`), compounds of the three, or an
//! external link; the scanner replaces each reference with a clickable
//! navigation element and passes everything else through untouched.
//!
//! # Architecture
//!
//! - `chat/token.rs`   - Reference kinds, matches, and the lossless segment decomposition
//! - `chat/matcher.rs` - AnnotationCortex: ordered-pattern reference detection
//! - `chat/markup.rs`  - Rendering rules (local action vs. cross-glider link) and options
//! - `chat/core.rs`    - ChatCortex: facade - single annotate() call per message
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { ChatCortex } from 'viscore';
//!
//! await init();
//!
//! const cortex = new ChatCortex();
//!
//! // The page shows glider 123: its own dive/plot references act in
//! // place, other gliders become links keyed by their id.
//! const html = cortex.annotate("compare @123#45$voltage with @565#45", 123);
//! chatLog.insertAdjacentHTML('beforeend', html);
//! ```

pub mod chat;

pub use chat::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("viscore v{}", env!("CARGO_PKG_VERSION"))
}

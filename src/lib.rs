//! # docdef – Markdown/HTML → document-definition converter
//!
//! This crate converts Markdown (or HTML directly) into the JSON
//! document-definition format used by declarative PDF generators. The
//! pipeline stages are:
//!
//! 1. **Render** – Markdown string → HTML with pulldown-cmark ([`markdown`])
//! 2. **Parse** – HTML string → neutral DOM tree ([`dom`])
//! 3. **Convert** – DOM nodes → document-definition nodes ([`convert`]),
//!    merging per-tag defaults and inline CSS ([`style`])
//!
//! The output is an ordered array of content nodes ready to drop into a
//! document definition's `content` field.

pub mod convert;
pub mod docdef;
pub mod dom;
pub mod markdown;
pub mod pipeline;
pub mod style;
pub mod templates;

// Re-exports for convenience
pub use docdef::DocNode;
pub use pipeline::{html_to_docdef, markdown_to_docdef, Conversion, PipelineConfig};
pub use style::{DefaultStyles, StyleWarning};

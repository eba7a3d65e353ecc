//! Pipeline – ties together Markdown rendering, DOM parsing, and node
//! conversion into a single function call.

use serde::Serialize;

use crate::convert::NodeConverter;
use crate::docdef::DocNode;
use crate::dom::{DomParser, Html5Parser};
use crate::markdown::markdown_to_html;
use crate::style::{DefaultStyles, StyleWarning};

/// Configuration for the conversion pipeline.
pub struct PipelineConfig {
    /// DOM parser that turns HTML into the neutral tree (default:
    /// [`Html5Parser`]).
    pub parser: Box<dyn DomParser>,
    /// Per-tag default styles merged during conversion.
    pub styles: DefaultStyles,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parser: Box::new(Html5Parser),
            styles: DefaultStyles::default(),
        }
    }
}

impl PipelineConfig {
    /// Default parser with a caller-supplied style table.
    pub fn with_styles(styles: DefaultStyles) -> Self {
        Self {
            styles,
            ..Self::default()
        }
    }
}

/// Outcome of one conversion: the document-definition content plus any
/// style warnings raised along the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    /// Top-level document-definition nodes, one per non-empty body child.
    pub content: Vec<DocNode>,
    /// Unparseable-value reports, in document order.
    pub warnings: Vec<StyleWarning>,
}

impl Conversion {
    /// Serializes the content as a pretty-printed JSON array.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.content)
    }

    /// Serializes the content as compact JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.content)
    }
}

/// Full pipeline: Markdown string → document-definition nodes.
pub fn markdown_to_docdef(markdown: &str, config: &PipelineConfig) -> Conversion {
    // 1. Render Markdown to HTML
    let html = markdown_to_html(markdown);

    // 2. Convert the HTML
    html_to_docdef(&html, config)
}

/// HTML string → document-definition nodes.
pub fn html_to_docdef(html: &str, config: &PipelineConfig) -> Conversion {
    // 1. Parse HTML into the neutral DOM
    let document = config.parser.parse_document(html);

    // 2. Convert each body child, dropping empty results
    let mut converter = NodeConverter::new(&config.styles);
    let mut content = Vec::new();
    for node in &document.body {
        let converted = converter.convert_node(node, None).collapse();
        if converted.is_empty() {
            continue;
        }
        content.push(converted);
    }

    Conversion {
        content,
        warnings: converter.finish(),
    }
}

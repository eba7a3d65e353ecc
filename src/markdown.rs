//! Markdown rendering – the upstream half of the Markdown pipeline.
//!
//! Markdown is rendered to HTML with pulldown-cmark and handed to the HTML
//! conversion path; the converter itself never inspects Markdown syntax.
//! GitHub-style tables and strikethrough are enabled so the structural tags
//! the converter specializes on (`table`, `tr`, `th`, `td`) come through.

use pulldown_cmark::{html, Options, Parser};

/// Renders a Markdown string to HTML.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut rendered = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut rendered, parser);
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_paragraphs_and_links() {
        let html = markdown_to_html("[Copilot](https://copilot.github.com/)");
        assert!(html.contains("<p>"));
        assert!(html.contains("<a href=\"https://copilot.github.com/\">Copilot</a>"));
    }

    #[test]
    fn renders_gfm_tables() {
        let html = markdown_to_html("| H |\n| --- |\n| A |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<th>H</th>"));
        assert!(html.contains("<td>A</td>"));
    }

    #[test]
    fn renders_strikethrough() {
        let html = markdown_to_html("~~gone~~");
        assert!(html.contains("<del>"));
    }

    #[test]
    fn passes_raw_html_blocks_through() {
        let html = markdown_to_html("<p style=\"color: red\">Hello</p>");
        assert!(html.contains("<p style=\"color: red\">Hello</p>"));
    }
}

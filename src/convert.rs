//! Node conversion – the recursive dispatcher that turns a DOM tree into
//! document-definition nodes.
//!
//! One [`NodeConverter`] serves one conversion call: it borrows the injected
//! default-style table and accumulates style warnings while it walks the
//! tree depth-first. Dispatch is purely on node kind; `br`, `ol`/`ul`,
//! `table`, and `img` get structural specializations, every other element
//! falls through the generic collapse/wrap rule.

use serde_json::{Map, Value};

use crate::docdef::{json_number, DocNode};
use crate::dom::{DomNode, ElementNode};
use crate::style::{set_computed_style, DefaultStyles, StyleWarning};

/// Recursive DOM-node converter for a single conversion call.
pub struct NodeConverter<'a> {
    styles: &'a DefaultStyles,
    warnings: Vec<StyleWarning>,
}

impl<'a> NodeConverter<'a> {
    pub fn new(styles: &'a DefaultStyles) -> Self {
        NodeConverter {
            styles,
            warnings: Vec::new(),
        }
    }

    /// Consumes the converter, yielding the warnings it accumulated.
    pub fn finish(self) -> Vec<StyleWarning> {
        self.warnings
    }

    /// Converts one node. `parent` is the enclosing element; top-level nodes
    /// have none.
    pub fn convert_node(&mut self, node: &DomNode, parent: Option<&ElementNode>) -> DocNode {
        match node {
            DomNode::Text(text) => self.convert_text(text, parent),
            DomNode::Element(element) => self.convert_element(element),
        }
    }

    // -----------------------------------------------------------------
    // Text runs
    // -----------------------------------------------------------------

    /// The text-run rule: newline runs stripped, empties dropped, parentless
    /// text kept bare. Anything else becomes `{text}` with the parent's
    /// defaults, link, classes, and inline style folded in, in that order.
    fn convert_text(&mut self, text: &str, parent: Option<&ElementNode>) -> DocNode {
        let text = strip_newline_runs(text);
        if text.trim().is_empty() {
            return DocNode::Empty;
        }
        let Some(parent) = parent else {
            return DocNode::Text(text);
        };

        let mut run = Map::new();
        run.insert("text".to_string(), Value::String(text));
        if parent.tag != "p" {
            self.styles.apply(&mut run, &parent.tag);
        }
        if parent.tag == "a" {
            if let Some(href) = parent.attr("href") {
                run.insert("link".to_string(), Value::String(href.to_string()));
            }
        }
        let classes = parent.classes();
        if !classes.is_empty() {
            run.insert("style".to_string(), class_array(&classes));
        }
        set_computed_style(&mut run, parent.inline_style(), &mut self.warnings);
        DocNode::Styled(run)
    }

    // -----------------------------------------------------------------
    // Elements
    // -----------------------------------------------------------------

    fn convert_element(&mut self, element: &ElementNode) -> DocNode {
        let mut result = match element.tag.as_str() {
            "br" => return DocNode::Text("\n".to_string()),
            "ol" | "ul" => self.convert_list(element),
            "table" => self.convert_table(element),
            "img" => return self.convert_image(element),
            _ => return self.convert_generic(element),
        };

        // Only the wrappers built by the list/table delegations pick up
        // container-level classes and the spacing default here. A generic
        // element that collapses to a lone list keeps the child's own
        // styling and never reaches this step.
        if let DocNode::Styled(map) = &mut result {
            apply_class_styles(map, element);
            self.styles.apply(map, "table");
        }
        result
    }

    /// Converts an element's children into an ordered collection, skipping
    /// empty results and unwrapping one-element sequences on the way in.
    fn convert_children(&mut self, element: &ElementNode) -> DocNode {
        let mut items = Vec::new();
        for child in &element.children {
            let converted = self.convert_node(child, Some(element)).collapse();
            if converted.is_empty() {
                continue;
            }
            items.push(converted);
        }
        DocNode::Sequence(items)
    }

    /// Generic elements: no children → nothing, one child → that child with
    /// the synthetic class appended, several children → a `stack` wrapper
    /// (`p` wrappers additionally take the `p` defaults).
    fn convert_generic(&mut self, element: &ElementNode) -> DocNode {
        let DocNode::Sequence(mut items) = self.convert_children(element) else {
            return DocNode::Empty;
        };

        match items.len() {
            0 => DocNode::Empty,
            1 => {
                let mut only = items.pop().unwrap_or_default();
                only.push_style_class(&synthetic_class(&element.tag));
                only
            }
            _ => {
                let mut wrapper = Map::new();
                wrapper.insert(
                    "stack".to_string(),
                    Value::Array(items.into_iter().map(DocNode::into_value).collect()),
                );
                if element.tag == "p" {
                    self.styles.apply(&mut wrapper, "p");
                }
                wrapper.insert(
                    "style".to_string(),
                    Value::Array(vec![Value::String(synthetic_class(&element.tag))]),
                );
                DocNode::Styled(wrapper)
            }
        }
    }

    // -----------------------------------------------------------------
    // Lists
    // -----------------------------------------------------------------

    /// `{ol|ul: items}` from the converted child collection. Per-item
    /// indentation comes from the `li` defaults during child conversion,
    /// not here.
    fn convert_list(&mut self, element: &ElementNode) -> DocNode {
        let items = match self.convert_children(element) {
            DocNode::Sequence(items) => items,
            _ => Vec::new(),
        };

        let mut list = Map::new();
        list.insert(
            element.tag.clone(),
            Value::Array(items.into_iter().map(DocNode::into_value).collect()),
        );
        apply_class_styles(&mut list, element);
        set_computed_style(&mut list, element.inline_style(), &mut self.warnings);
        DocNode::Styled(list)
    }

    // -----------------------------------------------------------------
    // Tables
    // -----------------------------------------------------------------

    /// Table structure comes straight from the DOM: every descendant row in
    /// document order (rows usually sit under `thead`/`tbody`/`tfoot`), then
    /// direct-child `th`/`td` cells per row. The generic child pass never
    /// runs for tables, so cell contents convert exactly once.
    fn convert_table(&mut self, element: &ElementNode) -> DocNode {
        let mut rows = Vec::new();
        collect_rows(element, &mut rows);

        let mut body = Vec::new();
        for row in rows {
            let mut cells = Vec::new();
            for child in &row.children {
                let DomNode::Element(cell) = child else {
                    continue;
                };
                if cell.tag != "th" && cell.tag != "td" {
                    continue;
                }
                cells.push(self.convert_cell(cell).into_value());
            }
            if !cells.is_empty() {
                body.push(Value::Array(cells));
            }
        }

        let mut inner = Map::new();
        inner.insert("body".to_string(), Value::Array(body));
        let mut table = Map::new();
        table.insert("table".to_string(), Value::Object(inner));
        set_computed_style(&mut table, element.inline_style(), &mut self.warnings);
        DocNode::Styled(table)
    }

    /// One cell: children normalize to nothing, a single node, or a stack.
    /// `th` cells take the header defaults on top; plain header content is
    /// wrapped as a text map first so the defaults have somewhere to land.
    fn convert_cell(&mut self, cell: &ElementNode) -> DocNode {
        let children = match self.convert_children(cell) {
            DocNode::Sequence(items) => items,
            _ => Vec::new(),
        };

        let mut content = match children.len() {
            0 => DocNode::Empty,
            1 => children.into_iter().next().unwrap_or_default(),
            _ => {
                let mut stack = Map::new();
                stack.insert(
                    "stack".to_string(),
                    Value::Array(children.into_iter().map(DocNode::into_value).collect()),
                );
                DocNode::Styled(stack)
            }
        };

        if cell.tag == "th" {
            content = match content {
                DocNode::Styled(mut map) => {
                    self.styles.apply(&mut map, "th");
                    DocNode::Styled(map)
                }
                other => {
                    let mut map = Map::new();
                    map.insert("text".to_string(), other.into_value());
                    self.styles.apply(&mut map, "th");
                    DocNode::Styled(map)
                }
            };
        }
        content
    }

    // -----------------------------------------------------------------
    // Images
    // -----------------------------------------------------------------

    /// `{image: src}` with no validation of the source value. Attribute
    /// sizing applies first; inline style merges last so style-based sizing
    /// wins.
    fn convert_image(&mut self, element: &ElementNode) -> DocNode {
        let mut image = Map::new();
        image.insert(
            "image".to_string(),
            Value::String(element.attr("src").unwrap_or_default().to_string()),
        );
        apply_class_styles(&mut image, element);
        for attribute in ["width", "height"] {
            if let Some(value) = element.attr(attribute) {
                if let Ok(number) = value.trim().parse::<f64>() {
                    image.insert(attribute.to_string(), json_number(number));
                }
            }
        }
        set_computed_style(&mut image, element.inline_style(), &mut self.warnings);
        DocNode::Styled(image)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn synthetic_class(tag: &str) -> String {
    format!("html-{tag}")
}

fn class_array(classes: &[&str]) -> Value {
    Value::Array(
        classes
            .iter()
            .map(|class| Value::String((*class).to_string()))
            .collect(),
    )
}

/// The class-style rule: `style` becomes the synthetic `html-<tag>` class
/// followed by the element's own classes.
fn apply_class_styles(target: &mut Map<String, Value>, element: &ElementNode) {
    let mut classes = vec![Value::String(synthetic_class(&element.tag))];
    classes.extend(
        element
            .classes()
            .into_iter()
            .map(|class| Value::String(class.to_string())),
    );
    target.insert("style".to_string(), Value::Array(classes));
}

/// Depth-first collection of every `tr` under an element, document order.
fn collect_rows<'e>(element: &'e ElementNode, rows: &mut Vec<&'e ElementNode>) {
    for child in &element.children {
        if let DomNode::Element(child_element) = child {
            if child_element.tag == "tr" {
                rows.push(child_element);
            }
            collect_rows(child_element, rows);
        }
    }
}

/// Strips every newline together with the whitespace run immediately
/// following it; interior non-newline whitespace stays.
fn strip_newline_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\n' {
            while chars.peek().is_some_and(|next| next.is_whitespace()) {
                chars.next();
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn convert(node: &DomNode) -> (DocNode, Vec<StyleWarning>) {
        let styles = DefaultStyles::default();
        let mut converter = NodeConverter::new(&styles);
        let result = converter.convert_node(node, None);
        (result, converter.finish())
    }

    fn to_json(node: DocNode) -> Value {
        node.into_value()
    }

    fn element(tag: &str) -> ElementNode {
        ElementNode::new(tag)
    }

    #[test]
    fn bare_top_level_text_stays_a_string() {
        let (result, warnings) = convert(&DomNode::Text("hello".to_string()));
        assert_eq!(result, DocNode::Text("hello".to_string()));
        assert!(warnings.is_empty());
    }

    #[test]
    fn whitespace_only_text_is_dropped() {
        let (result, _) = convert(&DomNode::Text("\n    ".to_string()));
        assert_eq!(result, DocNode::Empty);
        let (result, _) = convert(&DomNode::Text("   ".to_string()));
        assert_eq!(result, DocNode::Empty);
    }

    #[test]
    fn newline_runs_are_stripped_but_interior_spaces_stay() {
        assert_eq!(strip_newline_runs("line1\n   line2"), "line1line2");
        assert_eq!(strip_newline_runs("a \n b"), "a b");
        assert_eq!(strip_newline_runs("\n\n  x"), "x");
    }

    #[test]
    fn single_text_child_collapses_with_synthetic_class() {
        let p = element("p").with_text("Hello");
        let (result, _) = convert(&DomNode::Element(p));
        assert_eq!(
            to_json(result),
            json!({ "text": "Hello", "style": ["html-p"] })
        );
    }

    #[test]
    fn text_in_non_p_parent_takes_tag_defaults() {
        let b = element("b").with_text("strong");
        let (result, _) = convert(&DomNode::Element(b));
        assert_eq!(
            to_json(result),
            json!({ "text": "strong", "bold": true, "style": ["html-b"] })
        );
    }

    #[test]
    fn anchor_text_takes_link_and_defaults() {
        let a = element("a")
            .with_attr("href", "https://example.com/")
            .with_text("here");
        let (result, _) = convert(&DomNode::Element(a));
        assert_eq!(
            to_json(result),
            json!({
                "text": "here",
                "link": "https://example.com/",
                "color": "blue",
                "decoration": "underline",
                "style": ["html-a"],
            })
        );
    }

    #[test]
    fn anchor_without_href_omits_link() {
        let a = element("a").with_text("nowhere");
        let (result, _) = convert(&DomNode::Element(a));
        let map = result.as_styled().cloned().unwrap_or_default();
        assert!(map.get("link").is_none());
    }

    #[test]
    fn parent_classes_become_the_style_list() {
        let span = element("span").with_attr("class", "lead intro").with_text("x");
        let (result, _) = convert(&DomNode::Element(span));
        assert_eq!(
            to_json(result),
            json!({ "text": "x", "style": ["lead", "intro", "html-span"] })
        );
    }

    #[test]
    fn parent_inline_style_merges_last() {
        let p = element("p")
            .with_attr("style", "margin: 1px 2px 3px 4px; color: rgb(255, 0, 15)")
            .with_text("Hello");
        let (result, warnings) = convert(&DomNode::Element(p));
        assert_eq!(
            to_json(result),
            json!({
                "text": "Hello",
                "margin": [4, 1, 2, 3],
                "color": "#ff000f",
                "style": ["html-p"],
            })
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn br_is_the_line_break_marker() {
        let (result, _) = convert(&DomNode::Element(element("br")));
        assert_eq!(result, DocNode::Text("\n".to_string()));
    }

    #[test]
    fn childless_generic_element_is_empty() {
        let div = element("div").with_text("  \n  ");
        let (result, _) = convert(&DomNode::Element(div));
        assert_eq!(result, DocNode::Empty);
    }

    #[test]
    fn multiple_children_wrap_as_a_stack() {
        let p = element("p")
            .with_text("bold ")
            .with_child(DomNode::Element(element("em").with_text("italic")));
        let (result, _) = convert(&DomNode::Element(p));
        assert_eq!(
            to_json(result),
            json!({
                "stack": [
                    { "text": "bold " },
                    { "text": "italic", "italics": true, "style": ["html-em"] },
                ],
                "margin": [0, 5, 0, 10],
                "style": ["html-p"],
            })
        );
    }

    #[test]
    fn non_p_wrappers_take_no_margin_defaults() {
        let div = element("div")
            .with_text("one")
            .with_child(DomNode::Element(element("b").with_text("two")));
        let (result, _) = convert(&DomNode::Element(div));
        let map = result.as_styled().cloned().unwrap_or_default();
        assert_eq!(map["style"], json!(["html-div"]));
        assert!(map.get("margin").is_none());
        assert_eq!(map["stack"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn nested_single_children_accumulate_classes() {
        let a = element("a")
            .with_attr("href", "https://copilot.github.com/")
            .with_text("Copilot");
        let p = element("p").with_child(DomNode::Element(a));
        let (result, _) = convert(&DomNode::Element(p));
        assert_eq!(
            to_json(result),
            json!({
                "text": "Copilot",
                "link": "https://copilot.github.com/",
                "color": "blue",
                "decoration": "underline",
                "style": ["html-a", "html-p"],
            })
        );
    }

    #[test]
    fn lists_collect_items_and_container_defaults() {
        let ul = element("ul")
            .with_child(DomNode::Element(element("li").with_text("item 1")))
            .with_child(DomNode::Element(element("li").with_text("item 2")));
        let (result, _) = convert(&DomNode::Element(ul));
        assert_eq!(
            to_json(result),
            json!({
                "ul": [
                    { "text": "item 1", "marginLeft": 5, "style": ["html-li"] },
                    { "text": "item 2", "marginLeft": 5, "style": ["html-li"] },
                ],
                "style": ["html-ul"],
                "marginBottom": 5,
            })
        );
    }

    #[test]
    fn empty_lists_keep_an_empty_item_array() {
        let (result, _) = convert(&DomNode::Element(element("ol")));
        assert_eq!(
            to_json(result),
            json!({ "ol": [], "style": ["html-ol"], "marginBottom": 5 })
        );
    }

    #[test]
    fn inline_list_styles_survive_the_container_defaults() {
        let ul = element("ul")
            .with_attr("style", "margin-bottom: 20px")
            .with_child(DomNode::Element(element("li").with_text("x")));
        let (result, _) = convert(&DomNode::Element(ul));
        let map = result.as_styled().cloned().unwrap_or_default();
        assert_eq!(map["marginBottom"], json!(20));
    }

    #[test]
    fn tables_walk_rows_under_section_elements() {
        let tr = element("tr")
            .with_child(DomNode::Element(element("th").with_text("H")))
            .with_child(DomNode::Element(element("td").with_text("A")));
        let tbody = element("tbody").with_child(DomNode::Element(tr));
        let table = element("table").with_child(DomNode::Element(tbody));
        let (result, _) = convert(&DomNode::Element(table));
        assert_eq!(
            to_json(result),
            json!({
                "table": {
                    "body": [[
                        { "text": "H", "bold": true, "fillColor": "#EEEEEE" },
                        { "text": "A" },
                    ]],
                },
                "style": ["html-table"],
                "marginBottom": 5,
            })
        );
    }

    #[test]
    fn empty_header_cells_become_styled_text() {
        let tr = element("tr").with_child(DomNode::Element(element("th")));
        let table = element("table").with_child(DomNode::Element(tr));
        let (result, _) = convert(&DomNode::Element(table));
        let map = result.as_styled().cloned().unwrap_or_default();
        assert_eq!(
            map["table"]["body"][0][0],
            json!({ "text": "", "bold": true, "fillColor": "#EEEEEE" })
        );
    }

    #[test]
    fn rows_without_cells_are_omitted() {
        let empty_row = element("tr").with_text("stray");
        let real_row = element("tr").with_child(DomNode::Element(element("td").with_text("x")));
        let table = element("table")
            .with_child(DomNode::Element(empty_row))
            .with_child(DomNode::Element(real_row));
        let (result, _) = convert(&DomNode::Element(table));
        let map = result.as_styled().cloned().unwrap_or_default();
        assert_eq!(map["table"]["body"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn cells_with_several_children_stack() {
        let td = element("td")
            .with_text("first")
            .with_child(DomNode::Element(element("b").with_text("second")));
        let tr = element("tr").with_child(DomNode::Element(td));
        let table = element("table").with_child(DomNode::Element(tr));
        let (result, _) = convert(&DomNode::Element(table));
        let map = result.as_styled().cloned().unwrap_or_default();
        assert_eq!(
            map["table"]["body"][0][0],
            json!({
                "stack": [
                    { "text": "first" },
                    { "text": "second", "bold": true, "style": ["html-b"] },
                ],
            })
        );
    }

    #[test]
    fn images_take_attributes_then_inline_style() {
        let img = element("img")
            .with_attr("src", "https://img.test/a.png")
            .with_attr("width", "123")
            .with_attr("height", "45")
            .with_attr("style", "margin: 5px;");
        let (result, _) = convert(&DomNode::Element(img));
        assert_eq!(
            to_json(result),
            json!({
                "image": "https://img.test/a.png",
                "width": 123,
                "height": 45,
                "margin": 5,
                "style": ["html-img"],
            })
        );
    }

    #[test]
    fn image_without_src_keeps_an_empty_source() {
        let (result, _) = convert(&DomNode::Element(element("img")));
        let map = result.as_styled().cloned().unwrap_or_default();
        assert_eq!(map["image"], json!(""));
    }

    #[test]
    fn non_numeric_image_sizes_are_omitted() {
        let img = element("img")
            .with_attr("src", "x.png")
            .with_attr("width", "wide");
        let (result, _) = convert(&DomNode::Element(img));
        let map = result.as_styled().cloned().unwrap_or_default();
        assert!(map.get("width").is_none());
    }

    #[test]
    fn invalid_colors_warn_once_and_pass_through() {
        let p = element("p")
            .with_attr("style", "color: #12zz")
            .with_text("bad color");
        let (result, warnings) = convert(&DomNode::Element(p));
        let map = result.as_styled().cloned().unwrap_or_default();
        assert_eq!(map["color"], json!("#12zz"));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("#12zz"));
    }

    #[test]
    fn wrappers_around_a_lone_list_append_their_class_only() {
        let ol = element("ol").with_child(DomNode::Element(element("li").with_text("x")));
        let div = element("div")
            .with_attr("class", "toc")
            .with_child(DomNode::Element(ol));
        let (result, _) = convert(&DomNode::Element(div));
        assert_eq!(
            to_json(result),
            json!({
                "ol": [{ "text": "x", "marginLeft": 5, "style": ["html-li"] }],
                "marginBottom": 5,
                "style": ["html-ol", "html-div"],
            })
        );
    }
}

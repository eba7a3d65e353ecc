//! Document-definition nodes – the output representation of the converter.
//!
//! A conversion produces an ordered sequence of [`DocNode`]s, the content
//! array of a pdfmake-style document definition. The enum makes the
//! polymorphic shapes of that format explicit: nothing, a bare string, a
//! property map, or an ordered run of sibling results that the caller still
//! has to collapse or wrap.

use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value};

/// One converted node of the output document definition.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DocNode {
    /// No content. Skipped in child collections, serialized as `""` where a
    /// positional slot must be kept (table cells).
    #[default]
    Empty,
    /// A bare string; only produced for text with no styling context and for
    /// the `br` line-break marker.
    Text(String),
    /// A property map: `text`, `image`, `ul`, `ol`, `table`, `stack`,
    /// `link`, `style`, plus any layout property (`bold`, `margin`, …).
    Styled(Map<String, Value>),
    /// Ordered sibling results awaiting collapse or wrapping by the caller.
    Sequence(Vec<DocNode>),
}

impl DocNode {
    /// True when the node contributes nothing to its parent's output.
    pub fn is_empty(&self) -> bool {
        match self {
            DocNode::Empty => true,
            DocNode::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    /// Canonical collapse: a one-element [`DocNode::Sequence`] unwraps to
    /// its element. Everything else passes through unchanged.
    pub fn collapse(self) -> Self {
        match self {
            DocNode::Sequence(items) if items.len() == 1 => {
                items.into_iter().next().unwrap_or_default()
            }
            other => other,
        }
    }

    /// Appends a class name to the node's `style` array, creating the array
    /// if absent. Only [`DocNode::Styled`] nodes carry styles; other
    /// variants are left untouched.
    pub fn push_style_class(&mut self, class: &str) {
        if let DocNode::Styled(map) = self {
            let entry = map
                .entry("style")
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(classes) = entry {
                classes.push(Value::String(class.to_string()));
            }
        }
    }

    /// Borrows the property map of a [`DocNode::Styled`] node.
    pub fn as_styled(&self) -> Option<&Map<String, Value>> {
        match self {
            DocNode::Styled(map) => Some(map),
            _ => None,
        }
    }

    /// Converts the node into a plain JSON value, the form embedded inside
    /// parent maps (`stack`, list items, `table.body` cells).
    pub fn into_value(self) -> Value {
        match self {
            DocNode::Empty => Value::String(String::new()),
            DocNode::Text(text) => Value::String(text),
            DocNode::Styled(map) => Value::Object(map),
            DocNode::Sequence(items) => {
                Value::Array(items.into_iter().map(DocNode::into_value).collect())
            }
        }
    }
}

impl Serialize for DocNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DocNode::Empty => serializer.serialize_str(""),
            DocNode::Text(text) => serializer.serialize_str(text),
            DocNode::Styled(map) => map.serialize(serializer),
            DocNode::Sequence(items) => items.serialize(serializer),
        }
    }
}

/// A JSON number, emitted as an integer when the value has no fractional
/// part so `16` round-trips as `16` rather than `16.0`.
pub fn json_number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::Number((value as i64).into())
    } else {
        serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_serializes_as_empty_string() {
        let json = serde_json::to_value(DocNode::Empty).unwrap();
        assert_eq!(json, json!(""));
    }

    #[test]
    fn styled_serializes_as_object() {
        let mut map = Map::new();
        map.insert("text".into(), json!("hi"));
        map.insert("bold".into(), json!(true));
        let json = serde_json::to_value(DocNode::Styled(map)).unwrap();
        assert_eq!(json, json!({"text": "hi", "bold": true}));
    }

    #[test]
    fn sequence_serializes_as_array_with_empty_slots() {
        let seq = DocNode::Sequence(vec![DocNode::Text("a".into()), DocNode::Empty]);
        let json = serde_json::to_value(seq).unwrap();
        assert_eq!(json, json!(["a", ""]));
    }

    #[test]
    fn collapse_unwraps_singleton_sequence() {
        let seq = DocNode::Sequence(vec![DocNode::Text("only".into())]);
        assert_eq!(seq.collapse(), DocNode::Text("only".into()));
    }

    #[test]
    fn collapse_keeps_longer_sequences() {
        let seq = DocNode::Sequence(vec![
            DocNode::Text("a".into()),
            DocNode::Text("b".into()),
        ]);
        assert_eq!(seq.clone().collapse(), seq);
    }

    #[test]
    fn push_style_class_creates_and_appends() {
        let mut node = DocNode::Styled(Map::new());
        node.push_style_class("html-a");
        node.push_style_class("html-p");
        let map = node.as_styled().unwrap();
        assert_eq!(map["style"], json!(["html-a", "html-p"]));
    }

    #[test]
    fn push_style_class_ignores_bare_text() {
        let mut node = DocNode::Text("\n".into());
        node.push_style_class("html-div");
        assert_eq!(node, DocNode::Text("\n".into()));
    }

    #[test]
    fn empty_text_counts_as_empty() {
        assert!(DocNode::Empty.is_empty());
        assert!(DocNode::Text(String::new()).is_empty());
        assert!(!DocNode::Text("\n".into()).is_empty());
        assert!(!DocNode::Styled(Map::new()).is_empty());
    }

    #[test]
    fn json_number_prefers_integers() {
        assert_eq!(json_number(4.0), json!(4));
        assert_eq!(json_number(123.5), json!(123.5));
        assert_eq!(json_number(-2.0), json!(-2));
    }
}

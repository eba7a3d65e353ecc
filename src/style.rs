//! Style resolution – the CSS-subset resolver, color normalization, and the
//! default style table.
//!
//! Inline `style` attributes are parsed into layout property pairs
//! (`compute_style`), colors are normalized to hex or named form
//! (`parse_color`), and per-tag defaults come from [`DefaultStyles`]. Only a
//! fixed small property subset is recognized; everything else falls through
//! the generic camelCase/number rule.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::docdef::json_number;

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Non-fatal diagnostic produced while resolving styles. Conversion keeps
/// going; the offending value is passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StyleWarning {
    pub message: String,
}

impl StyleWarning {
    fn new(message: String) -> Self {
        StyleWarning { message }
    }
}

impl fmt::Display for StyleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ---------------------------------------------------------------------------
// Default style table
// ---------------------------------------------------------------------------

/// Per-tag default layout properties.
///
/// Defaults are merged wherever a node has no overriding value for a
/// property; they never replace something an inline style already set. The
/// table is built once, injected into the converter, and read-only from then
/// on. Tests can substitute entries through [`DefaultStyles::set`].
#[derive(Debug, Clone)]
pub struct DefaultStyles {
    entries: HashMap<String, Map<String, Value>>,
}

impl Default for DefaultStyles {
    fn default() -> Self {
        let mut styles = DefaultStyles {
            entries: HashMap::new(),
        };
        styles.set("b", json!({ "bold": true }));
        styles.set("strong", json!({ "bold": true }));
        styles.set("u", json!({ "decoration": "underline" }));
        styles.set("em", json!({ "italics": true }));
        styles.set("i", json!({ "italics": true }));
        styles.set("h1", json!({ "fontSize": 24, "bold": true, "marginBottom": 5 }));
        styles.set("h2", json!({ "fontSize": 22, "bold": true, "marginBottom": 5 }));
        styles.set("h3", json!({ "fontSize": 20, "bold": true, "marginBottom": 5 }));
        styles.set("h4", json!({ "fontSize": 18, "bold": true, "marginBottom": 5 }));
        styles.set("h5", json!({ "fontSize": 16, "bold": true, "marginBottom": 5 }));
        styles.set("h6", json!({ "fontSize": 14, "bold": true, "marginBottom": 5 }));
        styles.set("a", json!({ "color": "blue", "decoration": "underline" }));
        styles.set("strike", json!({ "decoration": "lineThrough" }));
        styles.set("p", json!({ "margin": [0, 5, 0, 10] }));
        styles.set("ul", json!({ "marginBottom": 5 }));
        styles.set("li", json!({ "marginLeft": 5 }));
        styles.set("table", json!({ "marginBottom": 5 }));
        styles.set("th", json!({ "bold": true, "fillColor": "#EEEEEE" }));
        styles
    }
}

impl DefaultStyles {
    /// An empty table (no tag gets any default).
    pub fn empty() -> Self {
        DefaultStyles {
            entries: HashMap::new(),
        }
    }

    /// Default properties for a tag, if any.
    pub fn get(&self, tag: &str) -> Option<&Map<String, Value>> {
        self.entries.get(tag)
    }

    /// Inserts or replaces the defaults for a tag. Non-object values clear
    /// the entry.
    pub fn set(&mut self, tag: &str, style: Value) {
        match style {
            Value::Object(map) => {
                self.entries.insert(tag.to_string(), map);
            }
            _ => {
                self.entries.remove(tag);
            }
        }
    }

    /// Merges the defaults for `tag` onto `target` without overwriting
    /// properties already present.
    pub fn apply(&self, target: &mut Map<String, Value>, tag: &str) {
        let Some(defaults) = self.entries.get(tag) else {
            return;
        };
        for (key, value) in defaults {
            if !target.contains_key(key) {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Color parsing
// ---------------------------------------------------------------------------

/// Normalizes a color token. `#rgb`/`#rrggbb` and bare lowercase color names
/// pass through unchanged; `rgb(r, g, b)` converts to lowercase hex with
/// channels clamped to 255. Anything else is kept verbatim after emitting a
/// warning.
pub fn parse_color(value: &str, warnings: &mut Vec<StyleWarning>) -> String {
    if is_hex_color(value) {
        return value.to_string();
    }
    if let Some(hex) = parse_rgb(value) {
        return hex;
    }
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_lowercase()) {
        return value.to_string();
    }

    let warning = StyleWarning::new(format!("Could not parse color \"{value}\""));
    log::warn!("{warning}");
    warnings.push(warning);
    value.to_string()
}

fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            (digits.len() == 3 || digits.len() == 6)
                && digits
                    .chars()
                    .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        }
        None => false,
    }
}

fn parse_rgb(value: &str) -> Option<String> {
    let inner = value.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut channels = [0u8; 3];
    let mut parts = inner.split(',');
    for slot in &mut channels {
        let token = parts.next()?.trim();
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // Parse overflow can only mean a value far above the clamp.
        *slot = token.parse::<u32>().map_or(255, |v| v.min(255)) as u8;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(format!(
        "#{:02x}{:02x}{:02x}",
        channels[0], channels[1], channels[2]
    ))
}

// ---------------------------------------------------------------------------
// Inline style resolution
// ---------------------------------------------------------------------------

/// `kebab-case` → `camelCase`. Only a hyphen followed by a lowercase letter
/// is folded; other hyphens stay literal.
pub fn to_camel_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '-' {
            match chars.peek() {
                Some(next) if next.is_ascii_lowercase() => {
                    out.push(next.to_ascii_uppercase());
                    chars.next();
                }
                _ => out.push('-'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Expands CSS margin shorthand into the engine's left-top-right-bottom
/// order. CSS declares top-right-bottom-left; the remap per arity is:
/// 1 token → bare number, 2 `[v0,v1]` → `[v1,v0]`, 3 `[v0,v1,v2]` →
/// `[v1,v0,v1,v2]`, 4 `[v0,v1,v2,v3]` → `[v3,v0,v1,v2]`.
///
/// Returns `None` when no usable tokens remain; five or more tokens keep the
/// raw value as a string.
pub fn parse_margin(value: &str) -> Option<Value> {
    let tokens: Vec<&str> = value
        .split(|c: char| !c.is_ascii_digit() && c != '.')
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.len() > 4 {
        return Some(Value::String(value.to_string()));
    }

    let mut numbers = Vec::with_capacity(tokens.len());
    for token in &tokens {
        numbers.push(token.parse::<f64>().ok()?);
    }

    match numbers.as_slice() {
        [uniform] => Some(json_number(*uniform)),
        [v0, v1] => Some(Value::Array(vec![json_number(*v1), json_number(*v0)])),
        [v0, v1, v2] => Some(Value::Array(vec![
            json_number(*v1),
            json_number(*v0),
            json_number(*v1),
            json_number(*v2),
        ])),
        [v0, v1, v2, v3] => Some(Value::Array(vec![
            json_number(*v3),
            json_number(*v0),
            json_number(*v1),
            json_number(*v2),
        ])),
        _ => None,
    }
}

/// Strips a trailing unit from a numeric-looking value (`16px` → 16,
/// `50%` → 50); non-numeric values stay strings.
fn scalar_value(value: &str) -> Value {
    let stripped = value.trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%');
    if !stripped.is_empty() {
        if let Ok(number) = stripped.parse::<f64>() {
            return json_number(number);
        }
    }
    Value::String(value.to_string())
}

/// Resolves an inline CSS declaration string into an ordered list of layout
/// property pairs. Declarations are split on `;`, whitespace-stripped,
/// lower-cased, and split on the first `:`; declarations without a value
/// produce nothing.
pub fn compute_style(css: &str, warnings: &mut Vec<StyleWarning>) -> Vec<(String, Value)> {
    let mut properties = Vec::new();

    for declaration in css.split(';') {
        let declaration: String = declaration
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        let Some((key, value)) = declaration.split_once(':') else {
            continue;
        };

        match key {
            "margin" => {
                if let Some(margin) = parse_margin(value) {
                    properties.push(("margin".to_string(), margin));
                }
            }
            "text-align" => {
                properties.push(("alignment".to_string(), Value::String(value.to_string())));
            }
            "font-weight" => {
                if value == "bold" {
                    properties.push(("bold".to_string(), Value::Bool(true)));
                }
            }
            "text-decoration" => {
                properties.push((
                    "decoration".to_string(),
                    Value::String(to_camel_case(value)),
                ));
            }
            "font-style" => {
                if value == "italic" {
                    properties.push(("italics".to_string(), Value::Bool(true)));
                }
            }
            "color" => {
                properties.push((
                    "color".to_string(),
                    Value::String(parse_color(value, warnings)),
                ));
            }
            "background-color" => {
                properties.push((
                    "background".to_string(),
                    Value::String(parse_color(value, warnings)),
                ));
            }
            other => {
                if value.is_empty() {
                    continue;
                }
                let key = if other.contains('-') {
                    to_camel_case(other)
                } else {
                    other.to_string()
                };
                properties.push((key, scalar_value(value)));
            }
        }
    }

    properties
}

/// Merges every property resolved from `css` onto `target`, later
/// declarations overwriting earlier ones with the same key.
pub fn set_computed_style(
    target: &mut Map<String, Value>,
    css: Option<&str>,
    warnings: &mut Vec<StyleWarning>,
) {
    let Some(css) = css else {
        return;
    };
    if css.is_empty() {
        return;
    }
    for (key, value) in compute_style(css, warnings) {
        target.insert(key, value);
    }
}

//! Style overrides attached to blocks and components.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// CSS-like property overrides merged onto a block's container at render time.
///
/// Keys are property names as the editor writes them (`paddingTop`,
/// `backgroundColor`, `font-size`); values are strings or numbers. The map is
/// independent of the block's content and defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleMap(Map<String, Value>);

impl StyleMap {
    /// Creates an empty style map.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Shallow-merges `partial` into this map. Keys present in `partial`
    /// overwrite existing ones; a `null` value removes the key.
    pub fn merge(&mut self, partial: &StyleMap) {
        for (key, value) in &partial.0 {
            if value.is_null() {
                self.0.remove(key);
            } else {
                self.0.insert(key.clone(), value.clone());
            }
        }
    }

    /// Sets a single property.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the value of a property.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Formats the map as an inline `style` attribute value.
    ///
    /// camelCase keys become kebab-case and bare numbers get a `px` unit,
    /// except for unitless properties such as `opacity` and `z-index`.
    pub fn to_css(&self) -> String {
        let mut declarations = Vec::with_capacity(self.0.len());
        for (key, value) in &self.0 {
            let property = kebab_case(key);
            let rendered = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) if is_unitless(&property) => n.to_string(),
                Value::Number(n) => format!("{n}px"),
                Value::Bool(b) => b.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => continue,
            };
            declarations.push(format!("{property}: {rendered}"));
        }
        declarations.join("; ")
    }
}

impl From<Map<String, Value>> for StyleMap {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<StyleMap> for Map<String, Value> {
    fn from(styles: StyleMap) -> Self {
        styles.0
    }
}

fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn is_unitless(property: &str) -> bool {
    matches!(
        property,
        "opacity" | "z-index" | "font-weight" | "line-height" | "flex" | "order"
    )
}

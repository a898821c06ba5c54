//! Opaque line formatting record

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Line color, e.g. `"grey"`, `"C1"` or `"#1f77b4"`
pub const COLOR: &str = "color";
/// Dash pattern, e.g. `"-"`, `"--"`, `":"`, `"dashed"` or `[offset, [on, off]]`
pub const LINESTYLE: &str = "linestyle";
/// Stroke width in pixels
pub const LINEWIDTH: &str = "linewidth";

/// Open key-value styling record handed through to the drawing backend.
///
/// Only the backend interprets the values; keys it does not recognize are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatBag(BTreeMap<String, Value>);

impl FormatBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Grey, evenly dashed
pub fn default_trendline_format() -> FormatBag {
    FormatBag::new()
        .with(COLOR, "grey")
        .with(LINESTYLE, serde_json::json!([0, [5, 5]]))
}

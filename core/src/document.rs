use itertools::Itertools;
use rustc_hash::FxHashSet;
use serde_json::{Map, Value};

use crate::error::GeoViewError;

/// The name of the member holding the features of a feature collection
const FEATURES: &str = "features";

/// A parsed GeoJSON document
///
/// Documents are read permissively. The only requirements are that the
/// top-level value is an object and that `features`, if present, is an
/// array. Missing `features` means the document has no features.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Map<String, Value>,
}

impl Document {
    /// Parse a document from raw bytes. `source_name` is only used for
    /// error messages.
    pub fn from_slice(bytes: &[u8], source_name: &str) -> Result<Self, GeoViewError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| GeoViewError::malformed_document(source_name, e))?;
        Self::from_value(value, source_name)
    }

    /// Wrap an already parsed JSON value
    pub fn from_value(value: Value, source_name: &str) -> Result<Self, GeoViewError> {
        let root = match value {
            Value::Object(root) => root,
            other => {
                return Err(GeoViewError::malformed_document(
                    source_name,
                    format!("expected a JSON object, found {}", type_name(&other)),
                ))
            }
        };
        match root.get(FEATURES) {
            None | Some(Value::Array(_)) => Ok(Self { root }),
            Some(other) => Err(GeoViewError::malformed_document(
                source_name,
                format!("`features' must be an array, found {}", type_name(other)),
            )),
        }
    }

    /// Iterate over the features of this document in order
    pub fn features(&self) -> impl Iterator<Item = Feature<'_>> {
        self.feature_values().iter().map(Feature::new)
    }

    pub fn feature_count(&self) -> usize {
        self.feature_values().len()
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    /// Return a copy of this document that only keeps the features
    /// accepted by `filter`. All other top-level members are kept as they
    /// are.
    pub fn filter_features(&self, filter: &FeatureFilter) -> Document {
        let mut root = self.root.clone();
        if let Some(Value::Array(features)) = root.get_mut(FEATURES) {
            features.retain(|f| filter.accepts(&Feature::new(f)));
        }
        Document { root }
    }

    fn feature_values(&self) -> &[Value] {
        match self.root.get(FEATURES) {
            Some(Value::Array(features)) => features,
            _ => &[],
        }
    }
}

/// A borrowed view of a single feature
#[derive(Debug, Clone, Copy)]
pub struct Feature<'a> {
    inner: &'a Value,
}

impl<'a> Feature<'a> {
    fn new(inner: &'a Value) -> Self {
        Self { inner }
    }

    /// The feature's geometry. `null` counts as missing.
    pub fn geometry(&self) -> Option<&'a Value> {
        self.inner.get("geometry").filter(|g| !g.is_null())
    }

    /// The `type` member of the geometry, if there is one
    pub fn geometry_type(&self) -> Option<&'a str> {
        self.geometry()?.get("type")?.as_str()
    }

    /// The `coordinates` member of the geometry, if there is one
    pub fn coordinates(&self) -> Option<&'a Value> {
        self.geometry()?.get("coordinates")
    }

    pub fn property(&self, name: &str) -> Option<&'a Value> {
        self.inner
            .get("properties")?
            .get(name)
            .filter(|p| !p.is_null())
    }

    /// Render the first property out of `keys` that is present on this
    /// feature as text (tooltip text, table labels)
    pub fn label(&self, keys: &[impl AsRef<str>]) -> Option<String> {
        keys.iter()
            .find_map(|k| self.property(k.as_ref()))
            .map(value_to_text)
    }
}

/// Keeps features whose property `key` has one of the accepted values.
///
/// Values are compared by their text form, so `2` matches a numeric
/// property `2` as well as a string `"2"`. A filter without accepted
/// values keeps everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureFilter {
    key: String,
    accepted: FxHashSet<String>,
}

impl FeatureFilter {
    pub fn new<I, S>(key: impl Into<String>, accepted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: key.into(),
            accepted: accepted.into_iter().map(Into::into).collect(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn accepts(&self, feature: &Feature<'_>) -> bool {
        if self.accepted.is_empty() {
            return true;
        }
        feature
            .property(&self.key)
            .map(value_to_text)
            .is_some_and(|v| self.accepted.contains(&v))
    }
}

impl std::fmt::Display for FeatureFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.accepted.iter().sorted().join(","))
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

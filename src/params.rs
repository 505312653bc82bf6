//! Key/value decomposition of URL-encoded strings.
//!
//! Used for both query strings and `application/x-www-form-urlencoded` bodies.
//! Keys keep first-appearance order; a key that repeats collects its values in
//! order.

use indexmap::IndexMap;
use serde::Serialize;

/// Value(s) bound to one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    One(String),
    Many(Vec<String>),
}

impl Value {
    fn push(&mut self, value: String) {
        match self {
            Value::One(first) => {
                let first = std::mem::take(first);
                *self = Value::Many(vec![first, value]);
            }
            Value::Many(values) => values.push(value),
        }
    }

    /// All values in arrival order.
    pub fn values(&self) -> Vec<&str> {
        match self {
            Value::One(v) => vec![v.as_str()],
            Value::Many(vs) => vs.iter().map(String::as_str).collect(),
        }
    }
}

/// Ordered decomposition of a URL-encoded string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(IndexMap<String, Value>);

impl Params {
    /// Parse `input` as `k=v&k2=v2`.
    ///
    /// `+` decodes to a space, `%XX` is percent-decoded (invalid UTF-8 is
    /// replaced), empty pieces are skipped and a key without `=` maps to the
    /// empty string.
    pub fn parse(input: &[u8]) -> Self {
        let mut map: IndexMap<String, Value> = IndexMap::new();
        for (key, value) in url::form_urlencoded::parse(input) {
            match map.get_mut(&*key) {
                Some(existing) => existing.push(value.into_owned()),
                None => {
                    map.insert(key.into_owned(), Value::One(value.into_owned()));
                }
            }
        }
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Pretty-printed JSON object, keys in arrival order.
    pub fn render(&self) -> String {
        // A map of strings always serializes.
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| "{}".to_string())
    }
}

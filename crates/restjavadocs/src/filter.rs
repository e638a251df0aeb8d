//! Request-mapping filters: the typed builder and the flat key/values map
//! the matcher consumes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::annotation::Values;
use crate::{Error, Result};

pub const NAME: &str = "name";
pub const PATH: &str = "path";
pub const VALUE: &str = "value";
pub const METHOD: &str = "method";
pub const PARAMS: &str = "params";
pub const HEADERS: &str = "headers";
pub const CONSUMES: &str = "consumes";
pub const PRODUCES: &str = "produces";

/// Constraint key → required values, in insertion order.
///
/// `None` entries stand for JSON `null`s; the matcher rejects them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterMap(IndexMap<String, Values>);

impl FilterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a constraint of non-null values
    pub fn insert<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.insert(
            key.to_string(),
            values.into_iter().map(|v| Some(v.into())).collect(),
        );
    }

    /// Insert a constraint that may contain null entries
    pub fn insert_raw(&mut self, key: &str, values: Values) {
        self.0.insert(key.to_string(), values);
    }

    pub fn with(mut self, key: &str, values: &[&str]) -> Self {
        self.insert(key, values.iter().copied());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Values> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Remove a key, keeping the order of the rest
    pub fn remove(&mut self, key: &str) -> Option<Values> {
        self.0.shift_remove(key)
    }

    /// A copy without `key`
    pub fn without(&self, key: &str) -> Self {
        let mut copy = self.clone();
        copy.remove(key);
        copy
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Values)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parse a flat JSON object such as `{"path": "/x", "method": ["GET"]}`.
    pub fn from_json(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        let Value::Object(object) = value else {
            return Err(Error::InvalidFilterJson(format!(
                "expected a JSON object, got {}",
                kind(&value)
            )));
        };

        let mut map = FilterMap::new();
        for (key, value) in object {
            let values = match value {
                Value::String(s) => vec![Some(s)],
                Value::Null => vec![None],
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(Some(s)),
                        Value::Null => Ok(None),
                        other => Err(Error::InvalidFilterJson(format!(
                            "'{}' must hold strings, found {}",
                            key,
                            kind(&other)
                        ))),
                    })
                    .collect::<Result<Values>>()?,
                other => {
                    return Err(Error::InvalidFilterJson(format!(
                        "'{}' must be a string or an array of strings, found {}",
                        key,
                        kind(&other)
                    )))
                }
            };
            map.insert_raw(&key, values);
        }
        Ok(map)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Typed form of a `@RequestMapping` filter.
///
/// `value` is an alias of `path`, as on the annotation itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestMappingFilter {
    pub name: Option<String>,
    #[serde(alias = "value")]
    pub path: Option<Vec<String>>,
    pub method: Option<Vec<String>>,
    pub params: Option<Vec<String>>,
    pub headers: Option<Vec<String>>,
    pub consumes: Option<Vec<String>>,
    pub produces: Option<Vec<String>>,
}

fn owned(values: &[&str]) -> Option<Vec<String>> {
    Some(values.iter().map(|v| v.to_string()).collect())
}

impl RequestMappingFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn path(mut self, path: &[&str]) -> Self {
        self.path = owned(path);
        self
    }

    pub fn method(mut self, method: &[&str]) -> Self {
        self.method = owned(method);
        self
    }

    pub fn params(mut self, params: &[&str]) -> Self {
        self.params = owned(params);
        self
    }

    pub fn headers(mut self, headers: &[&str]) -> Self {
        self.headers = owned(headers);
        self
    }

    pub fn consumes(mut self, consumes: &[&str]) -> Self {
        self.consumes = owned(consumes);
        self
    }

    pub fn produces(mut self, produces: &[&str]) -> Self {
        self.produces = owned(produces);
        self
    }

    /// Alias of `path`
    pub fn value(&self) -> Option<&[String]> {
        self.path.as_deref()
    }

    /// Alias of setting `path`
    pub fn set_value(&mut self, value: Option<Vec<String>>) {
        self.path = value;
    }

    /// The flat map form; absent fields are omitted.
    pub fn to_filter_map(&self) -> FilterMap {
        let mut map = FilterMap::new();
        let entries = [
            (CONSUMES, &self.consumes),
            (HEADERS, &self.headers),
            (METHOD, &self.method),
        ];
        for (key, values) in entries {
            if let Some(values) = values {
                map.insert(key, values.iter().cloned());
            }
        }
        if let Some(name) = &self.name {
            map.insert(NAME, [name.clone()]);
        }
        let entries = [
            (PARAMS, &self.params),
            (PATH, &self.path),
            (PRODUCES, &self.produces),
        ];
        for (key, values) in entries {
            if let Some(values) = values {
                map.insert(key, values.iter().cloned());
            }
        }
        map
    }
}

impl From<&RequestMappingFilter> for FilterMap {
    fn from(filter: &RequestMappingFilter) -> Self {
        filter.to_filter_map()
    }
}

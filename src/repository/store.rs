//! Document store abstraction shared by every collection

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

use crate::error::{AppError, AppResult};

/// Named collections of documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Books,
    Users,
}

impl Collection {
    /// Backing table / collection name
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Books => "books",
            Collection::Users => "users",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Filter document. A stored document matches when it contains the filter;
/// a nested key that meets a list matches when any element of the list does.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Map<String, Value>);

impl Filter {
    /// Matches every document
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a filter from query-string parameters.
    ///
    /// Dotted keys address nested objects (`publication.publisher=Tor`).
    /// `_id` must be an integer; every other value is matched as a string.
    pub fn from_query(params: &HashMap<String, String>) -> AppResult<Self> {
        let mut root = Map::new();
        let mut keys: Vec<&String> = params.keys().collect();
        keys.sort();

        for key in keys {
            let raw = &params[key];
            let value = if key == "_id" {
                let id: i64 = raw
                    .parse()
                    .map_err(|_| AppError::BadRequest(format!("_id must be an integer, got '{}'", raw)))?;
                Value::from(id)
            } else {
                Value::String(raw.clone())
            };
            insert_path(&mut root, key, value)?;
        }

        Ok(Self(root))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Leaf conditions as `(path, value)` pairs, path segments in order
    pub fn conditions(&self) -> Vec<(Vec<&str>, &Value)> {
        let mut out = Vec::new();
        collect_conditions(&self.0, &mut Vec::new(), &mut out);
        out
    }

    /// Whether `doc` contains this filter
    pub fn matches(&self, doc: &Value) -> bool {
        match doc {
            Value::Object(fields) => self
                .0
                .iter()
                .all(|(k, v)| fields.get(k).is_some_and(|field| contains(field, v))),
            _ => false,
        }
    }
}

fn insert_path(root: &mut Map<String, Value>, key: &str, value: Value) -> AppResult<()> {
    let conflict = || AppError::BadRequest(format!("conflicting filter key '{}'", key));
    let mut parts = key.split('.').peekable();
    let mut node = root;

    while let Some(part) = parts.next() {
        if part.is_empty() {
            return Err(AppError::BadRequest(format!("invalid filter key '{}'", key)));
        }
        if parts.peek().is_none() {
            if node.contains_key(part) {
                return Err(conflict());
            }
            node.insert(part.to_string(), value);
            return Ok(());
        }
        node = match node
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()))
        {
            Value::Object(child) => child,
            _ => return Err(conflict()),
        };
    }

    Ok(())
}

fn collect_conditions<'a>(
    node: &'a Map<String, Value>,
    path: &mut Vec<&'a str>,
    out: &mut Vec<(Vec<&'a str>, &'a Value)>,
) {
    for (key, value) in node {
        path.push(key.as_str());
        match value {
            Value::Object(child) => collect_conditions(child, path, out),
            leaf => out.push((path.clone(), leaf)),
        }
        path.pop();
    }
}

/// JSON containment: objects contain sub-objects key by key, arrays contain
/// arrays whose every element is contained in some element, scalars must be equal.
/// A list holds a non-list pattern when any of its elements does.
pub fn contains(doc: &Value, pattern: &Value) -> bool {
    match (doc, pattern) {
        (Value::Object(d), Value::Object(p)) => p
            .iter()
            .all(|(k, pv)| d.get(k).is_some_and(|dv| contains(dv, pv))),
        (Value::Array(d), Value::Array(p)) => {
            p.iter().all(|pv| d.iter().any(|dv| contains(dv, pv)))
        }
        (Value::Array(d), p) => d.iter().any(|dv| contains(dv, p)),
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => doc == pattern,
    }
}

/// Decode a stored document into its model type
pub fn decode<T: DeserializeOwned>(doc: Value) -> AppResult<T> {
    Ok(serde_json::from_value(doc)?)
}

/// Storage operations every backend provides.
///
/// `insert` must fail with [`AppError::DuplicateKey`] when the identifier is
/// already taken; the id allocator relies on it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents matching `filter`, ordered by identifier
    async fn find(&self, collection: Collection, filter: &Filter) -> AppResult<Vec<Value>>;

    async fn find_by_id(&self, collection: Collection, id: i64) -> AppResult<Option<Value>>;

    /// Largest identifier in use, `None` for an empty collection
    async fn max_id(&self, collection: Collection) -> AppResult<Option<i64>>;

    async fn insert(&self, collection: Collection, id: i64, doc: &Value) -> AppResult<()>;

    /// Merge top-level `fields` into the document; `false` when no document has `id`
    async fn set_fields(&self, collection: Collection, id: i64, fields: &Value) -> AppResult<bool>;

    /// Remove the document; `false` when no document has `id`
    async fn remove(&self, collection: Collection, id: i64) -> AppResult<bool>;

    async fn ping(&self) -> AppResult<()>;

    async fn close(&self);
}

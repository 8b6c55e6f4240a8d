//! In-memory implementation of DocumentBackend for testing and development

use crate::core::query::ID_FIELD;
use crate::core::{DocumentBackend, Filter, FindOptions, PostedError, Result};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

type Collection = IndexMap<String, Value>;

/// In-memory document backend
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
/// Documents keep insertion order within a collection.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl InMemoryBackend {
    /// Create a new in-memory backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map_or(0, IndexMap::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn document_key(document: &Value) -> Result<String> {
        document
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                PostedError::validation(ID_FIELD, "document has no string identifier")
            })
    }

    fn select<'a>(
        collection: &'a Collection,
        filter: &'a Filter,
    ) -> impl Iterator<Item = (&'a String, &'a Value)> {
        collection.iter().filter(move |(_, doc)| filter.matches(doc))
    }
}

fn lock_error(e: impl ToString) -> PostedError {
    PostedError::transient("in-memory lock", e)
}

#[async_trait]
impl DocumentBackend for InMemoryBackend {
    fn backend_name(&self) -> &'static str {
        "in-memory"
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>> {
        let collections = self.collections.read().map_err(lock_error)?;

        Ok(collections
            .get(collection)
            .and_then(|c| Self::select(c, filter).next().map(|(_, doc)| doc.clone())))
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        options: FindOptions,
    ) -> Result<Vec<Value>> {
        let collections = self.collections.read().map_err(lock_error)?;
        let Some(c) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<(&String, &Value)> = Self::select(c, filter).collect();
        if options.newest_first {
            // hex order is creation order for identifiers
            matched.sort_by(|a, b| b.0.cmp(a.0));
        }

        let limit = options
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));

        Ok(matched
            .into_iter()
            .take(limit)
            .map(|(_, doc)| doc.clone())
            .collect())
    }

    async fn insert_one(&self, collection: &str, document: Value) -> Result<()> {
        if !document.is_object() {
            return Err(PostedError::decode(
                "document",
                "expected a JSON object",
            ));
        }
        let key = Self::document_key(&document)?;

        let mut collections = self.collections.write().map_err(lock_error)?;
        let c = collections.entry(collection.to_string()).or_default();
        if c.contains_key(&key) {
            return Err(PostedError::validation(
                ID_FIELD,
                format!("duplicate identifier '{}'", key),
            ));
        }
        c.insert(key, document);

        Ok(())
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let mut collections = self.collections.write().map_err(lock_error)?;
        let Some(c) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let key = Self::select(c, filter).next().map(|(k, _)| k.clone());
        match key {
            Some(k) => {
                c.shift_remove(&k);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

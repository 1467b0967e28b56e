//! In-memory implementation of the document-store seam.
//!
//! Backs the integration tests the same way the repository tests of a
//! store with an embedded engine would; MongoDB has no embedded engine, so
//! this store keeps plain BSON documents per collection and evaluates the
//! filter subset the components generate: equality (including dotted
//! paths), `$or`, `$in`, `$ne`, and `$exists`.
//!
//! Atomic scopes are snapshot-based: `begin_scope` clones the collections,
//! `abort_scope` restores them. `MemoryStore::without_transactions()`
//! yields sequential scopes instead, for exercising the fallback path.
//! Targeted failures can be injected per (collection, contained id) to
//! test degraded aggregation rows and partial cascades.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bson::oid::ObjectId;
use bson::{Bson, Document};
use samaj_core::error::{SamajError, SamajResult};
use samaj_core::store::{DeleteScope, DocumentStore};

type Collections = HashMap<String, Vec<Document>>;

#[derive(Default)]
struct Inner {
    collections: Collections,
    poisoned: Vec<(String, ObjectId)>,
}

#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    transactions: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// A store whose scopes are atomic (snapshot-backed).
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            transactions: true,
        }
    }

    /// A store that only offers sequential scopes, like a standalone
    /// deployment.
    pub fn without_transactions() -> Self {
        Self {
            transactions: false,
            ..Self::new()
        }
    }

    /// Make every operation on `collection` whose filter mentions `id`
    /// fail with a database error.
    pub fn fail_queries_containing(&self, collection: &str, id: ObjectId) {
        let mut inner = self.inner.lock().unwrap();
        inner.poisoned.push((collection.to_string(), id));
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.poisoned.clear();
    }

    /// All documents currently stored in `collection`.
    pub fn dump(&self, collection: &str) -> Vec<Document> {
        let inner = self.inner.lock().unwrap();
        inner.collections.get(collection).cloned().unwrap_or_default()
    }

    fn check_poison(inner: &Inner, collection: &str, filter: &Document) -> SamajResult<()> {
        for (coll, id) in &inner.poisoned {
            if coll == collection && bson_contains_id(&Bson::Document(filter.clone()), id) {
                return Err(SamajError::Database(format!(
                    "injected failure on {collection}"
                )));
            }
        }
        Ok(())
    }
}

impl DocumentStore for MemoryStore {
    /// Snapshot of the collections for rollback; `None` in sequential mode.
    type Scope = Option<Collections>;

    async fn find_ids(&self, collection: &str, filter: Document) -> SamajResult<Vec<ObjectId>> {
        let inner = self.inner.lock().unwrap();
        Self::check_poison(&inner, collection, &filter)?;
        Ok(inner
            .collections
            .get(collection)
            .into_iter()
            .flatten()
            .filter(|d| matches(d, &filter))
            .filter_map(|d| d.get_object_id("_id").ok())
            .collect())
    }

    async fn find_one(&self, collection: &str, filter: Document) -> SamajResult<Option<Document>> {
        let inner = self.inner.lock().unwrap();
        Self::check_poison(&inner, collection, &filter)?;
        Ok(inner
            .collections
            .get(collection)
            .into_iter()
            .flatten()
            .find(|d| matches(d, &filter))
            .cloned())
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: Document,
        limit: Option<u64>,
    ) -> SamajResult<Vec<Document>> {
        let inner = self.inner.lock().unwrap();
        Self::check_poison(&inner, collection, &filter)?;
        let capped = limit.map(|l| l as usize).unwrap_or(usize::MAX);
        Ok(inner
            .collections
            .get(collection)
            .into_iter()
            .flatten()
            .filter(|d| matches(d, &filter))
            .take(capped)
            .cloned()
            .collect())
    }

    async fn count(&self, collection: &str, filter: Document) -> SamajResult<u64> {
        let inner = self.inner.lock().unwrap();
        Self::check_poison(&inner, collection, &filter)?;
        Ok(inner
            .collections
            .get(collection)
            .into_iter()
            .flatten()
            .filter(|d| matches(d, &filter))
            .count() as u64)
    }

    async fn insert_one(&self, collection: &str, mut document: Document) -> SamajResult<ObjectId> {
        let mut inner = self.inner.lock().unwrap();
        let id = match document.get_object_id("_id") {
            Ok(id) => id,
            Err(_) => {
                let id = ObjectId::new();
                document.insert("_id", id);
                id
            }
        };
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> SamajResult<u64> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_poison(&inner, collection, &filter)?;
        let set = update
            .get_document("$set")
            .map_err(|_| SamajError::Internal("update must use $set".into()))?
            .clone();
        let Some(docs) = inner.collections.get_mut(collection) else {
            return Ok(0);
        };
        let Some(target) = docs.iter_mut().find(|d| matches(d, &filter)) else {
            return Ok(0);
        };
        for (key, value) in set {
            target.insert(key, value);
        }
        Ok(1)
    }

    async fn delete_many(&self, collection: &str, filter: Document) -> SamajResult<u64> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_poison(&inner, collection, &filter)?;
        let Some(docs) = inner.collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|d| !matches(d, &filter));
        Ok((before - docs.len()) as u64)
    }

    async fn begin_scope(&self) -> SamajResult<DeleteScope<Self::Scope>> {
        if self.transactions {
            let inner = self.inner.lock().unwrap();
            Ok(DeleteScope::atomic(Some(inner.collections.clone())))
        } else {
            Ok(DeleteScope::sequential(None))
        }
    }

    async fn scoped_delete_many(
        &self,
        _scope: &mut DeleteScope<Self::Scope>,
        collection: &str,
        filter: Document,
    ) -> SamajResult<u64> {
        self.delete_many(collection, filter).await
    }

    async fn commit_scope(&self, _scope: DeleteScope<Self::Scope>) -> SamajResult<()> {
        Ok(())
    }

    async fn abort_scope(&self, scope: DeleteScope<Self::Scope>) -> SamajResult<()> {
        if let Some(snapshot) = scope.into_inner() {
            let mut inner = self.inner.lock().unwrap();
            inner.collections = snapshot;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------
// Filter evaluation
// -----------------------------------------------------------------------

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, condition)| match key.as_str() {
        "$or" => condition
            .as_array()
            .is_some_and(|branches| {
                branches
                    .iter()
                    .any(|b| b.as_document().is_some_and(|f| matches(doc, f)))
            }),
        _ => field_matches(lookup_path(doc, key), condition),
    })
}

/// Resolve a possibly dotted path (`society.ref`) against a document.
fn lookup_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut current = doc;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        let value = current.get(segment)?;
        if segments.peek().is_none() {
            return Some(value);
        }
        current = value.as_document()?;
    }
    None
}

fn field_matches(value: Option<&Bson>, condition: &Bson) -> bool {
    if let Some(ops) = condition.as_document()
        && ops.keys().any(|k| k.starts_with('$'))
    {
        return ops.iter().all(|(op, arg)| match op.as_str() {
            "$in" => arg.as_array().is_some_and(|candidates| {
                value.is_some_and(|v| candidates.iter().any(|c| c == v))
            }),
            // $ne matches documents where the field is absent, like the
            // real query engine.
            "$ne" => value.is_none_or(|v| v != arg),
            "$exists" => arg
                .as_bool()
                .is_some_and(|want| value.is_some() == want),
            _ => false,
        });
    }
    value.is_some_and(|v| v == condition)
}

/// Whether the BSON tree contains `id`, either as an ObjectId or its hex
/// string form. Used for failure injection.
fn bson_contains_id(value: &Bson, id: &ObjectId) -> bool {
    match value {
        Bson::ObjectId(oid) => oid == id,
        Bson::String(s) => *s == id.to_hex(),
        Bson::Document(doc) => doc.values().any(|v| bson_contains_id(v, id)),
        Bson::Array(items) => items.iter().any(|v| bson_contains_id(v, id)),
        _ => false,
    }
}

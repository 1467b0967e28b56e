//! Document-store seam.
//!
//! The hierarchy components and the repositories are written against
//! [`DocumentStore`]; `samaj-db` provides the driver-backed implementation
//! and an in-memory one for tests. All operations are async. Reads run
//! unscoped; deletions participating in a cascade go through the
//! begin/commit/abort scope protocol.

use bson::Document;
use bson::oid::ObjectId;

use crate::error::SamajResult;

/// Whether a deletion scope is backed by a real multi-document transaction
/// or runs sequentially without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeMode {
    /// All-or-nothing: a failing step rolls back every prior step.
    Atomic,
    /// Best-effort: steps apply immediately, a failing step stops the
    /// sequence but does not undo prior steps.
    Sequential,
}

/// Handle to an in-flight deletion scope.
///
/// `S` is the store's native scope state (a client session for the driver
/// store, a rollback snapshot for the in-memory one).
pub struct DeleteScope<S> {
    inner: S,
    mode: ScopeMode,
}

impl<S> DeleteScope<S> {
    pub fn atomic(inner: S) -> Self {
        Self {
            inner,
            mode: ScopeMode::Atomic,
        }
    }

    pub fn sequential(inner: S) -> Self {
        Self {
            inner,
            mode: ScopeMode::Sequential,
        }
    }

    pub fn mode(&self) -> ScopeMode {
        self.mode
    }

    pub fn is_atomic(&self) -> bool {
        self.mode == ScopeMode::Atomic
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

/// Async document-store operations over named collections.
pub trait DocumentStore: Send + Sync {
    /// Store-native scope state carried by [`DeleteScope`].
    type Scope: Send;

    /// Ids of all documents matching `filter`.
    fn find_ids(
        &self,
        collection: &str,
        filter: Document,
    ) -> impl Future<Output = SamajResult<Vec<ObjectId>>> + Send;

    fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> impl Future<Output = SamajResult<Option<Document>>> + Send;

    /// Matching documents, optionally capped at `limit`.
    fn find_many(
        &self,
        collection: &str,
        filter: Document,
        limit: Option<u64>,
    ) -> impl Future<Output = SamajResult<Vec<Document>>> + Send;

    fn count(
        &self,
        collection: &str,
        filter: Document,
    ) -> impl Future<Output = SamajResult<u64>> + Send;

    fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> impl Future<Output = SamajResult<ObjectId>> + Send;

    /// Apply a `$set`-style update to the first matching document; returns
    /// the number of matched documents.
    fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> impl Future<Output = SamajResult<u64>> + Send;

    /// Unscoped bulk delete, outside any cascade.
    fn delete_many(
        &self,
        collection: &str,
        filter: Document,
    ) -> impl Future<Output = SamajResult<u64>> + Send;

    /// Open a deletion scope: atomic when the deployment supports
    /// multi-document transactions, sequential best-effort otherwise.
    fn begin_scope(&self) -> impl Future<Output = SamajResult<DeleteScope<Self::Scope>>> + Send;

    /// Bulk delete inside an open scope; returns the deleted count.
    fn scoped_delete_many(
        &self,
        scope: &mut DeleteScope<Self::Scope>,
        collection: &str,
        filter: Document,
    ) -> impl Future<Output = SamajResult<u64>> + Send;

    fn commit_scope(
        &self,
        scope: DeleteScope<Self::Scope>,
    ) -> impl Future<Output = SamajResult<()>> + Send;

    fn abort_scope(
        &self,
        scope: DeleteScope<Self::Scope>,
    ) -> impl Future<Output = SamajResult<()>> + Send;
}

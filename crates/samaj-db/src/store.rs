//! Driver-backed implementation of the document-store seam.

use bson::Document;
use bson::oid::ObjectId;
use bson::doc;
use futures::TryStreamExt;
use mongodb::{ClientSession, Database};
use samaj_core::SamajResult;
use samaj_core::store::{DeleteScope, DocumentStore};
use tracing::warn;

use crate::error::{DbError, is_transaction_unsupported};

/// MongoDB-backed [`DocumentStore`].
///
/// Reads run on the plain database handle. Deletion scopes map to client
/// sessions with a multi-document transaction; on deployments that reject
/// transactions (standalone topology) or with transactions disabled by
/// config, scopes degrade to sequential mode.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
    allow_transactions: bool,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self::with_transactions(db, true)
    }

    pub fn with_transactions(db: Database, allow_transactions: bool) -> Self {
        Self {
            db,
            allow_transactions,
        }
    }

    fn collection(&self, name: &str) -> mongodb::Collection<Document> {
        self.db.collection::<Document>(name)
    }
}

impl DocumentStore for MongoStore {
    /// `Some(session)` for atomic scopes, `None` for the sequential
    /// fallback.
    type Scope = Option<ClientSession>;

    async fn find_ids(&self, collection: &str, filter: Document) -> SamajResult<Vec<ObjectId>> {
        let docs: Vec<Document> = self
            .collection(collection)
            .find(filter)
            .projection(doc! { "_id": 1 })
            .await
            .map_err(DbError::from)?
            .try_collect()
            .await
            .map_err(DbError::from)?;
        Ok(docs
            .iter()
            .filter_map(|d| d.get_object_id("_id").ok())
            .collect())
    }

    async fn find_one(&self, collection: &str, filter: Document) -> SamajResult<Option<Document>> {
        Ok(self
            .collection(collection)
            .find_one(filter)
            .await
            .map_err(DbError::from)?)
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: Document,
        limit: Option<u64>,
    ) -> SamajResult<Vec<Document>> {
        let coll = self.collection(collection);
        let mut find = coll.find(filter);
        if let Some(limit) = limit {
            find = find.limit(limit as i64);
        }
        Ok(find
            .await
            .map_err(DbError::from)?
            .try_collect()
            .await
            .map_err(DbError::from)?)
    }

    async fn count(&self, collection: &str, filter: Document) -> SamajResult<u64> {
        Ok(self
            .collection(collection)
            .count_documents(filter)
            .await
            .map_err(DbError::from)?)
    }

    async fn insert_one(&self, collection: &str, mut document: Document) -> SamajResult<ObjectId> {
        let id = match document.get_object_id("_id") {
            Ok(id) => id,
            Err(_) => {
                let id = ObjectId::new();
                document.insert("_id", id);
                id
            }
        };
        self.collection(collection)
            .insert_one(document)
            .await
            .map_err(DbError::from)?;
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> SamajResult<u64> {
        let result = self
            .collection(collection)
            .update_one(filter, update)
            .await
            .map_err(DbError::from)?;
        Ok(result.matched_count)
    }

    async fn delete_many(&self, collection: &str, filter: Document) -> SamajResult<u64> {
        let result = self
            .collection(collection)
            .delete_many(filter)
            .await
            .map_err(DbError::from)?;
        Ok(result.deleted_count)
    }

    async fn begin_scope(&self) -> SamajResult<DeleteScope<Self::Scope>> {
        if !self.allow_transactions {
            return Ok(DeleteScope::sequential(None));
        }

        let mut session = self
            .db
            .client()
            .start_session()
            .await
            .map_err(DbError::from)?;
        match session.start_transaction().await {
            Ok(()) => Ok(DeleteScope::atomic(Some(session))),
            Err(err) if is_transaction_unsupported(&err) => {
                warn!(error = %err, "deployment does not support transactions");
                Ok(DeleteScope::sequential(None))
            }
            Err(err) => Err(DbError::from(err).into()),
        }
    }

    async fn scoped_delete_many(
        &self,
        scope: &mut DeleteScope<Self::Scope>,
        collection: &str,
        filter: Document,
    ) -> SamajResult<u64> {
        let coll = self.collection(collection);
        let delete = coll.delete_many(filter);
        let result = match scope.inner_mut() {
            Some(session) => delete.session(session).await,
            None => delete.await,
        }
        .map_err(DbError::from)?;
        Ok(result.deleted_count)
    }

    async fn commit_scope(&self, scope: DeleteScope<Self::Scope>) -> SamajResult<()> {
        if let Some(mut session) = scope.into_inner() {
            session.commit_transaction().await.map_err(DbError::from)?;
        }
        Ok(())
    }

    async fn abort_scope(&self, scope: DeleteScope<Self::Scope>) -> SamajResult<()> {
        if let Some(mut session) = scope.into_inner() {
            session.abort_transaction().await.map_err(DbError::from)?;
        }
        Ok(())
    }
}

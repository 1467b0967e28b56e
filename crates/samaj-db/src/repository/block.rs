//! Block repository.

use bson::DateTime;
use bson::oid::ObjectId;
use bson::doc;
use samaj_core::auth::Principal;
use samaj_core::error::{SamajError, SamajResult};
use samaj_core::models::RecordStatus;
use samaj_core::models::block::{Block, CreateBlock};
use samaj_core::store::DocumentStore;

use super::{from_doc, to_doc};

#[derive(Clone)]
pub struct BlockRepository<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> BlockRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: CreateBlock, actor: &Principal) -> SamajResult<Block> {
        let actor_id = actor.require_user()?;

        let existing = doc! { "building": input.building, "name": &input.name };
        if self.store.count(Block::COLLECTION, existing).await? > 0 {
            return Err(SamajError::duplicate_key("block", "name per building"));
        }

        let now = DateTime::now();
        let mut block = Block {
            id: None,
            name: input.name,
            building: input.building,
            status: RecordStatus::Active,
            created_by: Some(actor_id),
            created_at: now,
            updated_at: now,
        };

        let id = self
            .store
            .insert_one(Block::COLLECTION, to_doc(&block)?)
            .await?;
        block.id = Some(id);
        Ok(block)
    }

    pub async fn list_by_building(&self, building: ObjectId) -> SamajResult<Vec<Block>> {
        let docs = self
            .store
            .find_many(Block::COLLECTION, doc! { "building": building }, None)
            .await?;
        docs.into_iter().map(from_doc).collect()
    }
}

//! Floor repository.

use bson::DateTime;
use bson::oid::ObjectId;
use bson::doc;
use samaj_core::auth::Principal;
use samaj_core::error::{SamajError, SamajResult};
use samaj_core::models::RecordStatus;
use samaj_core::models::floor::{CreateFloor, Floor};
use samaj_core::store::DocumentStore;

use super::{from_doc, to_doc};

#[derive(Clone)]
pub struct FloorRepository<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> FloorRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: CreateFloor, actor: &Principal) -> SamajResult<Floor> {
        let actor_id = actor.require_user()?;

        let existing = doc! { "block": input.block, "number": input.number };
        if self.store.count(Floor::COLLECTION, existing).await? > 0 {
            return Err(SamajError::duplicate_key("floor", "number per block"));
        }

        let now = DateTime::now();
        let mut floor = Floor {
            id: None,
            name: input.name,
            number: input.number,
            block: input.block,
            building: input.building,
            status: RecordStatus::Active,
            created_by: Some(actor_id),
            created_at: now,
            updated_at: now,
        };

        let id = self
            .store
            .insert_one(Floor::COLLECTION, to_doc(&floor)?)
            .await?;
        floor.id = Some(id);
        Ok(floor)
    }

    pub async fn list_by_block(&self, block: ObjectId) -> SamajResult<Vec<Floor>> {
        let docs = self
            .store
            .find_many(Floor::COLLECTION, doc! { "block": block }, None)
            .await?;
        docs.into_iter().map(from_doc).collect()
    }
}

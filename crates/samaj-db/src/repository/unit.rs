//! Unit repository.

use bson::DateTime;
use bson::oid::ObjectId;
use bson::doc;
use samaj_core::auth::Principal;
use samaj_core::error::{SamajError, SamajResult};
use samaj_core::models::unit::{CreateUnit, Unit, UnitStatus};
use samaj_core::store::DocumentStore;

use super::{from_doc, to_doc};

#[derive(Clone)]
pub struct UnitRepository<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> UnitRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: CreateUnit, actor: &Principal) -> SamajResult<Unit> {
        let actor_id = actor.require_user()?;

        let existing = doc! { "floor": input.floor, "unitNumber": &input.unit_number };
        if self.store.count(Unit::COLLECTION, existing).await? > 0 {
            return Err(SamajError::duplicate_key("unit", "unitNumber per floor"));
        }

        let now = DateTime::now();
        let mut unit = Unit {
            id: None,
            block: input.block,
            floor: input.floor,
            unit_number: input.unit_number,
            unit_type: input.unit_type,
            area_sq_ft: input.area_sq_ft,
            status: UnitStatus::Vacant,
            owner: None,
            created_by: Some(actor_id),
            created_at: now,
            updated_at: now,
        };

        let id = self
            .store
            .insert_one(Unit::COLLECTION, to_doc(&unit)?)
            .await?;
        unit.id = Some(id);
        Ok(unit)
    }

    /// Link an owner to a vacant unit and mark it occupied, as the
    /// registration flow does.
    pub async fn assign_owner(&self, unit: ObjectId, owner: ObjectId) -> SamajResult<()> {
        let matched = self
            .store
            .update_one(
                Unit::COLLECTION,
                doc! { "_id": unit, "status": "vacant" },
                doc! { "$set": {
                    "owner": owner,
                    "status": "occupied",
                    "updatedAt": DateTime::now(),
                } },
            )
            .await?;
        if matched == 0 {
            return Err(SamajError::validation("unit is not available"));
        }
        Ok(())
    }

    pub async fn list_by_block(&self, block: ObjectId) -> SamajResult<Vec<Unit>> {
        let docs = self
            .store
            .find_many(Unit::COLLECTION, doc! { "block": block }, None)
            .await?;
        docs.into_iter().map(from_doc).collect()
    }
}

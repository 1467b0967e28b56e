//! Building repository.

use bson::DateTime;
use bson::oid::ObjectId;
use samaj_core::auth::Principal;
use samaj_core::error::{SamajError, SamajResult};
use samaj_core::models::RecordStatus;
use samaj_core::models::building::{Building, CreateBuilding};
use samaj_core::reference;
use samaj_core::store::DocumentStore;

use super::{from_doc, to_doc};

#[derive(Clone)]
pub struct BuildingRepository<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> BuildingRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: CreateBuilding, actor: &Principal) -> SamajResult<Building> {
        let actor_id = actor.require_user()?;

        if input.pin_code.len() != 6 || !input.pin_code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SamajError::validation(format!(
                "{} is not a valid pin code (expected 6 digits)",
                input.pin_code
            )));
        }

        // Unique building name per society, when the reference resolves.
        if let Some(society_id) = input.society.object_id() {
            let mut filter = reference::parent_filter("society", &society_id);
            filter.insert("buildingName", &input.building_name);
            if self.store.count(Building::COLLECTION, filter).await? > 0 {
                return Err(SamajError::duplicate_key(
                    "building",
                    "buildingName per society",
                ));
            }
        }

        let now = DateTime::now();
        let mut building = Building {
            id: None,
            society: input.society,
            building_name: input.building_name,
            address: input.address,
            territory: input.territory,
            city: input.city,
            state: input.state,
            pin_code: input.pin_code,
            total_blocks: input.total_blocks.unwrap_or(0),
            total_units: input.total_units.unwrap_or(0),
            building_type: input.building_type.unwrap_or_default(),
            status: RecordStatus::Active,
            created_by: Some(actor_id),
            created_at: now,
            updated_at: now,
        };

        let id = self
            .store
            .insert_one(Building::COLLECTION, to_doc(&building)?)
            .await?;
        building.id = Some(id);
        Ok(building)
    }

    pub async fn get(&self, id: ObjectId) -> SamajResult<Building> {
        let doc = self
            .store
            .find_one(Building::COLLECTION, bson::doc! { "_id": id })
            .await?
            .ok_or_else(|| SamajError::not_found("building", id))?;
        from_doc(doc)
    }

    /// Buildings owned by `society`, across every stored reference
    /// encoding.
    pub async fn list_by_society(&self, society: ObjectId) -> SamajResult<Vec<Building>> {
        let docs = self
            .store
            .find_many(
                Building::COLLECTION,
                reference::parent_filter("society", &society),
                None,
            )
            .await?;
        docs.into_iter().map(from_doc).collect()
    }
}

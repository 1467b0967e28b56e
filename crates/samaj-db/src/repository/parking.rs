//! Parking repository: areas, slots, and assignments.

use bson::DateTime;
use bson::oid::ObjectId;
use bson::doc;
use samaj_core::auth::Principal;
use samaj_core::error::{SamajError, SamajResult};
use samaj_core::models::RecordStatus;
use samaj_core::models::parking::{
    AssignmentStatus, CreateParkingArea, CreateParkingAssignment, CreateParkingSlot, ParkingArea,
    ParkingAssignment, ParkingSlot,
};
use samaj_core::store::DocumentStore;

use super::{from_doc, to_doc};

#[derive(Clone)]
pub struct ParkingRepository<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> ParkingRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create_area(
        &self,
        input: CreateParkingArea,
        actor: &Principal,
    ) -> SamajResult<ParkingArea> {
        let actor_id = actor.require_user()?;

        let now = DateTime::now();
        let mut area = ParkingArea {
            id: None,
            name: input.name,
            member_car_slots: input.member_car_slots.unwrap_or(0),
            member_bike_slots: input.member_bike_slots.unwrap_or(0),
            visitor_car_slots: input.visitor_car_slots.unwrap_or(0),
            visitor_bike_slots: input.visitor_bike_slots.unwrap_or(0),
            block: input.block,
            building: input.building,
            status: RecordStatus::Active,
            created_by: Some(actor_id),
            created_at: now,
            updated_at: now,
        };

        let id = self
            .store
            .insert_one(ParkingArea::COLLECTION, to_doc(&area)?)
            .await?;
        area.id = Some(id);
        Ok(area)
    }

    pub async fn create_slot(
        &self,
        input: CreateParkingSlot,
        actor: &Principal,
    ) -> SamajResult<ParkingSlot> {
        let actor_id = actor.require_user()?;

        let existing = doc! { "society": input.society, "slotNumber": &input.slot_number };
        if self.store.count(ParkingSlot::COLLECTION, existing).await? > 0 {
            return Err(SamajError::duplicate_key(
                "parkingSlot",
                "slotNumber per society",
            ));
        }

        let now = DateTime::now();
        let mut slot = ParkingSlot {
            id: None,
            society: input.society,
            parking: input.parking,
            block: input.block,
            building: input.building,
            unit: input.unit,
            slot_number: input.slot_number,
            slot_type: input.slot_type.unwrap_or_default(),
            is_available: true,
            current_user: None,
            status: RecordStatus::Active,
            created_by: Some(actor_id),
            created_at: now,
            updated_at: now,
        };

        let id = self
            .store
            .insert_one(ParkingSlot::COLLECTION, to_doc(&slot)?)
            .await?;
        slot.id = Some(id);
        Ok(slot)
    }

    /// Bind a slot to a user. A slot can have at most one active
    /// assignment; a second attempt fails with `DuplicateKey` (the partial
    /// unique index backs this on the driver store).
    pub async fn assign(
        &self,
        input: CreateParkingAssignment,
        actor: &Principal,
    ) -> SamajResult<ParkingAssignment> {
        let actor_id = actor.require_user()?;

        let slot_doc = self
            .store
            .find_one(ParkingSlot::COLLECTION, doc! { "_id": input.slot })
            .await?
            .ok_or_else(|| SamajError::not_found("parkingSlot", input.slot))?;
        let slot: ParkingSlot = from_doc(slot_doc)?;
        if slot.society != input.society {
            return Err(SamajError::validation("slot does not belong to this society"));
        }

        let active = doc! { "slot": input.slot, "status": "active" };
        if self
            .store
            .count(ParkingAssignment::COLLECTION, active)
            .await?
            > 0
        {
            return Err(SamajError::duplicate_key(
                "parkingAssignment",
                "one active assignment per slot",
            ));
        }

        let now = DateTime::now();
        let mut assignment = ParkingAssignment {
            id: None,
            society: input.society,
            slot: input.slot,
            user: input.user,
            unit: input.unit,
            vehicle_number: input.vehicle_number,
            assignment_type: input.assignment_type.unwrap_or_default(),
            start_at: now,
            end_at: input.end_at,
            status: AssignmentStatus::Active,
            created_by: Some(actor_id),
            created_at: now,
            updated_at: now,
        };

        let id = self
            .store
            .insert_one(ParkingAssignment::COLLECTION, to_doc(&assignment)?)
            .await?;
        assignment.id = Some(id);

        self.store
            .update_one(
                ParkingSlot::COLLECTION,
                doc! { "_id": input.slot },
                doc! { "$set": {
                    "isAvailable": false,
                    "currentUser": input.user,
                    "updatedAt": now,
                } },
            )
            .await?;

        Ok(assignment)
    }

    /// Cancel an active assignment and free its slot.
    pub async fn cancel(&self, assignment: ObjectId) -> SamajResult<()> {
        let doc = self
            .store
            .find_one(ParkingAssignment::COLLECTION, doc! { "_id": assignment })
            .await?
            .ok_or_else(|| SamajError::not_found("parkingAssignment", assignment))?;
        let record: ParkingAssignment = from_doc(doc)?;

        let now = DateTime::now();
        self.store
            .update_one(
                ParkingAssignment::COLLECTION,
                doc! { "_id": assignment },
                doc! { "$set": { "status": "cancelled", "endAt": now, "updatedAt": now } },
            )
            .await?;
        self.store
            .update_one(
                ParkingSlot::COLLECTION,
                doc! { "_id": record.slot },
                doc! { "$set": { "isAvailable": true, "updatedAt": now } },
            )
            .await?;
        // currentUser is left as a last-occupant trace, as the source does.
        Ok(())
    }
}

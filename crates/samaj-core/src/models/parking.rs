//! Parking domain models: configured areas, physical slots, and slot
//! assignments.
//!
//! Parking records cut across the ownership hierarchy: an area hangs off a
//! building or block, a slot always references the society and may
//! additionally reference a unit, and an assignment binds a slot to a user.

use bson::DateTime;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::RecordStatus;

/// A configured parking area with member/visitor slot counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingArea {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// e.g. `Ground Floor Parking`.
    pub name: String,
    #[serde(default)]
    pub member_car_slots: i32,
    #[serde(default)]
    pub member_bike_slots: i32,
    #[serde(default)]
    pub visitor_car_slots: i32,
    #[serde(default)]
    pub visitor_bike_slots: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<ObjectId>,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl ParkingArea {
    pub const COLLECTION: &'static str = "parkings";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParkingArea {
    pub name: String,
    pub member_car_slots: Option<i32>,
    pub member_bike_slots: Option<i32>,
    pub visitor_car_slots: Option<i32>,
    pub visitor_bike_slots: Option<i32>,
    pub block: Option<ObjectId>,
    pub building: Option<ObjectId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SlotType {
    #[default]
    Car,
    Bike,
    Visitor,
    Ev,
}

/// A physical parking slot. Slot numbers are unique per society.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSlot {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub society: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<ObjectId>,
    /// Unit this slot is earmarked for, when any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<ObjectId>,
    pub slot_number: String,
    #[serde(default)]
    pub slot_type: SlotType,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_user: Option<ObjectId>,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn default_true() -> bool {
    true
}

impl ParkingSlot {
    pub const COLLECTION: &'static str = "parkingSlots";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParkingSlot {
    pub society: ObjectId,
    pub parking: Option<ObjectId>,
    pub block: Option<ObjectId>,
    pub building: Option<ObjectId>,
    pub unit: Option<ObjectId>,
    pub slot_number: String,
    pub slot_type: Option<SlotType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentType {
    #[default]
    Permanent,
    Temporary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    #[default]
    Active,
    Expired,
    Cancelled,
}

/// Binding of a parking slot to its current occupant. A slot has at most
/// one `active` assignment at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingAssignment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub society: ObjectId,
    pub slot: ObjectId,
    pub user: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_number: Option<String>,
    #[serde(rename = "type", default)]
    pub assignment_type: AssignmentType,
    pub start_at: DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime>,
    #[serde(default)]
    pub status: AssignmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl ParkingAssignment {
    pub const COLLECTION: &'static str = "parkingAssignments";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParkingAssignment {
    pub society: ObjectId,
    pub slot: ObjectId,
    pub user: ObjectId,
    pub unit: Option<ObjectId>,
    pub vehicle_number: Option<String>,
    pub assignment_type: Option<AssignmentType>,
    pub end_at: Option<DateTime>,
}

//! Unit domain model.

use bson::DateTime;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    #[default]
    Vacant,
    Occupied,
    Blocked,
    Maintenance,
}

/// A residential or commercial unit. The `(floor, unitNumber)` pair is
/// unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub block: ObjectId,
    pub floor: ObjectId,
    /// e.g. `A-101`.
    pub unit_number: String,
    /// e.g. `1BHK`, `2BHK`, `Studio`, `Commercial`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_sq_ft: Option<f64>,
    #[serde(default)]
    pub status: UnitStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Unit {
    pub const COLLECTION: &'static str = "units";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnit {
    pub block: ObjectId,
    pub floor: ObjectId,
    pub unit_number: String,
    pub unit_type: Option<String>,
    pub area_sq_ft: Option<f64>,
}

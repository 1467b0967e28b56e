//! Building domain model.
//!
//! A building's society reference is the historically inconsistent field:
//! depending on when the document was written it may hold a raw ObjectId, a
//! hex string, or a `{name, logo, ref}` snapshot. It is therefore typed as
//! [`ParentRef`] rather than a plain id.

use bson::DateTime;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::RecordStatus;
use crate::reference::ParentRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BuildingType {
    #[default]
    Residential,
    Commercial,
    Mixed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub society: ParentRef,
    pub building_name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub territory: Option<String>,
    pub city: String,
    pub state: String,
    pub pin_code: String,
    #[serde(default)]
    pub total_blocks: i32,
    #[serde(default)]
    pub total_units: i32,
    #[serde(default)]
    pub building_type: BuildingType,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Building {
    pub const COLLECTION: &'static str = "buildingSettings";
}

/// Fields required to create a new building.
///
/// `society` is accepted in any supported encoding; new writers should
/// produce the snapshot form, but callers migrating old payloads may pass
/// the raw forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBuilding {
    pub society: ParentRef,
    pub building_name: String,
    pub address: String,
    pub territory: Option<String>,
    pub city: String,
    pub state: String,
    pub pin_code: String,
    pub total_blocks: Option<i32>,
    pub total_units: Option<i32>,
    pub building_type: Option<BuildingType>,
}

//! Floor domain model.

use bson::DateTime;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::RecordStatus;

/// A floor within a block. The `(block, number)` pair is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Floor {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub number: i32,
    pub block: ObjectId,
    /// Redundant building reference, not populated on every document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<ObjectId>,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Floor {
    pub const COLLECTION: &'static str = "floors";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFloor {
    pub name: String,
    pub number: i32,
    pub block: ObjectId,
    pub building: Option<ObjectId>,
}

//! User domain model.
//!
//! Residents, managers, committee members, and employees are all `User`
//! documents distinguished by `role`.

use bson::DateTime;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::RecordStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Superadmin,
    Admin,
    Manager,
    #[default]
    Member,
    CommitteeMember,
    Employee,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub society: Option<ObjectId>,
    #[serde(default)]
    pub invited: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_expires_at: Option<DateTime>,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn default_country_code() -> String {
    "+91".into()
}

impl User {
    pub const COLLECTION: &'static str = "users";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub country_code: Option<String>,
    pub mobile_number: Option<String>,
    pub role: Option<Role>,
    pub society: Option<ObjectId>,
}

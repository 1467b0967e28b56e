//! Domain models for SAMAJ.
//!
//! These are the persisted document shapes shared across all crates.
//! Field names serialize in camelCase to match the stored collections.

use serde::{Deserialize, Serialize};

pub mod block;
pub mod building;
pub mod floor;
pub mod parking;
pub mod society;
pub mod unit;
pub mod user;

/// Active/inactive marker used by most collections for soft deactivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
}

//! Per-entity repositories over the document-store seam.

mod block;
mod building;
mod floor;
mod parking;
mod society;
mod unit;
mod user;

pub use block::BlockRepository;
pub use building::BuildingRepository;
pub use floor::FloorRepository;
pub use parking::ParkingRepository;
pub use society::SocietyRepository;
pub use unit::UnitRepository;
pub use user::UserRepository;

use bson::Document;
use samaj_core::error::{SamajError, SamajResult};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub(crate) fn to_doc<T: Serialize>(value: &T) -> SamajResult<Document> {
    bson::to_document(value).map_err(|e| SamajError::Internal(e.to_string()))
}

pub(crate) fn from_doc<T: DeserializeOwned>(doc: Document) -> SamajResult<T> {
    bson::from_document(doc).map_err(|e| SamajError::Internal(e.to_string()))
}

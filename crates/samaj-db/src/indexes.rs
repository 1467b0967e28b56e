//! Index bootstrap.
//!
//! Creates the unique indexes the write paths rely on. All creations are
//! idempotent so re-running at startup is safe.

use bson::{Document, doc};
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};
use tracing::info;

use samaj_core::models::block::Block;
use samaj_core::models::building::Building;
use samaj_core::models::floor::Floor;
use samaj_core::models::parking::{ParkingAssignment, ParkingSlot};
use samaj_core::models::society::Society;
use samaj_core::models::unit::Unit;
use samaj_core::models::user::User;

use crate::error::DbError;

/// Ensure every uniqueness invariant has its backing index.
pub async fn ensure_indexes(db: &Database) -> Result<(), DbError> {
    unique(db, Society::COLLECTION, doc! { "code": 1 }, None).await?;
    unique(
        db,
        Building::COLLECTION,
        doc! { "society.ref": 1, "buildingName": 1 },
        Some(doc! { "society.ref": { "$exists": true } }),
    )
    .await?;
    unique(db, Block::COLLECTION, doc! { "building": 1, "name": 1 }, None).await?;
    unique(db, Floor::COLLECTION, doc! { "block": 1, "number": 1 }, None).await?;
    unique(db, Unit::COLLECTION, doc! { "floor": 1, "unitNumber": 1 }, None).await?;
    unique(
        db,
        ParkingSlot::COLLECTION,
        doc! { "society": 1, "slotNumber": 1 },
        None,
    )
    .await?;
    // At most one active assignment per slot.
    unique(
        db,
        ParkingAssignment::COLLECTION,
        doc! { "slot": 1, "status": 1 },
        Some(doc! { "status": "active" }),
    )
    .await?;
    unique(db, User::COLLECTION, doc! { "email": 1 }, None).await?;

    info!("Indexes ensured");
    Ok(())
}

async fn unique(
    db: &Database,
    collection: &str,
    keys: Document,
    partial: Option<Document>,
) -> Result<(), DbError> {
    let options = IndexOptions::builder()
        .unique(true)
        .partial_filter_expression(partial)
        .build();
    let model = IndexModel::builder().keys(keys).options(options).build();
    db.collection::<Document>(collection)
        .create_index(model)
        .await?;
    Ok(())
}

//! Per-society aggregation for list and detail views.
//!
//! Builds one overview row per non-deleted society: admin contact, block
//! and unit counts, resident count, summed parking configuration, and
//! amenity count. Rows are computed concurrently and independently — one
//! society's lookup failure is caught and logged, producing a degraded row
//! for that society without failing the listing.

use bson::oid::ObjectId;
use bson::{Document, doc};
use chrono::Datelike;
use futures::future::join_all;
use serde::Serialize;
use tracing::warn;

use crate::error::{SamajError, SamajResult};
use crate::hierarchy::member_filter;
use crate::models::RecordStatus;
use crate::models::block::Block;
use crate::models::building::Building;
use crate::models::parking::ParkingArea;
use crate::models::society::Society;
use crate::models::unit::Unit;
use crate::models::user::User;
use crate::reference;
use crate::store::DocumentStore;

/// Amenities are aggregated by count only; the full model lives with its
/// own CRUD controller outside this crate.
pub const AMENITIES_COLLECTION: &str = "amenities";

const SAMPLE_LIMIT: u64 = 5;
const BLOCK_NAME_CAP: usize = 50;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminContact {
    pub name: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSummary {
    pub count: u64,
    /// Block names, included only when samples were requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSummary {
    pub member_car_slots: i64,
    pub member_bike_slots: i64,
    pub visitor_car_slots: i64,
    pub visitor_bike_slots: i64,
    pub total_configured: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSample {
    pub unit_number: String,
    pub unit_type: Option<String>,
    pub status: crate::models::unit::UnitStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentSample {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile_number: Option<String>,
}

/// One listing row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocietyOverview {
    pub id: ObjectId,
    pub code: String,
    pub name: String,
    pub territory: String,
    pub address: String,
    pub status: RecordStatus,
    pub estb_year: Option<i32>,
    pub admin: Option<AdminContact>,
    pub blocks: BlockSummary,
    pub units_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units_sample: Option<Vec<UnitSample>>,
    pub residents_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residents_sample: Option<Vec<ResidentSample>>,
    pub parking: ParkingSummary,
    pub amenities_count: u64,
    /// True when one of this row's lookups failed and counts are partial.
    pub degraded: bool,
}

pub struct AggregationReporter<'a, S: DocumentStore> {
    store: &'a S,
}

impl<'a, S: DocumentStore> AggregationReporter<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Overview rows for all non-deleted societies, computed concurrently.
    pub async fn society_overviews(
        &self,
        include_samples: bool,
    ) -> SamajResult<Vec<SocietyOverview>> {
        let docs = self
            .store
            .find_many(Society::COLLECTION, doc! { "isDeleted": { "$ne": true } }, None)
            .await?;

        let societies: Vec<Society> = docs
            .into_iter()
            .filter_map(|doc| match bson::from_document(doc) {
                Ok(society) => Some(society),
                Err(err) => {
                    warn!(error = %err, "skipping undecodable society document");
                    None
                }
            })
            .collect();

        let rows = join_all(
            societies
                .into_iter()
                .map(|society| self.overview_row(society, include_samples)),
        )
        .await;

        Ok(rows)
    }

    /// The assembled row for a single society; `NotFound` when the id does
    /// not resolve to a live society.
    pub async fn society_details(&self, id: &str) -> SamajResult<SocietyOverview> {
        let society_id = reference::parse_object_id(id)?;
        let doc = self
            .store
            .find_one(
                Society::COLLECTION,
                doc! { "_id": society_id, "isDeleted": { "$ne": true } },
            )
            .await?
            .ok_or_else(|| SamajError::not_found("society", id))?;
        let society: Society =
            bson::from_document(doc).map_err(|e| SamajError::Internal(e.to_string()))?;

        self.assemble(&society, society_id, true).await
    }

    async fn overview_row(&self, society: Society, include_samples: bool) -> SocietyOverview {
        let Some(id) = society.id else {
            warn!(name = %society.name, "society document missing _id; returning degraded row");
            return degraded_row(&society, ObjectId::new());
        };
        match self.assemble(&society, id, include_samples).await {
            Ok(row) => row,
            Err(err) => {
                warn!(society = %id, error = %err, "aggregation failed; returning degraded row");
                degraded_row(&society, id)
            }
        }
    }

    async fn assemble(
        &self,
        society: &Society,
        id: ObjectId,
        include_samples: bool,
    ) -> SamajResult<SocietyOverview> {
        let admin = self.admin_contact(society).await;

        let buildings = self
            .store
            .find_many(
                Building::COLLECTION,
                reference::parent_filter("society", &id),
                None,
            )
            .await?;
        let building_ids = doc_ids(&buildings);

        let blocks = if building_ids.is_empty() {
            Vec::new()
        } else {
            self.store
                .find_many(
                    Block::COLLECTION,
                    member_filter("building", &building_ids),
                    None,
                )
                .await?
        };
        let block_ids = doc_ids(&blocks);
        let block_names: Vec<String> = blocks
            .iter()
            .filter_map(|b| b.get_str("name").ok().map(String::from))
            .collect();

        // Unit aggregation keys off the direct block reference; floors are
        // not needed for counting.
        let units_filter = member_filter("block", &block_ids);
        let units_count = if block_ids.is_empty() {
            0
        } else {
            self.store.count(Unit::COLLECTION, units_filter.clone()).await?
        };
        let units_sample = if include_samples && units_count > 0 {
            let docs = self
                .store
                .find_many(Unit::COLLECTION, units_filter, Some(SAMPLE_LIMIT))
                .await?;
            Some(
                docs.into_iter()
                    .filter_map(|d| bson::from_document::<Unit>(d).ok())
                    .map(|u| UnitSample {
                        unit_number: u.unit_number,
                        unit_type: u.unit_type,
                        status: u.status,
                    })
                    .collect(),
            )
        } else {
            None
        };

        let mut residents_filter = reference::parent_filter("society", &id);
        residents_filter.insert("isDeleted", doc! { "$ne": true });
        let residents_count = self
            .store
            .count(User::COLLECTION, residents_filter.clone())
            .await?;
        let residents_sample = if include_samples && residents_count > 0 {
            let docs = self
                .store
                .find_many(User::COLLECTION, residents_filter, Some(SAMPLE_LIMIT))
                .await?;
            Some(
                docs.into_iter()
                    .filter_map(|d| bson::from_document::<User>(d).ok())
                    .map(|u| ResidentSample {
                        first_name: u.first_name,
                        last_name: u.last_name,
                        email: u.email,
                        mobile_number: u.mobile_number,
                    })
                    .collect(),
            )
        } else {
            None
        };

        let parking = self.parking_summary(&building_ids).await?;

        let amenities_count = self
            .store
            .count(AMENITIES_COLLECTION, reference::parent_filter("society", &id))
            .await?;

        Ok(SocietyOverview {
            id,
            code: society.code.clone(),
            name: society.name.clone(),
            territory: society.territory.clone(),
            address: society.address.clone(),
            status: society.status,
            estb_year: Some(society.created_at.to_chrono().year()),
            admin,
            blocks: BlockSummary {
                count: block_ids.len() as u64,
                names: include_samples
                    .then(|| block_names.into_iter().take(BLOCK_NAME_CAP).collect()),
            },
            units_count,
            units_sample,
            residents_count,
            residents_sample,
            parking,
            amenities_count,
            degraded: false,
        })
    }

    /// Admin lookup failures degrade to `None` rather than poisoning the
    /// whole row, matching the listing's tolerance for stale manager links.
    async fn admin_contact(&self, society: &Society) -> Option<AdminContact> {
        let manager_id = society.admin_manager?;
        let lookup = self
            .store
            .find_one(User::COLLECTION, doc! { "_id": manager_id })
            .await;
        let doc = match lookup {
            Ok(doc) => doc?,
            Err(err) => {
                warn!(manager = %manager_id, error = %err, "admin manager lookup failed");
                return None;
            }
        };
        let user: User = bson::from_document(doc).ok()?;
        Some(AdminContact {
            name: format!("{} {}", user.first_name, user.last_name)
                .trim()
                .to_string(),
            email: Some(user.email),
            mobile: user.mobile_number,
            country_code: Some(user.country_code),
        })
    }

    async fn parking_summary(&self, building_ids: &[ObjectId]) -> SamajResult<ParkingSummary> {
        let mut summary = ParkingSummary::default();
        if building_ids.is_empty() {
            return Ok(summary);
        }
        let docs = self
            .store
            .find_many(
                ParkingArea::COLLECTION,
                member_filter("building", building_ids),
                None,
            )
            .await?;
        for doc in docs {
            let Ok(area) = bson::from_document::<ParkingArea>(doc) else {
                continue;
            };
            summary.member_car_slots += i64::from(area.member_car_slots);
            summary.member_bike_slots += i64::from(area.member_bike_slots);
            summary.visitor_car_slots += i64::from(area.visitor_car_slots);
            summary.visitor_bike_slots += i64::from(area.visitor_bike_slots);
        }
        summary.total_configured = summary.member_car_slots
            + summary.member_bike_slots
            + summary.visitor_car_slots
            + summary.visitor_bike_slots;
        Ok(summary)
    }
}

fn doc_ids(docs: &[Document]) -> Vec<ObjectId> {
    docs.iter()
        .filter_map(|d| d.get_object_id("_id").ok())
        .collect()
}

fn degraded_row(society: &Society, id: ObjectId) -> SocietyOverview {
    SocietyOverview {
        id,
        code: society.code.clone(),
        name: society.name.clone(),
        territory: society.territory.clone(),
        address: society.address.clone(),
        status: society.status,
        estb_year: Some(society.created_at.to_chrono().year()),
        admin: None,
        blocks: BlockSummary::default(),
        units_count: 0,
        units_sample: None,
        residents_count: 0,
        residents_sample: None,
        parking: ParkingSummary::default(),
        amenities_count: 0,
        degraded: true,
    }
}

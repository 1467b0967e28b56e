//! Integration tests for the society aggregation reporter using the
//! in-memory store.

use bson::doc;
use bson::oid::ObjectId;
use samaj_core::SamajError;
use samaj_core::aggregate::{AMENITIES_COLLECTION, AggregationReporter};
use samaj_core::auth::Principal;
use samaj_core::models::block::CreateBlock;
use samaj_core::models::building::{Building, CreateBuilding};
use samaj_core::models::floor::CreateFloor;
use samaj_core::models::parking::CreateParkingArea;
use samaj_core::models::society::CreateSociety;
use samaj_core::models::unit::CreateUnit;
use samaj_core::models::user::{CreateUser, Role};
use samaj_core::reference::ParentRef;
use samaj_core::store::DocumentStore;
use samaj_db::MemoryStore;
use samaj_db::repository::{
    BlockRepository, BuildingRepository, FloorRepository, ParkingRepository, SocietyRepository,
    UnitRepository, UserRepository,
};

fn admin() -> Principal {
    Principal::user(ObjectId::new(), None, Role::Superadmin)
}

/// A society with one building, one block, two units, two residents (one of
/// them the admin manager), a parking area, and an amenity.
async fn seed_populated_society(store: &MemoryStore, name: &str, email_domain: &str) -> ObjectId {
    let actor = admin();

    let manager = UserRepository::new(store.clone())
        .create(
            CreateUser {
                first_name: "Asha".into(),
                last_name: Some("Patil".into()),
                email: format!("asha@{email_domain}"),
                country_code: Some("+91".into()),
                mobile_number: Some("9800000010".into()),
                role: Some(Role::Manager),
                society: None,
            },
            &actor,
        )
        .await
        .unwrap()
        .id
        .unwrap();

    let society = SocietyRepository::new(store.clone())
        .create(
            CreateSociety {
                name: name.into(),
                territory: Some("North".into()),
                address: Some("Sector 9".into()),
                admin_manager: Some(manager),
            },
            &actor,
        )
        .await
        .unwrap()
        .id
        .unwrap();

    // Manager is also a member of the society.
    store
        .update_one(
            samaj_core::models::user::User::COLLECTION,
            doc! { "_id": manager },
            doc! { "$set": { "society": society } },
        )
        .await
        .unwrap();

    UserRepository::new(store.clone())
        .create(
            CreateUser {
                first_name: "Ravi".into(),
                last_name: None,
                email: format!("ravi@{email_domain}"),
                country_code: None,
                mobile_number: None,
                role: Some(Role::Member),
                society: Some(society),
            },
            &actor,
        )
        .await
        .unwrap();

    let building = BuildingRepository::new(store.clone())
        .create(
            CreateBuilding {
                society: ParentRef::snapshot(name, society),
                building_name: format!("{name} Tower"),
                address: "Plot 4".into(),
                territory: None,
                city: "Nashik".into(),
                state: "MH".into(),
                pin_code: "422001".into(),
                total_blocks: Some(1),
                total_units: Some(2),
                building_type: None,
            },
            &actor,
        )
        .await
        .unwrap()
        .id
        .unwrap();

    let block = BlockRepository::new(store.clone())
        .create(
            CreateBlock {
                name: "A".into(),
                building,
            },
            &actor,
        )
        .await
        .unwrap()
        .id
        .unwrap();

    let floor = FloorRepository::new(store.clone())
        .create(
            CreateFloor {
                name: "Ground".into(),
                number: 0,
                block,
                building: Some(building),
            },
            &actor,
        )
        .await
        .unwrap()
        .id
        .unwrap();

    let units = UnitRepository::new(store.clone());
    for number in ["A-001", "A-002"] {
        units
            .create(
                CreateUnit {
                    block,
                    floor,
                    unit_number: number.into(),
                    unit_type: Some("1BHK".into()),
                    area_sq_ft: None,
                },
                &actor,
            )
            .await
            .unwrap();
    }

    ParkingRepository::new(store.clone())
        .create_area(
            CreateParkingArea {
                name: "Basement".into(),
                member_car_slots: Some(10),
                member_bike_slots: Some(20),
                visitor_car_slots: Some(4),
                visitor_bike_slots: Some(6),
                block: Some(block),
                building: Some(building),
            },
            &actor,
        )
        .await
        .unwrap();

    store
        .insert_one(
            AMENITIES_COLLECTION,
            doc! { "name": "Clubhouse", "society": society },
        )
        .await
        .unwrap();

    society
}

#[tokio::test]
async fn overview_row_is_fully_populated() {
    let store = MemoryStore::new();
    let society = seed_populated_society(&store, "Sunrise", "sunrise.example").await;

    let rows = AggregationReporter::new(&store)
        .society_overviews(true)
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.id, society);
    assert!(!row.degraded);
    assert_eq!(row.name, "Sunrise");
    assert_eq!(row.blocks.count, 1);
    assert_eq!(row.blocks.names.as_deref(), Some(&["A".to_string()][..]));
    assert_eq!(row.units_count, 2);
    assert_eq!(row.units_sample.as_ref().unwrap().len(), 2);
    assert_eq!(row.residents_count, 2);
    assert_eq!(row.parking.member_car_slots, 10);
    assert_eq!(row.parking.member_bike_slots, 20);
    assert_eq!(row.parking.visitor_car_slots, 4);
    assert_eq!(row.parking.visitor_bike_slots, 6);
    assert_eq!(row.parking.total_configured, 40);
    assert_eq!(row.amenities_count, 1);

    let contact = row.admin.as_ref().unwrap();
    assert_eq!(contact.name, "Asha Patil");
    assert_eq!(contact.email.as_deref(), Some("asha@sunrise.example"));
}

#[tokio::test]
async fn samples_are_omitted_unless_requested() {
    let store = MemoryStore::new();
    seed_populated_society(&store, "Plain", "plain.example").await;

    let rows = AggregationReporter::new(&store)
        .society_overviews(false)
        .await
        .unwrap();

    let row = &rows[0];
    assert!(row.units_sample.is_none());
    assert!(row.residents_sample.is_none());
    assert!(row.blocks.names.is_none());
    assert_eq!(row.units_count, 2);
}

// One society's lookup failure must not abort the others: the failing one
// comes back degraded, the healthy one fully populated, and the call still
// succeeds overall.
#[tokio::test]
async fn lookup_failure_degrades_only_that_row() {
    let store = MemoryStore::new();
    let healthy = seed_populated_society(&store, "Healthy", "healthy.example").await;
    let failing = seed_populated_society(&store, "Failing", "failing.example").await;

    store.fail_queries_containing(Building::COLLECTION, failing);

    let rows = AggregationReporter::new(&store)
        .society_overviews(true)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let healthy_row = rows.iter().find(|r| r.id == healthy).unwrap();
    assert!(!healthy_row.degraded);
    assert_eq!(healthy_row.units_count, 2);
    assert_eq!(healthy_row.blocks.count, 1);

    let failing_row = rows.iter().find(|r| r.id == failing).unwrap();
    assert!(failing_row.degraded);
    assert_eq!(failing_row.name, "Failing");
    assert_eq!(failing_row.units_count, 0);
}

#[tokio::test]
async fn archived_society_is_excluded_from_listing() {
    let store = MemoryStore::new();
    let society = seed_populated_society(&store, "Closing", "closing.example").await;

    SocietyRepository::new(store.clone())
        .archive(society)
        .await
        .unwrap();

    let rows = AggregationReporter::new(&store)
        .society_overviews(false)
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn details_for_one_society() {
    let store = MemoryStore::new();
    let society = seed_populated_society(&store, "Detail", "detail.example").await;

    let row = AggregationReporter::new(&store)
        .society_details(&society.to_hex())
        .await
        .unwrap();
    assert_eq!(row.id, society);
    assert_eq!(row.blocks.count, 1);
    assert_eq!(row.units_count, 2);
}

#[tokio::test]
async fn details_for_unknown_society_is_not_found() {
    let store = MemoryStore::new();
    let err = AggregationReporter::new(&store)
        .society_details(&ObjectId::new().to_hex())
        .await
        .unwrap_err();
    assert!(matches!(err, SamajError::NotFound { .. }));
}

#[tokio::test]
async fn details_rejects_malformed_id() {
    let store = MemoryStore::new();
    let err = AggregationReporter::new(&store)
        .society_details("xyz")
        .await
        .unwrap_err();
    assert!(matches!(err, SamajError::InvalidIdentifier { .. }));
}

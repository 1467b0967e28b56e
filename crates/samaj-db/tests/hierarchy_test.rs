//! Integration tests for hierarchy resolution and reference matching
//! using the in-memory store.

use bson::doc;
use bson::oid::ObjectId;
use samaj_core::SamajError;
use samaj_core::auth::Principal;
use samaj_core::dependents::DependentCollector;
use samaj_core::hierarchy::{HierarchyLevel, HierarchyResolver};
use samaj_core::models::block::{Block, CreateBlock};
use samaj_core::models::building::CreateBuilding;
use samaj_core::models::floor::CreateFloor;
use samaj_core::models::parking::{CreateParkingSlot, ParkingSlot};
use samaj_core::models::society::CreateSociety;
use samaj_core::models::unit::CreateUnit;
use samaj_core::models::user::Role;
use samaj_core::reference::ParentRef;
use samaj_core::store::DocumentStore;
use samaj_db::MemoryStore;
use samaj_db::repository::{
    BlockRepository, BuildingRepository, FloorRepository, ParkingRepository, SocietyRepository,
    UnitRepository,
};

fn admin() -> Principal {
    Principal::user(ObjectId::new(), None, Role::Superadmin)
}

async fn seed_society(store: &MemoryStore, name: &str) -> ObjectId {
    SocietyRepository::new(store.clone())
        .create(
            CreateSociety {
                name: name.into(),
                territory: Some("West Zone".into()),
                address: None,
                admin_manager: None,
            },
            &admin(),
        )
        .await
        .unwrap()
        .id
        .unwrap()
}

async fn seed_building(store: &MemoryStore, society: ParentRef, name: &str) -> ObjectId {
    BuildingRepository::new(store.clone())
        .create(
            CreateBuilding {
                society,
                building_name: name.into(),
                address: "12 MG Road".into(),
                territory: None,
                city: "Pune".into(),
                state: "MH".into(),
                pin_code: "411001".into(),
                total_blocks: None,
                total_units: None,
                building_type: None,
            },
            &admin(),
        )
        .await
        .unwrap()
        .id
        .unwrap()
}

async fn seed_block(store: &MemoryStore, building: ObjectId, name: &str) -> ObjectId {
    BlockRepository::new(store.clone())
        .create(
            CreateBlock {
                name: name.into(),
                building,
            },
            &admin(),
        )
        .await
        .unwrap()
        .id
        .unwrap()
}

async fn seed_floor(store: &MemoryStore, block: ObjectId, number: i32) -> ObjectId {
    FloorRepository::new(store.clone())
        .create(
            CreateFloor {
                name: format!("Floor {number}"),
                number,
                block,
                building: None,
            },
            &admin(),
        )
        .await
        .unwrap()
        .id
        .unwrap()
}

async fn seed_unit(store: &MemoryStore, block: ObjectId, floor: ObjectId, number: &str) -> ObjectId {
    UnitRepository::new(store.clone())
        .create(
            CreateUnit {
                block,
                floor,
                unit_number: number.into(),
                unit_type: Some("2BHK".into()),
                area_sq_ft: Some(980.0),
            },
            &admin(),
        )
        .await
        .unwrap()
        .id
        .unwrap()
}

#[tokio::test]
async fn resolves_full_tree() {
    let store = MemoryStore::new();
    let society = seed_society(&store, "Green Acres").await;

    let b1 = seed_building(&store, ParentRef::snapshot("Green Acres", society), "Tower 1").await;
    let b2 = seed_building(&store, ParentRef::snapshot("Green Acres", society), "Tower 2").await;
    let block_a = seed_block(&store, b1, "A").await;
    let block_b = seed_block(&store, b2, "B").await;
    let f1 = seed_floor(&store, block_a, 1).await;
    let f2 = seed_floor(&store, block_a, 2).await;
    seed_unit(&store, block_a, f1, "A-101").await;
    seed_unit(&store, block_a, f1, "A-102").await;
    seed_unit(&store, block_a, f2, "A-201").await;

    let tree = HierarchyResolver::new(&store).resolve(society).await.unwrap();

    assert_eq!(tree.buildings.len(), 2);
    assert!(tree.buildings.contains(&b1) && tree.buildings.contains(&b2));
    assert_eq!(tree.blocks.len(), 2);
    assert!(tree.blocks.contains(&block_a) && tree.blocks.contains(&block_b));
    assert_eq!(tree.floors.len(), 2);
    assert_eq!(tree.units.len(), 3);
}

#[tokio::test]
async fn empty_level_short_circuits() {
    let store = MemoryStore::new();
    let society = seed_society(&store, "Bare Plot").await;
    seed_building(&store, ParentRef::from(society), "Shell").await;

    let tree = HierarchyResolver::new(&store).resolve(society).await.unwrap();

    assert_eq!(tree.buildings.len(), 1);
    assert!(tree.blocks.is_empty());
    assert!(tree.floors.is_empty());
    assert!(tree.units.is_empty());
}

#[tokio::test]
async fn society_without_buildings_resolves_empty() {
    let store = MemoryStore::new();
    let society = seed_society(&store, "Empty").await;

    let tree = HierarchyResolver::new(&store).resolve(society).await.unwrap();
    assert!(tree.buildings.is_empty());
    assert!(tree.units.is_empty());
}

// The same society id stored in three different encodings must resolve to
// all three buildings in one query.
#[tokio::test]
async fn matches_all_reference_encodings() {
    let store = MemoryStore::new();
    let society = seed_society(&store, "Mixed Encodings").await;

    let raw = seed_building(&store, ParentRef::from(society), "Raw Id").await;
    let hex = seed_building(&store, ParentRef::Hex(society.to_hex()), "Hex String").await;
    let snap = seed_building(
        &store,
        ParentRef::snapshot("Mixed Encodings", society),
        "Snapshot",
    )
    .await;

    let tree = HierarchyResolver::new(&store).resolve(society).await.unwrap();

    assert_eq!(tree.buildings.len(), 3);
    for id in [raw, hex, snap] {
        assert!(tree.buildings.contains(&id));
    }
}

#[tokio::test]
async fn resolution_failure_carries_level() {
    let store = MemoryStore::new();
    let society = seed_society(&store, "Poisoned").await;
    let building = seed_building(&store, ParentRef::from(society), "Tower").await;

    store.fail_queries_containing(Block::COLLECTION, building);

    let err = HierarchyResolver::new(&store)
        .resolve(society)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SamajError::ResolutionFailed {
            level: HierarchyLevel::Blocks,
            ..
        }
    ));
}

#[tokio::test]
async fn foreign_subtree_is_not_resolved() {
    let store = MemoryStore::new();
    let mine = seed_society(&store, "Mine").await;
    let theirs = seed_society(&store, "Theirs").await;

    seed_building(&store, ParentRef::from(mine), "Mine Tower").await;
    let other_building = seed_building(&store, ParentRef::from(theirs), "Their Tower").await;
    seed_block(&store, other_building, "T").await;

    let tree = HierarchyResolver::new(&store).resolve(mine).await.unwrap();
    assert_eq!(tree.buildings.len(), 1);
    assert!(tree.blocks.is_empty());
}

// -----------------------------------------------------------------------
// Dependent collector
// -----------------------------------------------------------------------

#[tokio::test]
async fn collects_parking_dependents() {
    let store = MemoryStore::new();
    let society = seed_society(&store, "Parked").await;
    let building = seed_building(&store, ParentRef::from(society), "Tower").await;
    let block = seed_block(&store, building, "A").await;
    let floor = seed_floor(&store, block, 1).await;
    let unit = seed_unit(&store, block, floor, "A-101").await;

    let parking = ParkingRepository::new(store.clone());
    // One slot tied to the unit, one tied only to the society.
    let unit_slot = parking
        .create_slot(
            CreateParkingSlot {
                society,
                parking: None,
                block: Some(block),
                building: Some(building),
                unit: Some(unit),
                slot_number: "P-1".into(),
                slot_type: None,
            },
            &admin(),
        )
        .await
        .unwrap()
        .id
        .unwrap();
    let society_slot = parking
        .create_slot(
            CreateParkingSlot {
                society,
                parking: None,
                block: None,
                building: None,
                unit: None,
                slot_number: "P-2".into(),
                slot_type: None,
            },
            &admin(),
        )
        .await
        .unwrap()
        .id
        .unwrap();

    let tree = HierarchyResolver::new(&store).resolve(society).await.unwrap();
    let deps = DependentCollector::new(&store)
        .collect(society, &tree)
        .await
        .unwrap();

    assert_eq!(deps.slots.len(), 2);
    assert!(deps.slots.contains(&unit_slot));
    assert!(deps.slots.contains(&society_slot));
}

// A slot document written without a society reference at all (legacy data)
// is still collected through its unit.
#[tokio::test]
async fn collects_slot_referencing_only_unit() {
    let store = MemoryStore::new();
    let society = seed_society(&store, "Legacy").await;
    let building = seed_building(&store, ParentRef::from(society), "Tower").await;
    let block = seed_block(&store, building, "A").await;
    let floor = seed_floor(&store, block, 1).await;
    let unit = seed_unit(&store, block, floor, "A-101").await;

    let slot_id = store
        .insert_one(
            ParkingSlot::COLLECTION,
            doc! { "unit": unit, "slotNumber": "L-1", "slotType": "car" },
        )
        .await
        .unwrap();

    let tree = HierarchyResolver::new(&store).resolve(society).await.unwrap();
    let deps = DependentCollector::new(&store)
        .collect(society, &tree)
        .await
        .unwrap();

    assert_eq!(deps.slots, vec![slot_id]);
}

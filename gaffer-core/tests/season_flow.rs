//! End-to-end flow over the public API: bootstrap, squad building,
//! aggregation, season advance, and the deletion guard.

use gaffer_core::{
    MemoryPort, Player, PositionGroup, SeasonStore, SlotKind, StorePhase, TransferCategory,
    aggregate_by_group,
};
use serde_json::json;

#[test]
fn empty_store_to_second_season() {
    let port = MemoryPort::new();
    let mut store = SeasonStore::new();
    store.bootstrap(&port);
    assert_eq!(store.phase(), StorePhase::Ready);
    assert_eq!(store.seasons().len(), 1);

    let first_id = store.active_id().to_string();
    let first_name = store.active_season().unwrap().name.clone();
    assert!(store.active_season().unwrap().roster.main.is_empty());

    let walker = Player::from_value(&json!({
        "firstName": "Kyle",
        "lastName": "Walker",
        "role": "RB",
        "age": 30,
        "overall": 84,
        "nationality": "ENG",
    }));
    let walker_id = store
        .active_season_mut()
        .unwrap()
        .add_player(SlotKind::Main, walker)
        .unwrap();
    store.commit(&port).unwrap();

    let season = store.active_season().unwrap();
    let report = aggregate_by_group(season.roster.main.players());
    let defenders = &report[&PositionGroup::Defenders];
    assert_eq!(defenders.players, 1);
    assert!((defenders.overall - 84.0).abs() < f64::EPSILON);
    assert_eq!(defenders.nationality.value, "ENG");
    assert_eq!(defenders.nationality.count, 1);

    let next_id = store.advance_season(&first_id).unwrap();
    let next = store.season(&next_id).unwrap();
    assert_eq!(next.name, format!("{first_name} (2)"));
    assert_eq!(next.roster.main.get(&walker_id).unwrap().age, 31);
    // the source season is untouched by the advance
    assert_eq!(
        store
            .season(&first_id)
            .unwrap()
            .roster
            .main
            .get(&walker_id)
            .unwrap()
            .age,
        30
    );
}

#[test]
fn transfer_actions_survive_a_commit_reload_cycle() {
    let port = MemoryPort::new();
    let mut store = SeasonStore::new();
    store.bootstrap(&port);

    let season = store.active_season_mut().unwrap();
    let veteran = Player::from_value(&json!({
        "id": "vet", "firstName": "Old", "lastName": "Guard", "role": "CB", "age": 35,
    }));
    season.add_player(SlotKind::Main, veteran).unwrap();
    season
        .add_to_category("vet", TransferCategory::Retired)
        .unwrap();
    store.commit(&port).unwrap();

    let mut reloaded = SeasonStore::new();
    reloaded.bootstrap(&port);
    let season = reloaded.active_season().unwrap();
    assert!(season.find_player("vet").is_none());
    assert!(season.transfers.contains(TransferCategory::Retired, "vet"));
}

#[test]
fn deletion_guard_holds_through_the_store_api() {
    let mut store = SeasonStore::new();
    store.bootstrap(&MemoryPort::new());
    let only = store.active_id().to_string();
    assert!(store.delete_season(&only).is_err());
    assert_eq!(store.seasons().len(), 1);
    assert_eq!(store.active_id(), only);
}

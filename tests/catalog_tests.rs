// End-to-end behavior against the on-disk backends

use gamevault::{
    Backend, Catalog, CatalogError, DEFAULT_NAMESPACE, GameForm, JsonFileBackend, Platform, SqliteBackend, Status,
    Store,
};
use std::fs;
use tempfile::TempDir;

fn portal() -> GameForm {
    GameForm {
        title: "Portal".to_string(),
        platform: "PC".to_string(),
        genre: "Puzzle".to_string(),
        release_year: 2007,
        developer: "Valve".to_string(),
        status: Some("Completed".to_string()),
        ..Default::default()
    }
}

fn json_store(temp: &TempDir) -> Store<JsonFileBackend> {
    Store::new(JsonFileBackend::open(temp.path(), DEFAULT_NAMESPACE).unwrap())
}

#[test]
fn test_portal_scenario_on_json_file() {
    let temp = TempDir::new().unwrap();
    let mut catalog = Catalog::open(json_store(&temp));

    let portal = catalog.add(&portal()).unwrap();

    // A fresh store sees what the first one wrote
    let store = json_store(&temp);
    assert_eq!(store.filter_by_status(Status::Completed), vec![portal.clone()]);
    assert!(store.filter_by_status(Status::New).is_empty());
    assert_eq!(store.filter_by_platform(Platform::Pc), vec![portal]);
}

#[test]
fn test_file_contents_use_wire_names() {
    let temp = TempDir::new().unwrap();
    let mut catalog = Catalog::open(json_store(&temp));
    let mut form = portal();
    form.rating = Some(9);
    catalog.add(&form).unwrap();

    let raw = fs::read_to_string(temp.path().join("gamevault-games.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let game = &value[0];
    assert_eq!(game["releaseYear"], 2007);
    assert_eq!(game["rating"], 9);
    assert!(game["id"].as_str().unwrap().starts_with("game-"));
    assert!(game["dateAdded"].as_str().unwrap().ends_with('Z'));
    assert!(game.get("notes").is_none());
}

#[test]
fn test_corrupt_file_loads_empty_and_recovers() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("gamevault-games.json"), "[{\"id\": truncated").unwrap();

    let mut catalog = Catalog::open(json_store(&temp));
    assert!(catalog.games().is_empty());

    catalog.add(&portal()).unwrap();
    assert_eq!(json_store(&temp).load().len(), 1);
}

#[test]
fn test_refresh_picks_up_other_writer() {
    let temp = TempDir::new().unwrap();
    let mut viewer = Catalog::open(json_store(&temp));
    assert!(viewer.games().is_empty());

    let mut writer = Catalog::open(json_store(&temp));
    let game = writer.add(&portal()).unwrap();

    assert!(viewer.refresh_if_changed());
    assert_eq!(viewer.games(), &[game]);
}

fn sqlite_store(temp: &TempDir) -> Store<SqliteBackend> {
    Store::new(SqliteBackend::open(temp.path(), DEFAULT_NAMESPACE).unwrap())
}

fn titled(title: String) -> GameForm {
    GameForm { title, ..portal() }
}

/// Every write from another catalog is visible to a viewer polling between writes
fn assert_viewer_sees_every_write<B: Backend>(open: impl Fn() -> Store<B>) {
    let mut writer = Catalog::open(open());
    writer.add(&portal()).unwrap();

    let mut viewer = Catalog::open(open());
    assert_eq!(viewer.games().len(), 1);

    for i in 0..100 {
        writer.add(&titled(format!("Portal {i}"))).unwrap();
        assert!(viewer.refresh_if_changed(), "write {i} went unnoticed");
        assert_eq!(viewer.games(), writer.games());
    }
    assert!(!viewer.refresh_if_changed());
}

/// A local mutation right after another writer's save keeps that writer's record
fn assert_local_write_keeps_external_record<B: Backend>(open: impl Fn() -> Store<B>) {
    let mut viewer = Catalog::open(open());
    let first = viewer.add(&portal()).unwrap();

    let mut writer = Catalog::open(open());
    let external = writer.add(&titled("Half-Life".to_string())).unwrap();

    let added = viewer.add(&titled("Portal 2".to_string())).unwrap();
    assert_eq!(viewer.games(), &[first.clone(), external.clone(), added.clone()]);
    assert!(!viewer.refresh_if_changed());

    let later = writer.add(&titled("Half-Life 2".to_string())).unwrap();
    let edited = viewer.edit(&first.id, &titled("Portal: Still Alive".to_string())).unwrap();
    assert_eq!(viewer.games(), &[edited, external, added, later]);
    assert_eq!(viewer.games(), open().load().as_slice());
}

#[test]
fn test_json_repeated_writes_are_each_detected() {
    let temp = TempDir::new().unwrap();
    assert_viewer_sees_every_write(|| json_store(&temp));
}

#[test]
fn test_sqlite_repeated_writes_are_each_detected() {
    let temp = TempDir::new().unwrap();
    assert_viewer_sees_every_write(|| sqlite_store(&temp));
}

#[test]
fn test_json_local_write_after_external_write() {
    let temp = TempDir::new().unwrap();
    assert_local_write_keeps_external_record(|| json_store(&temp));
}

#[test]
fn test_sqlite_local_write_after_external_write() {
    let temp = TempDir::new().unwrap();
    assert_local_write_keeps_external_record(|| sqlite_store(&temp));
}

#[test]
fn test_sqlite_catalog_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let id = {
        let mut catalog = Catalog::open(sqlite_store(&temp));
        let game = catalog.add(&portal()).unwrap();

        let mut edit = portal();
        edit.status = Some("On Hold".to_string());
        edit.completion_percentage = Some(45.0);
        catalog.edit(&game.id, &edit).unwrap();
        game.id
    };

    let game = sqlite_store(&temp).get_one(&id).unwrap();
    assert_eq!(game.status, Status::OnHold);
    assert_eq!(game.completion_percentage, Some(45.0));
}

#[test]
fn test_crud_round_trip() {
    let temp = TempDir::new().unwrap();
    let mut catalog = Catalog::open(json_store(&temp));

    let a = catalog.add(&portal()).unwrap();
    let mut second = portal();
    second.title = "Portal 2".to_string();
    second.release_year = 2011;
    let b = catalog.add(&second).unwrap();
    assert_ne!(a.id, b.id);

    let mut renamed = portal();
    renamed.title = "Portal: Still Alive".to_string();
    let updated = catalog.edit(&a.id, &renamed).unwrap();
    assert_eq!(updated.id, a.id);
    assert_eq!(updated.date_added, a.date_added);

    assert!(catalog.remove(&b.id).unwrap());
    let store = json_store(&temp);
    assert_eq!(store.load(), vec![updated]);

    let missing = catalog.edit(&b.id, &portal()).unwrap_err();
    assert!(matches!(missing, CatalogError::NotFound(_)));
    assert!(!catalog.remove(&b.id).unwrap());
}

#[test]
fn test_validation_failure_leaves_file_untouched() {
    let temp = TempDir::new().unwrap();
    let mut catalog = Catalog::open(json_store(&temp));

    let mut bad = portal();
    bad.release_year = 1969;
    let err = catalog.add(&bad).unwrap_err();

    match err {
        CatalogError::Validation(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors.get("releaseYear").is_some());
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!temp.path().join("gamevault-games.json").exists());
}

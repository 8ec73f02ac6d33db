use relane_core::db::{open_db, open_db_in_memory};
use relane_core::{
    Asset, BackupError, BackupRepository, Container, Item, ItemKind, MemoryBackupRepository,
    MigrationOptions, MigrationService, SqliteBackupRepository, BACKUP_RETENTION_LIMIT,
    LANE_MIGRATION_MARKER,
};
use rusqlite::Connection;
use uuid::Uuid;

#[test]
fn migrate_then_rollback_restores_the_pre_migration_container() {
    let mut service = MigrationService::with_default_classifier(MemoryBackupRepository::new());
    let mut container = stacked_container();
    let pristine = container.clone();

    let result = service.migrate(&mut container, &[], &auto_resolve());
    assert!(result.success);
    assert!(container.version.contains(LANE_MIGRATION_MARKER));

    let migration_id = result.migration_id.expect("backup recorded");
    let restored = service.rollback(migration_id).unwrap();

    assert_eq!(restored, pristine);
    assert!(!restored.version.contains(LANE_MIGRATION_MARKER));
    assert!(restored.items.iter().all(|item| !item.is_migrated()));
}

#[test]
fn rollback_with_an_unknown_id_is_a_hard_error() {
    let service = MigrationService::with_default_classifier(MemoryBackupRepository::new());
    let missing = Uuid::new_v4();

    let err = service.rollback(missing).unwrap_err();
    assert!(matches!(err, BackupError::BackupNotFound(id) if id == missing));
}

#[test]
fn restored_containers_are_independent_copies() {
    let mut service = MigrationService::with_default_classifier(MemoryBackupRepository::new());
    let mut container = stacked_container();
    let pristine = container.clone();

    let result = service.migrate(&mut container, &[], &auto_resolve());
    let migration_id = result.migration_id.expect("backup recorded");

    let mut first = service.rollback(migration_id).unwrap();
    first.name = "locally edited".to_string();
    first.items.clear();

    let second = service.rollback(migration_id).unwrap();
    assert_eq!(second, pristine);
}

#[test]
fn migration_service_preserves_into_the_sqlite_store() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBackupRepository::try_new(&conn).unwrap();
    let mut service = MigrationService::with_default_classifier(repo);
    let mut container = stacked_container();
    let pristine = container.clone();

    let result = service.migrate(&mut container, &[], &auto_resolve());
    assert!(result.success);

    let entries = service.list_backups(container.id).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].container_id, container.id);

    let restored = service.rollback(result.migration_id.unwrap()).unwrap();
    assert_eq!(restored, pristine);
}

#[test]
fn sqlite_store_round_trips_snapshots_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("relane.db");
    let container = stacked_container();

    let migration_id = {
        let conn = open_db(&path).unwrap();
        let mut repo = SqliteBackupRepository::try_new(&conn).unwrap();
        repo.record_backup(&container).unwrap()
    };

    let conn = open_db(&path).unwrap();
    let repo = SqliteBackupRepository::try_new(&conn).unwrap();
    let restored = repo.load_snapshot(migration_id).unwrap();
    assert_eq!(restored, container);
}

#[test]
fn sqlite_listing_returns_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBackupRepository::try_new(&conn).unwrap();
    let container = stacked_container();

    let first = repo.record_backup(&container).unwrap();
    let second = repo.record_backup(&container).unwrap();
    let third = repo.record_backup(&container).unwrap();

    let ids: Vec<_> = repo
        .list_backups(container.id)
        .unwrap()
        .iter()
        .map(|entry| entry.migration_id)
        .collect();
    assert_eq!(ids, vec![third, second, first]);
}

#[test]
fn retention_cap_evicts_the_oldest_sqlite_entries() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBackupRepository::try_new(&conn).unwrap();
    let container = stacked_container();

    let mut recorded = Vec::new();
    for _ in 0..BACKUP_RETENTION_LIMIT + 3 {
        recorded.push(repo.record_backup(&container).unwrap());
    }

    let entries = repo.list_backups(container.id).unwrap();
    assert_eq!(entries.len(), BACKUP_RETENTION_LIMIT);

    // The first three records are the oldest and must be gone.
    let retained: Vec<_> = entries.iter().map(|entry| entry.migration_id).collect();
    for evicted in &recorded[..3] {
        assert!(!retained.contains(evicted));
    }
    assert!(retained.contains(recorded.last().unwrap()));
}

#[test]
fn retention_is_tracked_per_container() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBackupRepository::try_new(&conn).unwrap();
    let busy = stacked_container();
    let quiet = Container::new("rarely migrated");

    let quiet_id = repo.record_backup(&quiet).unwrap();
    for _ in 0..BACKUP_RETENTION_LIMIT + 2 {
        repo.record_backup(&busy).unwrap();
    }

    assert_eq!(repo.list_backups(busy.id).unwrap().len(), BACKUP_RETENTION_LIMIT);
    let quiet_entries = repo.list_backups(quiet.id).unwrap();
    assert_eq!(quiet_entries.len(), 1);
    assert_eq!(quiet_entries[0].migration_id, quiet_id);
}

#[test]
fn cleanup_and_clear_all_trim_the_sqlite_store() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBackupRepository::try_new(&conn).unwrap();
    let container = stacked_container();
    for _ in 0..5 {
        repo.record_backup(&container).unwrap();
    }

    let evicted = repo.cleanup(container.id, 2).unwrap();
    assert_eq!(evicted, 3);
    assert_eq!(repo.list_backups(container.id).unwrap().len(), 2);

    repo.clear_all().unwrap();
    assert!(repo.list_backups(container.id).unwrap().is_empty());
}

#[test]
fn try_new_rejects_an_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let err = SqliteBackupRepository::try_new(&conn).unwrap_err();
    assert!(matches!(
        err,
        BackupError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
}

/// Builds the classic un-reconciled project: code, screen footage, and
/// voiceover all stacked on slot 0, each backed by a matching asset.
fn stacked_container() -> Container {
    let mut container = Container::new("rust course intro");
    for (kind, name) in [
        (ItemKind::Code, "main.rs"),
        (ItemKind::Video, "screen capture.mp4"),
        (ItemKind::Audio, "voiceover.wav"),
    ] {
        let asset = Asset::new(kind, name);
        let mut item = Item::new(kind, 0);
        item.asset_id = Some(asset.id);
        container.assets.push(asset);
        container.items.push(item);
    }
    container
}

fn auto_resolve() -> MigrationOptions {
    MigrationOptions {
        auto_resolve_conflicts: true,
        preserve_original: true,
    }
}

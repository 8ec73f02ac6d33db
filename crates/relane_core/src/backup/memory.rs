//! In-memory backup store.
//!
//! # Responsibility
//! - Provide the default, process-local snapshot store for hosts that do
//!   not need backups to survive a restart.
//!
//! # Invariants
//! - Entries are insertion-ordered; eviction sorts by timestamp with the
//!   insertion sequence as the deterministic tiebreak.
//! - Snapshots enter and leave the store as deep copies.

use super::{
    BackupEntry, BackupError, BackupId, BackupRepository, BackupResult, BACKUP_RETENTION_LIMIT,
};
use crate::model::container::{epoch_ms_now, Container, ContainerId};
use std::collections::HashSet;
use uuid::Uuid;

struct StoredBackup {
    migration_id: BackupId,
    container_id: ContainerId,
    created_at_ms: i64,
    sequence: u64,
    snapshot: Container,
}

/// Vec-backed backup store.
#[derive(Default)]
pub struct MemoryBackupRepository {
    entries: Vec<StoredBackup>,
    next_sequence: u64,
}

impl MemoryBackupRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored backups across all containers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_beyond(&mut self, container_id: ContainerId, keep: usize) -> usize {
        let mut ranked: Vec<(i64, u64, BackupId)> = self
            .entries
            .iter()
            .filter(|entry| entry.container_id == container_id)
            .map(|entry| (entry.created_at_ms, entry.sequence, entry.migration_id))
            .collect();
        if ranked.len() <= keep {
            return 0;
        }

        // Newest first; tuple order makes the sequence the tiebreak.
        ranked.sort_by(|a, b| b.cmp(a));
        let retained: HashSet<BackupId> = ranked
            .iter()
            .take(keep)
            .map(|(_, _, migration_id)| *migration_id)
            .collect();

        let before = self.entries.len();
        self.entries.retain(|entry| {
            entry.container_id != container_id || retained.contains(&entry.migration_id)
        });
        before - self.entries.len()
    }
}

impl BackupRepository for MemoryBackupRepository {
    fn record_backup(&mut self, container: &Container) -> BackupResult<BackupId> {
        let migration_id = Uuid::new_v4();
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.entries.push(StoredBackup {
            migration_id,
            container_id: container.id,
            created_at_ms: epoch_ms_now(),
            sequence,
            snapshot: container.clone(),
        });
        self.evict_beyond(container.id, BACKUP_RETENTION_LIMIT);

        Ok(migration_id)
    }

    fn load_snapshot(&self, migration_id: BackupId) -> BackupResult<Container> {
        self.entries
            .iter()
            .find(|entry| entry.migration_id == migration_id)
            .map(|entry| entry.snapshot.clone())
            .ok_or(BackupError::BackupNotFound(migration_id))
    }

    fn list_backups(&self, container_id: ContainerId) -> BackupResult<Vec<BackupEntry>> {
        let mut stored: Vec<&StoredBackup> = self
            .entries
            .iter()
            .filter(|entry| entry.container_id == container_id)
            .collect();
        stored.sort_by(|a, b| {
            (b.created_at_ms, b.sequence).cmp(&(a.created_at_ms, a.sequence))
        });

        Ok(stored
            .into_iter()
            .map(|entry| BackupEntry {
                migration_id: entry.migration_id,
                container_id: entry.container_id,
                created_at_ms: entry.created_at_ms,
            })
            .collect())
    }

    fn cleanup(&mut self, container_id: ContainerId, keep: usize) -> BackupResult<usize> {
        Ok(self.evict_beyond(container_id, keep))
    }

    fn clear_all(&mut self) -> BackupResult<()> {
        self.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryBackupRepository;
    use crate::backup::{BackupError, BackupRepository, BACKUP_RETENTION_LIMIT};
    use crate::model::container::Container;
    use crate::model::item::{Item, ItemKind};
    use uuid::Uuid;

    #[test]
    fn record_and_load_round_trips_a_deep_copy() {
        let mut repo = MemoryBackupRepository::new();
        let mut container = Container::new("snapshot me");
        container.items.push(Item::new(ItemKind::Code, 0));

        let migration_id = repo.record_backup(&container).unwrap();

        // Mutating the live container must not reach the stored snapshot.
        container.items[0].slot = 3;
        container.name.push_str(" edited");

        let restored = repo.load_snapshot(migration_id).unwrap();
        assert_eq!(restored.name, "snapshot me");
        assert_eq!(restored.items[0].slot, 0);
    }

    #[test]
    fn restored_copies_are_independent_of_each_other() {
        let mut repo = MemoryBackupRepository::new();
        let mut container = Container::new("double restore");
        container.items.push(Item::new(ItemKind::Audio, 2));
        let migration_id = repo.record_backup(&container).unwrap();

        let mut first = repo.load_snapshot(migration_id).unwrap();
        first.items[0].slot = 9;

        let second = repo.load_snapshot(migration_id).unwrap();
        assert_eq!(second.items[0].slot, 2);
    }

    #[test]
    fn unknown_migration_id_is_a_hard_error() {
        let repo = MemoryBackupRepository::new();
        let missing = Uuid::new_v4();

        let err = repo.load_snapshot(missing).unwrap_err();
        assert!(matches!(err, BackupError::BackupNotFound(id) if id == missing));
    }

    #[test]
    fn retention_cap_keeps_the_newest_entries() {
        let mut repo = MemoryBackupRepository::new();
        let container = Container::new("retention");

        let mut ids = Vec::new();
        for _ in 0..BACKUP_RETENTION_LIMIT + 3 {
            ids.push(repo.record_backup(&container).unwrap());
        }

        let listed = repo.list_backups(container.id).unwrap();
        assert_eq!(listed.len(), BACKUP_RETENTION_LIMIT);

        // The three oldest are gone, everything newer survives.
        for evicted in &ids[..3] {
            assert!(matches!(
                repo.load_snapshot(*evicted),
                Err(BackupError::BackupNotFound(_))
            ));
        }
        for retained in &ids[3..] {
            assert!(repo.load_snapshot(*retained).is_ok());
        }
    }

    #[test]
    fn retention_is_tracked_per_container() {
        let mut repo = MemoryBackupRepository::new();
        let container_a = Container::new("a");
        let container_b = Container::new("b");

        for _ in 0..BACKUP_RETENTION_LIMIT {
            repo.record_backup(&container_a).unwrap();
        }
        repo.record_backup(&container_b).unwrap();
        repo.record_backup(&container_a).unwrap();

        assert_eq!(repo.list_backups(container_a.id).unwrap().len(), 10);
        assert_eq!(repo.list_backups(container_b.id).unwrap().len(), 1);
    }

    #[test]
    fn listing_is_newest_first() {
        let mut repo = MemoryBackupRepository::new();
        let container = Container::new("ordering");

        let first = repo.record_backup(&container).unwrap();
        let second = repo.record_backup(&container).unwrap();
        let third = repo.record_backup(&container).unwrap();

        let listed = repo.list_backups(container.id).unwrap();
        let ids: Vec<_> = listed.iter().map(|entry| entry.migration_id).collect();
        assert_eq!(ids, vec![third, second, first]);
    }

    #[test]
    fn cleanup_trims_to_the_requested_count() {
        let mut repo = MemoryBackupRepository::new();
        let container = Container::new("manual trim");

        let mut ids = Vec::new();
        for _ in 0..5 {
            ids.push(repo.record_backup(&container).unwrap());
        }

        let evicted = repo.cleanup(container.id, 2).unwrap();
        assert_eq!(evicted, 3);

        let listed = repo.list_backups(container.id).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].migration_id, ids[4]);
        assert_eq!(listed[1].migration_id, ids[3]);
    }

    #[test]
    fn clear_all_empties_the_store() {
        let mut repo = MemoryBackupRepository::new();
        repo.record_backup(&Container::new("a")).unwrap();
        repo.record_backup(&Container::new("b")).unwrap();

        repo.clear_all().unwrap();
        assert!(repo.is_empty());
    }
}

//! Backup retention and rollback contracts.
//!
//! # Responsibility
//! - Define the snapshot store interface the migration service depends on.
//! - Keep the retention and rollback contract independent of the storage
//!   medium.
//!
//! # Invariants
//! - Backups for one container never exceed the retention cap; the oldest
//!   entries are evicted first, by timestamp then insertion order.
//! - Restored containers are fresh deep copies, never aliases into the
//!   store.
//! - An unknown migration id is a hard error, not a soft failure.

use crate::db::DbError;
use crate::model::container::{Container, ContainerId};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryBackupRepository;
pub use sqlite::SqliteBackupRepository;

/// Maximum retained backups per container; older entries are evicted.
pub const BACKUP_RETENTION_LIMIT: usize = 10;

/// Stable identifier handed out for one recorded backup.
pub type BackupId = Uuid;

pub type BackupResult<T> = Result<T, BackupError>;

/// Errors from backup persistence and rollback operations.
#[derive(Debug)]
pub enum BackupError {
    /// No backup is stored under the given migration id.
    BackupNotFound(BackupId),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Stored snapshot cannot be encoded or decoded.
    InvalidSnapshot(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BackupNotFound(id) => write!(f, "backup not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidSnapshot(message) => write!(f, "invalid backup snapshot: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "backup repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "backup repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "backup repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for BackupError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for BackupError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Listing row for one stored backup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackupEntry {
    pub migration_id: BackupId,
    pub container_id: ContainerId,
    /// Epoch ms timestamp the backup was recorded at.
    pub created_at_ms: i64,
}

/// Snapshot store interface consumed by the migration service.
///
/// The store is owned by the caller and injected; there is no process-wide
/// state. At most one in-flight migration per container is assumed, so the
/// trait takes `&mut self` on writes and leaves serialization to the caller.
pub trait BackupRepository {
    /// Deep-copies the container into the store and returns the fresh
    /// migration id. Evicts that container's entries beyond the retention
    /// cap, oldest first.
    fn record_backup(&mut self, container: &Container) -> BackupResult<BackupId>;

    /// Returns a fresh deep copy of the stored snapshot.
    ///
    /// # Errors
    /// - `BackupError::BackupNotFound` for an unknown migration id.
    fn load_snapshot(&self, migration_id: BackupId) -> BackupResult<Container>;

    /// Lists stored backups for one container, newest first.
    fn list_backups(&self, container_id: ContainerId) -> BackupResult<Vec<BackupEntry>>;

    /// Manually trims one container's backups to `keep` entries, newest
    /// retained. Returns how many entries were evicted.
    fn cleanup(&mut self, container_id: ContainerId, keep: usize) -> BackupResult<usize>;

    /// Clears every stored backup. Test isolation/reset only.
    fn clear_all(&mut self) -> BackupResult<()>;
}

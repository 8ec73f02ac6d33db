//! SQLite-backed backup store.
//!
//! # Responsibility
//! - Persist container snapshots as JSON rows so backups survive restarts.
//! - Keep SQL details and eviction ordering inside the repository boundary.
//!
//! # Invariants
//! - Eviction order is `created_at_ms DESC, sequence DESC`; the insert
//!   sequence breaks same-millisecond ties.
//! - A row whose snapshot fails to decode surfaces as `InvalidSnapshot`,
//!   never as a silently skipped entry.

use super::{
    BackupEntry, BackupError, BackupId, BackupRepository, BackupResult, BACKUP_RETENTION_LIMIT,
};
use crate::db::migrations::latest_version;
use crate::model::container::{Container, ContainerId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

/// SQLite-backed backup repository.
#[derive(Debug)]
pub struct SqliteBackupRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBackupRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> BackupResult<Self> {
        ensure_backup_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl BackupRepository for SqliteBackupRepository<'_> {
    fn record_backup(&mut self, container: &Container) -> BackupResult<BackupId> {
        let migration_id = Uuid::new_v4();
        let snapshot = encode_snapshot(container)?;
        self.conn.execute(
            "INSERT INTO backups (
                migration_id,
                container_id,
                snapshot
            ) VALUES (?1, ?2, ?3);",
            params![
                migration_id.to_string(),
                container.id.to_string(),
                snapshot,
            ],
        )?;
        evict_beyond(self.conn, container.id, BACKUP_RETENTION_LIMIT)?;
        Ok(migration_id)
    }

    fn load_snapshot(&self, migration_id: BackupId) -> BackupResult<Container> {
        let snapshot: Option<String> = self
            .conn
            .query_row(
                "SELECT snapshot
                 FROM backups
                 WHERE migration_id = ?1;",
                [migration_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        match snapshot {
            None => Err(BackupError::BackupNotFound(migration_id)),
            Some(raw) => decode_snapshot(&raw),
        }
    }

    fn list_backups(&self, container_id: ContainerId) -> BackupResult<Vec<BackupEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                migration_id,
                container_id,
                created_at_ms
             FROM backups
             WHERE container_id = ?1
             ORDER BY created_at_ms DESC, sequence DESC;",
        )?;
        let mut rows = stmt.query([container_id.to_string()])?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_backup_entry_row(row)?);
        }
        Ok(entries)
    }

    fn cleanup(&mut self, container_id: ContainerId, keep: usize) -> BackupResult<usize> {
        evict_beyond(self.conn, container_id, keep)
    }

    fn clear_all(&mut self) -> BackupResult<()> {
        self.conn.execute("DELETE FROM backups;", [])?;
        Ok(())
    }
}

fn evict_beyond(conn: &Connection, container_id: ContainerId, keep: usize) -> BackupResult<usize> {
    let evicted = conn.execute(
        "DELETE FROM backups
         WHERE container_id = ?1
           AND sequence NOT IN (
             SELECT sequence
             FROM backups
             WHERE container_id = ?1
             ORDER BY created_at_ms DESC, sequence DESC
             LIMIT ?2
           );",
        params![container_id.to_string(), keep as i64],
    )?;
    Ok(evicted)
}

fn encode_snapshot(container: &Container) -> BackupResult<String> {
    serde_json::to_string(container)
        .map_err(|err| BackupError::InvalidSnapshot(format!("snapshot encode failed: {err}")))
}

fn decode_snapshot(raw: &str) -> BackupResult<Container> {
    serde_json::from_str(raw)
        .map_err(|err| BackupError::InvalidSnapshot(format!("snapshot decode failed: {err}")))
}

fn parse_backup_entry_row(row: &Row<'_>) -> BackupResult<BackupEntry> {
    let migration_id_text: String = row.get("migration_id")?;
    let container_id_text: String = row.get("container_id")?;
    Ok(BackupEntry {
        migration_id: parse_uuid(&migration_id_text, "backups.migration_id")?,
        container_id: parse_uuid(&container_id_text, "backups.container_id")?,
        created_at_ms: row.get("created_at_ms")?,
    })
}

fn parse_uuid(value: &str, column: &'static str) -> BackupResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| BackupError::InvalidSnapshot(format!("invalid uuid `{value}` in {column}")))
}

fn ensure_backup_connection_ready(conn: &Connection) -> BackupResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(BackupError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "backups")? {
        return Err(BackupError::MissingRequiredTable("backups"));
    }

    for column in [
        "sequence",
        "migration_id",
        "container_id",
        "created_at_ms",
        "snapshot",
    ] {
        if !table_has_column(conn, "backups", column)? {
            return Err(BackupError::MissingRequiredColumn {
                table: "backups",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> BackupResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> BackupResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

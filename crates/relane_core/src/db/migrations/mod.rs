//! Schema migration registry for the backup database.
//!
//! # Responsibility
//! - Hold the ordered list of schema migrations compiled into this build.
//! - Bring a connection from its recorded `PRAGMA user_version` up to the
//!   latest registered version, atomically.
//!
//! # Invariants
//! - Registry versions are strictly increasing.
//! - A database ahead of this build is refused, never downgraded.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

struct Migration {
    version: u32,
    sql: &'static str,
}

const REGISTRY: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// Latest schema version this build knows how to produce.
pub fn latest_version() -> u32 {
    REGISTRY.last().map_or(0, |migration| migration.version)
}

/// Applies every migration newer than the connection's recorded version.
///
/// All pending steps run inside one transaction; the recorded version only
/// moves when the whole batch commits.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let installed = installed_version(conn)?;
    let latest = latest_version();

    if installed > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: installed,
            latest_supported: latest,
        });
    }
    if installed == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in REGISTRY.iter().filter(|m| m.version > installed) {
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
    }
    tx.commit()?;

    Ok(())
}

fn installed_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

//! Schema migrations for the task database.
//!
//! # Responsibility
//! - Keep the ordered list of schema steps.
//! - Bring a connection up to the newest schema in one transaction.
//!
//! # Invariants
//! - Step versions start at 1 and increase by one.
//! - `PRAGMA user_version` always equals the last applied step.
//! - A database written by a newer build is refused, never downgraded.

use crate::db::{DbError, DbResult};
use log::{debug, error, info};
use rusqlite::Connection;

/// Schema steps; index `i` holds version `i + 1`.
const SCHEMA_STEPS: &[&str] = &[include_str!("0001_init.sql")];

/// Newest schema version this build can write.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.len() as u32
}

/// Runs every step newer than the database's `user_version`.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    let to = latest_version();
    if from > to {
        return Err(DbError::UnsupportedSchemaVersion {
            found: from,
            supported: to,
        });
    }

    let pending = &SCHEMA_STEPS[from as usize..];
    if pending.is_empty() {
        debug!("event=db_migrate module=db status=up_to_date version={from}");
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (offset, sql) in pending.iter().enumerate() {
        let version = from + offset as u32 + 1;
        tx.execute_batch(sql)
            .and_then(|()| tx.pragma_update(None, "user_version", version))
            .map_err(|source| {
                error!("event=db_migrate module=db status=error version={version}");
                DbError::Migration { version, source }
            })?;
        debug!("event=db_migrate module=db status=applied version={version}");
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from={from} to={to}");
    Ok(())
}

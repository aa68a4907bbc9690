//! Embedded schema steps for the budget store.
//!
//! Each step is an SQL file compiled into the binary and identified by the
//! `user_version` it leaves behind. Opening an older store runs the missing
//! steps inside one transaction, so a half-upgraded file is never visible.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    sql: &'static str,
}

/// Ordered by `version`; append only.
const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// Schema version produced by the newest embedded step.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings `conn` up to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is ahead of this binary.
/// - Any SQLite failure; the store is then left at its previous version.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = stored_version(conn)?;
    let latest = latest_version();
    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let pending: Vec<&SchemaStep> = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > from_version)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} steps={}",
        from_version,
        latest,
        pending.len()
    );
    Ok(())
}

fn stored_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}

//! Connection bootstrap.
//!
//! # Invariants
//! - Returned connections are fully migrated.
//! - A second host holding the file waits on the lock instead of failing.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const IN_MEMORY: &str = ":memory:";

/// Opens (creating when missing) the settings database at `path`.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    prepare(&path.display().to_string(), Connection::open(path))
}

/// Opens a private in-memory settings database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    prepare(IN_MEMORY, Connection::open_in_memory())
}

fn prepare(location: &str, opened: rusqlite::Result<Connection>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = opened
        .map_err(|source| DbError::Open {
            location: location.to_string(),
            source,
        })
        .and_then(|mut conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            apply_migrations(&mut conn)?;
            Ok(conn)
        });

    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event=db_open module=db status=ok location={location} duration_ms={duration_ms}"),
        Err(err) => error!(
            "event=db_open module=db status=error location={location} duration_ms={duration_ms} error={err}"
        ),
    }
    result
}

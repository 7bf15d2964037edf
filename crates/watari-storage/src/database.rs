// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use tracing::debug;

use watari_core::WatariError;

use crate::migrations;

/// Handle to an open SQLite database with migrations applied.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (or creates) the database at `path` and runs pending migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, WatariError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| WatariError::Storage {
                source: Box::new(e),
            })?;

        let pragmas = if wal_mode {
            "PRAGMA journal_mode = WAL;\
             PRAGMA synchronous = NORMAL;\
             PRAGMA foreign_keys = ON;\
             PRAGMA busy_timeout = 5000;"
        } else {
            "PRAGMA foreign_keys = ON;\
             PRAGMA busy_timeout = 5000;"
        };
        conn.call(move |conn| {
            conn.execute_batch(pragmas)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        // Run refinery migrations; the refinery result rides out of the
        // closure as a value so its error type survives the call boundary.
        let report = conn
            .call(|conn| Ok(migrations::run_migrations(conn)))
            .await
            .map_err(map_tr_err)?;
        report?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection for query modules.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoints the WAL and flushes pending writes.
    pub async fn close(&self) -> Result<(), WatariError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Bridge tokio-rusqlite errors into the storage error variant.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> WatariError {
    WatariError::Storage {
        source: Box::new(e),
    }
}

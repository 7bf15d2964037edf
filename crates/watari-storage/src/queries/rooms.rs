// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Room bookkeeping.

use rusqlite::params;

use watari_core::WatariError;

use crate::database::Database;

/// Record that a room was seen; the first sighting wins.
pub async fn touch_room(
    db: &Database,
    room_id: &str,
    seen_at: &str,
) -> Result<(), WatariError> {
    let room_id = room_id.to_string();
    let seen_at = seen_at.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO rooms (id, first_seen_at) VALUES (?1, ?2)",
                params![room_id, seen_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All known room ids.
pub async fn list_rooms(db: &Database) -> Result<Vec<String>, WatariError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare("SELECT id FROM rooms ORDER BY rowid ASC")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            let mut rooms = Vec::new();
            for row in rows {
                rooms.push(row?);
            }
            Ok(rooms)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

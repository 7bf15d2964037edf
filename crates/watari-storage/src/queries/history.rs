// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user history payloads (opaque JSON blobs keyed by user id).

use rusqlite::params;

use watari_core::WatariError;

use crate::database::Database;

/// Fetch the history payload for a user.
pub async fn get_payload(
    db: &Database,
    user_id: &str,
) -> Result<Option<String>, WatariError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare("SELECT payload FROM history WHERE user_id = ?1")?;
            let mut rows = stmt.query_map(params![user_id], |row| row.get(0))?;
            Ok(rows.next().transpose()?)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Replace the history payload for a user.
pub async fn put_payload(
    db: &Database,
    user_id: &str,
    payload: &str,
) -> Result<(), WatariError> {
    let user_id = user_id.to_string();
    let payload = payload.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO history (user_id, payload) VALUES (?1, ?2)
                 ON CONFLICT (user_id) DO UPDATE SET payload = excluded.payload",
                params![user_id, payload],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn put_replaces_whole_payload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();

        assert!(get_payload(&db, "U1").await.unwrap().is_none());

        put_payload(&db, "U1", r#"[{"a":1}]"#).await.unwrap();
        put_payload(&db, "U1", r#"[{"b":2}]"#).await.unwrap();

        assert_eq!(
            get_payload(&db, "U1").await.unwrap().as_deref(),
            Some(r#"[{"b":2}]"#)
        );
        db.close().await.unwrap();
    }
}

// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User display-name operations.

use rusqlite::params;

use watari_core::WatariError;

use crate::database::Database;

/// Create or update a user's display name.
pub async fn upsert_user(
    db: &Database,
    user_id: &str,
    display_name: &str,
    updated_at: &str,
) -> Result<(), WatariError> {
    let user_id = user_id.to_string();
    let display_name = display_name.to_string();
    let updated_at = updated_at.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (id, display_name, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT (id)
                 DO UPDATE SET display_name = excluded.display_name,
                               updated_at = excluded.updated_at",
                params![user_id, display_name, updated_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Display name for a user id, if recorded.
pub async fn get_display_name(
    db: &Database,
    user_id: &str,
) -> Result<Option<String>, WatariError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare("SELECT display_name FROM users WHERE id = ?1")?;
            let mut rows = stmt.query_map(params![user_id], |row| row.get(0))?;
            Ok(rows.next().transpose()?)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn upsert_replaces_display_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();

        upsert_user(&db, "U1", "Yuki", "t1").await.unwrap();
        assert_eq!(
            get_display_name(&db, "U1").await.unwrap().as_deref(),
            Some("Yuki")
        );

        upsert_user(&db, "U1", "Kasia", "t2").await.unwrap();
        assert_eq!(
            get_display_name(&db, "U1").await.unwrap().as_deref(),
            Some("Kasia")
        );

        assert!(get_display_name(&db, "U2").await.unwrap().is_none());
        db.close().await.unwrap();
    }
}

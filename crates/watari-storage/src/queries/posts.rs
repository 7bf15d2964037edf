// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post CRUD operations.

use rusqlite::params;

use watari_core::types::PostRecord;
use watari_core::WatariError;

use crate::database::Database;

/// Insert a new post row.
pub async fn insert_post(db: &Database, post: &PostRecord) -> Result<(), WatariError> {
    let post = post.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO posts (id, user_id, room_id, message, translated, language, has_poll, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    post.id,
                    post.user_id,
                    post.room_id,
                    post.message,
                    post.translated,
                    post.language.to_string(),
                    post.has_poll,
                    post.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch a post by id.
pub async fn get_post(db: &Database, id: &str) -> Result<Option<PostRecord>, WatariError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, room_id, message, translated, language, has_poll, created_at
                 FROM posts WHERE id = ?1",
            )?;
            let mut rows = stmt.query_map(params![id], map_post_row)?;
            Ok(rows.next().transpose()?)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

fn map_post_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PostRecord> {
    let language: String = row.get(5)?;
    Ok(PostRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        room_id: row.get(2)?,
        message: row.get(3)?,
        translated: row.get(4)?,
        language: language.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?,
        has_poll: row.get(6)?,
        created_at: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use watari_core::LanguageTag;

    async fn open_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posts.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    fn make_post(id: &str, has_poll: bool) -> PostRecord {
        PostRecord {
            id: id.to_string(),
            user_id: "U1".to_string(),
            room_id: String::new(),
            message: "こんにちは".to_string(),
            translated: "Polish: Cześć\nEnglish: Hello".to_string(),
            language: LanguageTag::Ja,
            has_poll,
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_and_get_round_trips() {
        let (db, _dir) = open_db().await;
        let post = make_post("P1", false);
        insert_post(&db, &post).await.unwrap();

        let fetched = get_post(&db, "P1").await.unwrap().unwrap();
        assert_eq!(fetched, post);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_missing_post_is_none() {
        let (db, _dir) = open_db().await;
        assert!(get_post(&db, "nope").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let (db, _dir) = open_db().await;
        insert_post(&db, &make_post("P1", false)).await.unwrap();
        let result = insert_post(&db, &make_post("P1", true)).await;
        assert!(result.is_err(), "primary key violation should surface");
        db.close().await.unwrap();
    }
}

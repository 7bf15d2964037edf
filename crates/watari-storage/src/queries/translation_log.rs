// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation audit log (append-only).

use rusqlite::params;

use watari_core::types::TranslationLogRecord;
use watari_core::WatariError;

use crate::database::Database;

/// Append an audit record.
pub async fn append_entry(
    db: &Database,
    entry: &TranslationLogRecord,
) -> Result<(), WatariError> {
    let entry = entry.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO translation_log
                     (user_id, language, message, translation, prompt, history_count, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    entry.user_id,
                    entry.language.to_string(),
                    entry.message,
                    entry.translation,
                    entry.prompt,
                    entry.history_count as i64,
                    entry.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Audit records for a user, oldest first.
pub async fn entries_for_user(
    db: &Database,
    user_id: &str,
) -> Result<Vec<TranslationLogRecord>, WatariError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, language, message, translation, prompt, history_count, created_at
                 FROM translation_log WHERE user_id = ?1 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![user_id], |row| {
                let language: String = row.get(1)?;
                Ok(TranslationLogRecord {
                    user_id: row.get(0)?,
                    language: language.parse().map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            1,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?,
                    message: row.get(2)?,
                    translation: row.get(3)?,
                    prompt: row.get(4)?,
                    history_count: row.get::<_, i64>(5)? as usize,
                    created_at: row.get(6)?,
                })
            })?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use watari_core::LanguageTag;

    #[tokio::test]
    async fn append_and_read_back_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();

        for (i, msg) in ["first", "second"].iter().enumerate() {
            append_entry(
                &db,
                &TranslationLogRecord {
                    user_id: "U1".into(),
                    language: LanguageTag::En,
                    message: (*msg).into(),
                    translation: "訳".into(),
                    prompt: "prompt text".into(),
                    history_count: i,
                    created_at: format!("2026-01-01T00:00:0{i}+00:00"),
                },
            )
            .await
            .unwrap();
        }

        let entries = entries_for_user(&db, "U1").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[1].message, "second");
        assert_eq!(entries[1].history_count, 1);
        db.close().await.unwrap();
    }
}

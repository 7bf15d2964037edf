// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Poll answer operations with upsert semantics.

use rusqlite::params;

use watari_core::types::AnswerRecord;
use watari_core::WatariError;

use crate::database::Database;

/// Insert or replace the answer for `(post_id, user_id)`; latest wins.
pub async fn upsert_answer(db: &Database, answer: &AnswerRecord) -> Result<(), WatariError> {
    let answer = answer.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO answers (post_id, user_id, value, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (post_id, user_id)
                 DO UPDATE SET value = excluded.value, created_at = excluded.created_at",
                params![answer.post_id, answer.user_id, answer.value, answer.created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All answers for a post, in first-answer order.
pub async fn answers_for_post(
    db: &Database,
    post_id: &str,
) -> Result<Vec<AnswerRecord>, WatariError> {
    let post_id = post_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT post_id, user_id, value, created_at
                 FROM answers WHERE post_id = ?1
                 ORDER BY rowid ASC",
            )?;
            let rows = stmt.query_map(params![post_id], |row| {
                Ok(AnswerRecord {
                    post_id: row.get(0)?,
                    user_id: row.get(1)?,
                    value: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })?;
            let mut answers = Vec::new();
            for row in rows {
                answers.push(row?);
            }
            Ok(answers)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

//! Lock store over the `edit_locks` table

use super::SqliteStore;
use crate::errors::{corrupt_row, from_rusqlite};
use chrono::{DateTime, SecondsFormat, Utc};
use mdr_core::lock::{EditLock, LockStore};
use mdr_core::ops::StoreResult;
use rusqlite::{params, Connection, OptionalExtension, Row};

const COLUMNS: &str =
    "id, subject_uri, user_id, user_email, issued_at, refreshed_at, refresh_count";

type RawLock = (String, String, String, String, String, String, u32);

fn raw(row: &Row<'_>) -> rusqlite::Result<RawLock> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn timestamp(value: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| corrupt_row("edit_locks", format!("bad timestamp '{}': {}", value, e)))
}

fn to_lock(raw: RawLock) -> StoreResult<EditLock> {
    let (id, subject_uri, user_id, user_email, issued_at, refreshed_at, refresh_count) = raw;
    Ok(EditLock {
        id,
        subject_uri,
        user_id,
        user_email,
        issued_at: timestamp(&issued_at)?,
        refreshed_at: timestamp(&refreshed_at)?,
        refresh_count,
    })
}

fn rfc3339(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn find(conn: &Connection, subject_uri: &str) -> StoreResult<Option<EditLock>> {
    conn.query_row(
        &format!("SELECT {} FROM edit_locks WHERE subject_uri = ?", COLUMNS),
        [subject_uri],
        raw,
    )
    .optional()
    .map_err(from_rusqlite)?
    .map(to_lock)
    .transpose()
}

impl LockStore for SqliteStore {
    fn find_by_subject(&self, subject_uri: &str) -> StoreResult<Option<EditLock>> {
        let conn = self.conn()?;
        find(&conn, subject_uri)
    }

    fn compare_and_swap(&self, expected_id: Option<&str>, lock: &EditLock) -> StoreResult<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(from_rusqlite)?;
        let current: Option<String> = tx
            .query_row(
                "SELECT id FROM edit_locks WHERE subject_uri = ?",
                [&lock.subject_uri],
                |row| row.get(0),
            )
            .optional()
            .map_err(from_rusqlite)?;
        if current.as_deref() != expected_id {
            return Ok(false);
        }
        tx.execute(
            "DELETE FROM edit_locks WHERE subject_uri = ?",
            [&lock.subject_uri],
        )
        .map_err(from_rusqlite)?;
        tx.execute(
            &format!("INSERT INTO edit_locks ({}) VALUES (?, ?, ?, ?, ?, ?, ?)", COLUMNS),
            params![
                lock.id,
                lock.subject_uri,
                lock.user_id,
                lock.user_email,
                rfc3339(&lock.issued_at),
                rfc3339(&lock.refreshed_at),
                lock.refresh_count
            ],
        )
        .map_err(from_rusqlite)?;
        tx.commit().map_err(from_rusqlite)?;
        Ok(true)
    }

    fn save(&self, lock: &EditLock) -> StoreResult<bool> {
        let changed = self
            .conn()?
            .execute(
                "UPDATE edit_locks SET refreshed_at = ?, refresh_count = ?
                 WHERE id = ? AND subject_uri = ?",
                params![
                    rfc3339(&lock.refreshed_at),
                    lock.refresh_count,
                    lock.id,
                    lock.subject_uri
                ],
            )
            .map_err(from_rusqlite)?;
        Ok(changed == 1)
    }

    fn remove(&self, lock_id: &str) -> StoreResult<bool> {
        let changed = self
            .conn()?
            .execute("DELETE FROM edit_locks WHERE id = ?", [lock_id])
            .map_err(from_rusqlite)?;
        Ok(changed > 0)
    }

    fn list(&self) -> StoreResult<Vec<EditLock>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM edit_locks ORDER BY subject_uri",
                COLUMNS
            ))
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([], raw)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        rows.into_iter().map(to_lock).collect()
    }
}

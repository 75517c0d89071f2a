//! Audit sink over the `audit_trail` table

use super::SqliteStore;
use crate::errors::{corrupt_row, from_rusqlite};
use chrono::{DateTime, SecondsFormat, Utc};
use mdr_core::audit::{AuditEvent, AuditEventKind, AuditSink};
use mdr_core::ops::StoreResult;
use rusqlite::params;

impl AuditSink for SqliteStore {
    fn record(&self, event: &AuditEvent) -> StoreResult<()> {
        self.conn()?
            .execute(
                "INSERT INTO audit_trail
                 (kind, user_id, user_email, subject_uri, identifier, version, owner, message, recorded_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    event.kind.as_str(),
                    event.user_id,
                    event.user_email,
                    event.subject_uri,
                    event.identifier,
                    event.version,
                    event.owner,
                    event.message,
                    event.recorded_at.to_rfc3339_opts(SecondsFormat::Micros, true)
                ],
            )
            .map_err(from_rusqlite)?;
        Ok(())
    }
}

impl SqliteStore {
    /// Recorded events in insertion order, optionally for one subject
    pub fn audit_trail(&self, subject_uri: Option<&str>) -> StoreResult<Vec<AuditEvent>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT kind, user_id, user_email, subject_uri, identifier, version, owner,
                        message, recorded_at
                 FROM audit_trail
                 WHERE ?1 IS NULL OR subject_uri = ?1
                 ORDER BY id",
            )
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([subject_uri], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, u32>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?,
                    row.get::<_, String>(8)?,
                ))
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        rows.into_iter()
            .map(
                |(kind, user_id, user_email, subject_uri, identifier, version, owner, message, at)| {
                    Ok(AuditEvent {
                        kind: kind
                            .parse::<AuditEventKind>()
                            .map_err(|e| corrupt_row("audit_trail", e))?,
                        user_id,
                        user_email,
                        subject_uri,
                        identifier,
                        version,
                        owner,
                        message,
                        recorded_at: DateTime::parse_from_rfc3339(&at)
                            .map(|t| t.with_timezone(&Utc))
                            .map_err(|e| corrupt_row("audit_trail", e.to_string()))?,
                    })
                },
            )
            .collect()
    }
}

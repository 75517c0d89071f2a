//! Audit trail of lifecycle events
//!
//! Events are recorded only after the store mutation they describe has
//! succeeded. A sink failure never undoes that mutation.

use crate::model::{ItemSummary, User};
use crate::ops::StoreResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditEventKind {
    Create,
    Update,
    Delete,
}

impl AuditEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventKind::Create => "create",
            AuditEventKind::Update => "update",
            AuditEventKind::Delete => "delete",
        }
    }
}

impl fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AuditEventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(AuditEventKind::Create),
            "update" => Ok(AuditEventKind::Update),
            "delete" => Ok(AuditEventKind::Delete),
            other => Err(format!("unknown audit event kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub kind: AuditEventKind,
    pub user_id: String,
    pub user_email: String,
    pub subject_uri: String,
    pub identifier: String,
    pub version: u32,
    pub owner: String,
    pub message: String,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(
        kind: AuditEventKind,
        user: &User,
        item: &ItemSummary,
        message: impl Into<String>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            user_id: user.id.clone(),
            user_email: user.email.clone(),
            subject_uri: item.uri.to_string(),
            identifier: item.identifier.clone(),
            version: item.version,
            owner: item.owner.clone(),
            message: message.into(),
            recorded_at,
        }
    }
}

pub trait AuditSink: Send + Sync {
    fn record(&self, event: &AuditEvent) -> StoreResult<()>;
}

/// Writes each event as a structured log line
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) -> StoreResult<()> {
        info!(
            audit = event.kind.as_str(),
            user_id = %event.user_id,
            item_uri = %event.subject_uri,
            identifier = %event.identifier,
            version = event.version,
            audit_message = %event.message,
            "audit event"
        );
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.message).collect()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: &AuditEvent) -> StoreResult<()> {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemUri, RegistrationStatus};

    #[test]
    fn test_event_copies_item_summary() {
        let summary = ItemSummary {
            uri: ItemUri::new("http://www.assero.co.uk/MDRForms/ACME/V2", "F-ACME_DM101"),
            kind: "Form".to_string(),
            identifier: "DM101".to_string(),
            label: "Demographics".to_string(),
            version: 2,
            scope_id: "NS-ACME".to_string(),
            owner: "ACME".to_string(),
            status: RegistrationStatus::Incomplete,
        };
        let user = User::new("u1", "u1@example.com");
        let event = AuditEvent::new(AuditEventKind::Update, &user, &summary, "Form updated.", Utc::now());

        let sink = MemoryAuditSink::new();
        sink.record(&event).unwrap();
        assert_eq!(sink.messages(), vec!["Form updated.".to_string()]);
        assert_eq!(sink.events()[0].version, 2);
        assert_eq!("delete".parse::<AuditEventKind>(), Ok(AuditEventKind::Delete));
    }

    #[test]
    fn test_tracing_sink_logs_event() {
        let capture = crate::logging_facility::init_test_capture();
        let summary = ItemSummary {
            uri: ItemUri::new("http://www.assero.co.uk/MDRForms/ACME/V1", "F-ACME_TRACED"),
            kind: "Form".to_string(),
            identifier: "TRACED".to_string(),
            label: "Traced".to_string(),
            version: 1,
            scope_id: "NS-ACME".to_string(),
            owner: "ACME".to_string(),
            status: RegistrationStatus::Incomplete,
        };
        let user = User::new("u1", "u1@example.com");
        let event = AuditEvent::new(AuditEventKind::Delete, &user, &summary, "Form deleted.", Utc::now());

        TracingAuditSink.record(&event).unwrap();

        let logged = capture.events_with("identifier", "TRACED");
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].field("audit"), Some("delete"));
        assert_eq!(logged[0].field("audit_message"), Some("Form deleted."));
    }
}

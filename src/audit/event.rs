//! Audit event records and the event kind taxonomy

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Closed taxonomy of auditable occurrences.
///
/// Criticality is a property of the kind, not of individual events:
/// deletion requests, deletion completions, and trail clears always
/// escalate, everything else never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    // Data lifecycle
    DataCreated,
    DataAccessed,
    DataModified,
    DataDeleted,
    // Analytics
    AnalyticsAccessed,
    AnalyticsModified,
    // Application state
    StateChanged,
    SessionStarted,
    SessionEnded,
    // Security
    EncryptionKeyRotated,
    DataDeletionRequested,
    DataDeletionCompleted,
    AuditTrailCleared,
    // Compliance
    DataExport,
    PrivacySettingsChanged,
}

impl EventKind {
    /// Whether events of this kind escalate to error-severity sink output.
    pub fn is_critical(self) -> bool {
        matches!(
            self,
            EventKind::DataDeletionRequested
                | EventKind::DataDeletionCompleted
                | EventKind::AuditTrailCleared
        )
    }

    /// Stable identifier used in formatted sink lines.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::DataCreated => "data_created",
            EventKind::DataAccessed => "data_accessed",
            EventKind::DataModified => "data_modified",
            EventKind::DataDeleted => "data_deleted",
            EventKind::AnalyticsAccessed => "analytics_accessed",
            EventKind::AnalyticsModified => "analytics_modified",
            EventKind::StateChanged => "state_changed",
            EventKind::SessionStarted => "session_started",
            EventKind::SessionEnded => "session_ended",
            EventKind::EncryptionKeyRotated => "encryption_key_rotated",
            EventKind::DataDeletionRequested => "data_deletion_requested",
            EventKind::DataDeletionCompleted => "data_deletion_completed",
            EventKind::AuditTrailCleared => "audit_trail_cleared",
            EventKind::DataExport => "data_export",
            EventKind::PrivacySettingsChanged => "privacy_settings_changed",
        }
    }
}

/// CRUD operations against domain data, mapped onto the data event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOperation {
    Create,
    Read,
    Update,
    Delete,
}

impl DataOperation {
    pub fn event_kind(self) -> EventKind {
        match self {
            DataOperation::Create => EventKind::DataCreated,
            DataOperation::Read => EventKind::DataAccessed,
            DataOperation::Update => EventKind::DataModified,
            DataOperation::Delete => EventKind::DataDeleted,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DataOperation::Create => "create",
            DataOperation::Read => "read",
            DataOperation::Update => "update",
            DataOperation::Delete => "delete",
        }
    }
}

/// Loosely typed detail map attached to an audit event.
///
/// BTreeMap keeps sink output deterministic for external log tooling.
pub type EventDetails = BTreeMap<String, serde_json::Value>;

/// A single immutable entry in the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event identifier
    pub event_id: Uuid,
    /// Event timestamp in UTC
    pub timestamp: DateTime<Utc>,
    /// Kind of occurrence
    pub kind: EventKind,
    /// Additional context, key to loosely typed value
    pub details: EventDetails,
    /// Opaque identifier of the acting subject, if known
    pub actor_id: Option<String>,
}

impl AuditEvent {
    pub fn new(kind: EventKind, details: EventDetails, actor_id: Option<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            kind,
            details,
            actor_id,
        }
    }

    /// One-line rendering for the external sink: pipe-delimited fields,
    /// details as comma-joined `key=value` pairs.
    pub fn format_line(&self) -> String {
        let actor = self.actor_id.as_deref().unwrap_or("-");
        let details = self
            .details
            .iter()
            .map(|(k, v)| match v {
                serde_json::Value::String(s) => format!("{}={}", k, s),
                other => format!("{}={}", k, other),
            })
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "AUDIT | {} | {} | actor={} | {}",
            self.kind.as_str(),
            self.timestamp.to_rfc3339(),
            actor,
            details
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_criticality_is_a_property_of_the_kind() {
        let critical = [
            EventKind::DataDeletionRequested,
            EventKind::DataDeletionCompleted,
            EventKind::AuditTrailCleared,
        ];
        for kind in critical {
            assert!(kind.is_critical(), "{:?} should be critical", kind);
        }
        for kind in [
            EventKind::DataCreated,
            EventKind::DataAccessed,
            EventKind::DataModified,
            EventKind::DataDeleted,
            EventKind::AnalyticsAccessed,
            EventKind::AnalyticsModified,
            EventKind::StateChanged,
            EventKind::SessionStarted,
            EventKind::SessionEnded,
            EventKind::EncryptionKeyRotated,
            EventKind::DataExport,
            EventKind::PrivacySettingsChanged,
        ] {
            assert!(!kind.is_critical(), "{:?} should not be critical", kind);
        }
    }

    #[test]
    fn test_data_operation_kind_mapping() {
        assert_eq!(DataOperation::Create.event_kind(), EventKind::DataCreated);
        assert_eq!(DataOperation::Read.event_kind(), EventKind::DataAccessed);
        assert_eq!(DataOperation::Update.event_kind(), EventKind::DataModified);
        assert_eq!(DataOperation::Delete.event_kind(), EventKind::DataDeleted);
    }

    #[test]
    fn test_format_line_contains_kind_actor_and_details() {
        let mut details = EventDetails::new();
        details.insert("entity_type".to_string(), json!("Transaction"));
        details.insert("count".to_string(), json!(3));
        let event = AuditEvent::new(
            EventKind::DataAccessed,
            details,
            Some("user-42".to_string()),
        );

        let line = event.format_line();
        assert!(line.starts_with("AUDIT | data_accessed | "));
        assert!(line.contains("actor=user-42"));
        assert!(line.contains("count=3"));
        assert!(line.contains("entity_type=Transaction"));
    }

    #[test]
    fn test_format_line_without_actor() {
        let event = AuditEvent::new(EventKind::SessionStarted, EventDetails::new(), None);
        assert!(event.format_line().contains("actor=-"));
    }

    #[test]
    fn test_event_serialization() {
        let mut details = EventDetails::new();
        details.insert("reason".to_string(), json!("manual_clear"));
        let event = AuditEvent::new(EventKind::AuditTrailCleared, details, None);

        let serialized = serde_json::to_string(&event).unwrap();
        let deserialized: AuditEvent = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized.event_id, event.event_id);
        assert_eq!(deserialized.kind, EventKind::AuditTrailCleared);
        assert_eq!(deserialized.details, event.details);
    }
}

//! Append-only, size-bounded audit trail with external log mirroring

use super::event::{AuditEvent, DataOperation, EventDetails, EventKind};
use super::sink::{LogSeverity, LogSink, StructuredLogSink};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Default cap on the in-memory trail.
pub const DEFAULT_MAX_TRAIL_SIZE: usize = 1000;

const SINK_CATEGORY: &str = "audit";

/// Thread-safe, append-only ledger of security-relevant occurrences.
///
/// The trail is bounded: appending beyond `max_trail_size` evicts the oldest
/// entries first. Every event is additionally mirrored as one formatted line
/// to the external sink at info severity, with a second error-severity line
/// for critical kinds. Logging never fails the caller.
pub struct AuditLog {
    max_trail_size: usize,
    trail: Mutex<VecDeque<AuditEvent>>,
    sink: Box<dyn LogSink>,
}

impl AuditLog {
    /// Create an audit log with the default sink and trail capacity.
    pub fn new() -> Self {
        Self::with_sink(Box::new(StructuredLogSink))
    }

    /// Create an audit log mirroring into the given sink.
    pub fn with_sink(sink: Box<dyn LogSink>) -> Self {
        Self {
            max_trail_size: DEFAULT_MAX_TRAIL_SIZE,
            trail: Mutex::new(VecDeque::new()),
            sink,
        }
    }

    /// Override the trail capacity.
    pub fn with_max_trail_size(mut self, max_trail_size: usize) -> Self {
        self.max_trail_size = max_trail_size;
        self
    }

    /// Record an occurrence.
    ///
    /// Appends to the trail under the lock, evicting oldest-first when over
    /// capacity, then mirrors the formatted line to the sink outside the
    /// lock. Infallible to the caller by contract.
    pub fn log_event(&self, kind: EventKind, details: EventDetails, actor_id: Option<String>) {
        let event = AuditEvent::new(kind, details, actor_id);
        let line = event.format_line();

        {
            let mut trail = self.trail.lock().unwrap();
            trail.push_back(event);
            while trail.len() > self.max_trail_size {
                trail.pop_front();
            }
        }

        self.sink.write(LogSeverity::Info, SINK_CATEGORY, &line);
        if kind.is_critical() {
            self.sink.write(LogSeverity::Error, SINK_CATEGORY, &line);
        }
    }

    /// Record a CRUD operation against domain data.
    pub fn log_data_access(
        &self,
        operation: DataOperation,
        entity_type: &str,
        count: usize,
        actor_id: Option<String>,
    ) {
        let mut details = EventDetails::new();
        details.insert("operation".to_string(), json!(operation.as_str()));
        details.insert("entity_type".to_string(), json!(entity_type));
        details.insert("count".to_string(), json!(count));
        self.log_event(operation.event_kind(), details, actor_id);
    }

    /// Record an analytics read.
    pub fn log_analytics_access(&self, analytics_type: &str, actor_id: Option<String>) {
        let mut details = EventDetails::new();
        details.insert("analytics_type".to_string(), json!(analytics_type));
        self.log_event(EventKind::AnalyticsAccessed, details, actor_id);
    }

    /// Record an application state change.
    pub fn log_state_change(&self, mode: &str, detail: &str, actor_id: Option<String>) {
        let mut details = EventDetails::new();
        details.insert("mode".to_string(), json!(mode));
        details.insert("detail".to_string(), json!(detail));
        self.log_event(EventKind::StateChanged, details, actor_id);
    }

    /// The most recent `limit` events in call order, most recent last.
    /// Returned entries are clones, safe to hold without the lock.
    pub fn get_recent_events(&self, limit: usize) -> Vec<AuditEvent> {
        let trail = self.trail.lock().unwrap();
        let skip = trail.len().saturating_sub(limit);
        trail.iter().skip(skip).cloned().collect()
    }

    /// Current number of retained entries.
    pub fn trail_len(&self) -> usize {
        self.trail.lock().unwrap().len()
    }

    /// Empty the trail. The clear itself is logged as a critical
    /// `AuditTrailCleared` event and becomes the sole surviving entry.
    pub fn clear_trail(&self) {
        self.trail.lock().unwrap().clear();

        let mut details = EventDetails::new();
        details.insert("reason".to_string(), json!("manual_clear"));
        self.log_event(EventKind::AuditTrailCleared, details, None);
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::sink::test_support::RecordingSink;
    use std::sync::Arc;

    struct SharedSink(Arc<RecordingSink>);

    impl LogSink for SharedSink {
        fn write(&self, severity: LogSeverity, category: &str, message: &str) {
            self.0.write(severity, category, message);
        }
    }

    fn log_with_recording_sink() -> (AuditLog, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let log = AuditLog::with_sink(Box::new(SharedSink(Arc::clone(&sink))));
        (log, sink)
    }

    #[test]
    fn test_trail_holds_events_in_call_order() {
        let log = AuditLog::new();
        log.log_data_access(DataOperation::Create, "Account", 1, None);
        log.log_data_access(DataOperation::Read, "Account", 2, None);
        log.log_analytics_access("spending_summary", Some("user-1".to_string()));

        let events = log.get_recent_events(10);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].kind, EventKind::DataCreated);
        assert_eq!(events[1].kind, EventKind::DataAccessed);
        assert_eq!(events[2].kind, EventKind::AnalyticsAccessed);
        assert_eq!(events[2].actor_id.as_deref(), Some("user-1"));
    }

    #[test]
    fn test_trail_bound_evicts_oldest_first() {
        let log = AuditLog::new().with_max_trail_size(5);
        for i in 0..8 {
            log.log_data_access(DataOperation::Read, "Entry", i, None);
        }

        assert_eq!(log.trail_len(), 5);
        let events = log.get_recent_events(10);
        let counts: Vec<u64> = events
            .iter()
            .map(|e| e.details["count"].as_u64().unwrap())
            .collect();
        assert_eq!(counts, vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_get_recent_events_truncates_to_limit() {
        let log = AuditLog::new();
        for i in 0..6 {
            log.log_data_access(DataOperation::Read, "Entry", i, None);
        }

        let events = log.get_recent_events(2);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].details["count"].as_u64(), Some(4));
        assert_eq!(events[1].details["count"].as_u64(), Some(5));
    }

    #[test]
    fn test_critical_kind_escalates_sink_severity() {
        let (log, sink) = log_with_recording_sink();
        log.log_event(EventKind::DataDeletionRequested, EventDetails::new(), None);

        let lines = sink.lines.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].0, LogSeverity::Info);
        assert_eq!(lines[1].0, LogSeverity::Error);
        assert!(lines[1].1.contains("data_deletion_requested"));
    }

    #[test]
    fn test_non_critical_kind_writes_single_info_line() {
        let (log, sink) = log_with_recording_sink();
        log.log_state_change("planning", "week_view", None);

        let lines = sink.lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, LogSeverity::Info);
    }

    #[test]
    fn test_clear_trail_leaves_single_cleared_event() {
        let log = AuditLog::new();
        for _ in 0..4 {
            log.log_analytics_access("trends", None);
        }

        log.clear_trail();

        let events = log.get_recent_events(10);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::AuditTrailCleared);
        assert_eq!(events[0].details["reason"], "manual_clear");
    }
}

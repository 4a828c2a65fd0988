//! Anomaly detection and statistics in front of the audit trail
//!
//! [`SecurityMonitor`] is the single call site application code uses when
//! something sensitive happens. Each monitor call updates running counters,
//! runs the threshold checks, delegates persistence to [`AuditLog`], and
//! broadcasts a coarse notification to live subscribers. Anomalies are
//! informational audit entries, never errors: the calling operation always
//! proceeds.

pub mod notifications;
pub mod stats;
pub mod thresholds;

pub use notifications::{NotificationBus, NotificationSubscriber, SecurityNotification};
pub use stats::{HealthStatus, MonitoringStats, SecurityHealth, SecurityIssue};
pub use thresholds::AnomalyThresholds;

use crate::audit::{AuditLog, DataOperation, EventDetails, EventKind};
use chrono::Utc;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Cap on the monitor's own recent-events window, distinct from the trail.
pub const RECENT_EVENTS_CAPACITY: usize = 100;

struct MonitorState {
    stats: MonitoringStats,
    recent: VecDeque<EventKind>,
}

/// Threshold-based anomaly monitor over an [`AuditLog`].
pub struct SecurityMonitor {
    audit: Arc<AuditLog>,
    thresholds: AnomalyThresholds,
    state: Mutex<MonitorState>,
    bus: NotificationBus,
}

impl SecurityMonitor {
    /// Create a monitor with the default thresholds.
    pub fn new(audit: Arc<AuditLog>) -> Self {
        Self::with_thresholds(audit, AnomalyThresholds::default())
    }

    /// Create a monitor with explicit thresholds.
    pub fn with_thresholds(audit: Arc<AuditLog>, thresholds: AnomalyThresholds) -> Self {
        Self {
            audit,
            thresholds,
            state: Mutex::new(MonitorState {
                stats: MonitoringStats::default(),
                recent: VecDeque::new(),
            }),
            bus: NotificationBus::new(),
        }
    }

    /// The thresholds this monitor checks against.
    pub fn thresholds(&self) -> &AnomalyThresholds {
        &self.thresholds
    }

    /// Register a subscriber for coarse notifications.
    pub fn subscribe(&self) -> NotificationSubscriber {
        self.bus.subscribe()
    }

    /// Record a CRUD operation against domain data.
    ///
    /// Checks for excessive single-operation volume and rapid repeated
    /// access of the same kind.
    pub fn monitor_data_access(
        &self,
        operation: DataOperation,
        entity_type: &str,
        count: usize,
        actor_id: Option<String>,
    ) {
        let kind = operation.event_kind();
        let mut anomalies = Vec::new();

        {
            let mut state = self.state.lock().unwrap();
            state.stats.total_data_accesses += 1;
            *state
                .stats
                .accesses_by_entity
                .entry(entity_type.to_string())
                .or_insert(0) += 1;
            Self::push_recent(&mut state.recent, kind);

            if count > self.thresholds.max_data_access_per_operation {
                anomalies.push("excessive_volume");
            }
            if Self::rapid_count(&state.recent, kind) > self.thresholds.max_rapid_accesses {
                anomalies.push("rapid_access");
            }
        }

        self.audit
            .log_data_access(operation, entity_type, count, actor_id.clone());

        for reason in anomalies {
            let mut details = EventDetails::new();
            details.insert("anomaly".to_string(), json!(reason));
            details.insert("entity_type".to_string(), json!(entity_type));
            details.insert("count".to_string(), json!(count));
            self.audit.log_event(kind, details, actor_id.clone());
        }

        self.bus.publish(match operation {
            DataOperation::Read => SecurityNotification::DataAccessed,
            _ => SecurityNotification::DataModified,
        });
    }

    /// Record an analytics read.
    ///
    /// Checks for rapid repeated access and cumulative per-type over-access.
    pub fn monitor_analytics_access(&self, analytics_type: &str, actor_id: Option<String>) {
        let kind = EventKind::AnalyticsAccessed;
        let mut anomalies = Vec::new();

        {
            let mut state = self.state.lock().unwrap();
            state.stats.total_analytics_accesses += 1;
            let per_type = state
                .stats
                .accesses_by_analytics
                .entry(analytics_type.to_string())
                .or_insert(0);
            *per_type += 1;
            let per_type = *per_type as usize;
            Self::push_recent(&mut state.recent, kind);

            if Self::rapid_count(&state.recent, kind) > self.thresholds.max_rapid_accesses {
                anomalies.push("rapid_access");
            }
            if per_type > self.thresholds.max_analytics_access_per_session {
                anomalies.push("excessive_analytics");
            }
        }

        self.audit
            .log_analytics_access(analytics_type, actor_id.clone());

        for reason in anomalies {
            let mut details = EventDetails::new();
            details.insert("anomaly".to_string(), json!(reason));
            details.insert("analytics_type".to_string(), json!(analytics_type));
            self.audit.log_event(kind, details, actor_id.clone());
        }

        self.bus.publish(SecurityNotification::AnalyticsAccessed);
    }

    /// Record an application state change.
    pub fn monitor_state_change(&self, mode: &str, detail: &str, actor_id: Option<String>) {
        let kind = EventKind::StateChanged;
        let mut anomalies = Vec::new();

        {
            let mut state = self.state.lock().unwrap();
            state.stats.total_state_changes += 1;
            *state
                .stats
                .changes_by_mode
                .entry(mode.to_string())
                .or_insert(0) += 1;
            Self::push_recent(&mut state.recent, kind);

            if Self::rapid_count(&state.recent, kind) > self.thresholds.max_rapid_accesses {
                anomalies.push("rapid_access");
            }
        }

        self.audit.log_state_change(mode, detail, actor_id.clone());

        for reason in anomalies {
            let mut details = EventDetails::new();
            details.insert("anomaly".to_string(), json!(reason));
            details.insert("mode".to_string(), json!(mode));
            self.audit.log_event(kind, details, actor_id.clone());
        }

        self.bus.publish(SecurityNotification::StateChanged);
    }

    /// Record a sync or other bulk operation.
    ///
    /// Flags a bulk-operation anomaly when `record_count` exceeds the sync
    /// threshold.
    pub fn monitor_sync_operation(
        &self,
        operation: &str,
        record_count: usize,
        actor_id: Option<String>,
    ) {
        let kind = EventKind::DataModified;
        let bulk = record_count > self.thresholds.max_records_per_sync;

        {
            let mut state = self.state.lock().unwrap();
            state.stats.total_sync_operations += 1;
            Self::push_recent(&mut state.recent, kind);
        }

        let mut details = EventDetails::new();
        details.insert("sync_operation".to_string(), json!(operation));
        details.insert("record_count".to_string(), json!(record_count));
        self.audit.log_event(kind, details, actor_id.clone());

        if bulk {
            let mut details = EventDetails::new();
            details.insert("anomaly".to_string(), json!("bulk_operation"));
            details.insert("sync_operation".to_string(), json!(operation));
            details.insert("record_count".to_string(), json!(record_count));
            self.audit.log_event(kind, details, actor_id);
        }

        self.bus.publish(SecurityNotification::DataModified);
    }

    /// Value-copy snapshot of the running counters.
    pub fn get_monitoring_stats(&self) -> MonitoringStats {
        self.state.lock().unwrap().stats.clone()
    }

    /// Replace the counters with a fresh zero instance. The reset itself is
    /// logged as a critical event.
    pub fn reset_stats(&self) {
        {
            let mut state = self.state.lock().unwrap();
            state.stats = MonitoringStats::default();
        }

        let mut details = EventDetails::new();
        details.insert("reason".to_string(), json!("stats_reset"));
        self.audit
            .log_event(EventKind::AuditTrailCleared, details, None);
    }

    /// Assess current health from a stats snapshot against the thresholds.
    ///
    /// Never stored; only the rolling total-access checks feed it, so the
    /// status reaches `Warning` at most.
    pub fn get_security_health(&self) -> SecurityHealth {
        let stats = self.get_monitoring_stats();
        let mut issues = Vec::new();

        if stats.total_data_accesses as usize > self.thresholds.max_total_accesses_per_hour {
            issues.push(SecurityIssue::HighDataAccessRate);
        }
        if stats.total_analytics_accesses as usize
            > self.thresholds.max_analytics_accesses_per_hour
        {
            issues.push(SecurityIssue::HighAnalyticsAccessRate);
        }

        SecurityHealth {
            status: if issues.is_empty() {
                HealthStatus::Healthy
            } else {
                HealthStatus::Warning
            },
            issues,
            checked_at: Utc::now(),
        }
    }

    fn push_recent(recent: &mut VecDeque<EventKind>, kind: EventKind) {
        recent.push_back(kind);
        while recent.len() > RECENT_EVENTS_CAPACITY {
            recent.pop_front();
        }
    }

    fn rapid_count(recent: &VecDeque<EventKind>, kind: EventKind) -> usize {
        recent.iter().filter(|k| **k == kind).count()
    }
}

//! Monitoring statistics and health assessment types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Running counters maintained by the monitor.
///
/// Counters accumulate until an explicit reset; there is no wall-clock
/// decay. Snapshots handed to callers are value copies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringStats {
    pub total_data_accesses: u64,
    pub total_analytics_accesses: u64,
    pub total_state_changes: u64,
    pub total_sync_operations: u64,
    /// Data accesses broken down by entity type
    pub accesses_by_entity: BTreeMap<String, u64>,
    /// Analytics accesses broken down by analytics type
    pub accesses_by_analytics: BTreeMap<String, u64>,
    /// State changes broken down by mode
    pub changes_by_mode: BTreeMap<String, u64>,
}

/// Overall health grade of the monitored surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Warning,
    /// Declared for forward compatibility; no current check produces it.
    Critical,
}

/// Individual findings backing a non-healthy assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityIssue {
    HighDataAccessRate,
    HighAnalyticsAccessRate,
    /// Declared but not produced by the current checks.
    SuspiciousPatterns,
    /// Declared but not produced by the current checks.
    PrivacyViolation,
}

/// Point-in-time health snapshot, recomputed on demand and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityHealth {
    pub status: HealthStatus,
    pub issues: Vec<SecurityIssue>,
    pub checked_at: DateTime<Utc>,
}

//! Anomaly detection thresholds

use serde::{Deserialize, Serialize};

/// Static thresholds the monitor checks counters against.
///
/// Fixed at construction; every check triggers strictly above its threshold,
/// never at equality. This struct is the configuration seam for hosts that
/// load limits from their own config layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyThresholds {
    /// Max items a single data operation may touch
    pub max_data_access_per_operation: usize,
    /// Max matching-kind events in the recent-events window
    pub max_rapid_accesses: usize,
    /// Max records per sync operation
    pub max_records_per_sync: usize,
    /// Max cumulative accesses per analytics type
    pub max_analytics_access_per_session: usize,
    /// Max total data accesses before health degrades
    pub max_total_accesses_per_hour: usize,
    /// Max total analytics accesses before health degrades
    pub max_analytics_accesses_per_hour: usize,
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            max_data_access_per_operation: 100,
            max_rapid_accesses: 10,
            max_records_per_sync: 500,
            max_analytics_access_per_session: 50,
            max_total_accesses_per_hour: 1000,
            max_analytics_accesses_per_hour: 200,
        }
    }
}

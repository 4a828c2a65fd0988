//! External structured log sink

/// Severity of a sink line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSeverity {
    Info,
    Error,
}

/// Append-only, categorized logging facility the audit trail mirrors into.
///
/// Implementations must absorb their own failures: a sink write is never
/// allowed to fail the caller's primary operation.
pub trait LogSink: Send + Sync {
    fn write(&self, severity: LogSeverity, category: &str, message: &str);
}

/// Default sink forwarding to the `log` facade with the category as target.
pub struct StructuredLogSink;

impl LogSink for StructuredLogSink {
    fn write(&self, severity: LogSeverity, category: &str, message: &str) {
        match severity {
            LogSeverity::Info => log::info!(target: "vigil_audit", "{}: {}", category, message),
            LogSeverity::Error => log::error!(target: "vigil_audit", "{}: {}", category, message),
        }
    }
}

//! # vigil
//!
//! Embeddable audit-and-security layer for desktop/client applications:
//! an append-only audit trail with structured log mirroring, a
//! threshold-based anomaly monitor with a live notification stream, and an
//! authenticated encryption service with managed key rotation.
//!
//! The three components are explicitly constructed and composed by the
//! host's startup sequence; there is no global state. The [`AuditLog`] is
//! the shared ledger, the [`SecurityMonitor`] sits in front of it, and the
//! [`EncryptionService`] writes its key lifecycle events through it:
//!
//! ```
//! use std::sync::Arc;
//! use vigil::{
//!     AuditLog, DataOperation, EncryptionService, MemoryCredentialStore, SecurityMonitor,
//! };
//!
//! let audit = Arc::new(AuditLog::new());
//! let monitor = SecurityMonitor::new(Arc::clone(&audit));
//! let crypto = EncryptionService::new(
//!     Arc::new(MemoryCredentialStore::new()),
//!     Arc::clone(&audit),
//! );
//!
//! monitor.monitor_data_access(DataOperation::Read, "Transaction", 25, None);
//!
//! let secret = crypto.encrypt_string("cleared for export").unwrap();
//! assert_eq!(crypto.decrypt_string(&secret).unwrap(), "cleared for export");
//! assert!(audit.trail_len() >= 2);
//! ```
//!
//! All components are safe for concurrent use from multiple threads; each
//! protects its own mutable state with a dedicated lock.

pub mod audit;
pub mod encryption;
pub mod monitor;

pub use audit::{
    AuditEvent, AuditLog, DataOperation, EventDetails, EventKind, LogSeverity, LogSink,
    StructuredLogSink, DEFAULT_MAX_TRAIL_SIZE,
};
pub use encryption::{
    CredentialStore, EncryptionError, EncryptionResult, EncryptionService, MemoryCredentialStore,
    StoreError,
};
pub use monitor::{
    AnomalyThresholds, HealthStatus, MonitoringStats, NotificationSubscriber, SecurityHealth,
    SecurityIssue, SecurityMonitor, SecurityNotification, RECENT_EVENTS_CAPACITY,
};

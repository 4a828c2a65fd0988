//! Append-only audit trail with OS-level log mirroring
//!
//! This module provides:
//! - The closed [`EventKind`] taxonomy with static criticality
//! - [`AuditEvent`] immutable records with loosely typed details
//! - [`AuditLog`], a bounded, thread-safe, dual-output event ledger
//! - The [`LogSink`] seam to the host's structured logging facility

pub mod event;
pub mod log;
pub mod sink;

pub use event::{AuditEvent, DataOperation, EventDetails, EventKind};
pub use log::{AuditLog, DEFAULT_MAX_TRAIL_SIZE};
pub use sink::{LogSeverity, LogSink, StructuredLogSink};

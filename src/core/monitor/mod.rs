//! Periodic monitoring core.
//!
//! This module provides the business logic for the refresh cycle: reading
//! proxy logs, OS counters, the TCP table and service endpoints, matching
//! attack signatures, aggregating the raw text into snapshots, and
//! evaluating threshold alerts.

pub mod aggregate;
pub mod alerts;
mod collector;
mod history;
pub mod readers;
mod report;
mod runtime;
pub mod signatures;
mod snapshot;

pub use aggregate::{
    aggregate_connections, aggregate_security, aggregate_services, aggregate_traffic,
};
pub use alerts::{evaluate, AlertThresholds};
pub use collector::CycleCollector;
pub use history::{SnapshotHistory, DEFAULT_HISTORY_SIZE};
pub use readers::{CommandReader, HttpProber, ReadOutput, SourceReader, UNREACHABLE_SECS};
pub use report::write_report;
pub use runtime::MonitorRuntime;
pub use signatures::{scan, SignatureKind};
pub use snapshot::{
    Alert, AlertSeverity, ConnectionSnapshot, CycleSnapshot, LogMatch, SecuritySnapshot,
    ServiceEntry, ServiceSnapshot, ServiceStatus, SourceMetric, SystemSnapshot, TrafficSnapshot,
};

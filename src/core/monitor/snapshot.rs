use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::signatures::SignatureKind;

/// Everything one refresh cycle produced: the typed snapshots, the
/// suspicious-activity matches and the evaluated alerts.
///
/// Built fresh each cycle and replaced wholesale; nothing in here is
/// mutated after construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CycleSnapshot {
    pub timestamp: i64, // Unix timestamp
    pub system: SystemSnapshot,
    pub security: SecuritySnapshot,
    pub services: ServiceSnapshot,
    pub connections: ConnectionSnapshot,
    pub traffic: TrafficSnapshot,
    /// Suspicious-activity display list, capped at the last 10 matches.
    pub matches: Vec<LogMatch>,
    pub alerts: Vec<Alert>,
}

/// OS-level resource counters for one cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub disk_percent: f64,
    pub uptime_secs: u64,
    pub network_in_bytes: u64,
    pub network_out_bytes: u64,
    pub load_average: (f64, f64, f64), // 1, 5, 15 min
}

/// Security counters reduced from the proxy logs and certificate reader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecuritySnapshot {
    pub failed_login_count: u64,
    /// Distinct source IPs seen in suspicious requests, recency-ordered,
    /// capped at 10.
    pub suspicious_ips: Vec<String>,
    pub ssl_days_remaining: i64,
    /// False when the certificate reader failed this cycle; distinguishes
    /// "expires today" from "could not check".
    pub ssl_checked: bool,
    pub rate_limit_hit_count: u64,
    /// False when any backing reader failed and defaults were substituted.
    pub complete: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceSnapshot {
    /// One entry per configured logical service, in configuration order.
    pub services: Vec<ServiceEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub name: String,
    pub status: ServiceStatus,
    pub response_time_seconds: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Unhealthy,
    #[default]
    Unknown,
}

impl ServiceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ServiceStatus::Healthy => "healthy",
            ServiceStatus::Unhealthy => "unhealthy",
            ServiceStatus::Unknown => "unknown",
        }
    }
}

/// TCP connection-table summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionSnapshot {
    pub total: u64,
    pub established: u64,
    pub time_wait: u64,
    pub listen: u64,
    pub by_port: BTreeMap<u16, u64>,
    pub complete: bool,
}

impl ConnectionSnapshot {
    /// Ports ordered by connection count, busiest first.
    pub fn top_ports(&self, limit: usize) -> Vec<(u16, u64)> {
        let mut ports: Vec<_> = self.by_port.iter().map(|(p, c)| (*p, *c)).collect();
        ports.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ports.truncate(limit);
        ports
    }
}

/// Access-log traffic summary for the network analyzer view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrafficSnapshot {
    pub total_requests: u64,
    pub unique_ips: u64,
    pub status_codes: BTreeMap<u16, u64>,
    pub complete: bool,
}

/// A log line that matched an attack signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMatch {
    pub ip: String,
    pub signature: SignatureKind,
    pub raw_line: String,
    pub timestamp: i64,
}

/// An individual alert, recomputed from scratch every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub message: String,
    pub source_metric: SourceMetric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

/// The metric family an alert was derived from. Variant order is the
/// source-priority order used when sorting the alert list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMetric {
    Cpu,
    Memory,
    Disk,
    FailedLogins,
    SuspiciousIps,
    SslCertificate,
    RateLimit,
    ResponseTime,
    Status,
}

impl SourceMetric {
    pub fn label(&self) -> &'static str {
        match self {
            SourceMetric::Cpu => "cpu",
            SourceMetric::Memory => "memory",
            SourceMetric::Disk => "disk",
            SourceMetric::FailedLogins => "failed_logins",
            SourceMetric::SuspiciousIps => "suspicious_ips",
            SourceMetric::SslCertificate => "ssl_certificate",
            SourceMetric::RateLimit => "rate_limit",
            SourceMetric::ResponseTime => "response_time",
            SourceMetric::Status => "status",
        }
    }
}

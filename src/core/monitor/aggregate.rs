//! Pure reducers from raw reader output to typed snapshots.
//!
//! Each aggregator tolerates failed or partial reader output by filling in
//! documented defaults, and skips individual malformed records rather than
//! failing the whole aggregation.

use std::collections::BTreeSet;

use serde::Deserialize;

use super::readers::ReadOutput;
use super::snapshot::{
    ConnectionSnapshot, LogMatch, SecuritySnapshot, ServiceEntry, ServiceSnapshot, ServiceStatus,
    TrafficSnapshot,
};
use crate::core::config::ServiceSpec;

/// Access-log field index holding the HTTP status code (combined format:
/// ip, ident, user, [time, zone], "request" split in three, status).
const STATUS_FIELD: usize = 8;

/// HTTP status counted as a failed login attempt.
const FAILED_LOGIN_STATUS: &str = "401";

/// Error-log marker emitted by nginx when a limit_req zone rejects a request.
const RATE_LIMIT_MARKER: &str = "limiting requests";

/// Cap on the suspicious-IP set carried in a security snapshot.
const SUSPICIOUS_IP_CAP: usize = 10;

/// Reduce the security-relevant readers plus the signature matches into a
/// [`SecuritySnapshot`].
pub fn aggregate_security(
    access: &ReadOutput,
    error: &ReadOutput,
    certificate: &ReadOutput,
    matches: &[LogMatch],
) -> SecuritySnapshot {
    let failed_login_count = if access.ok {
        access
            .text
            .lines()
            .filter(|line| {
                line.split_whitespace().nth(STATUS_FIELD) == Some(FAILED_LOGIN_STATUS)
            })
            .count() as u64
    } else {
        0
    };

    let rate_limit_hit_count = if error.ok {
        error
            .text
            .lines()
            .filter(|line| line.contains(RATE_LIMIT_MARKER))
            .count() as u64
    } else {
        0
    };

    let ssl_days_remaining = if certificate.ok {
        parse_certificate_days(&certificate.text).unwrap_or(0)
    } else {
        0
    };

    SecuritySnapshot {
        failed_login_count,
        suspicious_ips: distinct_ips(matches),
        ssl_days_remaining,
        ssl_checked: certificate.ok && parse_certificate_days(&certificate.text).is_some(),
        rate_limit_hit_count,
        complete: access.ok && error.ok && certificate.ok,
    }
}

/// Distinct match IPs in recency order (most recent first), capped at 10.
fn distinct_ips(matches: &[LogMatch]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut ips = Vec::new();

    for m in matches.iter().rev() {
        if seen.insert(m.ip.as_str()) {
            ips.push(m.ip.clone());
            if ips.len() >= SUSPICIOUS_IP_CAP {
                break;
            }
        }
    }

    ips
}

/// Certbot reports remaining lifetime as `VALID: 30 days`.
fn parse_certificate_days(text: &str) -> Option<i64> {
    let marker = "VALID:";
    let rest = &text[text.find(marker)? + marker.len()..];
    rest.split_whitespace().next()?.parse().ok()
}

/// Reduce `netstat -an` style output into a [`ConnectionSnapshot`].
///
/// Only rows containing the literal `tcp` token are counted; rows whose
/// local address has no parseable port are counted in the totals but
/// skipped in the per-port map.
pub fn aggregate_connections(netstat: &ReadOutput) -> ConnectionSnapshot {
    let mut snapshot = ConnectionSnapshot {
        complete: netstat.ok,
        ..Default::default()
    };

    if !netstat.ok {
        return snapshot;
    }

    for line in netstat.text.lines() {
        if !line.contains("tcp") {
            continue;
        }

        snapshot.total += 1;
        if line.contains("ESTABLISHED") {
            snapshot.established += 1;
        } else if line.contains("TIME_WAIT") {
            snapshot.time_wait += 1;
        } else if line.contains("LISTEN") {
            snapshot.listen += 1;
        }

        // Local address sits at field 3 in `ip:port` form.
        if let Some(port) = line
            .split_whitespace()
            .nth(3)
            .and_then(|addr| addr.rsplit(':').next())
            .and_then(|port| port.parse::<u16>().ok())
        {
            *snapshot.by_port.entry(port).or_insert(0) += 1;
        }
    }

    snapshot
}

/// One line of `docker-compose ps --format json` output.
#[derive(Debug, Deserialize)]
struct ComposePsEntry {
    #[serde(rename = "Service")]
    service: String,
    #[serde(rename = "State")]
    state: String,
}

/// Build the [`ServiceSnapshot`] for the statically configured services.
///
/// Container state decides health (`running` maps to healthy, anything else
/// reported maps to unhealthy, absent stays unknown); probe latencies are
/// attached per service name.
pub fn aggregate_services(
    ps: &ReadOutput,
    probes: &[(String, f64)],
    specs: &[ServiceSpec],
) -> ServiceSnapshot {
    let mut reported: Vec<(String, ServiceStatus)> = Vec::new();
    if ps.ok {
        for line in ps.text.lines() {
            let Ok(entry) = serde_json::from_str::<ComposePsEntry>(line) else {
                continue; // malformed row, skip per-record
            };
            let status = if entry.state == "running" {
                ServiceStatus::Healthy
            } else {
                ServiceStatus::Unhealthy
            };
            reported.push((entry.service, status));
        }
    }

    let services = specs
        .iter()
        .map(|spec| {
            let status = spec
                .container
                .as_deref()
                .and_then(|container| {
                    reported
                        .iter()
                        .find(|(name, _)| name == container)
                        .map(|(_, status)| *status)
                })
                .unwrap_or(ServiceStatus::Unknown);

            let response_time_seconds = probes
                .iter()
                .find(|(name, _)| name == &spec.name)
                .map(|(_, latency)| *latency)
                .unwrap_or(0.0);

            ServiceEntry {
                name: spec.name.clone(),
                status,
                response_time_seconds,
            }
        })
        .collect();

    ServiceSnapshot { services }
}

/// Reduce access-log output into the traffic summary for the analyzer view.
pub fn aggregate_traffic(access: &ReadOutput) -> TrafficSnapshot {
    let mut snapshot = TrafficSnapshot {
        complete: access.ok,
        ..Default::default()
    };

    if !access.ok {
        return snapshot;
    }

    let mut ips = BTreeSet::new();
    for line in access.text.lines() {
        let mut fields = line.split_whitespace();
        let Some(ip) = fields.next() else { continue };

        snapshot.total_requests += 1;
        ips.insert(ip.to_string());

        if let Some(status) = line
            .split_whitespace()
            .nth(STATUS_FIELD)
            .and_then(|s| s.parse::<u16>().ok())
        {
            *snapshot.status_codes.entry(status).or_insert(0) += 1;
        }
    }

    snapshot.unique_ips = ips.len() as u64;
    snapshot
}

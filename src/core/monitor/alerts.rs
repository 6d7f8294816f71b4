//! Threshold-based alert evaluation.
//!
//! The engine is a stateless reducer: every cycle it walks an explicit rule
//! table built from [`AlertThresholds`] and emits alerts for the conditions
//! that hold right now. Nothing is persisted or deduplicated across cycles,
//! so a qualifying condition re-fires each cycle. The output list is never
//! empty: with nothing firing, a single informational status alert is
//! emitted so the display always has a status line.

use serde::{Deserialize, Serialize};

use super::snapshot::{
    Alert, AlertSeverity, SecuritySnapshot, ServiceSnapshot, SourceMetric, SystemSnapshot,
};

/// Static alert thresholds. All comparisons are strict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub cpu_percent: f64,           // critical above (%)
    pub memory_percent: f64,        // critical above (%)
    pub disk_percent: f64,          // critical above (%)
    pub failed_logins: u64,         // warning above (count)
    pub suspicious_ips: usize,      // warning above (count)
    pub ssl_days_remaining: i64,    // critical below (days)
    pub rate_limit_hits: u64,       // warning above (count)
    pub response_time_seconds: f64, // warning above (seconds)
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            cpu_percent: 80.0,
            memory_percent: 85.0,
            disk_percent: 90.0,
            failed_logins: 10,
            suspicious_ips: 5,
            ssl_days_remaining: 7,
            rate_limit_hits: 100,
            response_time_seconds: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparator {
    Above,
    Below,
}

impl Comparator {
    fn triggered(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparator::Above => value > threshold,
            Comparator::Below => value < threshold,
        }
    }
}

struct ThresholdRule {
    metric: SourceMetric,
    comparator: Comparator,
    threshold: f64,
    severity: AlertSeverity,
}

/// The rule table, in source-priority order.
fn rule_table(t: &AlertThresholds) -> Vec<ThresholdRule> {
    use AlertSeverity::{Critical, Warning};
    use Comparator::{Above, Below};

    let rule = |metric, comparator, threshold, severity| ThresholdRule {
        metric,
        comparator,
        threshold,
        severity,
    };

    vec![
        rule(SourceMetric::Cpu, Above, t.cpu_percent, Critical),
        rule(SourceMetric::Memory, Above, t.memory_percent, Critical),
        rule(SourceMetric::Disk, Above, t.disk_percent, Critical),
        rule(
            SourceMetric::FailedLogins,
            Above,
            t.failed_logins as f64,
            Warning,
        ),
        rule(
            SourceMetric::SuspiciousIps,
            Above,
            t.suspicious_ips as f64,
            Warning,
        ),
        rule(
            SourceMetric::SslCertificate,
            Below,
            t.ssl_days_remaining as f64,
            Critical,
        ),
        rule(
            SourceMetric::RateLimit,
            Above,
            t.rate_limit_hits as f64,
            Warning,
        ),
        rule(
            SourceMetric::ResponseTime,
            Above,
            t.response_time_seconds,
            Warning,
        ),
    ]
}

/// Evaluate the current snapshots against the thresholds.
///
/// Alerts come out ordered by source priority (rule-table order) then
/// severity. The result always contains at least one entry.
pub fn evaluate(
    system: &SystemSnapshot,
    security: &SecuritySnapshot,
    services: &ServiceSnapshot,
    thresholds: &AlertThresholds,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for (priority, rule) in rule_table(thresholds).iter().enumerate() {
        for (value, detail) in metric_values(rule.metric, system, security, services) {
            if rule.comparator.triggered(value, rule.threshold) {
                alerts.push((
                    priority,
                    Alert {
                        severity: rule.severity,
                        message: describe(rule.metric, value, rule.threshold, detail.as_deref()),
                        source_metric: rule.metric,
                    },
                ));
            }
        }
    }

    alerts.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.severity.cmp(&a.1.severity)));
    let mut alerts: Vec<Alert> = alerts.into_iter().map(|(_, alert)| alert).collect();

    if alerts.is_empty() {
        alerts.push(Alert {
            severity: AlertSeverity::Info,
            message: "All systems operational".to_string(),
            source_metric: SourceMetric::Status,
        });
    }

    alerts
}

/// Candidate values for one metric. Most metrics yield a single value;
/// response time yields one per monitored service. The SSL rule yields
/// nothing when the certificate was never actually read this cycle, so a
/// defaulted zero cannot fire a spurious expiry alert.
fn metric_values(
    metric: SourceMetric,
    system: &SystemSnapshot,
    security: &SecuritySnapshot,
    services: &ServiceSnapshot,
) -> Vec<(f64, Option<String>)> {
    match metric {
        SourceMetric::Cpu => vec![(system.cpu_percent, None)],
        SourceMetric::Memory => vec![(system.memory_percent, None)],
        SourceMetric::Disk => vec![(system.disk_percent, None)],
        SourceMetric::FailedLogins => vec![(security.failed_login_count as f64, None)],
        SourceMetric::SuspiciousIps => vec![(security.suspicious_ips.len() as f64, None)],
        SourceMetric::SslCertificate => {
            if security.ssl_checked {
                vec![(security.ssl_days_remaining as f64, None)]
            } else {
                Vec::new()
            }
        }
        SourceMetric::RateLimit => vec![(security.rate_limit_hit_count as f64, None)],
        SourceMetric::ResponseTime => services
            .services
            .iter()
            .map(|svc| (svc.response_time_seconds, Some(svc.name.clone())))
            .collect(),
        SourceMetric::Status => Vec::new(),
    }
}

fn describe(metric: SourceMetric, value: f64, threshold: f64, detail: Option<&str>) -> String {
    match metric {
        SourceMetric::Cpu => {
            format!("High CPU usage: {value:.1}% (threshold {threshold:.0}%)")
        }
        SourceMetric::Memory => {
            format!("High memory usage: {value:.1}% (threshold {threshold:.0}%)")
        }
        SourceMetric::Disk => {
            format!("High disk usage: {value:.1}% (threshold {threshold:.0}%)")
        }
        SourceMetric::FailedLogins => {
            format!("Multiple failed login attempts: {}", value as u64)
        }
        SourceMetric::SuspiciousIps => {
            format!("Suspicious activity detected from {} IPs", value as u64)
        }
        SourceMetric::SslCertificate => {
            format!("SSL certificate expiring in {} days", value as i64)
        }
        SourceMetric::RateLimit => {
            format!("Rate limiting active: {} hits", value as u64)
        }
        SourceMetric::ResponseTime => format!(
            "High response time for {}: {value:.2}s",
            detail.unwrap_or("service")
        ),
        SourceMetric::Status => "All systems operational".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::monitor::snapshot::{ServiceEntry, ServiceStatus};

    fn nominal_security() -> SecuritySnapshot {
        SecuritySnapshot {
            ssl_days_remaining: 60,
            ssl_checked: true,
            complete: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_all_nominal_single_info_alert() {
        let alerts = evaluate(
            &SystemSnapshot::default(),
            &nominal_security(),
            &ServiceSnapshot::default(),
            &AlertThresholds::default(),
        );

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, AlertSeverity::Info);
        assert_eq!(alerts[0].source_metric, SourceMetric::Status);
    }

    #[test]
    fn test_cpu_boundary_is_strict() {
        let thresholds = AlertThresholds::default();
        let mut system = SystemSnapshot {
            cpu_percent: 80.0,
            ..Default::default()
        };

        let alerts = evaluate(&system, &nominal_security(), &ServiceSnapshot::default(), &thresholds);
        assert!(alerts.iter().all(|a| a.source_metric != SourceMetric::Cpu));

        system.cpu_percent = 80.01;
        let alerts = evaluate(&system, &nominal_security(), &ServiceSnapshot::default(), &thresholds);
        assert_eq!(alerts[0].source_metric, SourceMetric::Cpu);
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
    }

    #[test]
    fn test_ssl_expiry_critical() {
        let mut security = nominal_security();
        security.ssl_days_remaining = 5;

        let alerts = evaluate(
            &SystemSnapshot::default(),
            &security,
            &ServiceSnapshot::default(),
            &AlertThresholds::default(),
        );
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].source_metric, SourceMetric::SslCertificate);
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
        assert!(alerts[0].message.contains("expiring in 5 days"));

        security.ssl_days_remaining = 30;
        let alerts = evaluate(
            &SystemSnapshot::default(),
            &security,
            &ServiceSnapshot::default(),
            &AlertThresholds::default(),
        );
        assert!(alerts
            .iter()
            .all(|a| a.source_metric != SourceMetric::SslCertificate));
    }

    #[test]
    fn test_unchecked_certificate_never_fires() {
        // Reader failure defaults days to 0 but clears the validity flag.
        let security = SecuritySnapshot::default();
        assert_eq!(security.ssl_days_remaining, 0);

        let alerts = evaluate(
            &SystemSnapshot::default(),
            &security,
            &ServiceSnapshot::default(),
            &AlertThresholds::default(),
        );
        assert!(alerts
            .iter()
            .all(|a| a.source_metric != SourceMetric::SslCertificate));
    }

    #[test]
    fn test_few_suspicious_ips_below_threshold() {
        let mut security = nominal_security();
        security.suspicious_ips = vec!["10.0.0.1".into(), "10.0.0.2".into()];

        let alerts = evaluate(
            &SystemSnapshot::default(),
            &security,
            &ServiceSnapshot::default(),
            &AlertThresholds::default(),
        );
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].source_metric, SourceMetric::Status);
    }

    #[test]
    fn test_slow_service_warning_per_service() {
        let services = ServiceSnapshot {
            services: vec![
                ServiceEntry {
                    name: "backend-api".into(),
                    status: ServiceStatus::Healthy,
                    response_time_seconds: 2.5,
                },
                ServiceEntry {
                    name: "landing-page".into(),
                    status: ServiceStatus::Healthy,
                    response_time_seconds: 0.2,
                },
            ],
        };

        let alerts = evaluate(
            &SystemSnapshot::default(),
            &nominal_security(),
            &services,
            &AlertThresholds::default(),
        );
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].source_metric, SourceMetric::ResponseTime);
        assert!(alerts[0].message.contains("backend-api"));
    }

    #[test]
    fn test_source_priority_ordering() {
        let system = SystemSnapshot {
            memory_percent: 95.0,
            ..Default::default()
        };
        let services = ServiceSnapshot {
            services: vec![ServiceEntry {
                name: "api".into(),
                status: ServiceStatus::Unhealthy,
                response_time_seconds: 999.0,
            }],
        };

        let alerts = evaluate(
            &system,
            &nominal_security(),
            &services,
            &AlertThresholds::default(),
        );
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].source_metric, SourceMetric::Memory);
        assert_eq!(alerts[1].source_metric, SourceMetric::ResponseTime);
    }
}

use vigil::core::monitor::{
    evaluate, AlertSeverity, AlertThresholds, SecuritySnapshot, ServiceEntry, ServiceSnapshot,
    ServiceStatus, SourceMetric, SystemSnapshot,
};

fn degraded_system() -> SystemSnapshot {
    SystemSnapshot {
        cpu_percent: 95.0,
        memory_percent: 91.5,
        disk_percent: 40.0,
        ..Default::default()
    }
}

#[test]
fn test_degraded_host_fires_resource_criticals() {
    let alerts = evaluate(
        &degraded_system(),
        &SecuritySnapshot::default(),
        &ServiceSnapshot::default(),
        &AlertThresholds::default(),
    );

    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].source_metric, SourceMetric::Cpu);
    assert_eq!(alerts[0].severity, AlertSeverity::Critical);
    assert_eq!(alerts[1].source_metric, SourceMetric::Memory);
    assert!(alerts[0].message.contains("95.0%"));
}

#[test]
fn test_security_breach_scenario_orders_by_source_priority() {
    let security = SecuritySnapshot {
        failed_login_count: 25,
        suspicious_ips: (0..7).map(|i| format!("203.0.113.{i}")).collect(),
        ssl_days_remaining: 3,
        ssl_checked: true,
        rate_limit_hit_count: 150,
        complete: true,
    };

    let services = ServiceSnapshot {
        services: vec![ServiceEntry {
            name: "backend-api".to_string(),
            status: ServiceStatus::Healthy,
            response_time_seconds: 3.4,
        }],
    };

    let alerts = evaluate(
        &SystemSnapshot::default(),
        &security,
        &services,
        &AlertThresholds::default(),
    );

    let metrics: Vec<SourceMetric> = alerts.iter().map(|a| a.source_metric).collect();
    assert_eq!(
        metrics,
        vec![
            SourceMetric::FailedLogins,
            SourceMetric::SuspiciousIps,
            SourceMetric::SslCertificate,
            SourceMetric::RateLimit,
            SourceMetric::ResponseTime,
        ]
    );

    let ssl = alerts
        .iter()
        .find(|a| a.source_metric == SourceMetric::SslCertificate)
        .unwrap();
    assert_eq!(ssl.severity, AlertSeverity::Critical);
    assert!(ssl.message.contains("3 days"));

    let slow = alerts
        .iter()
        .find(|a| a.source_metric == SourceMetric::ResponseTime)
        .unwrap();
    assert!(slow.message.contains("backend-api"));
}

#[test]
fn test_custom_thresholds_move_the_boundary() {
    let thresholds = AlertThresholds {
        cpu_percent: 50.0,
        ..Default::default()
    };

    let mut system = SystemSnapshot::default();
    system.cpu_percent = 60.0;

    let alerts = evaluate(
        &system,
        &SecuritySnapshot::default(),
        &ServiceSnapshot::default(),
        &thresholds,
    );

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].source_metric, SourceMetric::Cpu);
}

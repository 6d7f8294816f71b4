use vigil::core::config::ServiceSpec;
use vigil::core::monitor::{
    aggregate_connections, aggregate_security, aggregate_services, aggregate_traffic, evaluate,
    scan, AlertSeverity, AlertThresholds, ReadOutput, ServiceSnapshot, ServiceStatus,
    SignatureKind, SourceMetric, SystemSnapshot,
};

const ACCESS_LOG: &str = "\
203.0.113.9 - - [30/Aug/2026:10:00:00 +0000] \"GET /index.html HTTP/1.1\" 200 512 \"-\" \"curl\"
198.51.100.7 - - [30/Aug/2026:10:00:01 +0000] \"GET /../etc/passwd HTTP/1.1\" 404 153 \"-\" \"curl\"
203.0.113.9 - - [30/Aug/2026:10:00:02 +0000] \"GET /search?q=<script>alert(1)</script> HTTP/1.1\" 200 256 \"-\" \"curl\"
192.0.2.4 - - [30/Aug/2026:10:00:03 +0000] \"POST /login HTTP/1.1\" 401 64 \"-\" \"curl\"
203.0.113.9 - - [30/Aug/2026:10:00:04 +0000] \"GET /about HTTP/1.1\" 200 128 \"-\" \"curl\"
";

const NETSTAT: &str = "\
Active Internet connections (servers and established)
Proto Recv-Q Send-Q Local Address           Foreign Address         State
tcp        0      0 0.0.0.0:443             0.0.0.0:*               LISTEN
tcp        0      0 10.0.0.5:443            203.0.113.9:52100       ESTABLISHED
tcp        0      0 10.0.0.5:443            198.51.100.7:40022      TIME_WAIT
tcp        0      0 10.0.0.5:22             192.0.2.4:51000         ESTABLISHED
";

const CERTBOT: &str = "\
Found the following certs:
  Certificate Name: localhost
    Expiry Date: 2026-10-11 10:00:00+00:00 (VALID: 42 days)
";

#[test]
fn test_log_scan_finds_both_attack_lines() {
    let matches = scan(ACCESS_LOG, 1000);

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].ip, "198.51.100.7");
    assert_eq!(matches[0].signature, SignatureKind::DirectoryTraversal);
    assert_eq!(matches[1].ip, "203.0.113.9");
    assert_eq!(matches[1].signature, SignatureKind::ScriptInjection);
}

#[test]
fn test_security_aggregation_over_sample_window() {
    let access = ReadOutput::success(ACCESS_LOG.to_string());
    let error = ReadOutput::success(String::new());
    let cert = ReadOutput::success(CERTBOT.to_string());
    let matches = scan(ACCESS_LOG, 1000);

    let security = aggregate_security(&access, &error, &cert, &matches);

    assert_eq!(security.failed_login_count, 1);
    assert_eq!(security.suspicious_ips.len(), 2);
    assert!(security.suspicious_ips.contains(&"198.51.100.7".to_string()));
    assert!(security.suspicious_ips.contains(&"203.0.113.9".to_string()));
    assert!(security.ssl_checked);
    assert_eq!(security.ssl_days_remaining, 42);
    assert!(security.complete);
}

#[test]
fn test_two_suspicious_ips_stay_below_alert_threshold() {
    let access = ReadOutput::success(ACCESS_LOG.to_string());
    let error = ReadOutput::success(String::new());
    let cert = ReadOutput::success(CERTBOT.to_string());
    let matches = scan(ACCESS_LOG, 1000);

    let security = aggregate_security(&access, &error, &cert, &matches);
    let alerts = evaluate(
        &SystemSnapshot::default(),
        &security,
        &ServiceSnapshot::default(),
        &AlertThresholds::default(),
    );

    // Nothing crosses a threshold, so the engine reports the status line.
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, AlertSeverity::Info);
    assert_eq!(alerts[0].source_metric, SourceMetric::Status);
}

#[test]
fn test_traffic_aggregation_over_sample_window() {
    let access = ReadOutput::success(ACCESS_LOG.to_string());

    let traffic = aggregate_traffic(&access);

    assert_eq!(traffic.total_requests, 5);
    assert_eq!(traffic.unique_ips, 3);
    assert_eq!(traffic.status_codes.get(&200), Some(&3));
    assert_eq!(traffic.status_codes.get(&401), Some(&1));
    assert_eq!(traffic.status_codes.get(&404), Some(&1));
    assert!(traffic.complete);
}

#[test]
fn test_connection_aggregation_over_netstat_output() {
    let netstat = ReadOutput::success(NETSTAT.to_string());

    let connections = aggregate_connections(&netstat);

    assert_eq!(connections.total, 4);
    assert_eq!(connections.established, 2);
    assert_eq!(connections.time_wait, 1);
    assert_eq!(connections.listen, 1);
    assert_eq!(connections.by_port.get(&443), Some(&3));
    assert_eq!(connections.by_port.get(&22), Some(&1));
    assert!(connections.complete);
}

#[test]
fn test_service_states_join_container_and_probe_data() {
    let ps = ReadOutput::success(
        [
            r#"{"Service":"nginx","State":"running"}"#,
            r#"{"Service":"backend-api","State":"exited"}"#,
        ]
        .join("\n"),
    );
    let probes = vec![("backend-api".to_string(), 0.42)];
    let specs = vec![
        ServiceSpec::container("nginx", "nginx"),
        ServiceSpec::container("backend-api", "backend-api")
            .with_probe("https://localhost/api/health"),
        ServiceSpec::container("certbot", "certbot"),
    ];

    let snapshot = aggregate_services(&ps, &probes, &specs);

    assert_eq!(snapshot.services.len(), 3);
    assert_eq!(snapshot.services[0].status, ServiceStatus::Healthy);
    assert_eq!(snapshot.services[1].status, ServiceStatus::Unhealthy);
    assert_eq!(snapshot.services[1].response_time_seconds, 0.42);
    assert_eq!(snapshot.services[2].status, ServiceStatus::Unknown);
}

#[test]
fn test_failed_readers_produce_incomplete_defaults() {
    let failed = ReadOutput::failed();

    let security = aggregate_security(&failed, &failed, &failed, &[]);
    assert!(!security.complete);
    assert!(!security.ssl_checked);
    assert_eq!(security.failed_login_count, 0);

    let connections = aggregate_connections(&failed);
    assert!(!connections.complete);
    assert_eq!(connections.total, 0);

    let traffic = aggregate_traffic(&failed);
    assert!(!traffic.complete);
    assert_eq!(traffic.total_requests, 0);
}

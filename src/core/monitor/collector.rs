//! Per-cycle collection: fan out all source readers concurrently, reduce
//! their output into snapshots, and evaluate alerts.

use std::time::Duration;

use sysinfo::{CpuRefreshKind, Disks, MemoryRefreshKind, Networks, RefreshKind, System};

use crate::core::config::MonitorConfig;
use crate::error::Result;

use super::aggregate::{
    aggregate_connections, aggregate_security, aggregate_services, aggregate_traffic,
};
use super::alerts::{evaluate, AlertThresholds};
use super::readers::{CommandReader, HttpProber, SourceReader};
use super::signatures;
use super::snapshot::{CycleSnapshot, SystemSnapshot};

/// Suspicious-activity display entries carried in a snapshot.
const MATCH_DISPLAY_CAP: usize = 10;

const TAIL_TIMEOUT: Duration = Duration::from_secs(5);
const COMPOSE_TIMEOUT: Duration = Duration::from_secs(10);
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Owns the readers and the sysinfo handles and produces one
/// [`CycleSnapshot`] per call. One collector per dashboard instance;
/// nothing is shared between instances.
pub struct CycleCollector {
    system: System,
    disks: Disks,
    networks: Networks,
    access_log: Box<dyn SourceReader>,
    error_log: Box<dyn SourceReader>,
    conn_table: Box<dyn SourceReader>,
    compose_ps: Box<dyn SourceReader>,
    certificate: Box<dyn SourceReader>,
    prober: HttpProber,
    config: MonitorConfig,
}

impl CycleCollector {
    pub fn new(config: MonitorConfig) -> Result<Self> {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::everything())
            .with_memory(MemoryRefreshKind::everything());

        let compose = |args: Vec<String>, timeout| -> Box<dyn SourceReader> {
            Box::new(CommandReader::new("docker-compose", args).with_timeout(timeout))
        };
        let exec_proxy = |mut tail: Vec<String>| {
            let mut args = vec![
                "exec".to_string(),
                "-T".to_string(),
                config.proxy_container.clone(),
            ];
            args.append(&mut tail);
            args
        };

        let window = config.log_window.to_string();
        let access_log = compose(
            exec_proxy(vec![
                "tail".into(),
                "-n".into(),
                window.clone(),
                config.access_log.clone(),
            ]),
            TAIL_TIMEOUT,
        );
        let error_log = compose(
            exec_proxy(vec![
                "tail".into(),
                "-n".into(),
                window,
                config.error_log.clone(),
            ]),
            TAIL_TIMEOUT,
        );
        let conn_table = compose(exec_proxy(vec!["netstat".into(), "-an".into()]), TAIL_TIMEOUT);
        let compose_ps = compose(
            vec!["ps".into(), "--format".into(), "json".into()],
            COMPOSE_TIMEOUT,
        );
        let certificate = compose(
            vec![
                "exec".into(),
                "-T".into(),
                "certbot".into(),
                "certbot".into(),
                "certificates".into(),
                "--cert-name".into(),
                config.cert_name.clone(),
            ],
            COMPOSE_TIMEOUT,
        );

        Ok(Self {
            system: System::new_with_specifics(refresh_kind),
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
            access_log,
            error_log,
            conn_table,
            compose_ps,
            certificate,
            prober: HttpProber::new(PROBE_TIMEOUT)?,
            config,
        })
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.config.thresholds
    }

    /// Run one collection cycle. All reads and probes run concurrently,
    /// each bounded by its own timeout; the snapshot is built once every
    /// source has completed or timed out.
    pub async fn collect(&mut self) -> CycleSnapshot {
        let (access, error, conns, ps, cert, probes) = tokio::join!(
            self.access_log.read(),
            self.error_log.read(),
            self.conn_table.read(),
            self.compose_ps.read(),
            self.certificate.read(),
            self.run_probes(),
        );

        let system = self.collect_system();

        let matches = if access.ok {
            signatures::scan(&access.text, self.config.log_window)
        } else {
            Vec::new()
        };

        let security = aggregate_security(&access, &error, &cert, &matches);
        let services = aggregate_services(&ps, &probes, &self.config.services);
        let connections = aggregate_connections(&conns);
        let traffic = aggregate_traffic(&access);
        let alerts = evaluate(&system, &security, &services, &self.config.thresholds);

        // Keep only the most recent matches for display; the suspicious-IP
        // set above was derived from the full scan.
        let matches = {
            let skip = matches.len().saturating_sub(MATCH_DISPLAY_CAP);
            matches.into_iter().skip(skip).collect()
        };

        CycleSnapshot {
            timestamp: chrono::Utc::now().timestamp(),
            system,
            security,
            services,
            connections,
            traffic,
            matches,
            alerts,
        }
    }

    async fn run_probes(&self) -> Vec<(String, f64)> {
        let probes = self.config.services.iter().filter_map(|spec| {
            let url = spec.probe.clone()?;
            let name = spec.name.clone();
            Some(async move { (name, self.prober.probe(&url).await) })
        });

        futures_util::future::join_all(probes).await
    }

    /// OS counters via sysinfo. These cannot fail the cycle; absent data
    /// leaves the documented zero defaults in place.
    fn collect_system(&mut self) -> SystemSnapshot {
        self.system.refresh_all();
        self.disks.refresh(true);
        self.networks.refresh(true);

        let total_memory = self.system.total_memory();
        let memory_percent = if total_memory > 0 {
            self.system.used_memory() as f64 / total_memory as f64 * 100.0
        } else {
            0.0
        };

        // Root filesystem, falling back to the first disk present.
        let disk_percent = self
            .disks
            .iter()
            .find(|d| d.mount_point().to_str() == Some("/"))
            .or_else(|| self.disks.iter().next())
            .map(|disk| {
                let total = disk.total_space();
                if total > 0 {
                    (total.saturating_sub(disk.available_space())) as f64 / total as f64 * 100.0
                } else {
                    0.0
                }
            })
            .unwrap_or(0.0);

        let (network_in_bytes, network_out_bytes) = self
            .networks
            .values()
            .fold((0u64, 0u64), |(rx, tx), data| {
                (
                    rx.saturating_add(data.total_received()),
                    tx.saturating_add(data.total_transmitted()),
                )
            });

        let load = System::load_average();

        SystemSnapshot {
            cpu_percent: self.system.global_cpu_usage() as f64,
            memory_percent,
            disk_percent,
            uptime_secs: System::uptime(),
            network_in_bytes,
            network_out_bytes,
            load_average: (load.one, load.five, load.fifteen),
        }
    }
}

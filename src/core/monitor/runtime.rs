//! Tokio runtime and cycle loop for snapshot collection.
//!
//! The runtime owns the background cycle task and hands the UI a watch
//! channel carrying the latest snapshot. Shutdown is a broadcast signal;
//! in-flight reader processes are killed when their futures drop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::time::Instant;

use crate::core::config::MonitorConfig;
use crate::error::Result;

use super::collector::CycleCollector;
use super::report;
use super::snapshot::CycleSnapshot;

/// Floor on the inter-cycle sleep so a slow cycle cannot busy-loop.
const MIN_CYCLE_SLEEP: Duration = Duration::from_millis(100);

pub struct MonitorRuntime {
    /// Receiver for the latest cycle snapshot.
    pub snapshot_rx: watch::Receiver<Arc<CycleSnapshot>>,

    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,

    /// Keeps the runtime (and the cycle task) alive.
    _runtime: tokio::runtime::Runtime,
}

impl MonitorRuntime {
    /// Spawn the collection loop with the given refresh period.
    ///
    /// `report_path`, when set, gets a JSON dump of every completed cycle.
    pub fn new(
        config: MonitorConfig,
        interval: Duration,
        report_path: Option<PathBuf>,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("vigil-collector")
            .build()?;

        let collector = CycleCollector::new(config)?;

        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(CycleSnapshot::default()));
        let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

        runtime.spawn(cycle_task(
            collector,
            interval,
            report_path,
            snapshot_tx,
            shutdown_rx,
        ));

        Ok(Self {
            snapshot_rx,
            shutdown_tx,
            _runtime: runtime,
        })
    }

    /// Stop the cycle loop. Dropping the runtime afterwards reaps any
    /// reader processes still in flight.
    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// The refresh loop: collect, publish, sleep the remainder of the
/// interval. A cycle that fails unexpectedly is logged and followed by an
/// extended backoff instead of terminating the loop; only the shutdown
/// signal ends it.
async fn cycle_task(
    mut collector: CycleCollector,
    interval: Duration,
    report_path: Option<PathBuf>,
    snapshot_tx: watch::Sender<Arc<CycleSnapshot>>,
    mut shutdown: broadcast::Receiver<()>,
) {
    // First CPU reading needs a baseline refresh interval.
    tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;

    loop {
        let started = Instant::now();

        let outcome = tokio::select! {
            outcome = run_cycle(&mut collector, report_path.as_deref(), &snapshot_tx) => outcome,
            _ = shutdown.recv() => break,
        };

        let delay = match outcome {
            Ok(()) => interval
                .saturating_sub(started.elapsed())
                .max(MIN_CYCLE_SLEEP),
            Err(err) => {
                log::error!("cycle failed: {err}; backing off");
                interval * 2
            }
        };

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.recv() => break,
        }
    }
}

async fn run_cycle(
    collector: &mut CycleCollector,
    report_path: Option<&std::path::Path>,
    snapshot_tx: &watch::Sender<Arc<CycleSnapshot>>,
) -> Result<()> {
    let snapshot = collector.collect().await;

    if let Some(path) = report_path {
        report::write_report(path, &snapshot)?;
    }

    // send() only fails when every receiver is gone, which means the UI
    // already exited; the shutdown signal will follow.
    let _ = snapshot_tx.send(Arc::new(snapshot));

    Ok(())
}

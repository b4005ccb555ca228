//! # Scan Coordinator
//!
//! Fans the probe sequence out over every target under an admission cap and
//! streams outcomes back to a single collector.
//!
//! The dispatcher acquires a permit *before* spawning a worker, so at most
//! `max_concurrency` workers exist at once and the rest of the range waits
//! as plain addresses. Workers send their outcome over a bounded channel that
//! the collector drains while the scan is still running. The channel closes
//! once the dispatcher and every worker have dropped their sender, which is
//! what ends collection.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use osprobe_common::config::ScanConfig;
use osprobe_common::scan::outcome::{CANCELLED_REASON, ProbeOutcome, UNREACHABLE_REASON};
use osprobe_common::scan::report::AggregateReport;
use osprobe_common::{debug, error, warn};
use tokio::sync::{OwnedSemaphorePermit, Semaphore, mpsc};
use tokio::task::{self, JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::fingerprint;
use crate::network::ssh::{CommandRunner, SshRunner};
use crate::network::tcp::{ReachabilityProbe, TcpReachability};

pub struct ScanCoordinator {
    reachability: Arc<dyn ReachabilityProbe>,
    runner: Arc<dyn CommandRunner>,
    max_concurrency: usize,
}

impl ScanCoordinator {
    /// `max_concurrency` is clamped to at least one.
    pub fn new(
        reachability: Arc<dyn ReachabilityProbe>,
        runner: Arc<dyn CommandRunner>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            reachability,
            runner,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Wires the TCP reachability check and the SSH runner from `cfg`.
    pub fn from_config(cfg: &ScanConfig) -> anyhow::Result<Self> {
        let reachability = Arc::new(TcpReachability::from_config(cfg));
        let runner = Arc::new(SshRunner::new(&cfg.credentials)?);
        Ok(Self::new(reachability, runner, cfg.max_concurrency))
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Probes every target and returns once each has produced one outcome.
    ///
    /// `on_outcome` sees outcomes in completion order, as they arrive.
    /// Cancelling `cancel` stops admissions; pending and in-flight targets
    /// are then recorded with [`CANCELLED_REASON`].
    pub async fn run<F>(
        &self,
        targets: Vec<Ipv4Addr>,
        cancel: CancellationToken,
        mut on_outcome: F,
    ) -> AggregateReport
    where
        F: FnMut(&ProbeOutcome),
    {
        let total = targets.len();
        let (tx, mut rx) = mpsc::channel::<ProbeOutcome>(self.max_concurrency);

        let dispatcher = Dispatcher {
            reachability: self.reachability.clone(),
            runner: self.runner.clone(),
            admission: Arc::new(Semaphore::new(self.max_concurrency)),
            cancel,
            tx,
        };
        let dispatch_handle = tokio::spawn(dispatcher.dispatch(targets));

        let mut report = AggregateReport::with_capacity(total);
        while let Some(outcome) = rx.recv().await {
            on_outcome(&outcome);
            report.push(outcome);
        }

        if let Err(e) = dispatch_handle.await {
            error!("scan dispatcher stopped abnormally: {e}");
        }
        if report.len() != total {
            error!("collected {} outcomes for {total} targets", report.len());
        }

        report
    }
}

/// Cancels `cancel` once `deadline` elapses, unless it is cancelled first.
pub fn cancel_after(cancel: CancellationToken, deadline: Duration) -> task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::time::sleep(deadline) => {
                warn!("Scan deadline of {}s reached, cancelling remaining hosts", deadline.as_secs());
                cancel.cancel();
            }
        }
    })
}

/// Reachability first; the fingerprint only runs for hosts that answered.
pub async fn probe_target(
    addr: Ipv4Addr,
    reachability: &dyn ReachabilityProbe,
    runner: &dyn CommandRunner,
) -> ProbeOutcome {
    debug!("Checking {addr}...");

    if !reachability.is_reachable(addr).await {
        return ProbeOutcome::failed(addr, UNREACHABLE_REASON);
    }

    fingerprint::probe(runner, addr).await
}

struct Dispatcher {
    reachability: Arc<dyn ReachabilityProbe>,
    runner: Arc<dyn CommandRunner>,
    admission: Arc<Semaphore>,
    cancel: CancellationToken,
    tx: mpsc::Sender<ProbeOutcome>,
}

impl Dispatcher {
    async fn dispatch(self, targets: Vec<Ipv4Addr>) {
        let mut workers: JoinSet<()> = JoinSet::new();
        let mut in_flight: HashMap<task::Id, Ipv4Addr> = HashMap::new();
        let mut pending = targets.into_iter();

        for addr in pending.by_ref() {
            let permit = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    self.emit(ProbeOutcome::failed(addr, CANCELLED_REASON)).await;
                    break;
                }
                permit = self.admission.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(e) => {
                        self.emit(ProbeOutcome::failed(addr, format!("admission failed: {e}"))).await;
                        continue;
                    }
                },
            };

            let handle = workers.spawn(worker(
                addr,
                self.reachability.clone(),
                self.runner.clone(),
                self.cancel.clone(),
                self.tx.clone(),
                permit,
            ));
            in_flight.insert(handle.id(), addr);

            while let Some(joined) = workers.try_join_next_with_id() {
                self.reap(joined, &mut in_flight).await;
            }
        }

        for addr in pending {
            self.emit(ProbeOutcome::failed(addr, CANCELLED_REASON)).await;
        }

        while let Some(joined) = workers.join_next_with_id().await {
            self.reap(joined, &mut in_flight).await;
        }
    }

    /// A worker that died before sending still owes its target an outcome.
    async fn reap(
        &self,
        joined: Result<(task::Id, ()), JoinError>,
        in_flight: &mut HashMap<task::Id, Ipv4Addr>,
    ) {
        match joined {
            Ok((id, ())) => {
                in_flight.remove(&id);
            }
            Err(e) => {
                if let Some(addr) = in_flight.remove(&e.id()) {
                    error!("worker for {addr} failed: {e}");
                    self.emit(ProbeOutcome::failed(addr, format!("worker task failed: {e}")))
                        .await;
                }
            }
        }
    }

    async fn emit(&self, outcome: ProbeOutcome) {
        if self.tx.send(outcome).await.is_err() {
            error!("result collector is gone, dropping outcome");
        }
    }
}

async fn worker(
    addr: Ipv4Addr,
    reachability: Arc<dyn ReachabilityProbe>,
    runner: Arc<dyn CommandRunner>,
    cancel: CancellationToken,
    tx: mpsc::Sender<ProbeOutcome>,
    permit: OwnedSemaphorePermit,
) {
    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => ProbeOutcome::failed(addr, CANCELLED_REASON),
        outcome = probe_target(addr, &*reachability, &*runner) => outcome,
    };
    drop(permit);

    let _ = tx.send(outcome).await;
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

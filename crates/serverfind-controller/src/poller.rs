//! Periodic readiness checks against the active tab.

use std::sync::Arc;
use std::time::Duration;

use serverfind_bridge::{Request, Response, TabHost};
use serverfind_common::BridgeError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Outcome of one readiness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadinessProbe {
    Ready,
    NotReady,
    Failed(BridgeError),
}

/// A probe tagged with the polling run that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollEvent {
    pub generation: u64,
    pub probe: ReadinessProbe,
}

struct PollRun {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// A restartable polling task. Each run checks the active tab once per
/// period, starting one period after [`ReadyPoller::start`], and ends by
/// itself after the first `Ready` probe.
pub struct ReadyPoller {
    period: Duration,
    generation: u64,
    run: Option<PollRun>,
}

impl ReadyPoller {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            generation: 0,
            run: None,
        }
    }

    /// Start a new run, stopping any current one. Probes are sent to `tx`.
    pub fn start(&mut self, host: Arc<dyn TabHost>, tx: mpsc::UnboundedSender<PollEvent>) {
        self.stop();
        self.generation += 1;
        let token = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            host,
            self.period,
            self.generation,
            token.clone(),
            tx,
        ));
        debug!(
            generation = self.generation,
            period_ms = self.period.as_millis() as u64,
            "readiness polling started"
        );
        self.run = Some(PollRun { token, handle });
    }

    /// Stop the current run. Safe to call any number of times; returns
    /// whether a run was active.
    pub fn stop(&mut self) -> bool {
        let Some(run) = self.run.take() else {
            return false;
        };
        run.token.cancel();
        run.handle.abort();
        debug!(generation = self.generation, "readiness polling stopped");
        true
    }

    /// Whether a run was started and not stopped since. A run that ended
    /// on its own after `Ready` still counts until stopped.
    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Whether `event` belongs to the current, still active run.
    pub fn accepts(&self, event: &PollEvent) -> bool {
        self.run
            .as_ref()
            .is_some_and(|run| !run.token.is_cancelled() && event.generation == self.generation)
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Drop for ReadyPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop(
    host: Arc<dyn TabHost>,
    period: Duration,
    generation: u64,
    token: CancellationToken,
    tx: mpsc::UnboundedSender<PollEvent>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let Some(tab) = host.active_tab().await else {
            debug!("readiness check skipped: no active tab");
            continue;
        };
        let probe = match host
            .send(tab.id, Request::CheckReady)
            .await
            .and_then(Response::into_ready)
        {
            Ok(true) => ReadinessProbe::Ready,
            Ok(false) => ReadinessProbe::NotReady,
            Err(e) => ReadinessProbe::Failed(e),
        };

        if token.is_cancelled() {
            break;
        }
        let done = probe == ReadinessProbe::Ready;
        if tx.send(PollEvent { generation, probe }).is_err() || done {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serverfind_bridge::{TabId, TabInfo};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replies NotReady until `ready_after` checks have been made.
    struct CountingHost {
        checks: AtomicUsize,
        ready_after: usize,
        attached: bool,
    }

    impl CountingHost {
        fn new(ready_after: usize) -> Self {
            Self {
                checks: AtomicUsize::new(0),
                ready_after,
                attached: true,
            }
        }
    }

    #[async_trait]
    impl TabHost for CountingHost {
        async fn active_tab(&self) -> Option<TabInfo> {
            Some(TabInfo {
                id: 1,
                url: "https://discord.com/app".into(),
            })
        }

        async fn send(&self, tab: TabId, _request: Request) -> Result<Response, BridgeError> {
            if !self.attached {
                return Err(BridgeError::NoReceiver(tab));
            }
            let n = self.checks.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Response::Ready {
                ready: n >= self.ready_after,
            })
        }

        async fn reload(&self, _tab: TabId) -> Result<(), BridgeError> {
            Ok(())
        }
    }

    const PERIOD: Duration = Duration::from_millis(10);

    async fn next(rx: &mut mpsc::UnboundedReceiver<PollEvent>) -> PollEvent {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("probe before timeout")
            .expect("channel open")
    }

    #[tokio::test]
    async fn polls_until_ready_then_ends() {
        let host = Arc::new(CountingHost::new(3));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut poller = ReadyPoller::new(PERIOD);
        poller.start(host.clone(), tx);

        assert_eq!(next(&mut rx).await.probe, ReadinessProbe::NotReady);
        assert_eq!(next(&mut rx).await.probe, ReadinessProbe::NotReady);
        let last = next(&mut rx).await;
        assert_eq!(last.probe, ReadinessProbe::Ready);
        assert!(poller.accepts(&last));

        tokio::time::sleep(PERIOD * 5).await;
        assert_eq!(host.checks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn failures_keep_polling() {
        let host = Arc::new(CountingHost {
            attached: false,
            ..CountingHost::new(1)
        });
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut poller = ReadyPoller::new(PERIOD);
        poller.start(host, tx);

        for _ in 0..2 {
            assert_eq!(
                next(&mut rx).await.probe,
                ReadinessProbe::Failed(BridgeError::NoReceiver(1))
            );
        }
        assert!(poller.stop());
    }

    #[tokio::test]
    async fn stop_is_idempotent_and_silences_the_run() {
        let host = Arc::new(CountingHost::new(usize::MAX));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut poller = ReadyPoller::new(PERIOD);
        assert!(!poller.stop());

        poller.start(host.clone(), tx);
        let event = next(&mut rx).await;
        assert!(poller.is_running());
        assert!(poller.stop());
        assert!(!poller.stop());
        assert!(!poller.is_running());
        assert!(!poller.accepts(&event));

        let checks = host.checks.load(Ordering::SeqCst);
        tokio::time::sleep(PERIOD * 5).await;
        assert_eq!(host.checks.load(Ordering::SeqCst), checks);
    }

    #[tokio::test]
    async fn restart_rejects_events_from_previous_run() {
        let host = Arc::new(CountingHost::new(usize::MAX));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut poller = ReadyPoller::new(PERIOD);

        poller.start(host.clone(), tx.clone());
        let old = next(&mut rx).await;
        poller.start(host, tx);
        assert!(!poller.accepts(&old));

        let mut fresh = next(&mut rx).await;
        while fresh.generation == old.generation {
            fresh = next(&mut rx).await;
        }
        assert!(poller.accepts(&fresh));
        poller.stop();
    }

    #[tokio::test]
    async fn first_check_waits_one_period() {
        let host = Arc::new(CountingHost::new(usize::MAX));
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut poller = ReadyPoller::new(Duration::from_secs(60));
        poller.start(host.clone(), tx);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(host.checks.load(Ordering::SeqCst), 0);
        poller.stop();
    }
}

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{watch, Notify};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, warn};

use super::{RetryPolicy, SequenceGate};
use crate::data::{apply, DashboardState, DEFAULT_CAPACITY};
use crate::fetch::{FetchOutcome, SnapshotFetcher};

/// Shortest allowed poll interval.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Periodic fetch loop feeding the dashboard state.
///
/// The first fetch is issued as soon as the task starts; later ones follow
/// the configured interval (stretched by the [`RetryPolicy`] while polls keep
/// failing). Fetches run concurrently, and outcomes are applied in completion
/// order unless a newer one has already been applied.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use agentdash::{fetcher_for_endpoint, Poller};
///
/// # tokio_test::block_on(async {
/// let fetcher = fetcher_for_endpoint(
///     "http://localhost:8000/latest.json",
///     Duration::from_secs(10),
/// )
/// .unwrap();
///
/// let handle = Poller::new(fetcher, Duration::from_secs(60)).spawn();
/// let mut updates = handle.subscribe();
/// updates.changed().await.unwrap();
/// println!("cpu points: {}", updates.borrow().cpu.len());
/// handle.shutdown().await;
/// # });
/// ```
#[derive(Debug)]
pub struct Poller {
    fetcher: Arc<dyn SnapshotFetcher>,
    interval: Duration,
    capacity: usize,
    retry: RetryPolicy,
}

impl Poller {
    pub fn new(fetcher: Arc<dyn SnapshotFetcher>, interval: Duration) -> Self {
        Self {
            fetcher,
            interval: interval.max(MIN_INTERVAL),
            capacity: DEFAULT_CAPACITY,
            retry: RetryPolicy::default(),
        }
    }

    /// Points kept per series (default: 60).
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Start polling on the current tokio runtime.
    pub fn spawn(self) -> PollerHandle {
        let initial = Arc::new(DashboardState::new(self.capacity));
        let (state_tx, state_rx) = watch::channel(initial);
        let (stop_tx, stop_rx) = watch::channel(false);
        let refresh = Arc::new(Notify::new());
        let description = self.fetcher.description().to_string();

        let task = tokio::spawn(self.run(state_tx, stop_rx, refresh.clone()));

        PollerHandle {
            state: state_rx,
            stop_tx,
            refresh,
            task,
            description,
        }
    }

    async fn run(
        self,
        state_tx: watch::Sender<Arc<DashboardState>>,
        mut stop_rx: watch::Receiver<bool>,
        refresh: Arc<Notify>,
    ) {
        info!(
            source = %self.fetcher.description(),
            interval = ?self.interval,
            capacity = self.capacity,
            retry = %self.retry.strategy(),
            "poller started"
        );

        let mut gate = SequenceGate::new();
        let mut in_flight: JoinSet<(u64, FetchOutcome)> = JoinSet::new();
        let mut state = state_tx.borrow().clone();
        let mut last_tick = Instant::now();
        let mut next_tick = last_tick;

        loop {
            tokio::select! {
                _ = sleep_until(next_tick) => {
                    self.launch(&mut gate, &mut in_flight);
                    last_tick = next_tick;
                    next_tick = last_tick + self.retry.delay(self.interval, state.consecutive_failures);
                }
                _ = refresh.notified() => {
                    debug!("manual refresh");
                    self.launch(&mut gate, &mut in_flight);
                }
                Some(joined) = in_flight.join_next() => {
                    let (seq, outcome) = match joined {
                        Ok(completed) => completed,
                        Err(e) => {
                            error!(error = %e, "fetch task failed");
                            continue;
                        }
                    };

                    if !gate.admit(seq) {
                        warn!(seq, newest = ?gate.highest_applied(), "discarding stale outcome");
                        continue;
                    }

                    match &outcome {
                        Err(e) if e.is_transport() => warn!(seq, error = %e, "poll failed"),
                        Err(e) => error!(seq, error = %e, "agent sent an unreadable snapshot"),
                        Ok(_) => {}
                    }

                    state = Arc::new(apply(&state, &outcome, Utc::now()));
                    debug!(seq, revision = state.revision, "state updated");
                    state_tx.send_replace(state.clone());

                    next_tick = last_tick + self.retry.delay(self.interval, state.consecutive_failures);
                }
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                }
            }
        }

        gate.close();
        in_flight.shutdown().await;
        info!("poller stopped");
    }

    fn launch(&self, gate: &mut SequenceGate, in_flight: &mut JoinSet<(u64, FetchOutcome)>) {
        let seq = gate.issue();
        let fetcher = self.fetcher.clone();
        debug!(seq, in_flight = in_flight.len(), "issuing fetch");
        in_flight.spawn(async move { (seq, fetcher.fetch().await) });
    }
}

/// Handle to a running [`Poller`].
///
/// Dropping the handle stops the poller; in-flight fetches are aborted.
#[derive(Debug)]
pub struct PollerHandle {
    state: watch::Receiver<Arc<DashboardState>>,
    stop_tx: watch::Sender<bool>,
    refresh: Arc<Notify>,
    task: JoinHandle<()>,
    description: String,
}

impl PollerHandle {
    /// The most recently published state.
    pub fn state(&self) -> Arc<DashboardState> {
        self.state.borrow().clone()
    }

    /// A receiver notified on every published state.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardState>> {
        self.state.clone()
    }

    /// Description of the polled endpoint.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Issue an extra fetch now. The periodic schedule is unaffected.
    pub fn refresh_now(&self) {
        self.refresh.notify_one();
    }

    /// Shared trigger behind [`refresh_now`](Self::refresh_now), for callers
    /// that outlive a borrow of the handle.
    pub fn refresh_trigger(&self) -> Arc<Notify> {
        self.refresh.clone()
    }

    /// Stop polling and wait for the task to finish.
    ///
    /// Completions arriving after this call are never applied.
    pub async fn shutdown(self) {
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.task.await {
            error!(error = %e, "poller task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchError, TransportError};
    use agentdash_types::RawSnapshot;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// One scripted response: wait `delay`, then return `cpu` or fail.
    #[derive(Debug, Clone)]
    struct Step {
        delay: Duration,
        cpu: Option<f64>,
    }

    #[derive(Debug, Default)]
    struct ScriptedFetcher {
        script: Mutex<VecDeque<Step>>,
        fallback: Option<f64>,
        calls: AtomicUsize,
    }

    impl ScriptedFetcher {
        fn new(steps: Vec<Step>, fallback: Option<f64>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(steps.into()),
                fallback,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SnapshotFetcher for ScriptedFetcher {
        async fn fetch(&self) -> FetchOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let step = self.script.lock().unwrap().pop_front().unwrap_or(Step {
                delay: Duration::ZERO,
                cpu: self.fallback,
            });

            tokio::time::sleep(step.delay).await;
            match step.cpu {
                Some(cpu) => Ok(RawSnapshot::builder().cpu_usage(cpu).build()),
                None => Err(FetchError::Transport(TransportError::Connection(
                    "connection refused".to_string(),
                ))),
            }
        }

        fn description(&self) -> &str {
            "scripted"
        }
    }

    fn ok(cpu: f64, delay_ms: u64) -> Step {
        Step {
            delay: Duration::from_millis(delay_ms),
            cpu: Some(cpu),
        }
    }

    fn fail() -> Step {
        Step {
            delay: Duration::ZERO,
            cpu: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_fetch_fires_immediately() {
        let fetcher = ScriptedFetcher::new(vec![ok(12.5, 0)], None);
        let handle = Poller::new(fetcher.clone(), Duration::from_secs(60)).spawn();
        let mut rx = handle.subscribe();

        assert!(rx.borrow().loading);
        rx.changed().await.unwrap();

        let state = handle.state();
        assert!(!state.loading);
        assert_eq!(state.revision, 1);
        assert_eq!(state.cpu.latest().unwrap().value, 12.5);
        assert_eq!(handle.description(), "scripted");

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_at_fixed_interval() {
        let fetcher = ScriptedFetcher::new(vec![], Some(1.0));
        let handle = Poller::new(fetcher.clone(), Duration::from_secs(60)).spawn();

        tokio::time::sleep(Duration::from_secs(150)).await;

        // Ticks at 0s, 60s, 120s
        assert_eq!(fetcher.calls(), 3);
        assert_eq!(handle.state().cpu.len(), 3);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_outcome_is_discarded() {
        let fetcher = ScriptedFetcher::new(vec![ok(1.0, 5_000), ok(2.0, 1_000)], None);
        let handle = Poller::new(fetcher.clone(), Duration::from_secs(3600)).spawn();

        // Let fetch 1 start before issuing fetch 2
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(fetcher.calls(), 1);
        handle.refresh_now();

        tokio::time::sleep(Duration::from_secs(6)).await;

        let state = handle.state();
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(state.revision, 1);
        let cpu: Vec<f64> = state.cpu.iter().map(|p| p.value).collect();
        assert_eq!(cpu, vec![2.0]);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_sets_error_and_next_success_clears_it() {
        let fetcher = ScriptedFetcher::new(vec![ok(1.0, 0), fail(), ok(3.0, 0)], None);
        let handle = Poller::new(fetcher.clone(), Duration::from_secs(10)).spawn();

        tokio::time::sleep(Duration::from_secs(15)).await;
        let failed = handle.state();
        assert!(failed.error.as_deref().unwrap().contains("connection refused"));
        assert_eq!(failed.cpu.len(), 1);
        assert!(!failed.loading);

        tokio::time::sleep(Duration::from_secs(10)).await;
        let recovered = handle.state();
        assert!(recovered.error.is_none());
        assert_eq!(recovered.cpu.len(), 2);
        assert_eq!(recovered.consecutive_failures, 0);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_exponential_policy_backs_off_while_failing() {
        let fetcher = ScriptedFetcher::new(vec![], None);
        let handle = Poller::new(fetcher.clone(), Duration::from_secs(10))
            .retry(RetryPolicy::Exponential {
                max_interval: Duration::from_secs(40),
            })
            .spawn();

        tokio::time::sleep(Duration::from_secs(65)).await;

        // Ticks at 0s, 20s, 60s
        assert_eq!(fetcher.calls(), 3);
        assert_eq!(handle.state().consecutive_failures, 3);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_resets_after_success() {
        let fetcher = ScriptedFetcher::new(vec![fail(), fail(), ok(1.0, 0)], Some(2.0));
        let handle = Poller::new(fetcher.clone(), Duration::from_secs(10))
            .retry(RetryPolicy::Exponential {
                max_interval: Duration::from_secs(600),
            })
            .spawn();

        // Failures at 0s and 20s, success at 60s, then every 10s
        tokio::time::sleep(Duration::from_secs(85)).await;
        assert_eq!(fetcher.calls(), 5);
        assert_eq!(handle.state().cpu.len(), 3);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_now_keeps_schedule() {
        let fetcher = ScriptedFetcher::new(vec![], Some(1.0));
        let handle = Poller::new(fetcher.clone(), Duration::from_secs(60)).spawn();

        tokio::time::sleep(Duration::from_secs(30)).await;
        handle.refresh_now();
        tokio::time::sleep(Duration::from_secs(35)).await;

        // 0s, refresh at 30s, scheduled tick at 60s
        assert_eq!(fetcher.calls(), 3);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_discards_in_flight_fetches() {
        let fetcher = ScriptedFetcher::new(vec![ok(1.0, 5_000)], None);
        let handle = Poller::new(fetcher.clone(), Duration::from_secs(60)).spawn();
        let rx = handle.subscribe();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(fetcher.calls(), 1);

        handle.shutdown().await;
        tokio::time::sleep(Duration::from_secs(10)).await;

        let state = rx.borrow().clone();
        assert_eq!(state.revision, 0);
        assert!(state.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_polling() {
        let fetcher = ScriptedFetcher::new(vec![], Some(1.0));
        let handle = Poller::new(fetcher.clone(), Duration::from_secs(10)).spawn();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fetcher.calls(), 1);
        drop(handle);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_bounds_published_buffers() {
        let fetcher = ScriptedFetcher::new(vec![], Some(1.0));
        let handle = Poller::new(fetcher.clone(), Duration::from_secs(1))
            .capacity(5)
            .spawn();

        tokio::time::sleep(Duration::from_millis(9_500)).await;
        let state = handle.state();
        assert_eq!(fetcher.calls(), 10);
        assert_eq!(state.cpu.len(), 5);
        assert_eq!(state.capacity(), 5);

        handle.shutdown().await;
    }
}

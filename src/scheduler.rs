use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::error::TrackerError;

type Cycle = dyn Fn() -> BoxFuture<'static, Result<(), TrackerError>> + Send + Sync;

/// Drives one orchestration cycle on a fixed interval.
///
/// A tick that would overlap a still-running cycle is skipped, never
/// queued; skips are counted and logged. A failing cycle is contained to
/// that cycle. `stop` waits for any in-flight cycle to finish.
pub struct Scheduler {
    interval: Duration,
    cycle: Arc<Cycle>,

    inflight: Arc<Mutex<()>>,
    skipped: Arc<AtomicU64>,
    completed: Arc<AtomicU64>,

    shutdown: Option<watch::Sender<bool>>,
    handle: Option<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new<F>(interval: Duration, cycle: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, Result<(), TrackerError>> + Send + Sync + 'static,
    {
        Self {
            interval,
            cycle: Arc::new(cycle),
            inflight: Arc::new(Mutex::new(())),
            skipped: Arc::new(AtomicU64::new(0)),
            completed: Arc::new(AtomicU64::new(0)),
            shutdown: None,
            handle: None,
        }
    }

    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }

        let (tx, mut rx) = watch::channel(false);
        let interval = self.interval;
        let cycle = self.cycle.clone();
        let inflight = self.inflight.clone();
        let skipped = self.skipped.clone();
        let completed = self.completed.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        // The guard travels into the cycle task, so a slow
                        // cycle keeps it held across later ticks.
                        let guard = match inflight.clone().try_lock_owned() {
                            Ok(g) => g,
                            Err(_) => {
                                let n = skipped.fetch_add(1, Ordering::Relaxed) + 1;
                                tracing::warn!(skipped_total = n, "previous cycle still running, skipping tick");
                                continue;
                            }
                        };

                        let cycle = cycle.clone();
                        let completed = completed.clone();

                        tokio::spawn(async move {
                            let _guard = guard;
                            if let Err(e) = (cycle)().await {
                                tracing::error!("cycle failed: {e}");
                            }
                            completed.fetch_add(1, Ordering::Relaxed);
                        });
                    }
                    res = rx.changed() => {
                        if res.is_err() || *rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        self.shutdown = Some(tx);
        self.handle = Some(handle);
    }

    /// Stop ticking and wait for the in-flight cycle, if any, to finish.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(true);
        }

        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }

        // Draining the in-flight guard is what makes stop wait out a
        // running cycle instead of abandoning it mid-transition.
        let _inflight = self.inflight.lock().await;
    }

    pub fn skipped_ticks(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    pub fn completed_cycles(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use futures_util::FutureExt;

    use super::Scheduler;
    use crate::error::TrackerError;

    #[tokio::test]
    async fn ticks_that_would_overlap_are_skipped() {
        let runs = Arc::new(AtomicU64::new(0));
        let runs2 = runs.clone();

        let mut sched = Scheduler::new(Duration::from_millis(10), move || {
            let runs = runs2.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(40)).await;
                runs.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            .boxed()
        });

        sched.start();
        tokio::time::sleep(Duration::from_millis(100)).await;
        sched.stop().await;

        // each 40ms cycle spans several 10ms ticks
        assert!(sched.skipped_ticks() >= 1);
        assert!(runs.load(Ordering::Relaxed) >= 1);
        // skipped ticks never queue extra runs
        assert_eq!(runs.load(Ordering::Relaxed), sched.completed_cycles());
    }

    #[tokio::test]
    async fn stop_waits_for_the_inflight_cycle() {
        let finished = Arc::new(AtomicU64::new(0));
        let finished2 = finished.clone();

        let mut sched = Scheduler::new(Duration::from_millis(5), move || {
            let finished = finished2.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(30)).await;
                finished.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            .boxed()
        });

        sched.start();
        // first cycle starts immediately and is still asleep here
        tokio::time::sleep(Duration::from_millis(10)).await;
        sched.stop().await;

        assert!(finished.load(Ordering::Relaxed) >= 1);
        assert_eq!(finished.load(Ordering::Relaxed), sched.completed_cycles());
    }

    #[tokio::test]
    async fn a_failing_cycle_does_not_stop_later_ticks() {
        let attempts = Arc::new(AtomicU64::new(0));
        let attempts2 = attempts.clone();

        let mut sched = Scheduler::new(Duration::from_millis(10), move || {
            let attempts = attempts2.clone();
            async move {
                attempts.fetch_add(1, Ordering::Relaxed);
                Err(TrackerError::PriceFetch("provider down".to_string()))
            }
            .boxed()
        });

        sched.start();
        tokio::time::sleep(Duration::from_millis(55)).await;
        sched.stop().await;

        // failures are contained per cycle and never leak the guard
        assert!(attempts.load(Ordering::Relaxed) >= 2);
    }
}

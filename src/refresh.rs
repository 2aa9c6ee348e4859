//! Periodic snapshot refresh with at-most-one fetch in flight.
//!
//! A single driver task owns the fetcher. Interval ticks and on-demand
//! requests (link activations) funnel into the same sequential loop, so a
//! new fetch can never start while one is outstanding; a burst of queued
//! requests coalesces into one fetch of the shared document.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::app::AppEvent;
use crate::config::Config;
use crate::logging::{json_log, log, obj, v_str, Domain, Level};
use crate::model::DataSnapshot;

#[async_trait::async_trait]
pub trait SnapshotFetcher: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<DataSnapshot>;
}

/// Fetches the full snapshot document over HTTP.
pub struct HttpFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpFetcher {
    pub fn new(cfg: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: cfg.data_url(),
        }
    }
}

#[async_trait::async_trait]
impl SnapshotFetcher for HttpFetcher {
    async fn fetch_snapshot(&self) -> Result<DataSnapshot> {
        let resp = self.client.get(&self.url).send().await?;
        let resp = resp.error_for_status()?;
        Ok(resp.json().await?)
    }
}

/// Drive periodic and on-demand refreshes until the app shuts down.
///
/// The first interval tick fires immediately, which covers the initial
/// load. Failures keep the previous snapshot in place on the app side and
/// never stop the loop.
pub async fn run_refresh_loop(
    fetcher: Arc<dyn SnapshotFetcher>,
    refresh_secs: u64,
    mut requests: mpsc::Receiver<()>,
    events: mpsc::Sender<AppEvent>,
) {
    let mut ticker = interval(Duration::from_secs(refresh_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            request = requests.recv() => {
                if request.is_none() {
                    break;
                }
            }
        }

        // Coalesce any requests queued while we were waiting; the fetch
        // returns the whole document, so one round trip serves them all.
        while requests.try_recv().is_ok() {}

        let event = match fetcher.fetch_snapshot().await {
            Ok(data) => {
                json_log(Domain::Refresh, "fetched", obj(&[]));
                AppEvent::SnapshotReplaced { data }
            }
            Err(err) => {
                log(
                    Level::Warn,
                    Domain::Refresh,
                    "fetch_failed",
                    obj(&[("error", v_str(&err.to_string()))]),
                );
                AppEvent::RefreshFailed {
                    error: err.to_string(),
                }
            }
        };

        if events.send(event).await.is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct SlowCountingFetcher {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        fetches: AtomicUsize,
    }

    impl SlowCountingFetcher {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                fetches: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl SnapshotFetcher for SlowCountingFetcher {
        async fn fetch_snapshot(&self) -> Result<DataSnapshot> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(DataSnapshot::default())
        }
    }

    struct FailingFetcher;

    #[async_trait::async_trait]
    impl SnapshotFetcher for FailingFetcher {
        async fn fetch_snapshot(&self) -> Result<DataSnapshot> {
            Err(anyhow!("connection refused"))
        }
    }

    #[tokio::test]
    async fn overlapping_requests_never_overlap_fetches() {
        let fetcher = Arc::new(SlowCountingFetcher::new());
        let (request_tx, request_rx) = mpsc::channel(16);
        let (event_tx, mut event_rx) = mpsc::channel(16);

        let driver = tokio::spawn(run_refresh_loop(
            fetcher.clone(),
            3600, // effectively: on-demand only after the immediate first tick
            request_rx,
            event_tx,
        ));

        // Wait out the immediate first tick's fetch.
        assert!(matches!(
            event_rx.recv().await,
            Some(AppEvent::SnapshotReplaced { .. })
        ));

        // A burst of clicks while the driver is idle coalesces into one
        // fetch; none of them can overlap an outstanding one.
        for _ in 0..5 {
            request_tx.send(()).await.unwrap();
        }
        assert!(matches!(
            event_rx.recv().await,
            Some(AppEvent::SnapshotReplaced { .. })
        ));

        drop(request_tx);
        driver.await.unwrap();

        assert_eq!(fetcher.max_in_flight.load(Ordering::SeqCst), 1);
        assert!(fetcher.fetches.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn failures_surface_as_events_and_the_loop_continues() {
        let (request_tx, request_rx) = mpsc::channel(16);
        let (event_tx, mut event_rx) = mpsc::channel(16);

        let driver = tokio::spawn(run_refresh_loop(
            Arc::new(FailingFetcher),
            3600,
            request_rx,
            event_tx,
        ));

        // Immediate first tick fails, then an on-demand attempt fails too;
        // the loop keeps serving requests after each failure.
        assert!(matches!(
            event_rx.recv().await,
            Some(AppEvent::RefreshFailed { .. })
        ));
        request_tx.send(()).await.unwrap();
        assert!(matches!(
            event_rx.recv().await,
            Some(AppEvent::RefreshFailed { .. })
        ));

        drop(request_tx);
        driver.await.unwrap();
    }
}

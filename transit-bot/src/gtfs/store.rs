//! Shared, hot-swappable transit data.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::error::GtfsError;
use super::load::{fingerprint, load_snapshot};
use super::snapshot::TransitSnapshot;

/// Default interval between checks for a changed feed.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Shortest poll interval the watcher will use.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Where the GTFS feed lives and how often to look for changes.
#[derive(Debug, Clone)]
pub struct GtfsConfig {
    /// Directory containing `stops.txt`, `routes.txt` and `calendar_dates.txt`.
    pub dir: PathBuf,
    pub poll_interval: Duration,
}

impl GtfsConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set a custom poll interval, no shorter than 10ms.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }
}

impl Default for GtfsConfig {
    fn default() -> Self {
        Self::new("gtfs")
    }
}

/// Thread-safe handle to the current transit snapshot.
///
/// Readers clone the inner `Arc` and release the lock immediately, so a
/// request keeps a consistent snapshot for its whole lifetime even if a
/// reload lands halfway through. Writers only hold the lock for the pointer
/// swap; parsing happens before it is taken.
#[derive(Clone)]
pub struct TransitData {
    current: Arc<RwLock<Arc<TransitSnapshot>>>,
    config: GtfsConfig,
}

impl TransitData {
    /// Wrap an already-built snapshot.
    pub fn new(snapshot: TransitSnapshot, config: GtfsConfig) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
            config,
        }
    }

    /// Load the feed from disk.
    ///
    /// This fails if the required files are missing or unreadable.
    pub async fn load(config: GtfsConfig) -> Result<Self, GtfsError> {
        let snapshot = load_blocking(config.dir.clone()).await?;
        Ok(Self::new(snapshot, config))
    }

    /// The current snapshot.
    pub async fn snapshot(&self) -> Arc<TransitSnapshot> {
        let guard = self.current.read().await;
        Arc::clone(&guard)
    }

    /// Publish a new snapshot.
    pub async fn replace(&self, snapshot: TransitSnapshot) {
        let snapshot = Arc::new(snapshot);
        let mut guard = self.current.write().await;
        *guard = snapshot;
    }

    /// Reload the feed from disk.
    ///
    /// On success, replaces the current snapshot and returns the stop count.
    /// On failure, the existing snapshot is preserved and the error returned.
    pub async fn reload(&self) -> Result<usize, GtfsError> {
        let snapshot = load_blocking(self.config.dir.clone()).await?;
        let count = snapshot.stops().len();
        self.replace(snapshot).await;
        Ok(count)
    }

    /// Spawn a task that reloads whenever the feed files change on disk.
    pub fn watch(&self) -> JoinHandle<()> {
        let data = self.clone();
        tokio::spawn(async move {
            let dir = data.config.dir.clone();
            let mut last_seen = fingerprint(&dir);
            let mut interval = tokio::time::interval(data.config.poll_interval.max(MIN_POLL_INTERVAL));
            interval.tick().await; // First tick is immediate, skip it
            loop {
                interval.tick().await;
                let seen = fingerprint(&dir);
                if seen == last_seen {
                    continue;
                }
                last_seen = seen;
                match data.reload().await {
                    Ok(count) => info!(stops = count, dir = %dir.display(), "reloaded GTFS feed"),
                    Err(e) => warn!(error = %e, "failed to reload GTFS feed, keeping previous data"),
                }
            }
        })
    }
}

async fn load_blocking(dir: PathBuf) -> Result<TransitSnapshot, GtfsError> {
    tokio::task::spawn_blocking(move || load_snapshot(&dir))
        .await
        .map_err(|e| GtfsError::Task(e.to_string()))?
}

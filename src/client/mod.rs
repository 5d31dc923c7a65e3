//! Core lifecycle client implementation split into focused submodules.
//!
//! The `VideoDlClient` struct and its methods are organized by concern:
//! - [`formats`] - Format probing and the transient selection
//! - [`submit`] - Download submission
//! - [`poller`] - Per-job status polling
//! - [`history`] - Full-history refresh
//! - [`retrieve`] - File retrieval and local save

mod formats;
mod history;
mod poller;
mod retrieve;
mod submit;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use crate::config::Config;
use crate::error::Result;
use crate::notifications::NotificationCenter;
use crate::remote::RemoteApi;
use crate::store::JobStore;
use crate::types::{Event, FormatSelection, JobId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// One running status poller: its cancellation token and its task
pub(crate) struct PollerHandle {
    pub(crate) cancel: CancellationToken,
    pub(crate) task: tokio::task::JoinHandle<()>,
}

/// Registry of running status pollers, one entry per in-flight job
#[derive(Clone)]
pub(crate) struct PollerRegistry {
    inner: Arc<tokio::sync::Mutex<HashMap<JobId, PollerHandle>>>,
}

impl PollerRegistry {
    fn new() -> Self {
        Self {
            inner: Arc::new(tokio::sync::Mutex::new(HashMap::new())),
        }
    }

    pub(crate) async fn insert(&self, id: JobId, handle: PollerHandle) {
        self.inner.lock().await.insert(id, handle);
    }

    /// Remove one poller entry. Pollers call this on the same transition that
    /// exits their loop, so the timer is released exactly once.
    pub(crate) async fn remove(&self, id: &JobId) -> Option<PollerHandle> {
        self.inner.lock().await.remove(id)
    }

    pub(crate) async fn contains(&self, id: &JobId) -> bool {
        self.inner.lock().await.contains_key(id)
    }

    pub(crate) async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Take every entry out of the registry (shutdown path). The lock is not
    /// held afterwards, so pollers draining themselves cannot deadlock.
    pub(crate) async fn drain(&self) -> Vec<(JobId, PollerHandle)> {
        std::mem::take(&mut *self.inner.lock().await)
            .into_iter()
            .collect()
    }
}

/// The download lifecycle client (cloneable - all fields are Arc-wrapped)
///
/// Owns the job list store, the notification center, the event channel, and
/// one status poller per in-flight job. All heavy lifting happens in the
/// remote job API; this client submits work, watches it, and reconciles the
/// results into local state for a frontend to render.
#[derive(Clone)]
pub struct VideoDlClient {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Typed client for the remote job API
    pub(crate) remote: RemoteApi,
    /// The shared job list
    pub(crate) store: JobStore,
    /// Transient user-visible notifications
    pub(crate) notifications: NotificationCenter,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: broadcast::Sender<Event>,
    /// Running status pollers, one per in-flight job
    pub(crate) pollers: PollerRegistry,
    /// The transient format selection between a probe and a submission
    pub(crate) selection: Arc<RwLock<Option<FormatSelection>>>,
    /// Whether new submissions are accepted (set to false during shutdown)
    pub(crate) accepting_new: Arc<AtomicBool>,
}

impl VideoDlClient {
    /// Create a client for the configured remote API
    ///
    /// Validates the configuration and builds the shared HTTP client. No
    /// request is issued until an operation is called.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let remote = RemoteApi::new(&config.remote)?;
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let notifications =
            NotificationCenter::new(config.notifications.dismiss_after, event_tx.clone());

        Ok(Self {
            config: Arc::new(config),
            remote,
            store: JobStore::new(),
            notifications,
            event_tx,
            pollers: PollerRegistry::new(),
            selection: Arc::new(RwLock::new(None)),
            accepting_new: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Cloneable handle to the job list store
    pub fn store(&self) -> JobStore {
        self.store.clone()
    }

    /// Cloneable handle to the notification center
    pub fn notifications(&self) -> NotificationCenter {
        self.notifications.clone()
    }

    /// The client's configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether a status poller is currently running for the given job
    pub async fn is_polling(&self, id: &JobId) -> bool {
        self.pollers.contains(id).await
    }

    /// Number of currently running status pollers
    pub async fn active_poller_count(&self) -> usize {
        self.pollers.len().await
    }

    /// Stop accepting submissions, cancel every running poller, and wait for
    /// their tasks to finish
    ///
    /// When this returns, no poll request is in flight and none will be
    /// issued again. Further submissions fail with
    /// [`Error::ShuttingDown`](crate::Error::ShuttingDown).
    pub async fn shutdown(&self) {
        self.accepting_new.store(false, Ordering::SeqCst);

        let drained = self.pollers.drain().await;
        if drained.is_empty() {
            return;
        }
        tracing::info!(pollers = drained.len(), "shutting down status pollers");

        let mut tasks = Vec::with_capacity(drained.len());
        for (_, handle) in drained {
            handle.cancel.cancel();
            tasks.push(handle.task);
        }
        futures::future::join_all(tasks).await;
    }

    pub(crate) fn accepting_new(&self) -> bool {
        self.accepting_new.load(Ordering::SeqCst)
    }

    pub(crate) fn read_selection(&self) -> Option<FormatSelection> {
        self.selection
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn write_selection(&self, value: Option<FormatSelection>) {
        *self
            .selection
            .write()
            .unwrap_or_else(PoisonError::into_inner) = value;
    }

    pub(crate) fn emit(&self, event: Event) {
        self.event_tx.send(event).ok();
    }
}

impl std::fmt::Debug for VideoDlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoDlClient")
            .field("jobs", &self.store.len())
            .field("accepting_new", &self.accepting_new())
            .finish_non_exhaustive()
    }
}

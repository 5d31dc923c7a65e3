//! Per-job status polling.
//!
//! Each in-flight job gets its own spawned task that issues one status
//! request per fixed interval until the job reaches a terminal state, the
//! configured failure tolerance is consumed, or the client shuts down. A
//! poller mutates only its own job's store entry; pollers for different jobs
//! interleave freely and independently.

use crate::config::PollFailureAction;
use crate::notifications::NotificationKind;
use crate::store::MergeOutcome;
use crate::types::{Event, JobId, Status, StopReason};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::{PollerHandle, VideoDlClient};

impl VideoDlClient {
    /// Spawn the status poller for a freshly submitted job
    pub(crate) async fn start_poller(&self, id: JobId) {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(poll_job(self.clone(), id.clone(), cancel.clone()));
        self.pollers.insert(id, PollerHandle { cancel, task }).await;
    }
}

/// The poller loop for one job.
///
/// Request N+1 is never issued before request N's result is processed: the
/// ticker fires inside the same loop that awaits the request, and missed
/// ticks are delayed rather than bursted. Stopping releases the loop, the
/// registry entry, and the cancellation token on the same transition.
async fn poll_job(client: VideoDlClient, id: JobId, cancel: CancellationToken) {
    let tolerated_failures = match client.config.polling.on_transport_error {
        PollFailureAction::Stop => 0,
        PollFailureAction::Tolerate {
            max_consecutive_failures,
        } => max_consecutive_failures,
    };
    let mut consecutive_failures: u32 = 0;

    let mut ticker = tokio::time::interval(client.config.polling.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // consume the immediate first tick so the first poll fires one full
    // interval after submission
    ticker.tick().await;

    let reason = loop {
        tokio::select! {
            _ = cancel.cancelled() => break StopReason::Shutdown,
            _ = ticker.tick() => {}
        }

        match client.remote.job_status(&id).await {
            Ok(report) => {
                consecutive_failures = 0;
                match client.store.apply_status(&id, &report) {
                    MergeOutcome::Updated { status, progress } => match status {
                        Status::Completed => {
                            client.emit(Event::JobCompleted { id: id.clone() });
                            client.notifications.post(
                                NotificationKind::Success,
                                "Download completed successfully!",
                            );
                            break StopReason::Completed;
                        }
                        Status::Failed => {
                            client.emit(Event::JobFailed { id: id.clone() });
                            client
                                .notifications
                                .post(NotificationKind::Error, "Download failed");
                            break StopReason::Failed;
                        }
                        Status::Pending | Status::Downloading => {
                            client.emit(Event::JobProgress {
                                id: id.clone(),
                                status,
                                percent: progress,
                            });
                        }
                    },
                    // a stale (backward) report is dropped but the job is
                    // still live; keep polling
                    MergeOutcome::Stale => {
                        tracing::debug!(job_id = %id, "dropped stale status report");
                    }
                    MergeOutcome::AlreadyTerminal | MergeOutcome::NotFound => {
                        break StopReason::StoreRefused;
                    }
                }
            }
            Err(e) => {
                consecutive_failures += 1;
                tracing::warn!(
                    job_id = %id,
                    error = %e,
                    consecutive_failures,
                    "status poll failed"
                );
                if consecutive_failures > tolerated_failures {
                    client.notifications.post(
                        NotificationKind::Error,
                        format!("Stopped monitoring download {id}"),
                    );
                    break StopReason::TransportError;
                }
            }
        }
    };

    client.emit(Event::PollingStopped {
        id: id.clone(),
        reason,
    });
    client.pollers.remove(&id).await;
    tracing::info!(job_id = %id, reason = ?reason, "status poller stopped");
}

//! Download submission.

use crate::error::{Error, Result};
use crate::notifications::NotificationKind;
use crate::types::{Event, Job, JobId};

use super::VideoDlClient;

impl VideoDlClient {
    /// Request creation of a new download job for a source URL and a chosen
    /// format
    ///
    /// An empty (after trimming) source URL or format id is a no-op, not an
    /// error: `Ok(None)` is returned and no request is issued, since a format
    /// must have been resolved and chosen first. On success the new job enters the
    /// store head as pending with zero progress and its status poller starts
    /// immediately. On failure no job is added.
    ///
    /// Exactly one outbound request per invocation; no retries.
    pub async fn submit(&self, source_url: &str, format_id: &str) -> Result<Option<JobId>> {
        if !self.accepting_new() {
            return Err(Error::ShuttingDown);
        }

        let source_url = source_url.trim();
        let format_id = format_id.trim();
        if source_url.is_empty() || format_id.is_empty() {
            return Ok(None);
        }

        match self.remote.create_download(source_url, Some(format_id)).await {
            Ok(id) => {
                // carry the probed title onto the job when it is for this URL
                let title = self
                    .read_selection()
                    .filter(|s| s.source_url == source_url)
                    .map(|s| s.title);

                let job = Job::submitted(
                    id.clone(),
                    source_url,
                    title.clone(),
                    Some(format_id.to_string()),
                );
                self.store.prepend(job);
                self.emit(Event::JobQueued {
                    id: id.clone(),
                    title,
                });

                self.start_poller(id.clone()).await;

                self.notifications
                    .post(NotificationKind::Success, "Download started successfully!");
                tracing::info!(job_id = %id, source_url = %source_url, format = %format_id, "download submitted");

                Ok(Some(id))
            }
            Err(e) => {
                self.notifications
                    .post(NotificationKind::Error, "Failed to start download");
                tracing::warn!(source_url = %source_url, error = %e, "submission failed");
                Err(e.into())
            }
        }
    }

    /// Submit the current format selection, clearing it on success
    ///
    /// A no-op (`Ok(None)`) when nothing is selected.
    pub async fn submit_selected(&self) -> Result<Option<JobId>> {
        let Some(selection) = self.read_selection() else {
            return Ok(None);
        };
        let Some(chosen) = selection.chosen else {
            return Ok(None);
        };

        let result = self.submit(&selection.source_url, &chosen).await;
        if matches!(result, Ok(Some(_))) {
            self.clear_selection();
        }
        result
    }
}

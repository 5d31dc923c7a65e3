//! Full-history refresh.

use crate::error::Result;
use crate::notifications::NotificationKind;
use crate::types::Event;

use super::VideoDlClient;

impl VideoDlClient {
    /// Fetch the remote's full download history and replace the store with it
    ///
    /// This is the only way entries ever leave the store. Frontends call it
    /// on startup and behind a refresh control. On failure the store is left
    /// untouched.
    pub async fn refresh_downloads(&self) -> Result<usize> {
        match self.remote.list_downloads().await {
            Ok(jobs) => {
                let count = jobs.len();
                self.store.replace_all(jobs);
                self.emit(Event::HistoryRefreshed { count });
                tracing::info!(count, "download history refreshed");
                Ok(count)
            }
            Err(e) => {
                self.notifications
                    .post(NotificationKind::Error, "Failed to load downloads");
                tracing::warn!(error = %e, "history refresh failed");
                Err(e.into())
            }
        }
    }
}

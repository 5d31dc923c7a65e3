//! File retrieval and local save.

use crate::error::{Result, RetrieveError};
use crate::notifications::NotificationKind;
use crate::types::{Event, JobId, Status};
use crate::utils::{get_unique_path, sanitize_filename};
use std::path::{Path, PathBuf};

use super::VideoDlClient;

impl VideoDlClient {
    /// Fetch a completed job's file and save it under the suggested name
    ///
    /// The job must be known to the store and completed. The payload is
    /// written through a scoped part-file that is deleted on every failure
    /// path and only renamed into place on success, so no partial file is
    /// ever left referenced. Name collisions are resolved per the configured
    /// [`FileCollisionAction`](crate::config::FileCollisionAction). Returns
    /// the final saved path.
    pub async fn retrieve_file(&self, id: &JobId, suggested_filename: &str) -> Result<PathBuf> {
        let result = self.fetch_and_save(id, suggested_filename).await;
        match &result {
            Ok(path) => {
                self.emit(Event::FileSaved {
                    id: id.clone(),
                    path: path.clone(),
                });
                self.notifications
                    .post(NotificationKind::Success, "File saved successfully!");
                tracing::info!(job_id = %id, path = %path.display(), "file saved");
            }
            Err(e) => {
                self.notifications
                    .post(NotificationKind::Error, "Could not save the file");
                tracing::warn!(job_id = %id, error = %e, "file retrieval failed");
            }
        }
        result.map_err(Into::into)
    }

    async fn fetch_and_save(
        &self,
        id: &JobId,
        suggested_filename: &str,
    ) -> std::result::Result<PathBuf, RetrieveError> {
        let job = self
            .store
            .get(id)
            .ok_or_else(|| RetrieveError::UnknownJob(id.clone()))?;
        if job.status != Status::Completed {
            return Err(RetrieveError::NotCompleted {
                id: id.clone(),
                status: job.status,
            });
        }

        let name =
            sanitize_filename(suggested_filename).ok_or_else(|| RetrieveError::InvalidFilename {
                name: suggested_filename.to_string(),
            })?;

        let payload = self.remote.fetch_file(id).await?;

        let save_dir = &self.config.retrieval.save_dir;
        tokio::fs::create_dir_all(save_dir).await?;

        let part = PartFile::write(save_dir.join(format!(".{name}.part")), &payload).await?;
        let target = get_unique_path(&save_dir.join(&name), self.config.retrieval.file_collision)?;
        part.persist(&target).await?;

        Ok(target)
    }
}

/// Scoped part-file: removed on drop unless persisted into place.
struct PartFile {
    path: Option<PathBuf>,
}

impl PartFile {
    async fn write(path: PathBuf, payload: &[u8]) -> std::io::Result<Self> {
        // arm the guard first so a half-written file is removed as well
        let part = Self {
            path: Some(path.clone()),
        };
        tokio::fs::write(&path, payload).await?;
        Ok(part)
    }

    async fn persist(mut self, target: &Path) -> std::io::Result<()> {
        if let Some(path) = &self.path {
            tokio::fs::rename(path, target).await?;
            self.path = None;
        }
        Ok(())
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::debug!(path = %path.display(), error = %e, "failed to remove part file");
            }
        }
    }
}

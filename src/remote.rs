//! Typed client for the remote job API
//!
//! The remote API is the external collaborator that does the actual video
//! fetching, format probing, transcoding, and storage. Each method here maps
//! to exactly one endpoint and issues exactly one outbound request. Retry
//! decisions belong to the callers, and the only sanctioned retry is the
//! fixed-interval status poll itself.

use crate::config::RemoteConfig;
use crate::error::{Error, FormatError, HistoryError, PollError, RetrieveError, SubmitError};
use crate::types::{FormatProbe, Job, JobId, StatusReport};
use serde::{Deserialize, Serialize};

/// HTTP client bound to one remote job API
#[derive(Clone, Debug)]
pub struct RemoteApi {
    http: reqwest::Client,
    base: String,
}

#[derive(Debug, Serialize)]
struct CreateDownloadRequest<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CreateDownloadResponse {
    download_id: JobId,
}

impl RemoteApi {
    /// Build a client for the configured remote
    pub fn new(config: &RemoteConfig) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder().timeout(config.request_timeout);
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let http = builder.build().map_err(|e| Error::Config {
            message: format!("failed to build HTTP client: {e}"),
            key: Some("remote".to_string()),
        })?;

        Ok(Self {
            http,
            base: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `GET /downloads`: the remote's full job history, newest first
    pub async fn list_downloads(&self) -> Result<Vec<Job>, HistoryError> {
        let url = format!("{}/downloads", self.base);
        tracing::debug!(url = %url, "fetching download history");

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(HistoryError::Rejected {
                status: response.status(),
            });
        }
        Ok(response.json().await?)
    }

    /// `GET /formats/{urlEncoded(sourceUrl)}`: available encoding variants
    pub async fn probe_formats(&self, source_url: &str) -> Result<FormatProbe, FormatError> {
        let url = format!("{}/formats/{}", self.base, urlencoding::encode(source_url));
        tracing::debug!(url = %url, "probing formats");

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FormatError::Rejected {
                status: response.status(),
            });
        }
        Ok(response.json().await?)
    }

    /// `POST /download`: request creation of a new download job
    pub async fn create_download(
        &self,
        source_url: &str,
        format_id: Option<&str>,
    ) -> Result<JobId, SubmitError> {
        let url = format!("{}/download", self.base);
        tracing::debug!(url = %url, source_url = %source_url, format = ?format_id, "submitting download");

        let response = self
            .http
            .post(&url)
            .json(&CreateDownloadRequest {
                url: source_url,
                format: format_id,
            })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SubmitError::Rejected {
                status: response.status(),
            });
        }
        let body: CreateDownloadResponse = response.json().await?;
        Ok(body.download_id)
    }

    /// `GET /status/{id}`: one status report for a job
    pub async fn job_status(&self, id: &JobId) -> Result<StatusReport, PollError> {
        let url = format!("{}/status/{}", self.base, id);
        tracing::debug!(url = %url, "polling status");

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(PollError::Rejected {
                status: response.status(),
            });
        }
        Ok(response.json().await?)
    }

    /// `GET /download/{id}/file`: the full binary payload of a completed job
    pub async fn fetch_file(&self, id: &JobId) -> Result<Vec<u8>, RetrieveError> {
        let url = format!("{}/download/{}/file", self.base, id);
        tracing::debug!(url = %url, "fetching file payload");

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(RetrieveError::Rejected {
                status: response.status(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

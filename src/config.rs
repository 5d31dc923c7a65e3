//! Configuration types for video-dl-client

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Remote job API configuration
///
/// The remote API is the external collaborator that does the actual video
/// fetching, format probing, transcoding, and storage. This client only
/// talks to it over HTTP.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the remote job API (default: "http://127.0.0.1:8000")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// User-Agent header sent with every request (None = reqwest default)
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
            user_agent: None,
        }
    }
}

/// Status polling configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Fixed interval between status requests per job (default: 3 seconds)
    #[serde(default = "default_poll_interval", with = "duration_serde")]
    pub interval: Duration,

    /// What a poller does when a status request fails (default: stop)
    #[serde(default)]
    pub on_transport_error: PollFailureAction,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: default_poll_interval(),
            on_transport_error: PollFailureAction::default(),
        }
    }
}

/// Poller behavior on a failed status request
///
/// By default the first transport failure permanently stops that job's
/// monitoring. `Tolerate` keeps polling
/// through a bounded number of consecutive failures; tolerated failures
/// re-poll on the next regular tick, so the fixed-interval contract holds
/// either way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PollFailureAction {
    /// Stop polling on the first failed status request
    #[default]
    Stop,

    /// Keep polling until this many status requests fail in a row
    Tolerate {
        /// Consecutive-failure budget; a successful poll resets it
        max_consecutive_failures: u32,
    },
}

/// Transient notification configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// How long a notification stays active before auto-dismissal
    /// (default: 4 seconds)
    #[serde(default = "default_dismiss_after", with = "duration_serde")]
    pub dismiss_after: Duration,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            dismiss_after: default_dismiss_after(),
        }
    }
}

/// File retrieval configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Directory retrieved files are saved into (default: "./downloads")
    #[serde(default = "default_save_dir")]
    pub save_dir: PathBuf,

    /// File collision handling when the target name already exists
    #[serde(default)]
    pub file_collision: FileCollisionAction,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            save_dir: default_save_dir(),
            file_collision: FileCollisionAction::default(),
        }
    }
}

/// File collision handling
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCollisionAction {
    /// Replace the existing file
    Overwrite,
    /// Fail the retrieval, leaving the existing file untouched
    Skip,
    /// Save under "name (1).ext", "name (2).ext", ... (default)
    #[default]
    Rename,
}

/// Main configuration for [`VideoDlClient`](crate::VideoDlClient)
///
/// Works out of the box with zero configuration against a local remote API:
///
/// ```
/// use video_dl_client::Config;
///
/// let config = Config::default();
/// assert_eq!(config.remote.base_url, "http://127.0.0.1:8000");
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote job API settings
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Status polling settings
    #[serde(default)]
    pub polling: PollingConfig,

    /// Transient notification settings
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// File retrieval settings
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl Config {
    /// Validate the configuration, returning the first problem found
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.remote.base_url).map_err(|e| Error::Config {
            message: format!("invalid base URL {:?}: {e}", self.remote.base_url),
            key: Some("remote.base_url".to_string()),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config {
                message: format!("base URL must be http or https, got {:?}", url.scheme()),
                key: Some("remote.base_url".to_string()),
            });
        }

        if self.remote.request_timeout.is_zero() {
            return Err(Error::Config {
                message: "request timeout must be non-zero".to_string(),
                key: Some("remote.request_timeout".to_string()),
            });
        }

        if self.polling.interval.is_zero() {
            return Err(Error::Config {
                message: "poll interval must be non-zero".to_string(),
                key: Some("polling.interval".to_string()),
            });
        }

        if let PollFailureAction::Tolerate {
            max_consecutive_failures: 0,
        } = self.polling.on_transport_error
        {
            return Err(Error::Config {
                message: "failure tolerance must allow at least one failure".to_string(),
                key: Some("polling.on_transport_error".to_string()),
            });
        }

        if self.retrieval.save_dir.as_os_str().is_empty() {
            return Err(Error::Config {
                message: "save directory must not be empty".to_string(),
                key: Some("retrieval.save_dir".to_string()),
            });
        }

        Ok(())
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(3)
}

fn default_dismiss_after() -> Duration {
    Duration::from_secs(4)
}

fn default_save_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

// Duration serialization helper (seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

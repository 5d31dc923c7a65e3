//! Core types for video-dl-client

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::notifications::NotificationKind;

/// Unique identifier for a download job
///
/// Opaque string assigned by the remote job API. The client never parses or
/// synthesizes these.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Create a JobId from anything string-like
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Download job status as reported by the remote API
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Accepted by the remote, not yet started
    Pending,
    /// Remote is fetching/transcoding
    Downloading,
    /// Finished successfully, file available for retrieval
    Completed,
    /// Failed on the remote ("error" on the wire)
    #[serde(rename = "error")]
    Failed,
}

impl Status {
    /// Whether this status is terminal (no further transitions follow)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Completed | Status::Failed)
    }

    /// Ordering rank along the lifecycle: pending < downloading < terminal.
    /// Used by the store to reject backward transitions.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Status::Pending => 0,
            Status::Downloading => 1,
            Status::Completed | Status::Failed => 2,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Pending => "pending",
            Status::Downloading => "downloading",
            Status::Completed => "completed",
            Status::Failed => "error",
        };
        write!(f, "{s}")
    }
}

/// One requested video download and its lifecycle state
///
/// Created locally when a submission succeeds, or deserialized from the
/// remote's full-history endpoint. Fields the remote supplies beyond the
/// known set are carried verbatim in [`extra`](Job::extra).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Remote-assigned job identifier
    pub id: JobId,

    /// The source video URL this job was submitted for
    #[serde(rename = "url")]
    pub source_url: String,

    /// Display title, when the remote (or a format probe) provided one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// The encoding format chosen at submission time
    #[serde(rename = "format", default, skip_serializing_if = "Option::is_none")]
    pub format_id: Option<String>,

    /// Current lifecycle status
    pub status: Status,

    /// Progress percentage (0-100); only meaningful once status leaves pending
    #[serde(default)]
    pub progress: f32,

    /// Any additional remote-supplied fields, merged verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Job {
    /// Create a freshly submitted job: pending, zero progress
    pub fn submitted(
        id: JobId,
        source_url: impl Into<String>,
        title: Option<String>,
        format_id: Option<String>,
    ) -> Self {
        Self {
            id,
            source_url: source_url.into(),
            title,
            format_id,
            status: Status::Pending,
            progress: 0.0,
            extra: serde_json::Map::new(),
        }
    }
}

/// One available encoding variant for a source URL
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOption {
    /// Remote identifier for this variant, passed back on submission
    pub format_id: String,

    /// File extension of the encoded output (e.g. "mp4", "webm")
    pub ext: String,

    /// Video resolution as "WxH", when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,

    /// Human-readable quality label (e.g. "1080p"), when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_label: Option<String>,
}

/// Result of a format probe: display title plus the ordered variant list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatProbe {
    /// Display title of the source video
    pub title: String,

    /// Available encoding variants, in the remote's preference order
    pub formats: Vec<FormatOption>,
}

/// The transient format selection between a successful probe and submission
///
/// Owned exclusively by the client's current selection; never persisted into
/// a [`Job`]. Cleared on submission, cancellation, or a failed re-probe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatSelection {
    /// The source URL the probe ran against
    pub source_url: String,

    /// Display title returned by the probe
    pub title: String,

    /// Available encoding variants
    pub formats: Vec<FormatOption>,

    /// The chosen variant's format id; defaults to the first variant
    pub chosen: Option<String>,
}

impl FormatSelection {
    /// The currently chosen variant, if any
    pub fn chosen_format(&self) -> Option<&FormatOption> {
        let chosen = self.chosen.as_deref()?;
        self.formats.iter().find(|f| f.format_id == chosen)
    }
}

/// One response body from the status endpoint
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Reported lifecycle status
    pub status: Status,

    /// Reported progress percentage, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f32>,

    /// Any additional remote-supplied fields, merged verbatim into the job
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Why a status poller stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The job reached completed
    Completed,
    /// The job reached error
    Failed,
    /// A transport failure consumed the configured tolerance
    TransportError,
    /// The client shut down
    Shutdown,
    /// The store refused the merge (job missing or already terminal)
    StoreRefused,
}

/// Event emitted during the download lifecycle
///
/// Consumers subscribe via [`VideoDlClient::subscribe`](crate::VideoDlClient::subscribe);
/// no polling of the library is required.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A format probe succeeded and became the current selection
    FormatsResolved {
        /// The probed source URL
        source_url: String,
        /// Display title of the source video
        title: String,
        /// Number of variants returned
        formats: usize,
    },

    /// A submission succeeded and the job entered the store
    JobQueued {
        /// Remote-assigned job id
        id: JobId,
        /// Display title, when known
        title: Option<String>,
    },

    /// A poll merged a non-terminal status report
    JobProgress {
        /// Job id
        id: JobId,
        /// Reported status
        status: Status,
        /// Progress percentage after the merge
        percent: f32,
    },

    /// A job reached completed
    JobCompleted {
        /// Job id
        id: JobId,
    },

    /// A job reached error
    JobFailed {
        /// Job id
        id: JobId,
    },

    /// A status poller stopped and released its timer
    PollingStopped {
        /// Job id
        id: JobId,
        /// Why polling stopped
        reason: StopReason,
    },

    /// The full history was fetched and the store replaced
    HistoryRefreshed {
        /// Number of jobs now in the store
        count: usize,
    },

    /// A retrieved file was persisted to disk
    FileSaved {
        /// Job id
        id: JobId,
        /// Final path of the saved file
        path: PathBuf,
    },

    /// A transient notification was posted
    Notified {
        /// Success or error
        kind: NotificationKind,
        /// Notification text
        message: String,
    },
}

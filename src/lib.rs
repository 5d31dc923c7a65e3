//! # video-dl-client
//!
//! Embeddable lifecycle client for remote video fetch/transcode services.
//!
//! All actual video fetching, format probing, transcoding, and storage
//! happens in a remote HTTP job API. This crate is the client side of that
//! collaboration: it submits download jobs, polls each one at a fixed
//! interval until a terminal state, and reconciles the results into a local
//! job list that a frontend (CLI, TUI, desktop shell) renders however it
//! likes.
//!
//! ## Design Philosophy
//!
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Sensible defaults** - Works out of the box against a local remote API
//! - **Event-driven** - Consumers subscribe to events, no polling of the
//!   library required
//! - **One poller per job** - Independent fixed-interval tasks that stop,
//!   and release their timers, on the same transition that observes a
//!   terminal state
//!
//! ## Quick Start
//!
//! ```no_run
//! use video_dl_client::{Config, VideoDlClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = VideoDlClient::new(Config::default())?;
//!
//!     // Subscribe to events
//!     let mut events = client.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     // Probe formats, then submit with the default (first) variant
//!     if let Some(selection) = client.resolve_formats("https://example.com/v/abc").await? {
//!         println!("title: {}", selection.title);
//!         client.submit_selected().await?;
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Core lifecycle client (decomposed into focused submodules)
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Transient user-visible notifications
pub mod notifications;
/// Typed client for the remote job API
pub mod remote;
/// In-memory job list store
pub mod store;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use client::VideoDlClient;
pub use config::{
    Config, FileCollisionAction, NotificationConfig, PollFailureAction, PollingConfig,
    RemoteConfig, RetrievalConfig,
};
pub use error::{
    Error, FormatError, HistoryError, PollError, Result, RetrieveError, SubmitError,
};
pub use notifications::{Notification, NotificationCenter, NotificationId, NotificationKind};
pub use remote::RemoteApi;
pub use store::{JobStore, MergeOutcome};
pub use types::{
    Event, FormatOption, FormatProbe, FormatSelection, Job, JobId, Status, StatusReport,
    StopReason,
};

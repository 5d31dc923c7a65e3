//! Basic lifecycle example
//!
//! This example demonstrates the core functionality of video-dl-client:
//! - Configuring the remote job API
//! - Creating a client instance
//! - Subscribing to events
//! - Probing formats and submitting a download
//! - Retrieving the finished file
//!
//! Run against a local remote API:
//!
//! ```sh
//! cargo run --example basic_lifecycle -- https://example.com/watch?v=abc
//! ```

use std::time::Duration;
use video_dl_client::{Config, Event, Status, VideoDlClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let source_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://example.com/watch?v=abc".to_string());

    // Build configuration; defaults target http://127.0.0.1:8000
    let mut config = Config::default();
    if let Ok(base_url) = std::env::var("VIDEO_DL_API") {
        config.remote.base_url = base_url;
    }
    config.retrieval.save_dir = "downloads".into();

    // Create client instance
    let client = VideoDlClient::new(config)?;

    // Subscribe to events
    let mut events = client.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                Event::FormatsResolved { title, formats, .. } => {
                    println!("✓ Resolved {formats} formats for: {title}");
                }
                Event::JobQueued { id, title } => {
                    println!("✓ Queued download {id}: {}", title.unwrap_or_default());
                }
                Event::JobProgress { id, percent, .. } => {
                    println!("⬇ Download {id}: {percent:.0}%");
                }
                Event::JobCompleted { id } => {
                    println!("✓ Download {id} complete");
                }
                Event::JobFailed { id } => {
                    println!("✗ Download {id} failed");
                }
                Event::FileSaved { id, path } => {
                    println!("✓ Saved {id} to {}", path.display());
                }
                _ => {}
            }
        }
    });

    // Probe the available formats; the first one becomes the default choice
    let Some(selection) = client.resolve_formats(&source_url).await? else {
        eprintln!("no source URL given");
        return Ok(());
    };
    for format in &selection.formats {
        println!(
            "  format {} ({}, {})",
            format.format_id,
            format.ext,
            format.resolution.as_deref().unwrap_or("unknown resolution"),
        );
    }

    // Submit with the default selection and wait for the job to finish
    let Some(id) = client.submit_selected().await? else {
        eprintln!("nothing to submit");
        return Ok(());
    };

    let store = client.store();
    loop {
        tokio::time::sleep(Duration::from_millis(500)).await;
        match store.get(&id).map(|job| job.status) {
            Some(Status::Completed) => break,
            Some(Status::Failed) => {
                eprintln!("remote reported failure");
                client.shutdown().await;
                return Ok(());
            }
            _ => {}
        }
    }

    // Retrieve the finished file under its default name
    let job = store.get(&id).ok_or("job vanished from the store")?;
    let name = video_dl_client::utils::suggested_filename(&job);
    client.retrieve_file(&id, &name).await?;

    client.shutdown().await;
    Ok(())
}

//! Format probing and the transient format selection.

use crate::error::Result;
use crate::notifications::NotificationKind;
use crate::types::{Event, FormatSelection};

use super::VideoDlClient;

impl VideoDlClient {
    /// Probe the remote for the available encoding variants of a source URL
    ///
    /// An empty (after trimming) source URL is a silent no-op: no request is
    /// issued and `Ok(None)` is returned. On success the result becomes the
    /// current selection, with the first variant chosen by default. On
    /// failure any previous selection is cleared first, so a stale title or
    /// format list is never shown against a new error.
    ///
    /// Exactly one outbound request per invocation; no retries.
    pub async fn resolve_formats(&self, source_url: &str) -> Result<Option<FormatSelection>> {
        let source_url = source_url.trim();
        if source_url.is_empty() {
            return Ok(None);
        }

        match self.remote.probe_formats(source_url).await {
            Ok(probe) => {
                let chosen = probe.formats.first().map(|f| f.format_id.clone());
                let selection = FormatSelection {
                    source_url: source_url.to_string(),
                    title: probe.title,
                    formats: probe.formats,
                    chosen,
                };

                self.write_selection(Some(selection.clone()));
                self.emit(Event::FormatsResolved {
                    source_url: selection.source_url.clone(),
                    title: selection.title.clone(),
                    formats: selection.formats.len(),
                });
                self.notifications
                    .post(NotificationKind::Success, "Formats loaded successfully");
                tracing::info!(
                    source_url = %selection.source_url,
                    formats = selection.formats.len(),
                    "formats resolved"
                );

                Ok(Some(selection))
            }
            Err(e) => {
                self.write_selection(None);
                self.notifications
                    .post(NotificationKind::Error, "Failed to load video formats");
                tracing::warn!(source_url = %source_url, error = %e, "format probe failed");
                Err(e.into())
            }
        }
    }

    /// The current transient format selection, if a probe has succeeded and
    /// no submission or cancellation has cleared it yet
    pub fn selection(&self) -> Option<FormatSelection> {
        self.read_selection()
    }

    /// Choose a different variant from the current selection
    ///
    /// Returns false when there is no selection or the id is not one of its
    /// variants; the selection is left unchanged in both cases.
    pub fn select_format(&self, format_id: &str) -> bool {
        let Some(mut selection) = self.read_selection() else {
            return false;
        };
        if !selection.formats.iter().any(|f| f.format_id == format_id) {
            return false;
        }
        selection.chosen = Some(format_id.to_string());
        self.write_selection(Some(selection));
        true
    }

    /// Discard the current selection (the user cancelled the format picker)
    pub fn clear_selection(&self) {
        self.write_selection(None);
    }
}

//! Utility functions for filenames, paths, and URL display

use crate::config::FileCollisionAction;
use crate::error::RetrieveError;
use crate::types::Job;
use std::path::{Path, PathBuf};

/// Maximum number of rename attempts when resolving file collisions
const MAX_RENAME_ATTEMPTS: u32 = 9999;

/// Maximum length of the raw-URL fallback in [`display_url`]
const URL_DISPLAY_LIMIT: usize = 50;

/// Get a unique path for a file, handling collisions according to the
/// specified action
///
/// For `Rename`, a ` (n)` suffix is added until a free name is found. For
/// `Skip`, an existing file is an error. For `Overwrite`, the original path
/// is returned unchanged.
pub fn get_unique_path(path: &Path, action: FileCollisionAction) -> Result<PathBuf, RetrieveError> {
    match action {
        FileCollisionAction::Overwrite => Ok(path.to_path_buf()),
        FileCollisionAction::Skip => {
            if path.exists() {
                return Err(RetrieveError::FileExists {
                    path: path.to_path_buf(),
                });
            }
            Ok(path.to_path_buf())
        }
        FileCollisionAction::Rename => {
            if !path.exists() {
                return Ok(path.to_path_buf());
            }

            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| RetrieveError::InvalidFilename {
                    name: path.display().to_string(),
                })?;
            let extension = path.extension().and_then(|e| e.to_str());
            let parent = path.parent().unwrap_or_else(|| Path::new("."));

            for i in 1..=MAX_RENAME_ATTEMPTS {
                let new_name = match extension {
                    Some(ext) => format!("{stem} ({i}).{ext}"),
                    None => format!("{stem} ({i})"),
                };
                let new_path = parent.join(new_name);
                if !new_path.exists() {
                    return Ok(new_path);
                }
            }

            Err(RetrieveError::FileExists {
                path: path.to_path_buf(),
            })
        }
    }
}

/// Reduce a caller-suggested filename to a single safe path component
///
/// Path separators and control characters become underscores. Returns None
/// when nothing usable remains (empty, dots-only).
pub fn sanitize_filename(name: &str) -> Option<String> {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().to_string();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        return None;
    }
    Some(cleaned)
}

/// Default save name for a job's retrieved file: `{title}.mp4`, falling back
/// to `video.mp4` for untitled jobs
pub fn suggested_filename(job: &Job) -> String {
    match job.title.as_deref() {
        Some(title) if !title.trim().is_empty() => format!("{}.mp4", title.trim()),
        _ => "video.mp4".to_string(),
    }
}

/// Compact host + path form of a URL for display
///
/// Unparseable input is truncated to a fixed length instead.
pub fn display_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(parsed) if parsed.host_str().is_some() => {
            format!("{}{}", parsed.host_str().unwrap_or_default(), parsed.path())
        }
        _ => {
            if raw.len() > URL_DISPLAY_LIMIT {
                format!("{}...", &raw[..URL_DISPLAY_LIMIT])
            } else {
                raw.to_string()
            }
        }
    }
}

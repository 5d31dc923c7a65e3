//! In-memory job list store
//!
//! The authoritative collection of known jobs, newest first, driving whatever
//! UI sits on top of the client. All mutation goes through the small API
//! here: prepend on submission, per-job status merges from pollers, and
//! wholesale replacement by a full-history refresh. Entries are never deleted
//! individually.

use crate::types::{Job, JobId, Status, StatusReport};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cloneable handle to the shared job list
///
/// Insertion order is significant for display: newest first. A freshly
/// submitted job is prepended, never merged, so a full-history refresh may
/// transiently duplicate an entry until the next refresh replaces the whole
/// list.
#[derive(Clone, Debug, Default)]
pub struct JobStore {
    inner: Arc<RwLock<Vec<Job>>>,
}

/// Result of merging a status report into the store
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MergeOutcome {
    /// The report was merged into the job
    Updated {
        /// Status after the merge
        status: Status,
        /// Progress percentage after the merge
        progress: f32,
    },
    /// The job is already terminal; terminal entries are immutable
    AlreadyTerminal,
    /// The report would move the status backward and was ignored
    Stale,
    /// No job with that id is in the store
    NotFound,
}

impl JobStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a job at the head of the list (newest first)
    pub fn prepend(&self, job: Job) {
        self.write().insert(0, job);
    }

    /// Atomically merge one status report into the job with the given id.
    ///
    /// Only the first (newest) entry with a matching id is touched. The merge
    /// is all-or-nothing: a refused report changes no field. Terminal entries
    /// never change again, and a report that would move the status backward
    /// (e.g. downloading back to pending) is ignored.
    pub fn apply_status(&self, id: &JobId, report: &StatusReport) -> MergeOutcome {
        let mut jobs = self.write();
        let Some(job) = jobs.iter_mut().find(|j| &j.id == id) else {
            return MergeOutcome::NotFound;
        };

        if job.status.is_terminal() {
            return MergeOutcome::AlreadyTerminal;
        }
        if report.status.rank() < job.status.rank() {
            return MergeOutcome::Stale;
        }

        job.status = report.status;
        if let Some(progress) = report.progress {
            job.progress = progress;
        }
        for (key, value) in &report.extra {
            job.extra.insert(key.clone(), value.clone());
        }

        MergeOutcome::Updated {
            status: job.status,
            progress: job.progress,
        }
    }

    /// Replace the entire list with a fresh full-history fetch
    pub fn replace_all(&self, jobs: Vec<Job>) {
        *self.write() = jobs;
    }

    /// Clone the job with the given id, if present
    pub fn get(&self, id: &JobId) -> Option<Job> {
        self.read().iter().find(|j| &j.id == id).cloned()
    }

    /// Clone the current list, newest first
    pub fn snapshot(&self) -> Vec<Job> {
        self.read().clone()
    }

    /// Number of jobs in the store
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the store holds no jobs
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Job>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Job>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn report(status: Status, progress: Option<f32>) -> StatusReport {
        StatusReport {
            status,
            progress,
            extra: serde_json::Map::new(),
        }
    }

    fn pending_job(id: &str) -> Job {
        Job::submitted(JobId::from(id), "https://x/video", None, None)
    }

    #[test]
    fn test_prepend_keeps_newest_first() {
        let store = JobStore::new();
        store.prepend(pending_job("J1"));
        store.prepend(pending_job("J2"));

        let jobs = store.snapshot();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, JobId::from("J2"));
        assert_eq!(jobs[1].id, JobId::from("J1"));
    }

    #[test]
    fn test_apply_status_merges_fields() {
        let store = JobStore::new();
        store.prepend(pending_job("J1"));

        let mut r = report(Status::Downloading, Some(42.0));
        r.extra
            .insert("speed".to_string(), serde_json::json!("1.2MB/s"));

        let outcome = store.apply_status(&JobId::from("J1"), &r);
        assert_eq!(
            outcome,
            MergeOutcome::Updated {
                status: Status::Downloading,
                progress: 42.0
            }
        );

        let job = store.get(&JobId::from("J1")).unwrap();
        assert_eq!(job.status, Status::Downloading);
        assert_eq!(job.progress, 42.0);
        assert_eq!(job.extra.get("speed"), Some(&serde_json::json!("1.2MB/s")));
    }

    #[test]
    fn test_missing_progress_leaves_previous_value() {
        let store = JobStore::new();
        store.prepend(pending_job("J1"));

        store.apply_status(&JobId::from("J1"), &report(Status::Downloading, Some(30.0)));
        store.apply_status(&JobId::from("J1"), &report(Status::Downloading, None));

        assert_eq!(store.get(&JobId::from("J1")).unwrap().progress, 30.0);
    }

    #[test]
    fn test_terminal_entries_are_immutable() {
        let store = JobStore::new();
        store.prepend(pending_job("J1"));

        store.apply_status(&JobId::from("J1"), &report(Status::Completed, Some(100.0)));
        let outcome =
            store.apply_status(&JobId::from("J1"), &report(Status::Downloading, Some(10.0)));
        assert_eq!(outcome, MergeOutcome::AlreadyTerminal);

        let job = store.get(&JobId::from("J1")).unwrap();
        assert_eq!(job.status, Status::Completed);
        assert_eq!(job.progress, 100.0);
    }

    #[test]
    fn test_backward_transition_is_stale() {
        let store = JobStore::new();
        store.prepend(pending_job("J1"));

        store.apply_status(&JobId::from("J1"), &report(Status::Downloading, Some(50.0)));
        let outcome = store.apply_status(&JobId::from("J1"), &report(Status::Pending, Some(0.0)));
        assert_eq!(outcome, MergeOutcome::Stale);

        let job = store.get(&JobId::from("J1")).unwrap();
        assert_eq!(job.status, Status::Downloading);
        assert_eq!(job.progress, 50.0);
    }

    #[test]
    fn test_unknown_job_not_found() {
        let store = JobStore::new();
        let outcome = store.apply_status(&JobId::from("nope"), &report(Status::Pending, None));
        assert_eq!(outcome, MergeOutcome::NotFound);
    }

    #[test]
    fn test_replace_all_swaps_contents() {
        let store = JobStore::new();
        store.prepend(pending_job("local"));

        store.replace_all(vec![pending_job("J1"), pending_job("J2")]);
        let jobs = store.snapshot();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, JobId::from("J1"));
        assert!(store.get(&JobId::from("local")).is_none());
    }

    #[test]
    fn test_merge_touches_only_newest_duplicate() {
        let store = JobStore::new();
        // a refresh plus a fresh submission can transiently duplicate an id
        store.prepend(pending_job("J1"));
        store.prepend(pending_job("J1"));

        store.apply_status(&JobId::from("J1"), &report(Status::Downloading, Some(10.0)));
        let jobs = store.snapshot();
        assert_eq!(jobs[0].status, Status::Downloading);
        assert_eq!(jobs[1].status, Status::Pending);
    }
}

//! Event Store - time-ordered collection of in-flight jobs
//!
//! Jobs are kept in a `BTreeMap` keyed by `(due_time, id)` with a
//! secondary `HashMap` from id to key, giving O(log n) insert, removal by id
//! and earliest-due lookup.
//!
//! # Protocol
//!
//! A job is never mutated while stored. The engine pops it with
//! [`EventStore::pop_earliest_live`], applies its transition, and inserts it
//! again (or drops it when it leaves the system).
//!
//! # Ordering
//!
//! Ascending due time; equal due times are ordered by ascending job id.

use crate::models::job::{Job, JobId};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Event store errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("{0} is already in the event store")]
    DuplicateJob(JobId),

    #[error("{id} has a non-comparable due time {due_time}")]
    InvalidDueTime { id: JobId, due_time: f64 },
}

/// Ordering key: due time first, then id
#[derive(Debug, Clone, Copy)]
struct EventKey {
    due_time: f64,
    id: JobId,
}

impl PartialEq for EventKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EventKey {}

impl PartialOrd for EventKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due_time
            .total_cmp(&other.due_time)
            .then(self.id.cmp(&other.id))
    }
}

/// In-flight jobs ordered by due time
///
/// # Example
/// ```
/// use tandem_simulator_core_rs::{EventStore, Job, JobId, JobSource};
///
/// let mut store = EventStore::new();
/// store.insert(Job::new(JobId(1), JobSource::Group1, 0.0, 9.0)).unwrap();
/// store.insert(Job::new(JobId(2), JobSource::Group2, 0.0, 3.0)).unwrap();
///
/// let next = store.pop_earliest_live().unwrap();
/// assert_eq!(next.id(), JobId(2));
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    by_due: BTreeMap<EventKey, Job>,
    index: HashMap<JobId, EventKey>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a job
    ///
    /// Rejects a second job with the same id and due times that cannot be
    /// ordered (NaN).
    pub fn insert(&mut self, job: Job) -> Result<(), StoreError> {
        let id = job.id();
        if job.due_time().is_nan() {
            return Err(StoreError::InvalidDueTime {
                id,
                due_time: job.due_time(),
            });
        }
        if self.index.contains_key(&id) {
            return Err(StoreError::DuplicateJob(id));
        }
        let key = EventKey {
            due_time: job.due_time(),
            id,
        };
        self.index.insert(id, key);
        self.by_due.insert(key, job);
        Ok(())
    }

    /// Remove a job by id, returning it if it was present
    pub fn remove(&mut self, id: JobId) -> Option<Job> {
        let key = self.index.remove(&id)?;
        self.by_due.remove(&key)
    }

    pub fn contains(&self, id: JobId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.index.get(&id).and_then(|key| self.by_due.get(key))
    }

    /// Number of stored jobs
    pub fn len(&self) -> usize {
        self.by_due.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_due.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_due.clear();
        self.index.clear();
    }

    /// Earliest-due job that has not reached the terminal stage, without
    /// removing it
    pub fn peek_earliest_live(&self) -> Option<&Job> {
        self.by_due.values().find(|job| !job.stage().is_terminal())
    }

    /// Remove and return the earliest-due job that has not reached the
    /// terminal stage
    ///
    /// Terminal jobs are skipped, not removed. Returns `None` when no live
    /// job remains.
    pub fn pop_earliest_live(&mut self) -> Option<Job> {
        let key = self
            .by_due
            .iter()
            .find(|(_, job)| !job.stage().is_terminal())
            .map(|(key, _)| *key)?;
        self.index.remove(&key.id);
        self.by_due.remove(&key)
    }

    /// Jobs in due order
    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.by_due.values()
    }
}

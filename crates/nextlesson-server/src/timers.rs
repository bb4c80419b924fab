//! Keyed one-shot timer table.
//!
//! Every scheduled job lives under a key; scheduling the same key again
//! aborts the previous job first, so a re-plan after a refresh can never
//! stack duplicate timers. Dropping the table aborts everything.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Identity of one scheduled job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// The next data refresh.
    Refresh,
    /// The end of the day's last lesson.
    EndOfDay,
    /// The midnight rollover.
    Midnight,
    /// One planned notification, keyed by its dedup id.
    Trigger(String),
}

/// One-shot timers keyed by [`TimerKey`].
#[derive(Debug, Default)]
pub struct TimerTable {
    handles: Mutex<HashMap<TimerKey, JoinHandle<()>>>,
}

impl TimerTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `job` after `delay`, replacing any job already under `key`.
    pub fn schedule<F>(&self, key: TimerKey, delay: Duration, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            job.await;
        });
        debug!(?key, delay_secs = delay.as_secs(), "timer scheduled");
        if let Some(previous) = self.lock().insert(key, handle) {
            previous.abort();
        }
    }

    /// Aborts the job under `key`. Returns false when none was scheduled.
    pub fn cancel(&self, key: &TimerKey) -> bool {
        match self.lock().remove(key) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Aborts every scheduled job.
    pub fn cancel_all(&self) {
        let mut handles = self.lock();
        for (_, handle) in handles.drain() {
            handle.abort();
        }
    }

    /// Number of keys currently held, fired or not.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no keys are held.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<TimerKey, JoinHandle<()>>> {
        self.handles.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TimerTable {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

//! Fan-out/fan-in of worker threads with a bounded wait
//!
//! Tasks run on named OS threads and report back over a channel. Joining waits until
//! every task has reported or the deadline passes. On timeout the group cancels its token,
//! keeps listening for the settle time so tasks that stop promptly are still collected,
//! and leaves any remaining stragglers detached.

use crate::io::error::{MosaicError, Result};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// Shared flag telling tasks to stop early
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Ask every task holding this token to stop
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Results collected by [`TaskGroup::join_until`]
#[derive(Debug)]
pub struct GroupOutcome<T> {
    /// Values of the tasks that finished, ordered by task index
    pub finished: Vec<(usize, T)>,
    /// Indices of the tasks that panicked
    pub panicked: Vec<usize>,
    /// Whether the deadline passed before every task reported
    ///
    /// Tasks collected during the settle time after the deadline still count as finished.
    pub timed_out: bool,
}

impl<T> GroupOutcome<T> {
    /// Whether every task finished without panicking
    pub fn is_complete(&self) -> bool {
        !self.timed_out && self.panicked.is_empty()
    }
}

type Report<T> = (usize, thread::Result<T>);

/// Group of worker threads joined with a deadline
#[derive(Debug)]
pub struct TaskGroup<T> {
    name: String,
    sender: Sender<Report<T>>,
    receiver: Receiver<Report<T>>,
    spawned: usize,
    token: CancelToken,
    settle_time: Duration,
}

impl<T: Send + 'static> TaskGroup<T> {
    /// Create an empty group whose threads are called `<name>-<index>`
    pub fn new(name: &str) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            name: name.to_string(),
            sender,
            receiver,
            spawned: 0,
            token: CancelToken::default(),
            settle_time: Duration::ZERO,
        }
    }

    /// Keep collecting reports for `settle_time` after a timeout cancels the group
    #[must_use]
    pub const fn with_settle_time(mut self, settle_time: Duration) -> Self {
        self.settle_time = settle_time;
        self
    }

    /// Token shared by every task of the group
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Number of tasks started so far
    pub const fn len(&self) -> usize {
        self.spawned
    }

    /// Whether no task has been started
    pub const fn is_empty(&self) -> bool {
        self.spawned == 0
    }

    /// Start a task on its own thread
    ///
    /// The task receives the group's cancellation token.
    ///
    /// # Errors
    ///
    /// Returns [`MosaicError::WorkerSpawn`] if the thread cannot be created
    pub fn spawn<F>(&mut self, task: F) -> Result<()>
    where
        F: FnOnce(CancelToken) -> T + Send + 'static,
    {
        let index = self.spawned;
        let sender = self.sender.clone();
        let token = self.token.clone();

        thread::Builder::new()
            .name(format!("{}-{index}", self.name))
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(move || task(token)));
                // The group may have stopped listening after a timeout
                let _ = sender.send((index, result));
            })
            .map_err(|source| MosaicError::WorkerSpawn {
                worker: index,
                source,
            })?;

        self.spawned += 1;
        Ok(())
    }

    /// Wait for every task, giving up after `timeout`
    pub fn join_timeout(self, timeout: Duration) -> GroupOutcome<T> {
        self.join_until(deadline_after(timeout))
    }

    /// Wait for every task, giving up at `deadline`
    ///
    /// On timeout the cancellation token is set and reports are collected for the settle
    /// time; tasks that have not reported by then are left detached.
    pub fn join_until(self, deadline: Instant) -> GroupOutcome<T> {
        let Self {
            sender,
            receiver,
            spawned,
            token,
            settle_time,
            ..
        } = self;
        drop(sender);

        let mut outcome = GroupOutcome {
            finished: Vec::with_capacity(spawned),
            panicked: Vec::new(),
            timed_out: false,
        };

        let mut pending = spawned;
        if receive_until(&receiver, &mut outcome, &mut pending, deadline) {
            outcome.timed_out = true;
            token.cancel();
            if !settle_time.is_zero() {
                receive_until(&receiver, &mut outcome, &mut pending, deadline_after(settle_time));
            }
        }

        outcome.finished.sort_by_key(|(index, _)| *index);
        outcome.panicked.sort_unstable();
        outcome
    }
}

fn deadline_after(wait: Duration) -> Instant {
    Instant::now()
        .checked_add(wait)
        .unwrap_or_else(|| Instant::now() + Duration::from_secs(u64::from(u32::MAX)))
}

// Returns true when the deadline passed with reports still pending
fn receive_until<T>(
    receiver: &Receiver<Report<T>>,
    outcome: &mut GroupOutcome<T>,
    pending: &mut usize,
    deadline: Instant,
) -> bool {
    while *pending > 0 {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match receiver.recv_timeout(remaining) {
            Ok((index, Ok(value))) => outcome.finished.push((index, value)),
            Ok((index, Err(_))) => outcome.panicked.push(index),
            Err(RecvTimeoutError::Timeout) => return true,
            Err(RecvTimeoutError::Disconnected) => return false,
        }
        *pending -= 1;
    }
    false
}

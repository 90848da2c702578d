//! Cancellable countdowns backing the session timers.
//!
//! A [`Countdown`] spawns a sleeping task that reports its expiry on a
//! channel. Every start and cancel bumps the countdown's generation, so an
//! expiry that was already in flight when its countdown was cancelled or
//! restarted is recognised as stale and dropped by the receiver.

use std::{fmt, time::Duration};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, sleep},
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TimerKind {
    /// Time to guess the card in play.
    Card,
    /// Hot Potato team clock.
    Team,
    /// Hold while the device is handed over.
    Pass,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Card => "card timer",
            Self::Team => "team clock",
            Self::Pass => "pass hold",
        };
        write!(f, "{repr}")
    }
}

/// Delivered on the expiry channel when a countdown reaches zero.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Expiry {
    pub kind: TimerKind,
    pub generation: u64,
}

#[derive(Debug)]
pub struct Countdown {
    kind: TimerKind,
    generation: u64,
    task: Option<JoinHandle<()>>,
    deadline: Option<Instant>,
    notify: mpsc::UnboundedSender<Expiry>,
}

impl Countdown {
    pub fn new(kind: TimerKind, notify: mpsc::UnboundedSender<Expiry>) -> Self {
        Self {
            kind,
            generation: 0,
            task: None,
            deadline: None,
            notify,
        }
    }

    /// Starts counting down from `duration`, replacing any running
    /// countdown. Must be called from within a tokio runtime.
    pub fn start(&mut self, duration: Duration) {
        self.cancel();

        let expiry = Expiry {
            kind: self.kind,
            generation: self.generation,
        };
        let notify = self.notify.clone();
        self.deadline = Some(Instant::now() + duration);
        self.task = Some(tokio::spawn(async move {
            sleep(duration).await;
            let _ = notify.send(expiry);
        }));
    }

    /// Stops the countdown and returns the time it had left, or `None` if
    /// it wasn't running.
    pub fn cancel(&mut self) -> Option<Duration> {
        let remaining = self.remaining();
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.deadline = None;
        self.generation += 1;
        remaining
    }

    /// Time left before expiry, if running.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Accepts an expiry if it belongs to the countdown that is running
    /// right now, marking the countdown as stopped.
    pub fn claim(&mut self, expiry: Expiry) -> bool {
        if expiry.kind != self.kind || expiry.generation != self.generation || self.task.is_none()
        {
            return false;
        }
        self.task = None;
        self.deadline = None;
        self.generation += 1;
        true
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

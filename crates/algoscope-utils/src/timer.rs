//! Cancellable single-shot timer.
//!
//! At most one deadline is armed at a time. Arming again, cancelling, or
//! dropping the timer aborts the pending sleep. Every arming gets a fresh
//! sequence number, and [`OneShotTimer::accept`] only hands back the token of
//! the *current* arming, so a fire that raced with a cancel is discarded.

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

/// A fired deadline, delivered on the timer's channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    seq: u64,
    token: T,
}

impl<T> Fired<T> {
    /// The token the deadline was armed with.
    pub fn token(&self) -> &T {
        &self.token
    }
}

struct Armed<T> {
    seq: u64,
    token: T,
    handle: JoinHandle<()>,
}

/// Single-shot timer backed by a spawned tokio sleep.
///
/// Must be armed from within a tokio runtime.
pub struct OneShotTimer<T> {
    tx: mpsc::UnboundedSender<Fired<T>>,
    armed: Option<Armed<T>>,
    seq: u64,
}

impl<T> OneShotTimer<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    /// Create an idle timer and the channel its deadlines fire on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Fired<T>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let timer = Self {
            tx,
            armed: None,
            seq: 0,
        };
        (timer, rx)
    }

    /// Arm a deadline `delay` from now, replacing any pending one.
    pub fn arm(&mut self, token: T, delay: Duration) {
        self.cancel();
        self.seq += 1;

        let seq = self.seq;
        let tx = self.tx.clone();
        let fired = Fired {
            seq,
            token: token.clone(),
        };
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the owner shut down.
            let _ = tx.send(fired);
        });

        trace!(seq, ?delay, "timer armed");
        self.armed = Some(Armed { seq, token, handle });
    }

    /// Abort the pending deadline, if any.
    pub fn cancel(&mut self) {
        if let Some(armed) = self.armed.take() {
            armed.handle.abort();
            trace!(seq = armed.seq, "timer cancelled");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Token of the pending deadline.
    pub fn armed_token(&self) -> Option<&T> {
        self.armed.as_ref().map(|armed| &armed.token)
    }

    /// Claim a fired deadline.
    ///
    /// Returns the token if `fired` belongs to the current arming and
    /// disarms the timer; returns `None` for superseded or cancelled fires.
    pub fn accept(&mut self, fired: Fired<T>) -> Option<T> {
        match &self.armed {
            Some(armed) if armed.seq == fired.seq => {
                self.armed = None;
                Some(fired.token)
            }
            _ => {
                trace!(seq = fired.seq, "stale timer fire dropped");
                None
            }
        }
    }

    /// Reconcile the timer with the deadline the owner wants.
    ///
    /// `None` cancels. `Some` arms unless the same token is already pending,
    /// in which case the in-flight delay is left untouched.
    pub fn sync(&mut self, wanted: Option<(T, Duration)>) {
        match wanted {
            None => self.cancel(),
            Some((token, delay)) => {
                if self.armed_token() != Some(&token) {
                    self.arm(token, delay);
                }
            }
        }
    }
}

impl<T> Drop for OneShotTimer<T> {
    fn drop(&mut self) {
        if let Some(armed) = self.armed.take() {
            armed.handle.abort();
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for OneShotTimer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneShotTimer")
            .field("seq", &self.seq)
            .field("armed", &self.armed.as_ref().map(|a| (&a.seq, &a.token)))
            .finish()
    }
}

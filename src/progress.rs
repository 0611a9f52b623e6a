//! Cosmetic progress indicator for a pending generation.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const COMPLETE: u8 = 100;

/// Ticks a percentage upward until [`ProgressTicker::finish`] is called.
///
/// Unrelated to real progress; it only shows that work is happening.
pub struct ProgressTicker {
    sender: watch::Sender<u8>,
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    /// Starts at 0 and adds `step` every `interval`, never exceeding `cap`
    /// (clamped below 100).
    pub fn start(interval: Duration, step: u8, cap: u8) -> (Self, watch::Receiver<u8>) {
        let (sender, receiver) = watch::channel(0u8);
        (Self::attach(sender, interval, step, cap), receiver)
    }

    /// Like [`ProgressTicker::start`], but publishes on an existing channel,
    /// resetting it to 0 first.
    pub fn attach(sender: watch::Sender<u8>, interval: Duration, step: u8, cap: u8) -> Self {
        let cap = cap.min(COMPLETE - 1);
        sender.send_replace(0);
        let ticker = sender.clone();

        let handle = tokio::spawn(async move {
            let mut clock = tokio::time::interval(interval);
            // The first tick completes immediately.
            clock.tick().await;
            loop {
                clock.tick().await;
                let next = (*ticker.borrow()).saturating_add(step).min(cap);
                ticker.send_replace(next);
            }
        });

        Self { sender, handle }
    }

    pub fn current(&self) -> u8 {
        *self.sender.borrow()
    }

    /// Stops ticking and publishes 100.
    pub fn finish(self) {
        self.handle.abort();
        self.sender.send_replace(COMPLETE);
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

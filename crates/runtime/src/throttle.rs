use foundation::time::Time;

/// Leading-edge throttle with a single trailing slot.
///
/// - The first payload offered after a quiet period is released immediately.
/// - Payloads offered inside the window overwrite each other in one pending
///   slot; [`Throttle::poll`] releases the latest one once the window that
///   started at the previous release has elapsed.
///
/// Ordering contract:
/// - A released payload is never older than one released before it. A pending
///   payload is discarded, never released, once a newer one supersedes it.
///
/// The host owns the clock: it passes `now` on every call and uses
/// [`Throttle::next_deadline`] to decide when to call `poll` again.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    window_s: f64,
    last_release: Option<Time>,
    pending: Option<T>,
    coalesced: u64,
}

impl<T> Throttle<T> {
    pub fn new(window_s: f64) -> Self {
        Self {
            window_s: window_s.max(0.0),
            last_release: None,
            pending: None,
            coalesced: 0,
        }
    }

    pub fn from_millis(window_ms: u64) -> Self {
        Self::new(window_ms as f64 / 1000.0)
    }

    pub fn window_s(&self) -> f64 {
        self.window_s
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of payloads that were superseded without being released.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    fn is_quiet(&self, now: Time) -> bool {
        match self.last_release {
            None => true,
            Some(t) => now.elapsed_since(t) >= self.window_s,
        }
    }

    /// Offers a payload. Returns it back if it should run right away.
    pub fn offer(&mut self, now: Time, payload: T) -> Option<T> {
        if self.is_quiet(now) {
            // A pending payload past its deadline is older than this one.
            if self.pending.take().is_some() {
                self.coalesced += 1;
            }
            self.last_release = Some(now);
            return Some(payload);
        }
        if self.pending.replace(payload).is_some() {
            self.coalesced += 1;
        }
        None
    }

    /// Releases the pending payload if its window has closed.
    pub fn poll(&mut self, now: Time) -> Option<T> {
        let deadline = self.next_deadline()?;
        if now < deadline {
            return None;
        }
        self.last_release = Some(now);
        self.pending.take()
    }

    /// When the pending payload becomes releasable; `None` if nothing waits.
    pub fn next_deadline(&self) -> Option<Time> {
        self.pending.as_ref()?;
        self.last_release.map(|t| t.after(self.window_s))
    }

    /// Drops any pending payload and forgets the last release.
    pub fn reset(&mut self) {
        self.pending = None;
        self.last_release = None;
    }
}

use std::time::{Duration, Instant};

/// Identifies one scheduling of a [`TimerSlot`].
///
/// Every `start_*` call issues a fresh token and invalidates the previous
/// one, so a stale token can never be mistaken for the live timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Debug, Clone, Copy)]
struct Pending {
    token: TimerToken,
    due: Instant,
    period: Option<Duration>,
}

/// A cancellable timer with at most one outstanding schedule.
///
/// The slot never runs on its own; the owner polls it with the current time
/// from the host's frame hook.
#[derive(Debug, Default)]
pub struct TimerSlot {
    issued: u64,
    pending: Option<Pending>,
}

impl TimerSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a single firing `delay` after `now`, replacing any pending
    /// schedule.
    pub fn start_once(&mut self, now: Instant, delay: Duration) -> TimerToken {
        self.schedule(now + delay, None)
    }

    /// Schedules a firing every `period`, the first one `period` after `now`,
    /// replacing any pending schedule.
    pub fn start_repeating(&mut self, now: Instant, period: Duration) -> TimerToken {
        self.schedule(now + period, Some(period))
    }

    /// Cancels the pending schedule, returning its token.
    pub fn cancel(&mut self) -> Option<TimerToken> {
        self.pending.take().map(|p| p.token)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Token of the pending schedule.
    #[must_use]
    pub fn token(&self) -> Option<TimerToken> {
        self.pending.map(|p| p.token)
    }

    /// Whether `token` is the one currently scheduled.
    #[must_use]
    pub fn is_current(&self, token: TimerToken) -> bool {
        self.token() == Some(token)
    }

    /// Number of firings due at `now`.
    ///
    /// A one-shot timer fires at most once and is then disarmed. A repeating
    /// timer reports every period elapsed since the last poll and stays armed.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(pending) = self.pending.as_mut() else {
            return 0;
        };
        if now < pending.due {
            return 0;
        }
        let Some(period) = pending.period else {
            self.pending = None;
            return 1;
        };
        if period.is_zero() {
            pending.due = now;
            return 1;
        }
        let behind = now.duration_since(pending.due).as_nanos() / period.as_nanos();
        let fired = u32::try_from(behind.saturating_add(1)).unwrap_or(u32::MAX);
        // `fired` periods have elapsed; advance by exactly that many.
        pending.due += period * fired;
        fired
    }

    fn schedule(&mut self, due: Instant, period: Option<Duration>) -> TimerToken {
        self.issued += 1;
        let token = TimerToken(self.issued);
        self.pending = Some(Pending { token, due, period });
        token
    }
}

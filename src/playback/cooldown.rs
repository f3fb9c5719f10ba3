use std::time::{Duration, Instant};

pub const DEFAULT_WINDOW: Duration = Duration::from_millis(500);

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Timed gate: once acquired, further acquisitions fail until the window
/// has elapsed. Rejected triggers are dropped, not queued.
#[derive(Debug, Clone)]
pub struct Cooldown<C> {
    window: Duration,
    until: Option<Instant>,
    clock: C,
}

impl<C: Clock> Cooldown<C> {
    pub fn new(window: Duration, clock: C) -> Self {
        Self {
            window,
            until: None,
            clock,
        }
    }

    pub fn is_active(&self) -> bool {
        self.until.is_some_and(|until| self.clock.now() < until)
    }

    /// Start a new window if none is running. Returns false while cooling down.
    pub fn try_acquire(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        self.until = Some(self.clock.now() + self.window);
        true
    }
}

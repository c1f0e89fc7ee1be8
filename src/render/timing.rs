//! Frame-polled timers. Nothing here sleeps: callers pass `now` in and poll
//! once per frame, asking egui to repaint at [`Delayed::deadline`] /
//! [`Throttle::deadline`].

use std::time::{Duration, Instant};

/// A single value scheduled to become due after a delay. Scheduling again
/// replaces the value and restarts the delay (debounce semantics).
#[derive(Debug, Clone)]
pub struct Delayed<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Delayed<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref().map(|(v, _)| v)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the value if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if *at <= now => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Rate limiter: lets a value through at most once per `interval`. Values
/// offered inside the window are held (latest wins) until the window ends.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    interval: Duration,
    last_fired: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
            pending: None,
        }
    }

    /// Offer a value. Returns it immediately if the window is open,
    /// otherwise replaces whatever was pending.
    pub fn offer(&mut self, value: T, now: Instant) -> Option<T> {
        if self.window_open(now) {
            self.last_fired = Some(now);
            self.pending = None;
            Some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    /// Release the pending value once its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.is_some() && self.window_open(now) {
            self.last_fired = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        match (&self.pending, self.last_fired) {
            (Some(_), Some(at)) => Some(at + self.interval),
            _ => None,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending value and reset the window.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.last_fired = None;
    }

    fn window_open(&self, now: Instant) -> bool {
        match self.last_fired {
            Some(at) => now.duration_since(at) >= self.interval,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn delayed_coalesces_to_latest() {
        let t0 = Instant::now();
        let mut d = Delayed::new(ms(50));
        d.schedule(1, t0);
        d.schedule(2, t0 + ms(30));
        assert_eq!(d.take_due(t0 + ms(60)), None);
        assert_eq!(d.take_due(t0 + ms(80)), Some(2));
        assert!(!d.is_pending());
    }

    #[test]
    fn delayed_cancel_discards() {
        let t0 = Instant::now();
        let mut d = Delayed::new(ms(10));
        d.schedule("x", t0);
        d.cancel();
        assert_eq!(d.take_due(t0 + ms(100)), None);
        assert_eq!(d.deadline(), None);
    }

    #[test]
    fn throttle_fires_leading_then_holds_latest() {
        let t0 = Instant::now();
        let mut th = Throttle::new(ms(16));
        assert_eq!(th.offer(1, t0), Some(1));
        assert_eq!(th.offer(2, t0 + ms(5)), None);
        assert_eq!(th.offer(3, t0 + ms(10)), None);
        assert_eq!(th.deadline(), Some(t0 + ms(16)));
        assert_eq!(th.poll(t0 + ms(12)), None);
        assert_eq!(th.poll(t0 + ms(16)), Some(3));
        assert_eq!(th.poll(t0 + ms(40)), None);
    }

    #[test]
    fn throttle_cancel_drops_pending() {
        let t0 = Instant::now();
        let mut th = Throttle::new(ms(16));
        th.offer(1, t0);
        th.offer(2, t0 + ms(1));
        th.cancel();
        assert!(!th.has_pending());
        assert_eq!(th.poll(t0 + ms(100)), None);
        assert_eq!(th.offer(4, t0 + ms(101)), Some(4));
    }
}

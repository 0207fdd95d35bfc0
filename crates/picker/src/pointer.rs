use std::time::Duration;

use instant::Instant;

/// Minimum time between two field regenerations caused by hue changes.
pub const DEFAULT_REGEN_INTERVAL: Duration = Duration::from_millis(50);

/// Pointer interaction state of a field or slider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PointerState {
    #[default]
    Idle,
    Dragging,
}

impl PointerState {
    #[inline]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging)
    }
}

/// A monotonic-clock gate that caps how often an expensive regeneration may run.
///
/// Nothing is scheduled: a request that arrives too early is remembered as pending and
/// granted by a later [`RegenThrottle::poll`] once the interval has passed.
#[derive(Clone, Debug)]
pub struct RegenThrottle {
    interval: Duration,
    last: Option<Instant>,
    pending: bool,
}

impl Default for RegenThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_REGEN_INTERVAL)
    }
}

impl RegenThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
            pending: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true if a request was deferred and has not been granted yet.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Ask to regenerate at `now`, returns true if the caller may do so right away.
    pub fn request(&mut self, now: Instant) -> bool {
        if self.ready(now) {
            self.grant(now);
            true
        } else {
            self.pending = true;
            false
        }
    }

    /// Grant a deferred request if the interval has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.pending && self.ready(now) {
            self.grant(now);
            true
        } else {
            false
        }
    }

    /// Forget the deferred request, e.g. after an unthrottled regeneration.
    pub fn reset_pending(&mut self) {
        self.pending = false;
    }

    fn ready(&self, now: Instant) -> bool {
        match self.last {
            None => true,
            Some(last) => now.duration_since(last) >= self.interval,
        }
    }

    fn grant(&mut self, now: Instant) {
        self.last = Some(now);
        self.pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_state() {
        assert_eq!(PointerState::default(), PointerState::Idle);
        assert!(PointerState::Dragging.is_dragging());
        assert!(!PointerState::Idle.is_dragging());
    }

    #[test]
    fn test_throttle_first_request_passes() {
        let mut throttle = RegenThrottle::default();
        assert_eq!(throttle.interval(), Duration::from_millis(50));
        assert!(throttle.request(Instant::now()));
        assert!(!throttle.is_pending());
    }

    #[test]
    fn test_throttle_defers_and_polls() {
        let start = Instant::now();
        let mut throttle = RegenThrottle::new(Duration::from_millis(50));

        assert!(throttle.request(start));
        assert!(!throttle.request(start + Duration::from_millis(10)));
        assert!(throttle.is_pending());

        // Still too early.
        assert!(!throttle.poll(start + Duration::from_millis(49)));
        assert!(throttle.is_pending());

        assert!(throttle.poll(start + Duration::from_millis(50)));
        assert!(!throttle.is_pending());

        // Nothing pending, nothing granted.
        assert!(!throttle.poll(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_throttle_reset_pending() {
        let start = Instant::now();
        let mut throttle = RegenThrottle::default();
        assert!(throttle.request(start));
        assert!(!throttle.request(start + Duration::from_millis(1)));
        throttle.reset_pending();
        assert!(!throttle.poll(start + Duration::from_secs(1)));
    }
}

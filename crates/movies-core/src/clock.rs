use jiff::Timestamp;

/// Source of the timestamps a store writes into `created_at`/`updated_at`.
pub trait Clock: Send + Sync + 'static {
    /// Returns the current UTC time of the clock.
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// A manually driven clock for tests.
///
/// Clones share the same underlying time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: std::sync::Arc<std::sync::Mutex<Timestamp>>,
}

impl ManualClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            inner: std::sync::Arc::new(std::sync::Mutex::new(now)),
        }
    }

    /// Moves the clock to `target`, forwards or backwards.
    pub fn set(&self, target: Timestamp) {
        let mut now = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *now = target;
    }

    /// Advances the clock by `duration`.
    pub fn advance(&self, duration: jiff::SignedDuration) {
        let mut now = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *now = *now + duration;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;

    #[test]
    fn manual_clock_works() {
        let base = Timestamp::from_second(0).unwrap();
        let clock = ManualClock::new(base);
        assert_eq!(clock.now(), base);

        clock.advance(SignedDuration::from_secs(10));
        assert_eq!(clock.now(), Timestamp::from_second(10).unwrap());

        // clones observe the same time
        let other = clock.clone();
        other.set(base);
        assert_eq!(clock.now(), base);
    }

    #[test]
    fn system_clock_is_close_to_now() {
        let before = Timestamp::now();
        let now = SystemClock.now();
        assert!(now >= before);
    }
}

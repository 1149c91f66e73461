//! The service wake lock.
//!
//! Acquire and release are both idempotent. Release never fails from the
//! caller's point of view: platform errors are logged and dropped.

use std::{sync::Arc, time::Duration};

use tracing::{debug, warn};

use crate::platform::PowerManager;

/// Singleton wake lock held while the overlay is attached.
#[derive(Clone)]
pub struct WakeLock {
    power: Arc<dyn PowerManager>,
    tag: String,
}

impl WakeLock {
    pub fn new(power: Arc<dyn PowerManager>, tag: impl Into<String>) -> Self {
        Self {
            power,
            tag: tag.into(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is_held(&self) -> bool {
        self.power.is_held(&self.tag)
    }

    /// Acquire unless already held. Returns whether the lock is held afterwards.
    pub fn acquire(&self) -> bool {
        if self.is_held() {
            debug!(tag = %self.tag, "wake lock already held");
            return true;
        }
        match self.power.acquire(&self.tag, None) {
            Ok(()) => {
                debug!(tag = %self.tag, "wake lock acquired");
                true
            }
            Err(err) => {
                warn!(?err, tag = %self.tag, "error acquiring wake lock");
                false
            }
        }
    }

    /// Release if held.
    pub fn release(&self) {
        if !self.is_held() {
            return;
        }
        match self.power.release(&self.tag) {
            Ok(()) => debug!(tag = %self.tag, "wake lock released"),
            Err(err) => warn!(?err, tag = %self.tag, "error releasing wake lock"),
        }
    }
}

/// Acquire a wake lock with a timeout and release it straight away, briefly
/// poking the power manager.
pub fn pulse(power: &dyn PowerManager, tag: &str, duration: Duration) {
    if let Err(err) = power.acquire(tag, Some(duration)) {
        warn!(?err, tag, "wake lock pulse: acquire failed");
        return;
    }
    if let Err(err) = power.release(tag) {
        warn!(?err, tag, "wake lock pulse: release failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessPower;

    #[test]
    fn acquire_and_release_are_idempotent() {
        let power = HeadlessPower::new();
        let lock = WakeLock::new(Arc::new(power.clone()), "t");
        assert!(lock.acquire());
        assert!(lock.acquire());
        assert_eq!(power.count("acquire:t"), 1);
        lock.release();
        lock.release();
        assert_eq!(power.count("release:t"), 1);
        assert!(!lock.is_held());
    }

    #[test]
    fn release_error_is_swallowed() {
        let power = HeadlessPower::new();
        let lock = WakeLock::new(Arc::new(power.clone()), "t");
        lock.acquire();
        power.set_fail_release(true);
        lock.release();
        assert!(power.calls_contains("release:t"));
    }

    #[test]
    fn failed_acquire_reports_not_held() {
        let power = HeadlessPower::new();
        power.set_fail_acquire(true);
        let lock = WakeLock::new(Arc::new(power), "t");
        assert!(!lock.acquire());
        assert!(!lock.is_held());
    }

    #[test]
    fn pulse_acquires_with_timeout_then_releases() {
        let power = HeadlessPower::new();
        pulse(&power, "screen", Duration::from_millis(1000));
        assert_eq!(
            power.calls(),
            vec!["acquire:screen:1000ms".to_string(), "release:screen".into()]
        );
        assert!(!power.is_held("screen"));
    }
}

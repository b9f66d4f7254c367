//! Delays applied to scheduled timers.

use std::time::Duration;

use rand::Rng;

use crate::session::Timer;

/// Delay configuration for a [`LabRunner`](super::LabRunner).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Lower bound of the simulated command latency
    pub latency_min: Duration,
    /// Upper bound of the simulated command latency (inclusive)
    pub latency_max: Duration,
    /// Pause between a successful validation and auto-advance
    pub advance_delay: Duration,
    /// Pause before an error status returns to idle
    pub status_reset_delay: Duration,
}

impl Timing {
    /// No delays at all; timers fire on the next turn of the event loop.
    pub fn immediate() -> Self {
        Self {
            latency_min: Duration::ZERO,
            latency_max: Duration::ZERO,
            advance_delay: Duration::ZERO,
            status_reset_delay: Duration::ZERO,
        }
    }

    /// Delay before `timer` should fire.
    ///
    /// Command output latency is drawn uniformly from the configured range.
    pub fn delay_for(&self, timer: &Timer) -> Duration {
        match timer {
            Timer::CommandOutput { .. } => self.latency(),
            Timer::AutoAdvance { .. } => self.advance_delay,
            Timer::StatusReset { .. } => self.status_reset_delay,
        }
    }

    fn latency(&self) -> Duration {
        if self.latency_max <= self.latency_min {
            return self.latency_min;
        }
        let min = self.latency_min.as_millis() as u64;
        let max = self.latency_max.as_millis() as u64;
        Duration::from_millis(rand::rng().random_range(min..=max))
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            latency_min: Duration::from_millis(100),
            latency_max: Duration::from_millis(600),
            advance_delay: Duration::from_millis(1500),
            status_reset_delay: Duration::from_millis(2000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_latency_stays_in_range() {
        let timing = Timing::default();
        for ticket in 0..50 {
            let delay = timing.delay_for(&Timer::CommandOutput { ticket });
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_millis(600));
        }
    }

    #[test]
    fn test_settle_delays() {
        let timing = Timing::default();
        assert_eq!(
            timing.delay_for(&Timer::AutoAdvance { generation: 1 }),
            Duration::from_millis(1500)
        );
        assert_eq!(
            timing.delay_for(&Timer::StatusReset { generation: 1 }),
            Duration::from_millis(2000)
        );
    }

    #[test]
    fn test_immediate_is_zero() {
        let timing = Timing::immediate();
        assert_eq!(timing.delay_for(&Timer::CommandOutput { ticket: 1 }), Duration::ZERO);
        assert_eq!(timing.delay_for(&Timer::AutoAdvance { generation: 1 }), Duration::ZERO);
    }
}

//! Randomized pauses between requests.

use std::time::Duration;

use super::strategy::DelayRange;

/// Sleeps for randomized durations, scaled by a pacing factor.
///
/// A factor of `0.0` disables every pause, which is what tests and CI runs
/// use. Pauses only shape the request timing the site sees; nothing depends on
/// them for correctness.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    factor: f64,
}

impl Pacer {
    /// Creates a pacer. Negative or non-finite factors are treated as zero.
    pub fn new(factor: f64) -> Self {
        let factor = if factor.is_finite() && factor > 0.0 { factor } else { 0.0 };
        Self { factor }
    }

    /// A pacer that never sleeps.
    pub fn disabled() -> Self {
        Self { factor: 0.0 }
    }

    /// Draws the scaled delay for `range` without sleeping.
    pub fn draw(&self, range: &DelayRange) -> Duration {
        if self.factor == 0.0 {
            return Duration::ZERO;
        }
        let sampled = range.sample(&mut rand::thread_rng());
        sampled.mul_f64(self.factor)
    }

    /// Sleeps for a delay drawn from `range` and returns how long it slept.
    pub async fn pause(&self, range: &DelayRange) -> Duration {
        let delay = self.draw(range);
        if !delay.is_zero() {
            tracing::debug!(delay_ms = delay.as_millis() as u64, "Pacing before next request.");
            tokio::time::sleep(delay).await;
        }
        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_pacer_draws_zero() {
        let range = DelayRange::millis(1_000, 2_000);
        assert_eq!(Pacer::disabled().draw(&range), Duration::ZERO);
        assert_eq!(Pacer::new(-1.0).draw(&range), Duration::ZERO);
        assert_eq!(Pacer::new(f64::NAN).draw(&range), Duration::ZERO);
    }

    #[test]
    fn test_factor_scales_delay() {
        let range = DelayRange::millis(1_000, 1_000);
        assert_eq!(Pacer::new(0.5).draw(&range), Duration::from_millis(500));
        assert_eq!(Pacer::new(1.0).draw(&range), Duration::from_millis(1_000));
    }

    #[tokio::test]
    async fn test_pause_sleeps_for_drawn_delay() {
        let pacer = Pacer::new(1.0);
        let start = tokio::time::Instant::now();
        let slept = pacer.pause(&DelayRange::millis(20, 20)).await;
        assert_eq!(slept, Duration::from_millis(20));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}

//! ETA and throughput estimation.
//!
//! [`RateEstimator`] keeps an exponential moving average of the time spent per
//! unit of work, measured between consecutive redraws. The smoothed rate gives an
//! estimated total duration, and the ETA is that estimate minus the time already
//! spent, floored at zero.

use std::time::Duration;

/// Default weight given to the newest rate sample.
pub const DEFAULT_SMOOTHING: f64 = 0.3;

/// Timing figures produced by one [`RateEstimator::sample`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RateSample {
    /// Estimated time remaining.
    pub eta: Duration,
    /// Average units per second since start.
    pub throughput: f64,
}

/// Exponential moving average of seconds-per-unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateEstimator {
    smoothed: f64,
    alpha: f64,
}

impl Default for RateEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING)
    }
}

impl RateEstimator {
    /// Creates an estimator with smoothing factor `alpha`.
    ///
    /// Values outside the open interval `(0, 1)` (and NaN) fall back to
    /// [`DEFAULT_SMOOTHING`].
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        let alpha = if alpha > 0.0 && alpha < 1.0 {
            alpha
        } else {
            DEFAULT_SMOOTHING
        };
        Self {
            smoothed: 0.0,
            alpha,
        }
    }

    /// The smoothing factor in use.
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Smoothed seconds per unit, or `0.0` before the first valid sample.
    #[must_use]
    pub const fn seconds_per_unit(&self) -> f64 {
        self.smoothed
    }

    /// Folds the interval since the previous redraw into the average and returns
    /// fresh ETA and throughput figures.
    ///
    /// # Parameters
    ///
    /// * `elapsed`, `current`: time since start and position now.
    /// * `last_elapsed`, `last_count`: the same pair at the previous redraw.
    /// * `total`: the position that counts as complete.
    ///
    /// A rate sample is only taken when both time and position advanced. With
    /// `current == 0` nothing is measurable and both figures are zero.
    pub fn sample(
        &mut self,
        elapsed: Duration,
        current: u64,
        last_elapsed: Duration,
        last_count: u64,
        total: u64,
    ) -> RateSample {
        if current == 0 {
            return RateSample::default();
        }

        let secs = elapsed.as_secs_f64();
        let throughput = if secs > 0.0 {
            current as f64 / secs
        } else {
            0.0
        };

        let delta_t = secs - last_elapsed.as_secs_f64();
        let delta_n = current.saturating_sub(last_count);
        if delta_t > 0.0 && delta_n > 0 {
            let instantaneous = delta_t / delta_n as f64;
            self.smoothed = if self.smoothed == 0.0 {
                instantaneous
            } else {
                self.alpha * instantaneous + (1.0 - self.alpha) * self.smoothed
            };
        }

        let estimated_total = self.smoothed * total as f64;
        let remaining = (estimated_total - secs).max(0.0);

        RateSample {
            eta: Duration::try_from_secs_f64(remaining).unwrap_or(Duration::MAX),
            throughput,
        }
    }
}

//! Step detection
//!
//! Fixed-threshold rising-edge detection over accelerometer magnitude. A step
//! is the instant the magnitude crosses the threshold from at-or-below to
//! above; sustained high readings do not retrigger until the magnitude dips
//! back to the threshold or below.

use serde::{Deserialize, Serialize};

use crate::config::StepDetectorConfig;
use crate::types::{MotionSample, StepEvent};

/// Rising-edge step detector over the magnitude stream
///
/// Holds one sample of memory. Callers feed samples in timestamp order; the
/// detector recognizes edges, it does not reorder or diagnose out-of-order
/// input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDetector {
    config: StepDetectorConfig,
    /// Magnitude of the previous sample, updated on every observation
    last_magnitude: f64,
    /// Timestamp of the last emitted step, for refractory gating
    last_step_ms: Option<u64>,
}

impl Default for StepDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl StepDetector {
    /// Create a detector with default tuning
    pub fn new() -> Self {
        Self::with_config(StepDetectorConfig::default())
    }

    /// Create a detector with explicit tuning
    pub fn with_config(config: StepDetectorConfig) -> Self {
        Self {
            config,
            last_magnitude: 0.0,
            last_step_ms: None,
        }
    }

    /// Observe one magnitude sample, returning a step event on a rising edge
    ///
    /// The previous-magnitude memory updates on every finite sample whether
    /// or not a step fires. A crossing inside the refractory window of the
    /// last emitted step is dropped, but still updates that memory, so the
    /// next genuine rise is judged against the true signal level.
    pub fn observe(&mut self, sample: MotionSample) -> Option<StepEvent> {
        if !sample.magnitude.is_finite() {
            return None;
        }

        let crossed = sample.magnitude > self.config.step_threshold
            && self.last_magnitude <= self.config.step_threshold;
        self.last_magnitude = sample.magnitude;

        if !crossed {
            return None;
        }

        if self.config.refractory_ms > 0 {
            if let Some(prev_ms) = self.last_step_ms {
                if sample.t_ms.saturating_sub(prev_ms) < self.config.refractory_ms {
                    return None;
                }
            }
        }

        self.last_step_ms = Some(sample.t_ms);
        Some(StepEvent::new(sample.t_ms))
    }

    /// Magnitude of the most recently observed finite sample
    pub fn last_magnitude(&self) -> f64 {
        self.last_magnitude
    }

    pub fn config(&self) -> &StepDetectorConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_detector(threshold: f64, refractory_ms: u64) -> StepDetector {
        StepDetector::with_config(StepDetectorConfig {
            step_threshold: threshold,
            refractory_ms,
        })
    }

    #[test]
    fn test_rising_edge_fires_once() {
        let mut detector = make_detector(12.0, 0);

        assert!(detector.observe(MotionSample::new(9.0, 0)).is_none());
        assert!(detector.observe(MotionSample::new(14.0, 50)).is_some());
        // Still above threshold - no retrigger
        assert!(detector.observe(MotionSample::new(15.0, 100)).is_none());
        assert!(detector.observe(MotionSample::new(13.0, 150)).is_none());
    }

    #[test]
    fn test_retriggers_after_dip() {
        let mut detector = make_detector(12.0, 0);

        assert!(detector.observe(MotionSample::new(14.0, 0)).is_some());
        assert!(detector.observe(MotionSample::new(8.0, 400)).is_none());
        assert!(detector.observe(MotionSample::new(14.0, 800)).is_some());
    }

    #[test]
    fn test_exact_threshold_does_not_fire() {
        let mut detector = make_detector(12.0, 0);

        assert!(detector.observe(MotionSample::new(12.0, 0)).is_none());
        // From exactly-at to above is a crossing
        assert!(detector.observe(MotionSample::new(12.1, 50)).is_some());
    }

    #[test]
    fn test_last_magnitude_updates_on_every_sample() {
        let mut detector = make_detector(12.0, 0);

        detector.observe(MotionSample::new(3.0, 0));
        assert!((detector.last_magnitude() - 3.0).abs() < 1e-9);

        detector.observe(MotionSample::new(14.0, 50));
        assert!((detector.last_magnitude() - 14.0).abs() < 1e-9);

        // No step fired here, memory still updates
        detector.observe(MotionSample::new(15.0, 100));
        assert!((detector.last_magnitude() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_refractory_discards_crossing() {
        let mut detector = make_detector(12.0, 300);

        assert!(detector.observe(MotionSample::new(14.0, 0)).is_some());
        detector.observe(MotionSample::new(8.0, 100));
        // Crossing at 200ms is inside the 300ms window of the step at 0
        assert!(detector.observe(MotionSample::new(14.0, 200)).is_none());
        detector.observe(MotionSample::new(8.0, 300));
        // 400ms is clear of the window
        assert!(detector.observe(MotionSample::new(14.0, 400)).is_some());
    }

    #[test]
    fn test_refractory_discard_still_tracks_magnitude() {
        let mut detector = make_detector(12.0, 300);

        detector.observe(MotionSample::new(14.0, 0));
        detector.observe(MotionSample::new(8.0, 100));
        detector.observe(MotionSample::new(16.0, 200));
        assert!((detector.last_magnitude() - 16.0).abs() < 1e-9);
        // Sustained high after the discarded crossing must not retrigger
        assert!(detector.observe(MotionSample::new(17.0, 500)).is_none());
    }

    #[test]
    fn test_zero_refractory_disables_gating() {
        let mut detector = make_detector(12.0, 0);

        assert!(detector.observe(MotionSample::new(14.0, 0)).is_some());
        detector.observe(MotionSample::new(8.0, 10));
        assert!(detector.observe(MotionSample::new(14.0, 20)).is_some());
    }

    #[test]
    fn test_non_finite_magnitude_is_skipped() {
        let mut detector = make_detector(12.0, 0);

        detector.observe(MotionSample::new(9.0, 0));
        assert!(detector.observe(MotionSample::new(f64::NAN, 50)).is_none());
        assert!((detector.last_magnitude() - 9.0).abs() < 1e-9);
        // The NaN left no trace, so this is still a clean rising edge
        assert!(detector.observe(MotionSample::new(14.0, 100)).is_some());
    }

    #[test]
    fn test_first_sample_above_threshold_fires() {
        let mut detector = make_detector(12.0, 300);
        assert!(detector.observe(MotionSample::new(20.0, 0)).is_some());
    }

    #[test]
    fn test_synthetic_walk_counts_steps() {
        let mut detector = make_detector(12.0, 300);
        let mut steps = 0;

        // Two-phase stride: quiet floor with a spike every 500ms
        for i in 0..40u64 {
            let t_ms = i * 100;
            let magnitude = if i % 5 == 0 { 15.0 } else { 9.5 };
            if detector.observe(MotionSample::new(magnitude, t_ms)).is_some() {
                steps += 1;
            }
        }

        assert_eq!(steps, 8);
    }
}

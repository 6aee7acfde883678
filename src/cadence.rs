//! Cadence estimation
//!
//! Turns the step event stream into a smooth steps-per-minute value. Recent
//! step timestamps live in a bounded history window; each qualifying step
//! recomputes the average inter-step interval across the window and blends
//! the resulting instantaneous tempo into the running value, so single
//! outlier intervals are damped rather than passed through.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::config::CadenceConfig;
use crate::types::StepEvent;

/// Milliseconds per minute, for interval-to-tempo conversion
const MS_PER_MINUTE: f64 = 60_000.0;

/// Smoothed steps-per-minute estimator over a rolling step history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CadenceEstimator {
    config: CadenceConfig,
    /// Strictly increasing step timestamps, newest at the back
    history: VecDeque<u64>,
    /// Current blended tempo (steps per minute)
    tempo_spm: f64,
}

impl Default for CadenceEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl CadenceEstimator {
    /// Create an estimator with default tuning
    pub fn new() -> Self {
        Self::with_config(CadenceConfig::default())
    }

    /// Create an estimator with explicit tuning
    pub fn with_config(config: CadenceConfig) -> Self {
        Self {
            history: VecDeque::with_capacity(config.window),
            tempo_spm: config.initial_tempo_spm,
            config,
        }
    }

    /// Record a detected step and update the blended tempo
    ///
    /// A timestamp that does not advance past the newest recorded step is
    /// dropped whole, leaving both history and tempo untouched. Until the
    /// history holds two steps there is no interval to measure, so the
    /// tempo also holds.
    pub fn on_step(&mut self, event: StepEvent) {
        if let Some(&newest) = self.history.back() {
            if event.t_ms <= newest {
                return;
            }
        }

        self.history.push_back(event.t_ms);
        while self.history.len() > self.config.window {
            self.history.pop_front();
        }

        if self.history.len() < 2 {
            return;
        }

        let (oldest, newest) = match (self.history.front(), self.history.back()) {
            (Some(&oldest), Some(&newest)) => (oldest as f64, newest as f64),
            _ => return,
        };
        let avg_interval_ms = (newest - oldest) / (self.history.len() - 1) as f64;
        if avg_interval_ms <= 0.0 {
            return;
        }

        let instant_spm = MS_PER_MINUTE / avg_interval_ms;
        self.tempo_spm =
            self.tempo_spm * self.config.smoothing + instant_spm * (1.0 - self.config.smoothing);
    }

    /// Current blended tempo in steps per minute
    ///
    /// Pure read; calling it any number of times between steps returns the
    /// same value.
    pub fn current_tempo(&self) -> f64 {
        self.tempo_spm
    }

    /// Number of step timestamps currently held in the window
    pub fn steps_in_window(&self) -> usize {
        self.history.len()
    }

    pub fn config(&self) -> &CadenceConfig {
        &self.config
    }
}

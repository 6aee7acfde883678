//! Engine configuration
//!
//! Every tuning constant in the signal path is set here at construction time.
//! Validation happens once, up front; the per-sample code paths assume a
//! vetted configuration and never re-check it.

use serde::{Deserialize, Serialize};

use crate::error::PulseError;

/// Step detector tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepDetectorConfig {
    /// Magnitude threshold a sample must rise through to count as a step
    pub step_threshold: f64,
    /// Minimum spacing between emitted steps (milliseconds, 0 disables)
    pub refractory_ms: u64,
}

impl Default for StepDetectorConfig {
    fn default() -> Self {
        Self {
            step_threshold: 12.0,
            refractory_ms: 300,
        }
    }
}

impl StepDetectorConfig {
    pub fn validate(&self) -> Result<(), PulseError> {
        if !self.step_threshold.is_finite() || self.step_threshold <= 0.0 {
            return Err(PulseError::InvalidConfig(format!(
                "step_threshold must be finite and positive, got {}",
                self.step_threshold
            )));
        }
        Ok(())
    }
}

/// Cadence estimator tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    /// Number of step timestamps kept in the history window
    pub window: usize,
    /// Weight of the running tempo in the exponential blend (0.0 to 1.0 exclusive)
    pub smoothing: f64,
    /// Tempo reported before enough steps have arrived (steps per minute)
    pub initial_tempo_spm: f64,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            window: 5,
            smoothing: 0.7,
            initial_tempo_spm: 80.0,
        }
    }
}

impl CadenceConfig {
    pub fn validate(&self) -> Result<(), PulseError> {
        if self.window < 2 {
            return Err(PulseError::InvalidConfig(format!(
                "window must be at least 2, got {}",
                self.window
            )));
        }
        if !self.smoothing.is_finite() || !(0.0..1.0).contains(&self.smoothing) {
            return Err(PulseError::InvalidConfig(format!(
                "smoothing must be in [0.0, 1.0), got {}",
                self.smoothing
            )));
        }
        if !self.initial_tempo_spm.is_finite() || self.initial_tempo_spm <= 0.0 {
            return Err(PulseError::InvalidConfig(format!(
                "initial_tempo_spm must be finite and positive, got {}",
                self.initial_tempo_spm
            )));
        }
        Ok(())
    }
}

/// Vitals mapper tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VitalsConfig {
    /// Heart rate mapped to intensity 0.0 (bpm)
    pub hr_low: u32,
    /// Heart rate mapped to intensity 1.0 (bpm)
    pub hr_high: u32,
    /// Filter cutoff at intensity 0.0 (Hz)
    pub bright_low_hz: f64,
    /// Filter cutoff at intensity 1.0 (Hz)
    pub bright_high_hz: f64,
    /// Heart rate assumed before the first reading arrives (bpm)
    pub initial_bpm: u32,
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            hr_low: 60,
            hr_high: 160,
            bright_low_hz: 200.0,
            bright_high_hz: 5000.0,
            initial_bpm: 70,
        }
    }
}

impl VitalsConfig {
    pub fn validate(&self) -> Result<(), PulseError> {
        if self.hr_high <= self.hr_low {
            return Err(PulseError::InvalidConfig(format!(
                "hr_high ({}) must exceed hr_low ({})",
                self.hr_high, self.hr_low
            )));
        }
        if !self.bright_low_hz.is_finite() || !self.bright_high_hz.is_finite() {
            return Err(PulseError::InvalidConfig(
                "brightness bounds must be finite".to_string(),
            ));
        }
        if self.bright_high_hz <= self.bright_low_hz {
            return Err(PulseError::InvalidConfig(format!(
                "bright_high_hz ({}) must exceed bright_low_hz ({})",
                self.bright_high_hz, self.bright_low_hz
            )));
        }
        Ok(())
    }
}

/// Aggregate configuration for a full processor
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub step_detector: StepDetectorConfig,
    pub cadence: CadenceConfig,
    pub vitals: VitalsConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), PulseError> {
        self.step_detector.validate()?;
        self.cadence.validate()?;
        self.vitals.validate()?;
        Ok(())
    }

    /// Parse a config from JSON, filling omitted fields with defaults
    pub fn from_json(json: &str) -> Result<Self, PulseError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, PulseError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_threshold() {
        let mut config = EngineConfig::default();
        config.step_detector.step_threshold = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_nan_threshold() {
        let mut config = EngineConfig::default();
        config.step_detector.step_threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_tiny_window() {
        let mut config = EngineConfig::default();
        config.cadence.window = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_smoothing_of_one() {
        // 1.0 would freeze the tempo forever
        let mut config = EngineConfig::default();
        config.cadence.smoothing = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_accepts_zero_smoothing() {
        let mut config = EngineConfig::default();
        config.cadence.smoothing = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_hr_range() {
        let mut config = EngineConfig::default();
        config.vitals.hr_low = 160;
        config.vitals.hr_high = 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_brightness_range() {
        let mut config = EngineConfig::default();
        config.vitals.bright_low_hz = 5000.0;
        config.vitals.bright_high_hz = 200.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = EngineConfig::from_json(r#"{"cadence":{"window":8}}"#).unwrap();
        assert_eq!(config.cadence.window, 8);
        assert_eq!(config.cadence.smoothing, 0.7);
        assert_eq!(config.step_detector.refractory_ms, 300);
    }

    #[test]
    fn test_json_round_trip() {
        let config = EngineConfig::default();
        let json = config.to_json().unwrap();
        let restored = EngineConfig::from_json(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn test_invalid_json_config_is_rejected() {
        assert!(EngineConfig::from_json(r#"{"cadence":{"window":1}}"#).is_err());
    }
}

//! Vitals mapping
//!
//! Maps the heart rate stream onto the audio control axes: a normalized
//! exertion intensity, a discrete timbre band, and a filter cutoff
//! frequency. All three are pure functions of the most recent clamped
//! reading, so they can be read at any rate without drifting apart.

use serde::{Deserialize, Serialize};

use crate::config::VitalsConfig;
use crate::types::{TimbreClass, Waveform};

/// Lowest heart rate accepted as a live reading (bpm)
const MIN_PLAUSIBLE_BPM: u32 = 30;
/// Highest heart rate accepted as a live reading (bpm)
const MAX_PLAUSIBLE_BPM: u32 = 300;

/// Raw heart rate at which the timbre band changes from Calm to Clear (bpm)
const CLEAR_BAND_BPM: u32 = 90;
/// Raw heart rate at which the timbre band changes from Clear to Sharp (bpm)
const SHARP_BAND_BPM: u32 = 130;

/// Heart-rate-to-control-axis mapper
///
/// Holds the most recent plausibility-clamped reading. Implausible values
/// clamp into range rather than being rejected, so the output stream never
/// stalls on a glitchy monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalsMapper {
    config: VitalsConfig,
    /// Most recent clamped heart rate (bpm)
    bpm: u32,
}

impl Default for VitalsMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl VitalsMapper {
    /// Create a mapper with default tuning
    pub fn new() -> Self {
        Self::with_config(VitalsConfig::default())
    }

    /// Create a mapper with explicit tuning
    ///
    /// Until the first reading arrives the mapper reports the configured
    /// resting default, so downstream output is well-defined from the start.
    pub fn with_config(config: VitalsConfig) -> Self {
        Self {
            bpm: config.initial_bpm.clamp(MIN_PLAUSIBLE_BPM, MAX_PLAUSIBLE_BPM),
            config,
        }
    }

    /// Ingest a heart rate reading, clamping it into the plausible band
    pub fn on_heart_rate(&mut self, bpm: u32) {
        self.bpm = bpm.clamp(MIN_PLAUSIBLE_BPM, MAX_PLAUSIBLE_BPM);
    }

    /// Most recent clamped heart rate (bpm)
    pub fn heart_rate(&self) -> u32 {
        self.bpm
    }

    /// Normalized exertion level in 0.0 to 1.0
    pub fn intensity(&self) -> f64 {
        let low = self.config.hr_low as f64;
        let high = self.config.hr_high as f64;
        ((self.bpm as f64 - low) / (high - low)).clamp(0.0, 1.0)
    }

    /// Timbre band for the current raw heart rate
    ///
    /// Bands are fixed ranges with no hysteresis; a reading oscillating
    /// around a boundary flips the band each time.
    pub fn timbre(&self) -> TimbreClass {
        if self.bpm < CLEAR_BAND_BPM {
            TimbreClass::Calm
        } else if self.bpm < SHARP_BAND_BPM {
            TimbreClass::Clear
        } else {
            TimbreClass::Sharp
        }
    }

    /// Oscillator waveform for the current timbre band
    pub fn waveform(&self) -> Waveform {
        self.timbre().waveform()
    }

    /// Filter cutoff frequency in Hz, interpolated from intensity
    ///
    /// Recomputed from the current intensity on every call rather than
    /// cached, so it can never fall out of step with it.
    pub fn brightness_hz(&self) -> f64 {
        let span = self.config.bright_high_hz - self.config.bright_low_hz;
        self.config.bright_low_hz + self.intensity() * span
    }

    pub fn config(&self) -> &VitalsConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_mapper() -> VitalsMapper {
        VitalsMapper::new()
    }

    #[test]
    fn test_intensity_at_range_ends() {
        let mut mapper = make_mapper();

        mapper.on_heart_rate(60);
        assert!((mapper.intensity() - 0.0).abs() < 1e-9);

        mapper.on_heart_rate(160);
        assert!((mapper.intensity() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_intensity_saturates_above_range() {
        let mut mapper = make_mapper();
        mapper.on_heart_rate(220);
        assert!((mapper.intensity() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_intensity_saturates_below_range() {
        let mut mapper = make_mapper();
        mapper.on_heart_rate(45);
        assert!((mapper.intensity() - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_intensity_midpoint() {
        let mut mapper = make_mapper();
        mapper.on_heart_rate(110);
        assert!((mapper.intensity() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_timbre_band_boundaries() {
        let mut mapper = make_mapper();

        mapper.on_heart_rate(89);
        assert_eq!(mapper.timbre(), TimbreClass::Calm);

        mapper.on_heart_rate(90);
        assert_eq!(mapper.timbre(), TimbreClass::Clear);

        mapper.on_heart_rate(129);
        assert_eq!(mapper.timbre(), TimbreClass::Clear);

        mapper.on_heart_rate(130);
        assert_eq!(mapper.timbre(), TimbreClass::Sharp);
    }

    #[test]
    fn test_timbre_follows_raw_bpm_not_intensity() {
        // 89 bpm is Calm even though intensity is well above zero
        let mut mapper = make_mapper();
        mapper.on_heart_rate(89);
        assert!(mapper.intensity() > 0.25);
        assert_eq!(mapper.timbre(), TimbreClass::Calm);
    }

    #[test]
    fn test_waveform_tracks_timbre() {
        let mut mapper = make_mapper();

        mapper.on_heart_rate(70);
        assert_eq!(mapper.waveform(), Waveform::Sine);

        mapper.on_heart_rate(100);
        assert_eq!(mapper.waveform(), Waveform::Triangle);

        mapper.on_heart_rate(150);
        assert_eq!(mapper.waveform(), Waveform::Sawtooth);
    }

    #[test]
    fn test_brightness_midpoint() {
        let mut mapper = make_mapper();
        mapper.on_heart_rate(110);
        // 200 + 0.5 * 4800 = 2600
        assert!((mapper.brightness_hz() - 2600.0).abs() < 1e-9);
    }

    #[test]
    fn test_brightness_spans_configured_range() {
        let mut mapper = make_mapper();

        mapper.on_heart_rate(60);
        assert!((mapper.brightness_hz() - 200.0).abs() < 1e-9);

        mapper.on_heart_rate(160);
        assert!((mapper.brightness_hz() - 5000.0).abs() < 1e-9);
    }

    #[test]
    fn test_implausible_readings_clamp_not_reject() {
        let mut mapper = make_mapper();

        mapper.on_heart_rate(0);
        assert_eq!(mapper.heart_rate(), 30);
        assert_eq!(mapper.timbre(), TimbreClass::Calm);

        mapper.on_heart_rate(1000);
        assert_eq!(mapper.heart_rate(), 300);
        assert_eq!(mapper.timbre(), TimbreClass::Sharp);
        assert!((mapper.intensity() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_resting_default_before_first_reading() {
        let mapper = make_mapper();
        assert_eq!(mapper.heart_rate(), 70);
        assert_eq!(mapper.timbre(), TimbreClass::Calm);
        // (70 - 60) / 100 = 0.1, 200 + 0.1 * 4800 = 680
        assert!((mapper.intensity() - 0.1).abs() < 1e-9);
        assert!((mapper.brightness_hz() - 680.0).abs() < 1e-9);
    }
}

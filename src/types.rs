//! Core types for the Synheart Pulse pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: motion samples, step events, and the emitted control signal.

use serde::{Deserialize, Serialize};

/// A single accelerometer magnitude sample
///
/// Ephemeral input to the step detector. Consumed once and discarded; only
/// the detector's rolling state survives it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    /// Combined acceleration magnitude (including gravity)
    pub magnitude: f64,
    /// Sample timestamp (milliseconds, monotonically non-decreasing)
    pub t_ms: u64,
}

impl MotionSample {
    pub fn new(magnitude: f64, t_ms: u64) -> Self {
        Self { magnitude, t_ms }
    }
}

/// A detected footfall
///
/// Immutable once created. Carries only the detection timestamp; everything
/// else the cadence estimator needs it derives itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEvent {
    /// Detection timestamp (milliseconds)
    pub t_ms: u64,
}

impl StepEvent {
    pub fn new(t_ms: u64) -> Self {
        Self { t_ms }
    }
}

/// Timbre classification derived from heart rate bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimbreClass {
    /// Below 90 bpm
    Calm,
    /// 90 to 129 bpm
    Clear,
    /// 130 bpm and above
    Sharp,
}

impl TimbreClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimbreClass::Calm => "calm",
            TimbreClass::Clear => "clear",
            TimbreClass::Sharp => "sharp",
        }
    }

    /// Oscillator waveform the synthesis layer should use for this class
    pub fn waveform(&self) -> Waveform {
        match self {
            TimbreClass::Calm => Waveform::Sine,
            TimbreClass::Clear => Waveform::Triangle,
            TimbreClass::Sharp => Waveform::Sawtooth,
        }
    }
}

/// Oscillator waveform selection for the synthesis layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
}

impl Waveform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Triangle => "triangle",
            Waveform::Sawtooth => "sawtooth",
        }
    }
}

/// The complete control state handed to the audio layer on each tick
///
/// An immutable snapshot. Consumers receive a copy; reading it never
/// disturbs the accumulating estimators behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSignal {
    /// Musical tempo in beats per minute (tracks cadence in steps per minute)
    pub tempo_bpm: f64,
    /// Timbre band for the current heart rate
    pub timbre: TimbreClass,
    /// Oscillator waveform matching the timbre band
    pub waveform: Waveform,
    /// Filter cutoff frequency (Hz)
    pub brightness_hz: f64,
    /// Normalized exertion level (0.0 to 1.0)
    pub intensity: f64,
    /// Most recent plausibility-clamped heart rate (bpm)
    pub heart_rate_bpm: u32,
}

//! Pipeline orchestration
//!
//! This module provides the public API for Synheart Pulse. It wires the
//! detector, estimators, and emitter into one stateful processor and offers
//! a batch replay entry point for recorded event streams.

use serde::{Deserialize, Serialize};

use crate::adapters;
use crate::cadence::CadenceEstimator;
use crate::config::EngineConfig;
use crate::emitter::ControlSignalEmitter;
use crate::error::PulseError;
use crate::schema::{ControlFrame, ControlFrameEncoder, SensorEvent};
use crate::step_detector::StepDetector;
use crate::types::{ControlSignal, MotionSample, StepEvent};
use crate::vitals::VitalsMapper;

/// Stateful processor for live sensor streams
///
/// Owns every estimator exclusively; hosts feed the two input streams in
/// any interleaving and poll `tick` at whatever rate suits their renderer.
/// All methods are synchronous and never block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulseProcessor {
    step_detector: StepDetector,
    cadence: CadenceEstimator,
    vitals: VitalsMapper,
    emitter: ControlSignalEmitter,
    #[serde(skip, default)]
    encoder: ControlFrameEncoder,
}

impl Default for PulseProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseProcessor {
    /// Create a processor with default tuning
    pub fn new() -> Self {
        Self {
            step_detector: StepDetector::new(),
            cadence: CadenceEstimator::new(),
            vitals: VitalsMapper::new(),
            emitter: ControlSignalEmitter::new(),
            encoder: ControlFrameEncoder::new(),
        }
    }

    /// Create a processor with explicit tuning
    ///
    /// Configuration is validated here, once; the per-sample paths assume a
    /// vetted configuration.
    pub fn with_config(config: EngineConfig) -> Result<Self, PulseError> {
        config.validate()?;
        Ok(Self {
            step_detector: StepDetector::with_config(config.step_detector),
            cadence: CadenceEstimator::with_config(config.cadence),
            vitals: VitalsMapper::with_config(config.vitals),
            emitter: ControlSignalEmitter::new(),
            encoder: ControlFrameEncoder::new(),
        })
    }

    /// Feed one motion sample; returns the step event if one fired
    pub fn process_motion(&mut self, sample: MotionSample) -> Option<StepEvent> {
        let step = self.step_detector.observe(sample)?;
        self.cadence.on_step(step);
        Some(step)
    }

    /// Feed one decoded heart rate reading
    pub fn process_heart_rate(&mut self, bpm: u32) {
        self.vitals.on_heart_rate(bpm);
    }

    /// Feed one schema-level sensor event
    ///
    /// Motion events with no finite axis are skipped without error so a
    /// live stream keeps flowing; an undecodable heart rate frame is a real
    /// fault and is reported to the caller.
    pub fn process_event(&mut self, event: &SensorEvent) -> Result<Option<StepEvent>, PulseError> {
        match event {
            SensorEvent::Motion { t_ms, x, y, z } => {
                match adapters::motion_sample_from_axes(*t_ms, *x, *y, *z) {
                    Some(sample) => Ok(self.process_motion(sample)),
                    None => Ok(None),
                }
            }
            SensorEvent::HeartRate { bpm, .. } => {
                self.process_heart_rate(*bpm);
                Ok(None)
            }
            SensorEvent::HeartRateFrame { bytes, .. } => {
                let bpm = adapters::decode_heart_rate_frame(bytes)?;
                self.process_heart_rate(bpm);
                Ok(None)
            }
        }
    }

    /// Snapshot the current control state
    pub fn tick(&mut self) -> ControlSignal {
        self.emitter.tick(&self.cadence, &self.vitals)
    }

    /// Snapshot the current control state, suppressing unchanged output
    pub fn tick_if_changed(&mut self) -> Option<ControlSignal> {
        self.emitter.tick_if_changed(&self.cadence, &self.vitals)
    }

    /// Snapshot into a stamped control frame
    pub fn tick_frame(&mut self, t_ms: u64) -> ControlFrame {
        let signal = self.tick();
        self.encoder.encode(t_ms, signal)
    }

    /// Snapshot into a stamped control frame, suppressing unchanged output
    pub fn tick_frame_if_changed(&mut self, t_ms: u64) -> Option<ControlFrame> {
        let signal = self.tick_if_changed()?;
        Some(self.encoder.encode(t_ms, signal))
    }

    pub fn current_tempo(&self) -> f64 {
        self.cadence.current_tempo()
    }

    pub fn heart_rate(&self) -> u32 {
        self.vitals.heart_rate()
    }

    /// Tuning currently driving the components
    pub fn config(&self) -> EngineConfig {
        EngineConfig {
            step_detector: *self.step_detector.config(),
            cadence: *self.cadence.config(),
            vitals: *self.vitals.config(),
        }
    }

    /// Restore estimator state saved with [`to_json`](Self::to_json)
    ///
    /// The carried configuration is re-validated, so a tampered state file
    /// fails here rather than misbehaving at tick time. The restored
    /// processor is a fresh producer instance: frames it emits carry a new
    /// instance ID and restart the sequence at zero.
    pub fn from_json(json: &str) -> Result<Self, PulseError> {
        let processor: Self = serde_json::from_str(json)?;
        processor.config().validate()?;
        Ok(processor)
    }

    /// Serialize estimator state for later restoration
    pub fn to_json(&self) -> Result<String, PulseError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Replay a recorded event stream into control frames.
///
/// Frames land on a fixed event-time grid: one frame each `tick_ms` of
/// event time starting from the first event's timestamp, plus a closing
/// frame at the final event when state changed after the last grid line.
///
/// # Arguments
/// * `events` - Recorded sensor events in timestamp order
/// * `config` - Engine tuning, validated before any event is processed
/// * `tick_ms` - Event-time milliseconds between frames
/// * `emit_on_change` - Drop grid frames that repeat the previous signal
///
/// # Returns
/// Control frames in emission order
///
/// # Example
/// ```ignore
/// let frames = replay_events(&events, EngineConfig::default(), 250, false)?;
/// ```
pub fn replay_events(
    events: &[SensorEvent],
    config: EngineConfig,
    tick_ms: u64,
    emit_on_change: bool,
) -> Result<Vec<ControlFrame>, PulseError> {
    if tick_ms == 0 {
        return Err(PulseError::InvalidConfig(
            "tick_ms must be positive".to_string(),
        ));
    }

    let mut processor = PulseProcessor::with_config(config)?;
    let mut frames = Vec::new();

    let first_t = match events.first() {
        Some(event) => event.t_ms(),
        None => return Ok(frames),
    };
    let mut next_tick_ms = first_t + tick_ms;
    let mut last_t = first_t;
    let mut pending = false;

    for event in events {
        while event.t_ms() >= next_tick_ms {
            emit(&mut processor, &mut frames, next_tick_ms, emit_on_change);
            pending = false;
            next_tick_ms += tick_ms;
        }
        processor.process_event(event)?;
        pending = true;
        last_t = event.t_ms();
    }

    if pending {
        emit(&mut processor, &mut frames, last_t, emit_on_change);
    }

    Ok(frames)
}

fn emit(
    processor: &mut PulseProcessor,
    frames: &mut Vec<ControlFrame>,
    t_ms: u64,
    emit_on_change: bool,
) {
    if emit_on_change {
        if let Some(frame) = processor.tick_frame_if_changed(t_ms) {
            frames.push(frame);
        }
    } else {
        frames.push(processor.tick_frame(t_ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TimbreClass, Waveform};

    fn make_walk_events() -> Vec<SensorEvent> {
        // Footfall spikes every 500ms over a quiet 9.8 floor, one heart
        // rate reading partway through
        let mut events = Vec::new();
        for i in 0..8u64 {
            let t_ms = i * 250;
            let magnitude = if i % 2 == 0 { 15.0 } else { 9.8 };
            events.push(SensorEvent::Motion {
                t_ms,
                x: Some(0.0),
                y: Some(0.0),
                z: Some(magnitude),
            });
        }
        events.push(SensorEvent::HeartRate { t_ms: 1800, bpm: 110 });
        events
    }

    #[test]
    fn test_processor_detects_steps_and_updates_tempo() {
        let mut processor = PulseProcessor::new();
        let mut steps = 0;

        for event in make_walk_events() {
            if processor.process_event(&event).unwrap().is_some() {
                steps += 1;
            }
        }

        assert_eq!(steps, 4);
        // Steps at 0, 500, 1000, 1500: blend walks 80 -> 92 -> 100.4 -> 106.28
        assert!((processor.current_tempo() - 106.28).abs() < 0.001);
    }

    #[test]
    fn test_tick_reflects_both_streams() {
        let mut processor = PulseProcessor::new();
        for event in make_walk_events() {
            processor.process_event(&event).unwrap();
        }

        let signal = processor.tick();
        assert!((signal.tempo_bpm - 106.28).abs() < 0.001);
        assert_eq!(signal.heart_rate_bpm, 110);
        assert_eq!(signal.timbre, TimbreClass::Clear);
        assert_eq!(signal.waveform, Waveform::Triangle);
        assert!((signal.brightness_hz - 2600.0).abs() < 1e-9);
    }

    #[test]
    fn test_tick_rate_does_not_disturb_state() {
        let mut processor = PulseProcessor::new();
        for event in make_walk_events() {
            processor.process_event(&event).unwrap();
        }

        let first = processor.tick();
        for _ in 0..100 {
            processor.tick();
        }
        let last = processor.tick();
        assert_eq!(first, last);
    }

    #[test]
    fn test_tick_before_any_input_uses_defaults() {
        let mut processor = PulseProcessor::new();
        let signal = processor.tick();
        assert!((signal.tempo_bpm - 80.0).abs() < 1e-9);
        assert_eq!(signal.heart_rate_bpm, 70);
        assert_eq!(signal.timbre, TimbreClass::Calm);
    }

    #[test]
    fn test_heart_rate_frame_event_decodes() {
        let mut processor = PulseProcessor::new();
        processor
            .process_event(&SensorEvent::HeartRateFrame {
                t_ms: 0,
                bytes: vec![0x01, 0x2C, 0x01],
            })
            .unwrap();
        assert_eq!(processor.heart_rate(), 300);
    }

    #[test]
    fn test_truncated_frame_event_is_error() {
        let mut processor = PulseProcessor::new();
        let result = processor.process_event(&SensorEvent::HeartRateFrame {
            t_ms: 0,
            bytes: vec![0x01],
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_axisless_motion_event_is_skipped() {
        let mut processor = PulseProcessor::new();
        let result = processor.process_event(&SensorEvent::Motion {
            t_ms: 0,
            x: None,
            y: None,
            z: None,
        });
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_with_config_rejects_bad_tuning() {
        let mut config = EngineConfig::default();
        config.cadence.smoothing = 1.5;
        assert!(PulseProcessor::with_config(config).is_err());
    }

    #[test]
    fn test_with_config_exposes_tuning() {
        let mut config = EngineConfig::default();
        config.cadence.window = 8;
        config.vitals.hr_high = 180;
        let processor = PulseProcessor::with_config(config).unwrap();
        assert_eq!(processor.config(), config);
    }

    #[test]
    fn test_frame_sequence_increments() {
        let mut processor = PulseProcessor::new();
        let first = processor.tick_frame(250);
        let second = processor.tick_frame(500);
        assert_eq!(first.seq, 0);
        assert_eq!(second.seq, 1);
        assert_eq!(first.producer.instance_id, second.producer.instance_id);
    }

    #[test]
    fn test_state_round_trip_preserves_estimators() {
        let mut processor = PulseProcessor::new();
        for event in make_walk_events() {
            processor.process_event(&event).unwrap();
        }

        let saved = processor.to_json().unwrap();
        let mut restored = PulseProcessor::from_json(&saved).unwrap();

        assert!((restored.current_tempo() - processor.current_tempo()).abs() < 1e-9);
        assert_eq!(restored.heart_rate(), processor.heart_rate());
        assert_eq!(restored.tick(), processor.tick());
    }

    #[test]
    fn test_restore_rejects_tampered_config() {
        let processor = PulseProcessor::new();
        let mut saved: serde_json::Value =
            serde_json::from_str(&processor.to_json().unwrap()).unwrap();
        saved["cadence"]["config"]["smoothing"] = serde_json::json!(1.5);
        assert!(PulseProcessor::from_json(&saved.to_string()).is_err());
    }

    #[test]
    fn test_replay_emits_on_event_time_grid() {
        let events = make_walk_events();
        let frames = replay_events(&events, EngineConfig::default(), 500, false).unwrap();

        // Grid lines at 500, 1000, 1500 plus the closing frame at 1800
        let stamps: Vec<u64> = frames.iter().map(|frame| frame.t_ms).collect();
        assert_eq!(stamps, vec![500, 1000, 1500, 1800]);

        let seqs: Vec<u64> = frames.iter().map(|frame| frame.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_replay_empty_stream_yields_no_frames() {
        let frames = replay_events(&[], EngineConfig::default(), 250, false).unwrap();
        assert!(frames.is_empty());
    }

    #[test]
    fn test_replay_on_change_drops_repeats() {
        // Static scene: no steps, constant heart rate
        let mut events = Vec::new();
        for i in 0..10u64 {
            events.push(SensorEvent::Motion {
                t_ms: i * 200,
                x: Some(0.0),
                y: Some(0.0),
                z: Some(9.8),
            });
        }

        let all = replay_events(&events, EngineConfig::default(), 200, false).unwrap();
        let changed = replay_events(&events, EngineConfig::default(), 200, true).unwrap();

        assert!(all.len() > 1);
        // Only the first frame carries new information
        assert_eq!(changed.len(), 1);
    }

    #[test]
    fn test_replay_rejects_zero_tick() {
        assert!(replay_events(&[], EngineConfig::default(), 0, false).is_err());
    }
}

//! Control signal emission
//!
//! Assembles the per-tick snapshot handed to the audio layer. Emission is
//! pure aggregation over the estimators' current values; the tick rate is a
//! presentation concern and never feeds back into the signal path.

use serde::{Deserialize, Serialize};

use crate::cadence::CadenceEstimator;
use crate::types::ControlSignal;
use crate::vitals::VitalsMapper;

/// Snapshot assembler with change tracking
///
/// Remembers the last emitted signal so hosts polling on a timer can skip
/// redundant downstream writes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlSignalEmitter {
    last: Option<ControlSignal>,
}

impl ControlSignalEmitter {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Assemble the current control snapshot
    pub fn tick(&mut self, cadence: &CadenceEstimator, vitals: &VitalsMapper) -> ControlSignal {
        let signal = ControlSignal {
            tempo_bpm: cadence.current_tempo(),
            timbre: vitals.timbre(),
            waveform: vitals.waveform(),
            brightness_hz: vitals.brightness_hz(),
            intensity: vitals.intensity(),
            heart_rate_bpm: vitals.heart_rate(),
        };
        self.last = Some(signal.clone());
        signal
    }

    /// Assemble the current snapshot, suppressing it if nothing changed
    /// since the last emission
    pub fn tick_if_changed(
        &mut self,
        cadence: &CadenceEstimator,
        vitals: &VitalsMapper,
    ) -> Option<ControlSignal> {
        let previous = self.last.clone();
        let signal = self.tick(cadence, vitals);
        if previous.as_ref() == Some(&signal) {
            None
        } else {
            Some(signal)
        }
    }

    /// Last emitted signal, if any tick has run
    pub fn last_signal(&self) -> Option<&ControlSignal> {
        self.last.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{StepEvent, TimbreClass, Waveform};

    fn make_parts() -> (CadenceEstimator, VitalsMapper) {
        (CadenceEstimator::new(), VitalsMapper::new())
    }

    #[test]
    fn test_tick_reflects_component_state() {
        let (mut cadence, mut vitals) = make_parts();
        cadence.on_step(StepEvent::new(0));
        cadence.on_step(StepEvent::new(500));
        vitals.on_heart_rate(110);

        let mut emitter = ControlSignalEmitter::new();
        let signal = emitter.tick(&cadence, &vitals);

        assert!((signal.tempo_bpm - 92.0).abs() < 1e-9);
        assert_eq!(signal.timbre, TimbreClass::Clear);
        assert_eq!(signal.waveform, Waveform::Triangle);
        assert!((signal.brightness_hz - 2600.0).abs() < 1e-9);
        assert!((signal.intensity - 0.5).abs() < 1e-9);
        assert_eq!(signal.heart_rate_bpm, 110);
    }

    #[test]
    fn test_repeated_ticks_are_identical_without_input() {
        let (cadence, vitals) = make_parts();
        let mut emitter = ControlSignalEmitter::new();

        let first = emitter.tick(&cadence, &vitals);
        let second = emitter.tick(&cadence, &vitals);
        let third = emitter.tick(&cadence, &vitals);
        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn test_tick_if_changed_emits_first_then_suppresses() {
        let (cadence, vitals) = make_parts();
        let mut emitter = ControlSignalEmitter::new();

        assert!(emitter.tick_if_changed(&cadence, &vitals).is_some());
        assert!(emitter.tick_if_changed(&cadence, &vitals).is_none());
        assert!(emitter.tick_if_changed(&cadence, &vitals).is_none());
    }

    #[test]
    fn test_tick_if_changed_fires_after_new_reading() {
        let (cadence, mut vitals) = make_parts();
        let mut emitter = ControlSignalEmitter::new();

        emitter.tick_if_changed(&cadence, &vitals);
        vitals.on_heart_rate(120);
        let signal = emitter.tick_if_changed(&cadence, &vitals);
        assert!(signal.is_some());
    }

    #[test]
    fn test_plain_tick_updates_change_tracking() {
        let (cadence, vitals) = make_parts();
        let mut emitter = ControlSignalEmitter::new();

        emitter.tick(&cadence, &vitals);
        // The unconditional tick already recorded this state
        assert!(emitter.tick_if_changed(&cadence, &vitals).is_none());
    }
}

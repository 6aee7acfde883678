//! Streaming schemas
//!
//! Wire formats at the crate boundary: `pulse.sensor_event.v1` for incoming
//! sensor events and `pulse.control_frame.v1` for emitted control frames.
//! Both are line-oriented JSON so hosts can pipe them over any byte stream.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adapters;
use crate::error::PulseError;
use crate::types::ControlSignal;
use crate::{PRODUCER_NAME, PULSE_VERSION};

/// Input schema version
pub const SENSOR_EVENT_VERSION: &str = "pulse.sensor_event.v1";

/// Output schema version
pub const CONTROL_FRAME_VERSION: &str = "pulse.control_frame.v1";

/// One incoming sensor event
///
/// Motion and heart rate arrive as independent streams; the `type` tag keeps
/// them multiplexable over a single connection. Heart rate may arrive either
/// pre-decoded or as the raw measurement frame bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SensorEvent {
    /// Per-axis acceleration including gravity
    Motion {
        t_ms: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        x: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        z: Option<f64>,
    },
    /// Decoded heart rate reading
    HeartRate { t_ms: u64, bpm: u32 },
    /// Raw heart rate measurement characteristic frame
    HeartRateFrame { t_ms: u64, bytes: Vec<u8> },
}

impl SensorEvent {
    /// Event timestamp in milliseconds
    pub fn t_ms(&self) -> u64 {
        match self {
            SensorEvent::Motion { t_ms, .. } => *t_ms,
            SensorEvent::HeartRate { t_ms, .. } => *t_ms,
            SensorEvent::HeartRateFrame { t_ms, .. } => *t_ms,
        }
    }

    /// Validate the event shape
    ///
    /// Shape checks only. Out-of-range heart rates are not rejected here;
    /// plausibility clamping happens in the mapper so the stream never
    /// stalls on a glitchy reading.
    pub fn validate(&self) -> Result<(), PulseError> {
        match self {
            SensorEvent::Motion { x, y, z, .. } => {
                if adapters::magnitude_from_axes(*x, *y, *z).is_none() {
                    return Err(PulseError::InvalidEvent(
                        "motion event carries no finite axis".to_string(),
                    ));
                }
                Ok(())
            }
            SensorEvent::HeartRate { .. } => Ok(()),
            SensorEvent::HeartRateFrame { bytes, .. } => {
                adapters::decode_heart_rate_frame(bytes).map(|_| ())
            }
        }
    }

    /// Parse an event from a JSON line
    pub fn from_json(json: &str) -> Result<Self, PulseError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the event to a single JSON line
    pub fn to_json(&self) -> Result<String, PulseError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a JSON string containing an array of events
    pub fn parse_array(json: &str) -> Result<Vec<SensorEvent>, PulseError> {
        let events: Vec<SensorEvent> = serde_json::from_str(json)?;
        Ok(events)
    }

    /// Parse NDJSON (newline-delimited JSON) containing events
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<SensorEvent>, PulseError> {
        let mut events = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<SensorEvent>(trimmed) {
                Ok(event) => events.push(event),
                Err(e) => {
                    return Err(PulseError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(events)
    }
}

/// Producer metadata stamped on every control frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameProducer {
    pub name: String,
    pub version: String,
    /// Unique per encoder instance
    pub instance_id: String,
}

/// One emitted control frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlFrame {
    /// Schema version identifier
    pub schema_version: String,
    /// Producer metadata
    pub producer: FrameProducer,
    /// Frame sequence number within this encoder's lifetime
    pub seq: u64,
    /// Event time of the tick (milliseconds)
    pub t_ms: u64,
    /// Wall-clock emission time (RFC 3339)
    pub emitted_at_utc: String,
    /// The control snapshot
    pub signal: ControlSignal,
}

/// Control frame encoder with a unique instance ID
///
/// Stamps each frame with producer metadata and a monotonic sequence
/// number, so consumers can detect gaps and tell producer restarts apart.
#[derive(Debug, Clone)]
pub struct ControlFrameEncoder {
    instance_id: String,
    seq: u64,
}

impl Default for ControlFrameEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlFrameEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
            seq: 0,
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id, seq: 0 }
    }

    /// Wrap a control signal into the next frame
    pub fn encode(&mut self, t_ms: u64, signal: ControlSignal) -> ControlFrame {
        let frame = ControlFrame {
            schema_version: CONTROL_FRAME_VERSION.to_string(),
            producer: FrameProducer {
                name: PRODUCER_NAME.to_string(),
                version: PULSE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            seq: self.seq,
            t_ms,
            emitted_at_utc: Utc::now().to_rfc3339(),
            signal,
        };
        self.seq += 1;
        frame
    }

    /// Wrap a control signal and serialize it to a single JSON line
    pub fn encode_to_json(
        &mut self,
        t_ms: u64,
        signal: ControlSignal,
    ) -> Result<String, PulseError> {
        let frame = self.encode(t_ms, signal);
        serde_json::to_string(&frame).map_err(PulseError::JsonError)
    }
}

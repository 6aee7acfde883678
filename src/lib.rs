//! Synheart Pulse - On-device compute engine for movement-driven audio control
//!
//! Pulse turns two live sensor streams into musical control signals through a
//! deterministic pipeline: accelerometer magnitude → step detection → cadence
//! estimation → tempo, and heart rate → intensity, timbre, and brightness.
//! Hosts poll a tick snapshot at whatever rate their audio layer wants.
//!
//! ## Modules
//!
//! - **Signal Core**: step detection, cadence estimation, vitals mapping
//! - **Boundary**: sensor event schema, frame encoding, adapters, FFI

pub mod adapters;
pub mod cadence;
pub mod config;
pub mod emitter;
pub mod error;
pub mod pipeline;
pub mod schema;
pub mod step_detector;
pub mod types;
pub mod vitals;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use cadence::CadenceEstimator;
pub use config::{CadenceConfig, EngineConfig, StepDetectorConfig, VitalsConfig};
pub use emitter::ControlSignalEmitter;
pub use error::PulseError;
pub use pipeline::{replay_events, PulseProcessor};
pub use step_detector::StepDetector;
pub use vitals::VitalsMapper;

// Schema exports
pub use schema::{
    ControlFrame, ControlFrameEncoder, SensorEvent, CONTROL_FRAME_VERSION, SENSOR_EVENT_VERSION,
};

// Core type exports
pub use types::{ControlSignal, MotionSample, StepEvent, TimbreClass, Waveform};

/// Pulse version embedded in all control frames
pub const PULSE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for control frames
pub const PRODUCER_NAME: &str = "synheart-pulse";

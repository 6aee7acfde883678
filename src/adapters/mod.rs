//! Sensor boundary adapters
//!
//! This module converts the raw shapes sensors deliver into the core's input
//! types: per-axis acceleration triples into magnitude samples, and heart
//! rate measurement frames into integer readings.

pub mod heart_rate;
pub mod motion;

pub use heart_rate::decode_heart_rate_frame;
pub use motion::{magnitude_from_axes, motion_sample_from_axes};

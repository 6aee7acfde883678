//! Accelerometer adapter
//!
//! The core consumes one combined magnitude per motion sample. Hosts deliver
//! per-axis acceleration including gravity; this adapter folds the axes into
//! that magnitude.

use crate::types::MotionSample;

/// Combined magnitude of an acceleration triple
///
/// Missing or non-finite axes read as 0.0 (some platforms omit axes they
/// cannot measure). A triple with no finite axis at all yields no magnitude.
pub fn magnitude_from_axes(x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Option<f64> {
    let mut any_finite = false;
    let mut sum_squares = 0.0;
    for axis in [x, y, z].into_iter().flatten() {
        if axis.is_finite() {
            any_finite = true;
            sum_squares += axis * axis;
        }
    }
    if !any_finite {
        return None;
    }

    let magnitude = sum_squares.sqrt();
    if magnitude.is_finite() {
        Some(magnitude)
    } else {
        None
    }
}

/// Build a motion sample from an acceleration triple, if it has any signal
pub fn motion_sample_from_axes(
    t_ms: u64,
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
) -> Option<MotionSample> {
    magnitude_from_axes(x, y, z).map(|magnitude| MotionSample::new(magnitude, t_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_triple_magnitude() {
        let magnitude = magnitude_from_axes(Some(3.0), Some(4.0), Some(0.0)).unwrap();
        assert!((magnitude - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_axis_reads_as_zero() {
        let magnitude = magnitude_from_axes(Some(3.0), Some(4.0), None).unwrap();
        assert!((magnitude - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_axes_missing_yields_nothing() {
        assert!(magnitude_from_axes(None, None, None).is_none());
    }

    #[test]
    fn test_non_finite_axis_ignored() {
        let magnitude = magnitude_from_axes(Some(3.0), Some(4.0), Some(f64::NAN)).unwrap();
        assert!((magnitude - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_axes_non_finite_yields_nothing() {
        assert!(magnitude_from_axes(Some(f64::NAN), Some(f64::INFINITY), None).is_none());
    }

    #[test]
    fn test_sample_carries_timestamp() {
        let sample = motion_sample_from_axes(1234, Some(0.0), Some(9.81), None).unwrap();
        assert_eq!(sample.t_ms, 1234);
        assert!((sample.magnitude - 9.81).abs() < 1e-9);
    }

    #[test]
    fn test_resting_gravity_magnitude() {
        // A phone lying flat reports roughly 1g on one axis
        let magnitude = magnitude_from_axes(Some(0.1), Some(0.2), Some(9.8)).unwrap();
        assert!(magnitude > 9.7 && magnitude < 9.9);
    }
}

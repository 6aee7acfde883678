//! Heart rate measurement frame adapter
//!
//! Decodes the standard heart rate measurement characteristic as monitors
//! notify it. Byte 0 carries the flags; flag bit 0 selects the value width.
//! Bit clear means a u8 value in byte 1, bit set means a u16 little-endian
//! value in bytes 1-2.

use crate::error::PulseError;

/// Flags bit selecting the 16-bit heart rate value format
const FLAG_FORMAT_UINT16: u8 = 0x01;

/// Decode the heart rate value from a measurement frame
///
/// Only the value field is extracted; energy expenditure and RR intervals
/// trailing it are ignored. Truncated frames are an error, never a panic.
pub fn decode_heart_rate_frame(bytes: &[u8]) -> Result<u32, PulseError> {
    let flags = match bytes.first() {
        Some(&flags) => flags,
        None => return Err(PulseError::FrameDecodeError("empty frame".to_string())),
    };

    if flags & FLAG_FORMAT_UINT16 == 0 {
        match bytes.get(1) {
            Some(&value) => Ok(value as u32),
            None => Err(PulseError::FrameDecodeError(format!(
                "u8 value frame truncated at {} byte(s)",
                bytes.len()
            ))),
        }
    } else {
        match (bytes.get(1), bytes.get(2)) {
            (Some(&lo), Some(&hi)) => Ok(u16::from_le_bytes([lo, hi]) as u32),
            _ => Err(PulseError::FrameDecodeError(format!(
                "u16 value frame truncated at {} byte(s)",
                bytes.len()
            ))),
        }
    }
}

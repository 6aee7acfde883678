//! FFI bindings for Synheart Pulse
//!
//! This module provides C-compatible functions for driving the processor
//! from mobile hosts. All functions use C strings (null-terminated) and
//! return allocated memory that must be freed by the caller using
//! `pulse_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;
use std::slice;

use crate::adapters;
use crate::config::EngineConfig;
use crate::pipeline::{replay_events, PulseProcessor};
use crate::schema::SensorEvent;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Decode a heart rate measurement frame and return the value in bpm.
///
/// # Safety
/// - `bytes` must point to `len` readable bytes.
/// - Returns the decoded heart rate, or -1 on error; call `pulse_last_error`
///   to get the error message.
#[no_mangle]
pub unsafe extern "C" fn pulse_decode_heart_rate_frame(bytes: *const u8, len: usize) -> i32 {
    clear_last_error();

    if bytes.is_null() {
        set_last_error("Null frame pointer");
        return -1;
    }

    let frame = slice::from_raw_parts(bytes, len);
    match adapters::decode_heart_rate_frame(frame) {
        Ok(bpm) => bpm as i32,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Replay a JSON array of sensor events into a JSON array of control frames.
///
/// # Safety
/// - `events_json` must be a valid null-terminated C string holding a JSON
///   array of sensor events.
/// - Returns a newly allocated string that must be freed with
///   `pulse_free_string`.
/// - Returns NULL on error; call `pulse_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn pulse_replay_events(
    events_json: *const c_char,
    tick_ms: u64,
    emit_on_change: bool,
) -> *mut c_char {
    clear_last_error();

    let events_str = match cstr_to_string(events_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid events string pointer");
            return ptr::null_mut();
        }
    };

    let events: Vec<SensorEvent> = match serde_json::from_str(&events_str) {
        Ok(events) => events,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    let frames = match replay_events(&events, EngineConfig::default(), tick_ms, emit_on_change) {
        Ok(frames) => frames,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    match serde_json::to_string(&frames) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Processor API
// ============================================================================

/// Opaque handle to a PulseProcessor
pub struct PulseProcessorHandle {
    processor: PulseProcessor,
}

/// Create a new PulseProcessor with default tuning.
///
/// # Safety
/// - Returns a pointer to a newly allocated PulseProcessor.
/// - Must be freed with `pulse_processor_free`.
#[no_mangle]
pub unsafe extern "C" fn pulse_processor_new() -> *mut PulseProcessorHandle {
    clear_last_error();

    let handle = Box::new(PulseProcessorHandle {
        processor: PulseProcessor::new(),
    });
    Box::into_raw(handle)
}

/// Create a new PulseProcessor from a JSON configuration.
///
/// # Safety
/// - `config_json` must be a valid null-terminated C string. Omitted fields
///   take their defaults.
/// - Returns a pointer that must be freed with `pulse_processor_free`.
/// - Returns NULL on error; call `pulse_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn pulse_processor_new_with_config(
    config_json: *const c_char,
) -> *mut PulseProcessorHandle {
    clear_last_error();

    let config_str = match cstr_to_string(config_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid config string pointer");
            return ptr::null_mut();
        }
    };

    let config = match EngineConfig::from_json(&config_str) {
        Ok(config) => config,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    match PulseProcessor::with_config(config) {
        Ok(processor) => Box::into_raw(Box::new(PulseProcessorHandle { processor })),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a PulseProcessor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `pulse_processor_new`
///   or `pulse_processor_new_with_config`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn pulse_processor_free(processor: *mut PulseProcessorHandle) {
    if !processor.is_null() {
        drop(Box::from_raw(processor));
    }
}

/// Feed one acceleration triple.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `pulse_processor_new`.
/// - Returns 1 if a step fired, 0 otherwise, -1 on error.
#[no_mangle]
pub unsafe extern "C" fn pulse_processor_process_motion(
    processor: *mut PulseProcessorHandle,
    t_ms: u64,
    x: f64,
    y: f64,
    z: f64,
) -> i32 {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return -1;
    }

    let handle = &mut *processor;

    match adapters::motion_sample_from_axes(t_ms, Some(x), Some(y), Some(z)) {
        Some(sample) => match handle.processor.process_motion(sample) {
            Some(_) => 1,
            None => 0,
        },
        // No finite axis: skipped without error, matching the stream policy
        None => 0,
    }
}

/// Feed one decoded heart rate reading.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `pulse_processor_new`.
/// - Returns 0 on success, -1 on error.
#[no_mangle]
pub unsafe extern "C" fn pulse_processor_process_heart_rate(
    processor: *mut PulseProcessorHandle,
    bpm: u32,
) -> i32 {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return -1;
    }

    let handle = &mut *processor;
    handle.processor.process_heart_rate(bpm);
    0
}

/// Feed one raw heart rate measurement frame.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `pulse_processor_new`.
/// - `bytes` must point to `len` readable bytes.
/// - Returns 0 on success, -1 on error; call `pulse_last_error` to get the
///   error message.
#[no_mangle]
pub unsafe extern "C" fn pulse_processor_process_heart_rate_frame(
    processor: *mut PulseProcessorHandle,
    bytes: *const u8,
    len: usize,
) -> i32 {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return -1;
    }

    if bytes.is_null() {
        set_last_error("Null frame pointer");
        return -1;
    }

    let handle = &mut *processor;
    let frame = slice::from_raw_parts(bytes, len);

    match adapters::decode_heart_rate_frame(frame) {
        Ok(bpm) => {
            handle.processor.process_heart_rate(bpm);
            0
        }
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Feed one sensor event as a JSON line.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `pulse_processor_new`.
/// - `event_json` must be a valid null-terminated C string.
/// - Returns 1 if a step fired, 0 otherwise, -1 on error.
#[no_mangle]
pub unsafe extern "C" fn pulse_processor_process_event_json(
    processor: *mut PulseProcessorHandle,
    event_json: *const c_char,
) -> i32 {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return -1;
    }

    let handle = &mut *processor;

    let event_str = match cstr_to_string(event_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid event string pointer");
            return -1;
        }
    };

    let event = match SensorEvent::from_json(&event_str) {
        Ok(event) => event,
        Err(e) => {
            set_last_error(&e.to_string());
            return -1;
        }
    };

    match handle.processor.process_event(&event) {
        Ok(Some(_)) => 1,
        Ok(None) => 0,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Snapshot the current control state into a stamped frame.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `pulse_processor_new`.
/// - Returns a newly allocated JSON string that must be freed with
///   `pulse_free_string`.
/// - Returns NULL on error; call `pulse_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn pulse_processor_tick_json(
    processor: *mut PulseProcessorHandle,
    t_ms: u64,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &mut *processor;
    let frame = handle.processor.tick_frame(t_ms);

    match serde_json::to_string(&frame) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Snapshot the current control state, suppressing unchanged output.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `pulse_processor_new`.
/// - Returns a newly allocated JSON string that must be freed with
///   `pulse_free_string`, or NULL when nothing changed since the last
///   emission. NULL with a message from `pulse_last_error` indicates an
///   actual error.
#[no_mangle]
pub unsafe extern "C" fn pulse_processor_tick_changed_json(
    processor: *mut PulseProcessorHandle,
    t_ms: u64,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &mut *processor;

    let frame = match handle.processor.tick_frame_if_changed(t_ms) {
        Some(frame) => frame,
        None => return ptr::null_mut(),
    };

    match serde_json::to_string(&frame) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Save processor estimator state to JSON.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `pulse_processor_new`.
/// - Returns a newly allocated string that must be freed with
///   `pulse_free_string`.
/// - Returns NULL on error; call `pulse_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn pulse_processor_save_state(
    processor: *mut PulseProcessorHandle,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &*processor;

    match handle.processor.to_json() {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Load processor estimator state from JSON.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `pulse_processor_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns 0 on success, non-zero on error.
/// - On error, call `pulse_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn pulse_processor_load_state(
    processor: *mut PulseProcessorHandle,
    json: *const c_char,
) -> i32 {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return -1;
    }

    let handle = &mut *processor;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return -1;
        }
    };

    match PulseProcessor::from_json(&json_str) {
        Ok(restored) => {
            handle.processor = restored;
            0
        }
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Pulse functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Pulse function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn pulse_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Pulse function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn pulse_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Pulse library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn pulse_version() -> *const c_char {
    // Use a static CString to avoid allocation
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

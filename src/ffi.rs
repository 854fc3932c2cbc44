//! FFI bindings for Vitamorph
//!
//! This module provides C-compatible functions for calling Vitamorph from
//! other languages. All functions use C strings (null-terminated) and return
//! allocated memory that must be freed by the caller using
//! `morph_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::feed::LogFeed;
use crate::mapper::BodyWidthMode;
use crate::pipeline::AvatarProcessor;
use crate::schema::{LogAdapter, LogRecord};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

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

/// Process a JSON array of daily log records and return a frame JSON.
///
/// # Safety
/// - `json` and `subject_id` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `morph_free_string`.
/// - Returns NULL on error; call `morph_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn morph_logs_to_frame(
    json: *const c_char,
    subject_id: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    let subject_str = match cstr_to_string(subject_id) {
        Some(s) => s,
        None => {
            set_last_error("Invalid subject_id string pointer");
            return ptr::null_mut();
        }
    };

    let result = LogAdapter::parse_array(&json_str)
        .and_then(LogAdapter::to_logs)
        .and_then(|logs| AvatarProcessor::new().process_to_json(&logs, &subject_str));

    match result {
        Ok(frame_json) => string_to_cstr(&frame_json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Feed API
// ============================================================================

/// Opaque handle to a LogFeed
pub struct MorphFeedHandle {
    feed: LogFeed,
}

/// Create a new log feed.
///
/// Pass a non-zero `bmi_width` to derive the torso width from BMI instead
/// of keeping it fixed.
///
/// # Safety
/// - Returns a pointer to a newly allocated feed.
/// - Must be freed with `morph_feed_free`.
#[no_mangle]
pub unsafe extern "C" fn morph_feed_new(bmi_width: i32) -> *mut MorphFeedHandle {
    clear_last_error();

    let mode = if bmi_width != 0 {
        BodyWidthMode::BmiDerived
    } else {
        BodyWidthMode::Fixed
    };
    let feed = LogFeed::with_processor(AvatarProcessor::with_body_width_mode(mode));
    let handle = Box::new(MorphFeedHandle { feed });
    Box::into_raw(handle)
}

/// Free a log feed.
///
/// # Safety
/// - `feed` must be a valid pointer returned by `morph_feed_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn morph_feed_free(feed: *mut MorphFeedHandle) {
    if !feed.is_null() {
        drop(Box::from_raw(feed));
    }
}

/// Submit one daily log record (JSON object) and return the recomputed
/// frame JSON.
///
/// # Safety
/// - `feed` must be a valid pointer returned by `morph_feed_new`.
/// - `json` and `subject_id` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `morph_free_string`.
/// - Returns NULL on error; call `morph_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn morph_feed_submit(
    feed: *mut MorphFeedHandle,
    json: *const c_char,
    subject_id: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if feed.is_null() {
        set_last_error("Null feed pointer");
        return ptr::null_mut();
    }

    let handle = &mut *feed;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    let subject_str = match cstr_to_string(subject_id) {
        Some(s) => s,
        None => {
            set_last_error("Invalid subject_id string pointer");
            return ptr::null_mut();
        }
    };

    let record: LogRecord = match serde_json::from_str(&json_str) {
        Ok(record) => record,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    if let Err(e) = record.validate() {
        set_last_error(&e.to_string());
        return ptr::null_mut();
    }
    let log = record.into_log();

    let frame = handle.feed.submit(&subject_str, log);
    match serde_json::to_string_pretty(&frame) {
        Ok(frame_json) => string_to_cstr(&frame_json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Save the feed's log store to JSON.
///
/// # Safety
/// - `feed` must be a valid pointer returned by `morph_feed_new`.
/// - Returns a newly allocated string that must be freed with `morph_free_string`.
/// - Returns NULL on error; call `morph_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn morph_feed_save_store(feed: *mut MorphFeedHandle) -> *mut c_char {
    clear_last_error();

    if feed.is_null() {
        set_last_error("Null feed pointer");
        return ptr::null_mut();
    }

    let handle = &*feed;

    match handle.feed.save_store() {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Load the feed's log store from JSON.
///
/// # Safety
/// - `feed` must be a valid pointer returned by `morph_feed_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns 0 on success, non-zero on error.
/// - On error, call `morph_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn morph_feed_load_store(
    feed: *mut MorphFeedHandle,
    json: *const c_char,
) -> i32 {
    clear_last_error();

    if feed.is_null() {
        set_last_error("Null feed pointer");
        return -1;
    }

    let handle = &mut *feed;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return -1;
        }
    };

    match handle.feed.load_store(&json_str) {
        Ok(()) => 0,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Vitamorph functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Vitamorph function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn morph_free_string(ptr: *mut c_char) {
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
/// - The returned pointer is valid until the next Vitamorph function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn morph_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Vitamorph library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn morph_version() -> *const c_char {
    // Use a static CString to avoid allocation
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

//! C-ABI wrapper around `chttp-core`.
//!
//! # Overview
//! Lets a single-threaded host (typically a scripting runtime with integer
//! callback references) fire HTTP requests without blocking its main loop.
//! The host builds a request, submits it, and calls `chttp_poll` once per
//! tick; `chttp_poll` invokes the host's C callbacks on the calling thread.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Callback handles are plain `u64`s chosen by the host. Worker threads
//!   only carry them; they are handed back through `chttp_poll`.
//! - `chttp_submit` consumes the request pointer whether or not submission
//!   succeeds. Clients must be freed with `chttp_client_free`.

pub mod types;

use std::ffi::{c_void, CStr};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Mutex;

use chttp_core::{result_queue, Callbacks, CallbackHandle, Client, ClientConfig, HttpMethod};
use tracing::warn;

use types::*;

/// Borrow a C string as `&str`. Null and non-UTF-8 input yield `None`.
///
/// # Safety
/// `s` must be null or point to a NUL-terminated string that outlives the
/// returned reference.
unsafe fn c_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client and its result queue.
///
/// `config_json` may be null for defaults, or a JSON object with any of
/// `user_agent`, `max_redirects`, `connect_timeout_ms`, `timeout_ms`.
/// Returns null if the configuration is invalid or an internal panic occurs.
/// The caller must free the returned pointer with `chttp_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn chttp_client_new(config_json: *const c_char) -> *mut FfiClient {
    catch_unwind(|| {
        let config = if config_json.is_null() {
            ClientConfig::default()
        } else {
            let Some(raw) = (unsafe { c_str(config_json) }) else {
                return std::ptr::null_mut();
            };
            match ClientConfig::from_json(raw) {
                Ok(config) => config,
                Err(err) => {
                    warn!(error = %err, "rejecting client configuration");
                    return std::ptr::null_mut();
                }
            }
        };
        let (sender, queue) = result_queue();
        let client = FfiClient {
            inner: Client::new(config, sender),
            queue: Mutex::new(queue),
        };
        Box::into_raw(Box::new(client))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `chttp_client_new`. Safe to call with null.
///
/// Outcomes of requests still in flight are discarded.
#[unsafe(no_mangle)]
pub extern "C" fn chttp_client_free(client: *mut FfiClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(client) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Request construction
// ---------------------------------------------------------------------------

/// Create a request seeded with the client's default headers.
///
/// `method` is one of GET, POST, HEAD, PUT, DELETE, PATCH, OPTIONS (any
/// case). Returns null if any pointer is null or the method is unknown.
/// The caller must either pass the pointer to `chttp_submit` or free it with
/// `chttp_request_free`.
#[unsafe(no_mangle)]
pub extern "C" fn chttp_request_new(
    client: *const FfiClient,
    method: *const c_char,
    url: *const c_char,
    on_success: u64,
    on_failure: u64,
) -> *mut FfiRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(method), Some(url)) = (unsafe { c_str(method) }, unsafe { c_str(url) }) else {
            return std::ptr::null_mut();
        };
        let method: HttpMethod = match method.parse() {
            Ok(m) => m,
            Err(_) => return std::ptr::null_mut(),
        };
        let callbacks = Callbacks::new(CallbackHandle(on_success), CallbackHandle(on_failure));
        let request = client.inner.request(method, url, callbacks);
        Box::into_raw(Box::new(FfiRequest { inner: request }))
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Set a query/body parameter. Returns false on null arguments.
#[unsafe(no_mangle)]
pub extern "C" fn chttp_request_set_param(
    request: *mut FfiRequest,
    key: *const c_char,
    value: *const c_char,
) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if request.is_null() {
            return false;
        }
        let (Some(key), Some(value)) = (unsafe { c_str(key) }, unsafe { c_str(value) }) else {
            return false;
        };
        unsafe { &mut *request }.inner.set_param(key, value);
        true
    }))
    .unwrap_or(false)
}

/// Set a request header, replacing a default with the same name.
/// Returns false on null arguments.
#[unsafe(no_mangle)]
pub extern "C" fn chttp_request_set_header(
    request: *mut FfiRequest,
    name: *const c_char,
    value: *const c_char,
) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if request.is_null() {
            return false;
        }
        let (Some(name), Some(value)) = (unsafe { c_str(name) }, unsafe { c_str(value) }) else {
            return false;
        };
        unsafe { &mut *request }.inner.set_header(name, value);
        true
    }))
    .unwrap_or(false)
}

/// Set the raw request body, which replaces parameters for body-carrying
/// methods. Returns false on null arguments.
#[unsafe(no_mangle)]
pub extern "C" fn chttp_request_set_body(request: *mut FfiRequest, body: *const c_char) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if request.is_null() {
            return false;
        }
        let Some(body) = (unsafe { c_str(body) }) else {
            return false;
        };
        unsafe { &mut *request }.inner.set_body(body);
        true
    }))
    .unwrap_or(false)
}

/// Free a request that was never submitted. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn chttp_request_free(request: *mut FfiRequest) {
    if !request.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(request) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Submission and delivery
// ---------------------------------------------------------------------------

/// Start executing `request` in the background.
///
/// Always takes ownership of `request`. Returns true once the request has
/// been handed to a worker; its outcome arrives through `chttp_poll`.
#[unsafe(no_mangle)]
pub extern "C" fn chttp_submit(client: *const FfiClient, request: *mut FfiRequest) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if request.is_null() {
            return false;
        }
        let request = unsafe { Box::from_raw(request) };
        if client.is_null() {
            return false;
        }
        let client = unsafe { &*client };
        match client.inner.submit(request.inner) {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "request submission failed");
                false
            }
        }
    }))
    .unwrap_or(false)
}

/// Deliver every finished outcome on the calling thread.
///
/// For each outcome exactly one of `on_success` / `on_failure` is called
/// with `userdata` and the callback handle given to `chttp_request_new`.
/// The queue is not locked while callbacks run, so a callback may call
/// `chttp_poll` again. Returns the number of outcomes delivered.
#[unsafe(no_mangle)]
pub extern "C" fn chttp_poll(
    client: *const FfiClient,
    on_success: FfiSuccessCallback,
    on_failure: FfiFailureCallback,
    userdata: *mut c_void,
) -> u32 {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return 0;
        }
        let client = unsafe { &*client };
        let outcomes = client
            .queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .drain();
        let delivered = outcomes.len();
        let mut dispatcher = FfiDispatcher {
            on_success,
            on_failure,
            userdata,
        };
        for outcome in outcomes {
            outcome.deliver(&mut dispatcher);
        }
        u32::try_from(delivered).unwrap_or(u32::MAX)
    }))
    .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

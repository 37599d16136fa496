//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Clients and requests cross the boundary as opaque pointers. Outcomes
//! never do: `chttp_poll` turns each one into a call through a C function
//! pointer on the polling thread, passing borrowed pointers that are only
//! valid for the duration of that call.

use std::collections::BTreeMap;
use std::ffi::{c_void, CString};
use std::os::raw::c_char;
use std::sync::Mutex;

use chttp_core::{CallbackHandle, Client, HttpRequest, OutcomeHandler, ResultQueue};

/// Opaque handle to a client and the result queue it feeds. C callers
/// receive a pointer to this and pass it back into every FFI function.
pub struct FfiClient {
    pub(crate) inner: Client,
    pub(crate) queue: Mutex<ResultQueue>,
}

/// Opaque handle to a request under construction.
pub struct FfiRequest {
    pub(crate) inner: HttpRequest,
}

/// Invoked for a successful request.
///
/// `body` points to `body_len` raw bytes. `headers_json` is a NUL-terminated
/// JSON object mapping header names to values. Neither pointer may be kept
/// after the callback returns.
pub type FfiSuccessCallback = extern "C" fn(
    userdata: *mut c_void,
    callback: u64,
    status: u16,
    body: *const u8,
    body_len: usize,
    headers_json: *const c_char,
);

/// Invoked for a failed request with a NUL-terminated reason.
pub type FfiFailureCallback =
    extern "C" fn(userdata: *mut c_void, callback: u64, reason: *const c_char);

/// Routes delivered outcomes to the host's C callbacks.
pub(crate) struct FfiDispatcher {
    pub(crate) on_success: FfiSuccessCallback,
    pub(crate) on_failure: FfiFailureCallback,
    pub(crate) userdata: *mut c_void,
}

impl OutcomeHandler for FfiDispatcher {
    fn on_success(
        &mut self,
        callback: CallbackHandle,
        status: u16,
        body: &[u8],
        headers: &BTreeMap<String, String>,
    ) {
        let headers_json = to_c_string(serde_json::to_string(headers).unwrap_or_default());
        (self.on_success)(
            self.userdata,
            callback.0,
            status,
            body.as_ptr(),
            body.len(),
            headers_json.as_ptr(),
        );
    }

    fn on_failure(&mut self, callback: CallbackHandle, reason: &str) {
        let reason = to_c_string(reason.to_string());
        (self.on_failure)(self.userdata, callback.0, reason.as_ptr());
    }
}

/// Build a C string, dropping interior NULs rather than failing.
pub(crate) fn to_c_string(s: String) -> CString {
    CString::new(s).unwrap_or_else(|err| {
        let mut bytes = err.into_vec();
        bytes.retain(|&b| b != 0);
        CString::new(bytes).unwrap_or_default()
    })
}

//! C ABI entry points taking and returning JSON.
//!
//! The request is either a bare lane map (`{"North": {"car": 10}, ...}`) or
//! an envelope `{"config": {...}, "lanes": {...}}`. An object is read as an
//! envelope only when its keys are `lanes` plus an optional `config`; any
//! other object is a bare lane map, even one with a lane named `lanes`.
//! The response is
//! `{"ok": <solution>}` or `{"error": "<message>"}` and must be released with
//! [`u_signal_free`].

use std::collections::BTreeMap;
use std::ffi::{CStr, CString};
use std::ptr;

use libc::c_char;
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::json;

use crate::config::SignalConfig;
use crate::error::{Result, SignalError};
use crate::models::{IntersectionRequest, IntersectionSolution};
use crate::optimizer::SignalOptimizer;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    #[serde(default)]
    config: Option<SignalConfig>,
    lanes: IntersectionRequest,
}

fn json_error(e: serde_json::Error) -> SignalError {
    SignalError::Json(e.to_string())
}

fn is_envelope(input: &str) -> Result<bool> {
    let keys: BTreeMap<String, IgnoredAny> = serde_json::from_str(input).map_err(json_error)?;
    Ok(keys.contains_key("lanes") && keys.keys().all(|k| k == "lanes" || k == "config"))
}

fn parse_request(input: &str) -> Result<(SignalConfig, IntersectionRequest)> {
    if is_envelope(input)? {
        let envelope: Envelope = serde_json::from_str(input).map_err(json_error)?;
        Ok((envelope.config.unwrap_or_default(), envelope.lanes))
    } else {
        let lanes = serde_json::from_str(input).map_err(json_error)?;
        Ok((SignalConfig::default(), lanes))
    }
}

fn optimize_json(input: &str) -> Result<IntersectionSolution> {
    let (config, lanes) = parse_request(input)?;
    SignalOptimizer::new(config)?.optimize(&lanes)
}

fn respond(input: &str) -> String {
    let envelope = match optimize_json(input) {
        Ok(solution) => json!({ "ok": solution }),
        Err(e) => json!({ "error": e.to_string() }),
    };
    envelope.to_string()
}

/// Optimizes a JSON request and returns a newly allocated JSON response.
///
/// Returns null if `request_json` is null.
///
/// # Safety
///
/// `request_json` must be null or point to a NUL-terminated string valid for
/// the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn u_signal_optimize(request_json: *const c_char) -> *mut c_char {
    if request_json.is_null() {
        return ptr::null_mut();
    }
    let response = match CStr::from_ptr(request_json).to_str() {
        Ok(input) => respond(input),
        Err(e) => json!({ "error": format!("request is not UTF-8: {e}") }).to_string(),
    };
    CString::new(response)
        .map(CString::into_raw)
        .unwrap_or(ptr::null_mut())
}

/// Frees a string returned by [`u_signal_optimize`].
///
/// # Safety
///
/// `ptr` must be null or a pointer previously returned by
/// [`u_signal_optimize`] that has not been freed yet.
#[no_mangle]
pub unsafe extern "C" fn u_signal_free(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(input: &str) -> serde_json::Value {
        let c_input = CString::new(input).expect("no NUL");
        unsafe {
            let out = u_signal_optimize(c_input.as_ptr());
            assert!(!out.is_null());
            let text = CStr::from_ptr(out).to_str().expect("utf8").to_string();
            u_signal_free(out);
            serde_json::from_str(&text).expect("json")
        }
    }

    #[test]
    fn test_bare_request() {
        let v = call(r#"{"East": {}, "North": {}, "South": {}, "West": {}}"#);
        assert_eq!(v["ok"]["cycleTime"], 60);
        assert_eq!(v["ok"]["actualCycleTime"], 60);
        assert_eq!(v["ok"]["lanes"][0]["greenTime"], 11);
    }

    #[test]
    fn test_envelope_with_config() {
        let v = call(
            r#"{"config": {"min_green_time": 5}, "lanes": {"A": {"car": 1}, "B": {"car": 20}}}"#,
        );
        assert_eq!(v["ok"]["lanes"][0]["greenTime"], 5);
    }

    #[test]
    fn test_errors_are_reported() {
        let v = call(r#"{"A": {"car": -1}}"#);
        assert!(v["error"].as_str().expect("message").contains("negative count"));
        let v = call("not json");
        assert!(v["error"].as_str().expect("message").starts_with("JSON error"));
    }

    #[test]
    fn test_lane_named_lanes_is_a_bare_map() {
        let v = call(r#"{"lanes": {}, "North": {"car": 3}}"#);
        let lanes = v["ok"]["lanes"].as_array().expect("solution");
        assert_eq!(lanes.len(), 2);
        assert_eq!(lanes[0]["lane"], "lanes");
        assert_eq!(lanes[1]["lane"], "North");
        assert_eq!(lanes[1]["densityScore"], 3.0);
    }

    #[test]
    fn test_malformed_requests_name_the_problem() {
        let v = call(r#"{"lanes": {"A": {"car": "many"}}}"#);
        let msg = v["error"].as_str().expect("message");
        assert!(msg.starts_with("JSON error"), "{msg}");
        assert!(msg.contains("invalid type"), "{msg}");
        assert!(!msg.contains("did not match any variant"), "{msg}");

        let v = call(r#"{"A": {"car": 1}, "A": {"car": 2}}"#);
        let msg = v["error"].as_str().expect("message");
        assert!(msg.contains("duplicate lane identifier 'A'"), "{msg}");

        let v = call("[1, 2]");
        assert!(v["error"].as_str().expect("message").starts_with("JSON error"));
    }

    #[test]
    fn test_null_input() {
        unsafe {
            assert!(u_signal_optimize(ptr::null()).is_null());
            u_signal_free(ptr::null_mut());
        }
    }
}

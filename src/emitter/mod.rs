//! Result emitter.
//!
//! Every invocation writes exactly one JSON document to stdout. Success
//! wraps the result under a `data` key; failures carry an `error` key with
//! the message and the error-source chain. Retryable failures additionally
//! set `retry: true` and exit 0, so callers can distinguish "try again"
//! from a hard failure.

use crate::error::Error;
use serde::Serialize;
use serde_json::json;

/// The success document: `{"data": <result>}`, pretty-printed.
pub fn success_document<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(&json!({ "data": data }))
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize result: {}\"}}", e))
}

/// The failure document for `error`.
pub fn failure_document(error: &Error) -> String {
    let document = if error.is_retryable() {
        json!({ "retry": true, "error": error.trace() })
    } else {
        json!({ "error": error.trace() })
    };
    serde_json::to_string_pretty(&document)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize error: {}\"}}", e))
}

/// Print the document for `result` to stdout and return the process exit
/// code.
pub fn emit<T: Serialize>(result: Result<T, Error>) -> i32 {
    match result {
        Ok(data) => {
            println!("{}", success_document(&data));
            0
        }
        Err(error) => {
            println!("{}", failure_document(&error));
            error.exit_code()
        }
    }
}

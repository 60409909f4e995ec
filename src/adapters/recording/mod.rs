//! Recording adapters that capture interactions to cassettes.
//!
//! Each adapter wraps another implementation of the same port, forwards
//! every call, and appends the call and its result to a recorder.

pub mod clock;
pub mod filesystem;
pub mod id_gen;
pub mod insights;
pub mod task_store;

pub use clock::RecordingClock;
pub use filesystem::RecordingFileSystem;
pub use id_gen::RecordingIdGenerator;
pub use insights::RecordingInsightsClient;
pub use task_store::RecordingTaskStore;

use std::fmt::Display;
use std::sync::PoisonError;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::cassette::session::SharedRecorder;
use crate::ports::StoreError;

fn to_json<T: Serialize>(value: &T, port: &str, method: &str) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        warn!(port, method, error = %e, "could not serialize value for cassette");
        Value::Null
    })
}

fn push(recorder: &SharedRecorder, port: &str, method: &str, input: Value, output: Value) {
    let mut guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
    guard.record(port, method, input, output);
}

/// Records a call with a plain (non-`Result`) return value.
///
/// Mirror of `replaying::next_output`.
pub(crate) fn record_interaction<I, O>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    let input = to_json(input, port, method);
    let output = to_json(output, port, method);
    push(recorder, port, method, input, output);
}

/// Records a `Result` as `{"Ok": v}` or `{"Err": "message"}`.
///
/// Mirror of `replaying::replay_result`.
pub(crate) fn record_result<T, E, I>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: Display,
    I: Serialize,
{
    let output = match result {
        Ok(v) => json!({ "Ok": to_json(v, port, method) }),
        Err(e) => json!({ "Err": e.to_string() }),
    };
    push(recorder, port, method, to_json(input, port, method), output);
}

/// Records a task store result, keeping the error's kind so replay can
/// rebuild the same [`StoreError`].
///
/// Mirror of `replaying::replay_store_result`.
pub(crate) fn record_store_result<T, I>(
    recorder: &SharedRecorder,
    method: &str,
    input: &I,
    result: &Result<T, StoreError>,
) where
    T: Serialize,
    I: Serialize,
{
    let output = match result {
        Ok(v) => json!({ "Ok": to_json(v, "tasks", method) }),
        Err(e) => json!({ "Err": to_json(e, "tasks", method) }),
    };
    push(recorder, "tasks", method, to_json(input, "tasks", method), output);
}

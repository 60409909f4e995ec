//! Replaying adapters that serve recorded interactions back.
//!
//! An adapter built with `unconfigured()` has no cassette and panics on
//! first use, naming the port that was unexpectedly called.

pub mod clock;
pub mod filesystem;
pub mod id_gen;
pub mod insights;
pub mod task_store;

pub use clock::ReplayingClock;
pub use filesystem::ReplayingFileSystem;
pub use id_gen::ReplayingIdGenerator;
pub use insights::ReplayingInsightsClient;
pub use task_store::ReplayingTaskStore;

use std::error::Error;
use std::sync::PoisonError;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cassette::config::SharedReplayer;
use crate::ports::StoreError;

/// Takes the next recorded output for `port`/`method`.
///
/// # Panics
///
/// Panics if no cassette is configured for the port or the cassette has no
/// matching interaction left.
pub(crate) fn next_output(replayer: Option<&SharedReplayer>, port: &str, method: &str) -> Value {
    let Some(replayer) = replayer else {
        panic!("{port} port not configured: no cassette loaded for {port}::{method}");
    };
    let mut guard = replayer.lock().unwrap_or_else(PoisonError::into_inner);
    guard.next_interaction(port, method).output.clone()
}

fn err_text(err: &Value) -> String {
    err.as_str().map_or_else(|| err.to_string(), str::to_string)
}

/// Decodes a `{"Ok": v}` / `{"Err": "message"}` output.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: Value,
) -> Result<T, Box<dyn Error + Send + Sync>> {
    if let Some(err) = output.get("Err") {
        return Err(err_text(err).into());
    }
    let Some(value) = output.get("Ok") else {
        return Err(format!("recorded output is neither Ok nor Err: {output}").into());
    };
    serde_json::from_value(value.clone())
        .map_err(|e| format!("failed to deserialize recorded value: {e}").into())
}

/// Decodes a task store output, rebuilding the typed error. A plain string
/// error becomes [`StoreError::Network`].
pub(crate) fn replay_store_result<T: DeserializeOwned>(output: Value) -> Result<T, StoreError> {
    if let Some(err) = output.get("Err") {
        return Err(serde_json::from_value(err.clone())
            .unwrap_or_else(|_| StoreError::network(err_text(err))));
    }
    let Some(value) = output.get("Ok") else {
        return Err(StoreError::Decode {
            message: format!("recorded output is neither Ok nor Err: {output}"),
        });
    };
    serde_json::from_value(value.clone()).map_err(|e| StoreError::Decode {
        message: e.to_string(),
    })
}

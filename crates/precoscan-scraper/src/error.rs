use std::time::Duration;

use thiserror::Error;

/// Fatal startup fault: the browser process itself could not be started.
///
/// Distinct from [`FetchError`] on purpose — per-invocation faults fold
/// into [`precoscan_core::ExtractionOutcome::Failure`], while a launch
/// failure means no session ever existed and is surfaced to the caller as
/// a hard error.
#[derive(Debug, Error)]
#[error("failed to start browser session: {reason}")]
pub struct LaunchError {
    pub reason: String,
}

/// Per-invocation faults raised between session open and session close.
///
/// Every variant except [`FetchError::Teardown`] is converted into a
/// `Failure` outcome at the classifier boundary; `Teardown` is only ever
/// logged, because a close failure must not replace the outcome already
/// computed from the inner steps.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("barcode must not be empty")]
    EmptyBarcode,

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("navigation timed out after {:?}", .timeout)]
    NavigationTimeout { timeout: Duration },

    #[error("page script evaluation failed: {reason}")]
    Evaluate { reason: String },

    #[error("harvested rows could not be decoded: {source}")]
    Marshal {
        #[source]
        source: serde_json::Error,
    },

    #[error("invocation cancelled: {:?} deadline exceeded", .deadline)]
    Cancelled { deadline: Duration },

    #[error("browser session teardown failed: {reason}")]
    Teardown { reason: String },
}

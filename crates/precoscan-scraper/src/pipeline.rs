//! The fetch-render-extract pipeline.
//!
//! One invocation is a single pass: open a session, navigate, harvest,
//! classify, close. There is no retry loop and no session reuse — a
//! caller that wants retries re-invokes the whole pipeline, and every
//! invocation owns its browser process exclusively.

use std::time::Duration;

use precoscan_core::{ExtractionOutcome, PriceRecord};

use crate::error::{FetchError, LaunchError};
use crate::extract;
use crate::portal;
use crate::session::{ChromiumSession, PortalSession};

/// Options recognized by one pipeline invocation.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Bound on the navigate-and-render step. Elapse aborts navigation
    /// and classifies the invocation as a failure.
    pub navigation_timeout: Duration,
    /// Identification header presented to the portal.
    pub user_agent: String,
    /// Run the browser without a visible window.
    pub headless: bool,
    /// Optional bound on the whole invocation. Elapse cancels the inner
    /// steps and classifies the invocation as a failure with a
    /// cancellation-specific message; the session is still closed.
    pub deadline: Option<Duration>,
    /// Base URL of the consultation page. Defaults to the live portal;
    /// integration tests point it at a locally served fixture page.
    pub portal_base: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(30),
            user_agent: portal::DEFAULT_USER_AGENT.to_owned(),
            headless: true,
            deadline: None,
            portal_base: portal::LOOKUP_BASE.to_owned(),
        }
    }
}

/// Fetches the retail price listing for `barcode` from the portal.
///
/// Launches a dedicated headless browser session, runs the pipeline, and
/// guarantees the session is torn down before the outcome is returned.
/// All per-invocation faults (navigation, timeout, extraction,
/// cancellation) fold into [`ExtractionOutcome::Failure`]; the returned
/// `Err` is reserved for the fatal startup case where no browser process
/// could be started at all.
///
/// # Errors
///
/// Returns [`LaunchError`] when the browser process cannot be launched.
pub async fn fetch_price_listing(
    barcode: &str,
    options: &FetchOptions,
) -> Result<ExtractionOutcome, LaunchError> {
    let session = ChromiumSession::launch(options).await?;
    Ok(fetch_with_session(session, barcode, options).await)
}

/// Runs the pipeline against an already-open session, with guaranteed
/// teardown on every exit path.
///
/// This is the session-guardian seam: `fetch_price_listing` delegates
/// here with a [`ChromiumSession`], and tests drive it with fake
/// sessions. The session is closed exactly once regardless of which path
/// the inner steps took; a teardown fault is logged and never replaces
/// the outcome already computed from the inner steps.
pub async fn fetch_with_session<S: PortalSession>(
    session: S,
    barcode: &str,
    options: &FetchOptions,
) -> ExtractionOutcome {
    let result = match options.deadline {
        Some(deadline) => {
            match tokio::time::timeout(deadline, drive(&session, barcode, options)).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Cancelled { deadline }),
            }
        }
        None => drive(&session, barcode, options).await,
    };

    let outcome = classify(result);

    if let Err(error) = session.close().await {
        tracing::warn!(%error, "browser session teardown failed");
    }

    outcome
}

/// The strictly sequential inner steps: build the URL, navigate within
/// the timeout, harvest, map rows to records.
async fn drive<S: PortalSession>(
    session: &S,
    barcode: &str,
    options: &FetchOptions,
) -> Result<Vec<PriceRecord>, FetchError> {
    let url = portal::lookup_url(&options.portal_base, barcode)?;
    tracing::debug!(%url, "navigating to price listing");

    match tokio::time::timeout(options.navigation_timeout, session.navigate(&url)).await {
        Ok(navigated) => navigated?,
        Err(_) => {
            return Err(FetchError::NavigationTimeout {
                timeout: options.navigation_timeout,
            })
        }
    }

    let rows = session.harvest().await?;
    tracing::debug!(rows = rows.len(), "harvested result table");
    Ok(extract::records_from_rows(rows))
}

/// Converts the inner steps' result into the outcome contract.
///
/// Zero records is always `EmptyResult`, never `Success` with an empty
/// list. A fault anywhere upstream becomes `Failure` carrying the
/// fault's description; this is the only path that surfaces raw error
/// text to the caller. No retries happen here, and no guess is made
/// about *why* a result is empty — portal degradation and genuinely
/// missing data are indistinguishable once navigation succeeded.
fn classify(result: Result<Vec<PriceRecord>, FetchError>) -> ExtractionOutcome {
    match result {
        Ok(records) if records.is_empty() => ExtractionOutcome::EmptyResult,
        Ok(records) => ExtractionOutcome::Success { records },
        Err(fault) => ExtractionOutcome::Failure {
            message: fault.to_string(),
        },
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;

//! Browser session lifecycle and in-page script evaluation.
//!
//! [`PortalSession`] is the capability boundary between the pipeline and
//! the headless-browser engine: navigate, harvest the rendered table,
//! close. The production implementation drives Chromium over CDP via
//! `chromiumoxide`; tests substitute in-memory fakes.
//!
//! One session means one isolated browser process with its own profile —
//! nothing is shared between invocations, so concurrent lookups cannot
//! contaminate each other through cookies or local storage.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetUserAgentOverrideParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::error::{FetchError, LaunchError};
use crate::extract::{HARVEST_JS, RESULT_TABLE_SELECTOR};
use crate::pipeline::FetchOptions;

/// How long a stable in-flight picture must hold before the page counts
/// as quiescent.
const QUIET_WINDOW_MS: u64 = 1_000;

/// Poll interval for the in-page quiescence and render-grace loops.
const POLL_INTERVAL_MS: u64 = 250;

/// Upper bound on the in-page quiescence loop. The pipeline's
/// `navigation_timeout` still applies on top of this from the outside.
const QUIESCENCE_BOUND_MS: u64 = 15_000;

/// Extra time granted for the result table to appear after the network
/// has settled. The portal sometimes renders the table asynchronously
/// after its last request completes; absence after the grace period is
/// not an error.
const RENDER_GRACE_MS: u64 = 5_000;

/// One exclusive browser session against the portal.
///
/// The trait splits the pipeline's browser needs into the three steps the
/// pipeline sequences: reach the rendered page, pull the table out of it,
/// tear the session down. `close` consumes the session so a closed
/// session cannot be reused.
#[async_trait]
pub trait PortalSession: Send + Sync {
    /// Navigates to `url` and waits for the page to finish rendering
    /// (load event, network quiescence heuristic, render grace for the
    /// result table).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Navigation`] on any browser-level failure to
    /// reach the page. The quiescence and render-grace waits are
    /// heuristics and never fail on their own.
    async fn navigate(&self, url: &str) -> Result<(), FetchError>;

    /// Collects the result table from the rendered document as raw rows
    /// of cell text. A missing table is a legitimate empty harvest, not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Evaluate`] when the page context rejects the
    /// script (crashed target, detached frame) and [`FetchError::Marshal`]
    /// when the returned value does not decode into rows.
    async fn harvest(&self) -> Result<Vec<Vec<String>>, FetchError>;

    /// Tears the session down. Called exactly once per invocation, on
    /// every exit path.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Teardown`]; callers report it but never let
    /// it replace an already-computed outcome.
    async fn close(self) -> Result<(), FetchError>;
}

/// Production [`PortalSession`] backed by a dedicated headless Chromium
/// process.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl ChromiumSession {
    /// Launches a fresh, isolated browser process and prepares a single
    /// page with the configured user-agent override.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError`] when the browser process cannot be
    /// started or the initial page cannot be prepared. This is the fatal
    /// startup fault: no session exists afterwards and nothing leaks.
    pub async fn launch(options: &FetchOptions) -> Result<Self, LaunchError> {
        let mut builder = BrowserConfig::builder().no_sandbox();
        if !options.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(|reason| LaunchError { reason })?;

        let (mut browser, mut handler) = Browser::launch(config).await.map_err(|e| LaunchError {
            reason: e.to_string(),
        })?;

        // Drain CDP events for the lifetime of the session; the stream
        // ends when the browser connection drops.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        match Self::prepare_page(&browser, options).await {
            Ok(page) => Ok(Self {
                browser,
                page,
                handler_task,
            }),
            Err(reason) => {
                // Launch failed halfway; the half-started process must
                // not outlive the error.
                if browser.close().await.is_err() {
                    browser.kill().await;
                }
                handler_task.abort();
                Err(LaunchError { reason })
            }
        }
    }

    /// Opens the session's page and applies the user-agent override.
    async fn prepare_page(browser: &Browser, options: &FetchOptions) -> Result<Page, String> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| e.to_string())?;

        let override_params = SetUserAgentOverrideParams::builder()
            .user_agent(&options.user_agent)
            .build()?;
        page.execute(override_params)
            .await
            .map_err(|e| e.to_string())?;

        Ok(page)
    }

    /// Evaluates a script expected to resolve to a boolean. Used for the
    /// heuristic waits, where a marshaling hiccup is treated the same as
    /// "condition not reached".
    async fn evaluate_flag(&self, script: String) -> Result<bool, FetchError> {
        let result = self.page.evaluate(script).await.map_err(|e| FetchError::Evaluate {
            reason: e.to_string(),
        })?;
        Ok(result.into_value::<bool>().unwrap_or(false))
    }
}

#[async_trait]
impl PortalSession for ChromiumSession {
    async fn navigate(&self, url: &str) -> Result<(), FetchError> {
        let navigation_failed = |e: chromiumoxide::error::CdpError| FetchError::Navigation {
            url: url.to_owned(),
            reason: e.to_string(),
        };

        self.page.goto(url).await.map_err(navigation_failed)?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(navigation_failed)?;

        // Heuristic quiescence: the load event alone is not enough, the
        // portal keeps issuing requests that feed the result table.
        let quiet = self
            .evaluate_flag(quiescence_script(QUIESCENCE_BOUND_MS))
            .await?;
        if !quiet {
            tracing::debug!(url, "network quiescence not reached before bound, continuing");
        }

        // The table can still render after the network settles; give it a
        // bounded grace period. Absence afterwards is the harvest step's
        // legitimate empty result, not a navigation fault.
        let table_present = self
            .evaluate_flag(render_grace_script(RENDER_GRACE_MS))
            .await?;
        if !table_present {
            tracing::debug!(url, "result table absent after render grace");
        }

        Ok(())
    }

    async fn harvest(&self) -> Result<Vec<Vec<String>>, FetchError> {
        let result = self
            .page
            .evaluate(HARVEST_JS)
            .await
            .map_err(|e| FetchError::Evaluate {
                reason: e.to_string(),
            })?;
        result
            .into_value()
            .map_err(|source| FetchError::Marshal { source })
    }

    async fn close(mut self) -> Result<(), FetchError> {
        let closed = self.browser.close().await;
        if closed.is_ok() {
            // Reap the child process so it does not linger as a zombie.
            let _ = self.browser.wait().await;
        } else {
            self.browser.kill().await;
        }
        self.handler_task.abort();
        closed.map(|_| ()).map_err(|e| FetchError::Teardown {
            reason: e.to_string(),
        })
    }
}

/// In-page wait for network quiescence: the completed-resource count must
/// hold still (with the document fully loaded) for a sustained window
/// before the bound elapses. Resolves to `true` when quiescence was
/// reached, `false` on bound elapse — never rejects.
fn quiescence_script(bound_ms: u64) -> String {
    format!(
        r"
(async () => {{
    const boundMs = {bound_ms};
    const quietWindowMs = {QUIET_WINDOW_MS};
    const intervalMs = {POLL_INTERVAL_MS};

    const start = Date.now();
    let lastCount = performance.getEntriesByType('resource').length;
    let quietMs = 0;

    while (Date.now() - start < boundMs) {{
        await new Promise((resolve) => setTimeout(resolve, intervalMs));
        const count = performance.getEntriesByType('resource').length;
        if (document.readyState === 'complete' && count === lastCount) {{
            quietMs += intervalMs;
            if (quietMs >= quietWindowMs) {{
                return true;
            }}
        }} else {{
            quietMs = 0;
        }}
        lastCount = count;
    }}
    return false;
}})()
"
    )
}

/// In-page wait for the result table to appear, bounded by `grace_ms`.
/// Resolves to whether the table exists; absence is not an error.
fn render_grace_script(grace_ms: u64) -> String {
    format!(
        r"
(async () => {{
    const deadline = Date.now() + {grace_ms};
    while (Date.now() < deadline) {{
        if (document.querySelector('{RESULT_TABLE_SELECTOR}')) {{
            return true;
        }}
        await new Promise((resolve) => setTimeout(resolve, {POLL_INTERVAL_MS}));
    }}
    return document.querySelector('{RESULT_TABLE_SELECTOR}') !== null;
}})()
"
    )
}

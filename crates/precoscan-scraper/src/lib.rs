//! Headless-browser pipeline that fetches retail price listings for a
//! barcode from the SEFAZ/RN NFC-e consultation portal.
//!
//! The portal renders its results client-side, so a plain HTTP fetch
//! returns an empty shell; this crate drives a real Chromium process to
//! the lookup URL, waits for the result table to materialize, extracts
//! it, and classifies the invocation into the
//! [`precoscan_core::ExtractionOutcome`] contract.

pub mod error;
pub mod extract;
pub mod pipeline;
pub mod portal;
pub mod session;

pub use error::{FetchError, LaunchError};
pub use pipeline::{fetch_price_listing, fetch_with_session, FetchOptions};
pub use session::{ChromiumSession, PortalSession};

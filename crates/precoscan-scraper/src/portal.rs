//! The SEFAZ/RN portal's URL contract.
//!
//! The consultation endpoint expects the barcode as the `p` query
//! parameter followed by a literal `|` separator. That shape is an
//! external contract with the portal and must be reproduced exactly,
//! which is why the URL is assembled by string formatting rather than a
//! URL builder (a builder would percent-encode the trailing pipe).

use crate::error::FetchError;

/// Public NFC-e consultation page on the SEFAZ/RN portal.
pub const LOOKUP_BASE: &str = "https://portal.nfce.sefaz.rn.gov.br/consultarNFCe.aspx";

/// Identification header presented to the portal. Without a realistic
/// desktop browser string the portal serves a degraded response that
/// never renders the result table.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Builds the lookup URL for `barcode` against `base`.
///
/// The barcode is embedded verbatim; no escaping is applied beyond what
/// the caller already guaranteed (barcodes are numeric GTINs in
/// practice). The only constraint imposed here is non-emptiness.
///
/// # Errors
///
/// Returns [`FetchError::EmptyBarcode`] when `barcode` is empty.
pub fn lookup_url(base: &str, barcode: &str) -> Result<String, FetchError> {
    if barcode.is_empty() {
        return Err(FetchError::EmptyBarcode);
    }
    Ok(format!("{base}?p={barcode}|"))
}

#[cfg(test)]
#[path = "portal_test.rs"]
mod tests;

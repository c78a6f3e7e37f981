//! Shared domain types for the precoscan workspace.

use serde::{Deserialize, Serialize};

pub mod gtin;

/// One row of the portal's price listing table.
///
/// All fields are free-form text exactly as rendered by the portal
/// (trimmed of surrounding whitespace, no numeric or date parsing). A row
/// with fewer cells than expected carries empty strings for the missing
/// trailing fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Retailer name as shown in the listing.
    pub store: String,
    /// Retailer street address.
    pub address: String,
    /// Date of the reported sale, in the portal's own formatting.
    pub date: String,
    /// Reported unit price, in the portal's own formatting.
    pub price: String,
}

/// The result contract of one pipeline invocation.
///
/// Exactly one variant is produced per invocation. A lookup that reached
/// the portal but found no price rows is always `EmptyResult` — the
/// pipeline never produces `Success` with an empty record list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// At least one price row was extracted, in table order.
    Success { records: Vec<PriceRecord> },
    /// The page loaded but reported no price rows (or no result table).
    EmptyResult,
    /// Navigation or extraction failed; `message` is the fault's
    /// human-readable description.
    Failure { message: String },
}

impl ExtractionOutcome {
    /// Returns `true` for the `Success` variant.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the extracted records, or an empty slice for the other
    /// variants.
    #[must_use]
    pub fn records(&self) -> &[PriceRecord] {
        match self {
            Self::Success { records } => records,
            _ => &[],
        }
    }
}

//! Result-table extraction.
//!
//! The portal renders its price listing client-side into a table with a
//! fixed element id. The DOM traversal runs inside the page's execution
//! context as a serialized script; only plain text cells cross back over
//! the boundary, as `Vec<Vec<String>>`. The mapping from raw rows to
//! [`PriceRecord`]s happens host-side so it stays a pure, testable
//! function.
//!
//! Everything that couples this crate to the portal's markup — the table
//! selector and the column order — lives here, so a markup change on the
//! portal side touches this module only.

use precoscan_core::PriceRecord;

/// CSS selector of the result table in the portal's markup.
pub(crate) const RESULT_TABLE_SELECTOR: &str = "#grdProdutos";

/// Fixed column offsets of the result table.
const COL_STORE: usize = 0;
const COL_ADDRESS: usize = 1;
const COL_DATE: usize = 2;
const COL_PRICE: usize = 3;

/// Script evaluated in the page context to collect the result table.
///
/// Returns one entry per `<tr>` (header row included — the host side
/// discards it), each entry being the row's `<td>` texts in document
/// order. A page without the result table yields `[]`, which is a
/// legitimate empty result rather than an error: the page loaded fine and
/// simply reports no table.
pub(crate) const HARVEST_JS: &str = r"
(() => {
    const table = document.querySelector('#grdProdutos');
    if (!table) {
        return [];
    }
    return Array.from(table.querySelectorAll('tr')).map((row) =>
        Array.from(row.querySelectorAll('td')).map((cell) => cell.innerText)
    );
})()
";

/// Maps harvested raw rows into price records.
///
/// Discards exactly the first row (the table header), trims every cell,
/// and maps the remaining rows positionally. A row with fewer than four
/// cells yields a record with the missing trailing fields empty —
/// extraction is row-local and one malformed row never aborts the batch.
#[must_use]
pub fn records_from_rows(rows: Vec<Vec<String>>) -> Vec<PriceRecord> {
    rows.into_iter().skip(1).map(record_from_row).collect()
}

fn record_from_row(row: Vec<String>) -> PriceRecord {
    PriceRecord {
        store: cell_text(&row, COL_STORE),
        address: cell_text(&row, COL_ADDRESS),
        date: cell_text(&row, COL_DATE),
        price: cell_text(&row, COL_PRICE),
    }
}

/// Trimmed text of the cell at `index`, or an empty string when the row
/// is short.
fn cell_text(row: &[String], index: usize) -> String {
    row.get(index).map(|cell| cell.trim().to_owned()).unwrap_or_default()
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;

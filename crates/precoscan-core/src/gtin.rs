//! GTIN check-digit validation.
//!
//! The portal accepts any barcode string, so validation here is advisory:
//! callers can warn on a bad check digit before spending a browser session
//! on a lookup that cannot match anything.

/// Returns `true` if `code` is a structurally valid GTIN-8, UPC-A (12),
/// EAN-13, or GTIN-14: correct length, all ASCII digits, and a matching
/// mod-10 check digit.
#[must_use]
pub fn is_valid(code: &str) -> bool {
    if !matches!(code.len(), 8 | 12 | 13 | 14) {
        return false;
    }
    let Some(digits) = digit_values(code) else {
        return false;
    };
    let Some((check, payload)) = digits.split_last() else {
        return false;
    };
    check_digit(payload) == *check
}

/// Computes the mod-10 check digit for a GTIN payload (the code without
/// its final digit). The rightmost payload digit always carries weight 3,
/// alternating 3/1 leftwards.
#[must_use]
pub fn check_digit(payload: &[u32]) -> u32 {
    let sum: u32 = payload
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();
    (10 - sum % 10) % 10
}

/// Converts `code` into digit values, or `None` if any byte is not an
/// ASCII digit.
fn digit_values(code: &str) -> Option<Vec<u32>> {
    code.bytes()
        .map(|b| {
            if b.is_ascii_digit() {
                Some(u32::from(b - b'0'))
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "gtin_test.rs"]
mod tests;

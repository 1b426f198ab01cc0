//! Statement parsers. Each returns transactions with ISO dates and
//! content-derived hashes; rejected rows are reported, not fatal.

pub mod chase_debit;
pub mod generic_csv;

use sha2::{Digest, Sha256};

/// Hex SHA-256 over the fields that identify a statement row.
pub fn transaction_hash(fields: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for field in fields {
        hasher.update(field.as_bytes());
        hasher.update(b"\x1f");
    }
    format!("{:x}", hasher.finalize())
}

/// Parse `1,234.56`, `R 1 234.56` or `-15.00` style amounts.
pub(crate) fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches(['R', '$'])
        .chars()
        .filter(|c| !matches!(c, ',' | ' ' | '\u{a0}'))
        .collect();
    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable_and_field_sensitive() {
        let a = transaction_hash(&["2024-01-01", "Coffee", "-5", "95"]);
        assert_eq!(a, transaction_hash(&["2024-01-01", "Coffee", "-5", "95"]));
        assert_eq!(a.len(), 64);
        assert_ne!(a, transaction_hash(&["2024-01-01", "Coffee", "-5", "96"]));
        // Field boundaries matter
        assert_ne!(transaction_hash(&["ab", "c"]), transaction_hash(&["a", "bc"]));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("-15.00"), Some(-15.0));
        assert_eq!(parse_amount("R 1 000.10"), Some(1000.10));
        assert_eq!(parse_amount("n/a"), None);
    }
}

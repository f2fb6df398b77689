//! Barcode value object.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// A scanned or typed product identifier.
///
/// Always trimmed and never empty. Comparison is exact (case-sensitive): scanners
/// emit the encoded text verbatim, so `sku-001` and `SKU-001` are different items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Barcode(String);

impl Barcode {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid("barcode", "cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Barcode {}

impl core::fmt::Display for Barcode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Barcode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Barcode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Barcode> for String {
    fn from(value: Barcode) -> Self {
        value.0
    }
}

impl AsRef<str> for Barcode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let barcode = Barcode::parse("  SKU-001\n").unwrap();
        assert_eq!(barcode.as_str(), "SKU-001");
    }

    #[test]
    fn parse_rejects_blank_input() {
        for raw in ["", "   ", "\t\n"] {
            match Barcode::parse(raw) {
                Err(DomainError::Invalid { field: "barcode", .. }) => {}
                other => panic!("Expected invalid barcode for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn deserialize_applies_the_same_rules() {
        let ok: Barcode = serde_json::from_str("\" 0123456789012 \"").unwrap();
        assert_eq!(ok.as_str(), "0123456789012");

        assert!(serde_json::from_str::<Barcode>("\"  \"").is_err());
    }

    proptest! {
        /// Property: parsing is idempotent on its own output.
        #[test]
        fn parse_is_idempotent(raw in "\\PC{0,32}") {
            if let Ok(first) = Barcode::parse(&raw) {
                let second = Barcode::parse(first.as_str()).unwrap();
                prop_assert_eq!(first, second);
            }
        }
    }
}

//! Inventory tables and their required-field rules.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use scanstock_core::DomainError;

/// A named partition of inventory with its own required fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryTable {
    New,
    Used,
    #[default]
    Generic,
}

/// A field a draft must fill before it can be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Barcode,
    ProductName,
    Price,
    Size,
    Condition,
}

impl RequiredField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredField::Barcode => "barcode",
            RequiredField::ProductName => "product_name",
            RequiredField::Price => "price",
            RequiredField::Size => "size",
            RequiredField::Condition => "condition",
        }
    }
}

impl InventoryTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryTable::New => "new",
            InventoryTable::Used => "used",
            InventoryTable::Generic => "generic",
        }
    }

    /// Fields that must be non-empty for a draft to be accepted into this table.
    pub fn required_fields(&self) -> &'static [RequiredField] {
        use RequiredField::*;
        match self {
            InventoryTable::Generic => &[Barcode, ProductName, Price],
            InventoryTable::New => &[Barcode, ProductName, Price, Size],
            InventoryTable::Used => &[Barcode, ProductName, Price, Size, Condition],
        }
    }

    pub fn requires(&self, field: RequiredField) -> bool {
        self.required_fields().contains(&field)
    }
}

impl core::fmt::Display for InventoryTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InventoryTable {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(InventoryTable::New),
            "used" => Ok(InventoryTable::Used),
            "generic" => Ok(InventoryTable::Generic),
            other => Err(DomainError::invalid(
                "table",
                format!("'{other}' (expected one of: new, used, generic)"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stricter_tables_extend_generic_rules() {
        let generic = InventoryTable::Generic.required_fields();
        for field in generic {
            assert!(InventoryTable::New.requires(*field));
            assert!(InventoryTable::Used.requires(*field));
        }
        assert!(!InventoryTable::Generic.requires(RequiredField::Size));
        assert!(InventoryTable::New.requires(RequiredField::Size));
        assert!(!InventoryTable::New.requires(RequiredField::Condition));
        assert!(InventoryTable::Used.requires(RequiredField::Condition));
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("USED".parse::<InventoryTable>().unwrap(), InventoryTable::Used);
        assert_eq!(" new ".parse::<InventoryTable>().unwrap(), InventoryTable::New);
        assert!("clearance".parse::<InventoryTable>().is_err());
    }
}

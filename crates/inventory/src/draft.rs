//! Editable product draft (the in-progress form contents).

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use scanstock_core::{Barcode, DomainError, DomainResult, Price, VendorId};

use crate::record::{ConditionAttributes, InventoryRecord, NewInventoryRecord, Quantity};
use crate::table::{InventoryTable, RequiredField};

/// Quantity assumed when the vendor leaves the field blank.
pub const DEFAULT_QUANTITY: Quantity = 1;

/// Raw, user-typed values for a product that has not been persisted yet.
///
/// Every field is kept as text so a half-filled form survives failed saves
/// unchanged. `validate` is the only way to turn a draft into a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryDraft {
    pub barcode: String,
    pub product_name: String,
    pub description: String,
    pub price: String,
    pub quantity: String,
    pub size: String,
    pub color: String,
    pub condition_grade: String,
    pub condition_notes: String,
}

/// A single editable field of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Barcode,
    ProductName,
    Description,
    Price,
    Quantity,
    Size,
    Color,
    ConditionGrade,
    ConditionNotes,
}

impl FromStr for DraftField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "barcode" => Ok(DraftField::Barcode),
            "name" | "product_name" => Ok(DraftField::ProductName),
            "description" => Ok(DraftField::Description),
            "price" => Ok(DraftField::Price),
            "quantity" | "qty" => Ok(DraftField::Quantity),
            "size" => Ok(DraftField::Size),
            "color" => Ok(DraftField::Color),
            "grade" | "condition" | "condition_grade" => Ok(DraftField::ConditionGrade),
            "notes" | "condition_notes" => Ok(DraftField::ConditionNotes),
            other => Err(DomainError::invalid("field", format!("'{other}' is not a draft field"))),
        }
    }
}

impl InventoryDraft {
    /// Blank draft pre-filled with a scanned barcode.
    pub fn for_barcode(barcode: &Barcode) -> Self {
        Self {
            barcode: barcode.to_string(),
            ..Self::default()
        }
    }

    /// Draft pre-filled from an existing record (the "add new from existing" branch).
    pub fn from_record(record: &InventoryRecord) -> Self {
        let condition = record.condition();
        Self {
            barcode: record.barcode().to_string(),
            product_name: record.product_name().to_string(),
            description: record.description().to_string(),
            price: record.price().to_string(),
            quantity: record.quantity().to_string(),
            size: record.size().to_string(),
            color: record.color().to_string(),
            condition_grade: condition.map(|c| c.grade.clone()).unwrap_or_default(),
            condition_notes: condition
                .and_then(|c| c.notes.clone())
                .unwrap_or_default(),
        }
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Barcode => self.barcode = value,
            DraftField::ProductName => self.product_name = value,
            DraftField::Description => self.description = value,
            DraftField::Price => self.price = value,
            DraftField::Quantity => self.quantity = value,
            DraftField::Size => self.size = value,
            DraftField::Color => self.color = value,
            DraftField::ConditionGrade => self.condition_grade = value,
            DraftField::ConditionNotes => self.condition_notes = value,
        }
    }

    /// Fields required by `table` that are still blank.
    pub fn missing_fields(&self, table: InventoryTable) -> Vec<RequiredField> {
        table
            .required_fields()
            .iter()
            .copied()
            .filter(|field| {
                let value = match field {
                    RequiredField::Barcode => &self.barcode,
                    RequiredField::ProductName => &self.product_name,
                    RequiredField::Price => &self.price,
                    RequiredField::Size => &self.size,
                    RequiredField::Condition => &self.condition_grade,
                };
                value.trim().is_empty()
            })
            .collect()
    }

    /// Validate the draft against `table`'s rules and build an insertable record.
    pub fn validate(
        &self,
        vendor_id: VendorId,
        table: InventoryTable,
    ) -> DomainResult<NewInventoryRecord> {
        let missing = self.missing_fields(table);
        if !missing.is_empty() {
            return Err(DomainError::MissingFields(
                missing.iter().map(|f| f.as_str()).collect(),
            ));
        }

        let barcode = Barcode::parse(&self.barcode)?;
        let price = Price::parse(&self.price)?;
        let quantity = parse_quantity(&self.quantity)?;

        let grade = self.condition_grade.trim();
        let notes = self.condition_notes.trim();
        let condition = if grade.is_empty() {
            None
        } else {
            Some(ConditionAttributes {
                grade: grade.to_string(),
                notes: (!notes.is_empty()).then(|| notes.to_string()),
            })
        };

        Ok(NewInventoryRecord {
            vendor_id,
            barcode,
            product_name: self.product_name.trim().to_string(),
            description: self.description.trim().to_string(),
            price,
            quantity,
            size: self.size.trim().to_string(),
            color: self.color.trim().to_string(),
            condition,
        })
    }
}

fn parse_quantity(raw: &str) -> DomainResult<Quantity> {
    let s = raw.trim();
    if s.is_empty() {
        return Ok(DEFAULT_QUANTITY);
    }
    if s.starts_with('-') {
        return Err(DomainError::invalid("quantity", "cannot be negative"));
    }
    s.parse::<Quantity>()
        .map_err(|_| DomainError::invalid("quantity", format!("'{s}' is not a whole number")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanstock_core::RecordId;

    fn filled() -> InventoryDraft {
        InventoryDraft {
            barcode: "SKU-001".to_string(),
            product_name: "Air X".to_string(),
            price: "120".to_string(),
            quantity: "2".to_string(),
            size: "9M/10.5W".to_string(),
            ..InventoryDraft::default()
        }
    }

    #[test]
    fn validate_builds_record_from_filled_draft() {
        let vendor_id = VendorId::new();
        let record = filled().validate(vendor_id, InventoryTable::New).unwrap();

        assert_eq!(record.vendor_id, vendor_id);
        assert_eq!(record.barcode.as_str(), "SKU-001");
        assert_eq!(record.product_name, "Air X");
        assert_eq!(record.price, Price::from_cents(12_000));
        assert_eq!(record.quantity, 2);
        assert_eq!(record.size, "9M/10.5W");
        assert!(record.condition.is_none());
    }

    #[test]
    fn validate_reports_every_missing_field() {
        let draft = InventoryDraft {
            barcode: "SKU-001".to_string(),
            ..InventoryDraft::default()
        };

        let err = draft.validate(VendorId::new(), InventoryTable::Used).unwrap_err();
        match err {
            DomainError::MissingFields(fields) => {
                assert_eq!(fields, vec!["product_name", "price", "size", "condition"]);
            }
            other => panic!("Expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn size_is_optional_only_in_generic_table() {
        let mut draft = filled();
        draft.size.clear();

        assert!(draft.validate(VendorId::new(), InventoryTable::Generic).is_ok());
        assert!(draft.validate(VendorId::new(), InventoryTable::New).is_err());
    }

    #[test]
    fn used_table_captures_condition() {
        let mut draft = filled();
        draft.condition_grade = "B".to_string();
        draft.condition_notes = "  scuffed toe ".to_string();

        let record = draft.validate(VendorId::new(), InventoryTable::Used).unwrap();
        let condition = record.condition.unwrap();
        assert_eq!(condition.grade, "B");
        assert_eq!(condition.notes.as_deref(), Some("scuffed toe"));
    }

    #[test]
    fn blank_quantity_defaults_and_negative_is_rejected() {
        let mut draft = filled();
        draft.quantity = "  ".to_string();
        let record = draft.validate(VendorId::new(), InventoryTable::New).unwrap();
        assert_eq!(record.quantity, DEFAULT_QUANTITY);

        draft.quantity = "-3".to_string();
        assert!(draft.validate(VendorId::new(), InventoryTable::New).is_err());
    }

    #[test]
    fn from_record_round_trips_through_validate() {
        let mut draft = filled();
        draft.condition_grade = "A".to_string();
        let vendor_id = VendorId::new();
        let record = draft
            .validate(vendor_id, InventoryTable::Used)
            .unwrap()
            .into_record(RecordId::new());

        let again = InventoryDraft::from_record(&record)
            .validate(vendor_id, InventoryTable::Used)
            .unwrap();
        assert_eq!(again.into_record(record.id_typed()), record);
    }

    #[test]
    fn field_names_parse_with_aliases() {
        assert_eq!("name".parse::<DraftField>().unwrap(), DraftField::ProductName);
        assert_eq!("qty".parse::<DraftField>().unwrap(), DraftField::Quantity);
        assert_eq!("condition-notes".parse::<DraftField>().unwrap(), DraftField::ConditionNotes);
        assert!("weight".parse::<DraftField>().is_err());
    }
}

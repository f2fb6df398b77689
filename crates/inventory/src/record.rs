use serde::{Deserialize, Serialize};

use scanstock_core::{Barcode, Entity, Price, RecordId, VendorId};

/// Units on hand. Never negative.
pub type Quantity = u32;

/// Table-dependent attributes describing the state of a second-hand item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionAttributes {
    pub grade: String,
    pub notes: Option<String>,
}

/// A validated record ready to be inserted (no id yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInventoryRecord {
    pub vendor_id: VendorId,
    pub barcode: Barcode,
    pub product_name: String,
    pub description: String,
    pub price: Price,
    pub quantity: Quantity,
    pub size: String,
    pub color: String,
    pub condition: Option<ConditionAttributes>,
}

impl NewInventoryRecord {
    /// Attach the store-assigned identifier.
    pub fn into_record(self, id: RecordId) -> InventoryRecord {
        InventoryRecord {
            id,
            vendor_id: self.vendor_id,
            barcode: self.barcode,
            product_name: self.product_name,
            description: self.description,
            price: self.price,
            quantity: self.quantity,
            size: self.size,
            color: self.color,
            condition: self.condition,
        }
    }
}

/// Entity: a persisted inventory record.
///
/// At most one record exists per (table, vendor, barcode). Only the quantity
/// ever changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    id: RecordId,
    vendor_id: VendorId,
    barcode: Barcode,
    product_name: String,
    description: String,
    price: Price,
    quantity: Quantity,
    size: String,
    color: String,
    condition: Option<ConditionAttributes>,
}

impl InventoryRecord {
    pub fn id_typed(&self) -> RecordId {
        self.id
    }

    pub fn vendor_id(&self) -> VendorId {
        self.vendor_id
    }

    pub fn barcode(&self) -> &Barcode {
        &self.barcode
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn condition(&self) -> Option<&ConditionAttributes> {
        self.condition.as_ref()
    }

    /// The same record with a new committed quantity.
    pub fn with_quantity(mut self, quantity: Quantity) -> Self {
        self.quantity = quantity;
        self
    }
}

impl Entity for InventoryRecord {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

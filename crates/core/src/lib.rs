//! `scanstock-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the barcode and price value objects, and the domain error model.

pub mod barcode;
pub mod entity;
pub mod error;
pub mod id;
pub mod price;
pub mod value_object;

pub use barcode::Barcode;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{RecordId, VendorId};
pub use price::Price;
pub use value_object::ValueObject;

//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**: two value objects with the same values
//! are equal. `Barcode` and `Price` are the value objects of this domain.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// construct a new one. Construction is the only place validation happens, so
/// holding a value object means holding a valid value.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

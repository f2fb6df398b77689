//! Infrastructure layer: inventory store, scan sources, configuration.
//!
//! Everything here is a boundary the reconciliation core consumes through a
//! trait, with an in-memory or scripted implementation for tests/dev.

pub mod config;
pub mod scan;
pub mod store;

pub use config::{ConfigError, StationConfig, WriteMode};
pub use scan::{LineScanSource, ScanEvent, ScanSignal, ScanSource, ScriptedScanSource};
pub use store::{InMemoryInventoryStore, InventoryStore, StoreError};

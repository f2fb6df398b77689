//! Configuration loading and representation.
//!
//! A station is configured from the process environment:
//!
//! | variable | values | default |
//! |---|---|---|
//! | `SCANSTOCK_VENDOR_ID` | UUID | fresh id |
//! | `SCANSTOCK_TABLE` | `new`, `used`, `generic` | `generic` |
//! | `SCANSTOCK_WRITE_MODE` | `immediate`, `deferred` | `deferred` |

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use scanstock_core::VendorId;
use scanstock_inventory::InventoryTable;

pub const ENV_VENDOR_ID: &str = "SCANSTOCK_VENDOR_ID";
pub const ENV_TABLE: &str = "SCANSTOCK_TABLE";
pub const ENV_WRITE_MODE: &str = "SCANSTOCK_WRITE_MODE";

/// When quantity adjustments reach the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Every accepted adjustment is written straight away.
    Immediate,
    /// Adjustments accumulate locally; one write happens on save.
    #[default]
    Deferred,
}

impl FromStr for WriteMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "immediate" => Ok(WriteMode::Immediate),
            "deferred" => Ok(WriteMode::Deferred),
            other => Err(ConfigError::Invalid {
                key: ENV_WRITE_MODE,
                message: format!("unknown write mode '{other}' (expected immediate or deferred)"),
            }),
        }
    }
}

impl core::fmt::Display for WriteMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            WriteMode::Immediate => f.write_str("immediate"),
            WriteMode::Deferred => f.write_str("deferred"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Settings for one scanning station (one vendor, one active table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationConfig {
    pub vendor_id: VendorId,
    #[serde(default)]
    pub table: InventoryTable,
    #[serde(default)]
    pub write_mode: WriteMode,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            vendor_id: VendorId::new(),
            table: InventoryTable::default(),
            write_mode: WriteMode::default(),
        }
    }
}

impl StationConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; unset or blank keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = get(ENV_VENDOR_ID) {
            config.vendor_id = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                key: ENV_VENDOR_ID,
                message: format!("{e}"),
            })?;
        }

        if let Some(raw) = get(ENV_TABLE) {
            config.table = raw.parse().map_err(|e| ConfigError::Invalid {
                key: ENV_TABLE,
                message: format!("{e}"),
            })?;
        }

        if let Some(raw) = get(ENV_WRITE_MODE) {
            config.write_mode = raw.parse()?;
        }

        Ok(config)
    }

    pub fn with_table(mut self, table: InventoryTable) -> Self {
        self.table = table;
        self
    }

    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    pub fn with_vendor(mut self, vendor_id: VendorId) -> Self {
        self.vendor_id = vendor_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = StationConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.table, InventoryTable::Generic);
        assert_eq!(config.write_mode, WriteMode::Deferred);
    }

    #[test]
    fn reads_every_key() {
        let vendor = VendorId::new();
        let vendor_str = vendor.to_string();
        let config = StationConfig::from_lookup(lookup(&[
            (ENV_VENDOR_ID, vendor_str.as_str()),
            (ENV_TABLE, "used"),
            (ENV_WRITE_MODE, "Immediate"),
        ]))
        .unwrap();

        assert_eq!(config.vendor_id, vendor);
        assert_eq!(config.table, InventoryTable::Used);
        assert_eq!(config.write_mode, WriteMode::Immediate);
    }

    #[test]
    fn invalid_values_name_the_key() {
        let err = StationConfig::from_lookup(lookup(&[(ENV_WRITE_MODE, "sometimes")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_WRITE_MODE, .. }));

        let err = StationConfig::from_lookup(lookup(&[(ENV_TABLE, "clearance")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_TABLE, .. }));

        let err = StationConfig::from_lookup(lookup(&[(ENV_VENDOR_ID, "abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_VENDOR_ID, .. }));
    }

    #[test]
    fn deserializes_with_defaults() {
        let vendor = VendorId::new();
        let json = format!("{{\"vendor_id\":\"{vendor}\"}}");
        let config: StationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.vendor_id, vendor);
        assert_eq!(config.table, InventoryTable::Generic);
        assert_eq!(config.write_mode, WriteMode::Deferred);
    }
}

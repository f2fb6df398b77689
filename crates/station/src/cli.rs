//! Command-line arguments for the station binary.

use clap::{Parser, Subcommand};

use scanstock_infra::{StationConfig, WriteMode};
use scanstock_inventory::InventoryTable;

/// Barcode reconciliation station over stdin.
///
/// Vendor, table and write mode come from `SCANSTOCK_*` environment
/// variables; the flags below take precedence over them.
#[derive(Parser, Debug)]
#[command(name = "scanstock-station")]
#[command(version, about, long_about = None)]
pub struct StationCli {
    /// Active table (new, used, generic).
    #[arg(long, global = true)]
    pub table: Option<InventoryTable>,

    /// When quantity changes are written (immediate, deferred).
    #[arg(long, global = true)]
    pub write_mode: Option<WriteMode>,

    #[command(subcommand)]
    pub mode: Option<Mode>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Read console commands, one per line (default).
    Console,
    /// Receiving mode: every line is a barcode; known items gain `n` units.
    Count {
        #[arg(default_value_t = 1)]
        n: u32,
    },
}

impl StationCli {
    pub fn mode(&self) -> Mode {
        self.mode.clone().unwrap_or(Mode::Console)
    }

    /// Apply flag overrides on top of the environment config.
    pub fn apply(&self, mut config: StationConfig) -> StationConfig {
        if let Some(table) = self.table {
            config = config.with_table(table);
        }
        if let Some(write_mode) = self.write_mode {
            config = config.with_write_mode(write_mode);
        }
        config
    }
}

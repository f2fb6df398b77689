//! Scanning station over stdin, against an in-memory store.
//!
//! `scanstock-station` reads console commands, one per line (`help` lists them).
//! `scanstock-station count [N]` is receiving mode: every line is a barcode, as
//! typed by a keyboard-wedge scanner, and each known item gains `n` units
//! (default 1). Unknown barcodes are listed when input ends or on Ctrl-C.

mod cli;
mod commands;
mod console;

use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{Instrument, info, warn};

use scanstock_infra::{InMemoryInventoryStore, LineScanSource, StationConfig};
use scanstock_reconcile::{CountIn, ReconcileSession, drive_scans_until};

use crate::cli::{Mode, StationCli};
use crate::console::{Console, Reply};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = StationCli::parse();
    scanstock_observability::init();

    let config = cli.apply(StationConfig::from_env()?);
    let span = scanstock_observability::station_span(
        &config.vendor_id.to_string(),
        config.table.as_str(),
    );

    match cli.mode() {
        Mode::Console => run_console(config).instrument(span).await,
        Mode::Count { n } => run_count_in(config, i64::from(n)).instrument(span).await,
    }
}

async fn run_count_in(config: StationConfig, delta: i64) -> anyhow::Result<()> {
    info!(delta, "receiving mode");

    let store = Arc::new(InMemoryInventoryStore::new());
    let mut session = ReconcileSession::from_config(store, &config);
    let mut source = LineScanSource::new(BufReader::new(tokio::io::stdin()));
    let mut handler = CountIn::new(delta);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    let report = drive_scans_until(&mut session, &mut source, &mut handler, shutdown).await;

    println!("{}", serde_json::to_string_pretty(&report)?);
    for barcode in handler.unknown() {
        println!("unknown: {barcode}");
    }
    Ok(())
}

async fn run_console(config: StationConfig) -> anyhow::Result<()> {
    info!(write_mode = %config.write_mode, "station starting");

    let store = Arc::new(InMemoryInventoryStore::new());
    let mut session = ReconcileSession::from_config(store, &config);
    session.start_scanning();
    let mut console = Console::new(session);

    println!("{}", commands::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                warn!(error = %e, "unparsed input");
                println!("error: {e}");
                continue;
            }
        };
        match console.execute(command).await {
            Reply::Text(text) => println!("{text}"),
            Reply::Quit => break,
        }
    }

    info!(state = %console.session().state(), "station stopped");
    Ok(())
}

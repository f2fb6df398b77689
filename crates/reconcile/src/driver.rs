//! Scan loop: feeds a [`ScanSource`] into a session, one scan at a time.
//!
//! Each decoded scan is reconciled and handed to a [`ScanHandler`] before the
//! next signal is read, so no lookup ever overlaps a write. Decode failures are
//! counted and skipped. Shutdown only interrupts the wait for the next signal;
//! a scan already being processed always runs to completion.

use std::future::Future;

use serde::Serialize;
use tracing::{debug, info, warn};

use scanstock_core::Barcode;
use scanstock_infra::{InventoryStore, ScanSignal, ScanSource};

use crate::decision::ReconciliationDecision;
use crate::error::ReconcileResult;
use crate::form::FormSession;
use crate::session::ReconcileSession;

/// Reacts to each reconciled scan (the caller's side of the decision).
#[async_trait::async_trait]
pub trait ScanHandler<S, F>: Send
where
    S: InventoryStore,
    F: FormSession,
{
    async fn on_decision(
        &mut self,
        session: &mut ReconcileSession<S, F>,
        decision: &ReconciliationDecision,
    ) -> ReconcileResult<()>;
}

/// Leaves every decision for the caller to act on.
#[derive(Debug, Clone, Copy, Default)]
pub struct LookupOnly;

#[async_trait::async_trait]
impl<S, F> ScanHandler<S, F> for LookupOnly
where
    S: InventoryStore,
    F: FormSession,
{
    async fn on_decision(
        &mut self,
        _session: &mut ReconcileSession<S, F>,
        _decision: &ReconciliationDecision,
    ) -> ReconcileResult<()> {
        Ok(())
    }
}

/// Receiving mode: every scan of a known item adds `delta` units and saves.
///
/// Unknown barcodes are collected for later manual entry.
#[derive(Debug, Clone, Default)]
pub struct CountIn {
    delta: i64,
    unknown: Vec<Barcode>,
}

impl CountIn {
    pub fn new(delta: i64) -> Self {
        Self {
            delta,
            unknown: Vec::new(),
        }
    }

    pub fn unknown(&self) -> &[Barcode] {
        &self.unknown
    }
}

#[async_trait::async_trait]
impl<S, F> ScanHandler<S, F> for CountIn
where
    S: InventoryStore,
    F: FormSession,
{
    async fn on_decision(
        &mut self,
        session: &mut ReconcileSession<S, F>,
        decision: &ReconciliationDecision,
    ) -> ReconcileResult<()> {
        match decision {
            ReconciliationDecision::Found(record) => {
                session.choose_existing()?;
                session.adjust_quantity(record.id_typed(), self.delta).await?;
                session.save().await?;
            }
            ReconciliationDecision::NotFound => {
                if let Ok(barcode) = Barcode::parse(&session.form().draft().barcode) {
                    if !self.unknown.contains(&barcode) {
                        self.unknown.push(barcode);
                    }
                }
                session.cancel();
            }
            ReconciliationDecision::LookupError(_) => {}
        }
        Ok(())
    }
}

/// Counters for one run of the scan loop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub scans: usize,
    pub decode_errors: usize,
    pub rejected: usize,
    pub found: usize,
    pub not_found: usize,
    pub lookup_errors: usize,
    pub handler_errors: usize,
}

/// Run until the source is exhausted.
pub async fn drive_scans<S, F, Src, H>(
    session: &mut ReconcileSession<S, F>,
    source: &mut Src,
    handler: &mut H,
) -> ScanReport
where
    S: InventoryStore,
    F: FormSession,
    Src: ScanSource + ?Sized,
    H: ScanHandler<S, F> + ?Sized,
{
    drive_scans_until(session, source, handler, std::future::pending()).await
}

/// Run until the source is exhausted or `shutdown` resolves.
pub async fn drive_scans_until<S, F, Src, H, Fut>(
    session: &mut ReconcileSession<S, F>,
    source: &mut Src,
    handler: &mut H,
    shutdown: Fut,
) -> ScanReport
where
    S: InventoryStore,
    F: FormSession,
    Src: ScanSource + ?Sized,
    H: ScanHandler<S, F> + ?Sized,
    Fut: Future<Output = ()>,
{
    let mut report = ScanReport::default();
    tokio::pin!(shutdown);

    source.start();
    session.start_scanning();
    info!(table = %session.table(), "scan driver started");

    loop {
        let signal = tokio::select! {
            biased;
            _ = &mut shutdown => {
                debug!("scan driver shutdown requested");
                break;
            }
            signal = source.next_signal() => signal,
        };

        let Some(signal) = signal else {
            break;
        };

        let event = match signal {
            ScanSignal::Decoded(event) => event,
            ScanSignal::DecodeFailed(reason) => {
                report.decode_errors += 1;
                debug!(%reason, "decode error ignored");
                continue;
            }
        };

        report.scans += 1;
        let decision = match session.handle_scan(event).await {
            Ok(decision) => decision,
            Err(e) => {
                report.rejected += 1;
                debug!(error = %e, "scan rejected");
                continue;
            }
        };

        match &decision {
            ReconciliationDecision::Found(_) => report.found += 1,
            ReconciliationDecision::NotFound => report.not_found += 1,
            ReconciliationDecision::LookupError(_) => report.lookup_errors += 1,
        }

        if let Err(e) = handler.on_decision(session, &decision).await {
            report.handler_errors += 1;
            warn!(error = %e, decision = decision.label(), "scan handler failed");
        }
    }

    source.stop();
    session.stop_scanning();
    info!(
        scans = report.scans,
        decode_errors = report.decode_errors,
        found = report.found,
        not_found = report.not_found,
        lookup_errors = report.lookup_errors,
        "scan driver stopped"
    );
    report
}

//! Scan sources: producers of decoded barcode text.
//!
//! A scan source is a restartable stream of [`ScanSignal`]s. Decode failures are
//! reported in-band and are never fatal; only an exhausted or stopped source
//! ends the stream.

pub mod lines;
pub mod scripted;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use lines::LineScanSource;
pub use scripted::ScriptedScanSource;

/// One decoded read from a capture device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    pub raw_text: String,
    pub timestamp: DateTime<Utc>,
}

impl ScanEvent {
    pub fn new(raw_text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            raw_text: raw_text.into(),
            timestamp,
        }
    }

    /// Scan event stamped with the current time.
    pub fn now(raw_text: impl Into<String>) -> Self {
        Self::new(raw_text, Utc::now())
    }
}

/// What a scan source yields: either a decoded barcode or a transient failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanSignal {
    Decoded(ScanEvent),
    DecodeFailed(String),
}

/// Capability interface for a barcode capture device.
///
/// `start`/`stop` may be called any number of times in any order. While stopped,
/// `next_signal` returns `None` immediately.
#[async_trait::async_trait]
pub trait ScanSource: Send {
    fn start(&mut self);

    fn stop(&mut self);

    fn is_running(&self) -> bool;

    /// Next signal, or `None` once the source is stopped or exhausted.
    async fn next_signal(&mut self) -> Option<ScanSignal>;
}

#[async_trait::async_trait]
impl<S> ScanSource for Box<S>
where
    S: ScanSource + ?Sized,
{
    fn start(&mut self) {
        (**self).start()
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn is_running(&self) -> bool {
        (**self).is_running()
    }

    async fn next_signal(&mut self) -> Option<ScanSignal> {
        (**self).next_signal().await
    }
}

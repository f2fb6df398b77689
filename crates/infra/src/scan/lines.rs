use std::io::ErrorKind;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::warn;

use super::{ScanEvent, ScanSignal, ScanSource};

/// Scan source over newline-terminated text.
///
/// Covers keyboard-wedge and serial scanners, which type each barcode followed
/// by a line break, as well as piped input. Blank lines and undecodable bytes are
/// reported as decode failures; an I/O error or end of input ends the stream.
pub struct LineScanSource<R> {
    lines: Lines<R>,
    running: bool,
    exhausted: bool,
}

impl<R> LineScanSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            running: false,
            exhausted: false,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

impl<R> core::fmt::Debug for LineScanSource<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LineScanSource")
            .field("running", &self.running)
            .field("exhausted", &self.exhausted)
            .finish()
    }
}

#[async_trait::async_trait]
impl<R> ScanSource for LineScanSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    async fn next_signal(&mut self) -> Option<ScanSignal> {
        if !self.running || self.exhausted {
            return None;
        }

        match self.lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => {
                Some(ScanSignal::DecodeFailed("empty read".to_string()))
            }
            Ok(Some(line)) => Some(ScanSignal::Decoded(ScanEvent::now(line))),
            Ok(None) => {
                self.exhausted = true;
                None
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                Some(ScanSignal::DecodeFailed(format!("undecodable input: {e}")))
            }
            Err(e) => {
                warn!(error = %e, "scan input failed; ending stream");
                self.exhausted = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn yields_one_signal_per_line() {
        let input: &[u8] = b"SKU-001\r\n\n0123456789012\n";
        let mut source = LineScanSource::new(input);
        source.start();

        match source.next_signal().await {
            Some(ScanSignal::Decoded(event)) => assert_eq!(event.raw_text.trim(), "SKU-001"),
            other => panic!("Expected decoded SKU-001, got {other:?}"),
        }
        assert!(matches!(
            source.next_signal().await,
            Some(ScanSignal::DecodeFailed(_))
        ));
        match source.next_signal().await {
            Some(ScanSignal::Decoded(event)) => assert_eq!(event.raw_text, "0123456789012"),
            other => panic!("Expected decoded EAN, got {other:?}"),
        }
        assert!(source.next_signal().await.is_none());
        assert!(source.is_exhausted());
    }

    #[tokio::test]
    async fn undecodable_line_is_a_decode_failure_and_reading_continues() {
        let input: &[u8] = b"\xff\xfe\nSKU-001\n";
        let mut source = LineScanSource::new(input);
        source.start();

        match source.next_signal().await {
            Some(ScanSignal::DecodeFailed(reason)) => assert!(reason.starts_with("undecodable input")),
            other => panic!("Expected decode failure, got {other:?}"),
        }
        assert!(!source.is_exhausted());
        match source.next_signal().await {
            Some(ScanSignal::Decoded(event)) => assert_eq!(event.raw_text, "SKU-001"),
            other => panic!("Expected decoded SKU-001, got {other:?}"),
        }
        assert!(source.next_signal().await.is_none());
    }

    #[tokio::test]
    async fn stopped_source_does_not_consume_input() {
        let input: &[u8] = b"A\nB\n";
        let mut source = LineScanSource::new(input);
        assert!(source.next_signal().await.is_none());

        source.start();
        assert!(source.next_signal().await.is_some());
        source.stop();
        assert!(source.next_signal().await.is_none());
        source.start();
        match source.next_signal().await {
            Some(ScanSignal::Decoded(event)) => assert_eq!(event.raw_text, "B"),
            other => panic!("Expected decoded B, got {other:?}"),
        }
    }
}

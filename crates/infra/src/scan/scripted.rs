use std::collections::VecDeque;

use super::{ScanEvent, ScanSignal, ScanSource};

/// Replays a fixed sequence of signals. Used for headless tests and demos.
///
/// Stopping pauses the script; starting again resumes where it left off.
#[derive(Debug, Clone, Default)]
pub struct ScriptedScanSource {
    script: VecDeque<ScanSignal>,
    running: bool,
}

impl ScriptedScanSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script made of successful decodes only.
    pub fn from_texts<I, T>(texts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut source = Self::new();
        for text in texts {
            source = source.decoded(text);
        }
        source
    }

    pub fn decoded(mut self, text: impl Into<String>) -> Self {
        self.script
            .push_back(ScanSignal::Decoded(ScanEvent::now(text)));
        self
    }

    pub fn decode_error(mut self, reason: impl Into<String>) -> Self {
        self.script.push_back(ScanSignal::DecodeFailed(reason.into()));
        self
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

#[async_trait::async_trait]
impl ScanSource for ScriptedScanSource {
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
        if !self.running {
            return None;
        }
        self.script.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn yields_nothing_until_started() {
        let mut source = ScriptedScanSource::from_texts(["A", "B"]);
        assert!(source.next_signal().await.is_none());
        assert_eq!(source.remaining(), 2);

        source.start();
        match source.next_signal().await {
            Some(ScanSignal::Decoded(event)) => assert_eq!(event.raw_text, "A"),
            other => panic!("Expected decoded A, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn stop_and_restart_resume_the_script() {
        let mut source = ScriptedScanSource::new()
            .decoded("A")
            .decode_error("glare")
            .decoded("B");

        source.start();
        source.start();
        assert!(matches!(source.next_signal().await, Some(ScanSignal::Decoded(_))));

        source.stop();
        source.stop();
        assert!(source.next_signal().await.is_none());

        source.start();
        assert_eq!(
            source.next_signal().await,
            Some(ScanSignal::DecodeFailed("glare".to_string()))
        );
        assert!(matches!(source.next_signal().await, Some(ScanSignal::Decoded(_))));
        assert!(source.next_signal().await.is_none());
    }
}

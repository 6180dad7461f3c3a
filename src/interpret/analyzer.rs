//! Analyzer interface and the scripted mock recognizer

use std::time::Duration;

use futures::StreamExt;
use futures::stream::BoxStream;

use crate::domain::ResultEntry;
use crate::media::MediaSource;

/// Turns a media source into a stream of interpreted lines.
///
/// Entries must be yielded in `order`. The stream ends when interpretation
/// is complete; dropping it must stop all outstanding work.
pub trait Analyzer: Send + Sync {
    fn name(&self) -> &str;
    fn analyze(&self, source: &MediaSource) -> BoxStream<'static, ResultEntry>;
}

/// Reveals a fixed script, entry `i` at `(i + 1) * interval` after activation
#[derive(Debug, Clone)]
pub struct MockAnalyzer {
    script: Vec<String>,
    interval: Duration,
}

impl MockAnalyzer {
    pub fn new<S: Into<String>>(script: impl IntoIterator<Item = S>, interval: Duration) -> Self {
        Self {
            script: script.into_iter().map(Into::into).collect(),
            interval,
        }
    }

    pub fn webcam() -> Self {
        Self::new(
            [
                "Hello",
                "Welcome",
                "How are you?",
                "Thank you",
                "Good to see you",
            ],
            Duration::from_millis(3000),
        )
    }

    pub fn video() -> Self {
        Self::new(
            [
                "Hello",
                "My name is John",
                "Nice to meet you",
                "How are you today?",
                "I am learning sign language",
            ],
            Duration::from_millis(2000),
        )
    }

    pub fn image() -> Self {
        Self::new(
            ["Hello", "Thank you", "Nice to meet you"],
            Duration::from_millis(1500),
        )
    }

    /// Scheduled entries with their offsets from activation
    pub fn schedule(&self) -> Vec<ResultEntry> {
        self.script
            .iter()
            .enumerate()
            .map(|(order, text)| ResultEntry::new(order, text.clone(), self.interval * (order as u32 + 1)))
            .collect()
    }
}

impl Analyzer for MockAnalyzer {
    fn name(&self) -> &str {
        "mock"
    }

    fn analyze(&self, _source: &MediaSource) -> BoxStream<'static, ResultEntry> {
        let start = tokio::time::Instant::now();
        futures::stream::iter(self.schedule())
            .then(move |entry| async move {
                tokio::time::sleep_until(start + entry.offset).await;
                entry
            })
            .boxed()
    }
}

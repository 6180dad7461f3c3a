//! Mock upload progress shown after a file is accepted

use std::time::Duration;

use futures::StreamExt;
use futures::stream::{AbortHandle, Abortable, BoxStream};

/// Percentage added per tick
pub const STEP: u8 = 5;
/// Time between progress ticks
pub const TICK: Duration = Duration::from_millis(150);

/// Progress percentages (5, 10, ... 100), one per [`TICK`] after the start
pub fn simulate() -> BoxStream<'static, u8> {
    let start = tokio::time::Instant::now();
    futures::stream::unfold(0u8, move |progress| async move {
        if progress >= 100 {
            return None;
        }
        let tick = u32::from(progress / STEP) + 1;
        tokio::time::sleep_until(start + TICK * tick).await;
        let next = progress.saturating_add(STEP).min(100);
        Some((next, next))
    })
    .boxed()
}

/// A started upload, to be driven by the shell
pub struct UploadRun {
    pub generation: u64,
    pub progress: Abortable<BoxStream<'static, u8>>,
}

/// Progress state of the current upload
#[derive(Debug, Default)]
pub struct UploadTracker {
    progress: u8,
    uploading: bool,
    generation: u64,
    abort: Option<AbortHandle>,
}

impl UploadTracker {
    /// Start a new upload, cancelling any in flight
    pub fn begin(&mut self) -> UploadRun {
        self.cancel();
        self.generation += 1;
        self.uploading = true;

        let (progress, handle) = futures::stream::abortable(simulate());
        self.abort = Some(handle);
        UploadRun {
            generation: self.generation,
            progress,
        }
    }

    /// Record a progress tick. Returns `true` when this tick completed the upload.
    pub fn advance(&mut self, generation: u64, percent: u8) -> bool {
        if generation != self.generation || !self.uploading {
            return false;
        }
        self.progress = percent.min(100);
        if self.progress == 100 {
            self.uploading = false;
            self.abort = None;
            return true;
        }
        false
    }

    /// Abort the running upload and reset progress
    pub fn cancel(&mut self) {
        if let Some(handle) = self.abort.take() {
            handle.abort();
        }
        self.uploading = false;
        self.progress = 0;
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_progress_steps_to_completion() {
        let start = tokio::time::Instant::now();
        let steps: Vec<u8> = simulate().collect().await;

        assert_eq!(steps.len(), 20);
        assert_eq!(steps.first(), Some(&5));
        assert_eq!(steps.last(), Some(&100));
        assert!(steps.windows(2).all(|w| w[1] == w[0] + STEP));
        assert_eq!(start.elapsed(), TICK * 20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tracker_completes_once() {
        let mut tracker = UploadTracker::default();
        let run = tracker.begin();
        assert!(tracker.is_uploading());

        let mut completions = 0;
        let mut progress = run.progress;
        while let Some(percent) = progress.next().await {
            if tracker.advance(run.generation, percent) {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(tracker.progress(), 100);
        assert!(!tracker.is_uploading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_stream() {
        let mut tracker = UploadTracker::default();
        let mut run = tracker.begin();
        let first = run.progress.next().await.unwrap();
        assert!(!tracker.advance(run.generation, first));

        tracker.cancel();
        assert!(run.progress.next().await.is_none());
        assert_eq!(tracker.progress(), 0);
        assert!(!tracker.is_uploading());
    }

    #[test]
    fn test_stale_generation_ignored() {
        let mut tracker = UploadTracker::default();
        let first = tracker.begin();
        let second = tracker.begin();
        assert!(!tracker.advance(first.generation, 100));
        assert_eq!(tracker.progress(), 0);
        assert!(tracker.advance(second.generation, 100));
    }
}

//! Interpretation runs: activation, re-activation policy and cancellation

use std::sync::Arc;

use futures::stream::{AbortHandle, Abortable, BoxStream};

use super::analyzer::Analyzer;
use crate::domain::ResultEntry;
use crate::media::MediaSource;

/// What to do when activation is requested again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reactivation {
    /// Do nothing if results are already showing; otherwise start over
    KeepExisting,
    /// Always cancel the current run, clear results and start over
    Restart,
}

/// A started run; the shell polls `entries` and feeds them back via
/// [`InterpretationEngine::accept`]
pub struct Activation {
    pub generation: u64,
    pub entries: Abortable<BoxStream<'static, ResultEntry>>,
}

struct Run {
    generation: u64,
    abort: AbortHandle,
}

/// Page-local interpretation state
pub struct InterpretationEngine {
    analyzer: Arc<dyn Analyzer>,
    results: Vec<ResultEntry>,
    run: Option<Run>,
    generation: u64,
}

impl InterpretationEngine {
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            analyzer,
            results: Vec::new(),
            run: None,
            generation: 0,
        }
    }

    /// Start interpreting `source`, subject to `policy`
    pub fn activate(&mut self, source: &MediaSource, policy: Reactivation) -> Option<Activation> {
        if policy == Reactivation::KeepExisting && !self.results.is_empty() {
            log::debug!("Results already present, not re-running {}", self.analyzer.name());
            return None;
        }

        self.cancel();
        self.generation += 1;

        let (entries, abort) = futures::stream::abortable(self.analyzer.analyze(source));
        self.run = Some(Run {
            generation: self.generation,
            abort,
        });
        log::info!(
            "Interpretation run {} started ({})",
            self.generation,
            self.analyzer.name()
        );

        Some(Activation {
            generation: self.generation,
            entries,
        })
    }

    /// Append an entry from the current run. Entries from older runs are dropped.
    pub fn accept(&mut self, generation: u64, entry: ResultEntry) -> bool {
        if !self.is_current(generation) {
            log::debug!("Dropping entry from stale run {generation}");
            return false;
        }
        self.results.push(entry);
        true
    }

    /// Mark a run as finished
    pub fn finish(&mut self, generation: u64) {
        if self.is_current(generation) {
            self.run = None;
        }
    }

    /// Abort the pending run and clear all results
    pub fn cancel(&mut self) {
        if let Some(run) = self.run.take() {
            run.abort.abort();
            log::debug!("Interpretation run {} cancelled", run.generation);
        }
        self.results.clear();
    }

    pub fn results(&self) -> &[ResultEntry] {
        &self.results
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    fn is_current(&self, generation: u64) -> bool {
        self.run.as_ref().is_some_and(|run| run.generation == generation)
    }
}

impl Drop for InterpretationEngine {
    fn drop(&mut self) {
        if let Some(run) = self.run.take() {
            run.abort.abort();
        }
    }
}

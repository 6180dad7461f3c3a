//! Mock interpretation engine
//!
//! Pages own an [`InterpretationEngine`] wrapping an injected [`Analyzer`].
//! Only the scripted [`MockAnalyzer`] ships; a real recognizer plugs in by
//! implementing the same trait.

pub mod analyzer;
pub mod engine;

use std::sync::Arc;

pub use analyzer::{Analyzer, MockAnalyzer};
pub use engine::{Activation, InterpretationEngine, Reactivation};

/// Analyzer per capture flow
#[derive(Clone)]
pub struct Analyzers {
    pub image: Arc<dyn Analyzer>,
    pub video: Arc<dyn Analyzer>,
    pub webcam: Arc<dyn Analyzer>,
}

impl Analyzers {
    pub fn mock() -> Self {
        Self {
            image: Arc::new(MockAnalyzer::image()),
            video: Arc::new(MockAnalyzer::video()),
            webcam: Arc::new(MockAnalyzer::webcam()),
        }
    }
}

//! Interpretation result lines

use std::time::Duration;

/// One interpreted line, in emission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    /// 0-based position in the schedule
    pub order: usize,
    pub text: String,
    /// Delay from activation at which the entry was scheduled
    pub offset: Duration,
}

impl ResultEntry {
    pub fn new(order: usize, text: impl Into<String>, offset: Duration) -> Self {
        Self {
            order,
            text: text.into(),
            offset,
        }
    }
}

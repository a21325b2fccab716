//! Human-readable report of what a run did
//!
//! Passes push one line each. The caller shows the successes together as a
//! short message and the errors together in an alert.

use crate::OrganizeError;
use serde::Serialize;
use std::fmt;

/// One line of a run summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "camelCase")]
pub enum SummaryEntry {
    Success(String),
    Error(String),
}

impl fmt::Display for SummaryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryEntry::Success(message) => write!(f, "{}", message),
            SummaryEntry::Error(message) => write!(f, "Error: {}", message),
        }
    }
}

/// Ordered summary of a run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Summary {
    entries: Vec<SummaryEntry>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_success(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{}", message);
        self.entries.push(SummaryEntry::Success(message));
    }

    pub fn push_error(&mut self, error: &OrganizeError) {
        log::warn!("{}", error);
        self.entries.push(SummaryEntry::Error(error.to_string()));
    }

    pub fn entries(&self) -> &[SummaryEntry] {
        &self.entries
    }

    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry, SummaryEntry::Error(_)))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Successes joined with `", "` and errors separated by blank lines
    pub fn partition(&self) -> (Option<String>, Option<String>) {
        let mut successes = Vec::new();
        let mut errors = Vec::new();
        for entry in &self.entries {
            match entry {
                SummaryEntry::Success(message) => successes.push(message.as_str()),
                SummaryEntry::Error(message) => errors.push(message.as_str()),
            }
        }
        let join = |parts: Vec<&str>, separator: &str| {
            (!parts.is_empty()).then(|| parts.join(separator))
        };
        (join(successes, ", "), join(errors, "\n\n"))
    }
}

impl Extend<SummaryEntry> for Summary {
    fn extend<I: IntoIterator<Item = SummaryEntry>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

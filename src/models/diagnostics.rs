//! Collected reasons for units skipped during a run.

use std::fmt;

/// Pipeline stage a skipped unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Heading,
    Line,
    Row,
    Candidate,
    Notify,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Heading => "heading",
            Stage::Line => "line",
            Stage::Row => "row",
            Stage::Candidate => "candidate",
            Stage::Notify => "notify",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit that was dropped without aborting the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub stage: Stage,
    /// What was skipped (line text, link, row position)
    pub unit: String,
    pub reason: String,
}

impl Skipped {
    pub fn new(stage: Stage, unit: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            stage,
            unit: unit.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for Skipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.stage, self.unit, self.reason)
    }
}

/// Sink for skipped units, drained once at the end of a run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Skipped>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, skipped: Skipped) {
        self.entries.push(skipped);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Skipped> {
        self.entries.iter()
    }

    /// Number of entries recorded for a stage.
    pub fn count(&self, stage: Stage) -> usize {
        self.entries.iter().filter(|e| e.stage == stage).count()
    }

    /// Log every entry as a warning.
    pub fn log_all(&self) {
        for entry in &self.entries {
            log::warn!("Skipped {}", entry);
        }
    }
}

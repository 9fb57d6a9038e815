//! Inspection report types and terminal formatting.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The result of inspecting a label tree.
#[derive(Clone, Debug, Default, Serialize)]
pub struct InspectReport {
    /// Label files found.
    pub files: usize,
    /// Annotations parsed successfully.
    pub annotations: usize,
    /// Annotation count per category name.
    pub categories: BTreeMap<String, usize>,
    /// Annotations whose box spans no positive extent.
    pub degenerate: usize,
    /// Annotations carrying a detection score.
    pub scored: usize,
    /// Lines that failed to parse.
    pub parse_failures: Vec<ParseFailure>,
}

/// One unparseable label line.
#[derive(Clone, Debug, Serialize)]
pub struct ParseFailure {
    /// Label file the line came from.
    pub path: String,
    /// 1-based line number.
    pub line: usize,
    /// What was wrong with it.
    pub message: String,
}

impl InspectReport {
    /// True when every line parsed and every box has positive extent.
    pub fn is_clean(&self) -> bool {
        self.parse_failures.is_empty() && self.degenerate == 0
    }
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Label files:      {}", self.files)?;
        writeln!(f, "Annotations:      {}", self.annotations)?;
        writeln!(f, "Degenerate boxes: {}", self.degenerate)?;
        writeln!(f, "With score:       {}", self.scored)?;

        if !self.categories.is_empty() {
            writeln!(f, "Categories:")?;
            for (name, count) in &self.categories {
                writeln!(f, "  {:<20} {}", name, count)?;
            }
        }

        if !self.parse_failures.is_empty() {
            writeln!(f, "Parse failures:")?;
            for failure in &self.parse_failures {
                writeln!(f, "  {}:{}: {}", failure.path, failure.line, failure.message)?;
            }
        }

        Ok(())
    }
}

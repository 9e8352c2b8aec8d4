//! Accumulator for the findings of one comparison run.

use crate::findings::finding::Finding;
use serde::Serialize;

/// Append-only, ordered collection of findings.
///
/// Findings keep the order in which comparators recorded them, which is the
/// deterministic traversal order of the comparator tree.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FindingContainer {
    findings: Vec<Finding>,
}

impl FindingContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_finding(&mut self, finding: Finding) {
        tracing::trace!(
            category = %finding.category,
            change_type = %finding.change_type,
            subject = %finding.subject,
            file = %finding.location.proto_file_name,
            "recorded finding"
        );
        self.findings.push(finding);
    }

    pub fn get_all_findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Findings that should block a release (MAJOR).
    pub fn get_actionable_findings(&self) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.is_breaking()).collect()
    }

    pub fn has_breaking_changes(&self) -> bool {
        self.findings.iter().any(Finding::is_breaking)
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.findings)
    }

    pub fn human_readable_messages(&self) -> Vec<String> {
        self.findings
            .iter()
            .map(Finding::human_readable_message)
            .collect()
    }
}

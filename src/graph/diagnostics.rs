//! Non-fatal findings collected while building the change graph.

use serde::Serialize;
use std::fmt;

/// Kind of a non-fatal finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A resource node without a usable address or mode was skipped.
    MalformedNode,
    /// A resource node repeated an address already in the graph.
    DuplicateAddress,
    /// A change record could not be decoded.
    DecodeFailed,
    /// A change record matched no vertex.
    OrphanChange,
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// Node, address or record the finding is about.
    pub subject: String,
    /// Human-readable detail.
    pub message: String,
}

/// Ordered collection of findings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Records a finding.
    pub fn push(
        &mut self,
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.0.push(Diagnostic {
            kind,
            subject: subject.into(),
            message: message.into(),
        });
    }

    /// Appends all findings of another collection.
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Number of findings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of findings of one kind.
    #[must_use]
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.0.iter().filter(|d| d.kind == kind).count()
    }

    /// Iterates over the findings in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MalformedNode => "malformed node",
            Self::DuplicateAddress => "duplicate address",
            Self::DecodeFailed => "decode failed",
            Self::OrphanChange => "orphan change",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.kind, self.subject, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_kind() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(DiagnosticKind::OrphanChange, "a.b", "no vertex");
        diagnostics.push(DiagnosticKind::DecodeFailed, "#1", "bad action");
        diagnostics.push(DiagnosticKind::OrphanChange, "c.d", "no vertex");

        assert_eq!(diagnostics.len(), 3);
        assert_eq!(diagnostics.count(DiagnosticKind::OrphanChange), 2);
        assert_eq!(diagnostics.count(DiagnosticKind::MalformedNode), 0);
    }

    #[test]
    fn test_display() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(DiagnosticKind::OrphanChange, "aws_instance.gone", "no matching vertex");

        let line = diagnostics.iter().next().map(ToString::to_string);
        assert_eq!(
            line.as_deref(),
            Some("orphan change (aws_instance.gone): no matching vertex")
        );
    }
}
